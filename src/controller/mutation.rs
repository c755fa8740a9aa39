/*
 * Teacher Dashboard, keeping class tracking organized
 * Copyright (C) 2019-2020 Adrien 'Litarvan' Navratil
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use actix_rt::task::JoinHandle;
use log::{debug, info, warn};

use crate::api::types::{Ack, LoginResponse};
use crate::error::ApiResult;
use crate::sync::{Shared, Shareable, StateLock};

/// Answers of write endpoints, which say themselves whether the write went through.
pub trait Acknowledge {
    fn succeeded(&self) -> bool;
    fn message(&self) -> Option<&str>;
}

impl Acknowledge for Ack {
    fn succeeded(&self) -> bool {
        self.success
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl Acknowledge for LoginResponse {
    fn succeeded(&self) -> bool {
        self.success
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormStatus {
    Idle,
    Submitting,
    Success,
    Failed(String)
}

struct MutationState {
    status: FormStatus,
    generation: u64,
    revert: Option<JoinHandle<()>>
}

impl MutationState {
    fn cancel_revert(&mut self) {
        if let Some(handle) = self.revert.take() {
            handle.abort();
        }
    }
}

/// Held while a submission is awaited. If the caller drops the future before
/// the answer, the form goes back to Idle instead of staying Submitting.
struct InFlight<'a> {
    name: &'static str,
    state: &'a Shared<MutationState>,
    generation: u64
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.state.state();
        if state.generation == self.generation && state.status == FormStatus::Submitting {
            debug!("{} submission abandoned", self.name);
            state.status = FormStatus::Idle;
        }
    }
}

/// Write side of a form: Idle -> Submitting -> Success | Failed.
///
/// A success may go back to Idle on its own after a delay. That timer belongs
/// to the controller, dropping the controller or submitting again cancels it.
pub struct MutationController {
    name: &'static str,
    state: Shared<MutationState>,
    revert_after: Option<Duration>
}

impl MutationController {
    pub fn new(name: &'static str, revert_after: Option<Duration>) -> MutationController {
        MutationController {
            name,
            state: MutationState::new_shared(MutationState {
                status: FormStatus::Idle,
                generation: 0,
                revert: None
            }),
            revert_after
        }
    }

    pub fn status(&self) -> FormStatus {
        self.state.state().status.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.state.state().status == FormStatus::Submitting
    }

    pub fn succeeded(&self) -> bool {
        self.state.state().status == FormStatus::Success
    }

    pub fn error(&self) -> Option<String> {
        match &self.state.state().status {
            FormStatus::Failed(message) => Some(message.clone()),
            _ => None
        }
    }

    /// Moves to Submitting, false if a submission is already running.
    pub fn begin(&self) -> bool {
        let mut state = self.state.state();
        if state.status == FormStatus::Submitting {
            debug!("Ignoring {} submission, one is already running", self.name);
            return false;
        }

        state.cancel_revert();
        state.generation += 1;
        state.status = FormStatus::Submitting;

        true
    }

    /// Fails the form without sending anything.
    pub fn reject<M: ToString>(&self, message: M) {
        let mut state = self.state.state();
        state.cancel_revert();
        state.generation += 1;
        state.status = FormStatus::Failed(message.to_string());
    }

    /// Settles a submission started with `begin`, giving back the answer if it succeeded.
    pub fn finish<R: Acknowledge>(&self, result: ApiResult<R>, fallback: &str) -> Option<R> {
        let mut state = self.state.state();

        match result {
            Ok(answer) if answer.succeeded() => {
                info!("{} submitted", self.name);
                state.status = FormStatus::Success;

                if let Some(delay) = self.revert_after {
                    state.revert = Some(self.schedule_revert(delay, state.generation));
                }

                Some(answer)
            },
            Ok(answer) => {
                let message = answer.message().unwrap_or(fallback).to_string();
                warn!("{} refused by the server : {}", self.name, message);

                state.status = FormStatus::Failed(message);
                None
            },
            Err(e) => {
                warn!("{} failed : {}", self.name, e.to_detailed_string());

                state.status = FormStatus::Failed(e.server_message().unwrap_or(fallback).to_string());
                None
            }
        }
    }

    pub async fn submit<R, F>(&self, request: F, fallback: &str) -> Option<R>
        where R: Acknowledge,
              F: Future<Output = ApiResult<R>>
    {
        if !self.begin() {
            return None;
        }

        let _in_flight = InFlight {
            name: self.name,
            state: &self.state,
            generation: self.state.state().generation
        };

        let result = request.await;
        self.finish(result, fallback)
    }

    fn schedule_revert(&self, delay: Duration, generation: u64) -> JoinHandle<()> {
        let state = Arc::downgrade(&self.state);

        actix_rt::spawn(async move {
            actix_rt::time::sleep(delay).await;

            if let Some(state) = state.upgrade() {
                let mut state = state.state();
                if state.generation == generation && state.status == FormStatus::Success {
                    state.status = FormStatus::Idle;
                    state.revert = None;
                }
            }
        })
    }
}

impl Drop for MutationController {
    fn drop(&mut self) {
        self.state.state().cancel_revert();
    }
}

#[cfg(test)]
mod tests {
    use futures::FutureExt;

    use super::*;
    use crate::api::mock::rejected;
    use crate::error::Operation;

    fn ack(success: bool, message: Option<&str>) -> ApiResult<Ack> {
        Ok(Ack {
            success,
            message: message.map(|m| m.to_string())
        })
    }

    #[actix_rt::test]
    async fn success_reverts_after_the_delay() {
        let form = MutationController::new("subjects", Some(Duration::from_millis(40)));

        assert!(form.submit(async { ack(true, None) }, "Failed").await.is_some());
        assert!(form.succeeded());

        actix_rt::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(form.status(), FormStatus::Idle);
    }

    #[actix_rt::test]
    async fn success_without_delay_stays() {
        let form = MutationController::new("fa mode", None);

        form.submit(async { ack(true, None) }, "Failed").await;
        actix_rt::time::sleep(Duration::from_millis(50)).await;

        assert!(form.succeeded());
    }

    #[actix_rt::test]
    async fn refused_answer_shows_server_message() {
        let form = MutationController::new("subjects", None);

        assert!(form.submit(async { ack(false, Some("Subject already exists")) }, "Failed to add subjects").await.is_none());
        assert_eq!(form.error().as_deref(), Some("Subject already exists"));

        form.submit(async { ack(false, None) }, "Failed to add subjects").await;
        assert_eq!(form.error().as_deref(), Some("Failed to add subjects"));
    }

    #[actix_rt::test]
    async fn transport_error_uses_fallback() {
        let form = MutationController::new("marks", None);

        let result: Option<Ack> = form.submit(async { Err(rejected(Operation::UploadMarks, None)) }, "Failed to upload marks").await;

        assert!(result.is_none());
        assert_eq!(form.status(), FormStatus::Failed("Failed to upload marks".to_string()));
        assert!(!form.is_submitting());
    }

    #[actix_rt::test]
    async fn second_submit_is_refused_while_running() {
        let form = MutationController::new("subjects", None);

        assert!(form.begin());
        assert!(form.is_submitting());
        assert!(!form.begin());

        let ignored = form.submit(async { ack(true, None) }, "Failed").await;
        assert!(ignored.is_none());
        assert!(form.is_submitting());
    }

    #[actix_rt::test]
    async fn failure_cancels_a_pending_revert() {
        let form = MutationController::new("subjects", Some(Duration::from_millis(30)));

        form.submit(async { ack(true, None) }, "Failed").await;
        form.reject("Please enter at least one subject");

        actix_rt::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(form.error().as_deref(), Some("Please enter at least one subject"));
    }

    #[test]
    fn abandoned_submission_frees_the_form() {
        let form = MutationController::new("fa mode", None);

        let answer = form.submit(futures::future::pending::<ApiResult<Ack>>(), "Failed").now_or_never();

        assert!(answer.is_none());
        assert_eq!(form.status(), FormStatus::Idle);
        assert!(form.begin());
    }
}
