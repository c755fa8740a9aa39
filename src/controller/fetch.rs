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

use log::{debug, warn};

use crate::error::ApiResult;
use crate::sync::{Shared, Shareable, StateLock};

struct FetchState<T> {
    loading: bool,
    data: Option<T>,
    generation: u64
}

/// Read side of a page: runs a request, remembers its result and whether one is
/// in flight. Every run takes a new generation, an answer coming back for an
/// older generation is dropped.
pub struct FetchController<T> {
    name: &'static str,
    state: Shared<FetchState<T>>
}

impl<T: Clone> FetchController<T> {
    pub fn new(name: &'static str) -> FetchController<T> {
        FetchController {
            name,
            state: FetchState::new_shared(FetchState {
                loading: false,
                data: None,
                generation: 0
            })
        }
    }

    pub fn loading(&self) -> bool {
        self.state.state().loading
    }

    pub fn data(&self) -> Option<T> {
        self.state.state().data.clone()
    }

    /// Forgets the current result and anything still in flight.
    pub fn clear(&self) {
        let mut state = self.state.state();
        state.generation += 1;
        state.loading = false;
        state.data = None;
    }

    /// Sets the result directly, e.g. after a write the page already knows the outcome of.
    pub fn replace(&self, data: T) {
        let mut state = self.state.state();
        state.generation += 1;
        state.loading = false;
        state.data = Some(data);
    }

    /// Returns false when the answer was discarded because a newer run started meanwhile.
    pub async fn run<F>(&self, request: F) -> bool
        where F: Future<Output = ApiResult<T>>
    {
        let token = {
            let mut state = self.state.state();
            state.generation += 1;
            state.loading = true;
            state.generation
        };

        let result = request.await;

        let mut state = self.state.state();
        if state.generation != token {
            debug!("Discarding stale {} answer (generation {}, now {})", self.name, token, state.generation);
            return false;
        }

        match result {
            Ok(data) => state.data = Some(data),
            Err(e) => {
                warn!("Failed to load {} : {}", self.name, e.to_detailed_string());
                state.data = None;
            }
        }

        state.loading = false;
        true
    }
}
