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
use log::info;

use crate::api::types::{QueryRecord, QueryResponse, ReferenceData};
use crate::controller::{FetchController, FormStatus, MutationController};
use crate::error::Operation;
use crate::filters::{CascadingFilter, Field, FieldView};
use crate::session::Session;
use crate::sync::{Shared, Shareable, StateLock};
use crate::validation::ValidationError;
use super::{PageContext, load_reference};

const CLASS: [Field; 4] = [Field::Subject, Field::Division, Field::Department, Field::Year];

#[derive(Default)]
struct Draft {
    query_id: Option<String>,
    response: String
}

pub struct QueriesView {
    pub queries: Vec<QueryRecord>,
    pub loading: bool,
    pub selected: Option<String>,
    pub response: String,
    pub fields: Vec<FieldView>,
    pub status: FormStatus
}

/// Student queries waiting for an answer from the teacher.
pub struct QueriesPage {
    context: PageContext,
    session: Session,
    filter: Shared<CascadingFilter>,
    draft: Shared<Draft>,
    reference: FetchController<ReferenceData>,
    queries: FetchController<Vec<QueryRecord>>,
    form: MutationController
}

impl QueriesPage {
    pub fn new(context: PageContext, session: Session) -> QueriesPage {
        QueriesPage {
            filter: CascadingFilter::new_shared(context.filter()),
            context,
            session,
            draft: Draft::new_shared(Draft::default()),
            reference: FetchController::new("reference data"),
            queries: FetchController::new("queries"),
            form: MutationController::new("query response", None)
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn mount(&self) {
        load_reference(&self.context, &self.reference, &self.filter).await;
        self.load_queries().await;
    }

    pub async fn load_queries(&self) {
        self.queries.run(self.context.api.queries()).await;
    }

    /// Picks a query to answer, filling the class fields from it. False if the id is unknown.
    pub fn select(&self, query_id: &str) -> bool {
        let record = match self.queries.data().and_then(|q| q.into_iter().find(|r| r.id == query_id)) {
            Some(r) => r,
            None => return false
        };

        {
            let mut filter = self.filter.state();
            filter.set(Field::Subject, &record.subject);
            filter.set(Field::Division, &record.division);
            filter.set(Field::Department, &record.department);
            filter.set(Field::Year, &record.year);
        }

        self.draft.state().query_id = Some(record.id);
        true
    }

    pub fn set_response(&self, text: &str) {
        self.draft.state().response = text.to_string();
    }

    pub fn set_field(&self, field: Field, value: &str) {
        self.filter.state().set(field, value);
    }

    pub async fn respond(&self) {
        if self.form.is_submitting() {
            return;
        }

        let request = match self.request() {
            Ok(r) => r,
            Err(e) => {
                self.form.reject(e);
                return;
            }
        };

        let fallback = Operation::RespondToQuery.failure_message();
        if self.form.submit(self.context.api.respond_to_query(request), fallback).await.is_some() {
            info!("Query answered, reloading the list");

            *self.draft.state() = Draft::default();
            self.load_queries().await;
        }
    }

    fn request(&self) -> Result<QueryResponse, ValidationError> {
        let draft = self.draft.state();

        let query_id = draft.query_id.clone().ok_or(ValidationError::NoQuerySelected)?;
        if draft.response.trim().is_empty() {
            return Err(ValidationError::BlankResponse);
        }

        Ok(QueryResponse {
            query_id,
            response: draft.response.clone()
        })
    }

    pub fn view(&self) -> QueriesView {
        let draft = self.draft.state();
        let loading = self.reference.loading() || self.queries.loading();

        QueriesView {
            queries: self.queries.data().unwrap_or_default(),
            loading,
            selected: draft.query_id.clone(),
            response: draft.response.clone(),
            fields: self.filter.state().view(&CLASS, loading),
            status: self.form.status()
        }
    }
}
