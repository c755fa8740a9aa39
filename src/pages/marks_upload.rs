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
use crate::api::types::{Attachment, MarksUpload, ReferenceData};
use crate::controller::{FetchController, FormStatus, MutationController};
use crate::error::Operation;
use crate::filters::{CascadingFilter, Field, FieldView};
use crate::session::Session;
use crate::sync::{Shared, Shareable, StateLock};
use crate::validation::{self, ValidationError};
use super::{PageContext, load_reference};

pub const REQUIRED: [Field; 5] = [Field::Subject, Field::Division, Field::Department, Field::Year, Field::Paper];

pub struct MarksUploadView {
    pub fields: Vec<FieldView>,
    pub file_name: Option<String>,
    pub status: FormStatus
}

pub struct MarksUploadPage {
    context: PageContext,
    session: Session,
    filter: Shared<CascadingFilter>,
    file: Shared<Option<Attachment>>,
    reference: FetchController<ReferenceData>,
    form: MutationController
}

impl MarksUploadPage {
    pub fn new(context: PageContext, session: Session) -> MarksUploadPage {
        MarksUploadPage {
            filter: CascadingFilter::new_shared(context.filter()),
            context,
            session,
            file: Option::<Attachment>::new_shared(None),
            reference: FetchController::new("reference data"),
            form: MutationController::new("marks upload", None)
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn mount(&self) {
        load_reference(&self.context, &self.reference, &self.filter).await;
    }

    pub fn set_field(&self, field: Field, value: &str) {
        self.filter.state().set(field, value);
    }

    pub fn attach(&self, file: Attachment) {
        *self.file.state() = Some(file);
    }

    pub async fn submit(&self) {
        if self.form.is_submitting() {
            return;
        }

        let upload = match self.upload() {
            Ok(u) => u,
            Err(e) => {
                self.form.reject(e);
                return;
            }
        };

        let fallback = Operation::UploadMarks.failure_message();
        if self.form.submit(self.context.api.upload_marks(upload), fallback).await.is_some() {
            self.filter.state().reset();
            *self.file.state() = None;
        }
    }

    fn upload(&self) -> Result<MarksUpload, ValidationError> {
        let selection = self.filter.state().selection().clone();
        let file = self.file.state().clone();

        validation::require(&selection, &REQUIRED)?;
        validation::check_mark_sheet(file.as_ref())?;
        let file = file.ok_or(ValidationError::MissingFile)?;

        Ok(MarksUpload {
            file,
            subject: selection.subject,
            division: selection.division,
            department: selection.department,
            year: selection.year,
            paper: selection.paper
        })
    }

    pub fn view(&self) -> MarksUploadView {
        MarksUploadView {
            fields: self.filter.state().view(&REQUIRED, self.reference.loading()),
            file_name: self.file.state().as_ref().map(|f| f.file_name.clone()),
            status: self.form.status()
        }
    }
}
