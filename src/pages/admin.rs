use crate::controller::{FormStatus, MutationController};
use crate::error::Operation;
use crate::session::Session;
use crate::sync::{Shared, Shareable, StateLock};
use crate::validation;
use super::PageContext;

pub struct AdminView {
    pub subjects_input: String,
    pub departments_input: String,
    pub subjects_status: FormStatus,
    pub departments_status: FormStatus
}

/// Adds subjects and departments to the reference lists.
pub struct AdminPage {
    context: PageContext,
    session: Session,
    subjects_input: Shared<String>,
    departments_input: Shared<String>,
    subjects: MutationController,
    departments: MutationController
}

impl AdminPage {
    pub fn new(context: PageContext, session: Session) -> AdminPage {
        let revert = context.success_revert();

        AdminPage {
            context,
            session,
            subjects_input: String::new_shared(String::new()),
            departments_input: String::new_shared(String::new()),
            subjects: MutationController::new("subjects", revert),
            departments: MutationController::new("departments", revert)
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn set_subjects(&self, input: &str) {
        *self.subjects_input.state() = input.to_string();
    }

    pub fn set_departments(&self, input: &str) {
        *self.departments_input.state() = input.to_string();
    }

    pub async fn add_subjects(&self) {
        if self.subjects.is_submitting() {
            return;
        }

        let list = match validation::split_list(&self.subjects_input.state(), "subject") {
            Ok(l) => l,
            Err(e) => return self.subjects.reject(e)
        };

        let fallback = Operation::AddSubjects.failure_message();
        if self.subjects.submit(self.context.api.add_subjects(list), fallback).await.is_some() {
            self.subjects_input.state().clear();
        }
    }

    pub async fn add_departments(&self) {
        if self.departments.is_submitting() {
            return;
        }

        let list = match validation::split_list(&self.departments_input.state(), "department") {
            Ok(l) => l,
            Err(e) => return self.departments.reject(e)
        };

        let fallback = Operation::AddDepartments.failure_message();
        if self.departments.submit(self.context.api.add_departments(list), fallback).await.is_some() {
            self.departments_input.state().clear();
        }
    }

    pub fn view(&self) -> AdminView {
        AdminView {
            subjects_input: self.subjects_input.state().clone(),
            departments_input: self.departments_input.state().clone(),
            subjects_status: self.subjects.status(),
            departments_status: self.departments.status()
        }
    }
}
