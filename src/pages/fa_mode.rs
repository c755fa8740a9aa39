use crate::api::types::{FaModeRequest, FaModeStatus, ReferenceData};
use crate::controller::{FetchController, FormStatus, MutationController};
use crate::error::Operation;
use crate::filters::{CascadingFilter, Field, FieldView, SelectOption};
use crate::session::Session;
use crate::sync::{Shared, Shareable, StateLock};
use crate::validation::{self, ValidationError};
use super::{PageContext, load_reference};

pub const REQUIRED: [Field; 4] = [Field::Subject, Field::Division, Field::Department, Field::Year];

pub struct FaModeView {
    pub fields: Vec<FieldView>,
    pub mode: String,
    pub modes: Vec<SelectOption>,
    pub current_mode: Option<String>,
    pub status: FormStatus
}

/// Lets a teacher pick the formative assessment mode of a class.
pub struct FaModePage {
    context: PageContext,
    session: Session,
    filter: Shared<CascadingFilter>,
    mode: Shared<String>,
    reference: FetchController<ReferenceData>,
    current: FetchController<FaModeStatus>,
    form: MutationController
}

impl FaModePage {
    pub fn new(context: PageContext, session: Session) -> FaModePage {
        FaModePage {
            filter: CascadingFilter::new_shared(context.filter()),
            context,
            session,
            mode: String::new_shared(String::new()),
            reference: FetchController::new("reference data"),
            current: FetchController::new("current FA mode"),
            form: MutationController::new("FA mode", None)
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn mount(&self) {
        load_reference(&self.context, &self.reference, &self.filter).await;
    }

    pub async fn set_filter(&self, field: Field, value: &str) {
        let (changed, selection) = {
            let mut filter = self.filter.state();
            (filter.set(field, value), filter.selection().clone())
        };

        // Only the class fields scope the request
        if !changed || !REQUIRED.contains(&field) {
            return;
        }

        if selection.is_complete(&REQUIRED) {
            self.current.run(self.context.api.fa_mode_status(selection.project(&REQUIRED))).await;
        } else {
            self.current.clear();
        }
    }

    pub fn set_mode(&self, mode: &str) {
        *self.mode.state() = mode.to_string();
    }

    pub async fn submit(&self) {
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
        let mode = request.mode.clone();

        let fallback = Operation::SetFaMode.failure_message();
        if self.form.submit(self.context.api.set_fa_mode(request), fallback).await.is_some() {
            self.current.replace(FaModeStatus { mode: Some(mode) });
        }
    }

    fn request(&self) -> Result<FaModeRequest, ValidationError> {
        let selection = self.filter.state().selection().clone();
        let mode = self.mode.state().clone();

        validation::require(&selection, &REQUIRED)?;
        validation::require_input(&mode, "FA mode")?;

        Ok(FaModeRequest {
            department: selection.department,
            subject: selection.subject,
            division: selection.division,
            year: selection.year,
            mode
        })
    }

    pub fn view(&self) -> FaModeView {
        let filter = self.filter.state();

        FaModeView {
            fields: filter.view(&REQUIRED, false),
            mode: self.mode.state().clone(),
            modes: filter.reference().fa_modes.iter()
                .map(|m| SelectOption { value: m.clone(), label: m.clone() })
                .collect(),
            current_mode: self.current.data().and_then(|s| s.mode),
            status: self.form.status()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::api::mock::MockApi;
    use crate::pages::testing::context;
    use crate::session::teacher;

    async fn select_class(page: &FaModePage) {
        page.set_filter(Field::Subject, "DBMS").await;
        page.set_filter(Field::Division, "A").await;
        page.set_filter(Field::Department, "IT").await;
        page.set_filter(Field::Year, "SE").await;
    }

    #[actix_rt::test]
    async fn current_mode_is_looked_up_for_a_full_class() {
        let api = Arc::new(MockApi::new().with_fa_mode("Quiz"));
        let page = FaModePage::new(context(&api), teacher());
        page.mount().await;

        page.set_filter(Field::Subject, "DBMS").await;
        assert_eq!(api.count(Operation::FaModeStatus), 0);

        select_class(&page).await;
        assert_eq!(api.calls(Operation::FaModeStatus), vec![json!({
            "subject": "DBMS", "division": "A", "department": "IT", "year": "SE"
        })]);

        let view = page.view();
        assert_eq!(view.current_mode.as_deref(), Some("Quiz"));
        assert_eq!(view.modes.len(), 2);
    }

    #[actix_rt::test]
    async fn paper_is_not_part_of_the_lookup() {
        let api = Arc::new(MockApi::new().with_fa_mode("Quiz"));
        let page = FaModePage::new(context(&api), teacher());
        select_class(&page).await;

        page.set_filter(Field::Paper, "FA2").await;

        assert_eq!(api.count(Operation::FaModeStatus), 1);
        assert_eq!(page.view().current_mode.as_deref(), Some("Quiz"));
    }

    #[actix_rt::test]
    async fn submit_needs_a_mode() {
        let api = Arc::new(MockApi::new());
        let page = FaModePage::new(context(&api), teacher());
        select_class(&page).await;

        page.submit().await;

        assert_eq!(api.count(Operation::SetFaMode), 0);
        assert_eq!(page.view().status, FormStatus::Failed("Please fill in the FA mode field".to_string()));
    }

    #[actix_rt::test]
    async fn success_updates_the_current_mode_and_stays() {
        let api = Arc::new(MockApi::new().with_fa_mode("Quiz"));
        let page = FaModePage::new(context(&api), teacher());
        select_class(&page).await;

        page.set_mode("Assignment");
        page.submit().await;

        assert_eq!(api.calls(Operation::SetFaMode)[0]["mode"], json!("Assignment"));

        actix_rt::time::sleep(std::time::Duration::from_millis(100)).await;
        let view = page.view();
        assert_eq!(view.status, FormStatus::Success);
        assert_eq!(view.current_mode.as_deref(), Some("Assignment"));
    }
}
