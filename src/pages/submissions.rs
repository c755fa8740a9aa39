use crate::api::types::{ClassStats, ReferenceData, SubmissionRecord};
use crate::controller::FetchController;
use crate::filters::{CascadingFilter, Field, FieldView, FilterSelection};
use crate::session::Session;
use crate::sync::{Shared, Shareable, StateLock};
use super::{PageContext, load_reference};

pub const REQUIRED: [Field; 5] = [Field::Department, Field::Year, Field::Division, Field::Subject, Field::Paper];
const SUBJECT_SCOPE: [Field; 2] = [Field::Department, Field::Year];

pub const EMPTY_MESSAGE: &str = "No submissions found for the selected criteria.";

pub struct SubmissionsView {
    pub fields: Vec<FieldView>,
    pub loading: bool,
    pub stats: Option<ClassStats>,
    pub submissions: Vec<SubmissionRecord>,
    pub empty_message: Option<&'static str>
}

/// Who handed in a given paper. Subjects offered depend on the department and year.
pub struct SubmissionsPage {
    context: PageContext,
    session: Session,
    filter: Shared<CascadingFilter>,
    reference: FetchController<ReferenceData>,
    subjects: FetchController<ClassStats>,
    submissions: FetchController<ClassStats>
}

impl SubmissionsPage {
    pub fn new(context: PageContext, session: Session) -> SubmissionsPage {
        let filter = context.filter()
            .with_dependency(Field::Subject, &SUBJECT_SCOPE);

        SubmissionsPage {
            filter: CascadingFilter::new_shared(filter),
            context,
            session,
            reference: FetchController::new("reference data"),
            subjects: FetchController::new("subject options"),
            submissions: FetchController::new("submissions")
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn mount(&self) {
        load_reference(&self.context, &self.reference, &self.filter).await;
    }

    pub async fn set_filter(&self, field: Field, value: &str) {
        let (changed, scope_changed, selection) = {
            let mut filter = self.filter.state();
            let changed = filter.set(field, value);
            let scope_changed = changed && filter.governs(field, Field::Subject) && filter.dependency_ready(Field::Subject);

            (changed, scope_changed, filter.selection().clone())
        };

        if !changed {
            return;
        }

        if scope_changed {
            self.load_subjects(selection.project(&SUBJECT_SCOPE)).await;
        }

        if selection.is_complete(&REQUIRED) {
            self.submissions.run(self.context.api.class_stats(selection.project(&REQUIRED))).await;
        } else {
            self.submissions.clear();
        }
    }

    async fn load_subjects(&self, scope: FilterSelection) {
        if self.subjects.run(self.context.api.class_stats(scope)).await {
            if let Some(stats) = self.subjects.data() {
                self.filter.state().set_scoped(Field::Subject, stats.subjects);
            }
        }
    }

    pub fn loading(&self) -> bool {
        self.reference.loading() || self.submissions.loading()
    }

    pub fn view(&self) -> SubmissionsView {
        let loading = self.loading();
        let filter = self.filter.state();
        let complete = filter.selection().is_complete(&REQUIRED);

        let stats = if complete && !loading { self.submissions.data() } else { None };
        let submissions = stats.as_ref()
            .map(|s| s.submissions.clone())
            .unwrap_or_default();

        SubmissionsView {
            fields: filter.view(&REQUIRED, loading),
            loading,
            empty_message: if complete && !loading && submissions.is_empty() { Some(EMPTY_MESSAGE) } else { None },
            stats,
            submissions
        }
    }
}
