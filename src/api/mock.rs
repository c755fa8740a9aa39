use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult, Operation};
use crate::filters::FilterSelection;
use crate::sync::StateLock;
use super::DashboardApi;
use super::types::*;

/// Scripted backend recording every request it receives.
#[derive(Default)]
pub struct MockApi {
    calls: Mutex<Vec<(Operation, Value)>>,
    state: Mutex<MockState>
}

#[derive(Default)]
struct MockState {
    reference: Option<ReferenceData>,
    stats: ClassStats,
    scripted_stats: VecDeque<(u64, ApiResult<ClassStats>)>,
    ack: Option<Ack>,
    rejection: Option<(u16, Option<String>)>,
    queries: Vec<QueryRecord>,
    fa_mode: Option<String>,
    login_user: Option<Value>
}

pub fn rejected(operation: Operation, message: Option<&str>) -> ApiError {
    ApiError::Rejected {
        operation,
        status: 500,
        message: message.map(|m| m.to_string())
    }
}

impl MockApi {
    pub fn new() -> MockApi {
        let api = MockApi::default();
        {
            let mut state = api.state.state();
            state.reference = Some(ReferenceData {
                departments: vec!["Computer Engineering".to_string(), "IT".to_string()],
                subjects: vec!["DBMS".to_string(), "Operating Systems".to_string()],
                fa_modes: vec!["Quiz".to_string(), "Assignment".to_string()]
            });
            state.ack = Some(Ack { success: true, message: None });
        }

        api
    }

    pub fn with_stats(self, stats: ClassStats) -> MockApi {
        self.state.state().stats = stats;
        self
    }

    /// Next class-stats answers in call order, each after `delay_ms`.
    pub fn script_stats(&self, delay_ms: u64, result: ApiResult<ClassStats>) {
        self.state.state().scripted_stats.push_back((delay_ms, result));
    }

    pub fn failing_reference(self) -> MockApi {
        self.state.state().reference = None;
        self
    }

    pub fn with_ack(self, ack: Ack) -> MockApi {
        self.state.state().ack = Some(ack);
        self
    }

    pub fn rejecting(self, status: u16, message: Option<&str>) -> MockApi {
        self.state.state().rejection = Some((status, message.map(|m| m.to_string())));
        self
    }

    pub fn with_queries(self, queries: Vec<QueryRecord>) -> MockApi {
        self.state.state().queries = queries;
        self
    }

    pub fn set_queries(&self, queries: Vec<QueryRecord>) {
        self.state.state().queries = queries;
    }

    pub fn with_fa_mode(self, mode: &str) -> MockApi {
        self.state.state().fa_mode = Some(mode.to_string());
        self
    }

    pub fn with_login_user(self, user: Value) -> MockApi {
        self.state.state().login_user = Some(user);
        self
    }

    pub fn calls(&self, operation: Operation) -> Vec<Value> {
        self.calls.state().iter()
            .filter(|(o, _)| *o == operation)
            .map(|(_, body)| body.clone())
            .collect()
    }

    pub fn count(&self, operation: Operation) -> usize {
        self.calls(operation).len()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.state().len()
    }

    fn record<B: Serialize>(&self, operation: Operation, body: &B) {
        let body = serde_json::to_value(body).unwrap_or(Value::Null);
        self.calls.state().push((operation, body));
    }

    fn ack(&self, operation: Operation) -> ApiResult<Ack> {
        let state = self.state.state();
        if let Some((status, message)) = &state.rejection {
            return Err(ApiError::Rejected {
                operation,
                status: *status,
                message: message.clone()
            });
        }

        Ok(state.ack.clone().unwrap_or_default())
    }
}

impl DashboardApi for MockApi {
    fn login(&self, request: LoginRequest) -> BoxFuture<'_, ApiResult<LoginResponse>> {
        async move {
            self.record(Operation::Login, &request);
            let ack = self.ack(Operation::Login)?;

            Ok(LoginResponse {
                success: ack.success,
                user: if ack.success { self.state.state().login_user.clone() } else { None },
                message: ack.message
            })
        }.boxed()
    }

    fn register_student(&self, registration: StudentRegistration) -> BoxFuture<'_, ApiResult<Ack>> {
        async move {
            self.record(Operation::RegisterStudent, &registration);
            self.ack(Operation::RegisterStudent)
        }.boxed()
    }

    fn register_teacher(&self, registration: TeacherRegistration) -> BoxFuture<'_, ApiResult<Ack>> {
        async move {
            self.record(Operation::RegisterTeacher, &registration);
            self.ack(Operation::RegisterTeacher)
        }.boxed()
    }

    fn reference_data(&self) -> BoxFuture<'_, ApiResult<ReferenceData>> {
        async move {
            self.record(Operation::ReferenceData, &Value::Null);
            self.state.state().reference.clone()
                .ok_or_else(|| rejected(Operation::ReferenceData, None))
        }.boxed()
    }

    fn class_stats(&self, filter: FilterSelection) -> BoxFuture<'_, ApiResult<ClassStats>> {
        async move {
            self.record(Operation::ClassStats, &filter);

            let scripted = self.state.state().scripted_stats.pop_front();
            match scripted {
                Some((delay, result)) => {
                    if delay > 0 {
                        actix_rt::time::sleep(Duration::from_millis(delay)).await;
                    }
                    result
                },
                None => Ok(self.state.state().stats.clone())
            }
        }.boxed()
    }

    fn add_subjects(&self, subjects: Vec<String>) -> BoxFuture<'_, ApiResult<Ack>> {
        async move {
            self.record(Operation::AddSubjects, &json!({ "subjects": subjects }));
            self.ack(Operation::AddSubjects)
        }.boxed()
    }

    fn add_departments(&self, departments: Vec<String>) -> BoxFuture<'_, ApiResult<Ack>> {
        async move {
            self.record(Operation::AddDepartments, &json!({ "departments": departments }));
            self.ack(Operation::AddDepartments)
        }.boxed()
    }

    fn upload_marks(&self, upload: MarksUpload) -> BoxFuture<'_, ApiResult<Ack>> {
        async move {
            self.record(Operation::UploadMarks, &json!({
                "file": upload.file.file_name,
                "subject": upload.subject,
                "division": upload.division,
                "department": upload.department,
                "year": upload.year,
                "paper": upload.paper
            }));
            self.ack(Operation::UploadMarks)
        }.boxed()
    }

    fn queries(&self) -> BoxFuture<'_, ApiResult<Vec<QueryRecord>>> {
        async move {
            self.record(Operation::Queries, &Value::Null);
            Ok(self.state.state().queries.clone())
        }.boxed()
    }

    fn respond_to_query(&self, response: QueryResponse) -> BoxFuture<'_, ApiResult<Ack>> {
        async move {
            self.record(Operation::RespondToQuery, &response);
            self.ack(Operation::RespondToQuery)
        }.boxed()
    }

    fn set_fa_mode(&self, request: FaModeRequest) -> BoxFuture<'_, ApiResult<Ack>> {
        async move {
            self.record(Operation::SetFaMode, &request);
            self.ack(Operation::SetFaMode)
        }.boxed()
    }

    fn fa_mode_status(&self, filter: FilterSelection) -> BoxFuture<'_, ApiResult<FaModeStatus>> {
        async move {
            self.record(Operation::FaModeStatus, &filter);
            Ok(FaModeStatus {
                mode: self.state.state().fa_mode.clone()
            })
        }.boxed()
    }

    fn debug_data(&self) -> BoxFuture<'_, ApiResult<Value>> {
        async move {
            self.record(Operation::DebugData, &Value::Null);
            Ok(json!({ "queries": self.state.state().queries.len() }))
        }.boxed()
    }
}
