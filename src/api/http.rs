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
use futures::future::{BoxFuture, FutureExt};
use log::{debug, warn};
use reqwest::{Client as HttpClient, RequestBuilder};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::config::DashConfig;
use crate::error::{ApiError, ApiResult, Operation};
use crate::filters::FilterSelection;
use crate::utils::query_string;
use super::DashboardApi;
use super::types::*;

#[derive(Clone)]
pub struct HttpApi {
    http: HttpClient,
    api_url: String,
    auth_url: String
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>
}

impl HttpApi {
    pub fn new(config: &DashConfig) -> Result<HttpApi, reqwest::Error> {
        let http = HttpClient::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(HttpApi {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            auth_url: config.auth_url.trim_end_matches('/').to_string()
        })
    }

    fn api(&self, path: &str) -> String {
        format!("{}/api/{}", self.api_url, path)
    }

    fn auth(&self, path: &str) -> String {
        format!("{}/api/{}", self.auth_url, path)
    }

    async fn request<T>(&self, operation: Operation, builder: RequestBuilder) -> ApiResult<T>
        where T: DeserializeOwned
    {
        let res = builder
            .header("Accept", "application/json")
            .send().await
            .map_err(|error| ApiError::Http { operation, error })?;

        let status = res.status();
        let url = res.url().to_string();
        let body = res.text().await
            .map_err(|error| ApiError::Http { operation, error })?;

        debug!("{} answered HTTP {}", url, status);

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message);

            warn!("{} rejected with HTTP {}", url, status);

            return Err(ApiError::Rejected {
                operation,
                status: status.as_u16(),
                message
            });
        }

        serde_json::from_str(&body)
            .map_err(move |error| ApiError::Remote {
                operation,
                error,
                response: body
            })
    }

    async fn read<T>(&self, operation: Operation, builder: RequestBuilder) -> ApiResult<T>
        where T: DeserializeOwned
    {
        let body: Value = self.request(operation, builder).await?;

        unwrap_payload(body.clone())
            .map_err(move |error| ApiError::Remote {
                operation,
                error,
                response: body.to_string()
            })
    }
}

impl DashboardApi for HttpApi {
    fn login(&self, request: LoginRequest) -> BoxFuture<'_, ApiResult<LoginResponse>> {
        async move {
            let builder = self.http.post(&self.auth("login")).json(&request);
            self.request(Operation::Login, builder).await
        }.boxed()
    }

    fn register_student(&self, registration: StudentRegistration) -> BoxFuture<'_, ApiResult<Ack>> {
        async move {
            let builder = self.http.post(&self.auth("student/register")).json(&registration);
            self.request(Operation::RegisterStudent, builder).await
        }.boxed()
    }

    fn register_teacher(&self, registration: TeacherRegistration) -> BoxFuture<'_, ApiResult<Ack>> {
        async move {
            let builder = self.http.post(&self.auth("teacher/register")).json(&registration);
            self.request(Operation::RegisterTeacher, builder).await
        }.boxed()
    }

    fn reference_data(&self) -> BoxFuture<'_, ApiResult<ReferenceData>> {
        async move {
            self.read(Operation::ReferenceData, self.http.get(&self.api("init"))).await
        }.boxed()
    }

    fn class_stats(&self, filter: FilterSelection) -> BoxFuture<'_, ApiResult<ClassStats>> {
        async move {
            let builder = self.http.post(&self.api("class-stats")).json(&filter);
            self.read(Operation::ClassStats, builder).await
        }.boxed()
    }

    fn add_subjects(&self, subjects: Vec<String>) -> BoxFuture<'_, ApiResult<Ack>> {
        async move {
            let builder = self.http.post(&self.api("subjects")).json(&json!({
                "subjects": subjects
            }));
            self.request(Operation::AddSubjects, builder).await
        }.boxed()
    }

    fn add_departments(&self, departments: Vec<String>) -> BoxFuture<'_, ApiResult<Ack>> {
        async move {
            let builder = self.http.post(&self.api("departments")).json(&json!({
                "departments": departments
            }));
            self.request(Operation::AddDepartments, builder).await
        }.boxed()
    }

    fn upload_marks(&self, upload: MarksUpload) -> BoxFuture<'_, ApiResult<Ack>> {
        async move {
            debug!("Uploading {:?}", upload.file);

            let file = Part::bytes(upload.file.bytes)
                .file_name(upload.file.file_name);

            let form = Form::new()
                .part("file", file)
                .text("subject", upload.subject)
                .text("division", upload.division)
                .text("department", upload.department)
                .text("year", upload.year)
                .text("paper", upload.paper);

            let builder = self.http.post(&self.api("upload-marks")).multipart(form);
            self.request(Operation::UploadMarks, builder).await
        }.boxed()
    }

    fn queries(&self) -> BoxFuture<'_, ApiResult<Vec<QueryRecord>>> {
        async move {
            self.read::<QueryList>(Operation::Queries, self.http.get(&self.api("queries"))).await
                .map(QueryList::into_records)
        }.boxed()
    }

    fn respond_to_query(&self, response: QueryResponse) -> BoxFuture<'_, ApiResult<Ack>> {
        async move {
            let builder = self.http.post(&self.api("queries/respond")).json(&response);
            self.request(Operation::RespondToQuery, builder).await
        }.boxed()
    }

    fn set_fa_mode(&self, request: FaModeRequest) -> BoxFuture<'_, ApiResult<Ack>> {
        async move {
            let builder = self.http.post(&self.api("fa-mode")).json(&request);
            self.request(Operation::SetFaMode, builder).await
        }.boxed()
    }

    fn fa_mode_status(&self, filter: FilterSelection) -> BoxFuture<'_, ApiResult<FaModeStatus>> {
        async move {
            let url = format!("{}?{}", self.api("fa-mode"), query_string(&filter.pairs()));
            self.read(Operation::FaModeStatus, self.http.get(&url)).await
        }.boxed()
    }

    fn debug_data(&self) -> BoxFuture<'_, ApiResult<Value>> {
        async move {
            self.request(Operation::DebugData, self.http.get(&self.api("debug/data"))).await
        }.boxed()
    }
}
