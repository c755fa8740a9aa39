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
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::error::ApiResult;
use crate::filters::FilterSelection;

pub mod types;
mod http;

#[cfg(test)]
pub mod mock;

pub use http::HttpApi;
use types::*;

pub type ApiHandle = Arc<dyn DashboardApi>;

/// One method per remote endpoint. Pages only ever talk to the backend through this.
pub trait DashboardApi: Send + Sync {
    // Auth service
    fn login(&self, request: LoginRequest) -> BoxFuture<'_, ApiResult<LoginResponse>>;
    fn register_student(&self, registration: StudentRegistration) -> BoxFuture<'_, ApiResult<Ack>>;
    fn register_teacher(&self, registration: TeacherRegistration) -> BoxFuture<'_, ApiResult<Ack>>;

    // Dashboard service
    fn reference_data(&self) -> BoxFuture<'_, ApiResult<ReferenceData>>;
    fn class_stats(&self, filter: FilterSelection) -> BoxFuture<'_, ApiResult<ClassStats>>;
    fn add_subjects(&self, subjects: Vec<String>) -> BoxFuture<'_, ApiResult<Ack>>;
    fn add_departments(&self, departments: Vec<String>) -> BoxFuture<'_, ApiResult<Ack>>;
    fn upload_marks(&self, upload: MarksUpload) -> BoxFuture<'_, ApiResult<Ack>>;
    fn queries(&self) -> BoxFuture<'_, ApiResult<Vec<QueryRecord>>>;
    fn respond_to_query(&self, response: QueryResponse) -> BoxFuture<'_, ApiResult<Ack>>;
    fn set_fa_mode(&self, request: FaModeRequest) -> BoxFuture<'_, ApiResult<Ack>>;
    fn fa_mode_status(&self, filter: FilterSelection) -> BoxFuture<'_, ApiResult<FaModeStatus>>;
    fn debug_data(&self) -> BoxFuture<'_, ApiResult<Value>>;
}
