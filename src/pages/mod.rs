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
use std::time::Duration;

use crate::api::ApiHandle;
use crate::api::types::ReferenceData;
use crate::config::DashConfig;
use crate::controller::FetchController;
use crate::filters::CascadingFilter;
use crate::sync::{Shared, StateLock};

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod fa_mode;
pub mod marks_upload;
pub mod queries;
pub mod submissions;

pub use admin::AdminPage;
pub use auth::{LoginPage, SignupPage};
pub use dashboard::DashboardPage;
pub use fa_mode::FaModePage;
pub use marks_upload::MarksUploadPage;
pub use queries::QueriesPage;
pub use submissions::SubmissionsPage;

/// What every page gets from the application root.
#[derive(Clone)]
pub struct PageContext {
    pub api: ApiHandle,
    pub config: Arc<DashConfig>
}

impl PageContext {
    pub fn new(api: ApiHandle, config: DashConfig) -> PageContext {
        PageContext {
            api,
            config: Arc::new(config)
        }
    }

    pub(crate) fn filter(&self) -> CascadingFilter {
        CascadingFilter::new(self.config.reset_stale_options)
    }

    /// Delay after which the banner of an additive form disappears
    pub(crate) fn success_revert(&self) -> Option<Duration> {
        Some(self.config.success_revert())
    }
}

pub(crate) async fn load_reference(
    context: &PageContext,
    reference: &FetchController<ReferenceData>,
    filter: &Shared<CascadingFilter>
) {
    if reference.run(context.api.reference_data()).await {
        if let Some(data) = reference.data() {
            filter.state().set_reference(data);
        }
    }
}
