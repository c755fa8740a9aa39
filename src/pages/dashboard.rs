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
use log::debug;

use crate::api::types::{ClassStats, ReferenceData};
use crate::controller::FetchController;
use crate::filters::{CascadingFilter, Field, FieldView};
use crate::session::Session;
use crate::sync::{Shared, Shareable, StateLock};
use super::{PageContext, load_reference};

pub const REQUIRED: [Field; 4] = [Field::Subject, Field::Division, Field::Department, Field::Year];

pub const LOADING_HINT: &str = "Loading initial data...";
pub const SELECT_HINT: &str = "Please select subject, division, department and year to view class stats.";

pub struct DashboardView {
    pub session: Session,
    pub fields: Vec<FieldView>,
    pub loading: bool,
    pub hint: Option<&'static str>,
    pub stats: Option<ClassStats>
}

/// Landing page after login: overall stats of the selected class.
pub struct DashboardPage {
    context: PageContext,
    session: Session,
    filter: Shared<CascadingFilter>,
    reference: FetchController<ReferenceData>,
    stats: FetchController<ClassStats>
}

impl DashboardPage {
    pub fn new(context: PageContext, session: Session) -> DashboardPage {
        DashboardPage {
            filter: CascadingFilter::new_shared(context.filter()),
            context,
            session,
            reference: FetchController::new("reference data"),
            stats: FetchController::new("class stats")
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
            let changed = filter.set(field, value);
            (changed, filter.selection().clone())
        };

        // Only the class fields scope the request
        if !changed || !REQUIRED.contains(&field) {
            return;
        }

        if !selection.is_complete(&REQUIRED) {
            self.stats.clear();
            return;
        }

        debug!("Class selected, loading its stats");
        self.stats.run(self.context.api.class_stats(selection.project(&REQUIRED))).await;
    }

    pub fn loading(&self) -> bool {
        self.reference.loading() || self.stats.loading()
    }

    pub fn view(&self) -> DashboardView {
        let loading = self.loading();
        let filter = self.filter.state();
        let complete = filter.selection().is_complete(&REQUIRED);

        let hint = if self.reference.data().is_none() {
            Some(LOADING_HINT)
        } else if !complete {
            Some(SELECT_HINT)
        } else {
            None
        };

        DashboardView {
            session: self.session.clone(),
            fields: filter.view(&REQUIRED, loading),
            loading,
            hint,
            stats: if complete && !loading { self.stats.data() } else { None }
        }
    }
}
