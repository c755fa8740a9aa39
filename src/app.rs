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

use log::{debug, info};

use crate::api::{ApiHandle, HttpApi};
use crate::config::DashConfig;
use crate::pages::*;
use crate::route::Route;
use crate::session::{FileSessionStore, Role, Session, SessionStore};
use crate::session::guard::{self, GuardState, SessionGuard};

/// A page ready to be shown, protected ones already hold their session.
pub enum Page {
    Entry,
    Login(LoginPage),
    Signup(SignupPage),
    Dashboard(DashboardPage),
    Submissions(SubmissionsPage),
    FaMode(FaModePage),
    Queries(QueriesPage),
    MarksUpload(MarksUploadPage),
    Admin(AdminPage)
}

impl Page {
    /// Runs the first loads of the page, if it has any.
    pub async fn mount(&self) {
        match self {
            Page::Dashboard(p) => p.mount().await,
            Page::Submissions(p) => p.mount().await,
            Page::FaMode(p) => p.mount().await,
            Page::Queries(p) => p.mount().await,
            Page::MarksUpload(p) => p.mount().await,
            Page::Entry | Page::Login(_) | Page::Signup(_) | Page::Admin(_) => {}
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            Page::Dashboard(p) => Some(p.session()),
            Page::Submissions(p) => Some(p.session()),
            Page::FaMode(p) => Some(p.session()),
            Page::Queries(p) => Some(p.session()),
            Page::MarksUpload(p) => Some(p.session()),
            Page::Admin(p) => Some(p.session()),
            Page::Entry | Page::Login(_) | Page::Signup(_) => None
        }
    }
}

pub enum Activation {
    Redirect(Route),
    Render(Page)
}

pub struct App {
    context: PageContext,
    store: Arc<dyn SessionStore>
}

impl App {
    pub fn new(config: DashConfig, api: ApiHandle, store: Arc<dyn SessionStore>) -> App {
        App {
            context: PageContext::new(api, config),
            store
        }
    }

    /// Real backend and a session file, as configured.
    pub fn from_config(config: &DashConfig) -> Result<App, reqwest::Error> {
        let api = HttpApi::new(config)?;
        let store = FileSessionStore::new(&config.session_path);

        Ok(App::new(config.clone(), Arc::new(api), Arc::new(store)))
    }

    pub fn config(&self) -> &DashConfig {
        &self.context.config
    }

    pub fn api(&self) -> &ApiHandle {
        &self.context.api
    }

    pub fn activate(&self, route: Route) -> Activation {
        debug!("Activating '{}'", route);

        let context = self.context.clone();
        match route {
            Route::Entry => return Activation::Render(Page::Entry),
            Route::Login { role } => return Activation::Render(Page::Login(LoginPage::new(context, self.store.clone(), role))),
            Route::SignupStudent => return Activation::Render(Page::Signup(SignupPage::new(context, Role::Student))),
            Route::SignupTeacher => return Activation::Render(Page::Signup(SignupPage::new(context, Role::Teacher))),
            _ => {}
        }

        let mut guard = SessionGuard::new();
        if let GuardState::Absent = guard.check(self.store.as_ref()) {
            info!("No session, leaving '{}' for the entry page", route);
            return Activation::Redirect(Route::Entry);
        }

        let session = match guard.into_session() {
            Some(s) => s,
            None => return Activation::Redirect(Route::Entry)
        };

        Activation::Render(match route {
            Route::Dashboard => Page::Dashboard(DashboardPage::new(context, session)),
            Route::Submissions => Page::Submissions(SubmissionsPage::new(context, session)),
            Route::FaMode => Page::FaMode(FaModePage::new(context, session)),
            Route::Queries => Page::Queries(QueriesPage::new(context, session)),
            Route::MarksUpload => Page::MarksUpload(MarksUploadPage::new(context, session)),
            _ => Page::Admin(AdminPage::new(context, session))
        })
    }

    pub fn logout(&self) -> Route {
        guard::logout(self.store.as_ref())
    }
}
