use std::fmt;

use crate::session::Role;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Route {
    Entry,
    Login { role: Role },
    SignupStudent,
    SignupTeacher,
    Dashboard,
    Submissions,
    FaMode,
    Queries,
    MarksUpload,
    Admin
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Entry => "/".to_string(),
            Route::Login { role } => format!("/login?role={}", role),
            Route::SignupStudent => "/signup/student".to_string(),
            Route::SignupTeacher => "/signup/teacher".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Submissions => "/submission-status".to_string(),
            Route::FaMode => "/fa-mode".to_string(),
            Route::Queries => "/queries".to_string(),
            Route::MarksUpload => "/marks-upload".to_string(),
            Route::Admin => "/admin".to_string()
        }
    }

    /// Unknown paths and unknown roles fall back to the entry page and to Student.
    pub fn parse(path: &str) -> Route {
        let (base, query) = match path.find('?') {
            Some(i) => (&path[..i], &path[i + 1..]),
            None => (path, "")
        };

        match base.trim_end_matches('/') {
            "/login" => {
                let role = query.split('&')
                    .filter_map(|pair| pair.strip_prefix("role="))
                    .next()
                    .and_then(|r| r.parse::<Role>().ok())
                    .unwrap_or_default();

                Route::Login { role }
            },
            "/signup/student" => Route::SignupStudent,
            "/signup/teacher" => Route::SignupTeacher,
            "/dashboard" => Route::Dashboard,
            "/submission-status" => Route::Submissions,
            "/fa-mode" => Route::FaMode,
            "/queries" => Route::Queries,
            "/marks-upload" => Route::MarksUpload,
            "/admin" => Route::Admin,
            _ => Route::Entry
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Entry | Route::Login { .. } | Route::SignupStudent | Route::SignupTeacher)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}
