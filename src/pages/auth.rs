use std::sync::Arc;

use log::{error, info};

use crate::api::types::{LoginRequest, StudentRegistration, TeacherRegistration};
use crate::controller::{FormStatus, MutationController};
use crate::error::Operation;
use crate::route::Route;
use crate::session::{Role, Session, SessionStore};
use crate::sync::{Shared, Shareable, StateLock};
use crate::validation::{self, ValidationError};
use super::PageContext;

#[derive(Default, Clone)]
struct Credentials {
    email: String,
    password: String
}

pub struct LoginView {
    pub role: Role,
    pub email: String,
    pub status: FormStatus
}

pub struct LoginPage {
    context: PageContext,
    store: Arc<dyn SessionStore>,
    role: Role,
    credentials: Shared<Credentials>,
    form: MutationController
}

impl LoginPage {
    pub fn new(context: PageContext, store: Arc<dyn SessionStore>, role: Role) -> LoginPage {
        LoginPage {
            context,
            store,
            role,
            credentials: Credentials::new_shared(Credentials::default()),
            form: MutationController::new("login", None)
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn set_email(&self, email: &str) {
        self.credentials.state().email = email.to_string();
    }

    pub fn set_password(&self, password: &str) {
        self.credentials.state().password = password.to_string();
    }

    /// Where "create an account" leads for this role.
    pub fn signup_route(&self) -> Route {
        match self.role {
            Role::Teacher => Route::SignupTeacher,
            _ => Route::SignupStudent
        }
    }

    /// Signs in and stores the session, giving the route to go to next.
    pub async fn login(&self) -> Option<Route> {
        if self.form.is_submitting() {
            return None;
        }

        let request = match self.request() {
            Ok(r) => r,
            Err(e) => {
                self.form.reject(e);
                return None;
            }
        };

        let fallback = Operation::Login.failure_message();
        let response = self.form.submit(self.context.api.login(request), fallback).await?;

        let session = match response.user.map(Session::from_user) {
            Some(Ok(s)) => s,
            Some(Err(e)) => {
                error!("Login answer carries an unusable user : {}", e);
                self.form.reject(fallback);
                return None;
            },
            None => {
                error!("Login answer carries no user");
                self.form.reject(fallback);
                return None;
            }
        };

        if let Err(e) = self.store.save(&session) {
            error!("Couldn't store the session : {}", e.to_string());
            self.form.reject(fallback);
            return None;
        }

        info!("Signed in as {}", session);
        Some(Route::Dashboard)
    }

    fn request(&self) -> Result<LoginRequest, ValidationError> {
        let credentials = self.credentials.state().clone();

        validation::require_input(&credentials.email, "email")?;
        validation::require_input(&credentials.password, "password")?;

        Ok(LoginRequest {
            email: credentials.email.trim().to_string(),
            password: credentials.password,
            role: self.role
        })
    }

    pub fn view(&self) -> LoginView {
        LoginView {
            role: self.role,
            email: self.credentials.state().email.clone(),
            status: self.form.status()
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum SignupField {
    Name,
    Prn,
    Department,
    Division,
    Email,
    Password
}

impl SignupField {
    fn label(&self) -> &'static str {
        match self {
            SignupField::Name => "name",
            SignupField::Prn => "PRN",
            SignupField::Department => "department",
            SignupField::Division => "division",
            SignupField::Email => "email",
            SignupField::Password => "password"
        }
    }
}

#[derive(Default, Clone)]
struct SignupForm {
    name: String,
    prn: String,
    department: String,
    division: String,
    email: String,
    password: String
}

impl SignupForm {
    fn slot(&mut self, field: SignupField) -> &mut String {
        match field {
            SignupField::Name => &mut self.name,
            SignupField::Prn => &mut self.prn,
            SignupField::Department => &mut self.department,
            SignupField::Division => &mut self.division,
            SignupField::Email => &mut self.email,
            SignupField::Password => &mut self.password
        }
    }
}

/// Account creation, students and teachers don't give the same details.
pub struct SignupPage {
    context: PageContext,
    role: Role,
    form_data: Shared<SignupForm>,
    form: MutationController
}

impl SignupPage {
    pub fn new(context: PageContext, role: Role) -> SignupPage {
        SignupPage {
            context,
            role,
            form_data: SignupForm::new_shared(SignupForm::default()),
            form: MutationController::new("registration", None)
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn fields(&self) -> &'static [SignupField] {
        use SignupField::*;

        match self.role {
            Role::Student => &[Name, Prn, Department, Division, Email, Password],
            _ => &[Name, Email, Department, Password]
        }
    }

    pub fn set(&self, field: SignupField, value: &str) {
        *self.form_data.state().slot(field) = value.to_string();
    }

    pub fn status(&self) -> FormStatus {
        self.form.status()
    }

    /// Registers the account, giving the login route for the same role on success.
    pub async fn register(&self) -> Option<Route> {
        if self.form.is_submitting() {
            return None;
        }

        let mut data = self.form_data.state().clone();
        if let Err(e) = self.validate(&mut data) {
            self.form.reject(e);
            return None;
        }

        let api = &self.context.api;
        let registered = match self.role {
            Role::Student => self.form.submit(api.register_student(StudentRegistration {
                name: data.name,
                prn: data.prn,
                department: data.department,
                division: data.division,
                email: data.email,
                password: data.password
            }), Operation::RegisterStudent.failure_message()).await.is_some(),
            _ => self.form.submit(api.register_teacher(TeacherRegistration {
                name: data.name,
                email: data.email,
                department: data.department,
                password: data.password
            }), Operation::RegisterTeacher.failure_message()).await.is_some()
        };

        if !registered {
            return None;
        }

        info!("Registered a new {} account", self.role.to_string().to_lowercase());
        Some(Route::Login { role: self.role })
    }

    fn validate(&self, data: &mut SignupForm) -> Result<(), ValidationError> {
        for field in self.fields() {
            let value = data.slot(*field);
            if *field != SignupField::Password {
                *value = value.trim().to_string();
            }

            validation::require_input(value, field.label())?;
        }

        validation::check_email(&data.email)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::mock::MockApi;
    use crate::api::types::Ack;
    use crate::pages::testing::context;
    use crate::session::MemorySessionStore;

    fn login_page(api: &Arc<MockApi>, store: &Arc<MemorySessionStore>, role: Role) -> LoginPage {
        let page = LoginPage::new(context(api), store.clone(), role);
        page.set_email("meera@college.edu");
        page.set_password("secret");
        page
    }

    #[actix_rt::test]
    async fn login_stores_the_session_without_password() {
        let api = Arc::new(MockApi::new().with_login_user(json!({
            "name": "Meera",
            "role": "Teacher",
            "email": "meera@college.edu",
            "password": "secret"
        })));
        let store = Arc::new(MemorySessionStore::new());
        let page = login_page(&api, &store, Role::Teacher);

        assert_eq!(page.login().await, Some(Route::Dashboard));
        assert_eq!(api.calls(Operation::Login), vec![json!({
            "email": "meera@college.edu",
            "password": "secret",
            "role": "Teacher"
        })]);

        let session = store.load().unwrap().unwrap();
        assert_eq!(session.name, "Meera");
        assert!(session.profile.get("password").is_none());
    }

    #[actix_rt::test]
    async fn refused_login_shows_the_server_message() {
        let api = Arc::new(MockApi::new().with_ack(Ack {
            success: false,
            message: Some("Invalid credentials".to_string())
        }));
        let store = Arc::new(MemorySessionStore::new());
        let page = login_page(&api, &store, Role::Student);

        assert_eq!(page.login().await, None);
        assert_eq!(page.view().status, FormStatus::Failed("Invalid credentials".to_string()));
        assert_eq!(store.load().unwrap(), None);
    }

    #[actix_rt::test]
    async fn unreachable_auth_service_uses_the_generic_message() {
        let api = Arc::new(MockApi::new().rejecting(502, None));
        let store = Arc::new(MemorySessionStore::new());
        let page = login_page(&api, &store, Role::Student);

        page.login().await;
        assert_eq!(page.view().status, FormStatus::Failed("Login failed. Please try again.".to_string()));
    }

    #[test]
    fn signup_link_follows_the_role() {
        let api = Arc::new(MockApi::new());
        let store = Arc::new(MemorySessionStore::new());

        assert_eq!(login_page(&api, &store, Role::Teacher).signup_route(), Route::SignupTeacher);
        assert_eq!(login_page(&api, &store, Role::Student).signup_route(), Route::SignupStudent);
    }

    #[actix_rt::test]
    async fn student_signup_goes_to_student_login() {
        let api = Arc::new(MockApi::new());
        let page = SignupPage::new(context(&api), Role::Student);

        page.set(SignupField::Name, " Asha Patil ");
        page.set(SignupField::Prn, "PRN001");
        page.set(SignupField::Department, "IT");
        page.set(SignupField::Division, "A");
        page.set(SignupField::Email, "asha@college.edu");
        page.set(SignupField::Password, "pass");

        assert_eq!(page.register().await, Some(Route::Login { role: Role::Student }));
        assert_eq!(api.calls(Operation::RegisterStudent)[0]["name"], json!("Asha Patil"));
    }

    #[actix_rt::test]
    async fn teacher_signup_checks_the_email_locally() {
        let api = Arc::new(MockApi::new());
        let page = SignupPage::new(context(&api), Role::Teacher);

        page.set(SignupField::Name, "Meera");
        page.set(SignupField::Department, "IT");
        page.set(SignupField::Email, "meera.college.edu");
        page.set(SignupField::Password, "pass");

        assert_eq!(page.register().await, None);
        assert_eq!(page.status(), FormStatus::Failed("Please enter a valid email address".to_string()));
        assert_eq!(api.total_calls(), 0);

        page.set(SignupField::Email, "meera@college.edu");
        assert_eq!(page.register().await, Some(Route::Login { role: Role::Teacher }));
        assert_eq!(api.count(Operation::RegisterTeacher), 1);
    }

    #[actix_rt::test]
    async fn refused_signup_falls_back_to_the_generic_message() {
        let api = Arc::new(MockApi::new().with_ack(Ack { success: false, message: None }));
        let page = SignupPage::new(context(&api), Role::Teacher);

        page.set(SignupField::Name, "Meera");
        page.set(SignupField::Department, "IT");
        page.set(SignupField::Email, "meera@college.edu");
        page.set(SignupField::Password, "pass");

        page.register().await;
        assert_eq!(page.status(), FormStatus::Failed("Registration failed. Please try again.".to_string()));
    }
}
