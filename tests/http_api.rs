use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::{json, Value};

use teacher_dashboard::api::{DashboardApi, HttpApi};
use teacher_dashboard::api::types::{Attachment, LoginRequest, MarksUpload};
use teacher_dashboard::config::DashConfig;
use teacher_dashboard::error::{ApiError, Operation};
use teacher_dashboard::filters::{Field, FilterSelection};
use teacher_dashboard::session::Role;

async fn init() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "data": {
            "departments": ["Computer Engineering", "IT"],
            "subjects": ["DBMS"],
            "faModes": ["Quiz"]
        }
    }))
}

// Answers with the keys it was sent, so tests can see what went on the wire
async fn class_stats(body: web::Json<Value>) -> HttpResponse {
    let keys: Vec<String> = body.as_object()
        .map(|o| o.keys().cloned().collect())
        .unwrap_or_default();

    HttpResponse::Ok().json(json!({
        "data": {
            "avgMarks": "N/A",
            "totalStudents": 60,
            "subjects": keys
        }
    }))
}

async fn queries() -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({ "message": "Database is down" }))
}

async fn fa_mode(req: HttpRequest) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "mode": req.query_string() }))
}

async fn upload(body: web::Bytes) -> HttpResponse {
    let body = String::from_utf8_lossy(&body);
    let complete = ["name=\"file\"", "filename=\"fa1.csv\"", "name=\"subject\"", "name=\"paper\"", "prn,marks"]
        .iter()
        .all(|part| body.contains(part));

    HttpResponse::Ok().json(json!({
        "success": complete,
        "message": if complete { "Marks uploaded" } else { "Incomplete form" }
    }))
}

async fn login(body: web::Json<Value>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "user": {
            "name": "Meera",
            "role": body["role"],
            "email": body["email"]
        }
    }))
}

fn dashboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/init", web::get().to(init))
        .route("/api/class-stats", web::post().to(class_stats))
        .route("/api/queries", web::get().to(queries))
        .route("/api/fa-mode", web::get().to(fa_mode))
        .route("/api/upload-marks", web::post().to(upload));
}

async fn broken_init() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "data": { "departments": "IT" } }))
}

fn broken_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/init", web::get().to(broken_init));
}

fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/login", web::post().to(login));
}

async fn serve(routes: fn(&mut web::ServiceConfig)) -> String {
    let server = HttpServer::new(move || App::new().configure(routes))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();

    let address = server.addrs()[0];
    actix_rt::spawn(server.run());

    format!("http://{}", address)
}

async fn api() -> HttpApi {
    api_with(dashboard_routes).await
}

async fn api_with(routes: fn(&mut web::ServiceConfig)) -> HttpApi {
    let config = DashConfig {
        api_url: serve(routes).await,
        auth_url: serve(auth_routes).await,
        ..DashConfig::default()
    };

    HttpApi::new(&config).unwrap()
}

#[actix_rt::test]
async fn reference_data_is_unwrapped() {
    let data = api().await.reference_data().await.unwrap();

    assert_eq!(data.departments, vec!["Computer Engineering", "IT"]);
    assert_eq!(data.fa_modes, vec!["Quiz"]);
}

#[actix_rt::test]
async fn broken_wrapped_answer_is_a_remote_error() {
    let error = api_with(broken_routes).await.reference_data().await.unwrap_err();

    match &error {
        ApiError::Remote { response, .. } => assert!(response.contains("departments")),
        other => panic!("unexpected error {}", other.to_detailed_string())
    }
    assert_eq!(error.operation(), Operation::ReferenceData);
}

#[actix_rt::test]
async fn class_stats_only_sends_set_fields() {
    let mut filter = FilterSelection::default();
    filter.set(Field::Department, "IT");
    filter.set(Field::Year, "SE");

    let stats = api().await.class_stats(filter).await.unwrap();

    let mut sent = stats.subjects.clone();
    sent.sort();
    assert_eq!(sent, vec!["department", "year"]);
    assert_eq!(stats.avg_marks.to_string(), "N/A");
    assert_eq!(stats.total_students, 60);
}

#[actix_rt::test]
async fn server_error_keeps_its_message() {
    let error = api().await.queries().await.unwrap_err();

    match &error {
        ApiError::Rejected { status, .. } => assert_eq!(*status, 500),
        other => panic!("unexpected error {}", other.to_detailed_string())
    }
    assert_eq!(error.operation(), Operation::Queries);
    assert_eq!(error.server_message(), Some("Database is down"));
    assert_eq!(error.to_string(), "Failed to fetch queries");
}

#[actix_rt::test]
async fn fa_mode_status_uses_an_encoded_query_string() {
    let mut filter = FilterSelection::default();
    filter.set(Field::Department, "Computer Engineering");
    filter.set(Field::Subject, "DBMS");

    let status = api().await.fa_mode_status(filter).await.unwrap();

    assert_eq!(status.mode.as_deref(), Some("department=Computer%20Engineering&subject=DBMS"));
}

#[actix_rt::test]
async fn marks_are_sent_as_multipart() {
    let upload = MarksUpload {
        file: Attachment::new("fa1.csv", b"prn,marks\nPRN001,18".to_vec()),
        subject: "DBMS".to_string(),
        division: "A".to_string(),
        department: "IT".to_string(),
        year: "SE".to_string(),
        paper: "FA1".to_string()
    };

    let ack = api().await.upload_marks(upload).await.unwrap();

    assert!(ack.success);
    assert_eq!(ack.message.as_deref(), Some("Marks uploaded"));
}

#[actix_rt::test]
async fn login_goes_to_the_auth_origin() {
    let response = api().await.login(LoginRequest {
        email: "meera@college.edu".to_string(),
        password: "secret".to_string(),
        role: Role::Teacher
    }).await.unwrap();

    assert!(response.success);
    assert_eq!(response.user.unwrap()["role"], json!("Teacher"));
}
