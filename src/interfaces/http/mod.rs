use crate::application::TestCaseGenUseCase;
use crate::domain::artifact::{ExportArtifact, CSV_MEDIA_TYPE};
use crate::domain::error::AppError;
use crate::infrastructure::artifact_store::ArtifactStore;
use actix_cors::Cors;
use actix_web::http::header::ContentDisposition;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Arc, Mutex};

const MAX_LOG_ENTRIES: usize = 100;
const DIGEST_HEADER: &str = "X-Artifact-Sha256";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub use_case: Arc<TestCaseGenUseCase>,
    pub artifact_store: Arc<ArtifactStore>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateTestCasesRequest {
    pub requirements: Vec<String>,
}

#[post("/generate-test-cases")]
async fn generate_test_cases(
    data: web::Data<HttpState>,
    req: web::Json<GenerateTestCasesRequest>,
) -> impl Responder {
    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!(
            "Generating test cases for {} requirement(s)",
            req.requirements.len()
        ),
    );

    match data.use_case.execute(&req.requirements).await {
        Ok(artifact) => {
            add_log(
                &data.logs,
                "INFO",
                "HttpApi",
                &format!(
                    "Test cases saved to {} ({} rows)",
                    artifact.path.display(),
                    artifact.rows
                ),
            );
            csv_response(artifact)
        }
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "HttpApi",
                &format!("Test case generation failed: {}", e),
            );
            error_response(&e)
        }
    }
}

#[get("/test-cases/latest")]
async fn latest_test_cases(data: web::Data<HttpState>) -> impl Responder {
    match data.artifact_store.latest().await {
        Ok(artifact) => csv_response(artifact),
        Err(e) => {
            add_log(
                &data.logs,
                "WARN",
                "HttpApi",
                &format!("Latest export unavailable: {}", e),
            );
            error_response(&e)
        }
    }
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = data.logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    HttpResponse::Ok().json(&*logs)
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

fn csv_response(artifact: ExportArtifact) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(CSV_MEDIA_TYPE)
        .insert_header(ContentDisposition::attachment(artifact.file_name))
        .insert_header((DIGEST_HEADER, artifact.sha256))
        .body(artifact.bytes)
}

fn error_response(err: &AppError) -> HttpResponse {
    match err {
        AppError::NotFound(_) => HttpResponse::NotFound().body(err.to_string()),
        _ => HttpResponse::InternalServerError().body(err.to_string()),
    }
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    logs.push(entry.clone());
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

/// Generation is reachable both under `/api` and at the root path that
/// existing clients already post to.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(generate_test_cases)
            .service(latest_test_cases)
            .service(get_logs)
            .service(health),
    )
    .service(generate_test_cases);
}

pub fn start_server(state: HttpState, host: &str, port: u16) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for local tool

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((host, port))?
    .run();

    Ok(server)
}
