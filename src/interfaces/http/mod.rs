mod state;

pub use state::HttpState;

use crate::application::UploadSlot;
use crate::domain::app_config::ServerConfig;
use crate::domain::error::AppError;
use crate::infrastructure::spreadsheet::{write_records, EXPORT_FILE_NAME};
use actix_cors::Cors;
use actix_web::{
    delete, dev::Server, get, http::StatusCode, post, web, App, HttpResponse, HttpServer, Responder,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Mutex, PoisonError};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

#[derive(Deserialize)]
pub struct UploadQuery {
    pub file_name: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StartWorkflowRequest {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendResponse {
    pub success: bool,
    pub updated_rows: usize,
}

#[post("/uploads")]
async fn upload(
    data: web::Data<HttpState>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> impl Responder {
    let slot = match UploadSlot::claim(&data.session) {
        Ok(slot) => slot,
        Err(e) => {
            add_log(&data.logs, "WARN", "Upload", &e.to_string());
            return error_response(&e);
        }
    };

    let file_name = query.into_inner().file_name;
    add_log(
        &data.logs,
        "INFO",
        "Upload",
        &format!("Processing {} ({} bytes)", file_name, body.len()),
    );

    let processor = data.processor;
    let name = file_name.clone();
    let result = web::block(move || processor.process_file(&name, &body))
        .await
        .unwrap_or_else(|e| Err(AppError::Internal(format!("Upload worker failed: {}", e))));

    match result {
        Ok(result) => {
            if !slot.complete(result.clone()) {
                let e = AppError::Conflict(format!(
                    "{} was discarded because the upload state was cleared",
                    file_name
                ));
                add_log(&data.logs, "WARN", "Upload", &e.to_string());
                return error_response(&e);
            }
            add_log(
                &data.logs,
                "INFO",
                "Upload",
                &format!(
                    "{}: {} rows, {} valid, {} unique, {} duplicates removed",
                    file_name,
                    result.summary.total_rows,
                    result.summary.valid_rows,
                    result.summary.unique_rows,
                    result.summary.duplicates_removed
                ),
            );
            HttpResponse::Ok().json(result)
        }
        Err(e) => {
            slot.fail();
            add_log(&data.logs, "ERROR", "Upload", &format!("{}: {}", file_name, e));
            error_response(&e)
        }
    }
}

#[get("/uploads/current")]
async fn current_upload(data: web::Data<HttpState>) -> impl Responder {
    match data.session().current() {
        Some(result) => HttpResponse::Ok().json(result),
        None => error_response(&no_upload()),
    }
}

#[get("/uploads/current/download")]
async fn download(data: web::Data<HttpState>) -> impl Responder {
    let records = match data.session().current() {
        Some(result) => result.records.clone(),
        None => return error_response(&no_upload()),
    };

    match write_records(&records) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type(XLSX_CONTENT_TYPE)
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ))
            .body(bytes),
        Err(e) => error_response(&e),
    }
}

#[delete("/uploads/current")]
async fn reset_upload(data: web::Data<HttpState>) -> impl Responder {
    data.session().reset();
    add_log(&data.logs, "INFO", "Upload", "Upload state cleared");
    HttpResponse::NoContent().finish()
}

#[post("/sheets/append")]
async fn append_to_sheets(data: web::Data<HttpState>) -> impl Responder {
    let records = match data.session().current() {
        Some(result) => result.records.clone(),
        None => return error_response(&no_upload()),
    };

    match data.sheets_export.execute(&records).await {
        Ok(updated_rows) => {
            add_log(
                &data.logs,
                "INFO",
                "Sheets",
                &format!("Uploaded to Google Sheets, {} rows updated", updated_rows),
            );
            HttpResponse::Ok().json(AppendResponse {
                success: true,
                updated_rows,
            })
        }
        Err(e) => {
            add_log(&data.logs, "ERROR", "Sheets", &e.to_string());
            error_response(&e)
        }
    }
}

#[post("/workflow/start")]
async fn start_workflow(
    data: web::Data<HttpState>,
    req: Option<web::Json<StartWorkflowRequest>>,
) -> impl Responder {
    let request = req.map(web::Json::into_inner).unwrap_or_default();

    match data.start_workflow.execute(request.user_id.as_deref()).await {
        Ok(response) => {
            add_log(&data.logs, "INFO", "Workflow", "Call workflow started");
            HttpResponse::Ok().json(json!({ "started": true, "response": response }))
        }
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Workflow",
                &format!("Failed to start workflow: {}", e),
            );
            error_response(&e)
        }
    }
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = data
        .logs
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    HttpResponse::Ok().json(logs)
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

fn no_upload() -> AppError {
    AppError::NotFound("No processed upload; upload a spreadsheet first".to_string())
}

fn status_for(error: &AppError) -> StatusCode {
    match error {
        AppError::EmptyInput | AppError::UnrecognizedSchedule => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::FileRead(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
        AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::RemoteService(_) => StatusCode::BAD_GATEWAY,
        AppError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Security(_) | AppError::Internal(_) | AppError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(error: &AppError) -> HttpResponse {
    HttpResponse::build(status_for(error)).json(json!({ "error": error.to_string() }))
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap_or_else(PoisonError::into_inner);
    logs.push(entry);
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
}

/// All API routes under `/api`
pub fn api_scope(max_upload_bytes: usize) -> actix_web::Scope {
    web::scope("/api")
        .app_data(web::PayloadConfig::new(max_upload_bytes))
        .service(upload)
        .service(current_upload)
        .service(download)
        .service(reset_upload)
        .service(append_to_sheets)
        .service(start_workflow)
        .service(get_logs)
        .service(health)
}

pub fn start_server(state: web::Data<HttpState>, config: &ServerConfig) -> std::io::Result<Server> {
    let max_upload_bytes = config.max_upload_bytes;

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for local tool

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .service(api_scope(max_upload_bytes))
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    Ok(server)
}
