use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::AppError;
use crate::response::ResponseEnvelope;
use crate::transport::{self, Message, MessagePattern};
use crate::AppState;

fn respond(envelope: ResponseEnvelope) -> HttpResponse {
    let status = StatusCode::from_u16(envelope.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(envelope)
}

pub async fn store(
    payload: web::Json<Value>,
    state: web::Data<AppState>,
) -> HttpResponse {
    info!("Received {} request", MessagePattern::Store);
    let envelope = transport::dispatch(&state.auth_service, MessagePattern::Store, &payload).await;
    respond(envelope)
}

pub async fn login(
    payload: web::Json<Value>,
    state: web::Data<AppState>,
) -> HttpResponse {
    info!("Received {} request", MessagePattern::Login);
    let envelope = transport::dispatch(&state.auth_service, MessagePattern::Login, &payload).await;
    respond(envelope)
}

/// Generic `{ "pattern": ..., "data": ... }` entry point.
pub async fn message(
    message: web::Json<Message>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received message for pattern {}", message.pattern);
    match transport::dispatch_message(&state.auth_service, &message).await {
        Ok(envelope) => Ok(respond(envelope)),
        Err(e) => {
            warn!("Rejected message: {}", e);
            Err(e)
        }
    }
}

/// Malformed JSON bodies still get an envelope-shaped 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        warn!("Malformed request body: {}", err);
        AppError::MalformedMessage(err.to_string()).into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/auth/store", web::post().to(store))
        .route("/auth/login", web::post().to(login))
        .route("/messages", web::post().to(message));
}
