//! HTTP server for the FastForm backend.
//!
//! Provides REST endpoints for file upload and parsing. Form creation is
//! handled by the frontend via the Google Forms API.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                          |
//! |--------|-------------------|--------------------------------------|
//! | GET    | `/health`         | Health check                         |
//! | POST   | `/api/parse`      | Upload a CSV/XLSX file for parsing   |
//! | GET    | `/api/logs`       | SSE stream for real-time logs        |

use axum::{
    extract::Multipart,
    http::{header, Method, StatusCode},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, log_info, LOG_BROADCASTER};
use super::types::{error_response, ParseResponse};
use crate::parser::{media_type_for_extension, parse_file, UploadedFile};

/// Start the HTTP server.
pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    // Permissive CORS for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    let app = Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/parse", post(parse_upload))
        .route("/api/logs", get(sse_logs))
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 FastForm server running on http://localhost:{}", port);
    println!("   POST /api/parse - Upload a spreadsheet");
    println!("   GET  /api/logs  - SSE log stream");
    println!("   GET  /health    - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "fastform",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "parse": "POST /api/parse",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming.
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Upload endpoint: multipart file in, parsed questions out.
async fn parse_upload(
    mut multipart: Multipart,
) -> Result<Json<ParseResponse>, (StatusCode, Json<Value>)> {
    let mut upload: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(error_response(&format!("Multipart error: {}", e))),
        )
    })? {
        if field.name().unwrap_or("") != "file" {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        // Browsers do not always set a content type on the part; fall
        // back to the file extension.
        let media_type = field
            .content_type()
            .map(str::to_string)
            .or_else(|| {
                file_name
                    .as_deref()
                    .and_then(|name| name.rsplit('.').next())
                    .and_then(media_type_for_extension)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let bytes = field
            .bytes()
            .await
            .map_err(|e| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(error_response(&format!("Read error: {}", e))),
                )
            })?
            .to_vec();

        upload = Some(UploadedFile::new(file_name, media_type, bytes));
    }

    let file = upload.ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(error_response("No file provided")),
        )
    })?;

    log_info(format!(
        "New upload: {} ({}, {} bytes)",
        file.name.as_deref().unwrap_or("unnamed"),
        file.media_type,
        file.size
    ));

    let file_name = file.name.clone();
    let outcome = parse_file(&file).map_err(|e| {
        log_error(e.to_string());
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(error_response(&e.to_string())),
        )
    })?;

    Ok(Json(ParseResponse::from_outcome(outcome, file_name)))
}
