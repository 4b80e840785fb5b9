//! Error types for the geocoding service

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt;

/// Startup and configuration errors
#[derive(Debug)]
pub enum ServiceError {
    Maps(maps_scraper::MapsError),
    Nominatim(nominatim_client::NominatimError),
    Io(Box<std::io::Error>),
    Config(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Maps(err) => write!(f, "Maps client error: {}", err),
            ServiceError::Nominatim(err) => write!(f, "Nominatim client error: {}", err),
            ServiceError::Io(err) => write!(f, "IO error: {}", err),
            ServiceError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Maps(err) => Some(err),
            ServiceError::Nominatim(err) => Some(err),
            ServiceError::Io(err) => Some(err.as_ref()),
            ServiceError::Config(_) => None,
        }
    }
}

impl From<maps_scraper::MapsError> for ServiceError {
    fn from(err: maps_scraper::MapsError) -> Self {
        ServiceError::Maps(err)
    }
}

impl From<nominatim_client::NominatimError> for ServiceError {
    fn from(err: nominatim_client::NominatimError) -> Self {
        ServiceError::Nominatim(err)
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::Io(Box::new(err))
    }
}

impl From<tracing_subscriber::filter::ParseError> for ServiceError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        ServiceError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Failures reading or writing a tabular file
#[derive(Debug)]
pub enum TableError {
    Csv(csv::Error),
    Excel(calamine::Error),
    Io(std::io::Error),
    EmptyWorkbook,
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::Csv(err) => write!(f, "CSV error: {}", err),
            TableError::Excel(err) => write!(f, "Excel error: {}", err),
            TableError::Io(err) => write!(f, "IO error: {}", err),
            TableError::EmptyWorkbook => write!(f, "Workbook has no worksheets"),
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TableError::Csv(err) => Some(err),
            TableError::Excel(err) => Some(err),
            TableError::Io(err) => Some(err),
            TableError::EmptyWorkbook => None,
        }
    }
}

impl From<csv::Error> for TableError {
    fn from(err: csv::Error) -> Self {
        TableError::Csv(err)
    }
}

impl From<calamine::Error> for TableError {
    fn from(err: calamine::Error) -> Self {
        TableError::Excel(err)
    }
}

impl From<std::io::Error> for TableError {
    fn from(err: std::io::Error) -> Self {
        TableError::Io(err)
    }
}

/// Request error type that converts to HTTP responses
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    UnsupportedFileType,
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },
    ExtractionNotFound {
        address: String,
        details: String,
    },
    FileProcessing(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::UnsupportedFileType => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Only CSV and Excel files are supported" }),
            ),
            AppError::ColumnNotFound { column, available } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": format!(
                        "Column '{}' not found. Available columns: {}",
                        column,
                        available.join(", ")
                    ),
                    "available_columns": available,
                }),
            ),
            AppError::ExtractionNotFound { address, details } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "Could not extract coordinates",
                    "address": address,
                    "details": details,
                }),
            ),
            AppError::FileProcessing(msg) => {
                tracing::error!(error = %msg, "File processing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": format!("Error processing file: {}", msg) }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::BadRequest(format!("Invalid multipart body: {}", e.body_text()))
    }
}

impl From<TableError> for AppError {
    fn from(e: TableError) -> Self {
        AppError::FileProcessing(e.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::FileProcessing(e.to_string())
    }
}
