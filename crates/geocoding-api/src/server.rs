//! HTTP server for geocoding endpoints
//!
//! Provides /, /health, /geocode, /reverse-geocode, /geocode-file and
//! /reverse-geocode-file.

use crate::batch::{process_forward, process_reverse, BatchSummary};
use crate::error::AppError;
use crate::geocoder::Geocoder;
use crate::scratch::{discard, request_stamp, store, ScratchSpace};
use crate::table::{FileKind, Table};
use crate::types::{
    AddressRequest, AddressResponse, CoordinateRequest, CoordinateResponse, HealthResponse,
};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::header,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use maps_scraper::SearchOutcome;
use serde_json::json;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::cors::CorsLayer;
use tracing::info;

const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Shared state for the HTTP server
pub struct ServerState {
    pub geocoder: Geocoder,
    pub scratch: ScratchSpace,
    pub forward_delay: Duration,
    pub reverse_delay: Duration,
    pub started_at: Instant,
}

impl ServerState {
    pub fn new(
        geocoder: Geocoder,
        scratch: ScratchSpace,
        forward_delay: Duration,
        reverse_delay: Duration,
    ) -> Self {
        Self {
            geocoder,
            scratch,
            forward_delay,
            reverse_delay,
            started_at: Instant::now(),
        }
    }
}

pub type SharedState = Arc<ServerState>;

/// Create the HTTP router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/geocode", get(geocode_get).post(geocode_post))
        .route("/reverse-geocode", get(reverse_geocode_get).post(reverse_geocode_post))
        .route("/geocode-file", post(geocode_file))
        .route("/reverse-geocode-file", post(reverse_geocode_file))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(state: SharedState, port: u16) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}

/// Capability listing
async fn home() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Geocoding API - Get coordinates from addresses and vice versa",
        "endpoints": {
            "/geocode": {
                "methods": ["GET", "POST"],
                "description": "Get coordinates from an address",
                "examples": {
                    "GET": "/geocode?address=Medanta Hospital Gurgaon Bridge",
                    "POST": "{\"address\": \"Medanta Hospital Gurgaon Bridge\"}"
                }
            },
            "/reverse-geocode": {
                "methods": ["GET", "POST"],
                "description": "Get address from coordinates",
                "examples": {
                    "GET": "/reverse-geocode?lat=28.4391604&long=77.0388113",
                    "POST": "{\"lat\": 28.4391604, \"long\": 77.0388113}"
                }
            },
            "/geocode-file": {
                "methods": ["POST"],
                "description": "Upload CSV/Excel file and get coordinates for addresses",
                "parameters": "file (CSV/Excel), address_column (column name with addresses)"
            },
            "/reverse-geocode-file": {
                "methods": ["POST"],
                "description": "Upload CSV/Excel file and get addresses from coordinates",
                "parameters": "file (CSV/Excel), lat_column, long_column"
            },
            "/health": {
                "methods": ["GET"],
                "description": "Health check endpoint"
            }
        }
    }))
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime_secs = state.started_at.elapsed().as_secs();

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
    })
}

async fn geocode_get(
    State(state): State<SharedState>,
    Query(req): Query<AddressRequest>,
) -> Result<Json<CoordinateResponse>, AppError> {
    geocode_address(&state, req.address).await
}

async fn geocode_post(
    State(state): State<SharedState>,
    Json(req): Json<AddressRequest>,
) -> Result<Json<CoordinateResponse>, AppError> {
    geocode_address(&state, req.address).await
}

async fn geocode_address(
    state: &ServerState,
    address: String,
) -> Result<Json<CoordinateResponse>, AppError> {
    match state.geocoder.geocode(&address).await {
        SearchOutcome::Found { coordinate, url } => Ok(Json(CoordinateResponse {
            address,
            lat: coordinate.latitude,
            long: coordinate.longitude,
            coordinates: coordinate.to_string(),
            google_maps_url: url,
        })),
        SearchOutcome::NotFound { details } => {
            Err(AppError::ExtractionNotFound { address, details })
        }
    }
}

async fn reverse_geocode_get(
    State(state): State<SharedState>,
    Query(req): Query<CoordinateRequest>,
) -> Json<AddressResponse> {
    reverse_geocode_coordinates(&state, req).await
}

async fn reverse_geocode_post(
    State(state): State<SharedState>,
    Json(req): Json<CoordinateRequest>,
) -> Json<AddressResponse> {
    reverse_geocode_coordinates(&state, req).await
}

async fn reverse_geocode_coordinates(
    state: &ServerState,
    req: CoordinateRequest,
) -> Json<AddressResponse> {
    let result = state.geocoder.reverse_geocode(req.lat, req.long).await;
    Json(AddressResponse {
        lat: req.lat,
        long: req.long,
        address: result.address,
        formatted_address: result.formatted_address,
        google_maps_url: result.google_maps_url,
    })
}

/// Upload a table and get `latitude`/`longitude` columns added
async fn geocode_file(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = UploadForm::read(multipart).await?;
    let (kind, data) = form.file()?;
    let job = BatchJob::Forward {
        address_column: form.field("address_column")?,
    };
    run_file_job(&state, kind, data, job).await
}

/// Upload a table and get an `address` column added
async fn reverse_geocode_file(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = UploadForm::read(multipart).await?;
    let (kind, data) = form.file()?;
    let job = BatchJob::Reverse {
        lat_column: form.field("lat_column")?,
        long_column: form.field("long_column")?,
    };
    run_file_job(&state, kind, data, job).await
}

enum BatchJob {
    Forward {
        address_column: String,
    },
    Reverse {
        lat_column: String,
        long_column: String,
    },
}

impl BatchJob {
    fn output_prefix(&self) -> &'static str {
        match self {
            BatchJob::Forward { .. } => "geocoded",
            BatchJob::Reverse { .. } => "reverse_geocoded",
        }
    }
}

/// Multipart fields, fully buffered
#[derive(Default)]
struct UploadForm {
    file_name: Option<String>,
    file: Option<Bytes>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == "file" {
                form.file_name = Some(field.file_name().unwrap_or_default().to_string());
                form.file = Some(field.bytes().await?);
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// The uploaded bytes, once the extension has been accepted
    fn file(&self) -> Result<(FileKind, &Bytes), AppError> {
        let (Some(file_name), Some(data)) = (&self.file_name, &self.file) else {
            return Err(AppError::BadRequest("Missing form field 'file'".to_string()));
        };
        let kind = FileKind::from_filename(file_name).ok_or(AppError::UnsupportedFileType)?;
        Ok((kind, data))
    }

    fn field(&self, name: &str) -> Result<String, AppError> {
        self.fields
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::BadRequest(format!("Missing form field '{}'", name)))
    }
}

/// Store the upload, run the batch, and return the CSV as an attachment.
/// The stored upload is removed whatever the outcome.
async fn run_file_job(
    state: &ServerState,
    kind: FileKind,
    data: &[u8],
    job: BatchJob,
) -> Result<Response, AppError> {
    state.scratch.prepare().await?;

    let stamp = request_stamp();
    let input = state.scratch.input_path(&stamp, kind);
    store(&input, data).await?;

    let result = process_upload(state, &input, kind, &stamp, &job).await;
    discard(&input).await;

    let (filename, csv) = result?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", filename),
            ),
        ],
        csv,
    )
        .into_response())
}

async fn process_upload(
    state: &ServerState,
    input: &Path,
    kind: FileKind,
    stamp: &str,
    job: &BatchJob,
) -> Result<(String, Vec<u8>), AppError> {
    let path = input.to_path_buf();
    let mut table = tokio::task::spawn_blocking(move || Table::read_path(&path, kind))
        .await
        .map_err(|e| AppError::FileProcessing(e.to_string()))??;

    let summary: BatchSummary = match job {
        BatchJob::Forward { address_column } => {
            process_forward(&state.geocoder, &mut table, address_column, state.forward_delay)
                .await?
        }
        BatchJob::Reverse {
            lat_column,
            long_column,
        } => {
            process_reverse(
                &state.geocoder,
                &mut table,
                lat_column,
                long_column,
                state.reverse_delay,
            )
            .await?
        }
    };

    let (output_path, filename) = state.scratch.output_path(job.output_prefix(), stamp);
    let csv = table.to_csv_bytes()?;
    tokio::fs::write(&output_path, &csv).await?;

    info!(
        total = summary.total,
        processed = summary.processed,
        skipped = summary.skipped,
        output = %output_path.display(),
        "Batch complete"
    );

    Ok((filename, csv))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoder::tests::{mount_nominatim, test_geocoder, DEAD_UPSTREAM};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BOUNDARY: &str = "geocodingtestboundary";

    fn create_test_state(dir: &TempDir, maps_url: &str, nominatim_url: &str) -> SharedState {
        let scratch = ScratchSpace::new(dir.path().join("uploads"), dir.path().join("outputs"));
        Arc::new(ServerState::new(
            test_geocoder(maps_url, nominatim_url),
            scratch,
            Duration::ZERO,
            Duration::ZERO,
        ))
    }

    fn multipart_request(
        uri: &str,
        filename: &str,
        content: impl AsRef<[u8]>,
        fields: &[(&str, &str)],
    ) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; \
                     name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content.as_ref());
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    fn files_in(dir: PathBuf) -> usize {
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }

    async fn mount_search(server: &MockServer, address_path: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(address_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let dir = tempdir().unwrap();
        let router = create_router(create_test_state(&dir, DEAD_UPSTREAM, DEAD_UPSTREAM));

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert!(json["uptime_secs"].as_u64().is_some());
    }

    #[tokio::test]
    async fn test_health_reports_uptime() {
        let dir = tempdir().unwrap();
        let mut state = ServerState::new(
            test_geocoder(DEAD_UPSTREAM, DEAD_UPSTREAM),
            ScratchSpace::new(dir.path().join("uploads"), dir.path().join("outputs")),
            Duration::ZERO,
            Duration::ZERO,
        );
        state.started_at = Instant::now()
            .checked_sub(Duration::from_secs(90))
            .unwrap();
        let router = create_router(Arc::new(state));

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let uptime = body_json(response).await["uptime_secs"].as_u64().unwrap();
        assert!((90..3600).contains(&uptime), "{uptime}");
    }

    #[tokio::test]
    async fn test_home_lists_endpoints() {
        let dir = tempdir().unwrap();
        let router = create_router(create_test_state(&dir, DEAD_UPSTREAM, DEAD_UPSTREAM));

        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let endpoints = [
            "/geocode",
            "/reverse-geocode",
            "/geocode-file",
            "/reverse-geocode-file",
            "/health",
        ];
        for endpoint in endpoints {
            assert!(json["endpoints"][endpoint].is_object(), "{endpoint}");
        }
    }

    #[tokio::test]
    async fn test_geocode_get_found() {
        let maps = MockServer::start().await;
        mount_search(
            &maps,
            "/maps/search/Medanta%20Hospital",
            r#"<script>[7,"abc",1,1,null,null,28.4391604,77.0388113]</script>"#,
        )
        .await;

        let dir = tempdir().unwrap();
        let router = create_router(create_test_state(&dir, &maps.uri(), DEAD_UPSTREAM));

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/geocode?address=Medanta%20Hospital")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["address"], "Medanta Hospital");
        assert_eq!(json["lat"], 28.4391604);
        assert_eq!(json["long"], 77.0388113);
        assert_eq!(json["coordinates"], "28.4391604, 77.0388113");
        assert!(json["google_maps_url"]
            .as_str()
            .unwrap()
            .ends_with("/maps/search/Medanta%20Hospital"));
    }

    #[tokio::test]
    async fn test_geocode_whole_number_coordinates() {
        let maps = MockServer::start().await;
        mount_search(&maps, "/maps/search/Null%20Island", r#""0.0,-77.0""#).await;

        let dir = tempdir().unwrap();
        let router = create_router(create_test_state(&dir, &maps.uri(), DEAD_UPSTREAM));

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/geocode?address=Null%20Island")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["coordinates"], "0.0, -77.0");
    }

    #[tokio::test]
    async fn test_geocode_post_not_found() {
        let maps = MockServer::start().await;
        mount_search(&maps, "/maps/search/Atlantis", "<html></html>").await;

        let dir = tempdir().unwrap();
        let router = create_router(create_test_state(&dir, &maps.uri(), DEAD_UPSTREAM));

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/geocode")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"address": "Atlantis"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Could not extract coordinates");
        assert_eq!(json["address"], "Atlantis");
        assert!(json["details"]
            .as_str()
            .unwrap()
            .ends_with("/maps/search/Atlantis"));
    }

    #[tokio::test]
    async fn test_geocode_missing_address() {
        let dir = tempdir().unwrap();
        let router = create_router(create_test_state(&dir, DEAD_UPSTREAM, DEAD_UPSTREAM));

        let response = router
            .oneshot(Request::builder().uri("/geocode").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reverse_geocode_get() {
        let nominatim = MockServer::start().await;
        mount_nominatim(&nominatim).await;

        let dir = tempdir().unwrap();
        let router = create_router(create_test_state(&dir, DEAD_UPSTREAM, &nominatim.uri()));

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/reverse-geocode?lat=28.4391604&long=77.0388113")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["lat"], 28.4391604);
        assert_eq!(
            json["formatted_address"],
            "Medanta - The Medicity, CH Baktawar Singh Road, Sector 38, Gurugram, 122001, Haryana, India"
        );
        assert_eq!(
            json["google_maps_url"],
            "https://www.google.com/maps/place/28.4391604,77.0388113"
        );
    }

    #[tokio::test]
    async fn test_reverse_geocode_post_never_fails() {
        let dir = tempdir().unwrap();
        let router = create_router(create_test_state(&dir, DEAD_UPSTREAM, DEAD_UPSTREAM));

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/reverse-geocode")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"lat": 28.4391604, "long": 77.0388113}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["address"], "28.4391604, 77.0388113");
        assert_eq!(json["formatted_address"], "Location at 28.4391604, 77.0388113");
    }

    #[tokio::test]
    async fn test_geocode_file_rejects_unsupported_extension() {
        let dir = tempdir().unwrap();
        let router = create_router(create_test_state(&dir, DEAD_UPSTREAM, DEAD_UPSTREAM));

        let response = router
            .oneshot(multipart_request(
                "/geocode-file",
                "addresses.txt",
                "address\nGurgaon\n",
                &[("address_column", "address")],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Only CSV and Excel files are supported");
        assert_eq!(files_in(dir.path().join("uploads")), 0);
    }

    #[tokio::test]
    async fn test_geocode_file_csv() {
        let maps = MockServer::start().await;
        mount_search(&maps, "/maps/search/Gurgaon", r#""28.45,77.02""#).await;
        mount_search(&maps, "/maps/search/Atlantis", "<html></html>").await;

        let dir = tempdir().unwrap();
        let router = create_router(create_test_state(&dir, &maps.uri(), DEAD_UPSTREAM));

        let response = router
            .oneshot(multipart_request(
                "/geocode-file",
                "addresses.CSV",
                "id,address\n1,Gurgaon\n2,\n3,Atlantis\n",
                &[("address_column", "address")],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=geocoded_"));
        assert!(disposition.ends_with(".csv"));

        let body = String::from_utf8(body_bytes(response).await).unwrap();
        assert_eq!(
            body,
            "id,address,latitude,longitude\n1,Gurgaon,28.45,77.02\n2,,,\n3,Atlantis,,\n"
        );
        assert_eq!(files_in(dir.path().join("uploads")), 0);
        assert_eq!(files_in(dir.path().join("outputs")), 1);
    }

    #[tokio::test]
    async fn test_geocode_file_xlsx() {
        let maps = MockServer::start().await;
        mount_search(&maps, "/maps/search/Gurgaon", r#""28.45,77.02""#).await;

        let dir = tempdir().unwrap();
        let router = create_router(create_test_state(&dir, &maps.uri(), DEAD_UPSTREAM));

        let response = router
            .oneshot(multipart_request(
                "/geocode-file",
                "addresses.xlsx",
                include_bytes!("../testdata/addresses.xlsx"),
                &[("address_column", "address")],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");

        let body = String::from_utf8(body_bytes(response).await).unwrap();
        assert_eq!(
            body,
            "id,Unnamed: 1,address,score,latitude,longitude\n\
             1,hq,Gurgaon,28.5,28.45,77.02\n\
             2,,,,,\n"
        );
        assert_eq!(files_in(dir.path().join("uploads")), 0);
        assert_eq!(files_in(dir.path().join("outputs")), 1);
    }

    #[tokio::test]
    async fn test_geocode_file_missing_column() {
        let dir = tempdir().unwrap();
        let router = create_router(create_test_state(&dir, DEAD_UPSTREAM, DEAD_UPSTREAM));

        let response = router
            .oneshot(multipart_request(
                "/geocode-file",
                "addresses.csv",
                "name,street\nA,Main\n",
                &[("address_column", "address")],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(
            json["error"],
            "Column 'address' not found. Available columns: name, street"
        );
        assert_eq!(files_in(dir.path().join("uploads")), 0);
    }

    #[tokio::test]
    async fn test_geocode_file_missing_form_field() {
        let dir = tempdir().unwrap();
        let router = create_router(create_test_state(&dir, DEAD_UPSTREAM, DEAD_UPSTREAM));

        let response = router
            .oneshot(multipart_request("/geocode-file", "a.csv", "address\nx\n", &[]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Missing form field 'address_column'");
    }

    #[tokio::test]
    async fn test_geocode_file_unreadable_workbook() {
        let dir = tempdir().unwrap();
        let router = create_router(create_test_state(&dir, DEAD_UPSTREAM, DEAD_UPSTREAM));

        let response = router
            .oneshot(multipart_request(
                "/geocode-file",
                "addresses.xlsx",
                "not really a workbook",
                &[("address_column", "address")],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("Error processing file:"));
        assert_eq!(files_in(dir.path().join("uploads")), 0);
    }

    #[tokio::test]
    async fn test_reverse_geocode_file_skips_invalid_rows() {
        let nominatim = MockServer::start().await;
        mount_nominatim(&nominatim).await;

        let dir = tempdir().unwrap();
        let router = create_router(create_test_state(&dir, DEAD_UPSTREAM, &nominatim.uri()));

        let response = router
            .oneshot(multipart_request(
                "/reverse-geocode-file",
                "points.csv",
                "name,y,x\nA,28.4391604,77.0388113\nB,abc,77.0\nC,28.4391604,77.0388113\n",
                &[("lat_column", "y"), ("long_column", "x")],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=reverse_geocoded_"));

        let body = String::from_utf8(body_bytes(response).await).unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines[0], "name,y,x,address");
        assert!(lines[1].starts_with("A,28.4391604,77.0388113,\"Medanta - The Medicity"));
        assert_eq!(lines[2], "B,abc,77.0,");
        assert!(lines[3].starts_with("C,"));
        assert!(lines[3].contains("Medanta"));
    }
}
