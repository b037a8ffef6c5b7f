use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use common::{models::SensorReading, Error as CommonError};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{debug, error, info, warn, Level};

use crate::service::IngestService;

pub type SharedService = Arc<IngestService>;

// Wrapper so common::Error can be turned into a response
pub struct ApiError(CommonError);

impl From<CommonError> for ApiError {
    fn from(err: CommonError) -> Self {
        ApiError(err)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    erro: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    sucesso: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            warn!("Rejected payload: {}", self.0);
            StatusCode::BAD_REQUEST
        } else {
            error!("Failed to process request: {}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (
            status,
            Json(ErrorResponse {
                erro: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/dados", post(receive_reading))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(service)
}

// Accept one reading from the monitoring device and store it
pub async fn receive_reading(
    State(service): State<SharedService>,
    body: Bytes,
) -> Result<(StatusCode, Json<SuccessResponse>), ApiError> {
    debug!("Payload received: {}", String::from_utf8_lossy(&body));

    let reading = SensorReading::from_payload(&body)?;
    info!("Reading received from device: {:?}", reading);

    service.record(&reading).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse {
            sucesso: "Dados registrados",
        }),
    ))
}
