use axum::{
  error_handling::HandleErrorLayer,
  http::StatusCode,
  routing::get,
  BoxError, Json, Router,
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{
  compression::CompressionLayer,
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

use crate::{
  config::Config,
  error::AppError,
  prices::{routes::price_routes, service::PricesService},
};

pub fn create_router(config: &Config) -> Result<Router, AppError> {
  let prices_service = PricesService::new(config)?;
  Ok(build_router(prices_service, config))
}

/// Wires the routes and layers around an already constructed service.
pub fn build_router(prices_service: PricesService, config: &Config) -> Router {
  // Setup CORS
  let cors = CorsLayer::new()
      .allow_origin(Any)
      .allow_methods(Any)
      .allow_headers(Any);

  Router::new()
      .route("/health", get(health_check))
      .merge(price_routes(prices_service))
      .layer(
          ServiceBuilder::new()
              .layer(HandleErrorLayer::new(handle_timeout_error))
              .timeout(config.request_timeout),
      )
      .layer(CompressionLayer::new())
      .layer(TraceLayer::new_for_http())
      .layer(cors)
}

async fn health_check() -> (StatusCode, Json<serde_json::Value>) {
  (
      StatusCode::OK,
      Json(json!({
          "status": "success",
          "message": "Server is running"
      })),
  )
}

async fn handle_timeout_error(err: BoxError) -> (StatusCode, Json<serde_json::Value>) {
  if err.is::<tower::timeout::error::Elapsed>() {
      (
          StatusCode::REQUEST_TIMEOUT,
          Json(json!({ "error": "request timed out" })),
      )
  } else {
      tracing::error!(error = %err, "unhandled middleware error");
      (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": "an internal server error occurred" })),
      )
  }
}
