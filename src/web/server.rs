use std::sync::Arc;
use axum::{
    Router,
    extract::{DefaultBodyLimit, State, rejection::JsonRejection},
    http::{Method, header},
    response::Json,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::predictor::{FeedbackRequest, RatingPredictor, RatingResponse};
use crate::web::error::ApiError;

pub const LIVENESS_TEXT: &str = "Rating Prediction API is running.";

/// Rating API server
/// GET / で生存確認、POST /predict-rating でフィードバックを星評価に変換
pub struct WebServer {
    predictor: Arc<RatingPredictor>,
    config: Arc<Config>,
}

#[derive(Clone)]
struct AppState {
    predictor: Arc<RatingPredictor>,
}

impl WebServer {
    pub fn new(predictor: Arc<RatingPredictor>, config: Arc<Config>) -> Self {
        Self { predictor, config }
    }

    pub fn router(&self) -> Router {
        let state = AppState {
            predictor: self.predictor.clone(),
        };

        let mut app = Router::new()
            .route("/", get(home).fallback(method_not_allowed))
            .route("/predict-rating", post(predict_rating).fallback(method_not_allowed))
            .fallback(not_found)
            .layer(DefaultBodyLimit::max(self.config.server.max_body_bytes))
            .with_state(state);

        if self.config.cors.allow_any_origin {
            app = app.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods([Method::GET, Method::POST])
                    .allow_headers([header::CONTENT_TYPE]),
            );
        }

        app.layer(TraceLayer::new_for_http())
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(&addr).await?;
        info!("🌐 Rating API listening on http://{}", addr);
        self.serve(listener).await
    }

    pub async fn serve(&self, listener: TcpListener) -> anyhow::Result<()> {
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

/// Liveness
async fn home() -> &'static str {
    LIVENESS_TEXT
}

async fn predict_rating(
    State(state): State<AppState>,
    body: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Json<RatingResponse>, ApiError> {
    let Json(request) = body?;
    let response = state.predictor.predict(request)?;
    Ok(Json(response))
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
