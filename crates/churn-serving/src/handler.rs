//! HTTP request handlers.
//!
//! Routes:
//!
//! - `GET /`: input form
//! - `POST /predict`: form-encoded prediction, always answered with a rendered page
//! - `POST /api/predict`: JSON prediction
//! - `GET /health`: JSON health report

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::features::FeatureRecord;
use crate::form::{PredictForm, RequestError};
use crate::model_loader::ModelLoader;
use crate::prediction::PredictionView;
use crate::render::{render_page, Page};
use crate::server::{HealthStatus, ServerState};
use crate::strategy::{build_strategy, PredictionStrategy, StrategyKind};

/// Request counters.
#[derive(Debug, Default)]
pub struct RequestStats {
    total: AtomicU64,
    failed: AtomicU64,
}

impl RequestStats {
    fn record(&self, ok: bool) {
        self.total.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Prediction requests handled so far.
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Prediction requests that ended in an error.
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

/// Shared state handed to every handler.
pub struct AppState {
    strategy: Arc<dyn PredictionStrategy>,
    model_loader: Arc<ModelLoader>,
    server_state: Arc<RwLock<ServerState>>,
    stats: Arc<RequestStats>,
    started_at: Instant,
}

impl AppState {
    /// State for a standalone app (tests, embedding).
    pub fn new(kind: StrategyKind, model_loader: Arc<ModelLoader>) -> Self {
        Self::from_parts(
            kind,
            model_loader,
            Arc::new(RwLock::new(ServerState::Running)),
            Arc::new(RequestStats::default()),
        )
    }

    pub(crate) fn from_parts(
        kind: StrategyKind,
        model_loader: Arc<ModelLoader>,
        server_state: Arc<RwLock<ServerState>>,
        stats: Arc<RequestStats>,
    ) -> Self {
        Self {
            strategy: build_strategy(kind, Arc::clone(&model_loader)),
            model_loader,
            server_state,
            stats,
            started_at: Instant::now(),
        }
    }

    /// Count a request whose body could not be decoded.
    pub fn reject(&self, err: actix_web::Error) -> RequestError {
        self.stats.record(false);
        RequestError::InvalidPayload(err.to_string())
    }

    /// Coerce, predict and format one request.
    pub fn evaluate(
        &self,
        form: PredictForm,
    ) -> Result<(FeatureRecord, PredictionView), RequestError> {
        let outcome = form.into_record().and_then(|record| {
            let prediction = self.strategy.predict(&record)?;
            Ok((record, PredictionView::from_prediction(&prediction)))
        });
        self.stats.record(outcome.is_ok());
        outcome
    }

    /// Current health report.
    pub fn health(&self) -> HealthStatus {
        HealthStatus::collect(
            *self.server_state.read(),
            self.strategy.kind(),
            &self.model_loader,
            self.started_at.elapsed().as_secs(),
            &self.stats,
        )
    }

    /// Active strategy.
    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// Request counters.
    pub fn stats(&self) -> &RequestStats {
        &self.stats
    }
}

/// Register all routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/predict", web::post().to(predict_form))
        .route("/api/predict", web::post().to(predict_json))
        .route("/health", web::get().to(health));
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

async fn index() -> HttpResponse {
    html(render_page(Page::Form))
}

async fn predict_form(
    state: web::Data<AppState>,
    form: Result<web::Form<PredictForm>, actix_web::Error>,
) -> HttpResponse {
    let outcome = form
        .map_err(|e| state.reject(e))
        .and_then(|form| state.evaluate(form.into_inner()));

    match outcome {
        Ok((record, view)) => {
            debug!("Prediction rendered: churn={} risk={}", view.churn, view.risque);
            html(render_page(Page::Result {
                view: &view,
                record: &record,
            }))
        }
        Err(err) => {
            warn!(kind = err.kind(), "Prediction request failed: {}", err);
            html(render_page(Page::Error(&err.to_string())))
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
}

#[derive(Serialize)]
struct PredictBody {
    #[serde(flatten)]
    view: PredictionView,
    input: FeatureRecord,
}

async fn predict_json(
    state: web::Data<AppState>,
    payload: Result<web::Json<PredictForm>, actix_web::Error>,
) -> HttpResponse {
    let outcome = payload
        .map_err(|e| state.reject(e))
        .and_then(|payload| state.evaluate(payload.into_inner()));

    match outcome {
        Ok((input, view)) => HttpResponse::Ok().json(PredictBody { view, input }),
        Err(err) => {
            warn!(kind = err.kind(), "JSON prediction request failed: {}", err);
            let status = match &err {
                e if e.is_client_error() => StatusCode::BAD_REQUEST,
                RequestError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            HttpResponse::build(status).json(ErrorBody {
                error: err.to_string(),
                kind: err.kind(),
            })
        }
    }
}

async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.health())
}
