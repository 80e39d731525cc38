//! ## Web Server
//!
//! The interactive shell around [`build_view`]: one `actix-web` app serving the rendered page,
//! the same view as JSON, and a health probe. Every request re-runs the filter and the charts
//! against the cached dataset; the dataset itself is never reloaded here.

use crate::dashboard::{build_view, DashboardView};
use crate::dataset::TripDataset;
use crate::exceptions::{DashboardError, DashboardResult};
use crate::filter::Selection;
use crate::render::render_page;
use crate::settings::{ChartSettings, DashboardSettings};
use actix_web::{http::header::ContentType, web, App, HttpResponse, HttpServer};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared, read-only state handed to every handler.
pub struct AppState {
    pub dataset: Arc<TripDataset>,
    pub charts: ChartSettings,
}

#[derive(Serialize)]
struct ApiHealth {
    healthy: bool,
    version: String,
    trips: usize,
    zones: usize,
}

#[derive(Serialize)]
struct ApiError {
    error: String,
}

fn error_response(err: &DashboardError) -> HttpResponse {
    match err {
        DashboardError::InvalidParameter(_) => {
            warn!("Rejected request: {}", err);
            HttpResponse::BadRequest().json(ApiError {
                error: err.to_string(),
            })
        }
        _ => {
            error!("Request failed: {}", err);
            HttpResponse::InternalServerError().json(ApiError {
                error: err.to_string(),
            })
        }
    }
}

async fn view_for(state: &AppState, pairs: &[(String, String)]) -> DashboardResult<DashboardView> {
    let selection = Selection::from_query(pairs, state.dataset.date_bounds())?;
    build_view(&state.dataset, &selection).await
}

/// `GET /`
///
/// Renders the full dashboard for the selection in the query string.
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<Vec<(String, String)>>,
) -> HttpResponse {
    let page = view_for(&state, &query)
        .await
        .and_then(|view| render_page(&view, &state.dataset, state.charts));
    match page {
        Ok(html) => HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(html),
        Err(e) => error_response(&e),
    }
}

/// `GET /api/view`
///
/// Returns the metrics and chart data for the selection as JSON.
pub async fn view(
    state: web::Data<AppState>,
    query: web::Query<Vec<(String, String)>>,
) -> HttpResponse {
    match view_for(&state, &query).await {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => error_response(&e),
    }
}

/// `GET /health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        trips: state.dataset.trip_count(),
        zones: state.dataset.zone_count(),
    })
}

/// Registers the dashboard routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/api/view", web::get().to(view))
        .route("/health", web::get().to(health));
}

/// Serves the dashboard until the process is stopped.
pub async fn run_server(
    settings: &DashboardSettings,
    dataset: Arc<TripDataset>,
) -> DashboardResult<()> {
    let state = web::Data::new(AppState {
        dataset,
        charts: settings.charts,
    });

    info!(
        "Serving dashboard on http://{} with {} worker(s)",
        settings.bind_address, settings.workers
    );
    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .workers(settings.workers)
        .bind(settings.bind_address.as_str())?
        .run()
        .await?;
    Ok(())
}
