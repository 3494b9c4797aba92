use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/sw.js", get(handlers::service_worker))
        .route("/static/*path", get(handlers::static_asset))
        .route("/api/grid", get(handlers::get_grid))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/day/:date", get(handlers::get_day).post(handlers::save_day))
        .route("/api/day/:date/toggle", post(handlers::toggle_day))
        .with_state(state)
}
