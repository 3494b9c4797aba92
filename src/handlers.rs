use crate::editor::{day_response, DayDraft};
use crate::errors::AppError;
use crate::grid::{build_year, date_key, YearGrid, MAX_YEAR, MIN_YEAR};
use crate::models::{DayRequest, DayResponse, GridQuery, StatsResponse, ToggleRequest};
use crate::state::AppState;
use crate::stats::build_stats;
use crate::storage::persist_data;
use crate::ui::{render_index, PAGE_URLS};
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use tracing::{debug, info};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(state.year))
}

pub async fn service_worker(State(state): State<AppState>) -> Response {
    let script = state.assets.worker().service_worker_script(&PAGE_URLS);
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        script,
    )
        .into_response()
}

pub async fn static_asset(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let path = format!("/static/{path}");
    let served = state.assets.serve(&path)?;
    debug!(%path, cached = served.from_cache(), "serving asset");
    let asset = served.into_asset();
    Ok(([(header::CONTENT_TYPE, asset.content_type)], asset.body).into_response())
}

pub async fn get_grid(
    State(state): State<AppState>,
    Query(query): Query<GridQuery>,
) -> Result<Json<YearGrid>, AppError> {
    let year = query.year.unwrap_or(state.year);
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(AppError::bad_request(format!(
            "year must be between {MIN_YEAR} and {MAX_YEAR}"
        )));
    }

    let data = state.data.lock().await;
    Ok(Json(build_year(year, &data.activities)))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(build_stats(&data.activities)))
}

pub async fn get_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DayResponse>, AppError> {
    let date = parse_date_key(&date)?;
    let data = state.data.lock().await;
    Ok(Json(day_response(&date, &data)))
}

pub async fn save_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(payload): Json<DayRequest>,
) -> Result<Json<DayResponse>, AppError> {
    let date = parse_date_key(&date)?;
    let mut data = state.data.lock().await;

    let mut draft = DayDraft::open(date, &data);
    draft.set_selection(payload.tags);
    draft.set_note(payload.note);
    let mut next = data.clone();
    let saved = draft.commit(&mut next);

    persist_data(&state.store, &next).await?;
    *data = next;
    info!(date = %saved.date, tags = saved.tags.len(), "saved day");

    Ok(Json(saved))
}

pub async fn toggle_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<DayResponse>, AppError> {
    let date = parse_date_key(&date)?;
    let mut data = state.data.lock().await;

    let mut draft = DayDraft::open(date, &data);
    draft.toggle(payload.tag);
    let mut next = data.clone();
    let saved = draft.commit(&mut next);

    persist_data(&state.store, &next).await?;
    *data = next;
    info!(date = %saved.date, tag = payload.tag.as_str(), "toggled tag");

    Ok(Json(saved))
}

fn parse_date_key(raw: &str) -> Result<String, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(date_key)
        .map_err(|_| AppError::bad_request("date must be formatted as YYYY-MM-DD"))
}
