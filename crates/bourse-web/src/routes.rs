//! Request handlers.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use bourse_core::{
    Instrument, InstrumentCode, MarketSummary, OverviewEntry, SessionDate, SessionRange,
    StoreStatus, TradingSession, ValidationError, DEFAULT_TOP_MOVERS,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

const SERVICE_NAME: &str = "bourse-web";

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FullHistoryQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    pub top: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub store: StoreStatus,
}

pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Daily trading-session analytics",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "stocks": "/api/stocks",
            "history": "/api/stocks/{code}/history?days=N",
            "full_history": "/api/stocks/{code}/full-history?limit=N",
            "range": "/api/stocks/{code}/range?start=YYYY-MM-DD&end=YYYY-MM-DD",
            "overview": "/api/market/overview",
            "latest": "/api/market/latest",
            "dates": "/api/market/dates",
            "summary": "/api/market/summary?top=N",
        },
        "collaborators": &*state.collaborators,
    }))
}

pub async fn health(State(state): State<AppState>) -> Result<Json<Health>, ApiError> {
    let store = state.read(|service| service.store_status()).await?;
    Ok(Json(Health {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        store,
    }))
}

pub async fn instruments(State(state): State<AppState>) -> Result<Json<Vec<Instrument>>, ApiError> {
    let instruments = state.read(|service| service.instruments()).await?;
    Ok(Json(instruments))
}

pub async fn history(
    State(state): State<AppState>,
    Path(code): Path<String>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<TradingSession>>, ApiError> {
    let Query(query) = query.map_err(rejected)?;
    let code = InstrumentCode::parse(&code)?;
    let days = match query.days {
        Some(days) => positive_window("days", days)?,
        None => state.default_history_days,
    };

    let sessions = state
        .read(move |service| service.stock_history(&code, days))
        .await?;
    Ok(Json(sessions))
}

pub async fn full_history(
    State(state): State<AppState>,
    Path(code): Path<String>,
    query: Result<Query<FullHistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<TradingSession>>, ApiError> {
    let Query(query) = query.map_err(rejected)?;
    let code = InstrumentCode::parse(&code)?;
    let limit = match query.limit {
        Some(limit) => positive_window("limit", limit)?,
        None => state.default_history_days,
    };

    let sessions = state
        .read(move |service| service.full_history(&code, limit))
        .await?;
    Ok(Json(sessions))
}

pub async fn range(
    State(state): State<AppState>,
    Path(code): Path<String>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> Result<Json<Vec<TradingSession>>, ApiError> {
    let Query(query) = query.map_err(rejected)?;
    let code = InstrumentCode::parse(&code)?;
    let (Some(start), Some(end)) = (query.start, query.end) else {
        return Err(ApiError::BadRequest(String::from(
            "both 'start' and 'end' are required",
        )));
    };
    let range = SessionRange::parse(&start, &end)?;

    let sessions = state
        .read(move |service| service.session_range(&code, &range))
        .await?;
    Ok(Json(sessions))
}

pub async fn overview(
    State(state): State<AppState>,
) -> Result<Json<Vec<OverviewEntry>>, ApiError> {
    let entries = state.read(|service| service.overview()).await?;
    Ok(Json(entries))
}

pub async fn latest(
    State(state): State<AppState>,
) -> Result<Json<Vec<TradingSession>>, ApiError> {
    let sessions = state.read(|service| service.latest_session()).await?;
    Ok(Json(sessions))
}

pub async fn dates(State(state): State<AppState>) -> Result<Json<Vec<SessionDate>>, ApiError> {
    let dates = state.read(|service| service.session_dates()).await?;
    Ok(Json(dates))
}

pub async fn summary(
    State(state): State<AppState>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<MarketSummary>, ApiError> {
    let Query(query) = query.map_err(rejected)?;
    let top = match query.top {
        Some(top) => positive_window("top", top)?,
        None => DEFAULT_TOP_MOVERS,
    };

    let summary = state
        .read(move |service| service.market_summary(top))
        .await?;
    Ok(Json(summary))
}

fn positive_window(field: &'static str, value: i64) -> Result<usize, ValidationError> {
    usize::try_from(value)
        .ok()
        .filter(|value| *value > 0)
        .ok_or(ValidationError::NonPositiveWindow { field })
}

fn rejected(rejection: QueryRejection) -> ApiError {
    ApiError::BadRequest(rejection.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_must_be_positive() {
        assert_eq!(positive_window("days", 30), Ok(30));
        assert_eq!(
            positive_window("days", 0),
            Err(ValidationError::NonPositiveWindow { field: "days" })
        );
        assert_eq!(
            positive_window("limit", -4),
            Err(ValidationError::NonPositiveWindow { field: "limit" })
        );
    }
}
