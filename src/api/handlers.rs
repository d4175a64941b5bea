use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::core::{DepositReceipt, DepositRequest, Fund, PortfolioReport, PriceQuote};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

pub(crate) async fn root() -> &'static str {
    "¡API VIVA!"
}

pub(crate) async fn list_funds(State(state): State<Arc<AppState>>) -> Json<Vec<Fund>> {
    Json(state.service.list_funds().to_vec())
}

pub(crate) async fn get_fund(
    State(state): State<Arc<AppState>>,
    Path(fund_id): Path<String>,
) -> ApiResult<Json<Fund>> {
    let fund = state.service.get_fund(&fund_id)?;
    Ok(Json(fund.clone()))
}

pub(crate) async fn get_quote(
    State(state): State<Arc<AppState>>,
    Path(fund_id): Path<String>,
) -> ApiResult<Json<PriceQuote>> {
    Ok(Json(state.service.quote(&fund_id)?))
}

/// Missing fields deserialize to `None` and are reported by the core as
/// validation errors; bodies that are not JSON objects never reach it.
pub(crate) async fn deposit(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DepositRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DepositReceipt>)> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let receipt = state.service.deposit(&request).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

pub(crate) async fn get_portfolio(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Json<PortfolioReport> {
    Json(state.service.portfolio(&user_id).await)
}
