use crate::dashboard;
use crate::errors::AppError;
use crate::models::{
    DailyTotalResponse, DashboardSummary, Employee, EmployeeDraft, EntityTotal, FarmData,
    Livestock, LivestockDraft, LowStockAlert, PeriodBucket, ProduceDraft, ProduceRecord,
    RefillRequest, StockDraft, StockRecord, StockView,
};
use crate::repository::ProduceFilter;
use crate::state::AppState;
use crate::stats::{self, parse_record_date, RangeSelector};
use crate::stock;
use crate::storage::persist_data;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Local, NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct ProduceQuery {
    pub date: Option<String>,
    pub since: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    #[serde(default)]
    pub range: RangeSelector,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn list_produce(
    State(state): State<AppState>,
    Query(query): Query<ProduceQuery>,
) -> Result<Json<Vec<ProduceRecord>>, AppError> {
    let filter = match (query.date, query.since) {
        (Some(date), _) => ProduceFilter::On(parse_query_date(&date)?),
        (None, Some(since)) => ProduceFilter::Since(parse_query_date(&since)?),
        (None, None) => ProduceFilter::All,
    };
    let data = state.data.lock().await;
    Ok(Json(data.list_produce(filter)))
}

pub async fn create_produce(
    State(state): State<AppState>,
    Json(draft): Json<ProduceDraft>,
) -> Result<(StatusCode, Json<ProduceRecord>), AppError> {
    validate_produce(&draft)?;
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let record = next.create_produce(draft);
    commit(&state, &mut data, next).await?;
    info!(id = %record.id, animal = %record.animal, date = %record.date, "produce added");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_produce(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<ProduceDraft>,
) -> Result<Json<ProduceRecord>, AppError> {
    validate_produce(&draft)?;
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let record = next
        .update_produce(&id, draft)
        .ok_or_else(|| AppError::not_found(format!("no produce with id {id}")))?;
    commit(&state, &mut data, next).await?;
    info!(id = %record.id, "produce updated");
    Ok(Json(record))
}

pub async fn delete_produce(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    if !next.delete_produce(&id) {
        return Err(AppError::not_found(format!("no produce with id {id}")));
    }
    commit(&state, &mut data, next).await?;
    info!(%id, "produce deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_stock(State(state): State<AppState>) -> Json<Vec<StockView>> {
    let now = Utc::now();
    let data = state.data.lock().await;
    let views = data
        .list_stock()
        .into_iter()
        .map(|item| StockView {
            projection: stock::project(&item, now),
            item,
        })
        .collect();
    Json(views)
}

pub async fn create_stock(
    State(state): State<AppState>,
    Json(draft): Json<StockDraft>,
) -> Result<(StatusCode, Json<StockRecord>), AppError> {
    validate_stock(&draft)?;
    let now = Utc::now();
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let record = next.create_stock(|id| stock::create(id, draft, now));
    commit(&state, &mut data, next).await?;
    info!(id = %record.id, name = %record.name, quantity = record.quantity, "stock added");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<StockDraft>,
) -> Result<Json<StockRecord>, AppError> {
    validate_stock(&draft)?;
    let mut data = state.data.lock().await;
    let current = data
        .stock_item(&id)
        .ok_or_else(|| AppError::not_found(format!("no stock item with id {id}")))?;
    let edited = stock::edit(current, draft, Utc::now());
    let mut next = data.clone();
    let record = next
        .update_stock(edited)
        .ok_or_else(|| AppError::not_found(format!("no stock item with id {id}")))?;
    commit(&state, &mut data, next).await?;
    info!(id = %record.id, quantity = record.quantity, "stock edited");
    Ok(Json(record))
}

pub async fn delete_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    if !next.delete_stock(&id) {
        return Err(AppError::not_found(format!("no stock item with id {id}")));
    }
    commit(&state, &mut data, next).await?;
    info!(%id, "stock deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn refill_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<RefillRequest>,
) -> Result<Json<StockRecord>, AppError> {
    let mut data = state.data.lock().await;
    let current = data
        .stock_item(&id)
        .ok_or_else(|| AppError::not_found(format!("no stock item with id {id}")))?;
    let refilled = stock::refill(current, payload.amount, Utc::now())?;
    let mut next = data.clone();
    let record = next
        .update_stock(refilled)
        .ok_or_else(|| AppError::not_found(format!("no stock item with id {id}")))?;
    commit(&state, &mut data, next).await?;
    info!(id = %record.id, amount = payload.amount, quantity = record.quantity, "stock refilled");
    Ok(Json(record))
}

pub async fn list_livestock(State(state): State<AppState>) -> Json<Vec<Livestock>> {
    Json(state.data.lock().await.list_livestock())
}

pub async fn create_livestock(
    State(state): State<AppState>,
    Json(draft): Json<LivestockDraft>,
) -> Result<(StatusCode, Json<Livestock>), AppError> {
    require_name(&draft.name)?;
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let animal = next.create_livestock(draft);
    commit(&state, &mut data, next).await?;
    info!(id = %animal.id, name = %animal.name, "livestock added");
    Ok((StatusCode::CREATED, Json(animal)))
}

pub async fn update_livestock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<LivestockDraft>,
) -> Result<Json<Livestock>, AppError> {
    require_name(&draft.name)?;
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let animal = next
        .update_livestock(&id, draft)
        .ok_or_else(|| AppError::not_found(format!("no livestock with id {id}")))?;
    commit(&state, &mut data, next).await?;
    info!(id = %animal.id, status = ?animal.health_status, "livestock updated");
    Ok(Json(animal))
}

pub async fn delete_livestock(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    if !next.delete_livestock(&id) {
        return Err(AppError::not_found(format!("no livestock with id {id}")));
    }
    commit(&state, &mut data, next).await?;
    info!(%id, "livestock deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_employees(State(state): State<AppState>) -> Json<Vec<Employee>> {
    Json(state.data.lock().await.list_employees())
}

pub async fn create_employee(
    State(state): State<AppState>,
    Json(draft): Json<EmployeeDraft>,
) -> Result<(StatusCode, Json<Employee>), AppError> {
    require_name(&draft.name)?;
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let employee = next.create_employee(draft);
    commit(&state, &mut data, next).await?;
    info!(id = %employee.id, name = %employee.name, "employee added");
    Ok((StatusCode::CREATED, Json(employee)))
}

pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<EmployeeDraft>,
) -> Result<Json<Employee>, AppError> {
    require_name(&draft.name)?;
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let employee = next
        .update_employee(&id, draft)
        .ok_or_else(|| AppError::not_found(format!("no employee with id {id}")))?;
    commit(&state, &mut data, next).await?;
    info!(id = %employee.id, "employee updated");
    Ok(Json(employee))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    if !next.delete_employee(&id) {
        return Err(AppError::not_found(format!("no employee with id {id}")));
    }
    commit(&state, &mut data, next).await?;
    info!(%id, "employee deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn dashboard_summary(State(state): State<AppState>) -> Json<DashboardSummary> {
    let data = state.data.lock().await;
    Json(dashboard::summarize(&data, today()))
}

pub async fn produce_report(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Json<Vec<PeriodBucket>> {
    let records = snapshot_produce(&state).await;
    Json(stats::aggregate_by_period(&records, query.range, today()))
}

pub async fn produce_by_animal(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Json<Vec<EntityTotal>> {
    let records = snapshot_produce(&state).await;
    Json(stats::aggregate_by_entity(&records, query.range, today()))
}

pub async fn daily_total(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<DailyTotalResponse>, AppError> {
    let date = match query.date {
        Some(value) => parse_query_date(&value)?,
        None => today(),
    };
    let records = snapshot_produce(&state).await;
    Ok(Json(DailyTotalResponse {
        date: stats::format_record_date(date),
        total: stats::total_for_date(&records, date),
    }))
}

pub async fn low_stock(State(state): State<AppState>) -> Json<Vec<LowStockAlert>> {
    let now = Utc::now();
    let data = state.data.lock().await;
    Json(stock::low_stock_alerts(data.stock.values(), now))
}

/// Persists `next` and only then swaps it in; a failed write leaves the
/// shared snapshot as it was.
async fn commit(state: &AppState, current: &mut FarmData, next: FarmData) -> Result<(), AppError> {
    persist_data(&state.data_path, &next).await?;
    *current = next;
    Ok(())
}

// Aggregation runs on a copy so the lock is not held while computing.
async fn snapshot_produce(state: &AppState) -> Vec<ProduceRecord> {
    state.data.lock().await.list_produce(ProduceFilter::All)
}

fn require_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::bad_request("name must not be empty"));
    }
    Ok(())
}

fn validate_produce(draft: &ProduceDraft) -> Result<(), AppError> {
    if draft.animal.trim().is_empty() {
        return Err(AppError::bad_request("animal must not be empty"));
    }
    for (name, qty) in [("morning_qty", draft.morning_qty), ("evening_qty", draft.evening_qty)] {
        if !qty.is_finite() || qty < 0.0 {
            return Err(AppError::bad_request(format!(
                "{name} must be a non-negative number"
            )));
        }
    }
    parse_query_date(&draft.date)?;
    Ok(())
}

fn validate_stock(draft: &StockDraft) -> Result<(), AppError> {
    require_name(&draft.name)?;
    let rate = draft.daily_consumption_rate;
    if !rate.is_finite() || rate < 0.0 {
        return Err(AppError::bad_request(
            "daily_consumption_rate must be a non-negative number",
        ));
    }
    Ok(())
}

fn parse_query_date(value: &str) -> Result<NaiveDate, AppError> {
    parse_record_date(value)
        .ok_or_else(|| AppError::bad_request(format!("date '{value}' is not in dd-mm-yyyy format")))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
