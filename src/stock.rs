use crate::errors::CoreError;
use crate::models::{
    LowStockAlert, StockDraft, StockEvent, StockEventKind, StockProjection, StockRecord,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::warn;

/// Decay-adjusted view of a stock item as of `now`. The stored record is the
/// baseline; nothing here writes back to it.
pub fn project(item: &StockRecord, now: DateTime<Utc>) -> StockProjection {
    let current_quantity = current_quantity(item, now);

    let baseline = item
        .history
        .iter()
        .rev()
        .find(|event| matches!(event.kind, StockEventKind::Added | StockEventKind::Refilled))
        .map(|event| event.amount)
        .unwrap_or(item.quantity);

    let progress_ratio = if baseline > 0 {
        (f64::from(current_quantity) / f64::from(baseline)).clamp(0.0, 1.0)
    } else {
        0.0
    };

    StockProjection {
        current_quantity,
        progress_ratio,
        is_low: current_quantity < item.low_stock_threshold,
        depletion_date: depletion_date(item, now),
    }
}

/// Tops an item up by `amount` on top of its decayed quantity and records a
/// `Refilled` event.
pub fn refill(item: &StockRecord, amount: i64, now: DateTime<Utc>) -> Result<StockRecord, CoreError> {
    if amount <= 0 {
        return Err(CoreError::InvalidArgument(format!(
            "refill amount must be positive, got {amount}"
        )));
    }
    let amount = u32::try_from(amount).map_err(|_| {
        CoreError::InvalidArgument(format!("refill amount {amount} is too large"))
    })?;

    let current = project(item, now).current_quantity;
    let mut updated = item.clone();
    updated.quantity = current.saturating_add(amount);
    updated.last_updated = Some(now);
    updated.history.push(StockEvent {
        timestamp: now,
        kind: StockEventKind::Refilled,
        amount,
    });
    Ok(updated)
}

pub fn create(id: String, draft: StockDraft, now: DateTime<Utc>) -> StockRecord {
    StockRecord {
        id,
        history: vec![StockEvent {
            timestamp: now,
            kind: StockEventKind::Added,
            amount: draft.quantity,
        }],
        name: draft.name,
        quantity: draft.quantity,
        supplier: draft.supplier,
        low_stock_threshold: draft.low_stock_threshold,
        daily_consumption_rate: draft.daily_consumption_rate,
        last_updated: Some(now),
    }
}

/// Replaces the descriptive fields and the baseline quantity.
///
/// History is carried over untouched: an edit leaves no ledger entry, unlike
/// a refill.
pub fn edit(item: &StockRecord, draft: StockDraft, now: DateTime<Utc>) -> StockRecord {
    StockRecord {
        id: item.id.clone(),
        name: draft.name,
        quantity: draft.quantity,
        supplier: draft.supplier,
        low_stock_threshold: draft.low_stock_threshold,
        daily_consumption_rate: draft.daily_consumption_rate,
        last_updated: Some(now),
        history: item.history.clone(),
    }
}

pub fn low_stock_alerts<'a>(
    items: impl IntoIterator<Item = &'a StockRecord>,
    now: DateTime<Utc>,
) -> Vec<LowStockAlert> {
    items
        .into_iter()
        .filter(|item| item.low_stock_threshold > 0)
        .filter_map(|item| {
            let current_quantity = current_quantity(item, now);
            if current_quantity >= item.low_stock_threshold {
                return None;
            }
            warn!(
                id = %item.id,
                name = %item.name,
                current_quantity,
                threshold = item.low_stock_threshold,
                "low stock"
            );
            Some(LowStockAlert {
                id: item.id.clone(),
                name: item.name.clone(),
                current_quantity,
                threshold: item.low_stock_threshold,
            })
        })
        .collect()
}

fn days_since_update(item: &StockRecord, now: DateTime<Utc>) -> i64 {
    item.last_updated
        .map(|last| (now - last).num_days().max(0))
        .unwrap_or(0)
}

fn current_quantity(item: &StockRecord, now: DateTime<Utc>) -> u32 {
    let consumed = (days_since_update(item, now) as f64 * item.daily_consumption_rate).floor();
    let remaining = f64::from(item.quantity) - consumed;
    // `as` saturates; NaN from a bad rate lands on zero.
    remaining.max(0.0) as u32
}

fn depletion_date(item: &StockRecord, now: DateTime<Utc>) -> Option<NaiveDate> {
    let rate = item.daily_consumption_rate;
    if rate.is_nan() || rate <= 0.0 {
        return None;
    }
    let days = (f64::from(item.quantity) / rate).floor() as i64;
    let latest = item
        .history
        .iter()
        .map(|event| event.timestamp)
        .max()
        .unwrap_or(now);
    let offset = Duration::try_days(days)?;
    latest.checked_add_signed(offset).map(|at| at.date_naive())
}
