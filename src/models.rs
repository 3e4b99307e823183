use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One milking entry: both sessions for a single animal on a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProduceRecord {
    pub id: String,
    pub animal: String,
    pub keeper: String,
    pub morning_qty: f64,
    pub evening_qty: f64,
    /// `dd-mm-yyyy`, as written by the store.
    pub date: String,
}

impl ProduceRecord {
    pub fn total(&self) -> f64 {
        self.morning_qty + self.evening_qty
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockEventKind {
    Added,
    Refilled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockEvent {
    pub timestamp: DateTime<Utc>,
    pub kind: StockEventKind,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub id: String,
    pub name: String,
    /// Undecayed baseline as of `last_updated`.
    pub quantity: u32,
    pub supplier: String,
    pub low_stock_threshold: u32,
    pub daily_consumption_rate: f64,
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub history: Vec<StockEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    #[serde(rename = "Under Treatment")]
    UnderTreatment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Livestock {
    pub id: String,
    pub name: String,
    pub breed: String,
    pub health_status: HealthStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub phone_number: String,
    /// National id number, not the store key.
    pub id_no: String,
    pub residence: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FarmData {
    #[serde(default)]
    pub produce: BTreeMap<String, ProduceRecord>,
    #[serde(default)]
    pub stock: BTreeMap<String, StockRecord>,
    #[serde(default)]
    pub livestock: BTreeMap<String, Livestock>,
    #[serde(default)]
    pub employees: BTreeMap<String, Employee>,
}

/// Client-supplied produce fields; the id is assigned by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct ProduceDraft {
    pub animal: String,
    #[serde(default)]
    pub keeper: String,
    pub morning_qty: f64,
    pub evening_qty: f64,
    pub date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StockDraft {
    pub name: String,
    pub quantity: u32,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub low_stock_threshold: u32,
    #[serde(default)]
    pub daily_consumption_rate: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LivestockDraft {
    pub name: String,
    #[serde(default)]
    pub breed: String,
    pub health_status: HealthStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeDraft {
    pub name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub id_no: String,
    #[serde(default)]
    pub residence: String,
}

#[derive(Debug, Deserialize)]
pub struct RefillRequest {
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodBucket {
    pub label: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTotal {
    pub animal: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockProjection {
    pub current_quantity: u32,
    pub progress_ratio: f64,
    pub is_low: bool,
    pub depletion_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct StockView {
    #[serde(flatten)]
    pub item: StockRecord,
    pub projection: StockProjection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowStockAlert {
    pub id: String,
    pub name: String,
    pub current_quantity: u32,
    pub threshold: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DailyTotalResponse {
    pub date: String,
    pub total: f64,
}

/// Headline counts for the dashboard tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub date: String,
    pub produce_today: f64,
    pub total_employees: usize,
    pub total_livestock: usize,
    pub healthy_livestock: usize,
    pub under_treatment_livestock: usize,
}
