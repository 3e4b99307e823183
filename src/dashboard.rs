use crate::models::{DashboardSummary, FarmData, HealthStatus, ProduceRecord};
use crate::stats::{format_record_date, total_for_date};
use chrono::NaiveDate;

pub fn summarize(data: &FarmData, today: NaiveDate) -> DashboardSummary {
    let produce: Vec<ProduceRecord> = data.produce.values().cloned().collect();
    let count_status = |status: HealthStatus| {
        data.livestock
            .values()
            .filter(|animal| animal.health_status == status)
            .count()
    };

    DashboardSummary {
        date: format_record_date(today),
        produce_today: total_for_date(&produce, today),
        total_employees: data.employees.len(),
        total_livestock: data.livestock.len(),
        healthy_livestock: count_status(HealthStatus::Healthy),
        under_treatment_livestock: count_status(HealthStatus::UnderTreatment),
    }
}
