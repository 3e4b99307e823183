use crate::models::{EntityTotal, PeriodBucket, ProduceRecord};
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// `dd-mm-yyyy`, the date format produce records are stored with.
pub const RECORD_DATE_FORMAT: &str = "%d-%m-%Y";

const WEEKDAY_LABELS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeSelector {
    #[default]
    Weekly,
    Monthly,
    SixMonths,
    Yearly,
}

impl RangeSelector {
    /// Inclusive `[start, as_of]` window covered by this range.
    pub fn window(self, as_of: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = match self {
            RangeSelector::Weekly => week_start(as_of),
            RangeSelector::Monthly => months_back(as_of, 0),
            RangeSelector::SixMonths => months_back(as_of, 5),
            RangeSelector::Yearly => months_back(as_of, 11),
        };
        (start, as_of)
    }
}

/// Parses a stored `dd-mm-yyyy` date; `None` when malformed.
pub fn parse_record_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), RECORD_DATE_FORMAT).ok()
}

/// Formats a date the way the store writes it (`dd-mm-yyyy`).
pub fn format_record_date(date: NaiveDate) -> String {
    date.format(RECORD_DATE_FORMAT).to_string()
}

/// Totals per weekday (Weekly) or per calendar month (everything else),
/// zero-filled across the whole window.
pub fn aggregate_by_period(
    records: &[ProduceRecord],
    range: RangeSelector,
    as_of: NaiveDate,
) -> Vec<PeriodBucket> {
    let (start, end) = range.window(as_of);
    let in_range = records_in_window(records, start, end);

    match range {
        RangeSelector::Weekly => {
            let mut totals = [0.0f64; 7];
            for (date, record) in in_range {
                totals[date.weekday().num_days_from_monday() as usize] += record.total();
            }
            WEEKDAY_LABELS
                .iter()
                .zip(totals)
                .map(|(label, total)| PeriodBucket {
                    label: (*label).to_string(),
                    total,
                })
                .collect()
        }
        _ => {
            let mut totals: BTreeMap<i32, f64> = BTreeMap::new();
            for (date, record) in in_range {
                *totals.entry(month_index(date)).or_default() += record.total();
            }
            (month_index(start)..=month_index(end))
                .filter_map(|index| {
                    let first = month_first_day(index)?;
                    Some(PeriodBucket {
                        label: first.format("%b %y").to_string(),
                        total: totals.get(&index).copied().unwrap_or(0.0),
                    })
                })
                .collect()
        }
    }
}

/// Per-animal totals over the same window. Animals without records in range
/// are absent; output is sorted by animal.
pub fn aggregate_by_entity(
    records: &[ProduceRecord],
    range: RangeSelector,
    as_of: NaiveDate,
) -> Vec<EntityTotal> {
    let (start, end) = range.window(as_of);
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for (_, record) in records_in_window(records, start, end) {
        *totals.entry(record.animal.as_str()).or_default() += record.total();
    }

    totals
        .into_iter()
        .map(|(animal, total)| EntityTotal {
            animal: animal.to_string(),
            total,
        })
        .collect()
}

pub fn total_for_date(records: &[ProduceRecord], date: NaiveDate) -> f64 {
    records_in_window(records, date, date)
        .into_iter()
        .map(|(_, record)| record.total())
        .sum()
}

fn records_in_window(
    records: &[ProduceRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<(NaiveDate, &ProduceRecord)> {
    records
        .iter()
        .filter_map(|record| match parse_record_date(&record.date) {
            Some(date) => Some((date, record)),
            None => {
                warn!(id = %record.id, date = %record.date, "skipping produce with unparseable date");
                None
            }
        })
        .filter(|(date, _)| *date >= start && *date <= end)
        .collect()
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn months_back(date: NaiveDate, months: u32) -> NaiveDate {
    date.with_day(1)
        .and_then(|first| first.checked_sub_months(Months::new(months)))
        .unwrap_or(date)
}

// Year-qualified so that e.g. Jan 2024 and Jan 2025 never share a bucket.
fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

fn month_first_day(index: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn produce(animal: &str, morning: f64, evening: f64, date: &str) -> ProduceRecord {
        ProduceRecord {
            id: format!("{animal}-{date}"),
            animal: animal.to_string(),
            keeper: "keeper".to_string(),
            morning_qty: morning,
            evening_qty: evening,
            date: date.to_string(),
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn windows_resolve_to_expected_start_dates() {
        // Thursday
        let as_of = ymd(2024, 6, 13);
        assert_eq!(RangeSelector::Weekly.window(as_of), (ymd(2024, 6, 10), as_of));
        assert_eq!(RangeSelector::Monthly.window(as_of).0, ymd(2024, 6, 1));
        assert_eq!(RangeSelector::SixMonths.window(as_of).0, ymd(2024, 1, 1));
        assert_eq!(RangeSelector::Yearly.window(as_of).0, ymd(2023, 7, 1));
    }

    #[test]
    fn weekly_over_empty_input_is_seven_zero_buckets() {
        let buckets = aggregate_by_period(&[], RangeSelector::Weekly, ymd(2024, 6, 13));
        let labels: Vec<_> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, WEEKDAY_LABELS.to_vec());
        assert!(buckets.iter().all(|b| b.total == 0.0));
    }

    #[test]
    fn weekly_sums_both_sessions_per_weekday() {
        let records = vec![
            produce("A", 6.0, 4.0, "11-06-2024"),
            produce("B", 1.5, 2.5, "11-06-2024"),
            produce("A", 3.0, 3.0, "13-06-2024"),
            // previous week, outside the window
            produce("A", 9.0, 9.0, "07-06-2024"),
            // after as_of
            produce("A", 9.0, 9.0, "14-06-2024"),
        ];
        let buckets = aggregate_by_period(&records, RangeSelector::Weekly, ymd(2024, 6, 13));
        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[1].label, "Tuesday");
        assert_eq!(buckets[1].total, 14.0);
        assert_eq!(buckets[3].label, "Thursday");
        assert_eq!(buckets[3].total, 6.0);
        assert_eq!(buckets[4].total, 0.0);
    }

    #[test]
    fn monthly_ranges_are_zero_filled_and_chronological() {
        let as_of = ymd(2024, 3, 15);

        let monthly = aggregate_by_period(&[], RangeSelector::Monthly, as_of);
        assert_eq!(monthly, vec![PeriodBucket { label: "Mar 24".into(), total: 0.0 }]);

        let six = aggregate_by_period(&[], RangeSelector::SixMonths, as_of);
        let labels: Vec<_> = six.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Oct 23", "Nov 23", "Dec 23", "Jan 24", "Feb 24", "Mar 24"]);

        let yearly = aggregate_by_period(&[], RangeSelector::Yearly, as_of);
        assert_eq!(yearly.len(), 12);
        assert_eq!(yearly.first().unwrap().label, "Apr 23");
        assert_eq!(yearly.last().unwrap().label, "Mar 24");
        assert!(yearly.iter().all(|b| b.total == 0.0));
    }

    #[test]
    fn yearly_keeps_same_month_of_different_years_apart() {
        let records = vec![
            produce("A", 5.0, 5.0, "10-04-2023"),
            produce("A", 1.0, 1.0, "02-03-2024"),
            produce("A", 2.0, 0.0, "20-03-2024"),
            // before the window: must not leak into "Mar 24"
            produce("A", 50.0, 50.0, "15-03-2023"),
        ];
        let yearly = aggregate_by_period(&records, RangeSelector::Yearly, ymd(2024, 3, 31));
        assert_eq!(yearly[0], PeriodBucket { label: "Apr 23".into(), total: 10.0 });
        assert_eq!(yearly[11], PeriodBucket { label: "Mar 24".into(), total: 4.0 });
        let sum: f64 = yearly.iter().map(|b| b.total).sum();
        assert_eq!(sum, 14.0);
    }

    #[test]
    fn malformed_dates_are_skipped() {
        let records = vec![
            produce("A", 6.0, 4.0, "2024-06-11"),
            produce("A", 1.0, 1.0, "not a date"),
            produce("A", 2.0, 2.0, "11-06-2024"),
        ];
        let buckets = aggregate_by_period(&records, RangeSelector::Monthly, ymd(2024, 6, 13));
        assert_eq!(buckets[0].total, 4.0);
    }

    #[test]
    fn entity_totals_group_by_animal() {
        let records = vec![
            produce("A", 6.0, 4.0, "01-06-2024"),
            produce("A", 5.0, 5.0, "02-06-2024"),
            produce("B", 3.0, 3.0, "01-06-2024"),
        ];
        let totals = aggregate_by_entity(&records, RangeSelector::Monthly, ymd(2024, 6, 30));
        assert_eq!(
            totals,
            vec![
                EntityTotal { animal: "A".into(), total: 20.0 },
                EntityTotal { animal: "B".into(), total: 6.0 },
            ]
        );
    }

    #[test]
    fn entity_totals_over_empty_input_are_empty() {
        assert!(aggregate_by_entity(&[], RangeSelector::Yearly, ymd(2024, 6, 30)).is_empty());
    }

    #[test]
    fn daily_total_only_counts_that_day() {
        let records = vec![
            produce("A", 6.0, 4.0, "01-06-2024"),
            produce("B", 3.0, 3.0, "01-06-2024"),
            produce("A", 5.0, 5.0, "02-06-2024"),
        ];
        assert_eq!(total_for_date(&records, ymd(2024, 6, 1)), 16.0);
        assert_eq!(total_for_date(&records, ymd(2024, 6, 3)), 0.0);
    }

    #[test]
    fn aggregation_is_repeatable() {
        let records = vec![produce("A", 6.0, 4.0, "01-06-2024")];
        let as_of = ymd(2024, 6, 30);
        assert_eq!(
            aggregate_by_period(&records, RangeSelector::SixMonths, as_of),
            aggregate_by_period(&records, RangeSelector::SixMonths, as_of)
        );
    }

    #[test]
    fn record_dates_round_trip_through_store_format() {
        let date = ymd(2025, 3, 26);
        assert_eq!(format_record_date(date), "26-03-2025");
        assert_eq!(parse_record_date(" 26-03-2025 "), Some(date));
        assert_eq!(parse_record_date("31-02-2025"), None);
    }
}
