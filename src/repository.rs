use crate::models::{
    Employee, EmployeeDraft, FarmData, Livestock, LivestockDraft, ProduceDraft, ProduceRecord,
    StockRecord,
};
use crate::stats::parse_record_date;
use chrono::NaiveDate;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default)]
pub enum ProduceFilter {
    #[default]
    All,
    On(NaiveDate),
    Since(NaiveDate),
}

impl ProduceFilter {
    fn matches(self, record: &ProduceRecord) -> bool {
        match self {
            ProduceFilter::All => true,
            ProduceFilter::On(day) => parse_record_date(&record.date) == Some(day),
            ProduceFilter::Since(start) => {
                parse_record_date(&record.date).is_some_and(|date| date >= start)
            }
        }
    }
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl FarmData {
    pub fn list_produce(&self, filter: ProduceFilter) -> Vec<ProduceRecord> {
        self.produce
            .values()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect()
    }

    pub fn create_produce(&mut self, draft: ProduceDraft) -> ProduceRecord {
        let record = produce_from_draft(new_id(), draft);
        self.produce.insert(record.id.clone(), record.clone());
        record
    }

    /// Full replacement; `None` when the id is unknown.
    pub fn update_produce(&mut self, id: &str, draft: ProduceDraft) -> Option<ProduceRecord> {
        let slot = self.produce.get_mut(id)?;
        *slot = produce_from_draft(id.to_string(), draft);
        Some(slot.clone())
    }

    pub fn delete_produce(&mut self, id: &str) -> bool {
        self.produce.remove(id).is_some()
    }

    pub fn list_stock(&self) -> Vec<StockRecord> {
        self.stock.values().cloned().collect()
    }

    pub fn stock_item(&self, id: &str) -> Option<&StockRecord> {
        self.stock.get(id)
    }

    /// Inserts the record built by `build` under a freshly allocated id.
    pub fn create_stock(&mut self, build: impl FnOnce(String) -> StockRecord) -> StockRecord {
        let record = build(new_id());
        self.stock.insert(record.id.clone(), record.clone());
        record
    }

    pub fn update_stock(&mut self, record: StockRecord) -> Option<StockRecord> {
        let slot = self.stock.get_mut(&record.id)?;
        *slot = record;
        Some(slot.clone())
    }

    pub fn delete_stock(&mut self, id: &str) -> bool {
        self.stock.remove(id).is_some()
    }

    pub fn list_livestock(&self) -> Vec<Livestock> {
        self.livestock.values().cloned().collect()
    }

    pub fn create_livestock(&mut self, draft: LivestockDraft) -> Livestock {
        let animal = livestock_from_draft(new_id(), draft);
        self.livestock.insert(animal.id.clone(), animal.clone());
        animal
    }

    pub fn update_livestock(&mut self, id: &str, draft: LivestockDraft) -> Option<Livestock> {
        let slot = self.livestock.get_mut(id)?;
        *slot = livestock_from_draft(id.to_string(), draft);
        Some(slot.clone())
    }

    pub fn delete_livestock(&mut self, id: &str) -> bool {
        self.livestock.remove(id).is_some()
    }

    pub fn list_employees(&self) -> Vec<Employee> {
        self.employees.values().cloned().collect()
    }

    pub fn create_employee(&mut self, draft: EmployeeDraft) -> Employee {
        let employee = employee_from_draft(new_id(), draft);
        self.employees.insert(employee.id.clone(), employee.clone());
        employee
    }

    pub fn update_employee(&mut self, id: &str, draft: EmployeeDraft) -> Option<Employee> {
        let slot = self.employees.get_mut(id)?;
        *slot = employee_from_draft(id.to_string(), draft);
        Some(slot.clone())
    }

    pub fn delete_employee(&mut self, id: &str) -> bool {
        self.employees.remove(id).is_some()
    }
}

fn livestock_from_draft(id: String, draft: LivestockDraft) -> Livestock {
    Livestock {
        id,
        name: draft.name,
        breed: draft.breed,
        health_status: draft.health_status,
    }
}

fn employee_from_draft(id: String, draft: EmployeeDraft) -> Employee {
    Employee {
        id,
        name: draft.name,
        phone_number: draft.phone_number,
        id_no: draft.id_no,
        residence: draft.residence,
    }
}

fn produce_from_draft(id: String, draft: ProduceDraft) -> ProduceRecord {
    ProduceRecord {
        id,
        animal: draft.animal,
        keeper: draft.keeper,
        morning_qty: draft.morning_qty,
        evening_qty: draft.evening_qty,
        date: draft.date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HealthStatus, StockDraft};
    use crate::stock;
    use chrono::Utc;

    fn draft(animal: &str, date: &str) -> ProduceDraft {
        ProduceDraft {
            animal: animal.to_string(),
            keeper: "Wanjiru".to_string(),
            morning_qty: 4.0,
            evening_qty: 3.0,
            date: date.to_string(),
        }
    }

    #[test]
    fn create_assigns_distinct_ids() {
        let mut data = FarmData::default();
        let a = data.create_produce(draft("Daisy", "01-06-2024"));
        let b = data.create_produce(draft("Daisy", "01-06-2024"));
        assert_ne!(a.id, b.id);
        assert_eq!(data.produce.len(), 2);
        assert_eq!(data.produce.get(&a.id), Some(&a));
    }

    #[test]
    fn filters_by_day_and_since() {
        let mut data = FarmData::default();
        data.create_produce(draft("Daisy", "01-06-2024"));
        data.create_produce(draft("Bella", "03-06-2024"));
        data.create_produce(draft("Bella", "garbage"));

        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(data.list_produce(ProduceFilter::On(day)).len(), 1);
        assert_eq!(data.list_produce(ProduceFilter::Since(day)).len(), 2);
        assert_eq!(data.list_produce(ProduceFilter::All).len(), 3);
    }

    #[test]
    fn update_and_delete_unknown_ids() {
        let mut data = FarmData::default();
        assert!(data.update_produce("missing", draft("Daisy", "01-06-2024")).is_none());
        assert!(!data.delete_produce("missing"));

        let created = data.create_produce(draft("Daisy", "01-06-2024"));
        let updated = data
            .update_produce(&created.id, draft("Bella", "02-06-2024"))
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.animal, "Bella");
        assert!(data.delete_produce(&created.id));
        assert!(data.produce.is_empty());
    }

    #[test]
    fn stock_create_stamps_allocated_id() {
        let mut data = FarmData::default();
        let draft = StockDraft {
            name: "Salt lick".to_string(),
            quantity: 8,
            supplier: String::new(),
            low_stock_threshold: 2,
            daily_consumption_rate: 0.5,
        };
        let created = data.create_stock(|id| stock::create(id, draft, Utc::now()));
        assert!(!created.id.is_empty());
        assert_eq!(data.stock_item(&created.id), Some(&created));
        assert!(data.delete_stock(&created.id));
        assert!(data.update_stock(created).is_none());
    }

    #[test]
    fn livestock_crud_keeps_store_id() {
        let mut data = FarmData::default();
        let created = data.create_livestock(LivestockDraft {
            name: "Daisy".to_string(),
            breed: "Friesian".to_string(),
            health_status: HealthStatus::Healthy,
        });
        let updated = data
            .update_livestock(
                &created.id,
                LivestockDraft {
                    name: "Daisy".to_string(),
                    breed: "Friesian".to_string(),
                    health_status: HealthStatus::UnderTreatment,
                },
            )
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.health_status, HealthStatus::UnderTreatment);
        assert_eq!(data.list_livestock(), vec![updated]);
        assert!(data.delete_livestock(&created.id));
        assert!(!data.delete_livestock(&created.id));
    }

    #[test]
    fn employee_crud_keeps_store_id() {
        let mut data = FarmData::default();
        let draft = EmployeeDraft {
            name: "Otieno".to_string(),
            phone_number: "0700000000".to_string(),
            id_no: "12345678".to_string(),
            residence: "Limuru".to_string(),
        };
        let created = data.create_employee(draft.clone());
        assert_eq!(created.id_no, "12345678");
        assert_ne!(created.id, created.id_no);

        let moved = EmployeeDraft {
            residence: "Kiambu".to_string(),
            ..draft
        };
        let updated = data.update_employee(&created.id, moved).unwrap();
        assert_eq!(updated.residence, "Kiambu");
        assert!(data.update_employee("missing", EmployeeDraft {
            name: "x".to_string(),
            phone_number: String::new(),
            id_no: String::new(),
            residence: String::new(),
        })
        .is_none());
        assert_eq!(data.list_employees().len(), 1);
        assert!(data.delete_employee(&created.id));
        assert!(data.employees.is_empty());
    }
}
