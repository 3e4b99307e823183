use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route(
            "/api/produce",
            get(handlers::list_produce).post(handlers::create_produce),
        )
        .route(
            "/api/produce/:id",
            put(handlers::update_produce).delete(handlers::delete_produce),
        )
        .route(
            "/api/stock",
            get(handlers::list_stock).post(handlers::create_stock),
        )
        .route(
            "/api/stock/:id",
            put(handlers::update_stock).delete(handlers::delete_stock),
        )
        .route("/api/stock/:id/refill", post(handlers::refill_stock))
        .route(
            "/api/livestock",
            get(handlers::list_livestock).post(handlers::create_livestock),
        )
        .route(
            "/api/livestock/:id",
            put(handlers::update_livestock).delete(handlers::delete_livestock),
        )
        .route(
            "/api/employees",
            get(handlers::list_employees).post(handlers::create_employee),
        )
        .route(
            "/api/employees/:id",
            put(handlers::update_employee).delete(handlers::delete_employee),
        )
        .route("/api/dashboard", get(handlers::dashboard_summary))
        .route("/api/reports/produce", get(handlers::produce_report))
        .route(
            "/api/reports/produce-by-animal",
            get(handlers::produce_by_animal),
        )
        .route("/api/reports/daily-total", get(handlers::daily_total))
        .route("/api/reports/low-stock", get(handlers::low_stock))
        .with_state(state)
}
