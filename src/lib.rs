pub mod app;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod state;
pub mod stats;
pub mod stock;
pub mod storage;

pub use app::router;
pub use config::AppConfig;
pub use state::AppState;
pub use storage::load_data;
