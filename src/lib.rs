pub mod app;
pub mod catalog;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod models;
pub mod session;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::router;
pub use state::AppState;
pub use storage::resolve_export_config;
