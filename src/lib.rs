pub mod app_state;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod store;

pub use app_state::AppState;
pub use config::Config;
pub use errors::*;
pub use models::*;
pub use store::CatalogStore;
