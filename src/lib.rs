pub mod app;
pub mod client;
pub mod config;
pub mod dates;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod registry;
pub mod state;
pub mod stats;
pub mod storage;

pub use app::router;
pub use client::ApiClient;
pub use config::{ClientConfig, ServerConfig, StoreKind};
pub use registry::{Habit, HabitKind, Registry, SnapshotApi};
pub use state::AppState;
pub use storage::Store;
