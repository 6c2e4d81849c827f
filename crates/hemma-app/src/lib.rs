//! # hemma-app: Storefront State Layer
//!
//! The single source of truth for session, catalog, favorites and cart,
//! exposed to the presentation layer through an async facade.
//!
//! ## Module Organization
//! ```text
//! hemma_app/
//! ├── lib.rs          ◄─── You are here (exports, logging setup)
//! ├── manager.rs      ◄─── StoreManager: state slots + mutation logic
//! ├── service.rs      ◄─── AppService / AppHandle: worker task + commands
//! ├── observable.rs   ◄─── Observable<T> over tokio::sync::watch
//! ├── config.rs       ◄─── AppConfig (TOML + HEMMA_* env)
//! ├── error.rs        ◄─── AppError / ErrorCode / ConfigError
//! └── main.rs         ◄─── `hemma` entry point (lifecycle only)
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. AppConfig::load_or_default ───────────────────────────────────────► │
//! │  2. init_tracing(config.logging.filter) ──────────────────────────────► │
//! │  3. Database::new(config.db_config()) ─── migrations / rebuild ───────► │
//! │  4. StoreManager::new(db) ────────────── injected, no global ─────────► │
//! │  5. AppService::new(manager, ..).start() ─► AppHandle ────────────────► │
//! │  6. handle.load_catalog() ────────────── seeds an empty store ────────► │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let db = Database::new(DbConfig::in_memory()).await?;
//! let handle = AppService::new(StoreManager::new(db), &ServiceConfig::default()).start();
//!
//! handle.load_catalog().await?;
//! let mut products = handle.products();
//! let lamp = products.borrow_and_update()[0].clone();
//! handle.add_to_cart(lamp).await?;
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod observable;
pub mod service;

pub use config::AppConfig;
pub use error::{AppError, AppResult, ConfigError, ErrorCode};
pub use manager::StoreManager;
pub use observable::Observable;
pub use service::{AppHandle, AppService, ServiceConfig};

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` takes precedence over `default_filter` when set.
///
/// ## Examples
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=hemma_db=trace` - Trace SQL-level logging for the store only
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
