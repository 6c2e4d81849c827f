//! # hemma-db: Database Layer for Hemma
//!
//! The persistent store behind the storefront: accounts and catalog
//! products in SQLite, accessed asynchronously through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Hemma Data Flow                                  │
//! │                                                                         │
//! │  StoreManager (hemma-app)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     hemma-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ AccountRepo   │    │ 001_init.sql │  │   │
//! │  │   │ SqlitePool    │◄───│ ProductRepo   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <data dir>/hemma.db   (or :memory: in tests)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded migrations and destructive rebuild
//! - [`error`] - Database error types
//! - [`repository`] - Account and product repositories
//! - [`seed`] - The fixed demo catalog
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hemma_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/hemma.db")).await?;
//!
//! let products = db.products().list_all().await?;
//! let account = db.accounts().find_by_email("a@b.com").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::account::AccountRepository;
pub use repository::product::ProductRepository;
