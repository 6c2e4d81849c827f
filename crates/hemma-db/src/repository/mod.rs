//! # Repository Module
//!
//! Database repository implementations for Hemma.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  StoreManager                                                          │
//! │       │                                                                 │
//! │       │  db.products().get_by_id(3)                                    │
//! │       ▼                                                                 │
//! │  ProductRepository                    AccountRepository                │
//! │  ├── insert(&NewProduct)              ├── insert(&NewAccount)          │
//! │  ├── list_all()                       ├── find_by_email(email)         │
//! │  ├── list_favorites()                 └── find_by_credentials(e, p)    │
//! │  ├── update(&Product)                                                  │
//! │  └── get_by_id(id)                                                     │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every method touches a single row or performs a single bulk read; none
//! spans records in a transaction.
//!
//! ## Available Repositories
//!
//! - [`account::AccountRepository`] - Registration and credential lookup
//! - [`product::ProductRepository`] - Catalog reads and favorite updates

pub mod account;
pub mod product;
