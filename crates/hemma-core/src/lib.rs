//! # hemma-core: Pure Types for the Hemma Storefront
//!
//! Everything the storefront state layer reasons about, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Hemma Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Presentation (screens)                       │   │
//! │  │    Sign in ──► Catalog ──► Favorites ──► Cart ──► Checkout      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ AppHandle (hemma-app)                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               StoreManager (hemma-app)                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ hemma-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │  Account  │  │   Money   │  │   Cart    │  │  sign-up  │  │   │
//! │  │   │  Product  │  │           │  │ CartLine  │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    hemma-db (Database Layer)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Account and Product records
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - In-memory cart with merge and quantity-floor rules
//! - [`validation`] - Sign-up input rules
//! - [`error`] - Validation error type
//!
//! ## Example Usage
//!
//! ```rust
//! use hemma_core::{Cart, Money, Product};
//!
//! let lamp = Product {
//!     id: 1,
//!     name: "Black Simple Lamp".to_string(),
//!     price_cents: 1200,
//!     category: "Lighting".to_string(),
//!     image_ref: None,
//!     is_favorite: false,
//! };
//!
//! let mut cart = Cart::new();
//! cart.add(&lamp);
//! cart.add(&lamp);
//!
//! assert_eq!(cart.item_count(), 1);
//! assert_eq!(cart.total(), Money::from_cents(2400));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine, MAX_LINE_QUANTITY};
pub use error::ValidationError;
pub use money::Money;
pub use types::*;
