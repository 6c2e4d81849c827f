//! # Domain Types
//!
//! Records owned by the persistent store.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Account      │   │    Product      │   │    CartLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  product (snap) │       │
//! │  │  name           │   │  name           │   │  quantity       │       │
//! │  │  email (unique) │   │  price_cents    │   │  added_at       │       │
//! │  │  password       │   │  category       │   └─────────────────┘       │
//! │  └─────────────────┘   │  image_ref?     │     (cart.rs, memory only)  │
//! │                        │  is_favorite    │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Ids are integers assigned by SQLite at insert time. Insert payloads
//! ([`NewAccount`], [`NewProduct`]) carry no id.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Store-assigned account identifier.
pub type AccountId = i64;

/// Store-assigned product identifier.
pub type ProductId = i64;

// =============================================================================
// Account
// =============================================================================

/// A registered user identity.
///
/// ## Security Note
/// The password is kept in plaintext, exactly as the store holds it. It is
/// never serialized toward the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Account {
    /// Unique identifier assigned at registration.
    pub id: AccountId,

    /// Display name.
    pub name: String,

    /// Login email, unique across accounts.
    pub email: String,

    /// Plaintext password.
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password: String,
}

/// Insert payload for a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl NewAccount {
    /// Creates an insert payload.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        NewAccount {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Builds the stored record once the store has assigned an id.
    pub fn into_account(self, id: AccountId) -> Account {
        Account {
            id,
            name: self.name,
            email: self.email,
            password: self.password,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
///
/// `is_favorite` is the only field that changes after seeding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (SQLite rowid).
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Price in cents, never negative.
    pub price_cents: i64,

    /// Free-form category label ("Lighting", "Tables", ...).
    pub category: String,

    /// Optional image reference; images are resolved by the presentation layer.
    pub image_ref: Option<String>,

    /// Whether the user marked this product as a favorite.
    pub is_favorite: bool,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns a copy with the favorite flag flipped.
    pub fn with_favorite_toggled(&self) -> Product {
        Product {
            is_favorite: !self.is_favorite,
            ..self.clone()
        }
    }
}

/// Insert payload for a new product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price_cents: i64,
    pub category: String,
    pub image_ref: Option<String>,
    pub is_favorite: bool,
}

impl NewProduct {
    /// Creates a non-favorite product payload.
    pub fn new(
        name: impl Into<String>,
        price: Money,
        category: impl Into<String>,
        image_ref: Option<&str>,
    ) -> Self {
        NewProduct {
            name: name.into(),
            price_cents: price.cents(),
            category: category.into(),
            image_ref: image_ref.map(str::to_string),
            is_favorite: false,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp() -> Product {
        Product {
            id: 1,
            name: "Black Simple Lamp".to_string(),
            price_cents: 1200,
            category: "Lighting".to_string(),
            image_ref: Some("lamp_url".to_string()),
            is_favorite: false,
        }
    }

    #[test]
    fn test_product_price() {
        assert_eq!(lamp().price(), Money::from_cents(1200));
    }

    #[test]
    fn test_favorite_toggle_keeps_other_fields() {
        let original = lamp();
        let toggled = original.with_favorite_toggled();

        assert!(toggled.is_favorite);
        assert_eq!(toggled.id, original.id);
        assert_eq!(toggled.name, original.name);
        assert_eq!(toggled.with_favorite_toggled(), original);
    }

    #[test]
    fn test_new_account_into_account() {
        let account = NewAccount::new("Ann", "a@b.com", "secret").into_account(7);
        assert_eq!(account.id, 7);
        assert_eq!(account.email, "a@b.com");
        assert_eq!(account.password, "secret");
    }

    #[test]
    fn test_account_serialization_hides_password() {
        let account = NewAccount::new("Ann", "a@b.com", "secret").into_account(1);
        let json = serde_json::to_string(&account).unwrap();

        assert!(json.contains("\"email\":\"a@b.com\""));
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let json = serde_json::to_string(&lamp()).unwrap();
        assert!(json.contains("\"priceCents\":1200"));
        assert!(json.contains("\"isFavorite\":false"));
        assert!(json.contains("\"imageRef\":\"lamp_url\""));
    }
}
