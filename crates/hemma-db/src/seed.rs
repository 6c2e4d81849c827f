//! # Demo Catalog
//!
//! The fixed product list written into an empty store.
//!
//! ```text
//! load_catalog()
//!      │
//!      ├── products table empty? ──► seed_demo_catalog() ──► 7 rows
//!      │
//!      └── otherwise ─────────────► keep what is stored (favorites survive)
//! ```

use tracing::info;

use crate::error::DbResult;
use crate::pool::Database;
use hemma_core::{Money, NewProduct};

/// (name, price in cents, category, image reference)
pub const DEMO_PRODUCTS: [(&str, i64, &str, &str); 7] = [
    ("Black Simple Lamp", 1200, "Lighting", "lamp_url"),
    ("Minimal Stand", 2500, "Furniture", "stand_url"),
    ("Coffee Chair", 2000, "Chairs", "chair_url"),
    ("Simple Desk", 5000, "Tables", "desk_url"),
    ("Coffee Table", 5000, "Tables", "table_url"),
    ("Minimal Desk", 5000, "Tables", "minimal_desk_url"),
    ("Minimal Lamp", 1200, "Lighting", "minimal_lamp_url"),
];

/// Insert payloads for the demo catalog, none of them favorites.
pub fn demo_products() -> Vec<NewProduct> {
    DEMO_PRODUCTS
        .iter()
        .map(|(name, cents, category, image)| {
            NewProduct::new(*name, Money::from_cents(*cents), *category, Some(image))
        })
        .collect()
}

/// Writes the demo catalog in a single transaction.
///
/// Callers check that the table is empty first; this function always inserts.
pub async fn seed_demo_catalog(db: &Database) -> DbResult<usize> {
    let ids = db.products().insert_many(&demo_products()).await?;
    info!(count = ids.len(), "Seeded demo catalog");
    Ok(ids.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbConfig;

    #[test]
    fn test_demo_products() {
        let products = demo_products();
        assert_eq!(products.len(), 7);
        assert!(products.iter().all(|p| !p.is_favorite));
        assert!(products.iter().all(|p| p.price_cents > 0));
        assert_eq!(products[0].name, "Black Simple Lamp");
        assert_eq!(products[0].image_ref.as_deref(), Some("lamp_url"));
    }

    #[tokio::test]
    async fn test_seed_demo_catalog() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert_eq!(seed_demo_catalog(&db).await.unwrap(), 7);

        let stored = db.products().list_all().await.unwrap();
        let names: Vec<_> = stored.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names[0], "Black Simple Lamp");
        assert_eq!(names[6], "Minimal Lamp");
        assert_eq!(stored[3].price(), Money::from_cents(5000));
    }
}
