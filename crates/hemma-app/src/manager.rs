//! # Store Manager
//!
//! The single owner of session, catalog and cart state.
//!
//! ## State Slots
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        StoreManager                                     │
//! │                                                                         │
//! │  ┌────────────────┐ ┌────────────────┐ ┌────────────────┐ ┌──────────┐ │
//! │  │ current_user   │ │ products       │ │ favorites      │ │ cart     │ │
//! │  │ Option<Account>│ │ Vec<Product>   │ │ Vec<Product>   │ │ Vec<Line>│ │
//! │  └───────▲────────┘ └───────▲────────┘ └───────▲────────┘ └────▲─────┘ │
//! │          │                  │                  │               │       │
//! │   sign_in / sign_up    load_catalog      load_catalog     add_to_cart  │
//! │   logout               toggle_favorite   toggle_favorite  update_qty   │
//! │                                                           clear/checkout│
//! │                                                                         │
//! │                  │ reads / writes                                       │
//! │                  ▼                                                      │
//! │            hemma_db::Database (accounts, products)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation takes `&mut self`. Run the manager behind
//! [`AppService`](crate::service::AppService) to share it between tasks.
//!
//! ## Publication
//! Each slot is an [`Observable`]. A slot is republished only when its
//! operation actually changed something; a no-op leaves subscribers idle.

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::observable::Observable;
use hemma_core::{Account, Cart, CartLine, Money, NewAccount, Product, ProductId};
use hemma_db::seed::seed_demo_catalog;
use hemma_db::{Database, DbError, DbResult};

/// Session, catalog and cart state backed by the local store.
pub struct StoreManager {
    db: Database,
    seed_demo_products: bool,
    cart: Cart,
    current_user: Observable<Option<Account>>,
    products: Observable<Vec<Product>>,
    favorites: Observable<Vec<Product>>,
    cart_lines: Observable<Vec<CartLine>>,
}

impl StoreManager {
    /// Creates a manager with no session, an empty catalog view and an empty
    /// cart. Call [`load_catalog`](Self::load_catalog) to populate products.
    pub fn new(db: Database) -> Self {
        StoreManager {
            db,
            seed_demo_products: true,
            cart: Cart::new(),
            current_user: Observable::default(),
            products: Observable::default(),
            favorites: Observable::default(),
            cart_lines: Observable::default(),
        }
    }

    /// Whether an empty store is filled with the demo catalog on load.
    pub fn with_demo_seed(mut self, enabled: bool) -> Self {
        self.seed_demo_products = enabled;
        self
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Signs in with an exact email and password match.
    ///
    /// ## Returns
    /// * `Ok(true)` - Session set to the matching account
    /// * `Ok(false)` - No match; the session is unchanged
    pub async fn sign_in(&mut self, email: &str, password: &str) -> DbResult<bool> {
        match self.db.accounts().find_by_credentials(email, password).await? {
            Some(account) => {
                info!(account_id = account.id, "Signed in");
                self.current_user.set(Some(account));
                Ok(true)
            }
            None => {
                debug!(email = %email, "Sign-in rejected");
                Ok(false)
            }
        }
    }

    /// Registers a new account and signs it in.
    ///
    /// ## Returns
    /// * `Ok(true)` - Account stored and set as the session
    /// * `Ok(false)` - Email already registered; nothing changed
    pub async fn sign_up(&mut self, name: &str, email: &str, password: &str) -> DbResult<bool> {
        let accounts = self.db.accounts();

        if accounts.find_by_email(email).await?.is_some() {
            debug!(email = %email, "Sign-up rejected, email taken");
            return Ok(false);
        }

        let new_account = NewAccount::new(name, email, password);
        let id = match accounts.insert(&new_account).await {
            Ok(id) => id,
            // Another registration won the race for this email.
            Err(DbError::UniqueViolation { .. }) => {
                warn!(email = %email, "Sign-up lost a race on a unique email");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        info!(account_id = id, "Registered account");
        self.current_user.set(Some(new_account.into_account(id)));
        Ok(true)
    }

    /// Clears the session. The cart is kept.
    pub fn logout(&mut self) {
        if self.current_user.update(|user| user.take().is_some()) {
            info!("Logged out");
        }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Publishes the stored catalog, seeding the demo products into an empty
    /// store first.
    ///
    /// Safe to call repeatedly: seeding only happens while the store holds
    /// no products at all.
    pub async fn load_catalog(&mut self) -> DbResult<()> {
        let products_repo = self.db.products();
        let mut products = products_repo.list_all().await?;

        if products.is_empty() && self.seed_demo_products {
            seed_demo_catalog(&self.db).await?;
            products = products_repo.list_all().await?;
        }

        debug!(count = products.len(), "Catalog loaded");
        self.publish_catalog(products);
        Ok(())
    }

    /// Flips the favorite flag of a product and persists it.
    ///
    /// All store reads happen before the write, so once the update lands
    /// both slots are republished from memory and cannot disagree.
    ///
    /// ## Returns
    /// * `Ok(Some(product))` - The updated product
    /// * `Ok(None)` - Unknown id; nothing changed
    pub async fn toggle_favorite(&mut self, product_id: ProductId) -> DbResult<Option<Product>> {
        let products_repo = self.db.products();

        let Some(product) = products_repo.get_by_id(product_id).await? else {
            debug!(product_id, "Toggle favorite ignored, unknown product");
            return Ok(None);
        };

        let toggled = product.with_favorite_toggled();
        let favorites = with_favorite_applied(products_repo.list_favorites().await?, &toggled);

        products_repo.update(&toggled).await?;
        debug!(product_id, is_favorite = toggled.is_favorite, "Favorite toggled");

        self.products.update(|list| {
            match list.iter_mut().find(|p| p.id == product_id) {
                Some(slot) => {
                    *slot = toggled.clone();
                    true
                }
                None => false,
            }
        });
        self.favorites.set(favorites);

        Ok(Some(toggled))
    }

    /// Reads a product straight from the store.
    pub async fn get_product_by_id(&self, product_id: ProductId) -> DbResult<Option<Product>> {
        self.db.products().get_by_id(product_id).await
    }

    fn publish_catalog(&self, products: Vec<Product>) {
        let favorites = products.iter().filter(|p| p.is_favorite).cloned().collect();
        self.products.set(products);
        self.favorites.set(favorites);
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Adds one unit of `product`, merging with an existing line.
    pub fn add_to_cart(&mut self, product: &Product) {
        self.cart.add(product);
        debug!(
            product_id = product.id,
            quantity = self.cart.quantity_of(product.id),
            "Added to cart"
        );
        self.publish_cart();
    }

    /// Sets a line's quantity; zero or less removes the line.
    ///
    /// Returns `false` (and publishes nothing) if the product is not in the
    /// cart.
    pub fn update_cart_item_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        let changed = self.cart.set_quantity(product_id, quantity);
        if changed {
            debug!(product_id, quantity, "Cart quantity updated");
            self.publish_cart();
        }
        changed
    }

    /// Sum of price × quantity over the cart.
    pub fn calculate_total(&self) -> Money {
        self.cart.total()
    }

    /// Empties the cart.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.publish_cart();
    }

    /// Completes the order locally: returns the cart total and empties the
    /// cart. The session is untouched.
    pub fn checkout(&mut self) -> Money {
        let total = self.cart.total();
        info!(
            total = %total,
            lines = self.cart.item_count(),
            "Checked out"
        );
        self.clear_cart();
        total
    }

    fn publish_cart(&self) {
        self.cart_lines.set(self.cart.lines().to_vec());
    }

    // =========================================================================
    // Snapshots & Subscriptions
    // =========================================================================

    pub fn current_user(&self) -> Option<Account> {
        self.current_user.get()
    }

    pub fn products(&self) -> Vec<Product> {
        self.products.get()
    }

    pub fn favorites(&self) -> Vec<Product> {
        self.favorites.get()
    }

    pub fn cart_lines(&self) -> Vec<CartLine> {
        self.cart_lines.get()
    }

    pub fn subscribe_current_user(&self) -> watch::Receiver<Option<Account>> {
        self.current_user.subscribe()
    }

    pub fn subscribe_products(&self) -> watch::Receiver<Vec<Product>> {
        self.products.subscribe()
    }

    pub fn subscribe_favorites(&self) -> watch::Receiver<Vec<Product>> {
        self.favorites.subscribe()
    }

    pub fn subscribe_cart(&self) -> watch::Receiver<Vec<CartLine>> {
        self.cart_lines.subscribe()
    }
}

/// Returns `favorites` (id order) with `product` added or removed per its flag.
fn with_favorite_applied(mut favorites: Vec<Product>, product: &Product) -> Vec<Product> {
    favorites.retain(|p| p.id != product.id);
    if product.is_favorite {
        let at = favorites.partition_point(|p| p.id < product.id);
        favorites.insert(at, product.clone());
    }
    favorites
}

// =============================================================================
// Unit Tests
// =============================================================================
