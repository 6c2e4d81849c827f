//! # Application Service
//!
//! Runs the [`StoreManager`] on a dedicated task and exposes its operations
//! asynchronously through a cloneable [`AppHandle`].
//!
//! ## Dispatch Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Command Dispatch                                  │
//! │                                                                         │
//! │  Screen A ──┐                                                          │
//! │             │  handle.add_to_cart(p)                                   │
//! │  Screen B ──┼──────────────────────┐                                   │
//! │             │                      ▼                                   │
//! │  Screen C ──┘      ┌──────────────────────────────┐                    │
//! │                    │  mpsc::Sender<Command>       │ bounded, FIFO      │
//! │                    └──────────────┬───────────────┘                    │
//! │                                   ▼                                     │
//! │                    ┌──────────────────────────────┐                    │
//! │                    │  worker task                 │                    │
//! │                    │  owns StoreManager           │ one command        │
//! │                    │  reply via oneshot           │ at a time          │
//! │                    └──────────────┬───────────────┘                    │
//! │                                   │ publishes                           │
//! │                                   ▼                                     │
//! │        watch::Receiver: current_user, products, favorites, cart        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - Commands run one at a time in arrival order, so each operation's
//!   read-modify-write is atomic with respect to every other operation.
//! - Dropping a pending call does not abort the command. Its writes still
//!   land; only the reply is discarded.
//! - After [`AppHandle::shutdown`] returns, every call fails with
//!   `ErrorCode::ServiceUnavailable`.

use std::ops::ControlFlow;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::manager::StoreManager;
use hemma_core::validation::{validate_sign_in, validate_sign_up};
use hemma_core::{Account, CartLine, Money, Product, ProductId};

/// Default capacity of the command queue.
pub const DEFAULT_COMMAND_BUFFER: usize = 64;

// =============================================================================
// Configuration
// =============================================================================

/// Facade configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Commands that may wait in the queue before callers are suspended.
    pub command_buffer: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            command_buffer: DEFAULT_COMMAND_BUFFER,
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

type Reply<T> = oneshot::Sender<AppResult<T>>;

/// Commands processed by the worker.
enum Command {
    SignIn {
        email: String,
        password: String,
        reply: Reply<Account>,
    },
    SignUp {
        name: String,
        email: String,
        password: String,
        confirm_password: String,
        reply: Reply<Account>,
    },
    Logout {
        reply: Reply<()>,
    },
    LoadCatalog {
        reply: Reply<()>,
    },
    ToggleFavorite {
        product_id: ProductId,
        reply: Reply<Option<Product>>,
    },
    GetProduct {
        product_id: ProductId,
        reply: Reply<Option<Product>>,
    },
    AddToCart {
        product: Product,
        reply: Reply<()>,
    },
    UpdateQuantity {
        product_id: ProductId,
        quantity: i64,
        reply: Reply<bool>,
    },
    CalculateTotal {
        reply: Reply<Money>,
    },
    ClearCart {
        reply: Reply<()>,
    },
    Checkout {
        reply: Reply<Money>,
    },
    /// Stop after every command queued before this one.
    Shutdown {
        done: oneshot::Sender<()>,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::SignIn { .. } => "sign_in",
            Command::SignUp { .. } => "sign_up",
            Command::Logout { .. } => "logout",
            Command::LoadCatalog { .. } => "load_catalog",
            Command::ToggleFavorite { .. } => "toggle_favorite",
            Command::GetProduct { .. } => "get_product_by_id",
            Command::AddToCart { .. } => "add_to_cart",
            Command::UpdateQuantity { .. } => "update_cart_item_quantity",
            Command::CalculateTotal { .. } => "calculate_total",
            Command::ClearCart { .. } => "clear_cart",
            Command::Checkout { .. } => "checkout",
            Command::Shutdown { .. } => "shutdown",
        }
    }
}

// =============================================================================
// Service
// =============================================================================

/// Owns the manager until [`start`](Self::start) moves it onto a task.
pub struct AppService {
    manager: StoreManager,
    config: ServiceConfig,
}

/// Cloneable handle to a running [`AppService`].
#[derive(Clone)]
pub struct AppHandle {
    cmd_tx: mpsc::Sender<Command>,
    current_user: watch::Receiver<Option<Account>>,
    products: watch::Receiver<Vec<Product>>,
    favorites: watch::Receiver<Vec<Product>>,
    cart: watch::Receiver<Vec<CartLine>>,
}

impl AppService {
    pub fn new(manager: StoreManager, config: &ServiceConfig) -> Self {
        AppService {
            manager,
            config: *config,
        }
    }

    /// Spawns the worker task and returns a handle to it.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(self) -> AppHandle {
        let (cmd_tx, cmd_rx) = mpsc::channel(self.config.command_buffer.max(1));

        let handle = AppHandle {
            cmd_tx,
            current_user: self.manager.subscribe_current_user(),
            products: self.manager.subscribe_products(),
            favorites: self.manager.subscribe_favorites(),
            cart: self.manager.subscribe_cart(),
        };

        tokio::spawn(async move {
            self.run(cmd_rx).await;
        });

        handle
    }

    /// Main worker loop.
    async fn run(mut self, mut cmd_rx: mpsc::Receiver<Command>) {
        info!(
            command_buffer = self.config.command_buffer,
            "Store service started"
        );

        while let Some(cmd) = cmd_rx.recv().await {
            debug!(command = cmd.name(), "Processing command");

            if let ControlFlow::Break(done) = self.handle(cmd).await {
                info!("Store service shutting down");
                cmd_rx.close();
                // Commands that slipped in behind shutdown get no reply.
                while cmd_rx.try_recv().is_ok() {}
                let _ = done.send(());
                return;
            }
        }

        info!("All handles dropped, store service stopped");
    }

    /// Runs one command. `Break` carries the shutdown acknowledgement.
    async fn handle(&mut self, cmd: Command) -> ControlFlow<oneshot::Sender<()>> {
        let manager = &mut self.manager;

        // A send error only means the caller stopped waiting.
        match cmd {
            Command::SignIn {
                email,
                password,
                reply,
            } => {
                let _ = reply.send(sign_in(manager, &email, &password).await);
            }
            Command::SignUp {
                name,
                email,
                password,
                confirm_password,
                reply,
            } => {
                let result = sign_up(manager, &name, &email, &password, &confirm_password).await;
                let _ = reply.send(result);
            }
            Command::Logout { reply } => {
                manager.logout();
                let _ = reply.send(Ok(()));
            }
            Command::LoadCatalog { reply } => {
                let _ = reply.send(manager.load_catalog().await.map_err(AppError::from));
            }
            Command::ToggleFavorite { product_id, reply } => {
                let result = manager.toggle_favorite(product_id).await;
                let _ = reply.send(result.map_err(AppError::from));
            }
            Command::GetProduct { product_id, reply } => {
                let result = manager.get_product_by_id(product_id).await;
                let _ = reply.send(result.map_err(AppError::from));
            }
            Command::AddToCart { product, reply } => {
                manager.add_to_cart(&product);
                let _ = reply.send(Ok(()));
            }
            Command::UpdateQuantity {
                product_id,
                quantity,
                reply,
            } => {
                let _ = reply.send(Ok(manager.update_cart_item_quantity(product_id, quantity)));
            }
            Command::CalculateTotal { reply } => {
                let _ = reply.send(Ok(manager.calculate_total()));
            }
            Command::ClearCart { reply } => {
                manager.clear_cart();
                let _ = reply.send(Ok(()));
            }
            Command::Checkout { reply } => {
                let _ = reply.send(Ok(manager.checkout()));
            }
            Command::Shutdown { done } => return ControlFlow::Break(done),
        }

        ControlFlow::Continue(())
    }
}

/// Sign-in as seen by a screen: empty input and a wrong pair both come back
/// as invalid credentials; success reloads the catalog.
///
/// Once the session is set the call succeeds, even if the reload fails.
async fn sign_in(manager: &mut StoreManager, email: &str, password: &str) -> AppResult<Account> {
    if validate_sign_in(email, password).is_err() {
        return Err(AppError::invalid_credentials());
    }

    if !manager.sign_in(email, password).await? {
        return Err(AppError::invalid_credentials());
    }

    reload_catalog_for_session(manager, "sign_in").await;
    manager
        .current_user()
        .ok_or_else(AppError::invalid_credentials)
}

/// Validated registration; success reloads the catalog.
///
/// The account is already stored when the reload runs, so a reload failure
/// does not turn the reply into an error.
async fn sign_up(
    manager: &mut StoreManager,
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> AppResult<Account> {
    validate_sign_up(name, email, password, confirm_password)?;

    if !manager.sign_up(name, email, password).await? {
        return Err(AppError::duplicate_email());
    }

    reload_catalog_for_session(manager, "sign_up").await;
    manager
        .current_user()
        .ok_or_else(AppError::duplicate_email)
}

/// Refreshes the catalog after a session change. Failures are logged only;
/// the previous catalog stays published.
async fn reload_catalog_for_session(manager: &mut StoreManager, operation: &'static str) {
    if let Err(e) = manager.load_catalog().await {
        warn!(operation, error = %e, "Catalog reload after session change failed");
    }
}

// =============================================================================
// Handle
// =============================================================================

impl AppHandle {
    async fn request<T>(&self, make: impl FnOnce(Reply<T>) -> Command) -> AppResult<T> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(reply))
            .await
            .map_err(|_| AppError::service_unavailable())?;
        rx.await.map_err(|_| AppError::service_unavailable())?
    }

    /// Signs in and reloads the catalog.
    pub async fn sign_in(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> AppResult<Account> {
        let (email, password) = (email.into(), password.into());
        self.request(|reply| Command::SignIn {
            email,
            password,
            reply,
        })
        .await
    }

    /// Registers, signs in and reloads the catalog.
    pub async fn sign_up(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> AppResult<Account> {
        let (name, email) = (name.into(), email.into());
        let (password, confirm_password) = (password.into(), confirm_password.into());
        self.request(|reply| Command::SignUp {
            name,
            email,
            password,
            confirm_password,
            reply,
        })
        .await
    }

    pub async fn logout(&self) -> AppResult<()> {
        self.request(|reply| Command::Logout { reply }).await
    }

    pub async fn load_catalog(&self) -> AppResult<()> {
        self.request(|reply| Command::LoadCatalog { reply }).await
    }

    /// Returns the updated product, or `None` for an unknown id.
    pub async fn toggle_favorite(&self, product_id: ProductId) -> AppResult<Option<Product>> {
        self.request(|reply| Command::ToggleFavorite { product_id, reply })
            .await
    }

    pub async fn get_product_by_id(&self, product_id: ProductId) -> AppResult<Option<Product>> {
        self.request(|reply| Command::GetProduct { product_id, reply })
            .await
    }

    pub async fn add_to_cart(&self, product: Product) -> AppResult<()> {
        self.request(|reply| Command::AddToCart { product, reply })
            .await
    }

    /// Returns `false` if the product was not in the cart.
    pub async fn update_cart_item_quantity(
        &self,
        product_id: ProductId,
        quantity: i64,
    ) -> AppResult<bool> {
        self.request(|reply| Command::UpdateQuantity {
            product_id,
            quantity,
            reply,
        })
        .await
    }

    pub async fn calculate_total(&self) -> AppResult<Money> {
        self.request(|reply| Command::CalculateTotal { reply })
            .await
    }

    pub async fn clear_cart(&self) -> AppResult<()> {
        self.request(|reply| Command::ClearCart { reply }).await
    }

    /// Returns the cart total at checkout and empties the cart.
    pub async fn checkout(&self) -> AppResult<Money> {
        self.request(|reply| Command::Checkout { reply }).await
    }

    /// Stops the worker once every earlier command has completed.
    pub async fn shutdown(&self) -> AppResult<()> {
        let (done, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { done })
            .await
            .map_err(|_| AppError::service_unavailable())?;
        rx.await.map_err(|_| AppError::service_unavailable())
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn current_user(&self) -> watch::Receiver<Option<Account>> {
        self.current_user.clone()
    }

    pub fn products(&self) -> watch::Receiver<Vec<Product>> {
        self.products.clone()
    }

    pub fn favorites(&self) -> watch::Receiver<Vec<Product>> {
        self.favorites.clone()
    }

    pub fn cart(&self) -> watch::Receiver<Vec<CartLine>> {
        self.cart.clone()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use hemma_db::{Database, DbConfig};

    async fn start() -> AppHandle {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AppService::new(StoreManager::new(db), &ServiceConfig::default()).start()
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let handle = start().await;

        let account = handle
            .sign_up("Ann", "a@b.com", "secret", "secret")
            .await
            .unwrap();
        assert_eq!(account.email, "a@b.com");
        assert_eq!(handle.products().borrow().len(), 7);

        handle.logout().await.unwrap();
        assert!(handle.current_user().borrow().is_none());

        let signed_in = handle.sign_in("a@b.com", "secret").await.unwrap();
        assert_eq!(signed_in.id, account.id);
        assert_eq!(handle.current_user().borrow().as_ref(), Some(&signed_in));
    }

    #[tokio::test]
    async fn test_sign_in_reloads_catalog() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.accounts()
            .insert(&hemma_core::NewAccount::new("Ann", "a@b.com", "secret"))
            .await
            .unwrap();
        let handle = AppService::new(StoreManager::new(db), &ServiceConfig::default()).start();
        assert!(handle.products().borrow().is_empty());

        handle.sign_in("a@b.com", "secret").await.unwrap();
        assert_eq!(handle.products().borrow().len(), 7);
    }

    /// Database whose `products` table is gone, so catalog loads fail.
    async fn database_without_catalog() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query("DROP TABLE products")
            .execute(db.pool())
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_sign_in_succeeds_when_catalog_reload_fails() {
        let db = database_without_catalog().await;
        db.accounts()
            .insert(&hemma_core::NewAccount::new("Ann", "a@b.com", "secret"))
            .await
            .unwrap();
        let handle = AppService::new(StoreManager::new(db), &ServiceConfig::default()).start();

        let account = handle.sign_in("a@b.com", "secret").await.unwrap();
        assert_eq!(handle.current_user().borrow().as_ref(), Some(&account));
        assert!(handle.products().borrow().is_empty());
        assert!(handle.load_catalog().await.is_err());
    }

    #[tokio::test]
    async fn test_sign_up_succeeds_when_catalog_reload_fails() {
        let db = database_without_catalog().await;
        let handle =
            AppService::new(StoreManager::new(db.clone()), &ServiceConfig::default()).start();

        let account = handle
            .sign_up("Ann", "a@b.com", "secret", "secret")
            .await
            .unwrap();
        assert_eq!(handle.current_user().borrow().as_ref(), Some(&account));
        assert_eq!(db.accounts().count().await.unwrap(), 1);

        // The reply matched what was stored: a retry is a duplicate.
        handle.logout().await.unwrap();
        let err = handle
            .sign_up("Ann", "a@b.com", "secret", "secret")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateEmail);
    }

    #[tokio::test]
    async fn test_huge_quantity_keeps_service_alive() {
        let handle = start().await;
        handle.load_catalog().await.unwrap();
        let lamp = handle.products().borrow()[0].clone();
        handle.add_to_cart(lamp.clone()).await.unwrap();

        assert!(handle
            .update_cart_item_quantity(lamp.id, i64::MAX)
            .await
            .unwrap());
        let total = handle.calculate_total().await.unwrap();
        assert_eq!(
            total,
            Money::from_cents(1200 * hemma_core::MAX_LINE_QUANTITY)
        );

        handle.add_to_cart(lamp).await.unwrap();
        assert_eq!(handle.calculate_total().await.unwrap(), total);
        handle.load_catalog().await.unwrap();
        assert_eq!(handle.products().borrow().len(), 7);
    }

    #[tokio::test]
    async fn test_wrong_credentials() {
        let handle = start().await;

        let err = handle.sign_in("a@b.com", "secret").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
        assert_eq!(err.message, "Invalid email or password");

        let err = handle.sign_in("", "").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_sign_up_errors() {
        let handle = start().await;

        let err = handle
            .sign_up("Ann", "a@b.com", "secret", "secreT")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Validation);
        assert_eq!(err.message, "Passwords do not match");

        let err = handle
            .sign_up("Ann", "not-an-email", "secret", "secret")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Validation);

        handle
            .sign_up("Ann", "a@b.com", "secret", "secret")
            .await
            .unwrap();
        let err = handle
            .sign_up("Bob", "a@b.com", "hunter2", "hunter2")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateEmail);
        assert_eq!(err.message, "A user with this email already exists");
        assert_eq!(handle.current_user().borrow().as_ref().unwrap().name, "Ann");
    }

    #[tokio::test]
    async fn test_cart_flow_publishes() {
        let handle = start().await;
        handle.load_catalog().await.unwrap();
        let mut cart_rx = handle.cart();

        let lamp = handle.products().borrow()[0].clone();
        handle.add_to_cart(lamp.clone()).await.unwrap();
        handle.add_to_cart(lamp.clone()).await.unwrap();

        assert!(cart_rx.has_changed().unwrap());
        assert_eq!(cart_rx.borrow_and_update()[0].quantity, 2);
        assert_eq!(handle.calculate_total().await.unwrap(), Money::from_cents(2400));

        assert!(handle.update_cart_item_quantity(lamp.id, 0).await.unwrap());
        assert!(!handle.update_cart_item_quantity(lamp.id, 3).await.unwrap());
        assert!(cart_rx.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_checkout() {
        let handle = start().await;
        handle.load_catalog().await.unwrap();
        let products = handle.products().borrow().clone();

        handle.add_to_cart(products[1].clone()).await.unwrap();
        handle.add_to_cart(products[2].clone()).await.unwrap();

        assert_eq!(handle.checkout().await.unwrap(), Money::from_cents(4500));
        assert!(handle.cart().borrow().is_empty());
        assert_eq!(handle.checkout().await.unwrap(), Money::zero());
    }

    #[tokio::test]
    async fn test_favorites_through_handle() {
        let handle = start().await;
        handle.load_catalog().await.unwrap();
        let id = handle.products().borrow()[4].id;

        let updated = handle.toggle_favorite(id).await.unwrap().unwrap();
        assert!(updated.is_favorite);
        assert_eq!(handle.favorites().borrow().len(), 1);

        let fetched = handle.get_product_by_id(id).await.unwrap().unwrap();
        assert!(fetched.is_favorite);

        assert!(handle.toggle_favorite(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_serialized() {
        let handle = start().await;
        handle.load_catalog().await.unwrap();
        let lamp = handle.products().borrow()[0].clone();

        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let handle = handle.clone();
                let lamp = lamp.clone();
                tokio::spawn(async move { handle.add_to_cart(lamp).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let cart = handle.cart().borrow().clone();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].quantity, 20);
    }

    #[tokio::test]
    async fn test_dropped_call_still_completes() {
        let handle = start().await;
        handle.load_catalog().await.unwrap();
        let lamp = handle.products().borrow()[0].clone();

        // Enqueue then abandon the call before its reply arrives.
        let call = handle.add_to_cart(lamp);
        tokio::pin!(call);
        let _ = poll_once(call.as_mut()).await;
        drop(call);

        assert_eq!(handle.calculate_total().await.unwrap(), Money::from_cents(1200));
    }

    /// Polls a future exactly once.
    async fn poll_once<F: std::future::Future + Unpin>(fut: F) {
        let mut fut = Some(fut);
        std::future::poll_fn(|cx| {
            if let Some(f) = fut.as_mut() {
                let _ = std::pin::Pin::new(f).poll(cx);
            }
            std::task::Poll::Ready(())
        })
        .await
    }

    #[tokio::test]
    async fn test_shutdown() {
        let handle = start().await;
        handle.load_catalog().await.unwrap();

        handle.shutdown().await.unwrap();

        let err = handle.logout().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ServiceUnavailable);
        assert_eq!(
            handle.shutdown().await.unwrap_err().code,
            ErrorCode::ServiceUnavailable
        );
    }
}
