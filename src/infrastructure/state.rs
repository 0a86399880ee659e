//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{
    CartRepository, CollectionRepository, CustomerRepository, ItemRepository, OrderRepository,
    ProductRepository, PromotionRepository,
};
use crate::infrastructure::{
    SeaOrmCartRepository, SeaOrmCollectionRepository, SeaOrmCustomerRepository,
    SeaOrmItemRepository, SeaOrmOrderRepository, SeaOrmProductRepository,
    SeaOrmPromotionRepository,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    pub collection_repo: Arc<dyn CollectionRepository>,
    pub product_repo: Arc<dyn ProductRepository>,
    pub promotion_repo: Arc<dyn PromotionRepository>,
    pub item_repo: Arc<dyn ItemRepository>,
    pub customer_repo: Arc<dyn CustomerRepository>,
    pub order_repo: Arc<dyn OrderRepository>,
    pub cart_repo: Arc<dyn CartRepository>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            collection_repo: Arc::new(SeaOrmCollectionRepository::new(db.clone())),
            product_repo: Arc::new(SeaOrmProductRepository::new(db.clone())),
            promotion_repo: Arc::new(SeaOrmPromotionRepository::new(db.clone())),
            item_repo: Arc::new(SeaOrmItemRepository::new(db.clone())),
            customer_repo: Arc::new(SeaOrmCustomerRepository::new(db.clone())),
            order_repo: Arc::new(SeaOrmOrderRepository::new(db.clone())),
            cart_repo: Arc::new(SeaOrmCartRepository::new(db.clone())),
            db,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl AsRef<DatabaseConnection> for AppState {
    fn as_ref(&self) -> &DatabaseConnection {
        &self.db
    }
}
