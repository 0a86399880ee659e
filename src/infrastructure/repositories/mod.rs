//! Repository implementations using SeaORM

pub mod cart_repository;
pub mod codec;
pub mod collection_repository;
pub mod customer_repository;
pub mod item_repository;
pub mod order_repository;
pub mod product_repository;
pub mod promotion_repository;

pub use cart_repository::SeaOrmCartRepository;
pub use collection_repository::SeaOrmCollectionRepository;
pub use customer_repository::SeaOrmCustomerRepository;
pub use item_repository::SeaOrmItemRepository;
pub use order_repository::SeaOrmOrderRepository;
pub use product_repository::SeaOrmProductRepository;
pub use promotion_repository::SeaOrmPromotionRepository;

use sea_orm::DbErr;
use std::fmt::Display;

use crate::domain::DomainError;

/// Error from an insert or update: a failed foreign key points at a missing parent.
fn write_error(e: DbErr) -> DomainError {
    DomainError::from(e).on_write()
}

/// Error from a delete: a failed foreign key means a protect relationship blocked it.
fn delete_error(entity: &str, id: impl Display, e: DbErr) -> DomainError {
    let err = DomainError::from(e);
    if let DomainError::Protected(_) = &err {
        tracing::warn!("Refusing to delete {} {}: still referenced", entity, id);
    }
    err
}
