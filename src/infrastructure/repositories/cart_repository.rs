//! SeaORM implementation of CartRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::codec::decode_timestamp;
use super::write_error;
use crate::domain::validation;
use crate::domain::{Cart, CartItem, CartRepository, DomainError};
use crate::models::cart::{ActiveModel, Entity as CartEntity, Model};
use crate::models::cart_item::{self, Entity as CartItemEntity};

/// SeaORM-based implementation of CartRepository
pub struct SeaOrmCartRepository {
    db: DatabaseConnection,
}

impl SeaOrmCartRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(c: Model) -> Result<Cart, DomainError> {
    Ok(Cart {
        id: c.id,
        created_at: decode_timestamp(&c.created_at)?,
    })
}

fn item_to_domain(i: cart_item::Model) -> CartItem {
    CartItem {
        id: i.id,
        cart_id: i.cart_id,
        product_id: i.product_id,
        quantity: i.quantity,
    }
}

#[async_trait]
impl CartRepository for SeaOrmCartRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Cart>, DomainError> {
        CartEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn create(&self) -> Result<Cart, DomainError> {
        let result = <ActiveModel as Default>::default().insert(&self.db).await?;
        tracing::debug!("Created cart {}", result.id);
        to_domain(result)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = CartEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        tracing::debug!("Deleted cart {} and its items", id);
        Ok(())
    }

    async fn items(&self, cart_id: i32) -> Result<Vec<CartItem>, DomainError> {
        let items = CartItemEntity::find()
            .filter(cart_item::Column::CartId.eq(cart_id))
            .order_by_asc(cart_item::Column::Id)
            .all(&self.db)
            .await?;

        Ok(items.into_iter().map(item_to_domain).collect())
    }

    async fn add_item(
        &self,
        cart_id: i32,
        product_id: i32,
        quantity: i16,
    ) -> Result<CartItem, DomainError> {
        validation::quantity(quantity)?;

        let txn = self.db.begin().await?;

        let existing = CartItemEntity::find()
            .filter(cart_item::Column::CartId.eq(cart_id))
            .filter(cart_item::Column::ProductId.eq(product_id))
            .one(&txn)
            .await?;

        let line = match existing {
            Some(line) => {
                let total = line.quantity.checked_add(quantity).ok_or_else(|| {
                    DomainError::Validation(format!(
                        "quantity must be at most {}",
                        i16::MAX
                    ))
                })?;
                let mut active: cart_item::ActiveModel = line.into();
                active.quantity = Set(total);
                active.update(&txn).await?
            }
            None => {
                let new_line = cart_item::ActiveModel {
                    cart_id: Set(cart_id),
                    product_id: Set(product_id),
                    quantity: Set(quantity),
                    ..Default::default()
                };
                new_line.insert(&txn).await.map_err(write_error)?
            }
        };

        txn.commit().await?;
        Ok(item_to_domain(line))
    }

    async fn update_item_quantity(
        &self,
        item_id: i32,
        quantity: i16,
    ) -> Result<CartItem, DomainError> {
        validation::quantity(quantity)?;

        let existing = CartItemEntity::find_by_id(item_id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: cart_item::ActiveModel = existing.into();
        active.quantity = Set(quantity);
        let result = active.update(&self.db).await?;

        Ok(item_to_domain(result))
    }

    async fn remove_item(&self, item_id: i32) -> Result<(), DomainError> {
        let result = CartItemEntity::delete_by_id(item_id)
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }
}
