//! SeaORM implementation of OrderRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use super::codec::{decode_price, decode_timestamp, encode_price};
use super::{delete_error, write_error};
use crate::domain::{
    CreateOrderInput, DomainError, NewOrderItem, Order, OrderItem, OrderRepository,
};
use crate::models::order::{ActiveModel, Column, Entity as OrderEntity, Model};
use crate::models::order_item::{self, Entity as OrderItemEntity};
use crate::models::product::Entity as ProductEntity;
use crate::models::PaymentStatus;

/// SeaORM-based implementation of OrderRepository
pub struct SeaOrmOrderRepository {
    db: DatabaseConnection,
}

impl SeaOrmOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(o: Model) -> Result<Order, DomainError> {
    Ok(Order {
        placed_at: decode_timestamp(&o.placed_at)?,
        id: o.id,
        payment_status: o.payment_status,
        customer_id: o.customer_id,
    })
}

fn item_to_domain(i: order_item::Model) -> Result<OrderItem, DomainError> {
    Ok(OrderItem {
        unit_price: decode_price(&i.unit_price)?,
        id: i.id,
        order_id: i.order_id,
        product_id: i.product_id,
        quantity: i.quantity,
    })
}

/// Inserts one order line. Without an explicit price the product's current
/// price is copied into the line; later price changes never reach it.
async fn insert_item<C>(
    conn: &C,
    order_id: i32,
    item: NewOrderItem,
) -> Result<order_item::Model, DomainError>
where
    C: ConnectionTrait,
{
    let unit_price = match item.unit_price {
        Some(price) => encode_price(price),
        None => {
            let product = ProductEntity::find_by_id(item.product_id)
                .one(conn)
                .await?
                .ok_or_else(|| {
                    DomainError::Validation(format!(
                        "Product {} does not exist",
                        item.product_id
                    ))
                })?;
            encode_price(decode_price(&product.unit_price)?)
        }
    };

    let line = order_item::ActiveModel {
        order_id: Set(order_id),
        product_id: Set(item.product_id),
        quantity: Set(item.quantity),
        unit_price: Set(unit_price),
        ..Default::default()
    };

    line.insert(conn).await.map_err(write_error)
}

#[async_trait]
impl OrderRepository for SeaOrmOrderRepository {
    async fn find_all(&self) -> Result<Vec<Order>, DomainError> {
        OrderEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Order>, DomainError> {
        OrderEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn find_by_customer(&self, customer_id: i32) -> Result<Vec<Order>, DomainError> {
        OrderEntity::find()
            .filter(Column::CustomerId.eq(customer_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn create(&self, input: CreateOrderInput) -> Result<Order, DomainError> {
        input.validate()?;

        let txn = self.db.begin().await?;

        let mut new_order = ActiveModel {
            customer_id: Set(input.customer_id),
            ..Default::default()
        };
        if let Some(status) = input.payment_status {
            new_order.payment_status = Set(status);
        }
        let order = new_order.insert(&txn).await.map_err(write_error)?;

        let line_count = input.items.len();
        for item in input.items {
            insert_item(&txn, order.id, item).await?;
        }

        txn.commit().await?;
        tracing::info!(
            "Order {} placed for customer {} ({} lines)",
            order.id,
            order.customer_id,
            line_count
        );

        to_domain(order)
    }

    async fn update_payment_status(
        &self,
        id: i32,
        status: PaymentStatus,
    ) -> Result<Order, DomainError> {
        let existing = OrderEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.payment_status = Set(status);
        let result = active.update(&self.db).await?;

        tracing::debug!("Order {} payment status -> {}", id, status.label());
        to_domain(result)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = OrderEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| delete_error("order", id, e))?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }

    async fn items(&self, order_id: i32) -> Result<Vec<OrderItem>, DomainError> {
        OrderItemEntity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .order_by_asc(order_item::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(item_to_domain)
            .collect()
    }

    async fn add_item(&self, order_id: i32, item: NewOrderItem) -> Result<OrderItem, DomainError> {
        item.validate()?;

        if OrderEntity::find_by_id(order_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(DomainError::NotFound);
        }

        let line = insert_item(&self.db, order_id, item).await?;
        item_to_domain(line)
    }

    async fn remove_item(&self, item_id: i32) -> Result<(), DomainError> {
        let result = OrderItemEntity::delete_by_id(item_id)
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }
}
