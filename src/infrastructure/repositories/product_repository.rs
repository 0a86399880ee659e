//! SeaORM implementation of ProductRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};

use super::codec::{decode_price, decode_timestamp, encode_price};
use super::promotion_repository::promotion_from_model;
use super::{delete_error, write_error};
use crate::domain::{
    CreateProductInput, DomainError, Product, ProductRepository, Promotion, UpdateProductInput,
};
use crate::models::product::{ActiveModel, Column, Entity as ProductEntity, Model};
use crate::models::product_promotion::{
    self, ActiveModel as ProductPromotionActiveModel, Entity as ProductPromotionEntity,
};
use crate::models::promotion::Entity as PromotionEntity;

/// SeaORM-based implementation of ProductRepository
pub struct SeaOrmProductRepository {
    db: DatabaseConnection,
}

impl SeaOrmProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) fn product_from_model(p: Model) -> Result<Product, DomainError> {
    Ok(Product {
        unit_price: decode_price(&p.unit_price)?,
        last_update: decode_timestamp(&p.last_update)?,
        id: p.id,
        title: p.title,
        slug: p.slug,
        description: p.description,
        inventory: p.inventory,
        collection_id: p.collection_id,
    })
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, DomainError> {
        ProductEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(product_from_model)
            .collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, DomainError> {
        ProductEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(product_from_model)
            .transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Vec<Product>, DomainError> {
        ProductEntity::find()
            .filter(Column::Slug.eq(slug))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(product_from_model)
            .collect()
    }

    async fn create(&self, input: CreateProductInput) -> Result<Product, DomainError> {
        input.validate()?;

        // Default::default() goes through ActiveModelBehavior::new, which sets the placeholder slug
        let mut new_product = ActiveModel {
            title: Set(input.title),
            description: Set(input.description),
            unit_price: Set(encode_price(input.unit_price)),
            inventory: Set(input.inventory),
            collection_id: Set(input.collection_id),
            ..Default::default()
        };
        if let Some(slug) = input.slug {
            new_product.slug = Set(slug);
        }

        let result = new_product.insert(&self.db).await.map_err(write_error)?;
        tracing::debug!(
            "Created product {} '{}' in collection {}",
            result.id,
            result.title,
            result.collection_id
        );

        product_from_model(result)
    }

    async fn update(&self, id: i32, input: UpdateProductInput) -> Result<Product, DomainError> {
        input.validate()?;

        let existing = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(slug) = input.slug {
            active.slug = Set(slug);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(price) = input.unit_price {
            active.unit_price = Set(encode_price(price));
        }
        if let Some(inventory) = input.inventory {
            active.inventory = Set(inventory);
        }
        if let Some(collection_id) = input.collection_id {
            active.collection_id = Set(collection_id);
        }

        let result = active.update(&self.db).await.map_err(write_error)?;
        product_from_model(result)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = ProductEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| delete_error("product", id, e))?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        tracing::debug!("Deleted product {}", id);
        Ok(())
    }

    async fn promotions(&self, product_id: i32) -> Result<Vec<Promotion>, DomainError> {
        let product = ProductEntity::find_by_id(product_id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let promotions = product.find_related(PromotionEntity).all(&self.db).await?;
        Ok(promotions.into_iter().map(promotion_from_model).collect())
    }

    async fn add_promotion(&self, product_id: i32, promotion_id: i32) -> Result<(), DomainError> {
        let existing = ProductPromotionEntity::find_by_id((product_id, promotion_id))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Ok(());
        }

        let link = ProductPromotionActiveModel {
            product_id: Set(product_id),
            promotion_id: Set(promotion_id),
        };
        link.insert(&self.db).await.map_err(write_error)?;

        tracing::debug!("Linked promotion {} to product {}", promotion_id, product_id);
        Ok(())
    }

    async fn remove_promotion(
        &self,
        product_id: i32,
        promotion_id: i32,
    ) -> Result<(), DomainError> {
        let result = ProductPromotionEntity::delete_many()
            .filter(product_promotion::Column::ProductId.eq(product_id))
            .filter(product_promotion::Column::PromotionId.eq(promotion_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }
}
