//! SeaORM implementation of PromotionRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryOrder, Set,
};

use super::delete_error;
use super::product_repository::product_from_model;
use crate::domain::{
    CreatePromotionInput, DomainError, Product, Promotion, PromotionRepository,
    UpdatePromotionInput,
};
use crate::models::product::Entity as ProductEntity;
use crate::models::promotion::{ActiveModel, Column, Entity as PromotionEntity, Model};

/// SeaORM-based implementation of PromotionRepository
pub struct SeaOrmPromotionRepository {
    db: DatabaseConnection,
}

impl SeaOrmPromotionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) fn promotion_from_model(p: Model) -> Promotion {
    Promotion {
        id: p.id,
        description: p.description,
        discount: p.discount,
    }
}

#[async_trait]
impl PromotionRepository for SeaOrmPromotionRepository {
    async fn find_all(&self) -> Result<Vec<Promotion>, DomainError> {
        let promotions = PromotionEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(promotions.into_iter().map(promotion_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Promotion>, DomainError> {
        let promotion = PromotionEntity::find_by_id(id).one(&self.db).await?;
        Ok(promotion.map(promotion_from_model))
    }

    async fn create(&self, input: CreatePromotionInput) -> Result<Promotion, DomainError> {
        input.validate()?;

        let promotion = ActiveModel {
            description: Set(input.description),
            discount: Set(input.discount),
            ..Default::default()
        };

        let result = promotion.insert(&self.db).await?;
        tracing::debug!("Created promotion {} ({}% off)", result.id, result.discount);

        Ok(promotion_from_model(result))
    }

    async fn update(
        &self,
        id: i32,
        input: UpdatePromotionInput,
    ) -> Result<Promotion, DomainError> {
        input.validate()?;

        let existing = PromotionEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(discount) = input.discount {
            active.discount = Set(discount);
        }

        let result = active.update(&self.db).await?;
        Ok(promotion_from_model(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = PromotionEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| delete_error("promotion", id, e))?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }

    async fn products(&self, promotion_id: i32) -> Result<Vec<Product>, DomainError> {
        let promotion = PromotionEntity::find_by_id(promotion_id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        promotion
            .find_related(ProductEntity)
            .all(&self.db)
            .await?
            .into_iter()
            .map(product_from_model)
            .collect()
    }
}
