//! SeaORM implementation of CollectionRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::product_repository::product_from_model;
use super::{delete_error, write_error};
use crate::domain::{
    Collection, CollectionRepository, CreateCollectionInput, DomainError, Product,
    UpdateCollectionInput,
};
use crate::models::collection::{ActiveModel, Column, Entity as CollectionEntity, Model};
use crate::models::product::{self, Entity as ProductEntity};

/// SeaORM-based implementation of CollectionRepository
pub struct SeaOrmCollectionRepository {
    db: DatabaseConnection,
}

impl SeaOrmCollectionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(col: Model) -> Collection {
    Collection {
        id: col.id,
        title: col.title,
        featured_product_id: col.featured_product_id,
    }
}

#[async_trait]
impl CollectionRepository for SeaOrmCollectionRepository {
    async fn find_all(&self) -> Result<Vec<Collection>, DomainError> {
        let collections = CollectionEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(collections.into_iter().map(to_domain).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Collection>, DomainError> {
        let collection = CollectionEntity::find_by_id(id).one(&self.db).await?;
        Ok(collection.map(to_domain))
    }

    async fn create(&self, input: CreateCollectionInput) -> Result<Collection, DomainError> {
        input.validate()?;

        let new_collection = ActiveModel {
            title: Set(input.title),
            featured_product_id: Set(input.featured_product_id),
            ..Default::default()
        };

        let result = new_collection.insert(&self.db).await.map_err(write_error)?;
        tracing::debug!("Created collection {} '{}'", result.id, result.title);

        Ok(to_domain(result))
    }

    async fn update(
        &self,
        id: i32,
        input: UpdateCollectionInput,
    ) -> Result<Collection, DomainError> {
        input.validate()?;

        let existing = CollectionEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(featured) = input.featured_product_id {
            active.featured_product_id = Set(featured);
        }

        let result = active.update(&self.db).await.map_err(write_error)?;
        Ok(to_domain(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = CollectionEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| delete_error("collection", id, e))?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        tracing::debug!("Deleted collection {}", id);
        Ok(())
    }

    async fn products(&self, collection_id: i32) -> Result<Vec<Product>, DomainError> {
        ProductEntity::find()
            .filter(product::Column::CollectionId.eq(collection_id))
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(product_from_model)
            .collect()
    }
}
