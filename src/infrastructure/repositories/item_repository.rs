//! SeaORM implementation of ItemRepository

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::domain::validation;
use crate::domain::{DomainError, Item, ItemRepository};
use crate::models::item::{ActiveModel, Column, Entity as ItemEntity};

/// SeaORM-based implementation of ItemRepository
pub struct SeaOrmItemRepository {
    db: DatabaseConnection,
}

impl SeaOrmItemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ItemRepository for SeaOrmItemRepository {
    async fn find_all(&self) -> Result<Vec<Item>, DomainError> {
        let items = ItemEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(items
            .into_iter()
            .map(|i| Item {
                id: i.id,
                title: i.title,
            })
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Item>, DomainError> {
        let item = ItemEntity::find_by_id(id).one(&self.db).await?;

        Ok(item.map(|i| Item {
            id: i.id,
            title: i.title,
        }))
    }

    async fn create(&self, title: String) -> Result<Item, DomainError> {
        validation::text("title", &title)?;

        let item = ActiveModel {
            title: Set(title),
            ..Default::default()
        };

        let result = item.insert(&self.db).await?;

        Ok(Item {
            id: result.id,
            title: result.title,
        })
    }

    async fn update(&self, id: i32, title: String) -> Result<Item, DomainError> {
        validation::text("title", &title)?;

        let existing = ItemEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.title = Set(title);
        let result = active.update(&self.db).await?;

        Ok(Item {
            id: result.id,
            title: result.title,
        })
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = ItemEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }
}
