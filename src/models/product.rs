use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

/// Placeholder slug used until a real one is assigned.
pub const DEFAULT_SLUG: &str = "-";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(default_value = "-")]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Fixed-point amount with two fractional digits, stored as text (e.g. "19.90").
    pub unit_price: String,
    pub inventory: i32,
    /// Stamped on every insert and update.
    pub last_update: String,
    pub collection_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::collection::Entity",
        from = "Column::CollectionId",
        to = "super::collection::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Collection,
    #[sea_orm(has_many = "super::product_promotion::Entity")]
    ProductPromotion,
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItem,
    #[sea_orm(has_many = "super::cart_item::Entity")]
    CartItem,
}

impl Related<super::collection::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Collection.def()
    }
}

impl Related<super::promotion::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_promotion::Relation::Promotion.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_promotion::Relation::Product.def().rev())
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItem.def()
    }
}

impl Related<super::cart_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItem.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            slug: Set(DEFAULT_SLUG.to_owned()),
            ..<Self as ActiveModelTrait>::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        self.last_update = Set(chrono::Utc::now().to_rfc3339());
        Ok(self)
    }
}
