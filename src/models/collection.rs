use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    /// Cleared (not cascaded) when the featured product is deleted.
    pub featured_product_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // No reverse accessor on Product: a product only knows its owning collection.
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::FeaturedProductId",
        to = "super::product::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    FeaturedProduct,
    #[sea_orm(has_many = "super::product::Entity")]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
