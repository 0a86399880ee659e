use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "promotions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub description: String,
    pub discount: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_promotion::Entity")]
    ProductPromotion,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_promotion::Relation::Product.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_promotion::Relation::Promotion.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
