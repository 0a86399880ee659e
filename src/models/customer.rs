use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

/// Loyalty tier, stored as its one-letter code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(1))")]
pub enum Membership {
    #[default]
    #[sea_orm(string_value = "B")]
    Bronze,
    #[sea_orm(string_value = "S")]
    Silver,
    #[sea_orm(string_value = "G")]
    Gold,
}

impl Membership {
    pub fn label(&self) -> &'static str {
        match self {
            Membership::Bronze => "Bronze",
            Membership::Silver => "Silver",
            Membership::Gold => "Gold",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub given_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: String,
    pub birth_date: Option<String>, // YYYY-MM-DD
    pub membership: Membership,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::address::Entity")]
    Address,
    #[sea_orm(has_many = "super::order::Entity")]
    Order,
}

impl Related<super::address::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Address.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            membership: Set(Membership::default()),
            ..<Self as ActiveModelTrait>::default()
        }
    }
}
