use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    ToSchema,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(64))")]
pub enum MenuCategory {
    #[sea_orm(string_value = "Breakfast")]
    Breakfast,
    #[sea_orm(string_value = "Brunch")]
    Brunch,
    #[sea_orm(string_value = "Lunch")]
    Lunch,
    #[sea_orm(string_value = "Dinner")]
    Dinner,
    #[sea_orm(string_value = "Coffee & Drinks")]
    #[serde(rename = "Coffee & Drinks")]
    CoffeeAndDrinks,
    #[sea_orm(string_value = "Cocktails, Beer, Wine")]
    #[serde(rename = "Cocktails, Beer, Wine")]
    CocktailsBeerWine,
    #[sea_orm(string_value = "Vegetarian & Healthy Options")]
    #[serde(rename = "Vegetarian & Healthy Options")]
    VegetarianAndHealthy,
    #[sea_orm(string_value = "Kids Menu")]
    #[serde(rename = "Kids Menu")]
    KidsMenu,
}

impl std::fmt::Display for MenuCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MenuCategory::Breakfast => "Breakfast",
            MenuCategory::Brunch => "Brunch",
            MenuCategory::Lunch => "Lunch",
            MenuCategory::Dinner => "Dinner",
            MenuCategory::CoffeeAndDrinks => "Coffee & Drinks",
            MenuCategory::CocktailsBeerWine => "Cocktails, Beer, Wine",
            MenuCategory::VegetarianAndHealthy => "Vegetarian & Healthy Options",
            MenuCategory::KidsMenu => "Kids Menu",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "menu_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub price: i64, // cents
    pub category: MenuCategory,
    pub image_url: String,
    pub is_vegetarian: bool,
    pub is_gluten_free: bool,
    pub is_kids: bool,
    /// Cleared instead of deleting the row.
    pub is_available: bool,
    pub happy_hour_price: Option<i64>, // cents
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
