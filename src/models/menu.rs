use crate::entities::{MenuCategory, menu_item_entity as menu_items};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Menu item as served to clients, priced for the moment of the request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Base price in cents.
    pub price: i64,
    pub category: MenuCategory,
    pub image_url: String,
    pub is_vegetarian: bool,
    pub is_gluten_free: bool,
    pub is_kids: bool,
    pub is_available: bool,
    pub happy_hour_price: Option<i64>,
    /// Price a cart would charge right now, in cents.
    pub current_price: i64,
    pub is_happy_hour: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MenuItemResponse {
    pub fn priced(item: menu_items::Model, current_price: i64, is_happy_hour: bool) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            price: item.price,
            category: item.category,
            image_url: item.image_url,
            is_vegetarian: item.is_vegetarian,
            is_gluten_free: item.is_gluten_free,
            is_kids: item.is_kids,
            is_available: item.is_available,
            happy_hour_price: item.happy_hour_price,
            current_price,
            is_happy_hour,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuListResponse {
    pub count: usize,
    pub is_happy_hour: bool,
    pub items: Vec<MenuItemResponse>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct MenuQuery {
    /// Category label, e.g. `Coffee & Drinks`.
    pub category: Option<MenuCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuItemRequest {
    #[schema(example = "Buttermilk Pancakes")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[schema(example = 800)]
    pub price: i64,
    pub category: MenuCategory,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub is_gluten_free: bool,
    #[serde(default)]
    pub is_kids: bool,
    #[serde(default)]
    pub is_available: Option<bool>,
    #[serde(default)]
    pub happy_hour_price: Option<i64>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub category: Option<MenuCategory>,
    pub image_url: Option<String>,
    pub is_vegetarian: Option<bool>,
    pub is_gluten_free: Option<bool>,
    pub is_kids: Option<bool>,
    pub is_available: Option<bool>,
    /// `Some(None)` clears the happy-hour price.
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<i64>)]
    pub happy_hour_price: Option<Option<i64>>,
}

mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Option<Option<i64>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<i64>::deserialize(deserializer).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let absent: UpdateMenuItemRequest = serde_json::from_str(r#"{"price": 900}"#).unwrap();
        assert_eq!(absent.happy_hour_price, None);

        let cleared: UpdateMenuItemRequest =
            serde_json::from_str(r#"{"happyHourPrice": null}"#).unwrap();
        assert_eq!(cleared.happy_hour_price, Some(None));

        let set: UpdateMenuItemRequest =
            serde_json::from_str(r#"{"happyHourPrice": 600}"#).unwrap();
        assert_eq!(set.happy_hour_price, Some(Some(600)));
    }

    #[test]
    fn test_category_label_deserializes() {
        let req: CreateMenuItemRequest = serde_json::from_str(
            r#"{"name":"Latte","price":450,"category":"Coffee & Drinks"}"#,
        )
        .unwrap();
        assert_eq!(req.category, MenuCategory::CoffeeAndDrinks);
        assert!(req.is_available.is_none());
    }
}
