use crate::entities::menu_item_entity as menu_items;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{BusinessHours, Clock, MAX_PRICE_CENTS, require_non_empty, resolve_unit_price};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct MenuService {
    pool: DatabaseConnection,
    hours: BusinessHours,
    clock: Arc<dyn Clock>,
}

impl MenuService {
    pub fn new(pool: DatabaseConnection, hours: BusinessHours, clock: Arc<dyn Clock>) -> Self {
        Self { pool, hours, clock }
    }

    fn price_item(&self, item: menu_items::Model, happy: bool) -> MenuItemResponse {
        let current = resolve_unit_price(&item, happy, self.hours.happy_hour_discount_percent);
        MenuItemResponse::priced(item, current, happy)
    }

    /// Available items, ordered by category then name.
    pub async fn list_menu(&self, query: &MenuQuery) -> AppResult<MenuListResponse> {
        let happy = self.hours.is_happy_hour(&self.clock.now());

        let mut select = menu_items::Entity::find().filter(menu_items::Column::IsAvailable.eq(true));
        if let Some(category) = query.category {
            select = select.filter(menu_items::Column::Category.eq(category));
        }

        let rows = select
            .order_by_asc(menu_items::Column::Category)
            .order_by_asc(menu_items::Column::Name)
            .all(&self.pool)
            .await?;

        let items: Vec<MenuItemResponse> =
            rows.into_iter().map(|m| self.price_item(m, happy)).collect();

        Ok(MenuListResponse {
            count: items.len(),
            is_happy_hour: happy,
            items,
        })
    }

    /// Any item by id, available or not.
    pub async fn get_menu_item(&self, id: i64) -> AppResult<MenuItemResponse> {
        let item = self.find(id).await?;
        let happy = self.hours.is_happy_hour(&self.clock.now());
        Ok(self.price_item(item, happy))
    }

    pub async fn create_menu_item(&self, req: CreateMenuItemRequest) -> AppResult<MenuItemResponse> {
        let name = require_non_empty(&req.name, "name")?;
        let description = require_non_empty(&req.description, "description")?;
        validate_price(req.price, "price")?;
        if let Some(hh) = req.happy_hour_price {
            validate_price(hh, "happyHourPrice")?;
        }

        let now = Utc::now();
        let item = menu_items::ActiveModel {
            name: Set(name),
            description: Set(description),
            price: Set(req.price),
            category: Set(req.category),
            image_url: Set(req.image_url.unwrap_or_default()),
            is_vegetarian: Set(req.is_vegetarian),
            is_gluten_free: Set(req.is_gluten_free),
            is_kids: Set(req.is_kids),
            is_available: Set(req.is_available.unwrap_or(true)),
            happy_hour_price: Set(req.happy_hour_price),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Menu item {} created: {}", item.id, item.name);
        let happy = self.hours.is_happy_hour(&self.clock.now());
        Ok(self.price_item(item, happy))
    }

    pub async fn update_menu_item(
        &self,
        id: i64,
        req: UpdateMenuItemRequest,
    ) -> AppResult<MenuItemResponse> {
        let mut am = self.find(id).await?.into_active_model();

        if let Some(name) = req.name {
            am.name = Set(require_non_empty(&name, "name")?);
        }
        if let Some(description) = req.description {
            am.description = Set(require_non_empty(&description, "description")?);
        }
        if let Some(price) = req.price {
            validate_price(price, "price")?;
            am.price = Set(price);
        }
        if let Some(category) = req.category {
            am.category = Set(category);
        }
        if let Some(image_url) = req.image_url {
            am.image_url = Set(image_url);
        }
        if let Some(v) = req.is_vegetarian {
            am.is_vegetarian = Set(v);
        }
        if let Some(v) = req.is_gluten_free {
            am.is_gluten_free = Set(v);
        }
        if let Some(v) = req.is_kids {
            am.is_kids = Set(v);
        }
        if let Some(v) = req.is_available {
            am.is_available = Set(v);
        }
        if let Some(hh) = req.happy_hour_price {
            if let Some(price) = hh {
                validate_price(price, "happyHourPrice")?;
            }
            am.happy_hour_price = Set(hh);
        }
        am.updated_at = Set(Utc::now());

        let item = am.update(&self.pool).await?;
        let happy = self.hours.is_happy_hour(&self.clock.now());
        Ok(self.price_item(item, happy))
    }

    /// Hides the item from the menu; the row stays for order history.
    pub async fn delete_menu_item(&self, id: i64) -> AppResult<()> {
        let mut am = self.find(id).await?.into_active_model();
        am.is_available = Set(false);
        am.updated_at = Set(Utc::now());
        am.update(&self.pool).await?;
        log::info!("Menu item {id} marked unavailable");
        Ok(())
    }

    async fn find(&self, id: i64) -> AppResult<menu_items::Model> {
        menu_items::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Menu item not found".to_string()))
    }
}

fn validate_price(price: i64, field: &str) -> AppResult<()> {
    if price < 0 {
        return Err(AppError::ValidationError(format!(
            "{field} must not be negative"
        )));
    }
    if price > MAX_PRICE_CENTS {
        return Err(AppError::ValidationError(format!(
            "{field} must be at most {MAX_PRICE_CENTS} cents"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::MenuCategory;
    use crate::test_utils::{create_menu_item, setup_test_db};
    use crate::utils::{FixedClock, HourWindow, local_time};

    fn hours() -> BusinessHours {
        BusinessHours {
            open: HourWindow::new(8, 15),
            happy_hour: HourWindow::new(11, 13),
            happy_hour_discount_percent: None,
        }
    }

    fn service_at(db: DatabaseConnection, hour: u32, minute: u32) -> MenuService {
        MenuService::new(db, hours(), Arc::new(FixedClock(local_time(hour, minute))))
    }

    #[tokio::test]
    async fn test_list_prices_happy_hour() {
        let db = setup_test_db().await.unwrap();
        create_menu_item(&db, "Pancakes", 800, MenuCategory::Breakfast, Some(600))
            .await
            .unwrap();
        create_menu_item(&db, "Latte", 450, MenuCategory::CoffeeAndDrinks, None)
            .await
            .unwrap();

        let service = service_at(db, 12, 0);
        let list = service.list_menu(&MenuQuery::default()).await.unwrap();
        assert!(list.is_happy_hour);
        assert_eq!(list.count, 2);

        let pancakes = list.items.iter().find(|i| i.name == "Pancakes").unwrap();
        assert_eq!(pancakes.current_price, 600);
        let latte = list.items.iter().find(|i| i.name == "Latte").unwrap();
        assert_eq!(latte.current_price, 450);
    }

    #[tokio::test]
    async fn test_list_outside_happy_hour_uses_base_price() {
        let db = setup_test_db().await.unwrap();
        create_menu_item(&db, "Pancakes", 800, MenuCategory::Breakfast, Some(600))
            .await
            .unwrap();

        let list = service_at(db, 13, 0).list_menu(&MenuQuery::default()).await.unwrap();
        assert!(!list.is_happy_hour);
        assert_eq!(list.items[0].current_price, 800);
    }

    #[tokio::test]
    async fn test_list_filters_by_category_and_sorts_by_name() {
        let db = setup_test_db().await.unwrap();
        create_menu_item(&db, "Waffles", 900, MenuCategory::Breakfast, None)
            .await
            .unwrap();
        create_menu_item(&db, "Eggs Benedict", 1200, MenuCategory::Breakfast, None)
            .await
            .unwrap();
        create_menu_item(&db, "Burger", 1400, MenuCategory::Lunch, None)
            .await
            .unwrap();

        let service = service_at(db, 9, 0);
        let list = service
            .list_menu(&MenuQuery {
                category: Some(MenuCategory::Breakfast),
            })
            .await
            .unwrap();
        let names: Vec<&str> = list.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Eggs Benedict", "Waffles"]);
    }

    #[tokio::test]
    async fn test_soft_deleted_item_hidden_but_fetchable() {
        let db = setup_test_db().await.unwrap();
        let item = create_menu_item(&db, "Pancakes", 800, MenuCategory::Breakfast, None)
            .await
            .unwrap();

        let service = service_at(db, 9, 0);
        service.delete_menu_item(item.id).await.unwrap();

        let list = service.list_menu(&MenuQuery::default()).await.unwrap();
        assert_eq!(list.count, 0);

        let fetched = service.get_menu_item(item.id).await.unwrap();
        assert!(!fetched.is_available);
    }

    #[tokio::test]
    async fn test_get_missing_item_is_not_found() {
        let db = setup_test_db().await.unwrap();
        let err = service_at(db, 9, 0).get_menu_item(42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_and_update() {
        let db = setup_test_db().await.unwrap();
        let service = service_at(db, 9, 0);

        let created = service
            .create_menu_item(CreateMenuItemRequest {
                name: "  Mimosa ".to_string(),
                description: "Orange juice and bubbles".to_string(),
                price: 1000,
                category: MenuCategory::CocktailsBeerWine,
                image_url: None,
                is_vegetarian: true,
                is_gluten_free: true,
                is_kids: false,
                is_available: None,
                happy_hour_price: Some(700),
            })
            .await
            .unwrap();
        assert_eq!(created.name, "Mimosa");
        assert!(created.is_available);

        let updated = service
            .update_menu_item(
                created.id,
                UpdateMenuItemRequest {
                    price: Some(1100),
                    happy_hour_price: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, 1100);
        assert_eq!(updated.happy_hour_price, None);
        assert_eq!(updated.name, "Mimosa");
    }

    #[tokio::test]
    async fn test_create_rejects_negative_price() {
        let db = setup_test_db().await.unwrap();
        let err = service_at(db, 9, 0)
            .create_menu_item(CreateMenuItemRequest {
                name: "Free lunch".to_string(),
                description: "On the house".to_string(),
                price: -1,
                category: MenuCategory::Lunch,
                image_url: None,
                is_vegetarian: false,
                is_gluten_free: false,
                is_kids: false,
                is_available: None,
                happy_hour_price: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_price_above_limit_rejected() {
        let db = setup_test_db().await.unwrap();
        let service = service_at(db.clone(), 9, 0);

        let err = service
            .create_menu_item(CreateMenuItemRequest {
                name: "Gold leaf steak".to_string(),
                description: "Very expensive".to_string(),
                price: i64::MAX / 4,
                category: MenuCategory::Lunch,
                image_url: None,
                is_vegetarian: false,
                is_gluten_free: false,
                is_kids: false,
                is_available: None,
                happy_hour_price: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let item = create_menu_item(&db, "Steak", 3000, MenuCategory::Lunch, None)
            .await
            .unwrap();
        let err = service
            .update_menu_item(
                item.id,
                UpdateMenuItemRequest {
                    happy_hour_price: Some(Some(MAX_PRICE_CENTS + 1)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let at_limit = service
            .update_menu_item(
                item.id,
                UpdateMenuItemRequest {
                    price: Some(MAX_PRICE_CENTS),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(at_limit.price, MAX_PRICE_CENTS);
    }
}
