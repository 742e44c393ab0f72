use crate::entities::{
    OrderStatus, PaymentStatus, menu_item_entity as menu_items, order_entity as orders,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::pricing::div_round;
use crate::utils::{BusinessHours, Clock};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use std::collections::HashMap;
use std::sync::Arc;

const POPULAR_ITEMS_LIMIT: usize = 5;
const POPULAR_ITEMS_DAYS: i64 = 30;
const RECENT_ORDERS_LIMIT: u64 = 10;

#[derive(Debug, FromQueryResult)]
struct OrderFigures {
    status: OrderStatus,
    payment_status: PaymentStatus,
    total: i64,
}

#[derive(Clone)]
pub struct AdminService {
    pool: DatabaseConnection,
    hours: BusinessHours,
    clock: Arc<dyn Clock>,
}

impl AdminService {
    pub fn new(pool: DatabaseConnection, hours: BusinessHours, clock: Arc<dyn Clock>) -> Self {
        Self { pool, hours, clock }
    }

    pub async fn dashboard(&self) -> AppResult<DashboardResponse> {
        let now = self.clock.now();
        let today_start = local_midnight(&now);

        let today = self
            .figures(Condition::all().add(orders::Column::CreatedAt.gte(today_start)))
            .await?;
        let today_revenue = today
            .iter()
            .filter(|o| o.payment_status == PaymentStatus::Paid)
            .map(|o| o.total)
            .sum();

        let pending_orders = orders::Entity::find()
            .filter(orders::Column::Status.eq(OrderStatus::Pending))
            .count(&self.pool)
            .await?;

        let since = now.with_timezone(&Utc) - Duration::days(POPULAR_ITEMS_DAYS);
        let recent_window = orders::Entity::find()
            .filter(orders::Column::CreatedAt.gte(since))
            .all(&self.pool)
            .await?;
        let popular_items = popular_items(&recent_window);

        let total_menu_items = menu_items::Entity::find().count(&self.pool).await?;
        let available_menu_items = menu_items::Entity::find()
            .filter(menu_items::Column::IsAvailable.eq(true))
            .count(&self.pool)
            .await?;

        let recent_orders = orders::Entity::find()
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
            .limit(RECENT_ORDERS_LIMIT)
            .all(&self.pool)
            .await?
            .into_iter()
            .map(OrderResponse::from)
            .collect();

        Ok(DashboardResponse {
            today_orders: today.len() as u64,
            today_revenue,
            pending_orders,
            popular_items,
            total_menu_items,
            available_menu_items,
            recent_orders,
            business_status: BusinessStatus {
                is_open: self.hours.is_business_hours(&now),
                is_happy_hour: self.hours.is_happy_hour(&now),
            },
        })
    }

    /// Aggregates over all orders, or over `[start, end]` when both bounds
    /// are given.
    pub async fn order_stats(&self, query: &StatsQuery) -> AppResult<OrderStatsResponse> {
        let mut cond = Condition::all();
        if let (Some(start), Some(end)) = (query.start_date.as_deref(), query.end_date.as_deref()) {
            let start = parse_bound(start)?;
            let end = parse_bound(end)?;
            if start > end {
                return Err(AppError::ValidationError(
                    "startDate must not be after endDate".to_string(),
                ));
            }
            cond = cond
                .add(orders::Column::CreatedAt.gte(start))
                .add(orders::Column::CreatedAt.lte(end));
        }

        let figures = self.figures(cond).await?;

        let mut by_status = StatusBreakdown::default();
        let mut by_payment_status = PaymentBreakdown::default();
        let mut total_revenue = 0i64;
        let mut paid_orders = 0i64;

        for order in &figures {
            match order.status {
                OrderStatus::Pending => by_status.pending += 1,
                OrderStatus::Confirmed => by_status.confirmed += 1,
                OrderStatus::Preparing => by_status.preparing += 1,
                OrderStatus::Ready => by_status.ready += 1,
                OrderStatus::Completed => by_status.completed += 1,
                OrderStatus::Cancelled => by_status.cancelled += 1,
            }
            match order.payment_status {
                PaymentStatus::Pending => by_payment_status.pending += 1,
                PaymentStatus::Paid => {
                    by_payment_status.paid += 1;
                    total_revenue += order.total;
                    paid_orders += 1;
                }
                PaymentStatus::Failed => by_payment_status.failed += 1,
                PaymentStatus::Refunded => by_payment_status.refunded += 1,
            }
        }

        let average_order_value = if paid_orders == 0 {
            0
        } else {
            div_round(total_revenue, paid_orders)
        };

        Ok(OrderStatsResponse {
            total_orders: figures.len() as u64,
            by_status,
            by_payment_status,
            total_revenue,
            average_order_value,
        })
    }

    async fn figures(&self, cond: Condition) -> AppResult<Vec<OrderFigures>> {
        Ok(orders::Entity::find()
            .filter(cond)
            .select_only()
            .column(orders::Column::Status)
            .column(orders::Column::PaymentStatus)
            .column(orders::Column::Total)
            .into_model::<OrderFigures>()
            .all(&self.pool)
            .await?)
    }
}

/// Start of the local day containing `now`, as UTC.
fn local_midnight(now: &DateTime<FixedOffset>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_hms_opt(0, 0, 0).unwrap_or_default();
    now.timezone()
        .from_local_datetime(&midnight)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| now.with_timezone(&Utc))
}

fn parse_bound(value: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| AppError::ValidationError(format!("Invalid date: {value}")))
}

/// Top items by quantity sold, ties broken by name.
fn popular_items(window: &[orders::Model]) -> Vec<PopularItem> {
    let mut totals: HashMap<&str, i64> = HashMap::new();
    for order in window {
        for line in &order.items.0 {
            *totals.entry(line.name.as_str()).or_default() += i64::from(line.quantity);
        }
    }
    let mut items: Vec<PopularItem> = totals
        .into_iter()
        .map(|(name, quantity)| PopularItem {
            name: name.to_string(),
            quantity,
        })
        .collect();
    items.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.name.cmp(&b.name)));
    items.truncate(POPULAR_ITEMS_LIMIT);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{DeliveryType, MenuCategory, PaymentMethod};
    use crate::services::OrderService;
    use crate::test_utils::{FakePaymentGateway, create_menu_item, setup_test_db};
    use crate::utils::{FixedClock, HourWindow, OrderNumberGenerator, local_time};

    fn hours() -> BusinessHours {
        BusinessHours {
            open: HourWindow::new(8, 15),
            happy_hour: HourWindow::new(11, 13),
            happy_hour_discount_percent: None,
        }
    }

    fn order_req(menu_item_id: i64, quantity: i32) -> CreateOrderRequest {
        CreateOrderRequest {
            customer_name: "Ana".to_string(),
            customer_email: "ana@example.com".to_string(),
            customer_phone: "555".to_string(),
            items: vec![OrderItemRequest {
                menu_item_id,
                quantity,
            }],
            payment_method: Some(PaymentMethod::Cash),
            delivery_type: DeliveryType::DineIn,
            special_instructions: None,
        }
    }

    #[test]
    fn test_parse_bound_formats() {
        assert_eq!(
            parse_bound("2025-06-01").unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_bound("2025-06-01T10:00:00+02:00").unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
        );
        assert!(parse_bound("yesterday").is_err());
    }

    #[test]
    fn test_local_midnight() {
        let now = local_time(14, 30);
        assert_eq!(
            local_midnight(&now),
            Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_stats_count_and_revenue() {
        let db = setup_test_db().await.unwrap();
        let pancakes = create_menu_item(&db, "Pancakes", 1000, MenuCategory::Breakfast, None)
            .await
            .unwrap();
        let clock = Arc::new(FixedClock(local_time(9, 0)));
        let orders = OrderService::new(
            db.clone(),
            Arc::new(FakePaymentGateway::default()),
            hours(),
            clock.clone(),
            Arc::new(OrderNumberGenerator::default()),
        );

        let a = orders.create_order(order_req(pancakes.id, 1)).await.unwrap();
        let b = orders.create_order(order_req(pancakes.id, 2)).await.unwrap();
        orders.create_order(order_req(pancakes.id, 1)).await.unwrap();
        orders.confirm_payment(a.order.id).await.unwrap();
        orders.confirm_payment(b.order.id).await.unwrap();
        orders
            .update_status(b.order.id, OrderStatus::Completed)
            .await
            .unwrap();

        let admin = AdminService::new(db, hours(), clock);
        let stats = admin.order_stats(&StatsQuery::default()).await.unwrap();
        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.by_status.pending, 2);
        assert_eq!(stats.by_status.completed, 1);
        assert_eq!(stats.by_payment_status.paid, 2);
        assert_eq!(stats.total_revenue, 1070 + 2140);
        assert_eq!(stats.average_order_value, 1605);
    }

    #[tokio::test]
    async fn test_stats_range_needs_both_bounds() {
        let db = setup_test_db().await.unwrap();
        let admin = AdminService::new(db, hours(), Arc::new(FixedClock(local_time(9, 0))));

        let only_start = admin
            .order_stats(&StatsQuery {
                start_date: Some("not a date".to_string()),
                end_date: None,
            })
            .await
            .unwrap();
        assert_eq!(only_start.total_orders, 0);
        assert_eq!(only_start.average_order_value, 0);

        let inverted = admin
            .order_stats(&StatsQuery {
                start_date: Some("2025-06-02".to_string()),
                end_date: Some("2025-06-01".to_string()),
            })
            .await;
        assert!(matches!(inverted, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_dashboard_summary() {
        let db = setup_test_db().await.unwrap();
        let pancakes = create_menu_item(&db, "Pancakes", 1000, MenuCategory::Breakfast, None)
            .await
            .unwrap();
        let latte = create_menu_item(&db, "Latte", 450, MenuCategory::CoffeeAndDrinks, None)
            .await
            .unwrap();
        create_menu_item(&db, "Retired", 100, MenuCategory::Lunch, None)
            .await
            .unwrap();
        let menu = crate::services::MenuService::new(
            db.clone(),
            hours(),
            Arc::new(FixedClock(local_time(9, 0))),
        );
        let retired = menu
            .list_menu(&MenuQuery {
                category: Some(MenuCategory::Lunch),
            })
            .await
            .unwrap();
        menu.delete_menu_item(retired.items[0].id).await.unwrap();

        // Order timestamps use the wall clock, so the dashboard reads "now" too.
        let clock = Arc::new(FixedClock(Utc::now().fixed_offset()));
        let orders = OrderService::new(
            db.clone(),
            Arc::new(FakePaymentGateway::default()),
            BusinessHours {
                open: HourWindow::new(0, 24),
                happy_hour: HourWindow::new(0, 0),
                happy_hour_discount_percent: None,
            },
            clock.clone(),
            Arc::new(OrderNumberGenerator::default()),
        );
        let paid = orders.create_order(order_req(latte.id, 3)).await.unwrap();
        orders.create_order(order_req(pancakes.id, 1)).await.unwrap();
        orders.confirm_payment(paid.order.id).await.unwrap();

        let admin = AdminService::new(db, hours(), clock);
        let dash = admin.dashboard().await.unwrap();
        assert_eq!(dash.today_orders, 2);
        assert_eq!(dash.today_revenue, paid.order.total);
        assert_eq!(dash.pending_orders, 2);
        assert_eq!(dash.total_menu_items, 3);
        assert_eq!(dash.available_menu_items, 2);
        assert_eq!(
            dash.popular_items[0],
            PopularItem {
                name: "Latte".to_string(),
                quantity: 3
            }
        );
        assert_eq!(dash.recent_orders.len(), 2);
    }
}
