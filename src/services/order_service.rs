use crate::entities::{
    DeliveryType, OrderLine, OrderLines, OrderStatus, PaymentStatus, menu_item_entity as menu_items,
    order_entity as orders,
};
use crate::error::{AppError, AppResult};
use crate::external::PaymentGateway;
use crate::models::*;
use crate::utils::{
    BusinessHours, Clock, OrderNumberGenerator, checked_email, compute_cart_totals,
    require_non_empty, resolve_unit_price,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::HashMap;
use std::sync::Arc;

pub const MAX_LINE_QUANTITY: i32 = 99;
pub const MAX_SPECIAL_INSTRUCTIONS: usize = 500;

#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
    payments: Arc<dyn PaymentGateway>,
    hours: BusinessHours,
    clock: Arc<dyn Clock>,
    numbers: Arc<OrderNumberGenerator>,
}

impl OrderService {
    pub fn new(
        pool: DatabaseConnection,
        payments: Arc<dyn PaymentGateway>,
        hours: BusinessHours,
        clock: Arc<dyn Clock>,
        numbers: Arc<OrderNumberGenerator>,
    ) -> Self {
        Self {
            pool,
            payments,
            hours,
            clock,
            numbers,
        }
    }

    /// Validates, prices and persists a cart, then opens a payment intent for
    /// card and NFC orders. A gateway failure leaves the order pending with no
    /// intent.
    pub async fn create_order(&self, req: CreateOrderRequest) -> AppResult<CreateOrderResponse> {
        let customer_name = require_non_empty(&req.customer_name, "customerName")?;
        let customer_email = checked_email(&req.customer_email)?;
        let customer_phone = require_non_empty(&req.customer_phone, "customerPhone")?;
        if req.items.is_empty() {
            return Err(AppError::ValidationError(
                "Order must contain at least one item".to_string(),
            ));
        }
        for line in &req.items {
            if !(1..=MAX_LINE_QUANTITY).contains(&line.quantity) {
                return Err(AppError::ValidationError(format!(
                    "Quantity must be between 1 and {MAX_LINE_QUANTITY}"
                )));
            }
        }
        let special_instructions = req
            .special_instructions
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if special_instructions
            .as_ref()
            .is_some_and(|s| s.chars().count() > MAX_SPECIAL_INSTRUCTIONS)
        {
            return Err(AppError::ValidationError(format!(
                "Special instructions must be at most {MAX_SPECIAL_INSTRUCTIONS} characters"
            )));
        }

        let now = self.clock.now();
        if !self.hours.is_business_hours(&now) {
            return Err(AppError::Closed);
        }
        // One evaluation for the whole cart.
        let happy = self.hours.is_happy_hour(&now);

        let mut lines = Vec::with_capacity(req.items.len());
        for line in &req.items {
            let item = menu_items::Entity::find_by_id(line.menu_item_id)
                .one(&self.pool)
                .await?;
            let item = match item {
                Some(item) if item.is_available => item,
                Some(item) => return Err(AppError::ItemUnavailable(item.name)),
                None => {
                    return Err(AppError::ItemUnavailable(format!(
                        "#{}",
                        line.menu_item_id
                    )));
                }
            };
            let price = resolve_unit_price(&item, happy, self.hours.happy_hour_discount_percent);
            lines.push(OrderLine::new(item.id, item.name, line.quantity, price)?);
        }

        let totals = compute_cart_totals(&lines)?;
        let payment_method = req.payment_method;
        let order_number = self.numbers.next(Utc::now());
        let stamp = Utc::now();

        let order = orders::ActiveModel {
            order_number: Set(order_number),
            customer_name: Set(customer_name),
            customer_email: Set(customer_email),
            customer_phone: Set(customer_phone),
            items: Set(OrderLines(lines)),
            subtotal: Set(totals.subtotal),
            tax: Set(totals.tax),
            total: Set(totals.total),
            status: Set(OrderStatus::Pending),
            payment_status: Set(PaymentStatus::Pending),
            payment_method: Set(payment_method),
            payment_intent_id: Set(None),
            delivery_type: Set(req.delivery_type),
            special_instructions: Set(special_instructions),
            created_at: Set(stamp),
            updated_at: Set(stamp),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!(
            "Order {} created: total={} cents, happy_hour={}",
            order.order_number,
            order.total,
            happy
        );

        if !payment_method.is_some_and(|m| m.is_electronic()) {
            return Ok(CreateOrderResponse {
                order: order.into(),
                payment_intent: None,
            });
        }

        let mut metadata = HashMap::new();
        metadata.insert("order_id".to_string(), order.id.to_string());
        metadata.insert("order_number".to_string(), order.order_number.clone());

        match self.payments.create_payment_intent(order.total, metadata).await {
            Ok(intent) => {
                let mut am = order.into_active_model();
                am.payment_intent_id = Set(Some(intent.id.clone()));
                am.updated_at = Set(Utc::now());
                let order = am.update(&self.pool).await?;
                Ok(CreateOrderResponse {
                    order: order.into(),
                    payment_intent: Some(PaymentIntentResponse {
                        id: intent.id,
                        client_secret: intent.client_secret,
                    }),
                })
            }
            Err(e) => {
                log::error!(
                    "Payment intent for order {} failed: {e}",
                    order.order_number
                );
                Ok(CreateOrderResponse {
                    order: order.into(),
                    payment_intent: None,
                })
            }
        }
    }

    pub async fn get_order(&self, id: i64) -> AppResult<OrderResponse> {
        Ok(self.find(id).await?.into())
    }

    /// Newest first, optionally filtered by status.
    pub async fn list_orders(&self, query: &OrderQuery) -> AppResult<PaginatedResponse<OrderResponse>> {
        let params = query.pagination();

        let mut select = orders::Entity::find();
        if let Some(status) = query.status {
            select = select.filter(orders::Column::Status.eq(status));
        }

        let total = select.clone().count(&self.pool).await?;
        let rows = select
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            rows.into_iter().map(OrderResponse::from).collect(),
            params.get_page(),
            params.get_limit(),
            total,
        ))
    }

    /// Staff override: any status may be set from any other.
    pub async fn update_status(&self, id: i64, status: OrderStatus) -> AppResult<OrderResponse> {
        let order = self.find(id).await?;
        let previous = order.status;
        let mut am = order.into_active_model();
        am.status = Set(status);
        am.updated_at = Set(Utc::now());
        let order = am.update(&self.pool).await?;
        log::info!(
            "Order {} status {} -> {}",
            order.order_number,
            previous,
            status
        );
        Ok(order.into())
    }

    /// Marks the order paid once the gateway reports the intent settled.
    /// Orders without an intent are settled in person and are marked paid
    /// directly.
    pub async fn confirm_payment(&self, id: i64) -> AppResult<OrderResponse> {
        let order = self.find(id).await?;
        if order.payment_status == PaymentStatus::Paid {
            return Ok(order.into());
        }

        let settled = match order.payment_intent_id.as_deref() {
            Some(intent_id) => self.payments.payment_succeeded(intent_id).await?,
            None => true,
        };
        if !settled {
            log::info!("Payment for order {} not settled yet", order.order_number);
            return Ok(order.into());
        }

        let mut am = order.into_active_model();
        am.payment_status = Set(PaymentStatus::Paid);
        am.updated_at = Set(Utc::now());
        let order = am.update(&self.pool).await?;
        log::info!("Order {} paid", order.order_number);
        Ok(order.into())
    }

    pub async fn refund(&self, id: i64, amount: Option<i64>) -> AppResult<RefundResponse> {
        let order = self.find(id).await?;
        if order.payment_status != PaymentStatus::Paid {
            return Err(AppError::ValidationError(
                "Only paid orders can be refunded".to_string(),
            ));
        }
        let intent_id = order.payment_intent_id.clone().ok_or_else(|| {
            AppError::ValidationError("Order has no electronic payment to refund".to_string())
        })?;
        if let Some(amount) = amount
            && (amount <= 0 || amount > order.total)
        {
            return Err(AppError::ValidationError(
                "Refund amount must be positive and at most the order total".to_string(),
            ));
        }

        let refund_id = self.payments.refund(&intent_id, amount).await?;

        let mut am = order.into_active_model();
        am.payment_status = Set(PaymentStatus::Refunded);
        am.updated_at = Set(Utc::now());
        let order = am.update(&self.pool).await?;
        log::info!("Order {} refunded ({refund_id})", order.order_number);

        Ok(RefundResponse {
            order: order.into(),
            refund_id,
        })
    }

    async fn find(&self, id: i64) -> AppResult<orders::Model> {
        orders::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{MenuCategory, PaymentMethod};
    use crate::test_utils::{FakePaymentGateway, create_menu_item, setup_test_db};
    use crate::utils::{FixedClock, HourWindow, local_time};

    fn hours() -> BusinessHours {
        BusinessHours {
            open: HourWindow::new(8, 15),
            happy_hour: HourWindow::new(11, 13),
            happy_hour_discount_percent: None,
        }
    }

    fn service(
        db: DatabaseConnection,
        gateway: Arc<FakePaymentGateway>,
        hour: u32,
        minute: u32,
    ) -> OrderService {
        OrderService::new(
            db,
            gateway,
            hours(),
            Arc::new(FixedClock(local_time(hour, minute))),
            Arc::new(OrderNumberGenerator::default()),
        )
    }

    fn request(menu_item_id: i64, quantity: i32, method: Option<PaymentMethod>) -> CreateOrderRequest {
        CreateOrderRequest {
            customer_name: "Ana".to_string(),
            customer_email: "Ana@Example.com".to_string(),
            customer_phone: "555-0100".to_string(),
            items: vec![OrderItemRequest {
                menu_item_id,
                quantity,
            }],
            payment_method: method,
            delivery_type: DeliveryType::DineIn,
            special_instructions: None,
        }
    }

    async fn order_count(db: &DatabaseConnection) -> u64 {
        orders::Entity::find().count(db).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_order_at_base_price() {
        let db = setup_test_db().await.unwrap();
        let item = create_menu_item(&db, "Pancakes", 800, MenuCategory::Breakfast, Some(600))
            .await
            .unwrap();
        let gateway = Arc::new(FakePaymentGateway::default());
        let svc = service(db, gateway.clone(), 9, 30);

        let resp = svc
            .create_order(request(item.id, 2, Some(PaymentMethod::Cash)))
            .await
            .unwrap();
        assert_eq!(resp.order.subtotal, 1600);
        assert_eq!(resp.order.tax, 112);
        assert_eq!(resp.order.total, 1712);
        assert_eq!(resp.order.items[0].price, 800);
        assert_eq!(resp.order.customer_email, "ana@example.com");
        assert_eq!(resp.order.status, OrderStatus::Pending);
        assert!(resp.payment_intent.is_none());
        assert_eq!(gateway.intent_count(), 0);
    }

    #[tokio::test]
    async fn test_create_order_during_happy_hour() {
        let db = setup_test_db().await.unwrap();
        let item = create_menu_item(&db, "Steak & Eggs", 1000, MenuCategory::Brunch, Some(800))
            .await
            .unwrap();
        let gateway = Arc::new(FakePaymentGateway::default());
        let svc = service(db, gateway, 12, 0);

        let resp = svc
            .create_order(request(item.id, 2, Some(PaymentMethod::Cash)))
            .await
            .unwrap();
        assert_eq!(resp.order.items[0].price, 800);
        assert_eq!(resp.order.items[0].subtotal, 1600);
        assert_eq!(resp.order.subtotal, 1600);
        assert_eq!(resp.order.tax, 112);
        assert_eq!(resp.order.total, 1712);
    }

    #[tokio::test]
    async fn test_card_order_opens_payment_intent() {
        let db = setup_test_db().await.unwrap();
        let item = create_menu_item(&db, "Pancakes", 800, MenuCategory::Breakfast, None)
            .await
            .unwrap();
        let gateway = Arc::new(FakePaymentGateway::default());
        let svc = service(db, gateway.clone(), 9, 0);

        let resp = svc
            .create_order(request(item.id, 1, Some(PaymentMethod::Card)))
            .await
            .unwrap();
        let intent = resp.payment_intent.unwrap();
        assert_eq!(resp.order.payment_intent_id.as_deref(), Some(intent.id.as_str()));

        let recorded = gateway.intents.lock().unwrap().clone();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].amount, resp.order.total);
        assert_eq!(
            recorded[0].metadata.get("order_number"),
            Some(&resp.order.order_number)
        );
    }

    #[tokio::test]
    async fn test_gateway_failure_keeps_pending_order() {
        let db = setup_test_db().await.unwrap();
        let item = create_menu_item(&db, "Pancakes", 800, MenuCategory::Breakfast, None)
            .await
            .unwrap();
        let gateway = Arc::new(FakePaymentGateway::failing());
        let svc = service(db.clone(), gateway, 9, 0);

        let resp = svc
            .create_order(request(item.id, 1, Some(PaymentMethod::Nfc)))
            .await
            .unwrap();
        assert!(resp.payment_intent.is_none());
        assert!(resp.order.payment_intent_id.is_none());
        assert_eq!(resp.order.payment_status, PaymentStatus::Pending);
        assert_eq!(order_count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_closed_rejects_without_side_effects() {
        let db = setup_test_db().await.unwrap();
        let item = create_menu_item(&db, "Pancakes", 800, MenuCategory::Breakfast, None)
            .await
            .unwrap();
        let gateway = Arc::new(FakePaymentGateway::default());
        let svc = service(db.clone(), gateway.clone(), 15, 0);

        let err = svc
            .create_order(request(item.id, 1, Some(PaymentMethod::Card)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Closed));
        assert_eq!(order_count(&db).await, 0);
        assert_eq!(gateway.intent_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let db = setup_test_db().await.unwrap();
        let gateway = Arc::new(FakePaymentGateway::default());
        let svc = service(db.clone(), gateway, 9, 0);

        let mut req = request(1, 1, None);
        req.items.clear();
        let err = svc.create_order(req).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(order_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_zero_quantity_is_rejected() {
        let db = setup_test_db().await.unwrap();
        let gateway = Arc::new(FakePaymentGateway::default());
        let err = service(db, gateway, 9, 0)
            .create_order(request(1, 0, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_unavailable_item_is_named() {
        let db = setup_test_db().await.unwrap();
        let item = create_menu_item(&db, "Pancakes", 800, MenuCategory::Breakfast, None)
            .await
            .unwrap();
        let mut am = item.clone().into_active_model();
        am.is_available = Set(false);
        am.update(&db).await.unwrap();

        let gateway = Arc::new(FakePaymentGateway::default());
        let svc = service(db.clone(), gateway, 9, 0);
        let err = svc.create_order(request(item.id, 1, None)).await.unwrap_err();
        match err {
            AppError::ItemUnavailable(name) => assert_eq!(name, "Pancakes"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(order_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_order_numbers_are_unique() {
        let db = setup_test_db().await.unwrap();
        let item = create_menu_item(&db, "Latte", 450, MenuCategory::CoffeeAndDrinks, None)
            .await
            .unwrap();
        let gateway = Arc::new(FakePaymentGateway::default());
        let svc = service(db, gateway, 9, 0);

        let a = svc.create_order(request(item.id, 1, None)).await.unwrap();
        let b = svc.create_order(request(item.id, 1, None)).await.unwrap();
        assert_ne!(a.order.order_number, b.order.order_number);
        assert!(a.order.order_number.starts_with("ORD-"));
    }

    #[tokio::test]
    async fn test_list_filters_and_paginates() {
        let db = setup_test_db().await.unwrap();
        let item = create_menu_item(&db, "Latte", 450, MenuCategory::CoffeeAndDrinks, None)
            .await
            .unwrap();
        let gateway = Arc::new(FakePaymentGateway::default());
        let svc = service(db, gateway, 9, 0);

        let mut ids = Vec::new();
        for _ in 0..3 {
            ids.push(svc.create_order(request(item.id, 1, None)).await.unwrap().order.id);
        }
        svc.update_status(ids[0], OrderStatus::Completed).await.unwrap();

        let pending = svc
            .list_orders(&OrderQuery {
                status: Some(OrderStatus::Pending),
                page: None,
                limit: None,
            })
            .await
            .unwrap();
        assert_eq!(pending.total, 2);

        let page = svc
            .list_orders(&OrderQuery {
                status: None,
                page: Some(2),
                limit: Some(2),
            })
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.pages, 2);
        assert_eq!(page.count, 1);
        assert_eq!(page.data[0].id, ids[0]);
    }

    #[tokio::test]
    async fn test_confirm_payment_waits_for_gateway() {
        let db = setup_test_db().await.unwrap();
        let item = create_menu_item(&db, "Pancakes", 800, MenuCategory::Breakfast, None)
            .await
            .unwrap();
        let gateway = Arc::new(FakePaymentGateway::default());
        let svc = service(db, gateway.clone(), 9, 0);

        let created = svc
            .create_order(request(item.id, 1, Some(PaymentMethod::Card)))
            .await
            .unwrap();

        let unsettled = svc.confirm_payment(created.order.id).await.unwrap();
        assert_eq!(unsettled.payment_status, PaymentStatus::Pending);

        gateway.set_settled(true);
        let paid = svc.confirm_payment(created.order.id).await.unwrap();
        assert_eq!(paid.payment_status, PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn test_confirm_cash_order_marks_paid() {
        let db = setup_test_db().await.unwrap();
        let item = create_menu_item(&db, "Pancakes", 800, MenuCategory::Breakfast, None)
            .await
            .unwrap();
        let gateway = Arc::new(FakePaymentGateway::default());
        let svc = service(db, gateway.clone(), 9, 0);

        let created = svc
            .create_order(request(item.id, 1, Some(PaymentMethod::Cash)))
            .await
            .unwrap();
        let paid = svc.confirm_payment(created.order.id).await.unwrap();
        assert_eq!(paid.payment_status, PaymentStatus::Paid);
        assert_eq!(gateway.status_checks.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_refund_requires_paid_card_order() {
        let db = setup_test_db().await.unwrap();
        let item = create_menu_item(&db, "Pancakes", 800, MenuCategory::Breakfast, None)
            .await
            .unwrap();
        let gateway = Arc::new(FakePaymentGateway::default());
        let svc = service(db, gateway.clone(), 9, 0);

        let created = svc
            .create_order(request(item.id, 1, Some(PaymentMethod::Card)))
            .await
            .unwrap();
        assert!(svc.refund(created.order.id, None).await.is_err());

        gateway.set_settled(true);
        svc.confirm_payment(created.order.id).await.unwrap();

        let too_much = svc.refund(created.order.id, Some(created.order.total + 1)).await;
        assert!(matches!(too_much, Err(AppError::ValidationError(_))));

        let refunded = svc.refund(created.order.id, None).await.unwrap();
        assert_eq!(refunded.order.payment_status, PaymentStatus::Refunded);
        assert_eq!(gateway.refunds.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_order_is_not_found() {
        let db = setup_test_db().await.unwrap();
        let gateway = Arc::new(FakePaymentGateway::default());
        let svc = service(db, gateway, 9, 0);
        assert!(matches!(svc.get_order(7).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            svc.update_status(7, OrderStatus::Ready).await,
            Err(AppError::NotFound(_))
        ));
    }
}
