use crate::entities::{
    DeliveryType, OrderLine, OrderStatus, PaymentMethod, PaymentStatus, order_entity as orders,
};
use crate::models::pagination::PaginationParams;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    #[schema(example = 1)]
    pub menu_item_id: i64,
    #[schema(example = 2)]
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[schema(example = "Ana Lima")]
    pub customer_name: String,
    #[schema(example = "ana@example.com")]
    pub customer_email: String,
    #[schema(example = "+1 555 0100")]
    pub customer_phone: String,
    pub items: Vec<OrderItemRequest>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    pub delivery_type: DeliveryType,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i64,
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub items: Vec<OrderLine>,
    pub subtotal: i64,
    pub tax: i64,
    pub total: i64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    pub payment_intent_id: Option<String>,
    pub delivery_type: DeliveryType,
    pub special_instructions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<orders::Model> for OrderResponse {
    fn from(order: orders::Model) -> Self {
        Self {
            id: order.id,
            order_number: order.order_number,
            customer_name: order.customer_name,
            customer_email: order.customer_email,
            customer_phone: order.customer_phone,
            items: order.items.0,
            subtotal: order.subtotal,
            tax: order.tax,
            total: order.total,
            status: order.status,
            payment_status: order.payment_status,
            payment_method: order.payment_method,
            payment_intent_id: order.payment_intent_id,
            delivery_type: order.delivery_type,
            special_instructions: order.special_instructions,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub id: String,
    pub client_secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order: OrderResponse,
    /// Null for cash orders, or when the gateway could not be reached.
    pub payment_intent: Option<PaymentIntentResponse>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl OrderQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RefundRequest {
    /// Cents to refund; the whole total when omitted.
    #[serde(default)]
    pub amount: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefundResponse {
    pub order: OrderResponse,
    pub refund_id: String,
}
