use crate::models::order::OrderResponse;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PopularItem {
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BusinessStatus {
    pub is_open: bool,
    pub is_happy_hour: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub today_orders: u64,
    /// Cents collected today from paid orders.
    pub today_revenue: i64,
    pub pending_orders: u64,
    pub popular_items: Vec<PopularItem>,
    pub total_menu_items: u64,
    pub available_menu_items: u64,
    pub recent_orders: Vec<OrderResponse>,
    pub business_status: BusinessStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StatusBreakdown {
    pub pending: u64,
    pub confirmed: u64,
    pub preparing: u64,
    pub ready: u64,
    pub completed: u64,
    pub cancelled: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PaymentBreakdown {
    pub pending: u64,
    pub paid: u64,
    pub failed: u64,
    pub refunded: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatsResponse {
    pub total_orders: u64,
    pub by_status: StatusBreakdown,
    pub by_payment_status: PaymentBreakdown,
    pub total_revenue: i64,
    pub average_order_value: i64,
}

/// Both bounds must be present for the range to apply. Accepts RFC 3339
/// timestamps or `YYYY-MM-DD` (midnight UTC).
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct StatsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
