use crate::middlewares::AdminUser;
use crate::models::*;
use crate::services::AdminService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    tag = "admin",
    responses(
        (status = 200, description = "Today's figures and business status", body = DashboardResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn dashboard(
    _admin: AdminUser,
    admin_service: web::Data<AdminService>,
) -> Result<HttpResponse> {
    match admin_service.dashboard().await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": data
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/stats",
    tag = "admin",
    params(StatsQuery),
    responses(
        (status = 200, description = "Order counts and revenue", body = OrderStatsResponse),
        (status = 400, description = "Invalid date range")
    ),
    security(("bearer_auth" = []))
)]
pub async fn order_stats(
    _admin: AdminUser,
    admin_service: web::Data<AdminService>,
    query: web::Query<StatsQuery>,
) -> Result<HttpResponse> {
    match admin_service.order_stats(&query).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": stats
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/dashboard", web::get().to(dashboard))
            .route("/orders/stats", web::get().to(order_stats)),
    );
}
