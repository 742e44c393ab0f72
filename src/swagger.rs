use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{
    DeliveryType, MenuCategory, OrderLine, OrderStatus, PaymentMethod, PaymentStatus, UserRole,
};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::menu::list_menu,
        handlers::menu::get_menu_item,
        handlers::menu::create_menu_item,
        handlers::menu::update_menu_item,
        handlers::menu::delete_menu_item,
        handlers::order::create_order,
        handlers::order::get_order,
        handlers::order::list_orders,
        handlers::order::update_order_status,
        handlers::order::confirm_payment,
        handlers::order::refund_order,
        handlers::auth::register,
        handlers::auth::register_admin,
        handlers::auth::login,
        handlers::auth::google_login,
        handlers::auth::forgot_password,
        handlers::auth::reset_password,
        handlers::auth::me,
        handlers::admin::dashboard,
        handlers::admin::order_stats,
    ),
    components(
        schemas(
            HealthResponse,
            MessageResponse,
            ApiError,
            MenuCategory,
            MenuItemResponse,
            MenuListResponse,
            CreateMenuItemRequest,
            UpdateMenuItemRequest,
            OrderStatus,
            PaymentStatus,
            PaymentMethod,
            DeliveryType,
            OrderLine,
            OrderItemRequest,
            CreateOrderRequest,
            OrderResponse,
            PaymentIntentResponse,
            CreateOrderResponse,
            UpdateOrderStatusRequest,
            RefundRequest,
            RefundResponse,
            UserRole,
            UserResponse,
            RegisterRequest,
            RegisterAdminRequest,
            LoginRequest,
            GoogleLoginRequest,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            AuthResponse,
            PopularItem,
            BusinessStatus,
            DashboardResponse,
            StatusBreakdown,
            PaymentBreakdown,
            OrderStatsResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Liveness"),
        (name = "menu", description = "Menu browsing and management"),
        (name = "orders", description = "Checkout and order tracking"),
        (name = "auth", description = "Accounts and sessions"),
        (name = "admin", description = "Dashboard and reporting"),
    ),
    info(
        title = "Diner Backend API",
        version = "1.0.0",
        description = "REST API for menu browsing, ordering and restaurant administration"
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
