use crate::middlewares::AdminUser;
use crate::models::*;
use crate::services::MenuService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/menu",
    tag = "menu",
    params(MenuQuery),
    responses(
        (status = 200, description = "Available menu items priced for now", body = MenuListResponse)
    )
)]
pub async fn list_menu(
    menu_service: web::Data<MenuService>,
    query: web::Query<MenuQuery>,
) -> Result<HttpResponse> {
    match menu_service.list_menu(&query).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "count": list.count,
            "isHappyHour": list.is_happy_hour,
            "data": list.items
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/menu/{id}",
    tag = "menu",
    params(("id" = i64, Path, description = "Menu item id")),
    responses(
        (status = 200, description = "Menu item", body = MenuItemResponse),
        (status = 404, description = "Menu item not found")
    )
)]
pub async fn get_menu_item(
    menu_service: web::Data<MenuService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match menu_service.get_menu_item(path.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": item
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/menu",
    tag = "menu",
    request_body = CreateMenuItemRequest,
    responses(
        (status = 201, description = "Menu item created", body = MenuItemResponse),
        (status = 400, description = "Invalid menu item"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_menu_item(
    _admin: AdminUser,
    menu_service: web::Data<MenuService>,
    request: web::Json<CreateMenuItemRequest>,
) -> Result<HttpResponse> {
    match menu_service.create_menu_item(request.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": item
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/menu/{id}",
    tag = "menu",
    params(("id" = i64, Path, description = "Menu item id")),
    request_body = UpdateMenuItemRequest,
    responses(
        (status = 200, description = "Menu item updated", body = MenuItemResponse),
        (status = 404, description = "Menu item not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_menu_item(
    _admin: AdminUser,
    menu_service: web::Data<MenuService>,
    path: web::Path<i64>,
    request: web::Json<UpdateMenuItemRequest>,
) -> Result<HttpResponse> {
    match menu_service
        .update_menu_item(path.into_inner(), request.into_inner())
        .await
    {
        Ok(item) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": item
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/menu/{id}",
    tag = "menu",
    params(("id" = i64, Path, description = "Menu item id")),
    responses(
        (status = 200, description = "Menu item hidden from the menu"),
        (status = 404, description = "Menu item not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_menu_item(
    _admin: AdminUser,
    menu_service: web::Data<MenuService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match menu_service.delete_menu_item(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": MessageResponse::new("Menu item deleted")
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn menu_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/menu")
            .route("", web::get().to(list_menu))
            .route("", web::post().to(create_menu_item))
            .route("/{id}", web::get().to(get_menu_item))
            .route("/{id}", web::put().to(update_menu_item))
            .route("/{id}", web::delete().to(delete_menu_item)),
    );
}
