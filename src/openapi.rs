use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Seblak API",
        version = "0.2.0",
        description = r#"
# Seblak Ordering & Back-Office API

Order intake, kitchen queue, daily revenue reporting, stock and store
settings for a single seblak outlet.

## Features

- **Orders**: multi-step order submission with per-channel daily queue numbers (`DIA-xxx` dine-in, `TAK-xxx` takeaway)
- **Live Stream**: server-sent events feed for the kitchen dashboard (`/api/orders/stream`)
- **Revenue**: daily revenue summary with payment split, hourly trend and top toppings
- **Stock**: ingredient stock levels with derived availability status
- **Settings**: store open/closed switch, notification toggles and payment details
- **Auth**: cookie-based admin sessions for the back office

## Error Handling

Every endpoint wraps its payload in the same envelope:

```json
{
  "success": false,
  "data": null,
  "message": "Cannot change status from PENDING to COMPLETED. Allowed: PREPARING, CANCELLED",
  "errors": null
}
```
        "#
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "orders", description = "Order intake and lifecycle"),
        (name = "revenue", description = "Daily revenue reporting"),
        (name = "stock", description = "Ingredient stock management"),
        (name = "settings", description = "Store settings"),
        (name = "auth", description = "Admin authentication")
    ),
    paths(
        // Orders
        crate::handlers::orders::create_order,
        crate::handlers::orders::list_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::update_order_status,
        crate::handlers::orders::void_order,
        crate::handlers::orders::edit_order,
        crate::handlers::orders::delete_order,
        crate::handlers::stream::order_stream,

        // Revenue
        crate::handlers::revenue::daily_revenue,

        // Stock
        crate::handlers::stock::list_stock,
        crate::handlers::stock::create_stock_item,
        crate::handlers::stock::update_stock_item,
        crate::handlers::stock::delete_stock_item,

        // Settings
        crate::handlers::settings::get_settings,
        crate::handlers::settings::update_settings,

        // Auth
        crate::handlers::auth::login,
        crate::handlers::auth::session,
        crate::handlers::auth::logout,
    ),
    components(
        schemas(
            // Common types
            crate::ApiResponse<serde_json::Value>,
            crate::errors::ErrorResponse,

            // Domain enums
            crate::models::OrderStatus,
            crate::models::DiningOption,
            crate::models::PaymentMethod,
            crate::models::StockStatus,

            // Order types
            crate::services::orders::CreateOrderRequest,
            crate::services::orders::EditOrderRequest,
            crate::services::orders::OrderItemPayload,
            crate::services::orders::OrderDrinkPayload,
            crate::services::orders::OrderResponse,
            crate::services::orders::OrderItemResponse,
            crate::services::orders::OrderDrinkResponse,
            crate::handlers::orders::UpdateStatusRequest,
            crate::handlers::orders::VoidOrderRequest,
            crate::handlers::orders::DeletedOrder,

            // Revenue types
            crate::services::revenue::RevenueSummary,
            crate::services::revenue::RevenueOrder,
            crate::services::revenue::HourlyBucket,
            crate::services::revenue::ToppingCount,

            // Stock types
            crate::services::stock::CreateStockItemRequest,
            crate::services::stock::UpdateStockItemRequest,
            crate::services::stock::StockStats,

            // Settings types
            crate::services::settings::UpdateSettingsRequest,

            // Auth types
            crate::services::auth::LoginRequest,
            crate::services::auth::SessionInfo,
        )
    )
)]
pub struct ApiDoc;

pub fn api_doc() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_covers_core_paths() {
        let openapi = api_doc();
        let json = serde_json::to_string(&openapi).unwrap();
        assert!(json.contains("Seblak API"));
        assert!(json.contains("/api/orders"));
        assert!(json.contains("/api/orders/stream"));
        assert!(json.contains("/api/revenue"));
        assert!(json.contains("/api/auth/login"));
    }
}
