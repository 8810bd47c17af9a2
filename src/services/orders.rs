use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{order, order_drink, order_item, store_settings};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender, OrderDelta};
use crate::models::{DiningOption, OrderStatus, PaymentMethod};
use crate::services::queue::QueueAllocator;

/// Request/Response types for the order service

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    pub level_pedas: String,
    pub kuah: String,
    pub rasa: String,
    pub telur: String,
    pub sayur: String,
    #[serde(default)]
    pub toppings: Vec<String>,
    pub price: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDrinkPayload {
    pub name: String,
    pub quantity: i32,
    pub price: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(length(min = 1, message = "Dining option is required"))]
    pub dining_option: String,
    #[validate(length(min = 1, message = "Payment method is required"))]
    pub payment_method: String,
    #[serde(default)]
    pub special_request: Option<String>,
    /// The order form submits configured bowls under this key.
    #[serde(default)]
    pub bowls: Vec<OrderItemPayload>,
    #[serde(default)]
    pub drinks: Vec<OrderDrinkPayload>,
    /// Client-computed total; recomputed from the cart when absent.
    #[serde(default)]
    pub total_price: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditOrderRequest {
    #[serde(default)]
    pub items: Vec<OrderItemPayload>,
    #[serde(default)]
    pub drinks: Vec<OrderDrinkPayload>,
    #[serde(default)]
    pub special_request: Option<String>,
    #[serde(default)]
    pub total_price: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderListFilter {
    pub status: Option<OrderStatus>,
    pub today: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub level_pedas: String,
    pub kuah: String,
    pub rasa: String,
    pub telur: String,
    pub sayur: String,
    pub toppings: Vec<String>,
    pub price: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDrinkResponse {
    pub id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub price: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub queue_number: String,
    pub customer_name: String,
    pub dining_option: String,
    pub payment_method: String,
    pub status: String,
    pub special_request: Option<String>,
    pub total_price: i64,
    pub items: Vec<OrderItemResponse>,
    pub drinks: Vec<OrderDrinkResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub voided_at: Option<DateTime<Utc>>,
    pub void_reason: Option<String>,
}

impl OrderResponse {
    fn from_parts(
        order: order::Model,
        items: Vec<order_item::Model>,
        drinks: Vec<order_drink::Model>,
    ) -> Self {
        Self {
            id: order.id,
            queue_number: order.queue_number,
            customer_name: order.customer_name,
            dining_option: order.dining_option,
            payment_method: order.payment_method,
            status: order.status,
            special_request: order.special_request,
            total_price: order.total_price,
            items: items
                .into_iter()
                .map(|item| OrderItemResponse {
                    id: item.id,
                    toppings: item.topping_names(),
                    level_pedas: item.level_pedas,
                    kuah: item.kuah,
                    rasa: item.rasa,
                    telur: item.telur,
                    sayur: item.sayur,
                    price: item.price,
                })
                .collect(),
            drinks: drinks
                .into_iter()
                .map(|drink| OrderDrinkResponse {
                    id: drink.id,
                    name: drink.name,
                    quantity: drink.quantity,
                    price: drink.price,
                })
                .collect(),
            created_at: order.created_at,
            updated_at: order.updated_at,
            voided_at: order.voided_at,
            void_reason: order.void_reason,
        }
    }

    fn delta(&self) -> OrderDelta {
        OrderDelta {
            id: self.id,
            queue_number: self.queue_number.clone(),
            status: self.status.clone(),
        }
    }
}

/// Service for managing orders.
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
    queue: Arc<QueueAllocator>,
    event_sender: Option<Arc<EventSender>>,
}

impl OrderService {
    pub fn new(
        db_pool: Arc<DbPool>,
        queue: Arc<QueueAllocator>,
        event_sender: Option<Arc<EventSender>>,
    ) -> Self {
        Self {
            db_pool,
            queue,
            event_sender,
        }
    }

    /// Creates a new order: store-open gate, queue-number allocation, then
    /// the order with its items and drinks in one transaction.
    #[instrument(skip(self, request), fields(customer_name = %request.customer_name))]
    pub async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        request.validate()?;

        let dining_option = DiningOption::parse_loose(&request.dining_option).ok_or_else(|| {
            ServiceError::ValidationError(format!(
                "Invalid dining option: {}",
                request.dining_option
            ))
        })?;
        let payment_method = PaymentMethod::parse_loose(&request.payment_method).ok_or_else(|| {
            ServiceError::ValidationError(format!(
                "Invalid payment method: {}",
                request.payment_method
            ))
        })?;

        if request.bowls.is_empty() && request.drinks.is_empty() {
            return Err(ServiceError::ValidationError(
                "Order must have at least one item".to_string(),
            ));
        }

        let db = &*self.db_pool;

        let settings = store_settings::Entity::find_by_id("default").one(db).await?;
        if let Some(settings) = settings {
            if !settings.is_open {
                return Err(ServiceError::StoreClosed);
            }
        }

        let total_price = request
            .total_price
            .unwrap_or_else(|| cart_total(&request.bowls, &request.drinks));

        let queue_number = self.queue.next_queue_number(dining_option).await?;

        let now = Utc::now();
        let order_id = Uuid::new_v4();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for order creation");
            ServiceError::DatabaseError(e)
        })?;

        let order_model = order::ActiveModel {
            id: Set(order_id),
            queue_number: Set(queue_number.clone()),
            customer_name: Set(request.customer_name.clone()),
            dining_option: Set(dining_option.to_string()),
            payment_method: Set(payment_method.to_string()),
            status: Set(OrderStatus::Pending.to_string()),
            special_request: Set(request.special_request.clone()),
            total_price: Set(total_price),
            created_at: Set(now),
            updated_at: Set(Some(now)),
            voided_at: Set(None),
            void_reason: Set(None),
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(request.bowls.len());
        for bowl in &request.bowls {
            let item = order_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                level_pedas: Set(bowl.level_pedas.clone()),
                kuah: Set(bowl.kuah.clone()),
                rasa: Set(bowl.rasa.clone()),
                telur: Set(bowl.telur.clone()),
                sayur: Set(bowl.sayur.clone()),
                toppings: Set(serde_json::json!(bowl.toppings)),
                price: Set(bowl.price),
            }
            .insert(&txn)
            .await?;
            items.push(item);
        }

        let mut drinks = Vec::with_capacity(request.drinks.len());
        for drink in &request.drinks {
            let inserted = order_drink::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                name: Set(drink.name.clone()),
                quantity: Set(drink.quantity),
                price: Set(drink.price),
            }
            .insert(&txn)
            .await?;
            drinks.push(inserted);
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit order creation");
            ServiceError::DatabaseError(e)
        })?;

        info!(order_id = %order_id, queue_number = %queue_number, "Order created successfully");

        let response = OrderResponse::from_parts(order_model, items, drinks);
        self.emit(Event::OrderCreated(response.clone())).await;

        Ok(response)
    }

    /// Retrieves an order by ID with its items and drinks.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<Option<OrderResponse>, ServiceError> {
        let db = &*self.db_pool;

        let order = order::Entity::find_by_id(order_id).one(db).await?;

        match order {
            Some(order) => {
                let mut responses = self.attach_children(vec![order]).await?;
                Ok(responses.pop())
            }
            None => Ok(None),
        }
    }

    /// Lists orders newest first, optionally filtered by status and/or
    /// restricted to today's local calendar day.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        filter: OrderListFilter,
    ) -> Result<Vec<OrderResponse>, ServiceError> {
        let db = &*self.db_pool;

        let mut query = order::Entity::find().order_by_desc(order::Column::CreatedAt);

        if let Some(status) = filter.status {
            query = query.filter(order::Column::Status.eq(status.to_string()));
        }
        if filter.today {
            let (start, _end) = super::local_day_bounds(super::today_local())?;
            query = query.filter(order::Column::CreatedAt.gte(start));
        }

        let orders = query.all(db).await?;
        self.attach_children(orders).await
    }

    /// All orders in a non-terminal status, newest first. This is the
    /// snapshot a freshly connected dashboard receives.
    pub async fn active_orders(&self) -> Result<Vec<OrderResponse>, ServiceError> {
        let db = &*self.db_pool;

        let active: Vec<String> = OrderStatus::active_set()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let orders = order::Entity::find()
            .filter(order::Column::Status.is_in(active))
            .order_by_desc(order::Column::CreatedAt)
            .all(db)
            .await?;

        self.attach_children(orders).await
    }

    /// Advances an order along the lifecycle. The write is conditional on
    /// the status the guard saw, so two racing transitions cannot both
    /// succeed from the same stale read.
    #[instrument(skip(self), fields(order_id = %order_id, new_status = %new_status))]
    pub async fn update_status(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
    ) -> Result<OrderResponse, ServiceError> {
        let db = &*self.db_pool;

        let order = order::Entity::find_by_id(order_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))?;

        let current: OrderStatus = order.status.parse().map_err(|_| {
            ServiceError::InternalError(format!("Order has corrupt status: {}", order.status))
        })?;

        if !current.can_transition_to(new_status) {
            return Err(ServiceError::InvalidTransition {
                from: current,
                to: new_status,
            });
        }

        let result = order::Entity::update_many()
            .col_expr(order::Column::Status, Expr::value(new_status.to_string()))
            .col_expr(order::Column::UpdatedAt, Expr::value(Some(Utc::now())))
            .filter(order::Column::Id.eq(order_id))
            .filter(order::Column::Status.eq(current.to_string()))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::Conflict(
                "Order status changed concurrently, retry".to_string(),
            ));
        }

        let response = self
            .get_order(order_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))?;

        info!(order_id = %order_id, status = %new_status, "Order status updated");
        self.emit(Event::OrderUpdated(response.delta())).await;

        Ok(response)
    }

    /// Administrative cancellation with a recorded reason. Distinct from a
    /// plain status change: it also stamps `voided_at`, and a voided order
    /// is excluded from revenue regardless of its prior status.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn void_order(
        &self,
        order_id: Uuid,
        reason: Option<String>,
    ) -> Result<OrderResponse, ServiceError> {
        let db = &*self.db_pool;

        let order = order::Entity::find_by_id(order_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Pesanan tidak ditemukan".to_string()))?;

        if order.status == OrderStatus::Completed.to_string() {
            return Err(ServiceError::AlreadyCompleted);
        }
        if order.voided_at.is_some() {
            return Err(ServiceError::AlreadyVoided);
        }

        let now = Utc::now();
        let void_reason = reason.unwrap_or_else(|| "Dibatalkan oleh admin".to_string());

        let result = order::Entity::update_many()
            .col_expr(
                order::Column::Status,
                Expr::value(OrderStatus::Cancelled.to_string()),
            )
            .col_expr(order::Column::VoidedAt, Expr::value(Some(now)))
            .col_expr(order::Column::VoidReason, Expr::value(Some(void_reason)))
            .col_expr(order::Column::UpdatedAt, Expr::value(Some(now)))
            .filter(order::Column::Id.eq(order_id))
            .filter(order::Column::Status.eq(order.status.clone()))
            .filter(order::Column::VoidedAt.is_null())
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::Conflict(
                "Order was modified concurrently, retry".to_string(),
            ));
        }

        let response = self
            .get_order(order_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Pesanan tidak ditemukan".to_string()))?;

        info!(order_id = %order_id, queue_number = %response.queue_number, "Order voided");
        self.emit(Event::OrderUpdated(response.delta())).await;

        Ok(response)
    }

    /// Bulk-replaces an order's items and drinks. Only orders still in a
    /// non-terminal status can be edited.
    #[instrument(skip(self, request), fields(order_id = %order_id))]
    pub async fn edit_order(
        &self,
        order_id: Uuid,
        request: EditOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        let db = &*self.db_pool;

        let order = order::Entity::find_by_id(order_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Pesanan tidak ditemukan".to_string()))?;

        let current: OrderStatus = order.status.parse().map_err(|_| {
            ServiceError::InternalError(format!("Order has corrupt status: {}", order.status))
        })?;
        if current.is_terminal() {
            return Err(ServiceError::InvalidOperation(
                "Pesanan tidak dapat diedit".to_string(),
            ));
        }

        let txn = db.begin().await?;

        order_item::Entity::delete_many()
            .filter(order_item::Column::OrderId.eq(order_id))
            .exec(&txn)
            .await?;
        order_drink::Entity::delete_many()
            .filter(order_drink::Column::OrderId.eq(order_id))
            .exec(&txn)
            .await?;

        for item in &request.items {
            order_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                level_pedas: Set(item.level_pedas.clone()),
                kuah: Set(item.kuah.clone()),
                rasa: Set(item.rasa.clone()),
                telur: Set(item.telur.clone()),
                sayur: Set(item.sayur.clone()),
                toppings: Set(serde_json::json!(item.toppings)),
                price: Set(item.price),
            }
            .insert(&txn)
            .await?;
        }
        for drink in &request.drinks {
            order_drink::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                name: Set(drink.name.clone()),
                quantity: Set(drink.quantity),
                price: Set(drink.price),
            }
            .insert(&txn)
            .await?;
        }

        let mut active: order::ActiveModel = order.into();
        if let Some(total_price) = request.total_price {
            active.total_price = Set(total_price);
        }
        if let Some(special_request) = request.special_request {
            active.special_request = Set(Some(special_request));
        }
        active.updated_at = Set(Some(Utc::now()));
        active.update(&txn).await?;

        txn.commit().await?;

        let response = self
            .get_order(order_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Pesanan tidak ditemukan".to_string()))?;

        info!(order_id = %order_id, queue_number = %response.queue_number, "Order edited");
        self.emit(Event::OrderUpdated(response.delta())).await;

        Ok(response)
    }

    /// Hard-deletes an order with its children. Admin reset tooling path,
    /// not part of the customer-facing flow.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn delete_order(&self, order_id: Uuid) -> Result<String, ServiceError> {
        let db = &*self.db_pool;

        let order = order::Entity::find_by_id(order_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))?;

        let queue_number = order.queue_number.clone();

        // Children are removed explicitly rather than relying on the FK
        // cascade, which SQLite only honors with the pragma enabled.
        let txn = db.begin().await?;
        order_item::Entity::delete_many()
            .filter(order_item::Column::OrderId.eq(order_id))
            .exec(&txn)
            .await?;
        order_drink::Entity::delete_many()
            .filter(order_drink::Column::OrderId.eq(order_id))
            .exec(&txn)
            .await?;
        order::Entity::delete_by_id(order_id).exec(&txn).await?;
        txn.commit().await?;

        info!(order_id = %order_id, queue_number = %queue_number, "Order deleted");
        Ok(queue_number)
    }

    /// Batch-loads items and drinks for a page of orders.
    async fn attach_children(
        &self,
        orders: Vec<order::Model>,
    ) -> Result<Vec<OrderResponse>, ServiceError> {
        let db = &*self.db_pool;

        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();

        let mut items_by_order: HashMap<Uuid, Vec<order_item::Model>> = HashMap::new();
        for item in order_item::Entity::find()
            .filter(order_item::Column::OrderId.is_in(ids.clone()))
            .all(db)
            .await?
        {
            items_by_order.entry(item.order_id).or_default().push(item);
        }

        let mut drinks_by_order: HashMap<Uuid, Vec<order_drink::Model>> = HashMap::new();
        for drink in order_drink::Entity::find()
            .filter(order_drink::Column::OrderId.is_in(ids))
            .all(db)
            .await?
        {
            drinks_by_order
                .entry(drink.order_id)
                .or_default()
                .push(drink);
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let items = items_by_order.remove(&order.id).unwrap_or_default();
                let drinks = drinks_by_order.remove(&order.id).unwrap_or_default();
                OrderResponse::from_parts(order, items, drinks)
            })
            .collect())
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event).await {
                warn!(error = %e, "Failed to send order event");
            }
        }
    }
}

/// Cart total when the client does not supply one.
fn cart_total(bowls: &[OrderItemPayload], drinks: &[OrderDrinkPayload]) -> i64 {
    let bowls_total: i64 = bowls.iter().map(|b| b.price).sum();
    let drinks_total: i64 = drinks
        .iter()
        .map(|d| d.price * i64::from(d.quantity))
        .sum();
    bowls_total + drinks_total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bowl(price: i64) -> OrderItemPayload {
        OrderItemPayload {
            level_pedas: "Level 3".into(),
            kuah: "Banyak".into(),
            rasa: "Original".into(),
            telur: "Telur Utuh".into(),
            sayur: "Sawi".into(),
            toppings: vec!["Bakso".into()],
            price,
        }
    }

    #[test]
    fn cart_total_sums_bowls_and_drink_quantities() {
        let bowls = vec![bowl(15_000), bowl(18_000)];
        let drinks = vec![OrderDrinkPayload {
            name: "Es Teh".into(),
            quantity: 3,
            price: 5_000,
        }];
        assert_eq!(cart_total(&bowls, &drinks), 48_000);
    }

    #[test]
    fn cart_total_of_empty_cart_is_zero() {
        assert_eq!(cart_total(&[], &[]), 0);
    }

    #[test]
    fn create_request_rejects_blank_customer_name() {
        let request = CreateOrderRequest {
            customer_name: "".into(),
            dining_option: "DINE_IN".into(),
            payment_method: "CASH".into(),
            special_request: None,
            bowls: vec![bowl(15_000)],
            drinks: vec![],
            total_price: None,
        };
        assert!(request.validate().is_err());
    }
}
