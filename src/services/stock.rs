use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::stock_item;
use crate::errors::ServiceError;
use crate::models::StockStatus;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStockItemRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Unit is required"))]
    pub unit: String,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub emoji: Option<String>,
}

/// Partial update; absent fields keep their current value. A stock change
/// re-derives the status unless one is supplied explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStockItemRequest {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub stock: Option<i32>,
    pub status: Option<StockStatus>,
    pub is_available: Option<bool>,
    pub emoji: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockStats {
    pub total: u64,
    pub low_stock: u64,
    pub out_of_stock: u64,
}

#[derive(Clone)]
pub struct StockService {
    db_pool: Arc<DbPool>,
}

impl StockService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists all stock items, problem items first (OUT, LOW, then OK,
    /// alphabetical within each tier), with header stats.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<(Vec<stock_item::Model>, StockStats), ServiceError> {
        let db = &*self.db_pool;

        let mut items = stock_item::Entity::find().all(db).await?;
        items.sort_by(|a, b| {
            severity(&a.status)
                .cmp(&severity(&b.status))
                .then_with(|| a.name.cmp(&b.name))
        });

        let stats = StockStats {
            total: items.len() as u64,
            low_stock: items
                .iter()
                .filter(|i| i.status == StockStatus::Low.to_string())
                .count() as u64,
            out_of_stock: items
                .iter()
                .filter(|i| i.status == StockStatus::Out.to_string())
                .count() as u64,
        };

        Ok((items, stats))
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(
        &self,
        request: CreateStockItemRequest,
    ) -> Result<stock_item::Model, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let now = Utc::now();

        let item = stock_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            unit: Set(request.unit),
            stock: Set(request.stock),
            status: Set(StockStatus::derive(request.stock).to_string()),
            is_available: Set(true),
            emoji: Set(request.emoji),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        }
        .insert(db)
        .await?;

        info!(stock_item_id = %item.id, name = %item.name, "Stock item created");
        Ok(item)
    }

    #[instrument(skip(self, request), fields(stock_item_id = %id))]
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateStockItemRequest,
    ) -> Result<stock_item::Model, ServiceError> {
        let db = &*self.db_pool;

        let item = stock_item::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Stock item not found".to_string()))?;

        let mut active: stock_item::ActiveModel = item.into();

        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(unit) = request.unit {
            active.unit = Set(unit);
        }
        if let Some(is_available) = request.is_available {
            active.is_available = Set(is_available);
        }
        if let Some(emoji) = request.emoji {
            active.emoji = Set(Some(emoji));
        }
        if let Some(stock) = request.stock {
            active.stock = Set(stock);
            if request.status.is_none() {
                active.status = Set(StockStatus::derive(stock).to_string());
            }
        }
        if let Some(status) = request.status {
            active.status = Set(status.to_string());
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await?;
        info!(stock_item_id = %updated.id, name = %updated.name, "Stock item updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(stock_item_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<String, ServiceError> {
        let db = &*self.db_pool;

        let item = stock_item::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Stock item not found".to_string()))?;

        let name = item.name.clone();
        stock_item::Entity::delete_by_id(id).exec(db).await?;

        info!(stock_item_id = %id, name = %name, "Stock item deleted");
        Ok(name)
    }
}

fn severity(status: &str) -> u8 {
    status
        .parse::<StockStatus>()
        .map(StockStatus::severity_rank)
        .unwrap_or(u8::MAX)
}
