use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One customer transaction. Items ("bowls") and drinks are owned by
/// composition and cascade-deleted with the order.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Human-facing ticket id, e.g. `DIA-003`. Unique per calendar day
    /// and channel prefix (enforced by the queue allocator, not the schema,
    /// since the day is not part of the value).
    pub queue_number: String,

    pub customer_name: String,
    pub dining_option: String,
    pub payment_method: String,
    pub status: String,
    pub special_request: Option<String>,

    /// Total in integer rupiah; fixed at creation time.
    pub total_price: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub voided_at: Option<DateTime<Utc>>,
    pub void_reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItem,
    #[sea_orm(has_many = "super::order_drink::Entity")]
    OrderDrink,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItem.def()
    }
}

impl Related<super::order_drink::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderDrink.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
