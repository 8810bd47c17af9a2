use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Singleton per-day queue counter (row id "default"). Counts reset to zero
/// the first time the allocator runs on a new calendar day. Mutated only
/// through `services::queue::QueueAllocator`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "queue_counters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Local calendar day the counts belong to, `YYYY-MM-DD`.
    pub date: String,
    pub dine_in: i32,
    pub takeaway: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
