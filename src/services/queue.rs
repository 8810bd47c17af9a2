use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::db::DbPool;
use crate::entities::queue_counter;
use crate::errors::ServiceError;
use crate::models::DiningOption;

/// Singleton counter row id, one row tracks both channels.
const COUNTER_ID: &str = "default";

/// Hands out daily per-channel queue numbers (`DIA-001`, `TAK-014`, ...).
///
/// The read-reset-increment sequence runs inside one transaction and is
/// additionally serialized on a process-wide mutex, so two concurrent
/// submissions can never observe the same counter value. The first
/// allocation on a new local calendar day resets both channels to zero.
pub struct QueueAllocator {
    db_pool: Arc<DbPool>,
    lock: Mutex<()>,
}

impl QueueAllocator {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            db_pool,
            lock: Mutex::new(()),
        }
    }

    #[instrument(skip(self))]
    pub async fn next_queue_number(
        &self,
        dining_option: DiningOption,
    ) -> Result<String, ServiceError> {
        let _guard = self.lock.lock().await;

        let db = &*self.db_pool;
        let today = super::today_local().to_string();

        let txn = db.begin().await?;

        let counter = queue_counter::Entity::find_by_id(COUNTER_ID).one(&txn).await?;

        // A stale date means the first order of a new day; both channels
        // start over from zero.
        let (dine_in, takeaway) = match &counter {
            Some(c) if c.date == today => (c.dine_in, c.takeaway),
            _ => (0, 0),
        };

        let (dine_in, takeaway, sequence) = match dining_option {
            DiningOption::DineIn => (dine_in + 1, takeaway, dine_in + 1),
            DiningOption::Takeaway => (dine_in, takeaway + 1, takeaway + 1),
        };

        match counter {
            Some(existing) => {
                let mut active: queue_counter::ActiveModel = existing.into();
                active.date = Set(today);
                active.dine_in = Set(dine_in);
                active.takeaway = Set(takeaway);
                active.update(&txn).await?;
            }
            None => {
                queue_counter::ActiveModel {
                    id: Set(COUNTER_ID.to_string()),
                    date: Set(today),
                    dine_in: Set(dine_in),
                    takeaway: Set(takeaway),
                }
                .insert(&txn)
                .await?;
            }
        }

        txn.commit().await?;

        let queue_number = format_queue_number(dining_option, sequence);
        info!(queue_number = %queue_number, "Allocated queue number");
        Ok(queue_number)
    }
}

/// Zero-pads to three digits; a very busy day past 999 simply widens,
/// numbers never wrap or collide.
pub fn format_queue_number(dining_option: DiningOption, sequence: i32) -> String {
    format!("{}-{:03}", dining_option.queue_prefix(), sequence)
}
