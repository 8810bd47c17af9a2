use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::db::DbPool;
use crate::errors::ServiceError;
use crate::events::EventSender;

pub mod auth;
pub mod orders;
pub mod queue;
pub mod revenue;
pub mod settings;
pub mod stock;

pub use auth::AuthService;
pub use orders::OrderService;
pub use queue::QueueAllocator;
pub use revenue::RevenueService;
pub use settings::SettingsService;
pub use stock::StockService;

/// All services share one pool and one event channel.
#[derive(Clone)]
pub struct AppServices {
    pub orders: Arc<OrderService>,
    pub revenue: Arc<RevenueService>,
    pub stock: Arc<StockService>,
    pub settings: Arc<SettingsService>,
    pub auth: Arc<AuthService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, session_ttl: Duration) -> Self {
        let queue = Arc::new(QueueAllocator::new(Arc::clone(&db_pool)));
        Self {
            orders: Arc::new(OrderService::new(
                Arc::clone(&db_pool),
                queue,
                Some(event_sender),
            )),
            revenue: Arc::new(RevenueService::new(Arc::clone(&db_pool))),
            stock: Arc::new(StockService::new(Arc::clone(&db_pool))),
            settings: Arc::new(SettingsService::new(Arc::clone(&db_pool))),
            auth: Arc::new(AuthService::new(db_pool, session_ttl)),
        }
    }
}

/// Today's calendar day in the store's local timezone.
pub(crate) fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// UTC bounds `[start, end)` of a local calendar day. Queue resets and
/// revenue both count by local day, while timestamps are stored in UTC.
pub(crate) fn local_day_bounds(
    date: NaiveDate,
) -> Result<(DateTime<Utc>, DateTime<Utc>), ServiceError> {
    let start = Local
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .ok_or_else(|| {
            ServiceError::InternalError(format!("No valid local midnight for date {}", date))
        })?;
    let end = start + chrono::Duration::days(1);
    Ok((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}
