//! Domain enums shared by entities, services and handlers.
//!
//! Statuses are stored as strings in the database and parsed back through
//! these types, so the transition table below is the single authority on
//! which status changes are legal.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// Order lifecycle status.
///
/// ```text
/// PENDING ──> PREPARING ──> READY ──> COMPLETED
///    │            │
///    └────────────┴──> CANCELLED
/// ```
///
/// COMPLETED and CANCELLED are terminal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Statuses this one may move to. Empty for terminal states.
    pub fn allowed_transitions(self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Preparing, OrderStatus::Cancelled],
            OrderStatus::Preparing => &[OrderStatus::Ready, OrderStatus::Cancelled],
            OrderStatus::Ready => &[OrderStatus::Completed],
            OrderStatus::Completed | OrderStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        self.allowed_transitions().contains(&target)
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Statuses that count as in-flight work on the live dashboard.
    pub fn active_set() -> &'static [OrderStatus] {
        &[
            OrderStatus::Pending,
            OrderStatus::Preparing,
            OrderStatus::Ready,
        ]
    }
}

/// Dine-in vs takeaway; each channel has its own daily queue sequence.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DiningOption {
    DineIn,
    Takeaway,
}

impl DiningOption {
    /// Queue-number prefix for this channel.
    pub fn queue_prefix(self) -> &'static str {
        match self {
            DiningOption::DineIn => "DIA",
            DiningOption::Takeaway => "TAK",
        }
    }

    /// Accepts both the stored form and the human-facing form the order
    /// form submits ("Dine-in" / "Takeaway").
    pub fn parse_loose(raw: &str) -> Option<Self> {
        match raw {
            "DINE_IN" | "Dine-in" | "dine_in" | "dine-in" => Some(DiningOption::DineIn),
            "TAKEAWAY" | "Takeaway" | "takeaway" | "Take-away" => Some(DiningOption::Takeaway),
            _ => None,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Transfer,
}

impl PaymentMethod {
    pub fn parse_loose(raw: &str) -> Option<Self> {
        match raw {
            "CASH" | "Cash" | "cash" => Some(PaymentMethod::Cash),
            "TRANSFER" | "Transfer" | "transfer" => Some(PaymentMethod::Transfer),
            _ => None,
        }
    }
}

/// Stock level status. Derived from the on-hand quantity unless a staff
/// member overrides it explicitly.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    Ok,
    Low,
    Out,
}

impl StockStatus {
    /// Three-tier threshold: 0 -> OUT, 1..=3 -> LOW, otherwise OK.
    pub fn derive(stock: i32) -> Self {
        if stock <= 0 {
            StockStatus::Out
        } else if stock <= 3 {
            StockStatus::Low
        } else {
            StockStatus::Ok
        }
    }

    /// Sort rank for stock listings: problems first.
    pub fn severity_rank(self) -> u8 {
        match self {
            StockStatus::Out => 0,
            StockStatus::Low => 1,
            StockStatus::Ok => 2,
        }
    }
}
