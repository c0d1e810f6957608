//! # Order Types
//!
//! Orders listing for the client. Successful payments land here.

use crate::cart::ServiceItem;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Request statuses that count as closed
pub const CLOSED_STATUSES: &[&str] = &[
    "REJECTED",
    "COMPLETED",
    "COMPLETED_BY_ADMIN",
    "CANCELLED_BY_ADMIN",
    "CANCELLED",
    "REFUNDED",
];

/// Service request attached to an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub id: i64,
    #[serde(default)]
    pub status_name: String,
}

/// A booked order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub invoice_id: i64,

    #[serde(default)]
    pub brand_name_ar: String,

    #[serde(default)]
    pub brand_name_en: String,

    #[serde(default)]
    pub reservation_date: Option<String>,

    #[serde(default)]
    pub from_time: Option<String>,

    #[serde(default)]
    pub time_to: Option<String>,

    #[serde(default)]
    pub status_name: String,

    #[serde(default)]
    pub reviewed: bool,

    #[serde(default)]
    pub item_dto: ServiceItem,

    #[serde(default)]
    pub total_amount: Money,

    pub request: OrderRequest,
}

impl OrderRecord {
    /// Closed orders cannot be cancelled
    pub fn is_closed(&self) -> bool {
        CLOSED_STATUSES.contains(&self.request.status_name.as_str())
    }

    /// Reviews are offered once an order is completed and not yet reviewed
    pub fn can_review(&self) -> bool {
        !self.reviewed && self.request.status_name.starts_with("COMPLETED")
    }
}

/// One page of orders
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPage {
    #[serde(default)]
    pub data: Vec<OrderRecord>,

    #[serde(default)]
    pub total_pages: Option<u32>,

    #[serde(default)]
    pub total_elements: Option<u64>,
}

impl OrderPage {
    /// Split into (current, closed), preserving order
    pub fn partition(&self) -> (Vec<&OrderRecord>, Vec<&OrderRecord>) {
        self.data.iter().partition(|o| !o.is_closed())
    }
}

/// A review for a completed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Star rating, 1 to 5
    pub appraisal: u8,
    pub description: String,
}

impl Review {
    /// Clamp the rating into 1..=5
    pub fn new(appraisal: u8, description: impl Into<String>) -> Self {
        Self {
            appraisal: appraisal.clamp(1, 5),
            description: description.into(),
        }
    }
}
