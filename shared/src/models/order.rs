//! Pending purchase order models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A purchase order awaiting delivery, from `GET /all-pending-orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOrder {
    pub id: String,
    pub part_number: String,
    pub model: String,
    pub location: String,
    pub quantity: i64,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
}

/// Lifecycle of a pending order. Arrival is an explicit operator action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Arrived,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Arrived => "arrived",
        }
    }
}

/// Keep only orders still awaiting delivery; arrived orders are hidden.
pub fn pending_only(orders: Vec<PendingOrder>) -> Vec<PendingOrder> {
    orders
        .into_iter()
        .filter(|o| o.status == OrderStatus::Pending)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, status: OrderStatus) -> PendingOrder {
        PendingOrder {
            id: id.to_string(),
            part_number: "846015".to_string(),
            model: "846015".to_string(),
            location: "A1".to_string(),
            quantity: 1,
            order_date: Utc::now(),
            status,
        }
    }

    #[test]
    fn test_pending_only_filters_arrived() {
        let orders = vec![
            order("1", OrderStatus::Pending),
            order("2", OrderStatus::Arrived),
            order("3", OrderStatus::Pending),
        ];
        let visible = pending_only(orders);
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|o| o.status == OrderStatus::Pending));
    }

    #[test]
    fn test_status_wire_format_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&OrderStatus::Arrived).unwrap(),
            "\"arrived\""
        );
    }
}
