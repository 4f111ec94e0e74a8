//! Purchase-order composer
//!
//! Builds individual and bulk purchase orders from low-stock rows, triggers
//! the order-notification emails, and handles arrival restocking. Bulk orders
//! are dispatched sequentially so success/failure accounting stays simple; a
//! partial failure is reported in aggregate and never rolled back.

use chrono::Utc;
use shared::normalize::is_low_stock;

use crate::api::{CreateOrderInput, OrderLine, UpdateTurboInput};
use crate::dashboard::Dashboard;
use crate::error::{AppError, AppResult};
use crate::notify::Notifier;

impl<N: Notifier> Dashboard<N> {
    /// Create one pending order for a low-stock row and send the single-order
    /// email, then refresh the pending list.
    pub async fn place_order(&mut self, row_id: &str, quantity: i64) -> AppResult<()> {
        let row = match self.row(row_id) {
            Some(row) => row.clone(),
            None => {
                self.notifier().error("Turbo item not found");
                return Err(AppError::validation("Turbo item not found"));
            }
        };
        if quantity < 1 {
            self.notifier().error("Order quantity must be at least 1");
            return Err(AppError::validation("Order quantity must be at least 1"));
        }
        if !is_low_stock(row.quantity, row.priority) {
            self.notifier()
                .error("Only low stock items can be ordered");
            return Err(AppError::validation("Only low stock items can be ordered"));
        }

        let line = order_line(&row, quantity)?;
        let input = CreateOrderInput {
            part_number: line.part_number.clone(),
            model: line.model.clone(),
            location: line.location.clone(),
            quantity,
            order_date: Utc::now(),
        };
        match self.api().create_order(&input).await {
            Ok(()) => {
                if let Err(e) = self.api().send_order_email(&line).await {
                    self.notifier()
                        .warning(&format!("Order created but email failed: {}", e));
                }
                self.notifier()
                    .success(&format!("Order placed for {}", row.id));
                self.refresh_pending_orders().await;
                Ok(())
            }
            Err(e) => {
                self.notifier()
                    .error(&format!("Failed to create order: {}", e));
                Err(e)
            }
        }
    }

    /// Create one pending order per selected row, sequentially, then send one
    /// consolidated email covering the successes. Selections are cleared
    /// afterward whether or not every order went through.
    pub async fn place_bulk_order(&mut self) -> AppResult<()> {
        let selections = self.selections();
        if selections.is_empty() {
            self.notifier().error("No items selected to order");
            return Err(AppError::validation("No items selected to order"));
        }

        let mut placed: Vec<OrderLine> = Vec::new();
        let mut failed = 0usize;
        for (row, quantity) in &selections {
            let line = match order_line(row, *quantity) {
                Ok(line) => line,
                Err(_) => {
                    failed += 1;
                    continue;
                }
            };
            let input = CreateOrderInput {
                part_number: line.part_number.clone(),
                model: line.model.clone(),
                location: line.location.clone(),
                quantity: *quantity,
                order_date: Utc::now(),
            };
            match self.api().create_order(&input).await {
                Ok(()) => placed.push(line),
                Err(e) => {
                    tracing::warn!("Order for {} failed: {}", row.id, e);
                    failed += 1;
                }
            }
        }

        if !placed.is_empty() {
            let order_number = format!("PO-{}", Utc::now().timestamp_millis());
            if let Err(e) = self
                .api()
                .send_bulk_order_email(&order_number, &placed)
                .await
            {
                self.notifier()
                    .warning(&format!("Orders created but email failed: {}", e));
            }
            self.notifier().success(&format!(
                "{} order(s) placed under {}",
                placed.len(),
                order_number
            ));
        }
        if failed > 0 {
            self.notifier()
                .error(&format!("{} order(s) failed", failed));
        }

        self.clear_selections();
        self.refresh_pending_orders().await;
        Ok(())
    }

    /// Restock the ordered lot additively, and only if that succeeds mark the
    /// pending order as arrived. On any failure the order stays pending.
    pub async fn mark_arrived(&mut self, order_id: &str) -> AppResult<()> {
        let order = match self
            .pending_orders()
            .iter()
            .find(|o| o.id == order_id)
            .cloned()
        {
            Some(order) => order,
            None => {
                self.notifier().error("Pending order not found");
                return Err(AppError::validation("Pending order not found"));
            }
        };

        // The order may reference a multi-part-number lot; the backend is
        // addressed by the first part number.
        let part_number = order
            .part_number
            .split(',')
            .next()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        if part_number.is_empty() {
            self.notifier().error("Order has no part number");
            return Err(AppError::validation("Order has no part number"));
        }

        let restock = UpdateTurboInput::additive(part_number, order.quantity);
        if let Err(e) = self.api().update_by_part_number(&restock).await {
            self.notifier()
                .error(&format!("Failed to restock inventory: {}", e));
            return Err(e);
        }
        match self.api().mark_order_arrived(&order.id).await {
            Ok(()) => {
                self.notifier()
                    .success(&format!("Order {} marked as arrived", order.id));
                self.refresh_after_mutation().await;
                Ok(())
            }
            Err(e) => {
                self.notifier()
                    .error(&format!("Failed to mark order arrived: {}", e));
                Err(e)
            }
        }
    }
}

/// Build the email/order line for a row, resolving the row back to its first
/// underlying part number.
fn order_line(row: &shared::models::DisplayRow, quantity: i64) -> AppResult<OrderLine> {
    let part_number = match row.primary_part_number() {
        Some(pn) => pn.to_string(),
        None => return Err(AppError::validation("Row has no part number")),
    };
    Ok(OrderLine {
        part_number,
        model: row.model.clone(),
        location: row.location.clone(),
        quantity,
    })
}
