//! Dashboard controller
//!
//! Owns the in-memory snapshot (rows, stats, pending orders) and all transient
//! selection/search state, and mediates every backend call. State is only ever
//! replaced wholesale from a fresh fetch; a failed call leaves it untouched.

use std::collections::HashMap;
use std::time::Duration;

use shared::models::{pending_only, DisplayRow, InventoryStats, PendingOrder};
use shared::normalize::normalize_lots;
use shared::validation::{validate_sell_quantity, validate_simple_lot, validate_variant_lot};

use crate::api::{CreateTurboInput, TurboApiClient, UpdateTurboInput};
use crate::error::{AppError, AppResult};
use crate::notify::Notifier;

/// Fixed wait before re-fetching after a mutation, tolerating backend
/// eventual consistency. A plain sleep, not a retry with backoff.
pub const REFRESH_DELAY_MS: u64 = 500;

/// Contents of the add/edit modal, in either of its two shapes.
#[derive(Debug, Clone)]
pub enum LotForm {
    Simple {
        models: Vec<String>,
        location: String,
        quantity: i64,
    },
    Variants {
        location: String,
        big_models: Vec<String>,
        big_quantity: i64,
        small_models: Vec<String>,
        small_quantity: i64,
    },
}

impl LotForm {
    pub fn validate(&self) -> Result<(), &'static str> {
        match self {
            LotForm::Simple {
                models,
                location,
                quantity,
            } => validate_simple_lot(models, location, *quantity),
            LotForm::Variants {
                location,
                big_models,
                big_quantity,
                small_models,
                small_quantity,
            } => validate_variant_lot(
                location,
                big_models,
                *big_quantity,
                small_models,
                *small_quantity,
            ),
        }
    }

    fn into_create_input(self, priority: bool) -> CreateTurboInput {
        use shared::models::{SizeVariant, SizeVariants};

        match self {
            LotForm::Simple {
                models,
                location,
                quantity,
            } => CreateTurboInput {
                location,
                quantity: Some(quantity),
                has_size_option: false,
                priority,
                part_numbers: Some(models),
                size_variants: None,
            },
            LotForm::Variants {
                location,
                big_models,
                big_quantity,
                small_models,
                small_quantity,
            } => {
                let side = |models: Vec<String>, quantity: i64| {
                    if models.iter().any(|m| !m.trim().is_empty()) {
                        Some(SizeVariant {
                            part_numbers: models,
                            quantity,
                        })
                    } else {
                        None
                    }
                };
                CreateTurboInput {
                    location,
                    quantity: None,
                    has_size_option: true,
                    priority,
                    part_numbers: None,
                    size_variants: Some(SizeVariants {
                        big: side(big_models, big_quantity),
                        small: side(small_models, small_quantity),
                    }),
                }
            }
        }
    }
}

/// The dashboard state machine: API client, notifier, and the current
/// snapshot plus modal-adjacent selection state.
pub struct Dashboard<N: Notifier> {
    api: TurboApiClient,
    notifier: N,
    rows: Vec<DisplayRow>,
    stats: InventoryStats,
    pending_orders: Vec<PendingOrder>,
    order_quantities: HashMap<String, i64>,
    search_term: String,
}

impl<N: Notifier> Dashboard<N> {
    pub fn new(api: TurboApiClient, notifier: N) -> Self {
        Self {
            api,
            notifier,
            rows: Vec::new(),
            stats: InventoryStats::default(),
            pending_orders: Vec::new(),
            order_quantities: HashMap::new(),
            search_term: String::new(),
        }
    }

    pub fn api(&self) -> &TurboApiClient {
        &self.api
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    pub fn stats(&self) -> &InventoryStats {
        &self.stats
    }

    pub fn pending_orders(&self) -> &[PendingOrder] {
        &self.pending_orders
    }

    pub fn row(&self, row_id: &str) -> Option<&DisplayRow> {
        self.rows.iter().find(|r| r.id == row_id)
    }

    /// Rebuild the entire snapshot from fresh fetches. Each fetch is
    /// independent: a failure is reported and that part of the prior snapshot
    /// kept, matching the fire-and-forget refresh of the original dashboard.
    pub async fn refresh_all(&mut self) {
        match self.api.fetch_turbos().await {
            Ok(lots) => self.rows = normalize_lots(&lots),
            Err(e) => self
                .notifier
                .error(&format!("Failed to fetch turbo items: {}", e)),
        }
        match self.api.fetch_stats().await {
            Ok(stats) => self.stats = stats,
            Err(e) => self
                .notifier
                .error(&format!("Failed to fetch statistics: {}", e)),
        }
        self.refresh_pending_orders().await;
    }

    pub(crate) async fn refresh_pending_orders(&mut self) {
        match self.api.fetch_pending_orders().await {
            Ok(orders) => self.pending_orders = pending_only(orders),
            Err(e) => self
                .notifier
                .error(&format!("Failed to fetch pending orders: {}", e)),
        }
    }

    /// Delay-then-refresh after a successful mutation.
    pub async fn refresh_after_mutation(&mut self) {
        tokio::time::sleep(Duration::from_millis(REFRESH_DELAY_MS)).await;
        self.refresh_all().await;
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    pub fn set_search(&mut self, term: &str) {
        self.search_term = term.to_string();
    }

    /// Case-insensitive substring match on the row's model/display text only.
    /// Deliberately narrower than the original id/model/bay match.
    pub fn filtered_rows(&self) -> Vec<&DisplayRow> {
        let needle = self.search_term.to_lowercase();
        self.rows
            .iter()
            .filter(|r| needle.is_empty() || r.display_text.to_lowercase().contains(&needle))
            .collect()
    }

    // ------------------------------------------------------------------
    // Bulk-order selections
    // ------------------------------------------------------------------

    /// Select a row for bulk ordering with the default quantity of 1.
    pub fn select_row(&mut self, row_id: &str) {
        self.order_quantities
            .entry(row_id.to_string())
            .or_insert(1);
    }

    pub fn set_order_quantity(&mut self, row_id: &str, quantity: i64) {
        self.order_quantities
            .insert(row_id.to_string(), quantity.max(0));
    }

    pub fn adjust_order_quantity(&mut self, row_id: &str, delta: i64) {
        let current = self.order_quantities.get(row_id).copied().unwrap_or(0);
        self.order_quantities
            .insert(row_id.to_string(), (current + delta).max(0));
    }

    pub fn clear_selections(&mut self) {
        self.order_quantities.clear();
    }

    /// Selected rows with a positive order quantity, in row order.
    pub fn selections(&self) -> Vec<(DisplayRow, i64)> {
        self.rows
            .iter()
            .filter_map(|row| {
                let qty = self.order_quantities.get(&row.id).copied().unwrap_or(0);
                (qty > 0).then(|| (row.clone(), qty))
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    pub async fn add_lot(&mut self, form: LotForm, priority: bool) -> AppResult<()> {
        if let Err(msg) = form.validate() {
            self.notifier.error(msg);
            return Err(AppError::validation(msg));
        }
        let input = form.into_create_input(priority);
        match self.api.create_turbo(&input).await {
            Ok(()) => {
                self.notifier.success("Turbo added successfully!");
                self.refresh_after_mutation().await;
                Ok(())
            }
            Err(e) => {
                self.notifier.error(&format!("Failed to add turbo: {}", e));
                Err(e)
            }
        }
    }

    pub async fn update_lot(&mut self, row_id: &str, form: LotForm, priority: bool) -> AppResult<()> {
        let part_number = match self.primary_part_number(row_id) {
            Some(pn) => pn,
            None => {
                self.notifier.error("Turbo item not found");
                return Err(AppError::validation("Turbo item not found"));
            }
        };
        if let Err(msg) = form.validate() {
            self.notifier.error(msg);
            return Err(AppError::validation(msg));
        }

        let fields = form.into_create_input(priority);
        let input = UpdateTurboInput {
            part_number,
            location: Some(fields.location),
            quantity: fields.quantity,
            has_size_option: Some(fields.has_size_option),
            priority: Some(fields.priority),
            part_numbers: fields.part_numbers,
            size_variants: fields.size_variants,
            operation: None,
        };
        match self.api.update_by_part_number(&input).await {
            Ok(()) => {
                self.notifier.success("Turbo updated successfully!");
                self.refresh_after_mutation().await;
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error(&format!("Failed to update turbo: {}", e));
                Err(e)
            }
        }
    }

    pub async fn delete_lot(&mut self, row_id: &str) -> AppResult<()> {
        let part_number = match self.primary_part_number(row_id) {
            Some(pn) => pn,
            None => {
                self.notifier.error("Turbo item not found");
                return Err(AppError::validation("Turbo item not found"));
            }
        };
        match self.api.delete_by_part_number(&part_number).await {
            Ok(()) => {
                self.notifier.success("Turbo deleted successfully!");
                self.refresh_after_mutation().await;
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error(&format!("Failed to delete turbo: {}", e));
                Err(e)
            }
        }
    }

    /// Sell `quantity` units off a row. The quantity is checked against the
    /// displayed stock before any network call; a backend shortage is surfaced
    /// with its available/requested counts.
    pub async fn sell(&mut self, row_id: &str, quantity: i64) -> AppResult<()> {
        let row = match self.row(row_id) {
            Some(row) => row.clone(),
            None => {
                self.notifier.error("Turbo item not found");
                return Err(AppError::validation("Turbo item not found"));
            }
        };
        if validate_sell_quantity(quantity, row.quantity).is_err() {
            let message = if quantity > row.quantity {
                format!(
                    "Cannot sell {}: only {} available",
                    quantity, row.quantity
                )
            } else {
                "Sell quantity must be at least 1".to_string()
            };
            self.notifier.error(&message);
            return Err(AppError::validation(message));
        }

        let part_number = match row.primary_part_number() {
            Some(pn) => pn.to_string(),
            None => {
                self.notifier.error("Turbo item not found");
                return Err(AppError::validation("Turbo item not found"));
            }
        };
        match self.api.sell(&part_number, quantity).await {
            Ok(()) => {
                self.notifier
                    .success(&format!("Sold {} x {}", quantity, row.id));
                self.refresh_after_mutation().await;
                Ok(())
            }
            Err(e) => {
                self.notifier.error(&format!("Failed to sell turbo: {}", e));
                Err(e)
            }
        }
    }

    /// First underlying part number of a row: the only handle the backend's
    /// by-part-number endpoints accept for multi-part-number lots.
    fn primary_part_number(&self, row_id: &str) -> Option<String> {
        self.row(row_id)
            .and_then(|r| r.primary_part_number().map(str::to_string))
    }
}
