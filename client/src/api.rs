//! REST client for the turbo inventory backend
//!
//! One deployed origin serves the whole API. Every call is an independent
//! request/response pair; a failed call is simply resubmitted by the operator,
//! so there is no retry or rollback machinery here.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use shared::models::{InventoryStats, PendingOrder, SizeVariants, TurboLot};

use crate::error::{AppError, AppResult};

/// Inventory backend client
#[derive(Debug, Clone)]
pub struct TurboApiClient {
    client: Client,
    base_url: String,
}

/// Body for `POST /create-turbo`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTurboInput {
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    pub has_size_option: bool,
    pub priority: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_numbers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_variants: Option<SizeVariants>,
}

/// Body for `PUT /turbos/update-by-partnumber`.
///
/// The backend addresses the lot by `part_number` and applies whichever fields
/// are present. `operation: "add"` turns the quantity into an additive delta,
/// which is how arrived orders restock a lot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTurboInput {
    pub part_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_size_option: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_numbers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_variants: Option<SizeVariants>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

impl UpdateTurboInput {
    /// Additive restock of a lot, used when a pending order arrives.
    pub fn additive(part_number: impl Into<String>, quantity: i64) -> Self {
        Self {
            part_number: part_number.into(),
            location: None,
            quantity: Some(quantity),
            has_size_option: None,
            priority: None,
            part_numbers: None,
            size_variants: None,
            operation: Some("add".to_string()),
        }
    }
}

/// Body for `POST /create-order`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    pub part_number: String,
    pub model: String,
    pub location: String,
    pub quantity: i64,
    pub order_date: DateTime<Utc>,
}

/// One line of a purchase-order email.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub part_number: String,
    pub model: String,
    pub location: String,
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SellRequest<'a> {
    part_number: &'a str,
    quantity: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BulkOrderEmailRequest<'a> {
    order_number: &'a str,
    orders: &'a [OrderLine],
}

#[derive(Debug, Deserialize)]
struct TurbosResponse {
    #[serde(default)]
    turbos: Vec<TurboLot>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PendingOrdersResponse {
    #[serde(default)]
    pending_orders: Vec<PendingOrder>,
}

/// Error body shape the backend uses. Sell failures additionally carry the
/// available and requested counts.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    error: Option<String>,
    available: Option<i64>,
    requested: Option<i64>,
}

impl TurboApiClient {
    /// Create a client against the deployed backend origin.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Create a client with a custom base URL (for testing).
    pub fn with_base_url(base_url: impl Into<String>) -> AppResult<Self> {
        Self::new(base_url, Duration::from_secs(30))
    }

    /// `POST /auth/login`. The demo backend accepts any credentials, but a
    /// non-success status is still surfaced rather than assumed away.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<()> {
        let response = self
            .client
            .post(format!("{}/auth/login", self.base_url))
            .json(&LoginRequest { username, password })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// `GET /turbos`
    pub async fn fetch_turbos(&self) -> AppResult<Vec<TurboLot>> {
        let response = self
            .client
            .get(format!("{}/turbos", self.base_url))
            .send()
            .await?;
        let body: TurbosResponse = Self::check(response).await?.json().await?;
        Ok(body.turbos)
    }

    /// `GET /turbos/stats`
    pub async fn fetch_stats(&self) -> AppResult<InventoryStats> {
        let response = self
            .client
            .get(format!("{}/turbos/stats", self.base_url))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `POST /create-turbo`
    pub async fn create_turbo(&self, input: &CreateTurboInput) -> AppResult<()> {
        let response = self
            .client
            .post(format!("{}/create-turbo", self.base_url))
            .json(input)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// `PUT /turbos/update-by-partnumber`
    pub async fn update_by_part_number(&self, input: &UpdateTurboInput) -> AppResult<()> {
        let response = self
            .client
            .put(format!("{}/turbos/update-by-partnumber", self.base_url))
            .json(input)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// `DELETE /turbos/delete-by-partnumber/{partNumber}`
    pub async fn delete_by_part_number(&self, part_number: &str) -> AppResult<()> {
        let response = self
            .client
            .delete(format!(
                "{}/turbos/delete-by-partnumber/{}",
                self.base_url, part_number
            ))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// `POST /turbos/sell`
    pub async fn sell(&self, part_number: &str, quantity: i64) -> AppResult<()> {
        let response = self
            .client
            .post(format!("{}/turbos/sell", self.base_url))
            .json(&SellRequest {
                part_number,
                quantity,
            })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// `GET /all-pending-orders`
    pub async fn fetch_pending_orders(&self) -> AppResult<Vec<PendingOrder>> {
        let response = self
            .client
            .get(format!("{}/all-pending-orders", self.base_url))
            .send()
            .await?;
        let body: PendingOrdersResponse = Self::check(response).await?.json().await?;
        Ok(body.pending_orders)
    }

    /// `POST /create-order`
    pub async fn create_order(&self, input: &CreateOrderInput) -> AppResult<()> {
        let response = self
            .client
            .post(format!("{}/create-order", self.base_url))
            .json(input)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// `PUT /{orderId}/arrived`
    pub async fn mark_order_arrived(&self, order_id: &str) -> AppResult<()> {
        let response = self
            .client
            .put(format!("{}/{}/arrived", self.base_url, order_id))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// `POST /email/send-order-email-with-pdf`
    pub async fn send_order_email(&self, order: &OrderLine) -> AppResult<()> {
        let response = self
            .client
            .post(format!("{}/email/send-order-email-with-pdf", self.base_url))
            .json(order)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// `POST /email/send-bulk-order-email`
    pub async fn send_bulk_order_email(
        &self,
        order_number: &str,
        orders: &[OrderLine],
    ) -> AppResult<()> {
        let response = self
            .client
            .post(format!("{}/email/send-bulk-order-email", self.base_url))
            .json(&BulkOrderEmailRequest {
                order_number,
                orders,
            })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Map a non-success response to an error, preferring the backend's own
    /// message field and recognizing the sell shortage shape.
    async fn check(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        if let Ok(body) = serde_json::from_str::<ApiErrorBody>(&text) {
            if let (Some(available), Some(requested)) = (body.available, body.requested) {
                return Err(AppError::InsufficientStock {
                    available,
                    requested,
                });
            }
            if let Some(message) = body.message.or(body.error) {
                return Err(AppError::Api {
                    status: status.as_u16(),
                    message,
                });
            }
        }
        Err(AppError::Api {
            status: status.as_u16(),
            message: "Request failed".to_string(),
        })
    }
}
