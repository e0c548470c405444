//! Hosted-backend store client
//!
//! Talks to the shop's backend-as-a-service over its auto-generated
//! REST/RPC surface: a filtered GET for catalog search and a single
//! `record_sale` RPC that performs the header insert, line-item inserts
//! and stock decrements in one server-side transaction.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use super::{SaleStore, StoreError};
use crate::catalog::{CatalogLookup, Product};
use crate::config::StoreConfig;
use crate::money::to_f64;
use crate::sale::SaleDraft;

/// REST/RPC client for the hosted store
pub struct RemoteStore {
    client: reqwest::Client,
    config: StoreConfig,
}

impl RemoteStore {
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }
}

#[async_trait]
impl CatalogLookup for RemoteStore {
    async fn search(&self, term: &str) -> Result<Vec<Product>, StoreError> {
        debug!(%term, "catalog search");
        let response = self
            .authed(self.client.get(self.endpoint("rest/v1/products")))
            .query(&[
                ("select", "id,name,unit_price,stock_quantity,image_url"),
                ("name", &format!("ilike.*{term}*")),
                ("order", "name.asc"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::Rejected(format!(
                "catalog query failed with status {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl SaleStore for RemoteStore {
    async fn record_sale(&self, draft: &SaleDraft) -> Result<(), StoreError> {
        let lines: Vec<serde_json::Value> = draft
            .lines
            .iter()
            .map(|l| {
                json!({
                    "product_id": l.product_id,
                    "quantity": l.quantity,
                    "unit_price": to_f64(l.unit_price),
                })
            })
            .collect();

        let body = json!({
            "p_sale_id": draft.sale_id,
            "p_total": to_f64(draft.total),
            "p_payment_summary": draft.payment_summary,
            "p_customer_id": draft.customer_id,
            "p_operator_id": draft.operator_id,
            "p_sold_at": draft.sold_at,
            "p_lines": lines,
        });

        let response = self
            .authed(self.client.post(self.endpoint("rest/v1/rpc/record_sale")))
            .json(&body)
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let detail = response.text().await.unwrap_or_default();
        Err(StoreError::Rejected(format!(
            "record_sale failed ({status}): {detail}"
        )))
    }
}
