//! Outbound PIX gateway client (Pagou.ai).
//!
//! Ordinary failure modes (missing credential, network error, non-2xx,
//! malformed body) come back as `GatewayError` values so checkout can fall
//! back to a locally generated charge.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::PagouAiConfig;

/// Charges expire 15 minutes after creation.
pub const CHARGE_EXPIRATION_SECS: u32 = 900;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("PIX gateway is not configured")]
    NotConfigured,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("gateway rejected the charge: {0}")]
    Rejected(String),

    #[error("invalid gateway response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone)]
pub struct PixChargeRequest {
    pub amount: Decimal,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_document: String,
    pub customer_phone: String,
    pub description: String,
    pub order_id: Uuid,
}

/// A created PIX charge, from the provider or the local fallback.
#[derive(Debug, Clone)]
pub struct PixCharge {
    pub txid: String,
    pub copy_paste: String,
    pub qr_code_base64: Option<String>,
    pub expires_at: Option<String>,
}

#[async_trait]
pub trait PixGateway: Send + Sync {
    /// Whether a provider credential is configured.
    fn is_available(&self) -> bool;

    async fn create_charge(&self, req: &PixChargeRequest) -> Result<PixCharge, GatewayError>;

    /// Best-effort status poll; `None` on any error.
    async fn check_status(&self, txid: &str) -> Option<serde_json::Value>;
}

pub struct PagouAi {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl PagouAi {
    pub fn new(config: &PagouAiConfig) -> anyhow::Result<Self> {
        if config.api_key.is_none() {
            warn!("PAGOUAI_API_KEY not set; PIX charges will use the local fallback");
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChargeResponse {
    txid: Option<String>,
    #[serde(rename = "pixCopiaECola")]
    pix_copia_e_cola: Option<String>,
    #[serde(rename = "qrCode")]
    qr_code: Option<String>,
    calendario: Option<Calendario>,
}

#[derive(Debug, Deserialize)]
struct Calendario {
    criacao: Option<String>,
}

#[async_trait]
impl PixGateway for PagouAi {
    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn create_charge(&self, req: &PixChargeRequest) -> Result<PixCharge, GatewayError> {
        let Some(api_key) = &self.api_key else {
            return Err(GatewayError::NotConfigured);
        };

        let document: String = req
            .customer_document
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        let payload = json!({
            "calendario": { "expiracao": CHARGE_EXPIRATION_SECS },
            "devedor": {
                "cpf": if document.is_empty() { "00000000000".to_string() } else { document },
                "nome": req.customer_name,
            },
            "valor": { "original": format!("{:.2}", req.amount) },
            "solicitacaoPagador": req.description,
            "infoAdicionais": [
                { "nome": "Pedido", "valor": req.order_id.to_string() },
            ],
        });

        let response = self
            .client
            .post(format!("{}/pix/cobranca", self.base_url))
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected(format!("{status}: {body}")));
        }

        let body: ChargeResponse = response.json().await?;
        let (Some(txid), Some(copy_paste)) = (body.txid, body.pix_copia_e_cola) else {
            return Err(GatewayError::InvalidResponse(
                "missing txid or copy-paste code".into(),
            ));
        };

        info!(order_id = %req.order_id, %txid, "PIX charge created");
        Ok(PixCharge {
            txid,
            copy_paste,
            qr_code_base64: body.qr_code,
            expires_at: body.calendario.and_then(|c| c.criacao),
        })
    }

    async fn check_status(&self, txid: &str) -> Option<serde_json::Value> {
        let api_key = self.api_key.as_ref()?;
        let response = self
            .client
            .get(format!("{}/pix/cobranca/{}", self.base_url, txid))
            .bearer_auth(api_key)
            .send()
            .await;
        match response {
            Ok(r) if r.status().is_success() => r.json().await.ok(),
            Ok(r) => {
                warn!(%txid, status = %r.status(), "PIX status query rejected");
                None
            }
            Err(e) => {
                warn!(%txid, error = %e, "PIX status query failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PagouAiConfig;
    use rust_decimal::Decimal;

    fn request() -> PixChargeRequest {
        PixChargeRequest {
            amount: Decimal::new(2290, 2),
            customer_name: "Maria Silva".into(),
            customer_email: "maria@example.com".into(),
            customer_document: "529.982.247-25".into(),
            customer_phone: "11987654321".into(),
            description: "Pedido Açaí Prime".into(),
            order_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn unconfigured_gateway_short_circuits_without_network() {
        let gateway = PagouAi::new(&PagouAiConfig {
            api_key: None,
            base_url: "https://api.invalid".into(),
            timeout_secs: 1,
        })
        .unwrap();

        assert!(!gateway.is_available());
        let err = gateway.create_charge(&request()).await.unwrap_err();
        assert!(matches!(err, GatewayError::NotConfigured));
        assert!(gateway.check_status("tx-1").await.is_none());
    }

    #[tokio::test]
    async fn unreachable_provider_is_an_error_value() {
        // Reserved TEST-NET address; the connection fails fast and must not panic.
        let gateway = PagouAi::new(&PagouAiConfig {
            api_key: Some("test-key".into()),
            base_url: "http://192.0.2.1:9".into(),
            timeout_secs: 1,
        })
        .unwrap();

        assert!(gateway.is_available());
        let err = gateway.create_charge(&request()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Http(_)));
        assert!(gateway.check_status("tx-1").await.is_none());
    }
}
