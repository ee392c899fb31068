//! HTTP client for the storefront backend.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use rust_decimal::Decimal;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use grocer::orders::CheckoutOrderDraft;

use super::{
    GatewayError, OrderReceipt, OrdersGateway, PaymentInitiation, PaymentStatus,
    PaymentStatusReport,
};

/// Configuration for connecting to the backend.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// API base address, e.g. `"https://api.example.com/api/v1"`.
    pub base_url: String,

    /// Bearer token attached to every request, if the customer is signed in.
    pub access_token: Option<String>,
}

/// [`OrdersGateway`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpOrdersGateway {
    config: GatewayConfig,
    http: Client,
}

impl HttpOrdersGateway {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.http.request(method, self.endpoint(path));

        match &self.config.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        request: RequestBuilder,
        action: &str,
    ) -> Result<T, GatewayError> {
        let response = request.send().await?;
        let response = ensure_success(response, action).await?;

        Ok(response.json().await?)
    }
}

async fn ensure_success(response: Response, action: &str) -> Result<Response, GatewayError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    Err(GatewayError::UnexpectedResponse(format!(
        "{action} request failed with status {status}: {text}"
    )))
}

#[async_trait]
impl OrdersGateway for HttpOrdersGateway {
    async fn create_order(
        &self,
        draft: &CheckoutOrderDraft,
    ) -> Result<OrderReceipt, GatewayError> {
        debug!(items = draft.items.len(), "creating order");

        let envelope: OrderEnvelope =
            Self::send(self.request(Method::POST, "orders").json(draft), "create order").await?;

        envelope.into_receipt()
    }

    async fn initiate_payment(
        &self,
        draft: &CheckoutOrderDraft,
    ) -> Result<PaymentInitiation, GatewayError> {
        debug!(items = draft.items.len(), "initiating payment");

        Self::send(
            self.request(Method::POST, "payment/initiate").json(draft),
            "initiate payment",
        )
        .await
    }

    async fn verify_payment(&self, order_id: &str) -> Result<(), GatewayError> {
        let response = self
            .request(Method::POST, "payment/verify")
            .query(&[("order_id", order_id)])
            .send()
            .await?;

        ensure_success(response, "verify payment").await?;

        Ok(())
    }

    async fn payment_status(&self, order_id: &str) -> Result<PaymentStatusReport, GatewayError> {
        let body: StatusResponse = Self::send(
            self.request(Method::GET, "payment/status")
                .query(&[("order_id", order_id)]),
            "payment status",
        )
        .await?;

        Ok(body.order.into())
    }
}

#[derive(Debug, Deserialize)]
struct OrderEnvelope {
    success: bool,

    #[serde(default)]
    message: Option<String>,

    #[serde(default)]
    data: Option<OrderData>,
}

#[derive(Debug, Deserialize)]
struct OrderData {
    #[serde(rename = "_id")]
    id: String,

    #[serde(with = "rust_decimal::serde::float")]
    total: Decimal,
}

impl OrderEnvelope {
    fn into_receipt(self) -> Result<OrderReceipt, GatewayError> {
        if !self.success {
            return Err(GatewayError::Rejected(
                self.message
                    .unwrap_or_else(|| "order was not accepted".to_string()),
            ));
        }

        let Some(data) = self.data else {
            return Err(GatewayError::UnexpectedResponse(
                "order response is missing data".to_string(),
            ));
        };

        Ok(OrderReceipt {
            order_id: data.id,
            total: data.total,
        })
    }
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    order: StatusOrder,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusOrder {
    #[serde(rename = "_id")]
    id: String,

    payment_status: PaymentStatus,

    #[serde(with = "rust_decimal::serde::float")]
    total: Decimal,
}

impl From<StatusOrder> for PaymentStatusReport {
    fn from(order: StatusOrder) -> Self {
        Self {
            order_id: order.id,
            status: order.payment_status,
            total: order.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn gateway(base_url: &str) -> HttpOrdersGateway {
        HttpOrdersGateway::new(GatewayConfig {
            base_url: base_url.to_string(),
            access_token: Some("opaque-token".to_string()),
        })
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        assert_eq!(
            gateway("https://api.example.com/api/v1/").endpoint("orders"),
            "https://api.example.com/api/v1/orders"
        );
    }

    #[test]
    fn requests_carry_bearer_token() -> TestResult {
        let request = gateway("https://api.example.com")
            .request(Method::GET, "payment/status")
            .query(&[("order_id", "a1")])
            .build()?;

        assert_eq!(
            request.url().as_str(),
            "https://api.example.com/payment/status?order_id=a1"
        );
        assert_eq!(
            request
                .headers()
                .get("authorization")
                .and_then(|value| value.to_str().ok()),
            Some("Bearer opaque-token")
        );

        Ok(())
    }

    #[test]
    fn successful_envelope_becomes_receipt() -> TestResult {
        let envelope: OrderEnvelope = serde_json::from_str(
            r#"{"success":true,"message":"Order created","data":{"_id":"66f1","total":936.5}}"#,
        )?;

        let receipt = envelope.into_receipt()?;

        assert_eq!(receipt.order_id, "66f1");
        assert_eq!(receipt.total, Decimal::new(9365, 1));

        Ok(())
    }

    #[test]
    fn refused_envelope_is_rejected() -> TestResult {
        let envelope: OrderEnvelope =
            serde_json::from_str(r#"{"success":false,"message":"Out of stock"}"#)?;

        assert!(matches!(
            envelope.into_receipt(),
            Err(GatewayError::Rejected(message)) if message == "Out of stock"
        ));

        Ok(())
    }

    #[test]
    fn status_body_decodes() -> TestResult {
        let body: StatusResponse = serde_json::from_str(
            r#"{"order":{"_id":"66f1","paymentStatus":"paid","total":900}}"#,
        )?;

        let report = PaymentStatusReport::from(body.order);

        assert_eq!(report.status, PaymentStatus::Paid);
        assert_eq!(report.total, Decimal::from(900));

        Ok(())
    }

    #[test]
    fn initiation_without_url_decodes() -> TestResult {
        let initiation: PaymentInitiation = serde_json::from_str(r#"{"success":true}"#)?;

        assert_eq!(initiation.payment_url, None);
        assert_eq!(initiation.order_id, None);

        Ok(())
    }

    #[test]
    fn initiation_carries_order_id_when_reported() -> TestResult {
        let initiation: PaymentInitiation = serde_json::from_str(
            r#"{"success":true,"paymentUrl":"https://pay.example.com/s/1","orderId":"66f2"}"#,
        )?;

        assert_eq!(initiation.order_id.as_deref(), Some("66f2"));

        Ok(())
    }
}
