//! # HTTP Backend
//!
//! [`BookingBackend`] over the REST API with `reqwest`.
//!
//! Every response is read as text and parsed into an [`ApiEnvelope`]. HTTP
//! 401 becomes [`BookingError::Unauthorized`]; other non-2xx statuses become
//! [`BookingError::Http`]. Timeouts and connection failures on GET, PUT and
//! DELETE are retried up to `max_retries` times. POST requests (payment,
//! OTP, review, add to cart) are sent once, and an envelope with
//! `success: false` is never retried.

use crate::config::ClientConfig;
use crate::endpoints::{self, Endpoint};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;
use wash_core::{
    Ack, AddToCartRequest, Address, ApiEnvelope, AuthPurpose, AuthToken, BookingBackend, BookingError,
    BookingResult, BrandReview, Car, CartLineItem, DiscountQuote, Language, OrderPage, Page, PaymentInitiation,
    PaymentRequest, Provider, Review, Service, TimeSlot,
};

/// Correlation header sent with every request
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// REST implementation of [`BookingBackend`]
#[derive(Debug, Clone)]
pub struct HttpBackend {
    config: ClientConfig,
    client: Client,
}

impl HttpBackend {
    /// Create a backend with its own connection pool
    pub fn new(config: ClientConfig) -> BookingResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BookingError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> BookingResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send with bounded retry on transport failures of idempotent requests
    async fn call<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        token: Option<&str>,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> BookingResult<ApiEnvelope<T>> {
        let attempts = if endpoint.method.is_idempotent() {
            self.config.max_retries + 1
        } else {
            1
        };
        let mut attempt = 1;
        loop {
            match self.send_once(endpoint, token, query, body.as_ref()).await {
                Err(err) if err.is_retryable() && attempt < attempts => {
                    warn!(path = endpoint.path, attempt, error = %err, "retrying request");
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        token: Option<&str>,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> BookingResult<ApiEnvelope<T>> {
        let url = self.config.url(endpoint.path);
        let request_id = Uuid::new_v4();

        let mut request = self
            .client
            .request(endpoint.method.as_reqwest(), &url)
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .header("Accept", "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(%request_id, method = ?endpoint.method, path = endpoint.path, "sending request");

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if status == StatusCode::UNAUTHORIZED {
            warn!(%request_id, path = endpoint.path, "request unauthorized");
            return Err(BookingError::Unauthorized);
        }

        if !status.is_success() {
            error!(%request_id, path = endpoint.path, status = status.as_u16(), "API error");
            return Err(BookingError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            error!(%request_id, path = endpoint.path, "undecodable response");
            BookingError::Serialization(format!("Failed to parse {} response: {}", endpoint.path, e))
        })
    }
}

fn transport_error(e: reqwest::Error) -> BookingError {
    if e.is_timeout() {
        BookingError::Timeout(e.to_string())
    } else {
        BookingError::Network(e.to_string())
    }
}

#[async_trait]
impl BookingBackend for HttpBackend {
    #[instrument(skip(self))]
    async fn providers(&self, size: u32) -> BookingResult<ApiEnvelope<Page<Provider>>> {
        let query = [
            ("page", "0".to_string()),
            ("size", size.to_string()),
            ("type", endpoints::PROVIDER_TYPE.to_string()),
        ];
        self.call(endpoints::PROVIDERS, None, &query, None).await
    }

    #[instrument(skip(self))]
    async fn services(&self, brand_id: i64) -> BookingResult<ApiEnvelope<Vec<Service>>> {
        self.call(endpoints::SERVICES, None, &[("brandId", brand_id.to_string())], None)
            .await
    }

    #[instrument(skip(self))]
    async fn brand_reviews(&self, brand_id: i64) -> BookingResult<ApiEnvelope<Page<BrandReview>>> {
        let query = [
            ("page", "0".to_string()),
            ("size", endpoints::REVIEWS_PAGE_SIZE.to_string()),
            ("brandId", brand_id.to_string()),
        ];
        self.call(endpoints::BRAND_REVIEWS, None, &query, None).await
    }

    #[instrument(skip(self, token, request), fields(service_id = request.service_id))]
    async fn add_to_cart(&self, token: &str, request: &AddToCartRequest) -> BookingResult<ApiEnvelope<Ack>> {
        let body = serde_json::to_value(request)?;
        self.call(endpoints::ADD_TO_CART, Some(token), &[], Some(body)).await
    }

    #[instrument(skip(self, token))]
    async fn cart_items(&self, token: &str) -> BookingResult<ApiEnvelope<Vec<CartLineItem>>> {
        self.call(endpoints::CART_ITEMS, Some(token), &[], None).await
    }

    #[instrument(skip(self, token))]
    async fn delete_cart_item(&self, token: &str, invoice_id: i64, item_id: i64) -> BookingResult<ApiEnvelope<Ack>> {
        let query = [("invoiceId", invoice_id.to_string()), ("itemId", item_id.to_string())];
        self.call(endpoints::DELETE_CART_ITEM, Some(token), &query, None).await
    }

    #[instrument(skip(self, token))]
    async fn cars(&self, token: &str) -> BookingResult<ApiEnvelope<Vec<Car>>> {
        self.call(endpoints::ALL_CARS, Some(token), &[], None).await
    }

    #[instrument(skip(self, token))]
    async fn addresses(&self, token: &str) -> BookingResult<ApiEnvelope<Vec<Address>>> {
        self.call(endpoints::ALL_ADDRESSES, Some(token), &[], None).await
    }

    #[instrument(skip(self, token))]
    async fn slots(&self, token: &str, brand_id: i64) -> BookingResult<ApiEnvelope<Vec<TimeSlot>>> {
        self.call(endpoints::SLOTS, Some(token), &[("brandId", brand_id.to_string())], None)
            .await
    }

    #[instrument(skip(self, token))]
    async fn lock_slot(&self, token: &str, slot_id: i64) -> BookingResult<ApiEnvelope<Ack>> {
        self.call(
            endpoints::LOCK_SLOT,
            Some(token),
            &[("slotId", slot_id.to_string())],
            Some(json!({})),
        )
        .await
    }

    #[instrument(skip(self, token))]
    async fn validate_discount(
        &self,
        token: &str,
        code: &str,
        brand_id: i64,
    ) -> BookingResult<ApiEnvelope<DiscountQuote>> {
        let query = [("discountCode", code.to_string()), ("brandId", brand_id.to_string())];
        self.call(endpoints::VALIDATE_DISCOUNT, Some(token), &query, None).await
    }

    #[instrument(skip(self, token, request), fields(invoice_id = request.invoice_id))]
    async fn initiate_payment(
        &self,
        token: &str,
        request: &PaymentRequest,
    ) -> BookingResult<ApiEnvelope<PaymentInitiation>> {
        let body = serde_json::to_value(request)?;
        self.call(endpoints::PAYMENT_INITIATE, Some(token), &[], Some(body)).await
    }

    #[instrument(skip(self, token))]
    async fn orders(&self, token: &str, page: u32, size: u32) -> BookingResult<ApiEnvelope<OrderPage>> {
        let query = [
            ("page", endpoints::wire_page(page).to_string()),
            ("size", size.to_string()),
        ];
        self.call(endpoints::ORDERS, Some(token), &query, None).await
    }

    #[instrument(skip(self, token))]
    async fn cancel_order(&self, token: &str, request_id: i64) -> BookingResult<ApiEnvelope<Ack>> {
        self.call(
            endpoints::CANCEL_ORDER,
            Some(token),
            &[("requestId", request_id.to_string())],
            None,
        )
        .await
    }

    #[instrument(skip(self, token, review))]
    async fn add_review(&self, token: &str, request_id: i64, review: &Review) -> BookingResult<ApiEnvelope<Ack>> {
        let body = serde_json::to_value(review)?;
        self.call(
            endpoints::ADD_REVIEW,
            Some(token),
            &[("requestId", request_id.to_string())],
            Some(body),
        )
        .await
    }

    #[instrument(skip(self, phone))]
    async fn initiate_auth(
        &self,
        purpose: AuthPurpose,
        phone: &str,
        language: Language,
    ) -> BookingResult<ApiEnvelope<Ack>> {
        let query = [("number", phone.to_string()), ("language", language.wire_code().to_string())];
        self.call(endpoints::auth_initiate(purpose), None, &query, Some(json!({})))
            .await
    }

    #[instrument(skip(self, phone, code))]
    async fn finalize_auth(
        &self,
        purpose: AuthPurpose,
        phone: &str,
        code: &str,
    ) -> BookingResult<ApiEnvelope<AuthToken>> {
        let query = [("confirmationCode", code.to_string()), ("number", phone.to_string())];
        self.call(endpoints::auth_finalize(purpose), None, &query, Some(json!({})))
            .await
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wash_core::{ConfirmedSelection, DiscountType};
    use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn backend(server: &MockServer) -> HttpBackend {
        let config = ClientConfig::new(format!("{}/api", server.uri()));
        HttpBackend::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_lock_slot_request_shape() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/consumer/lockSlot"))
            .and(query_param("slotId", "5"))
            .and(header("authorization", "Bearer tok"))
            .and(header_exists(REQUEST_ID_HEADER))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        let env = backend(&server).await.lock_slot("tok", 5).await.unwrap();
        assert!(env.success);
    }

    #[tokio::test]
    async fn test_cart_items_parse() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/consumer/getCartItems"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "content": [{
                    "invoiceId": 42,
                    "brandId": 7,
                    "brandNameEn": "Wash Co",
                    "totalAmount": 120.0,
                    "itemDto": {
                        "itemNameEn": "Full wash",
                        "itemPrice": 100.0,
                        "itemExtraDtos": [{ "itemExtraNameEn": "Wax", "itemExtraPrice": 20.0 }]
                    }
                }]
            })))
            .mount(&server)
            .await;

        let items = backend(&server)
            .await
            .cart_items("tok")
            .await
            .unwrap()
            .into_content_or_default()
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].invoice_id, 42);
        assert_eq!(wash_core::pricing::subtotal(&items[0]).halalas(), 12_000);
    }

    #[tokio::test]
    async fn test_providers_are_public() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/public/getFreelancers"))
            .and(query_param("page", "0"))
            .and(query_param("size", "100"))
            .and(query_param("type", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "content": {
                    "data": [{ "brandId": 7, "brandNameEn": "Wash Co", "avgAppraisal": 4.6, "available": true }],
                    "totalPages": 1
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = backend(&server)
            .await
            .providers(100)
            .await
            .unwrap()
            .into_content_or_default()
            .unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].brand_id, 7);
        assert_eq!(page.data[0].stars(), 5);
        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_services_with_extras() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/public/getServices"))
            .and(query_param("brandId", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "content": [{
                    "serviceId": 12,
                    "brandId": 7,
                    "servicesNameEn": "Full wash",
                    "servicesPrice": 80.0,
                    "extraServices": [{ "id": 4, "extraNameEn": "Wax", "extraPrice": 15.5 }]
                }]
            })))
            .mount(&server)
            .await;

        let services = backend(&server)
            .await
            .services(7)
            .await
            .unwrap()
            .into_content_or_default()
            .unwrap();

        assert_eq!(services[0].service_id, 12);
        assert_eq!(services[0].price_with(&[4]).halalas(), 9_550);
    }

    #[tokio::test]
    async fn test_brand_reviews_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/public/getReviewsBrand"))
            .and(query_param("page", "0"))
            .and(query_param("size", "8"))
            .and(query_param("brandId", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "content": { "data": [{ "username": "sara", "appraisal": 4.0, "description": "Quick" }] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reviews = backend(&server)
            .await
            .brand_reviews(7)
            .await
            .unwrap()
            .into_content_or_default()
            .unwrap();

        assert_eq!(reviews.data[0].username, "sara");
    }

    #[tokio::test]
    async fn test_add_to_cart_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/consumer/addToCart"))
            .and(header("authorization", "Bearer tok"))
            .and(body_json(json!({ "serviceId": 12, "extraServices": [4, 5] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        let request = AddToCartRequest {
            service_id: 12,
            extra_services: vec![4, 5],
        };
        let env = backend(&server).await.add_to_cart("tok", &request).await.unwrap();
        assert!(env.success);
    }

    #[tokio::test]
    async fn test_add_to_cart_conflict_keeps_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/consumer/addToCart"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "messageEn": "Service already exist in cart"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = AddToCartRequest {
            service_id: 12,
            extra_services: vec![],
        };
        let err = backend(&server).await.add_to_cart("tok", &request).await.unwrap_err();

        assert!(matches!(err, BookingError::Http { status: 400, .. }));
        assert_eq!(
            err.server_message(Language::En).as_deref(),
            Some("Service already exist in cart")
        );
    }

    #[tokio::test]
    async fn test_payment_body_and_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/payment/consumer/card/payment/initiate"))
            .and(body_json(json!({
                "paymentMethodId": 2,
                "invoiceId": 42,
                "slotId": 5,
                "discountCode": null,
                "userAddress": 4,
                "userCar": 3
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "content": { "redirect_url": "https://pay/x" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = PaymentRequest::from_selection(
            2,
            42,
            ConfirmedSelection {
                car_id: 3,
                address_id: 4,
                slot_id: 5,
                discount_code: None,
            },
        );
        let env = backend(&server).await.initiate_payment("tok", &request).await.unwrap();

        assert_eq!(env.content.unwrap().redirect_url.as_deref(), Some("https://pay/x"));
    }

    #[tokio::test]
    async fn test_validate_discount_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/consumer/validateDiscount"))
            .and(query_param("discountCode", "WASH10"))
            .and(query_param("brandId", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "content": { "discountAmount": 10, "discountType": "PERCENTAGE" }
            })))
            .mount(&server)
            .await;

        let env = backend(&server).await.validate_discount("tok", "WASH10", 7).await.unwrap();
        assert_eq!(env.content.unwrap().discount_type, DiscountType::Percentage);
    }

    #[tokio::test]
    async fn test_orders_page_is_zero_based_on_wire() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/consumer/getOrders"))
            .and(query_param("page", "0"))
            .and(query_param("size", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "content": { "data": [] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let env = backend(&server).await.orders("tok", 1, 10).await.unwrap();
        assert!(env.content.unwrap().data.is_empty());
    }

    #[tokio::test]
    async fn test_auth_initiate_sends_language() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/signUp/initiate"))
            .and(query_param("number", "555123456"))
            .and(query_param("language", "AR"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        let env = backend(&server)
            .await
            .initiate_auth(AuthPurpose::SignUp, "555123456", Language::Ar)
            .await
            .unwrap();
        assert!(env.success);
    }

    #[tokio::test]
    async fn test_finalize_returns_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login/finalize"))
            .and(query_param("confirmationCode", "123456"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "content": { "token": "jwt" }
            })))
            .mount(&server)
            .await;

        let env = backend(&server)
            .await
            .finalize_auth(AuthPurpose::Login, "555", "123456")
            .await
            .unwrap();
        assert_eq!(env.content.unwrap().token.as_deref(), Some("jwt"));
    }

    #[tokio::test]
    async fn test_unauthorized_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/consumer/allCars"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let err = backend(&server).await.cars("stale").await.unwrap_err();
        assert!(matches!(err, BookingError::Unauthorized));
    }

    #[tokio::test]
    async fn test_server_error_is_http_error_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/consumer/allAddresses"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let err = backend(&server).await.addresses("tok").await.unwrap_err();
        assert!(matches!(err, BookingError::Http { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_unsuccessful_envelope_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/consumer/lockSlot"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "messageAr": "الموعد محجوز"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let env = backend(&server).await.lock_slot("tok", 5).await.unwrap();
        assert!(!env.success);
        assert_eq!(env.message_ar.as_deref(), Some("الموعد محجوز"));
    }

    #[tokio::test]
    async fn test_timeout_is_retried_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/consumer/getSlot"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "success": true, "content": [] }))
                    .set_delay(Duration::from_millis(500)),
            )
            .expect(2)
            .mount(&server)
            .await;

        let config = ClientConfig::new(format!("{}/api", server.uri()))
            .with_timeout(Duration::from_millis(100))
            .with_max_retries(1);
        let err = HttpBackend::new(config).unwrap().slots("tok", 7).await.unwrap_err();

        assert!(matches!(err, BookingError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_timed_out_payment_is_sent_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/payment/consumer/card/payment/initiate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "success": true, "content": { "redirect_url": "https://pay/x" } }))
                    .set_delay(Duration::from_millis(400)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let config = ClientConfig::new(format!("{}/api", server.uri()))
            .with_timeout(Duration::from_millis(100))
            .with_max_retries(1);
        let request = PaymentRequest::from_selection(
            2,
            42,
            ConfirmedSelection {
                car_id: 3,
                address_id: 4,
                slot_id: 5,
                discount_code: None,
            },
        );
        let err = HttpBackend::new(config)
            .unwrap()
            .initiate_payment("tok", &request)
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::Timeout(_)));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_validate_discount_without_content() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/consumer/validateDiscount"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "messageAr": "كود الخصم منتهي"
            })))
            .mount(&server)
            .await;

        let env = backend(&server).await.validate_discount("tok", "OLD", 7).await.unwrap();

        assert!(!env.success);
        assert!(env.content.is_none());
        assert_eq!(env.message_ar.as_deref(), Some("كود الخصم منتهي"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let config = ClientConfig::new("http://127.0.0.1:1/api").with_max_retries(0);
        let err = HttpBackend::new(config).unwrap().cars("tok").await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/consumer/allCars"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = backend(&server).await.cars("tok").await.unwrap_err();
        assert!(matches!(err, BookingError::Serialization(_)));
    }
}
