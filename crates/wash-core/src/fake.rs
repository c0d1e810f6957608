//! In-process [`BookingBackend`] for flow tests.

use crate::backend::{Ack, AuthPurpose, AuthToken, BookingBackend, DiscountQuote, PaymentInitiation, PaymentRequest};
use crate::cart::CartLineItem;
use crate::envelope::ApiEnvelope;
use crate::error::{BookingError, BookingResult};
use crate::messages::Language;
use crate::order::{OrderPage, Review};
use crate::profile::{Address, Car};
use crate::provider::{AddToCartRequest, BrandReview, Page, Provider, Service};
use crate::slot::TimeSlot;
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// How an endpoint misbehaves
#[derive(Debug, Clone, Copy)]
pub(crate) enum Fault {
    Network,
    Unauthorized,
    /// Non-2xx answer carrying this body
    Rejected(u16, &'static str),
}

pub(crate) struct FakeBackend {
    pub providers: Mutex<ApiEnvelope<Page<Provider>>>,
    pub services: Mutex<ApiEnvelope<Vec<Service>>>,
    pub reviews: Mutex<ApiEnvelope<Page<BrandReview>>>,
    pub add_to_cart: Mutex<ApiEnvelope<Ack>>,
    pub cart: Mutex<ApiEnvelope<Vec<CartLineItem>>>,
    pub cars: Mutex<ApiEnvelope<Vec<Car>>>,
    pub addresses: Mutex<ApiEnvelope<Vec<Address>>>,
    pub slots: Mutex<ApiEnvelope<Vec<TimeSlot>>>,
    pub lock: Mutex<ApiEnvelope<Ack>>,
    pub discount: Mutex<ApiEnvelope<DiscountQuote>>,
    pub payment: Mutex<ApiEnvelope<PaymentInitiation>>,
    pub orders: Mutex<ApiEnvelope<OrderPage>>,
    pub ack: Mutex<ApiEnvelope<Ack>>,
    pub auth: Mutex<ApiEnvelope<AuthToken>>,
    faults: Mutex<Vec<(&'static str, Fault)>>,
    calls: Mutex<Vec<&'static str>>,
    selector_delay: Mutex<Option<Duration>>,
    pub last_payment: Mutex<Option<PaymentRequest>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            providers: Mutex::new(ApiEnvelope::ok(Page::default())),
            services: Mutex::new(ApiEnvelope::ok(vec![])),
            reviews: Mutex::new(ApiEnvelope::ok(Page::default())),
            add_to_cart: Mutex::new(ApiEnvelope::ok(Ack::Null)),
            cart: Mutex::new(ApiEnvelope::ok(vec![])),
            cars: Mutex::new(ApiEnvelope::ok(vec![])),
            addresses: Mutex::new(ApiEnvelope::ok(vec![])),
            slots: Mutex::new(ApiEnvelope::ok(vec![])),
            lock: Mutex::new(ApiEnvelope::ok(Ack::Null)),
            discount: Mutex::new(ApiEnvelope::failure(None, None)),
            payment: Mutex::new(ApiEnvelope::failure(None, None)),
            orders: Mutex::new(ApiEnvelope::ok(OrderPage::default())),
            ack: Mutex::new(ApiEnvelope::ok(Ack::Null)),
            auth: Mutex::new(ApiEnvelope::ok(AuthToken::default())),
            faults: Mutex::new(vec![]),
            calls: Mutex::new(vec![]),
            selector_delay: Mutex::new(None),
            last_payment: Mutex::new(None),
        }
    }

    pub fn set<T: Clone>(slot: &Mutex<ApiEnvelope<T>>, value: ApiEnvelope<T>) {
        *slot.lock().unwrap() = value;
    }

    pub fn fail(&self, endpoint: &'static str, fault: Fault) {
        self.faults.lock().unwrap().push((endpoint, fault));
    }

    /// Hold cars, addresses and slots responses for `delay`; the call is
    /// recorded only once the delay has elapsed
    pub fn delay_selectors(&self, delay: Duration) {
        *self.selector_delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, endpoint: &str) -> usize {
        self.calls().iter().filter(|c| **c == endpoint).count()
    }

    async fn respond_selector<T: Clone>(
        &self,
        endpoint: &'static str,
        slot: &Mutex<ApiEnvelope<T>>,
    ) -> BookingResult<ApiEnvelope<T>> {
        let delay = *self.selector_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.respond(endpoint, slot)
    }

    fn respond<T: Clone>(&self, endpoint: &'static str, slot: &Mutex<ApiEnvelope<T>>) -> BookingResult<ApiEnvelope<T>> {
        self.calls.lock().unwrap().push(endpoint);
        let fault = self
            .faults
            .lock()
            .unwrap()
            .iter()
            .find(|(e, _)| *e == endpoint)
            .map(|(_, f)| *f);
        match fault {
            Some(Fault::Network) => Err(BookingError::Network("connection refused".into())),
            Some(Fault::Unauthorized) => Err(BookingError::Unauthorized),
            Some(Fault::Rejected(status, body)) => Err(BookingError::Http {
                status,
                body: body.to_string(),
            }),
            None => Ok(slot.lock().unwrap().clone()),
        }
    }
}

#[async_trait]
impl BookingBackend for FakeBackend {
    async fn providers(&self, _size: u32) -> BookingResult<ApiEnvelope<Page<Provider>>> {
        self.respond("providers", &self.providers)
    }

    async fn services(&self, _brand_id: i64) -> BookingResult<ApiEnvelope<Vec<Service>>> {
        self.respond("services", &self.services)
    }

    async fn brand_reviews(&self, _brand_id: i64) -> BookingResult<ApiEnvelope<Page<BrandReview>>> {
        self.respond("brand_reviews", &self.reviews)
    }

    async fn add_to_cart(&self, _token: &str, _request: &AddToCartRequest) -> BookingResult<ApiEnvelope<Ack>> {
        self.respond("add_to_cart", &self.add_to_cart)
    }

    async fn cart_items(&self, _token: &str) -> BookingResult<ApiEnvelope<Vec<CartLineItem>>> {
        self.respond("cart", &self.cart)
    }

    async fn delete_cart_item(&self, _token: &str, _invoice_id: i64, _item_id: i64) -> BookingResult<ApiEnvelope<Ack>> {
        self.respond("delete_cart_item", &self.ack)
    }

    async fn cars(&self, _token: &str) -> BookingResult<ApiEnvelope<Vec<Car>>> {
        self.respond_selector("cars", &self.cars).await
    }

    async fn addresses(&self, _token: &str) -> BookingResult<ApiEnvelope<Vec<Address>>> {
        self.respond_selector("addresses", &self.addresses).await
    }

    async fn slots(&self, _token: &str, _brand_id: i64) -> BookingResult<ApiEnvelope<Vec<TimeSlot>>> {
        self.respond_selector("slots", &self.slots).await
    }

    async fn lock_slot(&self, _token: &str, _slot_id: i64) -> BookingResult<ApiEnvelope<Ack>> {
        self.respond("lock_slot", &self.lock)
    }

    async fn validate_discount(
        &self,
        _token: &str,
        _code: &str,
        _brand_id: i64,
    ) -> BookingResult<ApiEnvelope<DiscountQuote>> {
        self.respond("validate_discount", &self.discount)
    }

    async fn initiate_payment(
        &self,
        _token: &str,
        request: &PaymentRequest,
    ) -> BookingResult<ApiEnvelope<PaymentInitiation>> {
        *self.last_payment.lock().unwrap() = Some(request.clone());
        self.respond("initiate_payment", &self.payment)
    }

    async fn orders(&self, _token: &str, _page: u32, _size: u32) -> BookingResult<ApiEnvelope<OrderPage>> {
        self.respond("orders", &self.orders)
    }

    async fn cancel_order(&self, _token: &str, _request_id: i64) -> BookingResult<ApiEnvelope<Ack>> {
        self.respond("cancel_order", &self.ack)
    }

    async fn add_review(&self, _token: &str, _request_id: i64, _review: &Review) -> BookingResult<ApiEnvelope<Ack>> {
        self.respond("add_review", &self.ack)
    }

    async fn initiate_auth(
        &self,
        _purpose: AuthPurpose,
        _phone: &str,
        _language: Language,
    ) -> BookingResult<ApiEnvelope<Ack>> {
        self.respond("initiate_auth", &self.ack)
    }

    async fn finalize_auth(
        &self,
        _purpose: AuthPurpose,
        _phone: &str,
        _code: &str,
    ) -> BookingResult<ApiEnvelope<AuthToken>> {
        self.respond("finalize_auth", &self.auth)
    }

    fn backend_name(&self) -> &'static str {
        "fake"
    }
}
