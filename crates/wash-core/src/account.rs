//! # Account Flows
//!
//! Everything outside the booking-details screen: OTP login and sign-up,
//! browsing providers and adding their services to the cart, the cart
//! listing, orders and logout.

use crate::backend::AuthPurpose;
use crate::cart::CartLineItem;
use crate::context::ClientContext;
use crate::envelope::ApiEnvelope;
use crate::error::{BookingError, BookingResult, ValidationError};
use crate::messages::{Language, Message};
use crate::order::{OrderPage, Review};
use crate::pricing::{compute_breakdown, PriceBreakdown};
use crate::provider::{AddToCartRequest, BrandReview, Provider, Service};
use crate::slot::{group_by_date, SlotDay};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

/// Digits in a verification code
pub const OTP_LENGTH: usize = 6;

/// Providers fetched for the listing and for lookups by brand
pub const PROVIDER_PAGE_SIZE: u32 = 100;

/// Server wording for a service that is already in the cart
const ALREADY_EXISTS: &str = "already exist";

/// A cart entry with its computed prices
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartEntry {
    pub item: CartLineItem,
    pub breakdown: PriceBreakdown,
}

/// Account-level operations over a [`ClientContext`]
#[derive(Debug, Clone)]
pub struct Account {
    ctx: ClientContext,
}

impl Account {
    pub fn new(ctx: ClientContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ClientContext {
        &self.ctx
    }

    /// Send a verification code to `phone`
    #[instrument(skip(self, phone))]
    pub async fn request_otp(&self, purpose: AuthPurpose, phone: &str) -> BookingResult<()> {
        let phone = normalize_phone(phone).ok_or_else(|| self.reject(ValidationError::InvalidPhone))?;

        let env = self
            .ctx
            .backend
            .initiate_auth(purpose, &phone, self.ctx.language)
            .await
            .map_err(|err| {
                error!(error = %err, "otp request failed");
                self.ctx.fail(&err, Message::AuthFailed);
                err
            })?;

        let message = env.message(self.ctx.language);
        if let Err(err) = env.into_result() {
            self.ctx.fail(&err, Message::AuthFailed);
            return Err(err);
        }
        info!("verification code sent");
        self.ctx.success_or(message, Message::OtpSent);
        Ok(())
    }

    /// Exchange the code for a token and persist it in the session
    #[instrument(skip(self, phone, code))]
    pub async fn verify_otp(&self, purpose: AuthPurpose, phone: &str, code: &str) -> BookingResult<()> {
        let phone = normalize_phone(phone).ok_or_else(|| self.reject(ValidationError::InvalidPhone))?;
        let code = code.trim();
        if code.len() != OTP_LENGTH || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(self.reject(ValidationError::InvalidOtp));
        }

        let env = self
            .ctx
            .backend
            .finalize_auth(purpose, &phone, code)
            .await
            .map_err(|err| {
                error!(error = %err, "otp verification failed");
                self.ctx.fail(&err, Message::AuthFailed);
                err
            })?;

        let token = match env.into_result() {
            Ok(content) => content.and_then(|c| c.token).filter(|t| !t.is_empty()),
            Err(err) => {
                self.ctx.fail(&err, Message::AuthFailed);
                return Err(err);
            }
        };
        let token = match token {
            Some(t) => t,
            None => {
                let err = BookingError::remote(None, None);
                warn!("verification succeeded without a token");
                self.ctx.fail(&err, Message::AuthFailed);
                return Err(err);
            }
        };

        self.ctx.session.store_token(&token)?;
        self.ctx.success(Message::LoggedIn);
        Ok(())
    }

    /// Listed providers
    #[instrument(skip(self))]
    pub async fn providers(&self) -> BookingResult<Vec<Provider>> {
        let page = self
            .settle(self.ctx.backend.providers(PROVIDER_PAGE_SIZE).await, Message::ProvidersLoadFailed)?
            .unwrap_or_default();
        debug!(count = page.data.len(), "providers loaded");
        Ok(page.data)
    }

    /// One provider by brand id
    #[instrument(skip(self))]
    pub async fn provider(&self, brand_id: i64) -> BookingResult<Provider> {
        match self.providers().await?.into_iter().find(|p| p.brand_id == brand_id) {
            Some(provider) => Ok(provider),
            None => {
                let err = BookingError::not_found(format!("provider {}", brand_id));
                warn!(brand_id, "provider not listed");
                self.ctx.fail_with(&err, Message::ProviderNotFound);
                Err(err)
            }
        }
    }

    /// Services a provider offers
    #[instrument(skip(self))]
    pub async fn services(&self, brand_id: i64) -> BookingResult<Vec<Service>> {
        Ok(self
            .settle(self.ctx.backend.services(brand_id).await, Message::ServicesLoadFailed)?
            .unwrap_or_default())
    }

    /// Latest reviews of a provider
    #[instrument(skip(self))]
    pub async fn brand_reviews(&self, brand_id: i64) -> BookingResult<Vec<BrandReview>> {
        Ok(self
            .settle(self.ctx.backend.brand_reviews(brand_id).await, Message::ReviewsLoadFailed)?
            .unwrap_or_default()
            .data)
    }

    /// Add a service with the chosen extras to the cart.
    ///
    /// A service that is already in the cart gets its own toast.
    #[instrument(skip(self))]
    pub async fn add_to_cart(&self, service_id: i64, extra_services: Vec<i64>) -> BookingResult<()> {
        let token = self.ctx.token()?;
        let request = AddToCartRequest {
            service_id,
            extra_services,
        };

        let err = match self.ctx.backend.add_to_cart(&token, &request).await {
            Ok(env) if env.success => {
                info!(service_id, "service added to cart");
                self.ctx.success(Message::AddedToCart);
                return Ok(());
            }
            Ok(env) => BookingError::remote(env.message_ar, env.message_en),
            Err(err) => err,
        };

        if is_already_in_cart(&err) {
            debug!(service_id, "service already in cart");
            self.ctx.fail_with(&err, Message::AlreadyInCart);
        } else {
            warn!(service_id, error = %err, "add to cart failed");
            self.ctx.fail(&err, Message::AddToCartFailed);
        }
        Err(err)
    }

    /// Cart entries with their price breakdowns
    #[instrument(skip(self))]
    pub async fn cart(&self) -> BookingResult<Vec<CartEntry>> {
        let token = self.ctx.token()?;
        let items = self
            .settle(self.ctx.backend.cart_items(&token).await, Message::CartLoadFailed)?
            .unwrap_or_default();
        debug!(count = items.len(), "cart loaded");

        Ok(items
            .into_iter()
            .map(|item| CartEntry {
                breakdown: compute_breakdown(&item, None),
                item,
            })
            .collect())
    }

    /// Remove one service from the cart
    #[instrument(skip(self))]
    pub async fn delete_cart_item(&self, invoice_id: i64, item_id: i64) -> BookingResult<()> {
        let token = self.ctx.token()?;
        let env = self.ctx.backend.delete_cart_item(&token, invoice_id, item_id).await;
        self.acknowledge(env, Message::CartItemDeleted, Message::CartDeleteFailed)
    }

    /// Open slots of a provider, grouped by date
    #[instrument(skip(self))]
    pub async fn slots(&self, brand_id: i64) -> BookingResult<Vec<SlotDay>> {
        let token = self.ctx.token()?;
        let slots = self
            .settle(self.ctx.backend.slots(&token, brand_id).await, Message::SlotsLoadFailed)?
            .unwrap_or_default();
        Ok(group_by_date(&slots))
    }

    /// One page of orders; `page` is 1-based
    #[instrument(skip(self))]
    pub async fn orders(&self, page: u32, size: u32) -> BookingResult<OrderPage> {
        let token = self.ctx.token()?;
        let page = page.max(1);
        match self.ctx.backend.orders(&token, page, size).await {
            Ok(env) => env.into_content_or_default().map_err(|err| {
                self.ctx.fail(&err, Message::OrdersLoadFailed);
                err
            }),
            Err(err) => {
                error!(error = %err, "orders request failed");
                self.ctx.fail_with(&err, Message::OrdersLoadError);
                Err(err)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn cancel_order(&self, request_id: i64) -> BookingResult<()> {
        let token = self.ctx.token()?;
        let env = self.ctx.backend.cancel_order(&token, request_id).await;
        self.acknowledge(env, Message::OrderCancelled, Message::OrderCancelFailed)
    }

    #[instrument(skip(self, review))]
    pub async fn add_review(&self, request_id: i64, review: Review) -> BookingResult<()> {
        let token = self.ctx.token()?;
        let env = self.ctx.backend.add_review(&token, request_id, &review).await;
        self.acknowledge(env, Message::ReviewAdded, Message::ReviewFailed)
    }

    /// Tear the session down
    pub fn logout(&self) -> BookingResult<()> {
        self.ctx.session.teardown()?;
        self.ctx.success(Message::LoggedOut);
        Ok(())
    }

    fn settle<T>(&self, res: BookingResult<ApiEnvelope<T>>, fallback: Message) -> BookingResult<Option<T>> {
        res.and_then(ApiEnvelope::into_result).map_err(|err| {
            warn!(error = %err, "request failed");
            self.ctx.fail(&err, fallback);
            err
        })
    }

    /// Success toast with the server's text when the envelope succeeded
    fn acknowledge<T>(
        &self,
        res: BookingResult<ApiEnvelope<T>>,
        success: Message,
        failure: Message,
    ) -> BookingResult<()> {
        let res = res.map(|env| (env.message(self.ctx.language), env));
        match res {
            Ok((message, env)) if env.success => {
                self.ctx.success_or(message, success);
                Ok(())
            }
            Ok((_, env)) => {
                let err = BookingError::remote(env.message_ar, env.message_en);
                self.ctx.fail(&err, failure);
                Err(err)
            }
            Err(err) => {
                error!(error = %err, "request failed");
                self.ctx.fail_with(&err, failure);
                Err(err)
            }
        }
    }

    fn reject(&self, v: ValidationError) -> BookingError {
        let err = BookingError::from(v);
        self.ctx.fail(&err, v.message());
        err
    }
}

fn is_already_in_cart(err: &BookingError) -> bool {
    [Language::Ar, Language::En].into_iter().any(|lang| {
        err.server_message(lang)
            .is_some_and(|m| m.to_lowercase().contains(ALREADY_EXISTS))
    })
}

/// Strip spaces and dashes; digits only, optionally with a leading `+`
fn normalize_phone(raw: &str) -> Option<String> {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(cleaned)
}
