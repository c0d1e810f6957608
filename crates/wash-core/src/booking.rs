//! # Booking Session
//!
//! One booking-details screen: the cart line item being booked, the user's
//! [`Selection`], the [`SlotLock`] and the selector option lists.
//!
//! ```text
//! load(invoice) ─▶ mount() ─▶ select / lock_slot / apply_discount ─▶ confirm()
//!                    │                                                  │
//!                    └─ JoinSet: cars, addresses, slots                 ▼
//!                                                        Route::PaymentPage(url)
//!                                                        Route::PaymentFailed
//! ```
//!
//! The session owns the tasks it spawns. [`BookingSession::teardown`] aborts
//! whatever is still in flight; dropping the session drops the `JoinSet`,
//! which does the same.

use crate::backend::PaymentRequest;
use crate::cart::{find_by_invoice, CartLineItem};
use crate::context::ClientContext;
use crate::envelope::ApiEnvelope;
use crate::error::{BookingError, BookingResult, ValidationError};
use crate::messages::Message;
use crate::navigation::Route;
use crate::pricing::{compute_breakdown, PriceBreakdown};
use crate::profile::{Address, Car};
use crate::selection::Selection;
use crate::slot::{group_by_date, LockState, SlotDay, SlotLock, TimeSlot};
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Selector option lists
#[derive(Debug, Clone, Default)]
pub struct SelectorOptions {
    pub cars: Vec<Car>,
    pub addresses: Vec<Address>,
    pub slots: Vec<TimeSlot>,
}

/// Result of one selector fetch
enum Fetched {
    Cars(BookingResult<ApiEnvelope<Vec<Car>>>),
    Addresses(BookingResult<ApiEnvelope<Vec<Address>>>),
    Slots(BookingResult<ApiEnvelope<Vec<TimeSlot>>>),
}

/// State of one booking-details screen
pub struct BookingSession {
    id: Uuid,
    ctx: ClientContext,
    item: CartLineItem,
    selection: Selection,
    lock: SlotLock,
    options: SelectorOptions,
    tasks: JoinSet<Fetched>,
}

impl std::fmt::Debug for BookingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingSession")
            .field("id", &self.id)
            .field("invoice_id", &self.item.invoice_id)
            .field("selection", &self.selection)
            .field("lock", &self.lock.state())
            .field("in_flight", &self.tasks.len())
            .finish()
    }
}

impl BookingSession {
    /// Fetch the cart and pick the entry for `invoice_id`.
    ///
    /// Without a session token this fails with `AuthRequired` before any
    /// request is made.
    #[instrument(skip(ctx), fields(backend = ctx.backend.backend_name()))]
    pub async fn load(ctx: ClientContext, invoice_id: i64) -> BookingResult<Self> {
        let token = ctx.token()?;

        let items = match ctx.backend.cart_items(&token).await {
            Ok(env) => env.into_content_or_default(),
            Err(err) => Err(err),
        };
        let items = items.map_err(|err| {
            error!(error = %err, "failed to load cart");
            ctx.fail(&err, Message::LoadDetailsFailed);
            err
        })?;

        let item = match find_by_invoice(&items, invoice_id) {
            Some(item) => item.clone(),
            None => {
                let err = BookingError::not_found(format!("cart item for invoice {}", invoice_id));
                warn!(invoice_id, "invoice not in cart");
                ctx.fail(&err, Message::ItemNotFound);
                return Err(err);
            }
        };

        Ok(Self::new(ctx, item))
    }

    /// Start a session for an already fetched line item
    pub fn new(ctx: ClientContext, item: CartLineItem) -> Self {
        let id = Uuid::new_v4();
        debug!(session_id = %id, invoice_id = item.invoice_id, "booking session created");
        Self {
            id,
            ctx,
            item,
            selection: Selection::new(),
            lock: SlotLock::new(),
            options: SelectorOptions::default(),
            tasks: JoinSet::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn item(&self) -> &CartLineItem {
        &self.item
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn options(&self) -> &SelectorOptions {
        &self.options
    }

    pub fn lock_state(&self) -> LockState {
        self.lock.state()
    }

    pub fn slot_lock(&self) -> &SlotLock {
        &self.lock
    }

    /// Selector fetches spawned but not yet collected
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Fetch cars, addresses and slots concurrently, then auto-select the
    /// first entry of each list where nothing is chosen yet.
    ///
    /// A failing list is reported on its own and leaves the others intact.
    #[instrument(skip(self), fields(session_id = %self.id, brand_id = self.item.brand_id))]
    pub async fn mount(&mut self) -> BookingResult<()> {
        let token = self.ctx.token()?;
        let brand_id = self.item.brand_id;

        let backend = self.ctx.backend.clone();
        let t = token.clone();
        self.tasks.spawn(async move { Fetched::Cars(backend.cars(&t).await) });

        let backend = self.ctx.backend.clone();
        let t = token.clone();
        self.tasks
            .spawn(async move { Fetched::Addresses(backend.addresses(&t).await) });

        let backend = self.ctx.backend.clone();
        self.tasks
            .spawn(async move { Fetched::Slots(backend.slots(&token, brand_id).await) });

        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(fetched) => self.apply_fetched(fetched),
                Err(e) if e.is_cancelled() => debug!("selector fetch cancelled"),
                Err(e) => error!(error = %e, "selector fetch panicked"),
            }
        }

        info!(
            cars = self.options.cars.len(),
            addresses = self.options.addresses.len(),
            slots = self.options.slots.len(),
            "booking session mounted"
        );
        Ok(())
    }

    fn apply_fetched(&mut self, fetched: Fetched) {
        match fetched {
            Fetched::Cars(res) => {
                if let Some(cars) = self.unwrap_list(res, Message::CarsLoadFailed) {
                    self.selection.select_car_if_empty(cars.first().map(|c| c.car_id));
                    self.options.cars = cars;
                }
            }
            Fetched::Addresses(res) => {
                if let Some(addresses) = self.unwrap_list(res, Message::AddressesLoadFailed) {
                    self.selection
                        .select_address_if_empty(addresses.first().map(|a| a.user_address_id));
                    self.options.addresses = addresses;
                }
            }
            Fetched::Slots(res) => {
                if let Some(slots) = self.unwrap_list(res, Message::SlotsLoadFailed) {
                    if slots.is_empty() {
                        debug!("no slots available for brand");
                    }
                    self.selection.select_slot_if_empty(slots.first().map(|s| s.slot_id));
                    self.options.slots = slots;
                }
            }
        }
    }

    fn unwrap_list<T>(&self, res: BookingResult<ApiEnvelope<Vec<T>>>, fallback: Message) -> Option<Vec<T>> {
        match res.and_then(ApiEnvelope::into_content_or_default) {
            Ok(list) => Some(list),
            Err(err) => {
                warn!(error = %err, "selector list failed to load");
                self.ctx.fail(&err, fallback);
                None
            }
        }
    }

    pub fn select_car(&mut self, car_id: i64) {
        self.selection.select_car(car_id);
    }

    pub fn select_address(&mut self, address_id: i64) {
        self.selection.select_address(address_id);
    }

    /// Selecting another slot leaves an existing server-side lock in place
    pub fn select_slot(&mut self, slot_id: i64) {
        self.selection.select_slot(slot_id);
    }

    pub fn toggle_terms_agreed(&mut self) {
        self.selection.toggle_terms_agreed();
    }

    /// Fetched slots grouped by date
    pub fn slot_days(&self) -> Vec<SlotDay> {
        group_by_date(&self.options.slots)
    }

    /// Price breakdown for the current item and discount
    pub fn breakdown(&self) -> PriceBreakdown {
        compute_breakdown(&self.item, self.selection.discount())
    }

    pub fn can_confirm(&self) -> bool {
        self.selection.can_confirm()
    }

    /// Tentatively reserve the selected slot. Advisory: the outcome never
    /// changes [`can_confirm`](Self::can_confirm).
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn lock_slot(&mut self) -> BookingResult<()> {
        let slot_id = match self.selection.slot_id() {
            Some(id) => id,
            None => return Err(self.reject(ValidationError::SlotNotSelected)),
        };
        let token = self.ctx.token()?;
        if let Err(v) = self.lock.begin(slot_id) {
            return Err(self.reject(v));
        }

        debug!(slot_id, "locking slot");
        match self.ctx.backend.lock_slot(&token, slot_id).await {
            Ok(env) if env.success => {
                self.lock.succeed();
                info!(slot_id, "slot locked");
                self.ctx.success_or(env.message(self.ctx.language), Message::SlotLocked);
                Ok(())
            }
            Ok(env) => {
                self.lock.fail();
                let err = BookingError::remote(env.message_ar, env.message_en);
                warn!(slot_id, error = %err, "slot lock rejected");
                self.ctx.fail(&err, Message::SlotLockFailed);
                Err(err)
            }
            Err(err) => {
                self.lock.fail();
                error!(slot_id, error = %err, "slot lock request failed");
                self.ctx.fail_with(&err, Message::SlotLockError);
                Err(err)
            }
        }
    }

    /// Validate `code` against the item's brand and apply it on success.
    /// A rejected code leaves any previously applied discount untouched.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn apply_discount(&mut self, code: &str) -> BookingResult<()> {
        let code = code.trim();
        if code.is_empty() {
            return Err(self.reject(ValidationError::EmptyDiscountCode));
        }
        let token = self.ctx.token()?;

        match self
            .ctx
            .backend
            .validate_discount(&token, code, self.item.brand_id)
            .await
        {
            Ok(env) if env.success => match env.content {
                Some(quote) => {
                    self.selection
                        .apply_discount(code, quote.discount_amount, quote.discount_type);
                    info!(code, amount = quote.discount_amount, kind = quote.discount_type.as_str(), "discount applied");
                    self.ctx.success(Message::DiscountApplied);
                    Ok(())
                }
                None => {
                    let err = BookingError::remote(env.message_ar, env.message_en);
                    self.ctx.fail_with(&err, Message::DiscountInvalid);
                    Err(err)
                }
            },
            Ok(env) => {
                let err = BookingError::remote(env.message_ar, env.message_en);
                debug!(code, "discount code rejected");
                self.ctx.fail_with(&err, Message::DiscountInvalid);
                Err(err)
            }
            Err(err) => {
                error!(error = %err, "discount validation failed");
                self.ctx.fail_with(&err, Message::DiscountCheckFailed);
                Err(err)
            }
        }
    }

    /// Initiate the card payment for the current selection.
    ///
    /// Validation and missing-token errors are returned as `Err`. Every
    /// remote outcome resolves to a route: the hosted payment page on
    /// success, the failure screen otherwise.
    #[instrument(skip(self), fields(session_id = %self.id, invoice_id = self.item.invoice_id))]
    pub async fn confirm(&mut self) -> BookingResult<Route> {
        let confirmed = match self.selection.validate() {
            Ok(c) => c,
            Err(v) => return Err(self.reject(v)),
        };
        let token = self.ctx.token()?;
        let request = PaymentRequest::from_selection(self.ctx.payment_method_id, self.item.invoice_id, confirmed);

        self.selection.set_processing(true);
        debug!(slot_id = request.slot_id, "initiating payment");
        let result = self.ctx.backend.initiate_payment(&token, &request).await;
        self.selection.set_processing(false);

        let route = match result {
            Ok(env) if env.success => {
                let url = env
                    .content
                    .as_ref()
                    .and_then(|c| c.redirect_url.clone())
                    .filter(|u| !u.trim().is_empty());
                match url {
                    Some(url) => {
                        info!("payment page issued");
                        self.ctx.success(Message::OpeningPaymentPage);
                        Route::PaymentPage(url)
                    }
                    None => {
                        // the server text here may be a success message
                        warn!("payment initiated without redirect url");
                        let err = BookingError::remote(None, None);
                        self.ctx.fail_with(&err, Message::BookingFailed);
                        Route::PaymentFailed
                    }
                }
            }
            Ok(env) => {
                let err = BookingError::remote(env.message_ar, env.message_en);
                warn!(error = %err, "payment initiation rejected");
                self.ctx.fail(&err, Message::BookingFailed);
                Route::PaymentFailed
            }
            Err(err) => {
                error!(error = %err, "payment initiation failed");
                self.ctx.fail_with(&err, Message::BookingError);
                Route::PaymentFailed
            }
        };
        Ok(route)
    }

    /// Abort in-flight selector fetches and discard the selection
    pub fn teardown(&mut self) {
        if !self.tasks.is_empty() {
            debug!(session_id = %self.id, in_flight = self.tasks.len(), "aborting selector fetches");
        }
        self.tasks.abort_all();
        self.selection = Selection::new();
        self.lock = SlotLock::new();
    }

    fn reject(&self, v: ValidationError) -> BookingError {
        let err = BookingError::from(v);
        self.ctx.fail(&err, v.message());
        err
    }
}
