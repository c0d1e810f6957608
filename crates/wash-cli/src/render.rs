//! # Console Rendering
//!
//! Plain-text views of the booking screens and a [`Notifier`] that prints
//! toasts to stderr.

use std::fmt::Write as _;
use wash_core::{
    Address, BrandReview, CartEntry, Car, DiscountDescriptor, Language, Message, Notice, NoticeLevel, Notifier,
    OrderRecord, PriceBreakdown, Provider, Service, SlotDay, SlotLock,
};

/// Prints toasts to stderr and logs them
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => {
                tracing::debug!(notice = %notice.text, "success notice");
                eprintln!("✔ {}", notice.text);
            }
            NoticeLevel::Error => {
                tracing::debug!(notice = %notice.text, "error notice");
                eprintln!("✖ {}", notice.text);
            }
        }
    }
}

/// Subtotal, discount and total rows
pub fn breakdown(b: &PriceBreakdown, discount: Option<&DiscountDescriptor>, lang: Language) -> String {
    let (sub, disc, total) = match lang {
        Language::Ar => ("المجموع الفرعي", "الخصم", "الإجمالي"),
        Language::En => ("Subtotal", "Discount", "Total"),
    };
    let mut out = String::new();
    let _ = writeln!(out, "  {:<14} {}", sub, b.subtotal.display(lang));
    if let Some(d) = discount {
        let _ = writeln!(out, "  {:<14} -{} [{}]", disc, b.discount_value.display(lang), d.label());
    }
    let _ = writeln!(out, "  {:<14} {}", total, b.total.display(lang));
    out
}

/// One cart entry with its extras and prices
pub fn cart_entry(entry: &CartEntry, lang: Language) -> String {
    let item = &entry.item;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "#{} {} · {} ({})",
        item.invoice_id,
        item.brand_name(lang),
        item.item_dto.name(lang),
        item.item_dto.service_type(lang)
    );
    if let Some(id) = item.item_dto.invoice_item_id {
        let _ = writeln!(out, "  item id: {}", id);
    }
    let _ = writeln!(out, "  base: {}", item.base_price().display(lang));
    for extra in item.extras() {
        let _ = writeln!(out, "  + {} {}", extra.name(lang), extra.item_extra_price.display(lang));
    }
    out.push_str(&breakdown(&entry.breakdown, None, lang));
    out
}

/// Cars with the selected one marked
pub fn cars(cars: &[Car], selected: Option<i64>) -> String {
    let mut out = String::new();
    for car in cars {
        let _ = writeln!(out, "{} [{}] {}", marker(selected == Some(car.car_id)), car.car_id, car.summary());
    }
    out
}

/// Addresses with the selected one marked
pub fn addresses(addresses: &[Address], selected: Option<i64>) -> String {
    let mut out = String::new();
    for address in addresses {
        let _ = writeln!(
            out,
            "{} [{}] {}",
            marker(selected == Some(address.user_address_id)),
            address.user_address_id,
            address.summary()
        );
    }
    out
}

/// Slots grouped by day, with lock labels
pub fn slot_days(days: &[SlotDay], selected: Option<i64>, lock: &SlotLock, lang: Language) -> String {
    if days.is_empty() {
        return format!("{}\n", Message::NoSlotsAvailable.text(lang));
    }
    let mut out = String::new();
    for (index, day) in days.iter().enumerate() {
        let _ = writeln!(out, "{}", wash_core::slot::day_label(day.date, index, lang));
        for slot in &day.slots {
            let label = lock.button_label(slot.slot_id);
            let _ = write!(
                out,
                "  {} [{}] {}",
                marker(selected == Some(slot.slot_id)),
                slot.slot_id,
                slot.display_range(lang)
            );
            if label != Message::ReserveSlot {
                let _ = write!(out, "  ({})", label.text(lang));
            }
            out.push('\n');
        }
    }
    out
}

/// One order row
pub fn order(order: &OrderRecord, lang: Language) -> String {
    let brand = match lang {
        Language::Ar if !order.brand_name_ar.is_empty() => &order.brand_name_ar,
        _ if !order.brand_name_en.is_empty() => &order.brand_name_en,
        _ => &order.brand_name_ar,
    };
    let when = [
        order.reservation_date.as_deref(),
        order.from_time.as_deref(),
        order.time_to.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");

    let mut line = format!(
        "#{} (request {}) {} · {} · {} · {}",
        order.invoice_id,
        order.request.id,
        brand,
        order.item_dto.name(lang),
        order.total_amount.display(lang),
        order.request.status_name
    );
    if !when.is_empty() {
        let _ = write!(line, " · {}", when);
    }
    if order.can_review() {
        line.push_str(" · reviewable");
    }
    line
}

/// One provider row: id, name, rating and availability
pub fn provider(provider: &Provider, lang: Language) -> String {
    let mut line = format!(
        "[{}] {} {} {:.1}",
        provider.brand_id,
        provider.name(lang),
        stars(provider.stars()),
        provider.avg_appraisal
    );
    if !provider.available {
        line.push_str(match lang {
            Language::Ar => " · غير متاح",
            Language::En => " · unavailable",
        });
    }
    line
}

/// A service with its extras, ids shown for `cart add`
pub fn service(service: &Service, lang: Language) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "[{}] {} ({}) {}",
        service.service_id,
        service.name(lang),
        service.service_type(lang),
        service.services_price.display(lang)
    );
    for extra in service.extras() {
        let _ = writeln!(out, "  + [{}] {} {}", extra.id, extra.name(lang), extra.extra_price.display(lang));
    }
    out
}

pub fn review(review: &BrandReview) -> String {
    let mut line = format!("{} {}", stars(review.stars()), review.username);
    if !review.description.trim().is_empty() {
        let _ = write!(line, ": {}", review.description.trim());
    }
    line
}

fn stars(count: u8) -> String {
    let count = usize::from(count.min(5));
    format!("{}{}", "★".repeat(count), "☆".repeat(5 - count))
}

fn marker(selected: bool) -> &'static str {
    if selected {
        "●"
    } else {
        "○"
    }
}
