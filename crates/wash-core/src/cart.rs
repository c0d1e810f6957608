//! # Cart Types
//!
//! Cart line items as returned by `consumer/getCartItems`. The client only
//! ever holds a read-only snapshot, fetched fresh for each booking session.

use crate::messages::Language;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// An extra service attached to a cart item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraLineItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_extra_id: Option<i64>,

    #[serde(default)]
    pub item_extra_name_ar: String,

    #[serde(default)]
    pub item_extra_name_en: String,

    #[serde(default)]
    pub item_extra_price: Money,
}

impl ExtraLineItem {
    pub fn new(name: impl Into<String>, price: Money) -> Self {
        let name = name.into();
        Self {
            item_extra_id: None,
            item_extra_name_ar: name.clone(),
            item_extra_name_en: name,
            item_extra_price: price,
        }
    }

    pub fn name(&self, lang: Language) -> &str {
        pick(&self.item_extra_name_ar, &self.item_extra_name_en, lang)
    }
}

/// The booked service inside a cart entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_item_id: Option<i64>,

    #[serde(default)]
    pub item_name_ar: String,

    #[serde(default)]
    pub item_name_en: String,

    #[serde(default)]
    pub service_type_ar: String,

    #[serde(default)]
    pub service_type_en: String,

    /// Base service price
    #[serde(default)]
    pub item_price: Money,

    /// Ordered extras; older payloads call this `extras`
    #[serde(default, alias = "extras")]
    pub item_extra_dtos: Vec<ExtraLineItem>,
}

impl ServiceItem {
    pub fn name(&self, lang: Language) -> &str {
        pick(&self.item_name_ar, &self.item_name_en, lang)
    }

    pub fn service_type(&self, lang: Language) -> &str {
        pick(&self.service_type_ar, &self.service_type_en, lang)
    }

    /// Sum of the extra prices
    pub fn extras_total(&self) -> Money {
        self.item_extra_dtos.iter().map(|e| e.item_extra_price).sum()
    }
}

/// One previously added service awaiting booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub invoice_id: i64,

    #[serde(default)]
    pub brand_id: i64,

    #[serde(default)]
    pub brand_name_ar: String,

    #[serde(default)]
    pub brand_name_en: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_logo: Option<String>,

    #[serde(default)]
    pub status: String,

    /// Server-side total, informational only; the client recomputes prices
    #[serde(default)]
    pub total_amount: Money,

    /// Older payloads call this `item`
    #[serde(default, alias = "item")]
    pub item_dto: ServiceItem,
}

impl CartLineItem {
    /// Build a line item from a base price and extras
    pub fn new(invoice_id: i64, brand_id: i64, base_price: Money, extras: Vec<ExtraLineItem>) -> Self {
        Self {
            invoice_id,
            brand_id,
            brand_name_ar: String::new(),
            brand_name_en: String::new(),
            brand_logo: None,
            status: String::new(),
            total_amount: Money::ZERO,
            item_dto: ServiceItem {
                item_price: base_price,
                item_extra_dtos: extras,
                ..ServiceItem::default()
            },
        }
    }

    pub fn base_price(&self) -> Money {
        self.item_dto.item_price
    }

    pub fn extras(&self) -> &[ExtraLineItem] {
        &self.item_dto.item_extra_dtos
    }

    pub fn brand_name(&self, lang: Language) -> &str {
        let name = pick(&self.brand_name_ar, &self.brand_name_en, lang);
        if name.is_empty() {
            "Name - الاسم"
        } else {
            name
        }
    }
}

/// Find the cart entry for `invoice_id`
pub fn find_by_invoice(items: &[CartLineItem], invoice_id: i64) -> Option<&CartLineItem> {
    items.iter().find(|i| i.invoice_id == invoice_id)
}

pub(crate) fn pick<'a>(ar: &'a str, en: &'a str, lang: Language) -> &'a str {
    match lang {
        Language::Ar if !ar.is_empty() => ar,
        Language::En if !en.is_empty() => en,
        _ if !ar.is_empty() => ar,
        _ => en,
    }
}
