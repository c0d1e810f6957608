//! # Service Providers
//!
//! The public catalogue: providers (brands), the services each one offers
//! with their optional extras, and the reviews left on a brand. None of
//! these endpoints need a session token; adding a service to the cart does.

use crate::cart::pick;
use crate::messages::Language;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A car-wash provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub brand_id: i64,

    #[serde(default)]
    pub brand_name_ar: String,

    #[serde(default)]
    pub brand_name_en: String,

    #[serde(default)]
    pub brand_descriptions_ar: Option<String>,

    #[serde(default)]
    pub brand_descriptions_en: Option<String>,

    /// Path relative to the media host
    #[serde(default)]
    pub brand_logo: Option<String>,

    #[serde(default)]
    pub avg_appraisal: f64,

    #[serde(default)]
    pub available: bool,
}

impl Provider {
    pub fn name(&self, lang: Language) -> &str {
        pick(&self.brand_name_ar, &self.brand_name_en, lang)
    }

    pub fn description(&self, lang: Language) -> Option<&str> {
        let ar = self.brand_descriptions_ar.as_deref().unwrap_or_default();
        let en = self.brand_descriptions_en.as_deref().unwrap_or_default();
        Some(pick(ar, en, lang)).filter(|d| !d.trim().is_empty())
    }

    /// Average rating rounded to whole stars
    pub fn stars(&self) -> u8 {
        stars(self.avg_appraisal)
    }
}

/// An optional add-on to a service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraService {
    pub id: i64,

    #[serde(default)]
    pub extra_name_ar: String,

    #[serde(default)]
    pub extra_name_en: String,

    #[serde(default)]
    pub extra_price: Money,
}

impl ExtraService {
    pub fn name(&self, lang: Language) -> &str {
        pick(&self.extra_name_ar, &self.extra_name_en, lang)
    }
}

/// A service offered by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub service_id: i64,

    #[serde(default)]
    pub brand_id: i64,

    #[serde(default)]
    pub services_name_ar: String,

    #[serde(default)]
    pub services_name_en: String,

    #[serde(default)]
    pub service_type_name_ar: String,

    #[serde(default)]
    pub service_type_name_en: String,

    #[serde(default)]
    pub services_price: Money,

    #[serde(default)]
    pub avg_appraisal: f64,

    /// `null` when the service has no extras
    #[serde(default)]
    pub extra_services: Option<Vec<ExtraService>>,
}

impl Service {
    pub fn name(&self, lang: Language) -> &str {
        pick(&self.services_name_ar, &self.services_name_en, lang)
    }

    pub fn service_type(&self, lang: Language) -> &str {
        pick(&self.service_type_name_ar, &self.service_type_name_en, lang)
    }

    pub fn extras(&self) -> &[ExtraService] {
        self.extra_services.as_deref().unwrap_or_default()
    }

    /// Ids in `extra_ids` that this service does not offer
    pub fn unknown_extras(&self, extra_ids: &[i64]) -> Vec<i64> {
        extra_ids
            .iter()
            .copied()
            .filter(|id| !self.extras().iter().any(|e| e.id == *id))
            .collect()
    }

    /// Base price plus the chosen extras
    pub fn price_with(&self, extra_ids: &[i64]) -> Money {
        self.extras()
            .iter()
            .filter(|e| extra_ids.contains(&e.id))
            .map(|e| e.extra_price)
            .fold(self.services_price, |acc, p| acc + p)
    }
}

/// A review left on a brand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandReview {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub appraisal: f64,

    #[serde(default)]
    pub description: String,
}

impl BrandReview {
    pub fn stars(&self) -> u8 {
        stars(self.appraisal)
    }
}

/// A page of a public listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,

    #[serde(default)]
    pub total_pages: Option<u32>,

    #[serde(default)]
    pub total_elements: Option<u64>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            total_pages: None,
            total_elements: None,
        }
    }
}

/// Body of `consumer/addToCart`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub service_id: i64,
    pub extra_services: Vec<i64>,
}

fn stars(appraisal: f64) -> u8 {
    appraisal.round().clamp(0.0, 5.0) as u8
}
