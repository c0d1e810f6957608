//! # Cars and Addresses
//!
//! Option lists for the car and address selectors. Managed elsewhere;
//! the booking flow only reads them.

use serde::{Deserialize, Serialize};

/// A car registered by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub car_id: i64,

    #[serde(default)]
    pub car_brand_ar: Option<String>,

    #[serde(default)]
    pub car_brand_en: Option<String>,

    #[serde(default)]
    pub car_model_ar: Option<String>,

    #[serde(default)]
    pub car_model_en: Option<String>,

    #[serde(default)]
    pub car_color_ar: Option<String>,

    #[serde(default)]
    pub car_color_en: Option<String>,

    #[serde(default)]
    pub car_plate_no: String,
}

impl Car {
    /// "Toyota Camry · ABC 1234"
    pub fn summary(&self) -> String {
        let brand = self.car_brand_en.as_deref().or(self.car_brand_ar.as_deref());
        let model = self.car_model_en.as_deref().or(self.car_model_ar.as_deref());
        let name = [brand, model].into_iter().flatten().collect::<Vec<_>>().join(" ");
        if name.is_empty() {
            self.car_plate_no.clone()
        } else {
            format!("{} · {}", name, self.car_plate_no)
        }
    }
}

/// A saved service address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub user_address_id: i64,

    #[serde(default)]
    pub address_title: String,

    #[serde(default)]
    pub city_ar: String,

    #[serde(default)]
    pub city_en: String,

    #[serde(default)]
    pub district_ar: String,

    #[serde(default)]
    pub district_en: String,

    #[serde(default)]
    pub latitude: String,

    #[serde(default)]
    pub longitude: String,
}

impl Address {
    /// "Home · Olaya, Riyadh"
    pub fn summary(&self) -> String {
        let district = if self.district_en.is_empty() { &self.district_ar } else { &self.district_en };
        let city = if self.city_en.is_empty() { &self.city_ar } else { &self.city_en };
        format!("{} · {}, {}", self.address_title, district, city)
    }
}
