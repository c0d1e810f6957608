//! # User-facing messages
//!
//! Every toast the client can show, in Arabic and English.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Display language. Arabic is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ar,
    En,
}

impl Language {
    /// Code sent to the auth endpoints
    pub fn wire_code(&self) -> &'static str {
        match self {
            Language::Ar => "AR",
            Language::En => "EN",
        }
    }

    /// Currency label for amounts
    pub fn currency_label(&self) -> &'static str {
        match self {
            Language::Ar => "ر.س",
            Language::En => "SAR",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ar" => Ok(Language::Ar),
            "en" => Ok(Language::En),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Language::Ar => "ar",
            Language::En => "en",
        })
    }
}

/// Known message keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    LoginRequired,
    ItemNotFound,
    LoadDetailsFailed,
    SelectCar,
    SelectAddress,
    SelectSlot,
    AgreeToTerms,
    EnterDiscountCode,
    DiscountApplied,
    DiscountInvalid,
    DiscountCheckFailed,
    SlotLocked,
    SlotLockFailed,
    SlotLockError,
    SlotBooked,
    ReserveSlot,
    LockInFlight,
    SlotsLoadFailed,
    NoSlotsAvailable,
    CarsLoadFailed,
    AddressesLoadFailed,
    OpeningPaymentPage,
    BookingFailed,
    BookingError,
    ConfirmationInFlight,
    PaymentSucceeded,
    PaymentFailed,
    EnterPhoneNumber,
    EnterSixDigitOtp,
    OtpSent,
    LoggedIn,
    AuthFailed,
    LoggedOut,
    CartLoadFailed,
    CartItemDeleted,
    CartDeleteFailed,
    OrdersLoadFailed,
    OrdersLoadError,
    OrderCancelled,
    OrderCancelFailed,
    ReviewAdded,
    ReviewFailed,
    ProvidersLoadFailed,
    ProviderNotFound,
    ServicesLoadFailed,
    ReviewsLoadFailed,
    AddedToCart,
    AddToCartFailed,
    AlreadyInCart,
}

impl Message {
    /// Text in the requested language
    pub fn text(&self, lang: Language) -> &'static str {
        let (ar, en) = match self {
            Message::LoginRequired => ("يجب تسجيل الدخول أولاً", "You need to log in first"),
            Message::ItemNotFound => ("لم يتم العثور على العنصر", "Item not found"),
            Message::LoadDetailsFailed => (
                "حدث خطأ أثناء تحميل التفاصيل",
                "Something went wrong while loading the details",
            ),
            Message::SelectCar => ("الرجاء اختيار سيارة", "Please select a car"),
            Message::SelectAddress => ("الرجاء اختيار عنوان", "Please select an address"),
            Message::SelectSlot => ("الرجاء اختيار موعد", "Please select a time slot"),
            Message::AgreeToTerms => (
                "الرجاء الموافقة على الشروط والأحكام",
                "Please agree to the terms and conditions",
            ),
            Message::EnterDiscountCode => ("الرجاء إدخال كود الخصم", "Please enter a discount code"),
            Message::DiscountApplied => ("تم تطبيق الخصم بنجاح", "Discount applied"),
            Message::DiscountInvalid => ("كود الخصم غير صالح", "Invalid discount code"),
            Message::DiscountCheckFailed => (
                "حدث خطأ أثناء التحقق من كود الخصم",
                "Something went wrong while checking the discount code",
            ),
            Message::SlotLocked => ("تم حجز الموعد مؤقتاً", "Slot reserved temporarily"),
            Message::SlotLockFailed => ("فشل حجز الموعد", "Could not reserve the slot"),
            Message::SlotLockError => (
                "حدث خطأ أثناء قفل الموعد",
                "Something went wrong while reserving the slot",
            ),
            Message::SlotBooked => ("محجوز", "Booked"),
            Message::ReserveSlot => ("تأكيد حجز الوقت", "Reserve this slot"),
            Message::LockInFlight => ("جارٍ حجز الموعد...", "Reserving the slot..."),
            Message::SlotsLoadFailed => (
                "حدث خطأ أثناء تحميل المواعيد المتاحة",
                "Something went wrong while loading available slots",
            ),
            Message::NoSlotsAvailable => ("لا توجد مواعيد متاحة", "No slots available"),
            Message::CarsLoadFailed => ("فشل في جلب السيارات", "Could not load your cars"),
            Message::AddressesLoadFailed => ("فشل في جلب العناوين", "Could not load your addresses"),
            Message::OpeningPaymentPage => (
                "جارٍ فتح صفحة الدفع داخل التطبيق...",
                "Opening the payment page...",
            ),
            Message::BookingFailed => ("فشل تأكيد الحجز", "Booking confirmation failed"),
            Message::BookingError => (
                "حدث خطأ أثناء تأكيد الحجز",
                "Something went wrong while confirming the booking",
            ),
            Message::ConfirmationInFlight => ("جارٍ تأكيد الحجز...", "Confirmation in progress..."),
            Message::PaymentSucceeded => ("تمت عملية الدفع بنجاح", "Payment completed"),
            Message::PaymentFailed => ("فشلت عملية الدفع", "Payment failed"),
            Message::EnterPhoneNumber => ("الرجاء إدخال رقم الجوال", "Please enter your mobile number"),
            Message::EnterSixDigitOtp => (
                "الرجاء إدخال رمز التحقق المكون من 6 أرقام",
                "Please enter the 6-digit verification code",
            ),
            Message::OtpSent => ("تم إرسال رمز التحقق", "Verification code sent"),
            Message::LoggedIn => ("تم تسجيل الدخول بنجاح", "Logged in"),
            Message::AuthFailed => ("فشل تسجيل الدخول", "Login failed"),
            Message::LoggedOut => ("تم تسجيل الخروج", "Logged out"),
            Message::CartLoadFailed => ("فشل في جلب السلة", "Could not load the cart"),
            Message::CartItemDeleted => ("تم حذف العنصر من السلة", "Item removed from cart"),
            Message::CartDeleteFailed => ("فشل حذف العنصر", "Could not remove the item"),
            Message::OrdersLoadFailed => ("فشل في جلب الطلبات", "Could not load orders"),
            Message::OrdersLoadError => (
                "حدث خطأ أثناء جلب الطلبات",
                "Something went wrong while loading orders",
            ),
            Message::OrderCancelled => ("تم إلغاء الطلب بنجاح", "Order cancelled"),
            Message::OrderCancelFailed => ("فشل إلغاء الطلب", "Could not cancel the order"),
            Message::ReviewAdded => ("تم إضافة التقييم بنجاح", "Review added"),
            Message::ReviewFailed => ("فشل إضافة التقييم", "Could not add the review"),
            Message::ProvidersLoadFailed => ("فشل في جلب بيانات مزود الخدمة", "Could not load service providers"),
            Message::ProviderNotFound => ("لم يتم العثور على مزود الخدمة", "Service provider not found"),
            Message::ServicesLoadFailed => ("فشل في جلب قائمة الخدمات", "Could not load services"),
            Message::ReviewsLoadFailed => ("فشل في جلب التقييمات", "Could not load reviews"),
            Message::AddedToCart => ("تمت الإضافة إلى السلة بنجاح", "Added to cart"),
            Message::AddToCartFailed => (
                "حدث خطأ أثناء إضافة الخدمة إلى السلة",
                "Something went wrong while adding the service to the cart",
            ),
            Message::AlreadyInCart => ("الخدمة موجودة بالفعل في السلة", "This service is already in your cart"),
        };
        match lang {
            Language::Ar => ar,
            Language::En => en,
        }
    }
}
