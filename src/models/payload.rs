use serde::Deserialize;
use serde_json::{Map, Value};

/// One customer form submission, as posted by the web application's proxy.
/// Each variant is independently shaped; payloads are transient request
/// bodies and are discarded after formatting.
#[derive(Debug, Clone)]
pub enum NotificationPayload {
    PickupRequest(PickupRequestPayload),
    DeliveryOrder(DeliveryOrderPayload),
    Form(FormSubmission),
}

impl NotificationPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationPayload::PickupRequest(_) => "pickup_request",
            NotificationPayload::DeliveryOrder(_) => "delivery_order",
            NotificationPayload::Form(_) => "form",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupRequestPayload {
    pub surname: String,
    pub name: String,
    pub phone: String,

    pub city_from: String,
    pub address_from: String,

    #[serde(default)]
    pub weight: Option<f64>,

    #[serde(default)]
    pub long: Option<f64>,

    #[serde(default)]
    pub width: Option<f64>,

    #[serde(default)]
    pub height: Option<f64>,

    #[serde(default)]
    pub comment: Option<String>,

    #[serde(default)]
    pub viber: bool,

    #[serde(default)]
    pub whatsapp: bool,

    #[serde(default)]
    pub telegram: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOrderPayload {
    pub surname: String,
    pub name: String,
    pub phone: String,

    #[serde(default)]
    pub viber: bool,

    #[serde(default)]
    pub whatsapp: bool,

    #[serde(default)]
    pub telegram: bool,

    pub city_from: String,
    pub address_from: String,

    #[serde(default)]
    pub weight: Option<f64>,

    #[serde(default)]
    pub long: Option<f64>,

    #[serde(default)]
    pub width: Option<f64>,

    #[serde(default)]
    pub height: Option<f64>,

    #[serde(default)]
    pub declared_value: Option<f64>,

    pub recipient_surname: String,
    pub recipient_name: String,
    pub recipient_phone: String,

    #[serde(default)]
    pub recipient_viber: bool,

    #[serde(default)]
    pub recipient_whatsapp: bool,

    #[serde(default)]
    pub recipient_telegram: bool,

    pub city_to: String,

    /// Pickup-point reference. Takes precedence over `address_to` when both
    /// are present.
    #[serde(default)]
    pub department: Option<String>,

    #[serde(default)]
    pub address_to: Option<String>,

    #[serde(default)]
    pub payer_surname: Option<String>,

    #[serde(default)]
    pub payer_name: Option<String>,

    #[serde(default)]
    pub payer_phone: Option<String>,
}

/// Fallback shape for forms without a dedicated variant. `fields` keeps the
/// submission's key order (serde_json is built with `preserve_order`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmission {
    #[serde(default)]
    pub form_name: Option<String>,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}
