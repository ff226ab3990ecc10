use chrono::{DateTime, Local};
use serde_json::Value;

use crate::models::payload::{
    DeliveryOrderPayload, FormSubmission, NotificationPayload, PickupRequestPayload,
};

const PLACEHOLDER: &str = "—";

pub fn format_payload(payload: &NotificationPayload) -> String {
    render_payload(payload, Local::now())
}

pub fn format_pickup_request(payload: &PickupRequestPayload) -> String {
    render_pickup_request(payload, Local::now())
}

pub fn format_delivery_order(payload: &DeliveryOrderPayload) -> String {
    render_delivery_order(payload, Local::now())
}

pub fn format_form(payload: &FormSubmission) -> String {
    render_form(payload, Local::now())
}

pub fn render_payload(payload: &NotificationPayload, timestamp: DateTime<Local>) -> String {
    match payload {
        NotificationPayload::PickupRequest(payload) => render_pickup_request(payload, timestamp),
        NotificationPayload::DeliveryOrder(payload) => render_delivery_order(payload, timestamp),
        NotificationPayload::Form(payload) => render_form(payload, timestamp),
    }
}

pub fn render_pickup_request(payload: &PickupRequestPayload, timestamp: DateTime<Local>) -> String {
    let mut sections = vec!["📦 *Новая заявка на вызов курьера*".to_string()];

    let mut sender = vec![
        "Отправитель:".to_string(),
        format!("Фамилия: {}", payload.surname),
        format!("Имя: {}", payload.name),
        format!("Телефон: {}", payload.phone),
    ];
    if let Some(line) = channels_line(payload.viber, payload.whatsapp, payload.telegram) {
        sender.push(line);
    }
    sections.push(sender.join("\n"));

    sections.push(
        [
            "Забор груза:".to_string(),
            format!("Город: {}", payload.city_from),
            format!("Адрес: {}", payload.address_from),
        ]
        .join("\n"),
    );

    if let Some(section) = package_section(
        payload.weight,
        payload.long,
        payload.width,
        payload.height,
        None,
        payload.comment.as_deref(),
    ) {
        sections.push(section);
    }

    sections.push(timestamp_line(timestamp));
    sections.join("\n\n")
}

pub fn render_delivery_order(payload: &DeliveryOrderPayload, timestamp: DateTime<Local>) -> String {
    let mut sections = vec!["🚚 *Новый заказ на доставку*".to_string()];

    let mut sender = vec![
        "Отправитель:".to_string(),
        format!("Фамилия: {}", payload.surname),
        format!("Имя: {}", payload.name),
        format!("Телефон: {}", payload.phone),
    ];
    if let Some(line) = channels_line(payload.viber, payload.whatsapp, payload.telegram) {
        sender.push(line);
    }
    sections.push(sender.join("\n"));

    sections.push(
        [
            "Откуда:".to_string(),
            format!("Город: {}", payload.city_from),
            format!("Адрес: {}", payload.address_from),
        ]
        .join("\n"),
    );

    if let Some(section) = package_section(
        payload.weight,
        payload.long,
        payload.width,
        payload.height,
        payload.declared_value,
        None,
    ) {
        sections.push(section);
    }

    let mut recipient = vec![
        "Получатель:".to_string(),
        format!("Фамилия: {}", payload.recipient_surname),
        format!("Имя: {}", payload.recipient_name),
        format!("Телефон: {}", payload.recipient_phone),
    ];
    if let Some(line) = channels_line(
        payload.recipient_viber,
        payload.recipient_whatsapp,
        payload.recipient_telegram,
    ) {
        recipient.push(line);
    }
    sections.push(recipient.join("\n"));

    let mut destination = vec![
        "Куда:".to_string(),
        format!("Город: {}", payload.city_to),
    ];
    // Pickup point wins over a raw street address when both are present.
    if let Some(department) = non_empty(payload.department.as_deref()) {
        destination.push(format!("Отделение: {}", department));
    } else if let Some(address) = non_empty(payload.address_to.as_deref()) {
        destination.push(format!("Адрес: {}", address));
    }
    sections.push(destination.join("\n"));

    if let (Some(payer_surname), Some(payer_name)) = (
        non_empty(payload.payer_surname.as_deref()),
        non_empty(payload.payer_name.as_deref()),
    ) {
        sections.push(
            [
                "Плательщик (третье лицо):".to_string(),
                format!("Фамилия: {}", payer_surname),
                format!("Имя: {}", payer_name),
                format!(
                    "Телефон: {}",
                    non_empty(payload.payer_phone.as_deref()).unwrap_or(PLACEHOLDER)
                ),
            ]
            .join("\n"),
        );
    }

    sections.push(timestamp_line(timestamp));
    sections.join("\n\n")
}

pub fn render_form(payload: &FormSubmission, timestamp: DateTime<Local>) -> String {
    let title = non_empty(payload.form_name.as_deref()).unwrap_or("Новая заявка с сайта");

    let mut sections = vec![format!("📝 *{}*", title)];

    let mut lines = Vec::new();
    for (key, value) in &payload.fields {
        let Some(rendered) = render_value(value) else {
            continue;
        };
        lines.push(format!("{}: {}", humanize_key(key), rendered));
    }
    if !lines.is_empty() {
        sections.push(lines.join("\n"));
    }

    sections.push(timestamp_line(timestamp));
    sections.join("\n\n")
}

fn package_section(
    weight: Option<f64>,
    long: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
    declared_value: Option<f64>,
    comment: Option<&str>,
) -> Option<String> {
    let mut lines = Vec::new();

    if let Some(weight) = weight {
        if weight != 0.0 {
            lines.push(format!("Вес: {} кг", format_number(weight)));
        }
    }
    if let Some(line) = dimensions_line(long, width, height) {
        lines.push(line);
    }
    if let Some(value) = declared_value {
        if value != 0.0 {
            lines.push(format!("Объявленная стоимость: {}", format_number(value)));
        }
    }
    if let Some(comment) = non_empty(comment) {
        lines.push(format!("Комментарий: {}", comment));
    }

    if lines.is_empty() {
        return None;
    }

    let mut section = vec!["Груз:".to_string()];
    section.extend(lines);
    Some(section.join("\n"))
}

/// Rendered only when all three dimensions are present and non-zero.
fn dimensions_line(long: Option<f64>, width: Option<f64>, height: Option<f64>) -> Option<String> {
    match (long, width, height) {
        (Some(long), Some(width), Some(height))
            if long != 0.0 && width != 0.0 && height != 0.0 =>
        {
            Some(format!(
                "Размеры: {} × {} × {} см",
                format_number(long),
                format_number(width),
                format_number(height)
            ))
        }
        _ => None,
    }
}

/// Lists the enabled contact channels in fixed order, or nothing when the
/// person checked none of them.
fn channels_line(viber: bool, whatsapp: bool, telegram: bool) -> Option<String> {
    let mut channels = Vec::new();
    if viber {
        channels.push("Viber");
    }
    if whatsapp {
        channels.push("WhatsApp");
    }
    if telegram {
        channels.push("Telegram");
    }

    if channels.is_empty() {
        None
    } else {
        Some(format!("Способ связи: {}", channels.join(", ")))
    }
}

fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(true) => Some("да".to_string()),
        Value::Bool(false) => Some("нет".to_string()),
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}

/// `firstName` becomes `First Name`: a space before each internal capital,
/// first letter upper-cased.
fn humanize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (index, ch) in key.chars().enumerate() {
        if index == 0 {
            out.extend(ch.to_uppercase());
        } else {
            if ch.is_uppercase() {
                out.push(' ');
            }
            out.push(ch);
        }
    }
    out
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn timestamp_line(timestamp: DateTime<Local>) -> String {
    format!("Отправлено: {}", timestamp.format("%d.%m.%Y, %H:%M"))
}
