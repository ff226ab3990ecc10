use std::time::Duration;

use anyhow::Result;
use relay_service::{clients::telegram::TelegramClient, dispatcher::Dispatcher};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, body_string_contains, method, path},
};

const SEND_PATH: &str = "/bottest-token/sendMessage";

fn dispatcher_for(server: &MockServer, recipients: Vec<i64>) -> Result<Dispatcher> {
    let client = TelegramClient::new(&server.uri(), "test-token")?;
    Ok(Dispatcher::new(client, recipients))
}

/// Test: Empty recipient list is a no-op returning an unsuccessful aggregate
#[tokio::test]
async fn test_empty_recipient_list_is_a_no_op() -> Result<()> {
    let server = MockServer::start().await;
    let dispatcher = dispatcher_for(&server, vec![])?;

    let result = dispatcher.dispatch("hello").await;

    assert!(!result.success);
    assert_eq!(result.sent, 0);
    assert_eq!(result.failed, 0);
    assert!(result.errors.is_empty());

    let requests = server.received_requests().await.unwrap_or_default();
    assert!(
        requests.is_empty(),
        "No transport calls should be attempted for an empty recipient list"
    );

    Ok(())
}

/// Test: Partial failure still reports overall success with per-recipient detail
#[tokio::test]
async fn test_partial_failure_reports_success() -> Result<()> {
    let server = MockServer::start().await;

    for chat_id in [1, 3] {
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .and(body_partial_json(json!({"chat_id": chat_id})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})),
            )
            .mount(&server)
            .await;
    }

    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .and(body_partial_json(json!({"chat_id": 2})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "description": "Bad Request: chat not found"
        })))
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server, vec![1, 2, 3])?;
    let result = dispatcher.dispatch("alert").await;

    assert!(result.success, "One delivered recipient should mean overall success");
    assert_eq!(result.sent, 2);
    assert_eq!(result.failed, 1);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].recipient, 2);
    assert!(
        result.errors[0].error.contains("chat not found"),
        "The transport's error description should be captured, got: {}",
        result.errors[0].error
    );

    Ok(())
}

/// Test: sent + failed always equals the configured recipient count
#[tokio::test]
async fn test_all_recipients_fail() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "ok": false,
            "description": "Internal Server Error"
        })))
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server, vec![1, 2, 3])?;
    let result = dispatcher.dispatch("alert").await;

    assert!(!result.success);
    assert_eq!(result.sent, 0);
    assert_eq!(result.failed, 3);
    assert_eq!(result.sent + result.failed, 3);

    let failed: Vec<i64> = result.errors.iter().map(|error| error.recipient).collect();
    assert_eq!(failed, vec![1, 2, 3]);

    Ok(())
}

/// Test: Failure order follows the configured recipient order, not completion order
#[tokio::test]
async fn test_failure_order_is_deterministic() -> Result<()> {
    let server = MockServer::start().await;

    // The first recipient resolves last; its failure entry must still come first.
    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .and(body_partial_json(json!({"chat_id": 10})))
        .respond_with(
            ResponseTemplate::new(400)
                .set_delay(Duration::from_millis(300))
                .set_body_json(json!({"ok": false, "description": "slow failure"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .and(body_partial_json(json!({"chat_id": 20})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "description": "fast failure"
        })))
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server, vec![10, 20])?;
    let result = dispatcher.dispatch("alert").await;

    assert_eq!(result.failed, 2);
    assert_eq!(result.errors[0].recipient, 10);
    assert!(result.errors[0].error.contains("slow failure"));
    assert_eq!(result.errors[1].recipient, 20);
    assert!(result.errors[1].error.contains("fast failure"));

    Ok(())
}

/// Test: Convenience entry point formats the payload and fans it out
#[tokio::test]
async fn test_send_pickup_request_formats_and_dispatches() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .and(body_partial_json(json!({"parse_mode": "Markdown"})))
        .and(body_string_contains("Новая заявка на вызов курьера"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})))
        .expect(2)
        .mount(&server)
        .await;

    let payload = serde_json::from_value(json!({
        "surname": "Иванов",
        "name": "Пётр",
        "phone": "+380501234567",
        "cityFrom": "Киев",
        "addressFrom": "ул. Крещатик, 1"
    }))?;

    let dispatcher = dispatcher_for(&server, vec![100, 200])?;
    let result = dispatcher.send_pickup_request(&payload).await;

    assert!(result.success);
    assert_eq!(result.sent, 2);
    assert_eq!(result.failed, 0);

    Ok(())
}

/// Test: Delivery orders render the recipient block on their way out
#[tokio::test]
async fn test_send_delivery_order_dispatches() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .and(body_string_contains("Новый заказ на доставку"))
        .and(body_string_contains("Получатель:"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let payload = serde_json::from_value(json!({
        "surname": "Иванов",
        "name": "Пётр",
        "phone": "+380501234567",
        "cityFrom": "Киев",
        "addressFrom": "пр. Победы, 12",
        "recipientSurname": "Сидорова",
        "recipientName": "Анна",
        "recipientPhone": "+380671112233",
        "cityTo": "Львов",
        "department": "Отделение №3"
    }))?;

    let dispatcher = dispatcher_for(&server, vec![9])?;
    let result = dispatcher.send_delivery_order(&payload).await;

    assert!(result.success);
    assert_eq!(result.sent, 1);

    Ok(())
}

/// Test: Generic form submissions go through the same fan-out path
#[tokio::test]
async fn test_send_form_dispatches_generic_payload() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .and(body_string_contains("First Name: A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let payload = serde_json::from_value(json!({
        "formName": "Обратная связь",
        "firstName": "A",
        "city": "Moscow"
    }))?;

    let dispatcher = dispatcher_for(&server, vec![7])?;
    let result = dispatcher.send_form(&payload).await;

    assert!(result.success);
    assert_eq!(result.sent, 1);

    Ok(())
}
