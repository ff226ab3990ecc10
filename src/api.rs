use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use std::time::Instant;

use anyhow::{Error, Result};
use axum::{
    Json, Router,
    extract::{Request, State, rejection::JsonRejection},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{
    clients::telegram::TelegramClient,
    config::Config,
    dispatcher::Dispatcher,
    models::{
        dispatch::DispatchResult,
        health::{BotState, HealthResponse, StatsResponse},
        payload::{DeliveryOrderPayload, FormSubmission, NotificationPayload, PickupRequestPayload},
        response::ApiResponse,
        telegram::Update,
    },
    utils::{memory_rss_bytes, relay_notification},
};

#[derive(Default)]
pub struct RelayCounters {
    pub webhooks_received: AtomicU64,
    pub notifications_sent: AtomicU64,
    pub notifications_failed: AtomicU64,
}

pub struct AppState {
    pub dispatcher: Option<Arc<Dispatcher>>,
    pub started_at: Instant,
    pub started_at_utc: DateTime<Utc>,
    pub counters: RelayCounters,
    pub enforce_json_content: bool,
}

impl AppState {
    pub fn new(dispatcher: Option<Arc<Dispatcher>>, enforce_json_content: bool) -> Self {
        Self {
            dispatcher,
            started_at: Instant::now(),
            started_at_utc: Utc::now(),
            counters: RelayCounters::default(),
            enforce_json_content,
        }
    }
}

pub async fn run_api_server(config: Config) -> Result<(), Error> {
    let recipients = config.recipient_ids();

    if recipients.is_empty() {
        warn!("TELEGRAM_CHAT_IDS is empty, notifications will not be delivered");
    }

    let dispatcher = match config.telegram_bot_token.as_deref() {
        Some(token) if !token.is_empty() => {
            let client = TelegramClient::new(&config.telegram_api_base, token)?;
            info!(
                recipients = recipients.len(),
                "Telegram transport initialized"
            );
            Some(Arc::new(Dispatcher::new(client, recipients)))
        }
        _ => {
            warn!("TELEGRAM_BOT_TOKEN is not set, transport disabled");
            None
        }
    };

    let state = Arc::new(AppState::new(dispatcher, config.enforce_json_content));

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = TcpListener::bind(&addr).await?;

    info!(address = %addr, "Relay server started");

    axum::serve(listener, app).await?;

    Ok(())
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
        .route("/stats", get(stats))
        .route("/webhook", post(webhook))
        .route("/webhook/info", get(webhook_info))
        .route("/api/notify/pickup-request", post(notify_pickup_request))
        .route("/api/notify/delivery-order", post(notify_delivery_order))
        .route("/api/notify/form", post(notify_form));

    if state.enforce_json_content {
        router = router.layer(middleware::from_fn(require_json_content));
    }

    router
        .layer(middleware::from_fn(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Preflight requests are answered directly; simple responses get the
/// allow-origin header appended.
async fn cors(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return (
            StatusCode::NO_CONTENT,
            [
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
                (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
                (
                    header::ACCESS_CONTROL_ALLOW_HEADERS,
                    "Content-Type, Authorization",
                ),
            ],
        )
            .into_response();
    }

    let mut response = next.run(request).await;

    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );

    response
}

async fn require_json_content(request: Request, next: Next) -> Response {
    if request.method() == Method::POST {
        let is_json = request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with("application/json"))
            .unwrap_or(false);

        if !is_json {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<()>::error(
                    "Unsupported content type".to_string(),
                    "POST bodies must be application/json".to_string(),
                )),
            )
                .into_response();
        }
    }

    next.run(request).await
}

async fn service_info() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /health",
            "stats": "GET /stats",
            "webhook": "POST /webhook",
            "webhookInfo": "GET /webhook/info",
            "notifyPickupRequest": "POST /api/notify/pickup-request",
            "notifyDeliveryOrder": "POST /api/notify/delivery-order",
            "notifyForm": "POST /api/notify/form",
        },
    }))
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let bot_state = if state.dispatcher.is_some() {
        BotState::Ready
    } else {
        BotState::NotInitialized
    };

    Json(HealthResponse::new(bot_state))
}

async fn stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(StatsResponse {
        uptime_seconds: state.started_at.elapsed().as_secs(),
        started_at: state.started_at_utc,
        memory_rss_bytes: memory_rss_bytes(),
        webhooks_received: state.counters.webhooks_received.load(Ordering::Relaxed),
        notifications_sent: state.counters.notifications_sent.load(Ordering::Relaxed),
        notifications_failed: state.counters.notifications_failed.load(Ordering::Relaxed),
    })
}

async fn webhook(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Update>, JsonRejection>,
) -> Response {
    let Some(dispatcher) = &state.dispatcher else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Bot not initialized").into_response();
    };

    let Json(update) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection, "Malformed webhook update");
            return (StatusCode::BAD_REQUEST, "Invalid update").into_response();
        }
    };

    state
        .counters
        .webhooks_received
        .fetch_add(1, Ordering::Relaxed);

    if let Some(message) = &update.message {
        let username = message
            .from
            .as_ref()
            .and_then(|user| user.username.as_deref())
            .unwrap_or("-");

        info!(
            update_id = update.update_id,
            chat_id = message.chat.id,
            username,
            "Webhook update received"
        );

        if let Some(text) = message.text.as_deref() {
            let command = text.trim();

            if command.starts_with("/start") || command.starts_with("/status") {
                let reply = status_reply(&state, dispatcher);

                if let Err(error) = dispatcher.client().send_message(message.chat.id, &reply).await
                {
                    warn!(chat_id = message.chat.id, error = %error, "Failed to answer bot command");
                    return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to process update")
                        .into_response();
                }
            }
        }
    }

    (StatusCode::OK, "OK").into_response()
}

fn status_reply(state: &AppState, dispatcher: &Dispatcher) -> String {
    format!(
        "✅ Сервис уведомлений работает.\nАптайм: {} мин.\nПолучателей: {}",
        state.started_at.elapsed().as_secs() / 60,
        dispatcher.recipient_count()
    )
}

async fn webhook_info(State(state): State<Arc<AppState>>) -> Response {
    let Some(dispatcher) = &state.dispatcher else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Bot not initialized").into_response();
    };

    match dispatcher.client().webhook_info().await {
        Ok(info) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                info,
                "Webhook info fetched".to_string(),
            )),
        )
            .into_response(),
        Err(error) => {
            warn!(error = %error, "Failed to fetch webhook info");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(
                    error.to_string(),
                    "Failed to fetch webhook info".to_string(),
                )),
            )
                .into_response()
        }
    }
}

async fn notify_pickup_request(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PickupRequestPayload>, JsonRejection>,
) -> Response {
    let payload = payload.map(|Json(payload)| NotificationPayload::PickupRequest(payload));
    relay(state, payload).await
}

async fn notify_delivery_order(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DeliveryOrderPayload>, JsonRejection>,
) -> Response {
    let payload = payload.map(|Json(payload)| NotificationPayload::DeliveryOrder(payload));
    relay(state, payload).await
}

async fn notify_form(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FormSubmission>, JsonRejection>,
) -> Response {
    let payload = payload.map(|Json(payload)| NotificationPayload::Form(payload));
    relay(state, payload).await
}

async fn relay(
    state: Arc<AppState>,
    payload: Result<NotificationPayload, JsonRejection>,
) -> Response {
    let Some(dispatcher) = &state.dispatcher else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Bot not initialized").into_response();
    };

    let payload = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection, "Malformed notification payload");
            return (StatusCode::BAD_REQUEST, "Invalid payload").into_response();
        }
    };

    let result = relay_notification(dispatcher, &payload).await;

    state
        .counters
        .notifications_sent
        .fetch_add(result.sent as u64, Ordering::Relaxed);
    state
        .counters
        .notifications_failed
        .fetch_add(result.failed as u64, Ordering::Relaxed);

    let message = if result.success {
        "Notification dispatched".to_string()
    } else {
        "Notification was not delivered".to_string()
    };

    let response = ApiResponse::<DispatchResult> {
        success: result.success,
        data: Some(result),
        error: None,
        message,
    };

    (StatusCode::OK, Json(response)).into_response()
}
