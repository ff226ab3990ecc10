use futures_util::future::join_all;
use tracing::{info, warn};

use crate::{
    clients::telegram::TelegramClient,
    formatter::{format_delivery_order, format_form, format_payload, format_pickup_request},
    models::{
        dispatch::{DispatchFailure, DispatchResult},
        payload::{DeliveryOrderPayload, FormSubmission, NotificationPayload, PickupRequestPayload},
    },
};

/// Best-effort fan-out over a fixed recipient list. Recipients are
/// independent: a slow or failing chat never delays or cancels delivery to
/// the others, and no send is ever retried.
pub struct Dispatcher {
    client: TelegramClient,
    recipients: Vec<i64>,
}

impl Dispatcher {
    pub fn new(client: TelegramClient, recipients: Vec<i64>) -> Self {
        Self { client, recipients }
    }

    pub fn client(&self) -> &TelegramClient {
        &self.client
    }

    pub fn recipient_count(&self) -> usize {
        self.recipients.len()
    }

    /// Sends `text` to every configured recipient concurrently and waits for
    /// all outcomes. Failures are position-matched back to the configured
    /// recipient order, not to completion order.
    pub async fn dispatch(&self, text: &str) -> DispatchResult {
        if self.recipients.is_empty() {
            warn!("No recipients configured, skipping dispatch");
            return DispatchResult::empty();
        }

        let sends = self
            .recipients
            .iter()
            .map(|chat_id| self.client.send_message(*chat_id, text));

        let outcomes = join_all(sends).await;

        let mut sent = 0;
        let mut failed = 0;
        let mut errors = Vec::new();

        for (chat_id, outcome) in self.recipients.iter().zip(outcomes) {
            match outcome {
                Ok(()) => {
                    sent += 1;
                    info!(chat_id, "Notification delivered");
                }
                Err(error) => {
                    failed += 1;
                    warn!(chat_id, error = %error, "Notification delivery failed");
                    errors.push(DispatchFailure {
                        recipient: *chat_id,
                        error: error.to_string(),
                    });
                }
            }
        }

        DispatchResult {
            success: sent > 0,
            sent,
            failed,
            errors,
        }
    }

    pub async fn send_pickup_request(&self, payload: &PickupRequestPayload) -> DispatchResult {
        self.dispatch(&format_pickup_request(payload)).await
    }

    pub async fn send_delivery_order(&self, payload: &DeliveryOrderPayload) -> DispatchResult {
        self.dispatch(&format_delivery_order(payload)).await
    }

    pub async fn send_form(&self, payload: &FormSubmission) -> DispatchResult {
        self.dispatch(&format_form(payload)).await
    }

    pub async fn notify(&self, payload: &NotificationPayload) -> DispatchResult {
        self.dispatch(&format_payload(payload)).await
    }
}
