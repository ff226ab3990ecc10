use tracing::{info, warn};

use crate::{
    dispatcher::Dispatcher,
    models::{dispatch::DispatchResult, payload::NotificationPayload},
};

/// Formats one payload and fans it out, with result logging. The returned
/// aggregate is what the HTTP boundary serializes back to the caller.
pub async fn relay_notification(
    dispatcher: &Dispatcher,
    payload: &NotificationPayload,
) -> DispatchResult {
    let form = payload.kind();

    info!(form, "Relaying notification");

    let result = dispatcher.notify(payload).await;

    if result.success {
        info!(
            form,
            sent = result.sent,
            failed = result.failed,
            "Notification relayed"
        );
    } else {
        warn!(
            form,
            failed = result.failed,
            "Notification was not delivered to any recipient"
        );
    }

    result
}

/// Resident set size from /proc, where available. The snapshot is
/// best-effort; /stats omits the field when it cannot be read.
pub fn memory_rss_bytes() -> Option<u64> {
    let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
    let rss_pages: u64 = statm.split_whitespace().nth(1)?.parse().ok()?;

    // statm reports pages; assume the common 4 KiB page size.
    Some(rss_pages * 4096)
}
