use serde::Serialize;

/// Aggregate outcome of one fan-out. `success` is true iff at least one
/// recipient accepted the message; partial delivery still counts as overall
/// success, with the misses listed in `errors`.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResult {
    pub success: bool,
    pub sent: usize,
    pub failed: usize,
    pub errors: Vec<DispatchFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchFailure {
    pub recipient: i64,
    pub error: String,
}

impl DispatchResult {
    pub fn empty() -> Self {
        Self {
            success: false,
            sent: 0,
            failed: 0,
            errors: Vec::new(),
        }
    }
}
