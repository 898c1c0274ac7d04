//! Request context carrying the acting user's identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sharehub_core::types::UserId;

/// Context for the current request.
///
/// Supplied by the caller and passed into every resolver operation so
/// each operation knows *who* is acting: the owner for owner-side
/// operations, the recipient for resolution and target-side operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting user's ID.
    pub user_id: UserId,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            request_time: Utc::now(),
        }
    }
}
