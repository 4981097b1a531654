//! Access token and WebSocket ticket management.
//!
//! Both are opaque random strings held in the key-value store under a
//! TTL. Access tokens authenticate HTTP requests; tickets are short-lived,
//! single-use credentials exchanged by an authenticated client to open a
//! list WebSocket.

use serde::{Deserialize, Serialize};

use crate::db::kv::KeyValueStore;
use crate::error::ApiError;

// ---------------------------------------------------------------------------
// Opaque token generation
// ---------------------------------------------------------------------------

/// Generate an opaque random token with the given prefix.
pub fn generate_opaque_token(prefix: &str, bytes: usize) -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use rand::Rng;
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill(&mut buf[..]);
    format!("{}_{}", prefix, URL_SAFE_NO_PAD.encode(&buf))
}

// ---------------------------------------------------------------------------
// Access token — 1-hour TTL
// ---------------------------------------------------------------------------

/// Access token TTL in seconds (1 hour).
pub const ACCESS_TOKEN_TTL_SECS: u64 = 3600;

/// Data stored alongside an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenData {
    pub user_id: String,
}

pub fn generate_access_token() -> String {
    generate_opaque_token("tok", 32)
}

pub async fn store_access_token(
    kv: &dyn KeyValueStore,
    token: &str,
    data: &TokenData,
) -> Result<(), ApiError> {
    let key = format!("trolley:token:{}", token);
    let value = serde_json::to_string(data).map_err(|_| ApiError::internal("serialization"))?;
    kv.set_ex(&key, &value, ACCESS_TOKEN_TTL_SECS).await
}

pub async fn lookup_access_token(
    kv: &dyn KeyValueStore,
    token: &str,
) -> Result<Option<TokenData>, ApiError> {
    let key = format!("trolley:token:{}", token);
    match kv.get(&key).await? {
        Some(v) => {
            let data: TokenData =
                serde_json::from_str(&v).map_err(|_| ApiError::internal("corrupt token data"))?;
            Ok(Some(data))
        }
        None => Ok(None),
    }
}

/// Drop an access token, ending its session. Unknown tokens are a no-op.
pub async fn revoke_access_token(kv: &dyn KeyValueStore, token: &str) -> Result<(), ApiError> {
    let key = format!("trolley:token:{}", token);
    kv.del(&key).await
}

// ---------------------------------------------------------------------------
// WebSocket ticket — 30-second TTL, single-use
// ---------------------------------------------------------------------------

/// WS ticket TTL in seconds.
pub const WS_TICKET_TTL_SECS: u64 = 30;

/// Data stored alongside a WS ticket.
#[derive(Debug, Serialize, Deserialize)]
pub struct WsTicketData {
    pub user_id: String,
}

pub fn generate_ws_ticket() -> String {
    generate_opaque_token("wst", 32)
}

pub async fn store_ws_ticket(
    kv: &dyn KeyValueStore,
    ticket: &str,
    data: &WsTicketData,
) -> Result<(), ApiError> {
    let key = format!("trolley:ticket:{}", ticket);
    let value = serde_json::to_string(data).map_err(|_| ApiError::internal("serialization"))?;
    kv.set_ex(&key, &value, WS_TICKET_TTL_SECS).await
}

/// Read and delete a ticket in one step so it cannot be replayed.
pub async fn consume_ws_ticket(
    kv: &dyn KeyValueStore,
    ticket: &str,
) -> Result<Option<WsTicketData>, ApiError> {
    let key = format!("trolley:ticket:{}", ticket);
    let val = kv.get(&key).await?;
    if val.is_some() {
        let _ = kv.del(&key).await;
    }
    match val {
        Some(v) => {
            let data: WsTicketData =
                serde_json::from_str(&v).map_err(|_| ApiError::internal("corrupt ticket data"))?;
            Ok(Some(data))
        }
        None => Ok(None),
    }
}
