//! Prefixed ULID identifiers for entities addressed by opaque string ids.
//!
//! Lists and items use time-ordered snowflake integers instead; see
//! [`crate::snowflake`].

use ulid::Ulid;

/// Well-known ID prefixes.
pub mod prefix {
    /// Registered account.
    pub const USER: &str = "usr";
    /// One live WebSocket session.
    pub const CONNECTION: &str = "conn";
}

/// Build a `{prefix}_{ULID}` identifier.
///
/// ULIDs are lexicographically sortable by creation time, so ids sharing a
/// prefix sort oldest-first.
pub fn prefixed_ulid(prefix: &str) -> String {
    format!("{prefix}_{}", Ulid::new())
}
