//! Response link construction
//!
//! A response link encodes `(invite_id, member, value)` into a URL so that
//! visiting it performs exactly one response submission with those three
//! values. The link carries no authentication beyond possession — that is a
//! known, deliberate property of the link format, not something this module
//! strengthens.

use crate::invite::response::ResponseValue;

/// Builder for the accept/decline URLs embedded in invitation messages
#[derive(Debug, Clone)]
pub struct ResponseLink {
    base_url: String,
}

impl ResponseLink {
    /// Create a link builder rooted at the coordinator's public base URL
    ///
    /// A trailing slash on the base is tolerated.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url: String = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// URL that submits `value` for `member` in the given session
    pub fn url(&self, invite_id: &str, member: &str, value: ResponseValue) -> String {
        format!(
            "{}/respond?invite={}&member={}&value={}",
            self.base_url,
            encode(invite_id),
            encode(member),
            value.as_str(),
        )
    }
}

/// Minimal query-component percent-encoding
///
/// Unreserved characters pass through; everything else (including `@` in
/// email addresses) is escaped as `%XX` so ids and identities survive the
/// round trip through a URL query string.
fn encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
