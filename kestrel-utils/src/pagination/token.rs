//! Nonce generation and `{nonce}:{operation}` control id encoding.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;

/// Random bytes behind every nonce.
pub const NONCE_BYTES: usize = 32;

/// Navigation operation carried by a paginator control id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavOperation {
    Prev,
    Next,
}

impl NavOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prev => "prev",
            Self::Next => "next",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "prev" => Some(Self::Prev),
            "next" => Some(Self::Next),
            _ => None,
        }
    }
}

/// Generate a fresh nonce from the OS random source.
///
/// The result is URL-safe base64 without padding, so it never contains `:`.
pub fn generate_nonce() -> String {
    let mut bytes = [0_u8; NONCE_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Build a control id namespaced by `nonce`.
pub fn build_control_id(nonce: &str, operation: &str) -> String {
    format!("{nonce}:{operation}")
}

/// Return the operation segment of `custom_id` if it belongs to `nonce`.
pub fn control_operation<'a>(custom_id: &'a str, nonce: &str) -> Option<&'a str> {
    let operation = custom_id.strip_prefix(nonce)?.strip_prefix(':')?;
    (!operation.is_empty() && !operation.contains(':')).then_some(operation)
}

/// Parse a paginator navigation id for `nonce`.
pub fn parse_nav_control_id(custom_id: &str, nonce: &str) -> Option<NavOperation> {
    control_operation(custom_id, nonce).and_then(NavOperation::parse)
}
