//! User-Agent string sent by the bundled transport.

/// Default User-Agent, identifying the crate and its version.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("request-layer/{version} (rust; reqwest)")
}
