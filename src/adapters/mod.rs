// Adapters layer: concrete implementations for external systems (html, http).
// Storage and configuration providers live under src/config.

pub mod html;
pub mod http;
