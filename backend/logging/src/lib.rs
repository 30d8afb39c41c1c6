//! Structured logging for SoulForge.
//!
//! Console plus optional rolling NDJSON files, and redaction of credentials
//! before they reach a log line.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::redact_sensitive_data;
