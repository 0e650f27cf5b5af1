//! Core scheduler constants for board sync.

/// Quiescence window before a burst of edits is written back.
pub const BOARD_SYNC_DEBOUNCE_MS: u64 = 1000;

/// Server the client talks to when none is configured.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3001";

/// Transport timeout for HTTP requests. Only guards against hung sockets;
/// unreachability is detected by connection failure.
pub const BOARD_SYNC_HTTP_TIMEOUT_SECS: u64 = 30;
