//! Canonical schema constants for structured logging
//!
//! These constants keep field names consistent across all log events and
//! error reports emitted by the synchronization layer.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Domain identifiers
pub const FIELD_ENTITY_ID: &str = "entity_id";
pub const FIELD_CACHE_KEY: &str = "cache_key";
pub const FIELD_ACTION: &str = "action";

// Pagination fields
pub const FIELD_CURSOR: &str = "cursor";
pub const FIELD_PAGE_LEN: &str = "page_len";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
