//! Canonical logging macros
//!
//! These macros stamp every operation event with the same component / op /
//! event fields so begin and settle lines correlate in output and capture.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use curio_core::log_op_start;
/// log_op_start!("toggle_favorite");
/// log_op_start!("toggle_favorite", entity_id = 42);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = curio_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = curio_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use curio_core::log_op_end;
/// log_op_end!("toggle_favorite", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = curio_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = curio_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error with its stable kind and code
///
/// # Example
///
/// ```
/// # use curio_core::log_op_error;
/// # use curio_core::errors::SyncError;
/// let err = SyncError::FetchFailed { reason: "offline".to_string() };
/// log_op_error!("fetch_reviews", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let err: &$crate::errors::SyncError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = curio_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?err.kind(),
            err_code = err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let err: &$crate::errors::SyncError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = curio_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?err.kind(),
            err_code = err.code(),
            $($field)*
        );
    }};
}
