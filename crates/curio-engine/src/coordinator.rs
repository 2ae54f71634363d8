//! Optimistic mutation coordination
//!
//! The single coordinating function for the three-phase protocol:
//! 1. Begin: cancel in-flight fetches on every affected key, snapshot
//!    their state, apply the predicted patches synchronously
//! 2. Settle - success: drop the snapshot, invalidate list-shaped affected
//!    keys (entity-shaped keys keep the prediction until the next natural
//!    refetch)
//! 3. Settle - failure: restore every affected key from the snapshot,
//!    record a failure notice
//!
//! Known ordering caveat: two mutations in flight over overlapping keys
//! settle last-wins; no mutation queue is imposed.

use std::future::Future;
use std::time::Instant;

use curio_core::cache::RemoteCache;
use curio_core::mutation::{MutationAction, MutationOutcome};
use curio_core::notify::NoticeLog;
use curio_core::{log_op_end, log_op_error, log_op_start};
use curio_core_types::RequestId;

use crate::transport::{mutation_error, TransportResult};

/// Execute one mutation against its predicted local patch, then reconcile
/// with the server outcome.
///
/// The snapshot never outlives this call: it is dropped on success and
/// consumed by the restore on failure. Failures are swallowed here (notice
/// + rollback); callers observe only the returned outcome.
pub async fn run_mutation<F>(
    cache: &RemoteCache,
    notices: &NoticeLog,
    action: &MutationAction,
    call: F,
) -> MutationOutcome
where
    F: Future<Output = TransportResult<()>>,
{
    let request_id = RequestId::new();
    let started = Instant::now();
    log_op_start!(
        action.name(),
        request_id = %request_id,
        entity_id = %action.entity_id()
    );

    // Begin
    let keys = action.affected_keys();
    for key in &keys {
        cache.cancel_pending(*key);
    }
    let snapshot = cache.capture(&keys);
    for (key, value) in action.predict(&snapshot) {
        cache.write(key, value);
    }

    // Settle
    match call.await {
        Ok(()) => {
            for key in keys.iter().filter(|key| key.is_list_shaped()) {
                cache.invalidate(*key);
            }
            log_op_end!(
                action.name(),
                duration_ms = started.elapsed().as_millis() as u64,
                request_id = %request_id
            );
            MutationOutcome::Committed
        }
        Err(err) => {
            cache.restore(&snapshot);
            let err = mutation_error(action.name(), err);
            notices.failure(err.to_string());
            log_op_error!(
                action.name(),
                err,
                duration_ms = started.elapsed().as_millis() as u64,
                request_id = %request_id
            );
            MutationOutcome::RolledBack(err)
        }
    }
}
