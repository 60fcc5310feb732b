use lazy_static::lazy_static;
use tokio_util::sync::CancellationToken;

// Process-wide shutdown signal, checked by running research streams between events.
lazy_static! {
    static ref SHUTDOWN: CancellationToken = CancellationToken::new();
}

/// A handle to the process-wide shutdown signal.
pub fn shutdown_token() -> CancellationToken {
    SHUTDOWN.clone()
}

pub fn trigger_shutdown() {
    SHUTDOWN.cancel();
}

pub fn is_shutting_down() -> bool {
    SHUTDOWN.is_cancelled()
}
