//! Crawl-wide cancellation signal
//!
//! One [`CancelHandle`] can stop every in-flight and future fetch of a
//! crawl. Cancelled fetches still produce a (broken) result.

use tokio_util::sync::CancellationToken;

/// Trigger side of the cancellation signal
#[derive(Debug, Clone)]
pub struct CancelHandle {
    token: CancellationToken,
}

/// Observer side of the cancellation signal, cloned into every task
#[derive(Debug, Clone)]
pub struct CancelSignal {
    token: CancellationToken,
}

/// Creates a connected handle/signal pair
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let token = CancellationToken::new();
    (
        CancelHandle {
            token: token.clone(),
        },
        CancelSignal { token },
    )
}

impl CancelHandle {
    /// Cancels the crawl; later calls are no-ops
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl CancelSignal {
    /// A signal that never fires
    pub fn never() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the crawl is cancelled
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}
