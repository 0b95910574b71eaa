//! Single-shot finalize completion
//!
//! Platform recorders report "movie file finished" through a delegate
//! callback. `finalize_channel` turns that callback into an awaitable:
//! the callback half is consumed when resolved, so it completes at most
//! once, and dropping it unresolved completes the future with an error.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use contracts::ContractError;
use tokio::sync::oneshot;
use tracing::debug;

type FinalizeResult = Result<PathBuf, ContractError>;

/// Create a connected callback/future pair
pub fn finalize_channel() -> (FinalizeCallback, FinalizeFuture) {
    let (tx, rx) = oneshot::channel();
    (FinalizeCallback { tx }, FinalizeFuture { rx })
}

/// Completion half, handed to the recorder's delegate
#[derive(Debug)]
pub struct FinalizeCallback {
    tx: oneshot::Sender<FinalizeResult>,
}

impl FinalizeCallback {
    /// Report the outcome of finalization
    pub fn resolve(self, result: FinalizeResult) {
        if self.tx.send(result).is_err() {
            debug!("finalize result discarded, nobody is waiting");
        }
    }

    pub fn finished(self, path: PathBuf) {
        self.resolve(Ok(path));
    }

    pub fn failed(self, error: ContractError) {
        self.resolve(Err(error));
    }
}

/// Awaiting half
#[derive(Debug)]
pub struct FinalizeFuture {
    rx: oneshot::Receiver<FinalizeResult>,
}

impl Future for FinalizeFuture {
    type Output = FinalizeResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|received| match received {
            Ok(result) => result,
            Err(_) => Err(ContractError::video_finalize(
                "recorder dropped the finalize callback without reporting",
            )),
        })
    }
}
