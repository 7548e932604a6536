use crate::server::{ServerError, StartResult};

use std::sync::Arc;

use tokio::sync::watch;

/// Set-once outcome of a start attempt, awaited by any number of callers.
///
/// The first `resolve` wins; later ones are ignored, so a stop racing a
/// timeout still hands every waiter one consistent result.
#[derive(Debug, Clone)]
pub struct Completion {
    slot: Arc<watch::Sender<Option<StartResult>>>,
}

impl Completion {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            slot: Arc::new(slot),
        }
    }

    /// Returns true if this call set the outcome.
    pub fn resolve(&self, outcome: StartResult) -> bool {
        let mut outcome = Some(outcome);
        self.slot.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = outcome.take();
            true
        })
    }

    pub fn is_resolved(&self) -> bool {
        self.slot.borrow().is_some()
    }

    pub async fn wait(&self) -> StartResult {
        let mut rx = self.slot.subscribe();
        let outcome = match rx.wait_for(Option::is_some).await {
            Ok(slot) => slot.clone(),
            Err(_) => None,
        };
        outcome.unwrap_or_else(|| Err(Arc::new(ServerError::cancelled())))
    }
}

impl Default for Completion {
    fn default() -> Self {
        Self::new()
    }
}
