//! CLI command implementations

pub mod delete;
pub mod health;
pub mod reports;
pub mod session;

use ecoguard_triage::CancellationToken;
use tokio::task::JoinHandle;

/// Cancels its token on Ctrl-C for as long as it is alive
pub struct Interrupt {
    token: CancellationToken,
    watcher: JoinHandle<()>,
}

impl Interrupt {
    pub fn arm() -> Self {
        let token = CancellationToken::new();
        let trigger = token.clone();
        let watcher = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("Interrupted, cancelling producer call");
                trigger.cancel();
            }
        });
        Self { token, watcher }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for Interrupt {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}
