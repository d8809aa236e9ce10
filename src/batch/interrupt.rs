use std::future::pending;
use tokio::sync::watch;

/// Latched Ctrl-C notification. Every clone observes the same interrupt, and
/// one that fired before a clone started waiting is still seen.
#[derive(Debug, Clone)]
pub struct Interrupt {
    fired: watch::Receiver<bool>,
}

impl Interrupt {
    /// Installs the Ctrl-C listener. Call it before any slow startup work so
    /// an early interrupt is not lost.
    pub fn listen() -> Self {
        let (tx, interrupt) = Self::channel();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    let _ = tx.send(true);
                }
                // Logging may not be up yet.
                Err(e) => eprintln!("Warning: unable to listen for Ctrl-C: {}", e),
            }
        });
        interrupt
    }

    pub fn channel() -> (watch::Sender<bool>, Self) {
        let (tx, fired) = watch::channel(false);
        (tx, Self { fired })
    }

    /// Resolves once the interrupt fires. Never resolves if the listener is
    /// gone without firing.
    pub async fn wait(mut self) {
        let closed = self.fired.wait_for(|fired| *fired).await.is_err();
        if closed {
            pending::<()>().await;
        }
    }
}
