//! Operator control of a running scraper through Unix signals.
//!
//! `SIGUSR1` pauses the scraper, `SIGUSR2` resumes it.

use std::sync::Arc;

use chainscrape_core::ScraperState;
use tokio::task::JoinHandle;

#[cfg(unix)]
pub fn spawn_signal_controller(state: Arc<ScraperState>) -> anyhow::Result<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut pause = signal(SignalKind::user_defined1())?;
    let mut resume = signal(SignalKind::user_defined2())?;

    Ok(tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(()) = pause.recv() => {
                    tracing::info!("SIGUSR1 received; pausing scraper");
                    state.set_active(false);
                }
                Some(()) = resume.recv() => {
                    tracing::info!("SIGUSR2 received; resuming scraper");
                    state.set_active(true);
                }
                else => break,
            }
        }
    }))
}

#[cfg(not(unix))]
pub fn spawn_signal_controller(_state: Arc<ScraperState>) -> anyhow::Result<JoinHandle<()>> {
    tracing::debug!("signal-driven pause/resume is only available on Unix");
    Ok(tokio::spawn(async {}))
}
