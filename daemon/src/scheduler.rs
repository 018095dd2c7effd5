//! Periodic lifecycle sweeper.
//!
//! Each tick runs one [`LifecycleManager::sweep`] on the blocking pool and
//! logs the events it produced. Stops when the shutdown channel fires.
//!
//! [`LifecycleManager::sweep`]: truthmarket_verification::LifecycleManager::sweep

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use truthmarket_types::Timestamp;
use truthmarket_verification::{LifecycleEvent, SweepReport, TruthMarket};

/// Totals over the sweeper's lifetime.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepTotals {
    pub sweeps: u64,
    pub advanced: u64,
    pub failed: u64,
    pub events: u64,
}

impl SweepTotals {
    fn absorb(&mut self, report: &SweepReport, events: usize) {
        self.sweeps += 1;
        self.advanced += report.advanced as u64;
        self.failed += report.failed.len() as u64;
        self.events += events as u64;
    }
}

/// Sweep every `interval` until `shutdown` fires, reading the time from `clock`.
pub async fn run_sweeper<F>(
    market: Arc<TruthMarket>,
    interval: Duration,
    clock: F,
    mut shutdown: broadcast::Receiver<()>,
) -> SweepTotals
where
    F: Fn() -> Timestamp + Send + 'static,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut totals = SweepTotals::default();

    loop {
        tokio::select! {
            _ = shutdown.recv() => break,
            _ = ticker.tick() => {
                let now = clock();
                let market = Arc::clone(&market);
                let swept = tokio::task::spawn_blocking(move || {
                    let report = market.lifecycle.sweep(now);
                    (report, market.lifecycle.drain_events())
                })
                .await;
                match swept {
                    Ok((report, events)) => {
                        events.iter().for_each(log_event);
                        totals.absorb(&report, events.len());
                    }
                    Err(e) => warn!(error = %e, "sweep task aborted"),
                }
            }
        }
    }

    info!(sweeps = totals.sweeps, advanced = totals.advanced, failed = totals.failed, "sweeper stopped");
    totals
}

fn log_event(event: &LifecycleEvent) {
    match event {
        LifecycleEvent::CollusionSuspected { claim, scores } => {
            warn!(%claim, flagged = scores.len(), "collusion suspected");
        }
        LifecycleEvent::PayoutFailed { claim, verifier, reason } => {
            warn!(%claim, %verifier, %reason, "payout pending retry");
        }
        LifecycleEvent::PayoutUnconfirmed { claim, verifier, amount, settlement_ref } => {
            warn!(%claim, %verifier, %amount, %settlement_ref, "payout sent but unrecorded, reconcile manually");
        }
        other => debug!(event = ?other, "lifecycle event"),
    }
}
