// File: src/refresh.rs
// Periodic KPI refresh as a cancellable background task

use std::time::Duration;

use rand::Rng;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::data_models::KpiSnapshot;

/// Source of fresh KPI values, invoked once per tick
pub trait KpiGenerator: Send + 'static {
    fn generate(&mut self) -> KpiSnapshot;
}

/// Simulated telemetry: each KPI jitters inside a fixed band
pub struct RandomKpiGenerator<R: Rng = rand::rngs::StdRng> {
    rng: R,
}

impl RandomKpiGenerator {
    pub fn new() -> Self {
        Self::with_rng(rand::SeedableRng::from_entropy())
    }
}

impl Default for RandomKpiGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomKpiGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send + 'static> KpiGenerator for RandomKpiGenerator<R> {
    fn generate(&mut self) -> KpiSnapshot {
        let rng = &mut self.rng;
        KpiSnapshot {
            edge_client_throughput: rng.gen_range(52.0..62.0),
            retry_rate: rng.gen_range(4.2..6.2),
            uplink_per: rng.gen_range(2.1..3.6),
            steering_acceptance: rng.gen_range(87.0..92.0),
            config_churn: rng.gen_range(0.15..0.25),
            sensing_airtime_cost: rng.gen_range(1.4..1.8),
        }
    }
}

impl<F> KpiGenerator for F
where
    F: FnMut() -> KpiSnapshot + Send + 'static,
{
    fn generate(&mut self) -> KpiSnapshot {
        self()
    }
}

/// Handle to the running refresh loop.
///
/// Ticks run one at a time inside a single task and each publishes a whole
/// snapshot through a watch channel. After [`RefreshTask::stop`] returns no
/// further snapshot is published. Dropping the handle aborts the task.
pub struct RefreshTask {
    stop_tx: broadcast::Sender<()>,
    handle: Option<JoinHandle<u64>>,
}

impl RefreshTask {
    /// Start ticking one `period` from now; returns the task handle and a
    /// receiver that always holds the latest snapshot
    pub fn start<G: KpiGenerator>(
        mut generator: G,
        initial: KpiSnapshot,
        period: Duration,
    ) -> (Self, watch::Receiver<KpiSnapshot>) {
        let (kpi_tx, kpi_rx) = watch::channel(initial);
        let (stop_tx, mut stop_rx) = broadcast::channel(1);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut ticks = 0u64;

            loop {
                tokio::select! {
                    biased;
                    _ = stop_rx.recv() => break,
                    _ = interval.tick() => {
                        let snapshot = generator.generate();
                        if !snapshot.is_finite() {
                            tracing::warn!(?snapshot, "discarding non-finite KPI snapshot");
                            continue;
                        }
                        ticks += 1;
                        tracing::debug!(tick = ticks, "KPI refresh");
                        if kpi_tx.send(snapshot).is_err() {
                            // every receiver is gone
                            break;
                        }
                    }
                }
            }

            tracing::debug!(ticks, "KPI refresh loop stopped");
            ticks
        });

        tracing::info!(period_ms = period.as_millis() as u64, "KPI refresh started");

        (
            Self {
                stop_tx,
                handle: Some(handle),
            },
            kpi_rx,
        )
    }

    /// Signal the loop and wait for it to finish; returns the number of
    /// snapshots published
    pub async fn stop(mut self) -> u64 {
        let _ = self.stop_tx.send(());
        match self.handle.take() {
            Some(handle) => handle.await.unwrap_or_else(|e| {
                tracing::warn!("KPI refresh task ended abnormally: {}", e);
                0
            }),
            None => 0,
        }
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn counting_generator() -> impl FnMut() -> KpiSnapshot + Send + 'static {
        let mut n = 0.0;
        move || {
            n += 1.0;
            KpiSnapshot {
                edge_client_throughput: n,
                ..KpiSnapshot::default()
            }
        }
    }

    #[test]
    fn random_values_stay_in_band() {
        let mut generator = RandomKpiGenerator::with_rng(StdRng::seed_from_u64(7));
        for _ in 0..200 {
            let kpis = generator.generate();
            assert!((52.0..62.0).contains(&kpis.edge_client_throughput));
            assert!((4.2..6.2).contains(&kpis.retry_rate));
            assert!((2.1..3.6).contains(&kpis.uplink_per));
            assert!((87.0..92.0).contains(&kpis.steering_acceptance));
            assert!((0.15..0.25).contains(&kpis.config_churn));
            assert!((1.4..1.8).contains(&kpis.sensing_airtime_cost));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn no_tick_before_first_period() {
        let (task, rx) = RefreshTask::start(
            counting_generator(),
            KpiSnapshot::default(),
            Duration::from_millis(3000),
        );

        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert!(!rx.has_changed().unwrap());
        assert_eq!(rx.borrow().edge_client_throughput, 52.5);

        assert_eq!(task.stop().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_once_per_period() {
        let (task, mut rx) = RefreshTask::start(
            counting_generator(),
            KpiSnapshot::default(),
            Duration::from_millis(3000),
        );

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().edge_client_throughput, 1.0);

        tokio::time::sleep(Duration::from_millis(6100)).await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().edge_client_throughput, 3.0);

        assert_eq!(task.stop().await, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_published_after_stop() {
        let (task, mut rx) = RefreshTask::start(
            counting_generator(),
            KpiSnapshot::default(),
            Duration::from_millis(100),
        );

        rx.changed().await.unwrap();
        rx.borrow_and_update();
        task.stop().await;

        tokio::time::sleep(Duration::from_millis(1000)).await;
        // the sender is gone together with the task
        assert!(rx.changed().await.is_err());
        assert_eq!(rx.borrow().edge_client_throughput, 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn non_finite_snapshot_is_skipped() {
        let mut calls = 0;
        let generator = move || {
            calls += 1;
            KpiSnapshot {
                retry_rate: if calls == 1 { f64::INFINITY } else { 5.0 },
                ..KpiSnapshot::default()
            }
        };
        let (task, mut rx) =
            RefreshTask::start(generator, KpiSnapshot::default(), Duration::from_millis(100));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().retry_rate, 5.0);
        assert_eq!(task.stop().await, 1);
    }
}
