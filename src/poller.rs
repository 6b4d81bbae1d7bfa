use std::io::Write;
use std::time::{Duration, Instant};

use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;
use tracing::{error, info};

use crate::error::PollError;
use crate::metrics::MetricCollector;
use crate::render;

/// Runs `rounds` collections spaced `interval` apart, writing every
/// snapshot to `out`. The first round starts immediately.
///
/// Stops at the first failed round; retrying is left to whoever runs
/// the binary. Returns the number of rounds completed.
pub async fn run<C, W>(
    collector: &mut C,
    rounds: u32,
    interval: Duration,
    out: &mut W,
) -> Result<u32, PollError>
where
    C: MetricCollector,
    W: Write,
{
    let mut ticker = tokio::time::interval(interval);
    // A slow server pushes the schedule back instead of bunching rounds
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut ticks = IntervalStream::new(ticker).take(rounds as usize);
    let mut done = 0;

    while ticks.next().await.is_some() {
        let round = done + 1;
        let t0 = Instant::now();

        let snapshot = collector.collect_all().await.inspect_err(|e| {
            error!(round, section = %e.source.section(), error = %e, "collection failed");
        })?;
        render::write_snapshot(out, round, &snapshot)?;

        info!(
            round,
            rounds,
            elapsed_us = t0.elapsed().as_micros() as u64,
            "round complete"
        );
        done = round;
    }

    Ok(done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::collector::fake::FakeInfo;
    use crate::metrics::collector::InfoSection;
    use crate::metrics::{MetricType, RedisCollector};

    fn headers(out: &[u8]) -> Vec<String> {
        String::from_utf8_lossy(out)
            .lines()
            .filter(|l| l.starts_with("======"))
            .map(str::to_owned)
            .collect()
    }

    #[tokio::test]
    async fn runs_requested_rounds() {
        let mut col = RedisCollector::new(FakeInfo::healthy(), "127.0.0.1:6379");
        let mut out = Vec::new();

        let done = run(&mut col, 3, Duration::from_millis(5), &mut out).await.unwrap();

        assert_eq!(done, 3);
        assert_eq!(
            headers(&out),
            vec![
                "====== Metrics Collection 1 ======",
                "====== Metrics Collection 2 ======",
                "====== Metrics Collection 3 ======",
            ]
        );
    }

    #[tokio::test]
    async fn rounds_are_spaced_by_interval() {
        let mut col = RedisCollector::new(FakeInfo::healthy(), "127.0.0.1:6379");
        let mut out = Vec::new();

        let t0 = Instant::now();
        run(&mut col, 3, Duration::from_millis(30), &mut out).await.unwrap();

        // first tick fires immediately, so two gaps
        assert!(t0.elapsed() >= Duration::from_millis(60));
    }

    #[tokio::test]
    async fn failed_round_stops_the_loop() {
        let mut col = RedisCollector::new(
            FakeInfo::healthy().fail(InfoSection::Replication),
            "127.0.0.1:6379",
        );
        let mut out = Vec::new();

        let err = run(&mut col, 5, Duration::from_millis(5), &mut out).await.unwrap_err();

        match err {
            PollError::Collect(e) => assert_eq!(e.kind, MetricType::Connection),
            other => panic!("unexpected error: {other}"),
        }
        assert!(out.is_empty());
    }
}
