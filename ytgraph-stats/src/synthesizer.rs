//! Synthesized trend series anchored on a live channel snapshot
//!
//! The platform exposes no historical statistics endpoint, so trend series
//! are generated from the current snapshot by a pseudo-growth model. The
//! generated series is a display approximation, not measured history, and is
//! tagged accordingly so consumers can tell the two apart.

use chrono::Duration;
use std::collections::BTreeMap;
use tracing::debug;
use ytgraph_common::{ChannelSnapshot, Metric, MetricSeries, SeriesOrigin, TimeSeriesPoint};

/// Generates synthesized historical series from a current snapshot.
///
/// The model works backward from the live value: each earlier point is the
/// next point scaled by a month-over-month decay factor in (0, 1]. This
/// guarantees non-negative values, a final point equal to the live value, and
/// values that never decrease as timestamps increase.
#[derive(Debug, Clone)]
pub struct TrendSynthesizer {
    /// Assumed month-over-month growth rate; the backward decay factor is
    /// `1 - monthly_growth`
    monthly_growth: f64,
    /// Jitter applied to the decay factor, as a fraction in [0, 1)
    variation: f64,
}

impl Default for TrendSynthesizer {
    fn default() -> Self {
        Self {
            monthly_growth: 0.05,
            variation: 0.2,
        }
    }
}

impl TrendSynthesizer {
    /// Create a synthesizer with the given growth rate and jitter.
    ///
    /// Both parameters are clamped so the decay factor stays in (0, 1].
    pub fn new(monthly_growth: f64, variation: f64) -> Self {
        Self {
            monthly_growth: monthly_growth.clamp(0.0, 0.9),
            variation: variation.clamp(0.0, 0.5),
        }
    }

    /// Build one synthesized series per tracked metric.
    ///
    /// Each series has `months` points, one per 30-day step, the last point
    /// timestamped at the snapshot's fetch time and equal to the live value.
    /// `months` ≤ 1 yields a single-point series tagged [`SeriesOrigin::Measured`];
    /// longer series are tagged [`SeriesOrigin::Synthesized`].
    pub fn build_series(
        &self,
        snapshot: &ChannelSnapshot,
        months: u32,
    ) -> BTreeMap<Metric, MetricSeries> {
        Metric::ALL
            .iter()
            .map(|&metric| (metric, self.synthesize_metric(snapshot, metric, months)))
            .collect()
    }

    fn synthesize_metric(
        &self,
        snapshot: &ChannelSnapshot,
        metric: Metric,
        months: u32,
    ) -> MetricSeries {
        let current = snapshot.metric_value(metric);

        if months <= 1 {
            return MetricSeries {
                metric,
                origin: SeriesOrigin::Measured,
                points: vec![TimeSeriesPoint {
                    timestamp: snapshot.fetched_at,
                    value: current,
                }],
            };
        }

        let count = months as usize;
        let mut rng = fastrand::Rng::with_seed(seed_for(&snapshot.id, metric));
        let decay = 1.0 - self.monthly_growth;

        let mut values = vec![0u64; count];
        values[count - 1] = current;
        for i in (0..count - 1).rev() {
            let jitter = 1.0 - rng.f64() * self.variation;
            let factor = (decay * jitter).clamp(0.0, 1.0);
            values[i] = (values[i + 1] as f64 * factor).floor() as u64;
        }

        let points = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| TimeSeriesPoint {
                timestamp: snapshot.fetched_at - Duration::days(30 * (count - 1 - i) as i64),
                value,
            })
            .collect();

        debug!(
            "Synthesized {} points for metric {} anchored at {}",
            count, metric, current
        );

        MetricSeries {
            metric,
            origin: SeriesOrigin::Synthesized,
            points,
        }
    }
}

/// Deterministic seed: FNV-1a over the channel id, mixed with the metric.
///
/// Identical requests produce identical series across runs.
fn seed_for(channel_id: &str, metric: Metric) -> u64 {
    let mut seed: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in channel_id.bytes() {
        seed ^= byte as u64;
        seed = seed.wrapping_mul(0x0000_0100_0000_01b3);
    }
    seed ^= metric.as_str().len() as u64;
    for byte in metric.as_str().bytes() {
        seed ^= byte as u64;
        seed = seed.wrapping_mul(0x0000_0100_0000_01b3);
    }
    seed
}
