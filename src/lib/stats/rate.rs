//! Pure delta-sampling math.
//!
//! Rates are derived by differencing two timestamped counter samples of the
//! same family. Unavailable (`None`) is a distinguished outcome meaning
//! "insufficient data this pass" (the expected state on the very first
//! sample and after a counter reset) and is never conflated with a rate of
//! zero.

use super::types::{RawCounterSample, BYTES_RECV, BYTES_SENT};

/// Network throughput for one pass, per direction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NetworkRates {
    pub upload_bps: Option<f64>,
    pub download_bps: Option<f64>,
}

/// Aggregate CPU usage percentage between two samples, clamped to [0, 100].
///
/// Returns `None` when the time delta or total tick delta is non-positive,
/// which covers the first-sample case, clock steps, and counter resets.
pub fn cpu_usage_percent(previous: &RawCounterSample, current: &RawCounterSample) -> Option<f64> {
    let delta_time = current.timestamp - previous.timestamp;
    let delta_total = current.total() as i128 - previous.total() as i128;

    if delta_time <= 0.0 || delta_total <= 0 {
        return None;
    }

    let idle = |sample: &RawCounterSample| sample.counter("idle") + sample.counter("iowait");
    let delta_idle = idle(current) as i128 - idle(previous) as i128;

    // A partial counter reset can push delta_idle outside [0, delta_total],
    // so the quotient is clamped rather than trusted.
    let usage = (delta_total - delta_idle) as f64 / delta_total as f64 * 100.0;
    Some(usage.clamp(0.0, 100.0))
}

/// Network byte rates between two samples, independently per direction.
///
/// A non-positive time delta makes both directions unavailable; a decreased
/// counter (reset) makes only that direction unavailable. A zero delta with
/// positive time is a valid rate of zero.
pub fn network_rates(previous: &RawCounterSample, current: &RawCounterSample) -> NetworkRates {
    let delta_time = current.timestamp - previous.timestamp;
    if delta_time <= 0.0 {
        return NetworkRates::default();
    }

    let direction = |name: &str| -> Option<f64> {
        let current_bytes = current.counter(name);
        let previous_bytes = previous.counter(name);
        if current_bytes < previous_bytes {
            return None;
        }
        Some((current_bytes - previous_bytes) as f64 / delta_time)
    };

    NetworkRates {
        upload_bps: direction(BYTES_SENT),
        download_bps: direction(BYTES_RECV),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::types::MetricFamily;

    fn cpu_sample(timestamp: f64, user: u64, idle: u64) -> RawCounterSample {
        RawCounterSample::new(MetricFamily::Cpu, timestamp)
            .with_counter("user", user)
            .with_counter("idle", idle)
    }

    fn net_sample(timestamp: f64, sent: u64, recv: u64) -> RawCounterSample {
        RawCounterSample::new(MetricFamily::Network, timestamp)
            .with_counter(BYTES_SENT, sent)
            .with_counter(BYTES_RECV, recv)
    }

    #[test]
    fn test_cpu_usage_from_reference_counters() {
        // delta_total = 100, delta_idle = 20 -> 80 %
        let previous = cpu_sample(0.0, 100, 400);
        let current = cpu_sample(1.0, 180, 420);
        assert_eq!(cpu_usage_percent(&previous, &current), Some(80.0));
    }

    #[test]
    fn test_cpu_usage_counts_iowait_as_idle() {
        let previous = cpu_sample(0.0, 100, 400).with_counter("iowait", 0);
        let current = cpu_sample(1.0, 180, 400).with_counter("iowait", 20);
        assert_eq!(cpu_usage_percent(&previous, &current), Some(80.0));
    }

    #[test]
    fn test_cpu_usage_identical_counters_is_unavailable() {
        // No ticks elapsed at all: delta_total == 0 is "insufficient data",
        // not 0 % usage.
        let previous = cpu_sample(0.0, 100, 400);
        let current = cpu_sample(1.0, 100, 400);
        assert_eq!(cpu_usage_percent(&previous, &current), None);
    }

    #[test]
    fn test_cpu_usage_non_positive_time_delta_is_unavailable() {
        let previous = cpu_sample(1.0, 100, 400);
        let current = cpu_sample(1.0, 180, 420);
        assert_eq!(cpu_usage_percent(&previous, &current), None);

        let earlier = cpu_sample(0.5, 180, 420);
        assert_eq!(cpu_usage_percent(&previous, &earlier), None);
    }

    #[test]
    fn test_cpu_usage_counter_reset_is_unavailable() {
        let previous = cpu_sample(0.0, 1_000_000, 4_000_000);
        let current = cpu_sample(1.0, 100, 400);
        assert_eq!(cpu_usage_percent(&previous, &current), None);
    }

    #[test]
    fn test_cpu_usage_is_clamped_after_partial_reset() {
        // Idle bucket reset while the others kept counting: delta_total stays
        // positive but the raw formula yields > 100 %.
        let previous = cpu_sample(0.0, 100, 500);
        let current = cpu_sample(1.0, 1000, 400);
        let usage = cpu_usage_percent(&previous, &current).unwrap();
        assert_eq!(usage, 100.0);
    }

    #[test]
    fn test_network_rates_from_reference_counters() {
        let previous = net_sample(0.0, 1000, 0);
        let current = net_sample(1.0, 2024, 0);
        let rates = network_rates(&previous, &current);
        assert_eq!(rates.upload_bps, Some(1024.0));
        assert_eq!(rates.download_bps, Some(0.0));
    }

    #[test]
    fn test_network_rates_scale_with_time_delta() {
        let previous = net_sample(0.0, 0, 0);
        let current = net_sample(2.0, 2048, 4096);
        let rates = network_rates(&previous, &current);
        assert_eq!(rates.upload_bps, Some(1024.0));
        assert_eq!(rates.download_bps, Some(2048.0));
    }

    #[test]
    fn test_network_rates_zero_delta_is_zero_not_unavailable() {
        let previous = net_sample(0.0, 5000, 5000);
        let current = net_sample(1.0, 5000, 5000);
        let rates = network_rates(&previous, &current);
        assert_eq!(rates.upload_bps, Some(0.0));
        assert_eq!(rates.download_bps, Some(0.0));
    }

    #[test]
    fn test_network_rates_non_positive_time_delta_is_unavailable() {
        let previous = net_sample(1.0, 1000, 1000);
        let current = net_sample(1.0, 2000, 2000);
        assert_eq!(network_rates(&previous, &current), NetworkRates::default());
    }

    #[test]
    fn test_network_rates_counter_reset_is_per_direction() {
        // Sent counter reset, received kept counting.
        let previous = net_sample(0.0, 10_000, 1000);
        let current = net_sample(1.0, 24, 3048);
        let rates = network_rates(&previous, &current);
        assert_eq!(rates.upload_bps, None);
        assert_eq!(rates.download_bps, Some(2048.0));
    }

    #[test]
    fn test_network_rates_zero_interfaces_yield_zero() {
        // A host with no eligible interfaces still produces valid zero-sum
        // samples: data present, no change.
        let previous = net_sample(0.0, 0, 0);
        let current = net_sample(1.0, 0, 0);
        let rates = network_rates(&previous, &current);
        assert_eq!(rates.upload_bps, Some(0.0));
        assert_eq!(rates.download_bps, Some(0.0));
    }
}
