//! CPU temperature via an ordered fallback probe list.
//!
//! Boards expose the die temperature in different places; probes are tried in
//! order until one yields a value. The sysfs files report millidegrees, the
//! sensor-label scan falls back to whatever hardware monitor sysinfo finds.

use std::path::PathBuf;

use sysinfo::{ComponentExt, System, SystemExt};

const SENSOR_LABEL_KEYWORDS: [&str; 4] = ["cpu", "core", "package", "temp"];

#[derive(Clone, Debug)]
pub enum TemperatureSource {
    /// A sysfs-style file holding millidegrees Celsius.
    SysfsMillidegrees(PathBuf),
    /// Scan sensor labels for the first one matching a keyword.
    SensorLabelScan(&'static [&'static str]),
}

impl TemperatureSource {
    pub fn probe(&self) -> Option<f64> {
        match self {
            TemperatureSource::SysfsMillidegrees(path) => {
                let raw = std::fs::read_to_string(path).ok()?;
                let millidegrees: f64 = raw.trim().parse().ok()?;
                Some(millidegrees / 1000.0)
            }
            TemperatureSource::SensorLabelScan(keywords) => {
                let mut system = System::new();
                system.refresh_components_list();
                system
                    .components()
                    .iter()
                    .find(|component| {
                        let label = component.label().to_lowercase();
                        keywords.iter().any(|keyword| label.contains(keyword))
                    })
                    .map(|component| component.temperature() as f64)
            }
        }
    }
}

pub fn default_probe_order() -> Vec<TemperatureSource> {
    vec![
        TemperatureSource::SysfsMillidegrees("/sys/class/thermal/thermal_zone0/temp".into()),
        TemperatureSource::SysfsMillidegrees("/sys/class/thermal/thermal_zone1/temp".into()),
        TemperatureSource::SysfsMillidegrees("/sys/class/hwmon/hwmon0/temp1_input".into()),
        TemperatureSource::SysfsMillidegrees("/etc/armbianmonitor/datasources/soctemp".into()),
        TemperatureSource::SensorLabelScan(&SENSOR_LABEL_KEYWORDS),
    ]
}

/// First probe that yields a value wins; `None` when every probe misses.
pub fn cpu_temperature() -> Option<f64> {
    probe_in_order(&default_probe_order())
}

pub fn probe_in_order(sources: &[TemperatureSource]) -> Option<f64> {
    sources.iter().find_map(TemperatureSource::probe)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(content: &str) -> PathBuf {
        use rand::Rng;

        let suffix: String = rand::thread_rng()
            .sample_iter(&rand::distributions::Alphanumeric)
            .take(12)
            .map(char::from)
            .collect();
        let path = std::env::temp_dir().join(format!("soctemp-{suffix}"));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_sysfs_probe_converts_millidegrees() {
        let path = temp_file("47200\n");
        let probe = TemperatureSource::SysfsMillidegrees(path.clone());
        assert_eq!(probe.probe(), Some(47.2));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_sysfs_probe_misses_on_bad_content() {
        let missing = TemperatureSource::SysfsMillidegrees("/does/not/exist/temp".into());
        assert_eq!(missing.probe(), None);

        let path = temp_file("garbage\n");
        let garbage = TemperatureSource::SysfsMillidegrees(path.clone());
        assert_eq!(garbage.probe(), None);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_probe_order_first_hit_wins() {
        let first = temp_file("40000\n");
        let second = temp_file("90000\n");
        let sources = vec![
            TemperatureSource::SysfsMillidegrees("/does/not/exist/temp".into()),
            TemperatureSource::SysfsMillidegrees(first.clone()),
            TemperatureSource::SysfsMillidegrees(second.clone()),
        ];

        assert_eq!(probe_in_order(&sources), Some(40.0));

        std::fs::remove_file(first).unwrap();
        std::fs::remove_file(second).unwrap();
    }
}
