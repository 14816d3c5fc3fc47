use sysinfo::{System, SystemExt};

#[derive(Clone, Copy, Debug)]
pub struct MemoryUsage {
    pub percent: f64,
    pub total_bytes: u64,
    pub used_bytes: u64,
}

pub fn memory_usage() -> Option<MemoryUsage> {
    let mut system = System::new();
    system.refresh_memory();

    let total_bytes = system.total_memory();
    if total_bytes == 0 {
        return None;
    }
    let used_bytes = system.used_memory();

    Some(MemoryUsage {
        percent: used_bytes as f64 / total_bytes as f64 * 100.0,
        total_bytes,
        used_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_usage_is_consistent() {
        let usage = memory_usage().expect("host reports no memory");
        assert!(usage.total_bytes > 0);
        assert!(usage.used_bytes <= usage.total_bytes);
        assert!((0.0..=100.0).contains(&usage.percent));
    }
}
