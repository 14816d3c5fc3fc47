use std::path::Path;

use sysinfo::{DiskExt, System, SystemExt};

#[derive(Clone, Copy, Debug)]
pub struct DiskUsage {
    pub percent: f64,
    pub total_bytes: u64,
    pub used_bytes: u64,
}

/// Usage of the filesystem mounted exactly at `mount_point`. Absent when the
/// mount point is not present (an unplugged USB disk is expected, not an
/// error) or reports no capacity.
pub fn disk_usage(mount_point: &Path) -> Option<DiskUsage> {
    let mut system = System::new();
    system.refresh_disks_list();

    let disk = system
        .disks()
        .iter()
        .find(|disk| disk.mount_point() == mount_point)?;

    let total_bytes = disk.total_space();
    if total_bytes == 0 {
        return None;
    }
    let used_bytes = total_bytes.saturating_sub(disk.available_space());

    Some(DiskUsage {
        percent: used_bytes as f64 / total_bytes as f64 * 100.0,
        total_bytes,
        used_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_mount_point_is_absent() {
        assert!(disk_usage(Path::new("/definitely/not/mounted")).is_none());
    }
}
