use std::path::Path;

pub fn uptime_seconds() -> Option<u64> {
    let content = std::fs::read_to_string(Path::new("/proc/uptime")).ok()?;
    parse_uptime(&content)
}

/// First field of `/proc/uptime`: seconds since boot, fractional.
fn parse_uptime(content: &str) -> Option<u64> {
    content
        .split_whitespace()
        .next()?
        .parse::<f64>()
        .ok()
        .map(|seconds| seconds as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uptime() {
        assert_eq!(parse_uptime("350735.47 234388.90\n"), Some(350735));
        assert_eq!(parse_uptime("0.00 0.00\n"), Some(0));
        assert_eq!(parse_uptime(""), None);
        assert_eq!(parse_uptime("not-a-number 1.0"), None);
    }
}
