/// Format a byte count with decimal units and three significant digits,
/// trimming trailing zeros: "150 B", "1 kB", "10.5 kB", "1.34 MB".
pub fn human_bytes(b: impl Into<u128>) -> String {
    const UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];
    let mut n: f64 = b.into() as f64;
    let mut u = 0;
    while n >= 1000.0 && u < UNITS.len() - 1 {
        n /= 1000.0;
        u += 1;
    }
    let decimals = if u == 0 || n >= 100.0 {
        0
    } else if n >= 10.0 {
        1
    } else {
        2
    };
    let mut s = format!("{n:.decimals$}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    format!("{} {}", s, UNITS[u])
}

#[cfg(test)]
mod tests {
    use super::human_bytes;

    #[test]
    fn bytes_stay_unscaled() {
        assert_eq!(human_bytes(0u64), "0 B");
        assert_eq!(human_bytes(100u64), "100 B");
        assert_eq!(human_bytes(999u64), "999 B");
    }

    #[test]
    fn round_units_drop_trailing_zeros() {
        assert_eq!(human_bytes(1000u64), "1 kB");
        assert_eq!(human_bytes(1_000_000u64), "1 MB");
        assert_eq!(human_bytes(2_600_000u64), "2.6 MB");
    }

    #[test]
    fn three_significant_digits() {
        assert_eq!(human_bytes(1337u64), "1.34 kB");
        assert_eq!(human_bytes(10_500u64), "10.5 kB");
        assert_eq!(human_bytes(150_000u64), "150 kB");
    }

    #[test]
    fn huge_counts_saturate_at_the_last_unit() {
        assert_eq!(human_bytes(1_000_000_000_000_000_000u128), "1 EB");
        assert_eq!(human_bytes(12_345_000_000_000_000_000_000u128), "12345 EB");
    }
}
