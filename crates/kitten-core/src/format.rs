//! Human-readable throughput and size formatting.

const SPEED_UNITS: [&str; 4] = ["b/s", "Kb/s", "Mb/s", "Gb/s"];
const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Format a bit rate with decimal (1000) steps.
///
/// Values of 100 or more in their unit show no decimals, smaller ones
/// show one: `1500.0` is `"1.5 Kb/s"`, `250_000.0` is `"250 Kb/s"`.
pub fn format_speed(bits_per_sec: f64) -> String {
    if bits_per_sec.is_nan() || bits_per_sec <= 0.0 {
        return "0 b/s".to_owned();
    }

    let mut value = bits_per_sec;
    let mut unit = 0;
    while value >= 1000.0 && unit < SPEED_UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }

    if value >= 100.0 {
        format!("{value:.0} {}", SPEED_UNITS[unit])
    } else {
        format!("{value:.1} {}", SPEED_UNITS[unit])
    }
}

/// Format a byte count with binary (1024) steps and one decimal.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", SIZE_UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_zero_and_negative() {
        assert_eq!(format_speed(0.0), "0 b/s");
        assert_eq!(format_speed(-5.0), "0 b/s");
        assert_eq!(format_speed(f64::NAN), "0 b/s");
    }

    #[test]
    fn speed_decimal_rule() {
        assert_eq!(format_speed(1500.0), "1.5 Kb/s");
        assert_eq!(format_speed(250_000.0), "250 Kb/s");
        assert_eq!(format_speed(12_300_000.0), "12.3 Mb/s");
        assert_eq!(format_speed(640.0), "640 b/s");
        assert_eq!(format_speed(42.0), "42.0 b/s");
    }

    #[test]
    fn speed_caps_at_gigabits() {
        assert_eq!(format_speed(3_500_000_000_000.0), "3500 Gb/s");
    }

    #[test]
    fn size_binary_steps() {
        assert_eq!(format_size(0), "0.0 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }
}
