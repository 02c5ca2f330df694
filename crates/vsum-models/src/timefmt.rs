//! Time formatting for chapter and highlight offsets.

/// Format an offset in seconds as `HH:MM:SS`.
///
/// Fractional seconds are truncated and negative offsets clamp to zero.
/// Hours are not wrapped, so long recordings render as e.g. `27:00:00`.
///
/// # Examples
/// ```
/// use vsum_models::timefmt::seconds_to_hhmmss;
/// assert_eq!(seconds_to_hhmmss(3725.9), "01:02:05");
/// ```
pub fn seconds_to_hhmmss(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_offsets() {
        assert_eq!(seconds_to_hhmmss(0.0), "00:00:00");
        assert_eq!(seconds_to_hhmmss(59.0), "00:00:59");
        assert_eq!(seconds_to_hhmmss(61.0), "00:01:01");
        assert_eq!(seconds_to_hhmmss(3600.0), "01:00:00");
        assert_eq!(seconds_to_hhmmss(97200.0), "27:00:00");
    }

    #[test]
    fn test_truncates_and_clamps() {
        assert_eq!(seconds_to_hhmmss(12.99), "00:00:12");
        assert_eq!(seconds_to_hhmmss(-5.0), "00:00:00");
        assert_eq!(seconds_to_hhmmss(f64::NAN), "00:00:00");
    }
}
