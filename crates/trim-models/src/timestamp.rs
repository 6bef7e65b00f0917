//! Timestamp formatting for logs and API responses.

/// Format seconds as `HH:MM:SS`, or `HH:MM:SS.mmm` when there is a
/// fractional part. Negative and non-finite input formats as zero.
pub fn format_seconds(total_secs: f64) -> String {
    let total_secs = if total_secs.is_finite() && total_secs > 0.0 {
        total_secs
    } else {
        0.0
    };

    let hours = (total_secs / 3600.0).floor() as u64;
    let mins = ((total_secs % 3600.0) / 60.0).floor() as u64;
    let secs = total_secs % 60.0;

    if (secs - secs.floor()).abs() > 0.0001 {
        format!("{:02}:{:02}:{:06.3}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}:{:02}", hours, mins, secs.floor() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_whole_seconds() {
        assert_eq!(format_seconds(0.0), "00:00:00");
        assert_eq!(format_seconds(90.0), "00:01:30");
        assert_eq!(format_seconds(3725.0), "01:02:05");
    }

    #[test]
    fn test_format_fractional_seconds() {
        assert_eq!(format_seconds(12.25), "00:00:12.250");
    }

    #[test]
    fn test_format_rejects_garbage() {
        assert_eq!(format_seconds(-4.0), "00:00:00");
        assert_eq!(format_seconds(f64::INFINITY), "00:00:00");
    }
}
