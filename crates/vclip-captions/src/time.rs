//! ASS timestamp formatting.

/// Formats seconds as an ASS timestamp: `H:MM:SS.CC` (centisecond precision).
///
/// Negative input clamps to zero — a word can never start before the clip it
/// belongs to once timing has been shifted to clip-relative seconds.
pub fn format_ass_time(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let total_centis = (seconds * 100.0).round() as u64;
    let centis = total_centis % 100;
    let total_seconds = total_centis / 100;
    let secs = total_seconds % 60;
    let total_minutes = total_seconds / 60;
    let mins = total_minutes % 60;
    let hours = total_minutes / 60;
    format!("{hours}:{mins:02}:{secs:02}.{centis:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_zero() {
        assert_eq!(format_ass_time(0.0), "0:00:00.00");
    }

    #[test]
    fn test_format_sub_minute() {
        assert_eq!(format_ass_time(5.25), "0:00:05.25");
    }

    #[test]
    fn test_format_over_hour() {
        assert_eq!(format_ass_time(3661.5), "1:01:01.50");
    }

    #[test]
    fn test_format_clamps_negative() {
        assert_eq!(format_ass_time(-1.0), "0:00:00.00");
    }

    #[test]
    fn test_format_rounds_to_nearest_centisecond() {
        assert_eq!(format_ass_time(1.004), "0:00:01.00");
        assert_eq!(format_ass_time(1.006), "0:00:01.01");
    }
}
