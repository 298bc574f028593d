use std::time::Duration;

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

pub fn minutes(wait: Duration) -> u64 {
    wait.as_secs() / 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_two_decimals() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(0.875, 2), 0.88);
        assert_eq!(round_to(4.0, 2), 4.0);
    }

    #[test]
    fn round_to_zero_decimals_is_whole_seconds() {
        assert_eq!(round_to(2.6, 0), 3.0);
    }

    #[test]
    fn minutes_truncates_partial_minutes() {
        assert_eq!(minutes(Duration::from_secs(1920)), 32);
        assert_eq!(minutes(Duration::from_secs(90)), 1);
        assert_eq!(minutes(Duration::from_secs(0)), 0);
    }
}
