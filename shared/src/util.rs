/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Keep only ASCII digits ("+92 (300) 111-22" -> "9230011122")
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("+92 (300) 111-22"), "9230011122");
        assert_eq!(digits_only("abc"), "");
        assert_eq!(digits_only(""), "");
    }

    #[test]
    fn test_now_millis_is_recent() {
        // 2024-01-01
        assert!(now_millis() > 1_704_067_200_000);
    }
}
