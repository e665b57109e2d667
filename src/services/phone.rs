/// Russian-convention phone handling: digits only, a leading 8 becomes 7.
pub fn normalize_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if let Some(rest) = digits.strip_prefix('8') {
        format!("7{rest}")
    } else {
        digits
    }
}

/// Valid numbers are `7` followed by exactly ten digits.
pub fn is_valid_phone(phone: &str) -> bool {
    let normalized = normalize_phone(phone);
    normalized.len() == 11 && normalized.starts_with('7')
}

/// Formats a normalized number as `+7 (XXX) XXX-XX-XX`; inputs that are not
/// full numbers are returned unchanged.
pub fn format_phone(phone: &str) -> String {
    let normalized = normalize_phone(phone);
    if normalized.len() != 11 || !normalized.starts_with('7') {
        return phone.trim().to_string();
    }
    format!(
        "+7 ({}) {}-{}-{}",
        &normalized[1..4],
        &normalized[4..7],
        &normalized[7..9],
        &normalized[9..11]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_leading_eight() {
        assert_eq!(normalize_phone("8 (999) 123-45-67"), "79991234567");
        assert_eq!(normalize_phone("+7 999 123 45 67"), "79991234567");
    }

    #[test]
    fn test_validation() {
        assert!(is_valid_phone("+7 (999) 123-45-67"));
        assert!(is_valid_phone("89991234567"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("+1 555 123 4567"));
    }

    #[test]
    fn test_format_full_number() {
        assert_eq!(format_phone("89991234567"), "+7 (999) 123-45-67");
    }

    #[test]
    fn test_format_partial_number_unchanged() {
        assert_eq!(format_phone("999123"), "999123");
    }
}
