//! Field checks shared by the address book and the donation wizard.

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Indian postal code: exactly six ASCII digits.
pub fn is_valid_pincode(value: &str) -> bool {
    let value = value.trim();
    value.len() == 6 && value.bytes().all(|b| b.is_ascii_digit())
}

/// At least ten digits; spaces, dashes and a leading `+` are tolerated.
pub fn is_valid_phone(value: &str) -> bool {
    let value = value.trim();
    let allowed = value
        .char_indices()
        .all(|(i, c)| c.is_ascii_digit() || c == ' ' || c == '-' || (c == '+' && i == 0));
    allowed && value.chars().filter(|c| c.is_ascii_digit()).count() >= 10
}

pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pincode_requires_six_digits() {
        assert!(is_valid_pincode("560001"));
        assert!(is_valid_pincode(" 560001 "));
        assert!(!is_valid_pincode("56001"));
        assert!(!is_valid_pincode("5600011"));
        assert!(!is_valid_pincode("56O001"));
    }

    #[test]
    fn phone_counts_digits() {
        assert!(is_valid_phone("9876543210"));
        assert!(is_valid_phone("+91 98765-43210"));
        assert!(!is_valid_phone("98765"));
        assert!(!is_valid_phone("98765abc43210"));
        assert!(!is_valid_phone("98+76543210"));
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("reader@example.org"));
        assert!(!is_valid_email("reader@"));
        assert!(!is_valid_email("@example.org"));
        assert!(!is_valid_email("reader@example"));
        assert!(!is_valid_email("re ader@example.org"));
        assert!(!is_valid_email("reader@@example.org"));
    }
}
