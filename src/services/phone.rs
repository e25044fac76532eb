use crate::models::{PhoneInfo, PhoneRejection};

const MIN_DIGITS: usize = 7;
const MAX_DIGITS: usize = 15;
const FALLBACK_MIN_DIGITS: usize = 8;

const KNOWN_SEQUENCES: [&str; 3] = ["1234567890", "0987654321", "0123456789"];
const TEST_PREFIXES: [&str; 3] = ["555", "999", "000"];

/// Classifies free-text phone input. Cheap enough to run on every keystroke.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneValidator {
    /// Reject numbers the numbering-plan parser could not confirm instead of
    /// accepting them on length alone.
    pub strict: bool,
}

impl PhoneValidator {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn validate(&self, raw: &str) -> PhoneInfo {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

        if digits.is_empty() {
            return PhoneInfo::rejected(PhoneRejection::NoDigits);
        }
        if digits.len() < MIN_DIGITS {
            return PhoneInfo::rejected(PhoneRejection::TooShort);
        }
        if digits.len() > MAX_DIGITS {
            return PhoneInfo::rejected(PhoneRejection::TooLong);
        }
        if is_fake_or_test(&digits) {
            return PhoneInfo::rejected(PhoneRejection::FakeOrTest);
        }

        if let Some(info) = parse_international(raw) {
            return info;
        }

        if !self.strict
            && digits.len() >= FALLBACK_MIN_DIGITS
            && !is_single_digit_run(&digits, FALLBACK_MIN_DIGITS)
        {
            tracing::debug!(digits = digits.len(), "phone accepted on length only");
            return PhoneInfo::unverified(digits);
        }

        PhoneInfo::rejected(PhoneRejection::InvalidFormat)
    }
}

/// Convenience wrapper with the default (lenient) validator.
pub fn validate_phone(raw: &str) -> PhoneInfo {
    PhoneValidator::default().validate(raw)
}

fn parse_international(raw: &str) -> Option<PhoneInfo> {
    let number = phonenumber::parse(None, raw).ok()?;
    if !phonenumber::is_valid(&number) {
        return None;
    }

    let country = number
        .country()
        .id()
        .map(|id| format!("{id:?}"))
        .unwrap_or_else(|| "Unknown".to_string());
    let country_code = number.code().value().to_string();
    let national = number.national();
    let national_number = format!(
        "{}{}",
        "0".repeat(usize::from(national.zeros())),
        national.value()
    );

    Some(PhoneInfo::verified(country, country_code, national_number))
}

/// `digits` must already be stripped to ASCII digits.
pub fn is_fake_or_test(digits: &str) -> bool {
    if is_single_digit_run(digits, MIN_DIGITS) {
        return true;
    }
    if KNOWN_SEQUENCES.contains(&digits) {
        return true;
    }
    if is_repeated_block(digits, 2) || is_repeated_block(digits, 3) {
        return true;
    }
    if digits.bytes().all(|b| b == b'0') {
        return true;
    }
    digits.len() == 10 && TEST_PREFIXES.iter().any(|p| digits.starts_with(p))
}

fn is_single_digit_run(digits: &str, min_len: usize) -> bool {
    let bytes = digits.as_bytes();
    bytes.len() >= min_len && bytes.iter().all(|b| *b == bytes[0])
}

/// Whole string is one `block_len`-digit block repeated at least four times.
fn is_repeated_block(digits: &str, block_len: usize) -> bool {
    let bytes = digits.as_bytes();
    if bytes.len() % block_len != 0 || bytes.len() / block_len < 4 {
        return false;
    }
    let block = &bytes[..block_len];
    bytes.chunks(block_len).all(|chunk| chunk == block)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(raw: &str) -> Option<PhoneRejection> {
        validate_phone(raw).reason
    }

    #[test]
    fn test_length_bounds() {
        assert_eq!(reason("abc"), Some(PhoneRejection::NoDigits));
        assert_eq!(reason(""), Some(PhoneRejection::NoDigits));
        for len in 1..7 {
            let digits: String = (0..len).map(|i| char::from(b'1' + (i % 9) as u8)).collect();
            assert_eq!(reason(&digits), Some(PhoneRejection::TooShort), "{digits}");
        }
        assert_eq!(reason("1234567890123456"), Some(PhoneRejection::TooLong));
        assert_eq!(
            reason("+1 (234) 567-8901-2345-67"),
            Some(PhoneRejection::TooLong)
        );
    }

    #[test]
    fn test_repeated_digits_are_fake() {
        for d in 0..=9u8 {
            for len in 7..=15 {
                let digits = char::from(b'0' + d).to_string().repeat(len);
                let info = validate_phone(&digits);
                assert!(!info.is_valid);
                assert_eq!(info.reason, Some(PhoneRejection::FakeOrTest), "{digits}");
            }
        }
    }

    #[test]
    fn test_known_sequences_rejected() {
        for seq in ["1234567890", "0987654321", "0123456789"] {
            let info = validate_phone(seq);
            assert!(!info.is_valid, "{seq}");
            assert_eq!(info.error.as_deref(), Some(PhoneRejection::FakeOrTest.message()));
        }
    }

    #[test]
    fn test_repeated_blocks_and_test_prefixes() {
        assert!(is_fake_or_test("12121212"));
        assert!(is_fake_or_test("123123123123"));
        assert!(!is_fake_or_test("121212"));
        assert!(!is_fake_or_test("1231231"));
        assert!(is_fake_or_test("5551234567"));
        assert!(is_fake_or_test("9994567890"));
        assert!(is_fake_or_test("0001112223"));
        assert!(!is_fake_or_test("55512345678"));
    }

    #[test]
    fn test_valid_us_number() {
        let info = validate_phone("+1 213 373 4253");
        assert!(info.is_valid);
        assert!(info.verified);
        assert_eq!(info.country, "US");
        assert_eq!(info.country_code, "1");
        assert_eq!(info.national_number, "2133734253");
        assert_eq!(info.error, None);
    }

    #[test]
    fn test_fallback_accepts_plausible_length() {
        // No leading '+', so the international parse has no region to work with.
        let info = validate_phone("050 812 3947");
        assert!(info.is_valid);
        assert!(!info.verified);
        assert_eq!(info.country, "Unknown");
        assert_eq!(info.country_code, "");
        assert_eq!(info.national_number, "0508123947");
    }

    #[test]
    fn test_fallback_rejects_seven_digits() {
        let info = validate_phone("8675309");
        assert!(!info.is_valid);
        assert_eq!(info.reason, Some(PhoneRejection::InvalidFormat));
    }

    #[test]
    fn test_strict_mode_rejects_unverified() {
        let info = PhoneValidator::new(true).validate("050 812 3947");
        assert!(!info.is_valid);
        assert_eq!(info.reason, Some(PhoneRejection::InvalidFormat));
    }

    #[test]
    fn test_invalid_clears_metadata() {
        for raw in ["123", "1111111", "0987654321", "8675309"] {
            let info = validate_phone(raw);
            assert!(!info.is_valid);
            assert!(info.country.is_empty());
            assert!(info.country_code.is_empty());
            assert!(info.national_number.is_empty());
            assert!(info.error.is_some());
        }
    }
}
