//! Formatting and validation for Brazilian identifiers (CPF, phone, CEP)
//! and card fields.
//!
//! The formatters apply a progressive mask: non-digits are stripped and the
//! locale punctuation is re-inserted as digits accumulate, capped at the
//! format's fixed length. Running a formatter over its own output yields the
//! same string.

fn digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn take_digits(value: &str, max: usize) -> String {
    digits(value).chars().take(max).collect()
}

/// 000.000.000-00
pub fn format_cpf(value: &str) -> String {
    let d = take_digits(value, 11);
    let mut out = String::with_capacity(14);
    for (i, c) in d.chars().enumerate() {
        match i {
            3 | 6 => out.push('.'),
            9 => out.push('-'),
            _ => {}
        }
        out.push(c);
    }
    out
}

/// (00) 00000-0000, falling back to the 8-digit local format while the
/// number is still being typed.
pub fn format_phone(value: &str) -> String {
    let d = take_digits(value, 11);
    let mut out = String::with_capacity(15);
    for (i, c) in d.chars().enumerate() {
        match i {
            0 => out.push('('),
            2 => out.push_str(") "),
            7 => out.push('-'),
            _ => {}
        }
        out.push(c);
    }
    out
}

/// 00000-000
pub fn format_cep(value: &str) -> String {
    let d = take_digits(value, 8);
    let mut out = String::with_capacity(9);
    for (i, c) in d.chars().enumerate() {
        if i == 5 {
            out.push('-');
        }
        out.push(c);
    }
    out
}

/// 0000 0000 0000 0000
pub fn format_card_number(value: &str) -> String {
    let d = take_digits(value, 16);
    let mut out = String::with_capacity(19);
    for (i, c) in d.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// MM/YY
pub fn format_card_expiry(value: &str) -> String {
    let d = take_digits(value, 4);
    let mut out = String::with_capacity(5);
    for (i, c) in d.chars().enumerate() {
        if i == 2 {
            out.push('/');
        }
        out.push(c);
    }
    out
}

/// CPF check-digit validation.
///
/// Strips non-digits, requires exactly 11 digits that are not all the same,
/// then verifies both modulo-11 check digits (weights descending from 10 and
/// 11; digit is 0 when the remainder is below 2, else 11 minus remainder).
/// Malformed input simply fails validation.
pub fn validate_cpf(value: &str) -> bool {
    let d = digits(value);
    if d.len() != 11 {
        return false;
    }
    let n: Vec<u32> = d.chars().filter_map(|c| c.to_digit(10)).collect();
    if n.iter().all(|&x| x == n[0]) {
        return false;
    }

    let check = |len: usize| -> u32 {
        let start = len + 1;
        let sum: u32 = n[..len]
            .iter()
            .enumerate()
            .map(|(i, &x)| x * (start - i) as u32)
            .sum();
        let rem = (sum * 10) % 11;
        if rem == 10 {
            0
        } else {
            rem
        }
    };

    check(9) == n[9] && check(10) == n[10]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_mask_is_progressive_and_capped() {
        assert_eq!(format_cpf("5"), "5");
        assert_eq!(format_cpf("5299"), "529.9");
        assert_eq!(format_cpf("52998224"), "529.982.24");
        assert_eq!(format_cpf("52998224725"), "529.982.247-25");
        assert_eq!(format_cpf("52998224725999"), "529.982.247-25");
    }

    #[test]
    fn formatters_are_idempotent() {
        for raw in ["52998224725", "529.982.247-25", "junk529..98"] {
            let once = format_cpf(raw);
            assert_eq!(format_cpf(&once), once);
        }
        let phone = format_phone("11987654321");
        assert_eq!(phone, "(11) 98765-4321");
        assert_eq!(format_phone(&phone), phone);

        let cep = format_cep("01310100");
        assert_eq!(cep, "01310-100");
        assert_eq!(format_cep(&cep), cep);

        let card = format_card_number("4111111111111111");
        assert_eq!(card, "4111 1111 1111 1111");
        assert_eq!(format_card_number(&card), card);

        let expiry = format_card_expiry("1227");
        assert_eq!(expiry, "12/27");
        assert_eq!(format_card_expiry(&expiry), expiry);
    }

    #[test]
    fn cpf_rejects_repeated_digits() {
        for digit in 0..=9 {
            let value = digit.to_string().repeat(11);
            assert!(!validate_cpf(&value), "{value} should be invalid");
        }
    }

    #[test]
    fn cpf_rejects_wrong_length() {
        assert!(!validate_cpf(""));
        assert!(!validate_cpf("5299822472"));
        assert!(!validate_cpf("529982247255"));
        assert!(!validate_cpf("not a cpf"));
    }

    #[test]
    fn cpf_accepts_known_valid_value() {
        assert!(validate_cpf("52998224725"));
        // formatted input must pass too
        assert!(validate_cpf("529.982.247-25"));
    }

    #[test]
    fn cpf_rejects_altered_digit() {
        assert!(!validate_cpf("52998224724"));
        assert!(!validate_cpf("62998224725"));
    }
}
