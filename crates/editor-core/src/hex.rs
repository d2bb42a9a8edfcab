/// Text typed into a hex prompt that does not describe whole bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HexParseError {
    #[error("Invalid hexa string")]
    InvalidDigit,
    #[error("Must be an even number of chars")]
    OddLength,
}

/// Value of an ASCII hex digit, either case.
#[inline]
#[must_use]
pub fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
#[must_use]
pub fn set_high_nibble(byte: u8, value: u8) -> u8 {
    (byte & 0x0F) | (value << 4)
}

#[inline]
#[must_use]
pub fn set_low_nibble(byte: u8, value: u8) -> u8 {
    (byte & 0xF0) | (value & 0x0F)
}

/// Largest multiple of `b` not greater than `a`. Rounds toward negative
/// infinity, so `floor_to(-1, 16) == -16`. Returns `a` when `b <= 0`.
#[inline]
#[must_use]
pub fn floor_to(a: i64, b: i64) -> i64 {
    if b <= 0 {
        return a;
    }

    a.div_euclid(b) * b
}

/// Turns `"AA bb\tCC"` into `[0xAA, 0xBB, 0xCC]`. Spaces and tabs are
/// ignored anywhere in the input.
///
/// # Errors
///
/// - `HexParseError::InvalidDigit` for any other non-hex character.
/// - `HexParseError::OddLength` if the digits do not pair up.
pub fn parse_hex_string(input: &str) -> Result<Vec<u8>, HexParseError> {
    let digits = input
        .bytes()
        .filter(|c| *c != b' ' && *c != b'\t')
        .map(|c| hex_value(c).ok_or(HexParseError::InvalidDigit))
        .collect::<Result<Vec<u8>, HexParseError>>()?;

    if digits.len() % 2 != 0 {
        return Err(HexParseError::OddLength);
    }

    Ok(digits
        .chunks_exact(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}

/// Like [`parse_hex_string`], but a lone digit stands for the byte with
/// that value, so `"7"` fills with `0x07`.
///
/// # Errors
///
/// Same as [`parse_hex_string`].
pub fn parse_fill_pattern(input: &str) -> Result<Vec<u8>, HexParseError> {
    if let [single] = input.as_bytes() {
        return hex_value(*single)
            .map(|value| vec![value])
            .ok_or(HexParseError::InvalidDigit);
    }

    parse_hex_string(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_spaced() {
        assert_eq!(parse_hex_string("AABB"), Ok(vec![0xAA, 0xBB]));
        assert_eq!(parse_hex_string("aa bb\tcc"), Ok(vec![0xAA, 0xBB, 0xCC]));
        assert_eq!(parse_hex_string(""), Ok(vec![]));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse_hex_string("AAB"), Err(HexParseError::OddLength));
        assert_eq!(parse_hex_string("AAXB"), Err(HexParseError::InvalidDigit));
    }

    #[test]
    fn fill_pattern_accepts_single_digit() {
        assert_eq!(parse_fill_pattern("7"), Ok(vec![0x07]));
        assert_eq!(parse_fill_pattern("g"), Err(HexParseError::InvalidDigit));
        assert_eq!(parse_fill_pattern("0102"), Ok(vec![0x01, 0x02]));
    }

    #[test]
    fn nibble_updates() {
        assert_eq!(set_high_nibble(0x12, 0xA), 0xA2);
        assert_eq!(set_low_nibble(0x12, 0xA), 0x1A);
        assert_eq!(hex_value(b'F'), Some(15));
        assert_eq!(hex_value(b'z'), None);
    }

    #[test]
    fn floor_rounds_down_for_negatives() {
        assert_eq!(floor_to(35, 16), 32);
        assert_eq!(floor_to(32, 16), 32);
        assert_eq!(floor_to(-1, 16), -16);
        assert_eq!(floor_to(-16, 16), -16);
        assert_eq!(floor_to(7, 0), 7);
    }
}
