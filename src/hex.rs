use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HexError {
    #[error("token {position} ({token:?}) is not a hex byte")]
    InvalidToken { position: usize, token: String },
}

/// Parses a line of whitespace separated hex bytes such as `12 01 00 02` or `0x12 0x01`.
pub fn parse_hex_line(line: &str) -> Result<Vec<u8>, HexError> {
    line.split_whitespace()
        .enumerate()
        .map(|(position, token)| {
            let digits = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token);
            let invalid = || HexError::InvalidToken {
                position,
                token: token.to_string(),
            };
            // from_str_radix takes a leading sign.
            if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            u8::from_str_radix(digits, 16).map_err(|_| invalid())
        })
        .collect()
}
