use std::fmt;
use thiserror::Error;

/// Writes `b` as a C hex literal: `0x` followed by exactly two uppercase digits.
pub fn write_token<W: fmt::Write>(w: &mut W, b: u8) -> fmt::Result {
    write!(w, "0x{:02X}", b)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexTokenError {
    #[error("Token {0:?} is missing the 0x prefix")]
    MissingPrefix(String),
    #[error("Token {0:?} should have exactly two hex digits")]
    InvalidWidth(String),
    #[error("Token {0:?} contains lowercase hex digits")]
    Lowercase(String),
    #[error("Invalid hex digit in token {0:?}")]
    InvalidDigit(String)
}

fn parse_token(token: &str) -> Result<u8, HexTokenError> {
    let digits = token.strip_prefix("0x").ok_or_else(|| HexTokenError::MissingPrefix(token.to_owned()))?;

    if digits.len() != 2 {
        return Err(HexTokenError::InvalidWidth(token.to_owned()));
    }

    if digits.bytes().any(|c| c.is_ascii_lowercase()) {
        return Err(HexTokenError::Lowercase(token.to_owned()));
    }

    let mut out = [0u8; 1];
    ::hex::decode_to_slice(digits, &mut out).map_err(|_| HexTokenError::InvalidDigit(token.to_owned()))?;
    Ok(out[0])
}

/// Parses the body of an emitted array (the lines between the braces) back into bytes.
pub fn parse_tokens(body: &str) -> Result<Vec<u8>, HexTokenError> {
    body.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(parse_token)
        .collect()
}
