use std::convert::TryFrom;
use std::fmt::{self, Write as _};
use std::io;

use thiserror::Error;
use tracing::info;

use crate::hex;

pub const BYTES_PER_LINE: usize = 16;
pub const DEFAULT_ARRAY_NAME: &str = "mq_client_cert";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CArrayError {
    #[error("{0:?} is not a valid C identifier")]
    InvalidName(String),
    #[error("Input of {0} bytes does not fit in a uint32_t length")]
    TooLarge(usize)
}

fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        },
        _ => false
    }
}

/// A byte buffer rendered as a C `uint8_t` array declaration followed by a
/// `uint32_t <name>_len` constant.
///
/// The body holds one `0xHH` token per byte, sixteen to a line. Every line of
/// the body, including a final partial one, ends in a line break, and the last
/// token has no trailing comma.
#[derive(Debug, Clone, Copy)]
pub struct CArray<'a> {
    name: &'a str,
    bytes: &'a [u8],
    len: u32
}

impl <'a> CArray<'a> {
    pub fn new(name: &'a str, bytes: &'a [u8]) -> Result<Self, CArrayError> {
        if !is_c_identifier(name) {
            return Err(CArrayError::InvalidName(name.to_owned()));
        }

        let len = u32::try_from(bytes.len()).map_err(|_| CArrayError::TooLarge(bytes.len()))?;
        Ok(CArray { name, bytes, len })
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last = self.bytes.len().saturating_sub(1);

        for (i, b) in self.bytes.iter().enumerate() {
            hex::write_token(f, *b)?;
            if i != last {
                f.write_char(',')?;
            }
            if (i + 1) % BYTES_PER_LINE == 0 {
                f.write_char('\n')?;
            }
        }

        // close off a final partial line
        if self.bytes.len() % BYTES_PER_LINE != 0 {
            f.write_char('\n')?;
        }

        Ok(())
    }

    /// Renders the whole declaration and writes it with a single `write_all`.
    pub fn write_to<W: io::Write>(&self, w: &mut W) -> io::Result<()> {
        let rendered = self.to_string();
        w.write_all(rendered.as_bytes())?;

        info!(name = self.name, len = self.len, "emitted C array");
        Ok(())
    }
}

impl fmt::Display for CArray<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "const uint8_t {}[] = {{", self.name)?;
        self.fmt_body(f)?;
        writeln!(f, "}};")?;
        writeln!(f, "const uint32_t {}_len = {};", self.name, self.len)
    }
}
