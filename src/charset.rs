//! Source Charsets
//!
//! Decodes source files into UTF-8 text. When a UTF charset is configured, a
//! byte order mark picks the actual encoding and is stripped from the result.
//! Single-byte charsets take the bytes as they are.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Supported source charsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Charset {
    #[default]
    Utf8,
    Utf16Le,
    Utf16Be,
    UsAscii,
    Iso8859_1,
}

impl Charset {
    /// Looks up a charset by name or alias, case-insensitively
    pub fn for_name(name: &str) -> Result<Self> {
        if !is_legal_name(name) {
            return Err(Error::Config(format!("Illegal charset: {}", name)));
        }
        let charset = match name.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Charset::Utf8,
            "utf-16le" | "utf_16le" | "unicodelittleunmarked" => Charset::Utf16Le,
            "utf-16be" | "utf_16be" | "utf-16" | "utf_16" | "unicodebigunmarked" => Charset::Utf16Be,
            "us-ascii" | "ascii" | "us" | "iso646-us" => Charset::UsAscii,
            "iso-8859-1" | "iso8859-1" | "iso_8859_1" | "latin1" | "l1" => Charset::Iso8859_1,
            _ => return Err(Error::Config(format!("Unsupported charset: {}", name))),
        };
        Ok(charset)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Utf16Le => "UTF-16LE",
            Charset::Utf16Be => "UTF-16BE",
            Charset::UsAscii => "US-ASCII",
            Charset::Iso8859_1 => "ISO-8859-1",
        }
    }

    /// Detect the charset from a byte order mark
    pub fn detect_bom(input: &[u8]) -> Option<(Self, usize)> {
        match input {
            [0xEF, 0xBB, 0xBF, ..] => Some((Charset::Utf8, 3)),
            [0xFF, 0xFE, ..] => Some((Charset::Utf16Le, 2)),
            [0xFE, 0xFF, ..] => Some((Charset::Utf16Be, 2)),
            _ => None,
        }
    }

    pub fn is_unicode(&self) -> bool {
        matches!(self, Charset::Utf8 | Charset::Utf16Le | Charset::Utf16Be)
    }

    /// Decode `input` into a string
    ///
    /// Malformed UTF-8 and unmappable ASCII bytes are replaced with U+FFFD.
    pub fn decode(&self, input: &[u8]) -> Result<String> {
        let (charset, bytes) = match Charset::detect_bom(input).filter(|_| self.is_unicode()) {
            Some((detected, bom_len)) => (detected, &input[bom_len..]),
            None => (*self, input),
        };
        match charset {
            Charset::Utf8 => Ok(String::from_utf8_lossy(bytes).into_owned()),
            Charset::Utf16Le => decode_utf16(bytes, u16::from_le_bytes, "UTF-16LE"),
            Charset::Utf16Be => decode_utf16(bytes, u16::from_be_bytes, "UTF-16BE"),
            Charset::UsAscii => Ok(bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
                .collect()),
            Charset::Iso8859_1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        }
    }

    /// Read and decode a whole file
    pub fn read_file(&self, path: impl AsRef<std::path::Path>) -> Result<String> {
        let bytes = std::fs::read(path)?;
        self.decode(&bytes)
    }
}

impl FromStr for Charset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Charset::for_name(s)
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Legal charset names start with a letter or digit and continue with
/// letters, digits, `-`, `+`, `:`, `_` or `.`
fn is_legal_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphanumeric() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | ':' | '_' | '.'))
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16, label: &str) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(Error::Config(format!("Invalid {}: odd number of bytes", label)));
    }
    let code_units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|chunk| to_unit([chunk[0], chunk[1]]))
        .collect();
    String::from_utf16(&code_units).map_err(|e| Error::Config(format!("Invalid {}: {}", label, e)))
}
