//! Command line arguments
//!
//! The shell hands each module a slice of [`Arg`] tokens. The end of the
//! slice marks "no more arguments", which keeps an absent argument distinct
//! from one that is the empty string.
//!
//! This module also provides the numeric and hex parsers the commands use to
//! interpret their arguments, and a whitespace tokenizer for raw lines.

use crate::error::ParseError;

/// Maximum number of tokens accepted on a single command line
pub const MAX_ARGS: usize = 32;

/// A single command line token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Arg<'a>(&'a str);

impl<'a> Arg<'a> {
    /// Wraps a token.
    pub const fn new(text: &'a str) -> Self {
        Self(text)
    }

    /// Returns the token text.
    pub const fn as_str(&self) -> &'a str {
        self.0
    }

    /// Returns `true` if the token is the empty string.
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses the token as an unsigned 16-bit integer.
    ///
    /// Decimal digits are accepted, as is a `0x`/`0X` prefix followed by
    /// hexadecimal digits.
    ///
    /// # Errors
    /// * `ParseError::InvalidNumber` - empty text or a non-digit character
    /// * `ParseError::Overflow` - the value is larger than `u16::MAX`
    pub fn parse_as_u16(&self) -> Result<u16, ParseError> {
        let (digits, radix) = match self.0.strip_prefix("0x").or_else(|| self.0.strip_prefix("0X")) {
            Some(rest) => (rest, 16),
            None => (self.0, 10),
        };

        if digits.is_empty() {
            return Err(ParseError::InvalidNumber);
        }

        digits.chars().try_fold(0u16, |value, c| {
            let digit = c.to_digit(radix).ok_or(ParseError::InvalidNumber)? as u16;
            value
                .checked_mul(radix as u16)
                .and_then(|v| v.checked_add(digit))
                .ok_or(ParseError::Overflow)
        })
    }

    /// Decodes the token as a hex string of exactly `buf.len()` bytes.
    ///
    /// Both letter cases are accepted. An odd number of digits is read as if
    /// it had a leading `0`, so `"ABC"` decodes to `[0x0A, 0xBC]`.
    ///
    /// # Errors
    /// * `ParseError::InvalidHex` - a character is not a hex digit
    /// * `ParseError::LengthMismatch` - the token does not decode to `buf.len()` bytes
    pub fn parse_as_hex_into(&self, buf: &mut [u8]) -> Result<(), ParseError> {
        let digits = self.0.as_bytes();

        if digits.len().div_ceil(2) != buf.len() {
            // Still reject garbage first so a typo is not reported as a length problem.
            digits.iter().try_for_each(|&d| nibble(d).map(|_| ()))?;
            return Err(ParseError::LengthMismatch);
        }

        let (head, pairs) = digits.split_at(digits.len() % 2);
        let mut out = buf.iter_mut();

        if let Some(&d) = head.first() {
            if let Some(byte) = out.next() {
                *byte = nibble(d)?;
            }
        }

        for (pair, byte) in pairs.chunks_exact(2).zip(out) {
            *byte = (nibble(pair[0])? << 4) | nibble(pair[1])?;
        }

        Ok(())
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(text: &'a str) -> Self {
        Self(text)
    }
}

fn nibble(digit: u8) -> Result<u8, ParseError> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        _ => Err(ParseError::InvalidHex),
    }
}

/// Splits `line` on ASCII whitespace into `slots`.
///
/// Returns the filled prefix of `slots`.
///
/// # Errors
/// * `ParseError::TooManyArgs` - `line` holds more tokens than `slots` can fit
pub fn tokenize<'a, 's>(
    line: &'a str,
    slots: &'s mut [Arg<'a>],
) -> Result<&'s [Arg<'a>], ParseError> {
    let mut count = 0;

    for token in line.split_ascii_whitespace() {
        let slot = slots.get_mut(count).ok_or(ParseError::TooManyArgs)?;
        *slot = Arg(token);
        count += 1;
    }

    Ok(&slots[..count])
}
