//! Hex rendering for byte payloads

use core::fmt;

/// Displays a byte slice as upper-case hex digits with no separators.
///
/// Formatting happens straight into the destination writer, so no
/// intermediate string buffer is needed.
#[derive(Debug, Clone, Copy)]
pub struct HexBytes<'a>(pub &'a [u8]);

impl fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|byte| write!(f, "{byte:02X}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Arg;

    #[test]
    fn renders_upper_case_pairs() {
        assert_eq!(HexBytes(&[0x00, 0x0a, 0xde, 0xff]).to_string(), "000ADEFF");
    }

    #[test]
    fn empty_slice_renders_nothing() {
        assert_eq!(HexBytes(&[]).to_string(), "");
    }

    #[test]
    fn hex_round_trips_through_the_argument_parser() {
        let original: Vec<u8> = (0..=255).collect();
        let text = HexBytes(&original).to_string();

        let mut decoded = vec![0u8; original.len()];
        Arg::new(&text).parse_as_hex_into(&mut decoded).unwrap();

        assert_eq!(decoded, original);
    }
}
