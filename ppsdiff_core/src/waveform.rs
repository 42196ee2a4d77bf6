//! Hex waveform payload to voltage samples.

use crate::calibration::VerticalScale;
use crate::error::DecodeError;

/// Decode a hex payload into voltages:
/// `voltage = (byte - y_origin - y_reference) * y_increment`.
///
/// Every two hex characters form one byte, so the output has `hex.len() / 2`
/// samples. No clamping or filtering is applied.
pub fn decode(
    hex: &str,
    y_increment: f64,
    y_origin: f64,
    y_reference: f64,
) -> Result<Vec<f64>, DecodeError> {
    let scale = VerticalScale {
        increment: y_increment,
        origin: y_origin,
        reference: y_reference,
    };
    decode_with(hex, &scale)
}

/// [`decode`] with an already resolved channel scale.
pub fn decode_with(hex: &str, scale: &VerticalScale) -> Result<Vec<f64>, DecodeError> {
    let bytes = hex.as_bytes();
    if bytes.len() % 2 != 0 {
        return Err(DecodeError::OddLength { len: bytes.len() });
    }
    let mut out = Vec::with_capacity(bytes.len() / 2);
    for (pair_idx, pair) in bytes.chunks_exact(2).enumerate() {
        let index = pair_idx * 2;
        let hi = nibble(hex, index, pair[0])?;
        let lo = nibble(hex, index + 1, pair[1])?;
        out.push(scale.voltage((hi << 4) | lo));
    }
    Ok(out)
}

#[inline]
fn nibble(hex: &str, index: usize, c: u8) -> Result<u8, DecodeError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        // Everything before `index` was ASCII hex, so `index` is a char boundary.
        _ => Err(DecodeError::InvalidHex {
            index,
            ch: hex[index..].chars().next().unwrap_or(char::REPLACEMENT_CHARACTER),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_calibration_yields_raw_codes() {
        assert_eq!(decode("00", 1.0, 0.0, 0.0).unwrap(), vec![0.0]);
        assert_eq!(decode("ff", 1.0, 0.0, 0.0).unwrap(), vec![255.0]);
        assert_eq!(decode("0A7fFF", 1.0, 0.0, 0.0).unwrap(), vec![10.0, 127.0, 255.0]);
    }

    #[test]
    fn empty_payload_is_empty_waveform() {
        assert!(decode("", 1.0, 0.0, 0.0).unwrap().is_empty());
    }

    #[test]
    fn applies_scale() {
        let v = decode("8096", 0.5, 100.0, 28.0).unwrap();
        assert_eq!(v, vec![0.0, 11.0]);
    }

    #[test]
    fn rejects_odd_length() {
        assert_eq!(
            decode("abc", 1.0, 0.0, 0.0),
            Err(DecodeError::OddLength { len: 3 })
        );
    }

    #[test]
    fn rejects_non_hex_with_position() {
        assert_eq!(
            decode("00zz", 1.0, 0.0, 0.0),
            Err(DecodeError::InvalidHex { index: 2, ch: 'z' })
        );
        assert_eq!(
            decode("0é0", 1.0, 0.0, 0.0),
            Err(DecodeError::InvalidHex { index: 1, ch: 'é' })
        );
    }
}
