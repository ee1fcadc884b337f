//! BER decoding.
//!
//! [`Decoder`] walks a `Bytes` buffer, yielding one TLV at a time. Reading a
//! constructed type returns a sub-decoder scoped to the content octets, so
//! nesting never needs index arithmetic at the call sites. Error offsets are
//! absolute within the original buffer.

use super::tag;
use crate::error::{DecodeErrorKind, Error, Result};
use crate::oid::Oid;
use bytes::Bytes;

/// Maximum number of length octets accepted in long-form lengths.
///
/// Four octets already covers anything a UDP datagram can carry.
const MAX_LENGTH_OCTETS: usize = 4;

/// Streaming BER reader over an owned buffer.
pub struct Decoder {
    data: Bytes,
    pos: usize,
    /// Absolute offset of `data[0]` in the outermost buffer, for error
    /// reporting from sub-decoders.
    base: usize,
}

impl Decoder {
    /// Create a decoder over a buffer.
    pub fn new(data: Bytes) -> Self {
        Self {
            data,
            pos: 0,
            base: 0,
        }
    }

    /// Absolute offset of the next unread byte.
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Check whether all bytes have been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Consume the decoder, returning the unread trailing bytes.
    ///
    /// Protocols that nest a PDU inside further framing use this to hand
    /// the remainder back to the enclosing layer.
    pub fn rest(self) -> Bytes {
        self.data.slice(self.pos..)
    }

    /// Look at the next tag byte without consuming it.
    pub fn peek_tag(&self) -> Result<u8> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or_else(|| Error::decode(self.offset(), DecodeErrorKind::TruncatedData))
    }

    fn read_byte(&mut self) -> Result<u8> {
        let byte = self.peek_tag()?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_slice(&mut self, len: usize) -> Result<Bytes> {
        if len > self.remaining() {
            return Err(Error::decode(self.offset(), DecodeErrorKind::TruncatedData));
        }
        let slice = self.data.slice(self.pos..self.pos + len);
        self.pos += len;
        Ok(slice)
    }

    fn expect_tag(&mut self, expected: u8) -> Result<()> {
        let at = self.offset();
        let actual = self.read_byte()?;
        if actual == tag::universal::OCTET_STRING_CONSTRUCTED
            && expected == tag::universal::OCTET_STRING
        {
            return Err(Error::decode(at, DecodeErrorKind::ConstructedOctetString));
        }
        if actual != expected {
            return Err(Error::decode(
                at,
                DecodeErrorKind::UnexpectedTag { expected, actual },
            ));
        }
        Ok(())
    }

    /// Read a definite length field.
    ///
    /// Rejects the indefinite form (0x80), length fields longer than
    /// [`MAX_LENGTH_OCTETS`], and lengths that run past the end of data.
    fn read_length(&mut self) -> Result<usize> {
        let at = self.offset();
        let first = self.read_byte()?;
        let length = if first < 0x80 {
            first as usize
        } else if first == 0x80 {
            return Err(Error::decode(at, DecodeErrorKind::IndefiniteLength));
        } else {
            let octets = (first & 0x7F) as usize;
            if octets > MAX_LENGTH_OCTETS {
                return Err(Error::decode(at, DecodeErrorKind::LengthTooLong { octets }));
            }
            let mut length = 0usize;
            for _ in 0..octets {
                length = (length << 8) | self.read_byte()? as usize;
            }
            length
        };
        if length > self.remaining() {
            return Err(Error::decode(at, DecodeErrorKind::TlvOverflow));
        }
        Ok(length)
    }

    /// Read one full TLV with the expected tag, returning the content octets.
    fn read_tlv(&mut self, expected: u8) -> Result<Bytes> {
        self.expect_tag(expected)?;
        let length = self.read_length()?;
        self.read_slice(length)
    }

    /// Read an INTEGER.
    pub fn read_integer(&mut self) -> Result<i32> {
        let at = self.offset();
        let content = self.read_tlv(tag::universal::INTEGER)?;
        if content.is_empty() {
            return Err(Error::decode(at, DecodeErrorKind::ZeroLengthInteger));
        }
        if content.len() > 4 {
            return Err(Error::decode(at, DecodeErrorKind::IntegerOverflow));
        }
        let mut acc: i64 = if content[0] & 0x80 != 0 { -1 } else { 0 };
        for &byte in content.iter() {
            acc = (acc << 8) | i64::from(byte);
        }
        Ok(acc as i32)
    }

    /// Read an unsigned 32-bit value with the given application tag
    /// (Counter32, Gauge32, TimeTicks).
    pub fn read_unsigned32(&mut self, expected: u8) -> Result<u32> {
        let at = self.offset();
        let content = self.read_tlv(expected)?;
        if content.is_empty() {
            return Err(Error::decode(at, DecodeErrorKind::ZeroLengthInteger));
        }
        // A leading 0x00 pad octet is legal when the top bit is set.
        let digits = if content[0] == 0 {
            &content[1..]
        } else {
            &content[..]
        };
        if digits.len() > 4 {
            return Err(Error::decode(at, DecodeErrorKind::IntegerOverflow));
        }
        let mut acc: u32 = 0;
        for &byte in digits {
            acc = (acc << 8) | u32::from(byte);
        }
        Ok(acc)
    }

    /// Read a Counter64.
    pub fn read_unsigned64(&mut self) -> Result<u64> {
        let at = self.offset();
        let content = self.read_tlv(tag::application::COUNTER64)?;
        if content.is_empty() {
            return Err(Error::decode(at, DecodeErrorKind::ZeroLengthInteger));
        }
        let digits = if content[0] == 0 {
            &content[1..]
        } else {
            &content[..]
        };
        if digits.len() > 8 {
            return Err(Error::decode(
                at,
                DecodeErrorKind::Integer64TooLong {
                    length: content.len(),
                },
            ));
        }
        let mut acc: u64 = 0;
        for &byte in digits {
            acc = (acc << 8) | u64::from(byte);
        }
        Ok(acc)
    }

    /// Read an OCTET STRING.
    pub fn read_octet_string(&mut self) -> Result<Bytes> {
        self.read_tlv(tag::universal::OCTET_STRING)
    }

    /// Read an Opaque (application tag 4), returning the content octets.
    pub fn read_opaque(&mut self) -> Result<Bytes> {
        self.read_tlv(tag::application::OPAQUE)
    }

    /// Read a zero-length exception marker (noSuchObject and friends).
    pub fn read_exception(&mut self, expected: u8) -> Result<()> {
        let at = self.offset();
        let content = self.read_tlv(expected)?;
        if !content.is_empty() {
            return Err(Error::decode(at, DecodeErrorKind::InvalidNull));
        }
        Ok(())
    }

    /// Read a NULL.
    pub fn read_null(&mut self) -> Result<()> {
        let at = self.offset();
        let content = self.read_tlv(tag::universal::NULL)?;
        if !content.is_empty() {
            return Err(Error::decode(at, DecodeErrorKind::InvalidNull));
        }
        Ok(())
    }

    /// Read an OBJECT IDENTIFIER.
    pub fn read_oid(&mut self) -> Result<Oid> {
        let at = self.offset();
        let content = self.read_tlv(tag::universal::OBJECT_IDENTIFIER)?;
        Oid::from_ber(&content, at)
    }

    /// Read an IpAddress (application tag 0, 4 content bytes).
    pub fn read_ip_address(&mut self) -> Result<[u8; 4]> {
        let at = self.offset();
        let content = self.read_tlv(tag::application::IP_ADDRESS)?;
        if content.len() != 4 {
            return Err(Error::decode(
                at,
                DecodeErrorKind::InvalidIpAddressLength {
                    length: content.len(),
                },
            ));
        }
        Ok([content[0], content[1], content[2], content[3]])
    }

    /// Read a SEQUENCE header and return a decoder scoped to its content.
    pub fn read_sequence(&mut self) -> Result<Decoder> {
        self.read_constructed(tag::universal::SEQUENCE)
    }

    /// Read a constructed TLV with the given tag and return a decoder
    /// scoped to its content (used for SEQUENCEs and PDU envelopes).
    pub fn read_constructed(&mut self, expected: u8) -> Result<Decoder> {
        self.expect_tag(expected)?;
        let length = self.read_length()?;
        let base = self.offset();
        let content = self.read_slice(length)?;
        Ok(Decoder {
            data: content,
            pos: 0,
            base,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(bytes: &[u8]) -> Decoder {
        Decoder::new(Bytes::copy_from_slice(bytes))
    }

    fn kind_of(err: Error) -> DecodeErrorKind {
        match err {
            Error::Decode { kind, .. } => kind,
            other => panic!("expected decode error, got {other}"),
        }
    }

    #[test]
    fn test_read_integer() {
        assert_eq!(dec(&[0x02, 0x01, 0x2A]).read_integer().unwrap(), 42);
        assert_eq!(dec(&[0x02, 0x01, 0xFF]).read_integer().unwrap(), -1);
        assert_eq!(
            dec(&[0x02, 0x02, 0xFF, 0x7F]).read_integer().unwrap(),
            -129
        );
        assert_eq!(
            dec(&[0x02, 0x04, 0x7F, 0xFF, 0xFF, 0xFF])
                .read_integer()
                .unwrap(),
            i32::MAX
        );
    }

    #[test]
    fn test_read_integer_rejects_bad_shapes() {
        assert_eq!(
            kind_of(dec(&[0x02, 0x00]).read_integer().unwrap_err()),
            DecodeErrorKind::ZeroLengthInteger
        );
        assert_eq!(
            kind_of(
                dec(&[0x02, 0x05, 0x01, 0x00, 0x00, 0x00, 0x00])
                    .read_integer()
                    .unwrap_err()
            ),
            DecodeErrorKind::IntegerOverflow
        );
        assert_eq!(
            kind_of(dec(&[0x04, 0x01, 0x00]).read_integer().unwrap_err()),
            DecodeErrorKind::UnexpectedTag {
                expected: 0x02,
                actual: 0x04
            }
        );
    }

    #[test]
    fn test_read_unsigned32_with_pad_octet() {
        assert_eq!(
            dec(&[0x43, 0x05, 0x00, 0xFF, 0xFF, 0xFF, 0xFF])
                .read_unsigned32(tag::application::TIMETICKS)
                .unwrap(),
            u32::MAX
        );
        assert_eq!(
            dec(&[0x41, 0x01, 0x00])
                .read_unsigned32(tag::application::COUNTER32)
                .unwrap(),
            0
        );
    }

    #[test]
    fn test_length_forms() {
        // Long form, one length octet.
        let mut body = vec![0x04, 0x81, 200];
        body.extend(std::iter::repeat_n(0xAB, 200));
        assert_eq!(dec(&body).read_octet_string().unwrap().len(), 200);

        assert_eq!(
            kind_of(dec(&[0x04, 0x80, 0x00]).read_octet_string().unwrap_err()),
            DecodeErrorKind::IndefiniteLength
        );
        assert_eq!(
            kind_of(
                dec(&[0x04, 0x85, 0x01, 0x01, 0x01, 0x01, 0x01])
                    .read_octet_string()
                    .unwrap_err()
            ),
            DecodeErrorKind::LengthTooLong { octets: 5 }
        );
        // Declared length runs past end of data.
        assert_eq!(
            kind_of(dec(&[0x04, 0x05, 0x01]).read_octet_string().unwrap_err()),
            DecodeErrorKind::TlvOverflow
        );
    }

    #[test]
    fn test_constructed_octet_string_rejected() {
        assert_eq!(
            kind_of(dec(&[0x24, 0x00]).read_octet_string().unwrap_err()),
            DecodeErrorKind::ConstructedOctetString
        );
    }

    #[test]
    fn test_read_null() {
        dec(&[0x05, 0x00]).read_null().unwrap();
        assert_eq!(
            kind_of(dec(&[0x05, 0x01, 0x00]).read_null().unwrap_err()),
            DecodeErrorKind::InvalidNull
        );
    }

    #[test]
    fn test_read_ip_address() {
        assert_eq!(
            dec(&[0x40, 0x04, 0xC0, 0x00, 0x02, 0x01])
                .read_ip_address()
                .unwrap(),
            [192, 0, 2, 1]
        );
        assert_eq!(
            kind_of(
                dec(&[0x40, 0x03, 0x01, 0x02, 0x03])
                    .read_ip_address()
                    .unwrap_err()
            ),
            DecodeErrorKind::InvalidIpAddressLength { length: 3 }
        );
    }

    #[test]
    fn test_sequence_and_rest() {
        // SEQUENCE { INTEGER 1 } followed by two trailing bytes.
        let mut d = dec(&[0x30, 0x03, 0x02, 0x01, 0x01, 0xDE, 0xAD]);
        let mut seq = d.read_sequence().unwrap();
        assert_eq!(seq.read_integer().unwrap(), 1);
        assert!(seq.is_empty());
        assert_eq!(&d.rest()[..], &[0xDE, 0xAD]);
    }

    #[test]
    fn test_suberror_offset_is_absolute() {
        // The bad integer sits at offset 2 inside the outer buffer.
        let mut d = dec(&[0x30, 0x02, 0x02, 0x00]);
        let mut seq = d.read_sequence().unwrap();
        match seq.read_integer().unwrap_err() {
            Error::Decode { offset, kind } => {
                assert_eq!(kind, DecodeErrorKind::ZeroLengthInteger);
                assert_eq!(offset, 2);
            }
            other => panic!("unexpected error {other}"),
        }
    }
}
