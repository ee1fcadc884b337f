//! Variable binding (VarBind) types.
//!
//! A [`VarBind`] pairs an OID with a value. [`VarBinds`] is the ordered,
//! append-only list a PDU carries; list order is part of the wire contract
//! and is preserved through encode and decode.

use crate::ber::{Decoder, EncodeBuf};
use crate::error::Result;
use crate::oid::Oid;
use crate::value::Value;

/// Variable binding - an OID-value pair.
#[derive(Debug, Clone, PartialEq)]
pub struct VarBind {
    /// The object identifier.
    pub oid: Oid,
    /// The value.
    pub value: Value,
}

impl VarBind {
    /// Create a new VarBind.
    pub fn new(oid: Oid, value: Value) -> Self {
        Self { oid, value }
    }

    /// Create a VarBind with a NULL value.
    pub fn null(oid: Oid) -> Self {
        Self {
            oid,
            value: Value::Null,
        }
    }

    /// Encode to BER: a SEQUENCE of the OID then the value.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_sequence(|buf| {
            self.value.encode(buf);
            buf.push_oid(&self.oid);
        });
    }

    /// Decode from BER.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let mut seq = decoder.read_sequence()?;
        let oid = seq.read_oid()?;
        let value = Value::decode(&mut seq)?;
        Ok(VarBind { oid, value })
    }
}

impl std::fmt::Display for VarBind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.oid, self.value)
    }
}

/// Ordered sequence of varbinds.
///
/// Grows only through [`VarBinds::push`]; the owning PDU exposes no other
/// mutation, so previously appended entries keep their positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VarBinds(Vec<VarBind>);

impl VarBinds {
    /// Create an empty list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a varbind, preserving insertion order.
    pub fn push(&mut self, varbind: VarBind) {
        self.0.push(varbind);
    }

    /// Number of varbinds.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get a varbind by position.
    pub fn get(&self, index: usize) -> Option<&VarBind> {
        self.0.get(index)
    }

    /// Iterate in list order.
    pub fn iter(&self) -> std::slice::Iter<'_, VarBind> {
        self.0.iter()
    }

    /// View as a slice.
    pub fn as_slice(&self) -> &[VarBind] {
        &self.0
    }

    /// Encode to BER: one SEQUENCE wrapping each member in list order.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_sequence(|buf| {
            // Encode in reverse order since the buffer writes backwards.
            for vb in self.0.iter().rev() {
                vb.encode(buf);
            }
        });
    }

    /// Decode from BER, preserving wire order.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let mut seq = decoder.read_sequence()?;
        let mut varbinds = Vec::new();
        while !seq.is_empty() {
            varbinds.push(VarBind::decode(&mut seq)?);
        }
        Ok(Self(varbinds))
    }
}

impl std::fmt::Display for VarBinds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, vb) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{vb}")?;
        }
        write!(f, "]")
    }
}

impl FromIterator<VarBind> for VarBinds {
    fn from_iter<I: IntoIterator<Item = VarBind>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for VarBinds {
    type Item = VarBind;
    type IntoIter = std::vec::IntoIter<VarBind>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a VarBinds {
    type Item = &'a VarBind;
    type IntoIter = std::slice::Iter<'a, VarBind>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use bytes::Bytes;

    fn roundtrip(varbinds: &VarBinds) -> VarBinds {
        let mut buf = EncodeBuf::new();
        varbinds.encode(&mut buf);
        let mut decoder = Decoder::new(buf.finish());
        VarBinds::decode(&mut decoder).unwrap()
    }

    #[test]
    fn test_varbind_roundtrip() {
        let vb = VarBind::new(oid!(1, 3, 6, 1), Value::Integer(42));

        let mut buf = EncodeBuf::new();
        vb.encode(&mut buf);
        let bytes = buf.finish();

        let mut decoder = Decoder::new(bytes);
        let decoded = VarBind::decode(&mut decoder).unwrap();

        assert_eq!(vb, decoded);
    }

    #[test]
    fn test_varbind_wire_bytes() {
        // SEQUENCE { OID 1.3, NULL }
        let vb = VarBind::null(oid!(1, 3));
        let mut buf = EncodeBuf::new();
        vb.encode(&mut buf);
        assert_eq!(&buf.finish()[..], &[0x30, 0x05, 0x06, 0x01, 0x2B, 0x05, 0x00]);
    }

    #[test]
    fn test_varbinds_empty_and_single() {
        let empty = VarBinds::new();
        assert!(roundtrip(&empty).is_empty());

        let single: VarBinds = [VarBind::new(oid!(1, 3, 6, 1), Value::Integer(42))]
            .into_iter()
            .collect();
        assert_eq!(roundtrip(&single), single);
    }

    #[test]
    fn test_varbinds_preserve_order() {
        let mut varbinds = VarBinds::new();
        for i in 0u32..5 {
            varbinds.push(VarBind::new(oid!(1, 3, 6, 1, i), Value::Integer(i as i32)));
        }
        let decoded = roundtrip(&varbinds);
        assert_eq!(decoded.len(), 5);
        for (i, vb) in decoded.iter().enumerate() {
            assert_eq!(vb.oid, oid!(1, 3, 6, 1, i as u32));
            assert_eq!(vb.value, Value::Integer(i as i32));
        }
    }

    #[test]
    fn test_varbinds_mixed_value_types() {
        let varbinds: VarBinds = [
            VarBind::new(
                oid!(1, 3, 6, 1, 2, 1, 1, 1, 0),
                Value::OctetString(Bytes::from_static(b"test")),
            ),
            VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::TimeTicks(99999)),
            VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 99, 0), Value::NoSuchObject),
            VarBind::new(
                oid!(1, 3, 6, 1, 2, 1, 1, 6, 0),
                Value::IpAddress([192, 168, 1, 1]),
            ),
        ]
        .into_iter()
        .collect();

        let decoded = roundtrip(&varbinds);
        assert_eq!(decoded, varbinds);
        assert!(decoded.get(2).unwrap().value.is_exception());
    }

    #[test]
    fn test_varbind_display() {
        let vb = VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::Integer(42));
        assert_eq!(vb.to_string(), "1.3.6.1.2.1.1.1.0 = 42");

        let list: VarBinds = [vb, VarBind::null(oid!(1, 3))].into_iter().collect();
        assert_eq!(list.to_string(), "[1.3.6.1.2.1.1.1.0 = 42, 1.3 = null]");
    }
}
