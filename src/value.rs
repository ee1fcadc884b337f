//! SNMP value types.
//!
//! [`Value`] is the typed variable carried in a varbind: the universal
//! ASN.1 types, the SNMP application types, and the v2 exception markers.
//! Values are immutable leaf data; encode and decode are pure over the
//! owning buffer.

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{DecodeErrorKind, Error, Result};
use crate::oid::Oid;
use bytes::Bytes;

/// A typed SNMP variable value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// INTEGER (Integer32)
    Integer(i32),
    /// OCTET STRING
    OctetString(Bytes),
    /// NULL
    Null,
    /// OBJECT IDENTIFIER
    ObjectIdentifier(Oid),
    /// IpAddress (application 0)
    IpAddress([u8; 4]),
    /// Counter32 (application 1)
    Counter32(u32),
    /// Gauge32 / Unsigned32 (application 2)
    Gauge32(u32),
    /// TimeTicks (application 3), hundredths of a second
    TimeTicks(u32),
    /// Opaque (application 4)
    Opaque(Bytes),
    /// Counter64 (application 6)
    Counter64(u64),
    /// noSuchObject exception (SNMPv2)
    NoSuchObject,
    /// noSuchInstance exception (SNMPv2)
    NoSuchInstance,
    /// endOfMibView exception (SNMPv2)
    EndOfMibView,
}

impl Value {
    /// Whether this is one of the v2 exception markers.
    pub fn is_exception(&self) -> bool {
        matches!(
            self,
            Self::NoSuchObject | Self::NoSuchInstance | Self::EndOfMibView
        )
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        match self {
            Self::Integer(v) => buf.push_integer(*v),
            Self::OctetString(data) => buf.push_octet_string(data),
            Self::Null => buf.push_null(),
            Self::ObjectIdentifier(oid) => buf.push_oid(oid),
            Self::IpAddress(addr) => buf.push_ip_address(*addr),
            Self::Counter32(v) => buf.push_unsigned32(tag::application::COUNTER32, *v),
            Self::Gauge32(v) => buf.push_unsigned32(tag::application::GAUGE32, *v),
            Self::TimeTicks(v) => buf.push_unsigned32(tag::application::TIMETICKS, *v),
            Self::Opaque(data) => {
                buf.push_bytes(data);
                buf.push_length(data.len());
                buf.push_tag(tag::application::OPAQUE);
            }
            Self::Counter64(v) => buf.push_unsigned64(*v),
            Self::NoSuchObject => {
                buf.push_length(0);
                buf.push_tag(tag::context::NO_SUCH_OBJECT);
            }
            Self::NoSuchInstance => {
                buf.push_length(0);
                buf.push_tag(tag::context::NO_SUCH_INSTANCE);
            }
            Self::EndOfMibView => {
                buf.push_length(0);
                buf.push_tag(tag::context::END_OF_MIB_VIEW);
            }
        }
    }

    /// Decode from BER, dispatching on the peeked tag.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let at = decoder.offset();
        match decoder.peek_tag()? {
            tag::universal::INTEGER => Ok(Self::Integer(decoder.read_integer()?)),
            tag::universal::OCTET_STRING | tag::universal::OCTET_STRING_CONSTRUCTED => {
                Ok(Self::OctetString(decoder.read_octet_string()?))
            }
            tag::universal::NULL => {
                decoder.read_null()?;
                Ok(Self::Null)
            }
            tag::universal::OBJECT_IDENTIFIER => {
                Ok(Self::ObjectIdentifier(decoder.read_oid()?))
            }
            tag::application::IP_ADDRESS => Ok(Self::IpAddress(decoder.read_ip_address()?)),
            tag::application::COUNTER32 => Ok(Self::Counter32(
                decoder.read_unsigned32(tag::application::COUNTER32)?,
            )),
            tag::application::GAUGE32 => Ok(Self::Gauge32(
                decoder.read_unsigned32(tag::application::GAUGE32)?,
            )),
            tag::application::TIMETICKS => Ok(Self::TimeTicks(
                decoder.read_unsigned32(tag::application::TIMETICKS)?,
            )),
            tag::application::OPAQUE => {
                Ok(Self::Opaque(decoder.read_opaque()?))
            }
            tag::application::COUNTER64 => Ok(Self::Counter64(decoder.read_unsigned64()?)),
            tag::context::NO_SUCH_OBJECT => {
                decoder.read_exception(tag::context::NO_SUCH_OBJECT)?;
                Ok(Self::NoSuchObject)
            }
            tag::context::NO_SUCH_INSTANCE => {
                decoder.read_exception(tag::context::NO_SUCH_INSTANCE)?;
                Ok(Self::NoSuchInstance)
            }
            tag::context::END_OF_MIB_VIEW => {
                decoder.read_exception(tag::context::END_OF_MIB_VIEW)?;
                Ok(Self::EndOfMibView)
            }
            other => Err(Error::decode(at, DecodeErrorKind::UnknownValueTag(other))),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::OctetString(data) => write!(f, "{}", String::from_utf8_lossy(data)),
            Self::Null => write!(f, "null"),
            Self::ObjectIdentifier(oid) => write!(f, "{oid}"),
            Self::IpAddress([a, b, c, d]) => write!(f, "{a}.{b}.{c}.{d}"),
            Self::Counter32(v) => write!(f, "{v}"),
            Self::Gauge32(v) => write!(f, "{v}"),
            Self::TimeTicks(v) => write!(f, "{v}"),
            Self::Opaque(data) => {
                for byte in data.iter() {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            Self::Counter64(v) => write!(f, "{v}"),
            Self::NoSuchObject => write!(f, "noSuchObject"),
            Self::NoSuchInstance => write!(f, "noSuchInstance"),
            Self::EndOfMibView => write!(f, "endOfMibView"),
        }
    }
}
