//! PDU kinds and the uniform PDU contract.
//!
//! Every PDU kind shares one capability set ([`Pdu`]) even though the wire
//! formats differ. Variants whose format lacks a field implement the
//! corresponding accessors as documented no-ops; [`Pdu::carries`] is the
//! discoverable way to ask whether a field is live before trusting it.

mod trap_v1;

pub use trap_v1::{ENTERPRISE_SPECIFIC, TrapV1Pdu, UptimeSource, WallClock};

use crate::ber::tag::{CONSTRUCTED, class};
use crate::error::{DecodeErrorKind, Error, ErrorStatus, Result};
use crate::oid::Oid;
use crate::value::Value;
use crate::varbind::VarBinds;
use bytes::Bytes;

/// Semantic PDU kind, mapped to its wire tag number.
///
/// The tag number doubles as the dispatch key when decoding an unknown
/// buffer: peek the leading byte, match it via [`PduKind::from_wire_tag`],
/// and hand the buffer to that variant's decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PduKind {
    GetRequest,
    GetNextRequest,
    Response,
    SetRequest,
    TrapV1,
    GetBulkRequest,
    InformRequest,
    TrapV2,
    Report,
}

impl PduKind {
    const fn number(self) -> u8 {
        match self {
            Self::GetRequest => 0,
            Self::GetNextRequest => 1,
            Self::Response => 2,
            Self::SetRequest => 3,
            Self::TrapV1 => 4,
            Self::GetBulkRequest => 5,
            Self::InformRequest => 6,
            Self::TrapV2 => 7,
            Self::Report => 8,
        }
    }

    /// The full tag byte for this kind's PDU envelope: implicit,
    /// constructed, context-specific (0xA0..0xA8).
    pub const fn wire_tag(self) -> u8 {
        class::CONTEXT_SPECIFIC | CONSTRUCTED | self.number()
    }

    /// Dispatch on the leading tag byte of an undecoded buffer.
    ///
    /// Like [`PduKind::from_wire_tag`], but reports an unmatched tag as the
    /// decode error the envelope layer propagates. `offset` is the tag
    /// byte's position in the enclosing buffer.
    pub fn dispatch(tag: u8, offset: usize) -> Result<Self> {
        Self::from_wire_tag(tag)
            .ok_or_else(|| Error::decode(offset, DecodeErrorKind::UnknownPduType(tag)))
    }

    /// Look up the kind for a leading tag byte.
    pub const fn from_wire_tag(tag: u8) -> Option<Self> {
        match tag {
            0xA0 => Some(Self::GetRequest),
            0xA1 => Some(Self::GetNextRequest),
            0xA2 => Some(Self::Response),
            0xA3 => Some(Self::SetRequest),
            0xA4 => Some(Self::TrapV1),
            0xA5 => Some(Self::GetBulkRequest),
            0xA6 => Some(Self::InformRequest),
            0xA7 => Some(Self::TrapV2),
            0xA8 => Some(Self::Report),
            _ => None,
        }
    }
}

impl std::fmt::Display for PduKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::GetRequest => "GetRequest",
            Self::GetNextRequest => "GetNextRequest",
            Self::Response => "Response",
            Self::SetRequest => "SetRequest",
            Self::TrapV1 => "TrapV1",
            Self::GetBulkRequest => "GetBulkRequest",
            Self::InformRequest => "InformRequest",
            Self::TrapV2 => "TrapV2",
            Self::Report => "Report",
        };
        write!(f, "{name}")
    }
}

/// Fields a PDU kind may carry on the wire.
///
/// Used with [`Pdu::carries`] to tell live accessors apart from the
/// compatibility no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PduField {
    RequestId,
    ErrorStatus,
    ErrorIndex,
    NonRepeaters,
    MaxRepetitions,
}

/// The capability set shared by every PDU variant.
///
/// Accessors for fields a variant does not carry are inert: setters
/// silently discard their input and getters return a fixed constant
/// (zero / noError). Callers that need to know whether a field is real
/// must ask [`Pdu::carries`] rather than rely on those return values.
pub trait Pdu: std::fmt::Debug + std::fmt::Display {
    /// The semantic kind of this PDU.
    fn kind(&self) -> PduKind;

    /// Request identifier, or 0 for variants without one.
    fn request_id(&self) -> i32;

    /// Set the request identifier (discarded by variants without one).
    fn set_request_id(&mut self, request_id: i32);

    /// Error status, or noError for variants without one.
    fn error_status(&self) -> ErrorStatus;

    /// Set the error status (discarded by variants without one).
    fn set_error_status(&mut self, status: ErrorStatus);

    /// Error index, or 0 for variants without one.
    fn error_index(&self) -> i32;

    /// Set the error index (discarded by variants without one).
    fn set_error_index(&mut self, index: i32);

    /// Set non-repeaters (meaningful only for get-bulk).
    fn set_non_repeaters(&mut self, non_repeaters: i32);

    /// Set max-repetitions (meaningful only for get-bulk).
    fn set_max_repetitions(&mut self, max_repetitions: i32);

    /// Whether this variant carries the field on the wire.
    fn carries(&self, field: PduField) -> bool;

    /// Append a varbind to the end of the list.
    fn append_varbind(&mut self, oid: Oid, value: Value);

    /// The varbind list, in append order.
    fn varbinds(&self) -> &VarBinds;

    /// Encode to BER wire bytes.
    ///
    /// The first nested encode failure aborts the whole encode; partial
    /// output is never returned.
    fn encode(&self) -> Result<Bytes>;

    /// Decode from BER wire bytes.
    ///
    /// Returns the decoded PDU and any unconsumed trailing bytes, for
    /// protocols that embed the PDU inside further framing.
    fn decode(bytes: Bytes) -> Result<(Self, Bytes)>
    where
        Self: Sized;
}
