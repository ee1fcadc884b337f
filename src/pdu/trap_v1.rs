//! SNMPv1 trap PDU.
//!
//! Wire layout (RFC 1157, all inside the 0xA4 envelope, in order):
//! enterprise OID, agent IpAddress, generic-trap INTEGER, specific-trap
//! INTEGER, TimeTicks timestamp, then the varbind list SEQUENCE.

use super::{Pdu, PduField, PduKind};
use crate::ber::{EncodeBuf, tag};
use crate::error::{Error, ErrorStatus, Result};
use crate::oid::Oid;
use crate::value::Value;
use crate::varbind::{VarBind, VarBinds};
use crate::version::Version;
use bytes::Bytes;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::trace;

/// The generic-trap code for enterprise-specific traps.
pub const ENTERPRISE_SPECIFIC: i32 = 6;

/// Source for the trap timestamp, in TimeTicks (hundredths of a second).
///
/// Injectable so tests can supply deterministic values.
pub trait UptimeSource {
    fn timeticks(&self) -> u32;
}

/// Wall-clock backed [`UptimeSource`].
///
/// Known simplification: this reads the system clock scaled to hundredths
/// of a second (truncated to 32 bits), not the true monotonic sysUpTime
/// counter the protocol field asks for.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

impl UptimeSource for WallClock {
    fn timeticks(&self) -> u32 {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        (since_epoch.as_millis() / 10) as u32
    }
}

/// SNMPv1 trap PDU.
///
/// Request-id, error-status and error-index are not part of the trap-v1
/// wire format; the [`Pdu`] accessors for them are inert compatibility
/// shims (see [`Pdu::carries`]).
#[derive(Debug, Clone, PartialEq)]
pub struct TrapV1Pdu {
    kind: PduKind,
    enterprise: Oid,
    agent_addr: [u8; 4],
    generic_trap: i32,
    specific_trap: i32,
    timestamp: u32,
    varbinds: VarBinds,
}

impl TrapV1Pdu {
    /// Create a trap PDU with the timestamp taken from [`WallClock`].
    ///
    /// Returns `None` for any version other than [`Version::V1`]; the
    /// silent gate is preserved existing behavior, not a recommendation.
    pub fn new(
        version: Version,
        kind: PduKind,
        enterprise: Oid,
        generic_trap: i32,
        specific_trap: i32,
        agent_addr: [u8; 4],
    ) -> Option<Self> {
        Self::new_at(
            version,
            kind,
            enterprise,
            generic_trap,
            specific_trap,
            agent_addr,
            &WallClock,
        )
    }

    /// Create a trap PDU with an explicit timestamp source.
    #[allow(clippy::too_many_arguments)]
    pub fn new_at(
        version: Version,
        kind: PduKind,
        enterprise: Oid,
        generic_trap: i32,
        specific_trap: i32,
        agent_addr: [u8; 4],
        uptime: &dyn UptimeSource,
    ) -> Option<Self> {
        // The caller's generic-trap code is ignored: the stored code is
        // always enterpriseSpecific(6). Preserved as-is until callers
        // relying on it are ruled out; pinned by test.
        let _ = generic_trap;
        match version {
            Version::V1 => Some(Self {
                kind,
                enterprise,
                agent_addr,
                generic_trap: ENTERPRISE_SPECIFIC,
                specific_trap,
                timestamp: uptime.timeticks(),
                varbinds: VarBinds::new(),
            }),
            _ => None,
        }
    }

    /// Create a trap PDU carrying the given OIDs, each bound to NULL.
    #[allow(clippy::too_many_arguments)]
    pub fn with_null_oids(
        version: Version,
        kind: PduKind,
        enterprise: Oid,
        generic_trap: i32,
        specific_trap: i32,
        agent_addr: [u8; 4],
        oids: &[Oid],
    ) -> Option<Self> {
        let mut pdu = Self::new(
            version,
            kind,
            enterprise,
            generic_trap,
            specific_trap,
            agent_addr,
        )?;
        for oid in oids {
            pdu.append_varbind(oid.clone(), Value::Null);
        }
        Some(pdu)
    }

    /// Create a trap PDU carrying the given varbinds, in order.
    #[allow(clippy::too_many_arguments)]
    pub fn with_varbinds(
        version: Version,
        kind: PduKind,
        enterprise: Oid,
        generic_trap: i32,
        specific_trap: i32,
        agent_addr: [u8; 4],
        varbinds: impl IntoIterator<Item = VarBind>,
    ) -> Option<Self> {
        let mut pdu = Self::new(
            version,
            kind,
            enterprise,
            generic_trap,
            specific_trap,
            agent_addr,
        )?;
        for vb in varbinds {
            pdu.append_varbind(vb.oid, vb.value);
        }
        Some(pdu)
    }

    /// The enterprise OID naming the trap's definition subtree.
    pub fn enterprise(&self) -> &Oid {
        &self.enterprise
    }

    /// The originating agent's address.
    pub fn agent_addr(&self) -> [u8; 4] {
        self.agent_addr
    }

    /// The generic-trap code (always [`ENTERPRISE_SPECIFIC`], see `new_at`).
    pub fn generic_trap(&self) -> i32 {
        self.generic_trap
    }

    /// The specific-trap code.
    pub fn specific_trap(&self) -> i32 {
        self.specific_trap
    }

    /// The timestamp in TimeTicks.
    pub fn timestamp(&self) -> u32 {
        self.timestamp
    }
}

impl Pdu for TrapV1Pdu {
    fn kind(&self) -> PduKind {
        self.kind
    }

    /// Always 0: trap-v1 has no request-id field.
    fn request_id(&self) -> i32 {
        0
    }

    /// No-op: trap-v1 has no request-id field.
    fn set_request_id(&mut self, _request_id: i32) {}

    /// Always noError: trap-v1 has no error-status field.
    fn error_status(&self) -> ErrorStatus {
        ErrorStatus::NoError
    }

    /// No-op: trap-v1 has no error-status field.
    fn set_error_status(&mut self, _status: ErrorStatus) {}

    /// Always 0: trap-v1 has no error-index field.
    fn error_index(&self) -> i32 {
        0
    }

    /// No-op: trap-v1 has no error-index field.
    fn set_error_index(&mut self, _index: i32) {}

    /// No-op: only get-bulk carries non-repeaters.
    fn set_non_repeaters(&mut self, _non_repeaters: i32) {}

    /// No-op: only get-bulk carries max-repetitions.
    fn set_max_repetitions(&mut self, _max_repetitions: i32) {}

    fn carries(&self, _field: PduField) -> bool {
        false
    }

    fn append_varbind(&mut self, oid: Oid, value: Value) {
        self.varbinds.push(VarBind::new(oid, value));
    }

    fn varbinds(&self) -> &VarBinds {
        &self.varbinds
    }

    fn encode(&self) -> Result<Bytes> {
        let mut buf = EncodeBuf::new();
        // Reverse buffer: fields pushed in reverse of their wire order.
        buf.push_constructed(self.kind.wire_tag(), |buf| {
            self.varbinds.encode(buf);
            buf.push_unsigned32(tag::application::TIMETICKS, self.timestamp);
            buf.push_integer(self.specific_trap);
            buf.push_integer(self.generic_trap);
            buf.push_ip_address(self.agent_addr);
            buf.push_oid(&self.enterprise);
        });
        let bytes = buf.finish();
        trace!(
            kind = %self.kind,
            varbinds = self.varbinds.len(),
            len = bytes.len(),
            "encoded trap PDU"
        );
        Ok(bytes)
    }

    /// Not implemented.
    ///
    /// A conformant decoder must validate the 0xA4 envelope, parse the
    /// enterprise OID, agent address, generic-trap, specific-trap,
    /// timestamp and varbind list in that order, and return the PDU plus
    /// the unconsumed trailing bytes. Until that exists this fails fast
    /// with [`Error::NotImplemented`] rather than returning an empty PDU.
    fn decode(_bytes: Bytes) -> Result<(Self, Bytes)> {
        Err(Error::not_implemented("TrapV1Pdu::decode"))
    }
}

impl std::fmt::Display for TrapV1Pdu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d] = self.agent_addr;
        write!(
            f,
            "{} enterprise={} agent={}.{}.{}.{} generic-trap={} specific-trap={} timestamp={} varbinds={}",
            self.kind,
            self.enterprise,
            a,
            b,
            c,
            d,
            self.generic_trap,
            self.specific_trap,
            self.timestamp,
            self.varbinds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    struct FixedUptime(u32);

    impl UptimeSource for FixedUptime {
        fn timeticks(&self) -> u32 {
            self.0
        }
    }

    fn sample() -> TrapV1Pdu {
        TrapV1Pdu::new_at(
            Version::V1,
            PduKind::TrapV1,
            oid!(1, 3, 6, 1, 4, 1, 9),
            1,
            42,
            [192, 0, 2, 1],
            &FixedUptime(15),
        )
        .unwrap()
    }

    #[test]
    fn test_version_gate() {
        for version in [Version::V2c, Version::V3] {
            assert!(
                TrapV1Pdu::new(
                    version,
                    PduKind::TrapV1,
                    oid!(1, 3, 6, 1, 4, 1, 9),
                    0,
                    0,
                    [10, 0, 0, 1],
                )
                .is_none()
            );
        }
        assert!(
            TrapV1Pdu::new(
                Version::V1,
                PduKind::TrapV1,
                oid!(1, 3, 6, 1, 4, 1, 9),
                0,
                0,
                [10, 0, 0, 1],
            )
            .is_some()
        );
    }

    #[test]
    fn test_generic_trap_pinned_to_enterprise_specific() {
        // The constructor argument (here 1) is deliberately ignored.
        let pdu = sample();
        assert_eq!(pdu.generic_trap(), ENTERPRISE_SPECIFIC);
        assert_eq!(pdu.generic_trap(), 6);
        assert_eq!(pdu.specific_trap(), 42);
    }

    #[test]
    fn test_append_varbind_order() {
        let mut pdu = sample();
        assert_eq!(pdu.varbinds().len(), 0);
        pdu.append_varbind(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::Null);
        assert_eq!(pdu.varbinds().len(), 1);
        pdu.append_varbind(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::Integer(7));
        assert_eq!(pdu.varbinds().len(), 2);
        assert_eq!(
            pdu.varbinds().get(0).unwrap().oid,
            oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)
        );
        assert_eq!(
            pdu.varbinds().get(1).unwrap().oid,
            oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)
        );
    }

    #[test]
    fn test_inert_accessors() {
        let mut pdu = sample();
        pdu.set_request_id(1234);
        pdu.set_error_status(ErrorStatus::TooBig);
        pdu.set_error_index(3);
        pdu.set_non_repeaters(2);
        pdu.set_max_repetitions(10);
        assert_eq!(pdu.request_id(), 0);
        assert_eq!(pdu.error_status(), ErrorStatus::NoError);
        assert_eq!(pdu.error_index(), 0);
        for field in [
            PduField::RequestId,
            PduField::ErrorStatus,
            PduField::ErrorIndex,
            PduField::NonRepeaters,
            PduField::MaxRepetitions,
        ] {
            assert!(!pdu.carries(field));
        }
    }

    #[test]
    fn test_constructors_with_varbinds() {
        let oids = [oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)];
        let pdu = TrapV1Pdu::with_null_oids(
            Version::V1,
            PduKind::TrapV1,
            oid!(1, 3, 6, 1, 4, 1, 9),
            0,
            1,
            [10, 0, 0, 1],
            &oids,
        )
        .unwrap();
        assert_eq!(pdu.varbinds().len(), 2);
        for (vb, oid) in pdu.varbinds().iter().zip(&oids) {
            assert_eq!(&vb.oid, oid);
            assert_eq!(vb.value, Value::Null);
        }

        let pdu = TrapV1Pdu::with_varbinds(
            Version::V1,
            PduKind::TrapV1,
            oid!(1, 3, 6, 1, 4, 1, 9),
            0,
            1,
            [10, 0, 0, 1],
            [VarBind::new(oid!(1, 3, 6, 1), Value::Integer(5))],
        )
        .unwrap();
        assert_eq!(pdu.varbinds().len(), 1);
        assert_eq!(pdu.varbinds().get(0).unwrap().value, Value::Integer(5));
    }

    #[test]
    fn test_decode_is_unimplemented() {
        let bytes = sample().encode().unwrap();
        match TrapV1Pdu::decode(bytes) {
            Err(Error::NotImplemented { operation }) => {
                assert_eq!(operation, "TrapV1Pdu::decode");
            }
            other => panic!("expected NotImplemented, got {other:?}"),
        }
    }

    #[test]
    fn test_display() {
        let pdu = sample();
        let text = pdu.to_string();
        assert!(text.contains("TrapV1"));
        assert!(text.contains("1.3.6.1.4.1.9"));
        assert!(text.contains("192.0.2.1"));
        assert!(text.contains("generic-trap=6"));
        assert!(text.contains("specific-trap=42"));
    }
}
