//! SNMP PDU construction and BER wire encoding.
//!
//! This crate provides the polymorphic PDU abstraction shared by all SNMP
//! PDU kinds and its byte-exact BER (X.690) wire encoding, currently with
//! the SNMPv1 trap variant implemented. The outer message envelope
//! (version/community wrapping), transport framing and SNMPv3 security
//! processing are collaborators, not part of this crate.
//!
//! # Example
//!
//! ```
//! use snmp_pdu::prelude::*;
//!
//! let mut pdu = TrapV1Pdu::new(
//!     Version::V1,
//!     PduKind::TrapV1,
//!     oid!(1, 3, 6, 1, 4, 1, 9),
//!     0,
//!     42,
//!     [192, 0, 2, 1],
//! )
//! .expect("trap-v1 requires SNMPv1");
//! pdu.append_varbind(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::Null);
//!
//! let bytes = pdu.encode().unwrap();
//! assert_eq!(bytes[0], PduKind::TrapV1.wire_tag());
//! ```

pub mod ber;
pub mod error;
pub mod oid;
pub mod pdu;
pub mod prelude;
pub mod value;
pub mod varbind;
pub mod version;

pub use error::{Error, ErrorStatus, Result};
pub use oid::Oid;
pub use pdu::{ENTERPRISE_SPECIFIC, Pdu, PduField, PduKind, TrapV1Pdu, UptimeSource, WallClock};
pub use value::Value;
pub use varbind::{VarBind, VarBinds};
pub use version::Version;
