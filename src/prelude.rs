//! Prelude module for convenient imports.
//!
//! ```rust,no_run
//! use snmp_pdu::prelude::*;
//! ```
//!
//! This imports the PDU contract and the types needed to build and encode
//! PDUs, plus the [`oid!`] macro for compile-time OID construction.

pub use crate::error::{Error, ErrorStatus, Result};
pub use crate::oid::Oid;
pub use crate::pdu::{Pdu, PduField, PduKind, TrapV1Pdu, UptimeSource, WallClock};
pub use crate::value::Value;
pub use crate::varbind::{VarBind, VarBinds};
pub use crate::version::Version;

#[doc(no_inline)]
pub use crate::oid;
