//! BER (Basic Encoding Rules) codec for SNMP.
//!
//! This module provides encoding and decoding of BER-encoded data as used in SNMP.
//! The implementation follows X.690 with definite lengths only.

mod decode;
mod encode;
pub mod tag;

pub use decode::*;
pub use encode::*;
pub use tag::*;
