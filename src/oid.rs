//! Object identifier type.
//!
//! An [`Oid`] is an immutable, validated sequence of numeric arcs. Validity
//! is checked at construction, so BER encoding of an existing `Oid` cannot
//! fail: the first arc is 0, 1, or 2, the second arc fits the first, and the
//! arc count is bounded by [`MAX_OID_LEN`].

use crate::error::{DecodeErrorKind, Error, OidErrorKind, Result};
use smallvec::SmallVec;

/// Maximum number of arcs in an OID.
pub const MAX_OID_LEN: usize = 128;

/// Object identifier - a hierarchical sequence of numeric arcs.
///
/// Ordering is structural (arc-by-arc lexicographic), matching the MIB tree
/// ordering used for comparisons on the wire.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Oid {
    arcs: SmallVec<[u32; 12]>,
}

impl Oid {
    /// Create an OID from a slice of arcs, validating its shape.
    pub fn from_arcs(arcs: &[u32]) -> Result<Self> {
        if arcs.len() < 2 {
            return Err(Error::invalid_oid(OidErrorKind::TooShort));
        }
        if arcs.len() > MAX_OID_LEN {
            return Err(Error::invalid_oid(OidErrorKind::TooManyArcs {
                count: arcs.len(),
                max: MAX_OID_LEN,
            }));
        }
        let (first, second) = (arcs[0], arcs[1]);
        if first > 2 {
            return Err(Error::invalid_oid(OidErrorKind::InvalidFirstArc(first)));
        }
        if first < 2 && second >= 40 {
            return Err(Error::invalid_oid(OidErrorKind::InvalidSecondArc {
                first,
                second,
            }));
        }
        // The first two arcs share one subidentifier (40*X + Y).
        if first == 2 && second > u32::MAX - 80 {
            return Err(Error::invalid_oid(OidErrorKind::SubidentifierOverflow));
        }
        Ok(Self {
            arcs: SmallVec::from_slice(arcs),
        })
    }

    /// The arcs of this OID.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Number of arcs.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Always false: a valid OID has at least two arcs.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Encode the OID content octets (no tag or length).
    ///
    /// Infallible because shape is validated at construction.
    pub fn to_ber(&self) -> SmallVec<[u8; 32]> {
        let mut out = SmallVec::new();
        let first = self.arcs[0] * 40 + self.arcs[1];
        push_subidentifier(&mut out, first);
        for &arc in &self.arcs[2..] {
            push_subidentifier(&mut out, arc);
        }
        out
    }

    /// Decode an OID from BER content octets.
    ///
    /// `at` is the absolute offset of the content in the enclosing buffer,
    /// used for error reporting.
    pub fn from_ber(content: &[u8], at: usize) -> Result<Self> {
        if content.is_empty() {
            return Err(Error::decode(at, DecodeErrorKind::InvalidOidEncoding));
        }
        let mut arcs: SmallVec<[u32; 12]> = SmallVec::new();
        let mut acc: u32 = 0;
        let mut in_subid = false;
        for &byte in content {
            if acc > u32::MAX >> 7 {
                return Err(Error::decode(at, DecodeErrorKind::InvalidOidEncoding));
            }
            acc = (acc << 7) | u32::from(byte & 0x7F);
            in_subid = true;
            if byte & 0x80 == 0 {
                if arcs.is_empty() {
                    // First subidentifier packs the first two arcs.
                    let (first, second) = if acc < 40 {
                        (0, acc)
                    } else if acc < 80 {
                        (1, acc - 40)
                    } else {
                        (2, acc - 80)
                    };
                    arcs.push(first);
                    arcs.push(second);
                } else {
                    arcs.push(acc);
                }
                if arcs.len() > MAX_OID_LEN {
                    return Err(Error::decode(
                        at,
                        DecodeErrorKind::OidTooLong {
                            count: arcs.len(),
                            max: MAX_OID_LEN,
                        },
                    ));
                }
                acc = 0;
                in_subid = false;
            }
        }
        if in_subid {
            // Trailing continuation bit with no final octet.
            return Err(Error::decode(at, DecodeErrorKind::InvalidOidEncoding));
        }
        Ok(Self { arcs })
    }
}

/// Append one subidentifier in base-128, high groups first.
fn push_subidentifier(out: &mut SmallVec<[u8; 32]>, value: u32) {
    let start = out.len();
    let mut rest = value;
    loop {
        out.insert(start, (rest & 0x7F) as u8);
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }
    let last = out.len() - 1;
    for byte in &mut out[start..last] {
        *byte |= 0x80;
    }
}

impl std::str::FromStr for Oid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::invalid_oid_with_input(OidErrorKind::Empty, s));
        }
        // Accept a leading dot, as in ".1.3.6.1".
        let trimmed = s.strip_prefix('.').unwrap_or(s);
        let mut arcs: SmallVec<[u32; 12]> = SmallVec::new();
        for part in trimmed.split('.') {
            let arc: u32 = part
                .parse()
                .map_err(|_| Error::invalid_oid_with_input(OidErrorKind::InvalidArc, s))?;
            arcs.push(arc);
        }
        Self::from_arcs(&arcs).map_err(|err| match err {
            Error::InvalidOid { kind, .. } => Error::invalid_oid_with_input(kind, s),
            other => other,
        })
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for arc in &self.arcs {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{arc}")?;
            first = false;
        }
        Ok(())
    }
}

/// Construct an [`Oid`] from arc literals.
///
/// Panics on an invalid shape, which a literal should never have.
///
/// ```
/// use snmp_pdu::oid;
/// let enterprise = oid!(1, 3, 6, 1, 4, 1, 9);
/// assert_eq!(enterprise.to_string(), "1.3.6.1.4.1.9");
/// ```
#[macro_export]
macro_rules! oid {
    ($($arc:expr),+ $(,)?) => {
        $crate::oid::Oid::from_arcs(&[$($arc),+]).expect("invalid OID literal")
    };
}
