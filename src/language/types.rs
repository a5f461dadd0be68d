//! Types representing the registers recovered from a reference manual

use std::fmt;

/// One register description. The name borrows from the Document Text it
/// was found in.
#[derive(Eq, Debug, PartialEq)]
pub struct Register<'i> {
    pub name: &'i str,
    pub address: Address,
    pub fields: Vec<Field>,
}

impl<'i> Register<'i> {
    /// Fields that carry a name, which are the ones that end up in the
    /// devregs output. Reserved ranges are skipped.
    pub fn named_fields(&self) -> impl Iterator<Item = (&str, BitRange)> {
        self.fields
            .iter()
            .filter_map(|field| {
                field
                    .name
                    .as_deref()
                    .map(|name| (name, field.bits))
            })
    }
}

#[derive(Clone, Eq, Debug, PartialEq)]
pub enum Address {
    /// Eight hex digits, in the case they were written in.
    Resolved(String),
    /// Manuals describe parameterized registers ("where i=0d to 3d") with
    /// no single address; these are emitted with a marker for a human to
    /// fill in.
    Unresolved,
}

/// Literal written in place of an address that could not be found.
pub const UNRESOLVED: &str = "FIXME";

impl Address {
    pub fn from_value(value: u32) -> Address {
        Address::Resolved(format!("{:08x}", value))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Resolved(digits) => write!(f, "0x{}", digits),
            Address::Unresolved => f.write_str(UNRESOLVED),
        }
    }
}

/// A row of a field table. Reserved rows have no name.
#[derive(Clone, Eq, Debug, PartialEq)]
pub struct Field {
    pub name: Option<String>,
    pub bits: BitRange,
}

#[derive(Clone, Copy, Eq, Debug, PartialEq)]
pub enum BitRange {
    Single(u32),
    Span { high: u32, low: u32 },
}

impl BitRange {
    pub fn high(&self) -> u32 {
        match self {
            BitRange::Single(bit) => *bit,
            BitRange::Span { high, .. } => *high,
        }
    }

    pub fn low(&self) -> u32 {
        match self {
            BitRange::Single(bit) => *bit,
            BitRange::Span { low, .. } => *low,
        }
    }

    /// Build a range from a pair of bit positions given in either order.
    /// Equal positions collapse to a single bit.
    pub fn between(a: u32, b: u32) -> BitRange {
        if a == b {
            BitRange::Single(a)
        } else {
            BitRange::Span {
                high: a.max(b),
                low: a.min(b),
            }
        }
    }
}

impl fmt::Display for BitRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitRange::Single(bit) => write!(f, "{}", bit),
            BitRange::Span { high, low } => write!(f, "{}-{}", high, low),
        }
    }
}
