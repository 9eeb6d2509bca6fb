//! Alias and gate-identifier types.

use std::fmt;

/// A positive integer identifying a variable or gate within one parse
/// session. Slot `0` is reserved, so literals can be signed (negative
/// means negation). Aliases are dense starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Alias(pub u32);

impl Alias {
    /// The reserved dummy slot.
    pub const ZERO: Alias = Alias(0);

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Alias {
    fn from(v: u32) -> Self {
        Alias(v)
    }
}

impl From<usize> for Alias {
    fn from(v: usize) -> Self {
        Alias(u32::try_from(v).expect("alias overflow: exceeds u32::MAX"))
    }
}

impl From<Alias> for usize {
    fn from(a: Alias) -> Self {
        a.0 as usize
    }
}

/// A signed reference to an alias: positive for the variable itself,
/// negative for its negation. Never references alias 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal(pub i32);

impl Literal {
    #[inline]
    pub fn new(alias: Alias, negated: bool) -> Self {
        let v = alias.0 as i32;
        Literal(if negated { -v } else { v })
    }

    #[inline]
    pub fn alias(self) -> Alias {
        Alias(self.0.unsigned_abs())
    }

    #[inline]
    pub fn is_negated(self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub fn negate(self) -> Literal {
        Literal(-self.0)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for Literal {
    fn from(v: i32) -> Self {
        Literal(v)
    }
}

/// A textual identifier carried from input and also used on output.
/// A two-way mapping `{id <-> alias}` is maintained by [`crate::GateGraph`].
pub type GateId = String;
