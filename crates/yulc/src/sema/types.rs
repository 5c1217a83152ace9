//! Literal values and type label checks

use std::cmp::Ordering;
use std::fmt;

use crate::common::{ErrorReporter, Span};
use crate::frontend::ast::{Literal, LiteralValue};
use crate::names::{Name, NameRepository};

/// Longest string literal that still fits into one word
pub const MAX_STRING_LITERAL_LEN: usize = 32;

/// 256 bit unsigned integer, little-endian limbs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct U256([u64; 4]);

impl U256 {
    pub const ZERO: Self = Self([0; 4]);
    pub const ONE: Self = Self([1, 0, 0, 0]);

    pub fn from_u64(value: u64) -> Self {
        Self([value, 0, 0, 0])
    }

    /// Parse digits in the given radix, `None` on overflow or bad digits
    pub fn from_str_radix(digits: &str, radix: u32) -> Option<Self> {
        if digits.is_empty() {
            return None;
        }
        digits.chars().try_fold(Self::ZERO, |acc, c| {
            let digit = c.to_digit(radix)?;
            acc.mul_add(u64::from(radix), u64::from(digit))
        })
    }

    /// Parse a number literal: decimal or `0x` prefixed hexadecimal
    pub fn parse_literal(text: &str) -> Option<Self> {
        match text.strip_prefix("0x") {
            Some(hex) => Self::from_str_radix(hex, 16),
            None => Self::from_str_radix(text, 10),
        }
    }

    /// Value of a string literal: bytes left-aligned in a 32 byte word
    pub fn from_left_aligned(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > MAX_STRING_LITERAL_LEN {
            return None;
        }
        let mut word = [0u8; 32];
        word[..bytes.len()].copy_from_slice(bytes);

        let mut limbs = [0u64; 4];
        for (i, chunk) in word.chunks_exact(8).enumerate() {
            let mut be = [0u8; 8];
            be.copy_from_slice(chunk);
            limbs[3 - i] = u64::from_be_bytes(be);
        }
        Some(Self(limbs))
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|limb| *limb == 0)
    }

    fn mul_add(self, mul: u64, add: u64) -> Option<Self> {
        let mut limbs = [0u64; 4];
        let mut carry = u128::from(add);
        for (out, limb) in limbs.iter_mut().zip(self.0) {
            let wide = u128::from(limb) * u128::from(mul) + carry;
            *out = wide as u64;
            carry = wide >> 64;
        }
        (carry == 0).then_some(Self(limbs))
    }
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.iter().rev().cmp(other.0.iter().rev())
    }
}

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut limbs = self.0.iter().rev().skip_while(|limb| **limb == 0);
        match limbs.next() {
            None => write!(f, "0x0"),
            Some(first) => {
                write!(f, "0x{:x}", first)?;
                for limb in limbs {
                    write!(f, "{:016x}", limb)?;
                }
                Ok(())
            }
        }
    }
}

/// Numeric value of a literal, `None` if it does not fit into a word
pub fn literal_value(literal: &Literal) -> Option<U256> {
    match &literal.value {
        LiteralValue::Number(digits) => U256::parse_literal(digits),
        LiteralValue::String(bytes) => U256::from_left_aligned(bytes),
        LiteralValue::Boolean(true) => Some(U256::ONE),
        LiteralValue::Boolean(false) => Some(U256::ZERO),
    }
}

/// Type label checks for the current dialect
pub struct TypeChecker<'a> {
    names: &'a NameRepository,
}

impl<'a> TypeChecker<'a> {
    pub fn new(names: &'a NameRepository) -> Self {
        Self { names }
    }

    /// Label of a declared name: its annotation or the dialect default
    ///
    /// Annotations that are not dialect types are reported and kept, so
    /// later comparisons against them fail consistently.
    pub fn declared_type(&self, annotation: Option<Name>, span: Span, reporter: &mut ErrorReporter) -> Name {
        match annotation {
            Some(ty) => {
                self.check_type_name(ty, span, reporter);
                ty
            }
            None => self.names.default_type(),
        }
    }

    /// Label of a literal without reporting anything
    pub fn literal_type(&self, literal: &Literal) -> Name {
        match (&literal.value, literal.ty) {
            (_, Some(ty)) => ty,
            (LiteralValue::Boolean(_), None) => self.names.bool_type(),
            (_, None) => self.names.default_type(),
        }
    }

    /// Check a literal used as a value and return its label
    pub fn check_literal(&self, literal: &Literal, reporter: &mut ErrorReporter) -> Name {
        let ty = self.literal_type(literal);
        if let Some(annotation) = literal.ty {
            self.check_type_name(annotation, literal.span, reporter);
        }

        match &literal.value {
            LiteralValue::Number(digits) => {
                if U256::parse_literal(digits).is_none() {
                    reporter.literal_error("Number literal too large (> 256 bits)", literal.span);
                }
            }
            LiteralValue::String(bytes) => {
                if bytes.len() > MAX_STRING_LITERAL_LEN {
                    reporter.literal_error(
                        format!(
                            "String literal too long ({} > {})",
                            bytes.len(),
                            MAX_STRING_LITERAL_LEN
                        ),
                        literal.span,
                    );
                }
            }
            LiteralValue::Boolean(_) => {}
        }

        if !self.is_valid_literal_type(literal, ty) {
            reporter.literal_error(
                format!(
                    "Invalid type \"{}\" for literal \"{}\".",
                    self.names.display_type(ty),
                    literal.text()
                ),
                literal.span,
            );
        }
        ty
    }

    /// Boolean literals need the bool label; in a typed dialect numbers and
    /// strings may not carry it
    fn is_valid_literal_type(&self, literal: &Literal, ty: Name) -> bool {
        let bool_type = self.names.bool_type();
        match literal.value {
            LiteralValue::Boolean(_) => ty == bool_type,
            _ => ty != bool_type || bool_type == self.names.default_type(),
        }
    }

    /// Report `ty` unless it is a dialect type
    pub fn check_type_name(&self, ty: Name, span: Span, reporter: &mut ErrorReporter) -> bool {
        if self.names.is_valid_type(ty) {
            return true;
        }
        reporter.type_error(
            format!(
                "\"{}\" is not a valid type (user defined types are not yet supported).",
                self.names.resolve(ty)
            ),
            span,
        );
        false
    }

    /// Report a mismatch between `expected` and `given`
    pub fn expect_type(&self, expected: Name, given: Name, span: Span, reporter: &mut ErrorReporter) -> bool {
        if expected == given {
            return true;
        }
        reporter.type_error(
            format!(
                "Expected a value of type \"{}\" but got \"{}\"",
                self.names.display_type(expected),
                self.names.display_type(given)
            ),
            span,
        );
        false
    }
}
