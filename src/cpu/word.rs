// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Splits a 16-bit instruction [Word] into its fixed-width fields
//!
//! ```text
//! 15    12 11     8 7      4 3      0
//! | class |   x    |   y    |  nib   |
//!         |           adr            |
//!                  |      byte       |
//! ```

use super::{Adr, Nib, Reg};
use std::fmt::{Display, Formatter};

/// A raw instruction word, as fetched big-endian from memory
///
/// Every field accessor is total: any u16 is a valid [Word].
/// Whether the word means anything is decided by [super::instruction::Insn].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Word(pub u16);

impl Word {
    /// Assembles a word from its high and low bytes
    /// # Examples
    /// ```rust
    /// # use vipcore::*;
    /// assert_eq!(Word(0xd123), Word::from_be_bytes([0xd1, 0x23]));
    /// ```
    #[inline]
    pub const fn from_be_bytes(bytes: [u8; 2]) -> Self {
        Word(u16::from_be_bytes(bytes))
    }
    /// The top nibble, selecting the instruction class
    #[inline]
    pub const fn class(self) -> Nib {
        (self.0 >> 12) as Nib
    }
    /// Register operand X, in bits 8..12
    #[inline]
    pub const fn x(self) -> Reg {
        (self.0 >> 8 & 0xf) as Reg
    }
    /// Register operand Y, in bits 4..8
    #[inline]
    pub const fn y(self) -> Reg {
        (self.0 >> 4 & 0xf) as Reg
    }
    /// 12-bit address operand
    #[inline]
    pub const fn adr(self) -> Adr {
        self.0 & 0xfff
    }
    /// 8-bit immediate
    #[inline]
    pub const fn byte(self) -> u8 {
        self.0 as u8
    }
    /// 4-bit immediate
    #[inline]
    pub const fn nib(self) -> Nib {
        (self.0 & 0xf) as Nib
    }
}

impl From<u16> for Word {
    fn from(value: u16) -> Self {
        Word(value)
    }
}

impl From<Word> for u16 {
    fn from(value: Word) -> Self {
        value.0
    }
}

impl Display for Word {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields() {
        let word = Word(0xd12f);
        assert_eq!(0xd, word.class());
        assert_eq!(0x1, word.x());
        assert_eq!(0x2, word.y());
        assert_eq!(0x12f, word.adr());
        assert_eq!(0x2f, word.byte());
        assert_eq!(0xf, word.nib());
    }

    #[test]
    fn every_word_decomposes() {
        for raw in 0..=0xffff_u16 {
            let word = Word(raw);
            let rebuilt = (word.class() as u16) << 12
                | (word.x() as u16) << 8
                | (word.y() as u16) << 4
                | word.nib() as u16;
            assert_eq!(raw, rebuilt);
            assert_eq!(raw & 0xfff, word.adr());
            assert_eq!(raw as u8, word.byte());
            assert!(word.x() < 16 && word.y() < 16);
        }
    }
}
