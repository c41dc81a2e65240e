// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The Mem represents the CPU's memory
//!
//! Contains some handy utils for reading and writing

use crate::{
    error::{Error, Result},
    traits::Grab,
};
use std::{
    fmt::{Display, Formatter},
    ops::Range,
    slice::SliceIndex,
};

/// Size of the Chip-8 address space
pub const MEMORY_SIZE: usize = 0x1000;
/// Address at which programs are loaded, and execution starts
pub const PROGRAM_START: usize = 0x200;
/// Address of the first font glyph
pub const FONT_START: usize = 0x000;

/// The 16 hexadecimal digit glyphs, 5 bytes (rows) each
#[rustfmt::skip]
pub const FONT: [u8; 0x50] = [
    0xf0, 0x90, 0x90, 0x90, 0xf0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xf0, 0x10, 0xf0, 0x80, 0xf0, // 2
    0xf0, 0x10, 0xf0, 0x10, 0xf0, // 3
    0x90, 0x90, 0xf0, 0x10, 0x10, // 4
    0xf0, 0x80, 0xf0, 0x10, 0xf0, // 5
    0xf0, 0x80, 0xf0, 0x90, 0xf0, // 6
    0xf0, 0x10, 0x20, 0x40, 0x40, // 7
    0xf0, 0x90, 0xf0, 0x90, 0xf0, // 8
    0xf0, 0x90, 0xf0, 0x10, 0xf0, // 9
    0xf0, 0x90, 0xf0, 0x90, 0x90, // A
    0xe0, 0x90, 0xe0, 0x90, 0xe0, // B
    0xf0, 0x80, 0x80, 0x80, 0xf0, // C
    0xe0, 0x90, 0x90, 0x90, 0xe0, // D
    0xf0, 0x80, 0xf0, 0x80, 0xf0, // E
    0xf0, 0x80, 0xf0, 0x80, 0x80, // F
];

/// Creates a new [Mem], growing as needed
/// # Examples
/// ```rust
/// # use vipcore::{mem, prelude::*};
/// let mut mem = mem! {
///     Charset [0x0000..0x0800] = b"ABCDEF",
///     Program [0x0800..0x1000] = &[0x00, 0xe0],
/// };
/// assert_eq!(0x1000, mem.len());
/// ```
#[macro_export]
macro_rules! mem {
    ($($name:path $(:)? [$range:expr] $(= $data:expr)?) ,* $(,)?) => {
        $crate::cpu::mem::Mem::new()$(.add_region_owned($name, $range)$(.load_region_owned($name, $data))?)*
    };
}

impl Grab<u8> for Mem {
    /// Gets a slice of [Mem] memory
    /// # Examples
    /// ```rust
    ///# use vipcore::prelude::*;
    ///     let mem = Mem::new()
    ///         .add_region_owned(Program, 0..10);
    ///     assert!([0;10].as_slice() == mem.grab(0..10).unwrap());
    /// ```
    #[inline(always)]
    fn grab<I>(&self, index: I) -> Option<&<I as SliceIndex<[u8]>>::Output>
    where
        I: SliceIndex<[u8]>,
    {
        self.memory.get(index)
    }

    /// Gets a mutable slice of [Mem] memory
    #[inline(always)]
    fn grab_mut<I>(&mut self, index: I) -> Option<&mut <I as SliceIndex<[u8]>>::Output>
    where
        I: SliceIndex<[u8]>,
    {
        self.memory.get_mut(index)
    }
}

/// Represents a named region in memory
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Region {
    /// Character ROM (but writable!)
    Charset,
    /// Program memory
    Program,
    #[doc(hidden)]
    /// Total number of named regions
    Count,
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Region::Charset => "Charset",
                Region::Program => "Program",
                _ => "",
            }
        )
    }
}

/// Stores memory in a series of named regions with ranges
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Mem {
    memory: Vec<u8>,
    region: [Option<Range<usize>>; Region::Count as usize],
}

impl Mem {
    /// Constructs a new, empty mem with no regions
    /// # Examples
    /// ```rust
    ///# use vipcore::prelude::*;
    ///     let mem = Mem::new();
    ///     assert!(mem.is_empty());
    /// ```
    pub fn new() -> Self {
        Mem {
            memory: vec![],
            region: Default::default(),
        }
    }

    /// Gets the length of the mem' backing memory
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Returns true if the backing memory contains no elements
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Grows the Mem backing memory to at least size bytes, but does not truncate
    fn with_size(&mut self, size: usize) {
        if self.len() < size {
            self.memory.resize(size, 0);
        }
    }

    /// Adds a new names range ([Region]) to an owned [Mem]
    pub fn add_region_owned(mut self, name: Region, range: Range<usize>) -> Self {
        self.add_region(name, range);
        self
    }

    /// Adds a new named range ([Region]) to a [Mem]
    /// # Examples
    /// ```rust
    ///# use vipcore::prelude::*;
    ///     let mut mem = Mem::new();
    ///     mem.add_region(Program, 0..1234);
    ///     assert_eq!(1234, mem.len());
    /// ```
    pub fn add_region(&mut self, name: Region, range: Range<usize>) -> &mut Self {
        self.with_size(range.end);
        if let Some(region) = self.region.get_mut(name as usize) {
            *region = Some(range);
        }
        self
    }

    /// Gets the range covered by a [Region], if it's present
    pub fn region(&self, name: Region) -> Option<Range<usize>> {
        self.region.get(name as usize)?.clone()
    }

    /// Loads data into a [Region] on an *owned* [Mem], for use during initialization
    pub fn load_region_owned(mut self, name: Region, data: &[u8]) -> Self {
        self.load_region(name, data).ok();
        self
    }

    /// Loads data into the start of a named [Region]
    ///
    /// Returns [Error::ProgramTooLarge] if the data doesn't fit, leaving the region untouched.
    /// # Examples
    /// ```rust
    ///# use vipcore::prelude::*;
    ///# fn main() -> Result<()> {
    ///     let mut mem = Mem::new().add_region_owned(Program, 0..4);
    ///     mem.load_region(Program, b"Hi")?;
    ///     assert_eq!(b"Hi\0\0", mem.get_region(Program).unwrap());
    ///     assert!(mem.load_region(Program, b"Hello").is_err());
    ///#    Ok(())
    ///# }
    /// ```
    pub fn load_region(&mut self, name: Region, data: &[u8]) -> Result<&mut Self> {
        if let Some(region) = self.get_region_mut(name) {
            let max = region.len();
            region
                .get_mut(..data.len())
                .ok_or(Error::ProgramTooLarge {
                    len: data.len(),
                    max,
                })?
                .copy_from_slice(data);
        }
        Ok(self)
    }

    /// Fills a [Region] with zeroes
    ///
    /// If the region doesn't exist, that's okay.
    pub fn clear_region(&mut self, name: Region) -> &mut Self {
        if let Some(region) = self.get_region_mut(name) {
            region.fill(0)
        }
        self
    }

    /// Gets a slice of a named [Region] of memory
    #[inline(always)]
    pub fn get_region(&self, name: Region) -> Option<&[u8]> {
        self.grab(self.region(name)?)
    }

    /// Gets a mutable slice of a named region of memory
    #[inline(always)]
    pub fn get_region_mut(&mut self, name: Region) -> Option<&mut [u8]> {
        let range = self.region(name)?;
        self.grab_mut(range)
    }
}

impl Default for Mem {
    /// Constructs the standard Chip-8 memory map
    ///
    /// | region  | range             | contents
    /// |---------|-------------------|----------
    /// | Charset |`0x0000..0x0050`   | [FONT]
    /// | Program |`0x0200..0x1000`   | zeroes
    fn default() -> Self {
        crate::mem! {
            Region::Charset [FONT_START..FONT_START + FONT.len()] = &FONT,
            Region::Program [PROGRAM_START..MEMORY_SIZE],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map() {
        let mem = Mem::default();
        assert_eq!(MEMORY_SIZE, mem.len());
        assert_eq!(Some(&FONT[..]), mem.get_region(Region::Charset));
        assert_eq!(
            MEMORY_SIZE - PROGRAM_START,
            mem.get_region(Region::Program).unwrap().len()
        );
    }

    #[test]
    fn oversized_program_is_rejected() {
        let mut mem = Mem::default();
        let rom = vec![0xaa; MEMORY_SIZE - PROGRAM_START + 1];
        match mem.load_region(Region::Program, &rom) {
            Err(Error::ProgramTooLarge { len, max }) => {
                assert_eq!(rom.len(), len);
                assert_eq!(0xe00, max);
            }
            other => panic!("expected ProgramTooLarge, got {other:?}"),
        }
        assert!(mem.get_region(Region::Program).unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn program_fills_region_exactly() {
        let mut mem = Mem::default();
        let rom = vec![0xaa; MEMORY_SIZE - PROGRAM_START];
        mem.load_region(Region::Program, &rom).unwrap();
        assert_eq!(Some(&rom[..]), mem.get_region(Region::Program));
    }
}
