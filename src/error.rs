// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for vipcore

use std::ops::Range;
use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for vipcore.
///
/// Every variant but [Error::IoError] is raised before the CPU state is touched,
/// so the host may inspect the machine and decide whether to halt.
#[derive(Debug, Error)]
pub enum Error {
    /// Represents an unimplemented operation
    #[error("opcode {word:04x} not recognized")]
    UnimplementedInstruction {
        /// The offending word
        word: u16,
    },
    /// Tried to fetch data at a range outside of memory
    #[error("range {range:04x?} is not present in memory")]
    InvalidAddressRange {
        /// The offending range
        range: Range<usize>,
    },
    /// The program does not fit in the program region
    #[error("program is {len:#x} bytes, but only {max:#x} bytes fit in memory")]
    ProgramTooLarge {
        /// Length of the rejected program
        len: usize,
        /// Size of the program region
        max: usize,
    },
    /// A call was issued with every stack slot in use
    #[error("stack overflow: call at {addr:03x} exceeds {depth} nested calls")]
    StackOverflow {
        /// Address of the offending call
        addr: u16,
        /// Maximum call depth
        depth: usize,
    },
    /// A return was issued with no pending call
    #[error("stack underflow: return at {addr:03x} with no pending call")]
    StackUnderflow {
        /// Address of the offending return
        addr: u16,
    },
    /// Tried to press a key that doesn't exist
    #[error("tried to press key {key:X} which does not exist")]
    InvalidKey {
        /// The offending key
        key: usize,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    /// Error originated in [std::array::TryFromSliceError]
    #[error(transparent)]
    TryFromSliceError(#[from] std::array::TryFromSliceError),
}
