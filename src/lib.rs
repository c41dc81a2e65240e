// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! This crate implements the core of a Chip-8 interpreter: the state store,
//! the instruction decoder, the executor, the timers and the keypad.
//!
//! Everything around it (windows, rendering, input binding, pacing) is left to
//! the host, which owns one [CPU] and drives it one cycle at a time.
//!
//! ```rust
//! # use vipcore::*;
//! # fn main() -> Result<()> {
//! let mut cpu = CPU::default();
//! cpu.load_program_bytes(&[
//!     0x60, 0x05, // mov   #05, v0
//!     0xf0, 0x29, // font  v0, I
//!     0xd1, 0x15, // draw  #5, v1, v1
//! ])?;
//! cpu.multistep(3)?;
//! assert!(cpu.take_changed());
//! assert!(cpu.screen().get(0, 0));
//! # Ok(())
//! # }
//! ```

pub mod cpu;
pub mod error;
pub mod screen;
pub mod traits;

pub use cpu::{flags::Flags, quirks::Quirks, word::Word, CPU};
pub use error::{Error, Result};
pub use screen::Screen;

/// Common imports for vipcore
pub mod prelude {
    use super::*;
    pub use cpu::{
        instruction::Insn,
        mem::{Mem, Region::*},
        Flags, Quirks, Word, CPU,
    };
    pub use error::{Error, Result};
    pub use screen::Screen;
    pub use traits::{AutoCast, FallibleAutoCast, Grab};
}
