//! Represents flags that aid in implementation but aren't a part of the Chip-8 itself

use super::Quirks;

/// Represents flags that aid in operation, but aren't inherent to the CPU
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flags {
    /// Set when debug (live instruction trace) mode enabled
    pub debug: bool,
    /// Set while the emulator is waiting for a keypress
    pub keypause: bool,
    /// Represents the number of instructions to run per frame ([super::CPU::frame])
    pub ipf: usize,
    /// Represents the set of emulator [Quirks] to enable
    pub quirks: Quirks,
}

impl Flags {
    /// Toggles debug mode
    ///
    /// # Examples
    /// ```rust
    /// # use vipcore::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(false, cpu.flags.debug);
    /// // Toggle debug mode
    /// cpu.flags.debug();
    /// assert_eq!(true, cpu.flags.debug);
    /// ```
    pub fn debug(&mut self) {
        self.debug = !self.debug
    }
}

impl Default for Flags {
    fn default() -> Self {
        Flags {
            debug: false,
            keypause: false,
            ipf: 10,
            quirks: Quirks::default(),
        }
    }
}
