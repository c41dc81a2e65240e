// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions


pub mod behavior;
pub mod flags;
pub mod instruction;
pub mod mem;
pub mod quirks;
pub mod word;

pub use self::{flags::Flags, quirks::Quirks, word::Word};

use self::{
    behavior::Next,
    instruction::Insn,
    mem::{Mem, Region::*, PROGRAM_START},
};
use crate::{
    error::{Error, Result},
    screen::Screen,
    traits::FallibleAutoCast,
};
use log::{debug, trace, warn};
use owo_colors::OwoColorize;
use rand::{rngs::StdRng, RngCore, SeedableRng};
use std::fmt::Debug;

/// Index of a general purpose register
pub type Reg = usize;
/// A memory address
pub type Adr = u16;
/// A 4-bit immediate
pub type Nib = u8;

/// Maximum depth of nested subroutine calls
pub const STACK_DEPTH: usize = 16;
/// Number of keys on the keypad
pub const KEY_COUNT: usize = 16;

/// Represents the internal state of the CPU interpreter
///
/// Owns every piece of machine state: memory, registers, timers, stack,
/// keypad and framebuffer. The host drives it through `&mut self`.
pub struct CPU {
    /// Flags that control how the CPU behaves, but which aren't inherent to the
    /// chip-8. Includes [Quirks], target IPF, etc.
    pub flags: Flags,
    // memory
    mem: Mem,
    screen: Screen,
    stack: Vec<Adr>,
    // registers
    pc: Adr,
    i: Adr,
    v: [u8; 16],
    delay: u8,
    sound: u8,
    // I/O
    keys: [bool; KEY_COUNT],
    // Execution data
    cycle: usize,
    rng: Box<dyn RngCore + Send>,
}

// public interface
impl CPU {
    /// Constructs a new CPU with the standard memory map, and an entropy-seeded
    /// random number generator
    /// # Examples
    /// ```rust
    /// # use vipcore::*;
    /// let cpu = CPU::new(Flags::default());
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn new(flags: Flags) -> Self {
        Self::with_rng(flags, StdRng::from_entropy())
    }

    /// Constructs a new CPU which draws random numbers from `rng`
    /// # Examples
    /// ```rust
    /// # use vipcore::*;
    /// use rand::{rngs::StdRng, SeedableRng};
    /// let cpu = CPU::with_rng(Flags::default(), StdRng::seed_from_u64(8));
    /// ```
    pub fn with_rng(flags: Flags, rng: impl RngCore + Send + 'static) -> Self {
        CPU {
            flags,
            mem: Mem::default(),
            screen: Screen::new(),
            stack: Vec::with_capacity(STACK_DEPTH),
            pc: PROGRAM_START as Adr,
            i: 0,
            v: [0; 16],
            delay: 0,
            sound: 0,
            keys: [false; KEY_COUNT],
            cycle: 0,
            rng: Box::new(rng),
        }
    }

    /// Loads a program from a file into the CPU's program space
    pub fn load_program(&mut self, rom: impl AsRef<std::path::Path>) -> Result<&mut Self> {
        self.load_program_bytes(&std::fs::read(rom)?)
    }

    /// Loads bytes into the CPU's program space, starting at `0x200`
    ///
    /// Returns [Error::ProgramTooLarge] if the program is longer than `0xe00` bytes.
    /// The program space is left untouched in that case.
    /// # Examples
    /// ```rust
    /// # use vipcore::*;
    /// let mut cpu = CPU::default();
    /// assert!(cpu.load_program_bytes(&[0x00, 0xe0]).is_ok());
    /// assert!(cpu.load_program_bytes(&[0; 0xe01]).is_err());
    /// ```
    pub fn load_program_bytes(&mut self, rom: &[u8]) -> Result<&mut Self> {
        let max = self.mem.get_region(Program).map_or(0, <[u8]>::len);
        if rom.len() > max {
            return Err(Error::ProgramTooLarge {
                len: rom.len(),
                max,
            });
        }
        self.mem.clear_region(Program);
        self.mem.load_region(Program, rom)?;
        debug!("loaded {:#x}-byte program", rom.len());
        Ok(self)
    }

    /// Presses a key, and reports whether the key's state changed.
    /// If key does not exist, returns [Error::InvalidKey].
    ///
    /// There is no release: keys stay pressed until an instruction consumes them.
    ///
    /// # Examples
    /// ```rust
    /// # use vipcore::*;
    /// let mut cpu = CPU::default();
    ///
    /// // press key `7`
    /// let did_press = cpu.press(0x7).unwrap();
    /// assert!(did_press);
    ///
    /// // press key `7` again, even though it's already pressed
    /// let did_press = cpu.press(0x7).unwrap();
    /// // it was already pressed, so nothing's changed.
    /// assert!(!did_press);
    ///
    /// // there is no key `0x10`
    /// assert!(cpu.press(0x10).is_err());
    /// ```
    pub fn press(&mut self, key: usize) -> Result<bool> {
        let keyref = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        let changed = !*keyref;
        *keyref = true;
        debug!("key {key:X} pressed");
        Ok(changed)
    }

    /// Gets the state of every key
    pub fn keys(&self) -> &[bool] {
        &self.keys
    }

    /// Sets a general purpose register in the CPU.
    ///
    /// # Panics
    /// If `reg` is not in `0..=0xf`
    /// # Examples
    /// ```rust
    /// # use vipcore::*;
    /// // Create a new CPU, and set v4 to 0x41
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x4, 0x41);
    /// assert_eq!(0x41, cpu.v()[4]);
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) {
        self.v[reg] = value;
    }

    /// Gets a slice of the entire general purpose registers
    /// # Examples
    /// ```rust
    /// # use vipcore::*;
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x0, 0x41);
    /// assert_eq!(
    ///     cpu.v(),
    ///     [0x41, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
    /// )
    /// ```
    pub fn v(&self) -> &[u8] {
        self.v.as_slice()
    }

    /// Gets the program counter
    /// # Examples
    /// ```rust
    /// # use vipcore::*;
    /// let cpu = CPU::default();
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// Gets the I register
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Gets the stack pointer: the number of pending calls
    pub fn sp(&self) -> usize {
        self.stack.len()
    }

    /// Gets the call-site addresses of every pending call, oldest first
    pub fn stack(&self) -> &[Adr] {
        &self.stack
    }

    /// Gets the value in the Sound Timer register
    pub fn sound(&self) -> u8 {
        self.sound
    }

    /// Returns true while the sound timer is running
    ///
    /// This is what an audio sink would observe to decide whether to beep.
    pub fn is_sounding(&self) -> bool {
        self.sound > 0
    }

    /// Gets the value in the Delay Timer register
    pub fn delay(&self) -> u8 {
        self.delay
    }

    /// Gets the number of instructions the CPU has executed
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Gets a read-only view of memory
    pub fn mem(&self) -> &Mem {
        &self.mem
    }

    /// Gets the framebuffer
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Reads and clears the framebuffer's changed flag
    pub fn take_changed(&mut self) -> bool {
        self.screen.take_changed()
    }

    /// Resets the emulator.
    ///
    /// Touches the stack, pc, registers, timers, keys, screen, and cycle count.
    ///
    /// Does not touch [Quirks], memory, or the random number generator.
    pub fn reset(&mut self) {
        self.flags.keypause = false;
        // clear the stack
        self.stack.truncate(0);
        // Reset the program counter
        self.pc = PROGRAM_START as Adr;
        // Zero the registers
        self.i = 0;
        self.v = [0; 16];
        self.delay = 0;
        self.sound = 0;
        // I/O
        self.keys = [false; KEY_COUNT];
        self.screen.clear();
        // Execution data
        self.cycle = 0;
    }

    /// Decrements the delay and sound timers, saturating at zero
    /// # Examples
    /// ```rust
    /// # use vipcore::*;
    /// # fn main() -> Result<()> {
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0x60, 0x02, // mov   #02, v0
    ///     0xf0, 0x15, // mov   v0, DT
    /// ])?.multistep(2)?;
    /// assert_eq!(1, cpu.delay());
    /// cpu.tick_timers();
    /// cpu.tick_timers();
    /// assert_eq!(0, cpu.delay());
    /// # Ok(())
    /// # }
    /// ```
    pub fn tick_timers(&mut self) {
        if self.sound == 1 {
            debug!("sound timer expired");
        }
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    /// Runs one cycle: executes a single instruction, then steps the timers once.
    ///
    /// Returns [Error::UnimplementedInstruction] if the instruction at `pc` is unimplemented.
    /// # Examples
    /// ```rust
    /// # use vipcore::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jmp 202
    /// ]).unwrap();
    /// cpu.tick()
    ///     .expect("0x00e0 (cls) should be a valid opcode.");
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(1, cpu.cycle());
    /// ```
    /// ```rust
    /// # use vipcore::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0xff, 0xff, // invalid!
    /// ]).unwrap();
    /// dbg!(cpu.tick())
    ///     .expect_err("Should return Error::UnimplementedInstruction { 0xffff }");
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn tick(&mut self) -> Result<&mut Self> {
        self.step()?;
        self.tick_timers();
        Ok(self)
    }

    /// Executes `steps` instructions, then steps the timers once
    ///
    /// Stops at the first error, without stepping the timers.
    /// # Examples
    /// ```rust
    /// # use vipcore::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jmp 202
    /// ]).unwrap();
    /// cpu.multistep(0x20)
    ///     .expect("The program should only have valid opcodes.");
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(0x20, cpu.cycle());
    /// ```
    pub fn multistep(&mut self, steps: usize) -> Result<&mut Self> {
        for _ in 0..steps {
            self.step()?;
        }
        self.tick_timers();
        Ok(self)
    }

    /// Runs one frame: [Flags::ipf] instructions, then one timer step
    pub fn frame(&mut self) -> Result<&mut Self> {
        self.multistep(self.flags.ipf)
    }

    /// Executes a single instruction, without touching the timers
    ///
    /// On error, the CPU is left exactly as it was before the call.
    pub fn step(&mut self) -> Result<&mut Self> {
        let pc = self.pc;
        let word = Word(self.mem.read_fallible(pc)?);
        let insn = Insn::try_from(word)?;

        trace!("{pc:03x}: {word} {insn:?}");
        if self.flags.debug {
            std::println!(
                "{:3} {:03x}: {} {:?}",
                self.cycle.bright_black(),
                pc,
                word.bright_black(),
                insn,
            );
        }

        let next = self.execute(insn).map_err(|e| {
            warn!("{pc:03x}: {e}");
            e
        })?;
        self.pc = match next {
            Next::Advance => pc.wrapping_add(2),
            Next::Skip => pc.wrapping_add(4),
            Next::Jump(adr) => adr,
            Next::Stay => pc,
        };
        self.cycle += 1;
        Ok(self)
    }
}

impl Debug for CPU {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CPU")
            .field("flags", &self.flags)
            .field("stack", &self.stack)
            .field("pc", &self.pc)
            .field("i", &self.i)
            .field("v", &self.v)
            .field("delay", &self.delay)
            .field("sound", &self.sound)
            .field("keys", &self.keys)
            .field("cycle", &self.cycle)
            .finish_non_exhaustive()
    }
}

impl Default for CPU {
    /// Constructs a new CPU with sane defaults
    ///
    /// | value  | default | description
    /// |--------|---------|------------
    /// | font   |`0x0000` | Location of font memory.
    /// | pc     |`0x0200` | Start location.
    ///
    /// # Examples
    /// ```rust
    /// use vipcore::*;
    /// let mut cpu = CPU::default();
    /// ```
    fn default() -> Self {
        Self::new(Flags::default())
    }
}
