// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Contains implementations for each Chip-8 [Insn]

use super::*;
use super::mem::FONT_START;
use crate::{
    screen::{HEIGHT, WIDTH},
    traits::Grab,
};
use log::warn;
use rand::Rng;

/// Where the program counter goes after an instruction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Next {
    /// Continue with the following instruction (pc + 2)
    Advance,
    /// Skip the following instruction (pc + 4)
    Skip,
    /// Continue at an absolute address
    Jump(Adr),
    /// Execute this instruction again (pc + 0)
    Stay,
}

impl Next {
    /// Skips when `condition` holds, advances otherwise
    #[inline(always)]
    pub fn skip_if(condition: bool) -> Self {
        if condition {
            Next::Skip
        } else {
            Next::Advance
        }
    }
}

impl CPU {
    /// Executes a single [Insn], reporting where the program counter goes next
    #[rustfmt::skip]
    #[inline(always)]
    pub(super) fn execute(&mut self, instruction: Insn) -> Result<Next> {
        Ok(match instruction {
            Insn::cls               => self.clear_screen(),
            Insn::ret               => self.ret()?,
            Insn::jmp   {       A } => self.jump(A),
            Insn::call  {       A } => self.call(A)?,
            Insn::seb   {    x, B } => self.skip_equals_immediate(x, B),
            Insn::sneb  {    x, B } => self.skip_not_equals_immediate(x, B),
            Insn::se    { y, x    } => self.skip_equals(x, y),
            Insn::movb  {    x, B } => self.load_immediate(x, B),
            Insn::addb  {    x, B } => self.add_immediate(x, B),
            Insn::mov   { y, x    } => self.load(x, y),
            Insn::or    { y, x    } => self.or(x, y),
            Insn::and   { y, x    } => self.and(x, y),
            Insn::xor   { y, x    } => self.xor(x, y),
            Insn::add   { y, x    } => self.add(x, y),
            Insn::sub   { y, x    } => self.sub(x, y),
            Insn::shr   { y, x    } => self.shift_right(x, y),
            Insn::bsub  { y, x    } => self.backwards_sub(x, y),
            Insn::shl   { y, x    } => self.shift_left(x, y),
            Insn::sne   { y, x    } => self.skip_not_equals(x, y),
            Insn::movI  {       A } => self.load_i_immediate(A),
            Insn::jmpr  {       A } => self.jump_indexed(A),
            Insn::rand  {    x, B } => self.rand(x, B),
            Insn::draw  { y, x, n } => self.draw(x, y, n)?,
            Insn::sek   {    x    } => self.skip_key_equals(x),
            Insn::snek  {    x    } => self.skip_key_not_equals(x),
            Insn::getdt {    x    } => self.load_delay_timer(x),
            Insn::waitk {    x    } => self.wait_for_key(x),
            Insn::setdt {    x    } => self.store_delay_timer(x),
            Insn::setst {    x    } => self.store_sound_timer(x),
            Insn::addI  {    x    } => self.add_i(x),
            Insn::font  {    x    } => self.load_sprite(x),
            Insn::bcd   {    x    } => self.bcd_convert(x)?,
            Insn::dmao  {    x    } => self.store_dma(x)?,
            Insn::dmai  {    x    } => self.load_dma(x)?,
        })
    }

    /// Gets `len` bytes of memory starting at I, or reports the bad range
    fn at_i(&self, len: usize) -> Result<&[u8]> {
        let range = self.i as usize..self.i as usize + len;
        self.mem
            .grab(range.clone())
            .ok_or(Error::InvalidAddressRange { range })
    }

    /// Gets `len` bytes of mutable memory starting at I, or reports the bad range
    fn at_i_mut(&mut self, len: usize) -> Result<&mut [u8]> {
        let range = self.i as usize..self.i as usize + len;
        self.mem
            .grab_mut(range.clone())
            .ok_or(Error::InvalidAddressRange { range })
    }
}

/// |`0aaa`| Issues a "System call" (ML routine)
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`00e0`| Clear screen memory to all 0       |
/// |`00ee`| Return from subroutine             |
impl CPU {
    /// |`00e0`| Clears the screen memory to 0
    #[inline(always)]
    pub(super) fn clear_screen(&mut self) -> Next {
        self.screen.clear();
        Next::Advance
    }
    /// |`00ee`| Returns from subroutine
    ///
    /// The stack holds the address of the call itself, so execution resumes just past it.
    #[inline(always)]
    pub(super) fn ret(&mut self) -> Result<Next> {
        let call_site = self
            .stack
            .pop()
            .ok_or(Error::StackUnderflow { addr: self.pc })?;
        Ok(Next::Jump(call_site.wrapping_add(2)))
    }
}

/// |`1aaa`| Sets pc to an absolute address
impl CPU {
    /// |`1aaa`| Sets the program counter to an absolute address
    #[inline(always)]
    pub(super) fn jump(&mut self, a: Adr) -> Next {
        Next::Jump(a)
    }
}

/// |`2aaa`| Pushes pc onto the stack, then jumps to a
impl CPU {
    /// |`2aaa`| Pushes pc onto the stack, then jumps to a
    #[inline(always)]
    pub(super) fn call(&mut self, a: Adr) -> Result<Next> {
        if self.stack.len() >= STACK_DEPTH {
            return Err(Error::StackOverflow {
                addr: self.pc,
                depth: STACK_DEPTH,
            });
        }
        self.stack.push(self.pc);
        Ok(Next::Jump(a))
    }
}

/// |`3xbb`| Skips next instruction if register X == b
impl CPU {
    /// |`3xbb`| Skips the next instruction if register X == b
    #[inline(always)]
    pub(super) fn skip_equals_immediate(&mut self, x: Reg, b: u8) -> Next {
        Next::skip_if(self.v[x] == b)
    }
}

/// |`4xbb`| Skips next instruction if register X != b
impl CPU {
    /// |`4xbb`| Skips the next instruction if register X != b
    #[inline(always)]
    pub(super) fn skip_not_equals_immediate(&mut self, x: Reg, b: u8) -> Next {
        Next::skip_if(self.v[x] != b)
    }
}

/// |`5xyn`| Performs a register-register comparison
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`5XY0`| Skip next instruction if vX == vY  |
impl CPU {
    /// |`5xy0`| Skips the next instruction if register X == register Y
    #[inline(always)]
    pub(super) fn skip_equals(&mut self, x: Reg, y: Reg) -> Next {
        Next::skip_if(self.v[x] == self.v[y])
    }
}

/// |`6xbb`| Loads immediate byte b into register vX
impl CPU {
    /// |`6xbb`| Loads immediate byte b into register vX
    #[inline(always)]
    pub(super) fn load_immediate(&mut self, x: Reg, b: u8) -> Next {
        self.v[x] = b;
        Next::Advance
    }
}

/// |`7xbb`| Adds immediate byte b to register vX
impl CPU {
    /// |`7xbb`| Adds immediate byte b to register vX. Does not touch vF.
    #[inline(always)]
    pub(super) fn add_immediate(&mut self, x: Reg, b: u8) -> Next {
        self.v[x] = self.v[x].wrapping_add(b);
        Next::Advance
    }
}

/// |`8xyn`| Performs ALU operation
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`8xy0`| X = Y                              |
/// |`8xy1`| X = X | Y                          |
/// |`8xy2`| X = X & Y                          |
/// |`8xy3`| X = X ^ Y                          |
/// |`8xy4`| X = X + Y; Set vF=carry            |
/// |`8xy5`| X = X - Y; Set vF=borrow           |
/// |`8xy6`| X = Y >> 1; Set vF=shifted out     |
/// |`8xy7`| X = Y - X; Set vF=borrow           |
/// |`8xyE`| X = Y << 1; Set vF=shifted out     |
///
/// The result is always written before vF, so vF holds the flag when X is F.
impl CPU {
    /// |`8xy0`| Loads the value of y into x
    #[inline(always)]
    pub(super) fn load(&mut self, x: Reg, y: Reg) -> Next {
        self.v[x] = self.v[y];
        Next::Advance
    }
    /// |`8xy1`| Performs bitwise or of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn or(&mut self, x: Reg, y: Reg) -> Next {
        self.v[x] |= self.v[y];
        Next::Advance
    }
    /// |`8xy2`| Performs bitwise and of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn and(&mut self, x: Reg, y: Reg) -> Next {
        self.v[x] &= self.v[y];
        Next::Advance
    }
    /// |`8xy3`| Performs bitwise xor of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn xor(&mut self, x: Reg, y: Reg) -> Next {
        self.v[x] ^= self.v[y];
        Next::Advance
    }
    /// |`8xy4`| Performs addition of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn add(&mut self, x: Reg, y: Reg) -> Next {
        let carry;
        (self.v[x], carry) = self.v[x].overflowing_add(self.v[y]);
        self.v[0xf] = carry.into();
        Next::Advance
    }
    /// |`8xy5`| Performs subtraction of vX and vY, and stores the result in vX
    ///
    /// vF is set to 1 when the subtraction borrowed (vY > vX)
    #[inline(always)]
    pub(super) fn sub(&mut self, x: Reg, y: Reg) -> Next {
        let borrow;
        (self.v[x], borrow) = self.v[x].overflowing_sub(self.v[y]);
        self.v[0xf] = borrow.into();
        Next::Advance
    }
    /// |`8xy6`| Performs bitwise right shift of vY, and stores the result in vX
    ///
    /// # Quirk
    /// On the CHIP-48, this shifts vX in place
    #[inline(always)]
    pub(super) fn shift_right(&mut self, x: Reg, y: Reg) -> Next {
        let src: Reg = if self.flags.quirks.shift { x } else { y };
        let shift_out = self.v[src] & 1;
        self.v[x] = self.v[src] >> 1;
        self.v[0xf] = shift_out;
        Next::Advance
    }
    /// |`8xy7`| Performs subtraction of vY and vX, and stores the result in vX
    ///
    /// vF is set to 1 when the subtraction borrowed (vX > vY)
    #[inline(always)]
    pub(super) fn backwards_sub(&mut self, x: Reg, y: Reg) -> Next {
        let borrow;
        (self.v[x], borrow) = self.v[y].overflowing_sub(self.v[x]);
        self.v[0xf] = borrow.into();
        Next::Advance
    }
    /// |`8xyE`| Performs bitwise left shift of vY, and stores the result in vX
    ///
    /// # Quirk
    /// On the CHIP-48, this shifts vX in place
    #[inline(always)]
    pub(super) fn shift_left(&mut self, x: Reg, y: Reg) -> Next {
        let src: Reg = if self.flags.quirks.shift { x } else { y };
        let shift_out: u8 = self.v[src] >> 7;
        self.v[x] = self.v[src] << 1;
        self.v[0xf] = shift_out;
        Next::Advance
    }
}

/// |`9xyn`| Performs a register-register comparison
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`9XY0`| Skip next instruction if vX != vY  |
impl CPU {
    /// |`9xy0`| Skip next instruction if X != y
    #[inline(always)]
    pub(super) fn skip_not_equals(&mut self, x: Reg, y: Reg) -> Next {
        Next::skip_if(self.v[x] != self.v[y])
    }
}

/// |`Aaaa`| Load address #a into register I
impl CPU {
    /// |`Aadr`| Load address #adr into register I
    #[inline(always)]
    pub(super) fn load_i_immediate(&mut self, a: Adr) -> Next {
        self.i = a;
        Next::Advance
    }
}

/// |`Baaa`| Jump to &adr + v0
impl CPU {
    /// |`Badr`| Jump to &adr + v0
    #[inline(always)]
    pub(super) fn jump_indexed(&mut self, a: Adr) -> Next {
        Next::Jump(a.wrapping_add(self.v[0] as Adr))
    }
}

/// |`Cxbb`| Stores a random number & the provided byte into vX
impl CPU {
    /// |`Cxbb`| Stores a random number & the provided byte into vX
    #[inline(always)]
    pub(super) fn rand(&mut self, x: Reg, b: u8) -> Next {
        self.v[x] = self.rng.gen::<u8>() & b;
        Next::Advance
    }
}

/// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
impl CPU {
    /// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
    ///
    /// Sets vF to 1 if any pixel was turned off.
    ///
    /// # Quirk
    /// The starting coordinates always wrap onto the screen.
    /// By default, pixels past an edge wrap around to the opposite edge.
    /// With [Quirks::clip], they are dropped instead.
    #[inline(always)]
    pub(super) fn draw(&mut self, x: Reg, y: Reg, n: Nib) -> Result<Next> {
        let (x, y) = (self.v[x] as usize % WIDTH, self.v[y] as usize % HEIGHT);
        let clip = self.flags.quirks.clip;
        let range = self.i as usize..self.i as usize + n as usize;
        let sprite = self
            .mem
            .grab(range.clone())
            .ok_or(Error::InvalidAddressRange { range })?;

        let mut collision = false;
        for (row, &bits) in sprite.iter().enumerate() {
            for col in 0..8 {
                if bits & (0x80 >> col) == 0 {
                    continue;
                }
                let (px, py) = (x + col, y + row);
                if clip && (px >= WIDTH || py >= HEIGHT) {
                    continue;
                }
                collision |= self.screen.toggle(px % WIDTH, py % HEIGHT);
            }
        }
        self.screen.mark_changed();
        self.v[0xf] = collision.into();
        Ok(Next::Advance)
    }
}

/// |`Exbb`| Skips instruction on value of keypress
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`eX9e`| Skip next instruction if key vX is pressed |
/// |`eXa1`| Skip next instruction if key vX is not pressed |
///
/// Both consume the key: it reads as released until the host presses it again.
impl CPU {
    /// |`Ex9E`| Skip next instruction if key vX is pressed
    #[inline(always)]
    pub(super) fn skip_key_equals(&mut self, x: Reg) -> Next {
        Next::skip_if(self.consume_key(self.v[x]))
    }
    /// |`ExA1`| Skip next instruction if key vX is not pressed
    #[inline(always)]
    pub(super) fn skip_key_not_equals(&mut self, x: Reg) -> Next {
        Next::skip_if(!self.consume_key(self.v[x]))
    }
    /// Reads and releases a key. Keys past `0xf` are never pressed.
    #[inline(always)]
    fn consume_key(&mut self, key: u8) -> bool {
        self.keys
            .get_mut(key as usize)
            .map(std::mem::take)
            .unwrap_or_default()
    }
}

/// |`Fxbb`| Performs IO
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`fX07`| Set vX to value in delay timer     |
/// |`fX0a`| Wait for input, store key in vX    |
/// |`fX15`| Set delay timer to the value in vX |
/// |`fX18`| Set sound timer to the value in vX |
/// |`fX1e`| Add vX to I                        |
/// |`fX29`| Load sprite for character x into I |
/// |`fX33`| BCD convert X into I[0..3]         |
/// |`fX55`| DMA Stor from I to registers 0..=X |
/// |`fX65`| DMA Load from I to registers 0..=X |
impl CPU {
    /// |`Fx07`| Get the current DT, and put it in vX
    /// ```py
    /// vX = DT
    /// ```
    #[inline(always)]
    pub(super) fn load_delay_timer(&mut self, x: Reg) -> Next {
        self.v[x] = self.delay;
        Next::Advance
    }
    /// |`Fx0A`| Wait for key, then vX = K
    ///
    /// Takes the lowest pressed key and releases all the others.
    /// While no key is pressed, the instruction repeats.
    #[inline(always)]
    pub(super) fn wait_for_key(&mut self, x: Reg) -> Next {
        if let Some(key) = self.keys.iter().position(|&pressed| pressed) {
            self.keys = [false; KEY_COUNT];
            self.v[x] = key as u8;
            self.flags.keypause = false;
            Next::Advance
        } else {
            self.flags.keypause = true;
            Next::Stay
        }
    }
    /// |`Fx15`| Load vX into DT
    /// ```py
    /// DT = vX
    /// ```
    #[inline(always)]
    pub(super) fn store_delay_timer(&mut self, x: Reg) -> Next {
        self.delay = self.v[x];
        Next::Advance
    }
    /// |`Fx18`| Load vX into ST
    /// ```py
    /// ST = vX;
    /// ```
    #[inline(always)]
    pub(super) fn store_sound_timer(&mut self, x: Reg) -> Next {
        self.sound = self.v[x];
        Next::Advance
    }
    /// |`Fx1e`| Add vX to I,
    /// ```py
    /// I += vX;
    /// ```
    /// # Quirk
    /// On the Amiga interpreter, vF is set when I passes `0xfff`
    #[inline(always)]
    pub(super) fn add_i(&mut self, x: Reg) -> Next {
        self.i = self.i.wrapping_add(self.v[x] as Adr);
        if self.flags.quirks.index_overflow {
            self.v[0xf] = (self.i > 0xfff).into();
        }
        Next::Advance
    }
    /// |`Fx29`| Load sprite for character x into I
    /// ```py
    /// I = sprite(X);
    /// ```
    /// Only the low nibble of vX selects the glyph.
    #[inline(always)]
    pub(super) fn load_sprite(&mut self, x: Reg) -> Next {
        if self.v[x] > 0xf {
            warn!("no glyph for {:02x}, using {:x}", self.v[x], self.v[x] & 0xf);
        }
        self.i = FONT_START as Adr + 5 * (self.v[x] as Adr & 0xf);
        Next::Advance
    }
    /// |`Fx33`| BCD convert X into I`[0..3]`
    #[inline(always)]
    pub(super) fn bcd_convert(&mut self, x: Reg) -> Result<Next> {
        let x = self.v[x];
        self.at_i_mut(3)?
            .copy_from_slice(&[x / 100, x / 10 % 10, x % 10]);
        Ok(Next::Advance)
    }
    /// |`Fx55`| DMA Stor from I to registers 0..=X
    #[inline(always)]
    pub(super) fn store_dma(&mut self, x: Reg) -> Result<Next> {
        let v = self.v;
        self.at_i_mut(x + 1)?.copy_from_slice(&v[..=x]);
        Ok(Next::Advance)
    }
    /// |`Fx65`| DMA Load from I to registers 0..=X
    #[inline(always)]
    pub(super) fn load_dma(&mut self, x: Reg) -> Result<Next> {
        let mut v = self.v;
        v[..=x].copy_from_slice(self.at_i(x + 1)?);
        self.v = v;
        Ok(Next::Advance)
    }
}
