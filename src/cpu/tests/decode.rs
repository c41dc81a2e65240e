// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Exercises the instruction decode logic.
//!
//! Every word is decoded, executed on a prepared CPU, and checked for where it sends pc.
use super::*;

/// Number of 16-bit words which are instructions
const VALID_WORDS: usize = 43954;

/// A CPU with something to return to, a pressed key, and vN = N
fn prepared() -> CPU {
    let mut cpu = CPU::with_rng(Flags::default(), StepRng::new(RANDOM as u64, 0));
    for (reg, value) in cpu.v.iter_mut().enumerate() {
        *value = reg as u8;
    }
    cpu.i = 0x300;
    cpu.stack.push(0x240);
    cpu.keys[0x1] = true;
    cpu
}

/// Where pc should end up after an instruction at 0x200
fn target(next: Next) -> Adr {
    match next {
        Next::Advance => 0x202,
        Next::Skip => 0x204,
        Next::Jump(adr) => adr,
        Next::Stay => 0x200,
    }
}

#[rustfmt::skip]
const INSTRUCTIONS: [(u16, Insn, Next); 34] = [
    (0x00e0, Insn::cls,                          Next::Advance),
    (0x00ee, Insn::ret,                          Next::Jump(0x242)),
    (0x1234, Insn::jmp   { A: 0x234 },           Next::Jump(0x234)),
    (0x2345, Insn::call  { A: 0x345 },           Next::Jump(0x345)),
    (0x3303, Insn::seb   { B: 0x03, x: 0x3 },    Next::Skip),
    (0x4303, Insn::sneb  { B: 0x03, x: 0x3 },    Next::Advance),
    (0x5120, Insn::se    { y: 0x2, x: 0x1 },     Next::Advance),
    (0x6a42, Insn::movb  { B: 0x42, x: 0xa },    Next::Advance),
    (0x7a42, Insn::addb  { B: 0x42, x: 0xa },    Next::Advance),
    (0x8120, Insn::mov   { x: 0x1, y: 0x2 },     Next::Advance),
    (0x8121, Insn::or    { y: 0x2, x: 0x1 },     Next::Advance),
    (0x8122, Insn::and   { y: 0x2, x: 0x1 },     Next::Advance),
    (0x8123, Insn::xor   { y: 0x2, x: 0x1 },     Next::Advance),
    (0x8124, Insn::add   { y: 0x2, x: 0x1 },     Next::Advance),
    (0x8125, Insn::sub   { y: 0x2, x: 0x1 },     Next::Advance),
    (0x8126, Insn::shr   { y: 0x2, x: 0x1 },     Next::Advance),
    (0x8127, Insn::bsub  { y: 0x2, x: 0x1 },     Next::Advance),
    (0x812e, Insn::shl   { y: 0x2, x: 0x1 },     Next::Advance),
    (0x9120, Insn::sne   { y: 0x2, x: 0x1 },     Next::Skip),
    (0xa456, Insn::movI  { A: 0x456 },           Next::Advance),
    (0xb300, Insn::jmpr  { A: 0x300 },           Next::Jump(0x300)),
    (0xc1ff, Insn::rand  { B: 0xff, x: 0x1 },    Next::Advance),
    (0xd125, Insn::draw  { y: 0x2, x: 0x1, n: 5 }, Next::Advance),
    (0xe19e, Insn::sek   { x: 0x1 },             Next::Skip),
    (0xe1a1, Insn::snek  { x: 0x1 },             Next::Advance),
    (0xf107, Insn::getdt { x: 0x1 },             Next::Advance),
    (0xf10a, Insn::waitk { x: 0x1 },             Next::Advance),
    (0xf115, Insn::setdt { x: 0x1 },             Next::Advance),
    (0xf118, Insn::setst { x: 0x1 },             Next::Advance),
    (0xf11e, Insn::addI  { x: 0x1 },             Next::Advance),
    (0xf129, Insn::font  { x: 0x1 },             Next::Advance),
    (0xf133, Insn::bcd   { x: 0x1 },             Next::Advance),
    (0xf155, Insn::dmao  { x: 0x1 },             Next::Advance),
    (0xf165, Insn::dmai  { x: 0x1 },             Next::Advance),
];

#[test]
fn decodes_every_instruction() {
    for (word, insn, _) in INSTRUCTIONS {
        assert_eq!(insn, Insn::try_from(Word(word)).unwrap(), "{word:04x}");
    }
}

#[test]
fn executes_every_instruction() {
    for (word, insn, next) in INSTRUCTIONS {
        let mut cpu = prepared();
        assert_eq!(next, cpu.execute(insn).unwrap(), "{word:04x}: {insn:?}");
    }
}

#[test]
fn steps_every_instruction() {
    for (word, insn, next) in INSTRUCTIONS {
        let mut cpu = prepared();
        cpu.mem.write(0x200u16, word);
        cpu.step().unwrap();
        assert_eq!(target(next), cpu.pc, "{word:04x}: {insn:?}");
        assert_eq!(1, cpu.cycle);
    }
}

#[test]
fn wait_for_key_stays_put() {
    let mut cpu = prepared();
    cpu.keys = [false; KEY_COUNT];
    cpu.mem.write(0x200u16, 0xf10a_u16);
    for _ in 0..4 {
        cpu.step().unwrap();
        assert_eq!(0x200, cpu.pc);
    }
    assert_eq!(4, cpu.cycle);
}

#[test]
fn operands_match_word_fields() {
    let mut valid = 0;
    for raw in 0..=0xffff_u16 {
        let word = Word(raw);
        let Ok(insn) = Insn::try_from(word) else {
            continue;
        };
        valid += 1;
        match insn {
            Insn::cls | Insn::ret => assert_eq!(0x0, word.class()),
            Insn::jmp { A } | Insn::call { A } | Insn::movI { A } | Insn::jmpr { A } => {
                assert_eq!(word.adr(), A)
            }
            Insn::seb { B, x }
            | Insn::sneb { B, x }
            | Insn::movb { B, x }
            | Insn::addb { B, x }
            | Insn::rand { B, x } => assert_eq!((word.x(), word.byte()), (x, B)),
            Insn::se { y, x }
            | Insn::mov { x, y }
            | Insn::or { y, x }
            | Insn::and { y, x }
            | Insn::xor { y, x }
            | Insn::add { y, x }
            | Insn::sub { y, x }
            | Insn::shr { y, x }
            | Insn::bsub { y, x }
            | Insn::shl { y, x }
            | Insn::sne { y, x } => assert_eq!((word.x(), word.y()), (x, y)),
            Insn::draw { y, x, n } => assert_eq!((word.x(), word.y(), word.nib()), (x, y, n)),
            Insn::sek { x }
            | Insn::snek { x }
            | Insn::getdt { x }
            | Insn::waitk { x }
            | Insn::setdt { x }
            | Insn::setst { x }
            | Insn::addI { x }
            | Insn::font { x }
            | Insn::bcd { x }
            | Insn::dmao { x }
            | Insn::dmai { x } => assert_eq!(word.x(), x),
        }
    }
    assert_eq!(VALID_WORDS, valid);
}

/// Words that look like instructions, but aren't
mod unknown {
    use super::*;

    fn assert_rejected(word: u16) {
        let mut cpu = prepared();
        cpu.mem.write(0x200u16, word);
        assert!(
            matches!(cpu.step(), Err(Error::UnimplementedInstruction { word: w }) if w == word),
            "{word:04x} should be rejected"
        );
        assert_eq!(0x200, cpu.pc);
        assert_eq!(0, cpu.cycle);
        assert_eq!(&[0x240], cpu.stack());
    }

    #[test]
    fn machine_code_routines() {
        for word in [0x0000, 0x0123, 0x00e1, 0x00ef, 0x0fff] {
            assert_rejected(word);
        }
    }
    #[test]
    fn register_compare_with_nibble() {
        for n in 0x1..=0xf {
            assert_rejected(0x5120 | n);
            assert_rejected(0x9120 | n);
        }
    }
    #[test]
    fn alu_selectors() {
        for n in [0x8, 0x9, 0xa, 0xb, 0xc, 0xd, 0xf] {
            assert_rejected(0x8120 | n);
        }
    }
    #[test]
    fn key_selectors() {
        for b in [0x00, 0x9f, 0xa0, 0xa2, 0xff] {
            assert_rejected(0xe100 | b);
        }
    }
    #[test]
    fn misc_selectors() {
        for b in [0x00, 0x08, 0x0b, 0x16, 0x1f, 0x30, 0x75, 0x85, 0xff] {
            assert_rejected(0xf100 | b);
        }
    }
}
