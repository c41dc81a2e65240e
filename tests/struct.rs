//! Testing methods on vipcore's structs
use vipcore::{cpu::mem::Region, prelude::*};
use std::{collections::hash_map::DefaultHasher, hash::Hash};

#[test]
fn cpu() {
    let cpu = CPU::default(); // Default
    println!("{cpu:?}"); // Debug
}

mod error {
    use super::*;
    #[test]
    fn display() {
        let errors = [
            Error::UnimplementedInstruction { word: 0x5123 },
            Error::InvalidAddressRange { range: 0xffe..0x1001 },
            Error::ProgramTooLarge { len: 0xe01, max: 0xe00 },
            Error::StackOverflow { addr: 0x200, depth: 16 },
            Error::StackUnderflow { addr: 0x2fe },
            Error::InvalidKey { key: 0x10 },
        ];
        for error in errors {
            println!("{error} {error:?}");
        }
    }
    #[test]
    fn unimplemented_instruction() {
        let error = Error::UnimplementedInstruction { word: 0x5123 };
        assert_eq!("opcode 5123 not recognized", error.to_string());
    }
    #[test]
    fn io_error() {
        let error: Error = std::io::Error::from(std::io::ErrorKind::NotFound).into();
        assert!(matches!(error, Error::IoError(_)));
    }
}

mod flags {
    use super::*;
    //#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[test]
    fn default() {
        let flags = Flags::default();
        assert_eq!(
            Flags {
                debug: false,
                keypause: false,
                ipf: 10,
                quirks: Quirks::default(),
            },
            flags
        );
    }
    #[test]
    fn clone() {
        let cf1 = Flags {
            debug: true,
            ipf: 20,
            ..Default::default()
        };
        let cf2 = cf1.clone();
        assert_eq!(cf1, cf2);
    }
    #[test]
    fn debug() {
        let mut flags = Flags::default();
        flags.debug();
        assert!(flags.debug);
        flags.debug();
        assert!(!flags.debug);
        println!("{flags:?}");
    }
    #[test]
    fn ord() {
        assert!(Flags::default() < Flags { debug: true, ..Default::default() });
    }
    #[test]
    fn hash() {
        let mut hasher = DefaultHasher::new();
        Flags::default().hash(&mut hasher);
        println!("{hasher:?}");
    }
}

mod quirks {
    use super::*;
    #[test]
    fn from_true() {
        let quirks_true = Quirks::from(true);
        assert_eq!(
            quirks_true,
            Quirks {
                shift: true,
                clip: true,
                index_overflow: true,
            }
        )
    }
    #[test]
    fn from_false() {
        assert_eq!(Quirks::from(false), Quirks::default());
    }
    #[test]
    #[allow(clippy::clone_on_copy)]
    fn clone() {
        let q1 = Quirks { shift: true, ..Default::default() };
        let q2 = q1.clone();
        assert_eq!(q1, q2);
    }
    #[test]
    fn ord() {
        assert!(Quirks::from(false) < Quirks::from(true));
    }
    #[test]
    fn hash() {
        let mut hasher = DefaultHasher::new();
        Quirks::from(true).hash(&mut hasher);
        println!("{hasher:?}");
    }
}

mod region {
    use super::*;
    #[test]
    fn display() {
        assert_eq!("CharsetProgram", format!("{Charset}{Program}"));
    }
    #[test]
    fn debug() {
        println!("{Charset:?}{Program:?}");
    }
    #[test]
    fn ord() {
        assert_eq!(Region::Program, Charset.max(Program));
        assert!(Charset < Program);
    }
}

mod word {
    use super::*;
    #[test]
    fn display() {
        assert_eq!("00e0", Word(0x00e0).to_string());
    }
    #[test]
    fn from() {
        let word = Word::from(0xd12f);
        assert_eq!(0xd12f_u16, u16::from(word));
        assert_eq!(word, Word::from_be_bytes([0xd1, 0x2f]));
    }
}

mod screen {
    use super::*;
    #[test]
    fn default() {
        let screen = Screen::default();
        assert_eq!(Screen::new(), screen);
        assert_eq!(64 * 32, screen.pixels().len());
        assert!(!screen.get(64, 0) && !screen.get(0, 32));
    }
    #[test]
    fn clone() {
        let mut s1 = Screen::new();
        s1.clear();
        let s2 = s1.clone();
        assert_eq!(s1, s2);
    }
}

mod mem {
    use super::*;
    #[test]
    fn macro_builds_regions() {
        let mem = vipcore::mem! {
            Charset [0x0000..0x0010] = b"ABCDEF",
            Program [0x0010..0x0020],
        };
        assert_eq!(0x20, mem.len());
        assert_eq!(Some(0x10..0x20), mem.region(Program));
        assert_eq!(b"ABCDEF", &mem.get_region(Charset).unwrap()[..6]);
    }
    #[test]
    fn missing_region() {
        let mut mem = Mem::new();
        assert_eq!(None, mem.get_region(Program));
        assert!(mem.load_region(Program, b"data").is_ok());
        assert!(mem.is_empty());
    }
    #[test]
    fn clone_eq() {
        let mem = Mem::default();
        assert_eq!(mem.clone(), mem);
    }
}
