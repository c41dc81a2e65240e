// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! vipcore: runs a Chip-8 program headless, then prints the screen

use gumdrop::*;
use log::{info, LevelFilter};
use owo_colors::OwoColorize;
use rand::{rngs::StdRng, SeedableRng};
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};
use vipcore::{error::Result, *};

pub fn main() -> Result<()> {
    let options = Arguments::parse_args_default_or_exit();
    if let Err(e) = simple_logger::SimpleLogger::new()
        .with_level(options.log)
        .init()
    {
        eprintln!("{}", e.bold().red());
    }
    let mut state = State::new(options)?;
    for result in &mut state {
        if let Err(e) = result {
            eprintln!("{}", e.bold().red());
            break;
        }
    }
    state.report();
    Ok(())
}

/// Parses a hexadecimal string into a key index
fn parse_hex(value: &str) -> std::result::Result<usize, std::num::ParseIntError> {
    usize::from_str_radix(value, 16)
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Load a ROM to run on vipcore.", required, free)]
    pub file: PathBuf,
    #[options(help = "Print this help message.")]
    help: bool,
    #[options(help = "Print every instruction as it runs.")]
    pub debug: bool,

    #[options(help = "Set the instructions-per-frame rate.", default = "10")]
    pub speed: usize,
    #[options(short = "n", help = "Stop after this many frames.", default = "60", meta = "N")]
    pub frames: usize,
    #[options(help = "Set the target framerate.", default = "60", meta = "FR")]
    pub frame_rate: u64,

    #[options(
        short = "v",
        help = "Use CHIP-48 style bit-shifts, which don't touch vY."
    )]
    pub shift: bool,
    #[options(
        short = "c",
        help = "Drop sprite pixels past the screen edge, instead of wrapping."
    )]
    pub clip: bool,
    #[options(short = "o", help = "Set vF when I passes 0xfff.")]
    pub overflow: bool,

    #[options(no_short, help = "Seed the random number generator.", meta = "SEED")]
    pub seed: Option<u64>,
    #[options(
        help = "Hold down a key (hex) for the whole run.",
        parse(try_from_str = "parse_hex"),
        meta = "KEY"
    )]
    pub press: Vec<usize>,
    #[options(help = "Set the log level.", default = "warn", meta = "LEVEL")]
    pub log: LevelFilter,
}

#[derive(Debug)]
struct State {
    pub frames: usize,
    pub rate: u64,
    pub held: Vec<usize>,
    pub cpu: CPU,
    pub ft: Instant,
}

impl State {
    fn new(options: Arguments) -> Result<Self> {
        let flags = Flags {
            debug: options.debug,
            ipf: options.speed,
            quirks: Quirks {
                shift: options.shift,
                clip: options.clip,
                index_overflow: options.overflow,
            },
            ..Default::default()
        };
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut cpu = CPU::with_rng(flags, rng);
        cpu.load_program(&options.file)?;
        info!("running {}", options.file.display());
        Ok(State {
            frames: options.frames,
            rate: options.frame_rate.max(1),
            held: options.press,
            cpu,
            ft: Instant::now(),
        })
    }
    fn keys(&mut self) -> Result<()> {
        for &key in &self.held {
            self.cpu.press(key)?;
        }
        Ok(())
    }
    fn wait_for_next_frame(&mut self) {
        let rate = Duration::from_nanos(1_000_000_000 / self.rate + 1);
        std::thread::sleep(rate.saturating_sub(self.ft.elapsed()));
        self.ft += rate;
    }
    fn report(&self) {
        print!("{}", self.cpu.screen());
        println!(
            "{} cycles, pc {:03x}, sound {}",
            self.cpu.cycle(),
            self.cpu.pc(),
            if self.cpu.is_sounding() { "on" } else { "off" }
        );
    }
}

impl Iterator for State {
    type Item = Result<()>;

    /// Runs one frame per iteration, until the frame budget runs out
    fn next(&mut self) -> Option<Self::Item> {
        self.frames = self.frames.checked_sub(1)?;
        self.wait_for_next_frame();
        if let Err(e) = self.keys() {
            return Some(Err(e));
        }
        if let Err(e) = self.cpu.frame() {
            return Some(Err(e));
        }
        Some(Ok(()))
    }
}
