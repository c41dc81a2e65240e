// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Stores and displays the Chip-8's framebuffer

use std::fmt::{Display, Formatter, Result};

/// Width of the framebuffer, in pixels
pub const WIDTH: usize = 64;
/// Height of the framebuffer, in pixels
pub const HEIGHT: usize = 32;

/// A 64x32 monochrome framebuffer, stored row-major (`x + y * 64`)
///
/// Tracks whether it has been mutated since the host last looked at it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Screen {
    pixels: Vec<bool>,
    changed: bool,
}

impl Screen {
    /// Constructs a blank, unchanged screen
    /// # Examples
    /// ```rust
    /// # use vipcore::*;
    /// let screen = Screen::new();
    /// assert!(screen.pixels().iter().all(|&p| !p));
    /// assert!(!screen.changed());
    /// ```
    pub fn new() -> Self {
        Screen {
            pixels: vec![false; WIDTH * HEIGHT],
            changed: false,
        }
    }

    /// Gets a read-only view of every pixel, row-major
    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    /// Gets the pixel at (x, y). Pixels outside the screen are always off.
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < WIDTH && y < HEIGHT && self.pixels[x + y * WIDTH]
    }

    /// Turns every pixel off
    pub fn clear(&mut self) {
        self.pixels.fill(false);
        self.changed = true;
    }

    /// XORs the pixel at (x, y), returning true if the pixel was turned off.
    ///
    /// Coordinates must already be on screen.
    pub(crate) fn toggle(&mut self, x: usize, y: usize) -> bool {
        let pixel = &mut self.pixels[x + y * WIDTH];
        *pixel = !*pixel;
        self.changed = true;
        !*pixel
    }

    /// Returns true if the screen changed since the last [Screen::take_changed]
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Raises the changed flag
    pub fn mark_changed(&mut self) {
        self.changed = true;
    }

    /// Reads and clears the changed flag
    /// # Examples
    /// ```rust
    /// # use vipcore::*;
    /// let mut screen = Screen::new();
    /// screen.clear();
    /// assert!(screen.take_changed());
    /// assert!(!screen.take_changed());
    /// ```
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Screen {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for row in self.pixels.chunks_exact(WIDTH) {
            for &pixel in row {
                write!(f, "{}", if pixel { '█' } else { ' ' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
