//! Controls the [Quirks] behavior of the CPU on a granular level.

/// Controls the quirk behavior of the CPU on a granular level.
///
/// `false` is the reference behavior
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quirks {
    /// CHIP-48: Shift ops in `8xy`(`6`, `E`) should source from vX instead of vY
    pub shift: bool,
    /// Draw operations should clip at the edges of the screen instead of wrapping
    pub clip: bool,
    /// Amiga: `Fx1e` should set vF when I passes the end of addressable memory
    pub index_overflow: bool,
}

impl From<bool> for Quirks {
    fn from(value: bool) -> Self {
        Quirks {
            shift: value,
            clip: value,
            index_overflow: value,
        }
    }
}
