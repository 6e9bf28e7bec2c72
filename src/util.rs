use std::ops::Sub;

/// Elements with a byte width (eg. instructions in an [`InstructionList`])
///
/// [`InstructionList`]: crate::InstructionList
pub trait Width {
    fn width(&self) -> usize;
}

/// Byte offset into an encoded code array
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Offset(pub usize);

impl Sub for Offset {
    type Output = isize;

    fn sub(self, other: Offset) -> isize {
        (self.0 as isize) - (other.0 as isize)
    }
}
