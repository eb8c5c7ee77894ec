/// # Opcodes
///
/// Instruction words are 16 bits each. Which operation a word encodes is
/// determined by some combination of:
/// - `(n, _, _, _)` broad categorization; applies to all opcodes
/// - `(_, _, _, n)` specific behavior within a category
/// - `(_, _, n, n)` more specific behavior within a category
/// - `(_, n, n, n)` some fixed function that doesn't require variables (e.g. CLS; clear screen)
///
/// The remaining nibbles carry the operands. Handlers read them exclusively
/// through these accessors; nothing else parses bits out of a word.
/// - `(_, n, n, n)` a 12-bit address or immediate
/// - `(_, _, n, n)` an 8-bit immediate that is assigned to and/or compared with Vx
/// - `(_, n, _, _)` the index of the register Vx
/// - `(_, _, n, _)` the index of the register Vy
/// - `(_, _, _, n)` a 4-bit immediate, most commonly a sprite height
pub trait Opcode {
    /// The word's component nibbles, most significant first.
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// The word's second nibble.
    /// `[_x__]`
    fn x(&self) -> u8;

    /// The word's third nibble.
    /// `[__y_]`
    fn y(&self) -> u8;

    /// The word's fourth nibble.
    /// `[___n]`
    fn n(&self) -> u8;

    /// The word's least significant byte.
    /// `[__kk]`
    fn kk(&self) -> u8;

    /// The word without its most significant nibble.
    /// `[_nnn]`
    fn nnn(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (((self & 0xF000) >> 12) as u8, self.x(), self.y(), self.n())
    }

    fn x(&self) -> u8 {
        ((self & 0x0F00) >> 8) as u8
    }

    fn y(&self) -> u8 {
        ((self & 0x00F0) >> 4) as u8
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn nnn(&self) -> u16 {
        self & 0x0FFF
    }
}

#[cfg(test)]
mod test_opcode {
    use super::*;

    #[test]
    fn test_nibbles() {
        let op: u16 = 0xABCD;
        assert_eq!(op.nibbles(), (0xA, 0xB, 0xC, 0xD));
    }

    #[test]
    fn test_x() {
        let op: u16 = 0xABCD;
        assert_eq!(op.x(), 0xB);
    }

    #[test]
    fn test_y() {
        let op: u16 = 0xABCD;
        assert_eq!(op.y(), 0xC);
    }

    #[test]
    fn test_n() {
        let op: u16 = 0xABCD;
        assert_eq!(op.n(), 0xD);
    }

    #[test]
    fn test_kk() {
        let op: u16 = 0xABCD;
        assert_eq!(op.kk(), 0xCD);
    }

    #[test]
    fn test_nnn() {
        let op: u16 = 0xABCD;
        assert_eq!(op.nnn(), 0x0BCD);
    }
}
