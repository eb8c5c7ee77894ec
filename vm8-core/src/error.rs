use thiserror::Error;

/// Fatal conditions surfaced by the cycle driver.
///
/// Unrecognized instruction words are deliberately not errors; they are
/// skipped as no-ops and reported through [`Cycle::Unrecognized`]
/// (see [`crate::Cycle`]) so that ROMs probing edge behavior keep running.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineError {
    /// A fetch or a handler computed an address outside memory. The engine
    /// refuses the access rather than wrapping or corrupting neighbors.
    #[error("address {address:#05X} is out of range (instruction {instruction:#06X})")]
    AddressOutOfRange { address: u16, instruction: u16 },

    /// A call was issued with all 16 stack frames already in use.
    #[error("call {instruction:#06X} would overflow the 16-frame stack")]
    StackOverflow { instruction: u16 },

    /// A return was issued with no active stack frame.
    #[error("return {instruction:#06X} with an empty call stack")]
    StackUnderflow { instruction: u16 },
}
