//! The fetch-decode-execute engine of an 8-bit virtual machine: 35
//! operations over 16 registers, 4KB of memory, a 16-frame call stack, a
//! 64x32 monochrome framebuffer, a hex keypad, and two countdown timers.
//!
//! The crate does no I/O and keeps no clock; a host drives [`Machine::step`]
//! at whatever rate it wants, renders [`Machine::get_frame`], and feeds key
//! state between cycles.

pub use error::MachineError;
pub use machine::{Cycle, FrameBuffer, Machine};

pub mod constants;
mod error;
mod instruction;
mod machine;
mod opcode;
mod operations;
