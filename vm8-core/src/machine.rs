use std::io;
use std::io::Read;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{info, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONTSET_START_ADDRESS, FONT_SPRITES, KEY_COUNT, MAX_ROM_SIZE,
    MEMORY_SIZE, REGISTER_COUNT, ROM_START_ADDRESS, STACK_DEPTH,
};
use crate::error::MachineError;
use crate::instruction;

/// A row-major 64x32 grid of binary pixels. Cells only ever hold 0 or 1 but
/// are stored a byte wide so a renderer can scale them without unpacking bits.
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// The outcome of one cycle-driver invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// An instruction was fetched and executed.
    Executed,
    /// An Fx0A found no key down. The program counter was rewound so the
    /// next invocation retries it; the host should feed key state and call
    /// [`Machine::step`] again.
    AwaitingKey,
    /// The fetched word maps to no operation in the instruction set. It was
    /// skipped as a no-op after the usual program counter advance.
    Unrecognized(u16),
}

/// # Machine
/// The complete state of the virtual machine and the cycle driver that
/// mutates it.
///
/// ## CPU
/// - (`registers`) 16 8-bit registers V0..VF; VF doubles as the
///   carry/borrow/collision flag written by the arithmetic, shift, and draw
///   instructions
/// - (`index`) a 16-bit memory pointer
/// - (`pc`) a 16-bit program counter, always even during normal execution
/// - (`stack`/`sp`) 16 frames of return addresses for nested calls
/// - two 8-bit countdown timers, decremented once per cycle while nonzero
///
/// ## Memory
/// - 4096 bytes; the font occupies 0x050..0x0A0 and programs begin at 0x200
///
/// ## I/O surfaces
/// - (`keypad`) pressed state of the 16 hex keys; the host writes it via
///   [`Machine::key_press`]/[`Machine::key_release`] between cycles and the
///   engine only reads it
/// - (`frame_buffer`) the 64x32 monochrome display, toggled by XOR only;
///   a renderer maps on/off to its own colors
///
/// All fields other than the RNG are public so collaborators (renderers,
/// debuggers, tests) can inspect them freely; the host must not mutate
/// anything but the keypad while a cycle is in progress.
pub struct Machine {
    pub registers: [u8; REGISTER_COUNT],
    pub memory: [u8; MEMORY_SIZE],
    pub index: u16,
    pub pc: u16,
    pub stack: [u16; STACK_DEPTH],
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub keypad: [bool; KEY_COUNT],
    pub frame_buffer: FrameBuffer,
    /// Set whenever the executed instruction changed the frame buffer.
    pub draw_flag: bool,
    /// The most recently fetched instruction word; handlers read their
    /// operands from it through the `Opcode` accessors.
    pub current_instruction: u16,
    rng: StdRng,
}

impl Machine {
    /// Creates a machine with the font loaded, the program counter at the
    /// program entry point, and the RNG seeded from the system clock.
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default();
        Self::with_seed(seed)
    }

    /// Creates a machine with a caller-chosen RNG seed so that Cxkk is
    /// reproducible.
    pub fn with_seed(seed: u64) -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let font_start = FONTSET_START_ADDRESS as usize;
        memory[font_start..font_start + FONT_SPRITES.len()].copy_from_slice(&FONT_SPRITES);

        Machine {
            registers: [0; REGISTER_COUNT],
            memory,
            index: 0,
            pc: ROM_START_ADDRESS,
            stack: [0; STACK_DEPTH],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            keypad: [false; KEY_COUNT],
            frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
            current_instruction: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Loads a program image verbatim at the program entry point.
    ///
    /// Images larger than the 3584 bytes above `ROM_START_ADDRESS` are
    /// rejected without touching memory.
    ///
    /// # Arguments
    /// * `reader` a byte stream containing a ROM
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> io::Result<usize> {
        let mut image = Vec::new();
        reader.read_to_end(&mut image)?;
        if image.len() > MAX_ROM_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("ROM is {} bytes but at most {} fit", image.len(), MAX_ROM_SIZE),
            ));
        }
        let start = ROM_START_ADDRESS as usize;
        self.memory[start..start + image.len()].copy_from_slice(&image);
        info!("loaded {} byte ROM", image.len());
        Ok(image.len())
    }

    /// Runs one cycle: fetch, advance, execute, tick timers.
    ///
    /// Exactly one instruction is dispatched per invocation with no hidden
    /// batching, so a host may drive this at any rate. The program counter
    /// advances past the fetched word *before* dispatch; control-flow
    /// handlers overwrite it absolutely. The timers decrement once per
    /// invocation whatever the instruction did.
    pub fn step(&mut self) -> Result<Cycle, MachineError> {
        let word = self.fetch()?;
        self.pc += 2;
        self.draw_flag = false;

        trace!(
            "{:04X} v{:02X?} i{:04X} pc{:04X}",
            word,
            self.registers,
            self.index,
            self.pc
        );

        let cycle = match instruction::decode(word) {
            Some(handler) => handler(self)?,
            None => {
                warn!(
                    "unrecognized instruction {:#06X} at {:#05X}; skipping",
                    word,
                    self.pc - 2
                );
                Cycle::Unrecognized(word)
            }
        };

        self.tick_timers();
        Ok(cycle)
    }

    /// Returns the frame buffer if the last cycle changed it.
    pub fn get_frame(&self) -> Option<&FrameBuffer> {
        if self.draw_flag {
            Some(&self.frame_buffer)
        } else {
            None
        }
    }

    /// Whether a host audio collaborator should be producing a tone.
    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    /// Sets the pressed status of a key.
    ///
    /// # Arguments
    /// * `key` the hex keypad key (0x0..=0xF) that was pressed
    pub fn key_press(&mut self, key: u8) {
        self.keypad[key as usize] = true;
    }

    /// Unsets the pressed status of a key.
    ///
    /// # Arguments
    /// * `key` the hex keypad key (0x0..=0xF) that was released
    pub fn key_release(&mut self, key: u8) {
        self.keypad[key as usize] = false;
    }

    /// Draws one uniformly distributed byte from the machine-owned RNG.
    pub(crate) fn random_byte(&mut self) -> u8 {
        self.rng.gen()
    }

    /// Reads the two bytes at the program counter as one big-endian word and
    /// records it as the current instruction.
    fn fetch(&mut self) -> Result<u16, MachineError> {
        let pc = self.pc as usize;
        if pc + 1 >= MEMORY_SIZE {
            return Err(MachineError::AddressOutOfRange {
                address: self.pc,
                instruction: self.current_instruction,
            });
        }
        let word = u16::from(self.memory[pc]) << 8 | u16::from(self.memory[pc + 1]);
        self.current_instruction = word;
        Ok(word)
    }

    /// Decrements each nonzero timer; neither underflows past zero.
    fn tick_timers(&mut self) {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }
        if self.sound_timer > 0 {
            self.sound_timer -= 1;
        }
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
