/// Nanoseconds between CPU cycles when a host respects the default clock.
pub const CLOCK_PERIOD_NS: u32 = 2_000_000;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

pub const MEMORY_SIZE: usize = 4096;
pub const REGISTER_COUNT: usize = 16;
pub const STACK_DEPTH: usize = 16;
pub const KEY_COUNT: usize = 16;

/// Where loaded programs begin; everything below is reserved for the
/// interpreter and the font.
pub const ROM_START_ADDRESS: u16 = 0x200;

/// The largest program image that fits between `ROM_START_ADDRESS` and the
/// end of memory.
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - ROM_START_ADDRESS as usize;

/// Where the built-in font lives (0x050..0x0A0); Fx29 points the index
/// register at glyphs relative to this address.
pub const FONTSET_START_ADDRESS: u16 = 0x050;

/// Bytes per font glyph; each glyph is an 8x5 sprite.
pub const FONT_GLYPH_SIZE: u16 = 5;

/// Sprites for the hex digits 0..F, drawn by Dxyn like any other sprite.
pub const FONT_SPRITES: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
