//! One handler per operation in the instruction set.
//!
//! Every handler reads its operands from `machine.current_instruction`
//! through the [`Opcode`] accessors and mutates the machine in place. The
//! driver has already advanced the program counter past the word being
//! executed, so control flow assigns `pc` absolutely and skips add 2 more.
//!
//! Flag ordering contract: wherever an instruction writes both VF and a
//! data register, the VF write happens first, so that an instruction whose
//! `x` operand is 0xF ends with its data result in VF rather than a
//! clobbered flag.

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONTSET_START_ADDRESS, FONT_GLYPH_SIZE, MEMORY_SIZE,
    REGISTER_COUNT, STACK_DEPTH,
};
use crate::error::MachineError;
use crate::machine::{Cycle, Machine};
use crate::opcode::Opcode;

/// 00E0: turn every framebuffer cell off
pub fn clr(machine: &mut Machine) -> Result<Cycle, MachineError> {
    machine.frame_buffer = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    machine.draw_flag = true;
    Ok(Cycle::Executed)
}

/// 00EE: PC = STACK.pop()
pub fn rts(machine: &mut Machine) -> Result<Cycle, MachineError> {
    if machine.sp == 0 {
        return Err(MachineError::StackUnderflow {
            instruction: machine.current_instruction,
        });
    }
    machine.sp -= 1;
    machine.pc = machine.stack[machine.sp as usize];
    Ok(Cycle::Executed)
}

/// 1nnn: PC = nnn
pub fn jump(machine: &mut Machine) -> Result<Cycle, MachineError> {
    machine.pc = machine.current_instruction.nnn();
    Ok(Cycle::Executed)
}

/// 2nnn: STACK.push(PC); PC = nnn
pub fn call(machine: &mut Machine) -> Result<Cycle, MachineError> {
    if machine.sp as usize == STACK_DEPTH {
        return Err(MachineError::StackOverflow {
            instruction: machine.current_instruction,
        });
    }
    machine.stack[machine.sp as usize] = machine.pc;
    machine.sp += 1;
    machine.pc = machine.current_instruction.nnn();
    Ok(Cycle::Executed)
}

/// 3xkk: if Vx == kk then PC += 2
pub fn ske(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    if machine.registers[op.x() as usize] == op.kk() {
        machine.pc += 2;
    }
    Ok(Cycle::Executed)
}

/// 4xkk: if Vx != kk then PC += 2
pub fn skne(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    if machine.registers[op.x() as usize] != op.kk() {
        machine.pc += 2;
    }
    Ok(Cycle::Executed)
}

/// 5xy0: if Vx == Vy then PC += 2
pub fn skre(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    if machine.registers[op.x() as usize] == machine.registers[op.y() as usize] {
        machine.pc += 2;
    }
    Ok(Cycle::Executed)
}

/// 6xkk: Vx = kk
pub fn load(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    machine.registers[op.x() as usize] = op.kk();
    Ok(Cycle::Executed)
}

/// 7xkk: Vx += kk, wrapping; the flag is untouched
pub fn add(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    let x = op.x() as usize;
    machine.registers[x] = machine.registers[x].wrapping_add(op.kk());
    Ok(Cycle::Executed)
}

/// 8xy0: Vx = Vy
pub fn mv(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    machine.registers[op.x() as usize] = machine.registers[op.y() as usize];
    Ok(Cycle::Executed)
}

/// 8xy1: Vx |= Vy
pub fn or(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    machine.registers[op.x() as usize] |= machine.registers[op.y() as usize];
    Ok(Cycle::Executed)
}

/// 8xy2: Vx &= Vy
pub fn and(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    machine.registers[op.x() as usize] &= machine.registers[op.y() as usize];
    Ok(Cycle::Executed)
}

/// 8xy3: Vx ^= Vy
pub fn xor(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    machine.registers[op.x() as usize] ^= machine.registers[op.y() as usize];
    Ok(Cycle::Executed)
}

/// 8xy4: Vx += Vy, wrapping; VF = carry
pub fn addr(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    let x = op.x() as usize;
    let (sum, carry) = machine.registers[x].overflowing_add(machine.registers[op.y() as usize]);
    machine.registers[0xF] = carry as u8;
    machine.registers[x] = sum;
    Ok(Cycle::Executed)
}

/// 8xy5: Vx -= Vy, wrapping; VF = 1 iff Vx was strictly greater
pub fn sub(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    let x = op.x() as usize;
    let vx = machine.registers[x];
    let vy = machine.registers[op.y() as usize];
    machine.registers[0xF] = (vx > vy) as u8;
    machine.registers[x] = vx.wrapping_sub(vy);
    Ok(Cycle::Executed)
}

/// 8xy6: VF = the bit shifted out; Vx >>= 1
pub fn shr(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    let x = op.x() as usize;
    let vx = machine.registers[x];
    machine.registers[0xF] = vx & 0x1;
    machine.registers[x] = vx >> 1;
    Ok(Cycle::Executed)
}

/// 8xy7: Vx = Vy - Vx, wrapping; VF = 1 iff Vy was strictly greater
pub fn subn(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    let x = op.x() as usize;
    let vx = machine.registers[x];
    let vy = machine.registers[op.y() as usize];
    machine.registers[0xF] = (vy > vx) as u8;
    machine.registers[x] = vy.wrapping_sub(vx);
    Ok(Cycle::Executed)
}

/// 8xyE: VF = the bit shifted out; Vx <<= 1
pub fn shl(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    let x = op.x() as usize;
    let vx = machine.registers[x];
    machine.registers[0xF] = (vx >> 7) & 0x1;
    machine.registers[x] = vx << 1;
    Ok(Cycle::Executed)
}

/// 9xy0: if Vx != Vy then PC += 2
pub fn skrne(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    if machine.registers[op.x() as usize] != machine.registers[op.y() as usize] {
        machine.pc += 2;
    }
    Ok(Cycle::Executed)
}

/// Annn: I = nnn
pub fn loadi(machine: &mut Machine) -> Result<Cycle, MachineError> {
    machine.index = machine.current_instruction.nnn();
    Ok(Cycle::Executed)
}

/// Bnnn: PC = V0 + nnn
pub fn jumpi(machine: &mut Machine) -> Result<Cycle, MachineError> {
    machine.pc = u16::from(machine.registers[0x0]) + machine.current_instruction.nnn();
    Ok(Cycle::Executed)
}

/// Cxkk: Vx = random byte & kk
pub fn rand(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    machine.registers[op.x() as usize] = machine.random_byte() & op.kk();
    Ok(Cycle::Executed)
}

/// Dxyn: XOR an 8-wide, n-tall sprite at memory[I..I+n) onto the screen at
/// (Vx % 64, Vy % 32); VF = 1 iff any lit pixel was toggled off.
///
/// Each pixel wraps around both screen edges independently, so a sprite can
/// straddle a border mid-draw. Sprite rows outside memory are refused.
pub fn draw(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    let height = op.n() as usize;
    let sprite_start = machine.index as usize;
    if sprite_start + height > MEMORY_SIZE {
        return Err(MachineError::AddressOutOfRange {
            address: machine.index.wrapping_add(op.n() as u16),
            instruction: op,
        });
    }

    let start_x = machine.registers[op.x() as usize] as usize % DISPLAY_WIDTH;
    let start_y = machine.registers[op.y() as usize] as usize % DISPLAY_HEIGHT;

    machine.registers[0xF] = 0;
    for row in 0..height {
        let sprite_byte = machine.memory[sprite_start + row];
        let y = (start_y + row) % DISPLAY_HEIGHT;
        for col in 0..8 {
            // most significant bit is the leftmost pixel
            if sprite_byte & (0x80 >> col) == 0 {
                continue;
            }
            let x = (start_x + col) % DISPLAY_WIDTH;
            if machine.frame_buffer[y][x] == 1 {
                machine.registers[0xF] = 1;
            }
            machine.frame_buffer[y][x] ^= 1;
        }
    }
    machine.draw_flag = true;
    Ok(Cycle::Executed)
}

/// Ex9E: if the key Vx names is down then PC += 2
pub fn skpr(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    if machine.keypad[machine.registers[op.x() as usize] as usize] {
        machine.pc += 2;
    }
    Ok(Cycle::Executed)
}

/// ExA1: if the key Vx names is up then PC += 2
pub fn skup(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    if !machine.keypad[machine.registers[op.x() as usize] as usize] {
        machine.pc += 2;
    }
    Ok(Cycle::Executed)
}

/// Fx07: Vx = DT
pub fn moved(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    machine.registers[op.x() as usize] = machine.delay_timer;
    Ok(Cycle::Executed)
}

/// Fx0A: suspend until a key is down, then Vx = that key
///
/// When no key is down the program counter is rewound so the driver retries
/// this instruction on the next cycle; the suspension is reported as
/// [`Cycle::AwaitingKey`] instead of blocking, keeping the engine free of
/// its own I/O.
pub fn keyd(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    match machine.keypad.iter().position(|&pressed| pressed) {
        Some(key) => {
            machine.registers[op.x() as usize] = key as u8;
            Ok(Cycle::Executed)
        }
        None => {
            machine.pc -= 2;
            Ok(Cycle::AwaitingKey)
        }
    }
}

/// Fx15: DT = Vx
pub fn loads(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    machine.delay_timer = machine.registers[op.x() as usize];
    Ok(Cycle::Executed)
}

/// Fx18: ST = Vx
pub fn ld(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    machine.sound_timer = machine.registers[op.x() as usize];
    Ok(Cycle::Executed)
}

/// Fx1E: I += Vx; no flag, and I may legally run past 0xFFF until a
/// downstream access checks it
pub fn addi(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    machine.index = machine
        .index
        .wrapping_add(u16::from(machine.registers[op.x() as usize]));
    Ok(Cycle::Executed)
}

/// Fx29: I = the font glyph for the hex digit Vx
pub fn ldspr(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    machine.index =
        FONTSET_START_ADDRESS + u16::from(machine.registers[op.x() as usize]) * FONT_GLYPH_SIZE;
    Ok(Cycle::Executed)
}

/// Fx33: memory[I..I+3] = the decimal digits of Vx, hundreds first
pub fn bcd(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let op = machine.current_instruction;
    let start = machine.index as usize;
    if start + 3 > MEMORY_SIZE {
        return Err(MachineError::AddressOutOfRange {
            address: machine.index.wrapping_add(2),
            instruction: op,
        });
    }
    let value = machine.registers[op.x() as usize];
    machine.memory[start] = value / 100;
    machine.memory[start + 1] = value / 10 % 10;
    machine.memory[start + 2] = value % 10;
    Ok(Cycle::Executed)
}

/// Fx55: memory[I..I+16) = V0..VF, truncated at the end of memory
pub fn stor(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let start = (machine.index as usize).min(MEMORY_SIZE);
    let count = REGISTER_COUNT.min(MEMORY_SIZE - start);
    machine.memory[start..start + count].copy_from_slice(&machine.registers[..count]);
    Ok(Cycle::Executed)
}

/// Fx65: V0..VF = memory[I..I+16), truncated at the end of memory
pub fn read(machine: &mut Machine) -> Result<Cycle, MachineError> {
    let start = (machine.index as usize).min(MEMORY_SIZE);
    let count = REGISTER_COUNT.min(MEMORY_SIZE - start);
    machine.registers[..count].copy_from_slice(&machine.memory[start..start + count]);
    Ok(Cycle::Executed)
}
