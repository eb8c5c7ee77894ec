use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::error;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use vm8_core::constants::CLOCK_PERIOD_NS;
use vm8_core::Machine;
use vm8_display::Display;

use crate::keymap::keymap;

/// Drives the machine: loads the ROM, pumps SDL events into the keypad,
/// runs one cycle per tick of the default clock, and renders whenever a
/// cycle changed the framebuffer. Fatal machine errors end the run;
/// unrecognized instructions are already logged by the core and skipped.
pub fn run(rom: PathBuf) -> Result<(), String> {
    let mut machine = Machine::new();

    let file = File::open(&rom).map_err(|e| format!("unable to open {}: {}", rom.display(), e))?;
    let mut reader = BufReader::new(file);
    machine
        .load_rom(&mut reader)
        .map_err(|e| format!("unable to load {}: {}", rom.display(), e))?;

    let sdl = sdl2::init()?;
    let mut display = Display::new(&sdl)?;
    let mut events = sdl.event_pump()?;

    let cycle_time = Duration::new(0, CLOCK_PERIOD_NS);
    let mut last_cycle = Instant::now();

    'event: loop {
        if let Some(frame) = machine.get_frame() {
            display.render(frame)?;
        }

        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        machine.key_press(kc);
                    }
                }
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        machine.key_release(kc);
                    }
                }
                _ => {}
            }
        }

        if let Err(e) = machine.step() {
            error!("halting: {}", e);
            break;
        }

        // Respect the default clock speed
        let current_time = Instant::now();
        let elapsed_cycle_time = current_time - last_cycle;
        if cycle_time > elapsed_cycle_time {
            std::thread::sleep(cycle_time - elapsed_cycle_time);
        }
        last_cycle = current_time;
    }

    Ok(())
}
