use std::path::PathBuf;
use std::process;

mod keymap;
mod run;

fn main() {
    env_logger::init();

    let rom = match std::env::args_os().nth(1) {
        Some(path) => PathBuf::from(path),
        None => {
            eprintln!("usage: vm8 <rom>");
            process::exit(2);
        }
    };

    if let Err(e) = run::run(rom) {
        eprintln!("{}", e);
        process::exit(1);
    }
}
