//! Converts every glTF/GLB file below a directory into an STL file next to it.

use std::{io, process::ExitCode};

use application_gltf2stl::{batch, config::USAGE, logging::init_logger, Command};
use log::error;

#[expect(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "usage is part of the command line interface"
)]
fn main() -> ExitCode {
    init_logger();

    let config = match Command::from_env() {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            print!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(error) => {
            error!("{error}");
            eprint!("{USAGE}");
            return error.into();
        }
    };

    match batch::run(&config, &mut io::stdout().lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error}");
            error.into()
        }
    }
}
