//! # Blockworld Entry Point
//!
//! Boots a world headlessly and logs how long the first mesh pass takes.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json]
//! ```

use std::{env, path::PathBuf, process::ExitCode};

fn main() -> ExitCode {
    let config_path = env::args().nth(1).map(PathBuf::from);
    match blockworld::run(config_path.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
