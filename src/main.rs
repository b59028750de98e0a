use std::process::ExitCode;

use cellfield::{viewer, ViewerConfig};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => ViewerConfig::load(&path).unwrap_or_else(|e| {
            log::warn!("could not load {}: {}, using defaults", path, e);
            ViewerConfig::default()
        }),
        None => ViewerConfig::default(),
    };

    match viewer::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
