use std::env;
use std::io::{self, IsTerminal};
use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

use winproxy::InternetSettings;
use winproxy::command;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    let args = env::args_os()
        .map(|a| a.to_string_lossy().into_owned())
        .collect::<Vec<String>>();
    let settings = InternetSettings::current_user();

    let stdout = io::stdout();
    let stderr = io::stderr();
    match command::run(&args, &settings, &mut stdout.lock(), &mut stderr.lock()) {
        Ok(exit) => exit.into(),
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
