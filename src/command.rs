use std::io::{self, Write};
use std::process::ExitCode;

use clap::ValueEnum;
use thiserror::Error;
use tracing::debug;

use crate::settings::{InternetSettings, SettingsError, SettingsStore};

/// The one positional token the program accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Command {
    /// Print the enable flag and the server string
    Status,
    /// Enable the proxy
    On,
    /// Disable the proxy
    Off,
    /// Print usage
    Help,
}

/// How a dispatch ended when nothing failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    /// Bad argument shape; usage went to the error stream.
    Usage,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        match exit {
            Exit::Success => ExitCode::SUCCESS,
            Exit::Usage => ExitCode::from(1),
        }
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),
}

/// Exact, case-sensitive lookup of a command name.
pub fn lookup(name: &str) -> Option<Command> {
    Command::from_str(name, false).ok()
}

pub fn write_help(w: &mut dyn Write, program: &str) -> io::Result<()> {
    let names = Command::value_variants()
        .iter()
        .filter_map(|c| c.to_possible_value())
        .map(|v| v.get_name().to_string())
        .collect::<Vec<String>>()
        .join("|");
    writeln!(w, "usage: {} [{}]", program, names)
}

/// Prints both proxy fields.
///
/// A failed read ends the command successfully with nothing printed. This
/// keeps a never-configured account from looking broken, but it also hides
/// real failures such as a denied key; the error is only visible at debug
/// level.
pub fn write_status<S: SettingsStore>(
    w: &mut dyn Write,
    settings: &InternetSettings<S>,
) -> Result<(), CommandError> {
    let enable = match settings.get_enable() {
        Ok(enable) => enable,
        Err(e) => {
            debug!(error = %e, "status: enable flag unavailable");
            return Ok(());
        }
    };
    let server = match settings.get_server() {
        Ok(server) => server,
        Err(e) => {
            debug!(error = %e, "status: server unavailable");
            return Ok(());
        }
    };
    writeln!(w, "Enable: {}\nServer: {}", enable, server)?;
    Ok(())
}

/// Dispatches `args` (program name first) against `settings`.
///
/// Exactly one argument naming a known command is accepted; anything else
/// prints usage to `err` and returns [`Exit::Usage`]. `Err` means the
/// command itself failed and the caller should terminate.
pub fn run<S: SettingsStore>(
    args: &[String],
    settings: &InternetSettings<S>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<Exit, CommandError> {
    let program = args.first().map(String::as_str).unwrap_or("winproxy");
    let command = match args {
        [_, name] => lookup(name),
        _ => None,
    };
    let Some(command) = command else {
        write_help(err, program)?;
        return Ok(Exit::Usage);
    };

    debug!(?command, "dispatching");
    match command {
        Command::Status => write_status(out, settings)?,
        Command::On => settings.set_enable(true)?,
        Command::Off => settings.set_enable(false)?,
        Command::Help => write_help(out, program)?,
    }
    Ok(Exit::Success)
}
