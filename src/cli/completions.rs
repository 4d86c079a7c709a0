//! Static shell completions

use std::io::Write;

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::Cli;
use crate::error::Result;

/// Write the completion script for `shell` to `out`.
pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, out);
}

/// Run the completion command
pub fn run(shell: Shell) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write_completions(shell, &mut handle);
    handle.flush()?;
    Ok(())
}
