use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use std::io::{self, Write};

/// Write the completion script for `shell` to `out`.
pub fn write_completion(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    let bin_name = cmd.get_name().to_string();
    generate(shell, cmd, bin_name, out);
}

/// Execute the completion command - generates completion script to stdout
pub fn execute(shell: Shell, cmd: &mut Command) -> Result<()> {
    write_completion(shell, cmd, &mut io::stdout());
    Ok(())
}
