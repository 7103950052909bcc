use crate::context::Context;
use std::io::Write;

// pwd: prints the absolute path of the working directory, kept as the
// chain of directories `cd` walked through.
pub fn handle_argv(
    _argv: &[&str],
    context: &mut Context,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    writeln!(out, "{}", context.cwd().display())?;
    Ok(())
}
