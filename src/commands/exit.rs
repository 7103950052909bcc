use crate::context::Context;
use std::io::Write;

/// Ends the session after the current line; a running `load` stops too.
pub fn handle_argv(
    _argv: &[&str],
    context: &mut Context,
    _out: &mut dyn Write,
) -> anyhow::Result<()> {
    context.stop();
    Ok(())
}
