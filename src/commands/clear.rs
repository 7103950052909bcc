//! `clear` command.
//!
//! Sends ESC[2J (erase entire screen) and ESC[H (cursor home). Extra
//! arguments are ignored and filesystem state is untouched.

use crate::context::Context;
use std::io::Write;

pub fn handle_argv(
    _argv: &[&str],
    _context: &mut Context,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    write!(out, "\x1B[2J\x1B[H")?;
    out.flush()?;
    Ok(())
}
