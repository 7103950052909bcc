use super::{Status, not_found_as};
use crate::context::Context;
use crate::fs::path::resolve_parent;
use std::io::Write;

/// touch f1
/// Creates an empty regular file.
/// Outputs: OK | PATH NOT FOUND | EXIST | NO SPACE | DIRECTORY FULL | TOO MANY OBJECTS |
///          INVALID NAME
pub fn handle_argv(
    argv: &[&str],
    context: &mut Context,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let [target] = argv else {
        return Err(Status::PathNotFound.into());
    };
    let fs = context.fs()?;
    let (parent, name) = resolve_parent(fs, context.cwd(), target)
        .map_err(|e| not_found_as(e, Status::PathNotFound))?;
    fs.create(parent, name)?;
    writeln!(out, "OK")?;
    Ok(())
}
