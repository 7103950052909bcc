use crate::commands::Registry;
use crate::context::Context;
use anyhow::{Context as _, Result};
use colored::Colorize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

fn write_greet() {
    println!(
        "{} - {}",
        "minifs shell".green(),
        env!("CARGO_PKG_VERSION").yellow()
    );
}

fn write_prefix(context: &Context) {
    eprint!("{} > ", context.cwd().display().cyan());
}

/// Reads commands from stdin until `exit` or end of input.
pub fn handle_app_loop(context: &mut Context) -> Result<()> {
    let stdin = io::stdin();
    let registry = Registry::new();
    let mut stdout = io::stdout();

    write_greet();
    while context.is_running() {
        write_prefix(context);
        let mut user_input = String::new();
        if stdin.lock().read_line(&mut user_input)? == 0 {
            break;
        }
        registry.run_line(&user_input, context, &mut stdout)?;
        stdout.flush()?;
    }
    Ok(())
}

/// Runs every line of `path` without prompting.
pub fn run_script(path: &Path, context: &mut Context, out: &mut dyn Write) -> Result<()> {
    let file =
        File::open(path).with_context(|| format!("cannot open script {}", path.display()))?;
    let registry = Registry::new();
    for line in BufReader::new(file).lines() {
        registry.run_line(&line?, context, out)?;
        if !context.is_running() {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::consts::MAX_OBJECTS;

    #[test]
    fn script_runs_against_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = Context::new();
        ctx.open_fs(dir.path().join("s.img")).unwrap();
        ctx.format_fs(MAX_OBJECTS).unwrap();

        let script = dir.path().join("cmds.txt");
        std::fs::write(&script, "mkdir a\ncd a\nwrite b text\npwd\nexit\nls\n").unwrap();
        let mut out = Vec::new();
        run_script(&script, &mut ctx, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "OK\nOK\nOK\n/a\n");
    }

    #[test]
    fn missing_script_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let err = run_script(&dir.path().join("none"), &mut Context::new(), &mut out).unwrap_err();
        assert!(err.to_string().contains("cannot open script"));
    }
}
