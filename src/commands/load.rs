use super::{Registry, Status};
use crate::context::Context;
use anyhow::bail;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};

/// Nested `load` calls deeper than this are refused.
const MAX_LOAD_DEPTH: usize = 8;

/// load s1
/// Executes commands from a host file, one per line, with their normal
/// outputs. `#` lines and blank lines are skipped; `exit` stops the script.
///
/// Outputs:
///   OK             - after the last command ran
///   FILE NOT FOUND - if the file cannot be opened
pub fn handle_argv(
    argv: &[&str],
    context: &mut Context,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let [host_path] = argv else {
        return Err(Status::FileNotFound.into());
    };
    let file = File::open(host_path).map_err(|_| Status::FileNotFound)?;
    if context.load_depth >= MAX_LOAD_DEPTH {
        bail!("load nested deeper than {MAX_LOAD_DEPTH} levels");
    }

    let registry = Registry::new();
    context.load_depth += 1;
    let result = run_lines(&registry, BufReader::new(file), context, out);
    context.load_depth -= 1;
    result?;

    if context.is_running() {
        writeln!(out, "OK")?;
    }
    Ok(())
}

fn run_lines(
    registry: &Registry,
    reader: impl BufRead,
    context: &mut Context,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    for line in reader.lines() {
        registry.run_line(&line?, context, out)?;
        if !context.is_running() {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::commands::test_support::Session;

    #[test]
    fn runs_script_lines() {
        let mut s = Session::formatted();
        let script = s.host_path("setup.txt");
        std::fs::write(
            &script,
            "# setup\nmkdir etc\n\nwrite etc/motd welcome\ncat etc/motd\n",
        )
        .unwrap();
        assert_eq!(s.run(&format!("load {script}")), "OK\nOK\nwelcome\nOK\n");
        assert_eq!(s.run("ls etc"), "FILE: motd\n");
    }

    #[test]
    fn exit_stops_the_script() {
        let mut s = Session::formatted();
        let script = s.host_path("stop.txt");
        std::fs::write(&script, "mkdir a\nexit\nmkdir b\n").unwrap();
        assert_eq!(s.run(&format!("load {script}")), "OK\n");
        assert!(!s.ctx.is_running());
    }

    #[test]
    fn self_loading_script_is_bounded() {
        let mut s = Session::formatted();
        let script = s.host_path("loop.txt");
        std::fs::write(&script, format!("load {script}\n")).unwrap();
        let output = s.run(&format!("load {script}"));
        assert!(output.contains("nested deeper"));
    }

    #[test]
    fn missing_script() {
        let mut s = Session::formatted();
        let script = s.host_path("absent.txt");
        assert_eq!(s.run(&format!("load {script}")), "FILE NOT FOUND\n");
    }
}
