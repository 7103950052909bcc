use minifs::context::Context;
use minifs::utils::exit_codes::ExitCode;
use minifs::utils::{arg_man, file_man, tui};
use std::io;

fn run() -> anyhow::Result<()> {
    let args = arg_man::handle_prog_args();
    let mut context = Context::new();
    file_man::handle_fs(&args, &mut context)?;

    match &args.script {
        Some(script) => tui::run_script(script, &mut context, &mut io::stdout()),
        None => tui::handle_app_loop(&mut context),
    }
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(ExitCode::Error.into());
    }
    std::process::exit(ExitCode::Success.into());
}
