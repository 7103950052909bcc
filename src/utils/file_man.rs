use crate::context::Context;
use crate::utils::arg_man::Args;
use anyhow::{Context as _, Result, bail};
use colored::Colorize;
use log::info;

/// Opens the image named on the command line, formatting it when asked.
pub fn handle_fs(args: &Args, context: &mut Context) -> Result<()> {
    let path = args.image.as_path();
    if path.is_dir() {
        bail!(
            "path points to a directory, cannot open it as an image: {}",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create directory {}", parent.display()))?;
        }
    }

    let mounted = context.open_fs(path)?;
    if args.format {
        context.format_fs(args.blocks)?;
        info!("formatted {} at startup", path.display());
    } else if mounted {
        eprintln!("Opened existing image: {}", path.display());
    } else {
        eprintln!(
            "{} {} holds no filesystem yet, run `format`",
            "note:".yellow(),
            path.display()
        );
    }
    Ok(())
}
