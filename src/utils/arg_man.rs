use crate::fs::consts::MAX_OBJECTS;
use clap::Parser;
use std::path::PathBuf;

/// Shell over a minifs image file.
#[derive(Parser, Debug)]
#[command(name = "minifs-emu", version, about)]
pub struct Args {
    /// Image file; created if missing.
    pub image: PathBuf,

    /// Format the image before starting.
    #[arg(long)]
    pub format: bool,

    /// Block count used by --format (3..=64).
    #[arg(
        long,
        default_value_t = MAX_OBJECTS,
        value_parser = clap::value_parser!(u64).range(3..=64)
    )]
    pub blocks: u64,

    /// Run the commands in FILE instead of reading stdin.
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,
}

pub fn handle_prog_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["minifs-emu", "disk.img"]).unwrap();
        assert_eq!(args.image, PathBuf::from("disk.img"));
        assert!(!args.format);
        assert_eq!(args.blocks, MAX_OBJECTS);
        assert!(args.script.is_none());
    }

    #[test]
    fn all_flags() {
        let args = Args::try_parse_from([
            "minifs-emu",
            "--format",
            "--blocks",
            "16",
            "--script",
            "run.txt",
            "disk.img",
        ])
        .unwrap();
        assert!(args.format);
        assert_eq!(args.blocks, 16);
        assert_eq!(args.script, Some(PathBuf::from("run.txt")));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Args::try_parse_from(["minifs-emu"]).is_err());
        assert!(Args::try_parse_from(["minifs-emu", "--blocks", "65", "d.img"]).is_err());
        assert!(Args::try_parse_from(["minifs-emu", "--blocks", "2", "d.img"]).is_err());
    }
}
