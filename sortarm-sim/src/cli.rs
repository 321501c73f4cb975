//! Command line

use std::path::PathBuf;

use clap::Parser;

/// Run the SortArm controller against a simulated arm
#[derive(Parser, Debug)]
#[command(name = "sortarm-sim")]
#[command(version)]
#[command(about = "Run the SortArm sorting controller against a simulated arm")]
#[command(long_about = None)]
pub struct Args {
    /// Configuration file; the built-in sortarm.toml is used when omitted
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Blocks to queue at the pickup station, overriding the config file
    #[arg(short, long, value_delimiter = ',', value_name = "COLOR")]
    pub objects: Vec<String>,

    /// Scripted button press, e.g. center@5000 or center@9000:2500
    /// (can be given multiple times, overrides the config file)
    #[arg(short, long = "press", value_name = "BUTTON@MS[:HOLD]", action = clap::ArgAction::Append)]
    pub presses: Vec<String>,

    /// Simulated seconds to run before halting
    #[arg(long, value_name = "SECONDS")]
    pub max_time: Option<u64>,

    /// Start from a homed arm
    #[arg(long)]
    pub skip_homing: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args = Args::parse_from([
            "sortarm-sim",
            "--objects",
            "red,none",
            "-p",
            "center@5000",
            "-p",
            "left@9000:200",
            "--max-time",
            "30",
        ]);
        assert_eq!(args.objects, ["red", "none"]);
        assert_eq!(args.presses, ["center@5000", "left@9000:200"]);
        assert_eq!(args.max_time, Some(30));
        assert!(args.config.is_none());
        assert!(!args.skip_homing);
    }
}
