use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "scrollmark",
    version,
    about = "Read long single-page HTML notes in the terminal, with a live outline and progress.",
    long_about = None
)]
pub struct Cli {
    /// Print the outline and section list, then exit
    #[clap(short, long)]
    pub dump: bool,

    /// Show the landing page again on the next start
    #[clap(long)]
    pub reset_landing: bool,

    /// Use a specific configuration file
    #[clap(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Enable debug output
    #[clap(long)]
    pub debug: bool,

    /// HTML document to open
    #[clap(name = "DOCUMENT")]
    pub document: PathBuf,
}
