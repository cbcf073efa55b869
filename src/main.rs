use scrollmark::{
    cli::Cli,
    config::{Config, get_app_data_prefix},
    document::Document,
    landing::ENTERED_KEY,
    logging::{self, LogLevel},
    preferences,
    ui::reader::Reader,
};

use clap::Parser;
use eyre::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(LogLevel::from_verbosity(cli.verbose, cli.debug));

    let config = match &cli.config {
        Some(path) => Config::load_from(path.clone())?,
        None => match Config::new() {
            Ok(config) => config,
            Err(err) => {
                logging::warn(format!("Could not load configuration: {err}"));
                logging::warn("Starting with default settings");
                Config::default()
            }
        },
    };

    let document = Document::load(&cli.document)?;
    logging::info(format!(
        "Loaded {} ({} sections, {} outline entries)",
        document.path,
        document.sections.len(),
        document.outline.len()
    ));

    if cli.dump {
        print!("{}", document.dump());
        return Ok(());
    }

    let store = preferences::open_default();
    if cli.reset_landing {
        store.set(ENTERED_KEY, "false");
    }

    // The reader owns the screen from here on.
    match get_app_data_prefix() {
        Ok(prefix) => {
            if let Err(err) = logging::log_to_file(&prefix.join("scrollmark.log")) {
                logging::warn(format!("Could not open log file: {err}"));
            }
        }
        Err(err) => logging::warn(format!("No log file: {err}")),
    }

    let mut reader = Reader::new(config, document, store)?;
    let result = reader.run();
    logging::close_file();
    result
}
