use std::fs::{self, OpenOptions};

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use todoline::cli::commands::Cli;
use todoline::cli::handlers;
use todoline::io::config_io::log_file_path;
use todoline::keys::default_bindings_toml;

fn main() {
    let cli = Cli::parse();

    if cli.show_default_bindings {
        print!("{}", default_bindings_toml());
        return;
    }

    init_logging();

    if let Err(e) = handlers::dispatch(cli) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// Append to the log file in the cache directory. The terminal belongs to the
/// UI, so nothing is logged when the file can't be opened.
fn init_logging() {
    let path = log_file_path();
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = OpenOptions::new().create(true).append(true).open(&path) {
        let _ = WriteLogger::init(LevelFilter::Info, log_config, log_file);
    }
}
