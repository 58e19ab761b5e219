use anyhow::Result;
use clap::Parser;
use msdf_text::cli::{self, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI --log-level takes precedence over RUST_LOG
    msdf_text::debug::init_log_bridge(cli.log_level, cli.log_file.as_deref());
    log::info!("Starting msdf-text {}", msdf_text::VERSION);

    let result = cli::run(cli);
    log::logger().flush();

    if let Err(ref e) = result {
        eprintln!("msdf-text: error: {e:#}");
        std::process::exit(1);
    }
    result
}
