use clap::Parser;
use fire_age::api::{Cli, run};
use fire_age::logging::setup_logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging(&cli.log_level, cli.log_json);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
