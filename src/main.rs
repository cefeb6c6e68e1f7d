use clap::Parser;
use velotweet::cli::{Config, Runner, die};

#[tokio::main]
async fn main() {
    let config = Config::parse();

    env_logger::Builder::new()
        .filter_level(config.verbosity().log_level_filter())
        .init();

    let runner = Runner::new(config).unwrap_or_else(|err| die(1, &err.to_string()));
    if let Err(err) = runner.run().await {
        die(1, &err.to_string());
    }
}
