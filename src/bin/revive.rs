use clap::Parser;
use revive_branch_api::cli::Cli;
use revive_branch_api::{config, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    logging::init_subscriber(&config::config().logging);

    let cli = Cli::parse();

    if let Err(e) = revive_branch_api::cli::run(cli).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
