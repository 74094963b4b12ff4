//! graphaudit - credential expiration and SSO reporting for Microsoft Graph tenants

use clap::Parser;
use log::LevelFilter;

mod audit;
mod cache;
mod cli;
mod client;
mod config;
mod error;
mod models;
mod output;

use cli::args::GlobalOptions;
use cli::{Cli, Commands};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_module("graphaudit", LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let opts = GlobalOptions::from_cli(&cli);

    match &cli.command {
        Commands::Init => cli::init::run(&opts).await,
        Commands::Status => cli::status::run(&opts),
        Commands::Version => {
            println!("graphaudit version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Credentials {
            filters,
            owners,
            flatten,
        } => cli::credentials::run(&opts, filters, *owners, *flatten).await,
        Commands::Sso { filters } => cli::sso::run(&opts, filters).await,
        Commands::FilterTest(args) => cli::filter_test::run(&opts, args).await,
    }
}
