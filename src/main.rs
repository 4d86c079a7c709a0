//! Lexora CLI - library catalogue client for the Lexora service

use clap::Parser;
use log::LevelFilter;

mod cli;
mod client;
mod config;
mod controller;
mod error;
mod forms;
mod models;
mod output;
mod session;

use cli::{BookCommands, Cli, Commands, GlobalOptions};
use error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// `--debug` forces debug level; otherwise `RUST_LOG`, defaulting to warnings.
fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Login { username, password } => cli::auth::login(&opts, username, password).await,
        Commands::Signup {
            username,
            email,
            password,
            registration_code,
        } => cli::auth::signup(&opts, username, email, password, registration_code).await,
        Commands::Logout => cli::auth::logout(&opts),
        Commands::Status => cli::status::run(&opts),
        Commands::Book(book_cmd) => match book_cmd {
            BookCommands::List { page } => cli::book::list(&opts, &page).await,
            BookCommands::Get { id } => cli::book::get(&opts, id).await,
            BookCommands::Add { book } => cli::book::add(&opts, book).await,
            BookCommands::Edit { id, changes } => cli::book::edit(&opts, id, &changes).await,
            BookCommands::Delete { id, page, yes } => {
                cli::book::delete(&opts, id, &page, yes).await
            }
            BookCommands::Browse { size } => cli::book::browse(&opts, size).await,
        },
        Commands::Completion { shell } => cli::completions::run(shell),
        Commands::Version => {
            println!("lexora version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
