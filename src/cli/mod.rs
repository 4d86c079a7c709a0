//! CLI command definitions and handlers

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod auth;
pub mod book;
pub mod completions;
pub mod context;
pub mod status;

pub use args::{BookChangeArgs, GlobalOptions, NewBookArgs, OutputFormat, PageArgs};
pub use context::CommandContext;

/// Lexora CLI - library catalogue client for the Lexora service
#[derive(Parser, Debug)]
#[command(name = "lexora")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "LEXORA_FORMAT",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: Option<OutputFormat>,

    /// Override config file location
    #[arg(long, global = true, env = "LEXORA_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Override the Lexora API host (e.g. http://localhost:8080)
    #[arg(long, global = true, env = "LEXORA_API_HOST", hide_env = true)]
    pub api_host: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "LEXORA_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store the session
    Login {
        /// Username (prompted for when omitted)
        #[arg(long, short = 'u')]
        username: Option<String>,

        /// Password (prompted for when omitted)
        #[arg(long, short = 'p', env = "LEXORA_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Register a new account
    #[command(after_help = "EXAMPLES:\n  \
            lexora signup --username alice --email alice@example.com\n  \
            lexora signup -u bob -e bob@example.com --registration-code LIB-2024")]
    Signup {
        #[arg(long, short = 'u')]
        username: String,

        #[arg(long, short = 'e')]
        email: String,

        /// Password (prompted for when omitted)
        #[arg(long, short = 'p', env = "LEXORA_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Librarian registration code
        #[arg(long)]
        registration_code: Option<String>,
    },

    /// Sign out and remove the stored session
    Logout,

    /// Show session and configuration status
    Status,

    /// Browse and manage books
    #[command(subcommand)]
    Book(BookCommands),

    /// Generate shell completions
    #[command(after_help = "\
  bash:   lexora completion bash > /etc/bash_completion.d/lexora
  zsh:    lexora completion zsh > \"${fpath[1]}/_lexora\"
  fish:   lexora completion fish > ~/.config/fish/completions/lexora.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Display version information
    Version,
}

/// Book subcommands
#[derive(Subcommand, Debug)]
pub enum BookCommands {
    /// List one page of books
    #[command(visible_alias = "ls")]
    List {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Show a single book
    Get {
        /// Book ID
        id: i64,
    },

    /// Add a book (librarians only)
    #[command(after_help = "EXAMPLES:\n  \
            lexora book add --title Dune --author \"Frank Herbert\" \\\n      \
            --isbn 978-0-441-01359-3 --published-date 1965-08-01")]
    Add {
        #[command(flatten)]
        book: NewBookArgs,
    },

    /// Change fields of a book (librarians only)
    #[command(after_help = "EXAMPLES:\n  \
            lexora book edit 42 --title \"Dune Messiah\"\n  \
            lexora book edit 42 --published-date 1969-10-15")]
    Edit {
        /// Book ID
        id: i64,

        #[command(flatten)]
        changes: BookChangeArgs,
    },

    /// Delete a book (librarians only)
    #[command(after_help = "EXAMPLES:\n  \
            lexora book delete 42                # With confirmation\n  \
            lexora book delete 42 --page 2 --yes # Stay on page 3 (or step back)")]
    Delete {
        /// Book ID
        id: i64,

        #[command(flatten)]
        page: PageArgs,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Page through the catalogue interactively
    Browse {
        /// Books per page
        #[arg(long, short = 's')]
        size: Option<usize>,
    },
}
