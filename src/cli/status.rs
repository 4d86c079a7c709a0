//! Status command implementation

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::output::formatters::{format_expiry, format_local};
use crate::output::json;
use crate::session::{Capability, Session, gate};

/// What the CLI knows about the signed-in user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub can_manage_books: bool,
}

impl SessionSummary {
    pub fn from_session(session: &Session) -> Self {
        let identity = session.identity();
        Self {
            authenticated: session.is_authenticated(),
            username: identity.map(|i| i.username.clone()),
            email: identity.map(|i| i.email.clone()).filter(|e| !e.is_empty()),
            roles: session.roles().iter().cloned().collect(),
            expires_at: identity.and(session.expires_at()),
            can_manage_books: gate::session_allows(session, Capability::ManageBooks),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    session: SessionSummary,
    config_file: String,
    config_file_exists: bool,
    session_file: String,
    api_base_url: String,
}

/// Run the status command to display session and configuration status
pub fn run(opts: &GlobalOptions) -> crate::error::Result<()> {
    let ctx = CommandContext::new(opts)?;
    let session = ctx.session.current();

    let report = StatusReport {
        session: SessionSummary::from_session(&session),
        config_file: ctx.config_path.display().to_string(),
        config_file_exists: ctx.config_path.exists(),
        session_file: ctx.session.storage().path().display().to_string(),
        api_base_url: ctx.client.base_url().to_string(),
    };

    if ctx.format == OutputFormat::Json {
        println!("{}", json::format_json(&report)?);
        return Ok(());
    }

    println!("{}\n", "Lexora Status".bold());

    if report.config_file_exists {
        println!("Config file: {}", report.config_file.cyan());
    } else {
        println!(
            "Config file: {} {}",
            report.config_file.cyan(),
            "(not found, using defaults)".dimmed()
        );
    }
    println!("API: {}", report.api_base_url.cyan());
    println!();

    let summary = &report.session;
    if summary.authenticated {
        let who = match summary.email {
            Some(ref email) => format!("{} <{}>", summary.username.as_deref().unwrap_or_default(), email),
            None => summary.username.clone().unwrap_or_default(),
        };
        println!("{} Signed in as {}", "✓".green(), who.bold());
        println!("  Roles: {}", summary.roles.join(", "));

        if let Some(expires_at) = summary.expires_at {
            println!(
                "  Session {} ({})",
                format_expiry(expires_at, Utc::now()),
                format_local(expires_at)
            );
        }

        if summary.can_manage_books {
            println!("{} Can add, edit and delete books", "✓".green());
        } else {
            println!("{} Read-only access (librarian role required to manage books)", "○".dimmed());
        }
    } else {
        println!("{} Not signed in", "○".dimmed());
        println!("  → Run 'lexora login' to sign in");
    }
    println!();

    Ok(())
}
