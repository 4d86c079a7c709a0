//! Sign-in, sign-up and sign-out commands

use colored::Colorize;
use dialoguer::{Input, Password, theme::ColorfulTheme};
use log::debug;

use crate::cli::args::GlobalOptions;
use crate::cli::status::SessionSummary;
use crate::cli::{CommandContext, OutputFormat};
use crate::client::AuthApi;
use crate::error::{Error, Result};
use crate::forms::{SigninForm, SignupForm};
use crate::output::json;

pub const LOGIN_FAILED: &str = "Login failed. Please try again.";
pub const SIGNUP_FAILED: &str = "Signup failed. Please try again.";

/// Any server-side failure becomes the server's message or `fallback`.
fn remote_failure(fallback: &'static str) -> impl Fn(Error) -> Error {
    move |err| match err {
        Error::Api(_) => Error::Failed(err.user_message(fallback)),
        other => other,
    }
}

/// Run the login command
pub async fn login(
    opts: &GlobalOptions,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let theme = ColorfulTheme::default();

    let username = match username {
        Some(username) => username,
        None => Input::<String>::with_theme(&theme)
            .with_prompt("Username")
            .interact_text()?,
    };
    let password = match password {
        Some(password) => password,
        None => Password::with_theme(&theme)
            .with_prompt("Password")
            .interact()?,
    };

    let request = SigninForm { username, password }.validate()?;
    let response = ctx
        .client
        .sign_in(&request)
        .await
        .map_err(remote_failure(LOGIN_FAILED))?;

    let (token, identity) = response.into_parts();
    let session = ctx.session.login(&token, Some(identity))?;
    debug!("Session stored at {}", ctx.session.storage().path().display());

    // First sign-in writes a config so the host used here sticks.
    if !ctx.config_path.exists() {
        let mut config = ctx.config.clone();
        config.api_host = opts.api_host.clone().or(config.api_host);
        config.save_to(&ctx.config_path)?;
        eprintln!(
            "{} Configuration saved to: {}",
            "✓".green(),
            ctx.config_path.display()
        );
    }

    let summary = SessionSummary::from_session(&session);
    match ctx.format {
        OutputFormat::Json => println!("{}", json::format_json(&summary)?),
        OutputFormat::Pretty | OutputFormat::Table => {
            println!(
                "{} Signed in as {}{}",
                "✓".green(),
                summary.username.as_deref().unwrap_or_default().bold(),
                if summary.can_manage_books {
                    " (librarian)".cyan().to_string()
                } else {
                    String::new()
                }
            );
        }
    }

    Ok(())
}

/// Run the signup command
pub async fn signup(
    opts: &GlobalOptions,
    username: String,
    email: String,
    password: Option<String>,
    registration_code: Option<String>,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let password = match password {
        Some(password) => password,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    let request = SignupForm {
        username,
        email,
        password,
        registration_code,
    }
    .validate()?;

    let response = ctx
        .client
        .sign_up(&request)
        .await
        .map_err(remote_failure(SIGNUP_FAILED))?;

    match ctx.format {
        OutputFormat::Json => println!("{}", json::format_json(&response)?),
        OutputFormat::Pretty | OutputFormat::Table => {
            println!("{} {}", "✓".green(), response.message);
            println!("  → Run {} to sign in", "lexora login".cyan());
        }
    }

    Ok(())
}

/// Run the logout command. Succeeds whether or not a session existed.
pub fn logout(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let was_signed_in = ctx.session.current().is_authenticated();

    ctx.session.logout()?;

    if was_signed_in {
        println!("{} Signed out.", "✓".green());
    } else {
        println!("{} Not signed in.", "○".dimmed());
    }
    Ok(())
}
