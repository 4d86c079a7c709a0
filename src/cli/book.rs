//! Book command implementations
//!
//! Every command drives a [`BookListController`]; the controller owns paging
//! and refresh decisions, this module only gathers input and prints.

use std::fmt;

use colored::Colorize;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use log::debug;

use crate::cli::args::GlobalOptions;
use crate::cli::{BookChangeArgs, CommandContext, NewBookArgs, OutputFormat, PageArgs};
use crate::client::models::Book;
use crate::client::{BookApi, LibraryClient};
use crate::controller::{
    ADD_FAILED, BookListController, DELETE_FAILED, FETCH_FAILED, UPDATE_FAILED, UpdateOutcome,
};
use crate::error::{Error, Result};
use crate::forms::BookForm;
use crate::models::BookPageView;
use crate::output::Formattable;
use crate::session::{Capability, gate};

type Controller = BookListController<LibraryClient>;

/// Print whatever page the controller is showing, with its error if stale.
fn print_current(ctx: &CommandContext, controller: &Controller) -> Result<()> {
    let Some(page) = controller.current_page() else {
        if let Some(error) = controller.state().error() {
            eprintln!("{} {}", "✗".red(), error);
        }
        return Ok(());
    };

    let can_manage = gate::session_allows(&ctx.session.current(), Capability::ManageBooks);
    BookPageView::new(page)
        .with_error(controller.state().error())
        .with_manage(can_manage)
        .print(ctx.format)
}

/// Run the book list command
pub async fn list(opts: &GlobalOptions, page: &PageArgs) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    ctx.require(Capability::ViewBooks)?;

    let mut controller = ctx.controller();
    controller
        .fetch_page(page.page, page.size_or(ctx.page_size()))
        .await
        .map_err(|e| e.for_user(FETCH_FAILED))?;

    print_current(&ctx, &controller)
}

/// Run the book get command
pub async fn get(opts: &GlobalOptions, id: i64) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    ctx.require(Capability::ViewBooks)?;

    let book = ctx
        .client
        .get_book(id)
        .await
        .map_err(|e| e.for_user(FETCH_FAILED))?;
    book.print(ctx.format)
}

/// Run the book add command
pub async fn add(opts: &GlobalOptions, args: NewBookArgs) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    ctx.require(Capability::ManageBooks)?;

    let mut controller = ctx.controller();
    let book = controller
        .add_record(&BookForm::from(args))
        .await
        .map_err(|e| e.for_user(ADD_FAILED))?;

    if ctx.format == OutputFormat::Json {
        return book.print(ctx.format);
    }
    eprintln!(
        "{} Added \"{}\" (ID {})",
        "✓".green(),
        book.title.bold(),
        book.id
    );
    print_current(&ctx, &controller)
}

/// Run the book edit command
pub async fn edit(opts: &GlobalOptions, id: i64, changes: &BookChangeArgs) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    ctx.require(Capability::ManageBooks)?;

    let original = ctx
        .client
        .get_book(id)
        .await
        .map_err(|e| e.for_user(UPDATE_FAILED))?;

    let mut controller = ctx.controller();
    let outcome = controller
        .update_record(&original, &changes.to_form(&original))
        .await
        .map_err(|e| e.for_user(UPDATE_FAILED))?;

    match outcome {
        UpdateOutcome::NothingToUpdate => {
            eprintln!("{} No changes detected to update.", "○".dimmed());
            Ok(())
        }
        UpdateOutcome::Updated(book) => {
            if ctx.format != OutputFormat::Json {
                eprintln!("{} Updated \"{}\"", "✓".green(), book.title.bold());
            }
            book.print(ctx.format)
        }
    }
}

/// Run the book delete command
///
/// The page arguments name the page the book is shown on; after deleting,
/// the list lands on that page or the one before it.
pub async fn delete(opts: &GlobalOptions, id: i64, page: &PageArgs, yes: bool) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    ctx.require(Capability::ManageBooks)?;

    let mut controller = ctx.controller();
    controller
        .fetch_page(page.page, page.size_or(ctx.page_size()))
        .await
        .map_err(|e| e.for_user(FETCH_FAILED))?;

    if !yes {
        let listed = controller
            .current_page()
            .and_then(|p| p.content.iter().find(|b| b.id == id));
        if !confirm_delete(id, listed)? {
            eprintln!("Cancelled.");
            return Ok(());
        }
    }

    controller
        .delete_record(id)
        .await
        .map_err(|e| e.for_user(DELETE_FAILED))?;
    eprintln!("{} Deleted book {}", "✓".green(), id);

    print_current(&ctx, &controller)
}

fn confirm_delete(id: i64, book: Option<&Book>) -> Result<bool> {
    match book {
        Some(book) => eprintln!(
            "{} Delete \"{}\" by {} (ID {})? This cannot be undone.",
            "⚠".yellow(),
            book.title,
            book.author,
            id
        ),
        None => eprintln!("{} Delete book {}? This cannot be undone.", "⚠".yellow(), id),
    }

    Ok(Confirm::new()
        .with_prompt("Confirm deletion?")
        .default(false)
        .interact()?)
}

/// Actions offered by the interactive browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrowseAction {
    Next,
    Previous,
    Reload,
    Add,
    Edit,
    Delete,
    Quit,
}

impl fmt::Display for BrowseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BrowseAction::Next => "Next page",
            BrowseAction::Previous => "Previous page",
            BrowseAction::Reload => "Reload",
            BrowseAction::Add => "Add a book",
            BrowseAction::Edit => "Edit a book",
            BrowseAction::Delete => "Delete a book",
            BrowseAction::Quit => "Quit",
        };
        f.write_str(label)
    }
}

/// Actions available for the current state and role set
fn browse_actions(controller: &Controller, can_manage: bool) -> Vec<BrowseAction> {
    let page = controller.current_page();
    let has_rows = page.is_some_and(|p| !p.content.is_empty());

    let mut actions = Vec::new();
    if page.is_some_and(|p| p.has_next()) {
        actions.push(BrowseAction::Next);
    }
    if page.is_some_and(|p| p.has_previous()) {
        actions.push(BrowseAction::Previous);
    }
    actions.push(BrowseAction::Reload);
    if can_manage {
        actions.push(BrowseAction::Add);
        if has_rows {
            actions.push(BrowseAction::Edit);
            actions.push(BrowseAction::Delete);
        }
    }
    actions.push(BrowseAction::Quit);
    actions
}

/// Run the interactive book browser
pub async fn browse(opts: &GlobalOptions, size: Option<usize>) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    ctx.require(Capability::ViewBooks)?;
    let theme = ColorfulTheme::default();

    let mut controller = ctx.controller();
    let size = size.unwrap_or(ctx.page_size());
    if let Err(err) = controller.fetch_page(0, size).await {
        debug!("Initial fetch failed: {}", err);
    }

    loop {
        // Roles are re-read every round: a rejected credential signs out mid-session.
        let can_manage = gate::session_allows(&ctx.session.current(), Capability::ManageBooks);

        println!();
        match controller.current_page() {
            Some(page) => println!(
                "{}",
                BookPageView::new(page)
                    .with_error(controller.state().error())
                    .with_manage(can_manage)
                    .format(OutputFormat::Pretty)?
            ),
            None => {
                if let Some(error) = controller.state().error() {
                    eprintln!("{} {}", "✗".red(), error);
                }
            }
        }

        let actions = browse_actions(&controller, can_manage);
        let choice = Select::with_theme(&theme)
            .with_prompt("What next?")
            .items(&actions)
            .default(0)
            .interact_opt()?;

        let Some(action) = choice.map(|idx| actions[idx]) else {
            break;
        };

        let outcome = match action {
            BrowseAction::Quit => break,
            BrowseAction::Next => controller.go_to_next_page().await.map(|_| ()),
            BrowseAction::Previous => controller.go_to_previous_page().await.map(|_| ()),
            BrowseAction::Reload => {
                let (number, size) = controller
                    .current_page()
                    .map(|p| (p.number, p.size))
                    .unwrap_or((0, size));
                controller.fetch_page(number, size).await
            }
            BrowseAction::Add => browse_add(&mut controller, &theme).await,
            BrowseAction::Edit => browse_edit(&mut controller, &theme).await,
            BrowseAction::Delete => browse_delete(&mut controller, &theme).await,
        };

        // Fetch failures are already held in the controller state.
        if let Err(err) = outcome {
            debug!("{} failed: {}", action, err);
        }
    }

    Ok(())
}

/// Report a failed mutation and keep browsing.
fn report(err: Error, fallback: &str) {
    match err {
        Error::Validation(invalid) => {
            eprintln!("{} {}: {}", "✗".red(), invalid.field(), invalid)
        }
        err => eprintln!("{} {}", "✗".red(), err.user_message(fallback)),
    }
}

fn prompt_book(theme: &ColorfulTheme, initial: &BookForm) -> Result<BookForm> {
    let field = |prompt: &str, value: &str| -> Result<String> {
        Ok(Input::<String>::with_theme(theme)
            .with_prompt(prompt)
            .with_initial_text(value)
            .allow_empty(true)
            .interact_text()?)
    };

    Ok(BookForm {
        title: field("Title", &initial.title)?,
        author: field("Author", &initial.author)?,
        isbn: field("ISBN", &initial.isbn)?,
        published_date: field("Published (YYYY-MM-DD)", &initial.published_date)?,
    })
}

fn pick_book(controller: &Controller, theme: &ColorfulTheme, prompt: &str) -> Result<Option<Book>> {
    let Some(page) = controller.current_page() else {
        return Ok(None);
    };
    let labels: Vec<String> = page
        .content
        .iter()
        .map(|b| format!("#{} {} ({})", b.id, b.title, b.author))
        .collect();

    let choice = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact_opt()?;
    Ok(choice.map(|idx| page.content[idx].clone()))
}

async fn browse_add(controller: &mut Controller, theme: &ColorfulTheme) -> Result<()> {
    let form = prompt_book(theme, &BookForm::default())?;
    match controller.add_record(&form).await {
        Ok(book) => eprintln!("{} Added \"{}\"", "✓".green(), book.title),
        Err(err) => report(err, ADD_FAILED),
    }
    Ok(())
}

async fn browse_edit(controller: &mut Controller, theme: &ColorfulTheme) -> Result<()> {
    let Some(original) = pick_book(controller, theme, "Edit which book?")? else {
        return Ok(());
    };
    let form = prompt_book(theme, &BookForm::from_book(&original))?;

    match controller.update_record(&original, &form).await {
        Ok(UpdateOutcome::NothingToUpdate) => {
            eprintln!("{} No changes detected to update.", "○".dimmed())
        }
        Ok(UpdateOutcome::Updated(book)) => {
            eprintln!("{} Updated \"{}\"", "✓".green(), book.title)
        }
        Err(err) => report(err, UPDATE_FAILED),
    }
    Ok(())
}

async fn browse_delete(controller: &mut Controller, theme: &ColorfulTheme) -> Result<()> {
    let Some(book) = pick_book(controller, theme, "Delete which book?")? else {
        return Ok(());
    };
    if !confirm_delete(book.id, Some(&book))? {
        return Ok(());
    }

    match controller.delete_record(book.id).await {
        Ok(()) => eprintln!("{} Deleted \"{}\"", "✓".green(), book.title),
        Err(err) => report(err, DELETE_FAILED),
    }
    Ok(())
}
