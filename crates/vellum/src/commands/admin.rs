//! Post collection editing commands.
//!
//! These commands never write `posts.json`. Mutating subcommands print the
//! updated collection as indented JSON on stdout so the operator can review
//! it and copy it over the store by hand.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Result;

use vellum_store::{AdminSession, JsonPostStore};

use crate::config::ConfigFile;
use crate::AdminCommands;

/// Run an admin subcommand.
pub fn run(config_path: &Path, command: AdminCommands) -> Result<()> {
    let file_config = ConfigFile::load(config_path)?;
    let store = JsonPostStore::new(&file_config.content.posts);
    let mut session = AdminSession::new(store.load_or_empty());

    match command {
        AdminCommands::List => {
            list(&session);
        }
        AdminCommands::Add { title, content } => {
            let added = session.add(&title, &content)?;
            tracing::info!("Added \"{}\" ({})", added.title, added.id);
            print_export(&session, store.path())?;
        }
        AdminCommands::Edit { id, title, content } => {
            session.apply_edit(&id, &title, &content)?;
            tracing::info!("Updated {}", id);
            print_export(&session, store.path())?;
        }
        AdminCommands::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete post \"{}\"?", id))? {
                tracing::info!("Aborted");
                return Ok(());
            }
            let removed = session.delete(&id)?;
            tracing::info!("Deleted \"{}\"", removed.title);
            print_export(&session, store.path())?;
        }
        AdminCommands::Export => {
            println!("{}", session.export_json()?);
        }
    }

    Ok(())
}

/// Print the collection summary, one post per line.
fn list(session: &AdminSession) {
    if session.posts().is_empty() {
        println!("No posts.");
        return;
    }

    for post in session.posts() {
        println!("{}  {}  {}", post.id, post.date, post.title);
    }
}

/// Print the updated collection and remind the operator how to apply it.
fn print_export(session: &AdminSession, store_path: &Path) -> Result<()> {
    println!("{}", session.export_json()?);
    tracing::info!(
        "Copy the JSON above over {} to apply the change",
        store_path.display()
    );
    Ok(())
}

/// Ask a yes/no question on stderr and read the answer from stdin.
fn confirm(prompt: &str) -> Result<bool> {
    eprint!("{} [y/N] ", prompt);
    io::stderr().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;

    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
