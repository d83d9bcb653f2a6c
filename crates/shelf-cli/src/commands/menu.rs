use std::io::{self, IsTerminal, Write};

use shelf_core::models::ScriptType;

use crate::error::CliError;

struct MenuEntry {
    label: &'static str,
    description: &'static str,
}

const ENTRIES: &[MenuEntry] = &[
    MenuEntry {
        label: "list",
        description: "View all scripts",
    },
    MenuEntry {
        label: "install",
        description: "Install a script onto PATH",
    },
    MenuEntry {
        label: "edit",
        description: "Edit a script",
    },
    MenuEntry {
        label: "sync",
        description: "Sync with the server",
    },
    MenuEntry {
        label: "add",
        description: "Create a new script",
    },
    MenuEntry {
        label: "remove",
        description: "Delete a script",
    },
    MenuEntry {
        label: "config",
        description: "Show configuration",
    },
];

/// One-shot interactive menu for a bare `shelf` invocation: print the
/// actions, run the chosen one, exit.
pub async fn run() -> Result<(), CliError> {
    let Some(choice) = choose()? else {
        println!("Goodbye!");
        return Ok(());
    };
    println!();

    match choice {
        "list" => super::list::run(false).await,
        "install" => {
            let Some(name) = prompt_line("Script name")? else {
                return Ok(());
            };
            super::install::run(&name).await
        }
        "edit" => {
            let Some(name) = prompt_line("Script name")? else {
                return Ok(());
            };
            super::edit::run(&name, false).await
        }
        "sync" => super::sync::run().await,
        "add" => {
            let Some(name) = prompt_line("Script name")? else {
                return Ok(());
            };
            super::add::run(&name, None, ScriptType::Executable, None, false).await
        }
        "remove" => {
            let Some(name) = prompt_line("Script name")? else {
                return Ok(());
            };
            super::remove::run(&name, false).await
        }
        "config" => super::config_cmd::show(),
        _ => Ok(()),
    }
}

fn choose() -> Result<Option<&'static str>, CliError> {
    println!("What would you like to do?\n");
    for (index, entry) in ENTRIES.iter().enumerate() {
        println!("  {}. {} - {}", index + 1, entry.label, entry.description);
    }
    println!();

    let Some(answer) = prompt_line("Enter number (or q to quit)")? else {
        return Ok(None);
    };
    if answer.eq_ignore_ascii_case("q") {
        return Ok(None);
    }

    Ok(answer
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=ENTRIES.len()).contains(n))
        .map(|n| ENTRIES[n - 1].label))
}

fn prompt_line(prompt: &str) -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Ok(None);
    }

    print!("{prompt}: ");
    io::stdout().flush()?;

    let mut answer = String::new();
    stdin.read_line(&mut answer)?;
    let answer = answer.trim();
    if answer.is_empty() {
        Ok(None)
    } else {
        Ok(Some(answer.to_string()))
    }
}
