//! Interactive text-menu front end for the gathering manager.
//!
//! # Responsibility
//! - Drive the `gatherbook_core` facade from stdin/stdout prompts.
//! - Render results and recoverable failures as plain text.
//!
//! # Invariants
//! - No domain logic lives here; every decision is a facade call.
//! - Facade failures print a message and return to a prompt, never exit.

use gatherbook_core::{default_log_level, init_logging, GatheringManager};
use log::info;
use std::io::{self, BufRead, Write};

fn main() {
    // File logging is opt-in for the interactive binary; without the
    // variable the facade still works, it just stays quiet.
    if let Ok(log_dir) = std::env::var("GATHERBOOK_LOG_DIR") {
        if let Err(message) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {message}");
        }
    }

    let manager = match GatheringManager::new() {
        Ok(manager) => manager,
        Err(err) => {
            eprintln!("failed to open the in-memory store: {err}");
            std::process::exit(1);
        }
    };

    info!("event=cli_start module=cli status=ok");
    let stdin = io::stdin();
    let mut input = stdin.lock();
    run_main_menu(&manager, &mut input);
    info!("event=cli_exit module=cli status=ok");
}

fn run_main_menu(manager: &GatheringManager, input: &mut impl BufRead) {
    loop {
        println!(
            "Welcome to the Gathering Manager! Pick an option:
  1. Register a new member
  2. Register a new gathering
  3. Register a new organization
  4. Add a member to a gathering
  5. Modify a gathering
  6. Add a gathering to an organization
  7. List gathering members
  8. Exit"
        );

        let Some(response) = prompt(input, "> ") else {
            break;
        };
        if response == "8" || response.to_lowercase().starts_with(":q") {
            break;
        }

        match response.as_str() {
            "1" => new_member_menu(manager, input),
            "2" => new_gathering_menu(manager, input),
            "3" => new_organization_menu(manager, input),
            "4" => add_to_gathering_menu(manager, input, None),
            "5" => modify_gathering_menu(manager, input),
            "6" => add_to_organization_menu(manager, input, None, None),
            "7" => list_members_menu(manager, input),
            _ => println!("Invalid option!"),
        }
        println!();
    }
}

fn new_member_menu(manager: &GatheringManager, input: &mut impl BufRead) {
    println!("Add a new member.");
    let Some(name) = prompt(input, "  Name: ") else {
        return;
    };
    let Some(email) = prompt(input, "  Email: ") else {
        return;
    };

    match manager.add_member(&name, &email) {
        Ok(_) => println!("Member added!"),
        Err(err) => println!("{err}"),
    }
}

fn new_gathering_menu(manager: &GatheringManager, input: &mut impl BufRead) {
    println!("Add a new gathering.");
    let Some(title) = prompt(input, "  Title of gathering: ") else {
        return;
    };
    let Some(location) = prompt(input, "  Location (zip code): ") else {
        return;
    };
    let Some(date) = prompt(input, "  Date and time (ex: Jan 21 2025 13:00): ") else {
        return;
    };

    match manager.add_gathering(&title, &location, &date) {
        Ok(_) => add_to_gathering_menu(manager, input, Some(title)),
        Err(err) => println!("{err}"),
    }
}

fn new_organization_menu(manager: &GatheringManager, input: &mut impl BufRead) {
    println!("Add a new organization.");
    let Some(title) = prompt(input, "  Title of organization: ") else {
        return;
    };

    if let Err(err) = manager.add_organization(&title) {
        println!("{err}");
        return;
    }

    while confirm(input, "Add gatherings to organization? (y/n): ") {
        add_to_organization_menu(manager, input, Some(title.clone()), None);
        if !confirm(input, "Add another gathering? (y/n): ") {
            break;
        }
    }
}

fn add_to_gathering_menu(
    manager: &GatheringManager,
    input: &mut impl BufRead,
    gathering: Option<String>,
) {
    let gathering = match gathering {
        Some(title) => title,
        None => match search_gatherings_menu(manager, input) {
            Some(title) => title,
            None => return,
        },
    };

    while confirm(input, "Add a member to gathering? (y/n): ") {
        match search_members_menu(manager, input) {
            Some(member) => {
                if let Err(err) = manager.add_member_to_gathering(&member, &gathering) {
                    println!("{err}");
                }
            }
            None => println!("No member selected."),
        }
        if !confirm(input, "Add another member? (y/n): ") {
            break;
        }
    }
}

fn modify_gathering_menu(manager: &GatheringManager, input: &mut impl BufRead) {
    let Some(mut gathering) = search_gatherings_menu(manager, input) else {
        return;
    };

    loop {
        println!(
            "Edit gathering '{gathering}'.
  1. Change title
  2. Change time
  3. Add to organization
  4. Return to previous menu"
        );

        let Some(response) = prompt(input, "> ") else {
            return;
        };
        match response.as_str() {
            "1" => {
                let Some(new_title) = prompt(input, "  New title: ") else {
                    return;
                };
                match manager.modify_gathering(&gathering, Some(&new_title), None) {
                    // Keep following the renamed gathering in this submenu.
                    Ok(()) => gathering = new_title,
                    Err(err) => println!("{err}"),
                }
            }
            "2" => {
                let Some(new_date) = prompt(input, "  New date and time (ex: Jan 21 2025 13:00): ")
                else {
                    return;
                };
                if let Err(err) = manager.modify_gathering(&gathering, None, Some(&new_date)) {
                    println!("{err}");
                }
            }
            "3" => add_to_organization_menu(manager, input, None, Some(gathering.clone())),
            "4" => break,
            _ => println!("Invalid option!"),
        }
    }
}

fn add_to_organization_menu(
    manager: &GatheringManager,
    input: &mut impl BufRead,
    organization: Option<String>,
    gathering: Option<String>,
) {
    let gathering = match gathering {
        Some(title) => title,
        None => match search_gatherings_menu(manager, input) {
            Some(title) => title,
            None => return,
        },
    };

    let organization = match organization {
        Some(title) => title,
        None => match search_organizations_menu(manager, input) {
            Some(title) => title,
            None => return,
        },
    };

    if let Err(err) = manager.add_gathering_to_organization(&gathering, &organization) {
        println!("{err}");
    }
}

fn list_members_menu(manager: &GatheringManager, input: &mut impl BufRead) {
    let Some(gathering) = search_gatherings_menu(manager, input) else {
        return;
    };

    match manager.get_members(&gathering) {
        Ok(members) => {
            println!("Members participating in this gathering:");
            if members.is_empty() {
                println!("  (no members yet)");
            }
            for member in members {
                println!("  {member}");
            }
        }
        Err(err) => println!("{err}"),
    }
}

fn search_members_menu(manager: &GatheringManager, input: &mut impl BufRead) -> Option<String> {
    let query = prompt_for_query(input, "member")?;
    let results = match manager.find_member_names(&query) {
        Ok(results) => results,
        Err(err) => {
            println!("{err}");
            return None;
        }
    };
    pick_from_list(input, "member", results)
}

fn search_gatherings_menu(manager: &GatheringManager, input: &mut impl BufRead) -> Option<String> {
    let query = prompt_for_query(input, "gathering")?;
    let results = match manager.find_gathering_names(&query) {
        Ok(results) => results,
        Err(err) => {
            println!("{err}");
            return None;
        }
    };
    pick_from_list(input, "gathering", results)
}

fn search_organizations_menu(
    manager: &GatheringManager,
    input: &mut impl BufRead,
) -> Option<String> {
    let query = prompt_for_query(input, "organization")?;
    let results = match manager.find_organization_names(&query) {
        Ok(results) => results,
        Err(err) => {
            println!("{err}");
            return None;
        }
    };
    pick_from_list(input, "organization", results)
}

fn prompt_for_query(input: &mut impl BufRead, kind: &str) -> Option<String> {
    println!("Searching for a {kind}.");
    prompt(input, "Search query: ")
}

fn pick_from_list(input: &mut impl BufRead, kind: &str, results: Vec<String>) -> Option<String> {
    if results.is_empty() {
        println!("No results found.");
        return None;
    }

    println!("Results found: ");
    for (index, item) in results.iter().enumerate() {
        println!("  {}. {item}", index + 1);
    }

    let choice = prompt(input, &format!("Choose a {kind} (1-{}): ", results.len()))?;
    let index: usize = choice.parse().ok()?;
    results.get(index.checked_sub(1)?).cloned()
}

fn confirm(input: &mut impl BufRead, label: &str) -> bool {
    prompt(input, label)
        .map(|answer| answer.to_lowercase().starts_with('y'))
        .unwrap_or(false)
}

/// Prints `label` without a newline and reads one trimmed line.
/// Returns `None` on end of input.
fn prompt(input: &mut impl BufRead, label: &str) -> Option<String> {
    print!("{label}");
    io::stdout().flush().ok()?;

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}
