//! Interactive console front end: a readline loop over the roster,
//! selection, and dispatch services. Everything here is presentation; the
//! behavior lives in `roster`, `selection`, and `dispatch`.

pub mod render;

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::dispatch::InstructionPayload;
use crate::errors::AppError;
use crate::models::folder::{FolderDraft, FolderRecord, LLM_MODELS, VOICE_MODELS};
use crate::models::user::{UserDraft, UserRecord};
use crate::roster::filter::{filter_users, FolderFilter};
use crate::roster::RosterSnapshot;
use crate::state::AppState;

const HELP: &str = "\
Commands:
  list                       show the current folder view
  folders                    show folders
  filter <folder|all>        switch the folder tab (by folder name)
  toggle <n> [n...]          toggle selection of row(s) in the current view
  select all | select none   select every row in the current view / clear
  selected                   show the current selection
  call [custom]              place immediate calls for the selection
  callone <n>                place one call for a single row
  schedule <date> <time> [custom]
                             schedule calls, e.g. schedule 2025-01-01 09:00
  transcript <n>             show a user's call transcript
  adduser / edituser <n> / deluser <n>
  addfolder / editfolder <name> / delfolder <name>
  upload <path>              bulk-import a candidate CSV/XLSX file
  refresh                    re-sync the roster now
  quit                       exit";

pub async fn run(state: AppState) -> Result<()> {
    let mut rl = DefaultEditor::new().context("failed to initialize readline")?;

    println!("{}", "voice-screening console".bold().green());
    println!(
        "Connected to {} (roster polled every {}s). Type {} for commands, {} to exit.\n",
        state.config.api_url,
        state.config.poll_interval_secs,
        "help".yellow(),
        "quit".yellow()
    );

    let mut filter = FolderFilter::All;
    let prompt = format!("{}> ", "console".green());

    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim().to_string();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);
                if trimmed == "quit" || trimmed == "exit" {
                    break;
                }
                if let Err(e) = handle_command(&state, &mut filter, &mut rl, &trimmed).await {
                    eprintln!("{}: {e}", "error".red());
                }
            }
            // Ctrl+C / Ctrl+D
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

async fn handle_command(
    state: &AppState,
    filter: &mut FolderFilter,
    rl: &mut DefaultEditor,
    line: &str,
) -> Result<(), AppError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        ["help"] => println!("{HELP}"),

        ["list"] | ["ls"] => {
            let snapshot = state.roster.snapshot().await;
            let view = filter_users(&snapshot.users, filter);
            println!(
                "{}",
                format!("Folder: {}", filter.describe(&snapshot.folders)).bold()
            );
            render::print_users(&view, &snapshot.folders, &snapshot.selection);
            render::print_summary(&snapshot);
        }

        ["folders"] => {
            let snapshot = state.roster.snapshot().await;
            render::print_folders(&snapshot.folders);
        }

        ["filter", "all"] => {
            *filter = FolderFilter::All;
            println!("showing all users");
        }
        ["filter", name] => {
            let snapshot = state.roster.snapshot().await;
            let folder = find_folder(&snapshot.folders, name)?;
            *filter = FolderFilter::Folder(folder.folder_id.clone());
            println!("showing folder '{}'", folder.folder_name);
        }

        ["toggle", rows @ ..] if !rows.is_empty() => {
            let snapshot = state.roster.snapshot().await;
            for row in rows {
                let user = resolve_row(&snapshot, filter, row)?;
                state.roster.toggle(&user.user_id).await;
                let on = state.roster.is_selected(&user.user_id).await;
                println!(
                    "{} {}",
                    if on { "selected".cyan() } else { "deselected".dimmed() },
                    user.name
                );
            }
        }

        ["select", "all"] => {
            let snapshot = state.roster.snapshot().await;
            let ids: Vec<String> = filter_users(&snapshot.users, filter)
                .iter()
                .map(|u| u.user_id.clone())
                .collect();
            let count = ids.len();
            state.roster.select_all(ids).await;
            println!("selected {count} user(s) in the current view");
        }
        ["select", "none"] => {
            state.roster.clear_selection().await;
            println!("selection cleared");
        }

        ["selected"] => {
            let snapshot = state.roster.snapshot().await;
            let ids = snapshot.selection.ids();
            if ids.is_empty() {
                println!("{}", "nothing selected".dimmed());
            }
            for id in &ids {
                let name = snapshot
                    .users
                    .iter()
                    .find(|u| &u.user_id == id)
                    .map(|u| u.name.as_str())
                    .unwrap_or(id.as_str());
                println!("  {name}");
            }
        }

        ["call"] | ["call", "custom"] => {
            let ids = state.roster.selected_ids().await;
            if ids.is_empty() {
                return Err(AppError::Validation("select at least one user".into()));
            }
            let instructions = read_instructions(rl, tokens.len() == 2)?;
            if !confirm(rl, &format!("Place calls for {} user(s)?", ids.len()))? {
                return Ok(());
            }
            let count = state.dispatcher.place_calls_now(&ids, &instructions).await?;
            println!("{}", format!("calls initiated for {count} user(s)").green());
        }

        ["callone", row] => {
            let snapshot = state.roster.snapshot().await;
            let user = resolve_row(&snapshot, filter, row)?;
            if !confirm(rl, &format!("Place a call to {}?", user.name))? {
                return Ok(());
            }
            state.dispatcher.place_single_call(&user.user_id).await?;
            println!("{}", format!("call initiated for {}", user.name).green());
        }

        ["schedule", date, time] | ["schedule", date, time, "custom"] => {
            let ids = state.roster.selected_ids().await;
            if ids.is_empty() {
                return Err(AppError::Validation("select at least one user".into()));
            }
            let instructions = read_instructions(rl, tokens.len() == 4)?;
            let at = state
                .dispatcher
                .schedule_calls(&ids, &instructions, date, time)
                .await?;
            println!(
                "{}",
                format!("calls scheduled for {} user(s) at {at}", ids.len()).green()
            );
        }

        ["transcript", row] => {
            let snapshot = state.roster.snapshot().await;
            let user = resolve_row(&snapshot, filter, row)?;
            render::print_transcript(&user);
        }

        ["adduser"] => {
            let snapshot = state.roster.snapshot().await;
            let draft = read_user_form(rl, &snapshot.folders, None)?;
            state.directory.create_user(&draft).await?;
            state.roster.refresh().await?;
            println!("{}", format!("user '{}' created", draft.name).green());
        }

        ["edituser", row] => {
            let snapshot = state.roster.snapshot().await;
            let user = resolve_row(&snapshot, filter, row)?;
            let draft = read_user_form(rl, &snapshot.folders, Some(&user))?;
            state.directory.update_user(&draft).await?;
            state.roster.refresh().await?;
            println!("{}", format!("user '{}' updated", draft.name).green());
        }

        ["deluser", row] => {
            let snapshot = state.roster.snapshot().await;
            let user = resolve_row(&snapshot, filter, row)?;
            if !confirm(rl, &format!("Delete user '{}'?", user.name))? {
                return Ok(());
            }
            state.directory.delete_user(&user.user_id).await?;
            state.roster.refresh().await?;
            println!("user '{}' deleted", user.name);
        }

        ["addfolder"] => {
            let draft = read_folder_form(rl, None)?;
            state.directory.create_folder(&draft).await?;
            state.roster.refresh().await?;
            println!(
                "{}",
                format!("folder '{}' created", draft.folder_name).green()
            );
        }

        ["editfolder", name] => {
            let snapshot = state.roster.snapshot().await;
            let folder = find_folder(&snapshot.folders, name)?.clone();
            let draft = read_folder_form(rl, Some(&folder))?;
            state
                .directory
                .update_folder(&folder.folder_id, &draft)
                .await?;
            state.roster.refresh().await?;
            println!(
                "{}",
                format!("folder '{}' updated", draft.folder_name).green()
            );
        }

        ["delfolder", name] => {
            let snapshot = state.roster.snapshot().await;
            let folder = find_folder(&snapshot.folders, name)?.clone();
            if !confirm(rl, &format!("Delete folder '{}'?", folder.folder_name))? {
                return Ok(());
            }
            state.directory.delete_folder(&folder.folder_id).await?;
            state.roster.refresh().await?;
            println!("folder '{}' deleted", folder.folder_name);
        }

        ["upload", path] => {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| AppError::Validation(format!("cannot read '{path}': {e}")))?;
            let file_name = Path::new(path)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("upload.csv");
            state.directory.import_users(file_name, bytes).await?;
            state.roster.refresh().await?;
            println!("{}", "file uploaded".green());
        }

        ["refresh"] => {
            state.roster.refresh().await?;
            let snapshot = state.roster.snapshot().await;
            render::print_summary(&snapshot);
        }

        _ => println!("unknown command; type {} for usage", "help".yellow()),
    }
    Ok(())
}

/// Resolves a 1-based row number against the currently filtered view.
fn resolve_row(
    snapshot: &RosterSnapshot,
    filter: &FolderFilter,
    row: &str,
) -> Result<UserRecord, AppError> {
    let n: usize = row
        .parse()
        .map_err(|_| AppError::Validation(format!("'{row}' is not a row number")))?;
    let view = filter_users(&snapshot.users, filter);
    view.get(n.wrapping_sub(1))
        .copied()
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("row {n} in the current view")))
}

fn find_folder<'a>(
    folders: &'a [FolderRecord],
    name: &str,
) -> Result<&'a FolderRecord, AppError> {
    folders
        .iter()
        .find(|f| f.folder_name.eq_ignore_ascii_case(name))
        .ok_or_else(|| AppError::NotFound(format!("folder '{name}'")))
}

fn prompt(rl: &mut DefaultEditor, label: &str) -> Result<String, AppError> {
    rl.readline(&format!("  {label}: "))
        .map(|s| s.trim().to_string())
        .map_err(|e| AppError::Validation(format!("input aborted: {e}")))
}

/// Prompts with the current value as the default; empty input keeps it.
fn prompt_default(rl: &mut DefaultEditor, label: &str, current: &str) -> Result<String, AppError> {
    let input = prompt(rl, &format!("{label} [{current}]"))?;
    Ok(if input.is_empty() {
        current.to_string()
    } else {
        input
    })
}

fn confirm(rl: &mut DefaultEditor, question: &str) -> Result<bool, AppError> {
    let answer = prompt(rl, &format!("{question} [y/N]"))?;
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

/// Reads the instruction payload for a dispatch: folder defaults, or
/// operator-typed greeting and body text when `custom` was requested.
fn read_instructions(
    rl: &mut DefaultEditor,
    custom: bool,
) -> Result<InstructionPayload, AppError> {
    if !custom {
        return Ok(InstructionPayload::UseDefault);
    }
    Ok(InstructionPayload::Custom {
        greeting: prompt(rl, "Greeting instruction")?,
        body: prompt(rl, "Conversation instruction")?,
    })
}

fn read_user_form(
    rl: &mut DefaultEditor,
    folders: &[FolderRecord],
    existing: Option<&UserRecord>,
) -> Result<UserDraft, AppError> {
    let (name, phone, current_folder) = match existing {
        Some(u) => (u.name.clone(), u.phone.clone(), u.folder_id.clone()),
        None => (String::new(), String::new(), None),
    };
    let name = prompt_default(rl, "Name", &name)?;
    if name.is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    let phone = prompt_default(rl, "Phone (with country code)", &phone)?;
    if phone.is_empty() {
        return Err(AppError::Validation("phone is required".into()));
    }

    let current_folder_name = current_folder
        .as_deref()
        .and_then(|id| folders.iter().find(|f| f.folder_id == id))
        .map(|f| f.folder_name.clone())
        .unwrap_or_default();
    let folder_name = prompt_default(rl, "Folder (blank = unassigned)", &current_folder_name)?;
    let folder_id = if folder_name.is_empty() {
        None
    } else {
        Some(find_folder(folders, &folder_name)?.folder_id.clone())
    };

    Ok(UserDraft {
        user_id: existing.map(|u| u.user_id.clone()),
        name,
        phone,
        folder_id,
    })
}

fn read_folder_form(
    rl: &mut DefaultEditor,
    existing: Option<&FolderRecord>,
) -> Result<FolderDraft, AppError> {
    let blank = FolderRecord {
        folder_id: String::new(),
        folder_name: String::new(),
        voice_model: VOICE_MODELS[0].to_string(),
        llm_model: LLM_MODELS[0].to_string(),
        custom_greet_instruction: String::new(),
        custom_instruction: String::new(),
        is_active: true,
    };
    let current = existing.unwrap_or(&blank);

    println!("  voice models: {}", VOICE_MODELS.join(", "));
    println!("  llm models:   {}", LLM_MODELS.join(", "));
    let draft = FolderDraft {
        folder_name: prompt_default(rl, "Folder name", &current.folder_name)?,
        voice_model: prompt_default(rl, "Voice model", &current.voice_model)?,
        llm_model: prompt_default(rl, "LLM model", &current.llm_model)?,
        custom_greet_instruction: prompt_default(
            rl,
            "Default greeting instruction",
            &current.custom_greet_instruction,
        )?,
        custom_instruction: prompt_default(
            rl,
            "Default conversation instruction",
            &current.custom_instruction,
        )?,
        is_active: {
            let current_flag = if current.is_active { "y" } else { "n" };
            let answer = prompt_default(rl, "Active (y/n)", current_flag)?;
            answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
        },
    };
    draft.validate()?;
    Ok(draft)
}
