//! Plain-text table rendering for the console. Status colors mirror the
//! badge colors of the product's web front end: green for completed, yellow
//! for pending, red for the failure family, gray otherwise.

use colored::{ColoredString, Colorize};

use crate::models::folder::FolderRecord;
use crate::models::user::{CallStatus, Speaker, UserRecord};
use crate::roster::filter::folder_label;
use crate::roster::RosterSnapshot;
use crate::selection::Selection;

fn status_cell(status: CallStatus) -> ColoredString {
    let label = status.label();
    match status {
        CallStatus::Completed => label.green(),
        CallStatus::Pending => label.yellow(),
        CallStatus::Busy | CallStatus::Failed | CallStatus::NoAnswer => label.red(),
        CallStatus::NotCalled | CallStatus::Unknown => label.dimmed(),
    }
}

fn clip(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let cut: String = s.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

/// Prints the filtered user view with row numbers the commands refer to.
pub fn print_users(view: &[&UserRecord], folders: &[FolderRecord], selection: &Selection) {
    if view.is_empty() {
        println!("{}", "no users in this view".dimmed());
        return;
    }
    println!(
        "{}",
        format!(
            "    {:>3}  {:<22} {:<16} {:<14} {:<11} {}",
            "#", "Name", "Phone", "Folder", "Status", "Scheduled"
        )
        .bold()
    );
    for (idx, user) in view.iter().enumerate() {
        let mark = if selection.contains(&user.user_id) {
            "[x]".cyan()
        } else {
            "[ ]".normal()
        };
        let scheduled = user
            .schedule_time
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "{mark} {:>3}  {:<22} {:<16} {:<14} {:<11} {}",
            idx + 1,
            clip(&user.name, 22),
            clip(&user.phone, 16),
            clip(folder_label(user, folders), 14),
            status_cell(user.call_status),
            scheduled.dimmed(),
        );
    }
}

pub fn print_folders(folders: &[FolderRecord]) {
    if folders.is_empty() {
        println!("{}", "no folders".dimmed());
        return;
    }
    println!(
        "{}",
        format!(
            "{:<18} {:<20} {:<14} {}",
            "Name", "Voice model", "LLM model", "Active"
        )
        .bold()
    );
    for folder in folders {
        let active = if folder.is_active {
            "yes".green()
        } else {
            "no".dimmed()
        };
        println!(
            "{:<18} {:<20} {:<14} {}",
            clip(&folder.folder_name, 18),
            clip(&folder.voice_model, 20),
            clip(&folder.llm_model, 14),
            active,
        );
    }
}

/// Renders a user's transcription turns with speaker labels.
pub fn print_transcript(user: &UserRecord) {
    if user.transcription.is_empty() {
        println!("{}", "no transcription available".dimmed());
        return;
    }
    println!("{}", format!("Transcript — {}", user.name).bold());
    for turn in &user.transcription {
        let speaker = match turn.role {
            Speaker::Assistant => turn.role.label().cyan(),
            Speaker::User => turn.role.label().green(),
            Speaker::Unknown => turn.role.label().dimmed(),
        };
        println!("{speaker}: {}", turn.content);
    }
}

pub fn print_summary(snapshot: &RosterSnapshot) {
    let synced = snapshot
        .last_sync
        .map(|t| t.format("%H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());
    println!(
        "{}",
        format!(
            "{} user(s), {} folder(s), {} selected — last sync {}",
            snapshot.users.len(),
            snapshot.folders.len(),
            snapshot.selection.len(),
            synced
        )
        .dimmed()
    );
}
