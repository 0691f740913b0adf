//! Derived folder view: a pure function of the roster and the current folder
//! filter, recomputed on demand and never persisted.

use crate::models::folder::FolderRecord;
use crate::models::user::UserRecord;

/// Which folder tab the operator has selected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FolderFilter {
    #[default]
    All,
    Folder(String),
}

impl FolderFilter {
    pub fn describe(&self, folders: &[FolderRecord]) -> String {
        match self {
            FolderFilter::All => "All".to_string(),
            FolderFilter::Folder(id) => folders
                .iter()
                .find(|f| &f.folder_id == id)
                .map(|f| f.folder_name.clone())
                .unwrap_or_else(|| id.clone()),
        }
    }
}

/// The subset of users whose folder matches the filter; the full roster for
/// `All`. Roster order is preserved.
pub fn filter_users<'a>(users: &'a [UserRecord], filter: &FolderFilter) -> Vec<&'a UserRecord> {
    match filter {
        FolderFilter::All => users.iter().collect(),
        FolderFilter::Folder(id) => users
            .iter()
            .filter(|u| u.folder_id.as_deref() == Some(id.as_str()))
            .collect(),
    }
}

/// Display name of a user's folder. A missing or dangling folder reference is
/// shown as unassigned, never treated as an error.
pub fn folder_label<'a>(user: &UserRecord, folders: &'a [FolderRecord]) -> &'a str {
    user.folder_id
        .as_deref()
        .and_then(|id| folders.iter().find(|f| f.folder_id == id))
        .map(|f| f.folder_name.as_str())
        .unwrap_or("Unassigned")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::testing::{folder, user};

    #[test]
    fn all_filter_returns_roster_exactly() {
        let users = vec![user("a", Some("f1")), user("b", Some("f2")), user("c", None)];
        let view = filter_users(&users, &FolderFilter::All);
        assert_eq!(view.len(), 3);
        assert!(view.iter().zip(&users).all(|(v, u)| v.user_id == u.user_id));
    }

    #[test]
    fn folder_filter_returns_matching_subset() {
        let users = vec![user("a", Some("f1")), user("b", Some("f2")), user("c", Some("f1"))];
        let view = filter_users(&users, &FolderFilter::Folder("f1".into()));
        let ids: Vec<&str> = view.iter().map(|u| u.user_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn unassigned_users_never_match_a_folder_filter() {
        let users = vec![user("a", None)];
        assert!(filter_users(&users, &FolderFilter::Folder("f1".into())).is_empty());
    }

    #[test]
    fn dangling_folder_reference_displays_as_unassigned() {
        let folders = vec![folder("f1", "Backend")];
        let assigned = user("a", Some("f1"));
        let dangling = user("b", Some("deleted-folder"));
        let unassigned = user("c", None);
        assert_eq!(folder_label(&assigned, &folders), "Backend");
        assert_eq!(folder_label(&dangling, &folders), "Unassigned");
        assert_eq!(folder_label(&unassigned, &folders), "Unassigned");
    }
}
