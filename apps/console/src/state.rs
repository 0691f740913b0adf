use std::sync::Arc;

use crate::config::Config;
use crate::directory::DirectoryApi;
use crate::dispatch::CallDispatcher;
use crate::roster::RosterService;

/// Shared application state handed to the console loop.
///
/// The directory client is carried as `Arc<dyn DirectoryApi>` so the whole
/// console runs against any backend implementing the trait.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub directory: Arc<dyn DirectoryApi>,
    pub roster: Arc<RosterService>,
    pub dispatcher: Arc<CallDispatcher>,
}
