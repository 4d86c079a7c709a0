//! Command execution context
//!
//! Provides a unified context for command execution, eliminating boilerplate
//! for config loading, session restore, and client initialization.

use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, warn};

use crate::cli::args::GlobalOptions;
use crate::cli::OutputFormat;
use crate::client::LibraryClient;
use crate::config::Config;
use crate::controller::BookListController;
use crate::error::{ApiError, Result, SessionError};
use crate::session::{Capability, FileStorage, Session, SessionStore, gate};

/// Context for command execution containing config, session, client, and
/// runtime options.
pub struct CommandContext {
    /// Loaded and validated configuration
    pub config: Config,
    /// Where the configuration was loaded from
    pub config_path: PathBuf,
    /// Process-wide session, restored from `session.yaml`
    pub session: Arc<SessionStore<FileStorage>>,
    /// API client reading its bearer token from `session`
    pub client: Arc<LibraryClient>,
    /// Output format preference
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a new command context.
    ///
    /// This handles:
    /// - Loading config from path (or default location)
    /// - Restoring the stored session (expired or corrupt sessions are dropped)
    /// - Creating the API client with the session as its credential source
    /// - Signing out locally when the server rejects the credential (401)
    ///
    /// # Errors
    /// Returns error if config cannot be loaded or the HTTP client cannot be built.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config_path = Config::resolve_path(opts.config_ref())?;
        let config = Config::load_from(&config_path)?;

        let storage = FileStorage::new(Config::session_path(&config_path));
        let session = Arc::new(SessionStore::open(storage));

        let hook_session = Arc::clone(&session);
        let client = LibraryClient::new(config.api_base_url(opts.api_host_ref()))?
            .with_credentials(session.clone())
            .on_unauthorized(Arc::new(move |_: &ApiError| {
                debug!("Credential rejected by server; clearing session");
                if let Err(err) = hook_session.logout() {
                    warn!("Failed to clear session after 401: {}", err);
                }
            }));

        let format = opts
            .format
            .or_else(|| {
                config
                    .preferences
                    .format
                    .as_deref()
                    .and_then(OutputFormat::from_name)
            })
            .unwrap_or_default();

        Ok(Self {
            config,
            config_path,
            session,
            client: Arc::new(client),
            format,
        })
    }

    /// The current session, after checking it grants `capability`.
    ///
    /// Anonymous users asking for a role-gated capability are told to sign in
    /// rather than refused.
    pub fn require(&self, capability: Capability) -> Result<Session> {
        let session = self.session.current();
        match gate::require(&session, capability) {
            Ok(()) => Ok(session),
            Err(_) if !session.is_authenticated() => Err(SessionError::NotSignedIn.into()),
            Err(err) => Err(err),
        }
    }

    /// A list controller using the configured sort and page size.
    pub fn controller(&self) -> BookListController<LibraryClient> {
        BookListController::new(Arc::clone(&self.client))
            .with_sort(self.config.preferences.sort.clone())
            .with_page_size(self.config.preferences.page_size)
    }

    /// Configured books per page
    pub fn page_size(&self) -> usize {
        self.config.preferences.page_size
    }
}
