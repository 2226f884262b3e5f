//! CLI execution context.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use freshmart_cache::{SessionId, SessionStorage};
use freshmart_commerce::cart::{CartStore, SessionCartRepository};
use freshmart_commerce::catalog::InMemoryCatalog;

use crate::config::CliConfig;
use crate::output::Output;

/// Names searched for when no config file is given.
const CONFIG_NAMES: [&str; 3] = ["freshmart.toml", ".freshmart.toml", "freshmart.json"];

/// File in the storage directory naming the active session.
const CURRENT_SESSION_FILE: &str = "current_session";

/// Catalog used when none is configured.
const DEMO_CATALOG: &str = include_str!("../assets/catalog.json");

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Directory relative paths in the config resolve against.
    pub base_dir: PathBuf,
    /// Session given on the command line.
    session_override: Option<SessionId>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, session: Option<String>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, base_dir) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, path);
                let base = path.parent().map(Path::to_path_buf).unwrap_or_else(|| cwd.clone());
                (CliConfig::load(&path)?, base)
            }
            None => match find_config(&cwd) {
                Some(found) => {
                    output.debug(&format!("Using config {}", found.display()));
                    let base = found.parent().map(Path::to_path_buf).unwrap_or_else(|| cwd.clone());
                    (CliConfig::load(&found)?, base)
                }
                None => (CliConfig::default(), cwd),
            },
        };

        Ok(Self {
            config,
            output,
            base_dir,
            session_override: session.map(SessionId::new),
        })
    }

    /// Directory holding the session storage areas.
    pub fn storage_dir(&self) -> PathBuf {
        resolve(&self.base_dir, &self.config.storage.dir)
    }

    /// Load the product catalog.
    pub fn catalog(&self) -> Result<InMemoryCatalog> {
        match &self.config.catalog.path {
            Some(path) => {
                let path = resolve(&self.base_dir, path);
                InMemoryCatalog::load(&path)
                    .with_context(|| format!("Failed to load catalog: {}", path.display()))
            }
            None => InMemoryCatalog::from_json_str(DEMO_CATALOG)
                .context("Bundled catalog is invalid"),
        }
    }

    /// The active session, starting one if none is recorded.
    pub fn current_session(&self) -> Result<SessionId> {
        match self.active_session()? {
            Some(session) => Ok(session),
            None => self.start_session(),
        }
    }

    /// The session commands act on, without starting one.
    pub fn active_session(&self) -> Result<Option<SessionId>> {
        match &self.session_override {
            Some(session) => Ok(Some(session.clone())),
            None => self.recorded_session(),
        }
    }

    /// Session named in the storage directory, if any.
    pub fn recorded_session(&self) -> Result<Option<SessionId>> {
        let path = self.storage_dir().join(CURRENT_SESSION_FILE);
        match fs::read_to_string(&path) {
            Ok(content) => {
                let id = content.trim();
                Ok((!id.is_empty()).then(|| SessionId::new(id)))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    /// Generate a new session and record it as active.
    pub fn start_session(&self) -> Result<SessionId> {
        let session = SessionId::generate();
        let dir = self.storage_dir();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create storage directory: {}", dir.display()))?;
        fs::write(dir.join(CURRENT_SESSION_FILE), session.as_str())
            .context("Failed to record current session")?;
        tracing::debug!(%session, "session started");
        Ok(session)
    }

    /// Forget the recorded session if it is `session`.
    pub fn forget_session(&self, session: &SessionId) -> Result<()> {
        if self.recorded_session()?.as_ref() == Some(session) {
            let path = self.storage_dir().join(CURRENT_SESSION_FILE);
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(())
    }

    /// Open the storage area of `session`.
    pub fn session_storage(&self, session: &SessionId) -> Result<SessionStorage> {
        let storage = SessionStorage::open_dir(self.storage_dir(), session.clone())
            .with_context(|| format!("Failed to open storage for session {}", session))?;
        Ok(match self.config.storage.quota_bytes {
            Some(quota) => storage.with_quota(quota),
            None => storage,
        })
    }

    /// Cart store for the active session.
    pub fn cart_store(&self) -> Result<CartStore<SessionCartRepository>> {
        let session = self.current_session()?;
        let storage = self.session_storage(&session)?;
        let repository = SessionCartRepository::with_key(storage, self.config.cart.storage_key.clone());
        Ok(CartStore::restore(repository, self.config.cart.clone()))
    }
}

/// Find a config file in the directory tree.
fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_NAMES {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Resolve a path relative to `base`.
fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freshmart_commerce::catalog::ProductCatalog;

    fn context_in(dir: &Path) -> Context {
        Context {
            config: CliConfig::default(),
            output: Output::new(false, true),
            base_dir: dir.to_path_buf(),
            session_override: None,
        }
    }

    #[test]
    fn test_find_config_walks_up() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.path().join("freshmart.toml"), "").unwrap();

        assert_eq!(find_config(&nested), Some(root.path().join("freshmart.toml")));
    }

    #[test]
    fn test_session_is_recorded_and_reused() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_in(dir.path());

        assert!(ctx.recorded_session().unwrap().is_none());
        let first = ctx.current_session().unwrap();
        assert_eq!(ctx.current_session().unwrap(), first);

        ctx.forget_session(&first).unwrap();
        assert!(ctx.recorded_session().unwrap().is_none());
    }

    #[test]
    fn test_session_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context_in(dir.path());
        ctx.session_override = Some(SessionId::new("tab-2"));

        assert_eq!(ctx.current_session().unwrap().as_str(), "tab-2");
        assert!(ctx.recorded_session().unwrap().is_none());
    }

    #[test]
    fn test_cart_persists_between_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_in(dir.path());
        let product = ctx.catalog().unwrap().product_by_slug("rau-cai-ngot").unwrap();

        ctx.cart_store().unwrap().add_to_cart(&product, 2).unwrap();

        let store = ctx.cart_store().unwrap();
        assert_eq!(store.line(&product.id).unwrap().quantity, 2);
    }

    #[test]
    fn test_bundled_catalog_loads() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = context_in(dir.path()).catalog().unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.product_by_slug("ca-hoi-phi-le").is_some());
    }
}
