//! Configuration file watcher for hot reload.
//!
//! The parent directory is watched, not the file itself: editors that save by
//! renaming a temp file, and mounted volumes that swap a `..data` symlink,
//! replace the inode a file watch would be attached to. Event bursts are
//! coalesced and a new config is only published when the file text changed.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::parse_config;
use crate::config::schema::GateConfig;
use crate::observability::metrics;

/// Quiet period before a burst of file events is acted on.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Watches the configuration file and publishes validated reloads.
pub struct ConfigWatcher {
    path: PathBuf,
    debounce: Duration,
    update_tx: mpsc::UnboundedSender<GateConfig>,
}

impl ConfigWatcher {
    /// Create a watcher for `path` and the receiver its reloads arrive on.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<GateConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            debounce: DEFAULT_DEBOUNCE,
            update_tx,
        };
        (watcher, update_rx)
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Start watching. Must be called inside a Tokio runtime.
    ///
    /// The returned handle must be kept alive for updates to keep flowing;
    /// dropping it stops the reload task as well.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let file_name = self
            .path
            .file_name()
            .map(OsStr::to_os_string)
            .ok_or_else(|| notify::Error::generic("config path has no file name"))?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if touches_config(&event, &file_name) {
                        let _ = event_tx.send(());
                    }
                }
                Err(e) => tracing::error!(error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        let current = std::fs::read_to_string(&self.path).ok();
        tokio::spawn(reload_loop(
            self.path.clone(),
            self.debounce,
            current,
            event_rx,
            self.update_tx,
        ));

        tracing::info!(path = ?self.path, dir = ?dir, "Config watcher started");
        Ok(watcher)
    }
}

/// Whether a directory event may have changed the config file.
fn touches_config(event: &Event, file_name: &OsStr) -> bool {
    if !(event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove()) {
        return false;
    }
    event.paths.iter().any(|p| {
        p.file_name()
            .is_some_and(|name| name == file_name || name.to_string_lossy().starts_with(".."))
    })
}

async fn reload_loop(
    path: PathBuf,
    debounce: Duration,
    mut current: Option<String>,
    mut events: mpsc::UnboundedReceiver<()>,
    updates: mpsc::UnboundedSender<GateConfig>,
) {
    while events.recv().await.is_some() {
        tokio::time::sleep(debounce).await;
        while events.try_recv().is_ok() {}

        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "Config file unreadable, keeping current configuration");
                continue;
            }
        };
        if current.as_deref() == Some(text.as_str()) {
            tracing::debug!(path = ?path, "Config file touched without changes");
            continue;
        }

        match parse_config(&text) {
            Ok(config) => {
                tracing::info!(path = ?path, "Config file changed, reloading");
                current = Some(text);
                if updates.send(config).is_err() {
                    break;
                }
            }
            Err(e) => {
                metrics::record_config_reload(false);
                tracing::error!(error = %e, "Failed to reload config, keeping current configuration");
            }
        }
    }
}
