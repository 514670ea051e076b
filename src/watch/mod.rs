//! Single-path watch and the dispatch loop that turns notifications into previews
//!
//! `start` registers the path with the OS notification mechanism and splits its output into
//! a notification stream and an error stream. `run` owns the registration for the rest of the
//! process and dispatches from both streams. Previews are fire-and-forget: one OS thread per
//! qualifying write, never joined and with no cap on how many run at once.

pub mod event;

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::thread;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

use crate::config::PreviewConfig;
use crate::error::{PreviewError, WatchSetupError};
use crate::preview::{self, PreviewOutcome};

pub use event::{ChangeNotification, OpMask};

/// A live watch registration. Dropping it stops watching.
pub struct WatchHandle {
    target: PathBuf,
    _watcher: RecommendedWatcher,
    events: UnboundedReceiver<Event>,
    errors: UnboundedReceiver<notify::Error>,
}

impl WatchHandle {
    pub fn target(&self) -> &Path {
        &self.target
    }
}

/// Launches a preview for one path without waiting for it
pub trait PreviewSpawner {
    fn spawn(&self, path: PathBuf, config: PreviewConfig);
}

/// A finished preview, as seen by whoever asked to be told
#[derive(Debug)]
pub struct PreviewReport {
    pub path: PathBuf,
    pub result: Result<PreviewOutcome, PreviewError>,
}

/// Runs each preview on a dedicated OS thread and writes it to stdout.
///
/// Threads are detached and not pooled, so a read wedged on a slow filesystem holds only its own thread.
#[derive(Debug, Clone, Default)]
pub struct ThreadSpawner {
    reports: Option<UnboundedSender<PreviewReport>>,
}

impl ThreadSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also send every finished preview to `reports`
    pub fn with_reports(reports: UnboundedSender<PreviewReport>) -> Self {
        Self {
            reports: Some(reports),
        }
    }
}

impl PreviewSpawner for ThreadSpawner {
    fn spawn(&self, path: PathBuf, config: PreviewConfig) {
        let reports = self.reports.clone();
        let spawned = thread::Builder::new()
            .name("fspeek-preview".to_string())
            .spawn(move || {
                let result = preview::preview_to_stdout(&path, &config);
                if let Some(reports) = reports {
                    // Nobody listening any more is fine
                    let _ = reports.send(PreviewReport { path, result });
                }
            });

        // Detached: the JoinHandle is dropped on purpose
        if let Err(e) = spawned {
            error!(error = %e, "failed to start preview thread");
        }
    }
}

/// Register `target` (non-recursively) with the OS notification mechanism
pub fn start(target: &Path) -> Result<WatchHandle, WatchSetupError> {
    if !target.exists() {
        return Err(WatchSetupError::NotFound(target.to_path_buf()));
    }

    let (events_tx, events) = mpsc::unbounded_channel::<Event>();
    let (errors_tx, errors) = mpsc::unbounded_channel::<notify::Error>();

    let setup_err = |source: notify::Error| WatchSetupError::Notify {
        path: target.to_path_buf(),
        source,
    };

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            // Send fails only once the dispatcher is gone
            Ok(event) => {
                let _ = events_tx.send(event);
            }
            Err(e) => {
                let _ = errors_tx.send(e);
            }
        },
        notify::Config::default(),
    )
    .map_err(setup_err)?;

    watcher
        .watch(target, RecursiveMode::NonRecursive)
        .map_err(setup_err)?;

    debug!(path = %target.display(), "watch registered");

    Ok(WatchHandle {
        target: target.to_path_buf(),
        _watcher: watcher,
        events,
        errors,
    })
}

/// Dispatch notifications from `handle` until one of its streams closes
pub async fn run(handle: WatchHandle, config: PreviewConfig) {
    let WatchHandle {
        target,
        _watcher,
        events,
        errors,
    } = handle;

    info!(path = %target.display(), preview = config.enabled, "dispatch loop started");
    dispatch(events, errors, config, ThreadSpawner::new()).await;
}

/// The dispatch loop over a notification stream and an error stream.
///
/// Errors are logged and never end the loop; a closed stream does.
pub async fn dispatch<S: PreviewSpawner>(
    mut events: UnboundedReceiver<Event>,
    mut errors: UnboundedReceiver<notify::Error>,
    config: PreviewConfig,
    spawner: S,
) {
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => handle_event(&event, &config, &spawner),
                None => {
                    debug!("notification stream closed");
                    break;
                }
            },
            err = errors.recv() => match err {
                Some(err) => warn!(error = %err, "error: {}", err),
                None => {
                    debug!("error stream closed");
                    break;
                }
            },
        }
    }

    info!("dispatch loop stopped");
}

/// Whether a notification gets a content preview. Create alone never does.
pub fn should_preview(notification: &ChangeNotification, config: &PreviewConfig) -> bool {
    config.enabled && notification.ops.intersects(OpMask::WRITE)
}

fn handle_event<S: PreviewSpawner>(event: &Event, config: &PreviewConfig, spawner: &S) {
    if event.paths.is_empty() {
        debug!(kind = ?event.kind, "event without paths: {:?}", event.kind);
        return;
    }

    for notification in ChangeNotification::from_event(event) {
        if notification.ops.is_empty() {
            debug!(path = %notification.path.display(), kind = ?event.kind, "event ignored");
            continue;
        }

        info!(
            path = %notification.path.display(),
            ops = %notification.ops,
            "event: {}",
            notification
        );

        if should_preview(&notification, config) {
            spawner.spawn(notification.path, *config);
        }
    }
}
