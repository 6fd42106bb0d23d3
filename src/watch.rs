//! File system watcher for live rebuild.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐  notify::Event  ┌────────────────┐  RebuildRequest  ┌────────────────┐
//! │  notify  │────────────────▶│ forward_events │─────────────────▶│ rebuild worker │
//! │ callback │     (mpsc)      │   (filtering)  │      (mpsc)      │  build_site()  │
//! └──────────┘                 └────────────────┘                  └────────────────┘
//! ```
//!
//! Every relevant event becomes exactly one rebuild request; nothing is
//! debounced or coalesced. The single worker runs passes one at a time, in
//! arrival order. The dev server reads the output tree without a lock, so a
//! request that lands mid-rebuild can see a partially written file.

use crate::{build::build_site, config::SiteConfig, error::BuildResult, log};
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::{
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, Sender},
    thread,
};

/// A change that should trigger one build pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildRequest {
    pub path: PathBuf,
}

// =============================================================================
// Filtering
// =============================================================================

/// Editor swap and backup files: `name~`, `.#name`, vim `.swp`/`.swo`.
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "swp" | "swo") || name.ends_with('~') || name.starts_with(".#")
}

const fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    )
}

/// Turn a watcher event into a rebuild request.
///
/// Returns `None` for access events, editor temp files, and events whose
/// paths all lie inside the output tree.
pub fn rebuild_request(event: &Event, config: &SiteConfig) -> Option<RebuildRequest> {
    if !is_relevant(event) {
        return None;
    }

    event
        .paths
        .iter()
        .find(|path| !config.is_output_path(path) && !is_temp_file(path))
        .map(|path| RebuildRequest { path: path.clone() })
}

/// Format path relative to the project root for log display.
fn rel_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

// =============================================================================
// Event Loop
// =============================================================================

/// Filter raw watcher events into rebuild requests until either side closes.
pub fn forward_events(
    events: &Receiver<notify::Result<Event>>,
    requests: &Sender<RebuildRequest>,
    config: &SiteConfig,
) {
    for event in events {
        match event {
            Ok(event) => {
                if let Some(request) = rebuild_request(&event, config)
                    && requests.send(request).is_err()
                {
                    break;
                }
            }
            Err(e) => log!("watch"; "error: {e}"),
        }
    }
}

/// Consume rebuild requests serially. Returns the number of passes run.
///
/// A failed pass is logged; the worker keeps going.
pub fn run_rebuild_worker(
    requests: Receiver<RebuildRequest>,
    config: &SiteConfig,
    mut rebuild: impl FnMut(&SiteConfig) -> BuildResult<()>,
) -> usize {
    let mut passes = 0;

    for request in requests {
        log!("watch"; "{} changed, rebuilding...", rel_path(&request.path, &config.root));
        if let Err(e) = rebuild(config) {
            log!("error"; "build failed: {:#}", anyhow::Error::new(e));
        }
        passes += 1;
    }

    passes
}

// =============================================================================
// Public API
// =============================================================================

/// Watch the project root and rebuild on every relevant change. Blocks.
pub fn watch_for_changes_blocking(config: &'static SiteConfig) -> Result<()> {
    let (event_tx, event_rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(event_tx).context("Failed to create file watcher")?;
    watcher
        .watch(&config.root, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {}", config.root.display()))?;

    log!("watch"; "{} (ignoring {}/)", config.root.display(), rel_path(&config.build.output, &config.root));

    let (request_tx, request_rx) = mpsc::channel();
    let worker = thread::spawn(move || run_rebuild_worker(request_rx, config, build_site));

    forward_events(&event_rx, &request_tx, config);

    drop(request_tx);
    worker
        .join()
        .map_err(|_| anyhow::anyhow!("rebuild worker panicked"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::error::BuildError;
    use clap::Parser;
    use notify::event::{AccessKind, CreateKind, ModifyKind, RemoveKind};
    use std::io;
    use tempfile::TempDir;

    fn config() -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let cli = Cli::try_parse_from(["stitch", "dev"]).unwrap();
        let config = SiteConfig::load(&cli, dir.path()).unwrap();
        (dir, config)
    }

    fn event(kind: EventKind, path: PathBuf) -> Event {
        Event::new(kind).add_path(path)
    }

    #[test]
    fn test_source_change_requests_rebuild() {
        let (_dir, config) = config();
        let path = config.root.join("header.html");
        let ev = event(EventKind::Modify(ModifyKind::Any), path.clone());
        assert_eq!(rebuild_request(&ev, &config), Some(RebuildRequest { path }));
    }

    #[test]
    fn test_output_change_is_ignored() {
        let (_dir, config) = config();
        let ev = event(
            EventKind::Create(CreateKind::File),
            config.build.output.join("index.html"),
        );
        assert_eq!(rebuild_request(&ev, &config), None);

        let ev = event(
            EventKind::Modify(ModifyKind::Any),
            config.media_output_dir().join("a.png"),
        );
        assert_eq!(rebuild_request(&ev, &config), None);
    }

    #[test]
    fn test_mixed_paths_use_first_source_path() {
        let (_dir, config) = config();
        let source = config.root.join("assets/scss/main.scss");
        let ev = Event::new(EventKind::Remove(RemoveKind::File))
            .add_path(config.build.output.join("public/css/main.css"))
            .add_path(source.clone());
        assert_eq!(rebuild_request(&ev, &config), Some(RebuildRequest { path: source }));
    }

    #[test]
    fn test_access_and_temp_files_ignored() {
        let (_dir, config) = config();
        let ev = event(EventKind::Access(AccessKind::Any), config.root.join("index.html"));
        assert_eq!(rebuild_request(&ev, &config), None);

        for name in ["index.html.swp", ".index.html.swo", "index.html~", ".#index.html"] {
            let ev = event(EventKind::Modify(ModifyKind::Any), config.root.join(name));
            assert_eq!(rebuild_request(&ev, &config), None, "{name}");
        }
    }

    #[test]
    fn test_backup_like_sources_still_rebuild() {
        let (_dir, config) = config();
        for name in ["assets/media/x.bak", "assets/media/x.tmp", "notes.backup"] {
            let path = config.root.join(name);
            let ev = event(EventKind::Create(CreateKind::File), path.clone());
            assert_eq!(rebuild_request(&ev, &config), Some(RebuildRequest { path }), "{name}");
        }
    }

    #[test]
    fn test_forward_events_filters() {
        let (_dir, config) = config();
        let (event_tx, event_rx) = mpsc::channel();
        let (request_tx, request_rx) = mpsc::channel();

        event_tx
            .send(Ok(event(
                EventKind::Modify(ModifyKind::Any),
                config.build.output.join("index.html"),
            )))
            .unwrap();
        event_tx
            .send(Err(notify::Error::generic("backend hiccup")))
            .unwrap();
        event_tx
            .send(Ok(event(
                EventKind::Modify(ModifyKind::Any),
                config.root.join("index.html"),
            )))
            .unwrap();
        event_tx
            .send(Ok(event(
                EventKind::Create(CreateKind::File),
                config.root.join("nav.html"),
            )))
            .unwrap();
        drop(event_tx);

        forward_events(&event_rx, &request_tx, &config);
        drop(request_tx);

        let paths: Vec<_> = request_rx.iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            vec![config.root.join("index.html"), config.root.join("nav.html")]
        );
    }

    #[test]
    fn test_worker_runs_one_pass_per_request() {
        let (_dir, config) = config();
        let (tx, rx) = mpsc::channel();
        for name in ["a.html", "a.html", "b.html"] {
            tx.send(RebuildRequest {
                path: config.root.join(name),
            })
            .unwrap();
        }
        drop(tx);

        let mut calls = 0;
        let passes = run_rebuild_worker(rx, &config, |_| {
            calls += 1;
            Ok(())
        });
        assert_eq!(passes, 3);
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_worker_survives_failed_pass() {
        let (_dir, config) = config();
        let (tx, rx) = mpsc::channel();
        for _ in 0..2 {
            tx.send(RebuildRequest {
                path: config.root.join("index.html"),
            })
            .unwrap();
        }
        drop(tx);

        let mut outcomes = vec![
            Ok(()),
            Err(BuildError::io("dist/index.html", io::Error::other("disk full"))),
        ];
        let passes = run_rebuild_worker(rx, &config, |_| outcomes.pop().unwrap());
        assert_eq!(passes, 2);
        assert!(outcomes.is_empty());
    }

    #[test]
    fn test_no_events_no_rebuild() {
        let (_dir, config) = config();
        let (tx, rx) = mpsc::channel::<RebuildRequest>();
        drop(tx);
        assert_eq!(run_rebuild_worker(rx, &config, |_| panic!("should not build")), 0);
    }
}
