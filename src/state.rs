use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use anyhow::Result;

use crate::data::aggregate::{aggregate_by_age, surviving_records};
use crate::data::loader::load_file;
use crate::data::model::{AggregatePoint, Metric, PlayerDataset, Selection};
use crate::transition::BarTransitions;

/// Inclusive bounds of the minimum-games-played slider (one regular season).
pub const MIN_GAMES_RANGE: std::ops::RangeInclusive<u32> = 0..=82;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until the first load completes).
    pub dataset: Option<PlayerDataset>,

    /// Metric and games-played threshold chosen in the side panel.
    pub selection: Selection,

    /// Per-age means for the current selection, rebuilt on every change.
    pub aggregate: Vec<AggregatePoint>,

    /// Keyed bar animations driven by `aggregate`.
    pub bars: BarTransitions,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Receiver for a load running on a background thread.
    pending_load: Option<Receiver<Result<PlayerDataset>>>,
}

impl AppState {
    /// Whether a file loading operation is in progress.
    pub fn loading(&self) -> bool {
        self.pending_load.is_some()
    }

    /// Controls stay inert until there is data to aggregate.
    pub fn controls_enabled(&self) -> bool {
        self.dataset.is_some()
    }

    /// Load `path` on a background thread. `on_done` runs on that thread
    /// once the result is sent (used to wake the UI).
    ///
    /// A newer request supersedes an older one; the stale result is dropped.
    pub fn begin_load(&mut self, path: PathBuf, on_done: impl FnOnce() + Send + 'static) {
        let (tx, rx) = mpsc::channel();
        log::info!("Loading {}", path.display());
        std::thread::spawn(move || {
            // The receiver is gone if a newer load replaced this one.
            let _ = tx.send(load_file(&path));
            on_done();
        });
        self.pending_load = Some(rx);
        self.status_message = None;
    }

    /// Apply a finished background load, if any. Returns `true` when the
    /// pending load resolved during this call.
    pub fn poll_load(&mut self, now: f64) -> bool {
        let Some(rx) = &self.pending_load else {
            return false;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                Err(anyhow::anyhow!("loader thread exited without a result"))
            }
        };
        self.pending_load = None;
        self.finish_load(outcome, now);
        true
    }

    fn finish_load(&mut self, outcome: Result<PlayerDataset>, now: f64) {
        match outcome {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} player seasons ({} of {} rows skipped)",
                    dataset.len(),
                    dataset.rows_rejected,
                    dataset.rows_read
                );
                self.set_dataset(dataset, now);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and redraw with the current selection.
    pub fn set_dataset(&mut self, dataset: PlayerDataset, now: f64) {
        self.dataset = Some(dataset);
        self.status_message = None;
        self.recompute(now);
    }

    /// Switch the averaged metric.
    pub fn set_metric(&mut self, metric: Metric, now: f64) {
        if self.selection.metric == metric {
            return;
        }
        log::debug!("Metric → {}", metric.key());
        self.selection.metric = metric;
        self.recompute(now);
    }

    /// Change the games-played threshold, clamped to the slider range.
    pub fn set_min_games_played(&mut self, min_games_played: u32, now: f64) {
        let clamped = min_games_played.clamp(*MIN_GAMES_RANGE.start(), *MIN_GAMES_RANGE.end());
        if self.selection.min_games_played == clamped {
            return;
        }
        log::debug!("Min games played → {clamped}");
        self.selection.min_games_played = clamped;
        self.recompute(now);
    }

    /// Rebuild the aggregate from scratch and start bar transitions towards it.
    pub fn recompute(&mut self, now: f64) {
        let Some(ds) = &self.dataset else {
            return;
        };
        self.aggregate = aggregate_by_age(
            &ds.records,
            self.selection.metric,
            self.selection.min_games_played,
        );
        let diff = self.bars.retarget(&self.aggregate, now);
        log::debug!(
            "Bars: {} entering, {} updating, {} exiting",
            diff.entering.len(),
            diff.updating.len(),
            diff.exiting.len()
        );
    }

    /// Records passing the current threshold.
    pub fn surviving_count(&self) -> usize {
        self.dataset
            .as_ref()
            .map(|ds| surviving_records(&ds.records, self.selection.min_games_played).count())
            .unwrap_or(0)
    }

    /// Chart heading, e.g. "Average Points Per Game by Age (GP ≥ 20)".
    pub fn title(&self) -> String {
        let label = self.selection.metric.label();
        match self.selection.min_games_played {
            0 => format!("{label} by Age"),
            n => format!("{label} by Age (GP ≥ {n})"),
        }
    }
}
