// Copyright (c) 2025-2026 the sentinel-packs contributors
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use console::Term;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Stage name constants for consistent progress tracking.
pub mod stages {
    /// Directory walk (spinner, folder count unknown up front).
    pub const SCANNING: &str = "scanning";
    /// Per-folder parse, assemble and write.
    pub const PACKING: &str = "packing";
}

/// Manager for multi-stage progress bars.
///
/// `ProgressManager` coordinates the progress bars of a run using indicatif's
/// `MultiProgress`. Each stage has its own bar with a stage-specific style.
///
/// # Example
///
/// ```no_run
/// use sentinel_packs::utils::progress::{ProgressManager, stages};
///
/// let mut manager = ProgressManager::new();
/// let _packing = manager.add_stage(stages::PACKING, 12);
/// manager.update(stages::PACKING, 3, "Network/DNS");
/// manager.finish(stages::PACKING, "Generated 12 packs");
/// ```
///
/// # TTY Detection
///
/// When stderr is not a TTY (piped output, CI), or the manager was built with
/// [`ProgressManager::hidden`], bars are hidden and produce no output.
pub struct ProgressManager {
    /// The underlying multi-progress container.
    multi: MultiProgress,
    /// Map of stage names to their progress bars.
    bars: HashMap<String, ProgressBar>,
    /// Whether bars are drawn at all.
    visible: bool,
}

impl ProgressManager {
    /// Creates a new progress manager, visible only on a terminal.
    #[must_use]
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: HashMap::new(),
            visible: Term::stderr().is_term(),
        }
    }

    /// Creates a manager whose bars never draw.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: HashMap::new(),
            visible: false,
        }
    }

    /// Adds a new progress stage with a stage-specific style.
    ///
    /// `total` is ignored for the scanning spinner.
    #[must_use]
    pub fn add_stage(&mut self, name: &str, total: u64) -> ProgressBar {
        let pb = if self.visible {
            if name == stages::SCANNING {
                let spinner = ProgressBar::new_spinner();
                spinner.enable_steady_tick(std::time::Duration::from_millis(100));
                self.multi.add(spinner)
            } else {
                self.multi.add(ProgressBar::new(total))
            }
        } else {
            ProgressBar::hidden()
        };

        pb.set_style(Self::style_for_stage(name));
        self.bars.insert(name.to_string(), pb.clone());
        pb
    }

    /// Updates the position and message of a stage. Unknown stages are ignored.
    pub fn update(&self, stage: &str, current: u64, message: &str) {
        if let Some(pb) = self.bars.get(stage) {
            pb.set_position(current);
            pb.set_message(message.to_string());
        }
    }

    /// Clears a stage's bar and prints a completion message above the others.
    pub fn finish(&self, stage: &str, message: &str) {
        if let Some(pb) = self.bars.get(stage) {
            pb.finish_and_clear();
            if self.visible {
                let _ = self.multi.println(message);
            }
        }
    }

    /// Abandons a stage, leaving its bar as-is.
    pub fn abandon(&self, stage: &str) {
        if let Some(pb) = self.bars.get(stage) {
            pb.abandon();
        }
    }

    fn style_for_stage(name: &str) -> ProgressStyle {
        let template = match name {
            stages::SCANNING => "{spinner:.green} Scanning query files... {msg}",
            stages::PACKING => "[{bar:40.cyan/blue}] {pos}/{len} Packing {msg}",
            _ => "[{bar:40.cyan/blue}] {pos}/{len} {msg}",
        };

        ProgressStyle::default_bar()
            .template(template)
            .unwrap_or_else(|e| {
                tracing::warn!(
                    "Failed to parse progress style template for stage '{}': {e}",
                    name
                );
                ProgressStyle::default_bar()
            })
            .progress_chars("#>-")
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProgressManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressManager")
            .field("stages", &self.bars.keys().collect::<Vec<_>>())
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}
