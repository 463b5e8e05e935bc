//! Phase progress for the stackplan CLI.

use composer::{Phase, ProgressCallback};

use crate::ui;

/// Prints a step line as each phase starts
pub struct StepProgress {
    quiet: bool,
    total: usize,
}

impl StepProgress {
    pub fn new(quiet: bool, dry_run: bool) -> Self {
        // a dry run stops before synthesis
        let total = if dry_run {
            Phase::ALL.len() - 1
        } else {
            Phase::ALL.len()
        };
        Self { quiet, total }
    }
}

impl ProgressCallback for StepProgress {
    fn on_phase_start(&mut self, phase: Phase) {
        if !self.quiet {
            ui::step(phase.step(), self.total, phase.description());
        }
    }

    fn on_phase_complete(&mut self, phase: Phase) {
        log::debug!("Phase {phase} complete");
    }
}
