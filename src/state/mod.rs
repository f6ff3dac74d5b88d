// State management module
//
// This module provides the StateManager which wraps ImportState with thread-safe access
// using Arc<RwLock<T>> and emits change events for progress displays.

use crate::models::{ImportPhase, ImportProgress, ImportResults, ImportState};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// Change events emitted when state is modified
///
/// These events notify interested parties (progress bars, the CLI, tests)
/// about state changes without requiring them to poll the state.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// The session moved to another phase
    PhaseChanged { phase: ImportPhase },

    /// Progress has been updated
    ProgressUpdated {
        pack_name: Option<String>,
        current_file: Option<String>,
        files_processed: usize,
        total_files: usize,
        percentage: f32,
    },

    /// A scan or import run has claimed the session
    ImportStarted,

    /// The import phase completed
    ImportFinished {
        imported: usize,
        skipped: usize,
        failed: usize,
    },

    /// A run was aborted
    ImportFailed { message: String },

    /// State has been reset
    StateReset,
}

/// Thread-safe import session state with event emission
///
/// - Provides thread-safe access to [`ImportState`] via `Arc<RwLock<T>>`
/// - Detects state changes and emits [`StateChange`] events
/// - Enforces the single in-flight run rule ([`try_begin`](Self::try_begin))
/// - Supports subscribing to state changes via tokio broadcast channels
pub struct StateManager {
    state: Arc<RwLock<ImportState>>,

    /// Multiple subscribers can listen for state changes
    state_tx: broadcast::Sender<StateChange>,
}

impl StateManager {
    /// Create a new StateManager with default state and a 100 event buffer.
    pub fn new() -> Self {
        let (state_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(ImportState::default())),
            state_tx,
        }
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> ImportState {
        self.state.read().unwrap().clone()
    }

    /// Execute a function with read access to the state
    ///
    /// # Example
    /// ```ignore
    /// let busy = state_manager.read(|state| state.is_importing);
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ImportState) -> R,
    {
        let state = self.state.read().unwrap();
        f(&state)
    }

    /// Update the state and emit change events
    ///
    /// This is the primary way to modify state. It:
    /// 1. Captures the old state
    /// 2. Applies the update function
    /// 3. Detects what changed
    /// 4. Emits appropriate events
    pub fn update<F>(&self, update_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut ImportState),
    {
        let mut state = self.state.write().unwrap();
        let old_state = state.clone();

        update_fn(&mut state);

        let changes = self.detect_changes(&old_state, &state);
        for change in &changes {
            // Ignore send errors - it's OK if no one is listening
            let _ = self.state_tx.send(change.clone());
        }

        changes
    }

    /// Subscribe to state change events
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    fn emit(&self, change: StateChange, changes: &mut Vec<StateChange>) {
        let _ = self.state_tx.send(change.clone());
        changes.push(change);
    }

    fn detect_changes(&self, old: &ImportState, new: &ImportState) -> Vec<StateChange> {
        let mut changes = Vec::new();

        if !old.is_importing && new.is_importing {
            changes.push(StateChange::ImportStarted);
        }

        if old.phase != new.phase {
            changes.push(StateChange::PhaseChanged { phase: new.phase });
        }

        if old.files_processed != new.files_processed
            || old.total_files != new.total_files
            || old.current_file != new.current_file
            || old.current_pack != new.current_pack
            || old.percentage != new.percentage
        {
            changes.push(StateChange::ProgressUpdated {
                pack_name: new.current_pack.clone(),
                current_file: new.current_file.clone(),
                files_processed: new.files_processed,
                total_files: new.total_files,
                percentage: new.percentage,
            });
        }

        changes
    }

    // Convenience methods for the import session

    /// Claim the session for a run starting in `phase`.
    ///
    /// Returns `false` without changing anything if a run is already in
    /// flight. The check and the claim happen under one write lock.
    pub fn try_begin(&self, phase: ImportPhase) -> bool {
        let mut claimed = false;
        self.update(|state| {
            if state.is_importing {
                return;
            }
            state.reset_progress();
            state.is_importing = true;
            state.phase = phase;
            state.last_error = None;
            claimed = true;
        });
        claimed
    }

    pub fn set_phase(&self, phase: ImportPhase, message: impl Into<String>) -> Vec<StateChange> {
        let message = message.into();
        self.update(|state| {
            state.phase = phase;
            state.message = message;
        })
    }

    /// Mirror a progress report into the state. The percentage never regresses.
    pub fn apply_progress(&self, progress: &ImportProgress) -> Vec<StateChange> {
        self.update(|state| {
            state.phase = progress.phase;
            state.pack_index = progress.pack_index;
            state.total_packs = progress.total_packs;
            state.current_pack = Some(progress.pack_name.clone()).filter(|name| !name.is_empty());
            state.current_file = progress.current_file.clone();
            state.files_processed = progress.files_processed;
            state.total_files = progress.total_files;
            state.message = progress.message.clone();
            state.advance_percentage(progress.percentage);
        })
    }

    /// Release the session after scanning, with a preview waiting for a decision.
    pub fn preview_ready(&self, total_packs: usize) -> Vec<StateChange> {
        self.update(|state| {
            state.is_importing = false;
            state.phase = ImportPhase::PreviewReady;
            state.total_packs = total_packs;
            state.current_file = None;
            state.message = format!("{} pack(s) ready to import", total_packs);
        })
    }

    /// Record import results and return to idle.
    pub fn finish_import(&self, results: ImportResults) -> Vec<StateChange> {
        let finished = StateChange::ImportFinished {
            imported: results.total_imported,
            skipped: results.total_skipped,
            failed: results.total_failed,
        };

        let mut changes = self.update(|state| {
            for pack in &results.packs {
                state.imported_packs.insert(pack.pack_name.clone());
            }
            for error in &results.errors {
                state.failed_packs.insert(error.pack.clone());
            }
            state.advance_percentage(100.0);
            state.is_importing = false;
            state.phase = ImportPhase::Idle;
            state.current_file = None;
            state.message = "Import complete".to_string();
            state.last_results = Some(results);
        });

        self.emit(finished, &mut changes);
        changes
    }

    /// Abort the current run with a user-facing message.
    pub fn fail(&self, message: impl Into<String>) -> Vec<StateChange> {
        let message = message.into();
        let mut changes = self.update(|state| {
            state.is_importing = false;
            state.phase = ImportPhase::Idle;
            state.current_file = None;
            state.message = message.clone();
            state.last_error = Some(message.clone());
        });

        self.emit(StateChange::ImportFailed { message }, &mut changes);
        changes
    }

    /// Reset all session state
    pub fn reset(&self) -> Vec<StateChange> {
        let mut changes = self.update(|state| state.reset());
        self.emit(StateChange::StateReset, &mut changes);
        changes
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            state_tx: self.state_tx.clone(),
        }
    }
}
