use super::import::{ImportPhase, ImportResults};
use std::collections::BTreeSet;

/// Single source of truth for the import session.
///
/// `ImportState` is wrapped in `Arc<RwLock<ImportState>>` by
/// [`crate::state::StateManager`]; mutate it only through
/// [`update()`](crate::state::StateManager::update) so change events fire.
#[derive(Clone, Debug, Default)]
pub struct ImportState {
    pub phase: ImportPhase,

    /// Set for the whole scan → import span of a run.
    pub is_importing: bool,

    pub current_pack: Option<String>,
    pub current_file: Option<String>,
    pub message: String,

    // Progress
    pub pack_index: usize,
    pub total_packs: usize,
    pub files_processed: usize,
    pub total_files: usize,
    /// Never decreases within a run.
    pub percentage: f32,

    // Outcome of the last import
    pub imported_packs: BTreeSet<String>,
    pub failed_packs: BTreeSet<String>,
    pub last_results: Option<ImportResults>,
    pub last_error: Option<String>,
}

impl ImportState {
    /// Reset per-run progress, keeping the last results for display.
    pub fn reset_progress(&mut self) {
        self.phase = ImportPhase::Idle;
        self.is_importing = false;
        self.current_pack = None;
        self.current_file = None;
        self.message.clear();
        self.pack_index = 0;
        self.total_packs = 0;
        self.files_processed = 0;
        self.total_files = 0;
        self.percentage = 0.0;
    }

    /// Reset everything, including results.
    pub fn reset(&mut self) {
        self.reset_progress();
        self.imported_packs.clear();
        self.failed_packs.clear();
        self.last_results = None;
        self.last_error = None;
    }

    /// Raise the percentage to `value`; lower values are ignored.
    pub fn advance_percentage(&mut self, value: f32) {
        let value = value.clamp(0.0, 100.0);
        if value > self.percentage {
            self.percentage = value;
        }
    }

    /// Returns (imported, skipped, failed) from the last results.
    pub fn import_stats(&self) -> (usize, usize, usize) {
        self.last_results
            .as_ref()
            .map(|r| (r.total_imported, r.total_skipped, r.total_failed))
            .unwrap_or_default()
    }
}
