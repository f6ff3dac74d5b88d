//! Import pipeline orchestrator.
//!
//! [`PackImporter`] drives one session through two calls:
//!
//! - [`start_import`](PackImporter::start_import): `Idle → Scanning → Parsing →
//!   Validating → PreviewReady`, producing an [`ImportPreview`]
//! - [`handle_import`](PackImporter::handle_import): `PreviewReady → Importing → Idle`,
//!   merging the selected packs through a [`PackManager`]
//!
//! Files and packs are processed strictly in order. Only one run may hold the
//! session at a time; a second call is rejected, never queued.

use crate::metrics::Metrics;
use crate::models::{
    FolderType, GameTables, ImportOptions, ImportPhase, ImportPreview, ImportProgress,
    ImportResults, ImportSelection, PackError, PackParseResults, PackPreview, ParsedFile,
    ScanResults, ScannedPack,
};
use crate::services::executor::ImportExecutor;
use crate::services::pack_manager::PackManager;
use crate::services::parser::YamlFileParser;
use crate::services::scanner::{PackFolderScanner, ScanError, SelectedFile};
use crate::services::validator::DataValidator;
use crate::state::StateManager;
use camino::Utf8PathBuf;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::watch;

/// Receives every progress report of a run, in order.
pub type ProgressCallback = Arc<dyn Fn(&ImportProgress) + Send + Sync>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("An import is already in progress")]
    AlreadyInProgress,

    #[error("No MythicMobs packs found in \"{0}\"")]
    NoPacksFound(String),

    #[error("No packs selected for import")]
    NothingSelected,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error(transparent)]
    Scan(ScanError),

    #[error("Pack manager unavailable: {0}")]
    PackManager(String),

    #[error("Import cancelled")]
    Cancelled,

    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<ScanError> for PipelineError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::AccessDenied(path) => PipelineError::AccessDenied(path),
            other => PipelineError::Scan(other),
        }
    }
}

/// How the selected folder reaches the importer.
#[derive(Debug, Clone)]
pub enum ImportSource {
    /// A real directory, walked on disk.
    Directory(Utf8PathBuf),
    /// Files handed over by a picker that cannot expose a directory.
    FileList(Vec<SelectedFile>),
}

/// Progress of one phase, spread over `span` percent starting at `offset`.
struct PhaseProgress {
    phase: ImportPhase,
    total_packs: usize,
    total_files: usize,
    files_processed: usize,
    offset: f32,
    span: f32,
}

impl PhaseProgress {
    fn new(phase: ImportPhase, total_packs: usize, total_files: usize, offset: f32, span: f32) -> Self {
        Self {
            phase,
            total_packs,
            total_files,
            files_processed: 0,
            offset,
            span,
        }
    }

    fn percentage(&self) -> f32 {
        if self.total_files == 0 {
            return self.offset + self.span;
        }
        self.offset + self.span * self.files_processed as f32 / self.total_files as f32
    }

    /// Count one finished file and describe it.
    fn advance(&mut self, pack_index: usize, pack_name: &str, file: &str) -> ImportProgress {
        self.files_processed = (self.files_processed + 1).min(self.total_files);
        ImportProgress {
            phase: self.phase,
            pack_index,
            total_packs: self.total_packs,
            pack_name: pack_name.to_string(),
            current_file: Some(file.to_string()),
            files_processed: self.files_processed,
            total_files: self.total_files,
            percentage: self.percentage(),
            message: format!("{} {}", capitalize(&self.phase.to_string()), file),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Requests cancellation of whatever phase a [`PackImporter`] is running.
///
/// Checked between files and packs; a file read already in flight finishes.
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<watch::Sender<bool>>);

impl CancelHandle {
    fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self(Arc::new(tx))
    }

    pub fn cancel(&self) {
        tracing::info!("Cancellation requested");
        self.0.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }

    /// Receiver that observes the flag, e.g. to `select!` on it.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.0.subscribe()
    }

    fn clear(&self) {
        self.0.send_replace(false);
    }
}

/// The import session orchestrator.
pub struct PackImporter {
    parser: YamlFileParser,
    validator: DataValidator,
    executor: ImportExecutor,
    state: StateManager,
    metrics: Arc<Metrics>,
    cancel: CancelHandle,
    progress: Option<ProgressCallback>,
}

impl PackImporter {
    pub fn new(tables: Arc<GameTables>, state: StateManager) -> Self {
        Self {
            parser: YamlFileParser::new(),
            validator: DataValidator::new(Arc::clone(&tables)),
            executor: ImportExecutor::new(tables),
            state,
            metrics: Arc::new(Metrics::new()),
            cancel: CancelHandle::new(),
            progress: None,
        }
    }

    /// Register a callback invoked with every progress report.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn state(&self) -> &StateManager {
        &self.state
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Ask the running phase to stop scheduling new files and packs.
    pub fn request_cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn report(&self, progress: ImportProgress) {
        self.state.apply_progress(&progress);
        if let Some(callback) = &self.progress {
            callback(&progress);
        }
    }

    /// Scan, parse and validate `source`.
    ///
    /// `None` stands for a dismissed folder picker and returns `Ok(None)`
    /// without touching the session.
    ///
    /// # Errors
    /// [`PipelineError::AlreadyInProgress`] if another run holds the session;
    /// any other error aborts the run and is recorded as the session's last error.
    pub async fn start_import(
        &self,
        source: Option<ImportSource>,
    ) -> Result<Option<ImportPreview>, PipelineError> {
        let Some(source) = source else {
            tracing::debug!("No folder selected, nothing to do");
            return Ok(None);
        };

        if !self.state.try_begin(ImportPhase::Scanning) {
            tracing::warn!("Rejected scan request: an import is already in progress");
            return Err(PipelineError::AlreadyInProgress);
        }
        self.cancel.clear();

        match self.build_preview(source).await {
            Ok(preview) => {
                tracing::info!(
                    "Preview ready: {} pack(s), {} entries",
                    preview.packs.len(),
                    preview.total_entries()
                );
                self.state.preview_ready(preview.packs.len());
                Ok(Some(preview))
            }
            Err(err) => {
                tracing::error!("Import preview failed: {}", err);
                self.state.fail(err.to_string());
                Err(err)
            }
        }
    }

    async fn build_preview(&self, source: ImportSource) -> Result<ImportPreview, PipelineError> {
        self.state.set_phase(ImportPhase::Scanning, "Scanning for packs");
        let started = Instant::now();
        let scan = scan_source(source).await?;
        self.metrics
            .record_phase_time(ImportPhase::Scanning, started.elapsed());

        if scan.packs.is_empty() {
            return Err(PipelineError::NoPacksFound(scan.root_name));
        }
        tracing::info!(
            "Found {} pack(s) with {} file(s) in {}",
            scan.summary.total_packs,
            scan.summary.total_files,
            scan.root_name
        );

        let total_packs = scan.packs.len();
        let total_files = scan.summary.total_files;

        // Parsing fills the first half of the bar, validation the second.
        self.state.set_phase(ImportPhase::Parsing, "Parsing pack files");
        let started = Instant::now();
        let mut parse_progress =
            PhaseProgress::new(ImportPhase::Parsing, total_packs, total_files, 0.0, 50.0);
        let mut parsed = Vec::with_capacity(total_packs);
        for (index, pack) in scan.packs.iter().enumerate() {
            parsed.push(self.parse_pack(index, pack, &mut parse_progress).await?);
        }
        self.metrics
            .record_phase_time(ImportPhase::Parsing, started.elapsed());

        self.state.set_phase(ImportPhase::Validating, "Validating entries");
        let started = Instant::now();
        let mut validate_progress =
            PhaseProgress::new(ImportPhase::Validating, total_packs, total_files, 50.0, 50.0);
        let mut packs = Vec::with_capacity(total_packs);
        for (index, parse) in parsed.into_iter().enumerate() {
            if self.is_cancelled() {
                return Err(PipelineError::Cancelled);
            }
            let validation = self
                .validator
                .validate_pack_with_progress(&parse, |_, _, file| {
                    self.report(validate_progress.advance(index, &parse.pack_name, file));
                });
            tracing::info!(
                "Validated {}: {} entries, {} critical, {} warnings",
                parse.pack_name,
                validation.summary.total_entries,
                validation.summary.critical_errors,
                validation.summary.warnings
            );
            packs.push(PackPreview { parse, validation });
            tokio::task::yield_now().await;
        }
        self.metrics
            .record_phase_time(ImportPhase::Validating, started.elapsed());

        Ok(ImportPreview { scan, packs })
    }

    async fn parse_pack(
        &self,
        pack_index: usize,
        pack: &ScannedPack,
        progress: &mut PhaseProgress,
    ) -> Result<PackParseResults, PipelineError> {
        tracing::info!("Parsing pack {}", pack.name);

        let packinfo = match &pack.packinfo {
            Some(file) => match file.source.read_text().await {
                Ok(text) => self.parser.parse_packinfo(&text),
                Err(err) => {
                    tracing::warn!("Failed to read {}/{}: {}", pack.name, file.relative_path, err);
                    None
                }
            },
            None => None,
        };

        let mut files: Vec<ParsedFile> = Vec::with_capacity(pack.entity_file_count());
        for folder_type in FolderType::ALL {
            for file in pack.files(folder_type) {
                if self.is_cancelled() {
                    return Err(PipelineError::Cancelled);
                }
                let parsed = self.parser.parse_file(file, folder_type).await;
                self.metrics.record_file_parsed(parsed.success);
                if !parsed.success {
                    tracing::warn!(
                        "{}/{} failed to parse ({} issue(s))",
                        pack.name,
                        parsed.relative_path,
                        parsed.errors.len()
                    );
                }
                self.report(progress.advance(pack_index, &pack.name, &file.relative_path));
                files.push(parsed);
            }
        }

        let results = PackParseResults::new(&pack.name, packinfo, files);
        tracing::info!(
            "Parsed {}: {}/{} file(s), {} entries",
            pack.name,
            results.summary.successful_files,
            results.summary.total_files,
            results.summary.total_entries
        );
        Ok(results)
    }

    /// Merge the selected packs of `preview` into destination packs.
    ///
    /// A pack that fails (pack-manager error, parse-error stop policy) is
    /// recorded in [`ImportResults::errors`] and the remaining packs are
    /// still attempted. Cancellation stops before the next pack; packs that
    /// already finished are kept.
    ///
    /// # Errors
    /// [`PipelineError::AlreadyInProgress`], [`PipelineError::NothingSelected`],
    /// or [`PipelineError::PackManager`] if the packs cannot be saved.
    pub async fn handle_import(
        &self,
        preview: &ImportPreview,
        selection: &ImportSelection,
        options: &ImportOptions,
        manager: &mut dyn PackManager,
    ) -> Result<ImportResults, PipelineError> {
        if !self.state.try_begin(ImportPhase::Importing) {
            tracing::warn!("Rejected import request: an import is already in progress");
            return Err(PipelineError::AlreadyInProgress);
        }
        self.cancel.clear();

        let selected: Vec<&PackPreview> = preview
            .packs
            .iter()
            .filter(|pack| selection.includes_pack(pack.name()))
            .collect();
        if selected.is_empty() {
            let err = PipelineError::NothingSelected;
            self.state.fail(err.to_string());
            return Err(err);
        }

        match self.run_import(&selected, selection, options, manager).await {
            Ok(results) => {
                self.metrics
                    .record_phase_time(ImportPhase::Importing, results.duration);
                tracing::info!(
                    "Import finished: {} imported, {} skipped, {} failed, {} placeholder(s), {} pack error(s)",
                    results.total_imported,
                    results.total_skipped,
                    results.total_failed,
                    results.placeholders_created.len(),
                    results.errors.len()
                );
                self.state.finish_import(results.clone());
                self.metrics.log_summary();
                Ok(results)
            }
            Err(err) => {
                tracing::error!("Import failed: {}", err);
                self.state.fail(err.to_string());
                Err(err)
            }
        }
    }

    async fn run_import(
        &self,
        selected: &[&PackPreview],
        selection: &ImportSelection,
        options: &ImportOptions,
        manager: &mut dyn PackManager,
    ) -> Result<ImportResults, PipelineError> {
        let started = Instant::now();
        let total_files = selected.iter().map(|pack| pack.parse.files.len()).sum();
        let mut progress =
            PhaseProgress::new(ImportPhase::Importing, selected.len(), total_files, 0.0, 100.0);
        let mut results = ImportResults::default();
        let mut last_destination: Option<String> = None;

        for (index, pack) in selected.iter().enumerate() {
            let pack_name = pack.name();
            if self.is_cancelled() {
                tracing::warn!("Import cancelled before {}", pack_name);
                for skipped in &selected[index..] {
                    results.errors.push(PackError {
                        pack: skipped.name().to_string(),
                        message: PipelineError::Cancelled.to_string(),
                    });
                }
                break;
            }

            let destination_name = selection.destination_for(pack_name);
            tracing::info!("Importing {} into {}", pack_name, destination_name);

            let mut destination = match manager.find_pack(destination_name) {
                Some(existing) => existing,
                None => match manager.create_pack(destination_name, pack.parse.packinfo.clone()) {
                    Ok(created) => created,
                    Err(err) => {
                        self.record_pack_error(&mut results, pack_name, format!("{:#}", err));
                        continue;
                    }
                },
            };

            let outcome = self.executor.import_pack(
                &pack.parse,
                &pack.validation,
                selection,
                options,
                &mut destination,
                |file| self.report(progress.advance(index, pack_name, file)),
            );

            match outcome {
                Ok(pack_result) => {
                    if let Err(err) = manager.store_pack(destination) {
                        self.record_pack_error(&mut results, pack_name, format!("{:#}", err));
                        continue;
                    }
                    tracing::info!(
                        "Imported {}: {} imported, {} skipped, {} failed",
                        pack_name,
                        pack_result.imported,
                        pack_result.skipped,
                        pack_result.failed
                    );
                    self.metrics.record_entries(
                        pack_result.imported,
                        pack_result.skipped,
                        pack_result.failed,
                    );
                    self.metrics
                        .record_placeholders(pack_result.placeholders.len());
                    last_destination = Some(pack_result.destination.clone());
                    results.record_pack(pack_result);
                }
                Err(err) => self.record_pack_error(&mut results, pack_name, err.to_string()),
            }

            tokio::task::yield_now().await;
        }

        if let Some(active) = &last_destination {
            manager
                .save_packs()
                .map_err(|err| PipelineError::PackManager(format!("{:#}", err)))?;
            manager.render_pack_tree();
            manager.set_active_pack(active);
        }

        results.success = results.errors.is_empty();
        results.duration = started.elapsed();
        Ok(results)
    }

    fn record_pack_error(&self, results: &mut ImportResults, pack: &str, message: String) {
        tracing::warn!("Import of {} failed: {}", pack, message);
        self.metrics.record_pack_failed();
        results.errors.push(PackError {
            pack: pack.to_string(),
            message,
        });
    }
}

/// Walk a directory off the async runtime, or fold a file list in place.
async fn scan_source(source: ImportSource) -> Result<ScanResults, PipelineError> {
    let scanner = PackFolderScanner::new();
    match source {
        ImportSource::Directory(root) => {
            tracing::info!("Scanning folder {}", root);
            tokio::task::spawn_blocking(move || scanner.scan_directory(&root))
                .await
                .map_err(|err| PipelineError::Task(err.to_string()))?
                .map_err(PipelineError::from)
        }
        ImportSource::FileList(files) => {
            tracing::info!("Scanning {} selected file(s)", files.len());
            scanner.scan_file_list(&files).map_err(PipelineError::from)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GameData, Pack};
    use crate::services::pack_manager::MemoryPackManager;
    use crate::services::pack_manager::MockPackManager;
    use anyhow::anyhow;
    use std::sync::Mutex;

    fn importer() -> PackImporter {
        PackImporter::new(Arc::new(GameData::default().tables()), StateManager::new())
    }

    fn files(entries: &[(&str, &str)]) -> ImportSource {
        ImportSource::FileList(
            entries
                .iter()
                .map(|(path, text)| SelectedFile::new(*path, *text))
                .collect(),
        )
    }

    fn two_packs() -> ImportSource {
        files(&[
            ("Packs/Alpha/Mobs/zombie.yml", "MY_ZOMBIE:\n  Type: ZOMBIE\n  Skills:\n  - fireball true\n"),
            ("Packs/Alpha/Skills/fireball.yml", "fireball:\n  Skills:\n  - damage{a=10} @target\n"),
            ("Packs/Beta/Items/gem.yml", "Gem:\n  Id: EMERALD\n"),
        ])
    }

    #[tokio::test]
    async fn test_cancelled_picker_is_silent() {
        let importer = importer();
        let mut rx = importer.state().subscribe();

        let preview = importer.start_import(None).await.unwrap();
        assert!(preview.is_none());
        assert!(rx.try_recv().is_err());
        assert_eq!(importer.state().read(|s| s.phase), ImportPhase::Idle);
    }

    #[tokio::test]
    async fn test_preview_reports_monotonic_progress() {
        let seen: Arc<Mutex<Vec<ImportProgress>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let importer = importer().with_progress(Arc::new(move |p: &ImportProgress| {
            sink.lock().unwrap().push(p.clone());
        }));

        let preview = importer
            .start_import(Some(two_packs()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(preview.pack_names(), vec!["Alpha", "Beta"]);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 6);
        assert!(seen.windows(2).all(|w| w[0].percentage <= w[1].percentage));
        assert_eq!(seen.last().unwrap().percentage, 100.0);
        assert_eq!(seen[0].phase, ImportPhase::Parsing);
        assert_eq!(seen[5].phase, ImportPhase::Validating);

        let state = importer.state().snapshot();
        assert_eq!(state.phase, ImportPhase::PreviewReady);
        assert!(!state.is_importing);
        assert_eq!(state.total_packs, 2);
    }

    #[tokio::test]
    async fn test_no_packs_fails_run() {
        let importer = importer();
        let err = importer
            .start_import(Some(files(&[("Stuff/readme.txt", "hello")])))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::NoPacksFound(ref root) if root == "Stuff"));
        let state = importer.state().snapshot();
        assert_eq!(state.phase, ImportPhase::Idle);
        assert!(state.last_error.unwrap().contains("No MythicMobs packs"));
    }

    #[tokio::test]
    async fn test_concurrent_run_is_rejected() {
        let importer = importer();
        assert!(importer.state().try_begin(ImportPhase::Scanning));

        let err = importer.start_import(Some(two_packs())).await.unwrap_err();
        assert!(matches!(err, PipelineError::AlreadyInProgress));
        // The run holding the session is untouched.
        assert!(importer.state().read(|s| s.is_importing));
    }

    #[tokio::test]
    async fn test_cancel_during_parse_aborts_preview() {
        let importer = importer();
        let handle = importer.cancel_handle();
        let importer = importer.with_progress(Arc::new(move |_: &ImportProgress| handle.cancel()));

        let err = importer.start_import(Some(two_packs())).await.unwrap_err();
        assert!(matches!(err, PipelineError::Cancelled));
        assert_eq!(
            importer.state().read(|s| s.last_error.clone()).as_deref(),
            Some("Import cancelled")
        );
        assert_eq!(importer.metrics().files_parsed.load(std::sync::atomic::Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_cancel_during_import_keeps_finished_packs() {
        let importer = importer();
        let handle = importer.cancel_handle();
        let importer = importer.with_progress(Arc::new(move |p: &ImportProgress| {
            if p.phase == ImportPhase::Importing {
                handle.cancel();
            }
        }));
        let preview = importer.start_import(Some(two_packs())).await.unwrap().unwrap();

        let mut manager = MemoryPackManager::new();
        let results = importer
            .handle_import(&preview, &ImportSelection::all(), &ImportOptions::default(), &mut manager)
            .await
            .unwrap();

        // Alpha was already running when the flag flipped; Beta never starts.
        assert!(!results.success);
        assert_eq!(results.total_imported, 2);
        assert_eq!(results.errors.len(), 1);
        assert_eq!(results.errors[0].pack, "Beta");
        assert!(manager.pack("Alpha").is_some());
        assert!(manager.pack("Beta").is_none());
        assert_eq!(manager.saves, 1);
        assert_eq!(manager.active.as_deref(), Some("Alpha"));
    }

    #[tokio::test]
    async fn test_pack_manager_failure_is_isolated() {
        let importer = importer();
        let preview = importer.start_import(Some(two_packs())).await.unwrap().unwrap();

        let mut manager = MockPackManager::new();
        manager.expect_find_pack().returning(|_| None);
        manager
            .expect_create_pack()
            .returning(|name, _| {
                if name == "Alpha" {
                    Err(anyhow!("disk full"))
                } else {
                    Ok(Pack::new(name))
                }
            });
        manager.expect_store_pack().times(1).returning(|_| Ok(()));
        manager.expect_save_packs().times(1).returning(|| Ok(()));
        manager.expect_render_pack_tree().times(1).return_const(());
        manager
            .expect_set_active_pack()
            .withf(|name| name == "Beta")
            .times(1)
            .return_const(());

        let results = importer
            .handle_import(&preview, &ImportSelection::all(), &ImportOptions::default(), &mut manager)
            .await
            .unwrap();

        assert!(!results.success);
        assert_eq!(results.errors.len(), 1);
        assert_eq!(results.errors[0].pack, "Alpha");
        assert!(results.errors[0].message.contains("disk full"));
        assert_eq!(results.total_imported, 1);
        assert!(importer.state().snapshot().failed_packs.contains("Alpha"));
    }

    #[tokio::test]
    async fn test_save_failure_aborts_run() {
        let importer = importer();
        let preview = importer.start_import(Some(two_packs())).await.unwrap().unwrap();

        let mut manager = MockPackManager::new();
        manager.expect_find_pack().returning(|name| Some(Pack::new(name)));
        manager.expect_store_pack().returning(|_| Ok(()));
        manager
            .expect_save_packs()
            .returning(|| Err(anyhow!("read-only workspace")));
        manager.expect_render_pack_tree().never();

        let err = importer
            .handle_import(&preview, &ImportSelection::all(), &ImportOptions::default(), &mut manager)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::PackManager(ref msg) if msg.contains("read-only")));
        assert!(!importer.state().read(|s| s.is_importing));
    }

    #[tokio::test]
    async fn test_nothing_selected() {
        let importer = importer();
        let preview = importer.start_import(Some(two_packs())).await.unwrap().unwrap();
        let selection = ImportSelection::all().exclude_pack("Alpha").exclude_pack("Beta");

        let mut manager = MockPackManager::new();
        let err = importer
            .handle_import(&preview, &selection, &ImportOptions::default(), &mut manager)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::NothingSelected));
    }

    #[test]
    fn test_access_denied_maps_to_pipeline_error() {
        let err = PipelineError::from(ScanError::AccessDenied("/packs".to_string()));
        assert!(matches!(err, PipelineError::AccessDenied(_)));
        assert_eq!(err.to_string(), "Access denied: /packs");
    }

    #[test]
    fn test_phase_progress_bounds() {
        let mut progress = PhaseProgress::new(ImportPhase::Validating, 1, 2, 50.0, 50.0);
        assert_eq!(progress.advance(0, "A", "x").percentage, 75.0);
        assert_eq!(progress.advance(0, "A", "y").percentage, 100.0);
        assert_eq!(progress.advance(0, "A", "z").files_processed, 2);

        let empty = PhaseProgress::new(ImportPhase::Parsing, 0, 0, 0.0, 50.0);
        assert_eq!(empty.percentage(), 50.0);
    }
}
