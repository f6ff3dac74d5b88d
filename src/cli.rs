// Command line front end
//
// Argument model (clap derive) and the handlers behind each subcommand. The
// handlers print reports to stdout; diagnostics go through tracing.

use crate::importer::{ImportSource, PackImporter};
use crate::models::{
    DuplicatePolicy, GameTables, ImportOptions, ImportPreview, ImportProgress, ImportSelection,
    ImporterConfig, MissingReferencePolicy, ParseErrorPolicy,
};
use crate::services::{
    ImportReport, MemoryPackManager, PackFolderScanner, PackManager, WorkspacePackManager,
    describe_pack_tree,
};
use crate::state::StateManager;
use anyhow::{Context, Result, bail};
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "mythicpack", version, about = "Import MythicMobs packs into a workspace")]
pub struct Cli {
    /// Directory holding `MythicPack Config.yaml` and `MythicPack Data.yaml`
    #[arg(long, global = true, default_value = "MythicPack Data")]
    pub config_dir: Utf8PathBuf,

    /// Log at debug level
    #[arg(long, global = true)]
    pub debug: bool,

    /// Mirror log output to stderr
    #[arg(long, global = true)]
    pub console: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the packs and files found in a folder
    Scan {
        folder: Utf8PathBuf,
    },

    /// Parse and validate packs without importing anything
    Validate {
        folder: Utf8PathBuf,

        /// Also list info-level issues
        #[arg(long)]
        show_info: bool,
    },

    /// Import packs into the workspace
    Import(ImportArgs),
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    pub folder: Utf8PathBuf,

    /// skip, replace or rename
    #[arg(long)]
    pub duplicates: Option<DuplicatePolicy>,

    /// placeholder or skip
    #[arg(long)]
    pub missing_references: Option<MissingReferencePolicy>,

    /// skip or stop
    #[arg(long)]
    pub on_parse_errors: Option<ParseErrorPolicy>,

    /// Leave out entries that carry warnings
    #[arg(long)]
    pub skip_warnings: bool,

    /// Merge every pack into this destination pack
    #[arg(long)]
    pub into: Option<String>,

    /// Source packs to leave out (repeatable)
    #[arg(long = "exclude-pack", value_name = "PACK")]
    pub exclude_packs: Vec<String>,

    /// Workspace directory, overriding the configured one
    #[arg(long)]
    pub workspace: Option<Utf8PathBuf>,

    /// Run the import against an in-memory workspace and print the result
    #[arg(long)]
    pub dry_run: bool,

    /// Also list info-level issues in the preview
    #[arg(long)]
    pub show_info: bool,
}

impl ImportArgs {
    /// Configured options with command line overrides applied.
    pub fn options(&self, base: &ImportOptions) -> ImportOptions {
        ImportOptions {
            duplicates: self.duplicates.unwrap_or(base.duplicates),
            missing_references: self.missing_references.unwrap_or(base.missing_references),
            on_parse_errors: self.on_parse_errors.unwrap_or(base.on_parse_errors),
            on_warnings: base.on_warnings && !self.skip_warnings,
        }
    }

    pub fn selection(&self) -> ImportSelection {
        let base = match &self.into {
            Some(destination) => ImportSelection::into_destination(destination.as_str()),
            None => ImportSelection::all(),
        };
        self.exclude_packs
            .iter()
            .fold(base, |selection, pack| selection.exclude_pack(pack))
    }
}

/// Dispatch a parsed command line.
pub async fn run(cli: Cli, config: ImporterConfig, tables: Arc<GameTables>) -> Result<()> {
    match cli.command {
        Command::Scan { folder } => scan(folder).await,
        Command::Validate { folder, show_info } => {
            let importer = new_importer(tables);
            let preview = preview(&importer, folder).await?;
            let report = ImportReport { show_info };
            println!("{}", report.preview(&preview));
            Ok(())
        }
        Command::Import(args) => import(args, &config, tables).await,
    }
}

fn new_importer(tables: Arc<GameTables>) -> PackImporter {
    let importer = PackImporter::new(tables, StateManager::new()).with_progress(Arc::new(
        |progress: &ImportProgress| {
            tracing::debug!(
                "[{:>5.1}%] {} ({}/{})",
                progress.percentage,
                progress.message,
                progress.files_processed,
                progress.total_files
            );
        },
    ));

    // Ctrl+C stops scheduling new files; the current one finishes.
    let cancel = importer.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted - cancelling...");
            cancel.cancel();
        }
    });

    importer
}

async fn preview(importer: &PackImporter, folder: Utf8PathBuf) -> Result<ImportPreview> {
    let preview = importer
        .start_import(Some(ImportSource::Directory(folder.clone())))
        .await
        .with_context(|| format!("Failed to read packs from {}", folder))?;
    // Only a dismissed picker yields no preview.
    preview.with_context(|| format!("No folder selected: {}", folder))
}

async fn scan(folder: Utf8PathBuf) -> Result<()> {
    let scan = tokio::task::spawn_blocking(move || PackFolderScanner::new().scan_directory(&folder))
        .await
        .context("Scan task failed")??;

    println!(
        "{}: {} pack(s), {} file(s)",
        scan.root_name, scan.summary.total_packs, scan.summary.total_files
    );
    for pack in &scan.packs {
        println!("  {}", pack.name);
        for (folder, files) in &pack.folders {
            println!("    {}/ ({} file(s))", folder, files.len());
        }
        if pack.packinfo.is_some() {
            println!("    packinfo.yml");
        }
        for file in &pack.unsupported_files {
            println!("    unsupported: {}", file);
        }
    }
    for file in &scan.unsupported_files {
        println!("  unsupported: {}", file);
    }
    Ok(())
}

async fn import(args: ImportArgs, config: &ImporterConfig, tables: Arc<GameTables>) -> Result<()> {
    let options = args.options(&config.import);
    let selection = args.selection();
    tracing::info!(
        "Import options: duplicates={}, missing_references={}, on_parse_errors={}, on_warnings={}",
        options.duplicates,
        options.missing_references,
        options.on_parse_errors,
        options.on_warnings
    );

    let importer = new_importer(tables);
    let preview = preview(&importer, args.folder.clone()).await?;
    println!(
        "{}",
        ImportReport {
            show_info: args.show_info
        }
        .preview(&preview)
    );
    println!();

    let results = if args.dry_run {
        let mut manager = MemoryPackManager::new();
        let results = importer
            .handle_import(&preview, &selection, &options, &mut manager)
            .await?;
        for name in manager.pack_names() {
            if let Some(pack) = manager.pack(&name) {
                println!("{}", describe_pack_tree(pack));
            }
        }
        results
    } else {
        let workspace = args
            .workspace
            .clone()
            .unwrap_or_else(|| Utf8PathBuf::from(&config.workspace_dir));
        let mut manager = WorkspacePackManager::open(&workspace)?;
        importer
            .handle_import(&preview, &selection, &options, &mut manager)
            .await?
    };

    println!("{}", ImportReport::new().results(&results));

    if !results.success {
        bail!("{} pack(s) could not be imported", results.errors.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import_flags() {
        let cli = Cli::try_parse_from([
            "mythicpack",
            "import",
            "packs",
            "--duplicates",
            "rename",
            "--on-parse-errors",
            "stop",
            "--skip-warnings",
            "--into",
            "Server",
            "--exclude-pack",
            "Old",
            "--exclude-pack",
            "Broken",
            "--dry-run",
        ])
        .unwrap();

        let Command::Import(args) = cli.command else {
            panic!("expected import command");
        };
        assert_eq!(args.folder, "packs");
        assert!(args.dry_run);

        let options = args.options(&ImportOptions::default());
        assert_eq!(options.duplicates, DuplicatePolicy::Rename);
        assert_eq!(options.on_parse_errors, ParseErrorPolicy::Stop);
        assert_eq!(options.missing_references, MissingReferencePolicy::Placeholder);
        assert!(!options.on_warnings);

        let selection = args.selection();
        assert_eq!(selection.destination_for("Dungeon"), "Server");
        assert!(!selection.includes_pack("Old"));
        assert!(!selection.includes_pack("Broken"));
        assert!(selection.includes_pack("Dungeon"));
    }

    #[test]
    fn test_flags_fall_back_to_config() {
        let cli = Cli::try_parse_from(["mythicpack", "import", "packs"]).unwrap();
        let Command::Import(args) = cli.command else {
            panic!("expected import command");
        };
        let base = ImportOptions {
            duplicates: DuplicatePolicy::Replace,
            on_warnings: true,
            ..ImportOptions::default()
        };
        assert_eq!(args.options(&base), base);
        assert_eq!(args.selection(), ImportSelection::all());
    }

    #[test]
    fn test_global_flags_and_bad_policy() {
        let cli =
            Cli::try_parse_from(["mythicpack", "validate", "packs", "--debug", "--config-dir", "cfg"])
                .unwrap();
        assert!(cli.debug);
        assert_eq!(cli.config_dir, "cfg");
        assert!(matches!(cli.command, Command::Validate { show_info: false, .. }));

        assert!(Cli::try_parse_from(["mythicpack", "import", "packs", "--duplicates", "merge"]).is_err());
    }
}
