use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use kinopio_save::{
    compute_checksum, encode_catalog, CatalogRecord, CoreError, EditorConfig, FormatVersion,
    SaveDocument, StageCatalog, StageFeatures, StageIcon, StageNode, StageType, VersionThreshold,
};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Exit status when the stage catalog cannot be found.
const EXIT_CATALOG_MISSING: u8 = 3;

#[derive(Parser)]
#[command(author, version, about = "Captain Toad: Treasure Tracker save editor")]
struct Cli {
    /// Editor config file; defaults to the platform config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the header and progress of a save file.
    Inspect {
        save: PathBuf,
        /// Dump every valid slot as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write a fresh save file.
    New {
        output: PathBuf,
        #[arg(long, default_value_t = FormatVersion::LATEST)]
        format: FormatVersion,
    },
    /// Upgrade a save file to the newest format.
    Migrate {
        save: PathBuf,
        /// Write here instead of replacing the input.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the stage catalog as shown for one release.
    Tree {
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long, default_value_t = FormatVersion::LATEST)]
        format: FormatVersion,
    },
    /// List the pages of a season.
    Pages {
        season: u32,
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long, default_value_t = FormatVersion::LATEST)]
        format: FormatVersion,
        /// Only pages that can host a bonus level.
        #[arg(long, default_value_t = false)]
        bonus: bool,
    },
    /// Build the binary stage catalog from its CSV source.
    BuildCatalog {
        csv: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            match err.downcast_ref::<CoreError>() {
                Some(CoreError::CatalogAssetMissing(_)) => ExitCode::from(EXIT_CATALOG_MISSING),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(EditorConfig::default_path);
    let config = EditorConfig::load_or_default(&config_path)
        .with_context(|| format!("load config {}", config_path.display()))?;
    init_tracing(&config.log_filter);

    match cli.command {
        Command::Inspect { save, json } => inspect_save(&save, json),
        Command::New { output, format } => new_save(&output, format, &config),
        Command::Migrate { save, output } => migrate_save(&save, output.as_deref(), &config),
        Command::Tree { catalog, format } => {
            let catalog = load_catalog(catalog.as_deref(), &config)?;
            print_tree(&catalog, format);
            Ok(())
        }
        Command::Pages {
            season,
            catalog,
            format,
            bonus,
        } => {
            let catalog = load_catalog(catalog.as_deref(), &config)?;
            print_pages(&catalog, format, season, bonus);
            Ok(())
        }
        Command::BuildCatalog { csv, output } => build_catalog(&csv, &output),
    }
}

fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_catalog(explicit: Option<&Path>, config: &EditorConfig) -> Result<StageCatalog> {
    let path = explicit.unwrap_or(config.catalog_path.as_path());
    Ok(StageCatalog::load(path)?)
}

fn inspect_save(path: &Path, json: bool) -> Result<()> {
    let mut document = SaveDocument::new();
    document
        .read(path)
        .with_context(|| format!("read {}", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&document.summary())?);
        return Ok(());
    }

    let stored = document.stored_checksum();
    let computed = compute_checksum(document.buffer());
    let settings = document.game_settings();
    println!("format:         {}", document.version());
    println!(
        "checksum:       {stored:#010x} ({})",
        if stored == computed { "ok" } else { "stale" }
    );
    println!("seasons:        {}", document.season_count());
    println!("courses:        {}", document.course_count());
    println!("flags:          {:#010x}", settings.flags);
    println!("current season: {}", settings.current_season_id);
    println!("player life:    {}", settings.player_life);
    let cleared = document
        .courses()
        .iter()
        .filter(|course| course.has_flag(kinopio_save::CourseProgress::FLAG_CLEAR))
        .count();
    println!("cleared:        {cleared}");
    Ok(())
}

fn new_save(output: &Path, format: FormatVersion, config: &EditorConfig) -> Result<()> {
    let mut document = SaveDocument::with_version(format);
    document
        .write_with_backup(output, config.backup_on_write)
        .with_context(|| format!("write {}", output.display()))?;
    info!(format = %format, "created save");
    Ok(())
}

fn migrate_save(path: &Path, output: Option<&Path>, config: &EditorConfig) -> Result<()> {
    let mut document = SaveDocument::new();
    document
        .read(path)
        .with_context(|| format!("read {}", path.display()))?;
    if config.apply_dlc_lock_on_open {
        document.apply_pending_dlc_lock();
    }
    let report = document.migrate_to_latest();
    for entry in &report.entries {
        println!(
            "{:<28} {} -> {} {}",
            entry.step_id,
            entry.from_version,
            entry.to_version,
            if entry.changed { "changed" } else { "unchanged" }
        );
    }
    if report.entries.is_empty() {
        println!("already {}", report.to_version);
    }

    let target = output.unwrap_or(path);
    document
        .write_with_backup(target, config.backup_on_write)
        .with_context(|| format!("write {}", target.display()))?;
    Ok(())
}

fn print_tree(catalog: &StageCatalog, format: FormatVersion) {
    for (level, node) in catalog.grow_tree(format).walk() {
        println!("{:indent$}{}", "", describe(node), indent = (level - 1) * 2);
    }
}

fn print_pages(catalog: &StageCatalog, format: FormatVersion, season: u32, bonus: bool) {
    let pages = if bonus {
        catalog.season_valid_bonus_pages(format, season)
    } else {
        catalog.season_actual_pages(format, season)
    };
    if pages.is_empty() {
        println!("season {season} has no pages in {format}");
    }
    for node in pages {
        println!("{:>3}  {}", node.page_id(), describe(node));
    }
}

fn describe(node: &StageNode) -> String {
    let kind = node.stage_type().name().unwrap_or("Category");
    match (node.season_id(), node.course_id()) {
        (Some(season), _) => format!("{} [{kind} {season}]", node.name()),
        (_, Some(course)) => format!("{} [{kind} #{course}]", node.name()),
        _ => format!("{} [{kind}]", node.name()),
    }
}

/// One row of the `;`-separated catalog source.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CatalogRow {
    stage_name: String,
    course_id: i16,
    page_id: i16,
    stage_type: String,
    node_depth: u8,
    node_icon: String,
    collect_item_num: u8,
    challenge_time: u16,
    game_version: u8,
    has_dot_kinopio: String,
    has_dlc_collect_item: String,
    has_badge_condition: String,
    has_challenge_time: String,
    #[serde(rename = "IsVRStage")]
    is_vr_stage: String,
    has_preview_image: String,
}

impl CatalogRow {
    fn into_record(self) -> Result<CatalogRecord> {
        let icon = StageIcon::from_name(&self.node_icon)
            .ok_or_else(|| anyhow!("unknown node icon '{}'", self.node_icon))?;
        let version_threshold = VersionThreshold::from_code(self.game_version & 0xF)
            .ok_or_else(|| anyhow!("unknown game version code {}", self.game_version))?;

        let mut features = StageFeatures::default();
        for (value, bit) in [
            (&self.has_dot_kinopio, StageFeatures::DOT_COLLECTIBLE),
            (&self.has_dlc_collect_item, StageFeatures::DLC_COLLECTIBLE_VARIANT),
            (&self.has_badge_condition, StageFeatures::BADGE_CONDITION),
            (&self.has_challenge_time, StageFeatures::CHALLENGE_TIME),
            (&self.is_vr_stage, StageFeatures::VR_USES_ORIGINAL_PREVIEW),
            (&self.has_preview_image, StageFeatures::PREVIEW_IMAGE),
        ] {
            features = features.with(bit, is_true(value));
        }

        Ok(CatalogRecord {
            stage_type: StageType::from_name(&self.stage_type),
            stage_name: self.stage_name,
            data_id: self.course_id,
            page_id: self.page_id,
            depth: self.node_depth & 0xF,
            icon,
            collect_item_num: self.collect_item_num & 0xF,
            challenge_time: self.challenge_time,
            version_threshold,
            features,
        })
    }
}

/// The catalog source marks set flags with the German `wahr`.
fn is_true(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("wahr")
}

fn read_catalog_rows<R: Read>(input: R) -> Result<Vec<CatalogRecord>> {
    let mut reader = csv::ReaderBuilder::new().delimiter(b';').from_reader(input);
    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<CatalogRow>().enumerate() {
        let row = row.with_context(|| format!("parse catalog row {}", index + 1))?;
        records.push(
            row.into_record()
                .with_context(|| format!("catalog row {}", index + 1))?,
        );
    }
    if records.is_empty() {
        bail!("catalog source has no rows");
    }
    Ok(records)
}

fn build_catalog(source: &Path, output: &Path) -> Result<()> {
    let file = fs::File::open(source).with_context(|| format!("open {}", source.display()))?;
    let records = read_catalog_rows(file)?;
    let bytes = encode_catalog(&records)?;
    // Reject anything the loader would not accept.
    let catalog = StageCatalog::from_bytes(&bytes).context("verify encoded catalog")?;
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, &bytes).with_context(|| format!("write {}", output.display()))?;
    info!(nodes = catalog.len(), bytes = bytes.len(), "built stage catalog");
    Ok(())
}
