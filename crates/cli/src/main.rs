mod settings;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};

use facekeeper_core::notification::domain::notification_sink::NotificationSink;
use facekeeper_core::notification::infrastructure::background_notification_sink::BackgroundNotificationSink;
use facekeeper_core::notification::infrastructure::command_speech_sink::CommandSpeechSink;
use facekeeper_core::notification::infrastructure::log_notification_sink::LogNotificationSink;
use facekeeper_core::pipeline::engine_error::EngineError;
use facekeeper_core::pipeline::greet_use_case::GreetUseCase;
use facekeeper_core::pipeline::identity_engine::IdentityEngine;
use facekeeper_core::recognition::infrastructure::onnx_sface_extractor::OnnxSfaceExtractor;
use facekeeper_core::recognition::infrastructure::signature_codec::{self, PersistenceError};
use facekeeper_core::shared::constants::{IMAGE_EXTENSIONS, SFACE_MODEL_NAME, SFACE_MODEL_URL};
use facekeeper_core::shared::face_image::FaceImage;
use facekeeper_core::shared::model_resolver::{self, ModelSource};
use facekeeper_core::shared::recognition_config::RecognitionConfig;

use settings::Settings;

/// Printed in place of a verdict when an image could not be processed.
const ERROR_SENTINEL: &str = "Error";

const MISSING_THRESHOLD: &str =
    "No recognition threshold: pass --threshold or set \"threshold\" in settings.json";

/// Enrollment never consults the threshold, so any finite value works.
const ENROLL_THRESHOLD: f64 = 1.0;

/// Enroll faces by name and greet them when recognized.
#[derive(Parser)]
#[command(name = "facekeeper")]
struct Cli {
    /// Database base path; writes `<path>.names` and `<path>.features`.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Minimum similarity for a match (strictly greater wins).
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Minimum time between two greetings of the same person.
    #[arg(long, global = true)]
    cooldown_ms: Option<u64>,

    /// Log greetings instead of speaking them.
    #[arg(long, global = true)]
    no_speech: bool,

    /// Print verdicts only; greet nobody.
    #[arg(long, global = true)]
    silent: bool,

    /// Embedding model file (defaults to the cached SFace model).
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Enroll face images (or directories of them) under one name.
    Enroll {
        #[arg(long)]
        name: String,
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Recognize each face image and greet known people.
    Recognize {
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// List enrolled records.
    List,
    /// Save a copy of the database under another base path.
    Save {
        #[arg(long)]
        to: PathBuf,
    },
    /// Replace the database with the one stored at another base path.
    Load {
        #[arg(long)]
        from: PathBuf,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = Settings::load();
    let database = resolve_database(cli.db.as_deref(), &settings)?;

    match &cli.command {
        Command::Enroll { name, images } => run_enroll(&cli, &settings, &database, name, images),
        Command::Recognize { images } => run_recognize(&cli, &settings, &database, images),
        Command::List => run_list(&database),
        Command::Save { to } => run_copy(&database, to),
        Command::Load { from } => run_copy(from, &database),
    }
}

fn run_enroll(
    cli: &Cli,
    settings: &Settings,
    database: &Path,
    name: &str,
    inputs: &[PathBuf],
) -> Result<(), Box<dyn std::error::Error>> {
    validate_name(name)?;
    let images = collect_images(inputs)?;
    let mut engine = build_engine(cli, settings, RecognitionConfig::new(ENROLL_THRESHOLD)?)?;
    load_existing(&mut engine, database)?;

    let mut enrolled = 0;
    for path in &images {
        let outcome = match FaceImage::open(path) {
            Ok(image) => engine.enroll_image(name, &image).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        match outcome {
            Ok(_) => enrolled += 1,
            Err(e) => log::warn!("Skipping {}: {e}", path.display()),
        }
    }
    if enrolled == 0 {
        return Err(format!("No usable face images for '{name}'").into());
    }

    engine.save(database)?;
    println!(
        "Enrolled {enrolled} sample(s) of '{name}' ({} records in {})",
        engine.len(),
        database.display()
    );
    Ok(())
}

fn run_recognize(
    cli: &Cli,
    settings: &Settings,
    database: &Path,
    inputs: &[PathBuf],
) -> Result<(), Box<dyn std::error::Error>> {
    let threshold = resolve_threshold(cli.threshold, settings.threshold)?;
    let cooldown = Duration::from_millis(cli.cooldown_ms.unwrap_or(settings.cooldown_ms));
    let config = RecognitionConfig::new(threshold)?.with_cooldown(cooldown);
    let images = collect_images(inputs)?;

    let mut engine = build_engine(cli, settings, config)?;
    load_existing(&mut engine, database)?;
    let mut greeter = GreetUseCase::new(build_sink(cli, settings), engine.config().cooldown());
    greeter.set_enabled(!cli.silent);

    for path in &images {
        let verdict = match FaceImage::open(path) {
            Ok(image) => engine.recognize_image(&image).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        match verdict {
            Ok(verdict) => {
                println!("{}: {verdict}", path.display());
                greeter.handle(&verdict, Instant::now());
            }
            Err(e) => {
                log::warn!("{}: {e}", path.display());
                println!("{}: {ERROR_SENTINEL}", path.display());
            }
        }
    }
    Ok(())
}

fn run_list(database: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let store = match signature_codec::load(database) {
        Ok(store) => store,
        Err(PersistenceError::NotFound(_)) => {
            println!("No enrolled faces in {}", database.display());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    for (i, record) in store.all().iter().enumerate() {
        println!("{i:>4}  {}  ({} dims)", record.name, record.dimension());
    }
    println!("{} records in {}", store.len(), database.display());
    Ok(())
}

fn run_copy(from: &Path, to: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let count = copy_database(from, to)?;
    println!("Copied {count} records from {} to {}", from.display(), to.display());
    Ok(())
}

/// Validates the database at `from` in full before writing it to `to`, so
/// a broken source never replaces a good destination.
fn copy_database(from: &Path, to: &Path) -> Result<usize, PersistenceError> {
    let store = signature_codec::load(from)?;
    signature_codec::save(&store, to)?;
    Ok(store.len())
}

/// Loads `database` into the engine; a missing database means a fresh start.
fn load_existing(
    engine: &mut IdentityEngine,
    database: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    match engine.load(database) {
        Ok(count) => {
            log::info!("Loaded {count} records from {}", database.display());
            Ok(())
        }
        Err(EngineError::Persistence(PersistenceError::NotFound(path))) => {
            log::info!("No database at {}, starting empty", path.display());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn build_engine(
    cli: &Cli,
    settings: &Settings,
    config: RecognitionConfig,
) -> Result<IdentityEngine, Box<dyn std::error::Error>> {
    let explicit = cli.model.as_deref().or(settings.model_path.as_deref());
    let bundled = bundled_model_dir();
    let source = match explicit {
        Some(path) => ModelSource::Explicit(path),
        None => ModelSource::Remote {
            name: SFACE_MODEL_NAME,
            url: SFACE_MODEL_URL,
            bundled_dir: bundled.as_deref(),
        },
    };

    log::info!("Resolving model: {SFACE_MODEL_NAME}");
    let model_path = model_resolver::resolve(source, Some(Box::new(download_progress)))?;
    let extractor = OnnxSfaceExtractor::new(&model_path)?;
    Ok(IdentityEngine::new(Box::new(extractor), config))
}

/// `models/` next to the executable, for packaged installs.
fn bundled_model_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("models")))
}

fn build_sink(cli: &Cli, settings: &Settings) -> Box<dyn NotificationSink> {
    if cli.no_speech || !settings.speech_enabled {
        return Box::new(LogNotificationSink::new(settings.greeting.clone()));
    }
    let speech =
        CommandSpeechSink::from_command_line(&settings.speech_command, settings.greeting.clone());
    match speech {
        Some(speech) => Box::new(BackgroundNotificationSink::new(Box::new(speech))),
        None => {
            log::warn!("Empty speech command in settings, logging greetings instead");
            Box::new(LogNotificationSink::new(settings.greeting.clone()))
        }
    }
}

fn resolve_threshold(flag: Option<f64>, setting: Option<f64>) -> Result<f64, String> {
    flag.or(setting).ok_or_else(|| MISSING_THRESHOLD.to_string())
}

fn resolve_database(flag: Option<&Path>, settings: &Settings) -> Result<PathBuf, String> {
    flag.map(Path::to_path_buf)
        .or_else(|| settings.database.clone())
        .or_else(Settings::default_database)
        .ok_or_else(|| "Could not determine a database location; pass --db".to_string())
}

fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name must not be empty".to_string());
    }
    Ok(())
}

/// Expands directories into the image files they contain, sorted by path.
fn collect_images(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut images = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = fs::read_dir(input)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_file() && is_image(path))
                .collect();
            found.sort();
            images.extend(found);
        } else if input.exists() {
            images.push(input.clone());
        } else {
            return Err(format!("Input file not found: {}", input.display()).into());
        }
    }
    Ok(images)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face recognition model... {pct}%");
    } else {
        eprint!("\rDownloading face recognition model... {downloaded} bytes");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facekeeper_core::recognition::domain::signature_store::SignatureStore;
    use tempfile::TempDir;

    fn saved_store(base: &Path, names: &[&str]) {
        let mut store = SignatureStore::new();
        for (i, name) in names.iter().enumerate() {
            store.enroll(*name, vec![1.0, i as f32]).unwrap();
        }
        signature_codec::save(&store, base).unwrap();
    }

    #[test]
    fn test_threshold_flag_overrides_settings() {
        assert_eq!(resolve_threshold(Some(0.4), Some(0.6)), Ok(0.4));
        assert_eq!(resolve_threshold(None, Some(0.6)), Ok(0.6));
    }

    #[test]
    fn test_missing_threshold_is_an_error() {
        assert!(resolve_threshold(None, None).unwrap_err().contains("--threshold"));
    }

    #[test]
    fn test_database_flag_overrides_settings() {
        let settings = Settings {
            database: Some(PathBuf::from("/srv/faces")),
            ..Settings::default()
        };
        assert_eq!(
            resolve_database(Some(Path::new("/tmp/db")), &settings).unwrap(),
            PathBuf::from("/tmp/db")
        );
        assert_eq!(
            resolve_database(None, &settings).unwrap(),
            PathBuf::from("/srv/faces")
        );
    }

    #[test]
    fn test_blank_name_is_rejected() {
        assert!(validate_name("  ").is_err());
        assert!(validate_name("Alice").is_ok());
    }

    #[test]
    fn test_collect_images_expands_directories() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.png"), b"").unwrap();
        fs::write(tmp.path().join("a.JPG"), b"").unwrap();
        fs::write(tmp.path().join("notes.txt"), b"").unwrap();

        let images = collect_images(&[tmp.path().to_path_buf()]).unwrap();
        assert_eq!(
            images,
            vec![tmp.path().join("a.JPG"), tmp.path().join("b.png")]
        );
    }

    #[test]
    fn test_collect_images_rejects_missing_file() {
        let tmp = TempDir::new().unwrap();
        assert!(collect_images(&[tmp.path().join("ghost.png")]).is_err());
    }

    #[test]
    fn test_copy_database_writes_destination() {
        let tmp = TempDir::new().unwrap();
        let db = tmp.path().join("faces");
        let export = tmp.path().join("backup").join("faces");
        saved_store(&db, &["Alice", "Bob"]);

        assert_eq!(copy_database(&db, &export).unwrap(), 2);
        let copied = signature_codec::load(&export).unwrap();
        let names: Vec<_> = copied.all().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_copy_from_broken_database_keeps_destination() {
        let tmp = TempDir::new().unwrap();
        let db = tmp.path().join("faces");
        let broken = tmp.path().join("broken");
        saved_store(&db, &["Alice"]);
        saved_store(&broken, &["Bob", "Carol"]);
        let (broken_names, _) = signature_codec::artifact_paths(&broken);
        fs::write(&broken_names, "Bob\n").unwrap();

        assert!(matches!(
            copy_database(&broken, &db),
            Err(PersistenceError::Inconsistent { .. })
        ));
        assert_eq!(signature_codec::load(&db).unwrap().all()[0].name, "Alice");
    }

    #[test]
    fn test_copy_from_missing_database_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            copy_database(&tmp.path().join("ghost"), &tmp.path().join("faces")),
            Err(PersistenceError::NotFound(_))
        ));
    }
}
