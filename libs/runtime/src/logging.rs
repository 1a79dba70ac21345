use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use parking_lot::Mutex;
use tracing::Level;
use tracing_subscriber::{filter::FilterFn, fmt};

use crate::config::{LoggingConfig, Section};

const DEFAULT_SECTION: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 3;

/// `None` means "off". Unknown strings fall back to INFO.
fn parse_level(s: &str) -> Option<Level> {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

/// `target == subsystem` or `target` starts with `subsystem::`.
fn belongs_to(target: &str, subsystem: &str) -> bool {
    target
        .strip_prefix(subsystem)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

/// Per-target level table built from the logging sections.
#[derive(Clone, Default)]
struct LevelTable {
    subsystems: Vec<(String, Option<Level>)>,
    fallback: Option<Level>,
}

impl LevelTable {
    fn level_for(&self, target: &str) -> Option<Level> {
        self.subsystems
            .iter()
            .find(|(name, _)| belongs_to(target, name))
            .map(|(_, level)| *level)
            .unwrap_or(self.fallback)
    }

    fn enabled(&self, meta: &tracing::Metadata<'_>) -> bool {
        self.level_for(meta.target())
            .is_some_and(|max| meta.level() <= &max)
    }
}

// -------- rotating file sinks --------

#[derive(Clone)]
struct RotatingFile(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().flush()
    }
}

/// Writer handle that silently drops records with no configured file.
struct MaybeFile(Option<RotatingFile>);

impl Write for MaybeFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.0 {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.0 {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

/// Picks the file for a record by its target; unmatched targets use the default file.
#[derive(Clone, Default)]
struct FileRouter {
    by_subsystem: Vec<(String, RotatingFile)>,
    default: Option<RotatingFile>,
}

impl FileRouter {
    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_subsystem.is_empty()
    }

    fn route(&self, target: &str) -> Option<RotatingFile> {
        self.by_subsystem
            .iter()
            .find(|(name, _)| belongs_to(target, name))
            .map(|(_, file)| file.clone())
            .or_else(|| self.default.clone())
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = MaybeFile;

    fn make_writer(&'a self) -> Self::Writer {
        MaybeFile(self.default.clone())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        MaybeFile(self.route(meta.target()))
    }
}

/// Relative paths are resolved against `base_dir` (the server home).
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn open_rotating(path: &Path, section: &Section) -> std::io::Result<RotatingFile> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let max_files = section.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS);

    let rotate = FileRotate::new(
        path,
        AppendTimestamp::default(FileLimit::MaxFiles(max_files)),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Ok(RotatingFile(Arc::new(Mutex::new(rotate))))
}

fn file_for(name: &str, section: &Section, base_dir: &Path) -> Option<RotatingFile> {
    if section.file.trim().is_empty() {
        return None;
    }
    let path = resolve_log_path(&section.file, base_dir);
    match open_rotating(&path, section) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!(
                "logging: cannot open '{}' for section '{}': {}",
                path.display(),
                name,
                e
            );
            None
        }
    }
}

struct Plan {
    console: LevelTable,
    file: LevelTable,
    files: FileRouter,
}

fn plan(cfg: &LoggingConfig, base_dir: &Path) -> Plan {
    let mut console = LevelTable::default();
    let mut file = LevelTable::default();
    let mut files = FileRouter::default();

    for (name, section) in cfg {
        let file_level = parse_level(&section.file_level);
        if name == DEFAULT_SECTION {
            console.fallback = parse_level(&section.console_level);
            files.default = file_for(name, section, base_dir);
            file.fallback = files.default.as_ref().and(file_level);
            continue;
        }
        console
            .subsystems
            .push((name.clone(), parse_level(&section.console_level)));
        let sink = file_for(name, section, base_dir);
        file.subsystems
            .push((name.clone(), sink.as_ref().and(file_level)));
        if let Some(sink) = sink {
            files.by_subsystem.push((name.clone(), sink));
        }
    }

    // Longest prefix first so `a::b` wins over `a`.
    console
        .subsystems
        .sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    file.subsystems.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    files
        .by_subsystem
        .sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    Plan {
        console,
        file,
        files,
    }
}

/// Install the global subscriber described by `cfg`.
///
/// Console output is human readable; file output is JSON. Calling this more
/// than once is harmless, later calls are ignored.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let Plan {
        console,
        file,
        files,
    } = plan(cfg, base_dir);

    let console_layer = fmt::layer()
        .with_ansi(std::io::stdout().is_terminal())
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(FilterFn::new(move |meta| console.enabled(meta)));

    let file_layer = (!files.is_empty()).then(|| {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(files)
            .with_filter(FilterFn::new(move |meta| file.enabled(meta)))
    });

    let _ = Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}
