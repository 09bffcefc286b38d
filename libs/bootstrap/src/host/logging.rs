//! Subscriber setup: human-readable console output on stderr plus optional
//! JSON log files with size-based rotation, both filtered per target path
//! from the `logging` config section.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use file_rotate::{
    ContentLimit, FileRotate,
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
};
use parking_lot::Mutex;
use tracing::{Level, Metadata};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::{FilterFn, filter_fn};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use super::paths::resolve_under;
use crate::config::{LoggingConfig, Section};

const DEFAULT_KEY: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_AGE_DAYS: u32 = 1;

/// True if `target` is `prefix` itself or a path below it.
fn matches_target_prefix(target: &str, prefix: &str) -> bool {
    target
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

// ================= rotating file writers =================

#[derive(Clone)]
struct RotatingFile(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl RotatingFile {
    fn open(path: &Path, section: &Section) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
        }

        let limit = match section.max_backups {
            Some(n) => FileLimit::MaxFiles(n),
            None => {
                let days = section.max_age_days.unwrap_or(DEFAULT_MAX_AGE_DAYS);
                let age = chrono::Duration::try_days(i64::from(days))
                    .with_context(|| format!("Invalid max_age_days: {days}"))?;
                FileLimit::Age(age)
            }
        };

        let rot = FileRotate::new(
            path,
            AppendTimestamp::default(limit),
            ContentLimit::BytesSurpassed(max_size_bytes(section)),
            Compression::None,
            None,
        );
        Ok(Self(Arc::new(Mutex::new(rot))))
    }
}

fn max_size_bytes(section: &Section) -> usize {
    section
        .max_size_mb
        .unwrap_or(DEFAULT_MAX_SIZE_MB)
        .checked_mul(1024 * 1024)
        .and_then(|b| usize::try_from(b).ok())
        .unwrap_or(usize::MAX)
}

/// A write handle for one record; `None` discards the bytes.
struct FileHandle(Option<RotatingFile>);

impl Write for FileHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &self.0 {
            Some(file) => file.0.lock().write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &self.0 {
            Some(file) => file.0.lock().flush(),
            None => Ok(()),
        }
    }
}

/// Picks the file for a record by its target; longest prefix wins, then the
/// default file.
#[derive(Clone, Default)]
struct FileRouter {
    default: Option<RotatingFile>,
    by_prefix: Vec<(String, RotatingFile)>,
}

impl FileRouter {
    fn build(cfg: &LoggingConfig, base_dir: &Path) -> Self {
        let mut router = FileRouter::default();
        for (key, section) in cfg {
            let Some(file) = open_section_file(key, section, base_dir) else {
                continue;
            };
            if key == DEFAULT_KEY {
                router.default = Some(file);
            } else {
                router.by_prefix.push((key.clone(), file));
            }
        }
        router
            .by_prefix
            .sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        router
    }

    fn resolve(&self, target: &str) -> Option<RotatingFile> {
        self.by_prefix
            .iter()
            .find(|(prefix, _)| matches_target_prefix(target, prefix))
            .map(|(_, file)| file)
            .or(self.default.as_ref())
            .cloned()
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_prefix.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = FileHandle;

    fn make_writer(&'a self) -> Self::Writer {
        FileHandle(self.default.clone())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        FileHandle(self.resolve(meta.target()))
    }
}

#[allow(clippy::print_stderr)] // subscriber is not installed yet
fn open_section_file(key: &str, section: &Section, base_dir: &Path) -> Option<RotatingFile> {
    let path = resolve_under(base_dir, Path::new(section.file()?));
    match RotatingFile::open(&path, section) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!(
                "Failed to open log file for '{key}' at {}: {e:#}",
                path.display()
            );
            None
        }
    }
}

// ================= per-sink levels =================

/// Level table for one sink. Keys match whole `::` path segments, the same
/// way [`FileRouter`] picks a file, so a `registrar` section never governs
/// `registrar_sdk`.
#[derive(Clone, Debug)]
struct SectionLevels {
    default: LevelFilter,
    by_prefix: Vec<(String, LevelFilter)>,
}

impl SectionLevels {
    fn new(default: LevelFilter) -> Self {
        Self {
            default,
            by_prefix: Vec::new(),
        }
    }

    fn with_target(mut self, prefix: impl Into<String>, level: LevelFilter) -> Self {
        self.by_prefix.push((prefix.into(), level));
        self.by_prefix
            .sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        self
    }

    fn level_for(&self, target: &str) -> LevelFilter {
        self.by_prefix
            .iter()
            .find(|(prefix, _)| matches_target_prefix(target, prefix))
            .map_or(self.default, |(_, level)| *level)
    }

    fn would_enable(&self, target: &str, level: &Level) -> bool {
        *level <= self.level_for(target)
    }

    fn max_level(&self) -> LevelFilter {
        self.by_prefix
            .iter()
            .map(|(_, level)| *level)
            .fold(self.default, LevelFilter::max)
    }

    fn into_filter(self) -> FilterFn<impl Fn(&Metadata<'_>) -> bool> {
        let hint = self.max_level();
        filter_fn(move |meta: &Metadata<'_>| self.would_enable(meta.target(), meta.level()))
            .with_max_level_hint(hint)
    }
}

fn console_levels(cfg: &LoggingConfig) -> SectionLevels {
    let default_level = cfg
        .get(DEFAULT_KEY)
        .and_then(|s| s.console_level)
        .map_or(LevelFilter::INFO, LevelFilter::from_level);

    let mut levels = SectionLevels::new(default_level);
    for (key, section) in cfg.iter().filter(|(k, _)| k.as_str() != DEFAULT_KEY) {
        let level = section.console_level.map_or(LevelFilter::OFF, LevelFilter::from_level);
        levels = levels.with_target(key.clone(), level);
    }
    levels
}

fn file_levels(cfg: &LoggingConfig, router: &FileRouter) -> SectionLevels {
    let default_level = match (router.default.is_some(), cfg.get(DEFAULT_KEY)) {
        (true, Some(section)) => section
            .file_level()
            .map_or(LevelFilter::OFF, LevelFilter::from_level),
        _ => LevelFilter::OFF,
    };

    let mut levels = SectionLevels::new(default_level);
    for (key, section) in cfg.iter().filter(|(k, _)| k.as_str() != DEFAULT_KEY) {
        if section.file().is_some() {
            let level = section.file_level().map_or(LevelFilter::OFF, LevelFilter::from_level);
            levels = levels.with_target(key.clone(), level);
        }
    }
    levels
}

// ================= public init =================

fn stderr_supports_ansi() -> bool {
    _ = enable_ansi_support::enable_ansi_support();
    supports_color::on(supports_color::Stream::Stderr).is_some_and(|level| level.has_basic)
}

/// Keeps the non-blocking console writer alive; dropping it flushes pending
/// records.
#[must_use = "console output stops when the guard is dropped"]
pub struct LoggingGuard {
    _console: tracing_appender::non_blocking::WorkerGuard,
}

/// Install the global subscriber described by `cfg`.
///
/// Relative log file paths resolve under `base_dir`. `RUST_LOG`, when set,
/// caps every sink. Calling this more than once keeps the first subscriber.
#[allow(clippy::print_stderr)] // subscriber is not installed yet
pub fn init_logging(cfg: &LoggingConfig, base_dir: &Path) -> LoggingGuard {
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("LogTracer init skipped: {e}");
    }

    let env = EnvFilter::try_from_default_env().ok();

    let (stderr, guard) = tracing_appender::non_blocking(io::stderr());

    let console_layer = fmt::layer()
        .with_writer(stderr)
        .with_ansi(stderr_supports_ansi())
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(console_levels(cfg).into_filter());

    let router = FileRouter::build(cfg, base_dir);
    let file_layer = (!router.is_empty()).then(|| {
        let levels = file_levels(cfg, &router).into_filter();
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(router)
            .with_filter(levels)
    });

    _ = Registry::default()
        .with(env)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    LoggingGuard { _console: guard }
}
