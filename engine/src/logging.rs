//! Logger setup
//!
//! Installs `env_logger` with a `time | target | LEVEL | message` format. The
//! root level follows `DEBUG`, `GAME_TRACE_LOGGERS` lifts selected targets to
//! trace, and `FILE_LOG` mirrors every line into `logs/game.log` (rotated).
//! `RUST_LOG`, when present, is applied last and wins.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use env_logger::fmt::Formatter;
use log::{LevelFilter, Record};

use crate::config::EnvFlags;
use crate::error::Result;

pub const LOG_DIR: &str = "logs";
pub const LOG_FILE: &str = "game.log";
pub const MAX_LOG_BYTES: u64 = 5 * 1024 * 1024;
pub const LOG_BACKUPS: usize = 7;

/// Dependency targets that stay at warn no matter the root level
const QUIET_TARGETS: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

/// Level assignment derived from the env flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelPlan {
    pub root: LevelFilter,
    pub targets: Vec<(String, LevelFilter)>,
}

impl LevelPlan {
    /// Build the plan.
    ///
    /// `trace_loggers` is a comma separated list of targets:
    /// - `a,b` puts `a` and `b` at trace
    /// - `!a,b` puts everything at trace except `a` and `b`, which keep the root level
    /// - `*` (anything after it is ignored) puts everything at trace
    pub fn new(debug: bool, trace_loggers: Option<&str>) -> Self {
        let default_level = if debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        let mut plan = Self {
            root: default_level,
            targets: Vec::new(),
        };

        let Some(filter) = trace_loggers.filter(|s| !s.is_empty()) else {
            return plan;
        };

        if filter.starts_with('*') {
            plan.root = LevelFilter::Trace;
        } else if filter.starts_with('!') {
            plan.root = LevelFilter::Trace;
            plan.targets = split_targets(filter.trim_matches(|c| c == '!' || c == ','))
                .map(|name| (name, default_level))
                .collect();
        } else {
            plan.targets = split_targets(filter.trim_matches(','))
                .map(|name| (name, LevelFilter::Trace))
                .collect();
        }
        plan
    }

    pub fn apply(&self, builder: &mut env_logger::Builder) {
        builder.filter_level(self.root);
        for target in QUIET_TARGETS {
            builder.filter_module(target, LevelFilter::Warn);
        }
        for (target, level) in &self.targets {
            builder.filter_module(target, *level);
        }
    }
}

fn split_targets(list: &str) -> impl Iterator<Item = String> + '_ {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

fn format_record(buf: &mut Formatter, record: &Record) -> io::Result<()> {
    let style = buf.default_level_style(record.level());
    writeln!(
        buf,
        "{} | {} | {style}{}{style:#} | {}",
        buf.timestamp_millis(),
        record.target(),
        record.level(),
        record.args()
    )
}

/// Install the global logger. Fails if a logger is already installed.
pub fn init(flags: &EnvFlags) -> Result<()> {
    let plan = LevelPlan::new(flags.debug, flags.trace_loggers.as_deref());

    let mut builder = env_logger::Builder::new();
    plan.apply(&mut builder);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.format(format_record);

    if flags.file_log {
        let file = RotatingFile::open(
            Path::new(LOG_DIR).join(LOG_FILE),
            MAX_LOG_BYTES,
            LOG_BACKUPS,
        )?;
        builder.target(env_logger::Target::Pipe(Box::new(Tee { file })));
    }

    builder.try_init()?;
    Ok(())
}

/// Stdout plus log file
struct Tee {
    file: RotatingFile,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        self.file.flush()
    }
}

/// Size-rotated append-only file: `game.log`, `game.log.1` .. `game.log.N`
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
    file: File,
    written: u64,
}

impl RotatingFile {
    pub fn open(path: impl Into<PathBuf>, max_bytes: u64, backups: usize) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path,
            max_bytes,
            backups,
            file,
            written,
        })
    }

    pub fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        if self.backups > 0 {
            let oldest = self.backup_path(self.backups);
            if oldest.exists() {
                fs::remove_file(&oldest)?;
            }
            for index in (1..self.backups).rev() {
                let from = self.backup_path(index);
                if from.exists() {
                    fs::rename(&from, self.backup_path(index + 1))?;
                }
            }
            fs::rename(&self.path, self.backup_path(1))?;
        }

        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
