use super::GlobalConfig;
use crate::config::{reduce::ReduceLogLevel, scheduler::SchedulerLogLevel};
use core::fmt::Display;
use hashbrown::HashMap;
use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::PathBuf,
    sync::Arc,
};

/// Configuration for one logging channel, parameterized by a log level type.
///
/// Several sinks can be enabled at the same time.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(bound = "")]
pub struct LoggerConfig<L: LogLevel> {
    /// Path to the log file, if file logging is enabled.
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Whether to append to the log file (true) or overwrite it (false). Defaults to true.
    #[serde(default = "append_default")]
    pub append: bool,

    /// Whether to log to standard output.
    #[serde(default)]
    pub stdout: bool,

    /// Whether to log to standard error.
    #[serde(default)]
    pub stderr: bool,

    /// Optional `log` crate level to forward messages to.
    #[serde(default)]
    pub log: Option<LogCrateLevel>,

    /// The log level for this channel.
    #[serde(default)]
    pub level: L,
}

impl<L: LogLevel> Default for LoggerConfig<L> {
    fn default() -> Self {
        Self {
            file: None,
            append: true,
            stdout: false,
            stderr: false,
            log: None,
            level: L::default(),
        }
    }
}

/// Levels of the `log` crate messages can be forwarded to.
#[derive(
    Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize, Hash, PartialEq, Eq,
)]
pub enum LogCrateLevel {
    /// Logs informational messages.
    #[default]
    #[serde(rename = "info")]
    Info,

    /// Logs debugging messages.
    #[serde(rename = "debug")]
    Debug,

    /// Logs trace-level messages.
    #[serde(rename = "trace")]
    Trace,
}

fn append_default() -> bool {
    true
}

/// Trait for types that can be used as log levels in [`LoggerConfig`].
pub trait LogLevel:
    serde::de::DeserializeOwned + serde::Serialize + Clone + Copy + core::fmt::Debug + Default
{
}

/// Binary log level for enabling or disabling a channel.
#[derive(Default, Copy, Clone, Debug, serde::Serialize, serde::Deserialize)]
pub enum BinaryLogLevel {
    /// Logging is disabled.
    #[default]
    #[serde(rename = "disabled")]
    Disabled,

    /// Logging is fully enabled.
    #[serde(rename = "full")]
    Full,
}

impl LogLevel for BinaryLogLevel {}

/// Routes scheduler and reduce messages to the sinks configured in [`GlobalConfig`].
#[derive(Debug)]
pub struct Logger {
    loggers: Vec<LoggerKind>,
    scheduler_index: Vec<usize>,
    reduce_index: Vec<usize>,

    /// Configuration the logger was built from.
    pub config: Arc<GlobalConfig>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Hash, PartialEq, Eq)]
enum LoggerId {
    File(PathBuf),
    Stdout,
    Stderr,
    LogCrate(LogCrateLevel),
}

impl Logger {
    /// Creates a logger from the global configuration.
    ///
    /// Sinks shared between channels (the same file, stdout, ...) are opened once.
    pub fn new() -> Self {
        Self::from_config(GlobalConfig::get())
    }

    /// Creates a logger from the given configuration.
    pub fn from_config(config: Arc<GlobalConfig>) -> Self {
        let mut loggers = Vec::new();
        let mut scheduler_index = Vec::new();
        let mut reduce_index = Vec::new();
        let mut logger2index = HashMap::<LoggerId, usize>::new();

        if !matches!(config.scheduler.logger.level, SchedulerLogLevel::Disabled) {
            register_logger(
                &config.scheduler.logger,
                &mut scheduler_index,
                &mut loggers,
                &mut logger2index,
            );
        }

        if !matches!(config.reduce.logger.level, ReduceLogLevel::Disabled) {
            register_logger(
                &config.reduce.logger,
                &mut reduce_index,
                &mut loggers,
                &mut logger2index,
            );
        }

        Self {
            loggers,
            scheduler_index,
            reduce_index,
            config,
        }
    }

    /// Logs a message to every scheduler sink.
    pub fn log_scheduler<S: Display>(&mut self, msg: &S) {
        Self::log_all(&mut self.loggers, &self.scheduler_index, msg)
    }

    /// Logs a message to every reduce sink.
    pub fn log_reduce<S: Display>(&mut self, msg: &S) {
        Self::log_all(&mut self.loggers, &self.reduce_index, msg)
    }

    /// Returns the current scheduler log level.
    pub fn log_level_scheduler(&self) -> SchedulerLogLevel {
        self.config.scheduler.logger.level
    }

    /// Returns the current reduce log level.
    pub fn log_level_reduce(&self) -> ReduceLogLevel {
        self.config.reduce.logger.level
    }

    fn log_all<S: Display>(loggers: &mut [LoggerKind], indices: &[usize], msg: &S) {
        match indices {
            [] => {}
            [index] => loggers[*index].log(msg),
            indices => {
                let msg = msg.to_string();
                for index in indices {
                    loggers[*index].log(&msg);
                }
            }
        }
    }
}

fn register_logger<L: LogLevel>(
    kind: &LoggerConfig<L>,
    setting_index: &mut Vec<usize>,
    loggers: &mut Vec<LoggerKind>,
    logger2index: &mut HashMap<LoggerId, usize>,
) {
    let mut add = |id: LoggerId, create: &dyn Fn() -> Option<LoggerKind>| {
        if let Some(index) = logger2index.get(&id) {
            setting_index.push(*index);
        } else if let Some(logger) = create() {
            let index = loggers.len();
            logger2index.insert(id, index);
            loggers.push(logger);
            setting_index.push(index);
        }
    };

    if let Some(file) = &kind.file {
        add(LoggerId::File(file.clone()), &|| {
            FileLogger::new(file, kind.append).map(LoggerKind::File)
        });
    }

    if kind.stdout {
        add(LoggerId::Stdout, &|| Some(LoggerKind::Stdout));
    }

    if kind.stderr {
        add(LoggerId::Stderr, &|| Some(LoggerKind::Stderr));
    }

    if let Some(level) = kind.log {
        add(LoggerId::LogCrate(level), &|| Some(LoggerKind::Log(level)));
    }
}

#[derive(Debug)]
enum LoggerKind {
    File(FileLogger),
    Stdout,
    Stderr,
    Log(LogCrateLevel),
}

impl LoggerKind {
    fn log<S: Display>(&mut self, msg: &S) {
        match self {
            LoggerKind::File(file_logger) => file_logger.log(msg),
            LoggerKind::Stdout => println!("{msg}"),
            LoggerKind::Stderr => eprintln!("{msg}"),
            LoggerKind::Log(level) => match level {
                LogCrateLevel::Info => log::info!("{msg}"),
                LogCrateLevel::Debug => log::debug!("{msg}"),
                LogCrateLevel::Trace => log::trace!("{msg}"),
            },
        }
    }
}

#[derive(Debug)]
struct FileLogger {
    writer: BufWriter<File>,
}

impl FileLogger {
    // A file that can't be opened disables the sink instead of failing the reduction.
    fn new(path: &PathBuf, append: bool) -> Option<Self> {
        let file = OpenOptions::new()
            .write(true)
            .append(append)
            .truncate(!append)
            .create(true)
            .open(path);

        match file {
            Ok(file) => Some(Self {
                writer: BufWriter::new(file),
            }),
            Err(err) => {
                log::warn!("Unable to open log file {}: {err}", path.display());
                None
            }
        }
    }

    fn log<S: Display>(&mut self, msg: &S) {
        if let Err(err) = writeln!(self.writer, "{msg}").and_then(|_| self.writer.flush()) {
            log::warn!("Unable to write to log file: {err}");
        }
    }
}
