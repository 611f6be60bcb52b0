//! Simple logger that can write to stderr or a file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::Mutex;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

use crate::parse_args::Verbosity;

/// Output destination for logger
enum Output {
    Stderr,
    File(BufWriter<File>),
}

/// Thread-safe `log` backend
pub struct Logger {
    output: Mutex<Output>,
    level: LevelFilter,
    start: Instant,
}

impl Verbosity {
    /// Log level this verbosity enables
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::Info,
            Verbosity::Verbose => LevelFilter::Debug,
            Verbosity::Trace => LevelFilter::Trace,
        }
    }
}

impl Logger {
    /// Create a new logger writing to stderr
    pub fn stderr(verbosity: Verbosity) -> Self {
        Logger {
            output: Mutex::new(Output::Stderr),
            level: verbosity.level_filter(),
            start: Instant::now(),
        }
    }

    /// Create a new logger writing to a file
    pub fn file(path: &str, verbosity: Verbosity) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Logger {
            output: Mutex::new(Output::File(BufWriter::new(file))),
            level: verbosity.level_filter(),
            start: Instant::now(),
        })
    }

    fn format(&self, record: &Record) -> String {
        let elapsed = self.start.elapsed();
        format!(
            "{:>5}.{:03} {:<5} {}",
            elapsed.as_secs(),
            elapsed.subsec_millis(),
            record.level(),
            record.args()
        )
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.format(record);
        if let Ok(mut output) = self.output.lock() {
            match &mut *output {
                Output::Stderr => {
                    eprintln!("{}", line);
                }
                Output::File(f) => {
                    let _ = writeln!(f, "{}", line);
                    let _ = f.flush();
                }
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut output) = self.output.lock() {
            if let Output::File(f) = &mut *output {
                let _ = f.flush();
            }
        }
    }
}

/// Install the global logger
pub fn init(verbosity: Verbosity, log_file: Option<&str>) -> io::Result<()> {
    let logger = match log_file {
        Some(path) => Logger::file(path, verbosity)?,
        None => Logger::stderr(verbosity),
    };
    let level = logger.level;
    log::set_logger(Box::leak(Box::new(logger)))
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e.to_string()))?;
    log::set_max_level(level);
    Ok(())
}
