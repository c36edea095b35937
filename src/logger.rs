//! Terminal logging with colored module prefixes.
//!
//! - `log!` for regular output: `[build] 12 posts, 3 pages`
//! - `debug!` for output only shown with `--verbose`
//! - `WatchStatus` for the serve-mode status block that each rebuild overwrites
//!
//! ```ignore
//! log!("serve"; "http://{}", addr);
//! debug!("watch"; "event {}: {}", kind, path.display());
//! logger::status_success("rebuilt in 41ms");
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{Write, stdout},
    sync::LazyLock,
    sync::atomic::{AtomicBool, Ordering},
    time::SystemTime,
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Log a message with a colored module prefix
///
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

/// Write `[module] message` to stdout.
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut stdout = stdout().lock();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

fn colorize_prefix(module: &str) -> String {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "serve" | "ws" => prefix.bright_blue().bold().to_string(),
        "watch" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        "warning" => prefix.yellow().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

/// Current UTC time as HH:MM:SS
fn now() -> String {
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format_clock(secs)
}

fn format_clock(secs: u64) -> String {
    let hours = (secs / 3600) % 24;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Status block for serve mode.
///
/// Each message replaces the previous one so a burst of rebuilds leaves a
/// single line (or a single error block) on screen.
pub struct WatchStatus {
    /// Lines of previous output to clear
    last_lines: usize,
}

static WATCH_STATUS: LazyLock<Mutex<WatchStatus>> =
    LazyLock::new(|| Mutex::new(WatchStatus::new()));

impl WatchStatus {
    pub const fn new() -> Self {
        Self { last_lines: 0 }
    }

    pub fn success(&mut self, message: &str) {
        self.display(format!("{}", "✓".green()), message);
    }

    pub fn error(&mut self, summary: &str, detail: &str) {
        let message = if detail.is_empty() {
            summary.to_string()
        } else {
            format!("{summary}\n{detail}")
        };
        self.display(format!("{}", "✗".red()), &message);
    }

    pub fn warning(&mut self, detail: &str) {
        self.display(format!("{}", "⚠".yellow()), detail);
    }

    fn display(&mut self, symbol: String, message: &str) {
        let mut stdout = stdout().lock();

        if self.last_lines > 0 {
            #[allow(clippy::cast_possible_truncation)]
            let lines = self.last_lines as u16;
            execute!(stdout, cursor::MoveUp(lines)).ok();
            execute!(stdout, Clear(ClearType::FromCursorDown)).ok();
        }

        let timestamp = format!("[{}]", now()).dimmed().to_string();
        writeln!(stdout, "{timestamp} {symbol} {message}").ok();
        stdout.flush().ok();

        self.last_lines = line_count(message);
    }
}

fn line_count(message: &str) -> usize {
    message.matches('\n').count() + 1
}

pub fn status_success(message: &str) {
    WATCH_STATUS.lock().success(message);
}

pub fn status_error(summary: &str, detail: &str) {
    WATCH_STATUS.lock().error(summary, detail);
}

pub fn status_warning(detail: &str) {
    WATCH_STATUS.lock().warning(detail);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_status_new() {
        let status = WatchStatus::new();
        assert_eq!(status.last_lines, 0);
    }

    #[test]
    fn test_line_count() {
        assert_eq!(line_count("rebuilt in 12ms"), 1);
        assert_eq!(line_count("2 issues\ncontent/a.yaml: bad\npages/x.html: bad"), 3);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00:00");
        assert_eq!(format_clock(3600 * 25 + 61), "01:01:01");
    }
}
