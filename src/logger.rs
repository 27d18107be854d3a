//! Terminal output: prefixed log lines, a build progress line and the
//! watch status line.
//!
//! ```ignore
//! log!("scan"; "no dir {}", root.display());
//! debug!("copy"; "{} written", stats.written);   // --verbose only
//!
//! let progress = ProgressLine::new(&[("js", 3), ("css", 2)]);
//! progress.inc("js");
//! progress.finish();
//! ```
//!
//! While a progress line is on screen, log lines are printed above it and
//! the progress line is redrawn underneath.

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{StdoutLock, Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Rendered text of the progress line currently on screen, if any.
static PROGRESS: Mutex<Option<String>> = Mutex::new(None);

static STATUS: Mutex<StatusLine> = Mutex::new(StatusLine::new());

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

pub fn log(module: &str, message: &str) {
    let progress = PROGRESS.lock();
    let mut out = stdout().lock();

    if progress.is_some() {
        clear_line(&mut out);
    }
    writeln!(out, "{} {message}", prefix(module)).ok();
    if let Some(line) = progress.as_deref() {
        write!(out, "{line}").ok();
    }
    out.flush().ok();
}

/// `[module]`, colored by module.
fn prefix(module: &str) -> String {
    let tag = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "dev" => tag.bright_blue().bold().to_string(),
        "watch" => tag.bright_green().bold().to_string(),
        "build" | "version" => tag.bright_cyan().bold().to_string(),
        "error" => tag.bright_red().bold().to_string(),
        "warning" => tag.bright_magenta().bold().to_string(),
        _ => tag.bright_yellow().bold().to_string(),
    }
}

fn clear_line(out: &mut StdoutLock<'_>) {
    execute!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
}

// ============================================================================
// Watch status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    Unchanged,
    Error,
}

/// Status block for watch mode. Each report replaces the previous one.
struct StatusLine {
    /// Terminal lines taken by the last report.
    height: usize,
}

impl StatusLine {
    const fn new() -> Self {
        Self { height: 0 }
    }

    fn report(&mut self, outcome: Outcome, message: &str) {
        let mut out = stdout().lock();

        if self.height > 0 {
            #[allow(clippy::cast_possible_truncation)]
            let up = self.height as u16;
            execute!(out, cursor::MoveUp(up), Clear(ClearType::FromCursorDown)).ok();
        }

        let stamp = format!("[{}]", now()).dimmed().to_string();
        let line = match outcome {
            Outcome::Success => format!("{stamp} {} {message}", "✓".green()),
            Outcome::Error => format!("{stamp} {} {message}", "✗".red()),
            Outcome::Unchanged => format!("{stamp} {}", message.dimmed()),
        };
        writeln!(out, "{line}").ok();
        out.flush().ok();

        self.height = line_count(message);
    }
}

fn line_count(message: &str) -> usize {
    message.lines().count().max(1)
}

/// Current UTC wall-clock time as HH:MM:SS
fn now() -> String {
    use std::time::SystemTime;
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    format!("{:02}:{:02}:{:02}", (secs / 3600) % 24, (secs / 60) % 60, secs % 60)
}

pub fn status_success(message: &str) {
    STATUS.lock().report(Outcome::Success, message);
}

pub fn status_unchanged(message: &str) {
    STATUS.lock().report(Outcome::Unchanged, message);
}

/// Error summary with an optional multi-line detail below it.
pub fn status_error(summary: &str, detail: &str) {
    let message = if detail.is_empty() {
        summary.to_string()
    } else {
        format!("{summary}\n{detail}")
    };
    STATUS.lock().report(Outcome::Error, &message);
}

// ============================================================================
// Progress line
// ============================================================================

/// Per-task counters on one line: `[build] js(2/3) css(1/1)`
///
/// Dropping without [`finish`](Self::finish) erases the line.
pub struct ProgressLine {
    /// `(name, done, total)`, only counters with work to do.
    counters: Mutex<Vec<(&'static str, usize, usize)>>,
}

impl ProgressLine {
    pub fn new(items: &[(&'static str, usize)]) -> Self {
        let counters = items
            .iter()
            .filter(|(_, total)| *total > 0)
            .map(|&(name, total)| (name, 0, total))
            .collect();
        let progress = Self {
            counters: Mutex::new(counters),
        };
        progress.redraw();
        progress
    }

    pub fn inc(&self, name: &str) {
        if let Some(counter) = self.counters.lock().iter_mut().find(|c| c.0 == name) {
            counter.1 = (counter.1 + 1).min(counter.2);
        }
        self.redraw();
    }

    fn render(&self) -> String {
        let body = self
            .counters
            .lock()
            .iter()
            .map(|(name, done, total)| format!("{name}({done}/{total})"))
            .collect::<Vec<_>>()
            .join(" ");
        format!("{} {body}", prefix("build"))
    }

    fn redraw(&self) {
        let line = self.render();
        let mut progress = PROGRESS.lock();
        let mut out = stdout().lock();
        clear_line(&mut out);
        write!(out, "{line}").ok();
        out.flush().ok();
        *progress = Some(line);
    }

    /// Leave the final counts on screen.
    pub fn finish(self) {
        if let Some(line) = PROGRESS.lock().take() {
            let mut out = stdout().lock();
            clear_line(&mut out);
            writeln!(out, "{line}").ok();
            out.flush().ok();
        }
    }
}

impl Drop for ProgressLine {
    fn drop(&mut self) {
        if PROGRESS.lock().take().is_some() {
            let mut out = stdout().lock();
            clear_line(&mut out);
            out.flush().ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_count() {
        assert_eq!(line_count("copied: build/css/site.css"), 1);
        assert_eq!(line_count(""), 1);
        assert_eq!(line_count("copy failed\npermission denied\n  build/js/app.js"), 3);
    }

    #[test]
    fn test_now_format() {
        let t = now();
        assert_eq!(t.len(), 8);
        assert_eq!(t.as_bytes()[2], b':');
        assert_eq!(t.as_bytes()[5], b':');
    }

    #[test]
    fn test_progress_counts_saturate() {
        let progress = ProgressLine::new(&[("js", 1), ("css", 0)]);
        progress.inc("js");
        progress.inc("js");
        progress.inc("theme");
        let line = progress.render();
        assert!(line.ends_with(" js(1/1)"));
        assert!(!line.contains("css"));
        progress.finish();
        assert!(PROGRESS.lock().is_none());
    }
}
