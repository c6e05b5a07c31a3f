//! Terminal logging with colored module prefixes.
//!
//! Everything here writes to stderr, so command output on stdout (`render`)
//! stays clean for piping.
//!
//! - `log!` - one line with a colored `[module]` prefix
//! - `debug!` - same, only with `--verbose`
//! - [`ProgressLine`] - in-place counters for batch commands
//!
//! ```ignore
//! log!("import"; "converting {}", plural_count(n, "topic"));
//!
//! let progress = ProgressLine::new("import", &[("topics", n)]);
//! progress.inc("topics");
//! progress.finish();
//! ```

use std::fmt;
use std::io::{Write, stderr};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crossterm::{
    cursor, queue,
    terminal::{Clear, ClearType},
};
use owo_colors::{OwoColorize, Stream, Style};
use parking_lot::Mutex;

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set by a live [`ProgressLine`]; log lines clear it before printing.
static PROGRESS_ACTIVE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Macros
// ============================================================================

/// Log a message under a module prefix.
///
/// ```ignore
/// log!("store"; "saved {}", path.display());
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Like `log!`, but only with `--verbose`. Arguments are not evaluated
/// otherwise.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Output
// ============================================================================

pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut out = stderr().lock();

    if PROGRESS_ACTIVE.load(Ordering::SeqCst) {
        clear_line(&mut out);
    }
    writeln!(out, "{prefix} {message}").ok();
    out.flush().ok();
}

/// Style `text` for stderr. Plain when stderr is not a terminal or when
/// `--color never` is set.
pub fn paint(text: impl fmt::Display, style: Style) -> String {
    text.if_supports_color(Stream::Stderr, |t| t.style(style))
        .to_string()
}

fn colorize_prefix(module: &str) -> String {
    let style = match module.to_ascii_lowercase().as_str() {
        "import" | "keywords" => Style::new().bright_blue(),
        "render" | "build" | "links" => Style::new().bright_green(),
        "warning" => Style::new().bright_magenta(),
        "error" => Style::new().bright_red(),
        _ => Style::new().bright_yellow(),
    };
    paint(format!("[{module}]"), style.bold())
}

fn clear_line(out: &mut impl Write) {
    queue!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
}

// ============================================================================
// Progress line
// ============================================================================

struct Counter {
    name: &'static str,
    total: usize,
    current: AtomicUsize,
}

/// One status line of named counters, redrawn in place:
/// `[import] topics(42/69)`.
///
/// Safe to share across rayon workers. A refresh is skipped when another
/// thread is drawing, so `inc` never blocks.
pub struct ProgressLine {
    label: &'static str,
    counters: Vec<Counter>,
    draw: Mutex<()>,
}

impl ProgressLine {
    /// Start a progress line. Counters with a zero total are left out.
    pub fn new(label: &'static str, items: &[(&'static str, usize)]) -> Self {
        let counters = items
            .iter()
            .filter(|(_, total)| *total > 0)
            .map(|&(name, total)| Counter {
                name,
                total,
                current: AtomicUsize::new(0),
            })
            .collect();

        PROGRESS_ACTIVE.store(true, Ordering::SeqCst);
        let progress = Self {
            label,
            counters,
            draw: Mutex::new(()),
        };
        progress.redraw();
        progress
    }

    pub fn inc(&self, name: &str) {
        let Some(counter) = self.counters.iter().find(|c| c.name == name) else {
            return;
        };
        counter.current.fetch_add(1, Ordering::Relaxed);

        if let Some(_guard) = self.draw.try_lock() {
            self.redraw();
        }
    }

    fn line(&self) -> String {
        let parts: Vec<String> = self
            .counters
            .iter()
            .map(|c| format!("{}({}/{})", c.name, c.current.load(Ordering::Relaxed), c.total))
            .collect();
        parts.join(" ")
    }

    fn redraw(&self) {
        let mut out = stderr().lock();
        clear_line(&mut out);
        write!(out, "{} {}", colorize_prefix(self.label), self.line()).ok();
        out.flush().ok();
    }

    /// Leave the final counts on screen and end the line.
    pub fn finish(self) {
        {
            let _guard = self.draw.lock();
            self.redraw();
            eprintln!();
        }
        PROGRESS_ACTIVE.store(false, Ordering::SeqCst);
        std::mem::forget(self);
    }
}

impl Drop for ProgressLine {
    /// Dropped without `finish` (early return): erase the line.
    fn drop(&mut self) {
        PROGRESS_ACTIVE.store(false, Ordering::SeqCst);
        let mut out = stderr().lock();
        clear_line(&mut out);
        out.flush().ok();
    }
}
