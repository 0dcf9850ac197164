//! Logging utilities with colored output and scoped build reporting.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro for output gated on verbosity
//! - `Reporter` for scoped build reporting (artifact progress lines)
//!
//! # Example
//!
//! ```ignore
//! // Simple logging
//! log!("serve"; "http://{}", addr);
//!
//! // Scoped reporting around a build
//! let _guard = Reporter::enter("site", 1);
//! report_artifact("blog/index.html", false);
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use std::{
    cell::RefCell,
    io::{Write, stdout},
    marker::PhantomData,
    sync::atomic::{AtomicU8, Ordering},
};

/// Global verbosity level (set once from the `-v` count)
static VERBOSITY: AtomicU8 = AtomicU8::new(0);

/// Set verbosity level globally
pub fn set_verbosity(level: u8) {
    VERBOSITY.store(level, Ordering::SeqCst);
}

/// Current verbosity level
pub fn verbosity() -> u8 {
    VERBOSITY.load(Ordering::SeqCst)
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    verbosity() > 0
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when `-v` is given)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "serve" => prefix.bright_blue().bold().to_string(),
        "admin" => prefix.bright_magenta().bold().to_string(),
        "build" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Reporter (scoped build reporting)
// ============================================================================

/// A reporting context for one build invocation.
///
/// Contexts stack per thread: each request worker builds on its own thread,
/// so concurrent builds never see each other's reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reporter {
    env: String,
    verbosity: u8,
}

thread_local! {
    static REPORTERS: RefCell<Vec<Reporter>> = const { RefCell::new(Vec::new()) };
}

impl Reporter {
    /// Push a reporter for `env` and return the guard that pops it.
    ///
    /// The context stays active until the guard is dropped, which also
    /// happens when an error propagates out of the scope or a panic unwinds.
    #[must_use = "the reporter is released as soon as the guard is dropped"]
    pub fn enter(env: impl Into<String>, verbosity: u8) -> ReporterGuard {
        let depth = REPORTERS.with(|stack| {
            let mut stack = stack.borrow_mut();
            stack.push(Self {
                env: env.into(),
                verbosity,
            });
            stack.len()
        });
        ReporterGuard {
            depth,
            _not_send: PhantomData,
        }
    }

    /// The innermost active reporter on this thread.
    pub fn current() -> Option<Self> {
        REPORTERS.with(|stack| stack.borrow().last().cloned())
    }

    pub fn env(&self) -> &str {
        &self.env
    }

    pub fn verbosity(&self) -> u8 {
        self.verbosity
    }
}

/// Releases its `Reporter` on drop.
///
/// Not `Send`: the context lives on the thread-local stack it was pushed to.
pub struct ReporterGuard {
    depth: usize,
    _not_send: PhantomData<*const ()>,
}

impl Drop for ReporterGuard {
    fn drop(&mut self) {
        REPORTERS.with(|stack| stack.borrow_mut().truncate(self.depth - 1));
    }
}

/// Number of reporters active on this thread.
#[cfg(test)]
pub fn reporter_depth() -> usize {
    REPORTERS.with(|stack| stack.borrow().len())
}

/// Report a built or skipped artifact to the active reporter.
///
/// Without an active reporter this is a no-op.
pub fn report_artifact(name: &str, fresh: bool) {
    let Some(reporter) = Reporter::current() else {
        return;
    };

    if !fresh {
        log("build", &format!("{} {}", "U".green(), name));
    } else if reporter.verbosity() >= 1 {
        log("build", &format!("{}", format!("  {name} (fresh)").dimmed()));
    }
}

/// Report the source a build is about to process (verbosity >= 2).
pub fn report_source(url_path: &str) {
    if let Some(reporter) = Reporter::current()
        && reporter.verbosity() >= 2
    {
        log("build", &format!("{}: {}", reporter.env(), url_path.dimmed()));
    }
}

// ============================================================================
// Tests
// ============================================================================
