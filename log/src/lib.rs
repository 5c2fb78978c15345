use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use once_cell::sync::Lazy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Notify,
    Strong,
    Warn,
    Trace,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Notify => "[+] ",
            Level::Strong => "[!] ",
            Level::Warn => "[*] ",
            Level::Trace => "[.] ",
        }
    }
}

#[macro_export]
macro_rules! notify {
    () => {};

    ($($arg:tt)*) => {{
        $crate::append(format!($($arg)*), $crate::Level::Notify);
    }};
}

#[macro_export]
macro_rules! strong {
    () => {};

    ($($arg:tt)*) => {{
        $crate::append(format!($($arg)*), $crate::Level::Strong);
    }};
}

#[macro_export]
macro_rules! warn {
    () => {};

    ($($arg:tt)*) => {{
        $crate::append(format!($($arg)*), $crate::Level::Warn);
    }};
}

#[macro_export]
macro_rules! trace {
    () => {};

    ($($arg:tt)*) => {{
        $crate::append(format!($($arg)*), $crate::Level::Trace);
    }};
}

pub static LOGGER: Lazy<Mutex<Logger<300>>> = Lazy::new(|| Mutex::new(Logger::new()));

/// Mirror every appended line to stderr.
static ECHO: AtomicBool = AtomicBool::new(false);

pub fn set_echo(echo: bool) {
    ECHO.store(echo, Ordering::Relaxed);
}

/// Append a line to the global logger. A poisoned lock still accepts lines, since a logger
/// holds no invariant a panic could break.
pub fn append(line: String, level: Level) {
    if ECHO.load(Ordering::Relaxed) {
        eprintln!("{}{line}", level.tag());
    }

    let mut logger = LOGGER.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    logger.append(line, level);
}

/// Render everything currently held by the global logger.
pub fn dump() -> String {
    let logger = LOGGER.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    logger.format()
}

/// Render the `count` most recent lines held by the global logger.
pub fn tail(count: usize) -> String {
    let logger = LOGGER.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    logger.format_tail(count)
}

pub struct Logger<const N: usize> {
    lines: [(String, Level); N],
    head: usize,
    len: usize,
}

impl<const N: usize> Logger<N> {
    pub fn new() -> Self {
        Self {
            lines: std::array::from_fn(|_| (String::new(), Level::Trace)),
            head: 0,
            len: 0,
        }
    }

    pub fn append(&mut self, line: String, level: Level) {
        self.lines[self.head] = (line + "\n", level);
        self.head = (self.head + 1) % N;
        self.len += 1;
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Number of lines currently retained, at most `N`.
    pub fn len(&self) -> usize {
        self.len.min(N)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn lines(&self) -> (&[(String, Level)], &[(String, Level)]) {
        if self.len < N {
            (&self.lines[0..self.len], &[])
        } else {
            // wrapped around, so we need to return two slices
            let (a, b) = self.lines.split_at(self.head);

            (b, a)
        }
    }

    /// Iterate the retained lines from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Level)> {
        let (a, b) = self.lines();
        a.iter().chain(b).map(|(line, level)| (line.trim_end(), *level))
    }

    pub fn format(&self) -> String {
        let mut text = String::new();
        let lines = self.lines();

        for (line, level) in lines.0.iter().chain(lines.1) {
            text.push_str(level.tag());
            text.push_str(line);
        }

        text
    }

    /// Like [`Logger::format`], keeping only the `count` newest lines.
    pub fn format_tail(&self, count: usize) -> String {
        let skip = self.len().saturating_sub(count);
        let mut text = String::new();

        for (line, level) in self.iter().skip(skip) {
            text.push_str(level.tag());
            text.push_str(line);
            text.push('\n');
        }

        text
    }
}

impl<const N: usize> Default for Logger<N> {
    fn default() -> Self {
        Self::new()
    }
}
