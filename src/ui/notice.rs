use std::fmt;

use console::style;

use super::icons::{CHECK, CROSS, INFO, WARN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A one-line user-facing message (the terminal's toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }

    /// Styled line for the terminal.
    pub fn render(&self) -> String {
        match self.level {
            NoticeLevel::Success => format!("{}{}", CHECK, style(&self.message).green()),
            NoticeLevel::Info => format!("{}{}", INFO, style(&self.message).cyan()),
            NoticeLevel::Warning => format!("{}{}", WARN, style(&self.message).yellow()),
            NoticeLevel::Error => format!("{}{}", CROSS, style(&self.message).red().bold()),
        }
    }

    /// Errors and warnings go to stderr, the rest to stdout.
    pub fn print(&self) {
        match self.level {
            NoticeLevel::Error | NoticeLevel::Warning => eprintln!("{}", self.render()),
            _ => println!("{}", self.render()),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
