use clap::ValueEnum;
use std::fmt;
use worktrace_types::SessionStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    Plain,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Plain => write!(f, "plain"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum StatusFilter {
    Running,
    Paused,
    Finished,
    Cancelled,
}

impl StatusFilter {
    pub fn as_status(self) -> SessionStatus {
        match self {
            StatusFilter::Running => SessionStatus::Running,
            StatusFilter::Paused => SessionStatus::Paused,
            StatusFilter::Finished => SessionStatus::Finished,
            StatusFilter::Cancelled => SessionStatus::Cancelled,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_status())
    }
}
