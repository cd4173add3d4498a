use std::convert::TryFrom;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::atomic::{AtomicU8, Ordering};

/// Verbosity of the native MP4 library. Process-wide, the last writer wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    /// Nothing is logged.
    None = 0,
    /// Failures only.
    Error = 1,
    /// Failures and suspicious conditions.
    Warning = 2,
    /// Opening and closing of files.
    Info = 3,
    /// Additional details on each native call.
    Verbose1 = 4,
    /// More details.
    Verbose2 = 5,
    /// Even more details.
    Verbose3 = 6,
    /// Everything.
    Verbose4 = 7,
}

static LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Error as u8);

impl LogLevel {
    /// All levels, from quiet to chatty.
    pub const ALL: [LogLevel; 8] = [
        LogLevel::None,
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Info,
        LogLevel::Verbose1,
        LogLevel::Verbose2,
        LogLevel::Verbose3,
        LogLevel::Verbose4,
    ];

    /// The `log` level records of this verbosity are emitted with.
    pub fn as_log_level(self) -> Option<log::Level> {
        match self {
            LogLevel::None => None,
            LogLevel::Error => Some(log::Level::Error),
            LogLevel::Warning => Some(log::Level::Warn),
            LogLevel::Info => Some(log::Level::Info),
            LogLevel::Verbose1 => Some(log::Level::Debug),
            LogLevel::Verbose2 | LogLevel::Verbose3 | LogLevel::Verbose4 => {
                Some(log::Level::Trace)
            }
        }
    }
}

impl TryFrom<i32> for LogLevel {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, i32> {
        usize::try_from(value)
            .ok()
            .and_then(|index| LogLevel::ALL.get(index).copied())
            .ok_or(value)
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            LogLevel::None => "MP4_LOG_NONE",
            LogLevel::Error => "MP4_LOG_ERROR",
            LogLevel::Warning => "MP4_LOG_WARNING",
            LogLevel::Info => "MP4_LOG_INFO",
            LogLevel::Verbose1 => "MP4_LOG_VERBOSE1",
            LogLevel::Verbose2 => "MP4_LOG_VERBOSE2",
            LogLevel::Verbose3 => "MP4_LOG_VERBOSE3",
            LogLevel::Verbose4 => "MP4_LOG_VERBOSE4",
        })
    }
}

pub fn set_level(level: LogLevel) {
    LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn level() -> LogLevel {
    LogLevel::try_from(i32::from(LEVEL.load(Ordering::Relaxed))).unwrap_or(LogLevel::Error)
}

pub fn enabled(level: LogLevel) -> bool {
    level != LogLevel::None && level <= self::level()
}

macro_rules! native_log {
    ($level:expr, $($arg:tt)+) => {{
        let level = $level;
        if $crate::native::logging::enabled(level) {
            if let Some(target) = level.as_log_level() {
                ::log::log!(target: "mp4_handle::native", target, $($arg)+);
            }
        }
    }};
}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;

    use test_case::test_case;

    use super::LogLevel;

    #[test_case(0, LogLevel::None; "none")]
    #[test_case(1, LogLevel::Error; "error")]
    #[test_case(2, LogLevel::Warning; "warning")]
    #[test_case(3, LogLevel::Info; "info")]
    #[test_case(4, LogLevel::Verbose1; "verbose 1")]
    #[test_case(7, LogLevel::Verbose4; "verbose 4")]
    fn test_from_native_value(value: i32, expected: LogLevel) {
        assert_eq!(LogLevel::try_from(value), Ok(expected));
        assert_eq!(expected as i32, value);
    }

    #[test_case(-1; "negative")]
    #[test_case(8; "above verbose 4")]
    #[test_case(i32::MAX; "maximum")]
    fn test_out_of_range(value: i32) {
        assert_eq!(LogLevel::try_from(value), Err(value));
    }

    #[test]
    fn test_mapping() {
        assert_eq!(LogLevel::None.as_log_level(), None);
        assert_eq!(LogLevel::Warning.as_log_level(), Some(log::Level::Warn));
        assert_eq!(LogLevel::Verbose1.as_log_level(), Some(log::Level::Debug));
        assert_eq!(LogLevel::Verbose3.as_log_level(), Some(log::Level::Trace));
        assert_eq!(LogLevel::Info.to_string(), "MP4_LOG_INFO");
    }
}
