use std::fmt;
use std::str::FromStr;

use log::LevelFilter;

/// Log verbosity, ordered from silent to everything.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Nothing = 0,
    User = 1,
    Error = 2,
    Warning = 3,
    #[default]
    Info = 4,
    Debug = 5,
    All = 6,
}

impl LogLevel {
    /// Create a LogLevel from an integer; unknown values map to Info.
    pub fn from_i32(level: i32) -> Self {
        match level {
            0 => LogLevel::Nothing,
            1 => LogLevel::User,
            2 => LogLevel::Error,
            3 => LogLevel::Warning,
            4 => LogLevel::Info,
            5 => LogLevel::Debug,
            6 => LogLevel::All,
            _ => LogLevel::Info,
        }
    }

    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    /// Matching `log` crate filter. `User` messages are logged as errors.
    pub fn to_filter(self) -> LevelFilter {
        match self {
            LogLevel::Nothing => LevelFilter::Off,
            LogLevel::User | LogLevel::Error => LevelFilter::Error,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::All => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown log level '{0}'")]
pub struct ParseLogLevelError(String);

impl FromStr for LogLevel {
    type Err = ParseLogLevelError;

    /// Accepts a level name or its integer value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<i32>() {
            return if (0..=6).contains(&n) {
                Ok(LogLevel::from_i32(n))
            } else {
                Err(ParseLogLevelError(s.to_string()))
            };
        }
        match s.to_ascii_lowercase().as_str() {
            "nothing" | "off" | "none" => Ok(LogLevel::Nothing),
            "user" => Ok(LogLevel::User),
            "error" => Ok(LogLevel::Error),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "all" | "trace" => Ok(LogLevel::All),
            _ => Err(ParseLogLevelError(s.to_string())),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Nothing => "nothing",
            LogLevel::User => "user",
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::All => "all",
        };
        f.write_str(name)
    }
}

/// Install the global logger. `RUST_LOG` still refines the level; calling
/// this more than once is harmless.
pub fn init(level: LogLevel) {
    let result = env_logger::Builder::new()
        .filter_level(level.to_filter())
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
    if result.is_ok() {
        log::debug!("Logging initialized at level {}", level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_log_level_from_i32() {
        assert_eq!(LogLevel::from_i32(0), LogLevel::Nothing);
        assert_eq!(LogLevel::from_i32(3), LogLevel::Warning);
        assert_eq!(LogLevel::from_i32(6), LogLevel::All);
        assert_eq!(LogLevel::from_i32(100), LogLevel::Info);
        assert_eq!(LogLevel::from_i32(-1), LogLevel::Info);
    }

    #[test]
    fn test_log_level_as_i32_round_trip() {
        for n in 0..=6 {
            assert_eq!(LogLevel::from_i32(n).as_i32(), n);
        }
    }

    #[rstest]
    #[case(LogLevel::Nothing, LevelFilter::Off)]
    #[case(LogLevel::User, LevelFilter::Error)]
    #[case(LogLevel::Warning, LevelFilter::Warn)]
    #[case(LogLevel::Debug, LevelFilter::Debug)]
    #[case(LogLevel::All, LevelFilter::Trace)]
    fn test_to_filter(#[case] level: LogLevel, #[case] filter: LevelFilter) {
        assert_eq!(level.to_filter(), filter);
    }

    #[rstest]
    #[case("debug", LogLevel::Debug)]
    #[case("WARN", LogLevel::Warning)]
    #[case("2", LogLevel::Error)]
    #[case(" all ", LogLevel::All)]
    fn test_parse(#[case] input: &str, #[case] expected: LogLevel) {
        assert_eq!(input.parse::<LogLevel>().unwrap(), expected);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("loud".parse::<LogLevel>().is_err());
        assert!("9".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_init_twice() {
        init(LogLevel::Warning);
        init(LogLevel::Debug);
    }
}
