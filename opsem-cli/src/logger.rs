//! Provides configuration of the logger.
use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Configures the log with the specified verbosity.
///
/// Each `-v` raises the level by one, from errors only up to trace.
/// `RUST_LOG`, when set, refines the filter further.
pub fn configure(verbosity: u8) -> Result<(), String> {
    let log_level = level(verbosity)?;

    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}:{}] {}",
                record.level(),
                record.target(),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .filter_level(log_level)
        .parse_env("RUST_LOG")
        .try_init()
        .map_err(|e| format!("Unable to configure logging. {e}"))?;

    log::trace!("Logger verbosity {log_level}");
    Ok(())
}

fn level(verbosity: u8) -> Result<LevelFilter, String> {
    match verbosity {
        0 => Ok(LevelFilter::Error),
        1 => Ok(LevelFilter::Warn),
        2 => Ok(LevelFilter::Info),
        3 => Ok(LevelFilter::Debug),
        4 => Ok(LevelFilter::Trace),
        _ => Err(String::from("Don't be crazy with verbose")),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn configure_when_verbosity_is_5_then_return_err() {
        let result = configure(5);

        assert!(result.is_err());
    }

    #[test]
    fn level_when_verbosity_is_3_then_debug() {
        assert_eq!(level(3), Ok(LevelFilter::Debug));
        assert_eq!(level(0), Ok(LevelFilter::Error));
    }
}
