//! Exit codes for the skysense CLI.
//!
//! Exit codes communicate the outcome without requiring output parsing.

use sky_common::Error;

/// Exit codes for skysense operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Everything ingested / printed
    Clean = 0,

    /// Ingest rejected (no file, unreadable, no GPS data)
    IngestRejected = 1,

    /// Stream finished but some samples were rejected
    PartialStream = 2,

    /// Configuration error
    ConfigError = 10,

    /// Bad command-line input (e.g. unparsable AQI)
    InputError = 11,

    /// I/O error
    IoError = 13,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::NoFile | Error::UnreadableFile { .. } | Error::NoGpsData { .. } => {
                ExitCode::IngestRejected
            }
            Error::MalformedPayload(_) => ExitCode::InputError,
            Error::Config(_) => ExitCode::ConfigError,
            Error::Io(_) => ExitCode::IoError,
            Error::Json(_) => ExitCode::InternalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_map_to_ingest_rejected() {
        assert_eq!(ExitCode::from(&Error::NoFile), ExitCode::IngestRejected);
        assert_eq!(
            ExitCode::from(&Error::NoGpsData { rows: 3 }),
            ExitCode::IngestRejected
        );
        assert_eq!(i32::from(ExitCode::IngestRejected), 1);
    }

    #[test]
    fn config_and_input_errors_have_stable_codes() {
        let code = ExitCode::from(&Error::Config("bad".into()));
        assert_eq!(code.as_i32(), 10);
        assert_eq!(ExitCode::from(&Error::MalformedPayload("x".into())).as_i32(), 11);
    }
}
