//! IO implementations for `EventLog`

use std::io::{BufReader, Read};

use flate2::read::GzDecoder;

use crate::core::event_data::case_centric::xes::import_xes::{
    import_xes, XESImportOptions, XESParseError,
};
use crate::core::event_data::case_centric::EventLog;
use crate::core::io::Importable;

/// Error type for `EventLog` IO operations
#[derive(Debug, thiserror::Error)]
pub enum EventLogIOError {
    /// IO Error
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    /// XES Parsing Error
    #[error("XES Error: {0}")]
    Xes(#[from] XESParseError),
    /// JSON Parsing Error
    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
    /// Unsupported Format
    #[error("Unsupported Format: {0}")]
    UnsupportedFormat(String),
}

impl Importable for EventLog {
    type Error = EventLogIOError;

    fn import_from_reader<R: Read>(reader: R, format: &str) -> Result<Self, Self::Error> {
        let format = format.trim_start_matches('.');
        match format {
            "xes" => Ok(import_xes(
                BufReader::new(reader),
                &XESImportOptions::default(),
            )?),
            "xes.gz" => Ok(import_xes(
                BufReader::new(GzDecoder::new(reader)),
                &XESImportOptions::default(),
            )?),
            "json" => Ok(serde_json::from_reader(BufReader::new(reader))?),
            _ => Err(EventLogIOError::UnsupportedFormat(format.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trip_through_importable() {
        let log = EventLog::from_activity_traces(vec![("c1", vec!["a", "b"])]);
        let json = serde_json::to_vec(&log).unwrap();
        let imported = EventLog::import_from_bytes(&json, "json").unwrap();
        assert_eq!(imported, log);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let res = EventLog::import_from_bytes(b"a,b,c", "csv");
        assert!(matches!(res, Err(EventLogIOError::UnsupportedFormat(f)) if f == "csv"));
    }
}
