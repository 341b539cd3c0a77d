use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::{DateTime, NaiveDateTime};
use flate2::bufread::GzDecoder;
use quick_xml::escape::unescape;
use quick_xml::events::BytesStart;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::core::event_data::case_centric::constants::TRACE_ID_NAME;
use crate::core::event_data::case_centric::event_log_struct::{
    AttributeValue, Event, EventLog, Trace, XESEditableAttribute,
};

///
/// Error encountered while parsing XES
///
#[derive(Debug, thiserror::Error)]
pub enum XESParseError {
    /// There is no top-level `<log>`
    #[error("Failed to parse XES: no top-level <log> element")]
    NoTopLevelLog,
    /// An `<event>` was encountered outside of an open `<trace>`
    #[error("Failed to parse XES: event outside of a trace")]
    EventOutsideTrace,
    /// IO error
    #[error("Failed to parse XES: {0}")]
    IOError(#[from] std::io::Error),
    /// XML error (e.g., incorrect XML format)
    #[error("Failed to parse XES: {0}")]
    XMLParsingError(#[from] quick_xml::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
///
/// Options for XES Import
///
/// See also [`build_ignore_attributes`] for easy construction of attributes set to not ignore
pub struct XESImportOptions {
    /// If Some: Ignore all event attributes except attributes with keys in the provided allowlist
    pub ignore_event_attributes_except: Option<HashSet<String>>,
    /// Optional date format to use when parsing dates (first trying [`chrono::DateTime`] then falling back to [`chrono::NaiveDateTime`]).
    ///
    /// See <https://docs.rs/chrono/latest/chrono/format/strftime/index.html> for all available Specifiers.
    ///
    /// Will fall back to default formats (e.g., rfc3339) if parsing fails using passed `date_format`
    pub date_format: Option<String>,
}

///
/// Construct a `HashSet<String>` from a _collection_ of String, &str, ...
///
/// Example usage: `build_ignore_attributes(vec!["concept:name"])`
///
pub fn build_ignore_attributes<I, S: AsRef<str>>(keys: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
{
    keys.into_iter().map(|s| s.as_ref().to_string()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    None,
    Log,
    Global,
    Trace,
    Event,
}

/// Parse XES from the given reader
///
/// Every `<trace>` with a string `concept:name` becomes one case. Traces without
/// a case identifier are skipped. Nested attributes and log-level or global
/// attributes are not kept.
pub fn import_xes<T>(reader: T, options: &XESImportOptions) -> Result<EventLog, XESParseError>
where
    T: BufRead,
{
    let mut reader = Reader::from_reader(reader);
    reader.config_mut().trim_text(true);
    let mut buf: Vec<u8> = Vec::new();

    let mut event_log = EventLog::new();
    let mut encountered_log = false;
    let mut mode = Mode::None;
    // Depth of currently open (non-empty) attribute tags
    let mut attr_depth: usize = 0;
    let mut current_case_id: Option<String> = None;
    let mut current_trace: Option<Trace> = None;
    let mut skipped_traces: usize = 0;

    loop {
        buf.clear();
        let (tag, is_empty) = match reader.read_event_into(&mut buf)? {
            quick_xml::events::Event::Start(t) => (t.into_owned(), false),
            quick_xml::events::Event::Empty(t) => (t.into_owned(), true),
            quick_xml::events::Event::End(t) => {
                match t.name().as_ref() {
                    b"event" => mode = Mode::Trace,
                    b"trace" => {
                        finish_trace(
                            &mut event_log,
                            current_case_id.take(),
                            current_trace.take(),
                            &mut skipped_traces,
                        );
                        mode = Mode::Log;
                    }
                    b"global" => mode = Mode::Log,
                    b"log" => mode = Mode::None,
                    _ => attr_depth = attr_depth.saturating_sub(1),
                }
                continue;
            }
            quick_xml::events::Event::Eof => break,
            _ => continue,
        };

        match tag.name().as_ref() {
            b"log" => {
                encountered_log = true;
                mode = if is_empty { Mode::None } else { Mode::Log };
            }
            b"trace" => {
                if !encountered_log {
                    return Err(XESParseError::NoTopLevelLog);
                }
                current_case_id = None;
                current_trace = Some(Trace::default());
                mode = Mode::Trace;
                if is_empty {
                    finish_trace(
                        &mut event_log,
                        current_case_id.take(),
                        current_trace.take(),
                        &mut skipped_traces,
                    );
                    mode = Mode::Log;
                }
            }
            b"event" => match (&mut current_trace, mode) {
                (Some(t), Mode::Trace) => {
                    t.events.push(Event::default());
                    if !is_empty {
                        mode = Mode::Event;
                    }
                }
                _ => return Err(XESParseError::EventOutsideTrace),
            },
            b"global" => {
                if !is_empty {
                    mode = Mode::Global;
                }
            }
            b"extension" | b"classifier" => {}
            _ => {
                if !encountered_log {
                    return Err(XESParseError::NoTopLevelLog);
                }
                if attr_depth == 0 {
                    add_attribute_from_tag(
                        &tag,
                        mode,
                        options,
                        &mut current_case_id,
                        &mut current_trace,
                    );
                }
                if !is_empty {
                    attr_depth += 1;
                }
            }
        }
    }

    if !encountered_log {
        return Err(XESParseError::NoTopLevelLog);
    }
    if skipped_traces > 0 {
        log::warn!(
            "Skipped {} trace(s) without a string '{}' attribute",
            skipped_traces,
            TRACE_ID_NAME
        );
    }
    log::debug!(
        "Imported XES with {} cases and {} events",
        event_log.num_cases(),
        event_log.num_events()
    );
    Ok(event_log)
}

fn finish_trace(
    event_log: &mut EventLog,
    case_id: Option<String>,
    trace: Option<Trace>,
    skipped_traces: &mut usize,
) {
    match (case_id, trace) {
        (Some(case_id), Some(trace)) => {
            if event_log.add_case(case_id.clone(), trace).is_some() {
                log::warn!("Duplicate case identifier {:?}: keeping the later trace", case_id);
            }
        }
        _ => *skipped_traces += 1,
    }
}

///
/// Add XES attribute from tag to the currently active element (indicated by `mode`)
///
fn add_attribute_from_tag(
    t: &BytesStart<'_>,
    mode: Mode,
    options: &XESImportOptions,
    current_case_id: &mut Option<String>,
    current_trace: &mut Option<Trace>,
) {
    let key = get_attribute_string(t, "key");
    match mode {
        Mode::Trace => {
            if key == TRACE_ID_NAME && t.name().as_ref() == b"string" {
                if let AttributeValue::String(id) = parse_attribute_value_from_tag(t, options) {
                    *current_case_id = Some(id);
                }
            }
        }
        Mode::Event => {
            if options
                .ignore_event_attributes_except
                .as_ref()
                .is_some_and(|not_ignored| !not_ignored.contains(&key))
            {
                return;
            }
            let val = parse_attribute_value_from_tag(t, options);
            match current_trace.as_mut().and_then(|t| t.events.last_mut()) {
                Some(e) => e.attributes.add_to_attributes(key, val),
                None => log::warn!(
                    "No current event when parsing event attribute: Key {:?}, Value {:?}",
                    key,
                    val
                ),
            }
        }
        Mode::Log | Mode::Global | Mode::None => {}
    }
}

fn get_attribute_string(t: &BytesStart<'_>, key: &'static str) -> String {
    let found = t
        .attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key.as_bytes());
    match found {
        Some(attr) => {
            let raw = String::from_utf8_lossy(&attr.value).to_string();
            match unescape(&raw) {
                Ok(unescaped) => unescaped.into_owned(),
                Err(_) => raw,
            }
        }
        None => {
            log::warn!(
                "Did not find expected XML attribute with key {}. Will assume empty string as value.",
                key
            );
            String::new()
        }
    }
}

/// Parse the typed value of an XES attribute tag
///
/// Values that fail to parse (and unsupported tags) are kept as [`AttributeValue::String`].
pub fn parse_attribute_value_from_tag(
    t: &BytesStart<'_>,
    options: &XESImportOptions,
) -> AttributeValue {
    let value = get_attribute_string(t, "value");
    match t.name().as_ref() {
        b"int" => match value.parse::<i64>() {
            Ok(n) => AttributeValue::Int(n),
            Err(e) => {
                log::warn!("Could not parse integer {:?}: Error {}", value, e);
                AttributeValue::String(value)
            }
        },
        b"float" => match value.parse::<f64>() {
            Ok(n) => AttributeValue::Float(n),
            Err(e) => {
                log::warn!("Could not parse float {:?}: Error {}", value, e);
                AttributeValue::String(value)
            }
        },
        b"date" => match parse_date_from_str(&value, &options.date_format) {
            Some(dt) => AttributeValue::Date(dt),
            None => {
                log::warn!("Failed to parse date from {:?}", value);
                AttributeValue::String(value)
            }
        },
        _ => AttributeValue::String(value),
    }
}

/// Parse a date, dropping any timezone offset (the recorded wall-clock time is kept)
fn parse_date_from_str(value: &str, date_format: &Option<String>) -> Option<NaiveDateTime> {
    if let Some(date_format) = &date_format {
        if let Ok(dt) = DateTime::parse_from_str(value, date_format) {
            return Some(dt.naive_local());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, date_format) {
            return Some(dt);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S:%f%:z") {
        return Some(dt.naive_local());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }

    None
}

///
/// Import a XES [`EventLog`] from a file path
///
/// Paths ending in `.gz` are decompressed on the fly.
///
pub fn import_xes_file<P: AsRef<Path>>(
    path: P,
    options: &XESImportOptions,
) -> Result<EventLog, XESParseError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    if path.to_string_lossy().ends_with(".gz") {
        let dec = GzDecoder::new(BufReader::new(file));
        import_xes(BufReader::new(dec), options)
    } else {
        import_xes(BufReader::new(file), options)
    }
}

///
/// Import a XES [`EventLog`] directly from a string
///
pub fn import_xes_str(xes_str: &str, options: &XESImportOptions) -> Result<EventLog, XESParseError> {
    import_xes(BufReader::new(xes_str.as_bytes()), options)
}

///
/// Import a XES [`EventLog`] from a byte slice (&\[u8\])
///
/// * `is_compressed_gz`: Parse the passed `xes_data` as a compressed .gz archive
///
pub fn import_xes_slice(
    xes_data: &[u8],
    is_compressed_gz: bool,
    options: &XESImportOptions,
) -> Result<EventLog, XESParseError> {
    if is_compressed_gz {
        let gz: GzDecoder<&[u8]> = GzDecoder::new(xes_data);
        return import_xes(BufReader::new(gz), options);
    }
    import_xes(BufReader::new(xes_data), options)
}
