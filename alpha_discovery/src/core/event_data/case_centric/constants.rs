//! Well-known attribute keys of the XES concept extension

/// Common identifying field for event identities (i.e., activities)
///
/// Used as the default activity key by discovery and replay.
pub const ACTIVITY_NAME: &str = "concept:name";
/// Common identifying field for trace identities (i.e., case IDs)
///
/// See also [`ACTIVITY_NAME`]
pub const TRACE_ID_NAME: &str = "concept:name";
/// Label used for events that carry no (string-valued) activity attribute
pub const NO_ACTIVITY: &str = "No Activity";
