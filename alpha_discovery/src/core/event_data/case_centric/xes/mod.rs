//! XES Format for Event Data
pub(crate) mod import_xes;
#[doc(inline)]
pub use import_xes::*;
