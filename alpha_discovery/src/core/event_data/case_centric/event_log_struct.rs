use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::constants::{ACTIVITY_NAME, NO_ACTIVITY};

///
/// Typed attribute values of an event
///
/// Tip: If you know the expected `AttributeValue` type, make use of the `try_as_xxx` functions (e.g., [`AttributeValue::try_as_string`])
///
/// ```rust
/// use alpha_discovery::core::event_data::case_centric::AttributeValue;
/// let v = AttributeValue::Float(42.0);
///
/// let f = v.try_as_float().unwrap();
/// assert_eq!(*f, 42.0);
/// ````
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "content")]
pub enum AttributeValue {
    /// String values
    String(String),
    /// Timestamps (without timezone)
    Date(NaiveDateTime),
    /// Integer values
    Int(i64),
    /// Float values
    Float(f64),
}

impl AttributeValue {
    ///
    /// Try to get attribute value as String
    ///
    /// Returns `Some()` of inner value if value is of variant [`AttributeValue::String`] and `None` otherwise
    ///
    pub fn try_as_string(&self) -> Option<&String> {
        match self {
            AttributeValue::String(v) => Some(v),
            _ => None,
        }
    }
    ///
    /// Try to get attribute value as date
    ///
    /// Returns `Some()` of inner value if value is of variant [`AttributeValue::Date`] and `None` otherwise
    ///
    pub fn try_as_date(&self) -> Option<&NaiveDateTime> {
        match self {
            AttributeValue::Date(v) => Some(v),
            _ => None,
        }
    }
    ///
    /// Try to get attribute value as int
    ///
    /// Returns `Some()` of inner value if value is of variant [`AttributeValue::Int`] and `None` otherwise
    ///
    pub fn try_as_int(&self) -> Option<&i64> {
        match self {
            AttributeValue::Int(v) => Some(v),
            _ => None,
        }
    }

    ///
    /// Try to get attribute value as float
    ///
    /// Returns `Some()` of inner value if value is of variant [`AttributeValue::Float`] and `None` otherwise
    ///
    pub fn try_as_float(&self) -> Option<&f64> {
        match self {
            AttributeValue::Float(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
///
/// Attribute made up of the key and value
///
pub struct Attribute {
    /// Attribute key
    pub key: String,
    /// Attribute value
    pub value: AttributeValue,
}

impl Attribute {
    ///
    /// Helper to create a new attribute
    ///
    pub fn new(key: String, value: AttributeValue) -> Self {
        Self { key, value }
    }
}

///
/// Attributes are [`Vec`]s of [`Attribute`]s
///
/// See the [`XESEditableAttribute`] trait for convenient functions to add, look up or remove attributes by key.
///
/// ```rust
/// use alpha_discovery::core::event_data::case_centric::{Attribute, AttributeValue, XESEditableAttribute};
/// let attrs = vec![Attribute::new("cost".to_string(), AttributeValue::Int(12))];
///
/// let cost = attrs.get_by_key("cost").and_then(|a| a.value.try_as_int()).unwrap();
/// assert_eq!(*cost, 12);
/// ````
pub type Attributes = Vec<Attribute>;

///
/// Trait to easily add and update attributes
///
pub trait XESEditableAttribute {
    ///
    /// Add a new attribute (with key and value)
    ///
    /// Note: Does _not_ check if attribute was already present.
    ///
    fn add_to_attributes(&mut self, key: String, value: AttributeValue);
    ///
    /// Add a new attribute
    ///
    fn add_attribute(&mut self, attr: Attribute);
    ///
    /// Get an attribute by key
    ///
    /// _Complexity_: Does linear lookup (i.e., in O(n)).
    fn get_by_key(&self, key: &str) -> Option<&Attribute>;
    ///
    /// Get an attribute as mutable by key
    ///
    /// _Complexity_: Does linear lookup (i.e., in O(n)).
    fn get_by_key_mut(&mut self, key: &str) -> Option<&mut Attribute>;
    ///
    /// Remove attribute with given key
    ///
    /// Returns `true` if the attribute was present and `false` otherwise
    fn remove_with_key(&mut self, key: &str) -> bool;
}

impl XESEditableAttribute for Attributes {
    fn add_to_attributes(&mut self, key: String, value: AttributeValue) {
        self.push(Attribute::new(key, value));
    }

    fn add_attribute(&mut self, a: Attribute) {
        self.push(a);
    }

    fn get_by_key(&self, key: &str) -> Option<&Attribute> {
        self.iter().find(|attr| attr.key == key)
    }

    fn get_by_key_mut(&mut self, key: &str) -> Option<&mut Attribute> {
        self.iter_mut().find(|attr| attr.key == key)
    }

    fn remove_with_key(&mut self, key: &str) -> bool {
        let index_opt = self.iter().position(|a| a.key == key);
        if let Some(index) = index_opt {
            self.remove(index);
            return true;
        }
        false
    }
}

///
/// An event consists of multiple (event) attributes ([Attributes])
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Event {
    /// Event attributes
    pub attributes: Attributes,
}

impl Event {
    /// Create a new event with the provided activity
    ///
    /// Implicitly assumes usage of the concept XES extension (i.e., uses [`ACTIVITY_NAME`] as key)
    pub fn new(activity: impl Into<String>) -> Self {
        Event {
            attributes: vec![Attribute::new(
                ACTIVITY_NAME.to_string(),
                AttributeValue::String(activity.into()),
            )],
        }
    }

    /// Activity label of this event under the given attribute key
    ///
    /// Returns `None` if the attribute is missing or not string-valued.
    pub fn activity(&self, activity_key: &str) -> Option<&str> {
        self.attributes
            .get_by_key(activity_key)
            .and_then(|a| a.value.try_as_string())
            .map(String::as_str)
    }
}

///
/// A trace is the ordered list of events of one case (in execution order)
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Trace {
    /// Events contained in trace
    pub events: Vec<Event>,
}

impl Trace {
    /// Activity labels of all events, in order
    ///
    /// Events without a string-valued activity attribute are labeled [`NO_ACTIVITY`].
    pub fn activities<'a>(&'a self, activity_key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.events
            .iter()
            .map(move |e| e.activity(activity_key).unwrap_or(NO_ACTIVITY))
    }
}

impl FromIterator<Event> for Trace {
    fn from_iter<T: IntoIterator<Item = Event>>(iter: T) -> Self {
        Trace {
            events: iter.into_iter().collect(),
        }
    }
}

///
/// Event log: Mapping from case identifier to the [`Trace`] of that case
///
/// Cases are kept sorted by identifier. The identifier is only used as a key,
/// discovery itself never looks at it.
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EventLog {
    /// Cases contained in log, keyed by case identifier
    pub cases: BTreeMap<String, Trace>,
}

impl EventLog {
    /// Create an empty [`EventLog`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a case
    ///
    /// If a case with the same identifier exists, it is replaced and returned.
    pub fn add_case(&mut self, case_id: impl Into<String>, trace: Trace) -> Option<Trace> {
        self.cases.insert(case_id.into(), trace)
    }

    /// Build a log from plain activity sequences (one event per activity, keyed by [`ACTIVITY_NAME`])
    pub fn from_activity_traces<I, C, T, A>(traces: I) -> Self
    where
        I: IntoIterator<Item = (C, T)>,
        C: Into<String>,
        T: IntoIterator<Item = A>,
        A: Into<String>,
    {
        let mut log = Self::new();
        for (case_id, activities) in traces {
            log.add_case(case_id, activities.into_iter().map(Event::new).collect());
        }
        log
    }

    /// Number of cases
    pub fn num_cases(&self) -> usize {
        self.cases.len()
    }

    /// Total number of events over all cases
    pub fn num_events(&self) -> usize {
        self.cases.values().map(|t| t.events.len()).sum()
    }

    /// Iterate over the activity sequence of every case
    pub fn activity_traces<'a>(
        &'a self,
        activity_key: &'a str,
    ) -> impl Iterator<Item = Vec<&'a str>> + 'a {
        self.cases
            .values()
            .map(move |t| t.activities(activity_key).collect())
    }
}
