//! Response envelopes: dotted-path payload lookup and parsed results.

use crate::model::Model;
use serde_json::Value;

/// Walk `path` (e.g. `response.data.users`) into `value`. An empty path is the
/// value itself; a missing segment yields `None`. Numeric segments index arrays.
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Models built from a response payload.
#[derive(Debug)]
pub enum Records {
    Many(Vec<Model>),
    One(Model),
}

impl Records {
    pub fn len(&self) -> usize {
        match self {
            Records::Many(models) => models.len(),
            Records::One(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_many(&self) -> bool {
        matches!(self, Records::Many(_))
    }

    pub fn into_many(self) -> Vec<Model> {
        match self {
            Records::Many(models) => models,
            Records::One(model) => vec![model],
        }
    }

    pub fn into_one(self) -> Option<Model> {
        match self {
            Records::Many(models) => models.into_iter().next(),
            Records::One(model) => Some(model),
        }
    }
}

/// Outcome of a completed fetch.
#[derive(Debug)]
pub struct Fetched {
    pub raw_response: Value,
    /// `None` when auto-parse is off or the located payload is neither array nor object.
    pub records: Option<Records>,
}

impl Fetched {
    pub fn into_many(self) -> Vec<Model> {
        self.records.map(Records::into_many).unwrap_or_default()
    }

    pub fn into_one(self) -> Option<Model> {
        self.records.and_then(Records::into_one)
    }
}
