//! Pending read: built synchronously by a repository or a relation, sent asynchronously.

use crate::config::ResolvedSchema;
use crate::error::RestError;
use crate::model::Model;
use crate::response::{lookup_path, Fetched, Records};
use crate::state::RestState;
use crate::transport::{HttpRequest, Method};
use serde_json::{Map, Value};
use std::fmt;

/// What to read: the whole collection, one record by id, or the collection filtered by query parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Lookup {
    #[default]
    All,
    Id(String),
    Params(Map<String, Value>),
}

impl Lookup {
    pub fn id(&self) -> Option<&str> {
        match self {
            Lookup::Id(id) => Some(id.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for Lookup {
    fn from(id: &str) -> Self {
        Lookup::Id(id.to_string())
    }
}

impl From<String> for Lookup {
    fn from(id: String) -> Self {
        Lookup::Id(id)
    }
}

macro_rules! lookup_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Lookup {
            fn from(id: $t) -> Self {
                Lookup::Id(id.to_string())
            }
        })*
    };
}

lookup_from_int!(i32, i64, u32, u64, usize);

impl From<Map<String, Value>> for Lookup {
    fn from(params: Map<String, Value>) -> Self {
        if params.is_empty() {
            Lookup::All
        } else {
            Lookup::Params(params)
        }
    }
}

impl From<Value> for Lookup {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(params) => params.into(),
            Value::String(s) => Lookup::Id(s),
            Value::Number(n) => Lookup::Id(n.to_string()),
            _ => Lookup::All,
        }
    }
}

/// A GET (or POST-as-query) whose results become models bound to `schema`.
pub struct Fetch {
    state: RestState,
    schema: ResolvedSchema,
    request: HttpRequest,
    is_array: bool,
}

impl fmt::Debug for Fetch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fetch")
            .field("schema", &self.schema.name)
            .field("request", &self.request)
            .field("is_array", &self.is_array)
            .finish()
    }
}

impl Fetch {
    pub(crate) fn new(state: RestState, schema: ResolvedSchema, request: HttpRequest, is_array: bool) -> Self {
        Self {
            state,
            schema,
            request,
            is_array,
        }
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn url(&self) -> &str {
        &self.request.url
    }

    /// Whether the response is read as a list (`dataListLocation`) or a single item.
    pub fn is_array(&self) -> bool {
        self.is_array
    }

    pub fn schema(&self) -> &ResolvedSchema {
        &self.schema
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.insert(name.into(), value.into());
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.request.headers.insert(name.into(), value.into());
        }
        self
    }

    /// Send the query as a POST with `data` as the body. Empty data keeps the GET.
    pub fn post_data(mut self, data: Map<String, Value>) -> Self {
        if !data.is_empty() {
            self.request.method = Method::Post;
            self.request.data = Some(Value::Object(data));
        }
        self
    }

    pub async fn send(self) -> Result<Fetched, RestError> {
        let Fetch {
            state,
            schema,
            request,
            is_array,
        } = self;
        tracing::debug!(schema = %schema.name, method = %request.method, url = %request.url, is_array, "fetch");
        let raw_response = state.transport().request(request).await?;
        let records = if schema.auto_parse {
            parse_records(&state, &schema, &raw_response, is_array)
        } else {
            None
        };
        Ok(Fetched { raw_response, records })
    }
}

fn parse_records(state: &RestState, schema: &ResolvedSchema, raw: &Value, is_array: bool) -> Option<Records> {
    let location = if is_array {
        &schema.data_list_location
    } else {
        &schema.data_item_location
    };
    match lookup_path(raw, location)? {
        Value::Array(items) => {
            let models = items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(data) => Some(Model::with_schema(state.clone(), schema.clone(), data.clone(), true)),
                    other => {
                        tracing::debug!(schema = %schema.name, item = %other, "skipping non-object list item");
                        None
                    }
                })
                .collect();
            Some(Records::Many(models))
        }
        Value::Object(data) => Some(Records::One(Model::with_schema(
            state.clone(),
            schema.clone(),
            data.clone(),
            true,
        ))),
        _ => None,
    }
}
