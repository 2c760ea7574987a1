//! REST data binding: schema-driven models with dirty tracking, CRUD sync and relation traversal.

pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod registry;
pub mod repository;
pub mod response;
pub mod state;
pub mod transport;

pub use config::{
    load_from_path, parse_schemas, PropertyConfig, RelationConfig, RequestFormatter, ResolvedSchema, RestConfig,
    SchemaDefinition, SyncPolicy,
};
pub use error::{RestError, SchemaError, TransportError};
pub use fetch::{Fetch, Lookup};
pub use model::Model;
pub use registry::SchemaRegistry;
pub use repository::Repository;
pub use response::{lookup_path, Fetched, Records};
pub use state::RestState;
pub use transport::{HttpRequest, HttpTransport, Method, Transport};
