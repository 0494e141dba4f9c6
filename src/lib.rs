mod macros;

pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod entity;
pub mod error;
pub mod list;
pub mod logging;
pub mod paths;
pub mod remote;
pub mod validation;

pub use auth::{AuthSession, SessionMarker};
pub use config::Config;
pub use entity::{EntityKind, Record, RecordId};
pub use error::{Result, StewardError};
pub use list::{
    ControllerOptions, ListQuery, ListSnapshot, ListSyncController, LoadStatus,
    NavigationSnapshot, PageResult,
};
pub use remote::{CollectionClient, CollectionRequest, HttpCollectionClient, InMemoryCollection};
pub use validation::{FieldErrors, Validate};
