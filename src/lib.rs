pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod derive;
pub mod error;
pub mod join;
pub mod model;
pub mod query;
pub mod query_matches;
pub mod query_phases;
pub mod query_players;
pub mod query_teams;
pub mod query_venues;
pub mod rows;
pub mod schema;
pub mod synthetic;

pub use config::DataConfig;
pub use dataset::{Dataset, load_dataset};
pub use error::{EngineError, SchemaError};
pub use model::{Delivery, Match, ResultType};
pub use synthetic::{SyntheticConfig, synthetic_dataset};
