//! Model entities: construction from a dataset snapshot, fit, predict and
//! the persisted state envelope.

mod error;
mod model;
mod state;

pub use error::{EntityError, Result};
pub use model::ModelEntity;
pub use state::{PersistedModel, FORMAT_VERSION};
