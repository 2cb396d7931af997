use uuid::Uuid;

pub mod prelude;

// Core entities
pub mod folders;
pub mod sections;
pub mod smart_folders;
pub mod status;
pub mod tags;
pub mod tasks;
pub mod users;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = Uuid;
