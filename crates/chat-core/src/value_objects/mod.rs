//! Value objects - immutable types that represent domain concepts

mod intents;
mod snowflake;

pub use intents::Intents;
pub use snowflake::{Snowflake, SnowflakeParseError};
