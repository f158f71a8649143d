//! Driver discovery and ranking API

pub mod discovery;
pub mod distance;
pub mod driver;
pub mod selection;
pub mod session;
