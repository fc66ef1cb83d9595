pub mod engine;
pub mod limits;
pub mod model;
pub mod observability;
pub mod storage;

pub use engine::{Engine, EngineConfig, EngineError};
