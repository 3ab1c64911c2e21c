pub mod composite;
pub mod condition;
pub mod config;
pub mod evaluator;
pub mod registry;

pub use composite::{CompositeScore, ScoringConfig};
pub use config::EngineFileConfig;
pub use evaluator::Evaluator;
pub use registry::{StrategyDefinition, StrategyRegistry};
