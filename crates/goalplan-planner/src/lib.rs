pub mod backend;
pub mod config;
pub mod extract;
pub mod fallback;
pub mod planner;
pub mod timeline;

pub use backend::{LlmError, TextGenerator};
pub use config::{GenerationConfig, PlannerConfig};
pub use planner::{FallbackReason, Plan, PlanSource, Planner, Provider};
