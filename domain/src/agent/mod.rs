//! Agent domain module
//!
//! Agent definitions, declarative activation rules, the versioned registry,
//! and the evaluator that turns project signals into the active agent set.

pub mod builtin;
pub mod definition;
pub mod evaluator;
pub mod registry;
pub mod rule;

pub use builtin::{BUILTIN_REGISTRY_VERSION, DEFAULT_AGENT_IDS, ML_FRAMEWORKS};
pub use definition::AgentDefinition;
pub use evaluator::{ActivationReason, ActiveAgent, ActiveAgentSet, evaluate, select_explicit};
pub use registry::AgentRegistry;
pub use rule::ActivationRule;
