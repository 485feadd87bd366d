//! Structural pattern vocabulary
//!
//! Pattern names recorded in [`ProjectSignals::patterns`](super::ProjectSignals::patterns).

pub const API: &str = "api";
pub const FRONTEND: &str = "frontend";
pub const TESTS: &str = "tests";
pub const CI: &str = "ci";
pub const DATA_PIPELINE: &str = "data-pipeline";
pub const SERVERLESS: &str = "serverless";
pub const DATABASE: &str = "database";
pub const ML: &str = "ml";
pub const DOCKER: &str = "docker";
pub const DOCS: &str = "docs";
pub const COMPLIANCE: &str = "compliance";
pub const BENCHMARK: &str = "benchmark";
pub const CLOUD: &str = "cloud";
/// A package manifest exists
pub const DEPENDENCIES: &str = "dependencies";
/// An OpenAPI/Swagger description or public endpoint tree exists
pub const PUBLIC_API: &str = "public-api";

/// Every pattern the scanner can emit
pub const ALL: &[&str] = &[
    API,
    FRONTEND,
    TESTS,
    CI,
    DATA_PIPELINE,
    SERVERLESS,
    DATABASE,
    ML,
    DOCKER,
    DOCS,
    COMPLIANCE,
    BENCHMARK,
    CLOUD,
    DEPENDENCIES,
    PUBLIC_API,
];

/// Check whether a name belongs to the known vocabulary
pub fn is_known(pattern: &str) -> bool {
    ALL.contains(&pattern)
}
