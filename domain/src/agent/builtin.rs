//! Built-in agent registry (version 1)
//!
//! Six default agents review every project. Fourteen optional agents join
//! when the project's signals call for them.

use super::definition::AgentDefinition;
use super::rule::ActivationRule;
use crate::quorum::Severity;
use crate::signals::patterns;

/// Version of the built-in registry
pub const BUILTIN_REGISTRY_VERSION: u32 = 1;

/// Frameworks treated as machine-learning stacks
pub const ML_FRAMEWORKS: &[&str] = &["pytorch", "tensorflow", "transformers", "keras", "scikit"];

/// Ids of the default agents
pub const DEFAULT_AGENT_IDS: &[&str] = &[
    "data-agent",
    "logic-agent",
    "test-agent",
    "security-agent",
    "infra-agent",
    "doc-agent",
];

fn pattern(name: &str) -> ActivationRule {
    ActivationRule::Pattern(name.to_string())
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Definitions of the built-in registry, in registration order
pub fn builtin_definitions() -> Vec<AgentDefinition> {
    vec![
        // ==================== Default agents ====================
        AgentDefinition::default_agent(
            "data-agent",
            "Data Agent",
            "Validates inputs, file formats, and API schemas",
            Severity::High,
        ),
        AgentDefinition::default_agent(
            "logic-agent",
            "Logic Agent",
            "Ensures core logic correctness and control flow",
            Severity::High,
        ),
        AgentDefinition::default_agent(
            "test-agent",
            "Test Agent",
            "Enforces test coverage and regression control",
            Severity::High,
        ),
        AgentDefinition::default_agent(
            "security-agent",
            "Security Agent",
            "Scans for secrets, injections, and vulnerable dependencies",
            Severity::Critical,
        ),
        AgentDefinition::default_agent(
            "infra-agent",
            "Infrastructure Agent",
            "Checks build, containers, and CI/CD safety",
            Severity::High,
        ),
        AgentDefinition::default_agent(
            "doc-agent",
            "Documentation Agent",
            "Verifies docs and README sync with code",
            Severity::Medium,
        ),
        // ==================== Optional agents ====================
        AgentDefinition::optional(
            "performance-agent",
            "Performance Agent",
            "Detected API/backend services or performance-critical code",
            ActivationRule::AnyOf(vec![
                pattern(patterns::API),
                pattern(patterns::DATA_PIPELINE),
                ActivationRule::AnyLanguage(names(&["go", "rs", "cpp"])),
                ActivationRule::AnyFramework(names(&[
                    "fastapi", "flask", "express", "fastify", "gin", "actix",
                ])),
            ]),
            Severity::High,
        ),
        AgentDefinition::optional(
            "refactor-agent",
            "Refactor Agent",
            "Detected mature codebase that could benefit from refactoring",
            ActivationRule::FilesOver(50),
            Severity::Medium,
        ),
        AgentDefinition::optional(
            "observability-agent",
            "Observability Agent",
            "Detected observability or distributed systems patterns",
            ActivationRule::AnyOf(vec![
                ActivationRule::AllOf(vec![pattern(patterns::API), pattern(patterns::DOCKER)]),
                ActivationRule::AnyFramework(names(&["prometheus", "datadog", "newrelic", "sentry"])),
            ]),
            Severity::Medium,
        ),
        AgentDefinition::optional(
            "research-agent",
            "Research Agent",
            "Detected fast-moving tech stack (AI/ML)",
            ActivationRule::AnyFramework(names(ML_FRAMEWORKS)),
            Severity::Low,
        ),
        AgentDefinition::optional(
            "devex-agent",
            "DevEx Agent",
            "Detected team-scale repository",
            ActivationRule::MinContributors(3),
            Severity::Low,
        ),
        AgentDefinition::optional(
            "ux-accessibility-agent",
            "UX/Accessibility Agent",
            "Detected frontend/UI project",
            ActivationRule::AnyOf(vec![
                pattern(patterns::FRONTEND),
                ActivationRule::AnyFramework(names(&["react", "vue", "angular", "svelte", "next"])),
                ActivationRule::AnyLanguage(names(&["jsx", "tsx", "vue"])),
            ]),
            Severity::Medium,
        ),
        AgentDefinition::optional(
            "error-handling-agent",
            "Error Handling Agent",
            "Detected production codebase",
            ActivationRule::AnyOf(vec![pattern(patterns::DOCKER), pattern(patterns::CI)]),
            Severity::High,
        ),
        AgentDefinition::optional(
            "dependency-agent",
            "Dependency Agent",
            "Detected package manager with dependencies",
            pattern(patterns::DEPENDENCIES),
            Severity::High,
        ),
        AgentDefinition::optional(
            "build-agent",
            "Build Agent",
            "Detected CI/CD pipelines",
            pattern(patterns::CI),
            Severity::High,
        ),
        AgentDefinition::optional(
            "cost-agent",
            "Cost Optimization Agent",
            "Detected cloud/serverless infrastructure",
            ActivationRule::AnyOf(vec![pattern(patterns::SERVERLESS), pattern(patterns::CLOUD)]),
            Severity::Medium,
        ),
        AgentDefinition::optional(
            "knowledge-agent",
            "Knowledge Agent",
            "Detected documentation system",
            pattern(patterns::DOCS),
            Severity::Low,
        ),
        AgentDefinition::optional(
            "ethics-compliance-agent",
            "Ethics & Compliance Agent",
            "Detected compliance requirements",
            pattern(patterns::COMPLIANCE),
            Severity::Critical,
        ),
        AgentDefinition::optional(
            "benchmark-agent",
            "Benchmark Agent",
            "Detected benchmark or performance testing",
            pattern(patterns::BENCHMARK),
            Severity::Medium,
        ),
        AgentDefinition::optional(
            "security-redteam-agent",
            "Security Red Team Agent",
            "Detected customer-facing or public services",
            pattern(patterns::PUBLIC_API),
            Severity::Critical,
        ),
    ]
}
