//! Structural pattern detection
//!
//! Patterns come from directory names and file names only. File contents are
//! never read here.

use gate_domain::signals::patterns;
use regex::Regex;
use std::path::{Component, Path};
use std::sync::LazyLock;

/// Directory name (lower-cased, exact) to pattern
const DIR_PATTERNS: &[(&str, &str)] = &[
    ("api", patterns::API),
    ("apis", patterns::API),
    ("routes", patterns::API),
    ("endpoints", patterns::API),
    ("handlers", patterns::API),
    ("controllers", patterns::API),
    ("backend", patterns::API),
    ("components", patterns::FRONTEND),
    ("views", patterns::FRONTEND),
    ("pages", patterns::FRONTEND),
    ("ui", patterns::FRONTEND),
    ("pipeline", patterns::DATA_PIPELINE),
    ("pipelines", patterns::DATA_PIPELINE),
    ("etl", patterns::DATA_PIPELINE),
    ("dags", patterns::DATA_PIPELINE),
    ("lambda", patterns::SERVERLESS),
    ("lambdas", patterns::SERVERLESS),
    ("functions", patterns::SERVERLESS),
    ("models", patterns::DATABASE),
    ("db", patterns::DATABASE),
    ("database", patterns::DATABASE),
    ("migrations", patterns::DATABASE),
    ("training", patterns::ML),
    ("inference", patterns::ML),
    ("notebooks", patterns::ML),
    ("docs", patterns::DOCS),
    ("doc", patterns::DOCS),
    ("wiki", patterns::DOCS),
    ("compliance", patterns::COMPLIANCE),
    ("legal", patterns::COMPLIANCE),
    ("privacy", patterns::COMPLIANCE),
    ("benchmark", patterns::BENCHMARK),
    ("benchmarks", patterns::BENCHMARK),
    ("bench", patterns::BENCHMARK),
    ("benches", patterns::BENCHMARK),
    ("perf", patterns::BENCHMARK),
    ("cloud", patterns::CLOUD),
    ("aws", patterns::CLOUD),
    ("gcp", patterns::CLOUD),
    ("azure", patterns::CLOUD),
    ("terraform", patterns::CLOUD),
    ("public-api", patterns::PUBLIC_API),
    ("public_api", patterns::PUBLIC_API),
    (".circleci", patterns::CI),
];

/// File name (lower-cased, exact) to pattern
const FILE_PATTERNS: &[(&str, &str)] = &[
    (".gitlab-ci.yml", patterns::CI),
    (".travis.yml", patterns::CI),
    ("jenkinsfile", patterns::CI),
    ("azure-pipelines.yml", patterns::CI),
    ("docker-compose.yml", patterns::DOCKER),
    ("docker-compose.yaml", patterns::DOCKER),
    ("compose.yml", patterns::DOCKER),
    ("compose.yaml", patterns::DOCKER),
    ("serverless.yml", patterns::SERVERLESS),
    ("serverless.yaml", patterns::SERVERLESS),
    ("mkdocs.yml", patterns::DOCS),
    ("compliance.md", patterns::COMPLIANCE),
    ("privacy.md", patterns::COMPLIANCE),
    ("cdk.json", patterns::CLOUD),
];

/// File extension (lower-cased) to pattern
const EXTENSION_PATTERNS: &[(&str, &str)] = &[
    ("sql", patterns::DATABASE),
    ("ipynb", patterns::ML),
    ("tf", patterns::CLOUD),
];

/// Test-file naming conventions across common ecosystems
static TEST_FILE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^test_.+\.py$
        | _test\.(py|go|rs|rb|exs)$
        | \.(test|spec)\.(js|jsx|ts|tsx|mjs|cjs)$
        | _spec\.rb$
        | (Test|Tests|IT)\.(java|kt|cs)$
        ",
    )
    .ok()
});

/// Patterns implied by a directory, given its path relative to the root
pub fn for_directory(relative: &Path) -> Vec<&'static str> {
    let Some(name) = file_name_lower(relative) else {
        return Vec::new();
    };

    let mut found: Vec<&'static str> = DIR_PATTERNS
        .iter()
        .filter(|(dir, _)| *dir == name)
        .map(|(_, pattern)| *pattern)
        .collect();

    if name.contains("test") {
        found.push(patterns::TESTS);
    }
    if name == "workflows" && parent_name_lower(relative).as_deref() == Some(".github") {
        found.push(patterns::CI);
    }

    found
}

/// Patterns implied by a file, given its path relative to the root
pub fn for_file(relative: &Path) -> Vec<&'static str> {
    let Some(original) = relative.file_name().and_then(|n| n.to_str()) else {
        return Vec::new();
    };
    let name = original.to_lowercase();

    let mut found: Vec<&'static str> = FILE_PATTERNS
        .iter()
        .filter(|(file, _)| *file == name)
        .map(|(_, pattern)| *pattern)
        .collect();

    if let Some(ext) = relative.extension().and_then(|e| e.to_str()) {
        let ext = ext.to_lowercase();
        found.extend(
            EXTENSION_PATTERNS
                .iter()
                .filter(|(e, _)| *e == ext)
                .map(|(_, pattern)| *pattern),
        );
    }

    if name.starts_with("dockerfile") {
        found.push(patterns::DOCKER);
    }
    if name.starts_with("openapi.") || name.starts_with("swagger.") {
        found.push(patterns::PUBLIC_API);
    }
    if is_test_file(original) {
        found.push(patterns::TESTS);
    }

    found
}

/// Whether a file name marks a test: it contains `test` anywhere, or follows
/// a naming convention such as `*.spec.ts` or `*_spec.rb`
pub fn is_test_file(name: &str) -> bool {
    name.to_lowercase().contains("test")
        || TEST_FILE.as_ref().is_some_and(|regex| regex.is_match(name))
}

fn file_name_lower(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_lowercase)
}

fn parent_name_lower(path: &Path) -> Option<String> {
    let mut components = path.components().rev();
    components.next();
    match components.next() {
        Some(Component::Normal(name)) => name.to_str().map(str::to_lowercase),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_patterns() {
        assert_eq!(for_directory(Path::new("src/api")), vec![patterns::API]);
        assert_eq!(for_directory(Path::new("web/Components")), vec![patterns::FRONTEND]);
        assert!(for_directory(Path::new("src/core")).is_empty());
    }

    #[test]
    fn test_any_directory_containing_test() {
        assert_eq!(for_directory(Path::new("tests")), vec![patterns::TESTS]);
        assert_eq!(for_directory(Path::new("src/__tests__")), vec![patterns::TESTS]);
        assert_eq!(for_directory(Path::new("integration_testing")), vec![patterns::TESTS]);
    }

    #[test]
    fn test_github_workflows_is_ci() {
        assert_eq!(for_directory(Path::new(".github/workflows")), vec![patterns::CI]);
        assert!(for_directory(Path::new("docs/workflows")).is_empty());
    }

    #[test]
    fn test_file_patterns() {
        assert_eq!(for_file(Path::new("Dockerfile")), vec![patterns::DOCKER]);
        assert_eq!(for_file(Path::new("deploy/Dockerfile.prod")), vec![patterns::DOCKER]);
        assert_eq!(for_file(Path::new(".gitlab-ci.yml")), vec![patterns::CI]);
        assert_eq!(for_file(Path::new("spec/openapi.yaml")), vec![patterns::PUBLIC_API]);
        assert_eq!(for_file(Path::new("infra/main.tf")), vec![patterns::CLOUD]);
        assert!(for_file(Path::new("src/main.rs")).is_empty());
    }

    #[test]
    fn test_naming_conventions() {
        for name in [
            "test_models.py",
            "handler_test.go",
            "Button.test.tsx",
            "api.spec.ts",
            "user_spec.rb",
            "UserServiceTest.java",
        ] {
            assert!(is_test_file(name), "{name} should be a test file");
        }
        for name in ["main.py", "handlers.go", "Button.tsx", "spec.md"] {
            assert!(!is_test_file(name), "{name} should not be a test file");
        }
    }

    #[test]
    fn test_any_file_name_containing_test() {
        for name in ["latest.ts", "contest.go", "Testimony.java", "conftest.py"] {
            assert_eq!(for_file(Path::new(name)), vec![patterns::TESTS], "{name}");
        }
    }
}
