//! Framework detection from package manifests
//!
//! Manifests are the only files whose contents the scanner reads. A manifest
//! that fails to parse contributes nothing.

use serde_json::Value as JsonValue;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Manifest kinds recognized by file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    PackageJson,
    ComposerJson,
    CargoToml,
    PyProject,
    Requirements,
    Gemfile,
    GoMod,
}

impl ManifestKind {
    pub fn from_file_name(name: &str) -> Option<Self> {
        match name {
            "package.json" => Some(Self::PackageJson),
            "composer.json" => Some(Self::ComposerJson),
            "Cargo.toml" => Some(Self::CargoToml),
            "pyproject.toml" => Some(Self::PyProject),
            "requirements.txt" => Some(Self::Requirements),
            "Gemfile" => Some(Self::Gemfile),
            "go.mod" => Some(Self::GoMod),
            _ => None,
        }
    }
}

/// npm package name to framework
const NPM_FRAMEWORKS: &[(&str, &str)] = &[
    ("react", "react"),
    ("vue", "vue"),
    ("@angular/core", "angular"),
    ("svelte", "svelte"),
    ("next", "next"),
    ("express", "express"),
    ("@nestjs/core", "nest"),
    ("fastify", "fastify"),
    ("koa", "koa"),
    ("@sentry/node", "sentry"),
    ("@sentry/browser", "sentry"),
    ("prom-client", "prometheus"),
    ("dd-trace", "datadog"),
    ("newrelic", "newrelic"),
    ("@tensorflow/tfjs", "tensorflow"),
];

/// composer package name to framework
const COMPOSER_FRAMEWORKS: &[(&str, &str)] = &[
    ("laravel/framework", "laravel"),
    ("symfony/symfony", "symfony"),
    ("symfony/framework-bundle", "symfony"),
];

/// crates.io crate name to framework
const CRATE_FRAMEWORKS: &[(&str, &str)] = &[
    ("actix-web", "actix"),
    ("rocket", "rocket"),
    ("warp", "warp"),
    ("axum", "axum"),
    ("tokio", "tokio"),
    ("sentry", "sentry"),
    ("prometheus", "prometheus"),
];

/// Substring of a python requirement to framework
const PYTHON_FRAMEWORKS: &[(&str, &str)] = &[
    ("django", "django"),
    ("flask", "flask"),
    ("fastapi", "fastapi"),
    ("torch", "pytorch"),
    ("tensorflow", "tensorflow"),
    ("pandas", "pandas"),
    ("numpy", "numpy"),
    ("scikit", "scikit"),
    ("keras", "keras"),
    ("transformers", "transformers"),
    ("sentry-sdk", "sentry"),
    ("prometheus-client", "prometheus"),
    ("prometheus_client", "prometheus"),
    ("ddtrace", "datadog"),
    ("newrelic", "newrelic"),
];

/// Substring of a Gemfile to framework
const RUBY_FRAMEWORKS: &[(&str, &str)] = &[
    ("'rails'", "rails"),
    ("\"rails\"", "rails"),
    ("sinatra", "sinatra"),
    ("sentry-ruby", "sentry"),
];

/// Substring of a go.mod to framework
const GO_FRAMEWORKS: &[(&str, &str)] = &[
    ("github.com/gin-gonic/gin", "gin"),
    ("github.com/labstack/echo", "echo"),
    ("github.com/gofiber/fiber", "fiber"),
    ("github.com/gorilla/mux", "gorilla"),
    ("github.com/prometheus/client_golang", "prometheus"),
];

/// Frameworks declared by a manifest file
///
/// Unreadable or malformed manifests yield an empty set.
pub fn detect(path: &Path, kind: ManifestKind) -> BTreeSet<String> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!("Skipping unreadable manifest {}: {}", path.display(), e);
            return BTreeSet::new();
        }
    };

    let parsed = match kind {
        ManifestKind::PackageJson => {
            json_dependencies(&content, &["dependencies", "devDependencies"])
                .map(|names| lookup(&names, NPM_FRAMEWORKS))
        }
        ManifestKind::ComposerJson => json_dependencies(&content, &["require", "require-dev"])
            .map(|names| lookup(&names, COMPOSER_FRAMEWORKS)),
        ManifestKind::CargoToml => {
            cargo_dependencies(&content).map(|names| lookup(&names, CRATE_FRAMEWORKS))
        }
        ManifestKind::PyProject => pyproject_dependencies(&content)
            .map(|names| contains_any(&names.join("\n"), PYTHON_FRAMEWORKS)),
        ManifestKind::Requirements => Ok(contains_any(&content, PYTHON_FRAMEWORKS)),
        ManifestKind::Gemfile => Ok(contains_any(&content, RUBY_FRAMEWORKS)),
        ManifestKind::GoMod => Ok(contains_any(&content, GO_FRAMEWORKS)),
    };

    parsed.unwrap_or_else(|e| {
        debug!("Ignoring malformed manifest {}: {}", path.display(), e);
        BTreeSet::new()
    })
}

fn json_dependencies(content: &str, sections: &[&str]) -> Result<Vec<String>, String> {
    let value: JsonValue = serde_json::from_str(content).map_err(|e| e.to_string())?;
    Ok(sections
        .iter()
        .filter_map(|section| value.get(section).and_then(JsonValue::as_object))
        .flat_map(|deps| deps.keys().cloned())
        .collect())
}

fn cargo_dependencies(content: &str) -> Result<Vec<String>, String> {
    let value: toml::Table = toml::from_str(content).map_err(|e| e.to_string())?;
    let mut names = Vec::new();
    for section in ["dependencies", "dev-dependencies"] {
        if let Some(table) = value.get(section).and_then(toml::Value::as_table) {
            names.extend(table.keys().cloned());
        }
    }
    if let Some(table) = value
        .get("workspace")
        .and_then(|w| w.get("dependencies"))
        .and_then(toml::Value::as_table)
    {
        names.extend(table.keys().cloned());
    }
    Ok(names)
}

fn pyproject_dependencies(content: &str) -> Result<Vec<String>, String> {
    let value: toml::Table = toml::from_str(content).map_err(|e| e.to_string())?;
    let mut names = Vec::new();

    if let Some(deps) = value
        .get("project")
        .and_then(|p| p.get("dependencies"))
        .and_then(toml::Value::as_array)
    {
        names.extend(deps.iter().filter_map(toml::Value::as_str).map(str::to_string));
    }
    if let Some(deps) = value
        .get("tool")
        .and_then(|t| t.get("poetry"))
        .and_then(|p| p.get("dependencies"))
        .and_then(toml::Value::as_table)
    {
        names.extend(deps.keys().cloned());
    }
    Ok(names)
}

fn lookup(names: &[String], table: &[(&str, &str)]) -> BTreeSet<String> {
    table
        .iter()
        .filter(|(package, _)| names.iter().any(|n| n == package))
        .map(|(_, framework)| framework.to_string())
        .collect()
}

fn contains_any(content: &str, table: &[(&str, &str)]) -> BTreeSet<String> {
    let content = content.to_lowercase();
    table
        .iter()
        .filter(|(needle, _)| content.contains(needle))
        .map(|(_, framework)| framework.to_string())
        .collect()
}
