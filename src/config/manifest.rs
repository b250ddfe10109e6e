use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::diagnostic::Diagnostic;
use crate::span::Span;
use crate::translate::TranslationContext;

/// File name searched for by [`Manifest::find`].
pub const MANIFEST_FILE: &str = "ir2graph.toml";

/// How the `translate` command prints a graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Dot,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "dot" => Ok(OutputFormat::Dot),
            other => Err(format!(
                "unknown output format '{}' (expected text, json or dot)",
                other
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Dot => "dot",
        };
        write!(f, "{}", name)
    }
}

/// Translation settings from ir2graph.toml. Every field is optional; the
/// command line fills in or overrides what is missing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Manifest {
    /// Function to translate, `[function] name`.
    pub function: Option<String>,
    pub dynamic: Option<usize>,
    pub variables: Option<usize>,
    pub dependent: Option<usize>,
    pub format: Option<OutputFormat>,
}

/// Values given on the command line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overrides {
    pub function: Option<String>,
    pub dynamic: Option<usize>,
    pub variables: Option<usize>,
    pub dependent: Option<usize>,
    pub format: Option<OutputFormat>,
}

/// Manifest and overrides merged.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub function: Option<String>,
    pub n_dynamic_ind: usize,
    pub n_variable_ind: usize,
    pub n_dependent: usize,
    pub format: OutputFormat,
}

impl Settings {
    pub fn context(&self, function_name: &str) -> TranslationContext {
        TranslationContext::new(function_name, self.n_variable_ind, self.n_dependent)
            .with_dynamic(self.n_dynamic_ind)
    }
}

fn config_error(message: String) -> Diagnostic {
    Diagnostic::error(message, Span::dummy())
}

fn parse_count(section: &str, key: &str, value: &str) -> Result<usize, Diagnostic> {
    value.parse::<usize>().map_err(|_| {
        config_error(format!(
            "'{}.{}' must be a non-negative integer, found '{}'",
            section, key, value
        ))
    })
}

impl Manifest {
    /// Load a manifest file.
    pub fn load(toml_path: &Path) -> Result<Manifest, Diagnostic> {
        let content = std::fs::read_to_string(toml_path).map_err(|e| {
            config_error(format!("cannot read '{}': {}", toml_path.display(), e))
        })?;
        Self::parse(&content).map_err(|diag| {
            let note = format!("in {}", toml_path.display());
            diag.with_note(note)
        })
    }

    /// Section-aware minimal TOML parsing of `[function]` and `[output]`.
    pub fn parse(content: &str) -> Result<Manifest, Diagnostic> {
        let mut manifest = Manifest::default();
        let mut current_section = String::new();

        for line in content.lines() {
            // Trailing comments
            let line = match line.find('#') {
                Some(pos) if !line[..pos].contains('"') => &line[..pos],
                _ => line,
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                current_section = trimmed[1..trimmed.len() - 1].trim().to_string();
                continue;
            }
            let Some((key, value)) = trimmed.split_once('=') else {
                continue;
            };
            let key = key.trim().trim_matches('"');
            let value = value.trim().trim_matches('"');

            match (current_section.as_str(), key) {
                ("function", "name") => manifest.function = Some(value.to_string()),
                ("function", "dynamic") => {
                    manifest.dynamic = Some(parse_count("function", key, value)?)
                }
                ("function", "variables") => {
                    manifest.variables = Some(parse_count("function", key, value)?)
                }
                ("function", "dependent") => {
                    manifest.dependent = Some(parse_count("function", key, value)?)
                }
                ("output", "format") => {
                    manifest.format = Some(value.parse().map_err(config_error)?)
                }
                _ => {}
            }
        }
        Ok(manifest)
    }

    /// Try to find an ir2graph.toml in the given directory or its ancestors.
    pub fn find(start_dir: &Path) -> Option<PathBuf> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.exists() {
                return Some(candidate);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Apply command-line overrides. The variable and dependent counts
    /// must come from one side or the other.
    pub fn merge(&self, overrides: &Overrides) -> Result<Settings, Diagnostic> {
        let n_variable_ind = overrides.variables.or(self.variables).ok_or_else(|| {
            config_error("number of independent variables is not set".to_string()).with_help(
                format!("pass --variables or set 'variables' in {}", MANIFEST_FILE),
            )
        })?;
        let n_dependent = overrides.dependent.or(self.dependent).ok_or_else(|| {
            config_error("number of dependent variables is not set".to_string()).with_help(
                format!("pass --dependent or set 'dependent' in {}", MANIFEST_FILE),
            )
        })?;
        Ok(Settings {
            function: overrides.function.clone().or_else(|| self.function.clone()),
            n_dynamic_ind: overrides.dynamic.or(self.dynamic).unwrap_or(0),
            n_variable_ind,
            n_dependent,
            format: overrides.format.or(self.format).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SAMPLE: &str = r#"# translation of the Rosenbrock example
[function]
name = "rosen"
dynamic = 1   # one parameter
variables = 2
dependent = 1

[output]
format = "json"
"#;

    #[test]
    fn test_load_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join(MANIFEST_FILE);
        fs::write(&toml_path, SAMPLE).unwrap();

        let manifest = Manifest::load(&toml_path).unwrap();
        assert_eq!(manifest.function.as_deref(), Some("rosen"));
        assert_eq!(manifest.dynamic, Some(1));
        assert_eq!(manifest.variables, Some(2));
        assert_eq!(manifest.dependent, Some(1));
        assert_eq!(manifest.format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_find_walks_ancestors() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), SAMPLE).unwrap();
        let nested = dir.path().join("ir").join("generated");
        fs::create_dir_all(&nested).unwrap();

        let found = Manifest::find(&nested).unwrap();
        assert_eq!(found, dir.path().join(MANIFEST_FILE));
    }

    #[test]
    fn test_bad_values_are_reported() {
        let err = Manifest::parse("[function]\nvariables = two\n").unwrap_err();
        assert!(err.message.contains("function.variables"));
        let err = Manifest::parse("[output]\nformat = \"svg\"\n").unwrap_err();
        assert!(err.message.contains("svg"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Manifest::load(&dir.path().join(MANIFEST_FILE)).unwrap_err();
        assert!(err.message.starts_with("cannot read"));
    }

    #[test]
    fn test_overrides_win() {
        let manifest = Manifest::parse(SAMPLE).unwrap();
        let overrides = Overrides {
            variables: Some(3),
            format: Some(OutputFormat::Dot),
            ..Overrides::default()
        };
        let settings = manifest.merge(&overrides).unwrap();
        assert_eq!(settings.function.as_deref(), Some("rosen"));
        assert_eq!(settings.n_dynamic_ind, 1);
        assert_eq!(settings.n_variable_ind, 3);
        assert_eq!(settings.n_dependent, 1);
        assert_eq!(settings.format, OutputFormat::Dot);

        let ctx = settings.context("rosen");
        assert_eq!(ctx.n_independent(), 4);
    }

    #[test]
    fn test_counts_are_required() {
        let err = Manifest::default().merge(&Overrides::default()).unwrap_err();
        assert!(err.message.contains("independent"));
        assert!(err.help.unwrap().contains("--variables"));

        let overrides = Overrides {
            variables: Some(2),
            dependent: Some(1),
            ..Overrides::default()
        };
        let settings = Manifest::default().merge(&overrides).unwrap();
        assert_eq!(settings.n_dynamic_ind, 0);
        assert_eq!(settings.format, OutputFormat::Text);
        assert!(settings.function.is_none());
    }
}
