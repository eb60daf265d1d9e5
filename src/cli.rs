//! Minimal CLI: schema JSON → (java source | debug preview)
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};

use crate::backend::{Backend, GenConfig};
use crate::error::SchemaError;
use crate::schema::Schema;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate object-oriented class hierarchies from a parsed TL schema
#[derive(Parser, Debug)]
#[command(name = "tl-classgen", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// generate one compilation unit holding every supported class
    Generate(GenerateOut),
    /// print the debug text a generated object would produce for a JSON value
    Preview(PreviewOut),
    /// list the registered backends
    Backends,
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more schema JSON fragments. May be literal paths or quoted glob
    /// patterns; fragments are merged in the order given
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// code generation backend
    #[arg(long, default_value = "java")]
    backend: String,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// package the generated unit declares
    #[arg(long, default_value = "org.example.tl")]
    package: String,

    /// name of the outer class holding every generated class
    #[arg(long, default_value = "Api")]
    root_class: String,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct PreviewOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// JSON file holding one object with an `@type` key
    #[arg(long)]
    value: PathBuf,

    /// root class the generated unit would use; class names may not clash
    /// with it
    #[arg(long, default_value = "Api")]
    root_class: String,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> Result<(Schema, &'static dyn Backend)> {
        let backend = crate::registry::get_backend(&self.backend).ok_or_else(|| {
            anyhow!(
                "unknown backend `{}` (available: {})",
                self.backend,
                crate::registry::backend_names().join(", ")
            )
        })?;
        let paths = resolve_file_path_patterns(&self.input)?;
        let schema = Schema::load(&paths)?;
        Ok((schema, backend))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Generate(target) => {
                let (schema, backend) = target.input_settings.load()?;
                let config = GenConfig {
                    package_name: target.package.clone(),
                    root_class_name: target.root_class.clone(),
                };
                let source = crate::driver::generate(backend, &schema, &config)
                    .context("code generation aborted")?;

                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)
                            .with_context(|| format!("failed to create {}", parent.display()))?;
                    }
                    std::fs::write(out, &source).with_context(|| format!("failed to write {}", out.display()))?;
                } else {
                    print!("{source}");
                }
            }
            Command::Preview(target) => {
                let (schema, backend) = target.input_settings.load()?;
                let src = std::fs::read_to_string(&target.value)
                    .with_context(|| format!("failed to read {}", target.value.display()))?;
                let json: serde_json::Value = serde_json::from_str(&src)
                    .with_context(|| format!("failed to parse {}", target.value.display()))?;
                let config = GenConfig {
                    root_class_name: target.root_class.clone(),
                    ..GenConfig::default()
                };
                let instance = crate::preview::instance_from_json(&schema, backend, &config, &json)?;
                println!("{}", crate::preview::render(&schema, backend, &config, &instance)?);
            }
            Command::Backends => {
                for line in backend_listing() {
                    println!("{line}");
                }
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// `name<TAB>language<TAB>.extension` per registered backend.
fn backend_listing() -> Vec<String> {
    crate::registry::backend_names()
        .into_iter()
        .filter_map(crate::registry::get_backend)
        .map(|backend| format!("{}\t{}\t.{}", backend.name(), backend.language(), backend.extension()))
        .collect()
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>, SchemaError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let entries = glob::glob(pattern).map_err(|e| SchemaError::Pattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
            // glob yields paths in alphabetical order, which keeps fragment
            // merging deterministic.
            let mut matched_any = false;
            for entry in entries {
                let path = entry.map_err(|e| SchemaError::Pattern {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })?;
                matched_any = true;
                out.push(path);
            }
            if !matched_any {
                return Err(SchemaError::NoMatches(pattern.to_string()));
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_paths_pass_through_in_order() {
        let paths = resolve_file_path_patterns(["b.json", "a.json"]).unwrap();
        assert_eq!(paths, [PathBuf::from("b.json"), PathBuf::from("a.json")]);
    }

    #[test]
    fn empty_glob_is_an_error() {
        let err = resolve_file_path_patterns(["/definitely/not/here/*.json"]).unwrap_err();
        assert!(matches!(err, SchemaError::NoMatches(_)));
    }

    #[test]
    fn backends_are_listed_with_language_and_extension() {
        assert!(backend_listing().contains(&"java\tjava\t.java".to_string()));
    }

    #[test]
    fn generate_arguments_parse() {
        let cli = CommandLineInterface::try_parse_from([
            "tl-classgen",
            "generate",
            "--input",
            "td_api.json",
            "--package",
            "org.drinkless.tdlib",
            "--root-class",
            "TdApi",
        ])
        .unwrap();
        match cli.cmd {
            Command::Generate(target) => {
                assert_eq!(target.input_settings.input, ["td_api.json"]);
                assert_eq!(target.input_settings.backend, "java");
                assert_eq!(target.root_class, "TdApi");
                assert!(target.out.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
