//! Regenerates every `fixtures/*.json` schema and diffs it against the
//! `.java` file next to it. `--bless` rewrites the expectations instead.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use colored::Colorize;
use tl_classgen::GenConfig;
use tl_classgen::schema::Schema;

enum Outcome {
    Pass,
    Blessed,
    Missing,
    Mismatch { line: usize, expected: String, actual: String },
}

fn main() -> Result<()> {
    let bless = std::env::args().skip(1).any(|arg| arg == "--bless");
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("../fixtures");

    let mut schemas: Vec<PathBuf> = std::fs::read_dir(&fixtures)
        .with_context(|| format!("failed to read {}", fixtures.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    schemas.sort();

    let backend = tl_classgen::get_backend("java").context("java backend is not registered")?;
    let mut failed = 0;
    for schema_path in &schemas {
        let name = schema_path.file_stem().unwrap_or_default().to_string_lossy();
        match run_fixture(backend, schema_path, bless) {
            Ok(Outcome::Pass) => println!("{} {name}", "pass".green().bold()),
            Ok(Outcome::Blessed) => println!("{} {name}", "blessed".cyan().bold()),
            Ok(Outcome::Missing) => {
                failed += 1;
                println!("{} {name}: no expected output (run with --bless)", "missing".yellow().bold());
            }
            Ok(Outcome::Mismatch { line, expected, actual }) => {
                failed += 1;
                println!("{} {name}: first difference at line {line}", "fail".red().bold());
                println!("  {} {expected}", "expected:".dimmed());
                println!("  {} {actual}", "actual:  ".dimmed());
            }
            Err(error) => {
                failed += 1;
                println!("{} {name}: {error:#}", "error".red().bold());
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} fixtures failed", schemas.len());
    }
    Ok(())
}

fn run_fixture(backend: &dyn tl_classgen::Backend, schema_path: &Path, bless: bool) -> Result<Outcome> {
    let schema = Schema::load(&[schema_path.to_path_buf()])?;
    let actual = tl_classgen::generate(backend, &schema, &GenConfig::default())?;
    let expected_path = schema_path.with_extension(backend.extension());

    if bless {
        std::fs::write(&expected_path, &actual)
            .with_context(|| format!("failed to write {}", expected_path.display()))?;
        return Ok(Outcome::Blessed);
    }
    let Ok(expected) = std::fs::read_to_string(&expected_path) else {
        return Ok(Outcome::Missing);
    };
    if expected == actual {
        return Ok(Outcome::Pass);
    }

    let mut expected_lines = expected.lines();
    let mut actual_lines = actual.lines();
    let mut line = 1;
    loop {
        match (expected_lines.next(), actual_lines.next()) {
            (Some(e), Some(a)) if e == a => line += 1,
            (e, a) => {
                return Ok(Outcome::Mismatch {
                    line,
                    expected: e.unwrap_or("<end of file>").to_string(),
                    actual: a.unwrap_or("<end of file>").to_string(),
                });
            }
        }
    }
}
