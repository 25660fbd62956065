//! Rewrites `tests/golden/<case>/expected.json` from the case's schema and
//! input. Run from the repository root; pass case names to limit the run.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use sensorframe_core::decoder::message_lines;
use sensorframe_core::{Schema, decode};

const GOLDEN_DIR: &str = "tests/golden";

fn main() -> ExitCode {
    let only: Vec<String> = env::args().skip(1).collect();
    match golden_cases(Path::new(GOLDEN_DIR), &only) {
        Ok(cases) => {
            for case in cases {
                if let Err(err) = regenerate(&case) {
                    eprintln!("error: {err}");
                    return ExitCode::from(1);
                }
                println!("regenerated {}", case.display());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

/// Case directories holding both `schema.json` and `input.hex`, sorted.
fn golden_cases(root: &Path, only: &[String]) -> Result<Vec<PathBuf>, String> {
    let mut cases = fs::read_dir(root)
        .map_err(|err| format!("{}: {err}", root.display()))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|dir| dir.join("schema.json").is_file() && dir.join("input.hex").is_file())
        .filter(|dir| {
            only.is_empty()
                || dir
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| only.iter().any(|wanted| wanted == name))
        })
        .collect::<Vec<_>>();
    cases.sort();
    Ok(cases)
}

fn regenerate(case: &Path) -> Result<(), String> {
    let schema = Schema::from_json_str(&read(&case.join("schema.json"))?)
        .map_err(|err| format!("{}: {err}", case.display()))?;
    let input = read(&case.join("input.hex"))?;

    let records = message_lines(&input)
        .map(|line| decode(line, &schema))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("{}: {err}", case.display()))?;
    let json = serde_json::to_string(&records).map_err(|err| err.to_string())?;

    let expected = case.join("expected.json");
    fs::write(&expected, json + "\n").map_err(|err| format!("{}: {err}", expected.display()))
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|err| format!("{}: {err}", path.display()))
}
