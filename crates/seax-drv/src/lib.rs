//! seax-drv - Analysis Driver
//!
//! Orchestrates one analysis run: load (and preprocess) a source file,
//! parse it, build the call table, pick the entry points, and symbolically
//! execute each entry point with a fresh engine via a synthetic
//! zero-argument call. Results are logged and returned as structured
//! `EntryResult`s.
//!
//! Error policy follows the engine's two error kinds: a `NotImplemented`
//! aborts only the entry point being analysed, an `Invariant` is fatal for
//! the whole run. AST constructs outside the supported subset are warnings
//! emitted by the walker, not engine errors.

pub mod calls;
pub mod interp;
pub mod preprocess;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, info};

use seax_exec::{optionalize, Engine};
use seax_par::ParseError;
use seax_se::{EngineError, ValueOption};

pub use calls::{analyze_calls, entry_points, FunctionDescriptor, FunctionMap};
pub use interp::Interpreter;

/// Fatal driver error.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("cannot read `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The optionalized return value of one analysed entry point.
#[derive(Debug)]
pub struct EntryResult {
    pub function: String,
    pub options: Vec<ValueOption>,
}

/// Loads, preprocesses and analyses a file.
pub fn run_file(path: &Path, deepness: u32) -> Result<Vec<EntryResult>, DriverError> {
    let source = preprocess::load(path)?;
    analyze_source(&source, deepness)
}

/// Analyses preprocessed source text.
pub fn analyze_source(source: &str, deepness: u32) -> Result<Vec<EntryResult>, DriverError> {
    let unit = seax_par::parse(source)?;
    for global in &unit.globals {
        tracing::warn!("unsupported top-level declaration ignored: {global:?}");
    }

    let functions = calls::analyze_calls(unit)?;
    log_call_table(&functions);

    let entries = calls::entry_points(&functions);
    if entries.is_empty() {
        info!("no entry points found");
    }

    let mut results = Vec::new();
    for name in entries {
        info!("function `{}` considered an entry point", functions[&name]);

        let engine = Engine::new(deepness);
        let mut interpreter = Interpreter::new(engine, &functions);
        match interpreter.call_function(&name) {
            Ok(Some(result)) => match collect_options(&result) {
                Ok(options) => results.push(EntryResult {
                    function: name,
                    options,
                }),
                Err(EngineError::NotImplemented(what)) => {
                    error!("analysis of `{name}` aborted: support for `{what}` is not implemented");
                }
                Err(fatal) => return Err(fatal.into()),
            },
            Ok(None) => results.push(EntryResult {
                function: name,
                options: Vec::new(),
            }),
            Err(EngineError::NotImplemented(what)) => {
                error!("analysis of `{name}` aborted: support for `{what}` is not implemented");
            }
            Err(fatal) => return Err(fatal.into()),
        }
    }

    Ok(results)
}

fn collect_options(result: &seax_se::Expr) -> Result<Vec<ValueOption>, EngineError> {
    optionalize(result).collect()
}

fn log_call_table(functions: &FunctionMap) {
    let mut table = String::new();
    for descriptor in functions.values() {
        let callees = if descriptor.callees.is_empty() {
            String::new()
        } else {
            let names: Vec<&str> = descriptor.callees.iter().map(String::as_str).collect();
            format!(", calls: {}", names.join(", "))
        };
        table.push_str(&format!("    function `{descriptor}`{callees}\n"));
    }
    info!("call analysis complete:\n{table}");
}
