//! Convert command - MAXScript files (or stdin) to Python.

use super::Context;
use crate::preprocess::{IncludeError, preprocess};
use clap::Args;
use mxs2py_surface_syntax::{
    ConversionError, IdentifierRegistry, RenderOptions, convert_with, read_maxscript,
};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Convert command arguments
#[derive(Args)]
pub struct ConvertArgs {
    /// MAXScript files to convert (stdin if none given)
    pub files: Vec<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Prepend an "Automatically converted" comment to each file
    #[arg(long)]
    pub header: bool,

    /// Print the parsed node tree as JSON instead of Python
    #[arg(long)]
    pub tree: bool,

    /// Leave `include` directives untouched
    #[arg(long)]
    pub no_includes: bool,
}

#[derive(Debug, thiserror::Error)]
enum InputError {
    #[error(transparent)]
    Include(#[from] IncludeError),

    #[error("{kind}: {0}", kind = .0.kind())]
    Conversion(#[from] ConversionError),

    #[error("failed to serialize tree: {0}")]
    Json(#[from] serde_json::Error),
}

struct Input {
    name: String,
    base_dir: Option<PathBuf>,
    source: String,
}

/// Run the convert command
pub fn run(args: ConvertArgs, ctx: &Context) -> i32 {
    let registry = match ctx.load_registry() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("error: {e}");
            return 1;
        }
    };
    let options = ctx.config.render_options();
    let header = args.header || ctx.config.header();
    let expand_includes = !args.no_includes && ctx.config.expand_includes();

    let inputs = match read_inputs(&args.files) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("error: {e}");
            return 1;
        }
    };

    let mut outputs = Vec::with_capacity(inputs.len());
    let mut failed = false;
    for input in &inputs {
        match convert_input(input, &registry, &options, expand_includes, args.tree) {
            Ok(text) if header && !args.tree => {
                outputs.push(format!("# Automatically converted {}\n{text}", input.name));
            }
            Ok(text) => outputs.push(text),
            Err(e) => {
                eprintln!("error: {}: {e}", input.name);
                failed = true;
            }
        }
    }

    let text = outputs.join("\n\n");
    match &args.output {
        Some(path) if !outputs.is_empty() => {
            if let Err(e) = std::fs::write(path, format!("{text}\n")) {
                eprintln!("error: failed to write {}: {e}", path.display());
                return 1;
            }
        }
        Some(_) => {}
        None if !outputs.is_empty() => println!("{text}"),
        None => {}
    }

    if failed { 1 } else { 0 }
}

fn read_inputs(files: &[PathBuf]) -> Result<Vec<Input>, String> {
    if files.is_empty() {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .map_err(|e| format!("failed to read stdin: {e}"))?;
        return Ok(vec![Input {
            name: "<stdin>".to_string(),
            base_dir: None,
            source,
        }]);
    }

    files
        .iter()
        .map(|path| {
            let source = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            Ok(Input {
                name: display_name(path),
                base_dir: path.parent().map(Path::to_path_buf),
                source,
            })
        })
        .collect()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn convert_input(
    input: &Input,
    registry: &IdentifierRegistry,
    options: &RenderOptions,
    expand_includes: bool,
    tree: bool,
) -> Result<String, InputError> {
    let base_dir = input.base_dir.as_deref().filter(|_| expand_includes);
    let source = preprocess(&input.source, base_dir)?;
    tracing::info!(input = %input.name, bytes = source.len(), "converting");
    if tree {
        let tree = read_maxscript(&source, registry)?;
        return Ok(serde_json::to_string_pretty(&tree)?);
    }
    Ok(convert_with(&source, registry, options)?)
}
