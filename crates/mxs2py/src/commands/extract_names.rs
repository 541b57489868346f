//! Extract-names command - seed the built-in list from a pymxs stub.

use super::Context;
use crate::stubs::{extract_function_names, merge_names};
use crate::store::BUILTIN_FILE;
use clap::Args;
use std::path::PathBuf;

/// Extract-names command arguments
#[derive(Args)]
pub struct ExtractNamesArgs {
    /// Python stub file (e.g. pymxs/runtime/__init__.pyi)
    pub stub: PathBuf,

    /// Report what would change without writing
    #[arg(long)]
    pub dry_run: bool,
}

/// Run the extract-names command
pub fn run(args: ExtractNamesArgs, ctx: &Context) -> i32 {
    let store = match ctx.store() {
        Ok(store) => store,
        Err(message) => {
            eprintln!("error: {message}");
            return 1;
        }
    };
    let stub = match std::fs::read_to_string(&args.stub) {
        Ok(stub) => stub,
        Err(e) => {
            eprintln!("error: failed to read {}: {e}", args.stub.display());
            return 1;
        }
    };
    let existing = match store.read_words(BUILTIN_FILE) {
        Ok(existing) => existing,
        Err(e) => {
            eprintln!("error: {e}");
            return 1;
        }
    };

    let extracted = extract_function_names(&stub);
    let before = existing.len();
    let merged = merge_names(existing, &extracted);
    tracing::debug!(extracted = extracted.len(), before, after = merged.len(), "merged names");

    if !args.dry_run {
        if let Err(e) = store.write_builtins(&merged) {
            eprintln!("error: {e}");
            return 1;
        }
    }
    println!(
        "{} names extracted, {} built-ins ({:+})",
        extracted.len(),
        merged.len(),
        merged.len() as i64 - before as i64
    );
    0
}
