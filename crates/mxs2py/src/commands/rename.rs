//! Rename command - record a variable rename.

use super::Context;
use crate::segment::suggest_snake_case;
use crate::store::DICTIONARY_FILE;
use clap::Args;

/// Rename command arguments
#[derive(Args)]
pub struct RenameArgs {
    /// Variable name as written in MAXScript (matched case-insensitively)
    pub name: String,

    /// Python name (a snake_case suggestion if omitted)
    pub target: Option<String>,
}

/// Run the rename command
pub fn run(args: RenameArgs, ctx: &Context) -> i32 {
    let store = match ctx.store() {
        Ok(store) => store,
        Err(message) => {
            eprintln!("error: {message}");
            return 1;
        }
    };

    let target = match args.target {
        Some(target) => target,
        None => match store.read_words(DICTIONARY_FILE) {
            Ok(dictionary) => suggest_snake_case(&args.name, &dictionary),
            Err(e) => {
                eprintln!("error: {e}");
                return 1;
            }
        },
    };

    if let Err(e) = store.add_rename(&args.name, &target) {
        eprintln!("error: {e}");
        return 1;
    }
    println!("{} -> {target}", args.name.to_lowercase());
    0
}
