//! Mark command - classify an identifier in the registry.

use super::Context;
use clap::{Args, ValueEnum};
use mxs2py_surface_syntax::Classification;

/// Mark command arguments
#[derive(Args)]
pub struct MarkArgs {
    /// Identifier to classify
    pub name: String,

    /// What the identifier is
    #[arg(long = "as", value_enum)]
    pub class: MarkClass,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MarkClass {
    /// Function provided by 3ds Max (rendered with the `rt.` prefix)
    Builtin,
    /// Function defined by your own scripts
    Function,
    /// Variable defined by your own scripts
    Variable,
}

impl From<MarkClass> for Classification {
    fn from(class: MarkClass) -> Self {
        match class {
            MarkClass::Builtin => Classification::BuiltinFunction,
            MarkClass::Function => Classification::UserFunction,
            MarkClass::Variable => Classification::UserVariable,
        }
    }
}

/// Run the mark command
pub fn run(args: MarkArgs, ctx: &Context) -> i32 {
    let store = match ctx.store() {
        Ok(store) => store,
        Err(message) => {
            eprintln!("error: {message}");
            return 1;
        }
    };
    let label = match args.class {
        MarkClass::Builtin => "built-in function",
        MarkClass::Function => "user function",
        MarkClass::Variable => "user variable",
    };
    match store.add(&args.name, args.class.into()) {
        Ok(true) => {
            println!("marked `{}` as {label}", args.name);
            0
        }
        Ok(false) => {
            println!("`{}` is already marked as {label}", args.name);
            0
        }
        Err(e) => {
            eprintln!("error: {e}");
            1
        }
    }
}
