//! Registry command - show what the converter knows.

use super::Context;
use clap::Args;
use mxs2py_surface_syntax::Classification;

/// Registry command arguments
#[derive(Args)]
pub struct RegistryArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

const SECTIONS: &[(&str, Classification)] = &[
    ("builtins", Classification::BuiltinFunction),
    ("functions", Classification::UserFunction),
    ("variables", Classification::UserVariable),
];

/// Run the registry command
pub fn run(args: RegistryArgs, ctx: &Context) -> i32 {
    let store = match ctx.store() {
        Ok(store) => store,
        Err(message) => {
            eprintln!("error: {message}");
            return 1;
        }
    };
    let registry = match store.load() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("error: {e}");
            return 1;
        }
    };

    if args.json {
        let mut output = serde_json::Map::new();
        output.insert(
            "dir".to_string(),
            serde_json::json!(store.dir().display().to_string()),
        );
        for (key, class) in SECTIONS {
            output.insert(key.to_string(), serde_json::json!(registry.names(*class)));
        }
        let renames: serde_json::Map<String, serde_json::Value> = registry
            .renames()
            .into_iter()
            .map(|(k, v)| (k.to_string(), serde_json::json!(v)))
            .collect();
        output.insert("renames".to_string(), serde_json::Value::Object(renames));
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::Value::Object(output)).unwrap_or_default()
        );
        return 0;
    }

    println!("registry: {}", store.dir().display());
    for (key, class) in SECTIONS {
        let names = registry.names(*class);
        println!("\n{key} ({})", names.len());
        for name in names {
            println!("  {name}");
        }
    }
    let renames = registry.renames();
    println!("\nrenames ({})", renames.len());
    for (name, target) in renames {
        println!("  {name} -> {target}");
    }
    0
}
