use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;

use chipfield::cli::{CliArgs, FieldReport};

fn main() -> Result<()> {
    chipfield::tracing::init();

    let args = CliArgs::parse();
    let config = args
        .field_config()
        .context("Failed to load field configuration")?;
    let mut field = config.build_field().context("Failed to build chip field")?;

    let input = match args.input() {
        Some(text) => text,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            text
        }
    };

    if args.paste {
        field.paste(&input);
    } else {
        field.type_text(&input);
    }
    if args.validate && field.perform_validation() {
        tracing::info!("Validation chipified leftover tokens");
    }

    let report = FieldReport::from_field(&field);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }

    Ok(())
}
