//! Requirements command - print the mandatory invoice content.

use clap::Args;
use console::style;

use aduana_core::requirements;

/// Arguments for the requirements command.
#[derive(Args)]
pub struct RequirementsArgs {
    /// Print JSON instead of a readable list
    #[arg(long)]
    json: bool,
}

pub async fn run(args: RequirementsArgs) -> anyhow::Result<()> {
    let catalogue = requirements();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&catalogue)?);
        return Ok(());
    }

    println!("{}", style(catalogue.normative).bold());
    println!("Booklet: {}", catalogue.booklet);
    for group in catalogue.mandatory_fields {
        println!();
        println!("{}:", style(group.name).cyan());
        for field in group.fields {
            println!("  - {}", field);
        }
    }

    Ok(())
}
