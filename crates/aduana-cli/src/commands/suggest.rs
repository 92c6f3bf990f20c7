//! Suggest command - remediation text for one field.

use clap::Args;

use super::{blocking, build_validator, load_config};

/// Arguments for the suggest command.
#[derive(Args)]
pub struct SuggestArgs {
    /// Field name (e.g. "PortOfLoading")
    #[arg(required = true)]
    field: String,

    /// Current value of the field
    #[arg(long, default_value = "")]
    value: String,

    /// What is wrong with it
    #[arg(long, default_value = "")]
    context: String,
}

pub async fn run(args: SuggestArgs, config_path: Option<&str>, ai: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let suggestion = blocking(move || {
        let validator = build_validator(&config, ai)?;
        Ok(validator.suggest_correction(&args.field, &args.value, &args.context))
    })
    .await?;

    println!("{}", suggestion);
    Ok(())
}
