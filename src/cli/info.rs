//! Info command - print the resolved settings

use clap::Args;

use crate::settings::Settings;

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let settings = Settings::load();
    let json = if args.pretty {
        serde_json::to_string_pretty(&settings)?
    } else {
        serde_json::to_string(&settings)?
    };
    println!("{json}");
    Ok(())
}
