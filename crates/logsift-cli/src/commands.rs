use crate::args::{Cli, Commands, ConfigCommand};
use crate::handlers;
use anyhow::Result;

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            inputs,
            out_dir,
            max_groups,
            timeout,
            provider,
            model,
            offline,
            json,
        } => handlers::analyze::handle(
            cli.config,
            inputs,
            handlers::analyze::Overrides {
                out_dir,
                max_groups,
                timeout,
                provider,
                model,
            },
            offline,
            json,
        ),

        Commands::Config { command } => match command {
            ConfigCommand::Init { force } => handlers::config::init(cli.config, force),
            ConfigCommand::Show => handlers::config::show(cli.config),
        },
    }
}
