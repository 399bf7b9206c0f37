use clap::Parser;
use form_autofill::cli::commands::{cmd_detect, cmd_fill, cmd_profiles, cmd_serve, init_logging};
use form_autofill::cli::config::{Cli, Commands, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Detect {
            source,
            threshold,
            format,
        } => {
            let config = config.with_overrides(threshold, None);
            cmd_detect(&source, &config, &format)?;
        }
        Commands::Fill {
            source,
            profile,
            store,
            application,
            form,
            delay_ms,
            threshold,
            format,
            output,
        } => {
            let config = config.with_overrides(threshold, delay_ms);
            let success = cmd_fill(
                &source,
                profile.as_deref(),
                store.as_deref(),
                application.as_deref(),
                form,
                &config,
                &format,
                output.as_deref(),
            )?;
            if !success {
                std::process::exit(1);
            }
        }
        Commands::Serve {
            source,
            delay_ms,
            threshold,
        } => {
            let config = config.with_overrides(threshold, delay_ms);
            cmd_serve(&source, &config)?;
        }
        Commands::Profiles { store } => {
            cmd_profiles(&store)?;
        }
    }

    Ok(())
}
