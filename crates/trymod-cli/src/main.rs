use std::sync::Arc;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use trymod_core::{
    clear_cache, missing_argument_outcome, try_packages, CommandContext, CommandGroup,
    CommandInfo, ExecutionOutcome, LoadPolicy, SharedReporter, SilentReporter, SystemEffects,
    TryRequest,
};

mod cli;
mod output;
mod style;

use cli::TryCli;
use output::{ConsoleReporter, OutputOptions};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = TryCli::parse();
    init_tracing(cli.trace, cli.verbose);

    let (info, outcome) = dispatch(&cli)?;
    let opts = OutputOptions {
        quiet: cli.quiet,
        json: cli.json,
        no_color: cli.no_color,
    };
    let code = output::emit_output(&opts, info, &outcome)?;

    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

fn dispatch(cli: &TryCli) -> Result<(CommandInfo, ExecutionOutcome)> {
    let try_info = CommandInfo::new(CommandGroup::Try, "try");
    // Checked before the configuration is resolved.
    if !cli.clear && cli.packages.is_empty() {
        return Ok((try_info, missing_argument_outcome()));
    }

    let reporter: SharedReporter = if cli.quiet || cli.json {
        Arc::new(SilentReporter)
    } else {
        Arc::new(ConsoleReporter::new(cli.no_color))
    };
    let ctx = CommandContext::new(Arc::new(SystemEffects::new()), reporter)
        .map_err(|err| eyre!("{err:?}"))?;

    if cli.clear {
        let info = CommandInfo::new(CommandGroup::Clear, "clear");
        let outcome = clear_cache(&ctx).map_err(|err| eyre!("{err:?}"))?;
        return Ok((info, outcome));
    }
    let request = TryRequest {
        packages: cli.packages.clone(),
        policy: if cli.keep_going {
            LoadPolicy::CollectAll
        } else {
            LoadPolicy::AbortOnFirst
        },
    };
    let outcome = try_packages(&ctx, &request).map_err(|err| eyre!("{err:?}"))?;
    Ok((try_info, outcome))
}

fn init_tracing(trace: bool, verbose: u8) {
    let level = if trace {
        "trace"
    } else {
        match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = format!("trymodule={level},trymod_core={level},trymod_cli={level}");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
