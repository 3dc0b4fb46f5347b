use clap::Parser;
use color_eyre::Result;
use pyscope_core::{CommandContext, GlobalOptions, SystemEffects};

mod cli;
mod dispatch;
mod output;
mod style;

use cli::PyscopeCli;
use output::OutputOptions;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = PyscopeCli::parse();
    init_tracing(cli.trace, cli.verbose);

    let global = GlobalOptions {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
    };
    let overrides = cli.resolution.overrides();

    let info = dispatch::command_info(&cli.command);
    let outcome = match CommandContext::new(&global, &overrides, SystemEffects::shared()) {
        Ok(ctx) => dispatch::dispatch_command(&ctx, &cli.command),
        Err(err) => dispatch::error_outcome(&err),
    };
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

fn init_tracing(trace: bool, verbose: u8) {
    let level = if trace {
        "trace"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = format!("pyscope={level},pyscope_core={level},pyscope_cli={level}");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
