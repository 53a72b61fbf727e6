use anyhow::{Context, Result};
use clap::Parser;
use multitape::{
    Halt, Machine, Outcome, Program, ProgramLoader, ProgramManager, TracePrinter,
    DEFAULT_MAX_STEPS,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// The machine definition file (.mtm) to execute
    #[clap(short, long, conflicts_with = "builtin")]
    program: Option<PathBuf>,

    /// Name of a bundled machine to execute
    #[clap(short, long)]
    builtin: Option<String>,

    /// The input written on the first tape
    #[clap(short, long, default_value = "")]
    input: String,

    /// Maximum number of steps before the run is stopped
    #[clap(short, long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Print the outcome as JSON
    #[clap(short, long, conflicts_with = "debug")]
    json: bool,

    /// List the bundled machines and exit
    #[clap(short, long)]
    list: bool,
}

/// Reads `RUST_LOG`, defaulting to `warn`. Logs go to stderr so they never mix with traces.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).compact())
        .init();
}

fn load(cli: &Cli) -> Result<Program> {
    match (&cli.program, &cli.builtin) {
        (Some(path), _) => ProgramLoader::load_program(path)
            .with_context(|| format!("failed to load {}", path.display())),
        (None, Some(name)) => ProgramManager::get_program_by_name(name)
            .with_context(|| format!("no bundled machine named {name:?}")),
        (None, None) => anyhow::bail!("either --program or --builtin is required"),
    }
}

fn list() -> Result<()> {
    for index in 0..ProgramManager::get_program_count() {
        let info = ProgramManager::get_program_info(index)?;
        println!(
            "{}: {} ({} tapes, {} states, {} transitions)",
            info.index, info.name, info.tapes, info.state_count, info.transition_count
        );
    }
    Ok(())
}

fn verdict(halt: &Halt) -> String {
    match halt {
        Halt::Accepted => "accepted".to_string(),
        Halt::Rejected(rejection) => format!(
            "rejected: no transition from {} on {:?}",
            rejection.state, rejection.symbols
        ),
        Halt::StepLimit => "step limit reached".to_string(),
    }
}

fn print_outcome(outcome: &Outcome) {
    println!(
        "Machine {} after {} steps in state {}.",
        verdict(&outcome.halt),
        outcome.steps,
        outcome.state
    );
    println!("\nFinal tapes:");
    for (i, tape) in outcome.tapes.iter().enumerate() {
        println!("Tape {}: {}", i + 1, tape.trimmed());
    }
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    if cli.list {
        list()?;
        return Ok(ExitCode::SUCCESS);
    }

    let program = load(&cli)?;
    let machine = Machine::from_program(&program)
        .with_context(|| format!("invalid machine {:?}", program.name))?;
    info!(machine = machine.name(), input = %cli.input, "running");

    let outcome = if cli.debug {
        let mut printer = TracePrinter::new(io::stdout().lock());
        let outcome = machine.run_observed(&cli.input, cli.max_steps, &mut printer)?;
        printer.finish().context("failed to write trace")?;
        println!();
        outcome
    } else {
        machine.run(&cli.input, cli.max_steps)?
    };
    debug!(steps = outcome.steps, "finished");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome.report())?);
    } else {
        print_outcome(&outcome);
    }

    Ok(if outcome.is_accepted() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
