//! cmdpace CLI Application
//!
//! Runs an external command once per stdin line, with the line substituted
//! into the command's argument pattern, under two independent limits: a
//! maximum start-rate and a maximum in-flight count.

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use cmdpace_lib::{load_env_config, CommandRunner, CommandTemplate, RunConfig};
use console::style;
use std::io::IsTerminal;
use std::process;
use tokio::io::AsyncBufReadExt;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for cmdpace
#[derive(Parser, Debug)]
#[command(name = "cmdpace")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run a command per stdin line under start-rate and in-flight limits")]
#[command(
    long_about = "Run an external command once per line of standard input, with the line substituted for '{}' in the command's arguments.\n\nLaunches are limited by a start-rate (--rate) and a cap on simultaneously running commands (--inflight). The process exits once every launched command has finished, or with status 1 as soon as one fails."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Command to run, followed by its argument pattern containing `{}`
    #[arg(
        value_name = "COMMAND",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help_heading = "Command"
    )]
    pub command: Vec<String>,

    /// Max command starts per second (env: CMDPACE_RATE)
    #[arg(short = 'r', long = "rate", value_name = "N", help_heading = "Limits")]
    pub rate: Option<u32>,

    /// Max concurrently running commands (env: CMDPACE_INFLIGHT)
    #[arg(
        short = 'n',
        long = "inflight",
        value_name = "N",
        help_heading = "Limits"
    )]
    pub inflight: Option<usize>,

    /// Print each rendered command line without executing anything
    #[arg(long = "dry-run", help_heading = "Output Format")]
    pub dry_run: bool,

    /// With --dry-run, print the rendered argv lists as JSON
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Show a run summary on stderr
    #[arg(short = 'v', long = "verbose", help_heading = "Diagnostics")]
    pub verbose: bool,

    /// Show per-task tracing output on stderr
    #[arg(short = 'd', long = "debug", help_heading = "Diagnostics")]
    pub debug: bool,
}

#[tokio::main]
async fn main() {
    // Usage errors are configuration errors here, so they exit with 1
    // like every other configuration problem; --help and --version keep
    // their success status.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    // Validate arguments
    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    init_tracing(&args);

    // Run the paced launches
    if let Err(e) = run_paced(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if args.json && !args.dry_run {
        return Err("--json only applies to --dry-run output".to_string());
    }

    // Zero limits are rejected later by RunConfig::validate with the same
    // message as zero env values; nothing else to check here; clap already
    // enforces the required command positional.
    Ok(())
}

/// Install the tracing subscriber feeding the library's diagnostics to stderr.
///
/// `RUST_LOG` wins when set; otherwise the verbosity flags choose a default.
fn init_tracing(args: &Args) {
    use tracing_subscriber::EnvFilter;

    let default_filter = if args.debug {
        "cmdpace=debug"
    } else if args.verbose {
        "cmdpace=info"
    } else {
        "cmdpace=warn"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Main pacing logic
async fn run_paced(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    // The feeder owns stdin for the whole run; an interactive terminal
    // there means the user forgot to redirect input. Checked before any
    // read so the failure is immediate.
    if std::io::stdin().is_terminal() {
        return Err("standard input must come from a pipe or file, not a terminal".into());
    }

    let template = CommandTemplate::from_argv(&args.command)?;

    // Dry-run: print what would be launched and exit without spawning
    if args.dry_run {
        return run_dry(&template, args.json).await;
    }

    let config = build_config(&args);
    let runner = CommandRunner::new(config, template)?;

    if args.verbose {
        eprintln!(
            "{} pacing '{}' at {}/s, {} in flight",
            style("cmdpace:").cyan().bold(),
            runner.template().program(),
            runner.config().rate,
            runner.config().inflight,
        );
    }

    let summary = runner.run(tokio::io::stdin()).await?;

    if args.verbose {
        eprintln!(
            "{} launched {} commands in {:.1}s",
            style("cmdpace:").green().bold(),
            summary.launched,
            summary.elapsed.as_secs_f64(),
        );
    }

    Ok(())
}

/// Build RunConfig from CLI arguments with environment integration.
///
/// Precedence order (highest to lowest):
/// 1. CLI arguments (explicit user input)
/// 2. Environment variables (CMDPACE_*)
/// 3. Built-in defaults (rate 1, inflight 1)
fn build_config(args: &Args) -> RunConfig {
    let mut config = RunConfig::default();

    let env_config = load_env_config();
    if let Some(rate) = env_config.rate {
        config.rate = rate;
    }
    if let Some(inflight) = env_config.inflight {
        config.inflight = inflight;
    }

    // CLI arguments always win over environment
    if let Some(rate) = args.rate {
        config.rate = rate;
    }
    if let Some(inflight) = args.inflight {
        config.inflight = inflight;
    }

    config
}

/// Read stdin and print each rendered command line without executing it.
async fn run_dry(
    template: &CommandTemplate,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let mut rendered: Vec<Vec<String>> = Vec::new();

    while let Some(line) = lines.next_line().await? {
        let mut argv = vec![template.program().to_string()];
        argv.extend(template.render(&line));
        rendered.push(argv);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        for argv in &rendered {
            println!("{}", argv.join(" "));
        }
    }
    eprintln!("{} commands would be launched", rendered.len());

    Ok(())
}

// cmdpace/src/main.rs tests module
