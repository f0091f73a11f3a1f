use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use voxcalc_core::speech::{Speaker, Transcriber, VoiceSession};
use voxcalc_core::{Calculation, Calculator, Config, Error, History};

/// Voxcalc — spoken arithmetic calculator
///
/// Turn English or Hindi arithmetic phrases into results.
#[derive(Parser)]
#[command(name = "voxcalc", version, about, long_about = None)]
struct Cli {
    /// Print only bare results, no decoration
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log verbosity on stderr (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Significant digits in displayed results (1-17)
    #[arg(long, global = true, value_name = "N")]
    digits: Option<usize>,

    /// Display Infinity instead of rejecting non-finite results
    #[arg(long, global = true)]
    allow_infinity: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate a natural-language phrase
    Calc {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Phrase words, e.g. two plus three times four
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        words: Vec<String>,
    },

    /// Show the canonical expression for a phrase
    Normalize {
        /// Phrase words
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        words: Vec<String>,
    },

    /// Evaluate an already canonical expression
    Eval {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Expression, e.g. "2 + 3 * 4"
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        expression: Vec<String>,
    },

    /// Calculate one transcript per stdin line until EOF
    Listen {
        /// Print the session history at EOF
        #[arg(long)]
        history: bool,
        /// Output as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

// ── Speech collaborators ──────────────────────────────────

/// Reads finalized transcripts from a line-oriented source
struct LineTranscriber<R> {
    reader: R,
}

impl<R: BufRead> Transcriber for LineTranscriber<R> {
    fn listen(&mut self) -> voxcalc_core::Result<Option<String>> {
        loop {
            let mut line = String::new();
            let read = self
                .reader
                .read_line(&mut line)
                .map_err(|e| Error::Recognition(format!("failed to read transcript: {}", e)))?;
            if read == 0 {
                return Ok(None);
            }
            let transcript = line.trim();
            if !transcript.is_empty() {
                return Ok(Some(transcript.to_string()));
            }
        }
    }
}

/// Stand-in for speech synthesis: echoes the spoken text on stderr
struct TerminalSpeaker {
    silent: bool,
}

impl Speaker for TerminalSpeaker {
    fn speak(&mut self, text: &str) {
        if !self.silent {
            eprintln!("{} {}", "speaking:".dimmed(), text);
        }
    }
}

// ── Setup ─────────────────────────────────────────────────

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("voxcalc_core={0},voxcalc_cli={0}", level).into()
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config, String> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read config {}: {}", path.display(), e))?;
    toml::from_str(&content).map_err(|e| format!("invalid config {}: {}", path.display(), e))
}

fn build_calculator(cli: &Cli) -> Result<Calculator, String> {
    let config =
        load_config(cli.config.as_deref())?.with_overrides(cli.digits, cli.allow_infinity);
    tracing::debug!(?config, "configuration loaded");
    Ok(Calculator::new(config))
}

// ── Output ────────────────────────────────────────────────

fn render_calculation(calculation: &Calculation, json: bool, quiet: bool) -> String {
    if json {
        calculation.to_json().to_string()
    } else if quiet {
        calculation.result.clone()
    } else {
        format!(
            "{} {} {}",
            calculation.expression.cyan(),
            "=".dimmed(),
            calculation.result.green().bold()
        )
    }
}

fn print_calculation(calculation: &Calculation, json: bool, quiet: bool) {
    println!("{}", render_calculation(calculation, json, quiet));
}

fn print_error(err: &Error, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "error": err.kind().to_string(),
                "message": err.to_string(),
            })
        );
    } else {
        eprintln!("{} {} ({})", "error:".red().bold(), err, err.kind());
    }
}

fn print_history(history: &History, json: bool) {
    if json {
        match serde_json::to_string(history) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("{} {}", "error:".red().bold(), e),
        }
        return;
    }
    println!("{}", "History".bold());
    for record in history {
        println!(
            "  {} {} {} {}",
            record.created_at.format("%H:%M:%S").to_string().dimmed(),
            record.expression,
            "=".dimmed(),
            record.result.green()
        );
    }
}

// ── Commands ──────────────────────────────────────────────

fn run_calc(calculator: &Calculator, phrase: &str, json: bool, quiet: bool) -> i32 {
    match calculator.calculate(phrase) {
        Ok(calculation) => {
            print_calculation(&calculation, json, quiet);
            0
        }
        Err(e) => {
            print_error(&e, json);
            1
        }
    }
}

fn run_eval(calculator: &Calculator, expression: &str, json: bool, quiet: bool) -> i32 {
    match calculator.evaluate_display(expression) {
        Ok((value, result)) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "expression": expression,
                        "value": value,
                        "result": result,
                    })
                );
            } else if quiet {
                println!("{}", result);
            } else {
                println!("{} {} {}", expression.cyan(), "=".dimmed(), result.green().bold());
            }
            0
        }
        Err(e) => {
            print_error(&e, json);
            1
        }
    }
}

fn run_listen(calculator: Calculator, show_history: bool, json: bool, quiet: bool) -> i32 {
    let transcriber = LineTranscriber {
        reader: io::stdin().lock(),
    };
    let speaker = TerminalSpeaker {
        silent: quiet || json,
    };
    let mut session = VoiceSession::with_calculator(calculator, transcriber, speaker);
    let mut out = io::stdout();
    let mut exit_code = 0;

    loop {
        match session.step() {
            Ok(Some(calculation)) => {
                let line = render_calculation(&calculation, json, quiet);
                if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
                    tracing::warn!(error = %e, "cannot write result to stdout, stopping");
                    return 2;
                }
            }
            Ok(None) => break,
            Err(e) if e.is_collaborator_error() => {
                print_error(&e, json);
                exit_code = 2;
                break;
            }
            Err(e) => {
                print_error(&e, json);
                exit_code = 1;
            }
        }
    }

    if show_history {
        print_history(session.history(), json);
    }
    exit_code
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::Version = cli.command {
        println!(
            "voxcalc {} (voxcalc-core {})",
            env!("CARGO_PKG_VERSION"),
            voxcalc_core::VERSION
        );
        process::exit(0);
    }

    let calculator = match build_calculator(&cli) {
        Ok(calculator) => calculator,
        Err(message) => {
            eprintln!("{} {}", "error:".red().bold(), message);
            process::exit(2);
        }
    };

    let exit_code = match cli.command {
        Commands::Calc { json, words } => run_calc(&calculator, &words.join(" "), json, cli.quiet),
        Commands::Normalize { words } => {
            println!("{}", calculator.normalize(&words.join(" ")));
            0
        }
        Commands::Eval { json, expression } => {
            run_eval(&calculator, &expression.join(" "), json, cli.quiet)
        }
        Commands::Listen { history, json } => run_listen(calculator, history, json, cli.quiet),
        Commands::Version => 0,
    };

    process::exit(exit_code);
}
