//! latex-calc CLI - formula evaluation and rendering tool

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use latex_calc_formula::{
    detect_variables, Calculator, EvaluationOptions, FormulaError, NonFinitePolicy,
    VariableBindings,
};
use latex_calc_markup::render_markup;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "latex-calc")]
#[command(author, version, about = "Formula evaluation and rendering tool")]
struct Cli {
    /// Log verbosity
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a formula
    Eval {
        /// Formula, e.g. "2a + b^2"
        #[arg(allow_hyphen_values = true)]
        formula: String,

        /// Variable binding, e.g. -v a=3 (repeatable)
        #[arg(short = 'v', long = "var", value_parser = parse_binding)]
        vars: Vec<(String, String)>,

        /// TOML file with evaluation options
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Return NaN/infinity instead of failing on non-finite results
        #[arg(long)]
        allow_non_finite: bool,
    },

    /// List the variables of a formula with their current values
    Vars {
        #[arg(allow_hyphen_values = true)]
        formula: String,

        /// Known variable values; unknown variables are listed as 0
        #[arg(short = 'v', long = "var", value_parser = parse_binding)]
        vars: Vec<(String, String)>,
    },

    /// Print the normalized expression text
    Normalize {
        #[arg(allow_hyphen_values = true)]
        formula: String,

        /// Variable binding, e.g. -v a=3 (repeatable)
        #[arg(short = 'v', long = "var", value_parser = parse_binding)]
        vars: Vec<(String, String)>,

        /// TOML file with evaluation options
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Render a formula as LaTeX-like HTML markup
    Render {
        #[arg(allow_hyphen_values = true)]
        formula: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    TermLogger::init(
        cli.log_level.into(),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;

    match cli.command {
        Commands::Eval {
            formula,
            vars,
            config,
            format,
            allow_non_finite,
        } => {
            let mut options = load_options(config.as_deref())?;
            if allow_non_finite {
                options.non_finite = NonFinitePolicy::Propagate;
            }
            eval(&formula, &vars, options, format)
        }
        Commands::Vars { formula, vars } => list_variables(&formula, &vars),
        Commands::Normalize {
            formula,
            vars,
            config,
        } => normalize(&formula, &vars, load_options(config.as_deref())?),
        Commands::Render { formula } => {
            println!("{}", render_markup(&formula));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn eval(
    formula: &str,
    vars: &[(String, String)],
    options: EvaluationOptions,
    format: OutputFormat,
) -> Result<ExitCode> {
    let bindings = build_bindings(vars)?;
    let result = Calculator::new(options).evaluate(formula, &bindings);

    match format {
        OutputFormat::Text => match &result {
            Ok(value) => println!("{}", format_number(*value)),
            Err(e) => eprintln!("error[{}]: {}", e.kind(), e),
        },
        OutputFormat::Json => println!("{}", json_report(formula, &result)),
    }

    Ok(if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn list_variables(formula: &str, vars: &[(String, String)]) -> Result<ExitCode> {
    let known = build_bindings(vars)?;
    let synced = VariableBindings::synchronize(formula, &known);
    log::debug!("detected variables: {:?}", detect_variables(formula));

    for (name, value) in synced.iter() {
        println!("{}={}", name, format_number(value));
    }
    Ok(ExitCode::SUCCESS)
}

fn normalize(
    formula: &str,
    vars: &[(String, String)],
    options: EvaluationOptions,
) -> Result<ExitCode> {
    let bindings = build_bindings(vars)?;
    match Calculator::new(options).normalize(formula, &bindings) {
        Ok(text) => {
            println!("{}", text);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("error[{}]: {}", e.kind(), e);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Parse a `name=value` binding argument
fn parse_binding(arg: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", arg))?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}

fn build_bindings(vars: &[(String, String)]) -> Result<VariableBindings> {
    let mut bindings = VariableBindings::new();
    for (name, value) in vars {
        bindings
            .insert_named(name, value)
            .with_context(|| format!("Invalid binding '{}={}'", name, value))?;
    }
    Ok(bindings)
}

/// Load evaluation options from a TOML file, or the defaults without one
fn load_options(path: Option<&Path>) -> Result<EvaluationOptions> {
    let path = match path {
        Some(path) => path,
        None => return Ok(EvaluationOptions::default()),
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    let options: EvaluationOptions = toml::from_str(&text)
        .with_context(|| format!("Failed to parse '{}'", path.display()))?;
    log::info!("loaded options from '{}': {:?}", path.display(), options);
    Ok(options)
}

fn json_report(formula: &str, result: &std::result::Result<f64, FormulaError>) -> String {
    let report = match result {
        // JSON has no NaN or infinity
        Ok(value) if !value.is_finite() => serde_json::json!({
            "formula": formula,
            "result": format_number(*value),
        }),
        Ok(value) => serde_json::json!({
            "formula": formula,
            "result": value,
        }),
        Err(e) => serde_json::json!({
            "formula": formula,
            "error": {
                "kind": e.kind().as_str(),
                "message": e.to_string(),
            },
        }),
    };
    report.to_string()
}

/// Integral values print without a fractional part
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
