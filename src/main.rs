use chrono::Local;
use clap::Parser;
use manual_gen::config;
use manual_gen::generate::{self, GenerateOptions};
use manual_gen::output;
use manual_gen::render::Variables;
use manual_gen::template;
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit code for fatal errors (missing template, I/O, config).
const EXIT_FATAL: u8 = 2;

#[derive(Parser)]
#[command(name = "manual-gen")]
#[command(about = "Generate the user manual from its Markdown template")]
#[command(long_about = "\
Generate the user manual from its Markdown template

Loads the template, validates its structure, substitutes {{placeholders}},
and writes the rendered manual plus a JSON validation report.

Validation:
  Required sections   every configured '## Name' header must exist  (fail)
  Header hierarchy    no jump of more than one level, e.g. # → ###  (warning)
  Placeholders        {{name}} with name made of [A-Za-z0-9_]       (warning)
  Links               no empty [text]() destinations                (warning)

Placeholders without a value are left in the output as-is.

Exit codes:
  0  pass or warning
  1  a required section is missing
  2  fatal error (template not found, unwritable output, bad config)

Settings are read from manual.toml when present; run with --gen-config
for a documented copy.")]
#[command(disable_version_flag = true)]
struct Cli {
    /// Path to the Markdown template
    #[arg(long, short = 't')]
    template: Option<PathBuf>,

    /// Output path for the rendered manual
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Output path for the JSON validation report
    #[arg(long, short = 'r')]
    report: Option<PathBuf>,

    /// System version substituted for {{version}}
    #[arg(long = "version", short = 'v', value_name = "VERSION")]
    manual_version: Option<String>,

    /// Extra placeholder value, repeatable: --var support_email=help@example.com
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
    vars: Vec<(String, String)>,

    /// Only validate the template and write the report; don't render
    #[arg(long)]
    validate_only: bool,

    /// Config file (default: ./manual.toml when present)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Print a documented stock manual.toml and exit
    #[arg(long)]
    gen_config: bool,

    /// Increase log verbosity on stderr (repeatable: info, debug, trace)
    #[arg(long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if !template::is_identifier(key) {
        return Err(format!(
            "invalid variable name '{key}': use letters, digits and underscores"
        ));
    }
    Ok((key.to_string(), value.to_string()))
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(cli: Cli) -> Result<u8, Box<dyn std::error::Error>> {
    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return Ok(0);
    }

    let cwd = std::env::current_dir()?;
    let config = config::load_config(cli.config.as_deref(), &cwd)?;

    let mut variables = Variables::with_defaults(&config.variables, Local::now().date_naive());
    for (key, value) in cli.vars {
        variables.set(key, value);
    }
    if let Some(version) = cli.manual_version {
        variables.set("version", version);
    }

    let opts = GenerateOptions {
        template: cli.template.unwrap_or(config.paths.template),
        output: cli.output.unwrap_or(config.paths.output),
        report: cli.report.unwrap_or(config.paths.report),
        required_sections: config.sections.required,
        variables,
        validate_only: cli.validate_only,
    };

    let system_name = opts
        .variables
        .get("system_name")
        .unwrap_or("Manual")
        .to_string();
    output::print_banner(&system_name);

    let outcome = generate::generate(&opts)?;
    output::print_outcome(&outcome, &opts.required_sections);
    Ok(outcome.exit_code())
}
