use clap::{Args, Parser, Subcommand, ValueEnum};
use npt_core::*;
use std::path::{Path, PathBuf};

mod render;

use render::Report;

#[derive(Parser)]
#[command(name = "npt")]
#[command(about = "Parenteral nutrition prescription calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate a prescription draft (default)
    Calc(CalcArgs),

    /// Show or change the display theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },

    /// Show or create the configuration file
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Args, Default)]
struct CalcArgs {
    /// Sex (male, female)
    #[arg(long)]
    sex: Option<Sex>,

    /// Age in years
    #[arg(long)]
    age: Option<f64>,

    /// Actual weight (kg)
    #[arg(long)]
    weight: Option<f64>,

    /// Height (cm)
    #[arg(long)]
    height: Option<f64>,

    /// High metabolic stress (sepsis, trauma)
    #[arg(long)]
    stress: bool,

    /// Refeeding syndrome risk
    #[arg(long)]
    refeeding: bool,

    /// COPD / hypercapnia
    #[arg(long)]
    copd: bool,

    /// Enterocutaneous fistula
    #[arg(long)]
    fistula: bool,

    /// Energy target (kcal/kg/day)
    #[arg(long)]
    kcal_per_kg: Option<f64>,

    /// Fraction of the target delivered today (0.0-1.0)
    #[arg(long)]
    start: Option<f64>,

    /// Protein target (g/kg/day)
    #[arg(long)]
    protein_per_kg: Option<f64>,

    /// Glucose share of non-protein calories (%)
    #[arg(long)]
    glucose_pct: Option<f64>,

    /// Amino acid solution concentration (%)
    #[arg(long)]
    aa_pct: Option<f64>,

    /// Raise low targets to the stress suggestion
    #[arg(long)]
    suggest: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Summary,
    Order,
    Guide,
    Json,
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the current theme (default)
    Show,
    /// Switch between dark and light
    Toggle,
    /// Set the theme explicitly
    Set { theme: Theme },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (default)
    Show,
    /// Write a config file populated with the defaults
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    npt_core::logging::init();

    let cli = Cli::parse();

    // Init must work even when the existing file no longer parses
    if let Some(Commands::Config {
        action: Some(ConfigAction::Init { force }),
    }) = &cli.command
    {
        return cmd_config_init(cli.config.clone(), *force);
    }

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }

    match cli.command {
        Some(Commands::Calc(args)) => cmd_calc(args, &config),
        Some(Commands::Theme { action }) => {
            cmd_theme(action.unwrap_or(ThemeAction::Show), &config)
        }
        Some(Commands::Config { .. }) => cmd_config_show(&config),
        None => {
            // Default to "calc" with every field defaulted
            cmd_calc(CalcArgs::default(), &config)
        }
    }
}

/// Load the explicit config file if it exists, else the standard one
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) if path.exists() => Config::load_from(path),
        Some(path) => {
            tracing::info!("No config file found at {:?}, using defaults", path);
            Ok(Config::default())
        }
        None => Config::load(),
    }
}

fn cmd_calc(args: CalcArgs, config: &Config) -> Result<()> {
    let form = FormInput {
        age_years: args.age,
        sex: args.sex,
        weight_kg: args.weight,
        height_cm: args.height,
        stress: args.stress,
        refeeding_risk: args.refeeding,
        copd: args.copd,
        fistula: args.fistula,
        kcal_per_kg: args.kcal_per_kg,
        start_fraction: args.start,
        protein_per_kg: args.protein_per_kg,
        glucose_percent: args.glucose_pct,
        amino_acid_percent: args.aa_pct,
    };

    let (patient, mut dosing) = form.resolve(&config.defaults);
    if args.suggest {
        apply_stress_suggestion(&patient, &mut dosing);
    }

    let report = Report::build(patient, dosing);

    match args.format {
        OutputFormat::Summary => println!("{}", render::summary(&report)),
        OutputFormat::Order => {
            let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
            println!("{}", render::order(&report, &generated_at));
        }
        OutputFormat::Guide => println!("{}", render::guide(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn cmd_theme(action: ThemeAction, config: &Config) -> Result<()> {
    let path = config.preferences_path();

    let prefs = match action {
        ThemeAction::Show => Preferences::load(&path),
        ThemeAction::Toggle => Preferences::update(&path, |p| p.theme = p.theme.toggled())?,
        ThemeAction::Set { theme } => Preferences::update(&path, |p| p.theme = theme)?,
    };

    println!("Theme: {}", prefs.theme);
    Ok(())
}

fn cmd_config_show(config: &Config) -> Result<()> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
    print!("{}", contents);
    Ok(())
}

fn cmd_config_init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = path.unwrap_or_else(Config::default_config_path);
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    Config::default().save_to(&path)?;
    println!("✓ Wrote default config to {}", path.display());
    Ok(())
}
