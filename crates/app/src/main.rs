use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use clap::{Parser, Subcommand, ValueEnum};
use musical_calculator_core::{
    render::write_notes, write_listing, CalculatorConfig, CalculatorError, Chromatic, Mode, Note,
    RenderStyle,
};
use tracing_subscriber::EnvFilter;

fn main() -> musical_calculator_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = cli.config()?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match cli.command {
        Commands::Modes { tier } => run_modes(&config, tier, &mut out)?,
        Commands::Scales { tier } => run_scales(&config, tier, &mut out)?,
        Commands::Summary { json } => run_summary(&config, json, &mut out)?,
        Commands::Rotations { notes } => run_rotations(&config, &notes, &mut out)?,
    }

    out.flush()?;
    Ok(())
}

fn run_modes(
    config: &CalculatorConfig,
    tier: Option<usize>,
    out: &mut impl Write,
) -> musical_calculator_core::Result<()> {
    let chromatic = Chromatic::with_config(config)?;
    match tier {
        Some(mode_note_count) => {
            let tier = chromatic
                .tier(mode_note_count)
                .ok_or_else(|| tier_error(mode_note_count, &chromatic))?;
            write_listing(out, "mode", tier.modes(), config.render_style())
        }
        None => write_listing(out, "mode", chromatic.modes(), config.render_style()),
    }
}

fn run_scales(
    config: &CalculatorConfig,
    tier: Option<usize>,
    out: &mut impl Write,
) -> musical_calculator_core::Result<()> {
    let chromatic = Chromatic::with_config(config)?;
    match tier {
        Some(mode_note_count) => {
            let tier = chromatic
                .tier(mode_note_count)
                .ok_or_else(|| tier_error(mode_note_count, &chromatic))?;
            write_listing(out, "scale", tier.scales(), config.render_style())
        }
        None => write_listing(out, "scale", chromatic.scales(), config.render_style()),
    }
}

fn run_summary(
    config: &CalculatorConfig,
    json: bool,
    out: &mut impl Write,
) -> musical_calculator_core::Result<()> {
    let summary = Chromatic::with_config(config)?.summary();
    if json {
        writeln!(out, "{}", summary.to_json_pretty()?)?;
        return Ok(());
    }

    writeln!(out, "chromatic note count: {}", summary.chromatic_note_count)?;
    writeln!(out, "total mode count: {}", summary.mode_count)?;
    writeln!(out, "total scale count: {}", summary.scale_count)?;
    for tier in &summary.tiers {
        writeln!(
            out,
            "tier {:>2}: {} modes, {} scales",
            tier.mode_note_count, tier.mode_count, tier.scale_count
        )?;
    }
    Ok(())
}

fn run_rotations(
    config: &CalculatorConfig,
    notes: &[Note],
    out: &mut impl Write,
) -> musical_calculator_core::Result<()> {
    let chromatic_note_count = config.chromatic_note_count;
    let mode = Mode::new(notes, chromatic_note_count)?;
    tracing::info!(mode = %mode, chromatic_note_count, "rotating mode");

    let style = config.render_style();
    let rotations = mode.rotations();
    writeln!(out, "total rotation count: {}", rotations.len())?;
    for rotation in &rotations {
        write_notes(out, rotation, style)?;
    }

    if mode.is_scale() {
        writeln!(out, "the mode is the scale of its class")?;
    } else {
        write!(out, "the scale of its class is ")?;
        write_notes(out, &mode.canonical(), style)?;
    }
    Ok(())
}

fn tier_error(mode_note_count: usize, chromatic: &Chromatic) -> CalculatorError {
    CalculatorError::ModeNoteCount {
        mode_note_count,
        chromatic_note_count: chromatic.chromatic_note_count(),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Enumerates the modes and scales of a chromatic", long_about = None)]
struct Cli {
    /// Number of pitch classes in the chromatic (1 to 24).
    #[arg(short, long, global = true)]
    notes: Option<usize>,
    /// JSON configuration file; command line flags take precedence.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Worker threads used while building tiers.
    #[arg(short, long, global = true)]
    workers: Option<usize>,
    /// How modes are printed.
    #[arg(short, long, global = true, value_enum)]
    style: Option<StyleArg>,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn config(&self) -> musical_calculator_core::Result<CalculatorConfig> {
        let mut config = match &self.config {
            Some(path) => CalculatorConfig::load(path)?,
            None => CalculatorConfig::default(),
        };
        if let Some(notes) = self.notes {
            config.chromatic_note_count = notes;
        }
        if let Some(workers) = self.workers {
            config.workers = Some(workers);
        }
        if let Some(style) = self.style {
            config.render_style = Some(style.into());
        }
        config.validate()?;

        // a style set by flag or file is kept and fails on the first wide note
        if config.falls_back_to_spaced() {
            tracing::warn!(
                chromatic_note_count = config.chromatic_note_count,
                "digit style cannot print notes above 9, falling back to spaced"
            );
        }
        Ok(config)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every mode, or the modes of one tier.
    Modes {
        /// Only list modes with this many notes.
        #[arg(short, long)]
        tier: Option<usize>,
    },
    /// List every scale, or the scales of one tier.
    Scales {
        /// Only list scales with this many notes.
        #[arg(short, long)]
        tier: Option<usize>,
    },
    /// Print mode and scale counts for the chromatic and each tier.
    Summary {
        /// Emit the summary as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List the rotations of a mode, e.g. `rotations 1 3 5 6 8 10 12`.
    Rotations {
        /// Notes of the mode, starting with 1.
        #[arg(required = true, num_args = 1..)]
        notes: Vec<Note>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StyleArg {
    Digits,
    Spaced,
}

impl From<StyleArg> for RenderStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Digits => RenderStyle::Digits,
            StyleArg::Spaced => RenderStyle::Spaced,
        }
    }
}
