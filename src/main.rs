use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sigil_renderer::catalog::{ExportMode, Platform};
use sigil_renderer::config::find_preset;
use sigil_renderer::{Exporter, GlyphResolver, IconConfiguration, SymbolLibrary};

/// Render app icons from a symbol and a background.
#[derive(Debug, Parser)]
#[command(name = "sigil", version, about, long_about = None)]
struct Args {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write the default configuration to a JSON profile
    Init {
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Export an AppIcon.appiconset directory
    Export {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(long, value_enum, default_value_t = ModeArg::Single)]
        mode: ModeArg,

        /// Platform to include with `--mode all` (repeatable)
        #[arg(long = "platform", value_enum, value_name = "PLATFORM")]
        platforms: Vec<PlatformArg>,

        /// Directory that receives AppIcon.appiconset
        #[arg(short, long, value_name = "DIR")]
        out: PathBuf,
    },

    /// Render a single 1024x1024 PNG
    Png {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,
    },

    /// List available symbol ids
    Symbols {
        /// Directory of extra SVG symbols
        #[arg(long, value_name = "DIR")]
        symbols: Option<PathBuf>,
    },
}

#[derive(Debug, clap::Args)]
struct SourceArgs {
    /// JSON profile; defaults apply when omitted
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory of extra SVG symbols
    #[arg(long, value_name = "DIR")]
    symbols: Option<PathBuf>,

    /// Override the profile's glyph id
    #[arg(long)]
    glyph: Option<String>,

    /// Apply a named color preset (e.g. Orange, Blue, Black)
    #[arg(long)]
    preset: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Single,
    All,
}

impl From<ModeArg> for ExportMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Single => ExportMode::SingleIcon,
            ModeArg::All => ExportMode::AllSizes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PlatformArg {
    Ios,
    Macos,
}

impl From<PlatformArg> for Platform {
    fn from(platform: PlatformArg) -> Self {
        match platform {
            PlatformArg::Ios => Platform::Ios,
            PlatformArg::Macos => Platform::MacOs,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Init { path, force } => init(&path, force),
        Command::Export {
            source,
            mode,
            platforms,
            out,
        } => export(&source, mode.into(), &platforms, &out),
        Command::Png { source, out } => png(&source, &out),
        Command::Symbols { symbols } => list_symbols(symbols.as_deref()),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    IconConfiguration::default()
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "wrote default profile");
    Ok(())
}

fn export(source: &SourceArgs, mode: ExportMode, platforms: &[PlatformArg], out: &Path) -> Result<()> {
    if mode == ExportMode::AllSizes && platforms.is_empty() {
        bail!("--mode all needs at least one --platform");
    }
    let platforms: Vec<Platform> = platforms.iter().copied().map(Platform::from).collect();

    let (library, config) = load_source(source)?;
    let report = Exporter::new(library)
        .export_icon_set(&config, mode, &platforms, out)
        .with_context(|| format!("exporting icon set to {}", out.display()))?;

    for path in report.written() {
        println!("{}", path.display());
    }
    Ok(())
}

fn png(source: &SourceArgs, out: &Path) -> Result<()> {
    let (library, config) = load_source(source)?;
    Exporter::new(library)
        .export_single_file(&config, out)
        .with_context(|| format!("writing {}", out.display()))?;
    println!("{}", out.display());
    Ok(())
}

fn list_symbols(symbols: Option<&Path>) -> Result<()> {
    let library = load_library(symbols)?;
    for id in library.ids() {
        println!("{id}");
    }
    Ok(())
}

fn load_library(symbols: Option<&Path>) -> Result<SymbolLibrary> {
    let mut library = SymbolLibrary::builtin();
    if let Some(dir) = symbols {
        let loaded = library
            .load_dir(dir)
            .with_context(|| format!("reading symbols from {}", dir.display()))?;
        info!(dir = %dir.display(), loaded, "loaded user symbols");
    }
    Ok(library)
}

fn load_source(source: &SourceArgs) -> Result<(SymbolLibrary, IconConfiguration)> {
    let library = load_library(source.symbols.as_deref())?;

    let mut config = match &source.config {
        Some(path) => IconConfiguration::load(path)
            .with_context(|| format!("loading profile {}", path.display()))?,
        None => IconConfiguration::default(),
    };

    if let Some(name) = &source.preset {
        let Some(preset) = find_preset(name) else {
            bail!("unknown color preset {name:?}");
        };
        config.apply_preset(preset);
    }

    if let Some(glyph) = &source.glyph {
        config.glyph_id = glyph.clone();
    }
    if !library.contains(&config.glyph_id) {
        bail!(
            "unknown symbol {:?}; run `sigil symbols` to list available ids",
            config.glyph_id
        );
    }

    Ok((library, config))
}
