use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fretwise::config::AppConfig;
use fretwise::fingering::{self, FingeringEngine, FretAssignment};
use fretwise::pitch::PitchClass;
use fretwise::render;
use fretwise::theory::{self, ChordQuality, DiatonicChord};
use fretwise::tuning::{self, TuningEntry};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fretwise", version, about = "Chord fingerings for fretted instruments")]
struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct TuningArgs {
    /// Tuning as comma-separated pitches, lowest string first (e.g. "D2, A2, D3, G3, B3, E4")
    #[arg(short, long)]
    tuning: Option<String>,

    /// Named tuning preset (see `fretwise presets`)
    #[arg(short, long, conflicts_with = "tuning")]
    preset: Option<String>,

    /// Instrument the preset belongs to (defaults to config, then 6guitar)
    #[arg(short, long)]
    instrument: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Find playable fingerings for a chord
    Chord {
        /// Root note (C, F#, Bb, ...)
        root: String,

        /// Triad quality: major, minor, dim, aug (or M, m, °, +)
        #[arg(default_value = "major")]
        quality: String,

        /// Extensions, e.g. "7", "7M9", "6/9", "7 9+"
        #[arg(short, long, default_value = "")]
        ext: String,

        #[command(flatten)]
        tuning: TuningArgs,

        /// Write an SVG chord box per fingering into this directory
        #[arg(long)]
        svg: Option<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the diatonic chords of a scale with fingerings
    Scale {
        /// Tonic (C, F#, Bb, ...)
        tonic: String,

        /// Scale key (see `fretwise scales`)
        #[arg(default_value = "major")]
        scale: String,

        /// Per-degree extensions, comma-separated (e.g. "7,,,,7")
        #[arg(short, long, value_delimiter = ',')]
        ext: Vec<String>,

        #[command(flatten)]
        tuning: TuningArgs,

        /// Only list chords, skip the fingering search
        #[arg(long)]
        no_fingerings: bool,

        /// Write the scale as a treble staff SVG into this directory
        #[arg(long)]
        svg: Option<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List tuning presets
    Presets {
        /// Only this instrument
        instrument: Option<String>,
    },

    /// List known scales
    Scales,

    /// Warm the fingering cache with common triads and show cache stats
    Prewarm,
}

#[derive(Serialize)]
struct ChordReport<'a> {
    symbol: &'a str,
    notes: &'a [PitchClass],
    tuning: String,
    fingerings: &'a [FretAssignment],
}

#[derive(Serialize)]
struct ScaleReport<'a> {
    tonic: &'a str,
    scale: &'static str,
    notes: Vec<String>,
    tuning: Option<String>,
    chords: &'a [DiatonicChord],
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing)
    let config = AppConfig::load();

    let engine = fingering::init(config.engine.clone())
        .context("Failed to start fingering engine")?;

    if config.prewarm {
        engine.prewarm();
    }

    match cli.command {
        Commands::Chord { root, quality, ext, tuning: tuning_args, svg, json } => {
            let root_class: PitchClass = root.parse().context("Invalid root note")?;
            let quality: ChordQuality = quality.parse().context("Invalid chord quality")?;
            let strings = resolve_tuning(&tuning_args, &config)?;

            let notes = theory::chord_notes(root_class, quality, &ext);
            let use_flat = prefers_flats(&root);
            let symbol = theory::chord_symbol(root_class, quality, &ext, use_flat);
            let fingerings = engine.compute_fingerings(&notes, &strings);

            if let Some(dir) = svg {
                write_svgs(&dir, &symbol, &fingerings)?;
            }

            if json {
                let report = ChordReport {
                    symbol: &symbol,
                    notes: &notes,
                    tuning: tuning::format_tuning(&strings),
                    fingerings: &fingerings,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_chord(&symbol, &notes, use_flat, &strings, &fingerings, engine);
            }
        }

        Commands::Scale { tonic, scale, ext, tuning: tuning_args, no_fingerings, svg, json } => {
            let tonic_class: PitchClass = tonic.parse().context("Invalid tonic")?;
            let def = theory::scale(&scale)?;
            let use_flat = prefers_flats(&tonic);
            let strings = if no_fingerings {
                None
            } else {
                Some(resolve_tuning(&tuning_args, &config)?)
            };

            let pb = ProgressBar::new_spinner();
            pb.set_message(format!("Searching fingerings for {} {}", tonic, def.name));
            let chords = theory::diatonic_chords(
                tonic_class,
                def.key,
                &ext,
                strings.as_deref(),
                engine,
                use_flat,
            )
            .context("Scale lookup failed")?;
            pb.finish_and_clear();

            let scale_notes = def.notes(tonic_class);
            let notes: Vec<String> = scale_notes
                .iter()
                .map(|&n| note_name(n, use_flat).to_string())
                .collect();

            if let Some(dir) = svg {
                let name = format!("{}_{}", file_stem(&tonic), def.key);
                write_svg(&dir, &name, &render::scale_staff_svg(&scale_notes, use_flat))?;
                println!("Wrote {}.svg to {}", name, dir.display());
            }

            if json {
                let report = ScaleReport {
                    tonic: &tonic,
                    scale: def.key,
                    notes,
                    tuning: strings.as_deref().map(tuning::format_tuning),
                    chords: &chords,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{} {}: {}", tonic, def.name, notes.join(" "));
                if let Some(s) = &strings {
                    println!("Tuning: {}", tuning::format_tuning(s));
                }
                println!();
                print_scale_table(&chords, use_flat);
            }
        }

        Commands::Presets { instrument } => {
            let codes: Vec<&str> = match &instrument {
                Some(code) => {
                    if tuning::presets(code).is_empty() {
                        anyhow::bail!(
                            "Unknown instrument \"{}\". Known: {}",
                            code,
                            tuning::instruments().collect::<Vec<_>>().join(", ")
                        );
                    }
                    vec![code.as_str()]
                }
                None => tuning::instruments().collect(),
            };
            for code in codes {
                println!("{}", code);
                for preset in tuning::presets(code) {
                    println!("  {:<24} {}", preset.name, preset.tuning);
                }
            }
        }

        Commands::Scales => {
            println!("{:<24} {:<28} {}", "Key", "Name", "Steps");
            println!("{}", "-".repeat(70));
            for def in theory::scales() {
                let steps: Vec<String> = def.pattern.iter().map(|s| s.to_string()).collect();
                println!("{:<24} {:<28} {}", def.key, def.name, steps.join("-"));
            }
        }

        Commands::Prewarm => {
            let chords = FingeringEngine::prewarm_chords();
            let strings = tuning::standard_guitar();

            let pb = ProgressBar::new(chords.len() as u64);
            pb.set_style(
                ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                    .progress_chars("#>-"),
            );
            for chord in chords {
                let names: Vec<&str> = chord.iter().map(|c| c.name()).collect();
                pb.set_message(names.join(" "));
                engine.compute_fingerings(chord, &strings);
                pb.inc(1);
            }
            pb.finish_and_clear();

            let stats = engine.stats();
            println!("Fingering cache");
            println!("===============");
            println!("Entries:   {} / {}", stats.size, stats.capacity);
            println!("Hits:      {}", stats.hits);
            println!("Misses:    {}", stats.misses);
            println!();
            println!("Cached (oldest first):");
            for key in engine.cached_keys() {
                println!("  {}", key);
            }
        }
    }

    Ok(())
}

/// Tuning precedence: `--tuning` > `--preset` > config default_tuning > standard guitar.
fn resolve_tuning(args: &TuningArgs, config: &AppConfig) -> Result<Vec<TuningEntry>> {
    if let Some(text) = &args.tuning {
        return tuning::parse_tuning(text).context("Invalid --tuning");
    }
    if let Some(name) = &args.preset {
        let instrument = args
            .instrument
            .as_deref()
            .or(config.instrument.as_deref())
            .unwrap_or(tuning::DEFAULT_INSTRUMENT);
        return tuning::find_preset(instrument, name).context("Preset lookup failed");
    }
    if let Some(text) = &config.default_tuning {
        log::debug!("Using default_tuning from config: {}", text);
        return tuning::parse_tuning(text).context("Invalid default_tuning in config");
    }
    Ok(tuning::standard_guitar())
}

/// "Bb" / "Eb" style input asks for flat spellings in output.
fn prefers_flats(note: &str) -> bool {
    note.len() > 1 && note.ends_with('b')
}

fn note_name(class: PitchClass, use_flat: bool) -> &'static str {
    if use_flat { class.flat_name() } else { class.name() }
}

fn print_chord(
    symbol: &str,
    notes: &[PitchClass],
    use_flat: bool,
    strings: &[TuningEntry],
    fingerings: &[FretAssignment],
    engine: &FingeringEngine,
) {
    let names: Vec<&str> = notes.iter().map(|&n| note_name(n, use_flat)).collect();
    println!("{} ({})", symbol, names.join(" "));
    println!("Tuning: {}", tuning::format_tuning(strings));
    println!();

    if fingerings.is_empty() {
        println!(
            "No playable fingerings within fret {}.",
            engine.config().max_fret
        );
        return;
    }

    for (i, f) in fingerings.iter().enumerate() {
        println!("{:>3}. {}", i + 1, f);
    }
}

/// Print one row per scale degree with the best fingering found.
fn print_scale_table(chords: &[DiatonicChord], use_flat: bool) {
    println!(
        "{:<6} {:<12} {:<10} {:<16} {}",
        "Deg", "Function", "Chord", "Notes", "Fingering"
    );
    println!("{}", "-".repeat(70));

    for c in chords {
        let notes: Vec<&str> = c.notes.iter().map(|&n| note_name(n, use_flat)).collect();
        let fingering = c
            .fingerings
            .first()
            .map(|f| f.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<6} {:<12} {:<10} {:<16} {}",
            c.degree,
            c.function,
            c.symbol,
            notes.join(" "),
            fingering
        );
    }
}

/// Write `<symbol>_<n>.svg` for each fingering into `dir`.
fn write_svgs(dir: &Path, symbol: &str, fingerings: &[FretAssignment]) -> Result<()> {
    let stem = file_stem(symbol);
    for (i, f) in fingerings.iter().enumerate() {
        write_svg(dir, &format!("{}_{}", stem, i + 1), &render::chord_svg(f))?;
    }
    println!("Wrote {} SVG file(s) to {}", fingerings.len(), dir.display());
    Ok(())
}

fn write_svg(dir: &Path, name: &str, svg: &str) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(format!("{}.svg", name));
    std::fs::write(&path, svg)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// Chord symbol or note name made safe for a file name ("F#m7" -> "Fsharpm7").
fn file_stem(symbol: &str) -> String {
    symbol
        .replace('#', "sharp")
        .replace('°', "dim")
        .replace('+', "aug")
        .replace('/', "-")
}
