//! Life CLI - advance a pattern and print the result.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;
use std::time::Instant;

use clap::Parser;
use life_engine::{
    AlgorithmType, CellStateFormat, EngineConfig, LifeRule, ParsedPattern, Result,
    parse_cell_state, presets,
};

/// Advance a Game of Life pattern and print the resulting state.
#[derive(Parser, Debug)]
#[command(name = "life")]
#[command(about = "Advance a Game of Life pattern and print the resulting state")]
struct Args {
    /// Pattern file (.rle or .cells), preset name such as 'glider', or inline RLE
    #[arg(required_unless_present_any = ["example_config", "list_presets"])]
    pattern: Option<String>,

    /// Number of generations to advance
    #[arg(default_value_t = 100)]
    generations: u64,

    /// Evaluator (naive or hashlife), overriding the config
    #[arg(short, long, value_name = "NAME", value_parser = AlgorithmType::from_str)]
    algorithm: Option<AlgorithmType>,

    /// Engine configuration (JSON)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format (rle or cells)
    #[arg(
        short,
        long,
        value_name = "FORMAT",
        value_parser = CellStateFormat::from_str,
        default_value_t = CellStateFormat::RunLengthEncoded
    )]
    format: CellStateFormat,

    /// Print the default configuration and exit
    #[arg(long)]
    example_config: bool,

    /// List the built-in presets and exit
    #[arg(long)]
    list_presets: bool,
}

/// A file path, or else a preset name
fn load_pattern(pattern: &str) -> Result<ParsedPattern> {
    let path = Path::new(pattern);
    if path.exists() {
        let text = fs::read_to_string(path)?;
        let format = CellStateFormat::from_path_extension(path)
            .unwrap_or_else(|| CellStateFormat::detect(&text));
        log::info!("reading {} as {}", path.display(), format);
        return Ok(format.parse(&text)?);
    }

    match presets::find(pattern) {
        Some(preset) => Ok(ParsedPattern {
            cells: preset.cells,
            rule: None,
            comments: vec![format!("N {}", preset.name)],
        }),
        None => {
            // Fall back to inline pattern text, e.g. "bo$2bo$3o!"
            Ok(parse_cell_state(pattern)?)
        }
    }
}

/// Rule to run with. A rule from the pattern file applies unless a config
/// file was given, in which case the config wins.
fn choose_rule(
    config: &EngineConfig,
    from_pattern: Option<LifeRule>,
    config_given: bool,
) -> Result<LifeRule> {
    let configured = config.life_rule()?;
    match from_pattern {
        Some(rule) if !config_given => Ok(rule),
        Some(rule) => {
            if rule != configured {
                log::warn!(
                    "pattern asks for rule {} but config sets {}; using the config",
                    rule,
                    configured
                );
            }
            Ok(configured)
        }
        None => Ok(configured),
    }
}

fn run(args: Args, pattern: &str) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(algorithm) = args.algorithm {
        config.algorithm = algorithm;
    }

    let parsed = load_pattern(pattern)?;
    let rule = choose_rule(&config, parsed.rule, args.config.is_some())?;
    config.rule = rule.notation();
    config.validate()?;

    let algorithm = config.algorithm.build(&config)?;

    let start = Instant::now();
    let result = algorithm.compute_generation_with_step(&parsed.cells, args.generations);
    let elapsed = start.elapsed();

    let bounds = result
        .bounding_box()
        .map(|rect| rect.to_string())
        .unwrap_or_else(|| "empty".to_string());
    eprintln!(
        "{} | {} | generation {} | population {} -> {} | bounds {} | {:.3} ms",
        config.algorithm,
        rule,
        args.generations,
        parsed.cells.len(),
        result.len(),
        bounds,
        elapsed.as_secs_f64() * 1000.0
    );

    print!("{}", args.format.serialize(&result, &rule, &parsed.comments));
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if args.example_config {
        println!("{}", EngineConfig::default().to_json());
        return;
    }
    if args.list_presets {
        for pattern in presets::all_patterns() {
            println!("{:<20} {}", pattern.name, pattern.description);
        }
        return;
    }
    let Some(pattern) = args.pattern.clone() else {
        return;
    };

    if let Err(e) = run(args, &pattern) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
