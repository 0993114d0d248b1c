#![deny(unsafe_code)]
//! CLI binary for the texgen texture engine.
//!
//! Subcommands:
//! - `render <preset>`: build a preset graph, rasterize it, write PNG
//! - `replay <seed.json>`: re-render a texture from a saved seed
//! - `list`: print available presets

mod error;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use error::CliError;
use log::info;
use texgen_core::{generate_cached, ColorSource, RasterImage, TextureSeed};
use texgen_presets::cache::PngDirCache;
use texgen_presets::PresetKind;

#[derive(Parser)]
#[command(name = "texgen", about = "Procedural texture generator CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a preset and write a PNG.
    Render {
        /// Preset name (e.g. "clouds").
        preset: String,

        /// Texture width in pixels.
        #[arg(short = 'W', long, default_value_t = 256)]
        width: usize,

        /// Texture height in pixels.
        #[arg(short = 'H', long, default_value_t = 256)]
        height: usize,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Preset parameters as a JSON object.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,

        /// Reuse and populate a directory of cached PNGs.
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Also write the seed as JSON so the texture can be replayed.
        #[arg(long)]
        save_seed: Option<PathBuf>,
    },
    /// Render a texture from a seed file written by `render --save-seed`.
    Replay {
        /// Seed JSON file.
        seed_file: PathBuf,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,

        /// Reuse and populate a directory of cached PNGs.
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },
    /// List available presets.
    List,
}

fn parse_params(raw: &str) -> Result<serde_json::Value, CliError> {
    let params: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    if !params.is_object() {
        return Err(CliError::Input("--params must be a JSON object".into()));
    }
    Ok(params)
}

fn load_seed(path: &Path) -> Result<TextureSeed, CliError> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("invalid seed file {}: {e}", path.display())))
}

fn save_seed(seed: &TextureSeed, path: &Path) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(seed)?;
    fs::write(path, text).map_err(|e| CliError::Io(format!("cannot write {}: {e}", path.display())))
}

/// Builds the seed's graph and rasterizes it, going through the cache when given.
fn render_seed(seed: &TextureSeed, cache_dir: Option<&Path>) -> Result<RasterImage, CliError> {
    let source = PresetKind::from_seed(seed)?;
    let image = match cache_dir {
        Some(dir) => {
            let cache = PngDirCache::new(dir);
            generate_cached(Some(&cache), &seed.cache_id(), &*source)
        }
        None => source.generate_image(),
    };
    Ok(image)
}

fn report(seed: &TextureSeed, output: &Path, json: bool) -> Result<(), CliError> {
    if json {
        let info = serde_json::json!({
            "preset": seed.preset,
            "width": seed.width,
            "height": seed.height,
            "seed": seed.seed,
            "params": seed.params,
            "output": output.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        info!(
            "rendered {} ({}x{}, seed {}) -> {}",
            seed.preset,
            seed.width,
            seed.height,
            seed.seed,
            output.display()
        );
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let presets = PresetKind::list_names();
            if cli.json {
                let info = serde_json::json!({ "presets": presets });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Presets:");
                for name in presets {
                    println!("  {name}");
                }
            }
        }
        Command::Render {
            preset,
            width,
            height,
            seed,
            params,
            output,
            cache_dir,
            save_seed: seed_path,
        } => {
            let mut texture_seed = TextureSeed::new(&preset, width, height, seed);
            texture_seed.params = parse_params(&params)?;

            let image = render_seed(&texture_seed, cache_dir.as_deref())?;
            texgen_presets::snapshot::write_png(&image, &output)?;
            if let Some(path) = seed_path {
                save_seed(&texture_seed, &path)?;
            }
            report(&texture_seed, &output, cli.json)?;
        }
        Command::Replay {
            seed_file,
            output,
            cache_dir,
        } => {
            let texture_seed = load_seed(&seed_file)?;
            let image = render_seed(&texture_seed, cache_dir.as_deref())?;
            texgen_presets::snapshot::write_png(&image, &output)?;
            report(&texture_seed, &output, cli.json)?;
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_render_defaults() {
        let cli = Cli::try_parse_from(["texgen", "render", "clouds"]).unwrap();
        match cli.command {
            Command::Render {
                preset,
                width,
                height,
                seed,
                output,
                cache_dir,
                ..
            } => {
                assert_eq!(preset, "clouds");
                assert_eq!((width, height, seed), (256, 256, 42));
                assert_eq!(output, PathBuf::from("output.png"));
                assert!(cache_dir.is_none());
            }
            _ => panic!("expected render"),
        }
        assert!(!cli.json);
    }

    #[test]
    fn json_flag_is_global() {
        let cli = Cli::try_parse_from(["texgen", "list", "--json"]).unwrap();
        assert!(cli.json);
    }

    #[test]
    fn params_must_be_a_json_object() {
        assert!(parse_params(r#"{"scale": 2}"#).is_ok());
        assert_eq!(parse_params("[1, 2]").err().map(|e| e.exit_code()), Some(12));
        assert_eq!(parse_params("{oops").err().map(|e| e.exit_code()), Some(12));
    }

    #[test]
    fn unknown_preset_exits_with_texture_code() {
        let seed = TextureSeed::new("marble", 8, 8, 1);
        let err = render_seed(&seed, None).err().unwrap();
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn saved_seed_replays_identically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        let mut seed = TextureSeed::new("clouds", 24, 16, 7);
        seed.params = serde_json::json!({"scale": 0.5});

        save_seed(&seed, &path).unwrap();
        let loaded = load_seed(&path).unwrap();
        assert_eq!(loaded, seed);
        assert_eq!(
            render_seed(&loaded, None).unwrap(),
            render_seed(&seed, None).unwrap()
        );
    }

    #[test]
    fn cache_dir_is_populated_and_reused() {
        let dir = tempfile::tempdir().unwrap();
        let seed = TextureSeed::new("cellular", 16, 16, 3);
        let first = render_seed(&seed, Some(dir.path())).unwrap();
        let cached = PngDirCache::new(dir.path()).path_for(&seed.cache_id());
        assert!(cached.is_file());
        assert_eq!(render_seed(&seed, Some(dir.path())).unwrap(), first);
    }

    #[test]
    fn malformed_seed_file_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        fs::write(&path, "{\"preset\": 3}").unwrap();
        assert_eq!(load_seed(&path).err().map(|e| e.exit_code()), Some(12));
        assert_eq!(
            load_seed(&dir.path().join("missing.json"))
                .err()
                .map(|e| e.exit_code()),
            Some(11)
        );
    }
}
