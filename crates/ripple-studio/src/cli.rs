use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use ripple_engine::sim::SimulationParameters;
use ripple_engine::water::BackendKind;

/// Interactive height-field water surface.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// JSON file with simulation parameters; flags below override it
    #[arg(long, value_name = "JSON")]
    pub params: Option<PathBuf>,

    /// Cells per side of the height field
    #[arg(long)]
    pub resolution: Option<u32>,

    /// Radius of the pointer depression, world units
    #[arg(long)]
    pub mouse_size: Option<f32>,

    /// Depth of the pointer depression
    #[arg(long)]
    pub depth: Option<f32>,

    /// Damping factor per step, in (0, 1]
    #[arg(long)]
    pub viscosity: Option<f32>,

    /// Smooth the field every N steps
    #[arg(long, value_name = "N")]
    pub smoothing: Option<u32>,

    /// Step the simulation every N rendered frames
    #[arg(long, value_name = "N")]
    pub frame_skip: Option<u32>,

    /// Seed for the initial noise
    #[arg(long)]
    pub seed: Option<u64>,

    /// Simulation backend: auto, gpu, cpu or static
    #[arg(long, default_value_t = BackendKind::Auto)]
    pub backend: BackendKind,

    /// Log filter in env_logger syntax (defaults to RUST_LOG, then info)
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,
}

impl Cli {
    /// Parameters from the JSON file (or defaults) with flag overrides applied.
    pub fn simulation_parameters(&self) -> Result<SimulationParameters> {
        let mut params = match &self.params {
            Some(path) => load_params(path)?,
            None => SimulationParameters::default(),
        };

        if let Some(v) = self.resolution {
            params.resolution = v;
        }
        if let Some(v) = self.mouse_size {
            params.mouse_size = v;
        }
        if let Some(v) = self.depth {
            params.depth = v;
        }
        if let Some(v) = self.viscosity {
            params.viscosity = v;
        }
        if let Some(v) = self.smoothing {
            params.smoothing = Some(v);
        }
        if let Some(v) = self.frame_skip {
            params.frame_skip = v;
        }
        if let Some(v) = self.seed {
            params.seed = Some(v);
        }

        params.validate().context("invalid simulation parameters")?;
        Ok(params)
    }
}

fn load_params(path: &PathBuf) -> Result<SimulationParameters> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read parameter file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse parameter file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("ripple-studio").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn no_flags_gives_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.backend, BackendKind::Auto);
        assert_eq!(cli.simulation_parameters().unwrap(), SimulationParameters::default());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&[
            "--resolution", "64",
            "--viscosity", "0.9",
            "--smoothing", "3",
            "--seed", "42",
            "--backend", "cpu",
        ]);
        let p = cli.simulation_parameters().unwrap();
        assert_eq!(p.resolution, 64);
        assert_eq!(p.viscosity, 0.9);
        assert_eq!(p.smoothing, Some(3));
        assert_eq!(p.seed, Some(42));
        assert_eq!(cli.backend, BackendKind::Cpu);
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let res = Cli::try_parse_from(["ripple-studio", "--backend", "opengl"]);
        assert!(res.is_err());
    }

    #[test]
    fn invalid_values_fail_validation() {
        let cli = parse(&["--viscosity", "1.5"]);
        assert!(cli.simulation_parameters().is_err());
    }

    #[test]
    fn file_is_applied_before_flags() {
        let path = std::env::temp_dir().join(format!("ripple-params-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "resolution": 32, "depth": 0.01, "stencil": "diffuse" }"#).unwrap();

        let cli = parse(&["--params", path.to_str().unwrap(), "--depth", "0.02"]);
        let p = cli.simulation_parameters().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(p.resolution, 32);
        assert_eq!(p.depth, 0.02);
        assert_eq!(p.stencil, ripple_engine::sim::StencilKind::Diffuse);
    }

    #[test]
    fn missing_file_reports_path() {
        let cli = parse(&["--params", "/nonexistent/ripple.json"]);
        let err = cli.simulation_parameters().unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/ripple.json"));
    }
}
