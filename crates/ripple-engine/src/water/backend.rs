use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::sim::SimError;

/// Simulation backend requested for a `WaterEffect`.
///
/// Resolved at construction into an [`ActiveBackend`] through `candidates`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Compute shaders when the adapter supports them, otherwise the CPU.
    #[default]
    Auto,
    /// Compute shaders.
    Gpu,
    /// CPU stencil, uploaded to the render texture after each step.
    Cpu,
    /// Flat, motionless surface.
    Static,
}

impl BackendKind {
    /// Backends to try, in order. The chain always ends in `Static`, which
    /// cannot fail.
    pub fn candidates(self) -> &'static [ActiveBackend] {
        match self {
            BackendKind::Auto | BackendKind::Gpu => {
                &[ActiveBackend::Gpu, ActiveBackend::Cpu, ActiveBackend::Static]
            }
            BackendKind::Cpu => &[ActiveBackend::Cpu, ActiveBackend::Static],
            BackendKind::Static => &[ActiveBackend::Static],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Auto => "auto",
            BackendKind::Gpu => "gpu",
            BackendKind::Cpu => "cpu",
            BackendKind::Static => "static",
        }
    }
}

/// Backend a `WaterEffect` actually runs on.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ActiveBackend {
    Gpu,
    Cpu,
    Static,
}

impl ActiveBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            ActiveBackend::Gpu => "gpu",
            ActiveBackend::Cpu => "cpu",
            ActiveBackend::Static => "static",
        }
    }
}

impl fmt::Display for ActiveBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(BackendKind::Auto),
            "gpu" => Ok(BackendKind::Gpu),
            "cpu" => Ok(BackendKind::Cpu),
            "static" | "none" => Ok(BackendKind::Static),
            _ => Err(SimError::UnknownBackend(s.to_string())),
        }
    }
}

/// Seed for the initial noise: the configured one, else fresh entropy.
pub fn resolve_seed(configured: Option<u64>) -> u64 {
    configured.unwrap_or_else(rand::random)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("GPU".parse::<BackendKind>().unwrap(), BackendKind::Gpu);
        assert_eq!(" cpu ".parse::<BackendKind>().unwrap(), BackendKind::Cpu);
        assert_eq!("none".parse::<BackendKind>().unwrap(), BackendKind::Static);
        assert_eq!(
            "vulkan".parse::<BackendKind>().unwrap_err(),
            SimError::UnknownBackend("vulkan".into())
        );
    }

    #[test]
    fn display_round_trips() {
        for kind in [BackendKind::Auto, BackendKind::Gpu, BackendKind::Cpu, BackendKind::Static] {
            assert_eq!(kind.to_string().parse::<BackendKind>().unwrap(), kind);
        }
    }

    #[test]
    fn every_request_ends_in_static() {
        use ActiveBackend::{Cpu, Gpu, Static};
        assert_eq!(BackendKind::Auto.candidates(), &[Gpu, Cpu, Static]);
        assert_eq!(BackendKind::Gpu.candidates(), &[Gpu, Cpu, Static]);
        assert_eq!(BackendKind::Cpu.candidates(), &[Cpu, Static]);
        assert_eq!(BackendKind::Static.candidates(), &[Static]);
    }

    #[test]
    fn active_backend_names_match_requests() {
        for active in [ActiveBackend::Gpu, ActiveBackend::Cpu, ActiveBackend::Static] {
            let requested: BackendKind = active.to_string().parse().unwrap();
            assert_eq!(requested.candidates()[0], active);
        }
    }

    #[test]
    fn configured_seed_wins() {
        assert_eq!(resolve_seed(Some(7)), 7);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&BackendKind::Static).unwrap(), "\"static\"");
        let k: BackendKind = serde_json::from_str("\"gpu\"").unwrap();
        assert_eq!(k, BackendKind::Gpu);
    }
}
