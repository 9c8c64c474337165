//! Demo configuration loaded from RON.
//!
//! The default configuration is embedded at compile time from
//! `assets/demo.ron`. A different file can be supplied with
//! [`DemoConfig::load`] or through the `PHOENIX_DEMO_CONFIG` environment
//! variable.

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use phoenix_core::booking::BookingScript;
use phoenix_core::cart::Product;
use phoenix_core::clock::Millis;
use phoenix_core::placement::CanvasRect;
use phoenix_core::stage::{StageDescriptor, StagePlan};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DemoError;
use crate::module::ModuleId;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "PHOENIX_DEMO_CONFIG";

const DEFAULT_CONFIG: &str = include_str!("../assets/demo.ron");

/// Top-level demo configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    pub default_module: ModuleId,
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
    pub pos: PosConfig,
    pub audit: AuditConfig,
    pub bookings: BookingsConfig,
    pub cameras: CamerasConfig,
    pub fiscal: FiscalConfig,
    pub contact: ContactConfig,
}

fn default_event_capacity() -> usize {
    256
}

/// How the point of sale completes a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutMode {
    Instant,
    Delayed { delay_ms: Millis },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PosConfig {
    pub catalog: Vec<Product>,
    pub checkout: CheckoutMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    pub scan_label: String,
    pub scan_step: u8,
    pub scan_tick_ms: Millis,
    pub report: String,
    pub report_char_ms: Millis,
}

impl AuditConfig {
    pub fn scan_plan(&self) -> StagePlan {
        StagePlan::Percent {
            label: self.scan_label.clone(),
            step: self.scan_step,
            tick_ms: self.scan_tick_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingsConfig {
    pub calendar_days: u8,
    #[serde(default)]
    pub pre_blocked: Vec<u8>,
    pub script: BookingScript,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CamerasConfig {
    pub canvas: CanvasRect,
    #[serde(default = "default_rotation_step")]
    pub rotation_step: u16,
    #[serde(default = "default_hit_radius")]
    pub hit_radius: f32,
}

fn default_rotation_step() -> u16 {
    45
}

fn default_hit_radius() -> f32 {
    16.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiscalConfig {
    pub stages: Vec<StageDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    pub phone: String,
    pub message: String,
}

impl DemoConfig {
    /// The configuration compiled into the crate.
    pub fn embedded() -> Result<Self, DemoError> {
        Self::from_ron_str(DEFAULT_CONFIG, Path::new("assets/demo.ron"))
    }

    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self, DemoError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron_str(&content, path)
    }

    /// Use the file named by `PHOENIX_DEMO_CONFIG`, else the embedded default.
    pub fn from_env() -> Result<Self, DemoError> {
        Self::from_env_var(std::env::var_os(CONFIG_ENV))
    }

    /// `from_env` with the variable's value passed in.
    pub fn from_env_var(value: Option<OsString>) -> Result<Self, DemoError> {
        match value {
            Some(path) => {
                let path = PathBuf::from(path);
                debug!(path = %path.display(), "loading demo config from environment");
                Self::load(&path)
            }
            None => Self::embedded(),
        }
    }

    /// Parse and validate RON text. `origin` is only used in errors.
    pub fn from_ron_str(content: &str, origin: &Path) -> Result<Self, DemoError> {
        let config: DemoConfig = ron::from_str(content).map_err(|e| DemoError::Parse {
            file: origin.to_path_buf(),
            detail: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field consistency.
    pub fn validate(&self) -> Result<(), DemoError> {
        let mut seen = HashSet::new();
        for product in &self.pos.catalog {
            if !seen.insert(product.id) {
                return Err(invalid(format!("duplicate product id {:?}", product.id)));
            }
        }

        let days = self.bookings.calendar_days;
        let out_of_range = self
            .bookings
            .pre_blocked
            .iter()
            .chain(&self.bookings.script.days_to_block)
            .find(|&&d| d == 0 || d > days);
        if let Some(day) = out_of_range {
            return Err(invalid(format!(
                "booking day {day} outside calendar of {days} days"
            )));
        }

        let canvas = &self.cameras.canvas;
        if !(canvas.width > 0.0 && canvas.height > 0.0) {
            return Err(invalid("camera canvas must have positive size".to_string()));
        }
        if self.cameras.rotation_step % 360 == 0 {
            return Err(invalid(format!(
                "rotation_step {} is a whole turn",
                self.cameras.rotation_step
            )));
        }

        if self.event_capacity == 0 {
            return Err(invalid("event_capacity must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn invalid(detail: String) -> DemoError {
    DemoError::InvalidConfig { detail }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_is_valid() {
        let config = DemoConfig::embedded().unwrap();
        assert_eq!(config.default_module, ModuleId::Pos);
        assert!(!config.pos.catalog.is_empty());
        assert!(!config.fiscal.stages.is_empty());
        assert_eq!(config.cameras.rotation_step, 45);
    }

    #[test]
    fn duplicate_products_are_rejected() {
        let mut config = DemoConfig::embedded().unwrap();
        let first = config.pos.catalog[0].clone();
        config.pos.catalog.push(first);
        assert!(matches!(
            config.validate(),
            Err(DemoError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn booking_days_must_fit_calendar() {
        let mut config = DemoConfig::embedded().unwrap();
        config.bookings.script.days_to_block.push(40);
        assert!(matches!(
            config.validate(),
            Err(DemoError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn nan_canvas_is_rejected() {
        let mut config = DemoConfig::embedded().unwrap();
        config.cameras.canvas.width = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(DemoError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn whole_turn_rotation_step_is_rejected() {
        for step in [0, 360, 720] {
            let mut config = DemoConfig::embedded().unwrap();
            config.cameras.rotation_step = step;
            assert!(
                matches!(config.validate(), Err(DemoError::InvalidConfig { .. })),
                "step {step} accepted"
            );
        }
        let mut config = DemoConfig::embedded().unwrap();
        config.cameras.rotation_step = 90;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unset_env_var_uses_embedded() {
        let config = DemoConfig::from_env_var(None).unwrap();
        let embedded = DemoConfig::embedded().unwrap();
        assert_eq!(config.default_module, embedded.default_module);
        assert_eq!(config.pos.catalog.len(), embedded.pos.catalog.len());
        assert_eq!(config.event_capacity, embedded.event_capacity);
    }

    #[test]
    fn env_var_names_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/demo.ron");
        let config = DemoConfig::from_env_var(Some(path.into_os_string())).unwrap();
        assert_eq!(config.default_module, ModuleId::Pos);

        let err = DemoConfig::from_env_var(Some("/definitely/not/here.ron".into())).unwrap_err();
        assert!(matches!(err, DemoError::Io(_)));
    }

    #[test]
    fn parse_error_names_origin() {
        let err = DemoConfig::from_ron_str("(nope", Path::new("custom.ron")).unwrap_err();
        match err {
            DemoError::Parse { file, .. } => assert_eq!(file, PathBuf::from("custom.ron")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = DemoConfig::load(Path::new("/definitely/not/here.ron")).unwrap_err();
        assert!(matches!(err, DemoError::Io(_)));
    }

    #[test]
    fn audit_plan_uses_percent_runner() {
        let config = DemoConfig::embedded().unwrap();
        assert!(matches!(config.audit.scan_plan(), StagePlan::Percent { .. }));
    }
}
