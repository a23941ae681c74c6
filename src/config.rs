//! Application configuration
//!
//! Loaded from a TOML file. Every key is optional; missing keys and a missing
//! file fall back to the wiring and timings of the reference bench setup
//! (BTS7960 on BCM 12/13 with enables on 17/27).
//!
//! ```toml
//! [pins]
//! lpwm = 12
//! rpwm = 13
//!
//! [cycle]
//! accel_s = 5.0
//!
//! [menu]
//! zero_step = "skip"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use motor_ramp_core::ramp::ZeroStepPolicy;
use serde::{Deserialize, Serialize};

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Zero-step ramp behaviour as written in the config file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ZeroStepSetting {
    /// Equal endpoints leave the output untouched
    Skip,
    /// Equal endpoints write the end value once
    Apply,
}

impl From<ZeroStepSetting> for ZeroStepPolicy {
    fn from(setting: ZeroStepSetting) -> Self {
        match setting {
            ZeroStepSetting::Skip => ZeroStepPolicy::Skip,
            ZeroStepSetting::Apply => ZeroStepPolicy::Apply,
        }
    }
}

/// BCM pin numbers of the BTS7960 inputs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PinConfig {
    #[serde(default = "PinConfig::default_lpwm")]
    pub lpwm: u8,
    #[serde(default = "PinConfig::default_rpwm")]
    pub rpwm: u8,
    #[serde(default = "PinConfig::default_l_en")]
    pub l_en: u8,
    #[serde(default = "PinConfig::default_r_en")]
    pub r_en: u8,
}

impl PinConfig {
    fn default_lpwm() -> u8 {
        12
    }
    fn default_rpwm() -> u8 {
        13
    }
    fn default_l_en() -> u8 {
        17
    }
    fn default_r_en() -> u8 {
        27
    }
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            lpwm: Self::default_lpwm(),
            rpwm: Self::default_rpwm(),
            l_en: Self::default_l_en(),
            r_en: Self::default_r_en(),
        }
    }
}

/// PWM signal settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PwmSettings {
    #[serde(default = "PwmSettings::default_frequency_hz")]
    pub frequency_hz: f64,
}

impl PwmSettings {
    fn default_frequency_hz() -> f64 {
        100.0
    }
}

impl Default for PwmSettings {
    fn default() -> Self {
        Self {
            frequency_hz: Self::default_frequency_hz(),
        }
    }
}

/// Unattended accelerate / hold / decelerate / rest cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CycleConfig {
    #[serde(default = "CycleConfig::default_start_percent")]
    pub start_percent: i32,
    #[serde(default = "CycleConfig::default_peak_percent")]
    pub peak_percent: i32,
    #[serde(default = "CycleConfig::default_end_percent")]
    pub end_percent: i32,
    #[serde(default = "CycleConfig::default_phase_s")]
    pub accel_s: f64,
    #[serde(default = "CycleConfig::default_phase_s")]
    pub hold_s: f64,
    #[serde(default = "CycleConfig::default_phase_s")]
    pub decel_s: f64,
    #[serde(default = "CycleConfig::default_rest_s")]
    pub rest_s: f64,
    #[serde(default = "CycleConfig::default_zero_step")]
    pub zero_step: ZeroStepSetting,
}

impl CycleConfig {
    fn default_start_percent() -> i32 {
        30
    }
    fn default_peak_percent() -> i32 {
        100
    }
    fn default_end_percent() -> i32 {
        0
    }
    fn default_phase_s() -> f64 {
        10.0
    }
    fn default_rest_s() -> f64 {
        3.0
    }
    fn default_zero_step() -> ZeroStepSetting {
        ZeroStepSetting::Skip
    }
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            start_percent: Self::default_start_percent(),
            peak_percent: Self::default_peak_percent(),
            end_percent: Self::default_end_percent(),
            accel_s: Self::default_phase_s(),
            hold_s: Self::default_phase_s(),
            decel_s: Self::default_phase_s(),
            rest_s: Self::default_rest_s(),
            zero_step: Self::default_zero_step(),
        }
    }
}

/// Interactive menu actions and behaviour.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MenuConfig {
    #[serde(default = "MenuConfig::default_start_percent")]
    pub start_percent: i32,
    #[serde(default = "MenuConfig::default_end_percent")]
    pub end_percent: i32,
    #[serde(default = "MenuConfig::default_ramp_s")]
    pub ramp_s: f64,
    #[serde(default = "MenuConfig::default_fast_ramp_s")]
    pub fast_ramp_s: f64,
    #[serde(default = "MenuConfig::default_invalid_pause_s")]
    pub invalid_pause_s: f64,
    #[serde(default = "MenuConfig::default_clear_screen")]
    pub clear_screen: bool,
    #[serde(default = "MenuConfig::default_zero_step")]
    pub zero_step: ZeroStepSetting,
}

impl MenuConfig {
    fn default_start_percent() -> i32 {
        30
    }
    fn default_end_percent() -> i32 {
        100
    }
    fn default_ramp_s() -> f64 {
        3.0
    }
    fn default_fast_ramp_s() -> f64 {
        1.0
    }
    fn default_invalid_pause_s() -> f64 {
        1.0
    }
    fn default_clear_screen() -> bool {
        true
    }
    fn default_zero_step() -> ZeroStepSetting {
        ZeroStepSetting::Apply
    }
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            start_percent: Self::default_start_percent(),
            end_percent: Self::default_end_percent(),
            ramp_s: Self::default_ramp_s(),
            fast_ramp_s: Self::default_fast_ramp_s(),
            invalid_pause_s: Self::default_invalid_pause_s(),
            clear_screen: Self::default_clear_screen(),
            zero_step: Self::default_zero_step(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub pins: PinConfig,
    #[serde(default)]
    pub pwm: PwmSettings,
    #[serde(default)]
    pub cycle: CycleConfig,
    #[serde(default)]
    pub menu: MenuConfig,
}

impl AppConfig {
    /// Load `path`, or defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            crate::log_debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        crate::log_info!("Loaded config from {}", path.display());
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_path(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!(
            "motor_ramp_config_test_{}_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos(),
            name
        ));
        p
    }

    #[test]
    fn defaults_match_bench_wiring() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.pins.lpwm, 12);
        assert_eq!(cfg.pins.rpwm, 13);
        assert_eq!(cfg.pins.l_en, 17);
        assert_eq!(cfg.pins.r_en, 27);
        assert_eq!(cfg.pwm.frequency_hz, 100.0);

        assert_eq!(cfg.cycle.start_percent, 30);
        assert_eq!(cfg.cycle.peak_percent, 100);
        assert_eq!(cfg.cycle.end_percent, 0);
        assert_eq!(cfg.cycle.accel_s, 10.0);
        assert_eq!(cfg.cycle.hold_s, 10.0);
        assert_eq!(cfg.cycle.decel_s, 10.0);
        assert_eq!(cfg.cycle.rest_s, 3.0);
        assert_eq!(cfg.cycle.zero_step, ZeroStepSetting::Skip);

        assert_eq!(cfg.menu.ramp_s, 3.0);
        assert_eq!(cfg.menu.fast_ramp_s, 1.0);
        assert_eq!(cfg.menu.invalid_pause_s, 1.0);
        assert!(cfg.menu.clear_screen);
        assert_eq!(cfg.menu.zero_step, ZeroStepSetting::Apply);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = unique_path("missing.toml");
        let cfg = AppConfig::load_or_default(&path).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert!(!path.exists(), "loading must not create the file");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let path = unique_path("partial.toml");
        fs::write(
            &path,
            "[pins]\nlpwm = 18\n\n[cycle]\naccel_s = 5.0\n\n[menu]\nzero_step = \"skip\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load_or_default(&path).unwrap();
        assert_eq!(cfg.pins.lpwm, 18);
        assert_eq!(cfg.pins.rpwm, 13);
        assert_eq!(cfg.cycle.accel_s, 5.0);
        assert_eq!(cfg.cycle.hold_s, 10.0);
        assert_eq!(cfg.menu.zero_step, ZeroStepSetting::Skip);
        assert_eq!(cfg.menu.ramp_s, 3.0);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn round_trips_through_toml() {
        let path = unique_path("custom.toml");
        let mut custom = AppConfig::default();
        custom.pwm.frequency_hz = 1000.0;
        custom.menu.clear_screen = false;
        fs::write(&path, toml::to_string_pretty(&custom).unwrap()).unwrap();

        let cfg = AppConfig::load_or_default(&path).unwrap();
        assert_eq!(cfg, custom);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let path = unique_path("broken.toml");
        fs::write(&path, "[pins]\nlpwm = \"twelve\"\n").unwrap();

        let err = AppConfig::load_or_default(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("failed to parse config"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn zero_step_setting_converts() {
        assert_eq!(
            ZeroStepPolicy::from(ZeroStepSetting::Skip),
            ZeroStepPolicy::Skip
        );
        assert_eq!(
            ZeroStepPolicy::from(ZeroStepSetting::Apply),
            ZeroStepPolicy::Apply
        );
    }
}
