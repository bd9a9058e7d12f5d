//! Laser source parameters.

use ld_core::units::{Frequency, Length, Power, hz, mm, nm, w};
use serde::{Deserialize, Serialize};

use crate::{ConfigResult, require_non_negative, require_positive};

/// Pulse duration marking a continuous-wave source.
pub const CONTINUOUS_WAVE: f64 = f64::MAX;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BeamProfile {
    #[default]
    Gaussian,
    #[serde(alias = "flat-top", alias = "flattop")]
    FlatTop,
    Annular,
}

impl BeamProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            BeamProfile::Gaussian => "gaussian",
            BeamProfile::FlatTop => "flat_top",
            BeamProfile::Annular => "annular",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LaserConfiguration {
    pub power_w: f64,
    pub wavelength_nm: f64,
    pub beam_diameter_mm: f64,
    #[serde(default = "default_pulse_duration")]
    pub pulse_duration_s: f64,
    #[serde(default = "default_repetition_rate")]
    pub repetition_rate_hz: f64,
    #[serde(default)]
    pub beam_profile: BeamProfile,
    #[serde(default)]
    pub divergence_mrad: f64,
}

fn default_pulse_duration() -> f64 {
    1e-3
}

fn default_repetition_rate() -> f64 {
    1.0
}

impl LaserConfiguration {
    /// Pulsed gaussian source with default timing.
    pub fn new(power_w: f64, wavelength_nm: f64, beam_diameter_mm: f64) -> Self {
        Self {
            power_w,
            wavelength_nm,
            beam_diameter_mm,
            pulse_duration_s: default_pulse_duration(),
            repetition_rate_hz: default_repetition_rate(),
            beam_profile: BeamProfile::Gaussian,
            divergence_mrad: 0.0,
        }
    }

    pub fn continuous_wave(mut self) -> Self {
        self.pulse_duration_s = CONTINUOUS_WAVE;
        self
    }

    pub fn with_profile(mut self, profile: BeamProfile) -> Self {
        self.beam_profile = profile;
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        require_positive("laser.power_w", self.power_w)?;
        require_positive("laser.wavelength_nm", self.wavelength_nm)?;
        require_positive("laser.beam_diameter_mm", self.beam_diameter_mm)?;
        require_positive("laser.pulse_duration_s", self.pulse_duration_s)?;
        require_non_negative("laser.repetition_rate_hz", self.repetition_rate_hz)?;
        require_non_negative("laser.divergence_mrad", self.divergence_mrad)?;
        Ok(())
    }

    pub fn is_continuous_wave(&self) -> bool {
        self.pulse_duration_s == CONTINUOUS_WAVE
    }

    pub fn power(&self) -> Power {
        w(self.power_w)
    }

    pub fn wavelength(&self) -> Length {
        nm(self.wavelength_nm)
    }

    pub fn beam_diameter(&self) -> Length {
        mm(self.beam_diameter_mm)
    }

    pub fn repetition_rate(&self) -> Frequency {
        hz(self.repetition_rate_hz)
    }

    /// Mean irradiance over the beam spot in W/m^2.
    pub fn power_density_w_per_m2(&self) -> f64 {
        use uom::si::length::meter;
        let radius = self.beam_diameter().get::<meter>() / 2.0;
        self.power_w / (std::f64::consts::PI * radius * radius)
    }

    /// Fraction of time the source emits. Continuous-wave sources report 1,
    /// pulse trains longer than their period are clamped to 1.
    pub fn duty_cycle(&self) -> f64 {
        if self.is_continuous_wave() {
            1.0
        } else {
            (self.pulse_duration_s * self.repetition_rate_hz).min(1.0)
        }
    }

    /// Energy delivered by a single pulse, `None` for continuous-wave.
    pub fn energy_per_pulse_j(&self) -> Option<f64> {
        if self.is_continuous_wave() {
            None
        } else {
            Some(self.power_w * self.pulse_duration_s)
        }
    }
}
