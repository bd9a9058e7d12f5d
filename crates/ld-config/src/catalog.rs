//! Built-in material presets.
//!
//! Values are handbook room-temperature properties for common airframe
//! materials. Names are matched case-insensitively with `-`, `_` and spaces
//! treated alike.

use crate::{ConfigError, ConfigResult, MaterialConfiguration};

struct Preset {
    key: &'static str,
    name: &'static str,
    k: f64,
    cp: f64,
    rho: f64,
    melt_k: f64,
    absorption: f64,
    e: f64,
    nu: f64,
    alpha: f64,
    yield_pa: f64,
}

const PRESETS: &[Preset] = &[
    Preset {
        key: "aluminum_6061",
        name: "Aluminum 6061-T6",
        k: 167.0,
        cp: 896.0,
        rho: 2700.0,
        melt_k: 933.0,
        absorption: 0.15,
        e: 70e9,
        nu: 0.33,
        alpha: 23e-6,
        yield_pa: 276e6,
    },
    Preset {
        key: "aluminum_2024_t3",
        name: "Aluminum 2024-T3",
        k: 121.0,
        cp: 875.0,
        rho: 2780.0,
        melt_k: 916.0,
        absorption: 0.15,
        e: 73.1e9,
        nu: 0.33,
        alpha: 22.3e-6,
        yield_pa: 324e6,
    },
    Preset {
        key: "ti_6al_4v",
        name: "Ti-6Al-4V",
        k: 6.7,
        cp: 526.0,
        rho: 4430.0,
        melt_k: 1933.0,
        absorption: 0.25,
        e: 113.8e9,
        nu: 0.342,
        alpha: 8.6e-6,
        yield_pa: 880e6,
    },
    Preset {
        key: "carbon_fiber",
        name: "Carbon Fiber Composite",
        k: 0.87,
        cp: 1050.0,
        rho: 1600.0,
        melt_k: 3773.0,
        absorption: 0.95,
        e: 181e9,
        nu: 0.28,
        alpha: 0.02e-6,
        yield_pa: 1500e6,
    },
];

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Preset keys in catalog order.
pub fn names() -> Vec<&'static str> {
    PRESETS.iter().map(|p| p.key).collect()
}

pub fn lookup(name: &str) -> ConfigResult<MaterialConfiguration> {
    let wanted = normalize(name);
    let preset = PRESETS
        .iter()
        .find(|p| p.key == wanted || normalize(p.name) == wanted)
        .ok_or_else(|| ConfigError::UnknownMaterial {
            name: name.to_string(),
        })?;

    Ok(MaterialConfiguration {
        name: preset.name.to_string(),
        thermal_conductivity: preset.k,
        specific_heat: preset.cp,
        density: preset.rho,
        melting_point: preset.melt_k,
        absorption_coefficient: preset.absorption,
        youngs_modulus: Some(preset.e),
        poissons_ratio: Some(preset.nu),
        thermal_expansion: Some(preset.alpha),
        yield_strength: Some(preset.yield_pa),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_validates() {
        for name in names() {
            let m = lookup(name).unwrap();
            m.validate().unwrap();
        }
    }

    #[test]
    fn lookup_is_forgiving_about_separators() {
        let a = lookup("Ti-6Al-4V").unwrap();
        let b = lookup("ti_6al_4v").unwrap();
        assert_eq!(a, b);
        assert_eq!(lookup("Aluminum 2024-T3").unwrap().melting_point, 916.0);
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let err = lookup("unobtainium").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownMaterial { .. }));
    }
}
