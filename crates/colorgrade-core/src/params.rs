//! Grading parameters and the setting keys they are read from.

use crate::settings::Settings;

pub mod keys {
    pub const LIFT_RED: &str = "Filter.ColorGrade.Lift.Red";
    pub const LIFT_GREEN: &str = "Filter.ColorGrade.Lift.Green";
    pub const LIFT_BLUE: &str = "Filter.ColorGrade.Lift.Blue";
    pub const LIFT_ALL: &str = "Filter.ColorGrade.Lift.All";

    pub const GAMMA_RED: &str = "Filter.ColorGrade.Gamma.Red";
    pub const GAMMA_GREEN: &str = "Filter.ColorGrade.Gamma.Green";
    pub const GAMMA_BLUE: &str = "Filter.ColorGrade.Gamma.Blue";
    pub const GAMMA_ALL: &str = "Filter.ColorGrade.Gamma.All";

    pub const GAIN_RED: &str = "Filter.ColorGrade.Gain.Red";
    pub const GAIN_GREEN: &str = "Filter.ColorGrade.Gain.Green";
    pub const GAIN_BLUE: &str = "Filter.ColorGrade.Gain.Blue";
    pub const GAIN_ALL: &str = "Filter.ColorGrade.Gain.All";

    pub const OFFSET_RED: &str = "Filter.ColorGrade.Offset.Red";
    pub const OFFSET_GREEN: &str = "Filter.ColorGrade.Offset.Green";
    pub const OFFSET_BLUE: &str = "Filter.ColorGrade.Offset.Blue";
    pub const OFFSET_ALL: &str = "Filter.ColorGrade.Offset.All";

    pub const TINT_SHADOW_RED: &str = "Filter.ColorGrade.Tint.Shadow.Red";
    pub const TINT_SHADOW_GREEN: &str = "Filter.ColorGrade.Tint.Shadow.Green";
    pub const TINT_SHADOW_BLUE: &str = "Filter.ColorGrade.Tint.Shadow.Blue";
    pub const TINT_MIDTONE_RED: &str = "Filter.ColorGrade.Tint.Midtone.Red";
    pub const TINT_MIDTONE_GREEN: &str = "Filter.ColorGrade.Tint.Midtone.Green";
    pub const TINT_MIDTONE_BLUE: &str = "Filter.ColorGrade.Tint.Midtone.Blue";
    pub const TINT_HIGHLIGHT_RED: &str = "Filter.ColorGrade.Tint.Highlight.Red";
    pub const TINT_HIGHLIGHT_GREEN: &str = "Filter.ColorGrade.Tint.Highlight.Green";
    pub const TINT_HIGHLIGHT_BLUE: &str = "Filter.ColorGrade.Tint.Highlight.Blue";

    pub const CORRECTION_HUE: &str = "Filter.ColorGrade.Correction.Hue";
    pub const CORRECTION_SATURATION: &str = "Filter.ColorGrade.Correction.Saturation";
    pub const CORRECTION_LIGHTNESS: &str = "Filter.ColorGrade.Correction.Lightness";
    pub const CORRECTION_CONTRAST: &str = "Filter.ColorGrade.Correction.Contrast";

    pub const LIFT: [&str; 4] = [LIFT_RED, LIFT_GREEN, LIFT_BLUE, LIFT_ALL];
    pub const GAMMA: [&str; 4] = [GAMMA_RED, GAMMA_GREEN, GAMMA_BLUE, GAMMA_ALL];
    pub const GAIN: [&str; 4] = [GAIN_RED, GAIN_GREEN, GAIN_BLUE, GAIN_ALL];
    pub const OFFSET: [&str; 4] = [OFFSET_RED, OFFSET_GREEN, OFFSET_BLUE, OFFSET_ALL];
    pub const TINT_SHADOW: [&str; 3] = [TINT_SHADOW_RED, TINT_SHADOW_GREEN, TINT_SHADOW_BLUE];
    pub const TINT_MIDTONE: [&str; 3] = [TINT_MIDTONE_RED, TINT_MIDTONE_GREEN, TINT_MIDTONE_BLUE];
    pub const TINT_HIGHLIGHT: [&str; 3] =
        [TINT_HIGHLIGHT_RED, TINT_HIGHLIGHT_GREEN, TINT_HIGHLIGHT_BLUE];
    pub const CORRECTION: [&str; 4] = [
        CORRECTION_HUE,
        CORRECTION_SATURATION,
        CORRECTION_LIGHTNESS,
        CORRECTION_CONTRAST,
    ];
}

/// Neutral value of every setting, for the host's defaults callback.
pub const DEFAULTS: &[(&str, f64)] = &[
    (keys::LIFT_RED, 0.0),
    (keys::LIFT_GREEN, 0.0),
    (keys::LIFT_BLUE, 0.0),
    (keys::LIFT_ALL, 0.0),
    (keys::GAMMA_RED, 0.0),
    (keys::GAMMA_GREEN, 0.0),
    (keys::GAMMA_BLUE, 0.0),
    (keys::GAMMA_ALL, 0.0),
    (keys::GAIN_RED, 100.0),
    (keys::GAIN_GREEN, 100.0),
    (keys::GAIN_BLUE, 100.0),
    (keys::GAIN_ALL, 100.0),
    (keys::OFFSET_RED, 0.0),
    (keys::OFFSET_GREEN, 0.0),
    (keys::OFFSET_BLUE, 0.0),
    (keys::OFFSET_ALL, 0.0),
    (keys::TINT_SHADOW_RED, 100.0),
    (keys::TINT_SHADOW_GREEN, 100.0),
    (keys::TINT_SHADOW_BLUE, 100.0),
    (keys::TINT_MIDTONE_RED, 100.0),
    (keys::TINT_MIDTONE_GREEN, 100.0),
    (keys::TINT_MIDTONE_BLUE, 100.0),
    (keys::TINT_HIGHLIGHT_RED, 100.0),
    (keys::TINT_HIGHLIGHT_GREEN, 100.0),
    (keys::TINT_HIGHLIGHT_BLUE, 100.0),
    (keys::CORRECTION_HUE, 0.0),
    (keys::CORRECTION_SATURATION, 100.0),
    (keys::CORRECTION_LIGHTNESS, 100.0),
    (keys::CORRECTION_CONTRAST, 100.0),
];

/// One slider of the properties UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slider {
    pub key: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderGroup {
    pub id: &'static str,
    pub label: &'static str,
    pub sliders: &'static [Slider],
}

pub const SLIDER_STEP: f64 = 0.01;

const fn slider(key: &'static str, label: &'static str, min: f64, max: f64) -> Slider {
    Slider {
        key,
        label,
        min,
        max,
    }
}

/// The properties UI, one group per grading stage.
pub const GROUPS: &[SliderGroup] = &[
    SliderGroup {
        id: "Filter.ColorGrade.Lift",
        label: "Lift",
        sliders: &[
            slider(keys::LIFT_RED, "Red", -1000.0, 1000.0),
            slider(keys::LIFT_GREEN, "Green", -1000.0, 1000.0),
            slider(keys::LIFT_BLUE, "Blue", -1000.0, 1000.0),
            slider(keys::LIFT_ALL, "All", -1000.0, 1000.0),
        ],
    },
    SliderGroup {
        id: "Filter.ColorGrade.Gamma",
        label: "Gamma",
        sliders: &[
            slider(keys::GAMMA_RED, "Red", -1000.0, 1000.0),
            slider(keys::GAMMA_GREEN, "Green", -1000.0, 1000.0),
            slider(keys::GAMMA_BLUE, "Blue", -1000.0, 1000.0),
            slider(keys::GAMMA_ALL, "All", -1000.0, 1000.0),
        ],
    },
    SliderGroup {
        id: "Filter.ColorGrade.Gain",
        label: "Gain",
        sliders: &[
            slider(keys::GAIN_RED, "Red", 0.01, 1000.0),
            slider(keys::GAIN_GREEN, "Green", 0.01, 1000.0),
            slider(keys::GAIN_BLUE, "Blue", 0.01, 1000.0),
            slider(keys::GAIN_ALL, "All", 0.01, 1000.0),
        ],
    },
    SliderGroup {
        id: "Filter.ColorGrade.Offset",
        label: "Offset",
        sliders: &[
            slider(keys::OFFSET_RED, "Red", -1000.0, 1000.0),
            slider(keys::OFFSET_GREEN, "Green", -1000.0, 1000.0),
            slider(keys::OFFSET_BLUE, "Blue", -1000.0, 1000.0),
            slider(keys::OFFSET_ALL, "All", -1000.0, 1000.0),
        ],
    },
    SliderGroup {
        id: "Filter.ColorGrade.Tint",
        label: "Tint",
        sliders: &[
            slider(keys::TINT_SHADOW_RED, "Shadow Red", 0.0, 1000.0),
            slider(keys::TINT_SHADOW_GREEN, "Shadow Green", 0.0, 1000.0),
            slider(keys::TINT_SHADOW_BLUE, "Shadow Blue", 0.0, 1000.0),
            slider(keys::TINT_MIDTONE_RED, "Midtone Red", 0.0, 1000.0),
            slider(keys::TINT_MIDTONE_GREEN, "Midtone Green", 0.0, 1000.0),
            slider(keys::TINT_MIDTONE_BLUE, "Midtone Blue", 0.0, 1000.0),
            slider(keys::TINT_HIGHLIGHT_RED, "Highlight Red", 0.0, 1000.0),
            slider(keys::TINT_HIGHLIGHT_GREEN, "Highlight Green", 0.0, 1000.0),
            slider(keys::TINT_HIGHLIGHT_BLUE, "Highlight Blue", 0.0, 1000.0),
        ],
    },
    SliderGroup {
        id: "Filter.ColorGrade.Correction",
        label: "Correction",
        sliders: &[
            slider(keys::CORRECTION_HUE, "Hue", -180.0, 180.0),
            slider(keys::CORRECTION_SATURATION, "Saturation", 0.0, 1000.0),
            slider(keys::CORRECTION_LIGHTNESS, "Lightness", 0.0, 1000.0),
            slider(keys::CORRECTION_CONTRAST, "Contrast", 0.0, 1000.0),
        ],
    },
];

/// Shader-ready grading values.
///
/// Four-component vectors are (red, green, blue, all). Percent inputs are
/// divided by 100 and hue degrees by 360.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSet {
    pub lift: [f32; 4],
    /// Already mapped through [`fix_gamma`].
    pub gamma: [f32; 4],
    pub gain: [f32; 4],
    pub offset: [f32; 4],
    pub tint_low: [f32; 3],
    pub tint_mid: [f32; 3],
    pub tint_high: [f32; 3],
    /// (hue in turns, saturation, lightness, contrast)
    pub correction: [f32; 4],
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::parse(DEFAULTS)
    }
}

impl ParameterSet {
    pub fn parse<S: Settings + ?Sized>(settings: &S) -> Self {
        let percent = |key: &str| (settings.get_double(key) / 100.0) as f32;
        let gamma = |key: &str| fix_gamma(settings.get_double(key) / 100.0);

        Self {
            lift: keys::LIFT.map(percent),
            gamma: keys::GAMMA.map(gamma),
            gain: keys::GAIN.map(percent),
            offset: keys::OFFSET.map(percent),
            tint_low: keys::TINT_SHADOW.map(percent),
            tint_mid: keys::TINT_MIDTONE.map(percent),
            tint_high: keys::TINT_HIGHLIGHT.map(percent),
            correction: [
                (settings.get_double(keys::CORRECTION_HUE) / 360.0) as f32,
                percent(keys::CORRECTION_SATURATION),
                percent(keys::CORRECTION_LIGHTNESS),
                percent(keys::CORRECTION_CONTRAST),
            ],
        }
    }
}

/// Maps a signed gamma adjustment onto a positive exponent.
///
/// Negative inputs grow linearly above 1, non-negative inputs shrink towards
/// 0 as `1 / (v + 1)`. Both branches meet at 1 for `v == 0`.
pub fn fix_gamma(v: f64) -> f32 {
    if v < 0.0 {
        (-v + 1.0) as f32
    } else {
        (1.0 / (v + 1.0)) as f32
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn gamma_is_continuous_at_zero() {
        assert_eq!(fix_gamma(0.0), 1.0);
        assert_eq!(fix_gamma(-0.0), 1.0);
    }

    #[test]
    fn gamma_branches_by_sign() {
        for v in [-10.0, -1.0, -0.25, -1e-6] {
            let g = fix_gamma(v);
            assert_eq!(g, (-v + 1.0) as f32);
            assert!(g > 1.0);
        }
        for v in [0.0, 1e-6, 0.5, 1.0, 10.0] {
            let g = fix_gamma(v);
            assert_eq!(g, (1.0 / (v + 1.0)) as f32);
            assert!(g > 0.0 && g <= 1.0);
        }
    }

    #[test]
    fn parses_documented_scenario() {
        let mut settings: HashMap<&str, f64> = DEFAULTS.iter().copied().collect();
        settings.insert(keys::LIFT_RED, 50.0);
        settings.insert(keys::LIFT_ALL, 0.0);
        settings.insert(keys::GAMMA_RED, 0.0);
        settings.insert(keys::GAIN_ALL, 100.0);
        settings.insert(keys::OFFSET_ALL, 0.0);

        let p = ParameterSet::parse(&settings);
        assert_eq!(p.lift[0], 0.5);
        assert_eq!(p.lift[3], 0.0);
        assert_eq!(p.gamma[0], 1.0);
        assert_eq!(p.gain[3], 1.0);
        assert_eq!(p.offset[3], 0.0);
    }

    #[test]
    fn defaults_are_neutral() {
        let p = ParameterSet::default();
        assert_eq!(p.lift, [0.0; 4]);
        assert_eq!(p.gamma, [1.0; 4]);
        assert_eq!(p.gain, [1.0; 4]);
        assert_eq!(p.offset, [0.0; 4]);
        assert_eq!(p.tint_low, [1.0; 3]);
        assert_eq!(p.tint_mid, [1.0; 3]);
        assert_eq!(p.tint_high, [1.0; 3]);
        assert_eq!(p.correction, [0.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn missing_keys_read_as_zero() {
        let empty: HashMap<String, f64> = HashMap::new();
        let p = ParameterSet::parse(&empty);
        assert_eq!(p.gain, [0.0; 4]);
        assert_eq!(p.gamma, [1.0; 4]);
        assert_eq!(p.correction, [0.0; 4]);
    }

    #[test]
    fn scales_every_group() {
        let settings: &[(&str, f64)] = &[
            (keys::GAMMA_BLUE, -50.0),
            (keys::GAMMA_ALL, 100.0),
            (keys::OFFSET_GREEN, -25.0),
            (keys::TINT_HIGHLIGHT_BLUE, 150.0),
            (keys::CORRECTION_HUE, 90.0),
            (keys::CORRECTION_CONTRAST, 200.0),
        ];
        let p = ParameterSet::parse(settings);
        assert_eq!(p.gamma[2], 1.5);
        assert_eq!(p.gamma[3], 0.5);
        assert_eq!(p.offset[1], -0.25);
        assert_eq!(p.tint_high[2], 1.5);
        assert_eq!(p.correction[0], 0.25);
        assert_eq!(p.correction[3], 2.0);
    }

    #[test]
    fn every_key_has_a_default() {
        let all = keys::LIFT
            .iter()
            .chain(&keys::GAMMA)
            .chain(&keys::GAIN)
            .chain(&keys::OFFSET)
            .chain(&keys::TINT_SHADOW)
            .chain(&keys::TINT_MIDTONE)
            .chain(&keys::TINT_HIGHLIGHT)
            .chain(&keys::CORRECTION);
        for key in all {
            assert!(DEFAULTS.iter().any(|(k, _)| k == key), "{key} has no default");
        }
        assert_eq!(DEFAULTS.len(), 29);
    }

    #[test]
    fn every_default_has_a_slider_that_contains_it() {
        let sliders: Vec<&Slider> = GROUPS.iter().flat_map(|g| g.sliders).collect();
        assert_eq!(sliders.len(), DEFAULTS.len());
        for (key, value) in DEFAULTS {
            let s = sliders
                .iter()
                .find(|s| s.key == *key)
                .unwrap_or_else(|| panic!("{key} has no slider"));
            assert!(s.min <= *value && *value <= s.max, "{key} default out of range");
        }
    }
}
