use std::collections::{BTreeMap, HashMap};

/// Read access to a flat, string-keyed settings snapshot.
///
/// The host registers a default for every key before handing settings out,
/// so a missing key reads as `0.0`.
pub trait Settings {
    fn get_double(&self, key: &str) -> f64;
}

impl<S: Settings + ?Sized> Settings for &S {
    fn get_double(&self, key: &str) -> f64 {
        (**self).get_double(key)
    }
}

impl Settings for HashMap<String, f64> {
    fn get_double(&self, key: &str) -> f64 {
        self.get(key).copied().unwrap_or(0.0)
    }
}

impl Settings for HashMap<&str, f64> {
    fn get_double(&self, key: &str) -> f64 {
        self.get(key).copied().unwrap_or(0.0)
    }
}

impl Settings for BTreeMap<String, f64> {
    fn get_double(&self, key: &str) -> f64 {
        self.get(key).copied().unwrap_or(0.0)
    }
}

impl Settings for [(&str, f64)] {
    fn get_double(&self, key: &str) -> f64 {
        self.iter()
            .find(|(k, _)| *k == key)
            .map_or(0.0, |(_, v)| *v)
    }
}
