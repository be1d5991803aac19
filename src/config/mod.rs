use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use serde_yml::Value;

use crate::detection::DetectorKind;

/// Which detectors run, and whether to print debug output to stderr.
///
/// YAML form, every key optional:
///
/// ```yaml
/// Prototypal:
///   Enabled: true
/// UtilInherits:
///   Enabled: false
/// Debug: true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectConfig {
    enabled: BTreeMap<DetectorKind, bool>,
    pub debug: bool,
}

impl DetectConfig {
    /// Parse a YAML config document. An empty document yields the defaults.
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let raw: Value =
            serde_yml::from_str(contents).with_context(|| "failed to parse detector config")?;

        let mut config = Self::default();
        let map = match &raw {
            Value::Null => return Ok(config),
            Value::Mapping(map) => map,
            _ => bail!("detector config must be a mapping"),
        };

        for (key, value) in map {
            let key_str = match key.as_str() {
                Some(s) => s,
                None => continue,
            };

            if key_str == "Debug" {
                config.debug = value
                    .as_bool()
                    .with_context(|| "`Debug` must be a boolean")?;
                continue;
            }

            // Unknown top-level keys are ignored.
            let Some(kind) = DetectorKind::from_str(key_str) else {
                continue;
            };
            if let Some(enabled) = parse_enabled(value)
                .with_context(|| format!("invalid config for detector `{key_str}`"))?
            {
                config.set_enabled(kind, enabled);
            }
        }

        Ok(config)
    }

    /// Detectors are enabled unless configured otherwise.
    pub fn is_enabled(&self, kind: DetectorKind) -> bool {
        self.enabled.get(&kind).copied().unwrap_or(true)
    }

    pub fn set_enabled(&mut self, kind: DetectorKind, enabled: bool) {
        self.enabled.insert(kind, enabled);
    }
}

fn parse_enabled(value: &Value) -> Result<Option<bool>> {
    let Value::Mapping(map) = value else {
        bail!("expected a mapping");
    };
    match map.get(&Value::String("Enabled".to_string())) {
        None => Ok(None),
        Some(v) => v
            .as_bool()
            .map(Some)
            .with_context(|| "`Enabled` must be a boolean"),
    }
}
