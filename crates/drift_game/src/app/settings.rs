use std::fs;
use std::path::Path;

use drift_engine::{HandlingConfig, HandlingModelKind, LoopConfig};
use serde::Deserialize;
use tracing::info;

pub(crate) const SETTINGS_ENV_VAR: &str = "DRIFT_SETTINGS";

/// Optional overrides read from the settings file. Missing fields keep
/// their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct DriveSettings {
    pub(crate) handling_model: HandlingModelKind,
    pub(crate) handling: HandlingConfig,
    pub(crate) camera_follow: bool,
    pub(crate) max_frame_delta_ms: u64,
}

impl Default for DriveSettings {
    fn default() -> Self {
        let loop_defaults = LoopConfig::default();
        Self {
            handling_model: loop_defaults.handling_kind,
            handling: loop_defaults.handling,
            camera_follow: loop_defaults.camera_follow,
            max_frame_delta_ms: loop_defaults.max_frame_delta_ms,
        }
    }
}

impl DriveSettings {
    pub(crate) fn apply_to(self, config: LoopConfig) -> LoopConfig {
        LoopConfig {
            handling_kind: self.handling_model,
            handling: self.handling,
            camera_follow: self.camera_follow,
            max_frame_delta_ms: self.max_frame_delta_ms,
            ..config
        }
    }
}

pub(crate) fn load_settings_from_env() -> Result<DriveSettings, String> {
    match std::env::var_os(SETTINGS_ENV_VAR) {
        Some(raw_path) => load_settings(Path::new(&raw_path)),
        None => Ok(DriveSettings::default()),
    }
}

pub(crate) fn load_settings(path: &Path) -> Result<DriveSettings, String> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("read settings '{}': {error}", path.display()))?;
    let settings = parse_settings_json(&raw)?;
    settings
        .handling
        .validate()
        .map_err(|error| format!("validate settings '{}': {error}", path.display()))?;
    info!(
        path = %path.display(),
        handling_model = ?settings.handling_model,
        camera_follow = settings.camera_follow,
        "settings_loaded"
    );
    Ok(settings)
}

fn parse_settings_json(raw: &str) -> Result<DriveSettings, String> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, DriveSettings>(&mut deserializer) {
        Ok(settings) => Ok(settings),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(format!("parse settings json: {source}"))
            } else {
                Err(format!("parse settings json at {path}: {source}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_keeps_defaults() {
        let settings = parse_settings_json("{}").expect("parse");
        assert_eq!(settings, DriveSettings::default());
        assert_eq!(settings.handling_model, HandlingModelKind::Drift);
        assert_eq!(settings.max_frame_delta_ms, 250);
    }

    #[test]
    fn partial_handling_override_keeps_other_constants() {
        let settings = parse_settings_json(
            r#"{ "handling_model": "grip", "handling": { "drift_kick": 2.0 } }"#,
        )
        .expect("parse");

        assert_eq!(settings.handling_model, HandlingModelKind::Grip);
        assert_eq!(settings.handling.drift_kick, 2.0);
        assert_eq!(
            settings.handling.accel_rate,
            HandlingConfig::default().accel_rate
        );
    }

    #[test]
    fn unknown_field_error_names_its_path() {
        let error = parse_settings_json(r#"{ "handling": { "grip": 1.0 } }"#)
            .expect_err("unknown field should fail");

        assert!(error.starts_with("parse settings json at handling"), "{error}");
        assert!(error.contains("grip"), "{error}");
    }

    #[test]
    fn wrong_type_at_top_level_reports_field_path() {
        let error = parse_settings_json(r#"{ "camera_follow": "yes" }"#)
            .expect_err("string is not a bool");

        assert!(error.starts_with("parse settings json at camera_follow:"), "{error}");
    }

    #[test]
    fn malformed_json_has_no_path() {
        let error = parse_settings_json("{").expect_err("truncated json");
        assert!(error.starts_with("parse settings json: "), "{error}");
    }

    #[test]
    fn missing_file_is_reported() {
        let error = load_settings(Path::new("/nonexistent/drift/settings.json"))
            .expect_err("missing file");
        assert!(error.starts_with("read settings '"), "{error}");
    }

    #[test]
    fn invalid_constant_is_rejected_on_load() {
        let path = std::env::temp_dir().join(format!(
            "drift_settings_invalid_{}.json",
            std::process::id()
        ));
        fs::write(&path, r#"{ "handling": { "accel_rate": -1.0 } }"#).expect("write");
        let result = load_settings(&path);
        let _ = fs::remove_file(&path);

        let error = result.expect_err("negative accel rate");
        assert!(error.contains("accel_rate"), "{error}");
    }

    #[test]
    fn apply_to_overrides_only_settings_fields() {
        let settings = DriveSettings {
            handling_model: HandlingModelKind::Grip,
            camera_follow: true,
            max_frame_delta_ms: 100,
            ..DriveSettings::default()
        };
        let base = LoopConfig {
            window_title: "Custom".to_string(),
            ..LoopConfig::default()
        };
        let config = settings.apply_to(base);

        assert_eq!(config.window_title, "Custom");
        assert_eq!(config.handling_kind, HandlingModelKind::Grip);
        assert!(config.camera_follow);
        assert_eq!(config.max_frame_delta_ms, 100);
    }
}
