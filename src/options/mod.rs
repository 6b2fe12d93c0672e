//! Centralized viewer options with TOML preset support.
//!
//! All tweakable settings (camera tuning, point cloud conversion, display
//! dressing, keybindings) are consolidated here. Options serialize to/from
//! TOML so presets can be kept next to the images they suit.

mod camera;
mod display;
mod keybindings;
mod point_cloud;

use std::path::Path;

pub use camera::CameraOptions;
pub use display::DisplayOptions;
pub use keybindings::KeybindingOptions;
pub use point_cloud::PointCloudOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ReliefError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[camera]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Camera projection and fly-control tuning.
    pub camera: CameraOptions,
    /// Image-to-point conversion and point drawing.
    pub point_cloud: PointCloudOptions,
    /// Background and reference frame.
    pub display: DisplayOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Generate JSON Schema describing the user-tunable options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ReliefError> {
        let content = std::fs::read_to_string(path).map_err(ReliefError::Io)?;
        toml::from_str(&content)
            .map_err(|e| ReliefError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), ReliefError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ReliefError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ReliefError::Io)?;
        }
        std::fs::write(path, content).map_err(ReliefError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[point_cloud]
height_scale = 25.0
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.point_cloud.height_scale, 25.0);
        // Everything else should be default
        assert_eq!(opts.point_cloud.voxel_spacing, 0.2);
        assert_eq!(opts.camera.edge_margin, 150.0);
        assert!(opts.display.show_frame_box);
    }

    #[test]
    fn non_numeric_value_is_an_options_error() {
        let err = toml::from_str::<Options>("[point_cloud]\nheight_scale = \"tall\"\n")
            .map_err(|e| ReliefError::OptionsParse(e.to_string()))
            .unwrap_err();
        assert!(matches!(err, ReliefError::OptionsParse(_)));
    }

    #[test]
    fn keybinding_lookup() {
        use crate::input::KeyAction;
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("KeyW"),
            Some(KeyAction::MoveForward)
        );
        assert_eq!(opts.keybindings.lookup("Tab"), Some(KeyAction::ToggleView));
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
        assert_eq!(
            opts.keybindings.key_for(KeyAction::MoveDown),
            Some("ShiftLeft")
        );
    }

    #[test]
    fn partial_keybindings_keep_other_defaults() {
        use crate::input::KeyAction;
        let toml_str = r#"
[keybindings.bindings]
open_image = "KeyL"
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(
            opts.keybindings.key_for(KeyAction::OpenImage),
            Some("KeyL")
        );
        assert_eq!(
            opts.keybindings.key_for(KeyAction::MoveForward),
            Some("KeyW")
        );
        assert_eq!(
            opts.keybindings.bindings.len(),
            KeybindingOptions::default().bindings.len()
        );
    }

    #[test]
    fn save_load_and_list_presets() {
        let dir = std::env::temp_dir()
            .join(format!("relief-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.point_cloud.height_scale = 42.0;
        opts.save(&dir.join("tall.toml")).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        assert_eq!(Options::list_presets(&dir), vec!["tall".to_owned()]);
        let loaded = Options::load(&dir.join("tall.toml")).unwrap();
        assert_eq!(loaded, opts);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("camera"));
        assert!(props.contains_key("point_cloud"));
        assert!(props.contains_key("display"));
        assert!(!props.contains_key("keybindings"));

        let camera = &props["camera"]["properties"];
        assert!(camera.get("move_speed").is_some());
        assert!(camera.get("pitch_limit").is_none());
    }
}
