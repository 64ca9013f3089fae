//! Viewer settings, loaded from `config/viewer.json` or created with
//! defaults on first run.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    pub graphics: GraphicsConfig,
    pub scene: SceneConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphicsConfig {
    /// Window width in pixels
    pub window_width: u32,

    /// Window height in pixels
    pub window_height: u32,

    /// Enable VSync (Fifo presentation mode)
    pub vsync: bool,

    /// Vertical field of view in degrees
    pub fov_degrees: f32,

    /// Near clip plane distance
    pub near_clip: f32,

    /// Far clip plane distance
    pub far_clip: f32,

    /// MSAA sample count, 1 or 4
    pub msaa_samples: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Camera orbit speed in degrees per second
    pub orbit_speed: f32,

    /// Orbit radius from the model
    pub camera_distance: f32,

    /// Demo material roughness
    pub roughness: f32,

    /// Demo material metallic factor
    pub metallic: f32,

    /// Equirectangular HDR to bake into the environment, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skybox_hdr: Option<PathBuf>,

    /// Directory of six named cube faces, used when no HDR is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skybox_dir: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            graphics: GraphicsConfig {
                window_width: 1280,
                window_height: 720,
                vsync: true,
                fov_degrees: 60.0,
                near_clip: 0.1,
                far_clip: 100.0,
                msaa_samples: 4,
            },
            scene: SceneConfig {
                orbit_speed: 20.0,
                camera_distance: 3.0,
                roughness: 0.5,
                metallic: 0.1,
                skybox_hdr: None,
                skybox_dir: None,
            },
        }
    }
}

impl ViewerConfig {
    /// Load configuration from file, or create default if missing.
    pub fn load() -> Result<Self, String> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .map_err(|e| format!("failed to read config file: {e}"))?;
            let config: ViewerConfig = serde_json::from_str(&content)
                .map_err(|e| format!("failed to parse config file: {e}"))?;
            info!("loaded configuration from {}", config_path.display());
            Ok(config)
        } else {
            warn!(
                "no config file found, creating default at {}",
                config_path.display()
            );
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<(), String> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("failed to create config directory: {e}"))?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("failed to serialize config: {e}"))?;
        fs::write(&config_path, content)
            .map_err(|e| format!("failed to write config file: {e}"))?;
        info!("saved configuration to {}", config_path.display());
        Ok(())
    }

    fn config_path() -> PathBuf {
        Path::new("config").join("viewer.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let config = ViewerConfig::default();
        assert_eq!(config.graphics.window_width, 1280);
        assert!(config.graphics.near_clip < config.graphics.far_clip);
        assert!(config.graphics.msaa_samples == 1 || config.graphics.msaa_samples == 4);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = ViewerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: ViewerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(
            config.graphics.fov_degrees,
            deserialized.graphics.fov_degrees
        );
        assert_eq!(config.scene.orbit_speed, deserialized.scene.orbit_speed);
    }

    #[test]
    fn missing_optional_paths_deserialize_as_none() {
        let json = r#"{
            "graphics": {
                "window_width": 800, "window_height": 600, "vsync": true,
                "fov_degrees": 60.0, "near_clip": 0.1, "far_clip": 100.0,
                "msaa_samples": 1
            },
            "scene": {
                "orbit_speed": 20.0, "camera_distance": 3.0,
                "roughness": 0.5, "metallic": 0.1
            }
        }"#;
        let config: ViewerConfig = serde_json::from_str(json).unwrap();
        assert!(config.scene.skybox_hdr.is_none());
        assert!(config.scene.skybox_dir.is_none());
    }
}
