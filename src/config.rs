use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use taskscreen_board::{BoardParams, Layout, Palette};
use tracing::warn;

const DEFAULT_CONFIG_PATH: &str = "config/board.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BoardConfig {
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Y of the first task row on the screen panel.
    pub row_top: f32,
    /// Vertical distance between consecutive rows.
    pub row_spacing: f32,
    /// Depth step between stacked rows (keeps coplanar quads apart).
    pub depth_epsilon: f32,
    /// Entrance transition length in seconds.
    pub enter_duration: f32,
    /// Exit transition length in seconds.
    pub exit_duration: f32,
    /// Reflow glide length in seconds.
    pub reflow_duration: f32,
    /// Hover tint for control buttons.
    pub button_hover_color: [f32; 4],
    /// Hover tint for task rows.
    pub row_hover_color: [f32; 4],
    /// Row tint while delete mode is armed.
    pub row_armed_color: [f32; 4],
}

impl Default for BoardConfig {
    fn default() -> Self {
        let params = BoardParams::default();
        Self {
            viewport_width: params.viewport.0,
            viewport_height: params.viewport.1,
            row_top: params.layout.top,
            row_spacing: params.layout.spacing,
            depth_epsilon: params.layout.depth_epsilon,
            enter_duration: params.enter_duration,
            exit_duration: params.exit_duration,
            reflow_duration: params.reflow_duration,
            button_hover_color: params.palette.button_hover,
            row_hover_color: params.palette.row_hover,
            row_armed_color: params.palette.row_armed,
        }
    }
}

impl BoardConfig {
    /// Load board configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<BoardConfig>(&contents) {
                Ok(config) => config,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    BoardConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH) {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!(
                        "Board config not found at {}. Using defaults",
                        path.display()
                    );
                }
                BoardConfig::default()
            }
        }
    }

    /// Save board configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    /// Build board parameters from this configuration.
    pub fn to_params(&self) -> BoardParams {
        BoardParams {
            viewport: (self.viewport_width, self.viewport_height),
            layout: Layout {
                top: self.row_top,
                spacing: self.row_spacing,
                depth_epsilon: self.depth_epsilon,
            },
            enter_duration: self.enter_duration,
            exit_duration: self.exit_duration,
            reflow_duration: self.reflow_duration,
            palette: Palette {
                button_hover: self.button_hover_color,
                row_hover: self.row_hover_color,
                row_armed: self.row_armed_color,
                ..Palette::default()
            },
        }
    }
}
