use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("shape_side must be odd so rotations have a center cell, got {0}")]
    EvenShapeSide(usize),
    #[error("slab_rows ({rows}) does not fit in shape_side ({side})")]
    SlabTooTall { rows: usize, side: usize },
    #[error("shape_side ({shape}) is larger than volume_side ({volume})")]
    ShapeLargerThanVolume { shape: usize, volume: usize },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Puzzle dimensions and where piece shapes are read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    /// Side of the shared cubic volume.
    #[serde(default = "default_volume_side")]
    pub volume_side: usize,
    /// Side of each piece's local grid. Must be odd.
    #[serde(default = "default_shape_side")]
    pub shape_side: usize,
    #[serde(default = "default_piece_count")]
    pub piece_count: usize,
    /// Highest tag a shape file may contain.
    #[serde(default = "default_max_tag")]
    pub max_tag: u8,
    /// Rows per column in a shape file; the slab is centered on Y.
    #[serde(default = "default_slab_rows")]
    pub slab_rows: usize,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
}

fn default_volume_side() -> usize {
    16
}
fn default_shape_side() -> usize {
    7
}
fn default_piece_count() -> usize {
    6
}
fn default_max_tag() -> u8 {
    6
}
fn default_slab_rows() -> usize {
    5
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_file_prefix() -> String {
    "block_".to_string()
}
fn default_file_extension() -> String {
    "txt".to_string()
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            volume_side: default_volume_side(),
            shape_side: default_shape_side(),
            piece_count: default_piece_count(),
            max_tag: default_max_tag(),
            slab_rows: default_slab_rows(),
            data_dir: default_data_dir(),
            file_prefix: default_file_prefix(),
            file_extension: default_file_extension(),
        }
    }
}

impl PuzzleConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PuzzleConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn with_data_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Number of integers each shape file must hold.
    pub fn values_per_shape(&self) -> usize {
        self.shape_side * self.slab_rows
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("volume_side", self.volume_side),
            ("shape_side", self.shape_side),
            ("piece_count", self.piece_count),
            ("slab_rows", self.slab_rows),
            ("max_tag", self.max_tag as usize),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero { field });
            }
        }
        if self.shape_side % 2 == 0 {
            return Err(ConfigError::EvenShapeSide(self.shape_side));
        }
        if self.slab_rows > self.shape_side {
            return Err(ConfigError::SlabTooTall {
                rows: self.slab_rows,
                side: self.shape_side,
            });
        }
        if self.shape_side > self.volume_side {
            return Err(ConfigError::ShapeLargerThanVolume {
                shape: self.shape_side,
                volume: self.volume_side,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_puzzle() {
        let config = PuzzleConfig::default();
        assert_eq!(config.volume_side, 16);
        assert_eq!(config.shape_side, 7);
        assert_eq!(config.piece_count, 6);
        assert_eq!(config.max_tag, 6);
        assert_eq!(config.values_per_shape(), 35);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let config = PuzzleConfig::from_json(r#"{ "piece_count": 3, "data_dir": "shapes" }"#)
            .unwrap();
        assert_eq!(config.piece_count, 3);
        assert_eq!(config.data_dir, PathBuf::from("shapes"));
        assert_eq!(config.volume_side, 16);
    }

    #[test]
    fn test_validate_rejects_bad_dimensions() {
        assert!(matches!(
            PuzzleConfig::from_json(r#"{ "shape_side": 6 }"#),
            Err(ConfigError::EvenShapeSide(6))
        ));
        assert!(matches!(
            PuzzleConfig::from_json(r#"{ "piece_count": 0 }"#),
            Err(ConfigError::Zero {
                field: "piece_count"
            })
        ));
        assert!(matches!(
            PuzzleConfig::from_json(r#"{ "shape_side": 3 }"#),
            Err(ConfigError::SlabTooTall { rows: 5, side: 3 })
        ));
        assert!(matches!(
            PuzzleConfig::from_json(r#"{ "volume_side": 5 }"#),
            Err(ConfigError::ShapeLargerThanVolume { .. })
        ));
        assert!(matches!(
            PuzzleConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
