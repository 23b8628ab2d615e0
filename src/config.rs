use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::generators::GenOptions;
use crate::maze::Coord;

/// Everything needed to build one maze.
///
/// Loaded from TOML with kebab-case keys:
///
/// ```toml
/// rows = 10
/// columns = 12
/// algorithm = "wilsons"
/// orphan-mask = [{ x = 0, y = 0 }]
/// seed = 42
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct MazeConfig {
    pub rows: usize,
    pub columns: usize,
    /// Registered generator name
    pub algorithm: String,
    /// Grid positions removed from play
    pub orphan_mask: Vec<Coord>,
    /// Skip the structural check after generation
    pub skip_grid_check: bool,
    /// Seed for reproducible generation. OS entropy when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Chance of removing each dead end after generation
    pub braid_probability: f64,
    /// Chance of attempting a crossing per Kruskal weave draw
    pub weave_probability: f64,
    /// Chance of leaving a small region undivided as a room in recursive division
    pub room_probability: f64,
    /// Regions narrower and shorter than this may become rooms
    pub room_size: usize,
}

impl Default for MazeConfig {
    fn default() -> Self {
        let options = GenOptions::default();
        Self {
            rows: 10,
            columns: 10,
            algorithm: String::from("recursive-backtracker"),
            orphan_mask: Vec::new(),
            skip_grid_check: false,
            seed: None,
            braid_probability: 0.0,
            weave_probability: options.weave_probability,
            room_probability: options.room_probability,
            room_size: options.room_size,
        }
    }
}

impl MazeConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: MazeConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks everything that can be checked without building the grid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 {
            return Err(ConfigError::NonPositiveDimension {
                name: "rows",
                value: self.rows,
            });
        }
        if self.columns == 0 {
            return Err(ConfigError::NonPositiveDimension {
                name: "columns",
                value: self.columns,
            });
        }
        if self.algorithm.trim().is_empty() {
            return Err(ConfigError::EmptyAlgorithm);
        }
        for (name, value) in [
            ("braid-probability", self.braid_probability),
            ("weave-probability", self.weave_probability),
            ("room-probability", self.room_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { name, value });
            }
        }
        if self.room_size < 2 {
            return Err(ConfigError::RoomSizeTooSmall(self.room_size));
        }
        if let Some(&coord) = self
            .orphan_mask
            .iter()
            .find(|c| c.x >= self.columns || c.y >= self.rows)
        {
            return Err(ConfigError::OrphanOutOfBounds {
                coord,
                rows: self.rows,
                columns: self.columns,
            });
        }
        Ok(())
    }

    /// Generator tuning taken from this config.
    pub fn generation_options(&self) -> GenOptions {
        GenOptions {
            weave_probability: self.weave_probability,
            room_probability: self.room_probability,
            room_size: self.room_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml() {
        let config = MazeConfig::from_toml_str(
            r#"
            rows = 4
            columns = 6
            algorithm = "wilsons"
            orphan-mask = [{ x = 1, y = 2 }]
            seed = 7
            braid-probability = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.rows, 4);
        assert_eq!(config.columns, 6);
        assert_eq!(config.algorithm, "wilsons");
        assert_eq!(config.orphan_mask, vec![Coord::new(1, 2)]);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.braid_probability, 0.5);
        assert!(!config.skip_grid_check);
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let err = MazeConfig::from_toml_str("rows = 0\ncolumns = 3").unwrap_err();
        assert_eq!(
            err,
            ConfigError::NonPositiveDimension {
                name: "rows",
                value: 0
            }
        );
    }

    #[test]
    fn test_rejects_negative_dimensions_at_parse_time() {
        assert!(matches!(
            MazeConfig::from_toml_str("rows = -3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_bad_probability() {
        let config = MazeConfig {
            weave_probability: 1.5,
            ..MazeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ProbabilityOutOfRange {
                name: "weave-probability",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_empty_algorithm_and_stray_orphans() {
        let config = MazeConfig {
            algorithm: String::from("  "),
            ..MazeConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyAlgorithm));

        let config = MazeConfig {
            orphan_mask: vec![Coord::new(10, 0)],
            ..MazeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OrphanOutOfBounds { .. })
        ));
    }
}
