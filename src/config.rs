use std::path::Path;

use bevy_ecs::resource::Resource;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::grid::{DEFAULT_CELL_SIZE, MAX_GRID_CELLS};
use crate::model::timestamp::{SECONDS_PER_DAY, SECONDS_PER_MINUTE};
use crate::model::{CellType, ClampedTable, GridIndex};

/// Complete tunable configuration. Every section falls back to its defaults
/// when missing from the JSON source.
#[derive(Resource, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerritoryConfig {
    pub grid: GridConfig,
    pub claims: ClaimConfig,
    pub upkeep: UpkeepConfig,
    pub combat: CombatConfig,
    pub decay: DecayConfig,
    pub anchors: AnchorConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Edge length of the square world.
    pub world_size: f64,
    /// Edge length of one cell.
    pub cell_size: f64,
    /// Whether world coordinates are centred on the origin.
    pub centered: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            world_size: 3000.0,
            cell_size: DEFAULT_CELL_SIZE,
            centered: false,
        }
    }
}

impl GridConfig {
    pub fn build(&self) -> GridIndex {
        if self.centered {
            GridIndex::centered(self.world_size, self.cell_size)
        } else {
            GridIndex::new(self.world_size, self.cell_size)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimConfig {
    /// Cost of the next claim, keyed by cells the group already holds.
    pub costs: ClampedTable<u32>,
    /// Minimum group size required to hold land.
    pub min_members: u32,
    /// New claims must touch land the group already holds.
    pub require_contiguous: bool,
}

impl Default for ClaimConfig {
    fn default() -> Self {
        Self {
            costs: ClampedTable::new(vec![0, 100, 200, 300, 400, 500]),
            min_members: 3,
            require_contiguous: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpkeepConfig {
    pub enabled: bool,
    /// Per-claim cost keyed by the claim's ordinal position; summed into a bill.
    pub costs: ClampedTable<u32>,
    pub period_secs: u64,
    pub grace_secs: u64,
}

impl Default for UpkeepConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            costs: ClampedTable::new(vec![10, 10, 20, 20, 30, 30, 40, 40, 50]),
            period_secs: 15 * SECONDS_PER_MINUTE,
            grace_secs: SECONDS_PER_DAY,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Fraction of wartime structure damage absorbed, keyed by depth.
    pub defensive_bonuses: ClampedTable<f32>,
    /// Cell ids designated PVP-enabled in addition to badlands.
    pub pvp_zones: Vec<String>,
    /// Deny occupant-on-occupant damage outside danger and war.
    pub restrict_pvp: bool,
    /// Leave structures on land that does not defend them (wilderness,
    /// badlands) open to anyone.
    pub unclaimed_structures_exposed: bool,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            defensive_bonuses: ClampedTable::new(vec![0.0, 0.5, 1.0]),
            pvp_zones: Vec::new(),
            restrict_pvp: false,
            unclaimed_structures_exposed: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    pub claimed_reduction: f32,
    pub headquarters_reduction: f32,
    pub town_reduction: f32,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            claimed_reduction: 0.5,
            headquarters_reduction: 0.5,
            town_reduction: 1.0,
        }
    }
}

impl DecayConfig {
    /// Fraction of decay damage removed on land of the given type.
    pub fn reduction_for(&self, kind: CellType) -> f32 {
        let reduction = match kind {
            CellType::Claimed => self.claimed_reduction,
            CellType::Headquarters => self.headquarters_reduction,
            CellType::Town => self.town_reduction,
            CellType::Wilderness | CellType::Badlands => 0.0,
        };
        reduction.clamp(0.0, 1.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorConfig {
    pub poll_interval_secs: u64,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: SECONDS_PER_MINUTE,
        }
    }
}

impl TerritoryConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: TerritoryConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Load from `path`, falling back to defaults (with a warning) when the
    /// file is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::from_path(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Using default territory config, {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.grid.cell_size.is_finite() && self.grid.cell_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "cell_size must be positive, got {}",
                self.grid.cell_size
            )));
        }
        if !(self.grid.world_size.is_finite() && self.grid.world_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "world_size must be positive, got {}",
                self.grid.world_size
            )));
        }
        let side = (self.grid.world_size / self.grid.cell_size).ceil();
        let cells = (side <= usize::MAX as f64)
            .then(|| (side as usize).checked_mul(side as usize))
            .flatten();
        if !cells.is_some_and(|n| n <= MAX_GRID_CELLS) {
            return Err(ConfigError::Invalid(format!(
                "grid of {side}x{side} cells exceeds the limit of {MAX_GRID_CELLS}"
            )));
        }
        if !self.claims.costs.is_non_decreasing() {
            return Err(ConfigError::Invalid(
                "claim costs must not decrease".to_string(),
            ));
        }
        if !self.upkeep.costs.is_non_decreasing() {
            return Err(ConfigError::Invalid(
                "upkeep costs must not decrease".to_string(),
            ));
        }
        if self.upkeep.enabled && self.upkeep.period_secs == 0 {
            return Err(ConfigError::Invalid(
                "upkeep period must be non-zero".to_string(),
            ));
        }
        if self
            .combat
            .defensive_bonuses
            .entries()
            .iter()
            .any(|b| !b.is_finite() || *b < 0.0)
        {
            return Err(ConfigError::Invalid(
                "defensive bonuses must be finite and non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
