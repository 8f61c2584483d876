//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// Broad category of every registry entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
    Projectile,
    Missile,
    Collectible,
    Obstacle,
    Particle,
}

/// Team affiliation used to filter collision pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Player,
    #[default]
    Hostile,
    /// Pickups and visual effects. Never damaged.
    Neutral,
}

/// Enemy archetypes. Per-kind numbers live in the profile table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    #[default]
    Basic,
    Zigzag,
    Shooter,
    Heavy,
    Dart,
    ShieldBearer,
}

/// Pickup types dropped by destroyed enemies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectibleKind {
    /// Currency.
    #[default]
    Star,
    HealthPack,
    ShieldPack,
}

/// Primary weapon firing pattern, selected by the primary upgrade level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponPattern {
    #[default]
    SingleSlow,
    SingleMedium,
    Double,
    Triple,
    Quad,
    Five,
}

/// Shared-transform behaviour of a formation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormationBehavior {
    #[default]
    Static,
    Rotate,
    Wave,
    Split,
    Converge,
}

/// Named formation layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormationShape {
    #[default]
    Line,
    VShape,
    Circle,
    Arc,
    Diamond,
}

/// Upgrade categories held in the save document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeCategory {
    Hull,
    Engine,
    Thruster,
    Primary,
    Shield,
    Secondary,
    Magnet,
}

/// Session lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Created, no level loaded yet.
    #[default]
    Idle,
    Active,
    Paused,
    /// Every wave of the level is complete.
    LevelComplete,
    /// The player ran out of lives.
    Defeat,
}

impl SessionPhase {
    /// The session will not tick again.
    pub fn is_over(self) -> bool {
        matches!(self, Self::LevelComplete | Self::Defeat)
    }
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 6] = [
        EnemyKind::Basic,
        EnemyKind::Zigzag,
        EnemyKind::Shooter,
        EnemyKind::Heavy,
        EnemyKind::Dart,
        EnemyKind::ShieldBearer,
    ];

    /// Resolve a content identifier such as `"shield_bearer"`.
    pub fn parse(s: &str) -> Result<Self, ContentError> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "zigzag" => Ok(Self::Zigzag),
            "shooter" => Ok(Self::Shooter),
            "heavy" => Ok(Self::Heavy),
            "dart" => Ok(Self::Dart),
            "shield_bearer" | "shieldbearer" | "shield" => Ok(Self::ShieldBearer),
            _ => Err(ContentError::UnknownEnemy(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Zigzag => "zigzag",
            Self::Shooter => "shooter",
            Self::Heavy => "heavy",
            Self::Dart => "dart",
            Self::ShieldBearer => "shield_bearer",
        }
    }
}

impl FormationShape {
    pub fn parse(s: &str) -> Result<Self, ContentError> {
        match s.to_lowercase().as_str() {
            "line" => Ok(Self::Line),
            "v_shape" | "v" => Ok(Self::VShape),
            "circle" => Ok(Self::Circle),
            "arc" => Ok(Self::Arc),
            "diamond" => Ok(Self::Diamond),
            _ => Err(ContentError::UnknownFormation(s.to_string())),
        }
    }
}

impl FormationBehavior {
    pub fn parse(s: &str) -> Result<Self, ContentError> {
        match s.to_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "rotate" => Ok(Self::Rotate),
            "wave" => Ok(Self::Wave),
            "split" => Ok(Self::Split),
            "converge" => Ok(Self::Converge),
            _ => Err(ContentError::UnknownBehavior(s.to_string())),
        }
    }
}

impl UpgradeCategory {
    pub const ALL: [UpgradeCategory; 7] = [
        UpgradeCategory::Hull,
        UpgradeCategory::Engine,
        UpgradeCategory::Thruster,
        UpgradeCategory::Primary,
        UpgradeCategory::Shield,
        UpgradeCategory::Secondary,
        UpgradeCategory::Magnet,
    ];

    /// Highest level a category can reach.
    pub fn max_level(&self) -> u32 {
        match self {
            Self::Hull | Self::Engine | Self::Thruster | Self::Primary => 5,
            Self::Shield | Self::Secondary | Self::Magnet => 3,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hull" => Some(Self::Hull),
            "engine" => Some(Self::Engine),
            "thruster" => Some(Self::Thruster),
            "primary" | "primary_weapon" => Some(Self::Primary),
            "shield" => Some(Self::Shield),
            "secondary" | "secondary_weapon" => Some(Self::Secondary),
            "magnet" => Some(Self::Magnet),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hull => "hull",
            Self::Engine => "engine",
            Self::Thruster => "thruster",
            Self::Primary => "primary",
            Self::Shield => "shield",
            Self::Secondary => "secondary",
            Self::Magnet => "magnet",
        }
    }
}
