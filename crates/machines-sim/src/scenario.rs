//! Built-in level generator.
//!
//! Six base waves of interval spawning, scaled by level number: groups grow
//! and spawn intervals shrink as levels increase. A group of two or more
//! enemies arrives as a formation whose shape suits its kind.

use machines_core::constants::{MIN_SPAWN_INTERVAL, SPAWN_INTERVAL_DECAY};
use machines_core::enums::{EnemyKind, FormationBehavior, FormationShape};
use machines_core::types::Size;

use crate::formation::FormationTemplate;
use crate::waves::{SpawnDescriptor, SpawnDirective, WaveDefinition};

/// One repeating spawn group inside a base wave.
#[derive(Debug, Clone, Copy)]
struct Group {
    kind: EnemyKind,
    count: u32,
    /// Seconds between spawns.
    interval: f64,
}

struct BaseWave {
    name: &'static str,
    duration: f64,
    groups: &'static [Group],
    obstacle_at: Option<f64>,
}

const fn group(kind: EnemyKind, count: u32, interval: f64) -> Group {
    Group {
        kind,
        count,
        interval,
    }
}

const BASE_WAVES: [BaseWave; 6] = [
    BaseWave {
        name: "scouts",
        duration: 15.0,
        groups: &[group(EnemyKind::Basic, 1, 2.0)],
        obstacle_at: None,
    },
    BaseWave {
        name: "pairs",
        duration: 15.0,
        groups: &[group(EnemyKind::Basic, 2, 1.5)],
        obstacle_at: None,
    },
    BaseWave {
        name: "weavers",
        duration: 15.0,
        groups: &[
            group(EnemyKind::Basic, 1, 3.0),
            group(EnemyKind::Zigzag, 1, 3.0),
        ],
        obstacle_at: None,
    },
    BaseWave {
        name: "gunline",
        duration: 15.0,
        groups: &[
            group(EnemyKind::Zigzag, 1, 3.0),
            group(EnemyKind::Shooter, 1, 5.0),
            group(EnemyKind::Dart, 2, 4.0),
        ],
        obstacle_at: None,
    },
    BaseWave {
        name: "bulwark",
        duration: 20.0,
        groups: &[
            group(EnemyKind::Basic, 2, 3.0),
            group(EnemyKind::ShieldBearer, 2, 5.0),
        ],
        obstacle_at: None,
    },
    BaseWave {
        name: "onslaught",
        duration: 30.0,
        groups: &[
            group(EnemyKind::Basic, 1, 4.0),
            group(EnemyKind::Shooter, 1, 6.0),
            group(EnemyKind::Zigzag, 1, 4.0),
            group(EnemyKind::Dart, 1, 3.0),
            group(EnemyKind::ShieldBearer, 1, 7.0),
            group(EnemyKind::Heavy, 1, 10.0),
        ],
        obstacle_at: Some(15.0),
    },
];

const BEHAVIOR_CYCLE: [FormationBehavior; 5] = [
    FormationBehavior::Static,
    FormationBehavior::Wave,
    FormationBehavior::Split,
    FormationBehavior::Rotate,
    FormationBehavior::Converge,
];

fn shape_for(kind: EnemyKind) -> FormationShape {
    match kind {
        EnemyKind::Basic | EnemyKind::Shooter => FormationShape::Line,
        EnemyKind::Zigzag => FormationShape::VShape,
        EnemyKind::Heavy => FormationShape::Diamond,
        EnemyKind::ShieldBearer => FormationShape::Arc,
        EnemyKind::Dart => FormationShape::Circle,
    }
}

/// Group size at `level`: grows by one every two levels, capped at triple.
pub fn scaled_count(base: u32, level: u32) -> u32 {
    (base + level / 2).min(base * 3)
}

/// Spawn interval at `level`, never below the floor.
pub fn scaled_interval(base: f64, level: u32) -> f64 {
    (base * SPAWN_INTERVAL_DECAY.powi(level.saturating_sub(1) as i32)).max(MIN_SPAWN_INTERVAL)
}

/// The default wave list for `level`.
pub fn default_level(level: u32) -> Vec<WaveDefinition> {
    let level = level.max(1);
    let mut formation_index = 0usize;

    BASE_WAVES
        .iter()
        .map(|base| {
            let mut directives = Vec::new();
            for g in base.groups {
                let count = scaled_count(g.count, level);
                let interval = scaled_interval(g.interval, level);
                let mut at = interval;
                while at < base.duration {
                    let spawn = if count >= 2 {
                        let behavior = BEHAVIOR_CYCLE[formation_index % BEHAVIOR_CYCLE.len()];
                        formation_index += 1;
                        SpawnDescriptor::Formation {
                            kind: g.kind,
                            template: FormationTemplate::shape(shape_for(g.kind), count as usize),
                            behavior,
                            x: None,
                        }
                    } else {
                        SpawnDescriptor::Enemy {
                            kind: g.kind,
                            x: None,
                            pattern: None,
                        }
                    };
                    directives.push(SpawnDirective {
                        at,
                        spawn,
                        difficulty: 1.0,
                    });
                    at += interval;
                }
            }
            if let Some(at) = base.obstacle_at {
                directives.push(SpawnDirective {
                    at,
                    spawn: SpawnDescriptor::Obstacle {
                        x: None,
                        size: Size::new(80.0, 80.0),
                        speed: 60.0,
                        health: Some(100),
                    },
                    difficulty: 1.0,
                });
            }
            WaveDefinition::new(base.name, directives)
        })
        .collect()
}
