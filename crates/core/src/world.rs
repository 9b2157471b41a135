//! World construction: perimeter walls, the player cursor and the opening
//! enemy formation.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::clock::SimClock;
use crate::config::{ConfigError, GameConfig};
use crate::entity::Entity;
use crate::simulation::Simulation;
use crate::store::WorldStore;
use crate::types::Coord;

/// First row used by the enemy formation.
const FORMATION_TOP: i32 = 2;

/// Explicitly constructed game context shared by every activity.
#[derive(Debug, Clone)]
pub struct World {
    config: GameConfig,
    store: Arc<WorldStore>,
    clock: SimClock,
}

impl World {
    /// Validate `config` and lay out the opening board.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let store = Arc::new(WorldStore::new());
        let clock = SimClock::new();

        for x in 0..config.width {
            store.set(Entity::wall(Coord::new(x, 0)));
            store.set(Entity::wall(Coord::new(x, config.height - 1)));
        }
        for y in 1..config.height - 1 {
            store.set(Entity::wall(Coord::new(0, y)));
            store.set(Entity::wall(Coord::new(config.width - 1, y)));
        }
        store.set(Entity::cursor(config.cursor_pos));

        let slots = formation(&config);
        if slots.len() < config.start_num_enemies as usize {
            warn!(
                requested = config.start_num_enemies,
                placed = slots.len(),
                "not enough room for the requested enemy count"
            );
        }
        for pos in slots {
            store.set(Entity::enemy(pos, Duration::ZERO));
        }

        info!(
            width = config.width,
            height = config.height,
            entities = store.len(),
            "world created"
        );
        Ok(Self {
            config,
            store,
            clock,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<WorldStore> {
        &self.store
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Build the simulation that owns this world's clock and scalar state.
    pub fn simulation(&self) -> Simulation {
        Simulation::new(
            Arc::clone(&self.store),
            self.clock.clone(),
            self.config.frame_rate,
        )
    }
}

/// Enemy start cells: staggered rows from the top, two columns apart, never on
/// a wall or on the cursor. Returns at most `start_num_enemies` cells.
pub fn formation(config: &GameConfig) -> Vec<Coord> {
    let wanted = config.start_num_enemies as usize;
    let mut slots = Vec::with_capacity(wanted);

    let mut y = FORMATION_TOP;
    while slots.len() < wanted && y < config.height - 1 {
        let offset = (y - FORMATION_TOP) % 2;
        let mut x = 1 + offset;
        while slots.len() < wanted && x < config.width - 1 {
            let pos = Coord::new(x, y);
            if pos != config.cursor_pos {
                slots.push(pos);
            }
            x += 2;
        }
        y += 1;
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Kind;

    #[test]
    fn perimeter_is_walled() {
        let world = World::new(GameConfig::default()).unwrap();
        let c = world.config();
        for x in 0..c.width {
            for y in [0, c.height - 1] {
                assert_eq!(
                    world.store().get(Coord::new(x, y)).map(|e| e.kind()),
                    Some(Kind::Wall)
                );
            }
        }
        for y in 0..c.height {
            for x in [0, c.width - 1] {
                assert_eq!(
                    world.store().get(Coord::new(x, y)).map(|e| e.kind()),
                    Some(Kind::Wall)
                );
            }
        }
    }

    #[test]
    fn places_cursor_and_enemies() {
        let world = World::new(GameConfig::default()).unwrap();
        let c = world.config();
        assert_eq!(world.store().cursor(), Some(c.cursor_pos));

        let enemies = world
            .store()
            .snapshot()
            .into_iter()
            .filter(|e| e.kind() == Kind::Enemy)
            .count();
        assert_eq!(enemies, 15);

        let walls = 2 * c.width + 2 * (c.height - 2);
        assert_eq!(world.store().len(), walls as usize + 1 + 15);
    }

    #[test]
    fn formation_stays_inside_and_avoids_cursor() {
        let config = GameConfig {
            width: 7,
            height: 7,
            cursor_pos: Coord::new(2, 3),
            start_num_enemies: 100,
            ..GameConfig::default()
        };
        let slots = formation(&config);
        assert!(!slots.is_empty());
        assert!(slots.iter().all(|&p| config.is_interior(p)));
        assert!(!slots.contains(&config.cursor_pos));

        let mut unique = slots.clone();
        unique.sort_by_key(|p| (p.y, p.x));
        unique.dedup();
        assert_eq!(unique.len(), slots.len());
    }

    #[test]
    fn zero_enemies_is_allowed() {
        let config = GameConfig {
            start_num_enemies: 0,
            ..GameConfig::default()
        };
        assert!(formation(&config).is_empty());
        World::new(config).unwrap();
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = GameConfig {
            cursor_pos: Coord::new(0, 0),
            ..GameConfig::default()
        };
        assert!(World::new(config).is_err());
    }
}
