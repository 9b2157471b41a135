//! Entity module - everything that can occupy a grid cell
//!
//! Entities are a closed set of kinds. Each kind carries only the state its
//! behavior needs: a patrol pattern for enemies and bullets, a lifetime for
//! bullets and explosions, and a one-shot movement request for the cursor.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use arrayvec::ArrayVec;

use crate::types::{
    Category, Coord, Kind, BULLET_PATTERN, BULLET_STEP_MS, BULLET_TTL_MS, ENEMY_PATTERN,
    ENEMY_STEP_MS, EXPLOSION_TTL_MS,
};

/// Longest supported step pattern
pub const MAX_PATTERN_LEN: usize = 8;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Unique, creation-ordered entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u64);

impl EntityId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Cyclic step pattern with a fixed cadence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    steps: ArrayVec<Coord, MAX_PATTERN_LEN>,
    interval: Duration,
    /// Simulation time of the last scheduled step
    last_moved: Duration,
    /// Index of the step used previously
    prev_index: usize,
}

impl Movement {
    /// Create a pattern whose first step is due at `start + interval`.
    ///
    /// Patterns longer than [`MAX_PATTERN_LEN`] are truncated.
    pub fn new(steps: &[Coord], interval: Duration, start: Duration) -> Self {
        let steps: ArrayVec<Coord, MAX_PATTERN_LEN> =
            steps.iter().take(MAX_PATTERN_LEN).copied().collect();
        // Start on the last step so the next one taken is the first.
        let prev_index = steps.len().saturating_sub(1);
        Self {
            steps,
            interval,
            last_moved: start,
            prev_index,
        }
    }

    pub fn is_due(&self, now: Duration) -> bool {
        !self.steps.is_empty() && now >= self.next_due()
    }

    pub fn next_due(&self) -> Duration {
        self.last_moved + self.interval
    }

    /// Consume the next step slot and return its delta.
    ///
    /// The slot is spent whether or not the caller manages to move, so a
    /// blocked mover skips that step and keeps its cadence instead of retrying
    /// on every tick. The schedule advances by exactly one interval, not to
    /// `now`, so a late poll does not shift the cadence.
    pub fn advance(&mut self) -> Option<Coord> {
        if self.steps.is_empty() {
            return None;
        }
        self.prev_index = (self.prev_index + 1) % self.steps.len();
        self.last_moved += self.interval;
        Some(self.steps[self.prev_index])
    }

    pub fn cycle_index(&self) -> usize {
        self.prev_index
    }

    pub fn last_moved(&self) -> Duration {
        self.last_moved
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Creation time plus time-to-live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    created: Duration,
    ttl: Duration,
}

impl Expiry {
    pub fn new(created: Duration, ttl: Duration) -> Self {
        Self { created, ttl }
    }

    pub fn is_expired(&self, now: Duration) -> bool {
        now >= self.created + self.ttl
    }

    pub fn expires_at(&self) -> Duration {
        self.created + self.ttl
    }
}

/// Kind-specific entity state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Wall,
    Enemy { movement: Movement },
    Cursor { pending: Option<Coord> },
    Bullet { movement: Movement, expiry: Expiry },
    Explosion { expiry: Expiry },
}

/// An object placed on the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    id: EntityId,
    pub position: Coord,
    pub body: Body,
}

impl Entity {
    fn spawn(position: Coord, body: Body) -> Self {
        Self {
            id: EntityId::next(),
            position,
            body,
        }
    }

    pub fn wall(position: Coord) -> Self {
        Self::spawn(position, Body::Wall)
    }

    /// Enemy on its patrol loop; `now` is the schedule baseline.
    pub fn enemy(position: Coord, now: Duration) -> Self {
        let movement = Movement::new(&ENEMY_PATTERN, Duration::from_millis(ENEMY_STEP_MS), now);
        Self::spawn(position, Body::Enemy { movement })
    }

    pub fn cursor(position: Coord) -> Self {
        Self::spawn(position, Body::Cursor { pending: None })
    }

    pub fn bullet(position: Coord, now: Duration) -> Self {
        let movement = Movement::new(&BULLET_PATTERN, Duration::from_millis(BULLET_STEP_MS), now);
        let expiry = Expiry::new(now, Duration::from_millis(BULLET_TTL_MS));
        Self::spawn(position, Body::Bullet { movement, expiry })
    }

    pub fn explosion(position: Coord, now: Duration) -> Self {
        let expiry = Expiry::new(now, Duration::from_millis(EXPLOSION_TTL_MS));
        Self::spawn(position, Body::Explosion { expiry })
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> Kind {
        match self.body {
            Body::Wall => Kind::Wall,
            Body::Enemy { .. } => Kind::Enemy,
            Body::Cursor { .. } => Kind::Cursor,
            Body::Bullet { .. } => Kind::Bullet,
            Body::Explosion { .. } => Kind::Explosion,
        }
    }

    pub fn category(&self) -> Category {
        self.kind().category()
    }

    pub fn glyph(&self) -> char {
        self.kind().glyph()
    }

    pub fn is_cursor(&self) -> bool {
        matches!(self.body, Body::Cursor { .. })
    }

    pub fn movement(&self) -> Option<&Movement> {
        match &self.body {
            Body::Enemy { movement } | Body::Bullet { movement, .. } => Some(movement),
            _ => None,
        }
    }

    pub fn movement_mut(&mut self) -> Option<&mut Movement> {
        match &mut self.body {
            Body::Enemy { movement } | Body::Bullet { movement, .. } => Some(movement),
            _ => None,
        }
    }

    pub fn expiry(&self) -> Option<Expiry> {
        match self.body {
            Body::Bullet { expiry, .. } | Body::Explosion { expiry } => Some(expiry),
            _ => None,
        }
    }

    pub fn pending_delta(&self) -> Option<Coord> {
        match self.body {
            Body::Cursor { pending } => pending,
            _ => None,
        }
    }

    /// Record a movement request. Returns false for non-cursor entities.
    pub fn set_pending_delta(&mut self, delta: Coord) -> bool {
        match &mut self.body {
            Body::Cursor { pending } => {
                *pending = Some(delta);
                true
            }
            _ => false,
        }
    }

    pub fn take_pending_delta(&mut self) -> Option<Coord> {
        match &mut self.body {
            Body::Cursor { pending } => pending.take(),
            _ => None,
        }
    }
}
