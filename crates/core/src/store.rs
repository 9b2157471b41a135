//! World store - the single source of truth for what occupies which cell
//!
//! The map is guarded by a reader/writer lock. Every public operation takes the
//! lock once, so a reader can never observe an entity between its old and new
//! cell. Consumers that need a consistent view of many cells call
//! [`WorldStore::snapshot`] and iterate the copy.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use crate::entity::Entity;
use crate::types::Coord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("cell {0} is occupied")]
    Occupied(Coord),
    #[error("no entity at {0}")]
    Vacant(Coord),
    #[error("cursor not found in world store")]
    CursorMissing,
}

#[derive(Debug, Default)]
struct Cells {
    map: HashMap<Coord, Entity>,
    /// Position of the player cursor, kept in step with `map`.
    cursor: Option<Coord>,
}

impl Cells {
    fn put(&mut self, entity: Entity) -> Option<Entity> {
        let pos = entity.position;
        let is_cursor = entity.is_cursor();
        let replaced = self.map.insert(pos, entity);
        if is_cursor {
            self.cursor = Some(pos);
        } else if self.cursor == Some(pos) {
            self.cursor = None;
        }
        replaced
    }

    fn take(&mut self, pos: Coord) -> Option<Entity> {
        let entity = self.map.remove(&pos)?;
        if self.cursor == Some(pos) {
            self.cursor = None;
        }
        Some(entity)
    }
}

/// Concurrency-safe position → entity map.
#[derive(Debug, Default)]
pub struct WorldStore {
    cells: RwLock<Cells>,
}

impl WorldStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Writers never leave `Cells` half-updated, so a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, Cells> {
        self.cells.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Cells> {
        self.cells.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or overwrite the entity at its own position.
    pub fn set(&self, entity: Entity) -> Option<Entity> {
        self.write().put(entity)
    }

    /// Insert only if the cell is empty.
    pub fn insert_vacant(&self, entity: Entity) -> bool {
        let mut cells = self.write();
        if cells.map.contains_key(&entity.position) {
            return false;
        }
        cells.put(entity);
        true
    }

    pub fn remove(&self, pos: Coord) -> Option<Entity> {
        self.write().take(pos)
    }

    pub fn get(&self, pos: Coord) -> Option<Entity> {
        self.read().map.get(&pos).cloned()
    }

    pub fn is_occupied(&self, pos: Coord) -> bool {
        self.read().map.contains_key(&pos)
    }

    /// Mutate the occupant of `pos` in place.
    pub fn update<R>(&self, pos: Coord, f: impl FnOnce(&mut Entity) -> R) -> Option<R> {
        self.write().map.get_mut(&pos).map(f)
    }

    /// Move whatever is at `from` to `to` in a single critical section.
    ///
    /// Fails without changing anything if `to` is occupied or `from` is empty.
    pub fn relocate(&self, from: Coord, to: Coord) -> Result<(), StoreError> {
        let mut cells = self.write();
        if cells.map.contains_key(&to) {
            return Err(StoreError::Occupied(to));
        }
        let mut entity = cells.take(from).ok_or(StoreError::Vacant(from))?;
        entity.position = to;
        cells.put(entity);
        Ok(())
    }

    pub fn cursor(&self) -> Option<Coord> {
        self.read().cursor
    }

    /// Queue a one-shot move on the cursor, replacing any earlier request.
    pub fn set_cursor_delta(&self, delta: Coord) -> Result<(), StoreError> {
        let mut cells = self.write();
        let pos = cells.cursor.ok_or(StoreError::CursorMissing)?;
        match cells.map.get_mut(&pos).map(|c| c.set_pending_delta(delta)) {
            Some(true) => Ok(()),
            _ => Err(StoreError::CursorMissing),
        }
    }

    /// Clear the cursor's pending move. Returns the cursor position and the delta.
    pub fn take_cursor_delta(&self) -> Option<(Coord, Coord)> {
        let mut cells = self.write();
        let pos = cells.cursor?;
        let delta = cells.map.get_mut(&pos)?.take_pending_delta()?;
        Some((pos, delta))
    }

    /// Copy of every entity, ordered by creation.
    pub fn snapshot(&self) -> Vec<Entity> {
        let mut all: Vec<Entity> = self.read().map.values().cloned().collect();
        all.sort_by_key(Entity::id);
        all
    }

    /// Glyph per cell for a `width` x `height` window, row-major.
    pub fn glyph_grid(&self, width: i32, height: i32) -> Vec<Option<char>> {
        let cells = self.read();
        let cols = usize::try_from(width).unwrap_or(0);
        let rows = usize::try_from(height).unwrap_or(0);
        let mut out = Vec::with_capacity(cols.saturating_mul(rows));
        for y in 0..height {
            for x in 0..width {
                out.push(cells.map.get(&Coord::new(x, y)).map(Entity::glyph));
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.read().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn set_get_remove() {
        let store = WorldStore::new();
        let p = Coord::new(1, 1);
        assert!(store.get(p).is_none());

        store.set(Entity::wall(p));
        assert_eq!(store.get(p).map(|e| e.position), Some(p));
        assert!(store.remove(p).is_some());
        assert!(store.get(p).is_none());
        assert!(store.remove(p).is_none());
    }

    #[test]
    fn set_overwrites_occupant() {
        let store = WorldStore::new();
        let p = Coord::new(4, 4);
        store.set(Entity::wall(p));
        let replaced = store.set(Entity::explosion(p, Duration::ZERO));
        assert!(replaced.is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn insert_vacant_refuses_occupied_cells() {
        let store = WorldStore::new();
        let p = Coord::new(2, 3);
        assert!(store.insert_vacant(Entity::wall(p)));
        assert!(!store.insert_vacant(Entity::bullet(p, Duration::ZERO)));
        assert_eq!(store.get(p).map(|e| e.glyph()), Some(crate::types::WALL_GLYPH));
    }

    #[test]
    fn relocate_moves_and_tracks_cursor() {
        let store = WorldStore::new();
        let from = Coord::new(5, 5);
        let to = Coord::new(5, 4);
        store.set(Entity::cursor(from));
        assert_eq!(store.cursor(), Some(from));

        store.relocate(from, to).unwrap();
        assert!(store.get(from).is_none());
        assert_eq!(store.get(to).unwrap().position, to);
        assert_eq!(store.cursor(), Some(to));
    }

    #[test]
    fn relocate_into_occupied_cell_changes_nothing() {
        let store = WorldStore::new();
        let from = Coord::new(1, 1);
        let to = Coord::new(1, 2);
        store.set(Entity::cursor(from));
        store.set(Entity::wall(to));

        assert_eq!(store.relocate(from, to), Err(StoreError::Occupied(to)));
        assert!(store.get(from).unwrap().is_cursor());
        assert_eq!(store.get(to).unwrap().glyph(), crate::types::WALL_GLYPH);
        assert_eq!(
            store.relocate(Coord::new(9, 9), Coord::new(8, 8)),
            Err(StoreError::Vacant(Coord::new(9, 9)))
        );
    }

    #[test]
    fn overwriting_cursor_clears_index() {
        let store = WorldStore::new();
        let p = Coord::new(3, 3);
        store.set(Entity::cursor(p));
        store.set(Entity::explosion(p, Duration::ZERO));
        assert_eq!(store.cursor(), None);
        assert_eq!(
            store.set_cursor_delta(Coord::UP),
            Err(StoreError::CursorMissing)
        );
    }

    #[test]
    fn cursor_delta_round_trips_through_store() {
        let store = WorldStore::new();
        let p = Coord::new(3, 3);
        store.set(Entity::cursor(p));
        store.set_cursor_delta(Coord::LEFT).unwrap();
        assert_eq!(store.get(p).unwrap().pending_delta(), Some(Coord::LEFT));
        assert_eq!(store.take_cursor_delta(), Some((p, Coord::LEFT)));
        assert_eq!(store.get(p).unwrap().pending_delta(), None);
        assert_eq!(store.take_cursor_delta(), None);
    }

    #[test]
    fn snapshot_is_creation_ordered() {
        let store = WorldStore::new();
        let a = Entity::wall(Coord::new(9, 0));
        let b = Entity::wall(Coord::new(0, 9));
        let (ida, idb) = (a.id(), b.id());
        store.set(b);
        store.set(a);
        let ids: Vec<_> = store.snapshot().iter().map(Entity::id).collect();
        assert_eq!(ids, vec![ida, idb]);
    }

    #[test]
    fn glyph_grid_is_row_major() {
        let store = WorldStore::new();
        store.set(Entity::wall(Coord::new(1, 0)));
        store.set(Entity::cursor(Coord::new(0, 1)));
        let grid = store.glyph_grid(2, 2);
        assert_eq!(
            grid,
            vec![
                None,
                Some(crate::types::WALL_GLYPH),
                Some(crate::types::CURSOR_GLYPH),
                None
            ]
        );
    }

    #[test]
    fn glyph_grid_of_degenerate_window_is_empty() {
        let store = WorldStore::new();
        store.set(Entity::wall(Coord::new(0, 0)));
        assert!(store.glyph_grid(-3, 2).is_empty());
        assert!(store.glyph_grid(2, 0).is_empty());
    }

    #[test]
    fn concurrent_readers_never_see_half_moves() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(WorldStore::new());
        store.set(Entity::cursor(Coord::new(0, 0)));

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..500 {
                    let from = Coord::new(i % 2, 0);
                    let to = Coord::new((i + 1) % 2, 0);
                    store.relocate(from, to).unwrap();
                }
            })
        };

        for _ in 0..500 {
            assert_eq!(store.len(), 1);
            assert!(store.cursor().is_some());
        }
        writer.join().unwrap();
    }
}
