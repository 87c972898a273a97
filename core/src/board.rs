//! Tile store and board grid that together describe the playing field.

use std::collections::BTreeMap;

use crate::{CellCoord, Tile, TileId};

/// Dense square matrix of optional tile references.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardGrid {
    dimension: u32,
    cells: Vec<Option<TileId>>,
}

impl BoardGrid {
    /// Creates an empty grid with `dimension` cells per edge.
    #[must_use]
    pub fn new(dimension: u32) -> Self {
        let capacity_u64 = u64::from(dimension) * u64::from(dimension);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            dimension,
            cells: vec![None; capacity],
        }
    }

    /// Number of cells along each edge of the grid.
    #[must_use]
    pub const fn dimension(&self) -> u32 {
        self.dimension
    }

    /// Returns the tile referenced by the provided cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<TileId> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Reports whether the cell lies on the grid and holds no tile.
    #[must_use]
    pub fn is_vacant(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .is_some_and(|index| self.cells.get(index).copied().flatten().is_none())
    }

    /// Enumerates every vacant cell, column by column.
    #[must_use]
    pub fn vacant_cells(&self) -> Vec<CellCoord> {
        let mut vacant = Vec::new();
        for column in 0..self.dimension {
            for row in 0..self.dimension {
                let cell = CellCoord::new(column, row);
                if self.is_vacant(cell) {
                    vacant.push(cell);
                }
            }
        }
        vacant
    }

    /// Reports whether every cell holds a tile.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Iterates occupied cells in row-major order.
    pub fn occupants(&self) -> impl Iterator<Item = (CellCoord, TileId)> + '_ {
        let dimension = self.dimension.max(1);
        self.cells.iter().enumerate().filter_map(move |(index, slot)| {
            let index = u32::try_from(index).ok()?;
            slot.map(|id| (CellCoord::new(index % dimension, index / dimension), id))
        })
    }

    fn set(&mut self, cell: CellCoord, occupant: Option<TileId>) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = occupant;
            }
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.dimension && cell.row() < self.dimension {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.dimension).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Authoritative map of tile identity to attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileStore {
    entries: BTreeMap<TileId, Tile>,
    order: Vec<TileId>,
    next_tile_id: u32,
}

impl TileStore {
    /// Looks up the record of the provided tile.
    #[must_use]
    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.entries.get(&id)
    }

    /// Number of tile records held by the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the store holds no tile records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifiers in enumeration order.
    #[must_use]
    pub fn order(&self) -> &[TileId] {
        &self.order
    }

    /// Tile records following the enumeration order, skipping stale identifiers.
    pub fn ordered(&self) -> impl Iterator<Item = &Tile> {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    fn allocate(&mut self) -> TileId {
        let id = TileId::new(self.next_tile_id);
        self.next_tile_id = self.next_tile_id.wrapping_add(1);
        id
    }

    fn upsert(&mut self, tile: Tile) {
        let _ = self.entries.insert(tile.id, tile);
    }
}

/// Invariant violations detected by [`Board::validate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// A tile identifier appears in more than one cell.
    #[error("tile {0} occupies more than one cell")]
    DuplicateTile(TileId),
    /// A cell references a tile the store does not know.
    #[error("cell {cell} references missing tile {id}")]
    MissingTile {
        /// Cell holding the dangling reference.
        cell: CellCoord,
        /// Identifier that has no record.
        id: TileId,
    },
    /// A tile record disagrees with the cell that holds it.
    #[error("tile {id} is recorded at {recorded} but sits at {actual}")]
    PositionMismatch {
        /// Identifier of the inconsistent tile.
        id: TileId,
        /// Cell stored in the tile record.
        recorded: CellCoord,
        /// Cell holding the tile on the grid.
        actual: CellCoord,
    },
    /// A tile value is not a power of two.
    #[error("tile {id} carries invalid value {value}")]
    InvalidValue {
        /// Identifier of the offending tile.
        id: TileId,
        /// Recorded value.
        value: u32,
    },
}

/// Board grid paired with the tile store it references.
///
/// Between a move and its settle step the store may still hold records of
/// absorbed tiles that no longer sit on the grid; [`Board::prune_absorbed`]
/// drops them. Every other mismatch is reported by [`Board::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    grid: BoardGrid,
    store: TileStore,
}

impl Board {
    /// Creates an empty board with `dimension` cells per edge.
    #[must_use]
    pub fn new(dimension: u32) -> Self {
        Self {
            grid: BoardGrid::new(dimension),
            store: TileStore::default(),
        }
    }

    /// Builds a board from rows of optional values, allocating ids row by row.
    ///
    /// The dimension is the number of rows; missing trailing cells stay empty
    /// and surplus cells are ignored.
    #[must_use]
    pub fn from_rows(rows: &[&[Option<u32>]]) -> Self {
        let dimension = u32::try_from(rows.len()).unwrap_or(0);
        let mut board = Self::new(dimension);
        for (row_index, values) in rows.iter().enumerate() {
            for (column_index, value) in values.iter().enumerate() {
                let (Ok(column), Ok(row)) =
                    (u32::try_from(column_index), u32::try_from(row_index))
                else {
                    continue;
                };
                if let Some(value) = value {
                    let _ = board.create_tile(CellCoord::new(column, row), *value);
                }
            }
        }
        board
    }

    /// Copy of this board with an empty grid and store that keeps the id
    /// counter and the enumeration order.
    ///
    /// Tiles are then re-added through [`Board::place_tile`] and
    /// [`Board::record_tile`].
    #[must_use]
    pub fn cleared(&self) -> Self {
        Self {
            grid: BoardGrid::new(self.grid.dimension()),
            store: TileStore {
                entries: BTreeMap::new(),
                order: self.store.order.clone(),
                next_tile_id: self.store.next_tile_id,
            },
        }
    }

    /// Number of cells along each edge of the board.
    #[must_use]
    pub const fn dimension(&self) -> u32 {
        self.grid.dimension()
    }

    /// Read-only access to the grid.
    #[must_use]
    pub const fn grid(&self) -> &BoardGrid {
        &self.grid
    }

    /// Read-only access to the tile store.
    #[must_use]
    pub const fn store(&self) -> &TileStore {
        &self.store
    }

    /// Returns the tile sitting on the provided cell, if any.
    #[must_use]
    pub fn tile_at(&self, cell: CellCoord) -> Option<&Tile> {
        self.grid.occupant(cell).and_then(|id| self.store.get(id))
    }

    /// Face value of the tile on the provided cell, if any.
    #[must_use]
    pub fn value_at(&self, cell: CellCoord) -> Option<u32> {
        self.tile_at(cell).map(|tile| tile.value)
    }

    /// Tiles currently on the grid in row-major order.
    pub fn tiles_on_grid(&self) -> impl Iterator<Item = &Tile> {
        self.grid
            .occupants()
            .filter_map(|(_, id)| self.store.get(id))
    }

    /// Ordered snapshot of every tile record, including absorbed tiles that
    /// have not been pruned yet.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Tile> {
        self.store.ordered().copied().collect()
    }

    /// Creates a tile with a fresh id on a vacant cell and appends it to the
    /// enumeration order. Returns `None` if the cell is occupied or off the grid.
    pub fn create_tile(&mut self, cell: CellCoord, value: u32) -> Option<Tile> {
        if !self.grid.is_vacant(cell) {
            return None;
        }
        let tile = Tile::new(self.store.allocate(), cell, value);
        self.grid.set(tile.cell, Some(tile.id));
        self.store.upsert(tile);
        self.store.order.push(tile.id);
        Some(tile)
    }

    /// Writes a tile record and references it from its cell.
    pub fn place_tile(&mut self, tile: Tile) {
        self.grid.set(tile.cell, Some(tile.id));
        self.store.upsert(tile);
    }

    /// Writes a tile record without touching the grid.
    pub fn record_tile(&mut self, tile: Tile) {
        self.store.upsert(tile);
    }

    /// Drops records of tiles that no longer sit on the grid and rebuilds the
    /// enumeration order from the grid in row-major order.
    ///
    /// Returns the number of records removed.
    pub fn prune_absorbed(&mut self) -> usize {
        let occupants: Vec<TileId> = self.grid.occupants().map(|(_, id)| id).collect();
        let before = self.store.entries.len();
        self.store.entries.retain(|id, _| occupants.contains(id));
        self.store.order = occupants
            .into_iter()
            .filter(|id| self.store.entries.contains_key(id))
            .collect();
        before - self.store.entries.len()
    }

    /// Reports whether two orthogonally adjacent tiles share a value.
    #[must_use]
    pub fn has_adjacent_match(&self) -> bool {
        let last = self.dimension().saturating_sub(1);
        for column in 0..self.dimension() {
            for row in 0..self.dimension() {
                let Some(value) = self.value_at(CellCoord::new(column, row)) else {
                    continue;
                };
                if column < last && self.value_at(CellCoord::new(column + 1, row)) == Some(value) {
                    return true;
                }
                if row < last && self.value_at(CellCoord::new(column, row + 1)) == Some(value) {
                    return true;
                }
            }
        }
        false
    }

    /// Sum of the values of every tile on the grid.
    #[must_use]
    pub fn grid_value_sum(&self) -> u64 {
        self.tiles_on_grid().map(|tile| u64::from(tile.value)).sum()
    }

    /// Checks that the grid and the store agree with each other.
    pub fn validate(&self) -> Result<(), BoardError> {
        let mut seen: Vec<TileId> = Vec::new();
        for (_, id) in self.grid.occupants() {
            if seen.contains(&id) {
                return Err(BoardError::DuplicateTile(id));
            }
            seen.push(id);
        }

        for (cell, id) in self.grid.occupants() {
            let tile = self
                .store
                .get(id)
                .ok_or(BoardError::MissingTile { cell, id })?;
            if tile.cell != cell {
                return Err(BoardError::PositionMismatch {
                    id,
                    recorded: tile.cell,
                    actual: cell,
                });
            }
            if tile.value < 2 || !tile.value.is_power_of_two() {
                return Err(BoardError::InvalidValue {
                    id,
                    value: tile.value,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_tile_rejects_occupied_and_off_grid_cells() {
        let mut board = Board::new(4);
        let first = board.create_tile(CellCoord::new(1, 2), 2);
        assert!(first.is_some());
        assert!(board.create_tile(CellCoord::new(1, 2), 2).is_none());
        assert!(board.create_tile(CellCoord::new(4, 0), 2).is_none());
        assert_eq!(board.store().len(), 1);
        assert_eq!(board.grid().vacant_cells().len(), 15);
    }

    #[test]
    fn tile_ids_are_unique_and_ordered_by_creation() {
        let mut board = Board::new(3);
        let a = board.create_tile(CellCoord::new(2, 2), 2).expect("vacant");
        let b = board.create_tile(CellCoord::new(0, 0), 2).expect("vacant");
        assert_ne!(a.id, b.id);
        assert_eq!(board.store().order(), &[a.id, b.id]);
        let values: Vec<CellCoord> = board.snapshot().iter().map(|tile| tile.cell).collect();
        assert_eq!(values, vec![CellCoord::new(2, 2), CellCoord::new(0, 0)]);
    }

    #[test]
    fn from_rows_places_values_row_major() {
        let board = Board::from_rows(&[
            &[Some(2), None, None],
            &[None, Some(4), None],
            &[None, None, Some(8)],
        ]);
        assert_eq!(board.dimension(), 3);
        assert_eq!(board.value_at(CellCoord::new(0, 0)), Some(2));
        assert_eq!(board.value_at(CellCoord::new(1, 1)), Some(4));
        assert_eq!(board.value_at(CellCoord::new(2, 2)), Some(8));
        assert_eq!(board.value_at(CellCoord::new(1, 0)), None);
        assert!(board.validate().is_ok());
    }

    #[test]
    fn prune_absorbed_drops_records_missing_from_grid() {
        let mut board = Board::from_rows(&[&[Some(2), Some(2)], &[None, None]]);
        let survivor = *board.tile_at(CellCoord::new(0, 0)).expect("tile");
        let absorbed = *board.tile_at(CellCoord::new(1, 0)).expect("tile");

        let mut next = board.cleared();
        next.place_tile(Tile::new(survivor.id, survivor.cell, 4));
        next.record_tile(Tile::new(absorbed.id, survivor.cell, 4));
        board = next;
        assert_eq!(board.snapshot().len(), 2);

        assert_eq!(board.prune_absorbed(), 1);
        assert_eq!(board.store().order(), &[survivor.id]);
        assert!(board.store().get(absorbed.id).is_none());
        assert!(board.validate().is_ok());
    }

    #[test]
    fn validate_reports_position_mismatch() {
        let mut board = Board::from_rows(&[&[Some(2), None], &[None, None]]);
        let tile = *board.tile_at(CellCoord::new(0, 0)).expect("tile");
        board.record_tile(Tile::new(tile.id, CellCoord::new(1, 1), 2));
        assert_eq!(
            board.validate(),
            Err(BoardError::PositionMismatch {
                id: tile.id,
                recorded: CellCoord::new(1, 1),
                actual: CellCoord::new(0, 0),
            })
        );
    }

    #[test]
    fn validate_reports_duplicate_references() {
        let mut board = Board::from_rows(&[&[Some(2), None], &[None, None]]);
        let tile = *board.tile_at(CellCoord::new(0, 0)).expect("tile");
        board.place_tile(Tile::new(tile.id, CellCoord::new(1, 0), 2));
        assert_eq!(board.validate(), Err(BoardError::DuplicateTile(tile.id)));
    }

    #[test]
    fn adjacency_scan_checks_right_and_down_neighbours() {
        let immobile = Board::from_rows(&[&[Some(2), Some(4)], &[Some(4), Some(2)]]);
        assert!(!immobile.has_adjacent_match());

        let vertical = Board::from_rows(&[&[Some(2), Some(4)], &[Some(2), Some(8)]]);
        assert!(vertical.has_adjacent_match());

        let horizontal = Board::from_rows(&[&[Some(2), Some(4)], &[Some(8), Some(8)]]);
        assert!(horizontal.has_adjacent_match());
    }
}
