//! Fixed-size combat grid with placement, movement and targeting geometry.
//!
//! Each cell holds at most one [`EntityId`]. Entities that stand on the grid
//! implement [`Occupant`]; the battlefield writes the entity's stored position
//! whenever it writes the grid, so the grid and the entity's coordinates are
//! always inverse indexes of each other. Geometry queries never mutate.

use crate::state::{EntityId, Position};

/// Something that can stand on a battlefield cell.
pub trait Occupant {
    fn entity_id(&self) -> EntityId;

    fn position(&self) -> Option<Position>;

    /// Only the battlefield should call this.
    fn set_position(&mut self, position: Option<Position>);
}

/// Reasons a placement or move is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlacementError {
    #[error("position {position} is outside the battlefield")]
    OutOfBounds { position: Position },

    #[error("position {position} is occupied by {occupant}")]
    Occupied {
        position: Position,
        occupant: EntityId,
    },

    #[error("entity {entity} is not on the battlefield")]
    NotPlaced { entity: EntityId },
}

/// Entity found by [`Battlefield::all_entities`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacedEntity {
    pub entity: EntityId,
    pub position: Position,
}

/// Serializable projection: dimensions plus a row-major grid of ids.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattlefieldView {
    pub width: u32,
    pub height: u32,
    /// `grid[y][x]`.
    pub grid: Vec<Vec<Option<EntityId>>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Battlefield {
    width: u32,
    height: u32,
    /// Row-major cells, `cells[y * width + x]`.
    cells: Vec<Option<EntityId>>,
}

impl Battlefield {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![None; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.is_valid_position(position)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }

    pub fn is_valid_position(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height
    }

    /// True when the cell is in bounds and unoccupied.
    pub fn is_empty(&self, position: Position) -> bool {
        self.index(position)
            .is_some_and(|index| self.cells[index].is_none())
    }

    pub fn entity_at(&self, position: Position) -> Option<EntityId> {
        self.index(position).and_then(|index| self.cells[index])
    }

    /// Places `entity` at `position`, vacating any cell it held before.
    pub fn place<O: Occupant + ?Sized>(
        &mut self,
        entity: &mut O,
        position: Position,
    ) -> Result<(), PlacementError> {
        let index = self.vacant_index(position)?;

        if let Some(previous) = entity.position()
            && let Some(previous_index) = self.index(previous)
            && self.cells[previous_index] == Some(entity.entity_id())
        {
            self.cells[previous_index] = None;
        }

        self.cells[index] = Some(entity.entity_id());
        entity.set_position(Some(position));
        Ok(())
    }

    /// Moves a placed entity to `to`. The grid is untouched on failure.
    pub fn move_entity<O: Occupant + ?Sized>(
        &mut self,
        entity: &mut O,
        to: Position,
    ) -> Result<(), PlacementError> {
        let id = entity.entity_id();
        let from = entity
            .position()
            .filter(|from| self.entity_at(*from) == Some(id))
            .ok_or(PlacementError::NotPlaced { entity: id })?;
        let to_index = self.vacant_index(to)?;

        if let Some(from_index) = self.index(from) {
            self.cells[from_index] = None;
        }
        self.cells[to_index] = Some(id);
        entity.set_position(Some(to));
        Ok(())
    }

    /// Takes `entity` off the grid and clears its coordinates.
    ///
    /// Returns the position it occupied, if any.
    pub fn remove<O: Occupant + ?Sized>(&mut self, entity: &mut O) -> Option<Position> {
        let position = entity.position()?;
        if let Some(index) = self.index(position)
            && self.cells[index] == Some(entity.entity_id())
        {
            self.cells[index] = None;
        }
        entity.set_position(None);
        Some(position)
    }

    fn vacant_index(&self, position: Position) -> Result<usize, PlacementError> {
        let index = self
            .index(position)
            .ok_or(PlacementError::OutOfBounds { position })?;
        match self.cells[index] {
            Some(occupant) => Err(PlacementError::Occupied { position, occupant }),
            None => Ok(index),
        }
    }

    /// Manhattan distance.
    pub fn distance(&self, from: Position, to: Position) -> u32 {
        from.manhattan(to)
    }

    /// Bresenham line from `from` to `to`, both endpoints included.
    pub fn line(&self, from: Position, to: Position) -> Vec<Position> {
        let dx = (to.x - from.x).abs();
        let dy = (to.y - from.y).abs();
        let sx = if from.x < to.x { 1 } else { -1 };
        let sy = if from.y < to.y { 1 } else { -1 };
        let mut err = dx - dy;

        let (mut x, mut y) = (from.x, from.y);
        let mut cells = Vec::with_capacity((dx.max(dy) + 1) as usize);
        loop {
            cells.push(Position::new(x, y));
            if x == to.x && y == to.y {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
        cells
    }

    /// In-bounds cells within Manhattan `radius` of `center`, center included.
    pub fn area(&self, center: Position, radius: u32) -> Vec<Position> {
        let r = radius as i32;
        let mut cells = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                let cell = Position::new(center.x + dx, center.y + dy);
                if dx.abs() + dy.abs() <= r && self.is_valid_position(cell) {
                    cells.push(cell);
                }
            }
        }
        cells
    }

    /// Directional wedge starting one step from `origin`.
    ///
    /// At step `r` the lateral half-width is `floor(width * r / range)`. The
    /// dominant component of `direction` picks the axis; ties go vertical.
    pub fn cone(
        &self,
        origin: Position,
        direction: (i32, i32),
        range: u32,
        width: u32,
    ) -> Vec<Position> {
        let (dir_x, dir_y) = direction;
        let horizontal = dir_x.abs() > dir_y.abs();
        let mut cells = Vec::new();
        if range == 0 {
            return cells;
        }

        for r in 1..=range as i32 {
            let half = (width as i32 * r) / range as i32;
            for w in -half..=half {
                let cell = if horizontal {
                    Position::new(origin.x + dir_x * r, origin.y + w)
                } else {
                    Position::new(origin.x + w, origin.y + dir_y * r)
                };
                if self.is_valid_position(cell) {
                    cells.push(cell);
                }
            }
        }
        cells
    }

    /// Every occupied cell, in row-major order.
    pub fn all_entities(&self) -> Vec<PlacedEntity> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| {
                cell.map(|entity| PlacedEntity {
                    entity,
                    position: Position::new(
                        (index % self.width as usize) as i32,
                        (index / self.width as usize) as i32,
                    ),
                })
            })
            .collect()
    }

    pub fn view(&self) -> BattlefieldView {
        let grid = if self.width == 0 {
            vec![Vec::new(); self.height as usize]
        } else {
            self.cells
                .chunks(self.width as usize)
                .map(<[Option<EntityId>]>::to_vec)
                .collect()
        };
        BattlefieldView {
            width: self.width,
            height: self.height,
            grid,
        }
    }
}
