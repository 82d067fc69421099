//! The space agents live in.
//!
//! [`Space`] is everything the simulation needs from a grid; [`MultiGrid`] is the toroidal grid
//! used by default, where any number of agents can share a cell.
use crate::person::PersonId;
use crate::random::SimRng;

/// A cell coordinate, `(x, y)`.
pub type Position = (usize, usize);

pub trait Space {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Puts an agent on the grid for the first time.
    fn place(&mut self, person_id: PersonId, position: Position);

    /// Relocates an agent that is already on the grid.
    fn move_to(&mut self, person_id: PersonId, position: Position);

    fn position_of(&self, person_id: PersonId) -> Position;

    /// The agents in a cell, in the order they arrived.
    fn cell_contents(&self, position: Position) -> &[PersonId];

    /// The cells an agent at `position` can step to, not including `position` itself.
    fn neighborhood(&self, position: Position) -> Vec<Position>;

    fn random_position(&self, rng: &mut SimRng) -> Position {
        (
            rng.sample_range(0..self.width()),
            rng.sample_range(0..self.height()),
        )
    }
}

/// A `width` x `height` torus. Neighborhoods are 8-connected and wrap around the edges.
pub struct MultiGrid {
    width: usize,
    height: usize,
    cells: Vec<Vec<PersonId>>,
    positions: Vec<Option<Position>>,
}

impl MultiGrid {
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        MultiGrid {
            width,
            height,
            cells: vec![Vec::new(); width * height],
            positions: Vec::new(),
        }
    }

    fn cell_index(&self, (x, y): Position) -> usize {
        assert!(
            x < self.width && y < self.height,
            "position ({x}, {y}) is outside a {}x{} grid",
            self.width,
            self.height
        );
        y * self.width + x
    }

    fn remove_from_cell(&mut self, person_id: PersonId, position: Position) {
        let index = self.cell_index(position);
        let cell = &mut self.cells[index];
        let slot = cell
            .iter()
            .position(|&id| id == person_id)
            .unwrap_or_else(|| panic!("{person_id:?} is not in cell {position:?}"));
        // `remove` rather than `swap_remove`: cell order feeds the infection draws.
        cell.remove(slot);
    }
}

impl Space for MultiGrid {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn place(&mut self, person_id: PersonId, position: Position) {
        let index = self.cell_index(position);
        if self.positions.len() <= person_id.0 {
            self.positions.resize(person_id.0 + 1, None);
        }
        assert!(
            self.positions[person_id.0].is_none(),
            "{person_id:?} is already on the grid"
        );
        self.positions[person_id.0] = Some(position);
        self.cells[index].push(person_id);
    }

    fn move_to(&mut self, person_id: PersonId, position: Position) {
        let current = self.position_of(person_id);
        if current == position {
            return;
        }
        let index = self.cell_index(position);
        self.remove_from_cell(person_id, current);
        self.cells[index].push(person_id);
        self.positions[person_id.0] = Some(position);
    }

    fn position_of(&self, person_id: PersonId) -> Position {
        self.positions
            .get(person_id.0)
            .copied()
            .flatten()
            .unwrap_or_else(|| panic!("{person_id:?} has not been placed on the grid"))
    }

    fn cell_contents(&self, position: Position) -> &[PersonId] {
        &self.cells[self.cell_index(position)]
    }

    fn neighborhood(&self, position: Position) -> Vec<Position> {
        let (x, y) = position;
        let mut neighbors = Vec::with_capacity(8);
        for dy in [self.height - 1, 0, 1] {
            for dx in [self.width - 1, 0, 1] {
                let neighbor = ((x + dx) % self.width, (y + dy) % self.height);
                // On grids narrower than 3 cells the wrap-around revisits cells.
                if neighbor != position && !neighbors.contains(&neighbor) {
                    neighbors.push(neighbor);
                }
            }
        }
        neighbors
    }
}
