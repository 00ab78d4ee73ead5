use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// A cube of `side³` cells backed by a flat buffer.
///
/// Cells are laid out Y-major, then Z, then X:
/// `index = x + z * side + y * side * side`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid3<T> {
    side: usize,
    cells: Vec<T>,
}

impl<T: Clone + Default> Grid3<T> {
    pub fn new(side: usize) -> Self {
        Self {
            side,
            cells: vec![T::default(); side * side * side],
        }
    }

    /// Reset every cell to the default value.
    pub fn clear(&mut self) {
        self.cells.fill(T::default());
    }
}

impl<T> Grid3<T> {
    /// Build a grid by evaluating `f` at every `(x, y, z)`.
    pub fn from_fn<F>(side: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> T,
    {
        let mut cells = Vec::with_capacity(side * side * side);
        for y in 0..side {
            for z in 0..side {
                for x in 0..side {
                    cells.push(f(x, y, z));
                }
            }
        }
        Self { side, cells }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline(always)]
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        let side = self.side as i64;
        (0..side).contains(&(x as i64))
            && (0..side).contains(&(y as i64))
            && (0..side).contains(&(z as i64))
    }

    #[inline(always)]
    pub fn coords_to_index(&self, x: usize, y: usize, z: usize) -> usize {
        x + z * self.side + y * self.side * self.side
    }

    #[inline(always)]
    pub fn index_to_coords(&self, index: usize) -> (usize, usize, usize) {
        let side = self.side;
        let x = index % side;
        let z = (index / side) % side;
        let y = index / (side * side);
        (x, y, z)
    }

    /// Checked lookup with signed coordinates. `None` outside the cube.
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<&T> {
        if !self.contains(x, y, z) {
            return None;
        }
        let index = self.coords_to_index(x as usize, y as usize, z as usize);
        self.cells.get(index)
    }

    pub fn get_mut(&mut self, x: i32, y: i32, z: i32) -> Option<&mut T> {
        if !self.contains(x, y, z) {
            return None;
        }
        let index = self.coords_to_index(x as usize, y as usize, z as usize);
        self.cells.get_mut(index)
    }

    /// Write a cell. Returns `false` (and writes nothing) outside the cube.
    pub fn set(&mut self, x: i32, y: i32, z: i32, value: T) -> bool {
        match self.get_mut(x, y, z) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    /// Iterate all cells with their coordinates, in storage order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize, usize), &T)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, cell)| (self.index_to_coords(index), cell))
    }

    /// Map every cell into a new grid of the same side.
    pub fn map<U, F>(&self, mut f: F) -> Grid3<U>
    where
        F: FnMut(&T) -> U,
    {
        Grid3 {
            side: self.side,
            cells: self.cells.iter().map(|cell| f(cell)).collect(),
        }
    }
}

impl<T> Index<(usize, usize, usize)> for Grid3<T> {
    type Output = T;

    fn index(&self, (x, y, z): (usize, usize, usize)) -> &T {
        assert!(
            x < self.side && y < self.side && z < self.side,
            "({}, {}, {}) outside grid of side {}",
            x,
            y,
            z,
            self.side
        );
        &self.cells[self.coords_to_index(x, y, z)]
    }
}

impl<T> IndexMut<(usize, usize, usize)> for Grid3<T> {
    fn index_mut(&mut self, (x, y, z): (usize, usize, usize)) -> &mut T {
        assert!(
            x < self.side && y < self.side && z < self.side,
            "({}, {}, {}) outside grid of side {}",
            x,
            y,
            z,
            self.side
        );
        let index = self.coords_to_index(x, y, z);
        &mut self.cells[index]
    }
}
