use std::ops::Index;

/// Rectangular two-dimensional array, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<E> {
    rows: usize,
    cols: usize,
    cells: Vec<E>,
}

impl<E> Grid<E> {
    pub(crate) fn from_cells(rows: usize, cols: usize, cells: Vec<E>) -> Self {
        debug_assert_eq!(cells.len(), rows * cols);
        Grid { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&E> {
        if row < self.rows && col < self.cols {
            self.cells.get(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> Option<&[E]> {
        if row < self.rows {
            Some(&self.cells[row * self.cols..(row + 1) * self.cols])
        } else {
            None
        }
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[E]> + '_ {
        (0..self.rows).map(move |row| &self.cells[row * self.cols..(row + 1) * self.cols])
    }

    pub fn to_rows(&self) -> Vec<Vec<E>>
    where
        E: Clone,
    {
        self.iter_rows().map(<[E]>::to_vec).collect()
    }
}

impl<E> Default for Grid<E> {
    fn default() -> Self {
        Grid {
            rows: 0,
            cols: 0,
            cells: Vec::new(),
        }
    }
}

impl<E> Index<(usize, usize)> for Grid<E> {
    type Output = E;

    fn index(&self, (row, col): (usize, usize)) -> &E {
        match self.get(row, col) {
            Some(cell) => cell,
            None => panic!(
                "grid index ({row}, {col}) out of bounds for {}x{} grid",
                self.rows, self.cols
            ),
        }
    }
}
