use std::ops::AddAssign;
use std::ops::Index;
use std::ops::IndexMut;
use std::ops::Mul;

use num::complex::Complex64;
use num::Num;
use rand::distributions::Distribution;
use rand::distributions::Uniform;
use rand::Rng;

/// Row-major dense matrix.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Matrix<T>
where
    T: MatrixItem,
{
    pub cols: usize,
    pub rows: usize,
    pub items: Vec<T>,
}

impl<T> Matrix<T>
where
    T: MatrixItem,
{
    pub fn new<I: Into<usize>>(cols: I, rows: I) -> Self {
        let (cols, rows) = (cols.into(), rows.into());
        let items = vec![T::default(); cols * rows];

        Self { cols, rows, items }
    }

    /// Empty matrix whose storage is reserved to exactly `cols * rows` items.
    pub fn with_capacity<I: Into<usize>>(cols: I, rows: I) -> Self {
        let (cols, rows) = (cols.into(), rows.into());
        let items = Vec::with_capacity(cols * rows);

        Self { cols, rows, items }
    }

    pub fn with_items<I: Into<usize>, J: Into<Vec<T>>>(items: J, cols: I, rows: I) -> Self {
        let (cols, rows) = (cols.into(), rows.into());
        let items = items.into();

        if items.len() != cols * rows {
            panic!("Item count mismatch while constructing matrix.");
        }

        Self { cols, rows, items }
    }

    /// Number of items the matrix holds once completely filled.
    pub fn capacity(&self) -> usize {
        self.cols * self.rows
    }

    pub fn is_filled(&self) -> bool {
        self.items.len() == self.capacity()
    }

    /// Append one row to a matrix built with [`Matrix::with_capacity`].
    pub fn push_row(&mut self, row: &[T]) {
        if row.len() != self.cols {
            panic!("Row length mismatch while appending to matrix.");
        }

        if self.items.len() + row.len() > self.capacity() {
            panic!("Capacity exceeded while appending to matrix.");
        }

        self.items.extend_from_slice(row);
    }

    /// Append generated items until the reserved capacity is reached.
    pub fn fill_with<F: FnMut() -> T>(&mut self, mut f: F) {
        while self.items.len() < self.capacity() {
            self.items.push(f());
        }
    }

    pub fn row(&self, row: usize) -> &[T] {
        if row >= self.rows {
            panic!("Index out of bounds while reading matrix row.");
        }

        &self.items[row * self.cols..(row + 1) * self.cols]
    }

    pub fn zero(&mut self) {
        for item in self.items.iter_mut() {
            *item = T::zero();
        }
    }

    pub fn transpose(&self) -> Self {
        let mut result = Matrix::new(self.rows, self.cols);

        for i in 0..self.cols {
            for j in 0..self.rows {
                result[(j, i)] = self[(i, j)];
            }
        }

        result
    }

    pub fn same_shape(&self, other: &Self) -> bool {
        self.cols == other.cols && self.rows == other.rows
    }
}

impl Matrix<Complex64> {
    /// Fill the remaining capacity with values drawn uniformly from the square
    /// `[low, high) x [low, high)i` of the complex plane.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R, low: f64, high: f64) {
        let range = Uniform::new(low, high);

        self.fill_with(|| {
            let re = range.sample(rng);
            let im = range.sample(rng);
            Complex64::new(re, im)
        });
    }
}

pub trait MatrixItem
where
    Self: std::fmt::Debug + Default + Clone + Copy + Num + AddAssign,
{
}

impl MatrixItem for Complex64 {}

impl<T> Mul for &Matrix<T>
where
    T: MatrixItem,
{
    type Output = Matrix<T>;

    fn mul(self, other: Self) -> Self::Output {
        if self.cols != other.rows {
            panic!("Invalid matrix dimensions, cannot multiply matrix.");
        }

        let mut result = Matrix::new(other.cols, self.rows);

        for i in 0..other.cols {
            for j in 0..self.rows {
                for k in 0..self.cols {
                    result[(i, j)] += self[(k, j)] * other[(i, k)];
                }
            }
        }

        result
    }
}

impl<T> Index<(usize, usize)> for Matrix<T>
where
    T: MatrixItem,
{
    type Output = T;

    fn index(&self, (cols, rows): (usize, usize)) -> &Self::Output {
        if cols >= self.cols || rows >= self.rows {
            panic!("Index out of bounds while indexing matrix.");
        }

        &self.items[rows * self.cols + cols]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T>
where
    T: MatrixItem,
{
    fn index_mut(&mut self, (cols, rows): (usize, usize)) -> &mut Self::Output {
        if cols >= self.cols || rows >= self.rows {
            panic!("Index out of bounds while indexing matrix.");
        }

        &mut self.items[rows * self.cols + cols]
    }
}
