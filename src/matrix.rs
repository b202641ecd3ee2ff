//! Dense matrix value type.
//!
//! [`Matrix`] is an immutable rectangular grid of `f64` with at least one
//! row and one column. Every operation allocates a fresh grid; instances
//! never share storage.
//!
//! # Indexing
//!
//! The public API is **1-based**, as in mathematical notation: `at(1, 1)`
//! is the top-left element and `at(n, p)` the bottom-right one of an
//! `n × p` matrix. Storage is row-major and 0-based internally.
//!
//! # Equality
//!
//! `==` compares shapes and then elements with exact `f64` equality.

use std::fmt;
use std::ops::{Mul, Neg};

use crate::error::{Error, Result};

/// Dimensions of a matrix: `rows × cols` (written `(n, p)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }
}

impl PartialEq<(usize, usize)> for Shape {
    fn eq(&self, other: &(usize, usize)) -> bool {
        self.rows == other.0 && self.cols == other.1
    }
}

impl From<Shape> for (usize, usize) {
    fn from(shape: Shape) -> Self {
        (shape.rows, shape.cols)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(n={}, p={})", self.rows, self.cols)
    }
}

/// A 1-based `(i, j)` position: row `i`, column `j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatrixIndex {
    pub i: usize,
    pub j: usize,
}

impl PartialEq<(usize, usize)> for MatrixIndex {
    fn eq(&self, other: &(usize, usize)) -> bool {
        self.i == other.0 && self.j == other.1
    }
}

impl fmt::Display for MatrixIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(i={}, j={})", self.i, self.j)
    }
}

/// Immutable dense `f64` matrix.
///
/// # Examples
/// ```
/// use u_numkit::matrix::Matrix;
/// let a = Matrix::new(vec![vec![1.0, 2.0, 3.0], vec![0.0, 4.0, -1.0]]).unwrap();
/// let b = Matrix::new(vec![
///     vec![1.0, 0.0, 0.0],
///     vec![0.0, 2.0, 0.0],
///     vec![0.0, 0.0, 0.0],
/// ])
/// .unwrap();
/// let ab = a.checked_mul(&b).unwrap();
/// assert_eq!(ab.to_string(), "|1 4 0|\n|0 8 0|");
/// assert_eq!(ab.shape(), (2, 3));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    // ------------------------------------------------------------------
    // Constructors
    // ------------------------------------------------------------------

    /// Builds a matrix from a grid of rows.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if the grid is empty, has an empty first
    /// row, or is ragged.
    pub fn new(grid: Vec<Vec<f64>>) -> Result<Self> {
        let rows = grid.len();
        let cols = grid.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidArgument(format!(
                "matrix needs at least one row and one column, got {rows}x{cols}"
            )));
        }
        if let Some((r, row)) = grid.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(Error::InvalidArgument(format!(
                "ragged grid: row {} has {} columns, expected {cols}",
                r + 1,
                row.len()
            )));
        }
        let data = grid.into_iter().flatten().collect();
        Ok(Self { rows, cols, data })
    }

    /// Builds a `rows × cols` matrix from row-major `data`.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if a dimension is zero, `rows * cols`
    /// overflows, or `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        let len = check_dimensions(rows, cols)?;
        if data.len() != len {
            return Err(Error::InvalidArgument(format!(
                "{rows}x{cols} matrix needs {len} values, got {}",
                data.len()
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// All-zero `rows × cols` matrix.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if a dimension is zero or the element
    /// count overflows.
    pub fn empty(rows: usize, cols: usize) -> Result<Self> {
        let len = check_dimensions(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            data: vec![0.0; len],
        })
    }

    /// Square all-zero matrix of the given order.
    pub fn null(order: usize) -> Result<Self> {
        Self::empty(order, order)
    }

    /// Identity matrix of the given order.
    ///
    /// # Examples
    /// ```
    /// use u_numkit::matrix::Matrix;
    /// let i2 = Matrix::identity(2).unwrap();
    /// assert_eq!(i2.order().unwrap(), 2);
    /// assert_eq!(i2.diagonal().unwrap(), vec![1.0, 1.0]);
    /// ```
    pub fn identity(order: usize) -> Result<Self> {
        let mut m = Self::null(order)?;
        for k in 0..order {
            m.data[k * order + k] = 1.0;
        }
        Ok(m)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn shape(&self) -> Shape {
        Shape::new(self.rows, self.cols)
    }

    /// Element `m_ij`, 1-based.
    ///
    /// # Errors
    /// [`Error::IndexOutOfRange`] unless `1 ≤ i ≤ rows` and `1 ≤ j ≤ cols`.
    pub fn at(&self, i: usize, j: usize) -> Result<f64> {
        if i == 0 || j == 0 || i > self.rows || j > self.cols {
            return Err(Error::IndexOutOfRange {
                i,
                j,
                shape: self.shape(),
            });
        }
        Ok(self.data[self.offset(i, j)])
    }

    /// Row `i` (1-based) as a slice.
    ///
    /// # Errors
    /// [`Error::IndexOutOfRange`] unless `1 ≤ i ≤ rows`.
    pub fn row(&self, i: usize) -> Result<&[f64]> {
        if i == 0 || i > self.rows {
            return Err(Error::IndexOutOfRange {
                i,
                j: 1,
                shape: self.shape(),
            });
        }
        let start = (i - 1) * self.cols;
        Ok(&self.data[start..start + self.cols])
    }

    /// Copies the grid out as a vector of rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks(self.cols).map(<[f64]>::to_vec).collect()
    }

    /// True for a single-row matrix (n = 1).
    pub fn is_row(&self) -> bool {
        self.rows == 1
    }

    /// True for a single-column matrix (p = 1).
    pub fn is_column(&self) -> bool {
        self.cols == 1
    }

    /// True when n = p.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Order of a square matrix.
    ///
    /// # Errors
    /// [`Error::InvalidState`] if the matrix is not square.
    pub fn order(&self) -> Result<usize> {
        if !self.is_square() {
            return Err(Error::InvalidState(format!(
                "order is only defined for square matrices, shape is {}",
                self.shape()
            )));
        }
        Ok(self.rows)
    }

    /// Diagonal `a_11, a_22, …, a_nn` of a square matrix.
    ///
    /// # Errors
    /// [`Error::InvalidState`] if the matrix is not square.
    pub fn diagonal(&self) -> Result<Vec<f64>> {
        let order = self.order()?;
        Ok((1..=order).map(|k| self.data[self.offset(k, k)]).collect())
    }

    /// Every 1-based index pair in row-major order (i outer, j inner).
    ///
    /// # Examples
    /// ```
    /// use u_numkit::matrix::Matrix;
    /// let m = Matrix::empty(2, 2).unwrap();
    /// let idx: Vec<(usize, usize)> = m.indices().map(|ix| (ix.i, ix.j)).collect();
    /// assert_eq!(idx, vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
    /// ```
    pub fn indices(&self) -> impl Iterator<Item = MatrixIndex> {
        let cols = self.cols;
        (1..=self.rows).flat_map(move |i| (1..=cols).map(move |j| MatrixIndex { i, j }))
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Deep copy; the result shares no storage with `self`.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Elementwise sum.
    ///
    /// # Errors
    /// [`Error::ShapeMismatch`] if the shapes differ.
    pub fn checked_add(&self, other: &Matrix) -> Result<Matrix> {
        if self.shape() != other.shape() {
            return Err(Error::ShapeMismatch {
                op: "addition",
                left: self.shape(),
                right: other.shape(),
            });
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a + b)
            .collect();
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Matrix product: `(n × p) · (p × q) → (n × q)`.
    ///
    /// `c_ij = Σ_{k=1..p} a_ik · b_kj`, accumulated in increasing `k`.
    ///
    /// # Errors
    /// [`Error::ShapeMismatch`] if `self.cols != other.rows`.
    pub fn checked_mul(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(Error::ShapeMismatch {
                op: "multiplication",
                left: self.shape(),
                right: other.shape(),
            });
        }
        let (n, p, q) = (self.rows, self.cols, other.cols);
        let mut data = Vec::with_capacity(n * q);
        for i in 0..n {
            for j in 0..q {
                let mut sum = 0.0;
                for k in 0..p {
                    sum += self.data[i * p + k] * other.data[k * q + j];
                }
                data.push(sum);
            }
        }
        Ok(Self {
            rows: n,
            cols: q,
            data,
        })
    }

    /// Multiplies every element by `scalar`.
    pub fn scale(&self, scalar: f64) -> Matrix {
        self.map(|x| x * scalar)
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Matrix {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| f(x)).collect(),
        }
    }

    fn offset(&self, i: usize, j: usize) -> usize {
        (i - 1) * self.cols + (j - 1)
    }
}

/// Validates `rows × cols` and returns the element count.
fn check_dimensions(rows: usize, cols: usize) -> Result<usize> {
    if rows == 0 || cols == 0 {
        return Err(Error::InvalidArgument(format!(
            "matrix needs at least one row and one column, got {rows}x{cols}"
        )));
    }
    match rows.checked_mul(cols) {
        Some(len) if len <= isize::MAX as usize / std::mem::size_of::<f64>() => Ok(len),
        _ => Err(Error::InvalidArgument(format!(
            "{rows}x{cols} matrix is too large to allocate"
        ))),
    }
}

impl Neg for &Matrix {
    type Output = Matrix;

    fn neg(self) -> Matrix {
        self.map(|x| -x)
    }
}

impl Neg for Matrix {
    type Output = Matrix;

    fn neg(self) -> Matrix {
        -&self
    }
}

impl Mul<f64> for &Matrix {
    type Output = Matrix;

    fn mul(self, scalar: f64) -> Matrix {
        self.scale(scalar)
    }
}

impl Mul<f64> for Matrix {
    type Output = Matrix;

    fn mul(self, scalar: f64) -> Matrix {
        self.scale(scalar)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.data.chunks(self.cols).enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            write!(f, "|")?;
            for (c, v) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, " ")?;
                }
                // signed zero renders as 0
                let v = if *v == 0.0 { 0.0 } else { *v };
                write!(f, "{v}")?;
            }
            write!(f, "|")?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn m(grid: &[&[f64]]) -> Matrix {
        Matrix::new(grid.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    fn a() -> Matrix {
        m(&[&[1.0, 2.0, 3.0], &[0.0, 4.0, -1.0]])
    }

    fn b() -> Matrix {
        m(&[&[1.0, 0.0, 0.0], &[0.0, 2.0, 0.0], &[0.0, 0.0, 0.0]])
    }

    fn e() -> Matrix {
        m(&[&[5.0, 5.0, 10.0], &[0.0, 5.0, 5.0], &[5.0, 5.0, 10.0]])
    }

    fn f() -> Matrix {
        m(&[&[5.0, 5.0, 0.0], &[10.0, 5.0, 5.0], &[5.0, 5.0, 0.0]])
    }

    // --- Construction ---

    #[test]
    fn test_new_rejects_ragged() {
        let err = Matrix::new(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(Matrix::new(vec![]).is_err());
        assert!(Matrix::new(vec![vec![]]).is_err());
        assert!(Matrix::empty(0, 3).is_err());
        assert!(Matrix::identity(0).is_err());
    }

    #[test]
    fn test_from_vec() {
        let mv = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 0.0, 4.0, -1.0]).unwrap();
        assert_eq!(mv, a());
        assert!(Matrix::from_vec(2, 3, vec![1.0; 5]).is_err());
    }

    #[test]
    fn test_empty_all_zero() {
        let z = Matrix::empty(2, 4).unwrap();
        assert_eq!(z.shape(), (2, 4));
        assert!(z.indices().all(|ix| z.at(ix.i, ix.j).unwrap() == 0.0));
    }

    #[test]
    fn test_null_matrix() {
        let o2 = Matrix::null(2).unwrap();
        assert_eq!(o2.shape(), (2, 2));
        assert!(o2.is_square());
        assert_eq!(o2.order().unwrap(), 2);
        for ix in o2.indices() {
            assert_eq!(o2.at(ix.i, ix.j).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_identity() {
        let i3 = Matrix::identity(3).unwrap();
        assert!(i3.is_square());
        assert_eq!(i3.order().unwrap(), 3);
        assert_eq!(i3.diagonal().unwrap(), vec![1.0, 1.0, 1.0]);
        for ix in i3.indices().filter(|ix| ix.i != ix.j) {
            assert_eq!(i3.at(ix.i, ix.j).unwrap(), 0.0);
        }
    }

    // --- Queries ---

    #[test]
    fn test_shape_predicates() {
        let a = a();
        assert_eq!(a.shape(), (2, 3));
        assert!(!a.is_square() && !a.is_row() && !a.is_column());

        let b = b();
        assert_eq!(b.shape(), (3, 3));
        assert!(b.is_square() && !b.is_row() && !b.is_column());

        let c = m(&[&[1.0], &[0.0], &[-1.0]]);
        assert_eq!(c.shape(), (3, 1));
        assert!(!c.is_square() && !c.is_row() && c.is_column());

        let d = m(&[&[1.0, 1.0, -5.0]]);
        assert_eq!(d.shape(), (1, 3));
        assert!(!d.is_square() && d.is_row() && !d.is_column());
    }

    #[test]
    fn test_at_one_based() {
        let a = a();
        assert_eq!(a.at(1, 1).unwrap(), 1.0);
        assert_eq!(a.at(1, 3).unwrap(), 3.0);
        assert_eq!(a.at(2, 3).unwrap(), -1.0);
    }

    #[test]
    fn test_at_out_of_range() {
        let a = a();
        for (i, j) in [(0, 1), (1, 0), (3, 1), (1, 4)] {
            match a.at(i, j) {
                Err(Error::IndexOutOfRange { i: ei, j: ej, shape }) => {
                    assert_eq!((ei, ej), (i, j));
                    assert_eq!(shape, (2, 3));
                }
                other => panic!("expected IndexOutOfRange for ({i}, {j}), got {other:?}"),
            }
        }
    }

    #[test]
    fn test_row_access() {
        let a = a();
        assert_eq!(a.row(2).unwrap(), &[0.0, 4.0, -1.0]);
        assert!(a.row(0).is_err());
        assert!(a.row(3).is_err());
        assert_eq!(a.to_rows(), vec![vec![1.0, 2.0, 3.0], vec![0.0, 4.0, -1.0]]);
    }

    #[test]
    fn test_order_and_diagonal_require_square() {
        let a = a();
        assert!(matches!(a.order(), Err(Error::InvalidState(_))));
        assert!(matches!(a.diagonal(), Err(Error::InvalidState(_))));
        assert_eq!(b().diagonal().unwrap(), vec![1.0, 2.0, 0.0]);
    }

    #[test]
    fn test_indices_row_major() {
        let idx: Vec<MatrixIndex> = a().indices().collect();
        assert_eq!(idx.len(), 6);
        assert_eq!(idx[0], (1, 1));
        assert_eq!(idx[2], (1, 3));
        assert_eq!(idx[3], (2, 1));
        assert_eq!(idx[5], (2, 3));
    }

    // --- Operations ---

    #[test]
    fn test_equality() {
        assert_ne!(e(), f());
        assert_ne!(a(), b());
        assert_eq!(a(), a().copy());
        // same elements, different shape
        let row = Matrix::from_vec(1, 4, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let col = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_ne!(row, col);
    }

    #[test]
    fn test_addition() {
        let g = m(&[&[10.0, 10.0, 10.0], &[10.0, 10.0, 10.0], &[10.0, 10.0, 10.0]]);
        assert_eq!(e().checked_add(&f()).unwrap(), g);
    }

    #[test]
    fn test_addition_leaves_operands() {
        let (e, f) = (e(), f());
        let _ = e.checked_add(&f).unwrap();
        assert_eq!(e.at(1, 3).unwrap(), 10.0);
        assert_eq!(f.at(2, 1).unwrap(), 10.0);
    }

    #[test]
    fn test_negation() {
        let sum = e().checked_add(&f()).unwrap();
        let gn = m(&[
            &[-10.0, -10.0, -10.0],
            &[-10.0, -10.0, -10.0],
            &[-10.0, -10.0, -10.0],
        ]);
        assert_eq!(-&sum, gn);
        assert_eq!(-(-sum.clone()), sum);
    }

    #[test]
    fn test_scalar_multiplication() {
        let doubled = &a() * 2.0;
        assert_eq!(doubled, m(&[&[2.0, 4.0, 6.0], &[0.0, 8.0, -2.0]]));
        assert_eq!(a().scale(0.5).at(2, 2).unwrap(), 2.0);
        assert_eq!(a() * 1.0, a());
    }

    #[test]
    fn test_matrix_multiplication() {
        let product = a().checked_mul(&b()).unwrap();
        assert_eq!(product, m(&[&[1.0, 4.0, 0.0], &[0.0, 8.0, 0.0]]));
        assert_eq!(product.shape(), (2, 3));
    }

    #[test]
    fn test_matrix_multiplication_by_identity() {
        let i3 = Matrix::identity(3).unwrap();
        assert_eq!(a().checked_mul(&i3).unwrap(), a());
        let i2 = Matrix::identity(2).unwrap();
        assert_eq!(i2.checked_mul(&a()).unwrap(), a());
    }

    #[test]
    fn test_row_times_column() {
        let d = m(&[&[1.0, 1.0, -5.0]]);
        let c = m(&[&[1.0], &[0.0], &[-1.0]]);
        assert_eq!(d.checked_mul(&c).unwrap(), m(&[&[6.0]]));
        assert_eq!(c.checked_mul(&d).unwrap().shape(), (3, 3));
    }

    #[test]
    fn test_shape_mismatch() {
        assert!(matches!(
            a().checked_add(&b()),
            Err(Error::ShapeMismatch { op: "addition", .. })
        ));
        assert!(matches!(
            b().checked_mul(&a()),
            Err(Error::ShapeMismatch { op: "multiplication", .. })
        ));
    }

    #[test]
    fn test_copy_is_independent() {
        let original = a();
        let copy = original.copy();
        drop(original);
        assert_eq!(copy, a());
    }

    // --- Display ---

    #[test]
    fn test_display() {
        assert_eq!(a().to_string(), "|1 2 3|\n|0 4 -1|");
        assert_eq!(m(&[&[0.5]]).to_string(), "|0.5|");
        assert_eq!(Shape::new(2, 3).to_string(), "(n=2, p=3)");
        assert_eq!(MatrixIndex { i: 1, j: 2 }.to_string(), "(i=1, j=2)");
    }

    #[test]
    fn test_display_negated_zero() {
        assert_eq!((-&a()).to_string(), "|-1 -2 -3|\n|0 -4 1|");
        assert_eq!((&a() * -1.0).to_string(), "|-1 -2 -3|\n|0 -4 1|");
        assert_eq!((-Matrix::null(2).unwrap()).to_string(), "|0 0|\n|0 0|");
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        assert!(matches!(
            Matrix::from_vec(usize::MAX, 2, vec![]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(Matrix::empty(usize::MAX, 2), Err(Error::InvalidArgument(_))));
        assert!(matches!(Matrix::null(usize::MAX), Err(Error::InvalidArgument(_))));
        // fits in usize but not in an allocation
        assert!(Matrix::empty(usize::MAX / 2, 2).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = a().checked_add(&b()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "shape mismatch in addition: left (n=2, p=3), right (n=3, p=3)"
        );
        let err = a().at(5, 1).unwrap_err();
        assert_eq!(err.to_string(), "index (i=5, j=1) out of range for shape (n=2, p=3)");
    }
}
