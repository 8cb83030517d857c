//! The `UnitCell` type represents the periodic simulation box.
use crate::{Error, Matrix3, Vector3D};

/// The shape of a cell determine how periodic boundary conditions are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellShape {
    /// Infinite unit cell, with no boundaries
    Infinite,
    /// Orthorhombic unit cell, with cuboid shape
    Orthorhombic,
    /// Triclinic unit cell, with arbitrary parallelepiped shape
    Triclinic,
}

/// An `UnitCell` defines the system physical boundaries.
///
/// The cell vectors are the rows of the cell matrix. The lower corner of the
/// cell is at the origin, and wrapped positions have fractional coordinates in
/// `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitCell {
    /// Unit cell matrix, containing the cell vectors as rows
    matrix: Matrix3,
    /// Transpose of the unit cell matrix, cached from matrix
    transpose: Matrix3,
    /// Inverse of the transpose of the unit cell matrix, cached from matrix
    inverse: Matrix3,
    shape: CellShape,
}

impl UnitCell {
    /// Create an infinite unit cell
    pub fn infinite() -> UnitCell {
        UnitCell {
            matrix: Matrix3::zero(),
            transpose: Matrix3::zero(),
            inverse: Matrix3::zero(),
            shape: CellShape::Infinite,
        }
    }

    /// Create an orthorhombic unit cell, with side lengths `a, b, c`.
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> UnitCell {
        assert!(a > 0.0 && b > 0.0 && c > 0.0, "Cell lengths must be positive");
        let matrix = Matrix3::new([
            [a, 0.0, 0.0],
            [0.0, b, 0.0],
            [0.0, 0.0, c]
        ]);
        UnitCell {
            matrix: matrix,
            transpose: matrix,
            inverse: Matrix3::new([
                [1.0 / a, 0.0, 0.0],
                [0.0, 1.0 / b, 0.0],
                [0.0, 0.0, 1.0 / c]
            ]),
            shape: CellShape::Orthorhombic,
        }
    }

    /// Create a cubic unit cell, with side lengths `length, length, length`.
    pub fn cubic(length: f64) -> UnitCell {
        UnitCell::orthorhombic(length, length, length)
    }

    /// Create a triclinic unit cell from the box lengths `lx, ly, lz` and the
    /// tilt factors `xy, xz, yz`. The cell vectors are `(lx, 0, 0)`,
    /// `(xy ly, ly, 0)` and `(xz lz, yz lz, lz)`.
    pub fn triclinic(lx: f64, ly: f64, lz: f64, xy: f64, xz: f64, yz: f64) -> UnitCell {
        assert!(lx > 0.0 && ly > 0.0 && lz > 0.0, "Cell lengths must be positive");
        if xy == 0.0 && xz == 0.0 && yz == 0.0 {
            return UnitCell::orthorhombic(lx, ly, lz);
        }

        let matrix = Matrix3::new([
            [lx, 0.0, 0.0],
            [xy * ly, ly, 0.0],
            [xz * lz, yz * lz, lz],
        ]);

        return UnitCell {
            matrix: matrix,
            transpose: matrix.transposed(),
            inverse: matrix.transposed().inverse(),
            shape: CellShape::Triclinic,
        };
    }

    /// Get the cell shape
    pub fn shape(&self) -> CellShape {
        self.shape
    }

    /// Check if this unit cell is infinite, *i.e.* if it does not have
    /// periodic boundary conditions.
    pub fn is_infinite(&self) -> bool {
        self.shape == CellShape::Infinite
    }

    /// Check if this unit cell is a finite cuboid
    pub fn is_orthorhombic(&self) -> bool {
        self.shape == CellShape::Orthorhombic
    }

    /// Get the lengths of the box along the x, y and z axes (`lx, ly, lz` in
    /// the triclinic constructor). These are infinite for infinite cells.
    pub fn lengths(&self) -> Vector3D {
        if self.is_infinite() {
            return Vector3D::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        }
        Vector3D::new(self.matrix[0][0], self.matrix[1][1], self.matrix[2][2])
    }

    /// Get the matricial representation of the unit cell
    pub fn matrix(&self) -> Matrix3 {
        self.matrix
    }

    /// Get the volume of the cell, or zero for infinite cells
    pub fn volume(&self) -> f64 {
        match self.shape {
            CellShape::Infinite => 0.0,
            CellShape::Orthorhombic | CellShape::Triclinic => self.matrix.determinant().abs(),
        }
    }

    /// Get the distances between opposite faces of the unit cell
    pub fn distances_between_faces(&self) -> Vector3D {
        if self.is_infinite() {
            return Vector3D::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        }

        let a = Vector3D::from(self.matrix[0]);
        let b = Vector3D::from(self.matrix[1]);
        let c = Vector3D::from(self.matrix[2]);

        let volume = self.volume();
        Vector3D::new(
            volume / (b ^ c).norm(),
            volume / (c ^ a).norm(),
            volume / (a ^ b).norm(),
        )
    }

    /// Fail with `Error::UnsupportedBox` unless this cell is orthorhombic.
    /// `user` names the object doing the check in the error message.
    pub fn check_orthorhombic(&self, user: &str) -> Result<(), Error> {
        match self.shape {
            CellShape::Orthorhombic => Ok(()),
            CellShape::Infinite => Err(Error::UnsupportedBox(format!(
                "{} requires a periodic orthorhombic box, got an infinite box", user
            ))),
            CellShape::Triclinic => Err(Error::UnsupportedBox(format!(
                "{} requires an orthorhombic box, got a triclinic box", user
            ))),
        }
    }
}

/// Geometric operations using periodic boundary conditions
impl UnitCell {
    /// Wrap a position inside the unit cell. For a cubic cell of side length
    /// `L`, this produce a vector with all components in `[0, L)`.
    pub fn wrap_vector(&self, vector: &mut Vector3D) {
        match self.shape {
            CellShape::Infinite => (),
            CellShape::Orthorhombic => {
                let lengths = self.lengths();
                for i in 0..3 {
                    vector[i] -= f64::floor(vector[i] / lengths[i]) * lengths[i];
                    // rounding can push values exactly on the upper boundary
                    if vector[i] >= lengths[i] {
                        vector[i] = 0.0;
                    }
                }
            }
            CellShape::Triclinic => {
                let mut fractional = self.fractional(*vector);
                for i in 0..3 {
                    fractional[i] -= f64::floor(fractional[i]);
                }
                *vector = self.cartesian(fractional);
            }
        }
    }

    /// Find the minimum image of a displacement vector, following the periodic
    /// boundary conditions. For a cubic cell of side length `L`, this produce
    /// a vector with all components in `[-L/2, L/2)`: a component equal to
    /// `L/2` is wrapped to `-L/2`.
    pub fn vector_image(&self, vector: &mut Vector3D) {
        match self.shape {
            CellShape::Infinite => (),
            CellShape::Orthorhombic => {
                let lengths = self.lengths();
                for i in 0..3 {
                    vector[i] -= f64::floor(vector[i] / lengths[i] + 0.5) * lengths[i];
                }
            }
            CellShape::Triclinic => {
                let mut fractional = self.fractional(*vector);
                for i in 0..3 {
                    fractional[i] -= f64::floor(fractional[i] + 0.5);
                }
                *vector = self.cartesian(fractional);
            }
        }
    }

    /// Get the minimum image of the displacement `vector`, see
    /// [`UnitCell::vector_image`].
    pub fn minimum_image(&self, vector: Vector3D) -> Vector3D {
        let mut image = vector;
        self.vector_image(&mut image);
        return image;
    }

    /// Get the fractional representation of the `vector` in this cell
    pub fn fractional(&self, vector: Vector3D) -> Vector3D {
        return self.inverse * vector;
    }

    /// Get the Cartesian representation of the `fractional` vector in this
    /// cell
    pub fn cartesian(&self, fractional: Vector3D) -> Vector3D {
        return self.transpose * fractional;
    }

    /// Periodic boundary conditions squared distance between the point `u` and
    /// the point `v`
    pub fn distance2(&self, u: Vector3D, v: Vector3D) -> f64 {
        return self.minimum_image(v - u).norm2();
    }
}
