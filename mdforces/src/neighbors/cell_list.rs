use log::warn;
use ndarray::Array3;

use crate::{Error, ParticleData, Vector3D, UnitCell};
use super::{NeighborProvider, StorageMode, pairs_to_lists};

/// Maximal number of cells, we need to use this to prevent having too many
/// cells with a large box and a small cutoff
const MAX_NUMBER_OF_CELLS: f64 = 1e5;

/// Particles closer than this produce a warning when building the list
const CLOSE_PARTICLES_DISTANCE: f64 = 1e-3;

/// The cell list is used to sort particles inside bins/cells.
///
/// The list of potential pairs is then constructed by looking through all
/// neighboring cells (the number of cells to search depends on the cutoff and
/// the size of the cells) for each particle.
#[derive(Debug, Clone)]
struct CellList {
    /// How many cells do we need to look at when searching neighbors to include
    /// all neighbors below cutoff
    n_search: [i32; 3],
    /// the cells themselves, containing particle indexes
    cells: Array3<Vec<usize>>,
    /// Unit cell defining periodic boundary conditions
    unit_cell: UnitCell,
    /// Lower corner and size of the bounding box of the particles, used
    /// instead of the unit cell for infinite cells
    bounding_box: (Vector3D, Vector3D),
}

impl CellList {
    fn new(unit_cell: UnitCell, positions: &[Vector3D], cutoff: f64) -> CellList {
        let bounding_box = if unit_cell.is_infinite() {
            bounding_box(positions)
        } else {
            (Vector3D::zero(), Vector3D::new(1.0, 1.0, 1.0))
        };

        let extent = if unit_cell.is_infinite() {
            bounding_box.1
        } else {
            unit_cell.distances_between_faces()
        };

        let mut n_cells = [0.0; 3];
        for xyz in 0..3 {
            n_cells[xyz] = f64::clamp(f64::trunc(extent[xyz] / cutoff), 1.0, f64::INFINITY);
        }

        // limit memory consumption by ensuring we have less than
        // `MAX_NUMBER_OF_CELLS` cells to look though
        let n_cells_total = n_cells[0] * n_cells[1] * n_cells[2];
        if n_cells_total > MAX_NUMBER_OF_CELLS {
            let scaling = f64::cbrt(MAX_NUMBER_OF_CELLS / n_cells_total);
            for n in &mut n_cells {
                *n = f64::clamp(f64::trunc(*n * scaling), 1.0, f64::INFINITY);
            }
        }

        let mut n_search = [1; 3];
        for xyz in 0..3 {
            if extent[xyz] > 0.0 {
                n_search[xyz] = i32::max(1, f64::ceil(cutoff * n_cells[xyz] / extent[xyz]) as i32);
            }
        }

        let n_cells = [n_cells[0] as usize, n_cells[1] as usize, n_cells[2] as usize];

        let mut cell_list = CellList {
            n_search: n_search,
            cells: Array3::from_elem(n_cells, Vec::new()),
            unit_cell: unit_cell,
            bounding_box: bounding_box,
        };

        for (index, &position) in positions.iter().enumerate() {
            cell_list.add_particle(index, position);
        }

        return cell_list;
    }

    /// Add a single particle to the cell list at the given `position`
    fn add_particle(&mut self, index: usize, position: Vector3D) {
        let fractional = if self.unit_cell.is_infinite() {
            let (origin, size) = self.bounding_box;
            let delta = position - origin;
            Vector3D::new(delta[0] / size[0], delta[1] / size[1], delta[2] / size[2])
        } else {
            let fractional = self.unit_cell.fractional(position);
            Vector3D::new(
                fractional[0] - f64::floor(fractional[0]),
                fractional[1] - f64::floor(fractional[1]),
                fractional[2] - f64::floor(fractional[2]),
            )
        };

        let shape = self.cells.shape();
        let mut cell_index = [0; 3];
        for xyz in 0..3 {
            let n = shape[xyz];
            let i = f64::floor(fractional[xyz] * n as f64);
            // NaN (zero-sized bounding box) and rounding errors end up in the
            // first or last cell
            cell_index[xyz] = if i.is_nan() || i < 0.0 {
                0
            } else {
                usize::min(i as usize, n - 1)
            };
        }

        self.cells[cell_index].push(index);
    }

    /// Get the list of all distinct cells to search for neighbors of the
    /// given cell, including the cell itself.
    fn neighboring_cells(&self, cell: [usize; 3]) -> Vec<[usize; 3]> {
        let shape = self.cells.shape();
        let periodic = !self.unit_cell.is_infinite();

        let mut neighbors = Vec::new();
        for delta_x in -self.n_search[0]..=self.n_search[0] {
            for delta_y in -self.n_search[1]..=self.n_search[1] {
                for delta_z in -self.n_search[2]..=self.n_search[2] {
                    let delta = [delta_x, delta_y, delta_z];

                    let mut neighbor = [0; 3];
                    let mut outside = false;
                    for xyz in 0..3 {
                        let n = shape[xyz] as i32;
                        let i = cell[xyz] as i32 + delta[xyz];
                        if periodic {
                            neighbor[xyz] = i.rem_euclid(n) as usize;
                        } else if i < 0 || i >= n {
                            outside = true;
                        } else {
                            neighbor[xyz] = i as usize;
                        }
                    }

                    if !outside {
                        neighbors.push(neighbor);
                    }
                }
            }
        }

        // with few cells, multiple periodic shifts lead to the same cell
        neighbors.sort_unstable();
        neighbors.dedup();

        return neighbors;
    }

    /// Get all unique pairs `(i, j)` with `i < j` closer than `cutoff`
    fn pairs(&self, positions: &[Vector3D], cutoff: f64) -> Vec<(usize, usize)> {
        let cutoff2 = cutoff * cutoff;
        let mut pairs = Vec::new();

        for (cell, current) in self.cells.indexed_iter() {
            if current.is_empty() {
                continue;
            }

            for neighbor_cell in self.neighboring_cells([cell.0, cell.1, cell.2]) {
                for &i in current {
                    for &j in &self.cells[neighbor_cell] {
                        // each unordered pair is visited from both cells,
                        // only keep one of them
                        if i >= j {
                            continue;
                        }

                        let distance2 = self.unit_cell.distance2(positions[i], positions[j]);
                        if distance2 < cutoff2 {
                            if distance2 < CLOSE_PARTICLES_DISTANCE * CLOSE_PARTICLES_DISTANCE {
                                warn!(
                                    "particles {} and {} are very close to one another ({})",
                                    i, j, distance2.sqrt()
                                );
                            }
                            pairs.push((i, j));
                        }
                    }
                }
            }
        }

        pairs.sort_unstable();
        return pairs;
    }
}

/// Get the lower corner and size of the bounding box of `positions`
fn bounding_box(positions: &[Vector3D]) -> (Vector3D, Vector3D) {
    if positions.is_empty() {
        return (Vector3D::zero(), Vector3D::new(1.0, 1.0, 1.0));
    }

    let mut min = positions[0];
    let mut max = positions[0];
    for position in positions {
        for xyz in 0..3 {
            min[xyz] = f64::min(min[xyz], position[xyz]);
            max[xyz] = f64::max(max[xyz], position[xyz]);
        }
    }

    return (min, max - min);
}

/// A neighbor list built from scratch with a cell list every time a new step
/// is requested.
///
/// All pairs closer than `cutoff + buffer` are included. In periodic boxes,
/// this distance must be at most half of the smallest distance between
/// opposite faces of the box, so that the minimum image of each pair is
/// unique.
#[derive(Debug, Clone)]
pub struct CellListNeighbors {
    cutoff: f64,
    buffer: f64,
    mode: StorageMode,
    lists: Vec<Vec<usize>>,
    last_step: Option<u64>,
}

impl CellListNeighbors {
    /// Create a new neighbor list with the given cutoff and storage mode
    pub fn new(cutoff: f64, mode: StorageMode) -> Result<CellListNeighbors, Error> {
        CellListNeighbors::with_buffer(cutoff, 0.0, mode)
    }

    /// Create a new neighbor list with the given cutoff, additional buffer
    /// distance and storage mode
    pub fn with_buffer(cutoff: f64, buffer: f64, mode: StorageMode) -> Result<CellListNeighbors, Error> {
        if !(cutoff > 0.0 && cutoff.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "neighbor list cutoff must be a positive number, got {}", cutoff
            )));
        }

        if !(buffer >= 0.0 && buffer.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "neighbor list buffer must be a positive number, got {}", buffer
            )));
        }

        Ok(CellListNeighbors {
            cutoff: cutoff,
            buffer: buffer,
            mode: mode,
            lists: Vec::new(),
            last_step: None,
        })
    }

    /// Get the distance used to search for neighbors
    pub fn list_cutoff(&self) -> f64 {
        self.cutoff + self.buffer
    }

    /// Force a full rebuild on the next call to `refresh`, even for the same
    /// step
    pub fn invalidate(&mut self) {
        self.last_step = None;
    }
}

impl NeighborProvider for CellListNeighbors {
    #[time_graph::instrument(name = "CellListNeighbors::refresh")]
    fn refresh(&mut self, step: u64, particles: &dyn ParticleData) -> Result<(), Error> {
        let positions = particles.positions()?;
        if self.last_step == Some(step) && self.lists.len() == positions.len() {
            return Ok(());
        }

        let cutoff = self.list_cutoff();
        let cell = particles.cell()?;
        if !cell.is_infinite() {
            let faces = cell.distances_between_faces();
            let smallest = f64::min(faces[0], f64::min(faces[1], faces[2]));
            if cutoff > 0.5 * smallest {
                return Err(Error::InvalidParameter(format!(
                    "neighbor list cutoff ({}) is larger than half of the box ({})",
                    cutoff, 0.5 * smallest
                )));
            }
        }

        let cell_list = CellList::new(cell, positions, cutoff);
        let pairs = cell_list.pairs(positions, cutoff);

        self.lists = pairs_to_lists(positions.len(), &pairs, self.mode);
        self.last_step = Some(step);

        return Ok(());
    }

    fn neighbors_of(&self, particle: usize) -> &[usize] {
        &self.lists[particle]
    }

    fn size(&self) -> usize {
        self.lists.len()
    }

    fn storage_mode(&self) -> StorageMode {
        self.mode
    }
}
