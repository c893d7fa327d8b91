use num_traits::{cast, Float};

use crate::{
    algo::utils,
    geometry::{primitives::box3::Box3, traits::RealNumber},
    helpers::aliases::Vec3,
};

pub type Cell = Vec3<isize>;
pub type CellRange = Box3<isize>;

///
/// Axis-aligned lattice of grid cells tiling a boundary box. Cell
/// bookkeeping is integer-valued; world-space boxes are derived on demand,
/// so range arithmetic is exact.
///
#[derive(Debug, Clone)]
pub struct CellLattice<TScalar: RealNumber> {
    origin: Vec3<TScalar>,
    cell_size: Vec3<TScalar>,
    counts: Vec3<isize>,
}

impl<TScalar: RealNumber> CellLattice<TScalar> {
    /// Per-axis cell count is ⌊size / step⌋ with a relative epsilon slack,
    /// so boundaries that are exact multiples of the step are not lost to
    /// floating-point rounding.
    pub fn new(boundary: &Box3<TScalar>, cell_size: Vec3<TScalar>) -> Self {
        let slack = Float::sqrt(TScalar::epsilon());
        let sizes = boundary.sizes();
        let mut counts = Vec3::zeros();

        for axis in 0..3 {
            let cells = Float::floor(sizes[axis] / cell_size[axis] + slack);
            counts[axis] = if cells > TScalar::zero() {
                cast(cells).unwrap_or(0)
            } else {
                0
            };
        }

        Self {
            origin: *boundary.get_min(),
            cell_size,
            counts,
        }
    }

    #[inline]
    pub fn counts(&self) -> &Vec3<isize> {
        &self.counts
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        (self.counts.x * self.counts.y * self.counts.z) as usize
    }

    /// A lattice without a single full cell on some axis.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.counts.x == 0 || self.counts.y == 0 || self.counts.z == 0
    }

    #[inline]
    pub fn contains_cell(&self, cell: &Cell) -> bool {
        cell.x >= 0
            && cell.x < self.counts.x
            && cell.y >= 0
            && cell.y < self.counts.y
            && cell.z >= 0
            && cell.z < self.counts.z
    }

    #[inline]
    pub fn contains_range(&self, range: &CellRange) -> bool {
        self.contains_cell(range.get_min()) && self.contains_cell(range.get_max())
    }

    /// World-space box of a single cell.
    #[inline]
    pub fn cell_box(&self, cell: &Cell) -> Box3<TScalar> {
        let min = self.origin + self.cell_size.component_mul(&utils::cast(cell));
        Box3::new(min, min + self.cell_size)
    }

    /// World-space box of an inclusive cell range.
    #[inline]
    pub fn range_box(&self, range: &CellRange) -> Box3<TScalar> {
        let past_max = range.get_max() + Cell::new(1, 1, 1);

        Box3::new(
            self.origin + self.cell_size.component_mul(&utils::cast(range.get_min())),
            self.origin + self.cell_size.component_mul(&utils::cast(&past_max)),
        )
    }

    /// All lattice cells in raster order.
    #[inline]
    pub fn cells(&self) -> CellsIter {
        CellsIter::new(Cell::zeros(), self.counts)
    }
}

///
/// Raster-order cell iterator: z innermost, then y, then x.
///
#[derive(Debug)]
pub struct CellsIter {
    min: Cell,
    extents: Cell,
    index: isize,
    total: isize,
}

impl CellsIter {
    fn new(min: Cell, extents: Cell) -> Self {
        let total = if extents.x > 0 && extents.y > 0 && extents.z > 0 {
            extents.x * extents.y * extents.z
        } else {
            0
        };

        Self {
            min,
            extents,
            index: 0,
            total,
        }
    }

    /// Cells of an inclusive range.
    pub fn over(range: &CellRange) -> Self {
        Self::new(
            *range.get_min(),
            range.get_max() - range.get_min() + Cell::new(1, 1, 1),
        )
    }
}

impl Iterator for CellsIter {
    type Item = Cell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.total {
            return None;
        }

        let i = self.index;
        self.index += 1;

        let z = i % self.extents.z;
        let y = (i / self.extents.z) % self.extents.y;
        let x = i / (self.extents.z * self.extents.y);

        Some(self.min + Cell::new(x, y, z))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total - self.index) as usize;
        (remaining, Some(remaining))
    }
}
