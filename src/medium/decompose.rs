use std::collections::HashMap;

use bitflags::bitflags;
use tracing::trace;

use crate::{
    geometry::traits::RealNumber,
    mesh::{attribute::Attribute, traits::Index},
    spatial_partitioning::octree::Octree,
};

use super::{
    cells::{Cell, CellLattice, CellRange, CellsIter},
    field::cell_attribute,
    DecomposeError, Medium, MediumPartition,
};

bitflags! {
    /// Growth directions blocked during the expand phase.
    pub struct Directions: u8 {
        const UP    = 1 << 0; // +y
        const DOWN  = 1 << 1; // -y
        const LEFT  = 1 << 2; // -x
        const RIGHT = 1 << 3; // +x
        const FRONT = 1 << 4; // +z
        const BACK  = 1 << 5; // -z
    }
}

const DIRECTIONS: [Directions; 6] = [
    Directions::UP,
    Directions::DOWN,
    Directions::LEFT,
    Directions::RIGHT,
    Directions::FRONT,
    Directions::BACK,
];

impl Directions {
    /// (axis, towards positive) of a single direction flag.
    fn step(self) -> (usize, bool) {
        match self {
            Directions::UP => (1, true),
            Directions::DOWN => (1, false),
            Directions::LEFT => (0, false),
            Directions::RIGHT => (0, true),
            Directions::FRONT => (2, true),
            Directions::BACK => (2, false),
            _ => unreachable!("not a single direction"),
        }
    }
}

///
/// Decomposition strategy. Selected at build time:
/// ```ignore
/// let medium = Medium::build_from_mesh::<Systematic, _>(&mesh, grid_size, None)?;
/// ```
///
pub trait DecomposeStrategy<TScalar: RealNumber>: Default {
    fn decompose<TIndex: Index>(
        &mut self,
        medium: &mut Medium<TScalar>,
        octree: &Octree<'_, TScalar, TIndex>,
    ) -> Result<(), DecomposeError>;
}

///
/// Region growing over the cell lattice. Every partition starts as a single
/// seed cell and expands by one-cell-thick slices; a slice is merged only
/// when every one of its cells evaluates to exactly the seed attribute.
/// Differing cells seed further partitions, linked parent to child in
/// construction order.
///
#[derive(Debug, Default)]
pub struct Systematic;

impl<TScalar: RealNumber> DecomposeStrategy<TScalar> for Systematic {
    fn decompose<TIndex: Index>(
        &mut self,
        medium: &mut Medium<TScalar>,
        octree: &Octree<'_, TScalar, TIndex>,
    ) -> Result<(), DecomposeError> {
        let lattice = CellLattice::new(medium.boundary(), *medium.grid_size());

        if lattice.is_degenerate() {
            // Boundary thinner than one cell on some axis: a single air
            // partition keeps the volume navigable
            if !medium.boundary().is_empty() {
                medium.push_partition(
                    MediumPartition::new(*medium.boundary(), Attribute::air()),
                    None,
                );
            }

            return Ok(());
        }

        let mut grower = Grower {
            octree,
            lattice,
            regions: Vec::new(),
            cell_attributes: HashMap::new(),
        };
        grower.grow(medium);

        #[cfg(debug_assertions)]
        grower.assert_full_coverage();

        Ok(())
    }
}

///
/// Reserved strategy. Returns successfully and produces no partitions.
///
#[derive(Debug, Default)]
pub struct GreedyRandom;

impl<TScalar: RealNumber> DecomposeStrategy<TScalar> for GreedyRandom {
    fn decompose<TIndex: Index>(
        &mut self,
        _medium: &mut Medium<TScalar>,
        _octree: &Octree<'_, TScalar, TIndex>,
    ) -> Result<(), DecomposeError> {
        Ok(())
    }
}

struct Grower<'a, 'mesh, TScalar: RealNumber, TIndex: Index> {
    octree: &'a Octree<'mesh, TScalar, TIndex>,
    lattice: CellLattice<TScalar>,
    regions: Vec<CellRange>,
    cell_attributes: HashMap<Cell, Attribute<TScalar>>,
}

impl<TScalar: RealNumber, TIndex: Index> Grower<'_, '_, TScalar, TIndex> {
    fn grow(&mut self, medium: &mut Medium<TScalar>) {
        let mut stack: Vec<(Cell, Option<usize>)> = vec![(Cell::zeros(), None)];

        loop {
            while let Some((seed, parent)) = stack.pop() {
                if self.covered(&seed) {
                    continue;
                }

                self.grow_partition(seed, parent, medium, &mut stack);
            }

            // Slices rejected against committed partitions can leave cells
            // no candidate points at; reseed them so the lattice ends up
            // fully covered
            match self.first_uncovered() {
                Some(cell) => stack.push((cell, None)),
                None => break,
            }
        }
    }

    fn grow_partition(
        &mut self,
        seed: Cell,
        parent: Option<usize>,
        medium: &mut Medium<TScalar>,
        stack: &mut Vec<(Cell, Option<usize>)>,
    ) {
        let attribute = self.cell_attribute(&seed);
        let mut range = CellRange::new(seed, seed);
        let mut occupied = Directions::empty();
        let mut candidates: Vec<Cell> = Vec::new();

        while occupied != Directions::all() {
            for direction in DIRECTIONS {
                if occupied.contains(direction) {
                    continue;
                }

                let slice = adjacent_slice(&range, direction);

                if !self.lattice.contains_range(&slice) || self.intersects_region(&slice) {
                    occupied |= direction;
                    continue;
                }

                let mut expands = true;
                for cell in CellsIter::over(&slice) {
                    if self.cell_attribute(&cell) != attribute {
                        expands = false;
                        candidates.push(cell);
                    }
                }

                if expands {
                    range.union_box(&slice);
                } else {
                    occupied |= direction;
                }
            }
        }

        debug_assert!(
            !self.intersects_region(&range),
            "committed partition overlaps an existing one"
        );

        let index = medium.push_partition(
            MediumPartition::new(self.lattice.range_box(&range), attribute),
            parent,
        );
        self.regions.push(range);

        trace!(
            partition = index,
            candidates = candidates.len(),
            "partition committed"
        );

        // Reversed so spawn order matches depth-first recursion over the
        // recorded candidate list
        for candidate in candidates.into_iter().rev() {
            stack.push((candidate, Some(index)));
        }
    }

    fn cell_attribute(&mut self, cell: &Cell) -> Attribute<TScalar> {
        if let Some(attribute) = self.cell_attributes.get(cell) {
            return *attribute;
        }

        let attribute = cell_attribute(self.octree, &self.lattice.cell_box(cell));
        self.cell_attributes.insert(*cell, attribute);

        attribute
    }

    #[inline]
    fn covered(&self, cell: &Cell) -> bool {
        self.regions.iter().any(|region| region.contains_point(cell))
    }

    #[inline]
    fn intersects_region(&self, range: &CellRange) -> bool {
        self.regions.iter().any(|region| region.intersects_box3(range))
    }

    fn first_uncovered(&self) -> Option<Cell> {
        let mut cells = self.lattice.cells();
        cells.find(|cell| !self.covered(cell))
    }

    #[cfg(debug_assertions)]
    fn assert_full_coverage(&self) {
        for cell in self.lattice.cells() {
            debug_assert!(self.covered(&cell), "cell {:?} not covered", cell);
        }
    }
}

/// One-cell-thick layer adjacent to `range` in `direction`.
fn adjacent_slice(range: &CellRange, direction: Directions) -> CellRange {
    let (axis, positive) = direction.step();
    let mut min = *range.get_min();
    let mut max = *range.get_max();

    if positive {
        min[axis] = max[axis] + 1;
        max[axis] = min[axis];
    } else {
        max[axis] = min[axis] - 1;
        min[axis] = max[axis];
    }

    CellRange::new(min, max)
}
