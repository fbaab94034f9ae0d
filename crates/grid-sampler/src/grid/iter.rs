//! Lazy iteration over block-organized grid values.

use crate::grid::{Grid, GridCore};
use crate::types::{BoundingBox, GridIndex};

/// Lazy, finite, restartable iterator over `(index, value)` pairs.
///
/// Walks the logical index space in row-major order with the fastest
/// axis varying first, advancing block/offset cursors internally so the
/// caller never sees block geometry. Within a block row the cursor is a
/// single offset increment; it re-derives the block address only when a
/// block edge or an axis carry is crossed.
///
/// With a region filter attached, only nodes whose user coordinates fall
/// inside the bounding box are produced, without materializing a dense
/// copy of the sub-region.
pub struct GridIter<'g> {
    core: &'g GridCore<'g>,
    region: Option<(&'g dyn Grid, BoundingBox)>,
    index: GridIndex,
    block: usize,
    offset: usize,
    done: bool,
}

impl<'g> GridIter<'g> {
    pub(crate) fn new(
        core: &'g GridCore<'g>,
        region: Option<(&'g dyn Grid, BoundingBox)>,
    ) -> Self {
        let mut it = Self {
            core,
            region,
            index: [0; 3],
            block: 0,
            offset: 0,
            done: false,
        };
        it.relocate();
        it
    }

    fn relocate(&mut self) {
        if !self.core.is_dataless() {
            let (block, offset) = self.core.layout().locate(&self.index);
            self.block = block;
            self.offset = offset;
        }
    }

    fn advance(&mut self) {
        let dims = self.core.layout().dims_padded();
        let block_size = self.core.layout().block_size_padded();

        self.index[0] += 1;
        if self.index[0] < dims[0] {
            if self.index[0] % block_size[0] != 0 {
                self.offset += 1;
            } else {
                self.relocate();
            }
            return;
        }

        self.index[0] = 0;
        self.index[1] += 1;
        if self.index[1] >= dims[1] {
            self.index[1] = 0;
            self.index[2] += 1;
            if self.index[2] >= dims[2] {
                self.done = true;
                return;
            }
        }
        self.relocate();
    }
}

impl Iterator for GridIter<'_> {
    type Item = (GridIndex, f32);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }
            let index = self.index;
            let value = if self.core.is_dataless() {
                self.core.missing_value()
            } else {
                self.core.raw_block(self.block)[self.offset]
            };
            self.advance();

            if let Some((grid, bbox)) = &self.region {
                match grid.user_coordinates(&index[..self.core.ndim()]) {
                    Some(coords) if bbox.contains(&coords) => return Some((index, value)),
                    _ => continue,
                }
            }
            return Some((index, value));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let dims = self.core.layout().dims_padded();
        let consumed =
            self.index[0] + dims[0] * (self.index[1] + dims[1] * self.index[2]);
        let remaining = self.core.layout().total_points() - consumed;
        match self.region {
            Some(_) => (0, Some(remaining)),
            None => (remaining, Some(remaining)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::RegularGrid;
    use crate::types::GridShape;

    fn fill_blocks(dims: &[usize], bs: &[usize]) -> Vec<Vec<f32>> {
        // Row-major node value i + 10*j + 100*k, laid out into blocks.
        let layout = crate::blocks::BlockLayout::new(dims, bs).unwrap();
        let mut blocks = vec![vec![0.0; layout.block_len()]; layout.num_blocks()];
        let padded = [
            dims.first().copied().unwrap_or(1),
            dims.get(1).copied().unwrap_or(1),
            dims.get(2).copied().unwrap_or(1),
        ];
        for k in 0..padded[2] {
            for j in 0..padded[1] {
                for i in 0..padded[0] {
                    let (b, o) = layout.locate(&[i, j, k]);
                    blocks[b][o] = (i + 10 * j + 100 * k) as f32;
                }
            }
        }
        blocks
    }

    #[test]
    fn test_iter_yields_every_node_in_order() {
        let dims = [3usize, 4, 2];
        let mut blocks = fill_blocks(&dims, &[2, 2, 2]);
        let refs: Vec<&mut [f32]> = blocks.iter_mut().map(|b| b.as_mut_slice()).collect();
        let grid = RegularGrid::new(
            GridShape::new(dims.to_vec(), vec![2, 2, 2]),
            refs,
            &[0.0, 0.0, 0.0],
            &[2.0, 3.0, 1.0],
        )
        .unwrap();

        let items: Vec<_> = grid.iter().collect();
        assert_eq!(items.len(), 24);

        let mut expected = Vec::new();
        for k in 0..2 {
            for j in 0..4 {
                for i in 0..3 {
                    expected.push(([i, j, k], (i + 10 * j + 100 * k) as f32));
                }
            }
        }
        assert_eq!(items, expected);
    }

    #[test]
    fn test_iter_is_restartable() {
        let dims = [4usize, 3];
        let mut blocks = fill_blocks(&dims, &[2, 2]);
        let refs: Vec<&mut [f32]> = blocks.iter_mut().map(|b| b.as_mut_slice()).collect();
        let grid = RegularGrid::new(
            GridShape::new(dims.to_vec(), vec![2, 2]),
            refs,
            &[0.0, 0.0],
            &[3.0, 2.0],
        )
        .unwrap();

        let first: Vec<_> = grid.iter().collect();
        let second: Vec<_> = grid.iter().collect();
        assert_eq!(first, second);
        assert_eq!(grid.iter().size_hint(), (12, Some(12)));
    }

    #[test]
    fn test_iter_matches_value_at_index() {
        let dims = [5usize, 3];
        let mut blocks = fill_blocks(&dims, &[3, 2]);
        let refs: Vec<&mut [f32]> = blocks.iter_mut().map(|b| b.as_mut_slice()).collect();
        let grid = RegularGrid::new(
            GridShape::new(dims.to_vec(), vec![3, 2]),
            refs,
            &[0.0, 0.0],
            &[4.0, 2.0],
        )
        .unwrap();

        for (index, value) in grid.iter() {
            assert_eq!(grid.value_at_index(&index[..2]), value);
        }
    }

    #[test]
    fn test_iter_region_filters_by_coordinates() {
        let dims = [4usize, 4];
        let mut blocks = fill_blocks(&dims, &[2, 2]);
        let refs: Vec<&mut [f32]> = blocks.iter_mut().map(|b| b.as_mut_slice()).collect();
        // Unit spacing: node (i, j) sits at coordinate (i, j).
        let grid = RegularGrid::new(
            GridShape::new(dims.to_vec(), vec![2, 2]),
            refs,
            &[0.0, 0.0],
            &[3.0, 3.0],
        )
        .unwrap();

        let bbox = BoundingBox::new([1.0, 1.0, 0.0], [2.0, 3.0, 0.0]);
        let items: Vec<_> = grid.iter_region(&bbox).collect();
        assert_eq!(items.len(), 6);
        for (index, _) in &items {
            assert!((1..=2).contains(&index[0]));
            assert!((1..=3).contains(&index[1]));
        }
    }

    #[test]
    fn test_iter_dataless_yields_missing() {
        let grid = RegularGrid::new(
            GridShape::new(vec![2, 2], vec![2, 2]).with_missing_value(-1.0),
            Vec::new(),
            &[0.0, 0.0],
            &[1.0, 1.0],
        )
        .unwrap();
        let items: Vec<_> = grid.iter().collect();
        assert_eq!(items.len(), 4);
        assert!(items.iter().all(|(_, v)| *v == -1.0));
    }
}
