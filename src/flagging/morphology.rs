//! Binary image morphology on (time × frequency) planes.
//!
//! These are pure functions; the input mask is never modified. Cells
//! outside the image always count as unset, so dilation cannot wrap and
//! erosion eats into the image borders. Output is deterministic regardless
//! of how the work is parallelised internally.

use ndarray::prelude::*;
use ndarray::Zip;

/// An all-true structuring element of the given (height, width).
pub fn structuring_element(height: usize, width: usize) -> Array2<bool> {
    Array2::from_elem((height, width), true)
}

/// The set cells of `structure` as offsets from its centre (at
/// `(height / 2, width / 2)`).
fn structure_offsets(structure: ArrayView2<bool>) -> Vec<(isize, isize)> {
    let (height, width) = structure.dim();
    let (centre_row, centre_col) = ((height / 2) as isize, (width / 2) as isize);
    structure
        .indexed_iter()
        .filter(|(_, &set)| set)
        .map(|((row, col), _)| (row as isize - centre_row, col as isize - centre_col))
        .collect()
}

fn dilate_once(input: &Array2<bool>, offsets: &[(isize, isize)]) -> Array2<bool> {
    let (num_rows, num_cols) = input.dim();
    let mut output = Array2::from_elem((num_rows, num_cols), false);
    Zip::indexed(&mut output).par_for_each(|(row, col), out| {
        *out = offsets.iter().any(|&(row_offset, col_offset)| {
            let source_row = row as isize - row_offset;
            let source_col = col as isize - col_offset;
            (0..num_rows as isize).contains(&source_row)
                && (0..num_cols as isize).contains(&source_col)
                && input[[source_row as usize, source_col as usize]]
        });
    });
    output
}

fn erode_once(input: &Array2<bool>, offsets: &[(isize, isize)]) -> Array2<bool> {
    let (num_rows, num_cols) = input.dim();
    let mut output = Array2::from_elem((num_rows, num_cols), false);
    Zip::indexed(&mut output).par_for_each(|(row, col), out| {
        *out = offsets.iter().all(|&(row_offset, col_offset)| {
            let source_row = row as isize + row_offset;
            let source_col = col as isize + col_offset;
            (0..num_rows as isize).contains(&source_row)
                && (0..num_cols as isize).contains(&source_col)
                && input[[source_row as usize, source_col as usize]]
        });
    });
    output
}

/// Iterated binary dilation of `mask` with `structure`: a cell is set if
/// the structure, centred on it, covers any set cell.
///
/// A structuring element with no set cells defines no neighbourhood; the
/// mask is returned unchanged rather than erased.
pub fn binary_dilation(
    mask: ArrayView2<bool>,
    structure: ArrayView2<bool>,
    iterations: usize,
) -> Array2<bool> {
    let offsets = structure_offsets(structure);
    if offsets.is_empty() {
        return mask.to_owned();
    }
    let mut current = mask.to_owned();
    for _ in 0..iterations {
        current = dilate_once(&current, &offsets);
    }
    current
}

/// Iterated binary erosion of `mask` with `structure`: a cell survives
/// only if the structure, centred on it, covers set cells exclusively.
///
/// Degenerate structuring elements are a no-op, as for [`binary_dilation`].
pub fn binary_erosion(
    mask: ArrayView2<bool>,
    structure: ArrayView2<bool>,
    iterations: usize,
) -> Array2<bool> {
    let offsets = structure_offsets(structure);
    if offsets.is_empty() {
        return mask.to_owned();
    }
    let mut current = mask.to_owned();
    for _ in 0..iterations {
        current = erode_once(&current, &offsets);
    }
    current
}

/// Binary closing: `iterations` of dilation followed by `iterations` of
/// erosion. Fills holes up to roughly the structure size without growing
/// the mask's overall extent.
pub fn binary_closing(
    mask: ArrayView2<bool>,
    structure: ArrayView2<bool>,
    iterations: usize,
) -> Array2<bool> {
    let dilated = binary_dilation(mask, structure, iterations);
    binary_erosion(dilated.view(), structure, iterations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_rows(rows: &[&[u8]]) -> Array2<bool> {
        let num_cols = rows[0].len();
        Array2::from_shape_fn((rows.len(), num_cols), |(i, j)| rows[i][j] != 0)
    }

    #[test]
    fn test_dilation_of_empty_mask_is_empty() {
        let mask = Array2::from_elem((4, 6), false);
        let structure = structuring_element(3, 3);
        let dilated = binary_dilation(mask.view(), structure.view(), 2);
        assert!(!dilated.iter().any(|&flagged| flagged));
    }

    #[test]
    fn test_dilation_grows_a_point_to_the_structure_footprint() {
        let mut mask = Array2::from_elem((5, 5), false);
        mask[[2, 2]] = true;
        let structure = structuring_element(3, 3);
        let dilated = binary_dilation(mask.view(), structure.view(), 1);
        let expected = from_rows(&[
            &[0, 0, 0, 0, 0],
            &[0, 1, 1, 1, 0],
            &[0, 1, 1, 1, 0],
            &[0, 1, 1, 1, 0],
            &[0, 0, 0, 0, 0],
        ]);
        assert_eq!(dilated, expected);
    }

    #[test]
    fn test_two_iterations_grow_twice() {
        let mut mask = Array2::from_elem((5, 5), false);
        mask[[2, 2]] = true;
        let structure = structuring_element(3, 3);
        let dilated = binary_dilation(mask.view(), structure.view(), 2);
        assert!(dilated.iter().all(|&flagged| flagged));
    }

    #[test]
    fn test_dilation_does_not_wrap_at_borders() {
        let mut mask = Array2::from_elem((3, 4), false);
        mask[[0, 0]] = true;
        let structure = structuring_element(3, 3);
        let dilated = binary_dilation(mask.view(), structure.view(), 1);
        let expected = from_rows(&[
            &[1, 1, 0, 0], //
            &[1, 1, 0, 0],
            &[0, 0, 0, 0],
        ]);
        assert_eq!(dilated, expected);
    }

    #[test]
    fn test_erosion_shrinks_borders() {
        let mask = Array2::from_elem((4, 4), true);
        let structure = structuring_element(3, 3);
        let eroded = binary_erosion(mask.view(), structure.view(), 1);
        let expected = from_rows(&[
            &[0, 0, 0, 0],
            &[0, 1, 1, 0],
            &[0, 1, 1, 0],
            &[0, 0, 0, 0],
        ]);
        assert_eq!(eroded, expected);
    }

    #[test]
    fn test_closing_fills_an_interior_gap() {
        let mask = from_rows(&[&[0, 1, 1, 0, 1, 1, 0]]);
        let structure = structuring_element(1, 3);
        let closed = binary_closing(mask.view(), structure.view(), 1);
        assert_eq!(closed, from_rows(&[&[0, 1, 1, 1, 1, 1, 0]]));
    }

    #[test]
    fn test_degenerate_structure_is_a_no_op() {
        let mask = from_rows(&[&[0, 1, 0], &[1, 0, 1]]);
        let empty = Array2::from_elem((0, 0), false);
        let all_false = Array2::from_elem((3, 3), false);
        assert_eq!(binary_dilation(mask.view(), empty.view(), 2), mask);
        assert_eq!(binary_erosion(mask.view(), all_false.view(), 2), mask);
    }
}
