//! Textual maze encoding.
//!
//! Every grid position is one uppercase hex digit holding its link flags (north `8`,
//! south `4`, east `2`, west `1`). Rows are separated by `'\n'`, with no trailing
//! separator. Orphaned positions are always `0`.
//!
//! Tunnels are not written out. A crossing shows up as a cell linked along one axis whose
//! neighbors on the other axis link towards it, and decoding rebuilds the tunnel from that.

use crate::error::CodecError;
use crate::maze::{Cell, CellId, Coord, Direction, Grid, Orientation};
use crate::validator;

const ROW_SEPARATOR: char = '\n';

/// Encodes the link state of every grid position, row-major.
pub fn encode(grid: &Grid) -> String {
    let mut encoded = String::with_capacity(grid.size() + grid.rows());
    for (y, row) in grid.each_row().enumerate() {
        if y > 0 {
            encoded.push(ROW_SEPARATOR);
        }
        encoded.extend(row.iter().map(encode_cell));
    }
    encoded
}

/// Hex digit for one cell.
pub fn encode_cell(cell: &Cell) -> char {
    if cell.is_orphaned() {
        return '0';
    }
    // Link bits never exceed 0xF
    char::from_digit(u32::from(cell.link_bits()), 16)
        .map_or('0', |digit| digit.to_ascii_uppercase())
}

/// Link bits of an uppercase hex digit.
pub fn decode_nibble(digit: char) -> Option<u8> {
    match digit {
        '0'..='9' | 'A'..='F' => digit.to_digit(16).and_then(|d| u8::try_from(d).ok()),
        _ => None,
    }
}

/// Rebuilds a grid from its encoding.
///
/// Fails without producing a grid on a length mismatch, a digit that is not uppercase hex,
/// an orphaned position with links, or a link that is not mirrored by its neighbor.
pub fn decode(
    encoded: &str,
    rows: usize,
    columns: usize,
    orphan_mask: &[Coord],
) -> Result<Grid, CodecError> {
    decode_links(encoded, rows, columns, orphan_mask)
        .inspect_err(|err| tracing::debug!(%err, "rejected encoded maze"))
}

fn decode_links(
    encoded: &str,
    rows: usize,
    columns: usize,
    orphan_mask: &[Coord],
) -> Result<Grid, CodecError> {
    let mut grid = Grid::new(rows, columns, orphan_mask)?;

    let expected = rows * columns + rows - 1;
    let actual = encoded.chars().count();
    if actual != expected {
        return Err(CodecError::Length { expected, actual });
    }

    for (y, line) in encoded.split(ROW_SEPARATOR).enumerate() {
        let actual = line.chars().count();
        if actual != columns {
            return Err(CodecError::RowLength {
                row: y,
                expected: columns,
                actual,
            });
        }
        for (x, digit) in line.chars().enumerate() {
            let coord = Coord::new(x, y);
            let bits = decode_nibble(digit).ok_or(CodecError::InvalidDigit { digit, coord })?;
            let id = grid.id(coord).map_err(|_| CodecError::RowLength {
                row: y,
                expected: columns,
                actual,
            })?;
            if grid[id].is_orphaned() {
                if bits != 0 {
                    return Err(CodecError::LinkedOrphan(coord));
                }
                continue;
            }
            for dir in Direction::ALL {
                grid.set_link_flag(id, dir, bits & dir.bit() != 0);
            }
        }
    }

    let crossings = grid
        .cells()
        .iter()
        .filter_map(|&id| tunnel_axis(&grid, id).map(|axis| (id, axis)))
        .collect::<Vec<_>>();
    for (over, axis) in crossings {
        let coord = grid[over].coord();
        let under = grid
            .add_under(over, axis)
            .map_err(|_| CodecError::Inconsistent {
                coord,
                direction: axis.directions()[0],
            })?;
        for dir in axis.directions() {
            grid.set_link_flag(under, dir, true);
        }
    }

    if let Some((coord, direction)) = validator::one_sided_link(&grid) {
        return Err(CodecError::Inconsistent { coord, direction });
    }
    Ok(grid)
}

/// Axis of the tunnel beneath `id`, if its raw link flags describe a crossing.
fn tunnel_axis(grid: &Grid, id: CellId) -> Option<Orientation> {
    let axis = match grid[id].link_bits() {
        0b0011 => Orientation::Vertical,
        0b1100 => Orientation::Horizontal,
        _ => return None,
    };
    axis.directions()
        .into_iter()
        .all(|dir| {
            grid.neighbor(id, dir)
                .is_some_and(|n| grid[n].is_linked(dir.opposite()))
        })
        .then_some(axis)
}
