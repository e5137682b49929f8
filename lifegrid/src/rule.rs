use crate::grid::Cell;

/// B3/S23: a dead cell with three live neighbours is born, a live cell with
/// two or three survives, everything else is dead.
pub fn next_state(current: Cell, neighbours: u8) -> Cell {
    match (current, neighbours) {
        (Cell::Alive, 2 | 3) | (Cell::Dead, 3) => Cell::Alive,
        _ => Cell::Dead,
    }
}
