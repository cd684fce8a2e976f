use crate::event::Position;

/// Side length of one map grid cell in world units.
pub const GRID_CELL_SIZE: f32 = 146.3;

/// Converts a world position to a human-readable map grid label.
pub trait GridLocator: Send + Sync {
    fn label(&self, position: Position) -> String;
}

/// Standard map grid: columns lettered west to east (A, B, ... Z, AA, ...),
/// rows numbered north to south, both anchored at the map corner.
#[derive(Debug, Clone, Copy)]
pub struct WorldGrid {
    world_size: f32,
}

impl WorldGrid {
    pub fn new(world_size: f32) -> Self {
        Self { world_size }
    }
}

impl GridLocator for WorldGrid {
    fn label(&self, position: Position) -> String {
        let offset = self.world_size / 2.0;
        let column = (((position.x + offset) / GRID_CELL_SIZE).floor()).max(0.0) as u32;
        let row = (((offset - position.z) / GRID_CELL_SIZE).floor()).max(0.0) as u32;
        format!("{}{row}", column_letters(column))
    }
}

// Bijective base-26: 0 -> A, 25 -> Z, 26 -> AA.
fn column_letters(mut index: u32) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_corner_is_a0() {
        let grid = WorldGrid::new(4500.0);
        let corner = Position::new(-2250.0, 0.0, 2250.0);
        assert_eq!(grid.label(corner), "A0");
    }

    #[test]
    fn center_of_map_lands_mid_grid() {
        let grid = WorldGrid::new(4500.0);
        let label = grid.label(Position::new(0.0, 0.0, 0.0));
        // 2250 / 146.3 = 15.38 -> column P, row 15
        assert_eq!(label, "P15");
    }

    #[test]
    fn out_of_bounds_positions_clamp_to_the_edge() {
        let grid = WorldGrid::new(4500.0);
        assert_eq!(grid.label(Position::new(-9999.0, 0.0, 9999.0)), "A0");
    }

    #[test]
    fn columns_wrap_past_z() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(27), "AB");
        assert_eq!(column_letters(52), "BA");
    }
}
