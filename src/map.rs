use crate::common::Cell;

use std::fs::File;
use std::io::{self, BufRead, BufReader};

/// Static occupancy map. Read-only for the duration of a planning run;
/// temporary obstacle overlays are independent copies made with
/// [`Map::with_blocked`], never mutations of the shared base.
#[derive(Debug, Clone)]
pub struct Map {
    pub width: usize,
    pub height: usize,
    grid: Vec<Vec<bool>>, // grid[y][x] == true means blocked
}

impl Map {
    /// Loads a movingai-style map file: a `type`/`height`/`width`/`map`
    /// header followed by one row of characters per line. `@` is an obstacle;
    /// every other character (including `T` terrain) is passable.
    pub fn from_file(path: &str) -> io::Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let _type = lines.next().unwrap_or(Ok(String::new()))?;
        let height = lines
            .next()
            .unwrap_or(Ok(String::new()))?
            .split_whitespace()
            .last()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0);
        let width = lines
            .next()
            .unwrap_or(Ok(String::new()))?
            .split_whitespace()
            .last()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0);
        let _map = lines.next().unwrap_or(Ok(String::new()))?;

        let mut grid = Vec::with_capacity(height);
        for line in lines.take(height) {
            let row: Vec<bool> = line?.chars().take(width).map(|ch| ch == '@').collect();
            grid.push(row);
        }

        // Short or ragged files are padded with free cells.
        while grid.len() < height {
            grid.push(vec![false; width]);
        }
        for row in &mut grid {
            while row.len() < width {
                row.push(false);
            }
        }

        Ok(Map {
            width,
            height,
            grid,
        })
    }

    /// Builds a map from an inline drawing, one row per line, `@` blocked.
    /// Mostly for tests and demos.
    pub fn from_ascii(art: &str) -> Self {
        let grid: Vec<Vec<bool>> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().map(|ch| ch == '@').collect())
            .collect();
        let height = grid.len();
        let width = grid.first().map_or(0, Vec::len);
        Map {
            width,
            height,
            grid,
        }
    }

    /// An all-free map of the given dimensions.
    pub fn open(width: usize, height: usize) -> Self {
        Map {
            width,
            height,
            grid: vec![vec![false; width]; height],
        }
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// Out-of-bounds cells count as blocked.
    pub fn is_passable(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && !self.grid[cell.y][cell.x]
    }

    /// Passable 4-neighbors (up, down, left, right; no diagonals).
    pub fn get_neighbors(&self, cell: Cell) -> Vec<Cell> {
        let directions: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
        let mut neighbors = Vec::with_capacity(4);

        for &(dx, dy) in &directions {
            let new_x = cell.x as isize + dx;
            let new_y = cell.y as isize + dy;
            if new_x >= 0 && new_y >= 0 {
                let neighbor = Cell::new(new_x as usize, new_y as usize);
                if self.is_passable(neighbor) {
                    neighbors.push(neighbor);
                }
            }
        }

        neighbors
    }

    /// Independent copy of this map with every given cell marked blocked.
    /// The base map is untouched; in-flight searches keep reading it safely.
    pub fn with_blocked(&self, cells: &[Cell]) -> Map {
        let mut copy = self.clone();
        for cell in cells {
            if copy.in_bounds(*cell) {
                copy.grid[cell.y][cell.x] = true;
            }
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_map_blocks_and_bounds() {
        let map = Map::from_ascii(
            "....
             .@@.
             ....",
        );
        assert_eq!(map.width, 4);
        assert_eq!(map.height, 3);
        assert!(map.is_passable(Cell::new(0, 0)));
        assert!(!map.is_passable(Cell::new(1, 1)));
        assert!(!map.is_passable(Cell::new(4, 0)));
        assert!(!map.is_passable(Cell::new(0, 3)));
    }

    #[test]
    fn neighbors_are_4_connected() {
        let map = Map::from_ascii(
            "....
             .@@.
             ....",
        );
        let neighbors = map.get_neighbors(Cell::new(1, 0));
        assert_eq!(neighbors.len(), 2);
        assert!(neighbors.contains(&Cell::new(0, 0)));
        assert!(neighbors.contains(&Cell::new(2, 0)));
        assert!(!neighbors.contains(&Cell::new(1, 1)));
    }

    #[test]
    fn with_blocked_leaves_base_untouched() {
        let map = Map::open(3, 3);
        let overlay = map.with_blocked(&[Cell::new(1, 1), Cell::new(2, 2)]);
        assert!(!overlay.is_passable(Cell::new(1, 1)));
        assert!(!overlay.is_passable(Cell::new(2, 2)));
        assert!(map.is_passable(Cell::new(1, 1)));
        assert!(map.is_passable(Cell::new(2, 2)));
    }
}
