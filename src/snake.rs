use std::collections::VecDeque;

use crate::{Cell, GridInt};
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn delta(self) -> (GridInt, GridInt) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn is_perpendicular_to(self, other: Direction) -> bool {
        self.is_horizontal() != other.is_horizontal()
    }

    pub fn head_char(self) -> char {
        match self {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }

    fn is_horizontal(self) -> bool {
        matches!(self, Left | Right)
    }
}

/// Snake body on a wrapping grid. Front of the deque is the head.
pub struct Snake {
    body: VecDeque<Cell>,
    direction: Direction,
}

impl Snake {
    pub fn new(head: Cell, direction: Direction) -> Self {
        let mut body = VecDeque::new();
        body.push_back(head);
        Snake { body, direction }
    }

    #[cfg(test)]
    pub fn from_cells(cells: &[Cell], direction: Direction) -> Self {
        assert!(!cells.is_empty(), "a snake needs at least a head");
        Snake { body: cells.iter().copied().collect(), direction }
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn head(&self) -> Cell {
        // Never empty: the body only shrinks right after a push
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Where the head lands on the next step, wrapped onto a `width` x `height` torus.
    pub fn next_head(&self, width: GridInt, height: GridInt) -> Cell {
        let (x, y) = self.head();
        let (dx, dy) = self.direction.delta();
        ((x + dx).rem_euclid(width), (y + dy).rem_euclid(height))
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    pub fn push_head(&mut self, cell: Cell) {
        self.body.push_front(cell);
    }

    pub fn drop_tail(&mut self) -> Option<Cell> {
        if self.body.len() > 1 {
            self.body.pop_back()
        } else {
            None
        }
    }

    pub fn set_direction(&mut self, new_direction: Direction) {
        match (&new_direction, &self.direction) {
            (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right) => {},
            _ => self.direction = new_direction,
        };
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_head_wraps_both_ways() {
        let snake = Snake::new((31, 5), Right);
        assert_eq!(snake.next_head(32, 24), (0, 5));

        let snake = Snake::new((0, 5), Left);
        assert_eq!(snake.next_head(32, 24), (31, 5));

        let snake = Snake::new((3, 0), Up);
        assert_eq!(snake.next_head(32, 24), (3, 23));

        let snake = Snake::new((3, 23), Down);
        assert_eq!(snake.next_head(32, 24), (3, 0));
    }

    #[test]
    fn reversal_is_ignored() {
        let mut snake = Snake::new((4, 4), Right);
        snake.set_direction(Left);
        assert_eq!(snake.direction(), Right);

        snake.set_direction(Down);
        assert_eq!(snake.direction(), Down);
        snake.set_direction(Up);
        assert_eq!(snake.direction(), Down);
    }

    #[test]
    fn perpendicular_axes() {
        assert!(Up.is_perpendicular_to(Left));
        assert!(Right.is_perpendicular_to(Down));
        assert!(!Up.is_perpendicular_to(Down));
        assert!(!Left.is_perpendicular_to(Left));
    }

    #[test]
    fn tail_never_drops_below_one_cell() {
        let mut snake = Snake::from_cells(&[(2, 2), (1, 2)], Right);
        assert_eq!(snake.drop_tail(), Some((1, 2)));
        assert_eq!(snake.drop_tail(), None);
        assert_eq!(snake.head(), (2, 2));
    }
}
