//! Greedy box placement for compiled diagrams.
//!
//! Every node is a fixed-size rectangle. Children fan out in a column to the
//! right of their parent and are pushed downward until they clear every box
//! placed before them. Placement is order dependent: a later node never moves
//! an earlier one, so the same insertion order always yields the same layout.

use crate::model::Position;
use tracing::trace;

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    pub margin: f64,
    /// Multiplier on `margin` for the horizontal gap between parent and child columns.
    pub fan_factor: f64,
    pub max_attempts: usize,
    /// Diagonal step per attempt once `max_attempts` is exhausted.
    pub fallback_step: f64,
    /// Grid that child candidates snap to.
    pub snap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 350.0,
            node_height: 150.0,
            margin: 30.0,
            fan_factor: 3.0,
            max_attempts: 100,
            fallback_step: 50.0,
            snap: 10.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Vertical distance between consecutive items of an array column.
    pub fn row_pitch(&self) -> f64 {
        self.config.node_height + self.config.margin
    }

    /// X coordinate of the column that children of a node at `parent_x` occupy.
    pub fn child_column(&self, parent_x: f64) -> f64 {
        parent_x + self.config.node_width + self.config.margin * self.config.fan_factor
    }

    pub fn overlaps(&self, a: Position, b: Position) -> bool {
        let c = &self.config;
        (a.x - b.x).abs() < c.node_width + c.margin && (a.y - b.y).abs() < c.node_height + c.margin
    }

    /// Slide `candidate` downward until it clears every placed box.
    ///
    /// Gives up after `max_attempts` shifts and returns the candidate offset
    /// diagonally by `attempts * fallback_step`, which always terminates but
    /// may still overlap.
    pub fn find_non_overlapping_position(&self, candidate: Position, placed: &[Position]) -> Position {
        let step = self.row_pitch();
        let mut current = candidate;
        let mut attempts = 0;

        while placed.iter().any(|p| self.overlaps(current, *p)) {
            if attempts >= self.config.max_attempts {
                let offset = attempts as f64 * self.config.fallback_step;
                trace!(attempts, x = candidate.x, y = candidate.y, "layout fell back to diagonal offset");
                return Position::new(candidate.x + offset, candidate.y + offset);
            }
            current.y += step;
            attempts += 1;
        }

        current
    }

    /// Candidate slot for child `index` of `count`, centered on the parent's row.
    pub fn calculate_child_position(&self, parent: Position, index: usize, count: usize) -> Position {
        let c = &self.config;
        let spacing = c.node_height + c.margin * 2.0;
        let offset = index as f64 - (count.saturating_sub(1)) as f64 / 2.0;

        Position::new(
            self.snap(self.child_column(parent.x)),
            self.snap(parent.y + offset * spacing),
        )
    }

    fn snap(&self, value: f64) -> f64 {
        if self.config.snap <= 0.0 {
            return value;
        }
        (value / self.config.snap).round() * self.config.snap
    }
}
