//! Cartesian product of the grid axes.
//!
//! Order is stable: stations outermost, then load, then seed. Two walks over
//! the same axes always yield the same sequence.

use gridrun_model::{GridAxes, Load, SimTask};

use crate::queue::TaskQueue;

/// Iterator over every grid point, in enumeration order.
pub struct Grid<'a> {
    axes: &'a GridAxes,
    loads: Vec<Load>,
    next: usize,
    total: usize,
}

impl<'a> Grid<'a> {
    pub fn new(axes: &'a GridAxes) -> Self {
        let loads: Vec<Load> = axes.loads.values().collect();
        let total = axes.stations.len() * loads.len() * axes.seeds.len();
        Self {
            axes,
            loads,
            next: 0,
            total,
        }
    }
}

impl Iterator for Grid<'_> {
    type Item = SimTask;

    fn next(&mut self) -> Option<SimTask> {
        if self.next >= self.total {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let seeds = self.axes.seeds.len();
        let per_station = self.loads.len() * seeds;

        let stations = self.axes.stations[index / per_station];
        let load = self.loads[(index / seeds) % self.loads.len()];
        let seed = self.axes.seeds[index % seeds];

        Some(SimTask::new(index, stations, load, seed))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Grid<'_> {}

/// Every grid point of `axes`, in enumeration order.
pub fn enumerate(axes: &GridAxes) -> Vec<SimTask> {
    Grid::new(axes).collect()
}

/// Enumerate `axes` into a fresh queue.
pub fn fill_queue(axes: &GridAxes) -> TaskQueue {
    let queue = TaskQueue::new();
    for task in Grid::new(axes) {
        queue.push(task);
    }
    queue
}
