//! Pathfinding over the hex grid.
//!
//! `find_path` is A* over unit-cost hex adjacency with the hex distance as
//! heuristic (admissible and consistent for unit edges), using a binary-heap
//! open set. `find_nearest` is a plain FIFO breadth-first search, so the
//! first match it returns has the minimum hop count.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use crate::grid::{Cell, HexGrid};
use crate::hex::Hex;

/// Find a shortest walkable path from `start` to `goal`.
///
/// Returns the cells to step through, excluding `start` and ending with
/// `goal`. Returns an empty vec if `start == goal`, and `None` if the goal
/// cannot be stood on or is unreachable. `start` itself does not have to be
/// walkable. The grid is never modified.
pub fn find_path(grid: &HexGrid, start: Hex, goal: Hex) -> Option<Vec<Hex>> {
    if start == goal {
        return Some(vec![]);
    }
    if !grid.is_walkable(goal) {
        return None;
    }

    // Ordered by (f, h, hex): lowest f first, then the node nearer the goal.
    let mut open: BinaryHeap<Reverse<(u32, u32, Hex)>> = BinaryHeap::new();
    let mut came_from: HashMap<Hex, Hex> = HashMap::new();
    let mut g_score: HashMap<Hex, u32> = HashMap::new();
    let mut closed: HashSet<Hex> = HashSet::new();

    let h = start.distance(&goal);
    g_score.insert(start, 0);
    open.push(Reverse((h, h, start)));

    while let Some(Reverse((_, _, current))) = open.pop() {
        if current == goal {
            return Some(reconstruct(&came_from, start, goal));
        }
        if !closed.insert(current) {
            // Stale heap entry
            continue;
        }

        let g = g_score.get(&current).copied().unwrap_or(u32::MAX);
        for next in current.neighbors() {
            if closed.contains(&next) || !grid.is_walkable(next) {
                continue;
            }
            let tentative = g.saturating_add(1);
            if g_score.get(&next).map_or(true, |&old| tentative < old) {
                g_score.insert(next, tentative);
                came_from.insert(next, current);
                let h = next.distance(&goal);
                open.push(Reverse((tentative + h, h, next)));
            }
        }
    }

    None
}

fn reconstruct(came_from: &HashMap<Hex, Hex>, start: Hex, goal: Hex) -> Vec<Hex> {
    let mut path = vec![goal];
    let mut node = goal;
    while let Some(&prev) = came_from.get(&node) {
        if prev == start {
            break;
        }
        path.push(prev);
        node = prev;
    }
    path.reverse();
    path
}

/// Breadth-first search from `start` for the nearest cell matching
/// `predicate`.
///
/// Expansion walks over every *existing* neighbor cell regardless of
/// walkability, so stations (which are not walkable) can be found. Returns
/// `None` once the connected component is exhausted.
pub fn find_nearest<'a, P>(grid: &'a HexGrid, start: Hex, predicate: P) -> Option<&'a Cell>
where
    P: Fn(&Cell) -> bool,
{
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if let Some(cell) = grid.cell(current) {
            if predicate(cell) {
                return Some(cell);
            }
        }

        for next in current.neighbors() {
            if grid.contains(next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    None
}

/// Path from `from` to a walkable neighbor of `station`.
///
/// Neighbors are tried nearest to `from` first (ties in direction order);
/// the first one with a path wins, so a sealed-off neighbor never hides a
/// reachable one. `None` if the station is boxed in or out of reach.
pub fn approach_path(grid: &HexGrid, station: Hex, from: Hex) -> Option<Vec<Hex>> {
    let mut stands = grid.walkable_neighbors(station);
    stands.sort_by_key(|n| from.distance(n));
    stands.into_iter().find_map(|stand| find_path(grid, from, stand))
}

/// Hop count of the shortest walkable path, by exhaustive BFS.
///
/// Slower than `find_path`; used to cross-check it.
pub fn hop_count(grid: &HexGrid, start: Hex, goal: Hex) -> Option<usize> {
    if start == goal {
        return Some(0);
    }
    if !grid.is_walkable(goal) {
        return None;
    }
    let mut dist: HashMap<Hex, usize> = HashMap::new();
    let mut queue = VecDeque::new();
    dist.insert(start, 0);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        let d = dist[&current];
        for next in grid.walkable_neighbors(current) {
            if dist.contains_key(&next) {
                continue;
            }
            if next == goal {
                return Some(d + 1);
            }
            dist.insert(next, d + 1);
            queue.push_back(next);
        }
    }
    None
}
