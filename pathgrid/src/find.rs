use std::{
    cmp::Ordering,
    collections::BinaryHeap,
    fmt::{Debug, Display},
};

use log::{debug, trace};
use serde::Serialize;

/// Supertrait that collects all the requirements on the NodeReference values
/// Must be copy, comparable and not references (hence 'static). The `Ord`
/// implementation decides which node is settled first among equal distances.
pub trait NodeReference: Copy + Eq + Ord + Debug + 'static {}

pub trait MapTrait {
    /// The type that can be used to reference nodes in the map
    type Reference: NodeReference;

    /// The type that the map uses for storage
    type Storage<T: Default + Copy + Clone + 'static>: MapStorage<T, Reference = Self::Reference>;

    /// Check if the provided node exists and can be stepped on
    fn is_passable(&self, node: Self::Reference) -> bool;

    /// Return an iterator over the passable neighbors of the provided node, in a fixed order.
    /// Every step has the same cost.
    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference>;

    /// Create a storage for values of type T
    fn create_storage<T: Default + Copy + Clone + 'static>(&self) -> Self::Storage<T>;
}

pub trait MapStorage<T> {
    type Reference: NodeReference;

    fn is_valid(&self, node: Self::Reference) -> bool;
    fn get(&self, node: Self::Reference) -> T;
    fn get_mut(&mut self, node: Self::Reference) -> &mut T;
}

/// Per-node bookkeeping of a single search run.
///
/// A fresh set is created for every run, so the map itself is never written
/// to while searching.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scratch<R> {
    /// Best known number of steps from the start, `None` while unreached
    pub distance: Option<usize>,
    /// Set once the distance is final, never cleared within a run
    pub visited: bool,
    /// The node this one was reached from on its best known route
    pub previous: Option<R>,
}

impl<R> Default for Scratch<R> {
    fn default() -> Self {
        Self {
            distance: None,
            visited: false,
            previous: None,
        }
    }
}

impl<R> Display for Scratch<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.visited, self.distance) {
            (true, Some(distance)) => write!(f, "{:03} ", distance),
            (false, Some(_)) => write!(f, "{:>3} ", "~"),
            (_, None) => write!(f, "{:3} ", ""),
        }
    }
}

/// The objects that we store in the priority queue
#[derive(Debug, PartialEq, Eq)]
struct ToVisit<R> {
    distance: usize,
    point: R,
}

impl<R: Ord> Ord for ToVisit<R> {
    fn cmp(&self, other: &Self) -> Ordering {
        // reverse for BinaryHeap to be a min-heap
        self.distance
            .cmp(&other.distance)
            .then_with(|| self.point.cmp(&other.point))
            .reverse()
    }
}

impl<R: Ord> PartialOrd for ToVisit<R> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, PartialEq, Clone, Eq, Serialize)]
pub struct PathResult<R> {
    pub path: Vec<R>,
    pub start: R,
    pub goal: R,
    pub total_cost: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PathFinderState<R> {
    Computing,
    NoPathFound,
    PathFound(PathResult<R>),
}

impl<R> PathFinderState<R> {
    pub fn is_done(&self) -> bool {
        !matches!(self, PathFinderState::Computing)
    }
}

/// One entry of the feed handed to an animator: first every settled node in
/// order, then the nodes of the path from start to goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchEvent<R> {
    Settled(R),
    Path(R),
}

/// Uniform-cost search between two nodes that can be advanced one settled
/// node at a time.
pub struct PathFinder<M: MapTrait> {
    start: M::Reference,
    goal: M::Reference,
    scratch: M::Storage<Scratch<M::Reference>>,
    visit_list: BinaryHeap<ToVisit<M::Reference>>,
    visited_order: Vec<M::Reference>,
    state: PathFinderState<M::Reference>,
}

impl<M: MapTrait> PathFinder<M> {
    pub fn new(map: &M, start: M::Reference, goal: M::Reference) -> Self {
        let mut scratch = map.create_storage::<Scratch<M::Reference>>();
        let mut visit_list = BinaryHeap::new();

        // a walled start can not reach anything, leave the frontier empty
        if map.is_passable(start) {
            scratch.get_mut(start).distance = Some(0);
            visit_list.push(ToVisit {
                distance: 0,
                point: start,
            });
        } else {
            debug!("start {:?} is not passable", start);
        }

        Self {
            start,
            goal,
            scratch,
            visit_list,
            visited_order: Vec::new(),
            state: PathFinderState::Computing,
        }
    }

    /// Run the search to completion.
    pub fn finish(mut self, map: &M) -> SearchOutcome<M> {
        while !self.step(map).is_done() {}

        SearchOutcome {
            start: self.start,
            goal: self.goal,
            visited_order: self.visited_order,
            scratch: self.scratch,
            state: self.state,
        }
    }

    /// Settle the next node of the frontier and relax its neighbors.
    ///
    /// Returns `Computing` while more nodes may be settled. Once the goal is
    /// settled or the frontier runs dry the final state is returned by this
    /// and every later call.
    pub fn step(&mut self, map: &M) -> PathFinderState<M::Reference> {
        if self.state.is_done() {
            return self.state.clone();
        }

        // entries superseded by a shorter route point at nodes settled earlier
        let visit = loop {
            match self.visit_list.pop() {
                Some(visit) if self.scratch.get(visit.point).visited => continue,
                Some(visit) => break visit,
                None => {
                    debug!(
                        "no path from {:?} to {:?}, settled {} nodes",
                        self.start,
                        self.goal,
                        self.visited_order.len()
                    );
                    self.state = PathFinderState::NoPathFound;
                    return self.state.clone();
                }
            }
        };

        self.scratch.get_mut(visit.point).visited = true;
        self.visited_order.push(visit.point);
        trace!("settled {:?} at distance {}", visit.point, visit.distance);

        if visit.point == self.goal {
            debug!(
                "found goal {:?}: cost={}, settled {} nodes",
                self.goal,
                visit.distance,
                self.visited_order.len()
            );

            self.state = match reconstruct_path(&self.scratch, self.goal) {
                Some(path) => PathFinderState::PathFound(PathResult {
                    path,
                    start: self.start,
                    goal: self.goal,
                    total_cost: visit.distance,
                }),
                None => PathFinderState::NoPathFound,
            };
            return self.state.clone();
        }

        let candidate = visit.distance + 1;
        for neighbor in map.neighbors_of(visit.point) {
            let entry = self.scratch.get_mut(neighbor);
            if entry.visited {
                continue;
            }
            if entry.distance.map_or(true, |d| candidate < d) {
                entry.distance = Some(candidate);
                entry.previous = Some(visit.point);
                self.visit_list.push(ToVisit {
                    distance: candidate,
                    point: neighbor,
                });
            }
        }

        self.state.clone()
    }

    pub fn state(&self) -> &PathFinderState<M::Reference> {
        &self.state
    }

    /// The nodes settled so far, in the order they were settled
    pub fn visited_order(&self) -> &[M::Reference] {
        &self.visited_order
    }

    pub fn scratch(&self) -> &M::Storage<Scratch<M::Reference>> {
        &self.scratch
    }

    pub fn start(&self) -> M::Reference {
        self.start
    }

    pub fn goal(&self) -> M::Reference {
        self.goal
    }
}

/// Everything a finished search produced.
pub struct SearchOutcome<M: MapTrait> {
    pub start: M::Reference,
    pub goal: M::Reference,
    /// Settled nodes in settlement order, each exactly once
    pub visited_order: Vec<M::Reference>,
    /// Final per-node state of the run
    pub scratch: M::Storage<Scratch<M::Reference>>,
    /// Either `PathFound` or `NoPathFound`
    pub state: PathFinderState<M::Reference>,
}

impl<M: MapTrait> SearchOutcome<M> {
    /// The path from start to goal, `None` when the goal could not be reached
    pub fn path(&self) -> Option<&[M::Reference]> {
        match &self.state {
            PathFinderState::PathFound(result) => Some(&result.path),
            _ => None,
        }
    }

    /// Distance recorded for `node`, final only if the node was settled
    pub fn distance_at(&self, node: M::Reference) -> Option<usize> {
        if self.scratch.is_valid(node) {
            self.scratch.get(node).distance
        } else {
            None
        }
    }

    pub fn events(&self) -> impl Iterator<Item = SearchEvent<M::Reference>> + '_ {
        let settled = self.visited_order.iter().copied().map(SearchEvent::Settled);
        let path = self
            .path()
            .unwrap_or_default()
            .iter()
            .copied()
            .map(SearchEvent::Path);
        settled.chain(path)
    }
}

/// Search for the shortest route from `start` to `goal`, every step costing 1.
pub fn search<M: MapTrait>(map: &M, start: M::Reference, goal: M::Reference) -> SearchOutcome<M> {
    PathFinder::new(map, start, goal).finish(map)
}

/// Follow the `previous` links from `goal` back to the start of the run and
/// return the nodes in start-to-goal order.
///
/// Returns `None` if `goal` was never settled, i.e. there is no path. A run
/// whose start is its goal yields `Some(vec![goal])`.
pub fn reconstruct_path<R, S>(scratch: &S, goal: R) -> Option<Vec<R>>
where
    R: NodeReference,
    S: MapStorage<Scratch<R>, Reference = R>,
{
    if !scratch.is_valid(goal) || !scratch.get(goal).visited {
        return None;
    }

    let mut path = vec![goal];
    let mut current = scratch.get(goal);
    while let Some(previous) = current.previous {
        path.push(previous);
        current = scratch.get(previous);
    }

    path.reverse();
    Some(path)
}
