//! Mission graphs and the production rules that grow and reshape them.
//!
//! A mission graph is a small lattice of nodes connected by directional
//! links. It starts as a straight `Entrance - Task - ... - Goal` chain and
//! is then reorganised by rules that fold runs of tasks into vertical
//! branches.

use std::collections::VecDeque;
use std::fmt;

use rand::Rng;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::common::Direction;

/// Longest run of tasks a single rule can rewrite, the first one included.
pub const MAXIMUM_RULE_ARITY: usize = 6;

// =============================================================================
// NodeKind
// =============================================================================

/// The alphabet of mission symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The axiom every mission is derived from.
    Start,
    Entrance,
    Task,
    /// One of a pair of tasks meant to lie apart but still be linked.
    FarTask,
    Goal,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "Start",
            Self::Entrance => "Entrance",
            Self::Task => "Task",
            Self::FarTask => "FarTask",
            Self::Goal => "Goal",
        };
        write!(formatter, "{name}")
    }
}

// =============================================================================
// NodeIndex
// =============================================================================

/// Slot of a node in its [`MissionGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    #[must_use]
    pub const fn value(&self) -> usize {
        self.0
    }
}

// =============================================================================
// MissionNode
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionNode {
    kind: NodeKind,
    terminal: bool,
    links: [Option<NodeIndex>; 4],
}

impl MissionNode {
    const fn new(kind: NodeKind, terminal: bool) -> Self {
        Self {
            kind,
            terminal,
            links: [None; 4],
        }
    }

    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Terminal nodes are never rewritten again.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.terminal
    }

    #[must_use]
    pub const fn link(&self, direction: Direction) -> Option<NodeIndex> {
        self.links[direction.index()]
    }

    /// Linked neighbours in `Direction::all()` order.
    pub fn neighbors(&self) -> impl Iterator<Item = (Direction, NodeIndex)> + '_ {
        Direction::all()
            .into_iter()
            .filter_map(|direction| self.link(direction).map(|node| (direction, node)))
    }

    const fn is_open_task(&self) -> bool {
        matches!(self.kind, NodeKind::Task) && !self.terminal
    }
}

// =============================================================================
// MissionGraph
// =============================================================================

/// Nodes in an arena; links are indices into it and always come in
/// opposite pairs.
///
/// # Examples
///
/// ```
/// use dungeon_layout::generation::grammar::{MissionGraph, NodeKind};
///
/// let mut graph = MissionGraph::start_mission();
/// graph.add_task();
///
/// let kinds: Vec<_> = graph
///     .main_path()
///     .into_iter()
///     .map(|node| graph.node(node).kind())
///     .collect();
/// assert_eq!(
///     kinds,
///     vec![NodeKind::Entrance, NodeKind::Task, NodeKind::Task, NodeKind::Goal]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionGraph {
    nodes: Vec<MissionNode>,
    root: NodeIndex,
    goal: NodeIndex,
}

impl MissionGraph {
    /// A graph holding only the [`NodeKind::Start`] axiom.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![MissionNode::new(NodeKind::Start, false)],
            root: NodeIndex(0),
            goal: NodeIndex(0),
        }
    }

    /// Rewrites the axiom into `Entrance - Task - Goal`.
    #[must_use]
    pub fn start_mission() -> Self {
        let mut graph = Self::new();
        let entrance = graph.root;
        graph.nodes[entrance.0] = MissionNode::new(NodeKind::Entrance, true);
        let task = graph.push(NodeKind::Task, false);
        let goal = graph.push(NodeKind::Goal, true);
        graph.connect(entrance, Direction::Right, task);
        graph.connect(task, Direction::Right, goal);
        graph.goal = goal;
        graph
    }

    /// Builds a mission with `task_count` tasks and reorganises it with up
    /// to `tries` scan steps. A task count of zero is treated as one.
    pub fn synthesize<R: Rng + ?Sized>(
        task_count: usize,
        tries: usize,
        probability: f64,
        rng: &mut R,
    ) -> Self {
        let mut graph = Self::start_mission();
        for _ in 1..task_count {
            graph.add_task();
        }
        graph.reorganize(tries, probability, rng);
        graph
    }

    #[must_use]
    pub const fn root(&self) -> NodeIndex {
        self.root
    }

    #[must_use]
    pub const fn goal(&self) -> NodeIndex {
        self.goal
    }

    #[must_use]
    pub fn node(&self, index: NodeIndex) -> &MissionNode {
        &self.nodes[index.0]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &MissionNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeIndex(index), node))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|node| node.kind == kind).count()
    }

    /// Splices a new task between the goal and the node before it.
    ///
    /// Does nothing on a graph without a goal.
    pub fn add_task(&mut self) {
        let goal = self.goal;
        let Some(last) = self.node(goal).link(Direction::Left) else {
            return;
        };
        self.disconnect(last, Direction::Right);
        let task = self.push(NodeKind::Task, false);
        self.connect(last, Direction::Right, task);
        self.connect(task, Direction::Right, goal);
    }

    /// Walks the graph `tries` steps, offering each open task to the
    /// production rules with the given probability.
    ///
    /// The walk follows `Right` links, falling back to `Down`, and restarts
    /// at the root whenever it reaches the goal or a dead end and after
    /// every rewrite.
    pub fn reorganize<R: Rng + ?Sized>(&mut self, tries: usize, probability: f64, rng: &mut R) {
        let first = self.scan_successor(self.root);
        let mut current = first;

        for _ in 0..tries {
            let Some(node) = current else {
                current = first;
                continue;
            };

            if self.node(node).is_open_task() && rng.random::<f64>() < probability {
                let run = self.open_tasks_after(node);
                if run.len() >= 2 {
                    let extra = rng.random_range(2..=run.len());
                    let mut tasks: SmallVec<[NodeIndex; MAXIMUM_RULE_ARITY]> = SmallVec::new();
                    tasks.push(node);
                    tasks.extend_from_slice(&run[..extra]);
                    self.apply_rule(&tasks, rng);
                    current = self.scan_successor(self.root);
                    continue;
                }
            }

            current = self
                .scan_successor(node)
                .filter(|next| *next != self.goal)
                .or_else(|| self.scan_successor(self.root));
        }
    }

    /// Every node reachable from the root through any link.
    #[must_use]
    pub fn reachable_from_root(&self) -> FxHashSet<NodeIndex> {
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::from([self.root]);
        visited.insert(self.root);
        while let Some(node) = queue.pop_front() {
            for (_, neighbor) in self.node(node).neighbors() {
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        visited
    }

    /// The walk from the root that prefers `Right` and falls back to `Down`,
    /// ending at the goal or at the first node with neither link.
    #[must_use]
    pub fn main_path(&self) -> Vec<NodeIndex> {
        let mut path = vec![self.root];
        let mut current = self.root;
        while current != self.goal && path.len() <= self.nodes.len() {
            let Some(next) = self.scan_successor(current) else {
                break;
            };
            path.push(next);
            current = next;
        }
        path
    }

    fn scan_successor(&self, node: NodeIndex) -> Option<NodeIndex> {
        let node = self.node(node);
        node.link(Direction::Right)
            .or_else(|| node.link(Direction::Down))
    }

    /// Consecutive open tasks to the right of `node`, at most one rule's
    /// worth.
    fn open_tasks_after(&self, node: NodeIndex) -> SmallVec<[NodeIndex; MAXIMUM_RULE_ARITY]> {
        std::iter::successors(self.node(node).link(Direction::Right), |current| {
            self.node(*current).link(Direction::Right)
        })
        .take_while(|current| self.node(*current).is_open_task())
        .take(MAXIMUM_RULE_ARITY - 1)
        .collect()
    }

    /// Folds a straight run of 3 to 6 tasks into a branch around its first
    /// task. The last task keeps its link onward to the rest of the chain.
    fn apply_rule<R: Rng + ?Sized>(&mut self, tasks: &[NodeIndex], rng: &mut R) {
        for window in tasks.windows(2) {
            self.disconnect(window[0], Direction::Right);
        }

        match *tasks {
            [t0, t1, t2] => {
                self.connect(t0, Direction::Up, t1);
                self.connect(t0, Direction::Down, t2);
                self.make_terminal(&[t0, t1, t2]);
            }
            [t0, t1, t2, t3] => {
                self.connect(t0, Direction::Up, t1);
                self.connect(t1, Direction::Right, t2);
                self.connect(t0, Direction::Down, t3);
                self.make_terminal(&[t0, t1, t2, t3]);
            }
            [t0, t1, t2, t3, t4] => {
                self.connect(t0, Direction::Up, t1);
                self.connect(t1, Direction::Right, t2);
                self.connect(t0, Direction::Down, t3);
                self.connect(t3, Direction::Right, t4);
                self.make_terminal(&[t0, t1, t2, t3]);
            }
            [t0, t1, t2, t3, t4, t5] => {
                self.connect(t0, Direction::Up, t1);
                self.connect(t1, Direction::Right, t2);
                self.connect(t2, Direction::Right, t3);
                self.connect(t0, Direction::Down, t4);
                self.connect(t4, Direction::Right, t5);
                self.make_terminal(&[t0, t1, t2, t3, t4]);
                if rng.random_bool(0.5) {
                    for far in [t2, t5] {
                        self.nodes[far.0].kind = NodeKind::FarTask;
                        self.nodes[far.0].terminal = true;
                    }
                    self.connect(t2, Direction::Down, t5);
                }
            }
            _ => return,
        }
        tracing::trace!(arity = tasks.len(), first = tasks[0].0, "applied production rule");
    }

    fn make_terminal(&mut self, nodes: &[NodeIndex]) {
        for node in nodes {
            self.nodes[node.0].terminal = true;
        }
    }

    fn push(&mut self, kind: NodeKind, terminal: bool) -> NodeIndex {
        self.nodes.push(MissionNode::new(kind, terminal));
        NodeIndex(self.nodes.len() - 1)
    }

    fn connect(&mut self, from: NodeIndex, direction: Direction, to: NodeIndex) {
        self.nodes[from.0].links[direction.index()] = Some(to);
        self.nodes[to.0].links[direction.opposite().index()] = Some(from);
    }

    fn disconnect(&mut self, from: NodeIndex, direction: Direction) {
        if let Some(to) = self.nodes[from.0].links[direction.index()].take() {
            self.nodes[to.0].links[direction.opposite().index()] = None;
        }
    }
}

impl Default for MissionGraph {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    use rstest::rstest;

    fn chain(tasks: usize) -> MissionGraph {
        let mut graph = MissionGraph::start_mission();
        for _ in 1..tasks {
            graph.add_task();
        }
        graph
    }

    fn assert_links_are_paired(graph: &MissionGraph) {
        for (index, node) in graph.nodes() {
            for (direction, neighbor) in node.neighbors() {
                assert_eq!(
                    graph.node(neighbor).link(direction.opposite()),
                    Some(index),
                    "{index:?} -> {neighbor:?} via {direction}"
                );
            }
        }
    }

    #[rstest]
    fn axiom_is_a_lone_start_node() {
        let graph = MissionGraph::new();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.node(graph.root()).kind(), NodeKind::Start);
    }

    #[rstest]
    fn start_mission_is_entrance_task_goal() {
        let graph = MissionGraph::start_mission();
        let kinds: Vec<_> = graph
            .main_path()
            .into_iter()
            .map(|node| graph.node(node).kind())
            .collect();

        assert_eq!(kinds, vec![NodeKind::Entrance, NodeKind::Task, NodeKind::Goal]);
        assert!(!graph.node(NodeIndex(1)).is_terminal());
        assert_links_are_paired(&graph);
    }

    #[rstest]
    #[case(1)]
    #[case(4)]
    #[case(9)]
    fn add_task_grows_straight_chain(#[case] tasks: usize) {
        let graph = chain(tasks);

        assert_eq!(graph.len(), tasks + 2);
        assert_eq!(graph.count(NodeKind::Task), tasks);
        assert_eq!(graph.main_path().len(), tasks + 2);
        assert_eq!(graph.main_path().last(), Some(&graph.goal()));
        assert_links_are_paired(&graph);
    }

    #[rstest]
    fn three_task_rule_forks_vertically() {
        let mut graph = chain(3);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let tasks = [NodeIndex(1), NodeIndex(3), NodeIndex(4)];
        graph.apply_rule(&tasks, &mut rng);

        let t0 = graph.node(tasks[0]);
        assert_eq!(t0.link(Direction::Up), Some(tasks[1]));
        assert_eq!(t0.link(Direction::Down), Some(tasks[2]));
        assert_eq!(t0.link(Direction::Right), None);
        assert_eq!(graph.node(tasks[2]).link(Direction::Right), Some(graph.goal()));
        assert!(tasks.iter().all(|task| graph.node(*task).is_terminal()));
        assert_links_are_paired(&graph);
    }

    #[rstest]
    fn five_task_rule_leaves_last_task_open() {
        let mut graph = chain(5);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let tasks: Vec<_> = graph.main_path()[1..6].to_vec();
        graph.apply_rule(&tasks, &mut rng);

        assert_eq!(graph.node(tasks[1]).link(Direction::Right), Some(tasks[2]));
        assert_eq!(graph.node(tasks[3]).link(Direction::Right), Some(tasks[4]));
        assert!(!graph.node(tasks[4]).is_terminal());
        assert_eq!(graph.main_path().last(), Some(&graph.goal()));
        assert_links_are_paired(&graph);
    }

    #[rstest]
    fn six_task_rule_far_tasks_are_linked_vertically() {
        let far_graph = (0..64)
            .map(|seed| {
                let mut graph = chain(6);
                let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
                let tasks: Vec<_> = graph.main_path()[1..7].to_vec();
                graph.apply_rule(&tasks, &mut rng);
                (graph, tasks)
            })
            .find(|(graph, _)| graph.count(NodeKind::FarTask) == 2);

        let (graph, tasks) = far_graph.expect("alternate outcome within 64 seeds");
        assert_eq!(graph.node(tasks[2]).link(Direction::Down), Some(tasks[5]));
        assert_eq!(graph.node(tasks[5]).link(Direction::Up), Some(tasks[2]));
        assert_eq!(graph.node(tasks[5]).link(Direction::Right), Some(graph.goal()));
        assert_links_are_paired(&graph);
    }

    #[rstest]
    fn single_task_is_never_reorganized() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(12);
        let graph = MissionGraph::synthesize(1, 50, 1.0, &mut rng);

        assert_eq!(graph, MissionGraph::start_mission());
    }

    #[rstest]
    fn zero_probability_keeps_chain() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(12);
        let graph = MissionGraph::synthesize(8, 50, 0.0, &mut rng);

        assert_eq!(graph, chain(8));
    }

    #[rstest]
    #[case(3)]
    #[case(21)]
    #[case(77)]
    fn reorganized_graph_keeps_goal_on_main_path(#[case] seed: u64) {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let graph = MissionGraph::synthesize(12, 40, 1.0, &mut rng);

        assert_eq!(graph.len(), 14);
        assert_eq!(graph.reachable_from_root().len(), graph.len());
        assert_eq!(graph.main_path().last(), Some(&graph.goal()));
        assert!(
            graph
                .nodes()
                .any(|(_, node)| node.is_terminal() && matches!(node.kind(), NodeKind::Task | NodeKind::FarTask))
        );
        assert_links_are_paired(&graph);
    }
}
