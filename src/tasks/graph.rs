//! Task graph with dependency and ordering edges.

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use super::{AssetKind, Task};
use crate::core::{PipelineError, closest_match};

/// How one task relates to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Planning the source task also plans the target, which runs first
    Requires,
    /// The target runs first, but only if something else planned it
    After,
}

/// Color states for cycle detection using DFS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Tasks grouped into levels that run one after another.
///
/// Every task in a level only depends on tasks in earlier levels, so the
/// members of one level can run concurrently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    levels: Vec<Vec<Task>>,
}

impl Plan {
    pub fn levels(&self) -> &[Vec<Task>] {
        &self.levels
    }

    /// Every planned task, level by level.
    pub fn tasks(&self) -> impl Iterator<Item = Task> + '_ {
        self.levels.iter().flatten().copied()
    }

    /// Number of planned tasks.
    pub fn len(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Index of the level `task` runs in.
    pub fn level_of(&self, task: Task) -> Option<usize> {
        self.levels.iter().position(|level| level.contains(&task))
    }
}

/// Directed graph of tasks.
///
/// An edge `from → to` means `from` runs after `to`; its [`EdgeKind`]
/// decides whether `to` is pulled into a plan automatically.
#[derive(Debug, Clone, Default)]
pub struct TaskGraph {
    graph: DiGraph<Task, EdgeKind>,
    node_map: HashMap<Task, NodeIndex>,
}

impl TaskGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry every build uses:
    ///
    /// - `clean` requires every `clean-<kind>`
    /// - `default` requires `clean` and every asset task
    /// - each asset task runs after `clean` and after its own `clean-<kind>`
    pub fn standard() -> Self {
        let mut graph = Self::new();

        for kind in AssetKind::ALL {
            graph.add_task(Task::Build(kind));
        }
        for kind in AssetKind::ALL {
            graph.add_dependency(Task::CleanAll, Task::Clean(kind));
        }
        for kind in AssetKind::ALL {
            graph.add_dependency(Task::Default, Task::Build(kind));
            graph.add_ordering(Task::Build(kind), Task::Clean(kind));
            graph.add_ordering(Task::Build(kind), Task::CleanAll);
        }
        graph.add_dependency(Task::Default, Task::CleanAll);

        graph
    }

    fn ensure_node(&mut self, task: Task) -> NodeIndex {
        if let Some(&index) = self.node_map.get(&task) {
            index
        } else {
            let index = self.graph.add_node(task);
            self.node_map.insert(task, index);
            index
        }
    }

    /// Registers a task without edges.
    pub fn add_task(&mut self, task: Task) {
        self.ensure_node(task);
    }

    /// `from` requires `to`.
    pub fn add_dependency(&mut self, from: Task, to: Task) {
        self.add_edge(from, to, EdgeKind::Requires);
    }

    /// `later` runs after `earlier` whenever both are planned.
    pub fn add_ordering(&mut self, later: Task, earlier: Task) {
        self.add_edge(later, earlier, EdgeKind::After);
    }

    fn add_edge(&mut self, from: Task, to: Task, kind: EdgeKind) {
        let from_idx = self.ensure_node(from);
        let to_idx = self.ensure_node(to);

        match self.graph.find_edge(from_idx, to_idx) {
            // A requirement already implies the ordering.
            Some(edge) if kind == EdgeKind::Requires => self.graph[edge] = EdgeKind::Requires,
            Some(_) => {}
            None => {
                self.graph.add_edge(from_idx, to_idx, kind);
            }
        }
    }

    /// Registered tasks in registration order.
    pub fn tasks(&self) -> Vec<Task> {
        self.graph.node_indices().map(|idx| self.graph[idx]).collect()
    }

    pub fn contains(&self, task: Task) -> bool {
        self.node_map.contains_key(&task)
    }

    /// Tasks that `task` requires directly.
    pub fn dependencies(&self, task: Task) -> Vec<Task> {
        let mut deps = self.edges_of(task, EdgeKind::Requires);
        deps.sort();
        deps
    }

    /// Tasks that `task` runs after when they are planned, without requiring them.
    pub fn orderings(&self, task: Task) -> Vec<Task> {
        let mut deps = self.edges_of(task, EdgeKind::After);
        deps.sort();
        deps
    }

    fn edges_of(&self, task: Task, kind: EdgeKind) -> Vec<Task> {
        let Some(&idx) = self.node_map.get(&task) else {
            return Vec::new();
        };
        self.graph
            .edges(idx)
            .filter(|edge| *edge.weight() == kind)
            .map(|edge| self.graph[edge.target()])
            .collect()
    }

    /// Looks a task up by name.
    ///
    /// # Errors
    ///
    /// [`PipelineError::UnknownTask`] with the closest registered name.
    pub fn resolve(&self, name: &str) -> Result<Task, PipelineError> {
        match Task::from_name(name).filter(|task| self.contains(*task)) {
            Some(task) => Ok(task),
            None => Err(self.unknown_task(name)),
        }
    }

    fn unknown_task(&self, name: &str) -> PipelineError {
        let names: Vec<String> = self.tasks().iter().map(|task| task.name()).collect();
        let suggestion = closest_match(name, names.iter().map(String::as_str)).map(str::to_string);
        PipelineError::UnknownTask {
            name: name.to_string(),
            suggestion,
        }
    }

    /// Detect cycles in the task graph using DFS with colors.
    ///
    /// # Errors
    ///
    /// [`PipelineError::CircularTask`] naming the tasks along the cycle.
    pub fn detect_cycles(&self) -> Result<(), PipelineError> {
        let mut colors: HashMap<NodeIndex, Color> =
            self.graph.node_indices().map(|node| (node, Color::White)).collect();
        let mut path: Vec<NodeIndex> = Vec::new();

        for node in self.graph.node_indices() {
            if !matches!(colors.get(&node), Some(Color::White)) {
                continue;
            }

            if let Some(cycle) = self.dfs_visit(node, &mut colors, &mut path) {
                let cycle = cycle.iter().map(|idx| self.graph[*idx].name()).collect::<Vec<_>>();
                return Err(PipelineError::CircularTask {
                    cycle: cycle.join(" → "),
                });
            }
        }

        Ok(())
    }

    fn dfs_visit(
        &self,
        node: NodeIndex,
        colors: &mut HashMap<NodeIndex, Color>,
        path: &mut Vec<NodeIndex>,
    ) -> Option<Vec<NodeIndex>> {
        colors.insert(node, Color::Gray);
        path.push(node);

        for neighbor in self.graph.neighbors(node) {
            match colors.get(&neighbor) {
                Some(Color::Gray) => {
                    let start = path.iter().position(|idx| *idx == neighbor).unwrap_or(0);
                    let mut cycle = path[start..].to_vec();
                    cycle.push(neighbor);
                    return Some(cycle);
                }
                Some(Color::White) => {
                    if let Some(cycle) = self.dfs_visit(neighbor, colors, path) {
                        return Some(cycle);
                    }
                }
                _ => {}
            }
        }

        path.pop();
        colors.insert(node, Color::Black);
        None
    }

    /// Every task with the tasks it waits on listed first.
    pub fn topological_order(&self) -> Result<Vec<Task>, PipelineError> {
        self.detect_cycles()?;

        let indices = toposort(&self.graph, None).map_err(|cycle| PipelineError::CircularTask {
            cycle: self.graph[cycle.node_id()].name(),
        })?;
        Ok(indices.into_iter().rev().map(|idx| self.graph[idx]).collect())
    }

    /// Plans `requested` plus everything they require.
    ///
    /// A task lands one level after the latest planned task it waits on,
    /// whether through a requirement or an ordering edge. Tasks within a
    /// level are sorted.
    ///
    /// # Errors
    ///
    /// [`PipelineError::UnknownTask`] for unregistered tasks and
    /// [`PipelineError::CircularTask`] if the graph has a cycle.
    pub fn plan(&self, requested: &[Task]) -> Result<Plan, PipelineError> {
        let mut planned: HashSet<Task> = HashSet::new();
        let mut queue: VecDeque<Task> = VecDeque::new();

        for task in requested {
            if !self.contains(*task) {
                return Err(self.unknown_task(&task.name()));
            }
            if planned.insert(*task) {
                queue.push_back(*task);
            }
        }

        while let Some(task) = queue.pop_front() {
            for dep in self.edges_of(task, EdgeKind::Requires) {
                if planned.insert(dep) {
                    queue.push_back(dep);
                }
            }
        }

        let mut level_of: HashMap<Task, usize> = HashMap::new();
        for task in self.topological_order()? {
            if !planned.contains(&task) {
                continue;
            }

            let level = self
                .edges_of(task, EdgeKind::Requires)
                .into_iter()
                .chain(self.edges_of(task, EdgeKind::After))
                .filter_map(|dep| level_of.get(&dep))
                .map(|level| level + 1)
                .max()
                .unwrap_or(0);
            level_of.insert(task, level);
        }

        let mut grouped: BTreeMap<usize, Vec<Task>> = BTreeMap::new();
        for (task, level) in level_of {
            grouped.entry(level).or_default().push(task);
        }

        let levels = grouped
            .into_values()
            .map(|mut level| {
                level.sort();
                level
            })
            .collect();

        Ok(Plan {
            levels,
        })
    }

    /// [`plan`](Self::plan) for task names as typed by a user.
    pub fn plan_names<S: AsRef<str>>(&self, names: &[S]) -> Result<Plan, PipelineError> {
        let tasks = names
            .iter()
            .map(|name| self.resolve(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        self.plan(&tasks)
    }
}
