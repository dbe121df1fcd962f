//! Dependency graph for tasks
//!
//! Builds a directed graph over one request's tasks and answers cycle
//! questions about it. Uses petgraph for graph operations.
//!
//! Edges point from a dependency to its dependent: `b -> a` means
//! "b must be completed before a". Dependencies on IDs that are not in the
//! request are ignored.

use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::id::TaskId;
use super::task::Task;

/// How thoroughly to look for dependency cycles
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum CycleCheck {
    /// Only two tasks naming each other (or a task naming itself)
    #[default]
    Mutual,
    /// Any directed cycle, whatever its length
    Full,
}

impl CycleCheck {
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleCheck::Mutual => "mutual",
            CycleCheck::Full => "full",
        }
    }
}

/// A dependency graph for tasks
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// The underlying directed graph
    graph: DiGraph<TaskId, ()>,

    /// Map from TaskId to node index
    node_map: HashMap<TaskId, NodeIndex>,
}

impl DependencyGraph {
    /// Creates an empty dependency graph
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Builds a graph from a collection of tasks
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut graph = Self::new();

        // First pass: add all nodes
        let tasks: Vec<_> = tasks.into_iter().collect();
        for task in &tasks {
            graph.add_task(task.id.clone());
        }

        // Second pass: add all edges, in task then dependency order
        for task in &tasks {
            for dep_id in &task.dependencies {
                graph.add_dependency(&task.id, dep_id);
            }
        }

        graph
    }

    /// Adds a task to the graph
    pub fn add_task(&mut self, task_id: TaskId) {
        if !self.node_map.contains_key(&task_id) {
            let idx = self.graph.add_node(task_id.clone());
            self.node_map.insert(task_id, idx);
        }
    }

    /// Adds a dependency edge: `task` depends on `depends_on`
    ///
    /// Returns false if either task is unknown. Self-dependencies are kept
    /// as self-loops so cycle checks can see them.
    pub fn add_dependency(&mut self, task: &TaskId, depends_on: &TaskId) -> bool {
        let (Some(&task_idx), Some(&dep_idx)) =
            (self.node_map.get(task), self.node_map.get(depends_on))
        else {
            return false;
        };

        self.graph.update_edge(dep_idx, task_idx, ());
        true
    }

    /// Returns the first pair of tasks that depend on each other
    ///
    /// The pair is `(task, dependency)`. A task depending on itself is
    /// reported as a pair with itself. Longer cycles are not detected.
    pub fn mutual_dependency(&self) -> Option<(TaskId, TaskId)> {
        self.graph.edge_references().find_map(|edge| {
            // edge: dependency -> task; the reverse edge means the
            // dependency also waits on the task
            self.graph
                .find_edge(edge.target(), edge.source())
                .map(|_| {
                    (
                        self.graph[edge.target()].clone(),
                        self.graph[edge.source()].clone(),
                    )
                })
        })
    }

    /// Returns true if two tasks depend directly on each other
    pub fn has_mutual_dependency(&self) -> bool {
        self.mutual_dependency().is_some()
    }

    /// Returns true if the graph contains any directed cycle
    pub fn has_cycle(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Returns the tasks forming a cycle under the given check, if any
    pub fn find_cycle(&self, check: CycleCheck) -> Option<Vec<TaskId>> {
        match check {
            CycleCheck::Mutual => self.mutual_dependency().map(|(a, b)| {
                if a == b {
                    vec![a]
                } else {
                    vec![a, b]
                }
            }),
            CycleCheck::Full => {
                if !self.has_cycle() {
                    return None;
                }
                tarjan_scc(&self.graph)
                    .into_iter()
                    .find(|component| {
                        component.len() > 1
                            || self.graph.find_edge(component[0], component[0]).is_some()
                    })
                    .map(|component| {
                        let mut ids: Vec<TaskId> = component
                            .into_iter()
                            .map(|idx| self.graph[idx].clone())
                            .collect();
                        ids.sort();
                        ids
                    })
            }
        }
    }
}

/// Returns true if any two tasks depend directly on each other
///
/// This is a pairwise check: `1 -> 2 -> 3 -> 1` passes.
pub fn detect_cycle(tasks: &[Task]) -> bool {
    DependencyGraph::from_tasks(tasks).has_mutual_dependency()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, deps: &[i64]) -> Task {
        deps.iter()
            .fold(Task::new(id, format!("Task {}", id)), |t, d| t.with_dependency(*d))
    }

    #[test]
    fn empty_graph() {
        let graph = DependencyGraph::new();
        assert!(!graph.has_cycle());
        assert_eq!(graph.find_cycle(CycleCheck::Full), None);
    }

    #[test]
    fn unknown_dependency_ignored() {
        let mut graph = DependencyGraph::new();
        graph.add_task(TaskId::Number(1));
        assert!(!graph.add_dependency(&TaskId::Number(1), &TaskId::Number(99)));

        let tasks = [task(1, &[99])];
        assert!(!detect_cycle(&tasks));
        assert!(!DependencyGraph::from_tasks(&tasks).has_cycle());
    }

    #[test]
    fn duplicate_dependency_is_not_mutual() {
        let tasks = [task(1, &[]), task(2, &[1, 1])];
        assert!(!detect_cycle(&tasks));
    }

    #[test]
    fn mutual_dependency_detected() {
        let tasks = [task(1, &[2]), task(2, &[1])];
        assert!(detect_cycle(&tasks));

        let graph = DependencyGraph::from_tasks(&tasks);
        assert_eq!(
            graph.mutual_dependency(),
            Some((TaskId::Number(1), TaskId::Number(2)))
        );
    }

    #[test]
    fn one_way_dependency_is_not_a_cycle() {
        let tasks = [task(1, &[]), task(2, &[1])];
        assert!(!detect_cycle(&tasks));
    }

    #[test]
    fn self_dependency_counts_as_mutual() {
        let tasks = [task(1, &[1])];
        assert!(detect_cycle(&tasks));
        assert_eq!(
            DependencyGraph::from_tasks(&tasks).find_cycle(CycleCheck::Mutual),
            Some(vec![TaskId::Number(1)])
        );
    }

    #[test]
    fn three_cycle_passes_mutual_check() {
        let tasks = [task(1, &[3]), task(2, &[1]), task(3, &[2])];
        let graph = DependencyGraph::from_tasks(&tasks);

        assert!(!detect_cycle(&tasks));
        assert_eq!(graph.find_cycle(CycleCheck::Mutual), None);
        assert!(graph.has_cycle());
        assert_eq!(
            graph.find_cycle(CycleCheck::Full),
            Some(vec![TaskId::Number(1), TaskId::Number(2), TaskId::Number(3)])
        );
    }

    #[test]
    fn full_check_on_acyclic_graph() {
        let tasks = [task(1, &[]), task(2, &[1]), task(3, &[1, 2])];
        let graph = DependencyGraph::from_tasks(&tasks);
        assert_eq!(graph.find_cycle(CycleCheck::Full), None);
    }

    #[test]
    fn text_ids_work() {
        let a = Task::new("a", "A").with_dependency("b");
        let b = Task::new("b", "B").with_dependency("a");
        assert!(detect_cycle(&[a, b]));
    }

    #[test]
    fn performance_500_tasks() {
        use std::time::Instant;

        // Linear chain: each task depends on the previous one
        let tasks: Vec<Task> = (1..=500)
            .map(|i| if i == 1 { task(i, &[]) } else { task(i, &[i - 1]) })
            .collect();

        let start = Instant::now();
        let graph = DependencyGraph::from_tasks(&tasks);
        assert!(!graph.has_mutual_dependency());
        assert!(!graph.has_cycle());
        let duration = start.elapsed();

        assert!(duration.as_millis() < 100, "Cycle checks took {:?}", duration);
    }
}
