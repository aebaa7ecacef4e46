//! Justification dependency graph analysis
//!
//! Nodes live in an arena (`Vec`) and dependencies are resolved to indices,
//! so both traversals run over plain data. Dependencies naming an id that is
//! not declared are treated as leaves. Both traversals are iterative:
//! - cycle detection: white/gray/black DFS, a gray target is a back-edge
//! - depth: memoized longest chain; a dependency still on the active path
//!   contributes 0, which keeps depth finite on cyclic graphs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JustificationNode {
    pub id: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl JustificationNode {
    pub fn new(id: &str, dependencies: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JustificationGraph {
    pub nodes: Vec<JustificationNode>,
    pub has_cycle: bool,
    /// Longest dependency chain; only a lower bound when `has_cycle` is set
    pub depth: usize,
}

/// Dependency edge target inside the arena
#[derive(Debug, Clone, Copy)]
enum Target {
    Node(usize),
    /// Undeclared id
    Leaf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    White,
    Gray,
    Black,
}

struct Arena {
    /// Adjacency per declared node, in input order
    edges: Vec<Vec<Target>>,
    /// Arena slot that represents each input node (duplicates share a slot)
    roots: Vec<usize>,
}

impl Arena {
    fn build(nodes: &[JustificationNode]) -> Self {
        // Last declaration of a duplicated id wins.
        let mut index: HashMap<&str, usize> = HashMap::new();
        for (i, node) in nodes.iter().enumerate() {
            index.insert(node.id.as_str(), i);
        }

        let edges = nodes
            .iter()
            .map(|node| {
                node.dependencies
                    .iter()
                    .map(|dep| match index.get(dep.as_str()) {
                        Some(&i) => Target::Node(i),
                        None => Target::Leaf,
                    })
                    .collect()
            })
            .collect();

        let roots = nodes.iter().map(|node| index[node.id.as_str()]).collect();

        Self { edges, roots }
    }

    fn has_cycle(&self) -> bool {
        let mut marks = vec![Mark::White; self.edges.len()];

        for &root in &self.roots {
            if marks[root] != Mark::White {
                continue;
            }

            // (node, next edge to inspect)
            let mut stack = vec![(root, 0usize)];
            marks[root] = Mark::Gray;

            while let Some(frame) = stack.last_mut() {
                let (node, cursor) = *frame;
                match self.edges[node].get(cursor) {
                    Some(&target) => {
                        frame.1 += 1;
                        if let Target::Node(next) = target {
                            match marks[next] {
                                Mark::Gray => return true,
                                Mark::White => {
                                    marks[next] = Mark::Gray;
                                    stack.push((next, 0));
                                }
                                Mark::Black => {}
                            }
                        }
                    }
                    None => {
                        marks[node] = Mark::Black;
                        stack.pop();
                    }
                }
            }
        }

        false
    }

    fn max_depth(&self) -> usize {
        let mut memo: Vec<Option<usize>> = vec![None; self.edges.len()];
        let mut on_path = vec![false; self.edges.len()];
        let mut max_depth = 0;

        for &root in &self.roots {
            if memo[root].is_none() {
                // (node, next edge to inspect, deepest dependency so far)
                let mut stack = vec![(root, 0usize, 0usize)];
                on_path[root] = true;

                while let Some(frame) = stack.last_mut() {
                    let (node, cursor, deepest) = *frame;

                    match self.edges[node].get(cursor) {
                        Some(&target) => {
                            frame.1 += 1;
                            let contribution = match target {
                                Target::Leaf => Some(1),
                                Target::Node(next) => match memo[next] {
                                    Some(depth) => Some(depth),
                                    None if on_path[next] => Some(0),
                                    None => {
                                        on_path[next] = true;
                                        stack.push((next, 0, 0));
                                        None
                                    }
                                },
                            };
                            if let Some(depth) = contribution {
                                if let Some(frame) = stack.last_mut() {
                                    frame.2 = frame.2.max(depth);
                                }
                            }
                        }
                        None => {
                            let depth = deepest + 1;
                            memo[node] = Some(depth);
                            on_path[node] = false;
                            stack.pop();
                            if let Some(parent) = stack.last_mut() {
                                parent.2 = parent.2.max(depth);
                            }
                        }
                    }
                }
            }

            max_depth = max_depth.max(memo[root].unwrap_or(0));
        }

        max_depth
    }
}

/// Build a justification graph value from a node list
pub fn analyze_justifications(nodes: Vec<JustificationNode>) -> JustificationGraph {
    let arena = Arena::build(&nodes);
    let has_cycle = arena.has_cycle();
    let depth = arena.max_depth();

    JustificationGraph {
        nodes,
        has_cycle,
        depth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, dependencies: &[&str]) -> JustificationNode {
        JustificationNode::new(id, dependencies)
    }

    fn graph(nodes: Vec<JustificationNode>) -> JustificationGraph {
        analyze_justifications(nodes)
    }

    #[test]
    fn test_linear_chain() {
        let g = graph(vec![node("A", &[]), node("B", &["A"]), node("C", &["B"])]);
        assert!(!g.has_cycle);
        assert_eq!(g.depth, 3);
        assert_eq!(g.nodes.len(), 3);
    }

    #[test]
    fn test_two_node_cycle() {
        let g = graph(vec![node("A", &["B"]), node("B", &["A"])]);
        assert!(g.has_cycle);
        // cycle-safe: B sees A in progress, so B = 1 and A = 2
        assert_eq!(g.depth, 2);
    }

    #[test]
    fn test_self_loop() {
        let g = graph(vec![node("A", &["A"])]);
        assert!(g.has_cycle);
        assert_eq!(g.depth, 1);
    }

    #[test]
    fn test_empty_graph() {
        let g = graph(vec![]);
        assert!(!g.has_cycle);
        assert_eq!(g.depth, 0);
    }

    #[test]
    fn test_forward_references() {
        let g = graph(vec![node("C", &["B"]), node("B", &["A"]), node("A", &[])]);
        assert!(!g.has_cycle);
        assert_eq!(g.depth, 3);
    }

    #[test]
    fn test_unknown_dependency_is_leaf() {
        let g = graph(vec![node("A", &["axiom-1"]), node("B", &["A", "axiom-2"])]);
        assert!(!g.has_cycle);
        // axiom (1) <- A (2) <- B (3)
        assert_eq!(g.depth, 3);
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let g = graph(vec![
            node("A", &[]),
            node("B", &["A"]),
            node("C", &["A"]),
            node("D", &["B", "C"]),
        ]);
        assert!(!g.has_cycle);
        assert_eq!(g.depth, 3);
    }

    #[test]
    fn test_cycle_deep_in_graph() {
        let g = graph(vec![
            node("root", &["a"]),
            node("a", &["b"]),
            node("b", &["c"]),
            node("c", &["a"]),
            node("island", &[]),
        ]);
        assert!(g.has_cycle);
        assert!(g.depth >= 1);
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        let ids: Vec<String> = (0..50_000).map(|i| format!("n{}", i)).collect();
        // declared newest-first so the first traversal walks the whole chain
        let nodes: Vec<JustificationNode> = ids
            .iter()
            .enumerate()
            .rev()
            .map(|(i, id)| JustificationNode {
                id: id.clone(),
                dependencies: if i == 0 { Vec::new() } else { vec![ids[i - 1].clone()] },
            })
            .collect();

        let g = analyze_justifications(nodes);
        assert!(!g.has_cycle);
        assert_eq!(g.depth, 50_000);
    }
}
