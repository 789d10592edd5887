use log::warn;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::network::Network;

/// Advisory findings of the read-only topology pass. Nothing here ever halts
/// a build; operators decide what to do with it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopologyReport {
    /// External ids of buses with no incident branch. Reported, not removed.
    pub isolated_buses: Vec<usize>,

    /// External ids of buses with exactly one incident branch and no load.
    /// Candidates for pruning by a human, never pruned automatically.
    pub dead_end_buses: Vec<usize>,

    /// Cycle basis of the closed-branch subgraph, each cycle as the ordered
    /// external bus ids along it. A radial network has none.
    pub cycles: Vec<Vec<usize>>,

    /// Connected components as external bus ids, largest first.
    pub components: Vec<Vec<usize>>,
}

impl TopologyReport {
    pub fn is_clean(&self) -> bool {
        self.isolated_buses.is_empty()
            && self.dead_end_buses.is_empty()
            && self.cycles.is_empty()
            && self.components.len() <= 1
    }
}

impl std::fmt::Display for TopologyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.isolated_buses.is_empty() {
            writeln!(
                f,
                "{} isolated buses: {:?}",
                self.isolated_buses.len(),
                self.isolated_buses
            )?;
        }
        if !self.dead_end_buses.is_empty() {
            writeln!(
                f,
                "{} dead-end buses without load: {:?}",
                self.dead_end_buses.len(),
                self.dead_end_buses
            )?;
        }
        for cycle in &self.cycles {
            writeln!(f, "cycle: {:?}", cycle)?;
        }
        if self.components.len() > 1 {
            writeln!(
                f,
                "{} connected components, sizes {:?}",
                self.components.len(),
                self.components.iter().map(Vec::len).collect::<Vec<_>>()
            )?;
        }
        Ok(())
    }
}

/// Runs every topology diagnostic over a finished network.
pub fn analyze(network: &Network) -> TopologyReport {
    let report = TopologyReport {
        isolated_buses: isolated_buses(network),
        dead_end_buses: dead_end_buses(network),
        cycles: cycle_basis(network),
        components: connected_components(network),
    };

    if !report.isolated_buses.is_empty() {
        warn!(
            "{} isolated buses: {:?}",
            report.isolated_buses.len(),
            report.isolated_buses
        );
    }
    if !report.cycles.is_empty() {
        warn!(
            "{} cycles in the closed topology, expected radial",
            report.cycles.len()
        );
    }
    if report.components.len() > 1 {
        warn!(
            "network splits into {} components, sizes {:?}",
            report.components.len(),
            report.components.iter().map(Vec::len).collect::<Vec<_>>()
        );
    }

    report
}

fn isolated_buses(network: &Network) -> Vec<usize> {
    network
        .buses()
        .filter(|b| network.degree(b.i) == 0)
        .map(|b| b.bus_i)
        .collect()
}

fn dead_end_buses(network: &Network) -> Vec<usize> {
    network
        .buses()
        .filter(|b| network.degree(b.i) == 1 && b.load.is_none())
        .map(|b| b.bus_i)
        .collect()
}

/// Petgraph view of the network. `closed_only` restricts the edges to closed
/// branches, the subgraph the cycle check runs on.
fn as_graph(network: &Network, closed_only: bool) -> UnGraph<usize, ()> {
    let mut graph = UnGraph::<usize, ()>::default();
    let nodes: Vec<NodeIndex> = network
        .buses()
        .map(|b| graph.add_node(b.bus_i))
        .collect();
    for br in network.branches() {
        if closed_only && !br.closed {
            continue;
        }
        graph.add_edge(nodes[br.f_bus], nodes[br.t_bus], ());
    }
    graph
}

/// Connected components over all branches (open included), largest first.
/// Within a component the buses keep internal index order; between equal-size
/// components the one with the smallest first bus comes first, keeping the
/// output deterministic.
fn connected_components(network: &Network) -> Vec<Vec<usize>> {
    if network.bus.is_empty() {
        return Vec::new();
    }
    let graph = as_graph(network, false);
    let mut component = vec![usize::MAX; network.bus.len()];
    let mut count = 0;
    for start in graph.node_indices() {
        if component[start.index()] != usize::MAX {
            continue;
        }
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            if component[node.index()] != usize::MAX {
                continue;
            }
            component[node.index()] = count;
            for neighbor in graph.neighbors(node) {
                if component[neighbor.index()] == usize::MAX {
                    stack.push(neighbor);
                }
            }
        }
        count += 1;
    }

    let mut members: Vec<Vec<usize>> = vec![Vec::new(); count];
    for (i, &c) in component.iter().enumerate() {
        members[c].push(network.bus[i].bus_i);
    }
    members.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    members
}

/// Cycle basis of the closed-branch subgraph.
///
/// Breadth-first spanning forest; every non-tree edge closes exactly one
/// fundamental cycle through the tree paths of its endpoints. Parallel closed
/// branches on the same bus pair show up as a 2-cycle. Disconnected input is
/// handled per component, so this pass cannot fail.
fn cycle_basis(network: &Network) -> Vec<Vec<usize>> {
    let graph = as_graph(network, true);
    let n = graph.node_count();

    let mut parent: Vec<Option<NodeIndex>> = vec![None; n];
    let mut depth: Vec<usize> = vec![0; n];
    let mut visited = vec![false; n];
    let mut tree_edges = vec![false; graph.edge_count()];
    let mut cycles = Vec::new();

    for root in graph.node_indices() {
        if visited[root.index()] {
            continue;
        }
        visited[root.index()] = true;
        let mut queue = std::collections::VecDeque::from([root]);
        while let Some(node) = queue.pop_front() {
            for edge in graph.edges(node) {
                // The reference keeps the stored orientation; pick the far end.
                let next = if edge.source() == node {
                    edge.target()
                } else {
                    edge.source()
                };
                if !visited[next.index()] {
                    visited[next.index()] = true;
                    parent[next.index()] = Some(node);
                    depth[next.index()] = depth[node.index()] + 1;
                    tree_edges[edge.id().index()] = true;
                    queue.push_back(next);
                }
            }
        }
    }

    for edge in graph.edge_references() {
        if tree_edges[edge.id().index()] {
            continue;
        }
        let (u, v) = (edge.source(), edge.target());
        if u == v {
            continue; // self-loops never enter the network
        }

        // Walk both endpoints up to their lowest common ancestor.
        let mut up = Vec::new();
        let mut down = Vec::new();
        let (mut a, mut b) = (u, v);
        while depth[a.index()] > depth[b.index()] {
            up.push(a);
            a = parent[a.index()].unwrap();
        }
        while depth[b.index()] > depth[a.index()] {
            down.push(b);
            b = parent[b.index()].unwrap();
        }
        while a != b {
            up.push(a);
            down.push(b);
            a = parent[a.index()].unwrap();
            b = parent[b.index()].unwrap();
        }
        up.push(a);
        down.reverse();
        up.extend(down);

        cycles.push(up.into_iter().map(|n| graph[n]).collect());
    }

    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_network;
    use crate::records::NetworkRecords;
    use crate::tests::fixtures::*;

    fn build(records: &NetworkRecords) -> Network {
        build_network(records).unwrap().0
    }

    fn radial_records(segments: &[(usize, usize, usize)]) -> NetworkRecords {
        let mut buses = Vec::new();
        for &(_, f, t) in segments {
            buses.push(bus_record(f, 1, 1, true));
            buses.push(bus_record(t, 1, 1, true));
        }
        NetworkRecords {
            buses,
            cables: vec![cable_record("S-95-Alu-PRC-12", 0.1, 0.05, 0.0, 100.0)],
            segments: segments
                .iter()
                .map(|&(line, f, t)| segment_record(line, f, t, 1.0))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn radial_feeder_is_clean_except_dead_ends() {
        let net = build(&radial_records(&[(1, 10, 20), (2, 20, 30)]));
        let report = analyze(&net);

        assert!(report.isolated_buses.is_empty());
        assert!(report.cycles.is_empty());
        assert_eq!(report.components.len(), 1);
        // Leaves without load are pruning candidates.
        assert_eq!(report.dead_end_buses, vec![10, 30]);
    }

    #[test]
    fn loaded_leaf_is_not_a_dead_end() {
        let mut records = radial_records(&[(1, 10, 20)]);
        records.loads.push(load_record(10, "R", "inhab", 5.0));
        let net = build(&records);
        let report = analyze(&net);
        assert_eq!(report.dead_end_buses, vec![20]);
    }

    #[test]
    fn isolated_bus_is_reported_not_removed() {
        let mut records = radial_records(&[(1, 10, 20)]);
        records.buses.push(bus_record(99, 1, 1, true));
        let net = build(&records);
        let report = analyze(&net);

        assert_eq!(net.bus.len(), 3);
        assert_eq!(report.isolated_buses, vec![99]);
        assert_eq!(report.components.len(), 2);
        // Largest component first.
        assert_eq!(report.components[0], vec![10, 20]);
        assert_eq!(report.components[1], vec![99]);
    }

    #[test]
    fn triangle_yields_one_cycle() {
        let net = build(&radial_records(&[(1, 10, 20), (2, 20, 30), (3, 30, 10)]));
        let report = analyze(&net);

        assert_eq!(report.cycles.len(), 1);
        let cycle = &report.cycles[0];
        assert_eq!(cycle.len(), 3);
        for bus in [10, 20, 30] {
            assert!(cycle.contains(&bus));
        }
    }

    #[test]
    fn open_branch_breaks_the_cycle() {
        let mut records = radial_records(&[(1, 10, 20), (2, 20, 30), (3, 30, 10)]);
        // Open one terminal cell of line 3.
        records.segments[2].t_panel = 9;
        let net = build(&records);
        let report = analyze(&net);

        assert!(report.cycles.is_empty());
        // The open branch still keeps the graph connected.
        assert_eq!(report.components.len(), 1);
    }

    #[test]
    fn parallel_closed_branches_are_a_two_cycle() {
        // Same bus pair under two distinct line ids.
        let net = build(&radial_records(&[(1, 10, 20), (2, 10, 20)]));
        let report = analyze(&net);

        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.cycles[0].len(), 2);
    }

    #[test]
    fn disconnected_input_degrades_to_per_component_cycles() {
        let net = build(&radial_records(&[
            (1, 10, 20),
            (2, 20, 30),
            (3, 30, 10),
            (4, 40, 50),
        ]));
        let report = analyze(&net);

        assert_eq!(report.components.len(), 2);
        assert_eq!(report.cycles.len(), 1);
    }

    #[test]
    fn empty_network_reports_nothing() {
        let report = analyze(&Network::default());
        assert!(report.is_clean());
        assert!(report.components.is_empty());
    }
}
