
use std::collections::HashMap;

use log::debug;
use petgraph::graph::{DiGraph, NodeIndex};
use thiserror::Error;

use crate::device::Device;
use crate::entity::EntityId;


/// Connection graph over a device: nodes are entities, edges run from a
/// driver to the input port it feeds.
pub type WiringGraph = DiGraph<EntityId, PortEdge>;
/// Paired with a WiringGraph. Links an entity to its node in the graph.
pub type NodeIndexMap = HashMap<EntityId, NodeIndex>;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortEdge {
    pub sink_port: &'static str,
}


#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WiringError {
    #[error("{entity} has no input port named {port:?}")]
    UnknownPort { entity: String, port: String },

    #[error("entity id {0:?} does not name anything in the device")]
    DanglingId(EntityId),
}


/// Builds the wiring graph from the connections recorded on each
/// entity. An upstream reference pointing outside the arena is an
/// error; an unconnected input simply contributes no edge.
pub fn wiring_graph(device: &Device) -> Result<(WiringGraph, NodeIndexMap), WiringError> {
    let mut graph = WiringGraph::new();
    let mut node_index_map = NodeIndexMap::new();

    for (id, _) in device.entities() {
        node_index_map.insert(id, graph.add_node(id));
    }

    for (id, entity) in device.entities() {
        for &port in entity.input_ports() {
            if let Some(Some(source)) = entity.input_connection(port) {
                let source_index = match node_index_map.get(&source) {
                    Some(index) => *index,
                    None => return Err(WiringError::DanglingId(source)),
                };
                graph.add_edge(source_index, node_index_map[&id], PortEdge { sink_port: port });
            }
        }
    }

    // Every edge must leave an entity that can actually drive a signal.
    for edge in graph.raw_edges() {
        let source = device.get(graph[edge.source()]).unwrap();
        assert!(
            ! source.output_ports().is_empty(),
            "{} drives {:?} but has no output ports", source.description(), edge.weight,
        );
    }

    debug!("wiring graph: {} entities, {} connections", graph.node_count(), graph.edge_count());
    Ok((graph, node_index_map))
}


/// Every input port left unconnected, in arena and port order. The
/// netlist layer decides which of these are real errors; a deliberately
/// floating input is legal at this layer.
pub fn unconnected_inputs(device: &Device) -> Vec<(EntityId, &'static str)> {
    let mut unconnected = Vec::new();
    for (id, entity) in device.entities() {
        for &port in entity.input_ports() {
            if let Some(None) = entity.input_connection(port) {
                unconnected.push((id, port));
            }
        }
    }
    unconnected
}
