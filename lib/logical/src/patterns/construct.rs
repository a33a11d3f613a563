use rdf_weave_model::{BlankNode, Solution};
use rustc_hash::FxHashMap;

/// The state of instantiating a CONSTRUCT template for one solution.
///
/// Template blank nodes are mapped to fresh blank nodes. The mapping is shared by all template
/// patterns of the same solution and discarded afterward.
pub struct ConstructContext<'solution> {
    solution: &'solution Solution,
    blank_nodes: FxHashMap<BlankNode, BlankNode>,
}

impl<'solution> ConstructContext<'solution> {
    pub fn new(solution: &'solution Solution) -> Self {
        Self {
            solution,
            blank_nodes: FxHashMap::default(),
        }
    }

    pub fn solution(&self) -> &'solution Solution {
        self.solution
    }

    /// Returns the fresh blank node that replaces `template` in this solution.
    pub fn blank_node_for(&mut self, template: &BlankNode) -> BlankNode {
        self.blank_nodes
            .entry(template.clone())
            .or_default()
            .clone()
    }
}
