use slotmap::new_key_type;

new_key_type! {
    /// Stable, generational handle to a node in the widget tree.
    ///
    /// A handle outlives the node it names: once the node is deleted the
    /// handle simply stops resolving, it never aliases a newer node.
    pub struct NodeId;
}
