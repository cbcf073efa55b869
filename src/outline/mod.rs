//! In-memory model of the document's table of contents.
//!
//! Collapse state, visibility and the active marker live here rather than on
//! display nodes; the sidebar is a projection of this tree (see
//! [`Outline::visible_rows`]).

pub mod accordion;
pub mod search;

pub use accordion::ToggleControl;

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct OutlineNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub depth: usize,
    pub label: String,
    /// Section id this entry links to, without the leading `#`.
    pub target: Option<String>,
    /// Whether the entry carries a link at all; only links take part in
    /// search matching.
    pub is_link: bool,
    /// Owns a direct `ul.subsection` list.
    pub has_subsection: bool,
    pub expandable: bool,
    pub collapsed: bool,
    pub visible: bool,
    pub active: bool,
    pub toggle: Option<ToggleControl>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    nodes: Vec<OutlineNode>,
    roots: Vec<NodeId>,
}

impl Outline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry under `parent` (or as a root). Ids are handed out in
    /// document order.
    pub fn push(&mut self, parent: Option<NodeId>, label: &str, target: Option<&str>) -> NodeId {
        self.insert(parent, label, target, true)
    }

    /// Append an entry that has no link of its own (a bare list item).
    pub fn push_plain(&mut self, parent: Option<NodeId>, label: &str) -> NodeId {
        self.insert(parent, label, None, false)
    }

    fn insert(
        &mut self,
        parent: Option<NodeId>,
        label: &str,
        target: Option<&str>,
        is_link: bool,
    ) -> NodeId {
        let id = self.nodes.len();
        let depth = parent
            .and_then(|p| self.nodes.get(p))
            .map(|p| p.depth + 1)
            .unwrap_or(0);
        let parent = parent.filter(|p| *p < id);
        self.nodes.push(OutlineNode {
            id,
            parent,
            children: Vec::new(),
            depth,
            label: label.to_string(),
            target: target.map(|t| t.trim_start_matches('#').to_string()),
            is_link,
            has_subsection: false,
            expandable: false,
            collapsed: false,
            visible: true,
            active: false,
            toggle: None,
        });
        match parent {
            Some(p) => self.nodes[p].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn mark_subsection(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.has_subsection = true;
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&OutlineNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &[OutlineNode] {
        &self.nodes
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parent chain of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.nodes.get(id).and_then(|n| n.parent);
        while let Some(p) = current {
            chain.push(p);
            current = self.nodes[p].parent;
        }
        chain
    }

    pub fn find_by_target(&self, target: &str) -> Option<NodeId> {
        let target = target.trim_start_matches('#');
        self.nodes
            .iter()
            .find(|n| n.target.as_deref() == Some(target))
            .map(|n| n.id)
    }

    /// Set the collapse flag, keeping the toggle control in agreement.
    /// Entries without a nested list have no collapse state.
    pub fn set_collapsed(&mut self, id: NodeId, collapsed: bool) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.children.is_empty() {
            return;
        }
        node.collapsed = collapsed;
        if let Some(toggle) = node.toggle.as_mut() {
            toggle.sync(collapsed);
        }
    }

    /// Force `id` and every ancestor out of the collapsed state.
    pub fn open_path(&mut self, id: NodeId) {
        if id >= self.nodes.len() {
            return;
        }
        let mut path = vec![id];
        path.extend(self.ancestors(id));
        for node in path {
            if self.nodes[node].collapsed {
                self.set_collapsed(node, false);
            }
        }
    }

    pub fn clear_active(&mut self) {
        for node in &mut self.nodes {
            node.active = false;
        }
    }

    pub fn set_active(&mut self, id: NodeId) {
        self.clear_active();
        if let Some(node) = self.nodes.get_mut(id) {
            node.active = true;
        }
    }

    pub fn active(&self) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.active).map(|n| n.id)
    }

    /// Entries as they would be displayed: pre-order, skipping hidden entries
    /// and everything beneath a collapsed entry.
    pub fn visible_rows(&self) -> Vec<NodeId> {
        let mut rows = Vec::new();
        for &root in &self.roots {
            self.collect_rows(root, &mut rows);
        }
        rows
    }

    fn collect_rows(&self, id: NodeId, rows: &mut Vec<NodeId>) {
        let node = &self.nodes[id];
        if !node.visible {
            return;
        }
        rows.push(id);
        if node.collapsed {
            return;
        }
        for &child in &node.children {
            self.collect_rows(child, rows);
        }
    }

    pub fn row_of(&self, id: NodeId) -> Option<usize> {
        self.visible_rows().iter().position(|&row| row == id)
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [OutlineNode] {
        &mut self.nodes
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Basics
    ///   Sets          (#sets)
    ///   Functions     (#functions)
    /// Algebra
    ///   Groups        (#groups)
    ///     Cosets      (#cosets)
    /// Appendix        (#appendix)
    pub fn sample() -> Outline {
        let mut outline = Outline::new();
        let basics = outline.push(None, "Basics", Some("#basics"));
        outline.push(Some(basics), "Sets", Some("#sets"));
        outline.push(Some(basics), "Functions", Some("#functions"));
        let algebra = outline.push(None, "Algebra", Some("#algebra"));
        let groups = outline.push(Some(algebra), "Groups", Some("#groups"));
        outline.push(Some(groups), "Cosets", Some("#cosets"));
        outline.push(None, "Appendix", Some("#appendix"));
        for id in [basics, algebra, groups] {
            outline.mark_subsection(id);
        }
        outline
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::sample;
    use super::*;

    #[test]
    fn ids_follow_document_order() {
        let outline = sample();
        let labels: Vec<&str> = outline.nodes().iter().map(|n| n.label.as_str()).collect();
        assert_eq!(
            labels,
            ["Basics", "Sets", "Functions", "Algebra", "Groups", "Cosets", "Appendix"]
        );
        assert_eq!(outline.roots(), &[0, 3, 6]);
        assert_eq!(outline.node(5).unwrap().depth, 2);
    }

    #[test]
    fn ancestors_nearest_first() {
        let outline = sample();
        assert_eq!(outline.ancestors(5), vec![4, 3]);
        assert!(outline.ancestors(0).is_empty());
    }

    #[test]
    fn targets_strip_hash() {
        let outline = sample();
        assert_eq!(outline.find_by_target("groups"), Some(4));
        assert_eq!(outline.find_by_target("#groups"), Some(4));
        assert_eq!(outline.find_by_target("missing"), None);
    }

    #[test]
    fn collapsed_entries_hide_descendants() {
        let mut outline = sample();
        outline.set_collapsed(3, true);
        assert_eq!(outline.visible_rows(), vec![0, 1, 2, 3, 6]);
        outline.nodes_mut()[1].visible = false;
        assert_eq!(outline.visible_rows(), vec![0, 2, 3, 6]);
        assert_eq!(outline.row_of(6), Some(3));
        assert_eq!(outline.row_of(5), None);
    }

    #[test]
    fn leaves_have_no_collapse_state() {
        let mut outline = sample();
        outline.set_collapsed(6, true);
        assert!(!outline.node(6).unwrap().collapsed);
    }

    #[test]
    fn open_path_includes_self() {
        let mut outline = sample();
        outline.set_collapsed(3, true);
        outline.set_collapsed(4, true);
        outline.open_path(4);
        assert!(!outline.node(3).unwrap().collapsed);
        assert!(!outline.node(4).unwrap().collapsed);
    }

    #[test]
    fn single_active_entry() {
        let mut outline = sample();
        outline.set_active(2);
        outline.set_active(5);
        assert_eq!(outline.active(), Some(5));
        assert_eq!(outline.nodes().iter().filter(|n| n.active).count(), 1);
        outline.clear_active();
        assert_eq!(outline.active(), None);
    }
}
