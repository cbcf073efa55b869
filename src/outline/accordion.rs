use super::{NodeId, Outline};

pub const COLLAPSED_GLYPH: char = '▸';
pub const EXPANDED_GLYPH: char = '▾';
pub const TOGGLE_LABEL: &str = "Toggle subsection";

/// The expand/collapse button owned by an expandable entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleControl {
    pub glyph: char,
    pub aria_expanded: bool,
    pub label: &'static str,
}

impl ToggleControl {
    pub fn for_state(collapsed: bool) -> Self {
        let mut control = Self {
            glyph: COLLAPSED_GLYPH,
            aria_expanded: false,
            label: TOGGLE_LABEL,
        };
        control.sync(collapsed);
        control
    }

    pub fn sync(&mut self, collapsed: bool) {
        self.glyph = if collapsed {
            COLLAPSED_GLYPH
        } else {
            EXPANDED_GLYPH
        };
        self.aria_expanded = !collapsed;
    }
}

/// Mark every top-level entry that owns a subsection list as expandable and give
/// it exactly one toggle control. Newly discovered entries start collapsed;
/// running the pass again leaves existing controls and state alone.
///
/// Returns how many entries are expandable.
pub fn discover(outline: &mut Outline) -> usize {
    let roots = outline.roots().to_vec();
    let mut expandable = 0;
    for id in roots {
        let node = &mut outline.nodes_mut()[id];
        if !node.has_subsection {
            continue;
        }
        expandable += 1;
        node.expandable = true;
        if node.toggle.is_none() {
            node.collapsed = true;
            node.toggle = Some(ToggleControl::for_state(true));
        }
    }
    expandable
}

/// Flip one entry. Descendants and ancestors keep their own state.
///
/// Returns the new expanded state, or `None` for entries without a toggle.
pub fn toggle(outline: &mut Outline, id: NodeId) -> Option<bool> {
    let node = outline.node(id)?;
    if !node.expandable {
        return None;
    }
    let collapsed = !node.collapsed;
    outline.set_collapsed(id, collapsed);
    Some(!collapsed)
}
