use super::Outline;

pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Filter the outline by a case-insensitive substring of each link's label.
///
/// An empty query shows every entry and collapses every expandable entry
/// again. Otherwise every entry is hidden, then each match is revealed along
/// with its whole ancestor chain, each forced open.
///
/// Returns the number of matching entries.
pub fn match_and_filter(outline: &mut Outline, query: &str) -> usize {
    let q = normalize_query(query);
    if q.is_empty() {
        let expandable: Vec<_> = outline
            .nodes()
            .iter()
            .filter(|n| n.expandable)
            .map(|n| n.id)
            .collect();
        for node in outline.nodes_mut() {
            node.visible = true;
        }
        for id in expandable {
            outline.set_collapsed(id, true);
        }
        return 0;
    }

    for node in outline.nodes_mut() {
        node.visible = false;
    }

    let matches: Vec<_> = outline
        .nodes()
        .iter()
        .filter(|n| n.is_link && n.label.to_lowercase().contains(&q))
        .map(|n| n.id)
        .collect();

    for &id in &matches {
        let mut path = vec![id];
        path.extend(outline.ancestors(id));
        for node in path {
            outline.nodes_mut()[node].visible = true;
            if outline.nodes()[node].collapsed {
                outline.set_collapsed(node, false);
            }
        }
    }
    matches.len()
}
