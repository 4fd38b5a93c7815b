//! Navigable document tree.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Detaching a node
//! unlinks it from its parent; the node stays in the arena but is no longer
//! reachable from the root, which is how extractors "extract" or "clear"
//! content they have consumed.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeData {
    Document,
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    // ===== CONSTRUCTION =====

    pub fn append_element(
        &mut self,
        parent: NodeId,
        name: &str,
        attrs: Vec<(String, String)>,
    ) -> NodeId {
        self.append(
            parent,
            NodeData::Element {
                name: name.to_ascii_lowercase(),
                attrs,
            },
        )
    }

    /// Append text, merging with a directly preceding text node.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        if let Some(&last) = self.nodes[parent.0].children.last() {
            if let NodeData::Text(existing) = &mut self.nodes[last.0].data {
                existing.push_str(text);
                return last;
            }
        }
        self.append(parent, NodeData::Text(text.to_string()))
    }

    fn append(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    // ===== MUTATION =====

    /// Unlink `id` (and its subtree) from its parent.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != id);
        }
    }

    /// Drop every child of `id`, keeping the element itself.
    pub fn clear(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    // ===== ACCESS =====

    pub fn name(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].data, NodeData::Element { .. })
    }

    /// True when `id` is an element named one of `names`.
    pub fn is_tag(&self, id: NodeId, names: &[&str]) -> bool {
        self.name(id).is_some_and(|name| names.contains(&name))
    }

    pub fn attr(&self, id: NodeId, key: &str) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    pub fn has_any_class(&self, id: NodeId, classes: &[String]) -> bool {
        classes.iter().any(|class| self.has_class(id, class))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.0]
            .children
            .iter()
            .copied()
            .filter(|&child| self.is_element(child))
    }

    pub fn next_sibling_element(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let position = siblings.iter().position(|&s| s == id)?;
        siblings[position + 1..]
            .iter()
            .copied()
            .find(|&s| self.is_element(s))
    }

    pub fn previous_sibling_element(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let position = siblings.iter().position(|&s| s == id)?;
        siblings[..position]
            .iter()
            .rev()
            .copied()
            .find(|&s| self.is_element(s))
    }

    /// Pre-order descendants of `id`, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Descendant elements of `id` matching `predicate`, in document order.
    pub fn find_all<F>(&self, id: NodeId, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&Document, NodeId) -> bool,
    {
        self.descendants(id)
            .into_iter()
            .filter(|&node| self.is_element(node) && predicate(self, node))
            .collect()
    }

    pub fn find_first<F>(&self, id: NodeId, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Document, NodeId) -> bool,
    {
        self.find_all(id, predicate).into_iter().next()
    }

    /// Descendant elements named one of `names`.
    pub fn find_tags(&self, id: NodeId, names: &[&str]) -> Vec<NodeId> {
        self.find_all(id, |doc, node| doc.is_tag(node, names))
    }

    pub fn contains_tag(&self, id: NodeId, names: &[&str]) -> bool {
        self.find_first(id, |doc, node| doc.is_tag(node, names))
            .is_some()
    }

    /// Concatenated text of `id` and all its descendants.
    pub fn text(&self, id: NodeId) -> String {
        self.text_excluding(id, |_, _| false)
    }

    /// Concatenated text, skipping every descendant subtree whose root
    /// matches `skip`.
    pub fn text_excluding<F>(&self, id: NodeId, skip: F) -> String
    where
        F: Fn(&Document, NodeId) -> bool,
    {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if current != id && skip(self, current) {
                continue;
            }
            match &self.nodes[current.0].data {
                NodeData::Text(text) => out.push_str(text),
                _ => stack.extend(self.children(current).iter().rev().copied()),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let list = doc.append_element(root, "OL", vec![("class".into(), "defs main".into())]);
        let first = doc.append_element(list, "li", vec![]);
        doc.append_text(first, "first ");
        doc.append_text(first, "sense");
        let second = doc.append_element(list, "li", vec![]);
        doc.append_text(second, "second");
        let nested = doc.append_element(second, "ul", vec![]);
        let sub = doc.append_element(nested, "li", vec![]);
        doc.append_text(sub, " sub");
        (doc, list, first, second)
    }

    #[test]
    fn names_are_lowercased_and_classes_split() {
        let (doc, list, _, _) = sample();
        assert_eq!(doc.name(list), Some("ol"));
        assert!(doc.has_class(list, "defs"));
        assert!(doc.has_class(list, "main"));
        assert!(!doc.has_class(list, "def"));
    }

    #[test]
    fn adjacent_text_is_merged() {
        let (doc, _, first, _) = sample();
        assert_eq!(doc.children(first).len(), 1);
        assert_eq!(doc.text(first), "first sense");
    }

    #[test]
    fn find_all_is_document_order() {
        let (doc, list, first, second) = sample();
        let items = doc.find_tags(list, &["li"]);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], first);
        assert_eq!(items[1], second);
    }

    #[test]
    fn text_excluding_skips_nested_items() {
        let (doc, _, _, second) = sample();
        assert_eq!(doc.text(second), "second sub");
        let own = doc.text_excluding(second, |d, n| d.is_tag(n, &["li"]));
        assert_eq!(own, "second");
    }

    #[test]
    fn detach_and_clear_unlink_content() {
        let (mut doc, list, first, second) = sample();
        assert_eq!(doc.next_sibling_element(first), Some(second));
        assert_eq!(doc.previous_sibling_element(second), Some(first));

        doc.detach(first);
        assert_eq!(doc.find_tags(list, &["li"]).len(), 2);
        assert_eq!(doc.parent(first), None);

        doc.clear(second);
        assert_eq!(doc.text(list), "");
        assert!(doc.children(second).is_empty());
    }
}
