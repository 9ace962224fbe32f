//! Chapter hierarchy rendered into a content container.
//!
//! Nodes refer to each other by [`ChapterId`] and parents are resolved by
//! lookup, so a tree survives serialization and cloning unchanged.

use crate::document::block::ACTUAL_LEVEL_ATTR;
use crate::document::element::{Element, Node};
use crate::error::{Result, TypesetError};
use rustc_hash::FxHashMap;
use serde::Deserialize;

/// Stable identifier for a chapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChapterId(pub u64);

/// A chapter and its place in the tree
#[derive(Debug, Clone)]
pub struct ChapterNode {
    pub id: ChapterId,
    pub title: String,
    pub parent: Option<ChapterId>,
    pub children: Vec<ChapterId>,
    /// Rendered body content placed after the chapter heading
    pub body: Vec<Node>,
}

/// Serialized chapter outline (`{"title": .., "body": [..], "children": [..]}`)
#[derive(Debug, Clone, Deserialize)]
pub struct ChapterSpec {
    pub title: String,
    #[serde(default)]
    pub body: Vec<Node>,
    #[serde(default)]
    pub children: Vec<ChapterSpec>,
}

/// Book outline with explicit parent links
#[derive(Debug, Clone, Default)]
pub struct ChapterTree {
    nodes: FxHashMap<ChapterId, ChapterNode>,
    roots: Vec<ChapterId>,
    next_id: u64,
}

impl ChapterTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a serialized outline
    pub fn from_specs(specs: &[ChapterSpec]) -> Self {
        let mut tree = Self::new();
        for spec in specs {
            let id = tree.add_root(spec.title.clone(), spec.body.clone());
            tree.add_spec_children(id, &spec.children);
        }
        tree
    }

    fn add_spec_children(&mut self, parent: ChapterId, specs: &[ChapterSpec]) {
        for spec in specs {
            // The parent was just inserted, so the lookup cannot fail
            if let Ok(id) = self.add_child(parent, spec.title.clone(), spec.body.clone()) {
                self.add_spec_children(id, &spec.children);
            }
        }
    }

    fn alloc_id(&mut self) -> ChapterId {
        let id = ChapterId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a top-level chapter
    pub fn add_root(&mut self, title: impl Into<String>, body: Vec<Node>) -> ChapterId {
        let id = self.alloc_id();
        self.nodes.insert(
            id,
            ChapterNode {
                id,
                title: title.into(),
                parent: None,
                children: Vec::new(),
                body,
            },
        );
        self.roots.push(id);
        id
    }

    /// Add a chapter as the last child of `parent`
    pub fn add_child(
        &mut self,
        parent: ChapterId,
        title: impl Into<String>,
        body: Vec<Node>,
    ) -> Result<ChapterId> {
        if !self.nodes.contains_key(&parent) {
            return Err(TypesetError::UnknownChapter(parent.0));
        }
        let id = self.alloc_id();
        self.nodes.insert(
            id,
            ChapterNode {
                id,
                title: title.into(),
                parent: Some(parent),
                children: Vec::new(),
                body,
            },
        );
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(id);
        }
        Ok(id)
    }

    pub fn get(&self, id: ChapterId) -> Option<&ChapterNode> {
        self.nodes.get(&id)
    }

    pub fn parent(&self, id: ChapterId) -> Option<ChapterId> {
        self.nodes.get(&id)?.parent
    }

    /// Nesting depth, 1 for top-level chapters
    pub fn depth(&self, id: ChapterId) -> Result<u32> {
        let mut node = self.nodes.get(&id).ok_or(TypesetError::UnknownChapter(id.0))?;
        let mut depth = 1;
        while let Some(parent) = node.parent {
            node = self
                .nodes
                .get(&parent)
                .ok_or(TypesetError::UnknownChapter(parent.0))?;
            depth += 1;
        }
        Ok(depth)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order walk yielding each chapter with its depth
    pub fn walk(&self) -> Vec<(ChapterId, u32)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(ChapterId, u32)> = self.roots.iter().rev().map(|&id| (id, 1)).collect();
        while let Some((id, depth)) = stack.pop() {
            out.push((id, depth));
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
            }
        }
        out
    }

    /// Render the book into a content container.
    ///
    /// Headings use `h{min(depth, 6)}` and record the real depth in
    /// `data-actual-level`.
    pub fn to_container(&self) -> Element {
        let mut container = Element::new("div").with_class("booksmith-content");
        for (id, depth) in self.walk() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            let heading = Element::new(format!("h{}", depth.min(6)))
                .with_attr(ACTUAL_LEVEL_ATTR, depth.to_string())
                .with_text(node.title.clone());
            container.children.push(heading.into());
            container.children.extend(node.body.iter().cloned());
        }
        container
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (ChapterTree, ChapterId, ChapterId) {
        let mut tree = ChapterTree::new();
        let part = tree.add_root("Part One", vec![]);
        let mut leaf = part;
        for depth in 2..=8 {
            leaf = tree
                .add_child(leaf, format!("Level {}", depth), vec![Node::Element(
                    Element::new("p").with_text("body"),
                )])
                .unwrap();
        }
        tree.add_root("Part Two", vec![]);
        (tree, part, leaf)
    }

    #[test]
    fn test_depth_and_parent_lookup() {
        let (tree, part, leaf) = sample();
        assert_eq!(tree.depth(part).unwrap(), 1);
        assert_eq!(tree.depth(leaf).unwrap(), 8);
        assert_eq!(tree.parent(part), None);
        assert!(tree.parent(leaf).is_some());
        assert_eq!(tree.len(), 9);
    }

    #[test]
    fn test_unknown_parent() {
        let mut tree = ChapterTree::new();
        let err = tree.add_child(ChapterId(42), "orphan", vec![]).unwrap_err();
        assert!(matches!(err, TypesetError::UnknownChapter(42)));
    }

    #[test]
    fn test_walk_is_preorder() {
        let (tree, _, _) = sample();
        let titles: Vec<_> = tree
            .walk()
            .into_iter()
            .map(|(id, _)| tree.get(id).unwrap().title.clone())
            .collect();
        assert_eq!(titles.first().map(String::as_str), Some("Part One"));
        assert_eq!(titles.last().map(String::as_str), Some("Part Two"));
        assert_eq!(titles[1], "Level 2");
    }

    #[test]
    fn test_container_clamps_heading_tags() {
        let (tree, _, _) = sample();
        let container = tree.to_container();
        let deepest = container
            .child_elements()
            .find(|el| el.text_content() == "Level 8")
            .unwrap();
        assert_eq!(deepest.tag, "h6");
        assert_eq!(deepest.attr(ACTUAL_LEVEL_ATTR), Some("8"));
    }

    #[test]
    fn test_from_specs() {
        let json = r#"[{"title": "A", "children": [{"title": "A.1", "body": [{"tag": "p", "children": ["x"]}]}]}]"#;
        let specs: Vec<ChapterSpec> = serde_json::from_str(json).unwrap();
        let tree = ChapterTree::from_specs(&specs);
        assert_eq!(tree.walk(), vec![(ChapterId(0), 1), (ChapterId(1), 2)]);
        assert_eq!(tree.to_container().children.len(), 3);
    }
}
