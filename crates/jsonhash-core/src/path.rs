//! Structural paths (`/parent/0/child`) tracked while walking a tree.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Path from the root to the node currently visited.
///
/// Map fields contribute their name, list elements their index. The root
/// renders as `/`. Keys are escaped as in JSON Pointer (`~` as `~0`, `/` as
/// `~1`), so a rendered path can be fed back to [`JsonNode::pointer`].
///
/// [`JsonNode::pointer`]: crate::JsonNode::pointer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePath {
    segments: Vec<Segment>,
}

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn push_key(&mut self, key: &str) {
        self.segments.push(Segment::Key(key.to_owned()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }

    pub fn pop(&mut self) {
        self.segments.pop();
    }

    /// Number of segments below the root.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            match segment {
                Segment::Key(key) => write!(f, "/{}", key.replace('~', "~0").replace('/', "~1"))?,
                Segment::Index(index) => write!(f, "/{index}")?,
            }
        }
        Ok(())
    }
}
