//! Attached documentation
//!
//! Comments arrive already parsed. An entity documented at several
//! declarations keeps every distinct comment; the set is held sorted so that
//! the order fragments arrived in never shows through. Section accessors
//! resolve overlaps by taking the first comment (in that order) that has the
//! section.
//!
//! `brief()` and the other accessors therefore follow the canonical sorted
//! order, not arrival order: documentation merged in earlier gets no
//! precedence over documentation merged in later.

use serde::{Deserialize, Serialize};

/// Documentation of one parameter or template parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamDoc {
    pub name: String,
    pub text: String,
}

impl ParamDoc {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// One parsed comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DocComment {
    pub brief: String,
    pub blocks: Vec<String>,
    pub params: Vec<ParamDoc>,
    pub tparams: Vec<ParamDoc>,
    pub returns: String,
    pub throws: Vec<String>,
    pub see: Vec<String>,
}

impl DocComment {
    pub fn brief(text: impl Into<String>) -> Self {
        Self {
            brief: text.into(),
            ..Self::default()
        }
    }

    pub fn with_block(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(text.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.params.push(ParamDoc::new(name, text));
        self
    }

    pub fn with_returns(mut self, text: impl Into<String>) -> Self {
        self.returns = text.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Every distinct comment attached to an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<DocComment>", into = "Vec<DocComment>")]
pub struct Documentation {
    comments: Vec<DocComment>,
}

impl From<Vec<DocComment>> for Documentation {
    fn from(comments: Vec<DocComment>) -> Self {
        let mut doc = Self { comments };
        doc.normalize();
        doc
    }
}

impl From<Documentation> for Vec<DocComment> {
    fn from(doc: Documentation) -> Self {
        doc.comments
    }
}

impl From<DocComment> for Documentation {
    fn from(comment: DocComment) -> Self {
        Self::from(vec![comment])
    }
}

impl Documentation {
    fn normalize(&mut self) {
        self.comments.retain(|c| !c.is_empty());
        self.comments.sort();
        self.comments.dedup();
    }

    /// Fold in another entity sighting's documentation. Neither side takes
    /// precedence; the result is the sorted union of both.
    pub fn merge(&mut self, other: Documentation) {
        self.comments.extend(other.comments);
        self.normalize();
    }

    pub fn comments(&self) -> &[DocComment] {
        &self.comments
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn brief(&self) -> Option<&str> {
        self.comments
            .iter()
            .map(|c| c.brief.as_str())
            .find(|b| !b.is_empty())
    }

    pub fn returns(&self) -> Option<&str> {
        self.comments
            .iter()
            .map(|c| c.returns.as_str())
            .find(|r| !r.is_empty())
    }

    /// Description paragraphs of every comment, in order
    pub fn blocks(&self) -> impl Iterator<Item = &str> {
        self.comments
            .iter()
            .flat_map(|c| c.blocks.iter().map(String::as_str))
    }

    /// Parameter docs, one per name; the first comment documenting a name wins
    pub fn params(&self) -> Vec<&ParamDoc> {
        collect_by_name(self.comments.iter().flat_map(|c| c.params.iter()))
    }

    pub fn tparams(&self) -> Vec<&ParamDoc> {
        collect_by_name(self.comments.iter().flat_map(|c| c.tparams.iter()))
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.comments
            .iter()
            .flat_map(|c| c.params.iter())
            .find(|p| p.name == name)
            .map(|p| p.text.as_str())
    }

    pub fn see(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for s in self.comments.iter().flat_map(|c| c.see.iter()) {
            if !out.contains(&s.as_str()) {
                out.push(s);
            }
        }
        out
    }
}

fn collect_by_name<'a>(docs: impl Iterator<Item = &'a ParamDoc>) -> Vec<&'a ParamDoc> {
    let mut out: Vec<&ParamDoc> = Vec::new();
    for doc in docs {
        if !out.iter().any(|d| d.name == doc.name) {
            out.push(doc);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_is_order_independent() {
        let a = Documentation::from(DocComment::brief("Adds two numbers"));
        let b = Documentation::from(DocComment::brief("Sum").with_param("x", "left"));

        let mut ab = a.clone();
        ab.merge(b.clone());
        let mut ba = b.clone();
        ba.merge(a.clone());

        assert_eq!(ab, ba);
        assert_eq!(ab.comments().len(), 2);
    }

    #[test]
    fn test_merge_dedups_identical_comments() {
        let a = Documentation::from(DocComment::brief("Same"));
        let mut merged = a.clone();
        merged.merge(a.clone());
        assert_eq!(merged, a);
    }

    #[test]
    fn test_section_precedence() {
        let doc = Documentation::from(vec![
            DocComment::brief("").with_param("x", "from first").with_block("para one"),
            DocComment::brief("Brief").with_param("x", "from second").with_param("y", "why").with_block("para two"),
        ]);

        assert_eq!(doc.brief(), Some("Brief"));
        assert_eq!(doc.param("y"), Some("why"));
        assert_eq!(doc.params().len(), 2);
        assert_eq!(doc.blocks().count(), 2);
        assert_eq!(doc.returns(), None);
    }

    #[test]
    fn test_empty_comments_dropped() {
        let doc = Documentation::from(vec![DocComment::default()]);
        assert!(doc.is_empty());
    }
}
