//! Comments attached to nodes

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::SourceRange;

/// How a comment is delimited in source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    /// `// text`
    Inline,
    /// `/* text */`
    Multiline,
}

impl CommentKind {
    pub fn name(self) -> &'static str {
        match self {
            CommentKind::Inline => "inline",
            CommentKind::Multiline => "multiline",
        }
    }
}

/// Which side of its owner a comment sits on. Decided by the list holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentPlacement {
    Leading,
    Trailing,
}

/// A single comment, without its delimiters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub kind: CommentKind,
    pub text: String,
    #[serde(default)]
    pub location: SourceRange,
}

impl Comment {
    pub fn inline(text: impl Into<String>) -> Self {
        Self {
            kind: CommentKind::Inline,
            text: text.into(),
            location: SourceRange::default(),
        }
    }

    pub fn multiline(text: impl Into<String>) -> Self {
        Self {
            kind: CommentKind::Multiline,
            text: text.into(),
            location: SourceRange::default(),
        }
    }

    pub fn with_location(mut self, location: SourceRange) -> Self {
        self.location = location;
        self
    }

    /// Comment text including its delimiters
    pub fn raw_text(&self) -> String {
        match self.kind {
            CommentKind::Inline => format!("//{}", self.text),
            CommentKind::Multiline => format!("/*{}*/", self.text),
        }
    }

    pub fn to_value(&self) -> Value {
        json!({
            "type": "Comment",
            "kind": self.kind.name(),
            "text": self.text,
            "location": self.location.to_value(),
        })
    }
}

pub(crate) fn comments_to_value(comments: &[Comment]) -> Value {
    Value::Array(comments.iter().map(Comment::to_value).collect())
}
