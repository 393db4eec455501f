//! Applying topic edits to a repository's current topics.

use serde::Serialize;

use crate::ops::PlusMinusOp;

/// The outcome of applying a `PlusMinusOp` to one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicChange {
    /// Resulting topics: existing ones first, then additions, without duplicates.
    pub topics: Vec<String>,
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl TopicChange {
    /// `existing + plus - minus`. Removal wins when a topic is in both lists.
    pub fn apply(existing: &[String], op: &PlusMinusOp) -> Self {
        let mut topics: Vec<String> = Vec::with_capacity(existing.len() + op.plus.len());
        for topic in existing.iter().chain(op.plus.iter()) {
            if !topics.contains(topic) {
                topics.push(topic.clone());
            }
        }
        topics.retain(|t| !op.minus.contains(t));

        let added = topics.iter().filter(|t| !existing.contains(t)).cloned().collect();
        let mut removed: Vec<String> = Vec::new();
        for topic in existing {
            if !topics.contains(topic) && !removed.contains(topic) {
                removed.push(topic.clone());
            }
        }

        Self { topics, added, removed }
    }

    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// `+new,-old` style summary for log lines.
    pub fn summary(&self) -> String {
        self.added
            .iter()
            .map(|t| format!("+{}", t))
            .chain(self.removed.iter().map(|t| format!("-{}", t)))
            .collect::<Vec<_>>()
            .join(",")
    }
}
