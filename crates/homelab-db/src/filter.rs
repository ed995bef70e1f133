//! Record filter for machine queries

use std::fmt;

use mongodb::bson::{Bson, Document, doc};

use crate::record::GROUP_KEY;

/// Record filter
///
/// Describes which machine documents a fetch returns. Renders to a MongoDB
/// query document and can also be evaluated against a raw document, so
/// in-process stores select exactly what the server would.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Required group tag value
    group: Option<String>,
}

impl RecordFilter {
    /// Match every record
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Match records tagged with `group`
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            group: Some(name.into()),
        }
    }

    /// Filter for an optional target group
    ///
    /// A missing or empty target selects every record.
    #[must_use]
    pub fn from_target(target_group: Option<&str>) -> Self {
        match target_group {
            Some(group) if !group.is_empty() => Self::group(group),
            _ => Self::all(),
        }
    }

    /// Group this filter restricts to, if any
    #[must_use]
    pub fn target_group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Build the MongoDB query document
    ///
    /// A tag mapping may carry keys besides `group`, so the group is matched
    /// with `$elemMatch` rather than by whole-subdocument equality.
    #[must_use]
    pub fn to_document(&self) -> Document {
        match &self.group {
            Some(group) => doc! { "tags": { "$elemMatch": { "group": group.as_str() } } },
            None => Document::new(),
        }
    }

    /// Evaluate the filter against a raw document
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        let Some(group) = &self.group else {
            return true;
        };

        let Ok(tags) = doc.get_array("tags") else {
            return false;
        };

        tags.iter().any(|tag| match tag {
            Bson::Document(tag) => tag.get_str(GROUP_KEY).is_ok_and(|g| g == group.as_str()),
            _ => false,
        })
    }
}

impl fmt::Display for RecordFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_document())
    }
}
