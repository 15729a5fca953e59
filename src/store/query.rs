//! # Query Values
//!
//! A `Query` is an owned, not-yet-executed description of a find: filter,
//! projection, sort, skip/limit and optional relation expansion. It is built
//! with chainable methods and executed exactly once by the store.

use super::filter::FilterSpec;

/// A single sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
}

impl SortKey {
    /// Ascending sort on a field
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    /// Descending sort on a field
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }

    /// Parse a sort token; a leading `-` means descending.
    pub fn parse(token: &str) -> Self {
        match token.strip_prefix('-') {
            Some(field) => Self::desc(field),
            None => Self::asc(token),
        }
    }
}

/// Relation expansion descriptor.
///
/// `Reference` replaces a stored id with the referenced document;
/// `Children` embeds the documents of a related collection whose foreign-key
/// field points back at the parent.
#[derive(Debug, Clone)]
pub enum Populate {
    Reference {
        /// Field on the parent holding the referenced id
        field: String,
        /// Collection the reference points into
        collection: String,
        /// Optional projection applied to the embedded document
        select: Option<Vec<String>>,
    },
    Children {
        /// Field to embed the children under
        field: String,
        /// Collection the children live in
        collection: String,
        /// Field on the child holding the parent id
        foreign_key: String,
    },
}

impl Populate {
    /// Forward reference expansion
    pub fn reference(field: impl Into<String>, collection: impl Into<String>) -> Self {
        Self::Reference {
            field: field.into(),
            collection: collection.into(),
            select: None,
        }
    }

    /// Forward reference expansion with a projection on the embedded document
    pub fn reference_with_select(
        field: impl Into<String>,
        collection: impl Into<String>,
        select: Vec<String>,
    ) -> Self {
        Self::Reference {
            field: field.into(),
            collection: collection.into(),
            select: Some(select),
        }
    }

    /// Reverse (one-to-many) expansion
    pub fn children(
        field: impl Into<String>,
        collection: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self::Children {
            field: field.into(),
            collection: collection.into(),
            foreign_key: foreign_key.into(),
        }
    }
}

/// A configured, not-yet-executed find
#[derive(Debug, Clone)]
pub struct Query {
    pub collection: String,
    pub filter: FilterSpec,
    pub select: Option<Vec<String>>,
    pub sort: Vec<SortKey>,
    pub skip: usize,
    pub limit: Option<usize>,
    pub populate: Option<Populate>,
}

impl Query {
    /// Begin a query against a collection, restricted by a filter
    pub fn new(collection: impl Into<String>, filter: FilterSpec) -> Self {
        Self {
            collection: collection.into(),
            filter,
            select: None,
            sort: Vec::new(),
            skip: 0,
            limit: None,
            populate: None,
        }
    }

    /// Project to the named fields (the id field is always retained)
    pub fn select(mut self, fields: Vec<String>) -> Self {
        self.select = Some(fields);
        self
    }

    /// Sort by the given keys, in order
    pub fn sort(mut self, keys: Vec<SortKey>) -> Self {
        self.sort = keys;
        self
    }

    /// Skip the first `n` matching documents
    pub fn skip(mut self, n: usize) -> Self {
        self.skip = n;
        self
    }

    /// Return at most `n` documents
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Attach a relation-expansion instruction
    pub fn populate(mut self, populate: Populate) -> Self {
        self.populate = Some(populate);
        self
    }
}
