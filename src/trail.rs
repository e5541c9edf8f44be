//! Breadcrumb trail data model.
//!
//! - [`Subject`]: any displayable application value a breadcrumb is about.
//! - [`SubjectValue`]: what a subject provider yields: nothing, one subject,
//!   or an ordered list for composite pages.
//! - [`Breadcrumb`]: one trail entry: a subject plus the address it links to.
//! - [`Breadcrumbs`]: the trail itself, ordered root first, current page last.
//!
//! Trails grow by appending: a level takes the trail its parent produced and
//! appends its own entries, so the final order is root to leaf no matter how
//! deep the ancestry goes.
//!
//! # Example
//!
//! ```
//! use view_breadcrumbs::{Breadcrumb, Breadcrumbs};
//!
//! let mut trail = Breadcrumbs::new();
//! trail.push(Breadcrumb::new("Customers", Some("/customers/".to_string())));
//! trail.push(Breadcrumb::new("Order #42", Some("/orders/42/".to_string())));
//!
//! assert_eq!(trail.titles(), ["Customers", "Order #42"]);
//! assert_eq!(trail.last().unwrap().url(), Some("/orders/42/"));
//! ```

use crate::config::BreadcrumbConfig;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Subject
// ============================================================================

/// A displayable value shown as a breadcrumb's title.
///
/// Cheap to clone; equality compares rendered text.
#[derive(Clone)]
pub struct Subject(Arc<dyn fmt::Display + Send + Sync>);

impl Subject {
    /// Wrap any displayable value.
    pub fn new<T>(value: T) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        Self(Arc::new(value))
    }

    /// Rendered text of the subject.
    pub fn title(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Subject").field(&self.title()).finish()
    }
}

impl PartialEq for Subject {
    fn eq(&self, other: &Self) -> bool {
        self.title() == other.title()
    }
}

impl From<&str> for Subject {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl From<String> for Subject {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Output of a subject provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubjectValue {
    /// The level contributes no entry.
    #[default]
    Empty,
    /// One entry.
    One(Subject),
    /// Several entries for one level, in display order; `None` members are skipped.
    Many(Vec<Option<Subject>>),
}

impl SubjectValue {
    /// Flatten into the subjects that produce entries.
    pub fn into_subjects(self) -> Vec<Subject> {
        match self {
            SubjectValue::Empty => Vec::new(),
            SubjectValue::One(subject) => vec![subject],
            SubjectValue::Many(subjects) => subjects.into_iter().flatten().collect(),
        }
    }
}

impl From<Subject> for SubjectValue {
    fn from(subject: Subject) -> Self {
        SubjectValue::One(subject)
    }
}

impl From<Option<Subject>> for SubjectValue {
    fn from(subject: Option<Subject>) -> Self {
        subject.map_or(SubjectValue::Empty, SubjectValue::One)
    }
}

impl From<&str> for SubjectValue {
    fn from(value: &str) -> Self {
        SubjectValue::One(value.into())
    }
}

impl From<String> for SubjectValue {
    fn from(value: String) -> Self {
        SubjectValue::One(value.into())
    }
}

impl From<Vec<Subject>> for SubjectValue {
    fn from(subjects: Vec<Subject>) -> Self {
        SubjectValue::Many(subjects.into_iter().map(Some).collect())
    }
}

impl From<Vec<Option<Subject>>> for SubjectValue {
    fn from(subjects: Vec<Option<Subject>>) -> Self {
        SubjectValue::Many(subjects)
    }
}

// ============================================================================
// Breadcrumb
// ============================================================================

/// One trail entry. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Breadcrumb {
    subject: Subject,
    url: Option<String>,
}

impl Breadcrumb {
    /// Create an entry for `subject` linking to `url`.
    pub fn new(subject: impl Into<Subject>, url: Option<String>) -> Self {
        Self {
            subject: subject.into(),
            url,
        }
    }

    /// The subject this entry is about.
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Address of the entry; `None` for legacy entries that never resolved.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Rendered subject text.
    pub fn title(&self) -> String {
        self.subject.title()
    }
}

impl fmt::Display for Breadcrumb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.subject.fmt(f)
    }
}

impl Serialize for Breadcrumb {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Breadcrumb", 2)?;
        state.serialize_field("title", &self.title())?;
        state.serialize_field("url", &self.url)?;
        state.end()
    }
}

// ============================================================================
// Breadcrumbs
// ============================================================================

/// Ordered trail, root first, current page last.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Breadcrumbs {
    entries: Vec<Breadcrumb>,
}

impl Breadcrumbs {
    /// Create an empty trail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry after everything discovered so far.
    pub fn push(&mut self, entry: Breadcrumb) {
        self.entries.push(entry);
    }

    /// Append every entry of `other`, keeping its order.
    pub fn append(&mut self, other: Breadcrumbs) {
        self.entries.extend(other.entries);
    }

    /// All entries, root first.
    pub fn entries(&self) -> &[Breadcrumb] {
        &self.entries
    }

    /// The entry for the page being rendered.
    pub fn last(&self) -> Option<&Breadcrumb> {
        self.entries.last()
    }

    /// Rendered titles in trail order.
    pub fn titles(&self) -> Vec<String> {
        self.entries.iter().map(Breadcrumb::title).collect()
    }

    /// Addresses in trail order.
    pub fn urls(&self) -> Vec<Option<&str>> {
        self.entries.iter().map(Breadcrumb::url).collect()
    }

    /// Iterate over entries, root first.
    pub fn iter(&self) -> std::slice::Iter<'_, Breadcrumb> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` if the trail has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Context handed to the breadcrumb template: the entries under the
    /// configured template context name.
    ///
    /// ```
    /// use view_breadcrumbs::{Breadcrumb, BreadcrumbConfig, Breadcrumbs};
    ///
    /// let mut trail = Breadcrumbs::new();
    /// trail.push(Breadcrumb::new("Home", Some("/".to_string())));
    ///
    /// let context = trail.inclusion_context(&BreadcrumbConfig::default());
    /// assert_eq!(context["breadcrumbs"][0]["title"], "Home");
    /// ```
    pub fn inclusion_context(&self, config: &BreadcrumbConfig) -> Value {
        let mut context = serde_json::Map::new();
        context.insert(
            config.template_context_key().to_string(),
            json!(self.entries),
        );
        Value::Object(context)
    }
}

impl FromIterator<Breadcrumb> for Breadcrumbs {
    fn from_iter<I: IntoIterator<Item = Breadcrumb>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Breadcrumbs {
    type Item = Breadcrumb;
    type IntoIter = std::vec::IntoIter<Breadcrumb>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Breadcrumbs {
    type Item = &'a Breadcrumb;
    type IntoIter = std::slice::Iter<'a, Breadcrumb>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
