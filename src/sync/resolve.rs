//! Field-by-field precedence between the shared record, explicit widget
//! settings and built-in defaults.

use crate::profile::record::{ProfileRecord, Testimonial};
use serde::{Deserialize, Serialize};

/// Where an effective value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSource {
    Shared,
    Explicit,
    Default,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Shared => "shared record",
            DataSource::Explicit => "widget settings",
            DataSource::Default => "defaults",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: DataSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: DataSource) -> Self {
        Self { value, source }
    }
}

/// Three-way coalesce over any record shape.
///
/// Only a missing value (`None`) falls through to the next source; empty
/// lists and empty strings are values.
pub fn coalesce<R, T, F>(
    shared: Option<&R>,
    explicit: Option<&R>,
    defaults: Option<&R>,
    field: F,
) -> Option<Resolved<T>>
where
    T: Clone,
    F: Fn(&R) -> Option<&T>,
{
    [
        (shared, DataSource::Shared),
        (explicit, DataSource::Explicit),
        (defaults, DataSource::Default),
    ]
    .into_iter()
    .find_map(|(record, source)| {
        record
            .and_then(|r| field(r))
            .map(|value| Resolved::new(value.clone(), source))
    })
}

/// The three inputs of one resolution pass over [`ProfileRecord`]s.
#[derive(Debug, Clone, Copy)]
pub struct Sources<'a> {
    pub shared: Option<&'a ProfileRecord>,
    pub explicit: &'a ProfileRecord,
    pub defaults: &'a ProfileRecord,
}

impl<'a> Sources<'a> {
    pub fn new(
        shared: Option<&'a ProfileRecord>,
        explicit: &'a ProfileRecord,
        defaults: &'a ProfileRecord,
    ) -> Self {
        Self {
            shared,
            explicit,
            defaults,
        }
    }

    pub fn field<T: Clone>(
        &self,
        get: impl Fn(&ProfileRecord) -> Option<&T>,
    ) -> Option<Resolved<T>> {
        coalesce(self.shared, Some(self.explicit), Some(self.defaults), get)
    }

    /// Like [`Sources::field`] but total: a field missing everywhere resolves
    /// to `T::default()` attributed to the defaults.
    pub fn value<T: Clone + Default>(
        &self,
        get: impl Fn(&ProfileRecord) -> Option<&T>,
    ) -> Resolved<T> {
        self.field(get)
            .unwrap_or_else(|| Resolved::new(T::default(), DataSource::Default))
    }
}

/// Explicit settings of a single testimonial card; any field may be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialTestimonial {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl PartialTestimonial {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&Testimonial> for PartialTestimonial {
    fn from(t: &Testimonial) -> Self {
        Self {
            quote: Some(t.quote.clone()),
            author: Some(t.author.clone()),
            age: Some(t.age),
            condition: Some(t.condition.clone()),
            rating: Some(t.rating),
        }
    }
}

/// Resolve the testimonial shown by a card at `index`.
///
/// A shared testimonial at that index is taken as a unit. Otherwise each
/// field is taken from the card settings, falling back to `defaults`.
pub fn resolve_card(
    shared: Option<&ProfileRecord>,
    props: &PartialTestimonial,
    defaults: &Testimonial,
    index: usize,
) -> Resolved<Testimonial> {
    if let Some(t) = shared
        .and_then(|r| r.testimonials.as_ref())
        .and_then(|list| list.get(index))
    {
        return Resolved::new(t.clone(), DataSource::Shared);
    }
    let fallback = PartialTestimonial::from(defaults);
    let pick = |get: fn(&PartialTestimonial) -> Option<&String>| {
        coalesce(None, Some(props), Some(&fallback), get)
            .map(|r| r.value)
            .unwrap_or_default()
    };
    let value = Testimonial {
        quote: pick(|p| p.quote.as_ref()),
        author: pick(|p| p.author.as_ref()),
        condition: pick(|p| p.condition.as_ref()),
        age: props.age.unwrap_or(defaults.age),
        rating: props
            .rating
            .unwrap_or(defaults.rating)
            .min(crate::profile::record::MAX_RATING),
    };
    let source = if props.is_empty() {
        DataSource::Default
    } else {
        DataSource::Explicit
    };
    Resolved::new(value, source)
}
