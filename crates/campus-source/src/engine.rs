//! Shared query engine.
//!
//! The one implementation of search, filter, sort and pagination semantics.
//! The mock adapter runs every fetch through it, and the remote adapter uses
//! it whenever a server hands back a whole unpaginated collection.
//!
//! Semantics:
//!
//! - search matches case-insensitively as a substring, OR across the
//!   resource's search fields (every string field when none are declared)
//! - each active filter is an exact equality match on the field's trimmed
//!   text form; empty and `all` values and reserved keys are skipped
//! - sorting happens after filtering, is stable, and puts missing values last
//! - pagination happens last: `filtered[(page-1)*size .. page*size]`

use std::cmp::Ordering;

use campus_model::{ListItem, Page, QueryDescriptor, SortDirection, SortSpec, total_pages_for};
use serde_json::Value;

/// Apply `query` to a complete collection and cut out the requested page.
pub fn apply_query(items: &[ListItem], query: &QueryDescriptor, search_fields: &[String]) -> Page {
    let search = query.search_term().map(str::to_lowercase);

    let mut filtered: Vec<&ListItem> = items
        .iter()
        .filter(|item| {
            search
                .as_deref()
                .is_none_or(|term| matches_search(item, term, search_fields))
        })
        .filter(|item| matches_filters(item, query))
        .collect();

    if let Some(sort) = &query.sort_by {
        sort_items(&mut filtered, sort);
    }

    let total = filtered.len();
    let items = filtered
        .into_iter()
        .skip(query.offset())
        .take(query.page_size)
        .cloned()
        .collect();

    Page {
        items,
        total,
        page: query.page,
        total_pages: total_pages_for(total, query.page_size),
    }
}

/// Case-insensitive substring match of an already lowercased `term`.
pub fn matches_search(item: &ListItem, term: &str, search_fields: &[String]) -> bool {
    if search_fields.is_empty() {
        return item
            .fields
            .values()
            .filter_map(Value::as_str)
            .any(|text| text.to_lowercase().contains(term));
    }

    search_fields
        .iter()
        .filter_map(|field| item.text(field))
        .any(|text| text.to_lowercase().contains(term))
}

/// Every active filter of `query` equals the item's field.
pub fn matches_filters(item: &ListItem, query: &QueryDescriptor) -> bool {
    query
        .active_filters()
        .all(|(key, expected)| item.text(key).is_some_and(|actual| actual == expected))
}

fn sort_items(items: &mut [&ListItem], sort: &SortSpec) {
    items.sort_by(|a, b| {
        let left = SortKey::of(a.field(&sort.field));
        let right = SortKey::of(b.field(&sort.field));
        match (left, right) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(left), Some(right)) => {
                let ordering = left.compare(&right);
                match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            }
        }
    });
}

/// Comparable projection of a field value.
enum SortKey {
    Number(f64),
    Text(String),
}

impl SortKey {
    fn of(value: Option<&Value>) -> Option<Self> {
        match value? {
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::String(s) => Some(Self::Text(s.to_lowercase())),
            Value::Bool(b) => Some(Self::Number(if *b { 1.0 } else { 0.0 })),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    // Numbers order before text when a column mixes both.
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}
