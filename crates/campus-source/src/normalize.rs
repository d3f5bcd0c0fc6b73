//! Response shape normalization.
//!
//! Backends wrap list responses in several ways. Every shape funnels through
//! [`normalize_list`], which checks them in a fixed priority order:
//!
//! 1. a bare array: `[...]`
//! 2. an `items` array: `{"items": [...], "total": 47}`
//! 3. a `data` array, or a `data` object matching rule 2 or 4 (one level deep):
//!    `{"data": [...]}`, `{"data": {"items": [...], "total": 47}}`
//! 4. an array under the resource name: `{"courses": [...]}`
//!
//! Anything else is a decode error. Envelope metadata (`total`/`totalCount`/
//! `count`, `page`, `totalPages`) is picked up when present; inner envelopes
//! win over outer ones.

use campus_model::item::json_type_name;
use campus_model::{ListItem, Page, QueryDescriptor, total_pages_for};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::engine::apply_query;
use crate::error::{AdapterError, Result};

/// Keys that may carry the total item count, in lookup order.
const TOTAL_KEYS: [&str; 3] = ["total", "totalCount", "count"];

/// A list response with its wrapper removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListEnvelope {
    /// Raw records, not yet converted to items.
    pub records: Vec<Value>,
    /// Total matching items reported by the server.
    pub total: Option<usize>,
    /// Page number reported by the server.
    pub page: Option<usize>,
    /// Page count reported by the server.
    pub total_pages: Option<usize>,
}

impl ListEnvelope {
    fn bare(records: Vec<Value>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    fn with_meta(records: Vec<Value>, meta: &Map<String, Value>) -> Self {
        Self {
            records,
            total: TOTAL_KEYS.iter().find_map(|key| read_count(meta, key)),
            page: read_count(meta, "page"),
            total_pages: read_count(meta, "totalPages"),
        }
    }

    /// Whether the server paginated the collection itself.
    pub fn is_paginated(&self) -> bool {
        self.total.is_some()
    }
}

/// Unwrap a list response body.
///
/// `resource_key` is the collection name used by rule 4.
pub fn normalize_list(body: Value, resource_key: &str) -> Result<ListEnvelope> {
    match body {
        Value::Array(records) => Ok(ListEnvelope::bare(records)),
        Value::Object(map) => from_object(map, resource_key, true),
        other => Err(AdapterError::Decode(format!(
            "expected a list response, found {}",
            json_type_name(&other)
        ))),
    }
}

fn from_object(
    mut map: Map<String, Value>,
    resource_key: &str,
    allow_nested: bool,
) -> Result<ListEnvelope> {
    if let Some(Value::Array(records)) = map.remove("items") {
        return Ok(ListEnvelope::with_meta(records, &map));
    }

    match map.remove("data") {
        Some(Value::Array(records)) => return Ok(ListEnvelope::with_meta(records, &map)),
        Some(Value::Object(inner)) if allow_nested => {
            let outer = ListEnvelope::with_meta(Vec::new(), &map);
            let nested = from_object(inner, resource_key, false)?;
            return Ok(ListEnvelope {
                records: nested.records,
                total: nested.total.or(outer.total),
                page: nested.page.or(outer.page),
                total_pages: nested.total_pages.or(outer.total_pages),
            });
        }
        _ => {}
    }

    if let Some(Value::Array(records)) = map.remove(resource_key) {
        return Ok(ListEnvelope::with_meta(records, &map));
    }

    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    Err(AdapterError::Decode(format!(
        "no list found in response object (keys: {})",
        keys.join(", ")
    )))
}

/// Unwrap a single-entity response (`{"data": {...}}` or the bare object).
pub fn normalize_entity(body: Value) -> Value {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(inner @ Value::Object(_)) => inner,
            Some(other) => {
                map.insert("data".to_string(), other);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

/// Convert raw records into items, dropping records without a usable id.
pub fn into_items(records: Vec<Value>) -> Vec<ListItem> {
    let mut items = Vec::with_capacity(records.len());
    for record in records {
        match ListItem::from_value(record) {
            Ok(item) => items.push(item),
            Err(err) => warn!(error = %err, "dropping record from list response"),
        }
    }
    items
}

/// Turn an envelope into the page requested by `query`.
///
/// Server-paginated envelopes are trusted as-is (capped at the page size).
/// Without a reported total the records are the whole collection and the
/// shared query engine cuts the page locally.
pub fn page_from_envelope(
    envelope: ListEnvelope,
    query: &QueryDescriptor,
    search_fields: &[String],
) -> Page {
    let mut items = into_items(envelope.records);

    let Some(total) = envelope.total else {
        debug!(records = items.len(), "applying query locally to unpaginated response");
        return apply_query(&items, query, search_fields);
    };

    if items.len() > query.page_size {
        debug!(
            received = items.len(),
            page_size = query.page_size,
            "server returned more items than requested"
        );
        items.truncate(query.page_size);
    }

    Page {
        items,
        total,
        page: envelope.page.unwrap_or(query.page).max(1),
        total_pages: envelope
            .total_pages
            .unwrap_or_else(|| total_pages_for(total, query.page_size))
            .max(1),
    }
}

fn read_count(map: &Map<String, Value>, key: &str) -> Option<usize> {
    match map.get(key)? {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
