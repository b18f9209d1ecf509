//! Document query builder.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::{Field, Filter};

/// Sort options for document listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOption {
    /// Store order; no `order()` stage.
    #[default]
    Unordered,
    /// Product name A-Z.
    NameAsc,
    /// Category title A-Z.
    TitleAsc,
    /// Newest published first.
    Newest,
    /// Manual position (slides).
    Position,
    /// Price, low to high.
    PriceAsc,
}

impl SortOption {
    /// Field and descending flag, or `None` for store order.
    pub fn key(&self) -> Option<(Field, bool)> {
        match self {
            SortOption::Unordered => None,
            SortOption::NameAsc => Some((Field::NAME, false)),
            SortOption::TitleAsc => Some((Field::TITLE, false)),
            SortOption::Newest => Some((Field::PUBLISHED_AT, true)),
            SortOption::Position => Some((Field::ORDER, false)),
            SortOption::PriceAsc => Some((Field::PRICE, false)),
        }
    }

    /// GROQ pipeline stage, e.g. ` | order(publishedAt desc)`.
    pub fn to_groq(&self) -> String {
        match self.key() {
            Some((field, desc)) => format!(
                " | order({} {})",
                field.groq,
                if desc { "desc" } else { "asc" }
            ),
            None => String::new(),
        }
    }

    /// Compare two resolved documents. Missing values sort last.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let Some((field, desc)) = self.key() else {
            return Ordering::Equal;
        };
        match (field.resolve(a), field.resolve(b)) {
            (Some(x), Some(y)) => {
                let ord = compare_values(x, y);
                if desc {
                    ord.reverse()
                } else {
                    ord
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// A rendered query: GROQ text plus bound parameters.
///
/// User input only ever appears in `params`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroqQuery {
    pub query: String,
    pub params: BTreeMap<String, Value>,
}

/// A structured query over one document type.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentQuery {
    /// The `_type` to select.
    pub doc_type: &'static str,
    /// Constraints, all of which must hold.
    pub filters: Vec<Filter>,
    /// Sort order.
    pub sort: SortOption,
    /// Only return the first match (or null).
    pub single: bool,
    /// GROQ projection, including braces. Empty means whole documents.
    pub projection: &'static str,
}

impl DocumentQuery {
    /// Select every document of a type.
    pub fn new(doc_type: &'static str) -> Self {
        Self {
            doc_type,
            filters: Vec::new(),
            sort: SortOption::Unordered,
            single: false,
            projection: "",
        }
    }

    /// Add a filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set sort option.
    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Return only the first match.
    pub fn first(mut self) -> Self {
        self.single = true;
        self
    }

    /// Set the projection.
    pub fn project(mut self, projection: &'static str) -> Self {
        self.projection = projection;
        self
    }

    /// Render to GROQ with bound parameters.
    pub fn to_groq(&self) -> GroqQuery {
        let mut params = BTreeMap::new();
        let mut clauses = vec![format!("_type == \"{}\"", self.doc_type)];
        for filter in &self.filters {
            clauses.push(filter.to_groq(&mut params));
        }

        let mut query = format!("*[{}]", clauses.join(" && "));
        query.push_str(&self.sort.to_groq());
        if self.single {
            query.push_str("[0]");
        }
        if !self.projection.is_empty() {
            query.push(' ');
            query.push_str(self.projection);
        }

        GroqQuery { query, params }
    }

    /// Top-level attribute names selected by the projection, e.g.
    /// `category` for `category->{_id, title}`. Empty when whole documents
    /// are returned.
    pub fn projected_fields(&self) -> Vec<&'static str> {
        let inner = self
            .projection
            .trim()
            .strip_prefix('{')
            .and_then(|p| p.strip_suffix('}'))
            .unwrap_or("");

        let mut fields = Vec::new();
        let mut depth = 0usize;
        let mut start = 0;
        for (i, c) in inner.char_indices() {
            match c {
                '{' | '[' => depth += 1,
                '}' | ']' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    fields.push(attribute_name(&inner[start..i]));
                    start = i + 1;
                }
                _ => {}
            }
        }
        fields.push(attribute_name(&inner[start..]));
        fields.retain(|f| !f.is_empty());
        fields
    }

    /// Keep only the projected top-level attributes of a resolved document.
    /// Attributes the document lacks are left out, as the store does.
    pub fn apply_projection(&self, doc: Value) -> Value {
        let fields = self.projected_fields();
        match doc {
            Value::Object(mut all) if !fields.is_empty() => Value::Object(
                fields
                    .into_iter()
                    .filter_map(|f| all.remove(f).map(|v| (f.to_string(), v)))
                    .collect(),
            ),
            other => other,
        }
    }

    /// Whether a resolved document satisfies the type and every filter.
    pub fn matches(&self, doc: &Value) -> bool {
        doc.get("_type").and_then(Value::as_str) == Some(self.doc_type)
            && self.filters.iter().all(|f| f.matches(doc))
    }
}

fn attribute_name(entry: &str) -> &str {
    let entry = entry.trim();
    let end = entry
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(entry.len());
    &entry[..end]
}
