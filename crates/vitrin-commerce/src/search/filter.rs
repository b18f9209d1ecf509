//! Document filters.
//!
//! Each filter renders to a GROQ constraint whose values travel as bound
//! parameters, and can also be evaluated directly against a JSON document
//! whose references have already been resolved.

use std::collections::BTreeMap;

use serde_json::Value;

use super::term::prefix_matches;

/// A document field, addressed both as a GROQ expression and as a JSON path
/// into a dereferenced document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// GROQ expression, e.g. `category->title`.
    pub groq: &'static str,
    /// Path into the resolved document, e.g. `["category", "title"]`.
    pub path: &'static [&'static str],
}

impl Field {
    pub const NAME: Field = Field::new("name", &["name"]);
    pub const TITLE: Field = Field::new("title", &["title"]);
    pub const DESCRIPTION: Field = Field::new("description", &["description"]);
    pub const SLUG: Field = Field::new("slug.current", &["slug", "current"]);
    pub const FEATURED: Field = Field::new("isFeatured", &["isFeatured"]);
    pub const PUBLISHED_AT: Field = Field::new("publishedAt", &["publishedAt"]);
    pub const ORDER: Field = Field::new("order", &["order"]);
    pub const PRICE: Field = Field::new("price", &["price"]);
    pub const EMAIL: Field = Field::new("email", &["email"]);
    pub const CATEGORY_TITLE: Field = Field::new("category->title", &["category", "title"]);
    pub const CATEGORY_SLUG: Field =
        Field::new("category->slug.current", &["category", "slug", "current"]);

    pub const fn new(groq: &'static str, path: &'static [&'static str]) -> Self {
        Self { groq, path }
    }

    /// Look the field up in a resolved document.
    pub fn resolve<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        self.path.iter().try_fold(doc, |value, key| value.get(*key))
    }
}

/// A constraint on documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Field equals a bound parameter.
    Equals {
        field: Field,
        param: &'static str,
        value: Value,
    },
    /// Field is the boolean `true`.
    IsTrue(Field),
    /// Any of `fields` word-prefix matches any of the patterns.
    ///
    /// Each pattern is `(param name, pattern)`, with `*` already appended
    /// to every word. Fields are lower-cased before matching.
    PrefixMatch {
        fields: Vec<Field>,
        patterns: Vec<(&'static str, String)>,
    },
}

impl Filter {
    /// Create an equality filter on a string parameter.
    pub fn equals(field: Field, param: &'static str, value: impl Into<String>) -> Self {
        Filter::Equals {
            field,
            param,
            value: Value::String(value.into()),
        }
    }

    /// Create a boolean flag filter.
    pub fn is_true(field: Field) -> Self {
        Filter::IsTrue(field)
    }

    /// Create a prefix match filter. Empty and duplicate patterns are
    /// dropped.
    pub fn prefix_match(fields: &[Field], patterns: Vec<(&'static str, String)>) -> Self {
        let mut deduped: Vec<(&'static str, String)> = Vec::with_capacity(patterns.len());
        for (param, pattern) in patterns {
            if !pattern.is_empty() && !deduped.iter().any(|(_, p)| *p == pattern) {
                deduped.push((param, pattern));
            }
        }
        Filter::PrefixMatch {
            fields: fields.to_vec(),
            patterns: deduped,
        }
    }

    /// Render the GROQ constraint, binding values into `params`.
    pub fn to_groq(&self, params: &mut BTreeMap<String, Value>) -> String {
        match self {
            Filter::Equals {
                field,
                param,
                value,
            } => {
                params.insert((*param).to_string(), value.clone());
                format!("{} == ${}", field.groq, param)
            }
            Filter::IsTrue(field) => format!("{} == true", field.groq),
            Filter::PrefixMatch { fields, patterns } => {
                let mut clauses = Vec::new();
                for (param, pattern) in patterns {
                    params.insert((*param).to_string(), Value::String(pattern.clone()));
                    for field in fields {
                        clauses.push(format!("lower({}) match ${}", field.groq, param));
                    }
                }
                if clauses.is_empty() {
                    return "false".to_string();
                }
                format!("({})", clauses.join(" || "))
            }
        }
    }

    /// Evaluate against a resolved document.
    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Filter::Equals { field, value, .. } => field.resolve(doc) == Some(value),
            Filter::IsTrue(field) => field.resolve(doc) == Some(&Value::Bool(true)),
            Filter::PrefixMatch { fields, patterns } => fields.iter().any(|field| {
                match field.resolve(doc).and_then(Value::as_str) {
                    Some(text) => patterns
                        .iter()
                        .any(|(_, pattern)| prefix_matches(pattern, text)),
                    None => false,
                }
            }),
        }
    }
}
