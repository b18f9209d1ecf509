//! Search module.
//!
//! Contains term normalization, structured filters and the document query
//! builder shared by every content-store lookup.

mod filter;
mod query;
mod results;
mod term;

pub use filter::{Field, Filter};
pub use query::{DocumentQuery, GroqQuery, SortOption};
pub use results::SearchResult;
pub use term::{
    fold_diacritics, prefix_matches, searchable_tokens, store_lowercase, turkish_lowercase,
    SearchTerm,
};

/// Fields a product search term is matched against.
pub const SEARCH_FIELDS: [Field; 3] = [Field::NAME, Field::DESCRIPTION, Field::CATEGORY_TITLE];

/// Projection for product search. Product-shaped; the endpoint drops
/// unpublished hits and narrows the rest to [`SearchResult`]s.
pub const SEARCH_PROJECTION: &str = "{_id, name, slug, price, images, description, \
     publishedAt, category->{_id, title, slug}}";

/// Build the product search query for a normalized term.
///
/// Matches word prefixes of name, description or category title. The term
/// is sent in its Turkish-cased, store-lowered and folded spellings, so
/// `çanta` also finds text written `canta`. Results are ordered by name.
pub fn product_search(term: &SearchTerm) -> DocumentQuery {
    DocumentQuery::new("product")
        .with_filter(Filter::prefix_match(
            &SEARCH_FIELDS,
            vec![
                ("term", term.pattern()),
                ("lowered", term.lowered_pattern()),
                ("folded", term.folded_pattern()),
            ],
        ))
        .with_sort(SortOption::NameAsc)
        .project(SEARCH_PROJECTION)
}
