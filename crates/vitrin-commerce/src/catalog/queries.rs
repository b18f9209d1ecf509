//! Catalog queries.

use super::Slug;
use crate::search::{DocumentQuery, Field, Filter, SortOption};

/// Product listing card. `publishedAt` is needed to hide scheduled products.
pub const PRODUCT_CARD: &str = "{_id, name, slug, price, images, stock, isFeatured, \
     publishedAt, category->{_id, title, slug}}";

/// Product detail page.
pub const PRODUCT_DETAIL: &str = "{_id, name, slug, price, images, stock, isFeatured, \
     publishedAt, description, details, care, category->{_id, title, slug}}";

pub const CATEGORY: &str = "{_id, title, slug, description}";

/// Every product, as cards.
pub fn all_products() -> DocumentQuery {
    DocumentQuery::new("product").project(PRODUCT_CARD)
}

/// Products flagged for the home page.
pub fn featured_products() -> DocumentQuery {
    DocumentQuery::new("product")
        .with_filter(Filter::is_true(Field::FEATURED))
        .project(PRODUCT_CARD)
}

/// A single product by slug.
pub fn product_by_slug(slug: &Slug) -> DocumentQuery {
    DocumentQuery::new("product")
        .with_filter(Filter::equals(Field::SLUG, "slug", slug.as_str()))
        .first()
        .project(PRODUCT_DETAIL)
}

/// Every category, A-Z.
pub fn all_categories() -> DocumentQuery {
    DocumentQuery::new("category")
        .with_sort(SortOption::TitleAsc)
        .project(CATEGORY)
}

pub fn category_by_slug(slug: &Slug) -> DocumentQuery {
    DocumentQuery::new("category")
        .with_filter(Filter::equals(Field::SLUG, "slug", slug.as_str()))
        .first()
        .project(CATEGORY)
}

/// Products whose category has the given slug.
pub fn products_in_category(slug: &Slug) -> DocumentQuery {
    DocumentQuery::new("product")
        .with_filter(Filter::equals(Field::CATEGORY_SLUG, "slug", slug.as_str()))
        .with_sort(SortOption::NameAsc)
        .project(PRODUCT_CARD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_featured_products_groq() {
        let groq = featured_products().to_groq();
        assert!(groq
            .query
            .starts_with(r#"*[_type == "product" && isFeatured == true] {_id"#));
    }

    #[test]
    fn test_product_by_slug_binds_slug() {
        let slug = Slug::parse("bez-canta").unwrap();
        let groq = product_by_slug(&slug).to_groq();

        assert!(groq
            .query
            .starts_with(r#"*[_type == "product" && slug.current == $slug][0] {"#));
        assert!(groq.query.contains("care"));
        assert_eq!(groq.params["slug"], json!("bez-canta"));
    }

    #[test]
    fn test_products_in_category_filters_through_reference() {
        let slug = Slug::parse("cantalar").unwrap();
        let query = products_in_category(&slug);
        let groq = query.to_groq();

        assert!(groq.query.contains("category->slug.current == $slug"));
        assert!(query.matches(&json!({
            "_type": "product",
            "category": { "slug": { "current": "cantalar" } }
        })));
    }

    #[test]
    fn test_all_categories_sorted() {
        assert!(all_categories().to_groq().query.contains("| order(title asc)"));
    }

    #[test]
    fn test_product_projections_carry_publish_date() {
        for query in [all_products(), featured_products(), product_by_slug(&Slug::parse("x").unwrap())] {
            assert!(query.projected_fields().contains(&"publishedAt"), "{}", query.projection);
        }
    }
}
