//! Editorial content: blog posts, authors and hero slides.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{Category, ImageRef, Slug};
use crate::ids::{PostId, SlideId};
use crate::search::{DocumentQuery, Field, Filter, SortOption};

/// Rich-text blocks, kept as raw JSON.
pub type PortableText = Vec<Value>;

/// Blog listing projection. `body` feeds the excerpt.
pub const POST_SUMMARY: &str =
    "{_id, title, slug, mainImage, publishedAt, body, author->{name, slug, image}}";

/// Full blog post projection.
pub const POST_DETAIL: &str = "{_id, title, slug, mainImage, publishedAt, body, \
     author->{name, slug, image, bio}, categories[]->{_id, title, slug}}";

pub const SLIDE: &str = "{_id, title, subtitle, image, buttonText, buttonLink, order}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub slug: Option<Slug>,
    #[serde(default)]
    pub image: Option<ImageRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bio: PortableText,
}

/// A blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: PostId,
    pub title: String,
    pub slug: Slug,
    #[serde(default)]
    pub main_image: Option<ImageRef>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<Category>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body: PortableText,
}

impl Post {
    /// Storefront path for the post.
    pub fn path(&self) -> String {
        format!("/blog/{}", self.slug)
    }

    /// Plain text of the body, cut to at most `max_chars` characters on a
    /// word boundary.
    pub fn excerpt(&self, max_chars: usize) -> String {
        let text = plain_text(&self.body);
        if text.chars().count() <= max_chars {
            return text;
        }
        let cut: String = text.chars().take(max_chars).collect();
        let cut = match cut.rfind(' ') {
            Some(idx) if idx > 0 => &cut[..idx],
            _ => cut.as_str(),
        };
        format!("{}…", cut.trim_end())
    }

    /// Publish date as `dd.mm.yyyy`.
    pub fn published_label(&self) -> Option<String> {
        self.published_at.map(|at| at.format("%d.%m.%Y").to_string())
    }
}

/// A hero slider item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderItem {
    #[serde(rename = "_id")]
    pub id: SlideId,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub image: Option<ImageRef>,
    #[serde(default)]
    pub button_text: Option<String>,
    #[serde(default)]
    pub button_link: Option<String>,
    #[serde(default)]
    pub order: i64,
}

/// Concatenate the text spans of every `block`, one paragraph per line.
pub fn plain_text(blocks: &[Value]) -> String {
    blocks
        .iter()
        .filter(|b| b.get("_type").and_then(Value::as_str) == Some("block"))
        .filter_map(|b| b.get("children").and_then(Value::as_array))
        .map(|children| {
            children
                .iter()
                .filter_map(|c| c.get("text").and_then(Value::as_str))
                .collect::<String>()
        })
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Posts, newest first.
pub fn all_posts() -> DocumentQuery {
    DocumentQuery::new("post")
        .with_sort(SortOption::Newest)
        .project(POST_SUMMARY)
}

pub fn post_by_slug(slug: &Slug) -> DocumentQuery {
    DocumentQuery::new("post")
        .with_filter(Filter::equals(Field::SLUG, "slug", slug.as_str()))
        .first()
        .project(POST_DETAIL)
}

/// Hero slides in manual order.
pub fn slider_items() -> DocumentQuery {
    DocumentQuery::new("sliderItem")
        .with_sort(SortOption::Position)
        .project(SLIDE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post() -> Post {
        serde_json::from_value(json!({
            "_id": "post-1",
            "title": "Bez çanta bakımı",
            "slug": { "current": "bez-canta-bakimi" },
            "publishedAt": "2025-03-04T10:00:00Z",
            "author": { "name": "Ayşe", "slug": { "current": "ayse" } },
            "categories": [{ "_id": "c1", "title": "Çantalar", "slug": { "current": "cantalar" } }],
            "body": [
                { "_type": "block", "children": [{ "text": "Soğuk suda " }, { "text": "yıkayın." }] },
                { "_type": "image", "asset": { "_ref": "image-x-10x10-png" } },
                { "_type": "block", "children": [{ "text": "Güneşte kurutmayın." }] }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_post_deserializes_with_author_and_categories() {
        let post = post();
        assert_eq!(post.author.as_ref().map(|a| a.name.as_str()), Some("Ayşe"));
        assert_eq!(post.categories[0].title, "Çantalar");
        assert_eq!(post.path(), "/blog/bez-canta-bakimi");
        assert_eq!(post.published_label().as_deref(), Some("04.03.2025"));
    }

    #[test]
    fn test_plain_text_skips_non_blocks() {
        assert_eq!(
            plain_text(&post().body),
            "Soğuk suda yıkayın.\nGüneşte kurutmayın."
        );
    }

    #[test]
    fn test_excerpt_cuts_on_word_boundary() {
        let post = post();
        assert_eq!(post.excerpt(500), "Soğuk suda yıkayın.\nGüneşte kurutmayın.");
        assert_eq!(post.excerpt(12), "Soğuk suda…");
    }

    #[test]
    fn test_listing_queries() {
        assert!(all_posts().to_groq().query.contains("| order(publishedAt desc)"));
        assert!(slider_items().to_groq().query.contains("| order(order asc)"));

        let slug = Slug::parse("bez-canta-bakimi").unwrap();
        let groq = post_by_slug(&slug).to_groq();
        assert!(groq.query.contains("categories[]->{_id, title, slug}"));
        assert_eq!(groq.params["slug"], json!("bez-canta-bakimi"));
    }

    #[test]
    fn test_slider_item_defaults() {
        let slide: SliderItem = serde_json::from_value(json!({
            "_id": "s1",
            "title": "Yaz koleksiyonu",
            "buttonLink": "/kategoriler/cantalar"
        }))
        .unwrap();
        assert_eq!(slide.order, 0);
        assert_eq!(slide.button_link.as_deref(), Some("/kategoriler/cantalar"));
    }
}
