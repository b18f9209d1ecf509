//! HTML rendering for the search results view.

use vitrin_commerce::search::SearchResult;
use vitrin_data::{Fit, ImageUrlBuilder};

use super::SearchState;

/// Target size for card thumbnails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
}

impl Default for Thumbnail {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
        }
    }
}

/// Render the results section for a state.
pub fn render_results(state: &SearchState, images: &ImageUrlBuilder, thumb: Thumbnail) -> String {
    let inner = match state {
        SearchState::Idle => render_prompt(),
        SearchState::Success { term, results } if term.trim().is_empty() && results.is_empty() => {
            render_prompt()
        }
        SearchState::Debouncing { term } | SearchState::Loading { term } => render_loading(term),
        SearchState::Success { term, results } if results.is_empty() => render_empty(term),
        SearchState::Success { term, results } => {
            let cards: String = results
                .iter()
                .map(|r| render_card(r, images, thumb))
                .collect();
            format!(
                r#"<p class="search-summary">"{}" için {} sonuç bulundu</p>
<div class="product-grid">{}</div>"#,
                html_escape(term),
                results.len(),
                cards
            )
        }
        SearchState::Error { message, .. } => format!(
            r#"<div class="search-error" role="alert"><p>{}</p></div>"#,
            html_escape(message)
        ),
    };

    format!(
        r#"<section class="search-results" data-section="results" aria-live="polite">{}</section>"#,
        inner
    )
}

/// Render one product card.
pub fn render_card(result: &SearchResult, images: &ImageUrlBuilder, thumb: Thumbnail) -> String {
    let thumbnail = result
        .image
        .as_ref()
        .and_then(|image| {
            let url = images
                .image(image)
                .ok()?
                .size(thumb.width, thumb.height)
                .fit(Fit::Crop)
                .to_string();
            let alt = image.alt.as_deref().unwrap_or(&result.name);
            Some(format!(
                r#"<img src="{}" alt="{}" width="{}" height="{}" loading="lazy">"#,
                html_escape(&url),
                html_escape(alt),
                thumb.width,
                thumb.height
            ))
        })
        .unwrap_or_else(|| r#"<div class="image-placeholder">Resim Yok</div>"#.to_string());

    let category = result
        .category_name
        .as_deref()
        .map(|c| format!(r#"<p class="product-category">{}</p>"#, html_escape(c)))
        .unwrap_or_default();

    format!(
        r#"<article class="product-card" data-product-id="{}">
    <a href="{}" class="product-link">
        <div class="product-image">{}</div>
        <div class="product-info">
            <h3 class="product-title">{}</h3>
            {}
            <div class="product-price">{}</div>
        </div>
    </a>
</article>"#,
        html_escape(result.id.as_str()),
        html_escape(&result.path()),
        thumbnail,
        html_escape(&result.name),
        category,
        result.price.display()
    )
}

fn render_prompt() -> String {
    r#"<p class="search-prompt">Aramak istediğiniz ürünün adını yazın.</p>"#.to_string()
}

fn render_loading(term: &str) -> String {
    format!(
        r#"<div class="search-loading"><span class="spinner" aria-hidden="true"></span> "{}" aranıyor...</div>"#,
        html_escape(term)
    )
}

fn render_empty(term: &str) -> String {
    format!(
        r#"<p class="search-empty">"{}" için sonuç bulunamadı.</p>"#,
        html_escape(term)
    )
}

/// Full search page: header, search form and results section.
pub fn render_page(state: &SearchState, images: &ImageUrlBuilder, thumb: Thumbnail) -> String {
    let term = state.term();
    let title = if term.trim().is_empty() {
        "Arama".to_string()
    } else {
        format!("{} - Arama Sonuçları", html_escape(term))
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="tr">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
</head>
<body>
<header class="site-header">
    <a href="/" class="logo">Vitrin</a>
    <form action="/arama-sonuclari" method="GET" class="search-form" role="search">
        <input type="search" name="q" value="{}" placeholder="Ürün ara..." aria-label="Ürün ara">
        <button type="submit">Ara</button>
    </form>
</header>
<main>
{}
</main>
</body>
</html>"#,
        title,
        html_escape(term),
        render_results(state, images, thumb)
    )
}

/// Escape text for HTML bodies and double-quoted attributes.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
