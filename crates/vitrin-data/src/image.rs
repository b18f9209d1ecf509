//! Image reference resolution.
//!
//! Asset references look like `image-<assetId>-<W>x<H>-<ext>` and map to
//! `https://<host>/images/<project>/<dataset>/<assetId>-<W>x<H>.<ext>`.

use std::fmt;

use vitrin_commerce::catalog::ImageRef;
use vitrin_core::StoreConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageError {
    #[error("Malformed image reference: {0}")]
    MalformedReference(String),

    #[error("Image has no asset")]
    MissingAsset,
}

/// A parsed asset reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
}

impl ImageAsset {
    pub fn parse(reference: &str) -> Result<Self, ImageError> {
        let malformed = || ImageError::MalformedReference(reference.to_string());

        let rest = reference.strip_prefix("image-").ok_or_else(malformed)?;
        let (rest, format) = rest.rsplit_once('-').ok_or_else(malformed)?;
        let (id, dimensions) = rest.rsplit_once('-').ok_or_else(malformed)?;
        let (width, height) = dimensions.split_once('x').ok_or_else(malformed)?;

        let width: u32 = width.parse().map_err(|_| malformed())?;
        let height: u32 = height.parse().map_err(|_| malformed())?;

        let valid = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid(id) || !valid(format) {
            return Err(malformed());
        }

        Ok(Self {
            id: id.to_string(),
            width,
            height,
            format: format.to_string(),
        })
    }

    /// File name on the image CDN, e.g. `a1b2-800x600.jpg`.
    pub fn file_name(&self) -> String {
        format!("{}-{}x{}.{}", self.id, self.width, self.height, self.format)
    }
}

/// How the image is fitted to the requested box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    Clip,
    Crop,
    Max,
}

impl Fit {
    fn as_str(&self) -> &'static str {
        match self {
            Fit::Clip => "clip",
            Fit::Crop => "crop",
            Fit::Max => "max",
        }
    }
}

/// Builds image URLs for one project and dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrlBuilder {
    host: String,
    project_id: String,
    dataset: String,
}

impl ImageUrlBuilder {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            host: config.image_host.clone(),
            project_id: config.project_id.clone(),
            dataset: config.dataset.clone(),
        }
    }

    /// Start a URL for an image field.
    pub fn image(&self, image: &ImageRef) -> Result<ImageUrl, ImageError> {
        let reference = image.reference().ok_or(ImageError::MissingAsset)?;
        self.reference(reference)
    }

    /// Start a URL for a raw asset reference.
    pub fn reference(&self, reference: &str) -> Result<ImageUrl, ImageError> {
        let asset = ImageAsset::parse(reference)?;
        Ok(ImageUrl {
            base: format!(
                "https://{}/images/{}/{}/{}",
                self.host,
                self.project_id,
                self.dataset,
                asset.file_name()
            ),
            width: None,
            height: None,
            fit: None,
        })
    }
}

/// An image URL with optional size hints. Render with `to_string()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrl {
    base: String,
    width: Option<u32>,
    height: Option<u32>,
    fit: Option<Fit>,
}

impl ImageUrl {
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn size(self, width: u32, height: u32) -> Self {
        self.width(width).height(height)
    }

    pub fn fit(mut self, fit: Fit) -> Self {
        self.fit = Some(fit);
        self
    }
}

impl fmt::Display for ImageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut params = Vec::new();
        if let Some(w) = self.width {
            params.push(format!("w={}", w));
        }
        if let Some(h) = self.height {
            params.push(format!("h={}", h));
        }
        if let Some(fit) = self.fit {
            params.push(format!("fit={}", fit.as_str()));
        }

        if params.is_empty() {
            write!(f, "{}", self.base)
        } else {
            write!(f, "{}?{}", self.base, params.join("&"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> ImageUrlBuilder {
        ImageUrlBuilder::new(&StoreConfig {
            project_id: "abc123".into(),
            ..StoreConfig::default()
        })
    }

    #[test]
    fn test_parse_reference() {
        let asset = ImageAsset::parse("image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg").unwrap();
        assert_eq!(asset.id, "Tb9Ew8CXIwaY6R1kjMvI0uRR");
        assert_eq!((asset.width, asset.height), (2000, 3000));
        assert_eq!(asset.format, "jpg");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "file-abc-10x10-pdf", "image-abc-10x10", "image-abc-10by10-png", "image--10x10-png"] {
            assert!(ImageAsset::parse(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_url_with_size_and_crop() {
        let url = builder()
            .reference("image-a1b2-800x600-jpg")
            .unwrap()
            .size(400, 300)
            .fit(Fit::Crop)
            .to_string();

        assert_eq!(
            url,
            "https://cdn.sanity.io/images/abc123/production/a1b2-800x600.jpg?w=400&h=300&fit=crop"
        );
    }

    #[test]
    fn test_url_without_hints() {
        let url = builder().image(&ImageRef::new("image-x9-10x20-png")).unwrap().to_string();
        assert_eq!(url, "https://cdn.sanity.io/images/abc123/production/x9-10x20.png");
    }

    #[test]
    fn test_image_without_asset() {
        let image = ImageRef {
            asset: None,
            alt: None,
        };
        assert_eq!(builder().image(&image), Err(ImageError::MissingAsset));
    }
}
