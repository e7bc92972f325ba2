use std::time::Duration;

use eframe::egui::ColorImage;
use thiserror::Error;

use crate::resolver::VideoId;

/// Host serving the predictable per-video thumbnail files.
pub const THUMBNAIL_HOST: &str = "img.youtube.com";

/// Thumbnail resolution tier, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quality {
    Maxres,
    Hq,
    Mq,
    Sd,
    Default,
}

impl Quality {
    pub const ALL: [Quality; 5] = [
        Quality::Maxres,
        Quality::Hq,
        Quality::Mq,
        Quality::Sd,
        Quality::Default,
    ];

    /// Short label used in keys and download filenames.
    pub fn label(self) -> &'static str {
        match self {
            Quality::Maxres => "maxres",
            Quality::Hq => "hq",
            Quality::Mq => "mq",
            Quality::Sd => "sd",
            Quality::Default => "default",
        }
    }

    pub fn filename(self) -> &'static str {
        match self {
            Quality::Maxres => "maxresdefault.jpg",
            Quality::Hq => "hqdefault.jpg",
            Quality::Mq => "mqdefault.jpg",
            Quality::Sd => "sddefault.jpg",
            Quality::Default => "default.jpg",
        }
    }

    /// Human-readable tier name shown on the card.
    pub fn display_name(self) -> &'static str {
        match self {
            Quality::Maxres => "4K (Maximum Resolution)",
            Quality::Hq => "HD (High Quality)",
            Quality::Mq => "Medium Quality",
            Quality::Sd => "Standard Definition",
            Quality::Default => "Default Quality",
        }
    }
}

/// One address per quality tier, built fresh for each lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailSet {
    video_id: VideoId,
    entries: [(Quality, String); 5],
}

impl ThumbnailSet {
    pub fn video_id(&self) -> &VideoId {
        &self.video_id
    }

    pub fn get(&self, quality: Quality) -> &str {
        self.entries
            .iter()
            .find(|(q, _)| *q == quality)
            .map(|(_, url)| url.as_str())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Quality, &str)> {
        self.entries.iter().map(|(q, url)| (*q, url.as_str()))
    }

    /// Suggested filename when saving one tier to disk.
    pub fn download_name(&self, quality: Quality) -> String {
        format!("yt-thumbnail-{}-{}.jpg", self.video_id, quality.label())
    }
}

/// Substitutes the identifier into the fixed address template for every tier.
/// Performs no validation and no network access.
pub fn build_addresses(id: &VideoId) -> ThumbnailSet {
    let entries = Quality::ALL.map(|q| {
        (
            q,
            format!("https://{}/vi/{}/{}", THUMBNAIL_HOST, id, q.filename()),
        )
    });
    ThumbnailSet {
        video_id: id.clone(),
        entries,
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {0}")]
    Status(reqwest::StatusCode),
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),
}

/// A loaded thumbnail: raw bytes for saving, decoded pixels for display.
pub struct FetchedThumbnail {
    pub bytes: Vec<u8>,
    pub image: ColorImage,
}

/// Downloads and decodes one thumbnail address. Blocking; run it off the UI thread.
pub fn fetch_thumbnail(url: &str, timeout: Duration) -> Result<FetchedThumbnail, FetchError> {
    let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
    let resp = client.get(url).send()?;
    if !resp.status().is_success() {
        return Err(FetchError::Status(resp.status()));
    }
    let bytes = resp.bytes()?.to_vec();
    let image = decode_thumbnail(&bytes)?;
    Ok(FetchedThumbnail { bytes, image })
}

/// Converts encoded image bytes into an egui image without premultiplying alpha.
pub fn decode_thumbnail(bytes: &[u8]) -> Result<ColorImage, image::ImageError> {
    let img = image::load_from_memory(bytes)?.to_rgba8();
    let size = [img.width() as usize, img.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, &img))
}
