use eframe::egui::{ColorImage, TextureHandle};

use crate::thumbnail::{FetchError, FetchedThumbnail, Quality};

/// Load state of one thumbnail card
pub enum CardState {
    /// Image request still running
    Loading,
    /// Image decoded and uploaded
    Loaded {
        texture: TextureHandle,
        pixels: ColorImage,
        /// Encoded bytes as served, written out by Download
        bytes: Vec<u8>,
    },
}

/// One quality tier shown in the thumbnails grid
pub struct ThumbnailCard {
    pub quality: Quality,
    pub url: String,
    pub state: CardState,
}

impl ThumbnailCard {
    pub fn loading(quality: Quality, url: &str) -> Self {
        Self {
            quality,
            url: url.to_string(),
            state: CardState::Loading,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, CardState::Loading)
    }
}

/// Result of a background thumbnail load, tagged with the lookup it belongs to
pub struct LoadResult {
    pub generation: u64,
    pub quality: Quality,
    pub result: Result<FetchedThumbnail, FetchError>,
}

/// Message shown under the URL field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Info(String),
}
