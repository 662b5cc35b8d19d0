//! Vision board
//!
//! Mocked image generation. Generated items carry a placeholder URL picked
//! from a static pool; no request ever leaves the process.

use chrono::Utc;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

/// Placeholder pool for mocked generation
const PLACEHOLDER_URLS: &[&str] = &[
    "https://images.unsplash.com/photo-1484480974693-6ca0a78fb36b?auto=format&fit=crop&q=80&w=2072",
    "https://picsum.photos/seed/orbit-dawn/2072/1380",
    "https://picsum.photos/seed/orbit-summit/2072/1380",
    "https://picsum.photos/seed/orbit-harbor/2072/1380",
];

/// Requested render size for a vision board image
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSize {
    #[default]
    #[serde(rename = "1K")]
    Standard1K,
    #[serde(rename = "2K")]
    High2K,
    #[serde(rename = "4K")]
    Ultra4K,
}

impl std::str::FromStr for ImageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "ImageSize::from_str: called");
        match s.to_uppercase().as_str() {
            "1K" => Ok(Self::Standard1K),
            "2K" => Ok(Self::High2K),
            "4K" => Ok(Self::Ultra4K),
            _ => {
                debug!(%s, "ImageSize::from_str: unknown size");
                Err(format!("Unknown image size: {}. Use: 1K, 2K, or 4K", s))
            }
        }
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard1K => write!(f, "1K"),
            Self::High2K => write!(f, "2K"),
            Self::Ultra4K => write!(f, "4K"),
        }
    }
}

/// One generated vision board entry
#[derive(Debug, Clone, Serialize)]
pub struct VisionBoardItem {
    /// Unique item id
    pub id: String,
    /// Placeholder image URL
    pub image_url: String,
    /// The prompt the user described their vision with
    pub prompt: String,
    /// Requested render size
    pub size: ImageSize,
    /// Unix timestamp in milliseconds
    pub created_at: i64,
}

/// Per-session vision board, newest item last
#[derive(Debug, Default)]
pub struct VisionBoard {
    items: Vec<VisionBoardItem>,
}

impl VisionBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate an image for the prompt and record it on the board
    ///
    /// Generation is mocked: the URL comes from a static placeholder pool.
    pub fn generate(&mut self, prompt: &str, size: ImageSize) -> VisionBoardItem {
        let item = VisionBoardItem {
            id: Uuid::now_v7().to_string(),
            image_url: pick_placeholder().to_string(),
            prompt: prompt.trim().to_string(),
            size,
            created_at: Utc::now().timestamp_millis(),
        };
        info!(id = item.id, %size, "Generated vision board item");
        self.items.push(item.clone());
        item
    }

    /// All items, oldest first
    pub fn items(&self) -> &[VisionBoardItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn pick_placeholder() -> &'static str {
    let mut rng = rand::rng();
    PLACEHOLDER_URLS.choose(&mut rng).copied().unwrap_or(PLACEHOLDER_URLS[0])
}
