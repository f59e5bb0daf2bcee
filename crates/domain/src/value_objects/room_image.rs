use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult, require_text};

use super::ImageType;

/// A photo of a room, ordered for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ImageParts")]
pub struct RoomImage {
    url: String,
    order: u32,
    image_type: ImageType,
}

#[derive(Deserialize)]
struct ImageParts {
    url: String,
    order: u32,
    #[serde(default)]
    image_type: ImageType,
}

impl TryFrom<ImageParts> for RoomImage {
    type Error = DomainError;

    fn try_from(parts: ImageParts) -> Result<Self, Self::Error> {
        Ok(RoomImage::new(parts.url, parts.order)?.with_type(parts.image_type))
    }
}

impl RoomImage {
    /// Creates an image of type [`ImageType::Room`].
    pub fn new(url: impl AsRef<str>, order: u32) -> DomainResult<Self> {
        Ok(Self {
            url: require_text("image.url", url)?,
            order,
            image_type: ImageType::default(),
        })
    }

    pub fn with_type(mut self, image_type: ImageType) -> Self {
        self.image_type = image_type;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn image_type(&self) -> ImageType {
        self.image_type
    }
}
