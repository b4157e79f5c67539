use image::RgbImage;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::matrix::Mat;
use crate::skeleton::SkeletonNode;

/// Which way the subject faces the camera in a frame.
///
/// Persisted as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Front,
    Back,
    Side,
}

impl Facing {
    pub fn code(self) -> i32 {
        match self {
            Facing::Front => 0,
            Facing::Back => 1,
            Facing::Side => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Facing::Front),
            1 => Some(Facing::Back),
            2 => Some(Facing::Side),
            _ => None,
        }
    }
}

impl Serialize for Facing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.code().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Facing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = i32::deserialize(deserializer)?;
        Facing::from_code(code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown facing code {code}")))
    }
}

/// A raster crop plus its placement inside the full-resolution canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct CroppedImage {
    pub image: RgbImage,
    /// Top-left corner of the crop in canvas pixels.
    pub offset: [i32; 2],
    /// Width and height of the crop.
    pub size: [i32; 2],
}

impl CroppedImage {
    /// Crop whose size is taken from the image dimensions.
    pub fn new(image: RgbImage, offset: [i32; 2]) -> Self {
        let size = [image.width() as i32, image.height() as i32];
        Self {
            image,
            offset,
            size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }
}

/// One processed capture frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameData {
    /// Camera pose, 4x4.
    pub camera_extrinsic: Mat,
    /// Camera intrinsics, 3x3 or 3x4.
    pub camera_intrinsic: Mat,
    pub skeleton: SkeletonNode,
    pub facing: Facing,
    /// Full-body crop.
    pub body_image: CroppedImage,
    /// Per-body-part crops: empty, or one slot per body part. Only cluster
    /// representative frames carry populated slots.
    pub body_part_images: Vec<Option<CroppedImage>>,
}

impl FrameData {
    pub fn body_part_image(&self, body_part: usize) -> Option<&CroppedImage> {
        self.body_part_images.get(body_part).and_then(Option::as_ref)
    }

    /// Store a body-part crop, growing the slot list to `body_part_count`
    /// the first time a slot is written.
    pub fn set_body_part_image(
        &mut self,
        body_part: usize,
        body_part_count: usize,
        image: CroppedImage,
    ) {
        if self.body_part_images.len() < body_part_count {
            self.body_part_images.resize(body_part_count, None);
        }
        self.body_part_images[body_part] = Some(image);
    }

    pub fn has_body_part_images(&self) -> bool {
        self.body_part_images.iter().any(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> FrameData {
        FrameData {
            camera_extrinsic: Mat::identity(4),
            camera_intrinsic: Mat::identity(3),
            skeleton: SkeletonNode::new("root", Mat::identity(4)),
            facing: Facing::Front,
            body_image: CroppedImage::new(RgbImage::new(2, 3), [5, 7]),
            body_part_images: Vec::new(),
        }
    }

    #[test]
    fn facing_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Facing::Side).unwrap(), "2");
        let back: Facing = serde_json::from_str("1").unwrap();
        assert_eq!(back, Facing::Back);
        assert!(serde_json::from_str::<Facing>("9").is_err());
    }

    #[test]
    fn cropped_size_from_image() {
        let img = CroppedImage::new(RgbImage::new(4, 2), [1, 1]);
        assert_eq!(img.size, [4, 2]);
        assert!(!img.is_empty());
        assert!(CroppedImage::new(RgbImage::new(0, 2), [0, 0]).is_empty());
    }

    #[test]
    fn body_part_slots_grow_lazily() {
        let mut f = frame();
        assert!(f.body_part_image(1).is_none());
        f.set_body_part_image(1, 3, CroppedImage::new(RgbImage::new(1, 1), [0, 0]));
        assert_eq!(f.body_part_images.len(), 3);
        assert!(f.body_part_image(0).is_none());
        assert!(f.body_part_image(1).is_some());
        assert!(f.has_body_part_images());
    }
}
