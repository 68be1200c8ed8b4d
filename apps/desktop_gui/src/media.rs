//! Recipe image decoding for card thumbnails.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

/// Longest edge of a decoded card thumbnail, in pixels.
pub const THUMBNAIL_MAX_EDGE: u32 = 480;

pub fn decode_preview_image(bytes: &[u8]) -> Result<PreviewImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let resized = if dynamic.width() > THUMBNAIL_MAX_EDGE || dynamic.height() > THUMBNAIL_MAX_EDGE {
        dynamic
            .thumbnail(THUMBNAIL_MAX_EDGE, THUMBNAIL_MAX_EDGE)
            .to_rgba8()
    } else {
        dynamic.to_rgba8()
    };
    Ok(PreviewImage {
        width: resized.width() as usize,
        height: resized.height() as usize,
        rgba: resized.into_raw(),
    })
}
