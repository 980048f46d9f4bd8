use std::io::Cursor;

use base64::{engine::general_purpose, Engine as _};

use crate::policy::is_valid_media_type;

/// Longest edge of generated thumbnails, in pixels.
pub const THUMBNAIL_EDGE: u32 = 320;

/// Builds a `data:` URL preview for image files; other files get none.
///
/// Images the decoder cannot read are embedded as-is so that every image
/// still has a preview.
pub fn create_preview(media_type: &str, bytes: &[u8]) -> Option<String> {
    if !media_type.starts_with("image/") {
        return None;
    }

    match thumbnail_png(bytes) {
        Ok(png) => Some(data_url("image/png", &png)),
        Err(err) => {
            tracing::debug!(%media_type, error = %err, "thumbnail failed, embedding original");
            let embedded_type = if is_valid_media_type(media_type) {
                media_type
            } else {
                "application/octet-stream"
            };
            Some(data_url(embedded_type, bytes))
        }
    }
}

fn thumbnail_png(bytes: &[u8]) -> image::ImageResult<Vec<u8>> {
    let img = image::load_from_memory(bytes)?;
    let thumb = img.thumbnail(THUMBNAIL_EDGE, THUMBNAIL_EDGE);

    let mut png = Vec::new();
    thumb.write_to(&mut Cursor::new(&mut png), image::ImageOutputFormat::Png)?;
    Ok(png)
}

pub fn data_url(media_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        media_type,
        general_purpose::STANDARD.encode(bytes)
    )
}
