use crate::error::SceneError;
use image::ImageBuffer;
use std::path::Path;

/// Saves a u32 (0RGB) buffer to a PNG file.
pub fn save_buffer_to_image<P: AsRef<Path>>(
    buffer: &[u32],
    width: usize,
    height: usize,
    path: P,
) -> Result<(), SceneError> {
    let path = path.as_ref();
    let mut img_buf = ImageBuffer::new(width as u32, height as u32);

    for (x, y, pixel) in img_buf.enumerate_pixels_mut() {
        let idx = (y as usize) * width + (x as usize);
        let color_u32 = buffer.get(idx).copied().unwrap_or(0);

        let r = ((color_u32 >> 16) & 0xFF) as u8;
        let g = ((color_u32 >> 8) & 0xFF) as u8;
        let b = (color_u32 & 0xFF) as u8;

        *pixel = image::Rgb([r, g, b]);
    }

    img_buf.save(path).map_err(|source| SceneError::ImageWrite {
        path: path.display().to_string(),
        source,
    })
}
