use crate::LookupError;

/// Decoded condition pictogram, RGBA8 row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherIcon {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 4]>,
}

impl WeatherIcon {
    /// Decode raw image bytes (PNG as served by the provider).
    pub fn decode(bytes: &[u8]) -> Result<Self, LookupError> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = image.dimensions();
        let pixels = image.pixels().map(|p| p.0).collect();

        Ok(Self { width, height, pixels })
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Nearest-neighbour resample to `width` columns, keeping the aspect ratio.
    pub fn scaled_to_width(&self, width: u32) -> Self {
        if self.width == 0 || self.height == 0 || width == 0 {
            return Self { width: 0, height: 0, pixels: Vec::new() };
        }

        let height = ((self.height as u64 * width as u64) / self.width as u64).max(1) as u32;
        let mut pixels = Vec::with_capacity((width * height) as usize);

        for y in 0..height {
            let sy = (y as u64 * self.height as u64 / height as u64) as u32;
            for x in 0..width {
                let sx = (x as u64 * self.width as u64 / width as u64) as u32;
                pixels.push(self.pixel(sx, sy).unwrap_or([0, 0, 0, 0]));
            }
        }

        Self { width, height, pixels }
    }
}

/// Icon codes look like `01d` / `10n`; anything else would end up spliced
/// into a URL path, so it is rejected before a request is made.
pub fn validate_icon_code(code: &str) -> Result<&str, LookupError> {
    if !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(code)
    } else {
        Err(LookupError::Unexpected(format!("invalid icon code '{code}'")))
    }
}

/// `<base>/img/wn/<code>@2x.png`
pub fn icon_url(base: &str, code: &str) -> Result<String, LookupError> {
    let code = validate_icon_code(code)?;
    Ok(format!("{}/img/wn/{code}@2x.png", base.trim_end_matches('/')))
}

#[cfg(test)]
pub(crate) fn png_fixture(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    use std::io::Cursor;

    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("encode png fixture");
    buf
}
