use chroma_detection::color::{hsv_to_rgb, ColorRange};
use image::{imageops, Rgb, RgbImage};

// Renders the selected hue band as a 1-pixel-tall strip: column j shows the
// pure color at hue lower + j, saturation and value at maximum. A degenerate
// range renders as an empty image rather than failing.
pub fn render(range: &ColorRange) -> RgbImage {
    let span = range.hue_span() as u32;
    if span == 0 {
        return RgbImage::new(0, 0);
    }
    let base = range.hue_lower();
    RgbImage::from_fn(span, 1, |j, _| {
        let (r, g, b) = hsv_to_rgb(base + j as u8, 255, 255);
        Rgb([r, g, b])
    })
}

// Linearly resizes the strip to the caller's display size.
pub fn resize_to(spectrum: &RgbImage, width: u32, height: u32) -> RgbImage {
    if spectrum.width() == 0 || spectrum.height() == 0 || width == 0 || height == 0 {
        return RgbImage::new(0, 0);
    }
    imageops::resize(spectrum, width, height, imageops::FilterType::Triangle)
}
