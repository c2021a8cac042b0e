use crate::config::{ConfigError, DetectionConfig};
use crate::frame::Frame;
use crate::sampler::{self, Rect, SampleError};
use crate::spectrum;
use chroma_detection::color::{self, hsv_to_rgb, ColorRange};
use chroma_detection::contour::{
    contours_from_mask, filter_by_relative_area, scale_points, Contour,
};
use chroma_detection::downsample::halve;
use chroma_detection::morphology::dilate;
use image::RgbImage;
use ndarray::Array2;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("frame has no pixels left after the {0}x downscale")]
    EmptyFrame(u32),
}

// What a color-selection event resolved to.
#[derive(Clone, Copy, Debug)]
pub struct Selection {
    pub mean_hsv: [u8; 3],
    pub display_rgb: [u8; 3],
}

// Intermediate images reused across process calls. Sized lazily on first
// use; a frame-size change reallocates, otherwise buffers are overwritten
// in place. Lifetime is the detection session.
struct Scratch {
    rgb: Array2<[u8; 3]>,
    pyramid: Vec<Array2<[u8; 3]>>,
    hsv: Array2<[u8; 3]>,
    mask: Array2<u8>,
    dilated: Array2<u8>,
}

impl Scratch {
    fn new() -> Self {
        Scratch {
            rgb: Array2::from_elem((0, 0), [0u8; 3]),
            pyramid: Vec::new(),
            hsv: Array2::from_elem((0, 0), [0u8; 3]),
            mask: Array2::zeros((0, 0)),
            dilated: Array2::zeros((0, 0)),
        }
    }
}

// One blob-detection session: holds the active color range, the rendered
// spectrum, and the scratch buffers. Invoked synchronously from a single
// frame-processing context; selection and processing both take &mut self,
// and the range is swapped wholesale so a frame never observes a half
// updated range.
pub struct ColorBlobDetector {
    config: DetectionConfig,
    range: Option<ColorRange>,
    selected_hsv: [u8; 3],
    selected_rgb: [u8; 3],
    spectrum: RgbImage,
    scratch: Scratch,
}

impl ColorBlobDetector {
    pub fn new(config: DetectionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            range: None,
            selected_hsv: [0; 3],
            selected_rgb: [0; 3],
            spectrum: RgbImage::new(0, 0),
            scratch: Scratch::new(),
        })
    }

    // Touch-to-color: average the touched region, derive fresh bounds,
    // rebuild the spectrum. A failed sample leaves the previous selection
    // fully intact.
    pub fn select_color(&mut self, frame: &Frame, rect: Rect) -> Result<Selection, SampleError> {
        let mean = sampler::sample_mean_hsv(frame, rect)?;
        self.set_hsv_color(mean);
        Ok(Selection {
            mean_hsv: mean,
            display_rgb: self.selected_rgb,
        })
    }

    // Programs the detector for a known HSV color. The new range replaces
    // the old one in a single assignment.
    pub fn set_hsv_color(&mut self, hsv: [u8; 3]) {
        let range = ColorRange::around(hsv, self.config.color_radius);
        let (r, g, b) = hsv_to_rgb(hsv[0], hsv[1], hsv[2]);

        self.spectrum = spectrum::render(&range);
        self.selected_hsv = hsv;
        self.selected_rgb = [r, g, b];
        self.range = Some(range);

        tracing::debug!(lower = ?range.lower, upper = ?range.upper, "color range updated");
    }

    // Runs the full pipeline on one frame: downscale, HSV conversion,
    // range threshold, dilation, contour extraction, relative-area filter,
    // rescale back to frame coordinates. Contours from the previous call
    // are not kept; each call returns a complete replacement.
    pub fn process(&mut self, frame: &Frame) -> Result<Vec<Contour>, DetectError> {
        let factor = self.config.downscale_factor;
        if frame.width / factor == 0 || frame.height / factor == 0 {
            return Err(DetectError::EmptyFrame(factor));
        }

        let range = match self.range {
            Some(range) => range,
            // No color picked yet: nothing to look for.
            None => return Ok(Vec::new()),
        };

        frame.write_rgb_array(&mut self.scratch.rgb);

        let steps = factor.trailing_zeros() as usize;
        if self.scratch.pyramid.len() != steps {
            self.scratch.pyramid = vec![Array2::from_elem((0, 0), [0u8; 3]); steps];
        }
        for i in 0..steps {
            if i == 0 {
                halve(self.scratch.rgb.view(), &mut self.scratch.pyramid[0]);
            } else {
                let (done, rest) = self.scratch.pyramid.split_at_mut(i);
                halve(done[i - 1].view(), &mut rest[0]);
            }
        }
        let working = if steps == 0 {
            &self.scratch.rgb
        } else {
            &self.scratch.pyramid[steps - 1]
        };

        color::hsv_map(working.view(), &mut self.scratch.hsv);
        color::threshold(self.scratch.hsv.view(), &range, &mut self.scratch.mask);
        dilate(self.scratch.mask.view(), &mut self.scratch.dilated);

        let contours = contours_from_mask(self.scratch.dilated.view());
        let mut kept = filter_by_relative_area(contours, self.config.min_contour_area_fraction);
        for contour in &mut kept {
            scale_points(contour, factor as i32);
        }

        tracing::debug!(contours = kept.len(), "frame processed");
        Ok(kept)
    }

    pub fn color_range(&self) -> Option<&ColorRange> {
        self.range.as_ref()
    }

    pub fn selected_hsv(&self) -> [u8; 3] {
        self.selected_hsv
    }

    // The picked color in display (RGB) space.
    pub fn selected_rgb(&self) -> [u8; 3] {
        self.selected_rgb
    }

    pub fn spectrum(&self) -> &RgbImage {
        &self.spectrum
    }

    // The spectrum strip scaled to a display size chosen by the caller.
    pub fn spectrum_scaled(&self, width: u32, height: u32) -> RgbImage {
        spectrum::resize_to(&self.spectrum, width, height)
    }
}

// Display form of a picked color, as shown next to the preview swatch.
pub fn hex_code(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}
