use chroma_core::{ColorBlobDetector, DetectionConfig, Frame, FrameConfig, PixelFormat, Rect};

const RED: [u8; 3] = [255, 0, 0];
const BLACK: [u8; 3] = [0, 0, 0];

fn frame_with_squares(size: u32, squares: &[(u32, u32, u32)]) -> Frame {
    let mut data = Vec::with_capacity((size * size * 3) as usize);
    for _ in 0..size * size {
        data.extend(BLACK);
    }
    for &(x0, y0, side) in squares {
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                let i = ((y * size + x) * 3) as usize;
                data[i..i + 3].copy_from_slice(&RED);
            }
        }
    }
    Frame::new(FrameConfig {
        data,
        width: size,
        height: size,
        format: PixelFormat::RGB8,
    })
    .unwrap()
}

#[test]
fn touching_a_red_square_outlines_it() {
    tracing_subscriber::fmt().with_test_writer().try_init().ok();

    let frame = frame_with_squares(256, &[(104, 104, 40)]);
    let mut detector = ColorBlobDetector::new(DetectionConfig::default()).unwrap();

    // Touch the middle of the square.
    let rect = Rect::around_touch(124, 124, 256, 256).unwrap();
    let selection = detector.select_color(&frame, rect).unwrap();
    assert_eq!(selection.mean_hsv, [0, 255, 255]);
    assert_eq!(selection.display_rgb, RED);
    assert_eq!(detector.spectrum().height(), 1);
    assert_eq!(detector.spectrum().width(), 25);

    let contours = detector.process(&frame).unwrap();
    assert_eq!(contours.len(), 1);

    // Downscaling and one dilation pass can move each edge by a few pixels.
    let (min_x, min_y, max_x, max_y) = contours[0].bounding_box().unwrap();
    assert!((min_x - 104).abs() <= 8, "left edge at {min_x}");
    assert!((min_y - 104).abs() <= 8, "top edge at {min_y}");
    assert!((max_x - 143).abs() <= 8, "right edge at {max_x}");
    assert!((max_y - 143).abs() <= 8, "bottom edge at {max_y}");
}

#[test]
fn noise_blob_is_filtered_out_by_the_adaptive_threshold() {
    // A dominant square plus a 4x4 speck of the same color; the speck's
    // area lands well below a tenth of the dominant one and is dropped.
    let frame = frame_with_squares(256, &[(104, 104, 40), (200, 200, 4)]);
    let mut detector = ColorBlobDetector::new(DetectionConfig::default()).unwrap();
    detector.set_hsv_color([0, 255, 255]);

    let contours = detector.process(&frame).unwrap();
    assert_eq!(contours.len(), 1);

    let (min_x, _, max_x, _) = contours[0].bounding_box().unwrap();
    assert!(min_x < 150 && max_x < 180, "kept contour is the big square");
}

#[test]
fn frame_without_the_selected_color_yields_an_empty_result() {
    let frame = frame_with_squares(256, &[]);
    let mut detector = ColorBlobDetector::new(DetectionConfig::default()).unwrap();
    detector.set_hsv_color([0, 255, 255]);

    let contours = detector.process(&frame).unwrap();
    assert!(contours.is_empty());
}

#[test]
fn results_are_replaced_on_every_call() {
    let with_square = frame_with_squares(256, &[(104, 104, 40)]);
    let without = frame_with_squares(256, &[]);
    let mut detector = ColorBlobDetector::new(DetectionConfig::default()).unwrap();
    detector.set_hsv_color([0, 255, 255]);

    assert_eq!(detector.process(&with_square).unwrap().len(), 1);
    assert!(detector.process(&without).unwrap().is_empty());
    assert_eq!(detector.process(&with_square).unwrap().len(), 1);
}

#[test]
fn downscale_factor_of_one_detects_at_full_resolution() {
    let config = DetectionConfig {
        downscale_factor: 1,
        ..DetectionConfig::default()
    };
    let frame = frame_with_squares(64, &[(16, 16, 16)]);
    let mut detector = ColorBlobDetector::new(config).unwrap();
    detector.set_hsv_color([0, 255, 255]);

    let contours = detector.process(&frame).unwrap();
    assert_eq!(contours.len(), 1);

    let (min_x, min_y, max_x, max_y) = contours[0].bounding_box().unwrap();
    // Only the single dilation pass widens the square here.
    assert_eq!((min_x, min_y), (15, 15));
    assert_eq!((max_x, max_y), (32, 32));
}
