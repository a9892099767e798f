//! Image rendering for stored regions using tiny-skia
//!
//! These functions draw region overlays onto an RgbaImage in image space,
//! for exporting an annotated copy of a page.

use image::RgbaImage;
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::geometry::{overlay, stroke_scale};
use crate::config::OverlayColor;
use crate::domain::{AnnotatedRegion, RegionStatus};

/// Convert RgbaImage to Pixmap, apply drawing function, and copy back
fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) {
    let (w, h) = (img.width(), img.height());
    let Some(size) = tiny_skia::IntSize::from_wh(w, h) else {
        return;
    };
    let Some(mut pixmap) = Pixmap::from_vec(img.as_raw().clone(), size) else {
        return;
    };

    f(&mut pixmap);

    // Copy back
    img.copy_from_slice(pixmap.data());
}

fn region_path(stored: &AnnotatedRegion) -> Option<tiny_skia::Path> {
    let r = stored.region;
    let rect = tiny_skia::Rect::from_xywh(r.x as f32, r.y as f32, r.width as f32, r.height as f32)?;
    Some(PathBuilder::from_rect(rect))
}

/// Outline every region onto the page, with a translucent fill
///
/// Regions whose recognition failed are outlined in red.
pub fn draw_regions_on_image(
    img: &mut RgbaImage,
    regions: &[AnnotatedRegion],
    color: OverlayColor,
    shadow: bool,
) {
    if regions.is_empty() {
        return;
    }

    let scale = stroke_scale(img.width(), img.height());
    with_pixmap(img, |pixmap| {
        let thickness = overlay::THICKNESS * scale;
        let border_thickness = overlay::BORDER_THICKNESS * scale;

        for stored in regions {
            let Some(path) = region_path(stored) else {
                continue;
            };

            let [r, g, b, _] = match stored.status {
                RegionStatus::Failed(_) => {
                    let [r, g, b] = overlay::FAILED_RGB;
                    [r, g, b, 255]
                }
                _ => color.to_rgba_u8(255),
            };

            let mut fill = Paint::default();
            fill.set_color_rgba8(r, g, b, overlay::FILL_ALPHA);
            pixmap.fill_path(
                &path,
                &fill,
                tiny_skia::FillRule::Winding,
                Transform::identity(),
                None,
            );

            // Draw shadow first
            if shadow {
                let mut paint = Paint::default();
                paint.set_color_rgba8(0, 0, 0, overlay::BORDER_ALPHA);
                paint.anti_alias = true;

                let stroke = Stroke {
                    width: border_thickness,
                    line_cap: LineCap::Square,
                    line_join: LineJoin::Miter,
                    ..Default::default()
                };
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }

            let mut paint = Paint::default();
            paint.set_color_rgba8(r, g, b, 255);
            paint.anti_alias = true;

            let stroke = Stroke {
                width: thickness,
                line_cap: LineCap::Square,
                line_join: LineJoin::Miter,
                ..Default::default()
            };
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Region;

    fn white(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, image::Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn test_regions_outlined_in_image_space() {
        let mut img = white(100, 100);
        let regions = vec![AnnotatedRegion::new(Region::new(20, 20, 40, 40))];
        let color = OverlayColor {
            r: 0.0,
            g: 0.0,
            b: 1.0,
        };
        draw_regions_on_image(&mut img, &regions, color, false);

        // on the left edge: solid blue stroke
        let edge = img.get_pixel(20, 40);
        assert!(edge[2] > 200 && edge[0] < 60, "edge pixel {edge:?}");
        // inside: tinted but not opaque
        let inside = img.get_pixel(40, 40);
        assert!(inside[0] < 255 && inside[0] > 150, "inside pixel {inside:?}");
        // outside: untouched
        assert_eq!(*img.get_pixel(90, 90), image::Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_failed_region_drawn_in_red() {
        let mut img = white(100, 100);
        let mut failed = AnnotatedRegion::new(Region::new(10, 10, 50, 50));
        failed.status = RegionStatus::Failed("timeout".to_string());
        draw_regions_on_image(&mut img, &[failed], OverlayColor::default(), false);

        let edge = img.get_pixel(10, 30);
        assert!(edge[0] > 180 && edge[2] < 80, "edge pixel {edge:?}");
    }

    #[test]
    fn test_no_regions_leaves_image_untouched() {
        let mut img = white(10, 10);
        draw_regions_on_image(&mut img, &[], OverlayColor::default(), true);
        assert_eq!(img, white(10, 10));
    }
}
