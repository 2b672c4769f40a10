//! Pure box and point helpers shared by the rule passes.

use crate::bbox::{BBox, Ltrb};
use nalgebra as na;

/// Axis-aligned intersection-over-union of two boxes, in `[0, 1]`.
///
/// Degenerate pairs whose union has no area yield `0.0`.
pub fn intersection_over_union(a: &BBox<Ltrb>, b: &BBox<Ltrb>) -> f32 {
    let i_left = a.left().max(b.left());
    let i_top = a.top().max(b.top());
    let i_right = a.right().min(b.right());
    let i_bottom = a.bottom().min(b.bottom());

    let intersection = (i_right - i_left).max(0.0) * (i_bottom - i_top).max(0.0);
    let union = a.area() + b.area() - intersection;

    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}

/// Width over height; `0.0` for a box without height.
pub fn aspect_ratio(bbox: &BBox<Ltrb>) -> f32 {
    let h = bbox.height();

    if h > 0.0 {
        bbox.width() / h
    } else {
        0.0
    }
}

#[inline]
pub fn displacement(from: &na::Point2<f32>, to: &na::Point2<f32>) -> f32 {
    na::distance(from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iou_of_box_with_itself_is_one() {
        let boxes = [
            BBox::ltrb(0.0, 0.0, 10.0, 10.0),
            BBox::ltrb(120.5, 40.0, 380.0, 200.25),
            BBox::ltrb(3.0, 7.0, 4.0, 1000.0),
        ];

        for b in boxes.iter() {
            assert_eq!(intersection_over_union(b, b), 1.0);
        }
    }

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        let a = BBox::ltrb(0.0, 0.0, 10.0, 10.0);
        let b = BBox::ltrb(20.0, 0.0, 30.0, 10.0);
        let c = BBox::ltrb(0.0, 10.0, 10.0, 20.0);

        assert_eq!(intersection_over_union(&a, &b), 0.0);
        // touching edges share no area
        assert_eq!(intersection_over_union(&a, &c), 0.0);
    }

    #[test]
    fn iou_partial_overlap() {
        let a = BBox::ltrb(0.0, 0.0, 10.0, 10.0);
        let b = BBox::ltrb(5.0, 0.0, 15.0, 10.0);

        let iou = intersection_over_union(&a, &b);
        assert!((iou - 50.0 / 150.0).abs() < 1e-6);
    }

    #[test]
    fn iou_of_degenerate_boxes_is_zero() {
        let a = BBox::ltrb(5.0, 5.0, 5.0, 5.0);

        assert_eq!(intersection_over_union(&a, &a), 0.0);
    }

    #[test]
    fn aspect_ratio_handles_zero_height() {
        assert_eq!(aspect_ratio(&BBox::ltrb(0.0, 0.0, 40.0, 10.0)), 4.0);
        assert_eq!(aspect_ratio(&BBox::ltrb(0.0, 5.0, 40.0, 5.0)), 0.0);
    }

    #[test]
    fn displacement_is_euclidean() {
        let d = displacement(&na::Point2::new(0.0, 0.0), &na::Point2::new(3.0, 4.0));

        assert!((d - 5.0).abs() < 1e-6);
    }
}
