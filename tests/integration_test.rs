//! End-to-end coverage of the pipeline through its public API only, over the
//! small concrete images used to pin down the algorithm's boundary behaviour.

use pixelart_vectorize::{vectorize, BoundaryKind, VectorizerConfig};

fn rows(pixels: &[&[[u8; 3]]]) -> Vec<Vec<[u8; 3]>> {
    pixels.iter().map(|row| row.to_vec()).collect()
}

#[test]
fn single_red_pixel_produces_a_single_closed_square_shape() {
    let image = rows(&[&[[255, 0, 0]]]);
    let shapes = vectorize(1, 1, &image, VectorizerConfig::default()).unwrap();

    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].color, [255, 0, 0]);
    assert!(shapes[0].holes.is_empty());
    assert_eq!(shapes[0].outer.degree(), 2);
    assert_eq!(shapes[0].outer.control_points().len(), 4);
}

#[test]
fn black_and_white_pair_produces_two_shapes_sharing_a_border() {
    let image = rows(&[&[[0, 0, 0], [255, 255, 255]]]);
    let shapes = vectorize(2, 1, &image, VectorizerConfig::default()).unwrap();

    assert_eq!(shapes.len(), 2);
    let colors: Vec<_> = shapes.iter().map(|s| s.color).collect();
    assert!(colors.contains(&[0, 0, 0]));
    assert!(colors.contains(&[255, 255, 255]));
    for shape in &shapes {
        assert_eq!(shape.outer.control_points().len(), 4);
    }
}

#[test]
fn uniform_grey_block_is_one_undivided_shape() {
    let image = rows(&[
        &[[128, 128, 128], [128, 128, 128]],
        &[[128, 128, 128], [128, 128, 128]],
    ]);
    let shapes = vectorize(2, 2, &image, VectorizerConfig::default()).unwrap();

    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].outer.control_points().len(), 4);
}

#[test]
fn four_distinct_corners_produce_four_shapes() {
    let image = rows(&[
        &[[255, 0, 0], [0, 255, 0]],
        &[[0, 0, 255], [255, 255, 0]],
    ]);
    let shapes = vectorize(2, 2, &image, VectorizerConfig::default()).unwrap();
    assert_eq!(shapes.len(), 4);
}

#[test]
fn checkerboard_tie_still_resolves_to_four_shapes() {
    let image = rows(&[&[[10, 10, 10], [240, 240, 240]], &[[240, 240, 240], [10, 10, 10]]]);
    let shapes = vectorize(2, 2, &image, VectorizerConfig::default()).unwrap();
    assert_eq!(shapes.len(), 4);
}

#[test]
fn a_a_b_row_merges_the_two_similar_pixels() {
    let image = rows(&[&[[10, 10, 10], [12, 11, 10], [250, 0, 0]]]);
    let shapes = vectorize(3, 1, &image, VectorizerConfig::default()).unwrap();
    assert_eq!(shapes.len(), 2);
    // Both the merged 2-pixel run and the lone pixel form simple rectangles:
    // the edge between the two merged pixels is interior and drops out of
    // the outline entirely, leaving 4 corners either way.
    for shape in &shapes {
        assert_eq!(shape.outer.control_points().len(), 4);
    }
}

#[test]
fn single_row_image_never_produces_holes() {
    let image = rows(&[&[[1, 2, 3], [4, 5, 6], [7, 8, 9], [9, 8, 7]]]);
    let shapes = vectorize(4, 1, &image, VectorizerConfig::default()).unwrap();
    for shape in &shapes {
        assert!(shape.holes.is_empty());
    }
}

#[test]
fn ring_shaped_region_produces_a_hole() {
    // A 3x3 frame of one colour around a single differently-coloured centre
    // pixel: the frame shape must report exactly one hole.
    let frame = [60, 60, 60];
    let center = [250, 10, 10];
    let image = rows(&[&[frame, frame, frame], &[frame, center, frame], &[frame, frame, frame]]);
    let shapes = vectorize(3, 3, &image, VectorizerConfig::default()).unwrap();

    assert_eq!(shapes.len(), 2);
    let ring = shapes.iter().find(|s| s.color == frame).expect("frame shape present");
    assert_eq!(ring.holes.len(), 1);
    let center_shape = shapes.iter().find(|s| s.color == center).expect("center shape present");
    assert!(center_shape.holes.is_empty());
}

#[test]
fn reproducible_across_repeated_runs_with_the_same_seed() {
    use pixelart_vectorize::vectorize_seeded;

    let image = rows(&[&[[12, 200, 40], [12, 200, 40], [250, 10, 10]], &[[12, 200, 40], [12, 200, 40], [250, 10, 10]]]);
    let a = vectorize_seeded(3, 2, &image, VectorizerConfig::default(), 123).unwrap();
    let b = vectorize_seeded(3, 2, &image, VectorizerConfig::default(), 123).unwrap();

    assert_eq!(a.len(), b.len());
    for (sa, sb) in a.iter().zip(b.iter()) {
        assert_eq!(sa.color, sb.color);
        assert_eq!(sa.outer.control_points(), sb.outer.control_points());
    }
}

#[test]
fn outer_and_hole_boundaries_are_tagged_consistently() {
    // Smoke-test that BoundaryKind is a meaningful re-export even though
    // VectorShape only surfaces already-split outer/holes; callers who want
    // the raw kind can still match on it (e.g. future renderers).
    let outer = BoundaryKind::Outer;
    let hole = BoundaryKind::Hole;
    assert_ne!(outer, hole);
}
