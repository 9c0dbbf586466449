use svgbake::{BakeOptions, scene_from_svg, transcode_to_string};

const SQUARE_BADGE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="48" height="48">
  <g transform="translate(4 4)" opacity="0.5">
    <path d="M0 0 L40 0 L40 40 L0 40 Z" fill="#ff0000" stroke="#000000" stroke-width="2"/>
  </g>
</svg>"##;

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn baked_icon_carries_state_diffed_instructions() {
    init_tracing();
    let scene = scene_from_svg(SQUARE_BADGE.as_bytes()).unwrap();
    let text = transcode_to_string(&scene, &BakeOptions::new("SquareBadge")).unwrap();

    assert!(text.contains("pub struct SquareBadge;"));
    assert!(text.contains("g.set_composite(Composite::src_over(0.5 * orig_alpha));"));
    assert!(text.contains("transforms.push(g.transform());"));
    assert!(text.contains("g.concat(Affine::new([1.0, 0.0, 0.0, 1.0, 4.0, 4.0]));"));
    assert!(text.contains("g.set_transform(transforms.pop().unwrap_or_default());"));
    assert!(text.contains("g.set_paint(Color::RED.into());"));
    assert!(text.contains("g.set_paint(Color::BLACK.into());"));
    assert!(text.contains("g.set_stroke(Stroke::new(2.0, Cap::Butt, Join::Miter, 4.0));"));

    // Fill and stroke painters share the source path's geometry, so it is
    // constructed exactly once.
    assert_eq!(count(&text, "shape = Shape::path(|p| {"), 1);
    assert_eq!(count(&text, "g.fill(&shape);"), 1);
    assert_eq!(count(&text, "g.draw(&shape);"), 1);
}

#[test]
fn one_drawing_instruction_per_painter_application() {
    let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="30" height="10">
      <rect x="0" y="0" width="10" height="10" fill="#ff0000"/>
      <rect x="10" y="0" width="10" height="10" fill="#ff0000"/>
      <rect x="20" y="0" width="10" height="10" fill="#ff0000"/>
    </svg>"##;
    let scene = scene_from_svg(svg.as_bytes()).unwrap();
    let text = transcode_to_string(&scene, &BakeOptions::new("Stripes")).unwrap();

    assert_eq!(count(&text, "g.fill(&shape);"), 3);
    // Same paint throughout: set once. Distinct geometries: built thrice.
    assert_eq!(count(&text, "g.set_paint("), 1);
    assert_eq!(count(&text, "shape = Shape::path(|p| {"), 3);
}

#[test]
fn transcoding_is_idempotent() {
    let scene = scene_from_svg(SQUARE_BADGE.as_bytes()).unwrap();
    let opts = BakeOptions::new("SquareBadge").namespace("ui::icons");
    let first = transcode_to_string(&scene, &opts).unwrap();
    let second = transcode_to_string(&scene, &opts).unwrap();
    assert_eq!(first, second);
}

#[test]
fn gradient_fill_is_baked_as_a_gradient_paint() {
    let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
      <defs>
        <linearGradient id="g" x1="0" y1="0" x2="10" y2="0" gradientUnits="userSpaceOnUse">
          <stop offset="0" stop-color="#ffffff"/>
          <stop offset="1" stop-color="#000000"/>
        </linearGradient>
      </defs>
      <rect x="0" y="0" width="10" height="10" fill="url(#g)"/>
    </svg>"##;
    let scene = scene_from_svg(svg.as_bytes()).unwrap();
    let text = transcode_to_string(&scene, &BakeOptions::new("Fade")).unwrap();

    assert!(text.contains("g.set_paint(Paint::linear_gradient("));
    assert!(text.contains("&[0.0, 1.0], &[Color::WHITE, Color::BLACK]"));
    assert!(text.contains("CycleMode::NoCycle, ColorSpace::Srgb"));
}

#[test]
fn shapeless_document_keeps_its_declared_size() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="24"/>"#;
    let scene = scene_from_svg(svg.as_bytes()).unwrap();
    let text = transcode_to_string(&scene, &BakeOptions::new("Blank")).unwrap();

    assert!(text.contains("ORIG_WIDTH: i32 = 16;"));
    assert!(text.contains("ORIG_HEIGHT: i32 = 24;"));
    assert!(text.contains("fn paint_0("));
    assert!(!text.contains("fn paint_1("));
    assert!(!text.contains("g.fill(&shape);"));
}

#[test]
fn resizable_variant_parameterizes_the_size() {
    let scene = scene_from_svg(SQUARE_BADGE.as_bytes()).unwrap();
    let opts = BakeOptions::new("SquareBadge").resizable(true);
    let text = transcode_to_string(&scene, &opts).unwrap();

    assert!(text.contains("pub fn set_size"));
    assert!(text.contains("Affine::scale(coef)"));
    assert!(text.contains("impl Default for SquareBadge"));
}

#[test]
fn tiny_threshold_chains_procedures_without_losing_instructions() {
    let scene = scene_from_svg(SQUARE_BADGE.as_bytes()).unwrap();

    let single = transcode_to_string(&scene, &BakeOptions::new("SquareBadge")).unwrap();
    let chained = transcode_to_string(
        &scene,
        &BakeOptions::new("SquareBadge").chunk_threshold_bytes(64),
    )
    .unwrap();

    assert_eq!(count(&single, "fn paint_"), 1);
    assert!(count(&chained, "fn paint_") > 1);
    // Every drawing instruction survives chunking.
    for needle in ["g.fill(&shape);", "g.draw(&shape);", "g.set_stroke("] {
        assert_eq!(count(&single, needle), count(&chained, needle));
    }
}
