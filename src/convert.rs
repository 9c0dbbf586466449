//! SVG ingestion: maps a resolved `usvg` tree onto the scene model.
//!
//! All SVG complexity (units, CSS, references, basic shapes, text) is
//! usvg's problem; this module only translates the already-resolved tree
//! and rejects the constructs the target canvas model cannot express.

use std::sync::Arc;

use kurbo::Affine;

use crate::canvas::{Cap, Color, ColorSpace, CycleMode, Join, Paint, Stroke};
use crate::error::{BakeError, BakeResult};
use crate::scene::{
    CompositeAlpha, CompositeRule, Geometry, Node, NodeKind, Painter, PathSeg, Scene,
};

/// Build a scene from SVG or gzip-compressed SVGZ bytes.
///
/// System fonts are loaded so `<text>` resolves to outlines; batch callers
/// that care about startup cost can parse once into a [`usvg::Tree`] with
/// their own options and use [`scene_from_tree`].
pub fn scene_from_svg(data: &[u8]) -> BakeResult<Scene> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree =
        usvg::Tree::from_data(data, &options).map_err(|e| BakeError::parse(e.to_string()))?;
    scene_from_tree(&tree)
}

/// Build a scene from an already-parsed usvg tree.
pub fn scene_from_tree(tree: &usvg::Tree) -> BakeResult<Scene> {
    Ok(Scene {
        width: f64::from(tree.size().width()),
        height: f64::from(tree.size().height()),
        root: convert_group(tree.root())?,
    })
}

fn convert_group(group: &usvg::Group) -> BakeResult<Node> {
    if group.clip_path().is_some() {
        return Err(BakeError::unsupported_painter("clip-path"));
    }
    if group.mask().is_some() {
        return Err(BakeError::unsupported_painter("mask"));
    }
    if !group.filters().is_empty() {
        return Err(BakeError::unsupported_painter("filter"));
    }

    let mut children = Vec::new();
    for child in group.children() {
        match child {
            usvg::Node::Group(child_group) => children.push(convert_group(child_group)?),
            usvg::Node::Path(path) => {
                if let Some(node) = convert_path(path)? {
                    children.push(node);
                }
            }
            usvg::Node::Text(text) => children.push(convert_group(text.flattened())?),
            usvg::Node::Image(_) => return Err(BakeError::unsupported_geometry("image")),
        }
    }

    Ok(Node {
        transform: affine_of(group.transform()),
        composite: composite_of(group),
        kind: NodeKind::Group(children),
    })
}

fn affine_of(transform: usvg::Transform) -> Option<Affine> {
    if transform.is_identity() {
        return None;
    }
    Some(Affine::new([
        f64::from(transform.sx),
        f64::from(transform.ky),
        f64::from(transform.kx),
        f64::from(transform.sy),
        f64::from(transform.tx),
        f64::from(transform.ty),
    ]))
}

fn composite_of(group: &usvg::Group) -> Option<CompositeAlpha> {
    let rule = blend_rule(group.blend_mode());
    let alpha = f64::from(group.opacity().get());
    if rule == CompositeRule::SrcOver && alpha == 1.0 {
        return None;
    }
    Some(CompositeAlpha { rule, alpha })
}

// Blend modes ride through the scene model; everything but source-over is
// rejected by the walker, where unsupported composite rules belong.
fn blend_rule(mode: usvg::BlendMode) -> CompositeRule {
    match mode {
        usvg::BlendMode::Normal => CompositeRule::SrcOver,
        usvg::BlendMode::Multiply => CompositeRule::Multiply,
        usvg::BlendMode::Screen => CompositeRule::Screen,
        usvg::BlendMode::Overlay => CompositeRule::Overlay,
        usvg::BlendMode::Darken => CompositeRule::Darken,
        usvg::BlendMode::Lighten => CompositeRule::Lighten,
        usvg::BlendMode::ColorDodge => CompositeRule::ColorDodge,
        usvg::BlendMode::ColorBurn => CompositeRule::ColorBurn,
        usvg::BlendMode::HardLight => CompositeRule::HardLight,
        usvg::BlendMode::SoftLight => CompositeRule::SoftLight,
        usvg::BlendMode::Difference => CompositeRule::Difference,
        usvg::BlendMode::Exclusion => CompositeRule::Exclusion,
        usvg::BlendMode::Hue => CompositeRule::Hue,
        usvg::BlendMode::Saturation => CompositeRule::Saturation,
        usvg::BlendMode::Color => CompositeRule::Color,
        usvg::BlendMode::Luminosity => CompositeRule::Luminosity,
    }
}

fn convert_path(path: &usvg::Path) -> BakeResult<Option<Node>> {
    if !path.is_visible() {
        return Ok(None);
    }

    let fill = path
        .fill()
        .map(|fill| paint_of(fill.paint(), fill.opacity().get()))
        .transpose()?
        .map(Painter::Fill);
    let stroke = path
        .stroke()
        .map(|stroke| {
            let paint = paint_of(stroke.paint(), stroke.opacity().get())?;
            Ok::<_, BakeError>(Painter::Stroke(paint, stroke_of(stroke)))
        })
        .transpose()?;

    let painter = match (fill, stroke, path.paint_order()) {
        (Some(fill), Some(stroke), usvg::PaintOrder::FillAndStroke) => {
            Painter::Composite(vec![fill, stroke])
        }
        (Some(fill), Some(stroke), usvg::PaintOrder::StrokeAndFill) => {
            Painter::Composite(vec![stroke, fill])
        }
        (Some(single), None, _) | (None, Some(single), _) => single,
        (None, None, _) => return Ok(None),
    };

    // One shared geometry per source path: fill and stroke painters dedup
    // against the same allocation downstream.
    let geometry = Arc::new(geometry_of(path.data()));
    Ok(Some(Node::shape(geometry, painter)))
}

fn geometry_of(data: &usvg::tiny_skia_path::Path) -> Geometry {
    use usvg::tiny_skia_path::PathSegment;

    let mut segments = Vec::new();
    for segment in data.segments() {
        segments.push(match segment {
            PathSegment::MoveTo(p) => PathSeg::MoveTo(f64::from(p.x), f64::from(p.y)),
            PathSegment::LineTo(p) => PathSeg::LineTo(f64::from(p.x), f64::from(p.y)),
            PathSegment::QuadTo(p1, p) => PathSeg::QuadTo(
                f64::from(p1.x),
                f64::from(p1.y),
                f64::from(p.x),
                f64::from(p.y),
            ),
            PathSegment::CubicTo(p1, p2, p) => PathSeg::CubicTo(
                f64::from(p1.x),
                f64::from(p1.y),
                f64::from(p2.x),
                f64::from(p2.y),
                f64::from(p.x),
                f64::from(p.y),
            ),
            PathSegment::Close => PathSeg::Close,
        });
    }
    Geometry::Path(segments)
}

fn paint_of(paint: &usvg::Paint, opacity: f32) -> BakeResult<Paint> {
    match paint {
        usvg::Paint::Color(color) => Ok(Paint::Color(color_of(*color, opacity))),
        usvg::Paint::LinearGradient(gradient) => {
            let (fractions, colors) = stops_of(gradient.stops(), opacity);
            Ok(Paint::LinearGradient(crate::canvas::LinearGradient {
                start: (f64::from(gradient.x1()), f64::from(gradient.y1())).into(),
                end: (f64::from(gradient.x2()), f64::from(gradient.y2())).into(),
                fractions,
                colors,
                cycle: cycle_of(gradient.spread_method()),
                color_space: ColorSpace::Srgb,
                transform: affine_of(gradient.transform()).unwrap_or(Affine::IDENTITY),
            }))
        }
        usvg::Paint::RadialGradient(gradient) => {
            let (fractions, colors) = stops_of(gradient.stops(), opacity);
            Ok(Paint::RadialGradient(crate::canvas::RadialGradient {
                center: (f64::from(gradient.cx()), f64::from(gradient.cy())).into(),
                radius: f64::from(gradient.r().get()),
                focus: (f64::from(gradient.fx()), f64::from(gradient.fy())).into(),
                fractions,
                colors,
                cycle: cycle_of(gradient.spread_method()),
                color_space: ColorSpace::Srgb,
                transform: affine_of(gradient.transform()).unwrap_or(Affine::IDENTITY),
            }))
        }
        usvg::Paint::Pattern(_) => Err(BakeError::unsupported_paint("pattern")),
    }
}

fn stops_of(stops: &[usvg::Stop], opacity: f32) -> (Vec<f64>, Vec<Color>) {
    let mut fractions = Vec::with_capacity(stops.len());
    let mut colors = Vec::with_capacity(stops.len());
    for stop in stops {
        fractions.push(f64::from(stop.offset().get()));
        colors.push(color_of(stop.color(), stop.opacity().get() * opacity));
    }
    (fractions, colors)
}

fn color_of(color: usvg::Color, opacity: f32) -> Color {
    let alpha = (f32::from(u8::MAX) * opacity.clamp(0.0, 1.0)).round() as u8;
    Color::new(color.red, color.green, color.blue, alpha)
}

fn cycle_of(method: usvg::SpreadMethod) -> CycleMode {
    match method {
        usvg::SpreadMethod::Pad => CycleMode::NoCycle,
        usvg::SpreadMethod::Reflect => CycleMode::Reflect,
        usvg::SpreadMethod::Repeat => CycleMode::Repeat,
    }
}

fn stroke_of(stroke: &usvg::Stroke) -> Stroke {
    let cap = match stroke.linecap() {
        usvg::LineCap::Butt => Cap::Butt,
        usvg::LineCap::Round => Cap::Round,
        usvg::LineCap::Square => Cap::Square,
    };
    // MiterClip degrades to plain miter; the target model has no clip join.
    let join = match stroke.linejoin() {
        usvg::LineJoin::Miter | usvg::LineJoin::MiterClip => Join::Miter,
        usvg::LineJoin::Round => Join::Round,
        usvg::LineJoin::Bevel => Join::Bevel,
    };

    let mut converted = Stroke::new(
        f64::from(stroke.width().get()),
        cap,
        join,
        f64::from(stroke.miterlimit().get()),
    );
    if let Some(dash) = stroke.dasharray() {
        let dash: Vec<f64> = dash.iter().map(|d| f64::from(*d)).collect();
        converted = converted.with_dash(&dash, f64::from(stroke.dashoffset()));
    }
    converted
}
