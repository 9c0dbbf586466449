//! Resolved scene-tree model consumed by the transcoder.
//!
//! A [`Scene`] is the boundary with whatever produced it (the bundled SVG
//! adapter, or any other resolver): units, styling, references and text are
//! already concrete here. Geometry sits behind [`Arc`] because painter
//! applications dedup by pointer identity, never by value.

use std::sync::Arc;

use kurbo::Affine;
use serde::{Deserialize, Serialize};

use crate::canvas::{Paint, Stroke};

/// A resolved document: declared size plus the node tree.
///
/// The declared size doubles as the bounding-box fallback for trees that
/// paint nothing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub root: Node,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    /// Local transform; `None` means identity.
    #[serde(default)]
    pub transform: Option<Affine>,
    /// Alpha composite; `None` means fully opaque source-over.
    #[serde(default)]
    pub composite: Option<CompositeAlpha>,
    pub kind: NodeKind,
}

impl Node {
    /// Group node with no transform or composite of its own.
    pub fn group(children: Vec<Node>) -> Self {
        Self {
            transform: None,
            composite: None,
            kind: NodeKind::Group(children),
        }
    }

    /// Shape node with no transform or composite of its own.
    pub fn shape(geometry: Arc<Geometry>, painter: Painter) -> Self {
        Self {
            transform: None,
            composite: None,
            kind: NodeKind::Shape(ShapeNode { geometry, painter }),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum NodeKind {
    /// Ordered children; document order is z-order.
    Group(Vec<Node>),
    Shape(ShapeNode),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShapeNode {
    pub geometry: Arc<Geometry>,
    pub painter: Painter,
}

/// Rendering operation(s) applied to one geometry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Painter {
    Fill(Paint),
    Stroke(Paint, Stroke),
    /// Sub-painters applied to the same geometry, in order.
    Composite(Vec<Painter>),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Geometry {
    Path(Vec<PathSeg>),
    Rect { x: f64, y: f64, w: f64, h: f64 },
    RoundRect { x: f64, y: f64, w: f64, h: f64, arc_w: f64, arc_h: f64 },
    Ellipse { x: f64, y: f64, w: f64, h: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PathSeg {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    QuadTo(f64, f64, f64, f64),
    CubicTo(f64, f64, f64, f64, f64, f64),
    Close,
}

/// Compositing rule plus opacity, as carried by a source document.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositeAlpha {
    pub rule: CompositeRule,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
}

impl CompositeAlpha {
    pub fn src_over(alpha: f64) -> Self {
        Self {
            rule: CompositeRule::SrcOver,
            alpha,
        }
    }
}

/// Blend surface a source document can request. Only `SrcOver` is
/// expressible in the target canvas model; the walker rejects the rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompositeRule {
    SrcOver,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Color;

    fn basic_scene() -> Scene {
        let geometry = Arc::new(Geometry::Rect {
            x: 1.0,
            y: 1.0,
            w: 8.0,
            h: 8.0,
        });
        Scene {
            width: 10.0,
            height: 10.0,
            root: Node::group(vec![Node::shape(
                geometry,
                Painter::Fill(Paint::Color(Color::RED)),
            )]),
        }
    }

    #[test]
    fn json_roundtrip() {
        let scene = basic_scene();
        let s = serde_json::to_string_pretty(&scene).unwrap();
        let de: Scene = serde_json::from_str(&s).unwrap();
        assert_eq!(de.width, 10.0);
        let NodeKind::Group(children) = &de.root.kind else {
            panic!("expected group root");
        };
        assert_eq!(children.len(), 1);
    }

    #[test]
    fn shared_geometry_keeps_identity_in_memory() {
        let geometry = Arc::new(Geometry::Line {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0,
        });
        let a = Node::shape(geometry.clone(), Painter::Fill(Paint::Color(Color::BLACK)));
        let b = Node::shape(geometry.clone(), Painter::Fill(Paint::Color(Color::WHITE)));
        let (NodeKind::Shape(sa), NodeKind::Shape(sb)) = (&a.kind, &b.kind) else {
            panic!("expected shape nodes");
        };
        assert!(Arc::ptr_eq(&sa.geometry, &sb.geometry));
    }
}
