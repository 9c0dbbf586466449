//! The drawing model targeted by generated icon code.
//!
//! Generated sources reference these types by name, so the surface here is
//! part of the output contract: a [`Canvas`] that remembers the last-set
//! paint, stroke, composite and transform, plus the value types the baked
//! instructions construct.

pub use kurbo;
pub use kurbo::{Affine, BezPath, Point};

use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const RED: Color = Color::new(255, 0, 0, 255);
    pub const GREEN: Color = Color::new(0, 255, 0, 255);
    pub const BLUE: Color = Color::new(0, 0, 255, 255);
    pub const LIGHT_GRAY: Color = Color::new(192, 192, 192, 255);
    pub const GRAY: Color = Color::new(128, 128, 128, 255);
    pub const DARK_GRAY: Color = Color::new(64, 64, 64, 255);
    pub const YELLOW: Color = Color::new(255, 255, 0, 255);
    pub const CYAN: Color = Color::new(0, 255, 255, 255);
    pub const MAGENTA: Color = Color::new(255, 0, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from a packed `0xRRGGBB` value.
    pub const fn rgb(rgb: u32) -> Self {
        Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255)
    }

    /// Color from a packed `0xAARRGGBB` value.
    pub const fn rgba(argb: u32) -> Self {
        Self::new(
            (argb >> 16) as u8,
            (argb >> 8) as u8,
            argb as u8,
            (argb >> 24) as u8,
        )
    }

    pub fn is_opaque(self) -> bool {
        self.a == 255
    }
}

/// Gradient cycling outside the `[start, end]` span.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleMode {
    NoCycle,
    Reflect,
    Repeat,
}

/// Color space used for gradient interpolation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorSpace {
    Srgb,
    LinearRgb,
}

/// Stroke end-cap style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cap {
    Butt,
    Round,
    Square,
}

/// Stroke segment-join style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Join {
    Miter,
    Round,
    Bevel,
}

/// Outline style applied by [`Canvas::draw`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub width: f64,
    pub cap: Cap,
    pub join: Join,
    pub miter_limit: f64,
    /// Alternating on/off dash lengths; `None` paints a solid outline.
    pub dash: Option<Vec<f64>>,
    pub dash_phase: f64,
}

impl Stroke {
    pub fn new(width: f64, cap: Cap, join: Join, miter_limit: f64) -> Self {
        Self {
            width,
            cap,
            join,
            miter_limit,
            dash: None,
            dash_phase: 0.0,
        }
    }

    pub fn with_dash(mut self, dash: &[f64], phase: f64) -> Self {
        self.dash = Some(dash.to_vec());
        self.dash_phase = phase;
        self
    }
}

/// Linear gradient between two points in user space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub fractions: Vec<f64>,
    pub colors: Vec<Color>,
    pub cycle: CycleMode,
    pub color_space: ColorSpace,
    pub transform: Affine,
}

/// Radial gradient around a center point, with an optional distinct focus.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadialGradient {
    pub center: Point,
    pub radius: f64,
    pub focus: Point,
    pub fractions: Vec<f64>,
    pub colors: Vec<Color>,
    pub cycle: CycleMode,
    pub color_space: ColorSpace,
    pub transform: Affine,
}

/// Fill or outline pigment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    Color(Color),
    LinearGradient(LinearGradient),
    RadialGradient(RadialGradient),
}

impl Paint {
    #[allow(clippy::too_many_arguments)]
    pub fn linear_gradient(
        start: (f64, f64),
        end: (f64, f64),
        fractions: &[f64],
        colors: &[Color],
        cycle: CycleMode,
        color_space: ColorSpace,
        transform: Affine,
    ) -> Self {
        Self::LinearGradient(LinearGradient {
            start: start.into(),
            end: end.into(),
            fractions: fractions.to_vec(),
            colors: colors.to_vec(),
            cycle,
            color_space,
            transform,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn radial_gradient(
        center: (f64, f64),
        radius: f64,
        focus: (f64, f64),
        fractions: &[f64],
        colors: &[Color],
        cycle: CycleMode,
        color_space: ColorSpace,
        transform: Affine,
    ) -> Self {
        Self::RadialGradient(RadialGradient {
            center: center.into(),
            radius,
            focus: focus.into(),
            fractions: fractions.to_vec(),
            colors: colors.to_vec(),
            cycle,
            color_space,
            transform,
        })
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Self::Color(color)
    }
}

/// Source-over alpha composite.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Composite {
    pub alpha: f64,
}

impl Composite {
    pub fn src_over(alpha: f64) -> Self {
        Self { alpha }
    }
}

/// A drawable outline or region.
///
/// Non-path variants keep their construction parameters; [`Shape::to_path`]
/// lowers everything to a bezier path for backends that only fill paths.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Path(BezPath),
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    },
    RoundRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        arc_w: f64,
        arc_h: f64,
    },
    Ellipse {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
}

impl Default for Shape {
    fn default() -> Self {
        Self::Path(BezPath::new())
    }
}

/// Incremental path construction used by generated code.
#[derive(Debug, Default)]
pub struct PathBuilder {
    path: BezPath,
}

impl PathBuilder {
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.path.move_to((x, y));
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.path.line_to((x, y));
    }

    pub fn quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        self.path.quad_to((x1, y1), (x, y));
    }

    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.path.curve_to((x1, y1), (x2, y2), (x, y));
    }

    pub fn close(&mut self) {
        self.path.close_path();
    }
}

// Cubic approximation factor for a quarter ellipse.
const KAPPA: f64 = 0.552_284_749_830_793_4;

impl Shape {
    pub fn rect(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::Rect { x, y, w, h }
    }

    pub fn round_rect(x: f64, y: f64, w: f64, h: f64, arc_w: f64, arc_h: f64) -> Self {
        Self::RoundRect {
            x,
            y,
            w,
            h,
            arc_w,
            arc_h,
        }
    }

    pub fn ellipse(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::Ellipse { x, y, w, h }
    }

    pub fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::Line { x1, y1, x2, y2 }
    }

    pub fn path(build: impl FnOnce(&mut PathBuilder)) -> Self {
        let mut builder = PathBuilder::default();
        build(&mut builder);
        Self::Path(builder.path)
    }

    /// Lower the shape to a bezier path. `tolerance` bounds the error of
    /// curve approximations for the ellipse variant.
    pub fn to_path(&self, tolerance: f64) -> BezPath {
        use kurbo::Shape as _;

        match self {
            Self::Path(path) => path.clone(),
            Self::Rect { x, y, w, h } => kurbo::Rect::new(*x, *y, x + w, y + h).to_path(tolerance),
            Self::RoundRect {
                x,
                y,
                w,
                h,
                arc_w,
                arc_h,
            } => round_rect_path(*x, *y, *w, *h, *arc_w, *arc_h),
            Self::Ellipse { x, y, w, h } => {
                kurbo::Ellipse::new((x + w / 2.0, y + h / 2.0), (w / 2.0, h / 2.0), 0.0)
                    .to_path(tolerance)
            }
            Self::Line { x1, y1, x2, y2 } => {
                let mut path = BezPath::new();
                path.move_to((*x1, *y1));
                path.line_to((*x2, *y2));
                path
            }
        }
    }

    /// Axis-aligned bounding box in the shape's own coordinates.
    ///
    /// Empty paths have no extent and return `None`.
    pub fn bounding_box(&self) -> Option<kurbo::Rect> {
        use kurbo::Shape as _;

        match self {
            Self::Path(path) => {
                if path.elements().is_empty() {
                    None
                } else {
                    Some(path.bounding_box())
                }
            }
            Self::Rect { x, y, w, h }
            | Self::RoundRect { x, y, w, h, .. }
            | Self::Ellipse { x, y, w, h } => Some(kurbo::Rect::new(*x, *y, x + w, y + h)),
            Self::Line { x1, y1, x2, y2 } => {
                Some(kurbo::Rect::new(*x1, *y1, *x2, *y2).abs())
            }
        }
    }
}

/// Rounded rectangle with elliptical corners, built from cubics.
fn round_rect_path(x: f64, y: f64, w: f64, h: f64, arc_w: f64, arc_h: f64) -> BezPath {
    // Arc extents are full corner diameters; radii clamp to the half sides.
    let rx = (arc_w / 2.0).clamp(0.0, w / 2.0);
    let ry = (arc_h / 2.0).clamp(0.0, h / 2.0);
    let (kx, ky) = (rx * KAPPA, ry * KAPPA);

    let mut p = BezPath::new();
    p.move_to((x + rx, y));
    p.line_to((x + w - rx, y));
    p.curve_to((x + w - rx + kx, y), (x + w, y + ry - ky), (x + w, y + ry));
    p.line_to((x + w, y + h - ry));
    p.curve_to(
        (x + w, y + h - ry + ky),
        (x + w - rx + kx, y + h),
        (x + w - rx, y + h),
    );
    p.line_to((x + rx, y + h));
    p.curve_to((x + rx - kx, y + h), (x, y + h - ry + ky), (x, y + h - ry));
    p.line_to((x, y + ry));
    p.curve_to((x, y + ry - ky), (x + rx - kx, y), (x + rx, y));
    p.close_path();
    p
}

/// The imperative canvas baked instructions run against.
///
/// Implementations keep paint, stroke, composite and transform as sticky
/// state: a value stays current until replaced, regardless of how deeply
/// the generating scene was nested.
pub trait Canvas {
    fn set_composite(&mut self, composite: Composite);
    fn set_paint(&mut self, paint: Paint);
    fn set_stroke(&mut self, stroke: Stroke);

    /// Current transform, as later restored via [`Canvas::set_transform`].
    fn transform(&self) -> Affine;
    fn set_transform(&mut self, transform: Affine);
    /// Right-multiply the current transform.
    fn concat(&mut self, transform: Affine);

    /// Fill the shape with the current paint.
    fn fill(&mut self, shape: &Shape);
    /// Outline the shape with the current paint and stroke.
    fn draw(&mut self, shape: &Shape);
}

/// One recorded [`Canvas`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasOp {
    SetComposite(Composite),
    SetPaint(Paint),
    SetStroke(Stroke),
    SetTransform(Affine),
    Concat(Affine),
    Fill(Shape),
    Draw(Shape),
}

/// Canvas that records calls instead of drawing. Test double for backends
/// and for exercising generated code.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    transform: Affine,
    pub ops: Vec<CanvasOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Canvas for RecordingCanvas {
    fn set_composite(&mut self, composite: Composite) {
        self.ops.push(CanvasOp::SetComposite(composite));
    }

    fn set_paint(&mut self, paint: Paint) {
        self.ops.push(CanvasOp::SetPaint(paint));
    }

    fn set_stroke(&mut self, stroke: Stroke) {
        self.ops.push(CanvasOp::SetStroke(stroke));
    }

    fn transform(&self) -> Affine {
        self.transform
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
        self.ops.push(CanvasOp::SetTransform(transform));
    }

    fn concat(&mut self, transform: Affine) {
        self.transform = self.transform * transform;
        self.ops.push(CanvasOp::Concat(transform));
    }

    fn fill(&mut self, shape: &Shape) {
        self.ops.push(CanvasOp::Fill(shape.clone()));
    }

    fn draw(&mut self, shape: &Shape) {
        self.ops.push(CanvasOp::Draw(shape.clone()));
    }
}
