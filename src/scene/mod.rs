//! The normalized scene model which gets lowered to [`Command`](crate::ir::Command)s.  By the time
//! a [`Scene`] is built, every unit has been resolved to an absolute value and every style has been
//! cascaded onto the [`Node`] which uses it, so lowering never has to look anywhere but the node
//! it's currently visiting.

use angle::Rad;
use rgb::RGB8;

use crate::{utils::Rect2, V2};

pub mod examples;

/// A complete drawing: a canvas size and the tree of [`Node`]s drawn onto it
#[derive(Debug, Clone)]
pub struct Scene {
    pub size: V2,
    pub root: Node,
}

impl Scene {
    pub fn new(size: V2, root: Node) -> Self {
        Self { size, root }
    }
}

/// A single node of the scene tree.  Every node introduces its own state scope: its transform,
/// clip and styles apply to its own content and its children, but nothing drawn after it.
#[derive(Debug, Clone)]
pub struct Node {
    /// Transforms applied in order, in this node's parent's coordinate space
    pub transform: Vec<Transform>,
    pub clip: Option<Clip>,
    /// Opacity in `0.0..=1.0`, relative to the parent.  A translucent node which draws anything is
    /// composited as one layer, like an isolated one.
    pub opacity: f32,
    pub blend_mode: BlendMode,
    /// If `true`, this node's content is composited as a single layer
    pub isolated: bool,
    pub fill: Option<Fill>,
    pub stroke: Option<Stroke>,
    pub content: Option<Content>,
    pub children: Vec<Node>,
}

impl Node {
    /// A node which draws nothing itself, but groups together some children
    pub fn group(children: Vec<Node>) -> Self {
        Self {
            transform: vec![],
            clip: None,
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
            isolated: false,
            fill: None,
            stroke: None,
            content: None,
            children,
        }
    }

    /// A childless node which paints a [`Shape`].  It has no fill or stroke until one is added
    pub fn shape(shape: Shape) -> Self {
        Self::content(Content::Shape(shape))
    }

    pub fn content(content: Content) -> Self {
        Self {
            content: Some(content),
            ..Self::group(vec![])
        }
    }

    /* BUILDER METHODS */

    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = Some(fill);
        self
    }

    /// Fill with a flat [`Color`], using the non-zero winding rule
    pub fn with_fill_color(self, color: Color) -> Self {
        self.with_fill(Fill {
            paint: Paint::Color(color),
            rule: FillRule::NonZero,
        })
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform.push(transform);
        self
    }

    pub fn with_clip(mut self, clip: Clip) -> Self {
        self.clip = Some(clip);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    /// Request that this node is composited as one isolated layer
    pub fn isolated(mut self) -> Self {
        self.isolated = true;
        self
    }
}

/////////////////
// TRANSFORMS  //
/////////////////

/// One step of a [`Node`]'s transform
#[derive(Debug, Clone)]
pub enum Transform {
    Matrix(Affine),
    Translate { tx: f32, ty: f32 },
    Scale { sx: f32, sy: f32 },
    Rotate(Rad<f32>),
}

/// A 2x3 affine matrix, mapping `(x, y)` to `(a*x + c*y + tx, b*x + d*y + ty)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Affine {
    pub const fn new(a: f32, b: f32, c: f32, d: f32, tx: f32, ty: f32) -> Self {
        Self { a, b, c, d, tx, ty }
    }
}

//////////////
// CLIPPING //
//////////////

#[derive(Debug, Clone)]
pub enum Clip {
    /// Only draw inside a path
    Path { shape: Shape, rule: FillRule },
    /// Only draw where the mask's content has been painted, weighted by its luminance
    Mask(Box<Mask>),
}

#[derive(Debug, Clone)]
pub struct Mask {
    pub content: Node,
    /// The area of the current coordinate space covered by the mask
    pub frame: Rect2,
}

/////////////
// STYLING //
/////////////

#[derive(Debug, Clone)]
pub struct Fill {
    pub paint: Paint,
    pub rule: FillRule,
}

/// Something which can be used to fill a [`Shape`]
#[derive(Debug, Clone)]
pub enum Paint {
    Color(Color),
    Pattern(Pattern),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f32,
}

impl Stroke {
    /// A stroke with the default caps, joins and miter limit
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
            miter_limit: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// Fully transparent
    None,
    Rgba { rgb: RGB8, alpha: f32 },
    Gray { white: f32, alpha: f32 },
}

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgba {
            rgb: RGB8::new(r, g, b),
            alpha: 1.0,
        }
    }
}

/// A tile which is repeated to fill a [`Shape`]
#[derive(Debug, Clone)]
pub struct Pattern {
    /// The bounds of one tile, which is also the distance between neighbouring tiles
    pub tile: Rect2,
    pub content: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub stops: Vec<GradientStop>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient, in `0.0..=1.0`
    pub offset: f32,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendMode {
    Normal,
    Copy,
    SourceIn,
    DestinationIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineJoin {
    Bevel,
    Round,
    Miter,
}

/////////////
// CONTENT //
/////////////

/// The thing that a [`Node`] paints, after all its children have been drawn
#[derive(Debug, Clone)]
pub enum Content {
    Shape(Shape),
    Image {
        image: Image,
        frame: Rect2,
    },
    LinearGradient {
        gradient: Gradient,
        from: V2,
        to: V2,
    },
    RadialGradient {
        gradient: Gradient,
        start_center: V2,
        start_radius: f32,
        end_center: V2,
        end_radius: f32,
    },
}

/// A flattened path.  Normalization has already converted every other kind of geometry into one
/// of these variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// An open polyline through every point
    Lines(Vec<V2>),
    /// A rectangle whose corners are rounded with radii `(rx, ry)`
    Rect { rect: Rect2, radii: V2 },
    /// The ellipse inscribed in a rectangle
    Ellipse(Rect2),
    Path(Vec<Segment>),
    /// A closed polyline through every point
    Polygon(Vec<V2>),
}

impl Shape {
    /// Returns the smallest [`Rect2`] containing every point which defines this `Shape`.  This
    /// returns `None` for shapes with no points.
    pub fn control_bbox(&self) -> Option<Rect2> {
        match self {
            Shape::Lines(pts) | Shape::Polygon(pts) => Rect2::bbox(pts.iter().copied()),
            Shape::Rect { rect, .. } | Shape::Ellipse(rect) => Some(*rect),
            Shape::Path(segments) => Rect2::bbox(segments.iter().flat_map(Segment::points)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Move(V2),
    Line(V2),
    Cubic { to: V2, control1: V2, control2: V2 },
    Close,
}

impl Segment {
    fn points(&self) -> Vec<V2> {
        match *self {
            Segment::Move(p) | Segment::Line(p) => vec![p],
            Segment::Cubic {
                to,
                control1,
                control2,
            } => vec![control1, control2, to],
            Segment::Close => vec![],
        }
    }
}

/// An encoded (PNG or JPEG) image file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Image {
    pub data: Vec<u8>,
}
