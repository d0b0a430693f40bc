//! Ready-made [`Scene`]s, each exercising a different part of the pipeline.

use std::f32::consts::PI;

use angle::Rad;

use crate::{utils::Rect2, V2};

use super::{
    Affine, BlendMode, Clip, Color, Content, Fill, FillRule, Gradient, GradientStop, Image,
    LineCap, LineJoin, Mask, Node, Paint, Pattern, Scene, Segment, Shape, Stroke, Transform,
};

/// Every example, paired with a human-readable name
pub fn all() -> Vec<(&'static str, Scene)> {
    vec![
        ("empty", empty()),
        ("two squares", two_squares()),
        ("linear gradient", linear_gradient()),
        ("radial gradient", radial_gradient()),
        ("checkerboard", checkerboard()),
        ("faded badge", faded_badge()),
        ("masked photo", masked_photo()),
        ("star", star(5)),
    ]
}

/// A scene containing a single empty group
pub fn empty() -> Scene {
    Scene::new(V2::new(10.0, 10.0), Node::group(vec![Node::group(vec![])]))
}

/// Two squares filled with the exact same color
pub fn two_squares() -> Scene {
    let square = |x: f32| {
        Node::shape(Shape::Rect {
            rect: Rect2::new(x, 0.0, 10.0, 10.0),
            radii: V2::new(0.0, 0.0),
        })
        .with_fill_color(Color::Rgba {
            rgb: rgb::RGB8::new(255, 128, 0),
            alpha: 0.5,
        })
    };
    Scene::new(
        V2::new(30.0, 10.0),
        Node::group(vec![square(0.0), square(20.0)]),
    )
}

fn two_stops() -> Gradient {
    Gradient {
        stops: vec![
            GradientStop {
                offset: 0.0,
                color: Color::rgb(255, 0, 0),
            },
            GradientStop {
                offset: 1.0,
                color: Color::Gray {
                    white: 1.0,
                    alpha: 1.0,
                },
            },
        ],
    }
}

/// A rounded rectangle filled with a two-stop linear gradient
pub fn linear_gradient() -> Scene {
    let rect = Rect2::new(0.0, 0.0, 100.0, 50.0);
    let node = Node::content(Content::LinearGradient {
        gradient: two_stops(),
        from: V2::new(0.0, 0.0),
        to: V2::new(100.0, 0.0),
    })
    .with_clip(Clip::Path {
        shape: Shape::Rect {
            rect,
            radii: V2::new(8.0, 8.0),
        },
        rule: FillRule::NonZero,
    });
    Scene::new(rect.size, Node::group(vec![node]))
}

/// A circle filled with a radial gradient
pub fn radial_gradient() -> Scene {
    let bounds = Rect2::new(0.0, 0.0, 64.0, 64.0);
    let center = V2::new(32.0, 32.0);
    let node = Node::content(Content::RadialGradient {
        gradient: two_stops(),
        start_center: center,
        start_radius: 0.0,
        end_center: center,
        end_radius: 32.0,
    })
    .with_clip(Clip::Path {
        shape: Shape::Ellipse(bounds),
        rule: FillRule::NonZero,
    });
    Scene::new(bounds.size, Node::group(vec![node]))
}

/// A square filled with a checkerboard pattern, with a black outline
pub fn checkerboard() -> Scene {
    let cell = |x: f32, y: f32| {
        Node::shape(Shape::Rect {
            rect: Rect2::new(x, y, 4.0, 4.0),
            radii: V2::new(0.0, 0.0),
        })
        .with_fill_color(Color::rgb(0, 0, 0))
    };
    let pattern = Pattern {
        tile: Rect2::new(0.0, 0.0, 8.0, 8.0),
        content: vec![cell(0.0, 0.0), cell(4.0, 4.0)],
    };
    let board = Node::shape(Shape::Rect {
        rect: Rect2::new(0.0, 0.0, 32.0, 32.0),
        radii: V2::new(0.0, 0.0),
    })
    .with_fill(Fill {
        paint: Paint::Pattern(pattern),
        rule: FillRule::NonZero,
    })
    .with_stroke(Stroke::new(Color::rgb(0, 0, 0), 1.0));
    Scene::new(V2::new(32.0, 32.0), Node::group(vec![board]))
}

/// A half-transparent, isolated group of overlapping circles, clipped to a square and rotated
pub fn faded_badge() -> Scene {
    let circle = |x: f32, color: Color| {
        Node::shape(Shape::Ellipse(Rect2::new(x, 0.0, 20.0, 20.0))).with_fill_color(color)
    };
    let badge = Node::group(vec![
        circle(0.0, Color::rgb(200, 0, 0)),
        circle(10.0, Color::rgb(0, 0, 200)),
    ])
    .with_transform(Transform::Matrix(Affine::new(1.0, 0.0, 0.0, 1.0, 5.0, 5.0)))
    .with_transform(Transform::Rotate(Rad(PI / 12.0)))
    .with_clip(Clip::Path {
        shape: Shape::Rect {
            rect: Rect2::new(0.0, 0.0, 25.0, 20.0),
            radii: V2::new(0.0, 0.0),
        },
        rule: FillRule::EvenOdd,
    })
    .with_opacity(0.5)
    .with_blend_mode(BlendMode::SourceIn)
    .isolated();
    Scene::new(V2::new(40.0, 30.0), Node::group(vec![badge]))
}

/// An image, masked by a white circle
pub fn masked_photo() -> Scene {
    let frame = Rect2::new(0.0, 0.0, 16.0, 16.0);
    let mask = Mask {
        content: Node::shape(Shape::Ellipse(frame)).with_fill_color(Color::Gray {
            white: 1.0,
            alpha: 1.0,
        }),
        frame,
    };
    let photo = Node::content(Content::Image {
        image: Image {
            // Just the PNG signature; the bytes are embedded verbatim
            data: vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A],
        },
        frame,
    })
    .with_transform(Transform::Scale { sx: 2.0, sy: 2.0 })
    .with_clip(Clip::Mask(Box::new(mask)));
    Scene::new(V2::new(32.0, 32.0), Node::group(vec![photo]))
}

/// A regular star with `num_points` points, drawn as a stroked and filled curvy path.  The canvas
/// is sized to fit the star's control points.
pub fn star(num_points: usize) -> Scene {
    let outer = 20.0;
    let inner = 8.0;
    let vertices = (0..num_points * 2)
        .map(|i| {
            let radius = if i % 2 == 0 { outer } else { inner };
            let angle = PI * i as f32 / num_points as f32 - PI / 2.0;
            V2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect::<Vec<_>>();

    let mut segments = vec![Segment::Move(vertices[0])];
    for pair in vertices.windows(2) {
        // Bow each edge slightly outwards
        let mid = (pair[0] + pair[1]) * 0.5;
        segments.push(Segment::Cubic {
            to: pair[1],
            control1: mid * 1.1,
            control2: mid * 1.1,
        });
    }
    segments.push(Segment::Close);
    let shape = Shape::Path(segments);

    let bbox = shape.control_bbox().unwrap_or(Rect2::new(0.0, 0.0, 0.0, 0.0));
    let star = Node::shape(shape)
        .with_fill_color(Color::rgb(255, 215, 0))
        .with_stroke(Stroke {
            color: Color::rgb(120, 80, 0),
            width: 1.5,
            cap: LineCap::Round,
            join: LineJoin::Round,
            miter_limit: 4.0,
        })
        .with_transform(Transform::Translate {
            tx: -bbox.origin.x,
            ty: -bbox.origin.y,
        });
    Scene::new(bbox.size, Node::group(vec![star]))
}
