use angle::Rad;

use crate::scene::{BlendMode, Clip, Content, Fill, Node, Paint, Stroke, Transform};

use super::{Command, Provider};

/// 'Lower' a tree of [`Node`]s to a flat list of [`Command`]s, converting every scene value with
/// `provider`.  Each node gets its own push/pop bracket, so the output is always balanced, even
/// for empty groups.
pub fn lower<P: Provider>(node: &Node, provider: &P) -> Vec<Command<P::Types>> {
    let mut commands = Vec::new();
    lower_node(node, provider, &mut commands);
    commands
}

/// Lower a single [`Node`] (and, recursively, its children) onto the end of `out`
fn lower_node<P: Provider>(node: &Node, provider: &P, out: &mut Vec<Command<P::Types>>) {
    out.push(Command::PushState);

    // State which applies to everything inside this node
    for transform in &node.transform {
        out.push(lower_transform(transform, provider));
    }
    if let Some(clip) = &node.clip {
        out.push(lower_clip(clip, provider));
    }
    if node.opacity < 1.0 {
        out.push(Command::SetAlpha(provider.create_float(node.opacity)));
    }
    if node.blend_mode != BlendMode::Normal {
        out.push(Command::SetBlendMode(provider.create_blend_mode(node.blend_mode)));
    }
    if let Some(fill) = &node.fill {
        out.push(lower_fill(fill, provider));
    }
    if let Some(stroke) = &node.stroke {
        lower_stroke(stroke, provider, out);
    }

    // `SetAlpha` replaces the current alpha rather than multiplying it, so translucent nodes are
    // composited as a layer to make nested opacities multiply.  Without layer support, the alpha
    // and blend mode set above get applied to each paint individually.
    let draws_anything = !node.children.is_empty() || node.content.is_some();
    let wants_layer = node.isolated || (node.opacity < 1.0 && draws_anything);
    let use_layer = wants_layer && provider.supports_transparency_layers();
    if wants_layer && !use_layer {
        log::debug!("transparency layers unsupported; compositing group per-paint");
    }

    if use_layer {
        out.push(Command::PushTransparencyLayer);
    }
    for child in &node.children {
        lower_node(child, provider, out);
    }
    if let Some(content) = &node.content {
        lower_content(content, node, provider, out);
    }
    if use_layer {
        out.push(Command::PopTransparencyLayer);
    }

    out.push(Command::PopState);
}

fn lower_transform<P: Provider>(transform: &Transform, provider: &P) -> Command<P::Types> {
    match *transform {
        Transform::Matrix(affine) => Command::Concatenate(provider.create_transform(affine)),
        Transform::Translate { tx, ty } => Command::Translate {
            tx: provider.create_float(tx),
            ty: provider.create_float(ty),
        },
        Transform::Scale { sx, sy } => Command::Scale {
            sx: provider.create_float(sx),
            sy: provider.create_float(sy),
        },
        Transform::Rotate(Rad(radians)) => Command::Rotate(provider.create_float(radians)),
    }
}

fn lower_clip<P: Provider>(clip: &Clip, provider: &P) -> Command<P::Types> {
    match clip {
        Clip::Path { shape, rule } => Command::SetClip {
            path: provider.create_path(shape),
            rule: provider.create_fill_rule(*rule),
        },
        Clip::Mask(mask) => {
            // Masks are drawn in their own coordinate space, so start again with a fresh stream
            let commands = lower(&mask.content, provider);
            Command::SetClipMask {
                mask: provider.create_mask(commands, mask.frame.size),
                frame: provider.create_rect(mask.frame),
            }
        }
    }
}

fn lower_fill<P: Provider>(fill: &Fill, provider: &P) -> Command<P::Types> {
    match &fill.paint {
        Paint::Color(color) => Command::SetFill(provider.create_color(*color)),
        Paint::Pattern(pattern) => {
            let mut contents = Vec::new();
            for node in &pattern.content {
                lower_node(node, provider, &mut contents);
            }
            Command::SetFillPattern(provider.create_pattern(pattern, contents))
        }
    }
}

fn lower_stroke<P: Provider>(stroke: &Stroke, provider: &P, out: &mut Vec<Command<P::Types>>) {
    out.push(Command::SetStroke(provider.create_color(stroke.color)));
    out.push(Command::SetLineWidth(provider.create_float(stroke.width)));
    out.push(Command::SetLineCap(provider.create_line_cap(stroke.cap)));
    out.push(Command::SetLineJoin(provider.create_line_join(stroke.join)));
    out.push(Command::SetMiterLimit(provider.create_float(stroke.miter_limit)));
}

/// Paint a [`Node`]'s own [`Content`], using the fill and stroke already set by `lower_node`
fn lower_content<P: Provider>(
    content: &Content,
    node: &Node,
    provider: &P,
    out: &mut Vec<Command<P::Types>>,
) {
    match content {
        Content::Shape(shape) => {
            if let Some(fill) = &node.fill {
                out.push(Command::Fill {
                    path: provider.create_path(shape),
                    rule: provider.create_fill_rule(fill.rule),
                });
            }
            if node.stroke.is_some() {
                out.push(Command::Stroke(provider.create_path(shape)));
            }
        }
        Content::Image { image, frame } => out.push(Command::DrawImage {
            image: provider.create_image(image),
            rect: provider.create_rect(*frame),
        }),
        Content::LinearGradient { gradient, from, to } => out.push(Command::DrawLinearGradient {
            gradient: provider.create_gradient(gradient),
            from: provider.create_point(*from),
            to: provider.create_point(*to),
        }),
        Content::RadialGradient {
            gradient,
            start_center,
            start_radius,
            end_center,
            end_radius,
        } => out.push(Command::DrawRadialGradient {
            gradient: provider.create_gradient(gradient),
            start_center: provider.create_point(*start_center),
            start_radius: provider.create_float(*start_radius),
            end_center: provider.create_point(*end_center),
            end_radius: provider.create_float(*end_radius),
        }),
    }
}
