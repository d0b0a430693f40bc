//! A backend-agnostic intermediate representation (IR) for drawing, much like LLVM's IR: a
//! [`Scene`](crate::scene::Scene) is lowered to a flat list of [`Command`]s, which can then be
//! optimized and replayed by any backend (pixel buffers, page descriptions, generated source
//! code, etc.).
//!
//! Every backend has different ideas about what a color or a path actually _is_, so [`Command`]
//! is generic over a [`Types`] family which fixes the concrete representation of every resource.
//! A [`Provider`] converts scene values into those representations.

use crate::{
    error::BalanceError,
    scene::{self, BlendMode, Color, FillRule, LineCap, LineJoin, Shape},
    utils::Rect2,
    V2,
};

pub mod lowering;
pub mod optimize;
pub mod values;

/// The concrete representation of every kind of value which can appear in a [`Command`], for one
/// backend.  Implementors are usually empty marker types.
pub trait Types {
    type Float;
    type Point;
    type Size;
    type Rect;
    type Color;
    type Gradient;
    type Mask;
    type Path;
    type Pattern;
    type Transform;
    type BlendMode;
    type FillRule;
    type LineCap;
    type LineJoin;
    type Image;
}

/// A single drawing operation.  Commands are replayed in order, and any state-setting command
/// affects only the commands that follow it until the enclosing bracket is popped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command<T: Types> {
    PushState,
    PopState,
    PushTransparencyLayer,
    PopTransparencyLayer,

    /* TRANSFORM */
    Concatenate(T::Transform),
    Translate { tx: T::Float, ty: T::Float },
    Rotate(T::Float),
    Scale { sx: T::Float, sy: T::Float },

    /* PAINT STATE */
    SetFill(T::Color),
    SetFillPattern(T::Pattern),
    SetStroke(T::Color),
    SetLineWidth(T::Float),
    SetLineCap(T::LineCap),
    SetLineJoin(T::LineJoin),
    SetMiterLimit(T::Float),
    SetClip { path: T::Path, rule: T::FillRule },
    SetClipMask { mask: T::Mask, frame: T::Rect },
    SetAlpha(T::Float),
    SetBlendMode(T::BlendMode),

    /* PAINTING */
    Stroke(T::Path),
    Fill { path: T::Path, rule: T::FillRule },
    DrawImage { image: T::Image, rect: T::Rect },
    DrawLinearGradient {
        gradient: T::Gradient,
        from: T::Point,
        to: T::Point,
    },
    DrawRadialGradient {
        gradient: T::Gradient,
        start_center: T::Point,
        start_radius: T::Float,
        end_center: T::Point,
        end_radius: T::Float,
    },
}

impl<T: Types> Command<T> {
    /// Returns `true` if this command opens a bracket
    pub fn is_push(&self) -> bool {
        matches!(self, Command::PushState | Command::PushTransparencyLayer)
    }

    /// Returns `true` if this command closes a bracket
    pub fn is_pop(&self) -> bool {
        matches!(self, Command::PopState | Command::PopTransparencyLayer)
    }

    /// Returns `true` if this command puts marks on the drawing surface
    pub fn is_paint(&self) -> bool {
        matches!(
            self,
            Command::Stroke(_)
                | Command::Fill { .. }
                | Command::DrawImage { .. }
                | Command::DrawLinearGradient { .. }
                | Command::DrawRadialGradient { .. }
        )
    }

    /// Returns `true` if `self` is the pop which closes a bracket opened by `push`
    fn closes(&self, push: &Self) -> bool {
        matches!(
            (push, self),
            (Command::PushState, Command::PopState)
                | (Command::PushTransparencyLayer, Command::PopTransparencyLayer)
        )
    }
}

/// Checks that every push in `commands` is closed by a pop of the same kind, and that no pop
/// appears without a push.  The optimizer and every backend assume this holds.
pub fn check_balance<T: Types>(commands: &[Command<T>]) -> Result<(), BalanceError> {
    let mut open = Vec::<&Command<T>>::new();
    for (index, cmd) in commands.iter().enumerate() {
        if cmd.is_push() {
            open.push(cmd);
        } else if cmd.is_pop() {
            let push = open.pop().ok_or(BalanceError::UnmatchedPop { index })?;
            if !cmd.closes(push) {
                return Err(BalanceError::MismatchedPop { index });
            }
        }
    }
    match open.len() {
        0 => Ok(()),
        n => Err(BalanceError::Unclosed { open: n }),
    }
}

/// Converts normalized scene values into the representations of one [`Types`] family.  Every
/// conversion is pure.
pub trait Provider {
    type Types: Types;

    /// If `false`, [`lowering`] won't emit [`Command::PushTransparencyLayer`] or
    /// [`Command::PopTransparencyLayer`]
    fn supports_transparency_layers(&self) -> bool;

    fn create_float(&self, f: f32) -> <Self::Types as Types>::Float;
    fn create_point(&self, p: V2) -> <Self::Types as Types>::Point;
    fn create_size(&self, s: V2) -> <Self::Types as Types>::Size;
    fn create_rect(&self, r: Rect2) -> <Self::Types as Types>::Rect;
    fn create_color(&self, color: Color) -> <Self::Types as Types>::Color;
    fn create_gradient(&self, gradient: &scene::Gradient) -> <Self::Types as Types>::Gradient;
    /// Creates a mask whose luminance is given by drawing `commands` onto a surface of `size`
    fn create_mask(
        &self,
        commands: Vec<Command<Self::Types>>,
        size: V2,
    ) -> <Self::Types as Types>::Mask;
    fn create_blend_mode(&self, mode: BlendMode) -> <Self::Types as Types>::BlendMode;
    fn create_transform(&self, affine: scene::Affine) -> <Self::Types as Types>::Transform;
    fn create_path(&self, shape: &Shape) -> <Self::Types as Types>::Path;
    /// Creates a pattern whose tile is drawn by `contents`
    fn create_pattern(
        &self,
        pattern: &scene::Pattern,
        contents: Vec<Command<Self::Types>>,
    ) -> <Self::Types as Types>::Pattern;
    fn create_fill_rule(&self, rule: FillRule) -> <Self::Types as Types>::FillRule;
    fn create_line_cap(&self, cap: LineCap) -> <Self::Types as Types>::LineCap;
    fn create_line_join(&self, join: LineJoin) -> <Self::Types as Types>::LineJoin;
    fn create_image(&self, image: &scene::Image) -> <Self::Types as Types>::Image;
}
