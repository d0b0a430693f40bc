//! A [`Types`] family which keeps every scene value as-is.  This is what a rasterizing backend
//! would consume, and what the tests use to inspect lowered [`Command`]s without going through
//! generated text.

use crate::{
    scene::{self, Affine, BlendMode, Color, FillRule, LineCap, LineJoin, Shape},
    utils::Rect2,
    V2,
};

use super::{Command, Provider, Types};

/// Marker type for the identity [`Types`] family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueTypes;

impl Types for ValueTypes {
    type Float = f32;
    type Point = V2;
    type Size = V2;
    type Rect = Rect2;
    type Color = Color;
    type Gradient = scene::Gradient;
    type Mask = ValueMask;
    type Path = Shape;
    type Pattern = ValuePattern;
    type Transform = Affine;
    type BlendMode = BlendMode;
    type FillRule = FillRule;
    type LineCap = LineCap;
    type LineJoin = LineJoin;
    type Image = scene::Image;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueMask {
    pub commands: Vec<Command<ValueTypes>>,
    pub size: V2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValuePattern {
    pub tile: Rect2,
    pub contents: Vec<Command<ValueTypes>>,
}

/// [`Provider`] for [`ValueTypes`]
#[derive(Debug, Clone, Copy)]
pub struct ValueProvider {
    pub transparency_layers: bool,
}

impl Default for ValueProvider {
    fn default() -> Self {
        Self {
            transparency_layers: true,
        }
    }
}

impl Provider for ValueProvider {
    type Types = ValueTypes;

    fn supports_transparency_layers(&self) -> bool {
        self.transparency_layers
    }

    fn create_float(&self, f: f32) -> f32 {
        f
    }

    fn create_point(&self, p: V2) -> V2 {
        p
    }

    fn create_size(&self, s: V2) -> V2 {
        s
    }

    fn create_rect(&self, r: Rect2) -> Rect2 {
        r
    }

    fn create_color(&self, color: Color) -> Color {
        color
    }

    fn create_gradient(&self, gradient: &scene::Gradient) -> scene::Gradient {
        gradient.clone()
    }

    fn create_mask(&self, commands: Vec<Command<ValueTypes>>, size: V2) -> ValueMask {
        ValueMask { commands, size }
    }

    fn create_blend_mode(&self, mode: BlendMode) -> BlendMode {
        mode
    }

    fn create_transform(&self, affine: Affine) -> Affine {
        affine
    }

    fn create_path(&self, shape: &Shape) -> Shape {
        shape.clone()
    }

    fn create_pattern(
        &self,
        pattern: &scene::Pattern,
        contents: Vec<Command<ValueTypes>>,
    ) -> ValuePattern {
        ValuePattern {
            tile: pattern.tile,
            contents,
        }
    }

    fn create_fill_rule(&self, rule: FillRule) -> FillRule {
        rule
    }

    fn create_line_cap(&self, cap: LineCap) -> LineCap {
        cap
    }

    fn create_line_join(&self, join: LineJoin) -> LineJoin {
        join
    }

    fn create_image(&self, image: &scene::Image) -> scene::Image {
        image.clone()
    }
}
