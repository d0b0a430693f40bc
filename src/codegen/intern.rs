//! Bookkeeping which lets the renderer declare each resource exactly once.

use std::{collections::HashMap, hash::Hash};

use crate::indexed_vec::{IdxType, TypedVec};

use super::ColorSpace;

/// Maps structurally equal resources to the same identifier.  Identifiers are handed out in the
/// order values are first seen: the first gets the bare `base` name, the rest get `base` followed
/// by their index (e.g. `path`, `path1`, `path2`, ...).
#[derive(Debug, Clone)]
pub(super) struct Interner<Idx, T> {
    base: &'static str,
    names: TypedVec<Idx, String>,
    lookup: HashMap<T, Idx>,
}

impl<Idx: IdxType + Copy, T: Hash + Eq + Clone> Interner<Idx, T> {
    pub fn new(base: &'static str) -> Self {
        Self {
            base,
            names: TypedVec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Gets the index of `value`, adding it to the table if it hasn't been seen before.  The
    /// returned `bool` is `true` if `value` is new (and therefore still needs declaring).
    pub fn intern(&mut self, value: &T) -> (Idx, bool) {
        if let Some(&idx) = self.lookup.get(value) {
            return (idx, false);
        }
        let name = identifier(self.base, self.names.len());
        let idx = self.names.push(name);
        self.lookup.insert(value.clone(), idx);
        log::trace!("interned {}", &self.names[idx]);
        (idx, true)
    }

    pub fn name(&self, idx: Idx) -> &str {
        &self.names[idx]
    }
}

/// The identifier given to the resource at `idx` in a category called `base`
pub(super) fn identifier(base: &str, idx: usize) -> String {
    match idx {
        0 => base.to_owned(),
        _ => format!("{}{}", base, idx),
    }
}

/// The set of [`ColorSpace`]s which have been declared so far
#[derive(Debug, Clone, Default)]
pub(super) struct ColorSpaces {
    declared: Vec<ColorSpace>,
}

impl ColorSpaces {
    /// Returns the name of `space`, first appending its declaration to `lines` if this is the
    /// first time it's been needed.
    pub fn require(&mut self, space: ColorSpace, lines: &mut Vec<String>) -> &'static str {
        if !self.declared.contains(&space) {
            self.declared.push(space);
            lines.extend(space.declaration());
        }
        space.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexed_vec::PathIdx;

    #[test]
    fn identifiers_are_assigned_in_first_seen_order() {
        let mut paths = Interner::<PathIdx, &str>::new("path");
        let (a, a_new) = paths.intern(&"a");
        let (b, b_new) = paths.intern(&"b");
        let (a_again, a_again_new) = paths.intern(&"a");
        let (c, _) = paths.intern(&"c");

        assert!(a_new && b_new && !a_again_new);
        assert_eq!(a, a_again);
        assert_eq!(paths.name(a), "path");
        assert_eq!(paths.name(b), "path1");
        assert_eq!(paths.name(c), "path2");
    }

    #[test]
    fn color_spaces_are_declared_once() {
        let mut spaces = ColorSpaces::default();
        let mut lines = vec![];
        assert_eq!(spaces.require(ColorSpace::Rgb, &mut lines), "rgb");
        assert_eq!(spaces.require(ColorSpace::Gray, &mut lines), "gray");
        assert_eq!(spaces.require(ColorSpace::Rgb, &mut lines), "rgb");
        assert_eq!(
            lines,
            vec![
                "let rgb = CGColorSpaceCreateDeviceRGB()",
                "let gray = CGColorSpaceCreateDeviceGray()",
            ]
        );
    }
}
