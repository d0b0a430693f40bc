//! Error types.  Generating code from a well-formed scene can't fail, so these only cover loading
//! configuration and validating command streams handed in from outside the crate.

use thiserror::Error;

/// Result type for fallible `vgir` operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A [`CodeGenOpts`](crate::CodeGenOpts) couldn't be parsed from TOML
    #[error("invalid code generation config: {0}")]
    Config(#[from] toml::de::Error),

    /// A [`CodeGenOpts`](crate::CodeGenOpts) asked for more decimal places than an `f32` holds
    #[error("precision of {precision} decimal places is more than the maximum of {max}")]
    Precision { precision: u32, max: u32 },

    /// A command stream broke push/pop stack discipline
    #[error("unbalanced command stream: {0}")]
    Unbalanced(#[from] BalanceError),
}

/// The ways in which a sequence of [`Command`](crate::ir::Command)s can break stack discipline
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceError {
    #[error("pop at command {index} has no matching push")]
    UnmatchedPop { index: usize },
    #[error("pop at command {index} closes a bracket opened by a different kind of push")]
    MismatchedPop { index: usize },
    #[error("{open} bracket(s) still open at the end of the stream")]
    Unclosed { open: usize },
}
