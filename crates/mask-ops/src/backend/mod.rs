//! Execution strategies for mixing and splitting.
//!
//! ```text
//! MaskBackend
//!     +-- PixelCopyBackend (per-slot scalar arrays, sequential)
//!     +-- MaterialBackend  (half-float render target, row-parallel draw + readback)
//!     +-- ShaderBackend    (not implemented, always fails)
//! ```
//!
//! The pixel-copy and material backends produce byte-identical results.

mod material;
mod pixel;
mod shader;

pub use material::MaterialBackend;
pub use pixel::PixelCopyBackend;
pub use shader::ShaderBackend;

use crate::engine::EngineContext;
use crate::{MixError, MixSpec, SplitError, SplitResult, SplitSpec};
use mask_core::Image;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How masks are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CreationMethod {
    /// Read and write pixels directly.
    #[default]
    PixelData,
    /// Draw into a render target and read it back.
    Material,
    /// Compute shader path (not implemented).
    Shader,
}

impl CreationMethod {
    /// All methods.
    pub const ALL: [CreationMethod; 3] = [
        CreationMethod::PixelData,
        CreationMethod::Material,
        CreationMethod::Shader,
    ];

    /// Kebab-case name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::PixelData => "pixel-data",
            Self::Material => "material",
            Self::Shader => "shader",
        }
    }

    /// Instantiates the backend for this method.
    pub fn backend(self) -> Box<dyn MaskBackend> {
        match self {
            Self::PixelData => Box::new(PixelCopyBackend),
            Self::Material => Box::new(MaterialBackend),
            Self::Shader => Box::new(ShaderBackend),
        }
    }
}

impl fmt::Display for CreationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CreationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pixel-data" | "pixel" | "pixels" => Ok(Self::PixelData),
            "material" => Ok(Self::Material),
            "shader" => Ok(Self::Shader),
            _ => Err(format!(
                "unknown creation method '{}', expected pixel-data, material or shader",
                s
            )),
        }
    }
}

/// One way of evaluating mix and split specs.
pub trait MaskBackend: Send + Sync {
    /// Method this backend implements.
    fn method(&self) -> CreationMethod;

    /// Evaluates a mix.
    fn mix(&self, ctx: &EngineContext<'_>, spec: &MixSpec) -> Result<Image, MixError>;

    /// Evaluates a split.
    fn split(&self, ctx: &EngineContext<'_>, spec: &SplitSpec) -> Result<SplitResult, SplitError>;
}
