//! Compute shader backend. Not implemented: every call fails.

use super::{CreationMethod, MaskBackend};
use crate::engine::EngineContext;
use crate::notify::Notice;
use crate::{MixError, MixSpec, SplitError, SplitResult, SplitSpec};
use mask_core::Image;

/// Placeholder for a compute shader path.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShaderBackend;

const REASON: &str = "the shader creation method is not available, use pixel-data or material";

impl MaskBackend for ShaderBackend {
    fn method(&self) -> CreationMethod {
        CreationMethod::Shader
    }

    fn mix(&self, ctx: &EngineContext<'_>, _spec: &MixSpec) -> Result<Image, MixError> {
        ctx.notifier.notify(Notice::Unsupported {
            what: "Shader-based mask mixing".into(),
        });
        Err(MixError::Unsupported(REASON.into()))
    }

    fn split(&self, ctx: &EngineContext<'_>, _spec: &SplitSpec) -> Result<SplitResult, SplitError> {
        ctx.notifier.notify(Notice::Unsupported {
            what: "Shader-based channel splitting".into(),
        });
        Err(SplitError::Unsupported(REASON.into()))
    }
}
