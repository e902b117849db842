//! Split command

use super::Globals;
use crate::SplitArgs;
use anyhow::{Context, Result};
use mask_io::{FileStore, ImageHandle};
use mask_ops::SplitSpec;
use tracing::{info, warn};

fn discard_empty(args: &SplitArgs, configured: bool) -> bool {
    if args.keep_empty {
        false
    } else if args.discard_empty {
        true
    } else {
        configured
    }
}

pub fn run(args: SplitArgs, globals: &Globals) -> Result<()> {
    let discard = discard_empty(&args, globals.config.splitter.discard_empty_channels);
    let tools = globals.tools();
    let mut store = FileStore::new(args.out_dir.as_ref().unwrap_or(&globals.root));

    for input in &args.inputs {
        let handle = ImageHandle::new(input);
        let spec = SplitSpec::new(handle.clone()).with_discard_empty(discard);
        // With --out-dir the channels land directly in it, otherwise next to the input.
        let base = match (&args.out_dir, input.file_name()) {
            (Some(_), Some(file_name)) => ImageHandle::new(file_name),
            _ => handle,
        };
        let saved = tools
            .export_split(&spec, &base, &mut store)
            .with_context(|| format!("Failed to split {}", input.display()))?;

        if saved.is_empty() {
            warn!("{}: every channel was constant, nothing written", input.display());
        }
        for (channel, path) in &saved {
            println!("{channel}: {}", store.image_path(path).display());
        }
    }

    info!("split {} texture(s)", args.inputs.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(keep: bool, discard: bool) -> SplitArgs {
        SplitArgs {
            inputs: vec!["a.png".into()],
            keep_empty: keep,
            discard_empty: discard,
            out_dir: None,
        }
    }

    #[test]
    fn test_flags_override_config() {
        assert!(discard_empty(&args(false, false), true));
        assert!(!discard_empty(&args(false, false), false));
        assert!(!discard_empty(&args(true, false), true));
        assert!(discard_empty(&args(false, true), false));
    }
}
