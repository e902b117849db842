//! Mix command
//!
//! Packs up to four sources into one mask. Without `-o` the result is
//! exported under the root as `<folder>/<prefix>_<name>_<suffix>.png`.

use super::Globals;
use crate::{MixArgs, SlotArg};
use anyhow::{Context, Result, bail};
use mask_core::Channel;
use mask_io::{FileStore, ImageHandle};
use mask_ops::{ChannelSlot, EdgeMode, MixSpec, ResizeFilter};
use tracing::info;

fn slot(
    arg: Option<SlotArg>,
    channel: Channel,
    filter: Option<ResizeFilter>,
    fallback: ResizeFilter,
    (edge_x, edge_y): (EdgeMode, EdgeMode),
) -> ChannelSlot {
    let filter = filter.unwrap_or(fallback);
    let slot = match arg {
        Some(arg) => ChannelSlot::new(ImageHandle::new(arg.path), arg.channel.unwrap_or(channel)),
        None => ChannelSlot::empty(),
    };
    slot.with_filter(filter).with_edge_modes(edge_x, edge_y)
}

pub fn run(args: MixArgs, globals: &Globals) -> Result<()> {
    if args.red.is_none() && args.green.is_none() && args.blue.is_none() && args.alpha.is_none() {
        bail!("Specify at least one of --red, --green, --blue, --alpha");
    }

    let config = &globals.config;
    let mut spec = MixSpec::from_config(config);
    if let Some(resolution) = args.resolution {
        spec = spec.with_resolution(resolution);
    }
    let fallback = args.filter.unwrap_or(config.mixer.resize_method);
    let edges = (
        args.edge_x.unwrap_or(config.mixer.edge_x),
        args.edge_y.unwrap_or(config.mixer.edge_y),
    );

    for (channel, arg, filter) in [
        (Channel::Red, args.red, args.filter_red),
        (Channel::Green, args.green, args.filter_green),
        (Channel::Blue, args.blue, args.filter_blue),
        (Channel::Alpha, args.alpha, args.filter_alpha),
    ] {
        spec.set_slot(channel, slot(arg, channel, filter, fallback, edges));
    }

    let tools = globals.tools();

    if let Some(output) = &args.output {
        let packed = tools.mix(&spec)?;
        mask_io::png::write(output, &packed)
            .with_context(|| format!("Failed to save: {}", output.display()))?;
        info!("wrote {}x{} mask to {}", packed.width(), packed.height(), output.display());
        return Ok(());
    }

    let mut naming = config.mixer.naming();
    if let Some(name) = args.name {
        naming.name = name;
    }
    if let Some(prefix) = args.prefix {
        naming.prefix = prefix;
    }
    if let Some(suffix) = args.suffix {
        naming.suffix = suffix;
    }
    if let Some(folder) = args.folder {
        naming.folder = folder;
    }

    let mut store = FileStore::new(&globals.root);
    let saved = tools.export_mix(&spec, &naming, &mut store)?;
    println!("{}", store.image_path(&saved).display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_defaults_to_own_channel() {
        let arg = SlotArg {
            path: "ao.png".into(),
            channel: None,
        };
        let clamp = (EdgeMode::Clamp, EdgeMode::Clamp);
        let s = slot(Some(arg), Channel::Blue, None, ResizeFilter::Box, clamp);
        assert_eq!(s.selector, Channel::Blue);
        assert_eq!(s.filter, ResizeFilter::Box);

        let s = slot(None, Channel::Alpha, Some(ResizeFilter::Point), ResizeFilter::Box, clamp);
        assert!(s.is_empty());
        assert_eq!(s.filter, ResizeFilter::Point);
    }

    #[test]
    fn test_slot_takes_edge_modes() {
        let arg = SlotArg {
            path: "tile.png".into(),
            channel: Some(Channel::Red),
        };
        let s = slot(Some(arg), Channel::Green, None, ResizeFilter::Box, (EdgeMode::Wrap, EdgeMode::Clamp));
        assert_eq!((s.edge_x, s.edge_y), (EdgeMode::Wrap, EdgeMode::Clamp));
    }
}
