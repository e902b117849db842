//! Config command

use super::Globals;
use crate::ConfigArgs;
use anyhow::Result;

pub fn run(args: ConfigArgs, globals: &Globals) -> Result<()> {
    let config = &globals.config;
    if args.dump {
        print!("{}", config.to_yaml_string()?);
        return Ok(());
    }

    let mixer = &config.mixer;
    println!("Root:           {}", globals.root.display());
    println!("Default filter: {}", config.default_filter);
    println!("Mixer:");
    println!("  method:       {}", mixer.creation_method);
    println!("  filter:       {}", mixer.resize_method);
    println!("  edges:        {} x, {} y", mixer.edge_x, mixer.edge_y);
    println!("  resolution:   {0}x{0}", mixer.resolution);
    println!("  asset:        {}", mixer.naming().asset_path());
    println!("Splitter:");
    println!("  method:       {}", config.splitter.creation_method);
    println!("  discard empty: {}", config.splitter.discard_empty_channels);
    Ok(())
}
