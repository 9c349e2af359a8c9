//! `ferry config` command
//!
//! Prints the cache variables that `create` would pass to CMake.

use anyhow::Result;

use super::Session;
use crate::cli::ConfigArgs;
use ferry::ops::ferry_create::{evaluate, resolve_options};

pub fn execute(args: ConfigArgs) -> Result<()> {
    let session = Session::load(&args.recipe)?;
    let options = resolve_options(session.config.option_assignments(), &args.options)?;

    let eval = evaluate(&session.recipe, &options, &session.platform);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&eval)?);
        return Ok(());
    }

    println!("{} ({})", eval.reference, eval.settings);
    println!("options:");
    for (name, value) in options.iter() {
        println!("    {} = {}", name, if value { "True" } else { "False" });
    }
    println!("cache variables:");
    for (key, value) in eval.cache_variables.iter() {
        println!("    {}:{} = {}", key, value.cmake_type(), value);
    }
    println!("requires:");
    for req in &eval.requires {
        println!("    {}", req);
    }

    Ok(())
}
