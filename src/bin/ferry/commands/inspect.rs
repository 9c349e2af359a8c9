//! `ferry inspect` command

use anyhow::Result;
use serde::Serialize;

use super::Session;
use crate::cli::InspectArgs;
use ferry::core::dependency::requirements;
use ferry::core::options::{OptionDecl, OptionName};
use ferry::core::platform::PlatformContext;
use ferry::core::recipe::RecipeMetadata;

#[derive(Serialize)]
struct InspectReport<'a> {
    #[serde(flatten)]
    metadata: &'a RecipeMetadata,
    version: String,
    options: Vec<&'static OptionDecl>,
    requires: Vec<String>,
    settings: PlatformContext,
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let session = Session::load(&args.recipe)?;
    let recipe = &session.recipe;

    let report = InspectReport {
        metadata: recipe.metadata(),
        version: recipe.version().to_string(),
        options: OptionName::ALL.iter().map(|o| o.decl()).collect(),
        requires: requirements(&session.platform)
            .iter()
            .map(|r| r.to_string())
            .collect(),
        settings: session.platform,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("name: {}", report.metadata.name);
    println!("version: {}", report.version);
    println!("url: {}", report.metadata.url);
    println!("license: {}", report.metadata.license);
    println!("description: {}", report.metadata.description);
    println!("settings: {}", report.settings);
    println!("options:");
    for decl in &report.options {
        let allowed: Vec<_> = decl.allowed.iter().map(|v| bool_name(*v)).collect();
        println!(
            "    {} = {} [{}]",
            decl.name,
            bool_name(decl.default),
            allowed.join(", ")
        );
    }
    println!("requires:");
    for req in &report.requires {
        println!("    {}", req);
    }

    Ok(())
}

fn bool_name(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}
