//! `ferry create` command

use anyhow::Result;

use super::Session;
use crate::cli::CreateArgs;
use ferry::builder::{CMakeTool, ProgressTool};
use ferry::ops::ferry_create::{create, resolve_options};
use ferry::util::diagnostic::{emit, Diagnostic};
use ferry::util::fs::absolute_path;

pub fn execute(args: CreateArgs, verbose: bool) -> Result<()> {
    let session = Session::load(&args.recipe)?;
    let build = &session.config.build;
    let source = absolute_path(session.recipe.source_dir())?;

    let options = resolve_options(session.config.option_assignments(), &args.options)?;

    // Build dir: CLI > config (relative to source) > <source>/build
    let build_dir = args
        .build_dir
        .clone()
        .or_else(|| build.build_dir.as_ref().map(|d| source.join(d)))
        .unwrap_or_else(|| source.join("build"));
    let build_dir = absolute_path(&build_dir)?;

    let mut tool = CMakeTool::new(source.clone(), build_dir.clone(), session.platform)
        .generator(args.generator.clone().or_else(|| build.generator.clone()))
        .jobs(args.jobs.or(build.jobs))
        .verbose(verbose);

    // Prefix: CLI > config (relative to build dir) > <build_dir>/package
    if let Some(prefix) = args
        .prefix
        .clone()
        .or_else(|| build.prefix.as_ref().map(|p| build_dir.join(p)))
    {
        tool = tool.with_install_prefix(absolute_path(&prefix)?);
    }

    let result = create(
        &session.recipe,
        &options,
        &session.platform,
        ProgressTool::new(tool, !verbose),
    )?;
    let info = &result.info;

    if args.json {
        println!("{}", serde_json::to_string_pretty(info)?);
        return Ok(());
    }

    if info.libraries.is_empty() {
        emit(
            &Diagnostic::warning("the install step produced no libraries")
                .with_location(result.info_path.clone())
                .with_suggestion("Check that ENABLE_STATIC or ENABLE_SHARED took effect"),
            false,
        );
    }

    eprintln!(
        "{:>12} {} -> {}",
        "Packaged",
        session.recipe.reference(),
        result.info_path.display()
    );
    let libraries: Vec<_> = info.libraries.iter().map(String::as_str).collect();
    println!("libraries: {}", libraries.join(", "));
    if !info.system_libraries.is_empty() {
        println!("system libraries: {}", info.system_libraries.join(", "));
    }
    println!("link: {}", info.link_args(session.platform.compiler).join(" "));
    if let Some(revision) = &info.revision {
        println!("revision: {}", revision);
    }

    Ok(())
}
