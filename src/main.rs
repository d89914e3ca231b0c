use std::path::PathBuf;

use clap::{command, value_parser, Arg, ArgAction, ArgMatches};
use context::Context;
use generator::generate;
use log::{error, info};

mod context;
mod frontmatter;
mod generator;
mod heuristics;
mod markdown;
mod metadata;

fn cli() -> clap::Command {
    command!().args(&[
        Arg::new("root")
            .long("root")
            .help("Base directory; relative paths below are resolved against it")
            .value_parser(value_parser!(PathBuf))
            .default_value("."),
        Arg::new("blog_dir")
            .long("blog-dir")
            .help("Directory of blog posts (Markdown) [default: client/public/blog]")
            .value_parser(value_parser!(PathBuf)),
        Arg::new("projects_dir")
            .long("projects-dir")
            .help("Directory of project pages (Markdown) [default: client/public/projects]")
            .value_parser(value_parser!(PathBuf)),
        Arg::new("blog_output")
            .long("blog-output")
            .help("Posts manifest to write [default: client/public/blog.json]")
            .value_parser(value_parser!(PathBuf)),
        Arg::new("projects_output")
            .long("projects-output")
            .help("Projects manifest to write [default: client/public/projects.json]")
            .value_parser(value_parser!(PathBuf)),
        Arg::new("excerpt_length")
            .long("excerpt-length")
            .help("Characters kept in a derived post excerpt")
            .value_parser(value_parser!(usize))
            .default_value("150"),
        Arg::new("description_length")
            .long("description-length")
            .help("Characters kept in a derived project description")
            .value_parser(value_parser!(usize))
            .default_value("160"),
        Arg::new("check")
            .long("check")
            .help("Read and derive every entry, but do not write the manifests")
            .action(ArgAction::SetTrue),
    ])
}

fn context_from_matches(matches: &ArgMatches) -> Context {
    let root: &PathBuf = matches.get_one("root").expect("root has a default");
    let mut ctx = Context::with_root(root);

    let resolve = |name: &str, slot: &mut PathBuf| {
        if let Some(path) = matches.get_one::<PathBuf>(name) {
            *slot = root.join(path);
        }
    };
    resolve("blog_dir", &mut ctx.blog_dir);
    resolve("projects_dir", &mut ctx.projects_dir);
    resolve("blog_output", &mut ctx.blog_output);
    resolve("projects_output", &mut ctx.projects_output);

    ctx.excerpt_length = *matches
        .get_one::<usize>("excerpt_length")
        .expect("excerpt_length has a default");
    ctx.description_length = *matches
        .get_one::<usize>("description_length")
        .expect("description_length has a default");
    ctx.check_only = matches.get_flag("check");
    ctx
}

fn run(ctx: &Context) -> anyhow::Result<()> {
    ctx.validate()?;
    let summary = generate(ctx)?;
    info!(
        "Done: {} posts, {} projects{}",
        summary.posts,
        summary.projects,
        if ctx.check_only { " (check only)" } else { "" }
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = cli().get_matches();
    let ctx = context_from_matches(&matches);

    if let Err(e) = run(&ctx) {
        error!("Failed to generate manifests: {e:?}");
        std::process::exit(1);
    }
}
