use anyhow::{Context, Result};
use clap::{crate_version, App, AppSettings, Arg, SubCommand};
use quire::build::{build_blog_only, build_site};
use std::path::Path;

const KINDS: &[&str] = &["site", "blog"];

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = App::new("quire")
        .version(crate_version!())
        .about("Renders a tree of markdown pages and a paginated blog through templates")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("build")
                .about("Builds a site or just its blog")
                .arg(
                    Arg::with_name("kind")
                        .required(true)
                        .possible_values(KINDS)
                        .help("What to build"),
                )
                .arg(
                    Arg::with_name("input")
                        .required(true)
                        .help("The directory holding site.yml"),
                )
                .arg(
                    Arg::with_name("output")
                        .required(true)
                        .help("The directory to write the site into"),
                ),
        )
        .subcommand(
            SubCommand::with_name("init")
                .about("Scaffolds a new site or blog (not yet implemented)")
                .arg(Arg::with_name("kind").required(true).possible_values(KINDS))
                .arg(Arg::with_name("input"))
                .arg(Arg::with_name("output")),
        )
        .get_matches();

    match matches.subcommand() {
        ("build", Some(matches)) => {
            // clap enforces that these are present
            let input = Path::new(matches.value_of("input").unwrap_or_default());
            let output = Path::new(matches.value_of("output").unwrap_or_default());
            match matches.value_of("kind") {
                Some("blog") => {
                    build_blog_only(input, output).with_context(|| {
                        format!("building blog from `{}`", input.display())
                    })?;
                }
                _ => build_site(input, output)
                    .with_context(|| format!("building site from `{}`", input.display()))?,
            }
            Ok(())
        }
        ("init", Some(matches)) => {
            log::warn!(
                "`init {}` does nothing yet",
                matches.value_of("kind").unwrap_or_default()
            );
            Ok(())
        }
        _ => Ok(()),
    }
}
