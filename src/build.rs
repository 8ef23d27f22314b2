//! Exports the [`build_site`] function which walks the input tree and mirrors
//! it into the output tree: markdown files are rendered through the page
//! builder ([`crate::write`]), the blog directory is handed to the blog
//! builder ([`crate::blog`]), and everything else is copied as is.

use crate::blog::{build_blog, BlogSummary};
use crate::config::{SiteConfig, BLOG_FILE, SITE_FILE};
use crate::error::{Error, Result};
use crate::page::is_markdown;
use crate::write::build_page;
use gtmpl::Value;
use std::path::Path;
use walkdir::WalkDir;

/// Builds the site whose `site.yml` lives in `input_dir` into `output_dir`.
/// Directories are visited depth-first in file-name order. The template
/// directory is skipped, and the blog directory (when `blog_active` is set)
/// is built by [`build_blog`] instead of being walked.
///
/// Existing output files are overwritten, but stale ones are not removed.
pub fn build_site(input_dir: &Path, output_dir: &Path) -> Result<()> {
    let site = SiteConfig::load(input_dir, output_dir)?;
    let template_path = site.template_path();
    let (mut pages, mut copies) = (0, 0);

    let mut it = WalkDir::new(input_dir)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        .into_iter();
    while let Some(entry) = it.next() {
        let entry = entry?;
        let path = entry.path();
        // strip_prefix() should never fail since every entry is under
        // `input_dir`
        let relative = path.strip_prefix(input_dir).unwrap_or(path);

        if entry.file_type().is_dir() {
            if path == template_path {
                it.skip_current_dir();
                continue;
            }
            let target = site.output_path(relative);
            std::fs::create_dir_all(&target).map_err(|e| Error::fs(&target, e))?;
            if site.is_blog(relative) {
                build_blog(&site, relative).map_err(|e| e.annotate(path))?;
                it.skip_current_dir();
            }
            continue;
        }

        let file_name = entry.file_name();
        if file_name == SITE_FILE || file_name == BLOG_FILE {
            continue;
        }

        let parent = relative.parent().unwrap_or_else(|| Path::new(""));
        if is_markdown(path) {
            let input = std::fs::read_to_string(path).map_err(|e| Error::fs(path, e))?;
            build_page(&site, &Value::Nil, parent, &input).map_err(|e| e.annotate(path))?;
            pages += 1;
        } else {
            let target = site.output_path(relative);
            std::fs::copy(path, &target).map_err(|e| Error::fs(path, e))?;
            log::debug!("copied `{}`", target.display());
            copies += 1;
        }
    }

    log::info!(
        "built site `{}` into `{}`: {} pages, {} files copied",
        input_dir.display(),
        output_dir.display(),
        pages,
        copies
    );
    Ok(())
}

/// Builds only the blog of the site whose `site.yml` lives in `input_dir`.
/// `site.yml` must name a `blog_dir`; `blog_active` is not consulted.
pub fn build_blog_only(input_dir: &Path, output_dir: &Path) -> Result<BlogSummary> {
    let site = SiteConfig::load(input_dir, output_dir)?;
    let blog_dir = site.require_blog_dir()?;
    let target = site.output_path(blog_dir);
    std::fs::create_dir_all(&target).map_err(|e| Error::fs(&target, e))?;
    build_blog(&site, blog_dir)
}

/// Recursively copies `src` into `dst`, creating `dst` if needed.
pub(crate) fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst).map_err(|e| Error::fs(dst, e))?;
    for entry in std::fs::read_dir(src).map_err(|e| Error::fs(src, e))? {
        let entry = entry.map_err(|e| Error::fs(src, e))?;
        let path = entry.path();
        let target = dst.join(entry.file_name());
        if entry.file_type().map_err(|e| Error::fs(&path, e))?.is_dir() {
            copy_dir(&path, &target)?;
        } else {
            std::fs::copy(&path, &target).map_err(|e| Error::fs(&path, e))?;
            log::debug!("copied `{}`", target.display());
        }
    }

    Ok(())
}
