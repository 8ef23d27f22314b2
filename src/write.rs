//! The page builder: turns one content file into one rendered output file.

use crate::config::SiteConfig;
use crate::error::{Error, Result};
use crate::page::PageRecord;
use crate::template::Template;
use crate::value::site_scope;
use gtmpl::Value;
use std::path::{Path, PathBuf};

/// A page that has been rendered and written to disk.
#[derive(Clone, Debug)]
pub struct Built {
    /// The parsed content file.
    pub record: PageRecord,

    /// Where the rendered page was written.
    pub path: PathBuf,
}

impl Built {
    /// The output file's name, e.g., `about.html`.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Parses `input`, renders it with the template it names, and writes the
/// result to `{output_dir}/{page_dir}/{slug}{ext}`, where `{ext}` is the
/// template's own extension. `blog` is the blog scope for posts and
/// [`Value::Nil`] for plain pages.
///
/// The output directory must already exist: it's created by the caller
/// before any page in it is built. An existing file is overwritten.
pub fn build_page(site: &SiteConfig, blog: &Value, page_dir: &Path, input: &str) -> Result<Built> {
    let record = PageRecord::parse(input)?;
    let template = Template::load(&site.template_path(), &record.template)?;

    let rendered = template.render(
        site_scope(site, page_dir),
        blog.clone(),
        Value::from(&record),
    )?;

    let path = site
        .output_path(page_dir)
        .join(format!("{}{}", record.slug, template.extension()));
    std::fs::write(&path, rendered).map_err(|err| Error::Write {
        path: path.clone(),
        err,
    })?;
    log::debug!("wrote `{}`", path.display());

    Ok(Built { record, path })
}
