//! Loads `site.yml` and `blog.yml` into immutable [`SiteConfig`] and
//! [`BlogConfig`] values. Recognized keys are extracted into typed fields;
//! the whole document is also kept as a [`Mapping`] so that free-form keys
//! reach the templates as `.site.*` and `.blog.*`.

use crate::error::{Error, Result};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::convert::TryFrom;
use std::path::{Path, PathBuf};

/// The name of the site configuration file at the root of the input tree.
pub const SITE_FILE: &str = "site.yml";

/// The name of the blog configuration file inside the blog directory.
pub const BLOG_FILE: &str = "blog.yml";

#[derive(Deserialize)]
struct Site {
    template_dir: PathBuf,

    #[serde(default)]
    blog_dir: Option<PathBuf>,

    #[serde(default)]
    blog_active: bool,
}

#[derive(Deserialize)]
struct Blog {
    template: String,
    max_posts: i64,
}

/// Site-level settings for one build. Constructed once and never mutated; the
/// directory currently being built is passed alongside it instead.
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// The root of the source tree (the directory holding `site.yml`).
    pub input_dir: PathBuf,

    /// The root of the output tree.
    pub output_dir: PathBuf,

    /// The template directory, relative to `input_dir`.
    pub template_dir: PathBuf,

    /// The blog directory, relative to both `input_dir` and `output_dir`.
    pub blog_dir: Option<PathBuf>,

    /// Whether the blog directory is built as a blog or as plain pages.
    pub blog_active: bool,

    /// Every key from `site.yml`, recognized or not.
    pub data: Mapping,
}

impl SiteConfig {
    /// Loads `{input_dir}/site.yml`.
    pub fn load(input_dir: &Path, output_dir: &Path) -> Result<SiteConfig> {
        let path = input_dir.join(SITE_FILE);
        let data = load_yaml(&path)?;
        let site: Site = from_mapping(&path, &data)?;
        Ok(SiteConfig {
            input_dir: input_dir.to_owned(),
            output_dir: output_dir.to_owned(),
            template_dir: site.template_dir,
            blog_dir: site.blog_dir,
            blog_active: site.blog_active,
            data,
        })
    }

    /// The absolute (or cwd-relative) path of the template directory.
    pub fn template_path(&self) -> PathBuf {
        self.input_dir.join(&self.template_dir)
    }

    /// The output directory mirroring the relative source directory
    /// `page_dir`.
    pub fn output_path(&self, page_dir: &Path) -> PathBuf {
        self.output_dir.join(page_dir)
    }

    /// Returns `true` if `page_dir` is the blog directory and blogging is
    /// enabled.
    pub fn is_blog(&self, page_dir: &Path) -> bool {
        self.blog_active && self.blog_dir.as_deref() == Some(page_dir)
    }

    /// Returns the configured blog directory, or a configuration error when
    /// `site.yml` doesn't name one.
    pub fn require_blog_dir(&self) -> Result<&Path> {
        self.blog_dir.as_deref().ok_or_else(|| Error::Configuration {
            path: self.input_dir.join(SITE_FILE),
            message: "missing key `blog_dir`".to_owned(),
        })
    }
}

/// Blog-level settings loaded from `blog.yml`.
#[derive(Clone, Debug)]
pub struct BlogConfig {
    /// The index template's file name, relative to the template directory.
    pub template: String,

    /// The maximum number of posts per index page. Always positive.
    pub max_posts: usize,

    /// Every key from `blog.yml`, recognized or not.
    pub data: Mapping,
}

impl BlogConfig {
    /// Loads `{blog_source_dir}/blog.yml`.
    pub fn load(blog_source_dir: &Path) -> Result<BlogConfig> {
        let path = blog_source_dir.join(BLOG_FILE);
        let data = load_yaml(&path)?;
        let blog: Blog = from_mapping(&path, &data)?;
        let max_posts = match usize::try_from(blog.max_posts) {
            Ok(n) if n > 0 => n,
            _ => {
                return Err(Error::Configuration {
                    path,
                    message: format!(
                        "`max_posts` must be a positive number of posts, got {}",
                        blog.max_posts
                    ),
                })
            }
        };
        Ok(BlogConfig {
            template: blog.template,
            max_posts,
            data,
        })
    }
}

fn load_yaml(path: &Path) -> Result<Mapping> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Configuration {
        path: path.to_owned(),
        message: e.to_string(),
    })?;
    match serde_yaml::from_str::<Value>(&contents) {
        Ok(Value::Mapping(m)) => Ok(m),
        Ok(Value::Null) => Ok(Mapping::new()),
        Ok(_) => Err(Error::Configuration {
            path: path.to_owned(),
            message: "expected a mapping".to_owned(),
        }),
        Err(e) => Err(Error::Configuration {
            path: path.to_owned(),
            message: e.to_string(),
        }),
    }
}

fn from_mapping<T: serde::de::DeserializeOwned>(path: &Path, data: &Mapping) -> Result<T> {
    serde_yaml::from_value(Value::Mapping(data.clone())).map_err(|e| Error::Configuration {
        path: path.to_owned(),
        message: e.to_string(),
    })
}
