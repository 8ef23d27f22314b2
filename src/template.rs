//! Loads templates from the template directory and renders them against the
//! three data scopes visible to every template: `site`, `blog`, and `page`.
//!
//! Referencing a field that a scope doesn't have is an error, not an empty
//! string: `{{.page.subtitle}}` fails the build for any page without a
//! `subtitle`, and so does `{{if .page.subtitle}}`. A layout shared by pages
//! that only sometimes carry a field should have every page declare it, with
//! `~` where it has no value, and guard it with `{{if}}` or `{{with}}`:
//!
//! ```text
//! {{with .page.subtitle}}<h2>{{.}}</h2>{{end}}
//! ```
//!
//! A nil field is false, so the guarded block is skipped.

use crate::error::{Error, Result};
use gtmpl::{Context, Value};
use std::collections::HashMap;
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// A parsed template together with the path it was loaded from.
pub struct Template {
    path: PathBuf,
    template: gtmpl::Template,
}

impl Template {
    /// Loads and parses `{dir}/{name}`. Fails with
    /// [`Error::TemplateNotFound`] if the file doesn't exist.
    pub fn load(dir: &Path, name: &str) -> Result<Template> {
        let path = dir.join(name);
        if !path.is_file() {
            return Err(Error::TemplateNotFound(path));
        }
        let contents = std::fs::read_to_string(&path).map_err(|e| Error::fs(&path, e))?;

        let mut template = gtmpl::Template::default();
        if let Err(e) = template.parse(contents.as_str()) {
            return Err(template_error(&path, e));
        }
        Ok(Template { path, template })
    }

    /// The extension of the template's own file name, including the leading
    /// dot, or an empty string if it has none. Output files take the
    /// extension of the template that rendered them.
    pub fn extension(&self) -> String {
        match self.path.extension() {
            Some(ext) => format!(".{}", ext.to_string_lossy()),
            None => String::new(),
        }
    }

    /// Renders the template with `site`, `blog`, and `page` as the top-level
    /// fields of the dot context.
    pub fn render(&self, site: Value, blog: Value, page: Value) -> Result<String> {
        let mut scopes: HashMap<String, Value> = HashMap::with_capacity(3);
        scopes.insert("site".to_owned(), site);
        scopes.insert("blog".to_owned(), blog);
        scopes.insert("page".to_owned(), page);

        let context =
            Context::from(Value::Object(scopes)).map_err(|e| template_error(&self.path, e))?;
        let mut out: Vec<u8> = Vec::new();
        self.template
            .execute(&mut out, &context)
            .map_err(|e| template_error(&self.path, e))?;
        String::from_utf8(out).map_err(|e| template_error(&self.path, e))
    }
}

fn template_error<E: Display>(path: &Path, err: E) -> Error {
    Error::Template {
        path: path.to_owned(),
        message: err.to_string(),
    }
}
