//! Conversions from YAML data and [`PageRecord`]s into template [`Value`]s.

use crate::config::SiteConfig;
use crate::page::PageRecord;
use gtmpl::Value;
use serde_yaml::{Mapping, Value as Yaml};
use std::collections::HashMap;
use std::path::Path;

/// Converts a YAML value into a template value. Mappings become objects whose
/// keys are the YAML keys rendered as strings.
pub fn from_yaml(yaml: &Yaml) -> Value {
    match yaml {
        Yaml::Null => Value::Nil,
        Yaml::Bool(b) => Value::Bool(*b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                Value::from(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Sequence(seq) => Value::Array(seq.iter().map(from_yaml).collect()),
        Yaml::Mapping(m) => Value::Object(from_mapping(m)),
    }
}

/// Converts a YAML mapping into the fields of a template object. Keys that
/// aren't scalars are dropped.
pub fn from_mapping(mapping: &Mapping) -> HashMap<String, Value> {
    mapping
        .iter()
        .filter_map(|(k, v)| {
            let key = match k {
                Yaml::String(s) => s.clone(),
                Yaml::Number(n) => n.to_string(),
                Yaml::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key, from_yaml(v)))
        })
        .collect()
}

/// Builds the `site` scope: every key from `site.yml` plus the build paths
/// and the directory of the page being rendered, relative to the input root.
pub fn site_scope(site: &SiteConfig, page_dir: &Path) -> Value {
    let mut m = from_mapping(&site.data);
    let path = |p: &Path| Value::String(p.display().to_string());
    m.insert("input_dir".to_owned(), path(site.input_dir.as_path()));
    m.insert("output_dir".to_owned(), path(site.output_dir.as_path()));
    m.insert("template_path".to_owned(), path(site.template_path().as_path()));
    m.insert("page_dir".to_owned(), path(page_dir));
    Value::Object(m)
}

impl From<&PageRecord> for Value {
    /// Converts a [`PageRecord`] into an object holding every metadata field
    /// plus `page_text` and `page_html`.
    fn from(record: &PageRecord) -> Value {
        let mut m = from_mapping(&record.metadata);
        m.insert("page_text".to_owned(), Value::String(record.text.clone()));
        m.insert("page_html".to_owned(), Value::String(record.html.clone()));
        Value::Object(m)
    }
}
