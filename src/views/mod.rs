//! HTML views for the index page and the not-found page.
//!
//! Templates are plain HTML files with `{{placeholder}}` markers, loaded once
//! at startup from the views directory. A missing file falls back to a
//! built-in template.
//!
//! # Placeholders
//!
//! - `{{path}}` - request path
//! - `{{gem_count}}` - number of distinct packages stored locally
//! - `{{gems}}` - generated `<li>` list of packages and versions
//! - `{{upstream}}` - upstream registry base URL
//! - `{{generated_at}}` - RFC 3339 render time
//!
//! Unknown placeholders render as empty strings. Substituted values are
//! escaped for use in double-quoted attributes, which also makes them safe
//! as element text.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

pub mod listing;

pub use self::listing::group_artifacts;

const INDEX_FILE: &str = "index.html";
const NOT_FOUND_FILE: &str = "404.html";

const BUILTIN_INDEX: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>gemcrow</title></head>
<body>
<h1>gemcrow</h1>
<p>Caching mirror of <a href="{{upstream}}">{{upstream}}</a>. {{gem_count}} gems stored locally.</p>
<ul>
{{gems}}
</ul>
<p><small>Generated {{generated_at}}</small></p>
</body>
</html>
"#;

const BUILTIN_NOT_FOUND: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Not found</title></head>
<body>
<h1>Not found</h1>
<p>{{path}} is not available from this mirror or from {{upstream}}.</p>
</body>
</html>
"#;

static PLACEHOLDER_PATTERN: OnceLock<Regex> = OnceLock::new();

fn placeholder_pattern() -> &'static Regex {
    PLACEHOLDER_PATTERN.get_or_init(|| {
        // Constant pattern, covered by test_placeholder_regex_is_valid
        Regex::new(r"\{\{\s*([a-z_]+)\s*\}\}").expect("Invalid placeholder regex")
    })
}

/// Named view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Index,
    NotFound,
}

/// Values available to a view
#[derive(Debug, Clone, Default)]
pub struct ViewContext {
    pub request_path: String,
    /// Stored artifact file names (`<name>-<version>.gem`)
    pub artifacts: Vec<String>,
}

impl ViewContext {
    pub fn new(request_path: impl Into<String>) -> Self {
        Self {
            request_path: request_path.into(),
            artifacts: Vec::new(),
        }
    }

    pub fn with_artifacts(mut self, artifacts: Vec<String>) -> Self {
        self.artifacts = artifacts;
        self
    }
}

/// Renders the index and not-found views
#[derive(Debug, Clone)]
pub struct ViewRenderer {
    index: String,
    not_found: String,
    upstream_base: String,
}

impl ViewRenderer {
    /// Renderer using only the built-in templates
    pub fn builtin(upstream_base: impl Into<String>) -> Self {
        Self {
            index: BUILTIN_INDEX.to_string(),
            not_found: BUILTIN_NOT_FOUND.to_string(),
            upstream_base: upstream_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Load templates from `dir`; files that do not exist use the built-ins.
    pub fn load(dir: Option<&Path>, upstream_base: impl Into<String>) -> std::io::Result<Self> {
        let mut renderer = Self::builtin(upstream_base);
        let Some(dir) = dir else {
            return Ok(renderer);
        };

        if let Some(template) = read_template(&dir.join(INDEX_FILE))? {
            renderer.index = template;
        }
        if let Some(template) = read_template(&dir.join(NOT_FOUND_FILE))? {
            renderer.not_found = template;
        }

        tracing::debug!(dir = %dir.display(), "Loaded view templates");
        Ok(renderer)
    }

    pub fn render(&self, view: View, ctx: &ViewContext) -> String {
        let template = match view {
            View::Index => &self.index,
            View::NotFound => &self.not_found,
        };

        let grouped = group_artifacts(ctx.artifacts.as_slice());

        placeholder_pattern()
            .replace_all(template, |caps: &regex::Captures| match &caps[1] {
                "path" => attr(&ctx.request_path).into_owned(),
                "upstream" => attr(&self.upstream_base).into_owned(),
                "generated_at" => chrono::Utc::now().to_rfc3339(),
                "gem_count" => grouped.len().to_string(),
                "gems" => self.gem_list_html(&grouped),
                _ => String::new(),
            })
            .into_owned()
    }

    fn gem_list_html(&self, grouped: &BTreeMap<String, Vec<String>>) -> String {
        let mut html = String::new();
        for (name, versions) in grouped {
            html.push_str(&format!(
                "<li><a href=\"{}/gems/{}\">{}</a>",
                attr(&self.upstream_base),
                attr(&urlencoding::encode(name)),
                text(name),
            ));
            for version in versions {
                let file_name = format!("{}-{}.gem", name, version);
                html.push_str(&format!(
                    " <a href=\"/gems/{}\">{}</a>",
                    attr(&urlencoding::encode(&file_name)),
                    text(version),
                ));
            }
            html.push_str("</li>\n");
        }
        html
    }
}

fn read_template(path: &Path) -> std::io::Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(template) => Ok(Some(template)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
