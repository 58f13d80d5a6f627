//! Markdown content for service pages and static pages.
//!
//! Files are loaded from the content directory once at startup, frontmatter
//! is parsed as YAML and the body is rendered to HTML.
//!
//! ```text
//! content/
//!   services/<slug>.md   title, summary, order, icon
//!   pages/<slug>.md      title, description, updated_at
//! ```
//!
//! # Image Shortcodes
//!
//! ```markdown
//! {{image "https://cdn.example/deck.jpg" alt="Finished deck" caption="Cedar, 2024"}}
//! ```
//!
//! renders a lazily loaded `<figure>`.

use chrono::NaiveDate;
use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};

/// Lowercase words joined by single hyphens.
static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("Invalid regex"));

static IMAGE_SHORTCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\{\{image\s+"([^"]+)"([^}]*)\}\}"#).expect("Invalid regex"));

static ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\w+)="([^"]*)""#).expect("Invalid regex"));

/// Longest slug accepted in a URL.
const MAX_SLUG_LEN: usize = 100;

/// Average reading speed used for the reading-time estimate.
const WORDS_PER_MINUTE: usize = 200;

/// Whether `slug` can name a page, service, project, post or posting.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    slug.len() <= MAX_SLUG_LEN && SLUG_RE.is_match(slug)
}

/// Frontmatter for a service page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceMeta {
    pub title: String,
    pub summary: String,
    /// Position in the services list, lowest first.
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Frontmatter for a static page (about, warranty, privacy...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub updated_at: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Service {
    pub slug: String,
    #[serde(flatten)]
    pub meta: ServiceMeta,
    pub content_html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub slug: String,
    #[serde(flatten)]
    pub meta: PageMeta,
    pub content_html: String,
}

/// Content store that holds all loaded content in memory.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    services: Arc<Vec<Service>>,
    pages: Arc<HashMap<String, Page>>,
}

impl ContentStore {
    /// Load all content below `content_dir`.
    ///
    /// Missing subdirectories are treated as empty. A file that fails to
    /// parse is logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing content directory cannot be read.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let mut services: Vec<Service> = load_dir(&content_dir.join("services"))?
            .into_iter()
            .map(|(slug, meta, content_html)| Service {
                slug,
                meta,
                content_html,
            })
            .collect();
        services.sort_by(|a, b| {
            a.meta
                .order
                .cmp(&b.meta.order)
                .then_with(|| a.meta.title.cmp(&b.meta.title))
        });

        let pages = load_dir(&content_dir.join("pages"))?
            .into_iter()
            .map(|(slug, meta, content_html)| {
                (
                    slug.clone(),
                    Page {
                        slug,
                        meta,
                        content_html,
                    },
                )
            })
            .collect();

        Ok(Self {
            services: Arc::new(services),
            pages: Arc::new(pages),
        })
    }

    /// Services in display order.
    #[must_use]
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    #[must_use]
    pub fn get_service(&self, slug: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.slug == slug)
    }

    #[must_use]
    pub fn get_page(&self, slug: &str) -> Option<&Page> {
        self.pages.get(slug)
    }
}

/// Parse every `*.md` file in `dir` into `(slug, meta, html)`.
fn load_dir<M>(dir: &Path) -> Result<Vec<(String, M, String)>, ContentError>
where
    M: for<'de> Deserialize<'de>,
{
    let mut loaded = Vec::new();

    if !dir.exists() {
        tracing::warn!("Content directory does not exist: {:?}", dir);
        return Ok(loaded);
    }

    let entries = std::fs::read_dir(dir).map_err(|e| ContentError::Io(e.to_string()))?;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "md") {
            match load_file::<M>(&path) {
                Ok(file) => {
                    tracing::info!("Loaded content: {}", file.0);
                    loaded.push(file);
                }
                Err(e) => {
                    tracing::error!("Failed to load content {:?}: {}", path, e);
                }
            }
        }
    }

    Ok(loaded)
}

fn load_file<M>(path: &Path) -> Result<(String, M, String), ContentError>
where
    M: for<'de> Deserialize<'de>,
{
    let content = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;

    let slug = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ContentError::Parse("Invalid filename".to_string()))?
        .to_string();
    if !is_valid_slug(&slug) {
        return Err(ContentError::Parse(format!("Invalid slug: {slug}")));
    }

    let matter = Matter::<YAML>::new();
    let parsed: ParsedEntity<M> = matter
        .parse(&content)
        .map_err(|e| ContentError::Parse(format!("Failed to parse frontmatter: {e}")))?;
    let meta = parsed
        .data
        .ok_or_else(|| ContentError::Parse("Missing frontmatter".to_string()))?;

    Ok((slug, meta, render_markdown(&parsed.content)))
}

/// Render markdown to HTML with GitHub Flavored Markdown support.
///
/// Image shortcodes are expanded first. Raw HTML passes through: every
/// source is written by staff, either on disk or through the back office.
#[must_use]
pub fn render_markdown(content: &str) -> String {
    let processed = process_shortcodes(content);

    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.header_ids = Some(String::new());
    options.extension.footnotes = true;

    options.render.r#unsafe = true;

    markdown_to_html(&processed, &options)
}

/// Estimated minutes to read `markdown`, at least one.
#[must_use]
pub fn reading_time_minutes(markdown: &str) -> u32 {
    let words = markdown.split_whitespace().count();
    u32::try_from(words.div_ceil(WORDS_PER_MINUTE))
        .unwrap_or(u32::MAX)
        .max(1)
}

fn process_shortcodes(content: &str) -> String {
    IMAGE_SHORTCODE_RE
        .replace_all(content, |caps: &regex::Captures| {
            let src = &caps[1];
            let attrs = caps.get(2).map_or("", |m| m.as_str());

            let mut alt = String::new();
            let mut caption = None;
            for attr in ATTR_RE.captures_iter(attrs) {
                match &attr[1] {
                    "alt" => alt = attr[2].to_string(),
                    "caption" => caption = Some(attr[2].to_string()),
                    _ => {}
                }
            }

            render_figure(src, &alt, caption.as_deref())
        })
        .into_owned()
}

fn render_figure(src: &str, alt: &str, caption: Option<&str>) -> String {
    let src = escape_attr(src);
    let alt = escape_attr(alt);
    let caption = caption
        .map(|c| format!("<figcaption>{}</figcaption>", escape_attr(c)))
        .unwrap_or_default();
    format!(
        r#"<figure><img src="{src}" alt="{alt}" loading="lazy" decoding="async">{caption}</figure>"#
    )
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Content loading errors
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, body: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_slug_validation() {
        assert!(is_valid_slug("kitchen-remodels"));
        assert!(is_valid_slug("deck2024"));
        assert!(!is_valid_slug("Kitchen"));
        assert!(!is_valid_slug("a--b"));
        assert!(!is_valid_slug("-lead"));
        assert!(!is_valid_slug("../etc"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug(&"a".repeat(101)));
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(reading_time_minutes(""), 1);
        assert_eq!(reading_time_minutes(&"word ".repeat(200)), 1);
        assert_eq!(reading_time_minutes(&"word ".repeat(201)), 2);
    }

    #[test]
    fn test_render_markdown_gfm() {
        let html = render_markdown("**bold** ~~old~~\n\n| a |\n|---|\n| 1 |");
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<del>old</del>"));
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_image_shortcode() {
        let html = render_markdown(
            r#"{{image "https://cdn.test/deck.jpg" alt="Cedar & oak" caption="Finished"}}"#,
        );
        assert!(html.contains(r#"<img src="https://cdn.test/deck.jpg" alt="Cedar &amp; oak""#));
        assert!(html.contains("<figcaption>Finished</figcaption>"));
    }

    #[test]
    fn test_load_orders_services_and_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        let services = dir.path().join("services");
        write(
            &services,
            "roofing.md",
            "---\ntitle: Roofing\nsummary: Roofs\norder: 2\n---\nWe fix roofs.",
        );
        write(
            &services,
            "kitchens.md",
            "---\ntitle: Kitchens\nsummary: Kitchens\norder: 1\n---\n# Kitchens",
        );
        write(&services, "broken.md", "no frontmatter here");
        write(
            &dir.path().join("pages"),
            "about.md",
            "---\ntitle: About us\n---\nFamily owned.",
        );

        let store = ContentStore::load(dir.path()).unwrap();
        let slugs: Vec<_> = store.services().iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(slugs, ["kitchens", "roofing"]);
        assert!(store.get_service("roofing").unwrap().content_html.contains("We fix roofs."));
        assert_eq!(store.get_page("about").unwrap().meta.title, "About us");
        assert!(store.get_page("broken").is_none());
    }

    #[test]
    fn test_load_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::load(&dir.path().join("nope")).unwrap();
        assert!(store.services().is_empty());
        assert!(store.get_page("about").is_none());
    }
}
