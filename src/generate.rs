//! Page building and the build pipeline.
//!
//! Second stage of the build. Takes the scanned [`Inventory`], renders every
//! page through the site's HTML templates, and hands the results to the
//! [`writer`](crate::writer).
//!
//! ## Generated Pages
//!
//! - **Home** (`/index.html`): the home template, with one entry in the
//!   `sections` list per `# Heading` of `index.md`
//! - **Collection entries** (`/{collection}/{name}/index.html`): the entry
//!   template, one page per file in `games/`, `projects/`, ...
//! - **Permalinked pages** (`/{permalink}/index.html`): either the home
//!   template with its `<main>` replaced by the page content, or the bare
//!   template when the page sets `no_style`
//!
//! ## Template Variables
//!
//! Every page sees `title`, `site_title`, `isProject` and the rendered
//! `header`, `menu` and `footer` fragments (which are templates themselves,
//! rendered against the same values). The home page and styled permalinked
//! pages also see every singleton (`{{about}}`, `{{contacts}}`) and every
//! collection grid (`{{games}}`, `{{projects}}`). Entry pages see the entry's
//! own blocks:
//!
//! | Name | Content |
//! |------|---------|
//! | `name`, `collection` | Identity of the entry |
//! | `release_date` | `<p class="release-date">` from `release_data`, or empty |
//! | `store` | Store links, each an inline markdown fragment, or empty |
//! | `description` | Rendered `description`, or empty |
//! | `media` | Media grid with viewer overlays, or empty |
//! | `preview_image` | Resolved thumbnail URL |
//! | `content` | Rendered body |
//!
//! Markup the builders produce themselves (grids, media, store links) is
//! written with [maud](https://maud.lambda.xyz/).

use crate::config::{MediaConfig, SiteConfig, SitePaths, TemplatesConfig};
use crate::frontmatter;
use crate::markdown;
use crate::scan::{self, Inventory, ScanError, SectionSource};
use crate::template::{self, Context, Template, TemplateError};
use crate::types::{
    Background, CollectionEntry, ContentCategory, ContentRecord, Section, SpecialPage,
};
use crate::writer::{self, PageTarget};
use maud::{Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    #[error("Template not found: {path}: {source}")]
    MissingTemplate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid permalink {permalink:?} in {path}")]
    InvalidPermalink { path: PathBuf, permalink: String },
    #[error("Permalink {permalink:?} in {path} collides with the page at {url}")]
    PermalinkCollision {
        path: PathBuf,
        permalink: String,
        url: String,
    },
}

/// The site's parsed templates.
#[derive(Debug, Clone)]
pub struct Templates {
    pub home: Template,
    pub header: Template,
    pub menu: Template,
    pub footer: Template,
    pub entry: Template,
    pub bare: Template,
}

impl Templates {
    /// Read and parse every template named in `names` from `dir`.
    pub fn load(dir: &Path, names: &TemplatesConfig) -> Result<Self, GenerateError> {
        let load = |name: &str| -> Result<Template, GenerateError> {
            let path = dir.join(name);
            let source = fs::read_to_string(&path)
                .map_err(|source| GenerateError::MissingTemplate { path, source })?;
            Ok(Template::parse(&source)?)
        };
        Ok(Self {
            home: load(&names.home)?,
            header: load(&names.header)?,
            menu: load(&names.menu)?,
            footer: load(&names.footer)?,
            entry: load(&names.entry)?,
            bare: load(&names.bare)?,
        })
    }
}

/// A finished page waiting to be written.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub target: PageTarget,
    /// Human-readable identity for console output.
    pub label: String,
    pub html: String,
    /// Content file the page was rendered from.
    pub source: PathBuf,
}

#[derive(Debug, Clone)]
pub struct WrittenPage {
    pub label: String,
    pub url: String,
    /// Relative to the output directory.
    pub path: PathBuf,
}

/// What a build produced.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    pub pages: Vec<WrittenPage>,
    /// Content files that matched no category.
    pub ignored: Vec<PathBuf>,
}

/// Run the full pipeline: scan, render every page, write the site.
///
/// Everything is rendered before anything is written, so a bad template or
/// permalink leaves the output directory untouched.
pub fn build(config: &SiteConfig, paths: &SitePaths) -> Result<BuildReport, GenerateError> {
    let inventory = scan::scan(&paths.content, &config.content)?;
    let templates = Templates::load(&paths.templates, &config.templates)?;
    let pages = SiteBuilder::new(config, &templates, &inventory).render_all()?;

    fs::create_dir_all(&paths.output)?;
    let mut written = Vec::with_capacity(pages.len());
    for page in pages {
        let path = writer::write_page(&paths.output, &page.target, &page.html)?;
        written.push(WrittenPage {
            label: page.label,
            url: page.target.url(),
            path,
        });
    }

    Ok(BuildReport {
        output_dir: paths.output.clone(),
        pages: written,
        ignored: inventory.ignored,
    })
}

// ============================================================================
// Page builders
// ============================================================================

/// Renders pages from one inventory with one set of templates.
pub struct SiteBuilder<'a> {
    config: &'a SiteConfig,
    templates: &'a Templates,
    inventory: &'a Inventory,
}

impl<'a> SiteBuilder<'a> {
    pub fn new(config: &'a SiteConfig, templates: &'a Templates, inventory: &'a Inventory) -> Self {
        Self {
            config,
            templates,
            inventory,
        }
    }

    fn assets_prefix(&self) -> &str {
        &self.config.media.assets_prefix
    }

    /// Render every page of the site: home first, then collection entries,
    /// then permalinked pages.
    pub fn render_all(&self) -> Result<Vec<RenderedPage>, GenerateError> {
        let mut pages = Vec::new();

        for classified in &self.inventory.records {
            let record = &classified.record;
            match &classified.category {
                ContentCategory::Home => pages.push(RenderedPage {
                    target: PageTarget::Home,
                    label: "Home".to_string(),
                    html: self.render_home(),
                    source: record.source_path.clone(),
                }),
                // Exposed to the home template only
                ContentCategory::Singleton { .. } => {}
                ContentCategory::CollectionMember {
                    collection,
                    name,
                    order,
                } => {
                    let entry = CollectionEntry {
                        collection,
                        name,
                        order: *order,
                        record,
                    };
                    pages.push(RenderedPage {
                        target: PageTarget::Entry {
                            collection: collection.clone(),
                            name: name.clone(),
                        },
                        label: format!("{}/{}", collection, record.title_or(name)),
                        html: self.render_entry(&entry),
                        source: record.source_path.clone(),
                    });
                }
                ContentCategory::Permalinked { permalink, styled } => {
                    let target = PageTarget::permalink(permalink).ok_or_else(|| {
                        GenerateError::InvalidPermalink {
                            path: record.source_path.clone(),
                            permalink: permalink.clone(),
                        }
                    })?;
                    let page = SpecialPage {
                        permalink,
                        styled: *styled,
                        record,
                    };
                    pages.push(RenderedPage {
                        label: record.title_or(permalink).to_string(),
                        html: self.render_special(&page)?,
                        target,
                        source: record.source_path.clone(),
                    });
                }
            }
        }

        pages.sort_by_key(|page| match page.target {
            PageTarget::Home => 0,
            PageTarget::Entry { .. } => 1,
            PageTarget::Permalink(_) => 2,
        });
        check_collisions(&pages)?;
        Ok(pages)
    }

    // ------------------------------------------------------------------------
    // Shared context
    // ------------------------------------------------------------------------

    /// Title, flags, and the rendered header/menu/footer fragments.
    fn chrome(&self, title: &str, is_project: bool) -> Context {
        let mut ctx = Context::new();
        ctx.set_text("title", title)
            .set_text("site_title", &self.config.site.title)
            .set_flag("isProject", is_project);

        let header = self.templates.header.render(&ctx);
        let menu = self.templates.menu.render(&ctx);
        let footer = self.templates.footer.render(&ctx);
        ctx.set_text("header", header)
            .set_text("menu", menu)
            .set_text("footer", footer);
        ctx
    }

    /// Chrome plus every singleton and collection grid.
    fn site_context(&self, title: &str, is_project: bool) -> Context {
        let mut ctx = self.chrome(title, is_project);
        // Missing singletons bind to empty
        for name in &self.config.content.singletons {
            let html = self
                .inventory
                .singleton(name)
                .map(|record| self.singleton_html(name, record))
                .unwrap_or_default();
            ctx.set_text(name, html);
        }
        for collection in &self.config.content.collections {
            ctx.set_text(collection, self.grid(collection).into_string());
        }
        ctx
    }

    fn singleton_html(&self, name: &str, record: &ContentRecord) -> String {
        let mut out = markdown::to_html_with_assets(&record.body, self.assets_prefix());
        if *name == self.config.content.contacts_section {
            let items = record.frontmatter.list("contacts");
            if !items.is_empty() {
                out.push_str(&contact_list(items, self.assets_prefix()).into_string());
            }
        }
        out
    }

    // ------------------------------------------------------------------------
    // Home
    // ------------------------------------------------------------------------

    /// The home page's sections in heading order.
    pub fn sections(&self) -> Vec<Section> {
        let Some(home) = self.inventory.home() else {
            return Vec::new();
        };
        scan::split_sections(&home.body)
            .iter()
            .enumerate()
            .map(|(index, source)| Section {
                id: source.slug.clone(),
                heading: source.heading.clone(),
                background: Background::for_position(index),
                content: self.section_content(source),
            })
            .collect()
    }

    fn section_content(&self, source: &SectionSource) -> String {
        let content = &self.config.content;
        if content.collections.contains(&source.slug) {
            return html! {
                h1 { (source.heading) }
                (self.grid(&source.slug))
            }
            .into_string();
        }
        if source.slug == content.contacts_section {
            return self.contacts_section(source);
        }
        markdown::to_html_with_assets(&source.markdown(), self.assets_prefix())
    }

    /// Contacts come from a `contacts:` list in the section itself, or from
    /// the contacts singleton's frontmatter when the section has none.
    fn contacts_section(&self, source: &SectionSource) -> String {
        let (mut items, rest) = frontmatter::extract_list(&source.body, "contacts");
        if items.is_empty()
            && let Some(record) = self.inventory.singleton(&self.config.content.contacts_section)
        {
            items = record.frontmatter.list("contacts").to_vec();
        }

        let intro = format!("# {}\n{}", source.heading, rest);
        let mut out = markdown::to_html_with_assets(&intro, self.assets_prefix());
        if !items.is_empty() {
            out.push_str(&contact_list(&items, self.assets_prefix()).into_string());
        }
        out
    }

    pub fn render_home(&self) -> String {
        let title = self
            .inventory
            .home()
            .map(|home| home.title_or(&self.config.site.title))
            .unwrap_or(&self.config.site.title);

        let sections = self
            .sections()
            .into_iter()
            .map(|section| {
                let mut item = Context::new();
                item.set_text("id", section.id)
                    .set_text("heading", section.heading)
                    .set_text("background", section.background.as_str())
                    .set_text("content", section.content);
                item
            })
            .collect();

        let mut ctx = self.site_context(title, false);
        ctx.set_list("sections", sections);
        self.templates.home.render(&ctx)
    }

    /// Thumbnail grid of one collection.
    pub fn grid(&self, collection: &str) -> Markup {
        let entries = self.inventory.collection(collection);
        html! {
            div class={ (collection) "-grid" } {
                @for entry in &entries {
                    (self.grid_item(entry))
                }
            }
        }
    }

    fn grid_item(&self, entry: &CollectionEntry<'_>) -> Markup {
        let title = entry.record.title_or(entry.name);
        html! {
            div.grid-item {
                a href=(entry.url()) {
                    img src=(self.thumbnail(entry)) alt=(title) loading="lazy";
                }
            }
        }
    }

    /// `preview_image`, then `title_image`, then `<name>.jpg`.
    fn thumbnail(&self, entry: &CollectionEntry<'_>) -> String {
        let fm = &entry.record.frontmatter;
        let file = fm
            .get("preview_image")
            .or_else(|| fm.get("title_image"))
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}.jpg", entry.name));
        markdown::resolve_asset(&file, self.assets_prefix())
    }

    // ------------------------------------------------------------------------
    // Collection entries
    // ------------------------------------------------------------------------

    pub fn render_entry(&self, entry: &CollectionEntry<'_>) -> String {
        let record = entry.record;
        let fm = &record.frontmatter;
        let prefix = self.assets_prefix();

        let release_date = fm
            .get("release_data")
            .map(|date| html! { p.release-date { "Release date: " (date) } }.into_string())
            .unwrap_or_default();

        let store_links = values(&record.frontmatter, "store");
        let store = if store_links.is_empty() {
            String::new()
        } else {
            html! {
                div.store-links {
                    @for link in &store_links {
                        (PreEscaped(markdown::to_inline_html(link, prefix)))
                    }
                }
            }
            .into_string()
        };

        let description = fm
            .get("description")
            .map(|text| {
                html! {
                    div.description { (PreEscaped(markdown::to_html_with_assets(text, prefix))) }
                }
                .into_string()
            })
            .unwrap_or_default();

        let media: Vec<MediaItem> = values(&record.frontmatter, "media")
            .into_iter()
            .map(|raw| classify_media(raw, &self.config.media))
            .collect();
        let media = if media.is_empty() {
            String::new()
        } else {
            media_grid(&media).into_string()
        };

        let mut ctx = self.chrome(record.title_or(entry.name), true);
        ctx.set_text("name", entry.name)
            .set_text("collection", entry.collection)
            .set_text("release_date", release_date)
            .set_text("store", store)
            .set_text("description", description)
            .set_text("media", media)
            .set_text("preview_image", self.thumbnail(entry))
            .set_text("content", markdown::to_html_with_assets(&record.body, prefix));
        self.templates.entry.render(&ctx)
    }

    // ------------------------------------------------------------------------
    // Permalinked pages
    // ------------------------------------------------------------------------

    pub fn render_special(&self, page: &SpecialPage<'_>) -> Result<String, GenerateError> {
        let title = page.record.title_or(page.permalink.trim_matches('/'));
        let content = markdown::to_html_with_assets(&page.record.body, self.assets_prefix());

        if !page.styled {
            let mut ctx = Context::new();
            ctx.set_text("title", title)
                .set_text("site_title", &self.config.site.title)
                .set_text("content", content);
            return Ok(self.templates.bare.render(&ctx));
        }

        let mut ctx = self.site_context(title, true);
        ctx.set_list("sections", Vec::new());
        let shell = self.templates.home.render(&ctx);
        Ok(template::splice_main(&shell, &content)?)
    }
}

/// Reject permalinked pages whose file would overwrite another page's file,
/// or whose directory path runs through one (`/index.html` against the home
/// page's `index.html`).
fn check_collisions(pages: &[RenderedPage]) -> Result<(), GenerateError> {
    let files: Vec<PathBuf> = pages.iter().map(|p| p.target.relative_path()).collect();
    for (i, page) in pages.iter().enumerate() {
        let PageTarget::Permalink(permalink) = &page.target else {
            continue;
        };
        let file = &files[i];
        let clash = files
            .iter()
            .enumerate()
            .find(|&(j, other)| j != i && (file.starts_with(other) || other.starts_with(file)));
        if let Some((j, _)) = clash {
            return Err(GenerateError::PermalinkCollision {
                path: page.source.clone(),
                permalink: format!("/{permalink}"),
                url: pages[j].target.url(),
            });
        }
    }
    Ok(())
}

/// A frontmatter key read as a list; a lone scalar counts as one item.
fn values<'f>(frontmatter: &'f frontmatter::Frontmatter, key: &str) -> Vec<&'f str> {
    let list = frontmatter.list(key);
    if list.is_empty() {
        frontmatter.get(key).into_iter().collect()
    } else {
        list.iter().map(String::as_str).collect()
    }
}

fn contact_list(items: &[String], assets_prefix: &str) -> Markup {
    html! {
        ul.contacts {
            @for item in items {
                li { (PreEscaped(markdown::to_inline_html(item, assets_prefix))) }
            }
        }
    }
}

// ============================================================================
// Media
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub kind: MediaKind,
    /// Embeddable URL for videos, asset URL for images.
    pub url: String,
}

/// A media URL containing a known video-host marker is a video, with the
/// marker swapped for the host's embed form. Anything else is an image.
pub fn classify_media(raw: &str, media: &MediaConfig) -> MediaItem {
    let raw = raw.trim();
    for host in &media.video_hosts {
        if raw.contains(&host.marker) {
            return MediaItem {
                kind: MediaKind::Video,
                url: raw.replacen(&host.marker, &host.embed, 1),
            };
        }
    }
    MediaItem {
        kind: MediaKind::Image,
        url: markdown::resolve_asset(raw, &media.assets_prefix),
    }
}

/// Media grid. Each item carries an overlay whose data attributes tell the
/// client-side viewer what to open.
pub fn media_grid(items: &[MediaItem]) -> Markup {
    html! {
        div.media-grid {
            @for item in items {
                div.media-item {
                    @match item.kind {
                        MediaKind::Video => {
                            iframe src=(item.url) title="Video" frameborder="0" allowfullscreen {}
                        }
                        MediaKind::Image => {
                            img src=(item.url) alt="" loading="lazy";
                        }
                    }
                    div.media-overlay data-media-type=(item.kind.as_str()) data-media-url=(item.url) {}
                }
            }
        }
    }
}
