//! Content scanning and manifest generation.
//!
//! Stage 1 of the build. Walks the content directory, parses front matter,
//! indexes every document's headings and produces the [`Manifest`] the
//! generate stage consumes. The manifest is also the content store: a
//! `(level, topic)` pair resolves to one [`Document`] or to not-found.
//!
//! ## Directory Structure
//!
//! ```text
//! content/
//! ├── config.toml                    # Site configuration (optional)
//! ├── index.md                       # Home page introduction (optional)
//! ├── 010-beginner/                  # Level (numbered = in navigation)
//! │   ├── index.md                   # Level introduction (optional)
//! │   ├── 010-introduction.md        # Topic
//! │   └── 020-crud-operations.md
//! ├── 020-intermediate/
//! │   └── 010-indexes.md
//! └── 030-advanced/
//!     ├── 010-replication.md
//!     └── scratch-notes.md           # Unnumbered = built, hidden from nav
//! ```
//!
//! ## Validation
//!
//! - No two levels, and no two topics within a level, may share a slug
//! - Every level must contain at least one published document
//! - Front matter must be valid TOML with known keys only
//!
//! Drafts (`draft = true` in front matter) are skipped.

use crate::config::{self, SiteConfig};
use crate::headings::extract_headings;
use crate::markdown::{FrontMatter, split_front_matter};
use crate::naming::parse_entry_name;
use crate::types::{Heading, NavItem};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid front matter in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Duplicate slug '{slug}' in {dir}")]
    DuplicateSlug { slug: String, dir: PathBuf },
    #[error("Level has no published documents: {0}")]
    EmptyLevel(PathBuf),
    #[error("No document '{topic}' in level '{level}'")]
    NotFound { level: String, topic: String },
}

const INTRO_FILE: &str = "index.md";

/// Manifest output from the scan stage.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub navigation: Vec<NavItem>,
    pub levels: Vec<Level>,
    /// Body of the root `index.md`, shown on the home page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_intro: Option<String>,
    pub config: SiteConfig,
}

/// A level directory (`010-beginner/`) and its documents in topic order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Body of the level's `index.md`, shown above its topic list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    /// Directory name relative to the content root.
    pub source_dir: String,
    pub in_nav: bool,
    pub sort_key: u32,
    pub documents: Vec<Document>,
}

/// One article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub level: String,
    pub topic: String,
    /// Front-matter title, else the first `# ` heading, else the file name.
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Path relative to the content root.
    pub source_path: String,
    /// Markdown without front matter. Heading offsets refer to this text.
    pub body: String,
    pub headings: Vec<Heading>,
    pub in_nav: bool,
    pub sort_key: u32,
}

impl Document {
    /// Site-relative directory of the rendered page, without slashes.
    pub fn path(&self) -> String {
        format!("{}/{}", self.level, self.topic)
    }
}

impl Manifest {
    /// Resolve `(level, topic)` to a document.
    pub fn document(&self, level: &str, topic: &str) -> Option<&Document> {
        self.level(level)?
            .documents
            .iter()
            .find(|d| d.topic == topic)
    }

    /// Like [`Manifest::document`], with not-found as an error.
    pub fn lookup(&self, level: &str, topic: &str) -> Result<&Document, ScanError> {
        self.document(level, topic)
            .ok_or_else(|| ScanError::NotFound {
                level: level.to_string(),
                topic: topic.to_string(),
            })
    }

    pub fn level(&self, slug: &str) -> Option<&Level> {
        self.levels.iter().find(|l| l.slug == slug)
    }

    /// All documents, level by level in navigation order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.levels.iter().flat_map(|l| l.documents.iter())
    }
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;

    let home_intro = read_intro(root)?.map(|(_, body)| body);

    let mut levels = Vec::new();
    let mut seen = HashSet::new();
    for dir in child_entries(root)?.into_iter().filter(|p| p.is_dir()) {
        let level = scan_level(&dir, root)?;
        if !seen.insert(level.slug.clone()) {
            return Err(ScanError::DuplicateSlug {
                slug: level.slug,
                dir: root.to_path_buf(),
            });
        }
        levels.push(level);
    }
    levels.sort_by(|a, b| (a.sort_key, &a.slug).cmp(&(b.sort_key, &b.slug)));

    Ok(Manifest {
        navigation: build_navigation(&levels),
        levels,
        home_intro,
        config,
    })
}

fn scan_level(dir: &Path, root: &Path) -> Result<Level, ScanError> {
    let dir_name = file_name(dir);
    let parsed = parse_entry_name(&dir_name);

    let mut documents = Vec::new();
    let mut seen = HashSet::new();
    for path in child_entries(dir)?
        .into_iter()
        .filter(|p| is_markdown(p) && file_name(p) != INTRO_FILE)
    {
        let Some(document) = read_document(&path, root, &parsed.slug)? else {
            continue;
        };
        if !seen.insert(document.topic.clone()) {
            return Err(ScanError::DuplicateSlug {
                slug: document.topic,
                dir: dir.to_path_buf(),
            });
        }
        documents.push(document);
    }

    if documents.is_empty() {
        return Err(ScanError::EmptyLevel(dir.to_path_buf()));
    }
    documents.sort_by(|a, b| (a.sort_key, &a.topic).cmp(&(b.sort_key, &b.topic)));

    let (title, description, intro) = match read_intro(dir)? {
        Some((front, body)) => {
            let title = front
                .title
                .or_else(|| first_title(&extract_headings(&body)))
                .unwrap_or_else(|| parsed.display_title.clone());
            let intro = (!body.trim().is_empty()).then_some(body);
            (title, front.description, intro)
        }
        None => (parsed.display_title.clone(), None, None),
    };

    Ok(Level {
        slug: parsed.slug.clone(),
        title,
        description,
        intro,
        source_dir: relative(dir, root),
        in_nav: parsed.in_nav(),
        sort_key: parsed.sort_key(),
        documents,
    })
}

/// Read one topic file. `None` for drafts.
fn read_document(path: &Path, root: &Path, level: &str) -> Result<Option<Document>, ScanError> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parsed = parse_entry_name(&stem);

    let raw = fs::read_to_string(path)?;
    let (front, body) = parse_front_matter(path, &raw)?;
    if front.draft {
        log::debug!("skipping draft {}", path.display());
        return Ok(None);
    }

    let headings = extract_headings(body);
    let title = front
        .title
        .or_else(|| first_title(&headings))
        .unwrap_or_else(|| parsed.display_title.clone());

    Ok(Some(Document {
        level: level.to_string(),
        topic: parsed.slug.clone(),
        title,
        description: front.description,
        source_path: relative(path, root),
        body: body.to_string(),
        headings,
        in_nav: parsed.in_nav(),
        sort_key: parsed.sort_key(),
    }))
}

/// Front matter and body of `dir/index.md`, if present.
fn read_intro(dir: &Path) -> Result<Option<(FrontMatter, String)>, ScanError> {
    let path = dir.join(INTRO_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    let raw = fs::read_to_string(&path)?;
    let (front, body) = parse_front_matter(&path, &raw)?;
    Ok(Some((front, body.to_string())))
}

fn parse_front_matter<'a>(path: &Path, raw: &'a str) -> Result<(FrontMatter, &'a str), ScanError> {
    split_front_matter(raw).map_err(|source| ScanError::FrontMatter {
        path: path.to_path_buf(),
        source,
    })
}

fn first_title(headings: &[Heading]) -> Option<String> {
    headings
        .iter()
        .find(|h| h.level == 1)
        .map(|h| h.text.clone())
}

fn build_navigation(levels: &[Level]) -> Vec<NavItem> {
    levels
        .iter()
        .filter(|l| l.in_nav)
        .map(|level| NavItem {
            title: level.title.clone(),
            path: level.slug.clone(),
            children: level
                .documents
                .iter()
                .filter(|d| d.in_nav)
                .map(|d| NavItem {
                    title: d.title.clone(),
                    path: d.path(),
                    children: vec![],
                })
                .collect(),
        })
        .collect()
}

/// Direct children of `dir`, sorted, skipping hidden entries and build output.
fn child_entries(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') || name == "dist" || name == "assets" {
            log::debug!("skipping {}", entry.path().display());
            continue;
        }
        entries.push(entry.into_path());
    }
    Ok(entries)
}

fn is_markdown(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("md"))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
