//! The markdown to component unit compiler.

use crate::cache::{CacheKey, CompileCache};
use crate::codegen::{assemble_unit, inject_page_data};
use crate::config::Config;
use crate::dead_links::DeadLinkValidator;
use crate::guard::ConstantGuard;
use crate::include::resolve_includes;
use crate::markdown::{MarkdownRenderer, RenderEnv, RenderError, Renderer};
use crate::metadata::{infer_description, infer_title, infer_title_template};
use crate::paths::{normalize_path, to_slash};
use crate::timestamps::{GitTimestamps, TimestampSource};
use docunit_types::{CompileResult, PageData};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("{path} is outside the source directory")]
    OutsideSourceRoot { path: PathBuf },

    #[error("Failed to serialize page data: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Compiles markdown documents into component units
///
/// One compiler serves a whole build or dev session. It is `Send + Sync`;
/// concurrent calls share only the result cache.
pub struct MarkdownCompiler {
    config: Config,
    src_dir: PathBuf,
    public_dir: PathBuf,
    renderer: Arc<dyn Renderer>,
    timestamps: Arc<dyn TimestampSource>,
    validator: DeadLinkValidator,
    guard: ConstantGuard,
    cache: CompileCache,
}

impl MarkdownCompiler {
    /// `pages` is the known page set used for dead-link checks
    pub fn new<I>(config: Config, pages: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let src_dir = absolutize(config.src_dir());
        let public_dir = absolutize(config.public_dir());

        let validator = DeadLinkValidator::new(src_dir.clone(), pages)
            .with_ignore(&config.ignore_dead_links);
        let guard = ConstantGuard::new(config.build.production, config.define_keys());
        let cache = CompileCache::new(config.cache_capacity);

        Self {
            config,
            src_dir,
            public_dir,
            renderer: Arc::new(MarkdownRenderer::new()),
            timestamps: Arc::new(GitTimestamps::new()),
            validator,
            guard,
            cache,
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_timestamps(mut self, timestamps: Arc<dyn TimestampSource>) -> Self {
        self.timestamps = timestamps;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn src_dir(&self) -> &Path {
        &self.src_dir
    }

    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    pub fn cache(&self) -> &CompileCache {
        &self.cache
    }

    /// Forget every memoized result
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Read `file` from disk and compile it against the configured public directory
    pub async fn compile_file(&self, file: &Path) -> Result<Arc<CompileResult>, CompileError> {
        let source = tokio::fs::read_to_string(file)
            .await
            .map_err(|source| CompileError::Read {
                path: file.to_path_buf(),
                source,
            })?;
        self.compile(&source, file, &self.public_dir).await
    }

    /// Compile one document
    ///
    /// `file` must be an absolute path under the source directory and
    /// `source` its raw, unexpanded text. Results are cached per
    /// `(source, file)`; a hit returns the stored result without re-running
    /// any step.
    pub async fn compile(
        &self,
        source: &str,
        file: &Path,
        public_dir: &Path,
    ) -> Result<Arc<CompileResult>, CompileError> {
        let key = CacheKey::new(source, file);
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(file = %file.display(), "compile cache hit");
            return Ok(hit);
        }

        let file = normalize_path(file);
        let relative_path = file
            .strip_prefix(&self.src_dir)
            .map(to_slash)
            .map_err(|_| CompileError::OutsideSourceRoot { path: file.clone() })?;
        let base_dir = file.parent().unwrap_or(self.src_dir.as_path());

        let expanded = resolve_includes(source, base_dir, &self.src_dir);

        let mut env = RenderEnv::new(&file, relative_path.clone(), self.config.clean_urls);
        let rendered = self.renderer.render(&expanded.text, &mut env)?;

        let dead_links = self
            .validator
            .validate(&rendered.side.links, &file, public_dir);

        let frontmatter = env.frontmatter.take().unwrap_or_default();
        let content = env.content.take().unwrap_or_default();

        let last_updated = if self.config.last_updated {
            self.timestamps.timestamp(&file).await
        } else {
            None
        };

        let page_data = PageData {
            title: infer_title(&frontmatter, &content),
            title_template: infer_title_template(&frontmatter),
            description: infer_description(&frontmatter),
            frontmatter,
            headers: rendered.side.headers,
            relative_path,
            last_updated,
        };

        let tags = inject_page_data(rendered.side.hoisted_tags, &page_data, &self.guard)?;
        let html = self.guard.escape_markup(&rendered.html);
        let unit_source = assemble_unit(tags, &html);

        let result = Arc::new(CompileResult {
            unit_source,
            page_data,
            dead_links,
            includes: expanded.includes(),
        });

        tracing::debug!(
            file = %file.display(),
            dead_links = result.dead_links.len(),
            includes = result.includes.len(),
            "compiled page"
        );

        self.cache.insert(key, Arc::clone(&result));
        Ok(result)
    }
}

/// Anchor a possibly relative path at the working directory
fn absolutize(path: PathBuf) -> PathBuf {
    normalize_path(&std::path::absolute(&path).unwrap_or(path))
}
