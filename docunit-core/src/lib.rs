//! # docunit-core
//!
//! Core library for compiling markdown pages into single-file component units.
//!
//! This crate provides include expansion, markdown rendering, dead-link
//! checks, page metadata inference, code generation and result caching.

pub mod cache;
pub mod codegen;
pub mod compiler;
pub mod config;
pub mod dead_links;
pub mod frontmatter;
pub mod guard;
pub mod include;
pub mod markdown;
pub mod metadata;
pub mod pages;
pub mod paths;
pub mod slug;
pub mod timestamps;

pub use cache::{CacheKey, CacheStats, CompileCache};
pub use compiler::{CompileError, MarkdownCompiler};
pub use config::{CleanUrls, Config, ConfigError, IgnoreDeadLinks};
pub use dead_links::DeadLinkValidator;
pub use guard::{ConstantGuard, Marker};
pub use include::{resolve_includes, ExpandedSource, IncludeOutcome};
pub use markdown::{MarkdownRenderer, RenderEnv, RenderError, Rendered, Renderer, SideChannelData};
pub use pages::discover_pages;
pub use slug::slugify;
pub use timestamps::{GitTimestamps, TimestampSource};

pub use docunit_types::{CompileResult, Frontmatter, Header, PageData};
