//! The library code for the `quire` static site generator. A build is a
//! single pass over the input tree that can be broken down into three kinds
//! of work:
//!
//! 1. Rendering plain pages: each markdown file is split into YAML metadata
//!    and a markdown body ([`crate::page`]), then rendered through the
//!    template its metadata names and written next to its siblings in the
//!    output tree ([`crate::write`]).
//! 2. Building the blog: every post in the blog directory is rendered like a
//!    plain page, then the posts are sorted newest-first and paginated into
//!    index pages ([`crate::blog`]).
//! 3. Copying everything else byte for byte ([`crate::build`]).
//!
//! Templates see three scopes: `site` (from `site.yml`), `blog` (from
//! `blog.yml`, nil outside the blog), and `page` (the page's metadata plus
//! `page_text` and `page_html`, or the list of posts on an index page). The
//! output file takes the extension of the template that rendered it.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod blog;
pub mod build;
pub mod config;
pub mod error;
pub mod markdown;
pub mod page;
pub mod template;
pub mod value;
pub mod write;
