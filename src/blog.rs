//! Builds a blog directory: every post page, then the index pages listing the
//! posts newest-first. Index pages are paginated by `max_posts` from
//! `blog.yml`: the first page is `index{ext}`, the next ones are
//! `index1{ext}`, `index2{ext}`, and so on. An empty blog still gets an
//! (empty) `index{ext}`.

use crate::build::copy_dir;
use crate::config::{BlogConfig, SiteConfig, BLOG_FILE};
use crate::error::{Error, Result};
use crate::page::{is_markdown, PublishDate};
use crate::template::Template;
use crate::value::{from_mapping, site_scope};
use crate::write::{build_page, Built};
use gtmpl::Value;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// A built post, ready to be listed on an index page.
pub type Post = Built;

/// What a blog build produced.
#[derive(Debug)]
pub struct BlogSummary {
    /// The number of posts written.
    pub posts: usize,

    /// The index pages written, first page first.
    pub index_files: Vec<PathBuf>,
}

/// Builds the blog whose source is `{input_dir}/{page_dir}` into
/// `{output_dir}/{page_dir}`, which must already exist.
///
/// Markdown files become posts. Other files and subdirectories (images
/// referenced by posts, say) are copied as they are; `blog.yml` is not.
pub fn build_blog(site: &SiteConfig, page_dir: &Path) -> Result<BlogSummary> {
    let source = site.input_dir.join(page_dir);
    let destination = site.output_path(page_dir);
    let blog = BlogConfig::load(&source)?;

    let mut entries = std::fs::read_dir(&source)
        .and_then(|dir| dir.collect::<std::io::Result<Vec<_>>>())
        .map_err(|e| Error::fs(&source, e))?;
    entries.sort_by_key(|entry| entry.file_name());

    let post_scope = blog_scope(&blog, None);
    let mut posts: Vec<Post> = Vec::new();
    for entry in entries {
        let path = entry.path();
        let file_name = entry.file_name();
        let file_type = entry.file_type().map_err(|e| Error::fs(&path, e))?;
        if file_type.is_dir() {
            copy_dir(&path, &destination.join(&file_name))?;
        } else if is_markdown(&path) {
            let input = std::fs::read_to_string(&path).map_err(|e| Error::fs(&path, e))?;
            posts.push(
                build_page(site, &post_scope, page_dir, &input).map_err(|e| e.annotate(&path))?,
            );
        } else if file_name != BLOG_FILE {
            let target = destination.join(&file_name);
            std::fs::copy(&path, &target).map_err(|e| Error::fs(&path, e))?;
            log::debug!("copied `{}`", target.display());
        }
    }

    sort_posts(&mut posts)?;
    let index_files = write_indices(site, &blog, page_dir, &posts)?;
    log::info!(
        "built blog `{}`: {} posts, {} index pages",
        page_dir.display(),
        posts.len(),
        index_files.len()
    );

    Ok(BlogSummary {
        posts: posts.len(),
        index_files,
    })
}

/// Sorts posts newest-first. The sort is stable, so posts published at the
/// same moment keep their directory order. Every post must have a valid
/// `datePublished`; the first one that doesn't fails the sort.
pub fn sort_posts(posts: &mut Vec<Post>) -> Result<()> {
    let mut dated = posts
        .drain(..)
        .map(|post| -> Result<(PublishDate, Post)> {
            Ok((post.record.publish_date()?, post))
        })
        .collect::<Result<Vec<_>>>()?;
    dated.sort_by(|(a, _), (b, _)| b.cmp(a));
    posts.extend(dated.into_iter().map(|(_, post)| post));
    Ok(())
}

/// Splits `len` posts into consecutive ranges of at most `max_posts`. There
/// is always at least one range, so an empty blog still gets an index page.
pub fn partitions(len: usize, max_posts: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return vec![0..0];
    }
    (0..len)
        .step_by(max_posts)
        .map(|start| start..usize::min(start + max_posts, len))
        .collect()
}

/// The file name of an index page: `index{ext}` for the first page and
/// `index{n}{ext}` for page `n`.
pub fn index_file_name(partition: Option<usize>, ext: &str) -> String {
    match partition {
        None => format!("index{}", ext),
        Some(n) => format!("index{}{}", n, ext),
    }
}

fn write_indices(
    site: &SiteConfig,
    blog: &BlogConfig,
    page_dir: &Path,
    posts: &[Post],
) -> Result<Vec<PathBuf>> {
    let template = Template::load(&site.template_path(), &blog.template)?;
    let partitions = partitions(posts.len(), blog.max_posts);
    let total = partitions.len();
    partitions
        .into_iter()
        .enumerate()
        .map(|(i, range)| {
            let partition = if i == 0 { None } else { Some(i) };
            render_index(
                site,
                blog,
                &template,
                page_dir,
                &Pagination { partition, total },
                &posts[range],
            )
        })
        .collect()
}

/// Where an index page sits among its blog's index pages.
struct Pagination {
    /// `None` for the first page.
    partition: Option<usize>,

    /// The number of index pages.
    total: usize,
}

/// Renders one index page listing `posts` and writes it to the blog's output
/// directory.
fn render_index(
    site: &SiteConfig,
    blog: &BlogConfig,
    template: &Template,
    page_dir: &Path,
    pagination: &Pagination,
    posts: &[Post],
) -> Result<PathBuf> {
    let page = Value::Array(
        posts
            .iter()
            .map(|post| {
                let mut value = Value::from(&post.record);
                if let Value::Object(obj) = &mut value {
                    obj.insert("file_name".to_owned(), Value::String(post.file_name()));
                }
                value
            })
            .collect(),
    );

    let rendered = template.render(
        site_scope(site, page_dir),
        blog_scope(blog, Some((pagination, &template.extension()))),
        page,
    )?;

    let path = site
        .output_path(page_dir)
        .join(index_file_name(pagination.partition, &template.extension()));
    std::fs::write(&path, rendered).map_err(|err| Error::Write {
        path: path.clone(),
        err,
    })?;
    log::debug!("wrote `{}`", path.display());
    Ok(path)
}

/// Builds the `blog` scope: every key from `blog.yml`, plus `continue` (nil on
/// the first index page and on posts, `n` on index page `n`),
/// `num_of_indices`, and the `prev` and `next` index file names.
fn blog_scope(blog: &BlogConfig, index: Option<(&Pagination, &str)>) -> Value {
    let mut m = from_mapping(&blog.data);
    let (cont, total, prev, next) = match index {
        None => (Value::Nil, Value::Nil, Value::Nil, Value::Nil),
        Some((pagination, ext)) => {
            let current = pagination.partition.unwrap_or(0);
            let link = |n: usize| {
                let partition = if n == 0 { None } else { Some(n) };
                Value::String(index_file_name(partition, ext))
            };
            (
                match pagination.partition {
                    None => Value::Nil,
                    Some(n) => Value::from(n as u64),
                },
                Value::from(pagination.total as u64),
                if current == 0 { Value::Nil } else { link(current - 1) },
                if current + 1 < pagination.total {
                    link(current + 1)
                } else {
                    Value::Nil
                },
            )
        }
    };
    m.insert("continue".to_owned(), cont);
    m.insert("num_of_indices".to_owned(), total);
    m.insert("prev".to_owned(), prev);
    m.insert("next".to_owned(), next);
    Value::Object(m)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::page::PageRecord;
    use std::fs;

    const INDEX: &str =
        "{{.blog.name}}[{{if .blog.prev}}<{{.blog.prev}}{{end}}|{{if .blog.next}}>{{.blog.next}}{{end}}]{{range .page}}{{.slug}}:{{.file_name}};{{end}}";

    struct Fixture {
        _dir: tempfile::TempDir,
        site: SiteConfig,
    }

    impl Fixture {
        fn new(max_posts: i64) -> Fixture {
            let dir = tempfile::tempdir().unwrap();
            let site = SiteConfig {
                input_dir: dir.path().join("src"),
                output_dir: dir.path().join("out"),
                template_dir: PathBuf::from("templates"),
                blog_dir: Some(PathBuf::from("blog")),
                blog_active: true,
                data: serde_yaml::from_str("title: Bananas\n").unwrap(),
            };
            fs::create_dir_all(site.template_path()).unwrap();
            fs::create_dir_all(site.input_dir.join("blog")).unwrap();
            fs::create_dir_all(site.output_dir.join("blog")).unwrap();
            fs::write(site.template_path().join("index.html"), INDEX).unwrap();
            fs::write(site.template_path().join("post.html"), "{{.blog.name}}:{{.page.headline}}").unwrap();
            fs::write(
                site.input_dir.join("blog").join(BLOG_FILE),
                format!("template: index.html\nmax_posts: {}\nname: Banana Blog\n", max_posts),
            )
            .unwrap();
            Fixture { _dir: dir, site }
        }

        fn post(&self, slug: &str, date: &str) {
            fs::write(
                self.site.input_dir.join("blog").join(format!("{}.md", slug)),
                format!(
                    "headline: {}\nslug: {}\ntemplate: post.html\ndatePublished: {}\n---\nAbout {}.\n",
                    slug, slug, date, slug
                ),
            )
            .unwrap();
        }

        fn output(&self, name: &str) -> Option<String> {
            fs::read_to_string(self.site.output_dir.join("blog").join(name)).ok()
        }

        fn build(&self) -> Result<BlogSummary> {
            build_blog(&self.site, Path::new("blog"))
        }
    }

    #[test]
    fn test_partitions() {
        assert_eq!(partitions(0, 3), vec![0..0]);
        assert_eq!(partitions(2, 2), vec![0..2]);
        assert_eq!(partitions(5, 2), vec![0..2, 2..4, 4..5]);
        assert_eq!(partitions(6, 3), vec![0..3, 3..6]);
        assert_eq!(partitions(3, 10), vec![0..3]);
    }

    #[test]
    fn test_partitions_cover_every_post_once() {
        for len in 0..40 {
            for max_posts in 1..12 {
                let parts = partitions(len, max_posts);
                let expected = std::cmp::max(1, (len + max_posts - 1) / max_posts);
                assert_eq!(parts.len(), expected, "len={} max={}", len, max_posts);

                let mut next = 0;
                for part in &parts {
                    assert_eq!(part.start, next);
                    assert!(part.len() <= max_posts);
                    next = part.end;
                }
                assert_eq!(next, len);
            }
        }
    }

    #[test]
    fn test_index_file_name() {
        assert_eq!(index_file_name(None, ".html"), "index.html");
        assert_eq!(index_file_name(Some(2), ".html"), "index2.html");
        assert_eq!(index_file_name(Some(1), ""), "index1");
    }

    #[test]
    fn test_five_posts_two_per_page() -> Result<()> {
        let fixture = Fixture::new(2);
        fixture.post("p1", "2021-01-01");
        fixture.post("p2", "2021-01-02");
        fixture.post("p3", "2021-01-03");
        fixture.post("p4", "2021-01-04");
        fixture.post("p5", "2021-01-05");

        let summary = fixture.build()?;
        assert_eq!(summary.posts, 5);
        assert_eq!(summary.index_files.len(), 3);

        assert_eq!(
            fixture.output("index.html").unwrap(),
            "Banana Blog[|>index1.html]p5:p5.html;p4:p4.html;"
        );
        assert_eq!(
            fixture.output("index1.html").unwrap(),
            "Banana Blog[<index.html|>index2.html]p3:p3.html;p2:p2.html;"
        );
        assert_eq!(
            fixture.output("index2.html").unwrap(),
            "Banana Blog[<index1.html|]p1:p1.html;"
        );
        assert_eq!(fixture.output("index3.html"), None);
        assert_eq!(fixture.output("p3.html").unwrap(), "Banana Blog:p3");
        Ok(())
    }

    #[test]
    fn test_empty_blog() -> Result<()> {
        let fixture = Fixture::new(3);
        let summary = fixture.build()?;
        assert_eq!(summary.posts, 0);
        assert_eq!(
            summary.index_files,
            vec![fixture.site.output_dir.join("blog").join("index.html")]
        );
        assert_eq!(fixture.output("index.html").unwrap(), "Banana Blog[|]");
        assert_eq!(fixture.output("index1.html"), None);
        Ok(())
    }

    #[test]
    fn test_posts_fit_on_one_page() -> Result<()> {
        let fixture = Fixture::new(2);
        fixture.post("old", "2020-06-01");
        fixture.post("new", "2020-07-01");

        let summary = fixture.build()?;
        assert_eq!(summary.index_files.len(), 1);
        assert_eq!(
            fixture.output("index.html").unwrap(),
            "Banana Blog[|]new:new.html;old:old.html;"
        );
        assert_eq!(fixture.output("index1.html"), None);
        Ok(())
    }

    #[test]
    fn test_same_date_keeps_directory_order() -> Result<()> {
        let fixture = Fixture::new(10);
        fixture.post("b", "2020-01-01");
        fixture.post("a", "2020-01-01");
        fixture.post("c", "2020-01-02");

        fixture.build()?;
        assert_eq!(
            fixture.output("index.html").unwrap(),
            "Banana Blog[|]c:c.html;a:a.html;b:b.html;"
        );
        Ok(())
    }

    #[test]
    fn test_sort_is_idempotent() -> Result<()> {
        let post = |slug: &str, date: &str| -> Result<Post> {
            Ok(Built {
                record: PageRecord::parse(&format!(
                    "slug: {}\ntemplate: post.html\ndatePublished: {}\n---\n",
                    slug, date
                ))?,
                path: PathBuf::from(format!("{}.html", slug)),
            })
        };
        let mut posts = vec![
            post("x", "2020-03-01")?,
            post("y", "2020-01-01")?,
            post("z", "2020-02-01")?,
            post("w", "2020-02-01")?,
        ];
        let slugs = |posts: &[Post]| -> Vec<String> {
            posts.iter().map(|p| p.record.slug.clone()).collect()
        };

        sort_posts(&mut posts)?;
        let once = slugs(&posts);
        assert_eq!(once, vec!["x", "z", "w", "y"]);

        sort_posts(&mut posts)?;
        assert_eq!(slugs(&posts), once);
        Ok(())
    }

    #[test]
    fn test_post_without_date() {
        let fixture = Fixture::new(2);
        fixture.post("dated", "2020-01-01");
        fs::write(
            fixture.site.input_dir.join("blog").join("undated.md"),
            "headline: undated\nslug: undated\ntemplate: post.html\n---\nbody\n",
        )
        .unwrap();

        match fixture.build() {
            Err(Error::Metadata(msg)) => assert!(msg.contains("undated")),
            Err(e) => panic!("expected a metadata error, got {}", e),
            Ok(_) => panic!("expected a metadata error"),
        }
        assert_eq!(fixture.output("index.html"), None);
    }

    #[test]
    fn test_post_with_bad_date() {
        let fixture = Fixture::new(2);
        fixture.post("dated", "2020-01-01");
        fixture.post("someday", "Spring 2021");

        match fixture.build() {
            Err(Error::Metadata(msg)) => assert!(msg.contains("someday")),
            Err(e) => panic!("expected a metadata error, got {}", e),
            Ok(_) => panic!("expected a metadata error"),
        }
    }

    #[test]
    fn test_dotfile_is_not_a_post() -> Result<()> {
        let fixture = Fixture::new(2);
        fixture.post("p1", "2021-01-01");
        fs::write(fixture.site.input_dir.join("blog").join(".md"), "not a post").unwrap();

        let summary = fixture.build()?;
        assert_eq!(summary.posts, 1);
        assert_eq!(fixture.output(".md").unwrap(), "not a post");
        Ok(())
    }

    #[test]
    fn test_bad_post_names_file() {
        let fixture = Fixture::new(2);
        fs::write(fixture.site.input_dir.join("blog").join("broken.md"), "no delimiter").unwrap();

        let err = fixture.build().unwrap_err();
        assert!(matches!(err.root(), Error::Parse { found: 0 }));
        assert!(err.to_string().contains("broken.md"));
    }

    #[test]
    fn test_invalid_max_posts() {
        let fixture = Fixture::new(0);
        assert!(matches!(fixture.build(), Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_copies_assets() -> Result<()> {
        let fixture = Fixture::new(2);
        let source = fixture.site.input_dir.join("blog");
        fs::write(source.join("banana.png"), b"\x89PNG").unwrap();
        fs::create_dir_all(source.join("images")).unwrap();
        fs::write(source.join("images").join("peel.jpg"), b"jpeg").unwrap();

        fixture.build()?;
        assert_eq!(
            fs::read(fixture.site.output_dir.join("blog").join("banana.png")).unwrap(),
            b"\x89PNG"
        );
        assert_eq!(fixture.output("images/peel.jpg").unwrap(), "jpeg");
        assert_eq!(fixture.output(BLOG_FILE), None);
        Ok(())
    }
}
