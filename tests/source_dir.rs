use std::fs;
use std::sync::Arc;

use newsdeck::{
    CategoryArea, CategoryPolicy, DirSource, FetchError, FixedCategory, LoadOutcome,
    ResourceSource, Viewer, ViewerConfig,
};

fn write_site(root: &std::path::Path, files: &[(&str, &str)]) {
    let data = root.join("data");
    fs::create_dir_all(&data).unwrap();
    for (name, body) in files {
        fs::write(data.join(name), body).unwrap();
    }
}

#[tokio::test]
async fn reads_resources_relative_to_root() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path(), &[("date.json", r#"{"dates":["2025-11-18"]}"#)]);
    let source = DirSource::new(dir.path());

    let bytes = source.fetch("data/date.json").await.unwrap();

    assert_eq!(bytes, br#"{"dates":["2025-11-18"]}"#);
    assert!(source.describe().starts_with("dir:"));
}

#[tokio::test]
async fn missing_file_is_an_io_fetch_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = DirSource::new(dir.path());

    let err = source.fetch("data/date.json").await.unwrap_err();

    assert!(matches!(err, FetchError::Io { .. }));
}

#[tokio::test]
async fn fixed_categories_render_from_local_checkout() {
    let dir = tempfile::tempdir().unwrap();
    write_site(
        dir.path(),
        &[
            ("date.json", r#"{"dates":["2025-11-18"]}"#),
            (
                "NewsPage-2025-11-18.json",
                r#"{"date":"2025-11-18","今日头条热榜":[{"title":"t","link":"https://t"}],"BBC中文网热点":[]}"#,
            ),
        ],
    );
    let cfg = ViewerConfig {
        category_policy: CategoryPolicy::Fixed(vec![
            FixedCategory::new("BBC中文网热点", "BBC 中文"),
            FixedCategory::new("百度热搜", "百度"),
            FixedCategory::new("今日头条热榜", "头条"),
        ]),
        ..ViewerConfig::default()
    };
    let viewer = Viewer::new(Arc::new(DirSource::new(dir.path())), cfg);

    assert_eq!(viewer.load_dates().await, LoadOutcome::Loaded);

    let page = viewer.page();
    let CategoryArea::Sections(sections) = &page.categories else {
        panic!("expected sections");
    };
    let titles: Vec<&str> = sections.iter().map(|section| section.title.as_str()).collect();
    assert_eq!(titles, vec!["BBC 中文", "百度", "头条"]);

    let html = viewer.render_html("热点");
    assert!(html.contains("<title>热点</title>"));
    assert!(html.contains("<a href=\"https://t\" target=\"_blank\" rel=\"noopener noreferrer\">t</a>"));
}
