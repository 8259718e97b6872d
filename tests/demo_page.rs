use std::path::Path;

use slideshow_widget::{Page, SlideshowHost, Surface};

fn demo_host() -> SlideshowHost<Page> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/gallery.json");
    SlideshowHost::new(Page::load(&path).unwrap())
}

#[test]
fn boots_every_declared_slideshow() {
    let mut host = demo_host();
    assert_eq!(host.init_declared(), vec!["gallery".to_string(), "quotes".to_string()]);

    let gallery = host.slideshow("gallery").unwrap();
    assert_eq!(gallery.slide_count(), 3);
    assert_eq!(gallery.config().timeout_ms, 2000);
    assert!(gallery.config().autoheight);
    assert_eq!(host.slideshow("quotes").unwrap().config().timeout_ms, 3500);
    assert_eq!(host.controls().len(), 4);
}

#[test]
fn timers_run_independently() {
    let mut host = demo_host();
    host.init_declared();

    // gallery fires at 2000 and 4000, quotes at 3500.
    assert_eq!(host.tick(4000), 3);
    assert_eq!(host.slideshow("gallery").unwrap().current_slide(), 2);
    assert_eq!(host.slideshow("quotes").unwrap().current_slide(), 1);

    let container = host.surface().element_by_id("gallery").unwrap();
    assert_eq!(host.surface().style_height(container), Some(300.0));
}

#[test]
fn go_trigger_and_meta_caption() {
    let mut host = demo_host();
    host.init_declared();
    host.tick(2000);

    let first = host.surface().element_by_id("gallery-first").unwrap();
    assert!(host.click(first));
    let meta = host.get("gallery").unwrap().slide_meta().unwrap();
    assert_eq!(meta.index, 0);
    assert_eq!(meta.caption.as_deref(), Some("Harbour at dawn"));
}

#[test]
fn missing_fixture_is_an_io_error() {
    let err = Page::load(Path::new("demos/does-not-exist.json")).unwrap_err();
    assert!(matches!(err, slideshow_widget::PageError::Io { .. }));
}
