use futures::executor::{LocalPool, block_on};

use super::*;
use crate::assets::fetch::LocalFetcher;
use crate::schema::hex::HexColor;
use crate::schema::model::{Anchor, ColorLayer, Direction, Gradient, Sizing};
use crate::sync::host::{ElementState, Interaction};
use crate::sync::memory::{HostOp, InMemoryPage};

const FLAG: &str = "slide-background-media";

fn svg_uri(w: u32, h: u32) -> String {
    let svg = format!(r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}"/>"#);
    format!(
        "data:image/svg+xml;charset=utf-8,{}",
        urlencoding::encode(&svg)
    )
}

fn media_bg(url: &str, sizing: Sizing, position: Anchor) -> SlideBackground {
    SlideBackground::default().with_media(MediaLayer::new(url, sizing, position))
}

fn page(w: f64, h: f64) -> Rc<RefCell<InMemoryPage>> {
    Rc::new(RefCell::new(InMemoryPage::with_size(w, h)))
}

fn media_elements(page: &Rc<RefCell<InMemoryPage>>) -> Vec<ElementState> {
    page.borrow()
        .elements()
        .iter()
        .filter(|e| e.has_flag(FLAG))
        .cloned()
        .collect()
}

fn setup() -> (LocalPool, BackgroundSynchronizer<futures::executor::LocalSpawner>) {
    let pool = LocalPool::new();
    let sync = BackgroundSynchronizer::new(
        ImageSizeResolver::new(LocalFetcher::default()),
        pool.spawner(),
    );
    (pool, sync)
}

#[test]
fn color_and_metadata_are_written_synchronously() {
    let (_pool, sync) = setup();
    let page = page(800.0, 600.0);
    let bg = SlideBackground::solid(HexColor::rgb(255, 0, 0));
    sync.apply(&page, &bg).unwrap();

    let host = page.borrow();
    assert_eq!(host.native_background(), "#FF0000");
    assert_eq!(host.metadata("slideBackground"), Some(bg.to_json()));
    assert!(host.elements().is_empty());
}

#[test]
fn radial_gradient_writes_svg_data_uri() {
    let (_pool, sync) = setup();
    let page = page(800.0, 600.0);
    let bg = SlideBackground {
        color: ColorLayer::Gradient {
            gradient: Gradient {
                from: HexColor::WHITE,
                to: HexColor::BLACK,
                direction: Direction::Radial,
            },
        },
        media: None,
    };
    sync.apply(&page, &bg).unwrap();
    assert!(
        page.borrow()
            .native_background()
            .starts_with("data:image/svg+xml;charset=utf-8,")
    );
}

#[test]
fn stale_metadata_is_replaced_with_canonical_record() {
    let (_pool, sync) = setup();
    let page = page(800.0, 600.0);
    page.borrow_mut()
        .set_metadata("slideBackground", serde_json::json!({"color": "#fff"}));
    sync.apply(&page, &SlideBackground::default()).unwrap();
    assert_eq!(
        page.borrow().metadata("slideBackground"),
        Some(serde_json::json!({"color": {"type": "solid", "solid": "#FFFFFF"}, "media": null}))
    );
}

#[test]
fn media_element_is_created_locked_and_unselected() {
    let (mut pool, sync) = setup();
    let page = page(1080.0, 1920.0);
    let url = svg_uri(1920, 1080);
    sync.apply(&page, &media_bg(&url, Sizing::Fill, Anchor::Center))
        .unwrap();

    let els = media_elements(&page);
    assert_eq!(els.len(), 1);
    assert_eq!(els[0].src, url);
    assert_eq!(els[0].interaction, Interaction::LOCKED);
    assert_eq!(els[0].geometry, MediaGeometry::full_page(PageSize::new(1080.0, 1920.0)));
    assert_eq!(page.borrow().selected(), None);

    pool.run_until_stalled();
    let g = media_elements(&page)[0].geometry;
    assert_eq!((g.x, g.y, g.width, g.height), (0.0, 0.0, 1080.0, 1920.0));
    assert!((g.crop_width - 0.31640625).abs() < 1e-12);
    assert!((g.crop_x - 0.341796875).abs() < 1e-12);
    assert_eq!((g.crop_y, g.crop_height), (0.0, 1.0));
}

#[test]
fn repeated_applies_keep_exactly_one_element() {
    let (mut pool, sync) = setup();
    let page = page(400.0, 400.0);
    let bg = media_bg(&svg_uri(200, 100), Sizing::Fit, Anchor::TopLeft);
    for _ in 0..3 {
        sync.apply(&page, &bg).unwrap();
    }
    pool.run_until_stalled();
    sync.apply(&page, &bg).unwrap();
    pool.run_until_stalled();

    let els = media_elements(&page);
    assert_eq!(els.len(), 1);
    let g = els[0].geometry;
    assert_eq!((g.x, g.y, g.width, g.height), (0.0, 0.0, 400.0, 200.0));
    assert_eq!(sync.resolver().lookups_started(), 1);
}

#[test]
fn clearing_media_removes_the_element() {
    let (mut pool, sync) = setup();
    let page = page(400.0, 400.0);
    sync.apply(&page, &media_bg(&svg_uri(10, 10), Sizing::Fill, Anchor::Center))
        .unwrap();
    pool.run_until_stalled();
    assert_eq!(media_elements(&page).len(), 1);

    sync.apply(&page, &SlideBackground::default()).unwrap();
    assert!(media_elements(&page).is_empty());
    pool.run_until_stalled();
    assert!(media_elements(&page).is_empty());
}

#[test]
fn url_change_updates_element_in_place() {
    let (mut pool, sync) = setup();
    let page = page(400.0, 200.0);
    sync.apply(&page, &media_bg(&svg_uri(100, 100), Sizing::Fit, Anchor::Center))
        .unwrap();
    pool.run_until_stalled();
    let first = media_elements(&page)[0].clone();
    assert_eq!(first.geometry.width, 200.0);

    let next = svg_uri(400, 100);
    sync.apply(&page, &media_bg(&next, Sizing::Fit, Anchor::Center))
        .unwrap();
    pool.run_until_stalled();
    let els = media_elements(&page);
    assert_eq!(els.len(), 1);
    assert_eq!(els[0].id, first.id);
    assert_eq!(els[0].src, next);
    let g = els[0].geometry;
    assert_eq!((g.x, g.y, g.width, g.height), (0.0, 50.0, 400.0, 100.0));
}

#[test]
fn unresolvable_media_falls_back_to_full_page() {
    let (mut pool, sync) = setup();
    let page = page(640.0, 480.0);
    sync.apply(
        &page,
        &media_bg("https://example.com/a.png", Sizing::Fit, Anchor::Center),
    )
    .unwrap();
    pool.run_until_stalled();
    assert_eq!(
        media_elements(&page)[0].geometry,
        MediaGeometry::full_page(PageSize::new(640.0, 480.0))
    );
}

#[test]
fn missing_page_size_uses_fallback_canvas() {
    let (mut pool, sync) = setup();
    let page = Rc::new(RefCell::new(InMemoryPage::new(None)));
    sync.apply(&page, &media_bg(&svg_uri(50, 100), Sizing::Fit, Anchor::Center))
        .unwrap();
    pool.run_until_stalled();
    let g = media_elements(&page)[0].geometry;
    assert_eq!((g.x, g.y, g.width, g.height), (25.0, 0.0, 50.0, 100.0));
}

#[test]
fn element_is_pinned_behind_existing_content() {
    let (mut pool, sync) = setup();
    let page = page(100.0, 100.0);
    let other = page
        .borrow_mut()
        .add_element(
            ElementInit {
                custom_flags: vec![],
                src: "photo.png".to_string(),
                geometry: MediaGeometry::full_page(PageSize::new(10.0, 10.0)),
                interaction: Interaction::OPEN,
            },
            false,
        )
        .unwrap();
    sync.apply(&page, &media_bg(&svg_uri(10, 10), Sizing::Fill, Anchor::Center))
        .unwrap();
    pool.run_until_stalled();

    let host = page.borrow();
    assert!(host.elements()[0].has_flag(FLAG));
    assert_eq!(host.elements()[1].id, other);
    assert_eq!(host.selected(), Some(other));
}

#[test]
fn duplicate_media_elements_are_collapsed() {
    let (mut pool, sync) = setup();
    let page = page(100.0, 100.0);
    let url = svg_uri(10, 10);
    for _ in 0..3 {
        page.borrow_mut()
            .add_element(
                ElementInit::background_media(FLAG, &url, PageSize::new(100.0, 100.0)),
                true,
            )
            .unwrap();
    }
    sync.apply(&page, &media_bg(&url, Sizing::Fill, Anchor::Center))
        .unwrap();
    pool.run_until_stalled();
    assert_eq!(media_elements(&page).len(), 1);
}

#[test]
fn pin_failures_are_swallowed_but_add_failures_propagate() {
    let (mut pool, sync) = setup();
    let page = page(100.0, 100.0);
    page.borrow_mut().fail_on(HostOp::MoveToBack);
    sync.apply(&page, &media_bg(&svg_uri(10, 10), Sizing::Fill, Anchor::Center))
        .unwrap();
    pool.run_until_stalled();
    assert_eq!(media_elements(&page).len(), 1);

    let fresh = self::page(100.0, 100.0);
    fresh.borrow_mut().fail_on(HostOp::Add);
    let err = sync
        .apply(&fresh, &media_bg(&svg_uri(10, 10), Sizing::Fill, Anchor::Center))
        .unwrap_err();
    assert!(err.to_string().starts_with("host error:"));
}

#[test]
fn geometry_is_dropped_when_element_disappears_first() {
    let (mut pool, sync) = setup();
    let page = page(100.0, 100.0);
    sync.apply(&page, &media_bg(&svg_uri(10, 20), Sizing::Fit, Anchor::Center))
        .unwrap();
    let id = media_elements(&page)[0].id;
    page.borrow_mut().remove_element(id).unwrap();
    pool.run_until_stalled();
    assert!(page.borrow().elements().is_empty());
}

#[test]
fn apply_settled_writes_geometry_before_completing() {
    let (_pool, sync) = setup();
    let page = page(300.0, 100.0);
    block_on(sync.apply_settled(
        &page,
        &media_bg(&svg_uri(100, 100), Sizing::Fit, Anchor::CenterRight),
    ))
    .unwrap();
    let g = media_elements(&page)[0].geometry;
    assert_eq!((g.x, g.y, g.width, g.height), (200.0, 0.0, 100.0, 100.0));

    page.borrow_mut().fail_on(HostOp::Update);
    page.borrow_mut().set_size(Some(PageSize::new(100.0, 300.0)));
    let err = block_on(sync.apply_settled(
        &page,
        &media_bg(&svg_uri(100, 100), Sizing::Fit, Anchor::CenterRight),
    ))
    .unwrap_err();
    assert!(err.to_string().starts_with("host error:"));
}

#[test]
fn custom_opts_change_key_and_flag() {
    let (mut pool, sync) = setup();
    let sync = sync
        .with_opts(SyncOpts {
            metadata_key: "bg".to_string(),
            role_flag: "bg-media".to_string(),
            ..SyncOpts::default()
        })
        .unwrap();
    let page = page(100.0, 100.0);
    sync.apply(&page, &media_bg(&svg_uri(10, 10), Sizing::Fill, Anchor::Center))
        .unwrap();
    pool.run_until_stalled();
    let host = page.borrow();
    assert!(host.metadata("bg").is_some());
    assert_eq!(host.element_ids_with_flag("bg-media").len(), 1);
    assert!(host.element_ids_with_flag(FLAG).is_empty());
}

#[test]
fn reused_element_is_relocked() {
    let (mut pool, sync) = setup();
    let page = page(100.0, 100.0);
    let url = svg_uri(10, 10);
    let id = page
        .borrow_mut()
        .add_element(
            ElementInit {
                interaction: Interaction::OPEN,
                ..ElementInit::background_media(FLAG, &url, PageSize::new(100.0, 100.0))
            },
            true,
        )
        .unwrap();

    sync.apply(&page, &media_bg(&url, Sizing::Fill, Anchor::Center))
        .unwrap();
    pool.run_until_stalled();

    let els = media_elements(&page);
    assert_eq!(els.len(), 1);
    assert_eq!(els[0].id, id);
    assert_eq!(els[0].src, url);
    assert_eq!(els[0].interaction, Interaction::LOCKED);
}
