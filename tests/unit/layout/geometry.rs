use super::*;

const EPS: f64 = 1e-9;

fn pages() -> Vec<PageSize> {
    vec![
        PageSize::new(1920.0, 1080.0),
        PageSize::new(1080.0, 1920.0),
        PageSize::new(1000.0, 1000.0),
        PageSize::new(333.0, 777.0),
    ]
}

fn images() -> Vec<NaturalSize> {
    vec![
        NaturalSize::new(1920, 1080),
        NaturalSize::new(1080, 1920),
        NaturalSize::new(500, 500),
        NaturalSize::new(4000, 100),
        NaturalSize::new(7, 3001),
    ]
}

#[test]
fn fill_scenario_portrait_page_landscape_image() {
    let g = resolve_geometry(
        PageSize::new(1080.0, 1920.0),
        Some(NaturalSize::new(1920, 1080)),
        Sizing::Fill,
        Anchor::Center,
    );
    assert_eq!(g.bounds(), Rect::new(0.0, 0.0, 1080.0, 1920.0));
    assert!((g.crop_width - 0.31640625).abs() < EPS);
    assert_eq!(g.crop_height, 1.0);
    assert!((g.crop_x - 0.341796875).abs() < EPS);
    assert_eq!(g.crop_y, 0.0);
}

#[test]
fn fit_preserves_aspect_and_stays_inside_page() {
    for page in pages() {
        for img in images() {
            for anchor in Anchor::ALL {
                let g = fit_geometry(page, img, anchor);
                assert!((g.width / g.height - img.aspect()).abs() < 1e-6);
                assert!(g.width <= page.width + EPS && g.height <= page.height + EPS);
                assert!(g.x >= 0.0 && g.x + g.width <= page.width + EPS);
                assert!(g.y >= 0.0 && g.y + g.height <= page.height + EPS);
                assert_eq!(g.crop(), Rect::new(0.0, 0.0, 1.0, 1.0));
            }
        }
    }
}

#[test]
fn fill_crop_stays_in_bounds_and_crops_one_axis() {
    for page in pages() {
        for img in images() {
            for anchor in Anchor::ALL {
                let g = fill_geometry(page, img, anchor);
                assert_eq!(g.bounds(), page.bounds());
                assert!(g.crop_x >= 0.0 && g.crop_x <= 1.0 - g.crop_width + EPS);
                assert!(g.crop_y >= 0.0 && g.crop_y <= 1.0 - g.crop_height + EPS);
                let same_aspect = (img.aspect() - page.aspect()).abs() < EPS;
                if same_aspect {
                    assert_eq!((g.crop_width, g.crop_height), (1.0, 1.0));
                } else {
                    assert!((g.crop_width == 1.0) ^ (g.crop_height == 1.0));
                }
                // The visible crop has the page's aspect ratio.
                let crop_aspect = (g.crop_width * f64::from(img.width))
                    / (g.crop_height * f64::from(img.height));
                assert!((crop_aspect - page.aspect()).abs() < 1e-6);
            }
        }
    }
}

#[test]
fn anchor_extremes_hit_zero_and_full_slack() {
    let page = PageSize::new(1000.0, 1000.0);
    let wide = NaturalSize::new(2000, 1000);
    let tall = NaturalSize::new(1000, 2000);

    let top = fit_geometry(page, wide, Anchor::TopCenter);
    let bottom = fit_geometry(page, wide, Anchor::BottomCenter);
    assert_eq!(top.y, 0.0);
    assert!((bottom.y - 500.0).abs() < EPS);

    let left = fit_geometry(page, tall, Anchor::CenterLeft);
    let right = fit_geometry(page, tall, Anchor::CenterRight);
    assert_eq!(left.x, 0.0);
    assert!((right.x - 500.0).abs() < EPS);

    let start = fill_geometry(page, wide, Anchor::CenterLeft);
    let end = fill_geometry(page, wide, Anchor::CenterRight);
    assert_eq!(start.crop_x, 0.0);
    assert!((end.crop_x - 0.5).abs() < EPS);

    let start = fill_geometry(page, tall, Anchor::TopLeft);
    let end = fill_geometry(page, tall, Anchor::BottomLeft);
    assert_eq!(start.crop_y, 0.0);
    assert!((end.crop_y - 0.5).abs() < EPS);
}

#[test]
fn unresolved_or_degenerate_sizes_fall_back_to_full_page() {
    let page = PageSize::new(640.0, 480.0);
    for natural in [None, Some(NaturalSize::new(0, 10)), Some(NaturalSize::new(10, 0))] {
        for sizing in [Sizing::Fit, Sizing::Fill] {
            assert_eq!(
                resolve_geometry(page, natural, sizing, Anchor::Center),
                MediaGeometry::full_page(page)
            );
        }
    }
}
