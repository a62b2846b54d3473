use std::io::Cursor;

use super::*;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn png_dimensions() {
    let size = decode_natural_size(&png_bytes(7, 3)).unwrap();
    assert_eq!(size, NaturalSize::new(7, 3));
}

#[test]
fn svg_dimensions_round_up() {
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="10.2" height="4"></svg>"#;
    assert_eq!(decode_natural_size(svg).unwrap(), NaturalSize::new(11, 4));
}

#[test]
fn garbage_is_a_decode_error() {
    let err = decode_natural_size(b"definitely not an image").unwrap_err();
    assert!(err.to_string().contains("decode error:"));
    assert!(decode_natural_size(&[]).is_err());
}
