use std::io::Cursor;

use image::{ImageFormat, RgbImage};
use receipt_capture_rust::client::OcrFields;
use receipt_capture_rust::data_uri;
use receipt_capture_rust::receipt::load_receipt_from_bytes;
use receipt_capture_rust::session::CaptureSession;
use receipt_capture_rust::{ReimbursementForm, preview, transcode};

fn jpeg_receipt_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 40) as u8, (y * 40) as u8, 128])
    });
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
        .expect("encode jpeg");
    bytes
}

#[test]
fn capture_pipeline_normalizes_to_png_and_round_trips() {
    let receipt = load_receipt_from_bytes(jpeg_receipt_bytes(6, 3), Some("receipt.jpg"))
        .expect("load receipt");
    assert_eq!(receipt.mime, "image/jpeg");

    let encoded = transcode::to_png_data_uri(&receipt).expect("transcode");
    assert!(encoded.starts_with("data:image/png;base64,"));

    let mut session = CaptureSession::new();
    session.store(encoded);

    let decoded = session.decoded().expect("decode stored capture");
    assert_eq!(decoded.mime, "image/png");
    let img = image::load_from_memory(&decoded.bytes).expect("valid png");
    assert_eq!((img.width(), img.height()), (6, 3));
}

#[test]
fn data_uri_encode_decode_is_lossless() {
    let payload: Vec<u8> = (0u8..=255).collect();
    let uri = data_uri::encode(&payload, "application/octet-stream");
    let decoded = data_uri::decode(&uri).expect("decode");
    assert_eq!(decoded.bytes, payload);
    assert_eq!(decoded.mime, "application/octet-stream");
}

#[test]
fn ocr_fixture_renders_the_preview_lines() {
    let payload = include_str!("fixtures/ocr_response.json");
    let fields: OcrFields = serde_json::from_str(payload).expect("parse fixture");
    insta::assert_snapshot!(preview::render_ocr(&fields), @r###"
    OR Number: 12345
    Date: 2024-01-01
    Time: 10:00
    Amount Paid: 500.00
    "###);
}

#[test]
fn submission_requires_a_capture_and_a_complete_form() {
    let session = CaptureSession::new();
    let err = session.decoded().unwrap_err();
    assert!(err.to_string().contains("no receipt captured"));

    let form = ReimbursementForm {
        name: "Jane Doe".to_string(),
        id_number: "E-001".to_string(),
        position: "Engineer".to_string(),
        division: "Operations".to_string(),
        team_head: "John Head".to_string(),
        month: "January".to_string(),
        pid: "".to_string(),
    };
    let err = form.ensure_complete().unwrap_err();
    assert!(err.to_string().contains("pid"));
}
