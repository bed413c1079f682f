//! End-to-end session: plan file on disk → report JPEGs → session PDF.

use delivery_collage::capture::{Capture, FileCapture};
use delivery_collage::config::{ReportConfig, resolve_config, stock_defaults_value};
use delivery_collage::plan::load_plan;
use delivery_collage::workflow::{Workflow, save_document, save_report_image};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;

fn write_jpeg(path: &Path, width: u32, height: u32, color: [u8; 3]) {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)));
    image.save_with_format(path, ImageFormat::Jpeg).unwrap();
}

fn write_png(path: &Path, width: u32, height: u32) {
    RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 200]))
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

fn config_with_secret(secret: &str) -> ReportConfig {
    let overlay: toml::Value = toml::from_str(&format!("[auth]\nsecret = \"{secret}\"\n")).unwrap();
    resolve_config(stock_defaults_value(), Some(overlay)).unwrap()
}

#[test]
fn plan_replays_into_paginated_pdf() {
    let tmp = tempfile::TempDir::new().unwrap();
    let day = tmp.path().join("day");
    std::fs::create_dir_all(&day).unwrap();
    write_jpeg(&day.join("a.jpg"), 320, 240, [200, 30, 30]);
    write_jpeg(&day.join("b.jpg"), 240, 320, [30, 200, 30]);
    write_jpeg(&day.join("c.jpg"), 300, 300, [30, 30, 200]);
    write_png(&day.join("logo.png"), 64, 32);
    std::fs::write(
        day.join("plan.toml"),
        r#"
watermark = "logo.png"

[[stops]]
label = "Dock 4"
captured_at = "2026-03-07T09:05:00"
location = { latitude = -33.4489, longitude = -70.6693, address = "Av. Providencia 1234, Santiago" }
photos = ["a.jpg", "b.jpg"]

[[stops]]
id = "Cliente 12"
captured_at = "2026-03-07T11:40:00"
photos = ["c.jpg"]

[[stops]]
captured_at = "2026-03-07T15:20:00"
photos = ["a.jpg"]
"#,
    )
    .unwrap();

    let plan = load_plan(&day.join("plan.toml")).unwrap();
    let mut workflow = Workflow::from_config(&config_with_secret("ruta")).unwrap();
    workflow.start_session("ruta").unwrap();
    workflow.load_watermark(plan.watermark.as_deref().unwrap()).unwrap();

    let mut camera = FileCapture::new(Vec::new());
    camera.start(None).unwrap();
    let out = tmp.path().join("out");
    let mut ids = Vec::new();
    for stop in &plan.stops {
        camera.enqueue(stop.photos.iter().cloned());
        let mut locator = stop.locator();
        let at = stop.captured_at.unwrap();
        for _ in &stop.photos {
            workflow
                .capture_photo(&mut camera, &mut locator, &stop.label, at)
                .unwrap_or_else(|e| panic!("capture failed: {e}"));
        }
        let report = workflow.save_stop(stop.id.as_deref()).unwrap();
        let path = save_report_image(&report, &out).unwrap();
        let saved = image::open(&path).unwrap();
        assert_eq!((saved.width(), saved.height()), (1200, 900));
        ids.push(report.id);
    }
    assert_eq!(ids, ["Stop 1", "Cliente 12", "Stop 2"]);

    let document = workflow.close_session().unwrap();
    assert!(!workflow.is_authenticated());
    assert!(workflow.reports().is_empty());
    assert_eq!(document.page_count, 3);

    let path = save_document(&document, &out).unwrap();
    assert_eq!(path, out.join("delivery_journey_report.pdf"));

    let pdf = lopdf::Document::load(&path).unwrap();
    assert_eq!(pdf.get_pages().len(), 3);
    let first = pdf.extract_text(&[1]).unwrap();
    assert!(first.contains("Delivery Report: Stop 1"), "{first}");
    assert!(first.contains("Date: 7/3/2026, 09:05"), "{first}");
    assert!(first.contains("Location: Av. Providencia 1234, Santiago"), "{first}");
    let second = pdf.extract_text(&[2]).unwrap();
    assert!(second.contains("Delivery Report: Cliente 12"), "{second}");
    assert!(second.contains("Location: not available"), "{second}");
}

#[test]
fn missing_password_keeps_workflow_locked() {
    let mut workflow = Workflow::from_config(&config_with_secret("ruta")).unwrap();
    assert!(workflow.start_session("").is_err());
    assert!(workflow.close_session().is_err());
}

#[test]
fn closing_an_empty_session_fails_without_logging_out() {
    let mut workflow = Workflow::from_config(&ReportConfig::default()).unwrap();
    workflow.start_session("").unwrap();
    assert!(workflow.close_session().is_err());
    assert!(workflow.is_authenticated());
}
