//! End-to-end flow over a real project file: edit, persist, reload, compose.

use gardenplot::compose::{FAST_MODEL, HIGH_MODEL, Part, compose};
use gardenplot::imaging::compress_image;
use gardenplot::project::{ElementKind, Material, ProjectState, QualityMode, SizePreset};
use gardenplot::store::ProjectStore;
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};

/// Synthetic land photo as JPEG bytes.
fn land_photo_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 200) as u8, 150, (y % 200) as u8])
    });
    let mut out = Vec::new();
    JpegEncoder::new(&mut out).encode_image(&img).unwrap();
    out
}

#[test]
fn full_project_lifecycle() {
    let tmp = tempfile::TempDir::new().unwrap();
    let store = ProjectStore::new(tmp.path().join("garden-project.json"));

    // Fresh load gives the documented defaults: 10x6 grass, remove-people on.
    let mut project = store.load();
    assert_eq!(project.land_area(), 60.0);
    assert_eq!(project.quality_mode, QualityMode::Fast);
    assert!(project.remove_people);
    assert!(!project.readiness().is_ready());

    // Upload a photo (compressed on ingest) and pick elements.
    let compressed = compress_image(&land_photo_bytes(2000, 1200)).unwrap();
    assert_eq!((compressed.width, compressed.height), (1600, 960));
    project.land_photo = Some(compressed.image);

    project.select(ElementKind::ToolShed); // 2x1
    let bed = project.add_raised_bed(); // 2x1
    project.raised_beds[bed].plants = "kale, chives".into();
    project.raised_beds[bed].material = Material::RedBrick;

    // 4 m² on 60 m² of land: ready.
    assert_eq!(project.occupied_area(), 4.0);
    assert!(project.readiness().is_ready());
    store.save(&project).unwrap();

    // Reload: every field round-trips.
    let reloaded = store.load();
    assert_eq!(reloaded, project);

    // Compose from the reloaded snapshot: land photo first, text last.
    let request = compose(&reloaded);
    assert_eq!(request.model, FAST_MODEL);
    assert!(request.image_config.is_none());
    assert!(matches!(request.parts.first().unwrap(), Part::Inline(_)));
    let Part::Text(prompt) = request.parts.last().unwrap() else {
        panic!("instruction text must be the final part");
    };
    assert!(prompt.contains("Tool Shed"));
    assert!(prompt.contains("Raised Bed #1"));
    assert!(prompt.contains("kale, chives"));
    assert!(prompt.contains("red brick"));

    // Zero width makes the project unsubmittable regardless of the rest.
    let mut broken = reloaded.clone();
    broken.land_width_m = 0.0;
    assert!(!broken.readiness().is_ready());
}

#[test]
fn high_mode_switches_model_and_resolution() {
    let tmp = tempfile::TempDir::new().unwrap();
    let store = ProjectStore::new(tmp.path().join("garden-project.json"));

    let mut project = store.load();
    project.quality_mode = QualityMode::High;
    store.save(&project).unwrap();

    let request = compose(&store.load());
    assert_eq!(request.model, HIGH_MODEL);
    let config = request.image_config.unwrap();
    assert_eq!(config.aspect_ratio, "16:9");
    assert_eq!(config.image_size, "1K");
}

#[test]
fn corrupted_project_file_recovers_to_defaults() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("garden-project.json");
    std::fs::write(&path, "}}} garbage {{{").unwrap();

    let store = ProjectStore::new(&path);
    let project = store.load();
    assert_eq!(project, ProjectState::default());

    // Saving afterwards repairs the file.
    store.save(&project).unwrap();
    assert_eq!(store.load(), ProjectState::default());
}

#[test]
fn preset_edits_persist_exactly() {
    let tmp = tempfile::TempDir::new().unwrap();
    let store = ProjectStore::new(tmp.path().join("garden-project.json"));

    let mut project = store.load();
    let detail = project.select(ElementKind::NurseryZone);
    detail.apply_preset(SizePreset::Large);
    assert_eq!(detail.area_m2, 3.0);
    detail.apply_preset(SizePreset::Custom);
    detail.set_width(2.5);
    assert_eq!(detail.area_m2, 7.5);
    store.save(&project).unwrap();

    let reloaded = store.load();
    let detail = &reloaded.elements[&ElementKind::NurseryZone];
    assert_eq!(detail.size_preset, SizePreset::Custom);
    assert_eq!(detail.length_m, 3.0);
    assert_eq!(detail.width_m, 2.5);
    assert_eq!(detail.area_m2, 7.5);
}
