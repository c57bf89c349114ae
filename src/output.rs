//! CLI output formatting for the project status display.
//!
//! The display is information-centric: each entity (land, element, bed) gets
//! a header line with its semantic identity and footprint, with configuration
//! shown as indented context lines.
//!
//! ```text
//! Land
//!     Photo: uploaded
//!     Dimensions: 10m x 6m (60.00 m²)
//!     Ground: grass
//!     People removal: on
//!     Engine: fast
//!
//! Elements
//! 001 Chicken Coop (2.00 m²)
//!     Size: 2m x 1m (custom)
//!     Position: automatic
//!
//! Raised Beds
//! 001 Raised Bed #1 (2.00 m²)
//!     Material: wood, with trellis
//!     Plants: cherry tomatoes, mint
//!
//! Capacity: 4.00 of 60.00 m² occupied (7%)
//! Ready to render
//! ```
//!
//! Format functions are pure (return `Vec<String>`, no I/O); `print_status`
//! is the stdout wrapper.

use crate::project::{ElementDetail, ProjectState, QualityMode, RaisedBedDetail, SizePreset};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(line: impl AsRef<str>) -> String {
    format!("    {}", line.as_ref())
}

fn preset_name(preset: SizePreset) -> &'static str {
    match preset {
        SizePreset::Small => "small",
        SizePreset::Medium => "medium",
        SizePreset::Large => "large",
        SizePreset::Custom => "custom",
    }
}

fn position_name(detail: &ElementDetail) -> String {
    match detail.placement.phrase() {
        Some(phrase) => phrase.to_string(),
        None => "automatic".to_string(),
    }
}

fn size_line(detail: &ElementDetail) -> String {
    format!(
        "Size: {}m x {}m ({})",
        detail.length_m,
        detail.width_m,
        preset_name(detail.size_preset)
    )
}

fn detail_lines(detail: &ElementDetail) -> Vec<String> {
    let mut lines = vec![indent(size_line(detail)), indent(format!("Position: {}", position_name(detail)))];
    if let Some(notes) = &detail.notes {
        lines.push(indent(format!("Notes: {notes}")));
    }
    if detail.ref_image.is_some() {
        lines.push(indent("Reference: attached"));
    }
    lines
}

fn bed_lines(index: usize, bed: &RaisedBedDetail) -> Vec<String> {
    let mut lines = vec![format!(
        "{} Raised Bed #{} ({:.2} m²)",
        format_index(index + 1),
        index + 1,
        bed.detail.area_m2
    )];
    lines.extend(detail_lines(&bed.detail));
    let trellis = if bed.has_trellis {
        "with trellis"
    } else {
        "no trellis"
    };
    lines.push(indent(format!("Material: {}, {}", bed.material.label(), trellis)));
    if !bed.plants.trim().is_empty() {
        lines.push(indent(format!("Plants: {}", bed.plants.trim())));
    }
    lines
}

/// Render the full status display for a project.
pub fn format_status(project: &ProjectState) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Land".to_string());
    lines.push(indent(if project.land_photo.is_some() {
        "Photo: uploaded"
    } else {
        "Photo: none"
    }));
    lines.push(indent(format!(
        "Dimensions: {}m x {}m ({:.2} m²)",
        project.land_length_m,
        project.land_width_m,
        project.land_area()
    )));
    lines.push(indent(format!("Ground: {}", project.ground_base.label())));
    lines.push(indent(format!(
        "People removal: {}",
        if project.remove_people { "on" } else { "off" }
    )));
    lines.push(indent(format!(
        "Engine: {}",
        match project.quality_mode {
            QualityMode::Fast => "fast",
            QualityMode::High => "high (billed key required)",
        }
    )));
    lines.push(String::new());

    if !project.elements.is_empty() {
        lines.push("Elements".to_string());
        for (pos, (kind, detail)) in project.elements.iter().enumerate() {
            lines.push(format!(
                "{} {} ({:.2} m²)",
                format_index(pos + 1),
                kind.label(),
                detail.area_m2
            ));
            lines.extend(detail_lines(detail));
        }
        lines.push(String::new());
    }

    if !project.raised_beds.is_empty() {
        lines.push("Raised Beds".to_string());
        for (index, bed) in project.raised_beds.iter().enumerate() {
            lines.extend(bed_lines(index, bed));
        }
        lines.push(String::new());
    }

    let land = project.land_area();
    let occupied = project.occupied_area();
    let percent = if land > 0.0 {
        (occupied / land * 100.0).round() as u32
    } else {
        0
    };
    lines.push(format!(
        "Capacity: {occupied:.2} of {land:.2} m² occupied ({percent}%)"
    ));

    let readiness = project.readiness();
    if readiness.is_ready() {
        lines.push("Ready to render".to_string());
    } else {
        lines.push("Not ready:".to_string());
        for failure in readiness.failures() {
            lines.push(indent(format!("- {failure}")));
        }
    }

    lines
}

/// Print the status display to stdout.
pub fn print_status(project: &ProjectState) {
    for line in format_status(project) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{ElementKind, ImageData, Material};

    fn sample_project() -> ProjectState {
        let mut project = ProjectState::default();
        project.land_photo = Some(ImageData::jpeg(vec![1]));
        project.select(ElementKind::ToolShed);
        let bed = project.add_raised_bed();
        project.raised_beds[bed].material = Material::Wood;
        project.raised_beds[bed].plants = "mint".into();
        project
    }

    #[test]
    fn status_shows_land_summary() {
        let lines = format_status(&sample_project());
        assert_eq!(lines[0], "Land");
        assert!(lines.contains(&"    Photo: uploaded".to_string()));
        assert!(lines.contains(&"    Dimensions: 10m x 6m (60.00 m²)".to_string()));
        assert!(lines.contains(&"    Ground: grass".to_string()));
    }

    #[test]
    fn status_lists_elements_with_area() {
        let lines = format_status(&sample_project());
        assert!(lines.contains(&"001 Tool Shed (2.00 m²)".to_string()));
        assert!(lines.contains(&"    Size: 2m x 1m (medium)".to_string()));
        assert!(lines.contains(&"    Position: automatic".to_string()));
    }

    #[test]
    fn status_lists_raised_beds() {
        let lines = format_status(&sample_project());
        assert!(lines.contains(&"001 Raised Bed #1 (2.00 m²)".to_string()));
        assert!(lines.contains(&"    Material: wood, no trellis".to_string()));
        assert!(lines.contains(&"    Plants: mint".to_string()));
    }

    #[test]
    fn status_reports_capacity_and_readiness() {
        let lines = format_status(&sample_project());
        assert!(lines.contains(&"Capacity: 4.00 of 60.00 m² occupied (7%)".to_string()));
        assert_eq!(lines.last().unwrap(), "Ready to render");
    }

    #[test]
    fn unready_project_lists_failures() {
        let lines = format_status(&ProjectState::default());
        assert!(lines.contains(&"Not ready:".to_string()));
        assert!(lines.contains(&"    - no land photo uploaded".to_string()));
        assert!(lines.contains(&"    - no elements or raised beds selected".to_string()));
    }

    #[test]
    fn empty_sections_are_omitted() {
        let lines = format_status(&ProjectState::default());
        assert!(!lines.contains(&"Elements".to_string()));
        assert!(!lines.contains(&"Raised Beds".to_string()));
    }

    #[test]
    fn zero_land_area_shows_zero_percent() {
        let mut project = sample_project();
        project.land_width_m = 0.0;
        let lines = format_status(&project);
        assert!(lines.iter().any(|l| l.ends_with("(0%)")));
    }
}
