//! Generation request composition.
//!
//! Pure transformation from a [`ProjectState`] snapshot to the payload sent
//! to the generation API: an ordered list of content parts (inline images
//! followed by one instruction string) plus the model selection.
//!
//! # Ordering Contract
//!
//! Part order is deterministic and significant: the instruction string
//! refers to "the attached reference image" positionally.
//!
//! 1. the land photo,
//! 2. one reference image per selected element, in [`ElementKind::ALL`] order,
//! 3. raised-bed reference images in list order,
//! 4. the instruction text, always last.
//!
//! Two structurally equal snapshots compose to identical requests. The
//! snapshot is never mutated.
//!
//! # Placement Encoding
//!
//! Elements are described with their physical size in meters and a
//! qualitative position phrase ("at the top-left position"); `Automatic`
//! placement delegates the decision to the model. There is no numeric
//! coordinate grid.

use crate::project::{
    ElementDetail, ElementKind, ImageData, Placement, ProjectState, QualityMode, RaisedBedDetail,
};

/// Model used in fast mode.
pub const FAST_MODEL: &str = "gemini-2.5-flash-image";
/// Model used in high-quality mode.
pub const HIGH_MODEL: &str = "gemini-3-pro-image-preview";

/// One content part in wire order.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Inline(ImageData),
    Text(String),
}

/// Output resolution/aspect configuration, only set in high-quality mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageConfig {
    pub aspect_ratio: &'static str,
    pub image_size: &'static str,
}

/// A composed request, ready for the API boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: &'static str,
    pub parts: Vec<Part>,
    pub image_config: Option<ImageConfig>,
}

/// Model id and image config for a quality mode.
pub fn model_for(mode: QualityMode) -> (&'static str, Option<ImageConfig>) {
    match mode {
        QualityMode::Fast => (FAST_MODEL, None),
        QualityMode::High => (
            HIGH_MODEL,
            Some(ImageConfig {
                aspect_ratio: "16:9",
                image_size: "1K",
            }),
        ),
    }
}

/// Compose the full generation request from a project snapshot.
///
/// The caller is responsible for checking [`ProjectState::readiness`] first;
/// composition itself never fails, it just describes whatever is selected.
pub fn compose(project: &ProjectState) -> GenerationRequest {
    let (model, image_config) = model_for(project.quality_mode);

    let mut parts = Vec::new();
    if let Some(photo) = &project.land_photo {
        parts.push(Part::Inline(photo.clone()));
    }

    let mut element_lines = Vec::new();
    for kind in ElementKind::ALL {
        let Some(detail) = project.elements.get(&kind) else {
            continue;
        };
        element_lines.push(element_line(kind, detail));
        if let Some(reference) = &detail.ref_image {
            parts.push(Part::Inline(reference.clone()));
        }
    }

    let mut bed_lines = Vec::new();
    for (index, bed) in project.raised_beds.iter().enumerate() {
        bed_lines.push(raised_bed_line(index, bed));
        if let Some(reference) = &bed.detail.ref_image {
            parts.push(Part::Inline(reference.clone()));
        }
    }

    parts.push(Part::Text(instruction_text(
        project,
        &element_lines,
        &bed_lines,
    )));

    GenerationRequest {
        model,
        parts,
        image_config,
    }
}

/// Position phrase for a structural element.
fn element_position(placement: Placement) -> String {
    match placement.phrase() {
        Some(p) => format!("at the {p} position"),
        None => "at the most logical position determined by AI".to_string(),
    }
}

/// Position phrase for a raised bed; automatic placement optimizes for light.
fn bed_position(placement: Placement) -> String {
    match placement.phrase() {
        Some(p) => format!("at the {p} position"),
        None => "at the best spot for sunlight".to_string(),
    }
}

/// Fixed styling for the chicken coop's signature build, used whenever the
/// element carries no notes of its own.
const COOP_STYLE_REFERENCE: &str =
    "Architectural Design Reference: Elevated wooden coop with reddish-brown varnished \
     natural wood finish. The main structure has a red corrugated gabled roof. The entire \
     unit sits on a single-layer grey concrete block (batako) foundation. The run area is \
     enclosed in wire mesh and has its own inclined transparent/translucent corrugated \
     roof section. Professional permaculture integrated aesthetic.";

fn element_line(kind: ElementKind, detail: &ElementDetail) -> String {
    let style = match (detail.notes.as_deref(), kind) {
        (Some(notes), _) => notes,
        (None, ElementKind::ChickenCoop) => COOP_STYLE_REFERENCE,
        (None, _) => "standard style",
    };
    let mut line = format!(
        "- {}: size {}m x {}m, positioned {}. Style: {}.",
        kind.label(),
        detail.length_m,
        detail.width_m,
        element_position(detail.placement),
        style,
    );
    if detail.ref_image.is_some() {
        line.push_str(" Follow the architectural patterns from the attached reference image.");
    }
    line
}

fn raised_bed_line(index: usize, bed: &RaisedBedDetail) -> String {
    let plants = if bed.plants.trim().is_empty() {
        "various vegetables"
    } else {
        bed.plants.trim()
    };
    let trellis = if bed.has_trellis {
        "include a climbing trellis"
    } else {
        "no trellis"
    };
    let mut line = format!(
        "- Raised Bed #{}: size {}m x {}m, material: {}, {}, positioned {}. Plants: {}.",
        index + 1,
        bed.detail.length_m,
        bed.detail.width_m,
        bed.material.label(),
        trellis,
        bed_position(bed.detail.placement),
        plants,
    );
    if bed.detail.ref_image.is_some() {
        line.push_str(" Use the attached reference image for the bed design.");
    }
    line
}

/// Assemble the single instruction string.
fn instruction_text(project: &ProjectState, element_lines: &[String], bed_lines: &[String]) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!(
        "TASK: Transform the source land plot photo ({}m x {}m) into a professional \
         integrated garden design.",
        project.land_length_m, project.land_width_m,
    ));
    if project.quality_mode == QualityMode::High {
        lines.push(
            "QUALITY: Use Ultra High Definition render with master-level landscape details."
                .to_string(),
        );
    }
    lines.push(format!(
        "GROUND SURFACE: Cover all land not occupied by components with {}.",
        project.ground_base.label(),
    ));
    lines.push(String::new());

    if project.remove_people {
        lines.push(
            "MANDATORY: Remove all humans/people present in the original photo. Seamlessly \
             replace the area they occupied with background textures like grass, soil, or \
             paving to match the surroundings."
                .to_string(),
        );
    } else {
        lines.push("NO humans/people should be added to the design.".to_string());
    }
    lines.push(String::new());

    lines.push("CRITICAL COMPONENTS TO ADD:".to_string());
    lines.extend(element_lines.iter().chain(bed_lines).cloned());
    lines.push(String::new());

    lines.push("ABSOLUTE NEGATIVE CONSTRAINTS:".to_string());
    lines.push("- NO logos, NO text, NO UI elements.".to_string());
    lines.push("- NO vehicles.".to_string());
    lines.push("- DO NOT change the sky or distant background.".to_string());
    lines.push("- ONLY modify the foreground and midground of the land plot.".to_string());
    lines.push(String::new());

    lines.push("STYLE:".to_string());
    lines.push("- High-quality 3D photorealistic rendering.".to_string());
    lines.push("- Professional permaculture architecture.".to_string());

    lines.join("\n")
}

/// The instruction string alone, for dry-run display.
pub fn compose_prompt(project: &ProjectState) -> String {
    compose(project)
        .parts
        .into_iter()
        .rev()
        .find_map(|part| match part {
            Part::Text(text) => Some(text),
            Part::Inline(_) => None,
        })
        .unwrap_or_default()
}
