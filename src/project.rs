//! Project data model: the land plot, its element catalog, and raised beds.
//!
//! [`ProjectState`] is the single root entity. It is created with defaults,
//! hydrated from the project file by [`store`](crate::store), mutated
//! field-by-field by CLI actions, and re-persisted after every mutation.
//! The [`compose`](crate::compose) stage receives it as a read-only snapshot.
//!
//! ## Element catalog
//!
//! Seven named structural elements ([`ElementKind`]) share one config shape
//! ([`ElementDetail`]). Raised beds are a distinct type
//! ([`RaisedBedDetail`]) that carries an `ElementDetail` plus planting
//! attributes — explicit composition, no structural duck-typing.
//!
//! Selection is presence: an element is selected iff it has an entry in
//! `ProjectState::elements`. The map is a `BTreeMap` keyed by `ElementKind`
//! so iteration order (and therefore prompt and attachment order) is fixed.
//!
//! ## Derived values
//!
//! `area_m2` is always `length_m * width_m`, recomputed by the dimension
//! setters. Land capacity and occupied area are computed on demand, never
//! stored.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A named structural garden element with a footprint and placement.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    ChickenCoop,
    FishPond,
    ProcessingUnit,
    NurseryZone,
    ToolShed,
    Composter,
    MaggotHouse,
}

impl ElementKind {
    /// Canonical catalog order. Prompt lines and reference-image attachments
    /// follow this order, which makes composition deterministic.
    pub const ALL: [ElementKind; 7] = [
        ElementKind::ChickenCoop,
        ElementKind::FishPond,
        ElementKind::ProcessingUnit,
        ElementKind::NurseryZone,
        ElementKind::ToolShed,
        ElementKind::Composter,
        ElementKind::MaggotHouse,
    ];

    /// Display label used in prompts and CLI output.
    pub fn label(self) -> &'static str {
        match self {
            ElementKind::ChickenCoop => "Chicken Coop",
            ElementKind::FishPond => "Integrated Fish Pond",
            ElementKind::ProcessingUnit => "Organic Processing Unit",
            ElementKind::NurseryZone => "Nursery / Seedling Zone",
            ElementKind::ToolShed => "Tool Shed",
            ElementKind::Composter => "Composter",
            ElementKind::MaggotHouse => "Maggot House",
        }
    }

    /// Default configuration installed when the element is first selected.
    ///
    /// The chicken coop starts custom-sized (its styling is supplied by the
    /// composer's architectural reference); the fish pond keeps the large
    /// preset tag but overrides its dimensions; the composter uses the small
    /// preset. Everything else starts from the generic default.
    pub fn default_detail(self) -> ElementDetail {
        match self {
            ElementKind::ChickenCoop => ElementDetail {
                size_preset: SizePreset::Custom,
                ..ElementDetail::default()
            },
            ElementKind::FishPond => ElementDetail {
                size_preset: SizePreset::Large,
                length_m: 3.0,
                width_m: 1.5,
                area_m2: 4.5,
                ..ElementDetail::default()
            },
            ElementKind::Composter => ElementDetail::with_preset(SizePreset::Small),
            _ => ElementDetail::default(),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Footprint preset. The three fixed presets carry exact dimensions;
/// `Custom` means the user edits length and width directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SizePreset {
    /// 1 × 1 m
    Small,
    /// 2 × 1 m
    Medium,
    /// 3 × 1 m
    Large,
    Custom,
}

impl SizePreset {
    /// Fixed `(length, width)` in meters, or `None` for `Custom`.
    pub fn dimensions(self) -> Option<(f64, f64)> {
        match self {
            SizePreset::Small => Some((1.0, 1.0)),
            SizePreset::Medium => Some((2.0, 1.0)),
            SizePreset::Large => Some((3.0, 1.0)),
            SizePreset::Custom => None,
        }
    }
}

/// Placement grid: nine named relative positions plus `Automatic`.
///
/// Placement is encoded in the prompt as a qualitative position phrase with
/// the element's physical size in meters; there is no coordinate grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Automatic,
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    Center,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Placement {
    /// Qualitative phrase for non-automatic placements, as seen from the
    /// camera: "top" is the far edge of the plot, "bottom" the near edge.
    pub fn phrase(self) -> Option<&'static str> {
        match self {
            Placement::Automatic => None,
            Placement::TopLeft => Some("top-left"),
            Placement::TopCenter => Some("top-center"),
            Placement::TopRight => Some("top-right"),
            Placement::MiddleLeft => Some("middle-left"),
            Placement::Center => Some("center"),
            Placement::MiddleRight => Some("middle-right"),
            Placement::BottomLeft => Some("bottom-left"),
            Placement::BottomCenter => Some("bottom-center"),
            Placement::BottomRight => Some("bottom-right"),
        }
    }
}

/// Raised-bed construction material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Automatic,
    RedBrick,
    ConcreteBlock,
    Wood,
    Aluminum,
}

impl Material {
    pub fn label(self) -> &'static str {
        match self {
            Material::Automatic => "AI's choice",
            Material::RedBrick => "red brick",
            Material::ConcreteBlock => "concrete block",
            Material::Wood => "wood",
            Material::Aluminum => "aluminum",
        }
    }
}

/// Material/texture covering unoccupied land surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GroundBase {
    /// Keep the surface as it appears in the photo.
    AsIs,
    Grass,
    PavingBlock,
    Gravel,
    Soil,
    DryLeaves,
}

impl GroundBase {
    pub fn label(self) -> &'static str {
        match self {
            GroundBase::AsIs => "as in the original photo",
            GroundBase::Grass => "grass",
            GroundBase::PavingBlock => "paving block",
            GroundBase::Gravel => "gravel",
            GroundBase::Soil => "bare soil",
            GroundBase::DryLeaves => "dry leaves",
        }
    }
}

/// Generation tier: affects model choice and output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum QualityMode {
    /// Fast standard render.
    Fast,
    /// High-fidelity render; requires a billed API key.
    High,
}

/// Raw image bytes with their MIME type.
///
/// Stored inline in the project file as base64, so a project is a single
/// self-contained JSON blob that round-trips losslessly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    pub mime_type: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl ImageData {
    pub fn jpeg(data: Vec<u8>) -> Self {
        Self {
            mime_type: "image/jpeg".to_string(),
            data,
        }
    }

    pub fn png(data: Vec<u8>) -> Self {
        Self {
            mime_type: "image/png".to_string(),
            data,
        }
    }

    /// Base64 of the raw bytes, as the generation API wire format expects.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.data)
    }
}

/// Serialize `Vec<u8>` as a base64 string (and back).
mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded.as_bytes()).map_err(D::Error::custom)
    }
}

/// Configuration of one structural element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDetail {
    pub size_preset: SizePreset,
    pub length_m: f64,
    pub width_m: f64,
    /// Always `length_m * width_m`; recomputed by the setters.
    pub area_m2: f64,
    pub placement: Placement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_image: Option<ImageData>,
}

impl Default for ElementDetail {
    fn default() -> Self {
        Self::with_preset(SizePreset::Medium)
    }
}

impl ElementDetail {
    /// Detail initialized from a fixed preset (`Custom` falls back to Medium
    /// dimensions — a custom detail has to start somewhere).
    pub fn with_preset(preset: SizePreset) -> Self {
        let (l, w) = preset.dimensions().unwrap_or((2.0, 1.0));
        Self {
            size_preset: preset,
            length_m: l,
            width_m: w,
            area_m2: l * w,
            placement: Placement::Automatic,
            notes: None,
            ref_image: None,
        }
    }

    /// Switch preset. Fixed presets overwrite length, width, and area;
    /// switching to `Custom` keeps the current numeric values.
    pub fn apply_preset(&mut self, preset: SizePreset) {
        self.size_preset = preset;
        if let Some((l, w)) = preset.dimensions() {
            self.length_m = l;
            self.width_m = w;
            self.area_m2 = l * w;
        }
    }

    /// Set length in meters (clamped below at 0) and recompute the area.
    pub fn set_length(&mut self, meters: f64) {
        self.length_m = meters.max(0.0);
        self.area_m2 = self.length_m * self.width_m;
    }

    /// Set width in meters (clamped below at 0) and recompute the area.
    pub fn set_width(&mut self, meters: f64) {
        self.width_m = meters.max(0.0);
        self.area_m2 = self.length_m * self.width_m;
    }
}

/// A planting-bed element: a footprint plus what grows in it and how it is
/// built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaisedBedDetail {
    #[serde(flatten)]
    pub detail: ElementDetail,
    /// Free-text plant list ("cherry tomatoes, spinach, mint").
    #[serde(default)]
    pub plants: String,
    pub material: Material,
    pub has_trellis: bool,
}

impl Default for RaisedBedDetail {
    fn default() -> Self {
        Self {
            detail: ElementDetail::default(),
            plants: String::new(),
            material: Material::Automatic,
            has_trellis: false,
        }
    }
}

/// The whole project: everything the user has described about the plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectState {
    /// Compressed land photo; `None` until uploaded.
    pub land_photo: Option<ImageData>,
    pub land_length_m: f64,
    pub land_width_m: f64,
    pub ground_base: GroundBase,
    /// Instruct the model to remove and inpaint over any people in the photo.
    pub remove_people: bool,
    pub quality_mode: QualityMode,
    /// Selected structural elements. Presence in the map means selected.
    pub elements: BTreeMap<ElementKind, ElementDetail>,
    pub raised_beds: Vec<RaisedBedDetail>,
    /// Last successful render, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_image: Option<ImageData>,
}

impl Default for ProjectState {
    fn default() -> Self {
        Self {
            land_photo: None,
            land_length_m: 10.0,
            land_width_m: 6.0,
            ground_base: GroundBase::Grass,
            remove_people: true,
            quality_mode: QualityMode::Fast,
            elements: BTreeMap::new(),
            raised_beds: Vec::new(),
            final_image: None,
        }
    }
}

impl ProjectState {
    /// Total land capacity in m².
    pub fn land_area(&self) -> f64 {
        self.land_length_m * self.land_width_m
    }

    /// Sum of all selected element and raised-bed footprints in m².
    pub fn occupied_area(&self) -> f64 {
        let elements: f64 = self.elements.values().map(|d| d.area_m2).sum();
        let beds: f64 = self.raised_beds.iter().map(|b| b.detail.area_m2).sum();
        elements + beds
    }

    /// Select an element, installing its default config if not yet present.
    /// Reselecting keeps the existing config.
    pub fn select(&mut self, kind: ElementKind) -> &mut ElementDetail {
        self.elements.entry(kind).or_insert_with(|| kind.default_detail())
    }

    /// Deselect an element, dropping its config.
    pub fn deselect(&mut self, kind: ElementKind) -> bool {
        self.elements.remove(&kind).is_some()
    }

    /// Append a default raised bed and return its index.
    pub fn add_raised_bed(&mut self) -> usize {
        self.raised_beds.push(RaisedBedDetail::default());
        self.raised_beds.len() - 1
    }

    /// Remove the bed at `index`; `false` if out of range.
    pub fn remove_raised_bed(&mut self, index: usize) -> bool {
        if index < self.raised_beds.len() {
            self.raised_beds.remove(index);
            true
        } else {
            false
        }
    }

    /// Submission-readiness check. Not an error path: a failing requirement
    /// blocks the render subcommand but is reported, not thrown.
    pub fn readiness(&self) -> Readiness {
        Readiness {
            has_photo: self.land_photo.is_some(),
            has_dimensions: self.land_length_m > 0.0 && self.land_width_m > 0.0,
            has_elements: !self.elements.is_empty() || !self.raised_beds.is_empty(),
            fits: self.occupied_area() <= self.land_area(),
        }
    }
}

/// Result of the readiness predicate, one flag per requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness {
    /// A land photo has been uploaded.
    pub has_photo: bool,
    /// Both land dimensions are positive.
    pub has_dimensions: bool,
    /// At least one element or raised bed is selected.
    pub has_elements: bool,
    /// Total occupied area does not exceed land area (equality passes).
    pub fits: bool,
}

impl Readiness {
    pub fn is_ready(self) -> bool {
        self.has_photo && self.has_dimensions && self.has_elements && self.fits
    }

    /// Human-readable description of each unmet requirement.
    pub fn failures(self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if !self.has_photo {
            out.push("no land photo uploaded");
        }
        if !self.has_dimensions {
            out.push("land dimensions must both be positive");
        }
        if !self.has_elements {
            out.push("no elements or raised beds selected");
        }
        if !self.fits {
            out.push("selected elements exceed the land area");
        }
        out
    }
}
