//! # gardenplot
//!
//! An AI garden-design previewer. You describe a land plot — a photo, its
//! dimensions, a catalog of structural elements (chicken coop, fish pond,
//! tool shed, …) and raised planting beds — and gardenplot composes a
//! reference-image-plus-instruction payload for the Gemini image model,
//! then stores the rendered design back into the project.
//!
//! # Architecture: Edit → Compose → Generate
//!
//! The tool is a thin pipeline over one JSON project file:
//!
//! ```text
//! 1. Edit      CLI subcommands  →  garden-project.json   (load → mutate → save)
//! 2. Compose   project snapshot →  GenerationRequest     (pure, deterministic)
//! 3. Generate  request          →  rendered image        (one HTTP call, no retries)
//! ```
//!
//! Composition is a pure function of the project state, so prompt logic is
//! unit-testable without touching the network, and two equal snapshots always
//! produce byte-identical requests.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`project`] | Data model: land, element catalog, raised beds, readiness predicate |
//! | [`store`] | Project file persistence — forgiving load, persist-on-every-edit |
//! | [`imaging`] | Photo compression: dimension clamping + JPEG re-encoding |
//! | [`compose`] | Snapshot → ordered content parts + instruction string + model choice |
//! | [`generate`] | Gemini `generateContent` client and outcome taxonomy |
//! | [`output`] | CLI status display formatting |
//!
//! # Design Decisions
//!
//! ## One Self-Contained Project File
//!
//! The whole project — photos included, base64-inlined — lives in a single
//! JSON file. A project can be copied, mailed, or versioned as one artifact,
//! and a parse failure simply means starting fresh: nothing in the file is
//! unrecoverable user work beyond form inputs.
//!
//! ## Selection Is Presence
//!
//! An element is selected iff its kind has an entry in the project's
//! `BTreeMap`. There is no parallel map of booleans to keep in sync, and
//! map iteration order doubles as the deterministic attachment order.
//!
//! ## One Request, No Retries
//!
//! Rendering is a single user-initiated attempt. Failures are classified
//! (credential vs. everything else) so the CLI can say *why*, but recovery
//! is always the user re-running the command.

pub mod compose;
pub mod generate;
pub mod imaging;
pub mod output;
pub mod project;
pub mod store;
