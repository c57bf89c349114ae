use clap::{Parser, Subcommand};
use gardenplot::generate::{Client, EnvKeySource, GenerateError, KeySource};
use gardenplot::project::{
    ElementDetail, ElementKind, GroundBase, ImageData, Material, Placement, ProjectState,
    QualityMode, SizePreset,
};
use gardenplot::store::{DEFAULT_PROJECT_FILE, ProjectStore};
use gardenplot::{compose, imaging, output};
use std::path::{Path, PathBuf};

/// Shared flags for commands that configure an element footprint.
#[derive(clap::Args, Clone)]
struct FootprintArgs {
    /// Size preset; fixed presets overwrite length and width
    #[arg(long)]
    preset: Option<SizePreset>,

    /// Length in meters (switches the preset to custom)
    #[arg(long)]
    length: Option<f64>,

    /// Width in meters (switches the preset to custom)
    #[arg(long)]
    width: Option<f64>,

    /// Placement on the nine-cell grid, or automatic
    #[arg(long)]
    position: Option<Placement>,

    /// Free-text styling notes for the model
    #[arg(long)]
    notes: Option<String>,

    /// Reference photo to guide the element's look (compressed on ingest)
    #[arg(long)]
    ref_image: Option<PathBuf>,
}

#[derive(Parser)]
#[command(name = "gardenplot")]
#[command(about = "AI garden-design previewer for land plot photos")]
#[command(long_about = "\
AI garden-design previewer for land plot photos

Describe your plot — photo, dimensions, structural elements, raised beds —
and gardenplot composes a prompt for the Gemini image model, then renders
a before/after design preview.

Typical session:

  gardenplot init
  gardenplot land --photo plot.jpg --length 10 --width 6 --ground grass
  gardenplot add chicken-coop
  gardenplot set chicken-coop --position top-left
  gardenplot bed add
  gardenplot bed set 1 --plants \"cherry tomatoes, mint\" --material wood --trellis true
  gardenplot status
  gardenplot render          # needs GEMINI_API_KEY
  gardenplot export

The whole project lives in one JSON file (default garden-project.json);
every subcommand persists its change immediately.")]
#[command(version)]
struct Cli {
    /// Project file
    #[arg(long, default_value = DEFAULT_PROJECT_FILE, global = true)]
    project: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a fresh project file with defaults
    Init {
        /// Overwrite an existing project file
        #[arg(long)]
        force: bool,
    },
    /// Describe the land: photo, dimensions, ground surface
    Land {
        /// Land photo (compressed to 1600px / JPEG on ingest)
        #[arg(long)]
        photo: Option<PathBuf>,
        /// Land length in meters
        #[arg(long)]
        length: Option<f64>,
        /// Land width in meters
        #[arg(long)]
        width: Option<f64>,
        /// Surface covering unoccupied land
        #[arg(long)]
        ground: Option<GroundBase>,
        /// Remove people from the photo during rendering
        #[arg(long)]
        remove_people: Option<bool>,
    },
    /// Select a structural element (installs its default config)
    Add { kind: ElementKind },
    /// Deselect a structural element
    Remove { kind: ElementKind },
    /// Configure a selected element
    Set {
        kind: ElementKind,
        #[command(flatten)]
        footprint: FootprintArgs,
    },
    /// Manage raised planting beds
    Bed {
        #[command(subcommand)]
        command: BedCommand,
    },
    /// Choose the generation engine tier
    Mode { mode: QualityMode },
    /// Show the project summary and readiness report
    Status,
    /// Print the composed instruction and attachments without rendering
    Prompt,
    /// Render the design via the generation API
    Render,
    /// Write the rendered design to an image file
    Export {
        /// Output file
        #[arg(long, default_value = "garden-render.png")]
        output: PathBuf,
    },
    /// Delete the project file
    Reset,
}

#[derive(Subcommand)]
enum BedCommand {
    /// Append a new raised bed
    Add,
    /// Remove bed N (1-based, as shown by status)
    Remove { index: usize },
    /// Configure bed N (1-based)
    Set {
        index: usize,
        #[command(flatten)]
        footprint: FootprintArgs,
        /// Free-text plant list
        #[arg(long)]
        plants: Option<String>,
        /// Construction material
        #[arg(long)]
        material: Option<Material>,
        /// Include a climbing trellis
        #[arg(long)]
        trellis: Option<bool>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    let store = ProjectStore::new(&cli.project);

    match cli.command {
        Command::Init { force } => {
            if store.exists() && !force {
                return Err(format!(
                    "{} already exists (use --force to overwrite)",
                    store.path().display()
                )
                .into());
            }
            store.save(&ProjectState::default())?;
            println!("Created {}", store.path().display());
        }
        Command::Land {
            photo,
            length,
            width,
            ground,
            remove_people,
        } => {
            let mut project = store.load();
            if let Some(path) = photo {
                project.land_photo = Some(ingest_photo(&path)?);
            }
            if let Some(meters) = length {
                project.land_length_m = meters.max(0.0);
            }
            if let Some(meters) = width {
                project.land_width_m = meters.max(0.0);
            }
            if let Some(base) = ground {
                project.ground_base = base;
            }
            if let Some(flag) = remove_people {
                project.remove_people = flag;
            }
            store.save(&project)?;
            println!(
                "Land: {}m x {}m ({:.2} m²)",
                project.land_length_m,
                project.land_width_m,
                project.land_area()
            );
        }
        Command::Add { kind } => {
            let mut project = store.load();
            project.select(kind);
            store.save(&project)?;
            println!("Selected {kind}");
        }
        Command::Remove { kind } => {
            let mut project = store.load();
            let removed = project.deselect(kind);
            store.save(&project)?;
            if removed {
                println!("Deselected {kind}");
            } else {
                println!("{kind} was not selected");
            }
        }
        Command::Set { kind, footprint } => {
            let mut project = store.load();
            {
                let Some(detail) = project.elements.get_mut(&kind) else {
                    return Err(
                        format!("{kind} is not selected (run `gardenplot add` first)").into(),
                    );
                };
                apply_footprint(detail, &footprint)?;
            }
            store.save(&project)?;
            println!("Updated {kind}");
        }
        Command::Bed { command } => run_bed(&store, command)?,
        Command::Mode { mode } => {
            let mut project = store.load();
            project.quality_mode = mode;
            store.save(&project)?;
            match mode {
                QualityMode::Fast => println!("Engine: fast"),
                QualityMode::High => {
                    println!("Engine: high");
                    if !EnvKeySource.has_key() {
                        println!(
                            "Note: the high tier needs a billed Gemini API key. \
                             Set GEMINI_API_KEY before rendering."
                        );
                    }
                }
            }
        }
        Command::Status => output::print_status(&store.load()),
        Command::Prompt => {
            let project = store.load();
            let request = compose::compose(&project);
            println!("Model: {}", request.model);
            for (index, part) in request.parts.iter().enumerate() {
                match part {
                    compose::Part::Inline(image) => println!(
                        "Attachment {}: {} ({} bytes)",
                        index + 1,
                        image.mime_type,
                        image.data.len()
                    ),
                    compose::Part::Text(_) => {}
                }
            }
            println!();
            println!("{}", compose::compose_prompt(&project));
        }
        Command::Render => run_render(&store)?,
        Command::Export { output } => {
            let project = store.load();
            let Some(image) = &project.final_image else {
                return Err("no rendered design yet (run `gardenplot render` first)".into());
            };
            std::fs::write(&output, &image.data)?;
            println!("Saved {}", output.display());
        }
        Command::Reset => {
            store.reset()?;
            println!("Removed {}", store.path().display());
        }
    }

    Ok(())
}

/// Read a photo from disk and compress it for storage/attachment.
fn ingest_photo(path: &Path) -> Result<ImageData, Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let compressed = imaging::compress_image(&bytes)
        .map_err(|e| format!("cannot process {}: {e}", path.display()))?;
    println!(
        "Compressed {} to {}x{} JPEG ({} bytes)",
        path.display(),
        compressed.width,
        compressed.height,
        compressed.image.data.len()
    );
    Ok(compressed.image)
}

/// Apply shared footprint flags to an element detail.
fn apply_footprint(
    detail: &mut ElementDetail,
    args: &FootprintArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(preset) = args.preset {
        detail.apply_preset(preset);
    }
    if let Some(meters) = args.length {
        detail.size_preset = SizePreset::Custom;
        detail.set_length(meters);
    }
    if let Some(meters) = args.width {
        detail.size_preset = SizePreset::Custom;
        detail.set_width(meters);
    }
    if let Some(position) = args.position {
        detail.placement = position;
    }
    if let Some(notes) = &args.notes {
        detail.notes = if notes.is_empty() {
            None
        } else {
            Some(notes.clone())
        };
    }
    if let Some(path) = &args.ref_image {
        detail.ref_image = Some(ingest_photo(path)?);
    }
    Ok(())
}

fn run_bed(store: &ProjectStore, command: BedCommand) -> Result<(), Box<dyn std::error::Error>> {
    let mut project = store.load();
    match command {
        BedCommand::Add => {
            let index = project.add_raised_bed();
            store.save(&project)?;
            println!("Added Raised Bed #{}", index + 1);
        }
        BedCommand::Remove { index } => {
            if index == 0 || !project.remove_raised_bed(index - 1) {
                return Err(format!("no raised bed #{index}").into());
            }
            store.save(&project)?;
            println!("Removed Raised Bed #{index}");
        }
        BedCommand::Set {
            index,
            footprint,
            plants,
            material,
            trellis,
        } => {
            let Some(bed) = index
                .checked_sub(1)
                .and_then(|i| project.raised_beds.get_mut(i))
            else {
                return Err(format!("no raised bed #{index}").into());
            };
            apply_footprint(&mut bed.detail, &footprint)?;
            if let Some(plants) = plants {
                bed.plants = plants;
            }
            if let Some(material) = material {
                bed.material = material;
            }
            if let Some(trellis) = trellis {
                bed.has_trellis = trellis;
            }
            store.save(&project)?;
            println!("Updated Raised Bed #{index}");
        }
    }
    Ok(())
}

fn run_render(store: &ProjectStore) -> Result<(), Box<dyn std::error::Error>> {
    let mut project = store.load();

    let readiness = project.readiness();
    if !readiness.is_ready() {
        let mut message = String::from("project is not ready to render:");
        for failure in readiness.failures() {
            message.push_str("\n  - ");
            message.push_str(failure);
        }
        return Err(message.into());
    }

    let keys = EnvKeySource;
    let request = compose::compose(&project);
    println!("Rendering with {}...", request.model);

    match Client::new().generate(&keys, &request) {
        Ok(image) => {
            project.final_image = Some(image);
            store.save(&project)?;
            println!("Render complete. Run `gardenplot export` to save the image.");
            Ok(())
        }
        Err(e @ (GenerateError::MissingKey | GenerateError::Credential(_))) => Err(format!(
            "{e}\nSet a valid GEMINI_API_KEY and try again. \
             The high tier requires a key with billing enabled."
        )
        .into()),
        Err(e) => Err(format!("{e}\nCheck your connection and re-run `gardenplot render`.").into()),
    }
}
