//! Floor-plan Mesher CLI
//!
//! Export a home JSON file to an OBJ bundle.

use clap::{Parser, Subcommand, ValueEnum};
use floorplan_mesher::{DirectoryFetcher, ExportConfig, Exporter, Home, ModelArchive};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "floorplan-mesher")]
#[command(author, version, about = "Export house floor plans to textured OBJ meshes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a home to an OBJ bundle
    Export {
        /// Home JSON file
        #[arg(long)]
        home: PathBuf,

        /// Directory that model and texture references are resolved against
        #[arg(short, long)]
        resources: PathBuf,

        /// Output path (a .zip file, or a directory with --format dir)
        #[arg(short, long)]
        output: PathBuf,

        /// Name of the OBJ file and object (defaults to the output file stem)
        #[arg(short, long)]
        name: Option<String>,

        /// Write the metadata sidecar to this file
        #[arg(long)]
        metadata: Option<PathBuf>,

        /// Export configuration JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output layout
        #[arg(short, long, value_enum, default_value = "zip")]
        format: OutputFormat,
    },

    /// Show what a furniture model archive contains
    Inspect {
        /// Model archive (ZIP)
        #[arg(short, long)]
        model: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Single ZIP bundle
    Zip,
    /// Loose files in a directory
    Dir,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            home,
            resources,
            output,
            name,
            metadata,
            config,
            format,
        } => {
            export_home(&home, &resources, &output, name, metadata.as_deref(), config.as_deref(), format)?;
        }
        Commands::Inspect { model } => {
            inspect_model(&model)?;
        }
    }

    Ok(())
}

fn export_home(
    home_path: &Path,
    resources: &Path,
    output_path: &Path,
    name: Option<String>,
    metadata_path: Option<&Path>,
    config_path: Option<&Path>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config_path {
        Some(path) => ExportConfig::from_json(&fs::read_to_string(path)?)?,
        None => ExportConfig::default(),
    };

    tracing::info!(path = %home_path.display(), "Loading home");
    let home = Home::from_json(&fs::read_to_string(home_path)?)?;
    tracing::info!(
        walls = home.walls.len(),
        rooms = home.rooms.len(),
        furniture = home.furniture.len(),
        "Loaded home"
    );

    let name = name.unwrap_or_else(|| {
        output_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "home".to_string())
    });

    let exporter = Exporter::with_config(DirectoryFetcher::new(resources), config);
    let output = exporter.export(&home, &name)?;

    match format {
        OutputFormat::Zip => {
            let zip_path = if output_path.extension().is_some() {
                output_path.to_path_buf()
            } else {
                output_path.with_extension("zip")
            };
            let bytes = output.to_zip()?;
            fs::write(&zip_path, &bytes)?;
            println!("Exported {} ({} bytes) to {:?}", output.obj_file_name(), bytes.len(), zip_path);
        }
        OutputFormat::Dir => {
            output.write_to_dir(output_path)?;
            println!("Exported {} to {:?}", output.obj_file_name(), output_path);
        }
    }

    let stats = &output.stats;
    println!(
        "  {} walls, {} rooms, {} furniture models, {} furniture boxes",
        stats.walls, stats.rooms, stats.furniture_models, stats.furniture_boxes
    );
    println!(
        "  {} vertices, {} faces, {} materials, {} textures",
        stats.vertices, stats.faces, stats.materials, stats.textures
    );

    if let Some(path) = metadata_path {
        fs::write(path, output.metadata_json()?)?;
        println!("  Metadata: {:?}", path);
    }

    Ok(())
}

fn inspect_model(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let archive = ModelArchive::from_bytes(&fs::read(path)?)?;
    let model = floorplan_mesher::resource::parse_obj(&archive.mesh_text)?;
    let library = archive.materials();

    println!("Model archive {:?}", path);
    println!("  Mesh: {}", archive.mesh_name);
    println!("  Vertices: {}", model.positions.len());
    println!("  Triangles: {}", model.triangle_count());
    match &archive.material_library {
        Some((name, _)) => println!("  Material library: {} ({} materials)", name, library.len()),
        None => println!("  Material library: none"),
    }
    println!("  Materials used: {}", model.material_names().join(", "));
    println!("  Images: {}", archive.images.len());

    Ok(())
}
