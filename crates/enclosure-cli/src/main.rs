//! Enclosure generator entry point

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use enclosure_cad::{CadKernel, Solid, default_kernel};
use enclosure_core::{EnclosureFile, PartKind, build};

/// Build the parts of a parametric enclosure from a RON document
#[derive(Debug, Parser)]
#[command(name = "enclosure", version, about)]
struct Args {
    /// Enclosure document (`(variant: ..., config: (...))`)
    file: PathBuf,
}

fn summarize(kernel: &dyn CadKernel, kind: PartKind, solid: &Solid) -> Result<(), String> {
    let bounds = kernel.bounding_box(solid).map_err(|e| e.to_string())?;
    let volume = kernel.volume(solid).map_err(|e| e.to_string())?;
    let faces = kernel.faces(solid).map_err(|e| e.to_string())?.len();
    let size = bounds.size();
    tracing::info!(
        "{kind}: {:.2} x {:.2} x {:.2} mm at {}, volume {volume:.1} mm3, {faces} faces",
        size.x,
        size.y,
        size.z,
        bounds.min,
    );
    Ok(())
}

fn run(args: &Args) -> Result<(), String> {
    let file = EnclosureFile::load(&args.file).map_err(|e| e.to_string())?;
    tracing::info!("Loaded {:?} from {}", file.variant, args.file.display());

    let enclosure = build(file.variant, file.config).map_err(|e| e.to_string())?;
    let kernel = default_kernel();
    tracing::info!(
        "Building {} ({} kernel), height {:.2} mm",
        enclosure.name(),
        kernel.name(),
        enclosure.parametric_box().height()
    );

    let parts = enclosure.parts(kernel.as_ref()).map_err(|e| e.to_string())?;
    for (kind, solid) in &parts {
        summarize(kernel.as_ref(), *kind, solid)?;
    }
    tracing::info!("{} parts built", parts.len());
    Ok(())
}

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "enclosure_core=info,enclosure_cad=warn,enclosure=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
