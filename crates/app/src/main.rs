//! Command-line OBJ inspector: loads a model and logs its geometry.

use anyhow::{Context, Result};
use asset::obj;

fn parse_path_arg() -> Option<String> {
    // First argument that is not a --flag.
    std::env::args()
        .skip(1)
        .find(|arg| !arg.starts_with("--"))
}

fn parse_centroid_arg() -> bool {
    // --centroid[=on|off], off by default
    for arg in std::env::args() {
        if arg == "--centroid" {
            return true;
        }
        if let Some(val) = arg.strip_prefix("--centroid=") {
            return matches!(
                val.to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            );
        }
    }
    false
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = parse_path_arg().context("usage: app <model.obj> [--centroid]")?;
    let show_centroid = parse_centroid_arg();

    let mut model = obj::load_obj_from_path(&path)
        .with_context(|| format!("failed to load '{path}'"))?;

    log::info!(
        "Loaded '{}': {} positions, {} normals, {} texture coordinates, {} triangles",
        model.name().unwrap_or("<unnamed>"),
        model.positions().len(),
        model.normals().len(),
        model.tex_coords().len(),
        model.triangle_count()
    );
    log::info!(
        "Combined vertex buffer: {} floats (5 per vertex)",
        model.combined_buffer().len()
    );

    if show_centroid {
        let centroid = model.compute_centroid()?;
        log::info!(
            "Centroid: ({:.3}, {:.3}, {:.3})",
            centroid.x,
            centroid.y,
            centroid.z
        );
    }

    Ok(())
}
