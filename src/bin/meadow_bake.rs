//! Meadow Bake
//!
//! Generates the field headlessly and writes the raw GPU buffers plus a JSON
//! summary, so the geometry can be inspected or loaded without regenerating.
//!
//! Usage: `meadow_bake [config.json] [out_dir]`
//!
//! Output files (little-endian, tightly packed):
//! - `grass_vertices.bin`  interleaved `GrassVertex` (40 bytes each)
//! - `grass_indices.bin`   u32 triangle list
//! - `ground_vertices.bin` interleaved `GroundVertex` (32 bytes each)
//! - `ground_indices.bin`  u32 triangle list
//! - `summary.json`        counts, height ranges and the effective config

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use meadow_engine::{MeadowConfig, MeadowField, Result};

const DEFAULT_CONFIG_PATH: &str = "meadow.json";
const DEFAULT_OUT_DIR: &str = "meadow_bake";

fn write_buffer<T: bytemuck::Pod>(dir: &Path, name: &str, data: &[T]) -> Result<()> {
    let path = dir.join(name);
    let bytes: &[u8] = bytemuck::cast_slice(data);
    fs::write(&path, bytes)?;
    log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config_path = args
        .next()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_OUT_DIR.to_string()));

    let config = MeadowConfig::load_or_default(&config_path)?;
    let started = Instant::now();
    let field = MeadowField::generate(config);

    fs::create_dir_all(&out_dir)?;
    write_buffer(&out_dir, "grass_vertices.bin", &field.grass.vertices())?;
    write_buffer(&out_dir, "grass_indices.bin", &field.grass.indices)?;
    write_buffer(&out_dir, "ground_vertices.bin", &field.ground.vertices)?;
    write_buffer(&out_dir, "ground_indices.bin", &field.ground.indices)?;

    let summary = field.summary();
    let summary_path = out_dir.join("summary.json");
    fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;

    log::info!(
        "Baked {} blades into {} in {:.2}s",
        summary.blade_count,
        out_dir.display(),
        started.elapsed().as_secs_f32()
    );
    Ok(())
}
