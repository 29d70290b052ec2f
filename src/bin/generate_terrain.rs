//! Headless terrain driver: generates a height field, applies a brush stroke
//! under a simulated cursor, and reports statistics.
//!
//! Usage: cargo run --release --bin generate_terrain -- [OPTIONS]
//!
//! Options:
//!   --config <FILE>      JSON terrain config (defaults used for missing fields)
//!   --size <UNITS>       Terrain half-width (default: 256)
//!   --resolution <N>     Samples per axis (default: 512)
//!   --seed <SEED>        Noise seed (default: 42)
//!   --amplitude <A>      Height scale (default: 80)
//!   --frequency <F>      Noise frequency (default: 0.25)
//!   --noise <TYPE>       fractal | ridged (default: fractal)
//!   --kernel <INDEX>     Brush kernel 0-4 (default: 0, step)
//!   --strength <S>       Brush strength (default: 0.5)
//!   --radius <R>         Brush radius (default: 20)
//!   --cursor <X,Y>       Cursor position in NDC (default: 0,0)
//!   --print-config       Print the effective config as JSON and exit

use std::process::ExitCode;
use std::time::Instant;

use glam::{Mat4, Vec2, Vec3};

use terrasim::terrain::{Kernel, NoiseType, Terrain, TerrainConfig};

fn main() -> ExitCode {
    terrasim::core::logging::init();

    let args: Vec<String> = std::env::args().collect();
    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.iter().any(|a| a == "--print-config") {
        match config.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    println!("=== Terrasim Terrain Generator ===");
    println!("Size:       {} (spans [-{0}, {0}])", config.size);
    println!("Resolution: {} x {}", config.resolution, config.resolution);
    println!("Seed:       {}", config.seed);
    println!("Noise:      {} (amplitude {}, frequency {})",
        config.noise.noise_type.name(), config.noise.amplitude, config.noise.frequency);
    println!();

    let start = Instant::now();
    let mut terrain = match Terrain::new(&config) {
        Ok(terrain) => terrain,
        Err(e) => {
            log::error!("Failed to create terrain: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let field = terrain.field();
    println!("Generated in {:.1}ms", start.elapsed().as_secs_f64() * 1000.0);
    let bounds = field.bounds();
    println!("Height range: [{:.3}, {:.3}]", field.min_height(), field.max_height());
    println!("Bounds: center ({:.3}, {:.3}, {:.3}), extent ({:.3}, {:.3}, {:.3})",
        bounds.center().x, bounds.center().y, bounds.center().z,
        bounds.size().x, bounds.size().y, bounds.size().z);
    println!("Mesh: {} vertices, {} triangles ({} unrolled vertices)",
        terrain.mesh().vertex_count(),
        terrain.mesh().triangle_count(),
        terrain.mesh().triangle_count() * 3);
    println!();

    // Camera hovering above the terrain, looking at its center
    let eye = Vec3::new(0.0, field.max_height() + config.size, config.size * 1.5);
    let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
    let projection = Mat4::perspective_rh_gl(45.0_f32.to_radians(), 16.0 / 9.0, 0.1, config.size * 10.0);
    let cursor = parse_vec2_arg(&args, "--cursor").unwrap_or(Vec2::ZERO);

    let start = Instant::now();
    let Some(hit) = terrain.pick_screen(eye, cursor, projection, view) else {
        println!("Cursor ({}, {}) does not hit the terrain", cursor.x, cursor.y);
        return ExitCode::SUCCESS;
    };
    println!("Cursor ({}, {}) hit ({:.3}, {:.3}, {:.3}) after {} steps in {:.3}ms",
        cursor.x, cursor.y, hit.position.x, hit.position.y, hit.position.z,
        hit.steps, start.elapsed().as_secs_f64() * 1000.0);

    let brush = config.brush;
    let center = Vec2::new(hit.position.x, hit.position.z);
    let modified = terrain.sculpt(center, &brush);
    let field = terrain.field();
    println!("{} brush (strength {}, radius {}) changed {} cells",
        brush.kernel.name(), brush.strength, brush.radius, modified);
    println!("Height range: [{:.3}, {:.3}]", field.min_height(), field.max_height());
    println!("Surface at brush center: {:.3}", terrain.height_at_world(center.x, center.y));

    ExitCode::SUCCESS
}

/// Load `--config` if given, then apply per-field overrides
fn build_config(args: &[String]) -> terrasim::core::Result<TerrainConfig> {
    let mut config = match parse_str_arg(args, "--config") {
        Some(path) => TerrainConfig::load(path)?,
        None => TerrainConfig::default(),
    };

    if let Some(size) = parse_f32_arg(args, "--size") {
        config.size = size;
    }
    if let Some(resolution) = parse_usize_arg(args, "--resolution") {
        config.resolution = resolution;
    }
    if let Some(seed) = parse_u32_arg(args, "--seed") {
        config.seed = seed;
    }
    if let Some(amplitude) = parse_f32_arg(args, "--amplitude") {
        config.noise.amplitude = amplitude;
    }
    if let Some(frequency) = parse_f32_arg(args, "--frequency") {
        config.noise.frequency = frequency;
    }
    if let Some(noise) = parse_str_arg(args, "--noise") {
        config.noise.noise_type = match noise.as_str() {
            "fractal" => NoiseType::Fractal,
            "ridged" => NoiseType::Ridged,
            other => {
                return Err(terrasim::core::Error::Config(format!("unknown noise type '{}'", other)));
            }
        };
    }
    if let Some(index) = parse_usize_arg(args, "--kernel") {
        config.brush.kernel = Kernel::from_index(index).ok_or_else(|| {
            terrasim::core::Error::Config(format!("kernel index {} out of range 0-4", index))
        })?;
    }
    if let Some(strength) = parse_f32_arg(args, "--strength") {
        config.brush.strength = strength;
    }
    if let Some(radius) = parse_f32_arg(args, "--radius") {
        config.brush.radius = radius;
    }

    config.validate()?;
    Ok(config)
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn parse_vec2_arg(args: &[String], flag: &str) -> Option<Vec2> {
    let value = parse_str_arg(args, flag)?;
    let (x, y) = value.split_once(',')?;
    Some(Vec2::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}
