use std::io;
use std::process;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use wave_mesh::mesh::render::{render_kept, render_zones};
use wave_mesh::mesh::MAX_LEVELS;
use wave_mesh::{Field, Mesh, MeshConfig};

#[derive(Parser)]
#[command(name = "wave-mesh")]
#[command(about = "Adaptively compress a smoothed scalar field on a dyadic grid", long_about = None)]
struct Args {
    /// Refinement level count L; the grid holds (2^L + 1)^2 samples
    #[arg(long, default_value_t = 4)]
    levels: u32,

    /// Error threshold for the marching-cross and diagonal tests
    #[arg(long, default_value_t = 0.1)]
    threshold: f64,

    /// Smoothing iterations applied to the generated field
    #[arg(long, default_value_t = 350)]
    smooth: u32,

    /// RNG seed for field generation
    #[arg(long, default_value_t = 0x5EED_2D17_ACE5_0001)]
    seed: u64,

    /// Place a unit impulse at the origin instead of random samples
    #[arg(long)]
    impulse: bool,

    /// Compact node storage and rebuild adjacency after refinement
    #[arg(long)]
    compact: bool,

    /// Print per-level zone occupancy tables
    #[arg(long)]
    zones: bool,

    /// Skip the ASCII rendering of the surviving grid
    #[arg(long)]
    no_render: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    if args.levels == 0 || args.levels > MAX_LEVELS {
        eprintln!("Error: levels must be between 1 and {MAX_LEVELS}");
        process::exit(1);
    }
    let config = MeshConfig::default()
        .levels(args.levels)
        .threshold(args.threshold)
        .smooth_iterations(args.smooth)
        .seed(args.seed);

    let started = Instant::now();
    let built = if args.impulse {
        let mut field = Field::impulse(args.levels, 0, 0, 1.0);
        field.smooth(args.smooth);
        Mesh::from_field(field, config)
    } else {
        Mesh::generate(config)
    };
    let mut mesh = match built {
        Ok(mesh) => mesh,
        Err(e) => {
            eprintln!("Error building mesh: {e}");
            process::exit(1);
        }
    };

    let summary = mesh.refine();
    mesh.relink();
    if args.compact {
        mesh.compact();
        mesh.relink();
    }
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    if !args.no_render {
        print!("{}", render_kept(&mesh));
    }
    if args.zones {
        for level in 0..args.levels as usize {
            println!("level {level}:");
            print!("{}", render_zones(&mesh, level));
        }
    }
    println!(
        "kept {} of {} nodes (ratio {:.4}), threshold {}",
        summary.kept,
        summary.total,
        summary.ratio(),
        mesh.threshold()
    );
    if args.compact {
        println!("compacted storage holds {} nodes", mesh.node_count());
    }
    println!("Time elapsed: {elapsed_ms:.3} ms");
}
