use std::env;
use std::time::Instant;
use wave_mesh::{Mesh, MeshConfig};

#[derive(Clone, Debug)]
struct BenchConfig {
    levels: u32,
    threshold: f64,
    smooth: u32,
    warmup: u64,
    iters: u64,
    seed: u64,
    json: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            levels: 4,
            threshold: 0.1,
            smooth: 350,
            warmup: 3,
            iters: 100,
            seed: 0xA5A5_5EED_2D17_0001,
            json: false,
        }
    }
}

fn parse_args() -> BenchConfig {
    let mut cfg = BenchConfig::default();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--levels" => {
                if let Some(v) = args.next() {
                    cfg.levels = v.parse().expect("--levels expects u32");
                }
            }
            "--threshold" => {
                if let Some(v) = args.next() {
                    cfg.threshold = v.parse().expect("--threshold expects f64");
                }
            }
            "--smooth" => {
                if let Some(v) = args.next() {
                    cfg.smooth = v.parse().expect("--smooth expects u32");
                }
            }
            "--warmup" => {
                if let Some(v) = args.next() {
                    cfg.warmup = v.parse().expect("--warmup expects u64");
                }
            }
            "--iters" => {
                if let Some(v) = args.next() {
                    cfg.iters = v.parse().expect("--iters expects u64");
                }
            }
            "--seed" => {
                if let Some(v) = args.next() {
                    cfg.seed = if let Some(hex) = v.strip_prefix("0x") {
                        u64::from_str_radix(hex, 16).expect("--seed hex parse failed")
                    } else {
                        v.parse().expect("--seed expects u64")
                    };
                }
            }
            "--json" => cfg.json = true,
            other => panic!(
                "unknown argument: {other}\nusage: bench_refine [--levels N] [--threshold T] [--smooth N] [--warmup N] [--iters N] [--seed S] [--json]"
            ),
        }
    }
    cfg
}

fn main() {
    let cfg = parse_args();
    let config = MeshConfig::default()
        .levels(cfg.levels)
        .threshold(cfg.threshold)
        .smooth_iterations(cfg.smooth)
        .seed(cfg.seed);
    let mut mesh = Mesh::generate(config).expect("mesh generation failed");

    for _ in 0..cfg.warmup {
        mesh.refine();
    }

    let start = Instant::now();
    let mut summary = mesh.refine();
    for _ in 1..cfg.iters {
        summary = mesh.refine();
    }
    let total_ms = start.elapsed().as_secs_f64() * 1000.0;
    let avg_ms = total_ms / cfg.iters as f64;

    if cfg.json {
        println!(
            "{{\"levels\":{},\"threshold\":{},\"iters\":{},\"total_ms\":{:.3},\"avg_ms\":{:.6},\"kept\":{},\"ratio\":{:.6}}}",
            cfg.levels,
            cfg.threshold,
            cfg.iters,
            total_ms,
            avg_ms,
            summary.kept,
            summary.ratio()
        );
    } else {
        println!(
            "refine x{}: {total_ms:.3} ms total, {avg_ms:.6} ms/iter | kept {} of {} (ratio {:.4})",
            cfg.iters,
            summary.kept,
            summary.total,
            summary.ratio()
        );
    }
}
