use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use homog2d::desc::{ChainDesc, load_chain_json};
use homog2d::{Mat3, Point};

#[derive(Parser)]
#[command(name = "homog2d")]
#[command(about = "Compose 2D homogeneous transforms and map points through them", long_about = None)]
#[command(version)]
struct Cli {
    /// Chain description (JSON). Without it the built-in demo chain runs.
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    chain: Option<PathBuf>,

    /// Write a before/after PNG of the chain's shape (unit square if none)
    #[cfg(feature = "im-io")]
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    plot: Option<PathBuf>,

    /// Plot size in pixels, as WIDTHxHEIGHT
    #[cfg(feature = "im-io")]
    #[arg(long, default_value = "512x512", value_parser = parse_size)]
    plot_size: (usize, usize),

    /// Report points whose homogeneous w is zero instead of printing NaN/inf
    #[arg(long)]
    checked: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[cfg(feature = "im-io")]
fn parse_size(s: &str) -> Result<(usize, usize), String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: usize = w.parse().map_err(|e| format!("bad width '{w}': {e}"))?;
    let h: usize = h.parse().map_err(|e| format!("bad height '{h}': {e}"))?;
    if w == 0 || h == 0 {
        return Err("plot size must be non-zero".to_string());
    }
    Ok((w, h))
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("warn")
    };
    env_logger::Builder::from_env(env).init();

    let desc = load_desc(cli.chain.as_deref())?;

    let combined = desc.composed();
    println!("Combined transform:\n{combined}");

    for &p in &desc.points {
        println!("Original Point: {p}");
        let transformed = map_point(&combined, p, cli.checked)?;
        println!("Transformed Point: {transformed}");
    }

    #[cfg(feature = "im-io")]
    {
        if let Some(path) = &cli.plot {
            write_plot(&desc, &combined, path, cli.plot_size)?;
        }
    }

    Ok(())
}

fn load_desc(chain: Option<&Path>) -> anyhow::Result<ChainDesc> {
    match chain {
        Some(path) => load_chain_json(path)
            .with_context(|| format!("failed to load chain {}", path.display())),
        None => Ok(ChainDesc::demo()),
    }
}

fn map_point(m: &Mat3, p: Point, checked: bool) -> anyhow::Result<Point> {
    if checked {
        Ok(m.try_transform_point(p)?)
    } else {
        Ok(m.transform_point(p))
    }
}

#[cfg(feature = "im-io")]
fn write_plot(
    desc: &ChainDesc,
    combined: &Mat3,
    path: &Path,
    (w, h): (usize, usize),
) -> anyhow::Result<()> {
    use homog2d::desc::ShapeDesc;
    use homog2d::plot::{PlotParams, plot_before_after};

    let shape = desc.shape.clone().unwrap_or_else(ShapeDesc::unit_square);
    let params = PlotParams::fit(&shape, &desc.points, combined, w, h);
    log::debug!("plot window {params:?}");

    plot_before_after(&shape, &desc.points, combined, &params)
        .save_png(path)
        .map_err(homog2d::Error::from)
        .with_context(|| format!("failed to write plot {}", path.display()))?;
    log::info!("wrote {}", path.display());
    Ok(())
}
