use anyhow::Context;
use clap::Parser;
use log::info;

mod cli;
mod logger;

use cli::{Args, Command};
use lumo_render::{compare, render, save_image, RenderOptions};
use lumo_scene::{generate_scene, load_scene, GeneratorConfig};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_logger(args.log_level.into());

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure the worker pool")?;
    }

    match args.command {
        Command::Render {
            scene,
            output,
            seed,
        } => {
            let scene = load_scene(&scene)
                .with_context(|| format!("failed to load scene '{}'", scene.display()))?;
            info!(
                "scene: {}x{}, {} primitives",
                scene.width,
                scene.height,
                scene.primitives.len()
            );

            let start = std::time::Instant::now();
            let buffer = render(&scene, &RenderOptions { seed });
            info!("rendered in {:.2?}", start.elapsed());

            save_image(&buffer, &output)
                .with_context(|| format!("failed to write image '{}'", output.display()))?;
        }
        Command::Compare { left, right } => {
            let a = image::open(&left)
                .with_context(|| format!("failed to open image '{}'", left.display()))?
                .to_rgb8();
            let b = image::open(&right)
                .with_context(|| format!("failed to open image '{}'", right.display()))?
                .to_rgb8();

            let report = compare(&a, &b)?;
            println!("Total error:\t\t{}", report.total_error);
            println!("Wrong pixels:\t\t{:.3}%", report.wrong_percent());
        }
        Command::Generate {
            output,
            count,
            extent,
            seed,
        } => {
            let config = GeneratorConfig {
                primitive_count: count,
                extent,
                seed,
            };
            let text = generate_scene(&config);
            std::fs::write(&output, text)
                .with_context(|| format!("failed to write scene '{}'", output.display()))?;
            info!("wrote fixture scene to {}", output.display());
        }
    }

    Ok(())
}
