use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use mangalens::domain::{BoundingBox, Region, RegionStatus, Size};
use mangalens::render::draw_regions_on_image;
use mangalens::{HttpSubmitter, MangaLensConfig, Session};

const USAGE: &str = "usage: mangalens [--clear-cache] <image> [x,y,width,height]...";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut args = std::env::args().skip(1).peekable();
    let clear_cache = args.next_if(|arg| arg == "--clear-cache").is_some();
    let Some(image_path) = args.next() else {
        bail!(USAGE);
    };
    let regions = args
        .map(|arg| arg.parse::<Region>())
        .collect::<anyhow::Result<Vec<_>>>()?;

    let config = MangaLensConfig::load();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    runtime.block_on(run(PathBuf::from(image_path), regions, clear_cache, config))
}

/// Submit every region of one page, print the results and export an
/// annotated copy next to the page
///
/// With `clear_cache` the backend starts from a fresh translation context,
/// so earlier pages do not bleed into this one.
async fn run(
    image_path: PathBuf,
    regions: Vec<Region>,
    clear_cache: bool,
    config: MangaLensConfig,
) -> anyhow::Result<()> {
    let mut page = image::open(&image_path)
        .with_context(|| format!("opening {}", image_path.display()))?
        .to_rgba8();
    let natural = Size::new(page.width(), page.height());

    let mut session = Session::from_config(&config);
    session.set_images([backend_source(&image_path)?]);
    session.set_natural_size(0, natural);
    session.update_layout(
        0,
        BoundingBox::new(0.0, 0.0, natural.width as f32, natural.height as f32),
    );

    let submitter = HttpSubmitter::from_config(&config);
    log::info!(
        "Using backend {} ({})",
        submitter.base_url(),
        submitter.method().label()
    );
    if clear_cache {
        session
            .clear_translation_context(&submitter)
            .await
            .context("clearing translation context")?;
    }

    let mut in_flight = FuturesUnordered::new();
    for region in regions {
        match session.commit(0, region) {
            Some(submission) => in_flight.push(submission.send(&submitter)),
            None => log::warn!("Skipping region {region:?}"),
        }
    }
    while let Some(outcome) = in_flight.next().await {
        session.apply(outcome);
    }
    let pending = session.store().pending_count();
    if pending > 0 {
        log::warn!("{pending} regions never received a result");
    }

    for (index, stored) in session.regions(0).iter().enumerate() {
        let r = stored.region;
        match &stored.status {
            RegionStatus::Done => {
                println!("[{index}] {},{} {}x{}\n{}\n", r.x, r.y, r.width, r.height, stored.text)
            }
            RegionStatus::Failed(err) => eprintln!("[{index}] failed: {err}"),
            RegionStatus::Pending => {}
        }
    }

    draw_regions_on_image(
        &mut page,
        session.regions(0),
        config.overlay_color,
        config.overlay_shadow,
    );
    let output = annotated_path(&image_path);
    page.save(&output)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("Annotated page written to {}", output.display());
    Ok(())
}

/// The backend resolves pages by their upload path
fn backend_source(path: &Path) -> anyhow::Result<String> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("no usable file name in {}", path.display()))?;
    Ok(format!("/uploads/{name}"))
}

fn annotated_path(path: &Path) -> PathBuf {
    path.with_extension("annotated.png")
}
