//! Preview command - render an animation to PNG frames
//!
//! Builds a tray with one demo item and drives its show and destroy
//! animations through the real timer queue, dumping every published
//! frame as a numbered PNG. This exercises the whole pipeline without
//! a windowing toolkit: the host surface writes files instead of
//! painting.

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{anyhow, Context};
use clap::Args;
use image::{Rgba, RgbaImage};
use tracing::{info, warn};

use crate::config::Edge;
use crate::icon::{IconId, IconSurface};
use crate::item::StaticItem;
use crate::settings::Settings;
use crate::sources::PixbufIcon;
use crate::tray::{SurfaceFactory, Tray};

#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Directory to write the PNG frames into
    #[arg(short, long, default_value = "preview-frames")]
    pub out_dir: PathBuf,

    /// Icon size in pixels (defaults to the saved settings)
    #[arg(long)]
    pub size: Option<u32>,

    /// Edge to dock against: none, top, bottom, left, right
    #[arg(long)]
    pub edge: Option<String>,

    /// Disable animation effects (single-hop rendering)
    #[arg(long)]
    pub no_effects: bool,

    /// Render an arrow overlay on the demo icon
    #[arg(long)]
    pub arrow: bool,

    /// Render an emblem badge on the demo icon
    #[arg(long)]
    pub emblem: bool,
}

/// Host surface that writes every published frame to disk.
struct FrameDumpSurface {
    dir: PathBuf,
    label: String,
    frame: u32,
}

impl FrameDumpSurface {
    fn new(dir: PathBuf, id: IconId) -> Self {
        Self {
            dir,
            label: format!("icon{}", id.raw()),
            frame: 0,
        }
    }
}

impl IconSurface for FrameDumpSurface {
    fn set_image(&mut self, image: &RgbaImage) {
        self.frame += 1;
        let path = self.dir.join(format!("{}_{:04}.png", self.label, self.frame));
        if let Err(err) = image.save(&path) {
            warn!(path = %path.display(), "failed to write frame: {err}");
        }
    }

    fn show(&mut self) {
        info!(icon = %self.label, "icon shown");
    }

    fn hide(&mut self) {
        info!(icon = %self.label, frames = self.frame, "icon hidden");
    }

    fn destroy(&mut self) {
        info!(icon = %self.label, frames = self.frame, "icon destroyed");
    }
}

pub async fn run(args: PreviewArgs) -> anyhow::Result<()> {
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating output dir {}", args.out_dir.display()))?;

    let mut settings = Settings::load();
    if let Some(size) = args.size {
        if size == 0 {
            return Err(anyhow!("invalid size: must be positive"));
        }
        settings.icon_size = size;
    }
    if let Some(edge) = args.edge.as_deref() {
        settings.edge = Edge::from_name(edge).ok_or_else(|| anyhow!("unknown edge: {edge}"))?;
    }
    if args.no_effects {
        settings.effects = false;
    }

    let (icon_config, tray_config) = settings.build_configs();
    let out_dir = args.out_dir.clone();
    let factory: SurfaceFactory =
        Box::new(move |id| Box::new(FrameDumpSurface::new(out_dir.clone(), id)));
    let mut tray = Tray::new(icon_config, tray_config, factory);

    let item = StaticItem::new("preview");
    item.add_source(Rc::new(PixbufIcon::new(demo_pixbuf(settings.icon_size))));
    if args.arrow {
        item.set_has_arrow(true);
    }
    if args.emblem {
        item.set_emblem(Some(demo_emblem(settings.icon_size)));
    }

    let id = tray.add_item(item);
    drive(&mut tray).await;
    info!("show animation finished");

    tray.remove_item(id);
    drive(&mut tray).await;
    info!(dir = %args.out_dir.display(), "preview frames written");

    Ok(())
}

/// Sleep until each pending timer comes due and fire it, until the
/// queue runs dry.
async fn drive(tray: &mut Tray) {
    while let Some(due) = tray.next_timer_due() {
        tokio::time::sleep_until(due.into()).await;
        tray.fire_next_timer();
    }
}

/// A procedural demo icon: a colored disc on a dark ring.
fn demo_pixbuf(size: u32) -> RgbaImage {
    let size = size.max(8);
    let mut img = RgbaImage::new(size, size);
    let center = (size as f32 - 1.0) / 2.0;
    let radius = size as f32 / 2.0 - 1.0;
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        let dist = (dx * dx + dy * dy).sqrt();
        *pixel = if dist <= radius * 0.55 {
            Rgba([64, 196, 255, 255])
        } else if dist <= radius {
            Rgba([60, 60, 70, 255])
        } else {
            Rgba([0, 0, 0, 0])
        };
    }
    img
}

/// A small warning-orange disc used as the demo emblem.
fn demo_emblem(size: u32) -> RgbaImage {
    let size = (size / 2).max(4);
    let mut img = RgbaImage::new(size, size);
    let center = (size as f32 - 1.0) / 2.0;
    let radius = size as f32 / 2.0 - 0.5;
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        *pixel = if (dx * dx + dy * dy).sqrt() <= radius {
            Rgba([255, 152, 0, 255])
        } else {
            Rgba([0, 0, 0, 0])
        };
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_pixbuf_dimensions() {
        let img = demo_pixbuf(32);
        assert_eq!((img.width(), img.height()), (32, 32));
        // Opaque at the center, transparent in the corner.
        assert_eq!(img.get_pixel(16, 16)[3], 255);
        assert_eq!(img.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_demo_pixbuf_clamps_tiny_sizes() {
        let img = demo_pixbuf(1);
        assert_eq!((img.width(), img.height()), (8, 8));
    }
}
