use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};

use vista_engine::coords::ColorRgba;
use vista_engine::core::{App, AppControl, FrameCtx};
use vista_engine::device::{Gpu, GpuInit};
use vista_engine::logging::{init_logging, LoggingConfig};
use vista_engine::render::shader::load_wgsl_or_builtin;
use vista_engine::render::{build_shape, Drawable, MeshBuffer, ShapeKind, ShapeRenderer};
use vista_engine::window::{Runtime, RuntimeConfig};

/// Unit square centered on the origin, in world units.
const SQUARE: [[f32; 2]; 4] = [[-0.5, -0.5], [0.5, -0.5], [0.5, 0.5], [-0.5, 0.5]];

fn main() {
    init_logging(LoggingConfig::default());

    if let Err(e) = run() {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // usage: vista-demo [shader.wgsl] [outline|filled|strip]
    let mut args = std::env::args().skip(1);
    let shader_path = args.next().map(PathBuf::from);
    let kind = match args.next() {
        Some(name) => name.parse::<ShapeKind>().map_err(anyhow::Error::msg)?,
        None => ShapeKind::default(),
    };

    let source = load_wgsl_or_builtin(shader_path.as_deref());
    log::info!("drawing {kind:?} shape");

    let app = ShapeViewer {
        kind,
        renderer: ShapeRenderer::new(source),
        shape: None,
    };

    Runtime::run(RuntimeConfig::default(), GpuInit::default(), app)
}

struct ShapeViewer {
    kind: ShapeKind,
    renderer: ShapeRenderer,
    shape: Option<Box<dyn Drawable>>,
}

impl App for ShapeViewer {
    fn on_gpu_ready(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        let mesh = MeshBuffer::from_points(gpu.device(), &SQUARE).context("failed to upload shape vertices")?;
        self.shape = Some(build_shape(self.kind, gpu.device(), Rc::new(mesh)));
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(shape) = self.shape.as_deref() else {
            return AppControl::Continue;
        };
        let renderer = &mut self.renderer;

        ctx.render(ColorRgba::white(), |rctx, target| {
            renderer.render(rctx, target, shape);
        })
    }
}
