//! Effect previewer.
//!
//! Compiles a Kiln effect file, reports the resolved shader groups and any
//! diagnostics, and (unless `--headless`) opens a window that clears and
//! draws through the engine's immediate render context.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};

use kiln_engine::device::SystemInit;
use kiln_engine::logging::{init_logging, LoggingConfig};
use kiln_engine::math::LinearColor;
use kiln_engine::render::flat::{self, ColorVertex};
use kiln_engine::window::{App, AppControl, FrameCtx, Runtime, RuntimeConfig};
use kiln_fx::{compile_str, CompiledEffect, ShaderStage};

const USAGE: &str = "usage: kiln-preview [--headless] <effect.fx>";

const CLEAR_COLOR: LinearColor = LinearColor::new(0.07, 0.08, 0.10, 1.0);

const TRIANGLE: [ColorVertex; 3] = [
    ColorVertex { position: [0.0, 0.6, 0.0], color: [0.96, 0.62, 0.26, 1.0] },
    ColorVertex { position: [-0.55, -0.45, 0.0], color: [0.88, 0.29, 0.22, 1.0] },
    ColorVertex { position: [0.55, -0.45, 0.0], color: [0.99, 0.85, 0.45, 1.0] },
];

struct Options {
    path: PathBuf,
    headless: bool,
}

fn parse_args() -> Result<Option<Options>> {
    let mut path = None;
    let mut headless = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--headless" => headless = true,
            "--help" | "-h" => return Ok(None),
            other if other.starts_with('-') => bail!("unknown flag {other:?}\n{USAGE}"),
            _ if path.is_none() => path = Some(PathBuf::from(arg)),
            other => bail!("unexpected argument {other:?}\n{USAGE}"),
        }
    }

    match path {
        Some(path) => Ok(Some(Options { path, headless })),
        None => bail!("missing effect file\n{USAGE}"),
    }
}

fn report(compiled: &CompiledEffect) {
    for err in &compiled.errors {
        eprintln!("{err}");
    }

    println!("{} shader group(s)", compiled.effect.len());
    for group in compiled.effect.groups() {
        println!("  {}", group.name);
        for shader in group.shaders() {
            println!(
                "    {:<8} {} ({})",
                stage_label(shader.stage),
                shader.entry_point,
                shader.profile
            );
        }
    }
}

fn stage_label(stage: ShaderStage) -> &'static str {
    match stage {
        ShaderStage::Vertex => "vertex",
        ShaderStage::Pixel => "pixel",
        ShaderStage::Geometry => "geometry",
        ShaderStage::Domain => "domain",
        ShaderStage::Hull => "hull",
        ShaderStage::Compute => "compute",
    }
}

/// Placeholder scene: the compiled effect names HLSL entry points the wgpu
/// backend cannot execute directly, so the preview draws a flat triangle.
#[derive(Default)]
struct PreviewApp {
    pipeline: Option<wgpu::RenderPipeline>,
    vertices: Option<wgpu::Buffer>,
}

impl App for PreviewApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        let pipeline = self.pipeline.get_or_insert_with(|| {
            flat::create_flat_pipeline(ctx.render.device, ctx.render.surface_format)
        });
        let vertices = self
            .vertices
            .get_or_insert_with(|| flat::create_vertex_buffer(ctx.render.device, &TRIANGLE));

        ctx.render.clear(CLEAR_COLOR);
        ctx.render.draw(pipeline, vertices, 0..3);

        AppControl::Continue
    }
}

fn run() -> Result<ExitCode> {
    let Some(options) = parse_args()? else {
        println!("{USAGE}");
        return Ok(ExitCode::SUCCESS);
    };

    let src = std::fs::read_to_string(&options.path)
        .with_context(|| format!("failed to read {}", options.path.display()))?;

    let compiled = compile_str(&src);
    report(&compiled);

    if options.headless {
        return Ok(if compiled.errors.is_empty() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    log::info!("opening preview window");
    Runtime::run(
        RuntimeConfig {
            title: format!("kiln preview: {}", options.path.display()),
            width: 960.0,
            height: 540.0,
        },
        SystemInit::default(),
        PreviewApp::default(),
    )?;

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
