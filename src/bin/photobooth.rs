use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use photobooth::{
    Adjustments, BoothConfig, CaptureOutcome, ComposeOptions, Compositor, DirectorySink,
    DirectorySource, EditorSettings, FilterSpec, ImageInput, OutputFormat, PatternSource, Preset,
    Rgba8, SequencerEvent, SessionController, StillFrame, TemplateId, VideoSource,
};

#[derive(Parser, Debug)]
#[command(name = "photobooth", version)]
struct Cli {
    /// Booth configuration (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the template catalog.
    Templates,
    /// Composite image files into a template.
    Compose(ComposeArgs),
    /// Run a full automated booth session and export the result.
    Session(SessionArgs),
    /// Apply a preset and adjustments to a finished composite.
    Edit(EditArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Template id (see `photobooth templates`).
    #[arg(long)]
    template: u16,

    /// Input images in slot order.
    #[arg(long = "image", required = true)]
    images: Vec<PathBuf>,

    /// Output file; `.png` writes PNG, anything else JPEG.
    #[arg(long)]
    out: PathBuf,

    /// Editor preset applied to the finished composite.
    #[arg(long)]
    preset: Option<String>,

    /// Filter override as JSON, e.g. '{"saturation": 0}'.
    #[arg(long)]
    filter: Option<String>,

    /// Background color (`#rrggbb`) for templates that allow it.
    #[arg(long)]
    background: Option<String>,

    /// Seed for pseudo-random decoration.
    #[arg(long)]
    seed: Option<u64>,

    /// Date stamp, `YYYY-MM-DD`; today when omitted.
    #[arg(long)]
    date: Option<String>,
}

#[derive(Parser, Debug)]
struct SessionArgs {
    #[arg(long)]
    template: u16,

    /// Replay frames from this directory instead of the built-in test pattern.
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Countdown seconds before each shot (overrides the config).
    #[arg(long)]
    timer: Option<u32>,

    /// Where to write the result (overrides the config).
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct EditArgs {
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long)]
    out: PathBuf,

    #[arg(long)]
    preset: Option<String>,

    /// Slider value as `name=value`, e.g. `exposure=20`. Repeatable.
    #[arg(long = "adjust")]
    adjust: Vec<String>,

    /// Vignette strength, 0..=100.
    #[arg(long)]
    vignette: Option<f32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = BoothConfig::load(cli.config.as_deref())?;
    photobooth::logging::init_tracing(&config.log.level)?;

    let base = cli
        .config
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    match cli.cmd {
        Command::Templates => cmd_templates(),
        Command::Compose(args) => cmd_compose(args, &config, &base),
        Command::Session(args) => cmd_session(args, &config, &base).await,
        Command::Edit(args) => cmd_edit(args, &config),
    }
}

fn cmd_templates() -> anyhow::Result<()> {
    for t in photobooth::list_templates() {
        println!(
            "{:>2}  {:<18} {:<9} {} photo(s)  {}x{}  {}",
            t.id.0, t.name, t.tag, t.required_photos, t.width, t.height, t.description
        );
    }
    Ok(())
}

fn format_for(path: &Path) -> OutputFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("png") => OutputFormat::Png,
        _ => OutputFormat::Jpeg,
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_compose(args: ComposeArgs, config: &BoothConfig, base: &Path) -> anyhow::Result<()> {
    let template = photobooth::get_template(TemplateId(args.template))?;
    let compositor = Compositor::new(config.font_book(base)?);

    let images: Vec<ImageInput> = args
        .images
        .iter()
        .map(|p| {
            std::fs::read(p)
                .map(ImageInput::encoded)
                .with_context(|| format!("read image '{}'", p.display()))
        })
        .collect::<anyhow::Result<_>>()?;

    let mut encode = config.encode_settings();
    encode.format = format_for(&args.out);

    let mut options = ComposeOptions {
        encode,
        seed: args.seed.or(config.render.decoration_seed).unwrap_or(0),
        ..ComposeOptions::default()
    };
    if let Some(hex) = &args.background {
        options.background = Some(Rgba8::parse(hex)?);
    }
    if let Some(json) = &args.filter {
        let spec: FilterSpec = serde_json::from_str(json).context("parse --filter JSON")?;
        spec.validate()?;
        options.filter = Some(spec);
    }
    if let Some(date) = &args.date {
        options.date = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("parse --date '{date}'"))?;
    }

    let mut result = compositor.composite(template, &images, &options)?;
    if let Some(name) = &args.preset {
        let settings = EditorSettings {
            preset: Preset::parse(name)?,
            ..EditorSettings::default()
        };
        result = photobooth::edit_result(&result, &settings, encode)?;
    }
    write_output(&args.out, &result.bytes)
}

async fn cmd_session(args: SessionArgs, config: &BoothConfig, base: &Path) -> anyhow::Result<()> {
    let template = photobooth::get_template(TemplateId(args.template))?;
    let source: Arc<dyn VideoSource> = match &args.frames_dir {
        Some(dir) => Arc::new(DirectorySource::open(dir)?),
        None => Arc::new(PatternSource::new(template.width, template.height)),
    };

    let mut settings = config.session_settings()?;
    if let Some(timer) = args.timer {
        settings.timer_seconds = timer;
    }
    let compositor = Arc::new(Compositor::new(config.font_book(base)?));
    let (booth, mut events) = SessionController::new(source, compositor, settings);

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                SequencerEvent::CountdownTick { remaining } => eprintln!("  {remaining}..."),
                SequencerEvent::Flash => eprintln!("  *flash*"),
                SequencerEvent::FrameCaptured { index, remaining } => {
                    eprintln!("  captured photo {} ({remaining} to go)", index + 1)
                }
                SequencerEvent::CaptureFailed { message } => eprintln!("  capture failed: {message}"),
                SequencerEvent::Closed => break,
                _ => {}
            }
        }
    });

    let required = booth.select_template(template.id)?;
    eprintln!("{}: {required} photo(s)", template.name);
    booth.open().await?;

    let mut failures = 0;
    loop {
        match booth.capture().await {
            Ok(CaptureOutcome::Completed { .. }) => break,
            Ok(CaptureOutcome::Captured { .. }) => {}
            Ok(other) => anyhow::bail!("capture session ended unexpectedly: {other:?}"),
            Err(e) if e.is_recoverable() && failures < 3 => {
                failures += 1;
                tracing::warn!(error = %e, failures, "retrying capture");
            }
            Err(e) => {
                booth.close().await?;
                return Err(e.into());
            }
        }
    }
    printer.await.context("event printer task")?;

    let out_dir = args
        .out_dir
        .unwrap_or_else(|| config.output.out_dir.clone());
    let sink = DirectorySink::new(out_dir);
    let name = booth.export(&sink)?;
    eprintln!("wrote {}", sink.path_for(&name).display());
    Ok(())
}

fn cmd_edit(args: EditArgs, config: &BoothConfig) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read '{}'", args.in_path.display()))?;
    let frame = StillFrame::decode(&bytes)?;

    let mut adjustments = Adjustments::default();
    for kv in &args.adjust {
        let (key, value) = kv
            .split_once('=')
            .with_context(|| format!("--adjust expects name=value, got '{kv}'"))?;
        let value: f32 = value
            .trim()
            .parse()
            .with_context(|| format!("--adjust value for '{key}'"))?;
        adjustments.set(key, value)?;
    }
    if let Some(v) = args.vignette {
        adjustments.set("vignette", v)?;
    }
    let settings = EditorSettings {
        preset: args.preset.as_deref().map(Preset::parse).transpose()?.unwrap_or_default(),
        adjustments,
    };

    let mut encode = config.encode_settings();
    encode.format = format_for(&args.out);
    let pixels = photobooth::compose::editor::edit_frame(&frame, &settings)?;
    let result = photobooth::render::encode::encode_premul(&pixels, frame.width(), frame.height(), encode)?;
    write_output(&args.out, &result.bytes)
}
