use std::{
    cell::RefCell,
    io::Read as _,
    path::{Path, PathBuf},
    rc::Rc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "slidebg", version)]
struct Cli {
    /// Log to stderr (`-v` debug, `-vv` trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the canonical form of a background record.
    Normalize(InArgs),
    /// Infer a canonical background from a flat background string.
    Infer(InferArgs),
    /// Print the string written to the page's native background field.
    Render(RenderArgs),
    /// Print fit/fill element geometry for a page and image size.
    Geometry(GeometryArgs),
    /// Sync a background onto an empty in-memory page and print the page.
    Sync(SyncArgs),
    /// Rasterize the flattened background to a PNG.
    Thumbnail(ThumbnailArgs),
}

#[derive(Parser, Debug)]
struct InArgs {
    /// Background JSON file, `-` for stdin.
    #[arg(long = "in", default_value = "-")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct InferArgs {
    /// Native background value, e.g. `#fff` or `linear-gradient(...)`.
    #[arg(long)]
    value: String,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InArgs,

    #[arg(long, default_value_t = 1920)]
    width: u32,

    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Print both layers as one SVG data URI instead.
    #[arg(long)]
    flatten: bool,
}

#[derive(Parser, Debug)]
struct GeometryArgs {
    /// Page size as `WxH`.
    #[arg(long, value_parser = parse_dims)]
    page: (u32, u32),

    /// Natural image size as `WxH`; omit for the unresolved fallback.
    #[arg(long, value_parser = parse_dims)]
    image: Option<(u32, u32)>,

    #[arg(long, default_value = "fill", value_parser = parse_sizing)]
    sizing: slidebg::Sizing,

    #[arg(long, default_value = "bottom-center", value_parser = parse_anchor)]
    position: slidebg::Anchor,
}

#[derive(Parser, Debug)]
struct SyncArgs {
    #[command(flatten)]
    input: InArgs,

    #[arg(long, default_value_t = 1920)]
    width: u32,

    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Directory relative media paths resolve against (defaults to the input's directory).
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Synchronizer options JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ThumbnailArgs {
    #[command(flatten)]
    input: InArgs,

    #[arg(long, default_value_t = 320)]
    width: u32,

    #[arg(long, default_value_t = 180)]
    height: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Directory relative media paths resolve against (defaults to the input's directory).
    #[arg(long)]
    assets: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Normalize(args) => cmd_normalize(args),
        Command::Infer(args) => cmd_infer(args),
        Command::Render(args) => cmd_render(args),
        Command::Geometry(args) => cmd_geometry(args),
        Command::Sync(args) => cmd_sync(args),
        Command::Thumbnail(args) => cmd_thumbnail(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_dims(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("width: {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("height: {e}"))?;
    if w == 0 || h == 0 {
        return Err("width and height must be > 0".to_string());
    }
    Ok((w, h))
}

fn parse_sizing(s: &str) -> Result<slidebg::Sizing, String> {
    slidebg::Sizing::parse(s).ok_or_else(|| format!("unknown sizing '{s}' (fit|fill)"))
}

fn parse_anchor(s: &str) -> Result<slidebg::Anchor, String> {
    slidebg::Anchor::parse(s).ok_or_else(|| format!("unknown position '{s}'"))
}

fn read_background(path: &Path) -> anyhow::Result<slidebg::SlideBackground> {
    let mut text = String::new();
    if path == Path::new("-") {
        std::io::stdin()
            .read_to_string(&mut text)
            .context("read background JSON from stdin")?;
    } else {
        text = std::fs::read_to_string(path)
            .with_context(|| format!("read background '{}'", path.display()))?;
    }
    let raw: serde_json::Value =
        serde_json::from_str(&text).with_context(|| "parse background JSON")?;
    Ok(slidebg::normalize(&raw))
}

fn assets_root(explicit: Option<PathBuf>, in_path: &Path) -> PathBuf {
    explicit.unwrap_or_else(|| match in_path.parent() {
        Some(p) if in_path != Path::new("-") && !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    })
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{text}");
    Ok(())
}

fn cmd_normalize(args: InArgs) -> anyhow::Result<()> {
    print_json(&read_background(&args.in_path)?)
}

fn cmd_infer(args: InferArgs) -> anyhow::Result<()> {
    print_json(&slidebg::infer_from_native(&args.value))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let bg = read_background(&args.input.in_path)?;
    let size = Some(slidebg::PageSize::new(
        f64::from(args.width),
        f64::from(args.height),
    ));
    let out = if args.flatten {
        slidebg::render_flattened(&bg, size).to_data_uri()
    } else {
        slidebg::render_color(&bg.color, size).to_native_background()
    };
    println!("{out}");
    Ok(())
}

fn cmd_geometry(args: GeometryArgs) -> anyhow::Result<()> {
    let page = slidebg::PageSize::new(f64::from(args.page.0), f64::from(args.page.1));
    let natural = args.image.map(|(w, h)| slidebg::NaturalSize::new(w, h));
    print_json(&slidebg::resolve_geometry(
        page,
        natural,
        args.sizing,
        args.position,
    ))
}

fn cmd_sync(args: SyncArgs) -> anyhow::Result<()> {
    let bg = read_background(&args.input.in_path)?;
    let opts = match &args.config {
        Some(path) => slidebg::SyncOpts::from_json_file(path)?,
        None => slidebg::SyncOpts::default(),
    };
    let root = assets_root(args.assets, &args.input.in_path);
    tracing::debug!(root = %root.display(), "resolving media");

    let pool = futures::executor::LocalPool::new();
    let sync = slidebg::BackgroundSynchronizer::new(
        slidebg::ImageSizeResolver::new(slidebg::LocalFetcher::new(root)),
        pool.spawner(),
    )
    .with_opts(opts)?;

    let page = Rc::new(RefCell::new(slidebg::InMemoryPage::with_size(
        f64::from(args.width),
        f64::from(args.height),
    )));
    futures::executor::block_on(sync.apply_settled(&page, &bg))?;
    print_json(&*page.borrow())
}

fn cmd_thumbnail(args: ThumbnailArgs) -> anyhow::Result<()> {
    let bg = read_background(&args.input.in_path)?;
    let root = assets_root(args.assets, &args.input.in_path);
    let img = slidebg::render_thumbnail(&bg, args.width, args.height, Some(&root))?;
    img.save(&args.out)
        .with_context(|| format!("write thumbnail '{}'", args.out.display()))?;
    Ok(())
}
