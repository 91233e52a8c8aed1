use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use guide_pdf::{
    Guide, PageSize, RenderConfig, ResourceRegistry, load_manifest, render_guide,
    suggested_filename,
};

#[derive(Parser)]
#[command(version, about = "Lay out a generated user guide as a paginated PDF")]
struct Args {
    /// Guide JSON (`{title, content, url, timestamp, screenshots}`) or a markdown file
    input: PathBuf,

    /// JSON array of `{id, description, data}` screenshot entries
    #[arg(short, long)]
    resources: Option<PathBuf>,

    /// Override the document title
    #[arg(long)]
    title: Option<String>,

    /// Source URL shown under the title (markdown input only)
    #[arg(long, default_value = "")]
    url: String,

    /// RFC 3339 timestamp used for the file name and creation date (markdown input only)
    #[arg(long)]
    timestamp: Option<String>,

    #[arg(long, value_enum, default_value = "a4")]
    page_size: PageSize,

    /// Directory for the generated `User_Guide_<millis>.pdf`
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Exact output path; takes precedence over --output-dir
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write uncompressed content streams
    #[arg(long)]
    no_compress: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn load_guide(args: &Args) -> guide_pdf::Result<Guide> {
    let text = std::fs::read_to_string(&args.input).map_err(|e| {
        guide_pdf::Error::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", e, args.input.display()),
        ))
    })?;
    let is_json = args
        .input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        return Ok(serde_json::from_str(&text)?);
    }
    let mut guide = Guide::new(text, args.url.as_str());
    if let Some(ts) = &args.timestamp {
        guide.timestamp = ts.clone();
    }
    Ok(guide)
}

fn run(args: &Args) -> guide_pdf::Result<PathBuf> {
    let guide = load_guide(args)?;

    let mut shots = guide.screenshots.clone();
    if let Some(path) = &args.resources {
        shots.extend(load_manifest(path)?);
    }
    let registry = ResourceRegistry::from_screenshots(&shots);
    log::debug!("{} resources registered", registry.len());

    let config = RenderConfig {
        page_size: args.page_size,
        title: args.title.clone(),
        compress: !args.no_compress,
    };
    let output = render_guide(&guide, &registry, &config)?;
    for diag in &output.diagnostics {
        log::warn!("{diag}");
    }

    let path = match &args.output {
        Some(path) => path.clone(),
        None => {
            let millis = guide
                .timestamp_millis()
                .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
            args.output_dir.join(suggested_filename(millis))
        }
    };
    write_output(&path, &output.bytes)?;
    log::info!("{} pages", output.page_count);
    Ok(path)
}

fn write_output(path: &Path, bytes: &[u8]) -> guide_pdf::Result<()> {
    std::fs::write(path, bytes).map_err(|e| {
        guide_pdf::Error::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", e, path.display()),
        ))
    })
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(&args) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
