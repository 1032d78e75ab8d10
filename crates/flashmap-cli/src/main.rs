use flashmap::render::raster::{RasterError, RasterOptions};
use flashmap::render::{FlashmapError, MindmapRenderer, UnicodeWidthTextMeasurer, sanitize_svg_id};
use flashmap::FlashmapConfig;
use serde::Serialize;
use serde_json::Value;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_TITLE: &str = "Mind Map";

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Flashmap(FlashmapError),
    Raster(RasterError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Flashmap(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<FlashmapError> for CliError {
    fn from(value: FlashmapError) -> Self {
        Self::Flashmap(value)
    }
}

impl From<flashmap::Error> for CliError {
    fn from(value: flashmap::Error) -> Self {
        Self::Flashmap(value.into())
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum Command {
    #[default]
    Parse,
    Layout,
    Render,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum TextMeasurerKind {
    #[default]
    Heuristic,
    Unicode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
    Jpeg,
    Pdf,
}

impl RenderFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Pdf => "pdf",
        }
    }
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "pdf" => Ok(Self::Pdf),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    verbose: bool,
    title: Option<String>,
    text_measurer: TextMeasurerKind,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    diagram_id: Option<String>,
    out: Option<String>,
    config: Option<String>,
    overrides: Vec<(String, Value)>,
}

fn usage() -> &'static str {
    "flashmap\n\
\n\
USAGE:\n\
  flashmap [parse] [--pretty] [--title <t>] [<path>|-]\n\
  flashmap layout [--pretty] [--title <t>] [--text-measurer heuristic|unicode] [<path>|-]\n\
  flashmap render [--format svg|png|jpg|pdf] [--scale <n>] [--background <css-color>] [--id <diagram-id>] [--out <path>] [--title <t>] [--text-measurer heuristic|unicode] [<path>|-]\n\
\n\
COMMON OPTIONS:\n\
  --config <file.json>         JSON config deep-merged over the defaults\n\
  --set <dotted.path>=<json>   override one config value (applied after --config)\n\
  --verbose                    debug logging on stderr\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - The root label falls back to --title, then the input file stem, then \"Mind Map\".\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG/JPG/PDF output defaults to writing next to the input file (or ./out.<ext> for stdin).\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_set(raw: &str) -> Result<(String, Value), CliError> {
    let Some((path, value)) = raw.split_once('=') else {
        return Err(CliError::Usage(usage()));
    };
    let path = path.trim();
    if path.is_empty() {
        return Err(CliError::Usage(usage()));
    }
    // Bare words are taken as strings so `--set svg.background=white` works unquoted.
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((path.to_string(), value))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        render_scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "parse" => args.command = Command::Parse,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--verbose" | "-v" => args.verbose = true,
            "--title" => args.title = Some(next_value(&mut it)?.clone()),
            "--text-measurer" => {
                args.text_measurer = match next_value(&mut it)?.as_str() {
                    "heuristic" => TextMeasurerKind::Heuristic,
                    "unicode" => TextMeasurerKind::Unicode,
                    _ => return Err(CliError::Usage(usage())),
                };
            }
            "--format" => {
                args.render_format = next_value(&mut it)?
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                args.render_scale = next_value(&mut it)?
                    .parse::<f32>()
                    .map_err(|_| CliError::Usage(usage()))?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let bg = next_value(&mut it)?;
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--id" => args.diagram_id = Some(next_value(&mut it)?.clone()),
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--set" => {
                let raw = next_value(&mut it)?;
                args.overrides.push(parse_set(raw)?);
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn load_config(args: &Args) -> Result<FlashmapConfig, CliError> {
    let mut config = FlashmapConfig::empty_object();
    if let Some(path) = args.config.as_deref() {
        let text = std::fs::read_to_string(path)?;
        let file = FlashmapConfig::from_json_str(&text)?;
        config.deep_merge(file.as_value());
    }
    for (path, value) in &args.overrides {
        config.set_value(path, value.clone());
    }
    Ok(config)
}

fn fallback_title(args: &Args) -> String {
    if let Some(title) = args.title.as_deref() {
        return title.to_string();
    }
    match args.input.as_deref() {
        Some(path) if path != "-" => Path::new(path)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        _ => DEFAULT_TITLE.to_string(),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn write_bytes(bytes: &[u8], out: &str) -> Result<(), CliError> {
    if out == "-" {
        std::io::stdout().lock().write_all(bytes)?;
    } else {
        std::fs::write(out, bytes)?;
    }
    Ok(())
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> PathBuf {
    match input {
        Some(path) if path != "-" => PathBuf::from(path).with_extension(ext),
        _ => PathBuf::from(format!("out.{ext}")),
    }
}

fn build_renderer(args: &Args) -> Result<MindmapRenderer, CliError> {
    let config = load_config(args)?;
    let mut renderer = MindmapRenderer::with_config(&config)?;
    if args.text_measurer == TextMeasurerKind::Unicode {
        renderer.layout = renderer
            .layout
            .with_text_measurer(Arc::new(UnicodeWidthTextMeasurer::default()));
    }
    if let Some(id) = args.diagram_id.as_deref() {
        renderer.svg.diagram_id = Some(sanitize_svg_id(id));
    }
    if let Some(bg) = args.background.as_deref() {
        renderer.svg.background = Some(bg.to_string());
    }
    Ok(renderer)
}

fn run(args: Args) -> Result<(), CliError> {
    let renderer = build_renderer(&args)?;
    let text = read_input(args.input.as_deref())?;
    let title = fallback_title(&args);
    tracing::debug!(command = ?args.command, input = ?args.input, title = %title, "flashmap");

    match args.command {
        Command::Parse => {
            let outline = renderer.parse(&text, &title);
            write_json(&outline, args.pretty)
        }
        Command::Layout => {
            let layout = renderer.layout(&text, &title)?;
            write_json(&layout, args.pretty)
        }
        Command::Render => {
            let raster = RasterOptions {
                scale: args.render_scale,
                background: args.background.clone(),
                ..Default::default()
            };
            let bytes = match args.render_format {
                RenderFormat::Svg => {
                    let svg = renderer.render_svg(&text, &title)?;
                    return write_text(&svg, args.out.as_deref());
                }
                RenderFormat::Png => renderer.render_png(&text, &title, &raster)?,
                RenderFormat::Jpeg => renderer.render_jpeg(&text, &title, &raster)?,
                RenderFormat::Pdf => renderer.render_pdf(&text, &title)?,
            };
            let out = args.out.clone().unwrap_or_else(|| {
                default_raster_out_path(args.input.as_deref(), args.render_format.extension())
                    .to_string_lossy()
                    .to_string()
            });
            write_bytes(&bytes, &out)
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    init_logging(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        std::iter::once("flashmap")
            .chain(items.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn defaults_to_parse_from_stdin() {
        let args = parse_args(&argv(&[])).unwrap();
        assert_eq!(args.command, Command::Parse);
        assert!(args.input.is_none());
        assert_eq!(args.render_scale, 1.0);
    }

    #[test]
    fn parses_render_flags() {
        let args = parse_args(&argv(&[
            "render", "--format", "JPEG", "--scale", "2", "--id", "map", "--out", "a.jpg", "in.md",
        ]))
        .unwrap();
        assert_eq!(args.command, Command::Render);
        assert_eq!(args.render_format, RenderFormat::Jpeg);
        assert_eq!(args.render_scale, 2.0);
        assert_eq!(args.diagram_id.as_deref(), Some("map"));
        assert_eq!(args.out.as_deref(), Some("a.jpg"));
        assert_eq!(args.input.as_deref(), Some("in.md"));
    }

    #[test]
    fn rejects_bad_usage() {
        let cases: [&[&str]; 7] = [
            &["--format", "gif"],
            &["--scale", "0"],
            &["--scale"],
            &["--text-measurer", "vendored"],
            &["--unknown"],
            &["a.md", "b.md"],
            &["--set", "no-equals-sign"],
        ];
        for bad in cases {
            assert!(
                matches!(parse_args(&argv(bad)), Err(CliError::Usage(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn set_values_accept_json_or_bare_strings() {
        assert_eq!(
            parse_set("layout.tierSpacing=300").unwrap(),
            ("layout.tierSpacing".to_string(), serde_json::json!(300))
        );
        assert_eq!(
            parse_set("svg.background=white").unwrap(),
            ("svg.background".to_string(), serde_json::json!("white"))
        );
    }

    #[test]
    fn fallback_title_prefers_flag_then_file_stem() {
        let mut args = parse_args(&argv(&["notes/roadmap.md"])).unwrap();
        assert_eq!(fallback_title(&args), "roadmap");
        args.title = Some("Plan".to_string());
        assert_eq!(fallback_title(&args), "Plan");
        assert_eq!(fallback_title(&Args::default()), DEFAULT_TITLE);
    }

    #[test]
    fn raster_out_path_follows_input() {
        assert_eq!(
            default_raster_out_path(Some("dir/map.md"), "png"),
            PathBuf::from("dir/map.png")
        );
        assert_eq!(default_raster_out_path(Some("-"), "pdf"), PathBuf::from("out.pdf"));
        assert_eq!(default_raster_out_path(None, "jpg"), PathBuf::from("out.jpg"));
    }
}
