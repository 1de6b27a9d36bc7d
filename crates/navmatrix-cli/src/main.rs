use navmatrix::render::raster::{RasterError, RasterOptions, svg_to_jpeg, svg_to_pdf, svg_to_png};
use navmatrix::render::{DisplayMode, ExportOptions, MatrixExporter, SvgRenderOptions};
use navmatrix::{JsonMatrixProvider, Layer, SvgConfig};
use serde::Serialize;
use std::io::Read;
use std::str::FromStr;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Core(navmatrix::Error),
    Render(navmatrix_render::Error),
    Raster(RasterError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Core(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
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

impl From<navmatrix::Error> for CliError {
    fn from(value: navmatrix::Error) -> Self {
        Self::Core(value)
    }
}

impl From<navmatrix_render::Error> for CliError {
    fn from(value: navmatrix_render::Error) -> Self {
        Self::Render(value)
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

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Export,
    Layout,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
    Jpeg,
    Pdf,
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

#[derive(Debug)]
struct Args {
    command: Command,
    input: Option<String>,
    matrix: Option<String>,
    config: Option<String>,
    domain: Option<String>,
    show_name: bool,
    show_id: bool,
    sort: Option<i64>,
    column_order: Vec<String>,
    pretty: bool,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    out: Option<String>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            command: Command::Export,
            input: None,
            matrix: None,
            config: None,
            domain: None,
            show_name: true,
            show_id: false,
            sort: None,
            column_order: Vec::new(),
            pretty: false,
            render_format: RenderFormat::Svg,
            render_scale: 1.0,
            background: None,
            out: None,
        }
    }
}

fn usage() -> &'static str {
    "navmatrix-cli\n\
\n\
USAGE:\n\
  navmatrix-cli [export] --matrix <catalog.json> [--config <cfg.json|cfg.json5|cfg.yaml>] [--domain <key>] [--show-name|--no-show-name] [--show-id] [--sort <0-3>] [--column-order <key,key,..>] [--format svg|png|jpg|pdf] [--scale <n>] [--background <css-color>] [--out <path>] [<layer.json>|-]\n\
  navmatrix-cli layout --matrix <catalog.json> [--config <cfg>] [--domain <key>] [--show-name|--no-show-name] [--show-id] [--sort <0-3>] [--column-order <key,..>] [--pretty] [<layer.json>|-]\n\
\n\
NOTES:\n\
  - If <layer.json> is omitted or '-', the layer is read from stdin.\n\
  - The domain defaults to the layer's `domain`, then `enterprise`.\n\
  - export prints SVG to stdout by default; use --out to write a file.\n\
  - PNG/JPG/PDF output defaults to writing next to the layer file (or ./out.<ext> for stdin).\n\
  - layout prints the drawable tree as JSON.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "export" => args.command = Command::Export,
            "layout" => args.command = Command::Layout,
            "--pretty" => args.pretty = true,
            "--show-name" => args.show_name = true,
            "--no-show-name" => args.show_name = false,
            "--show-id" => args.show_id = true,
            "--matrix" => args.matrix = Some(next_value(&mut it)?.clone()),
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--domain" => args.domain = Some(next_value(&mut it)?.clone()),
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
            "--sort" => {
                let raw = next_value(&mut it)?;
                let mode = raw.parse::<i64>().map_err(|_| CliError::Usage(usage()))?;
                if !(0..=3).contains(&mode) {
                    return Err(CliError::Usage(usage()));
                }
                args.sort = Some(mode);
            }
            "--column-order" => {
                args.column_order = next_value(&mut it)?
                    .split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            "--format" => {
                args.render_format = next_value(&mut it)?
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                let scale = next_value(&mut it)?;
                args.render_scale = scale.parse::<f32>().map_err(|_| CliError::Usage(usage()))?;
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

    if args.matrix.is_none() {
        return Err(CliError::Usage(usage()));
    }
    Ok(args)
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

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
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

fn write_bytes(
    bytes: &[u8],
    out: Option<&str>,
    input: Option<&str>,
    ext: &str,
) -> Result<(), CliError> {
    let out = out.map(str::to_string).unwrap_or_else(|| {
        default_raster_out_path(input, ext)
            .to_string_lossy()
            .to_string()
    });
    if out == "-" {
        use std::io::Write;
        std::io::stdout().lock().write_all(bytes)?;
    } else {
        std::fs::write(out, bytes)?;
    }
    Ok(())
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> std::path::PathBuf {
    match input {
        Some(path) if path != "-" => std::path::PathBuf::from(path).with_extension(ext),
        _ => std::path::PathBuf::from(format!("out.{ext}")),
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let mut layer = Layer::from_json_str(&text)?;
    if let Some(sort) = args.sort {
        layer.sorting = sort;
    }
    let config = match args.config.as_deref() {
        Some(path) => SvgConfig::from_path(path)?,
        None => SvgConfig::default(),
    };
    let Some(matrix) = args.matrix.as_deref() else {
        return Err(CliError::Usage(usage()));
    };
    let provider = JsonMatrixProvider::from_path(matrix)?;
    let domain = args
        .domain
        .as_deref()
        .or(layer.domain.as_deref())
        .unwrap_or("enterprise");
    let exporter =
        MatrixExporter::new(domain, &provider)?.with_column_order(args.column_order.clone());

    let display = DisplayMode::new(args.show_name, args.show_id);
    let canvas = exporter.export(display, &layer, &config, &ExportOptions::default())?;

    match args.command {
        Command::Layout => write_json(&canvas, args.pretty),
        Command::Export => {
            let svg_options = SvgRenderOptions {
                diagram_id: Some(navmatrix::render::sanitize_svg_id(&layer.name)),
                ..Default::default()
            };
            let svg = navmatrix::render::render_canvas_svg(&canvas, &svg_options);
            let raster = RasterOptions {
                scale: args.render_scale,
                background: args.background.clone(),
                ..Default::default()
            };
            let input = args.input.as_deref();
            let out = args.out.as_deref();
            match args.render_format {
                RenderFormat::Svg => write_text(&svg, out),
                RenderFormat::Png => write_bytes(&svg_to_png(&svg, &raster)?, out, input, "png"),
                RenderFormat::Jpeg => write_bytes(&svg_to_jpeg(&svg, &raster)?, out, input, "jpg"),
                RenderFormat::Pdf => write_bytes(&svg_to_pdf(&svg)?, out, input, "pdf"),
            }
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

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
