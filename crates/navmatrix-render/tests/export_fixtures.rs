use navmatrix_core::{JsonMatrixProvider, Layer, Rgb, SvgConfig};
use navmatrix_render::model::{Canvas, Group};
use navmatrix_render::{
    DisplayMode, Error, ExportOptions, MatrixExporter, SvgRenderOptions, render_canvas_svg,
};
use std::path::PathBuf;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn fixture(parts: &[&str]) -> PathBuf {
    let mut p = workspace_root().join("fixtures");
    for part in parts {
        p = p.join(part);
    }
    p
}

fn exporter() -> MatrixExporter {
    let provider =
        JsonMatrixProvider::from_path(fixture(&["matrix", "catalog.json"])).expect("catalog");
    MatrixExporter::new("enterprise-attack", &provider).expect("enterprise")
}

fn example_layer() -> Layer {
    Layer::from_path(fixture(&["layers", "example.json"])).expect("layer")
}

fn column<'a>(canvas: &'a Canvas, key: &str) -> &'a Group {
    canvas
        .group("matrix")
        .and_then(|m| m.groups("column").find(|c| c.id.as_deref() == Some(key)))
        .unwrap_or_else(|| panic!("column {key}"))
}

fn cells(column: &Group) -> Vec<&Group> {
    column
        .groups("cells")
        .flat_map(|c| c.groups("cell"))
        .collect()
}

#[test]
fn example_layer_on_letter_landscape() {
    let canvas = exporter()
        .export(
            DisplayMode::default(),
            &example_layer(),
            &SvgConfig::default(),
            &ExportOptions::default(),
        )
        .unwrap();
    assert_eq!((canvas.width, canvas.height), (1056.0, 816.0));

    let header = canvas.group("header").expect("header");
    let panels: Vec<&str> = header
        .groups("header-block")
        .filter_map(|g| g.id.as_deref())
        .collect();
    assert_eq!(panels, ["about", "filters", "legend"]);

    // initial-access reserves 5 items + 3 + 4 expanded sub-items.
    let expected_cell_height = (816.0 - 96.0 - 30.0 - 9.984) / 12.0;
    let initial = column(&canvas, "initial-access");
    assert_eq!(initial.translate, (5.0, 96.0 + 30.0));
    let initial_cells = cells(initial);
    let ids: Vec<&str> = initial_cells
        .iter()
        .filter_map(|c| c.id.as_deref())
        .collect();
    assert_eq!(&ids[..2], ["T1566", "T1190"]);
    assert!(!ids.contains(&"T1189"), "disabled technique is hidden");

    let phishing = initial_cells[0];
    assert_eq!(phishing.groups("subcell").count(), 3);
    let rect = phishing.rects().next().unwrap();
    assert!((rect.height - expected_cell_height).abs() < 1e-9);
    assert!((rect.width - (1056.0 / 3.0 - 10.0)).abs() < 1e-9);
    assert!((initial_cells[1].translate.1 - 4.0 * expected_cell_height).abs() < 1e-9);

    let gradient = example_layer().gradient.unwrap();
    assert_eq!(rect.fill, Some(gradient.color_for(80.0)));

    let execution = column(&canvas, "execution");
    let interpreter = cells(execution)
        .into_iter()
        .find(|c| c.id.as_deref() == Some("T1059"))
        .unwrap();
    assert_eq!(
        interpreter.rects().next().unwrap().fill,
        Some(Rgb::new(0x1f, 0x77, 0xb4))
    );

    // Every column shares one cell height.
    for key in ["initial-access", "execution", "persistence"] {
        for cell in cells(column(&canvas, key)) {
            let h = cell.rects().next().unwrap().height;
            assert!((h - expected_cell_height).abs() < 1e-9, "{key}");
        }
    }
}

#[test]
fn floating_legend_from_yaml_config_is_drawn_last() {
    let config = SvgConfig::from_path(fixture(&["config", "letter.yaml"])).unwrap();
    let canvas = exporter()
        .export(
            DisplayMode::new(true, true),
            &example_layer(),
            &config,
            &ExportOptions::default(),
        )
        .unwrap();
    let last = match canvas.children.last() {
        Some(navmatrix_render::model::Element::Group(g)) => g,
        other => panic!("unexpected last element {other:?}"),
    };
    assert_eq!(last.class.as_deref(), Some("legend"));
    let px = config.resolve_pixels().unwrap();
    assert_eq!(
        last.translate,
        (
            px.width - px.legend_width - px.border,
            px.height - px.legend_height - px.border
        )
    );
}

#[test]
fn repeated_exports_are_identical() {
    let exporter = exporter();
    let layer = example_layer();
    let config = SvgConfig::from_path(fixture(&["config", "pixels.json"])).unwrap();
    let a = exporter
        .export(DisplayMode::default(), &layer, &config, &ExportOptions::default())
        .unwrap();
    let b = exporter
        .export(DisplayMode::default(), &layer, &config, &ExportOptions::default())
        .unwrap();
    assert_eq!(a, b);

    let svg = render_canvas_svg(&a, &SvgRenderOptions::default());
    let doc = roxmltree::Document::parse(&svg).expect("valid svg");
    assert_eq!(doc.root_element().attribute("width"), Some("1200"));
    let columns = doc
        .descendants()
        .filter(|n| n.attribute("class") == Some("column"))
        .count();
    assert_eq!(columns, 3);
}

#[test]
fn mobile_domain_and_empty_layers() {
    let provider =
        JsonMatrixProvider::from_path(fixture(&["matrix", "catalog.json"])).expect("catalog");
    let mobile = MatrixExporter::new("mobile", &provider).unwrap();
    let canvas = mobile
        .export(
            DisplayMode::default(),
            &Layer::new("empty"),
            &SvgConfig::default(),
            &ExportOptions::default(),
        )
        .unwrap();
    assert_eq!(canvas.group("matrix").unwrap().groups("column").count(), 2);

    let empty = JsonMatrixProvider::from_json_str(r#"{"mobile": []}"#).unwrap();
    let err = MatrixExporter::new("mobile", &empty)
        .unwrap()
        .export(
            DisplayMode::default(),
            &Layer::new("empty"),
            &SvgConfig::default(),
            &ExportOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, Error::EmptyMatrix));
}
