//! Table layout: column solving, collapsed grid borders, and row
//! pagination with repeating headers and a trailing footer.

use crate::test_utils::*;
use crate::{LayoutElement, LayoutError};
use quire_dom::{
    Element, NodeMetadata, TableCell, TableColumn, TableRow, TableSection, TableSettings,
};
use quire_style::border::{Border, BorderStyle};
use quire_style::dimension::Dimension;
use quire_style::stylesheet::ElementStyle;
use quire_types::Color;

fn cell(text: &str) -> TableCell {
    TableCell::new(vec![quire_dom::paragraph(text)])
}

fn cell_styled(text: &str, style: ElementStyle) -> TableCell {
    let mut c = cell(text);
    c.style_override = Some(style);
    c
}

fn row(cells: Vec<TableCell>) -> TableRow {
    TableRow { cells }
}

fn table(
    columns: Vec<Option<Dimension>>,
    header: Option<Vec<TableRow>>,
    body: Vec<TableRow>,
    footer: Option<Vec<TableRow>>,
    settings: TableSettings,
) -> Element {
    Element::Table {
        meta: NodeMetadata::default(),
        columns: columns
            .into_iter()
            .map(|width| TableColumn { width })
            .collect(),
        header: header.map(|rows| Box::new(TableSection { rows })),
        body: Box::new(TableSection { rows: body }),
        footer: footer.map(|rows| Box::new(TableSection { rows })),
        settings,
    }
}

fn border_widths(page: &crate::Page) -> Vec<f32> {
    border_boxes(page)
        .iter()
        .map(|el| match &el.element {
            LayoutElement::Border(b) => b.width,
            _ => unreachable!(),
        })
        .collect()
}

#[test]
fn fixed_and_auto_columns_split_the_width() {
    let engine = test_engine(300.0, 400.0);
    let tbl = table(
        vec![Some(Dimension::Pt(50.0)), None],
        None,
        vec![row(vec![cell("left"), cell("right")])],
        None,
        TableSettings::default(),
    );
    let out = paginate(&engine, vec![tbl]);

    let right = find_text(&out.pages[0], "right").expect("second column missing");
    assert!((right.x - 50.0).abs() < 0.1);
}

#[test]
fn percent_columns_resolve_against_the_table_width() {
    let engine = test_engine(300.0, 400.0);
    let tbl = table(
        vec![
            Some(Dimension::Percent(25.0)),
            Some(Dimension::Percent(75.0)),
        ],
        None,
        vec![row(vec![cell("left"), cell("right")])],
        None,
        TableSettings::default(),
    );
    let out = paginate(&engine, vec![tbl]);

    let right = find_text(&out.pages[0], "right").expect("second column missing");
    assert!((right.x - 75.0).abs() < 0.1);
}

#[test]
fn spanning_cell_covers_both_columns() {
    let engine = test_engine(300.0, 400.0);
    let mut wide = cell("wide");
    wide.col_span = 2;
    let tbl = table(
        vec![None, None],
        None,
        vec![row(vec![wide]), row(vec![cell("aa"), cell("bb")])],
        None,
        TableSettings::default(),
    );
    let out = paginate(&engine, vec![tbl]);

    assert!((find_text(&out.pages[0], "wide").unwrap().x).abs() < 0.1);
    let second = find_text(&out.pages[0], "bb").expect("second column missing");
    assert!((second.x - 150.0).abs() < 0.1);
}

#[test]
fn collapsed_edge_paints_the_wider_border_once() {
    let engine = test_engine(300.0, 400.0);
    let thin = ElementStyle {
        border_bottom: Some(Border::solid(1.0, Color::rgb(255, 0, 0))),
        ..Default::default()
    };
    let thick = ElementStyle {
        border_top: Some(Border {
            width: 3.0,
            style: BorderStyle::Dotted,
            color: Color::rgb(0, 0, 255),
        }),
        ..Default::default()
    };
    let tbl = table(
        vec![None],
        None,
        vec![
            row(vec![cell_styled("r1", thin)]),
            row(vec![cell_styled("r2", thick)]),
        ],
        None,
        TableSettings::default(),
    );
    let out = paginate(&engine, vec![tbl]);

    let borders = border_boxes(&out.pages[0]);
    assert_eq!(borders.len(), 1);
    let edge = borders[0];
    match &edge.element {
        LayoutElement::Border(b) => {
            assert_eq!(b.width, 3.0);
            assert_eq!(b.style, BorderStyle::Dotted);
        }
        _ => unreachable!(),
    }
    // Centered on the shared gridline below the 14.4pt first row.
    assert!((edge.y - (14.4 - 1.5)).abs() < 0.05);
    assert!((edge.height - 3.0).abs() < 0.01);
}

#[test]
fn equal_width_tie_resolved_by_style_rank() {
    let engine = test_engine(300.0, 400.0);
    let solid = ElementStyle {
        border_bottom: Some(Border::solid(2.0, Color::rgb(255, 0, 0))),
        ..Default::default()
    };
    let double = ElementStyle {
        border_top: Some(Border {
            width: 2.0,
            style: BorderStyle::Double,
            color: Color::rgb(0, 0, 255),
        }),
        ..Default::default()
    };
    let tbl = table(
        vec![None],
        None,
        vec![
            row(vec![cell_styled("r1", solid)]),
            row(vec![cell_styled("r2", double)]),
        ],
        None,
        TableSettings::default(),
    );
    let out = paginate(&engine, vec![tbl]);

    let borders = border_boxes(&out.pages[0]);
    assert_eq!(borders.len(), 1);
    match &borders[0].element {
        LayoutElement::Border(b) => assert_eq!(b.style, BorderStyle::Double),
        _ => unreachable!(),
    }
}

#[test]
fn explicit_none_border_yields_to_the_other_side() {
    let engine = test_engine(300.0, 400.0);
    let none = ElementStyle {
        border_bottom: Some(Border::none()),
        ..Default::default()
    };
    let solid = ElementStyle {
        border_top: Some(Border::solid(2.0, Color::rgb(0, 128, 0))),
        ..Default::default()
    };
    let tbl = table(
        vec![None],
        None,
        vec![
            row(vec![cell_styled("r1", none)]),
            row(vec![cell_styled("r2", solid)]),
        ],
        None,
        TableSettings::default(),
    );
    let out = paginate(&engine, vec![tbl]);

    assert_eq!(border_widths(&out.pages[0]), vec![2.0]);
}

#[test]
fn table_frame_participates_at_outer_edges() {
    let engine = test_engine(300.0, 400.0);
    let mut tbl = table(
        vec![None],
        None,
        vec![row(vec![cell("only")])],
        None,
        TableSettings::default(),
    );
    if let Some(meta) = tbl.meta_mut() {
        meta.style_override = Some(ElementStyle {
            border: Some(Border::solid(2.0, Color::rgb(0, 0, 0))),
            ..Default::default()
        });
    }
    let out = paginate(&engine, vec![tbl]);

    // Top, bottom, left, and right frame edges, each painted once.
    assert_eq!(border_boxes(&out.pages[0]).len(), 4);
    assert!(border_widths(&out.pages[0]).iter().all(|w| *w == 2.0));
}

#[test]
fn header_repeats_on_every_page() {
    let engine = test_engine(300.0, 100.0);
    let body: Vec<TableRow> = (0..10).map(|i| row(vec![cell(&format!("row{i}"))])).collect();
    let tbl = table(
        vec![None],
        Some(vec![row(vec![cell("head")])]),
        body,
        None,
        TableSettings::default(),
    );
    let out = paginate(&engine, vec![tbl]);

    assert_eq!(out.pages.len(), 2);
    for page in &out.pages {
        let head = find_text(page, "head").expect("header missing");
        assert!(head.y.abs() < 0.1);
    }
    assert!(find_text(&out.pages[0], "row4").is_some());
    assert!(find_text(&out.pages[1], "row5").is_some());
}

#[test]
fn skip_first_header_suppresses_the_first_band() {
    let engine = test_engine(300.0, 100.0);
    let body: Vec<TableRow> = (0..10).map(|i| row(vec![cell(&format!("row{i}"))])).collect();
    let settings = TableSettings {
        skip_first_header: true,
        ..Default::default()
    };
    let tbl = table(
        vec![None],
        Some(vec![row(vec![cell("head")])]),
        body,
        None,
        settings,
    );
    let out = paginate(&engine, vec![tbl]);

    assert!(find_text(&out.pages[0], "head").is_none());
    assert!(find_text(&out.pages[1], "head").is_some());
}

#[test]
fn footer_lands_on_the_last_page_only() {
    let engine = test_engine(300.0, 100.0);
    let body: Vec<TableRow> = (0..9).map(|i| row(vec![cell(&format!("row{i}"))])).collect();
    let tbl = table(
        vec![None],
        Some(vec![row(vec![cell("head")])]),
        body,
        Some(vec![row(vec![cell("foot")])]),
        TableSettings::default(),
    );
    let out = paginate(&engine, vec![tbl]);

    assert_eq!(out.pages.len(), 2);
    assert!(find_text(&out.pages[0], "foot").is_none());
    let foot = find_text(&out.pages[1], "foot").expect("footer missing");
    assert!((foot.y - 72.0).abs() < 0.1);
}

#[test]
fn too_many_cells_is_an_error() {
    let engine = test_engine(300.0, 400.0);
    let tbl = table(
        vec![None],
        None,
        vec![row(vec![cell("a"), cell("b")])],
        None,
        TableSettings::default(),
    );
    init_test_logger();
    let err = engine.paginate(&Element::Root(vec![tbl])).unwrap_err();
    assert!(matches!(err, LayoutError::TooManyCells(0, 1)));
}
