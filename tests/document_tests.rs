//! End-to-end document tests: add elements, close, inspect pages.

use quire::layout::{Diagnostic, LayoutElement, Page};
use quire::style::dimension::{Margins, PageSize};
use quire::style::stylesheet::{ElementStyle, PageLayout, Stylesheet};
use quire::{Document, dom};
use std::collections::HashMap;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A stylesheet whose single page master is a zero-margin custom page.
fn stylesheet(page_width: f32, page_height: f32) -> Stylesheet {
    let mut page_masters = HashMap::new();
    page_masters.insert(
        "main".to_string(),
        PageLayout {
            size: PageSize::Custom {
                width: page_width,
                height: page_height,
            },
            margins: Some(Margins::all(0.0)),
        },
    );
    Stylesheet {
        page_masters,
        default_page_master_name: Some("main".to_string()),
        styles: HashMap::new(),
    }
}

fn find_text<'p>(page: &'p Page, needle: &str) -> Option<&'p quire::layout::PositionedElement> {
    page.elements.iter().find(|el| match &el.element {
        LayoutElement::Text(t) => t.content.contains(needle),
        _ => false,
    })
}

#[test]
fn empty_document_closes_to_one_empty_page() {
    init_logger();
    let out = Document::new(stylesheet(200.0, 200.0)).close().unwrap();

    assert_eq!(out.pages.len(), 1);
    assert!(out.pages[0].elements.is_empty());
    assert!(out.diagnostics.is_empty());
    // The structure tree still has its document root.
    assert_eq!(out.tag_tree.roles_depth_first(), vec!["Document"]);
}

#[test]
fn default_stylesheet_produces_a4_pages() {
    init_logger();
    let mut doc = Document::new(Stylesheet::default());
    doc.add(dom::paragraph("hello")).unwrap();
    let out = doc.close().unwrap();

    assert_eq!(out.pages.len(), 1);
    assert!((out.pages[0].width - 595.28).abs() < 0.01);
    assert!((out.pages[0].height - 841.89).abs() < 0.01);
}

#[test]
fn paragraphs_flow_in_document_order() {
    init_logger();
    let mut doc = Document::new(stylesheet(200.0, 200.0));
    doc.add(dom::paragraph("alpha")).unwrap();
    doc.add(dom::paragraph("beta")).unwrap();
    let out = doc.close().unwrap();

    assert_eq!(out.pages.len(), 1);
    let alpha = find_text(&out.pages[0], "alpha").expect("first paragraph missing");
    let beta = find_text(&out.pages[0], "beta").expect("second paragraph missing");
    assert!(alpha.y < beta.y);
}

#[test]
fn page_break_starts_a_new_page() {
    init_logger();
    let mut doc = Document::new(stylesheet(200.0, 200.0));
    doc.add(dom::paragraph("first")).unwrap();
    doc.add(dom::Element::PageBreak).unwrap();
    doc.add(dom::paragraph("second")).unwrap();
    let out = doc.close().unwrap();

    assert_eq!(out.pages.len(), 2);
    assert!(find_text(&out.pages[0], "first").is_some());
    let second = find_text(&out.pages[1], "second").expect("text after break missing");
    assert!(second.y.abs() < 0.1);
    assert_eq!(out.pages[0].number, 1);
    assert_eq!(out.pages[1].number, 2);
}

#[test]
fn layout_diagnostics_surface_on_the_output() {
    init_logger();
    // A keep-together group taller than any page is force-placed and flagged.
    let lines = vec!["aa"; 20].join("\n");
    let group = dom::Element::Div {
        meta: dom::NodeMetadata::styled(ElementStyle {
            keep_together: Some(true),
            ..Default::default()
        }),
        children: vec![dom::paragraph(&lines)],
    };

    let mut doc = Document::new(stylesheet(200.0, 100.0));
    doc.add(group).unwrap();
    let out = doc.close().unwrap();

    assert!(
        out.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::DoesNotFitArea { .. }))
    );
}

#[test]
fn add_chains_and_builds_in_order() {
    init_logger();
    let mut doc = Document::new(stylesheet(300.0, 300.0));
    doc.add(dom::paragraph("one"))
        .unwrap()
        .add(dom::paragraph("two"))
        .unwrap();
    let out = doc.close().unwrap();

    assert_eq!(
        out.tag_tree.roles_depth_first(),
        vec!["Document", "P", "P"]
    );
}
