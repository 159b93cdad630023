//! Shared helpers for layout tests: a fixed-size test engine with the
//! builtin font metrics, and element finders over paginated output.

use crate::engine::{LayoutEngine, Page, PaginatedLayout};
use crate::{LayoutElement, PositionedElement};
use quire_dom::Element;
use quire_style::dimension::{Margins, PageSize};
use quire_style::stylesheet::{ElementStyle, PageLayout, Stylesheet};
use std::collections::HashMap;

pub fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// An engine whose single page master is a zero-margin custom page, so the
/// content area is exactly `page_width` x `page_height`.
pub fn test_engine(page_width: f32, page_height: f32) -> LayoutEngine {
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
    LayoutEngine::new(Stylesheet {
        page_masters,
        default_page_master_name: Some("main".to_string()),
        styles: HashMap::new(),
    })
}

pub fn paginate(engine: &LayoutEngine, children: Vec<Element>) -> PaginatedLayout {
    init_test_logger();
    engine
        .paginate(&Element::Root(children))
        .expect("layout failed")
}

pub fn styled_div(style: ElementStyle, children: Vec<Element>) -> Element {
    Element::Div {
        meta: quire_dom::NodeMetadata::styled(style),
        children,
    }
}

pub fn styled_paragraph(style: ElementStyle, text: &str) -> Element {
    let mut el = quire_dom::paragraph(text);
    if let Some(meta) = el.meta_mut() {
        meta.style_override = Some(style);
    }
    el
}

pub fn text_boxes(page: &Page) -> Vec<&PositionedElement> {
    page.elements
        .iter()
        .filter(|el| matches!(el.element, LayoutElement::Text(_)))
        .collect()
}

pub fn find_text<'p>(page: &'p Page, needle: &str) -> Option<&'p PositionedElement> {
    page.elements.iter().find(|el| match &el.element {
        LayoutElement::Text(t) => t.content.contains(needle),
        _ => false,
    })
}

pub fn background_boxes(page: &Page) -> Vec<&PositionedElement> {
    page.elements
        .iter()
        .filter(|el| matches!(el.element, LayoutElement::Background(_)))
        .collect()
}

pub fn border_boxes(page: &Page) -> Vec<&PositionedElement> {
    page.elements
        .iter()
        .filter(|el| matches!(el.element, LayoutElement::Border(_)))
        .collect()
}

/// Groups text boxes into lines by their y position, sorted top to bottom,
/// each line sorted left to right.
pub fn lines_of(page: &Page) -> Vec<Vec<&PositionedElement>> {
    let mut boxes = text_boxes(page);
    boxes.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap().then(a.x.partial_cmp(&b.x).unwrap()));
    let mut lines: Vec<Vec<&PositionedElement>> = Vec::new();
    for el in boxes {
        match lines.last_mut() {
            Some(line) if (line[0].y - el.y).abs() < 0.1 => line.push(el),
            _ => lines.push(vec![el]),
        }
    }
    lines
}
