//! Keep-together: unsplittable groups retry on the next area once, then are
//! force-placed with a diagnostic rather than dropped.

use crate::diag::Diagnostic;
use crate::test_utils::*;
use quire_dom::Element;
use quire_style::dimension::Dimension;
use quire_style::flow::Float;
use quire_style::stylesheet::ElementStyle;
use quire_types::Color;

fn filler_lines(n: usize) -> Element {
    quire_dom::paragraph(&vec!["aa"; n].join("\n"))
}

fn keep(children: Vec<Element>) -> Element {
    styled_div(
        ElementStyle {
            keep_together: Some(true),
            ..Default::default()
        },
        children,
    )
}

#[test]
fn group_that_fits_stays_in_place() {
    let engine = test_engine(200.0, 100.0);
    let out = paginate(&engine, vec![filler_lines(2), keep(vec![filler_lines(2)])]);

    assert_eq!(out.pages.len(), 1);
    assert!(out.diagnostics.is_empty());
    assert_eq!(text_boxes(&out.pages[0]).len(), 4);
}

#[test]
fn group_moves_whole_to_the_next_area() {
    let engine = test_engine(200.0, 100.0);
    // 43.2pt of filler leaves 56.8pt; the 72pt group must not split.
    let out = paginate(&engine, vec![filler_lines(3), keep(vec![filler_lines(5)])]);

    assert_eq!(out.pages.len(), 2);
    assert!(out.diagnostics.is_empty());
    assert_eq!(text_boxes(&out.pages[0]).len(), 3);

    let second = text_boxes(&out.pages[1]);
    assert_eq!(second.len(), 5);
    assert!(second.iter().any(|el| el.y.abs() < 0.1));
}

#[test]
fn oversized_group_is_forced_at_area_top_with_a_diagnostic() {
    let engine = test_engine(200.0, 100.0);
    // 144pt of content can never fit a 100pt area.
    let out = paginate(&engine, vec![keep(vec![filler_lines(10)])]);

    assert_eq!(out.pages.len(), 1);
    assert_eq!(text_boxes(&out.pages[0]).len(), 10);
    assert_eq!(out.diagnostics.len(), 1);
    assert!(matches!(
        out.diagnostics[0],
        Diagnostic::DoesNotFitArea { kind: "block", .. }
    ));
}

#[test]
fn group_footprint_includes_its_floats() {
    let engine = test_engine(200.0, 100.0);
    let float = styled_div(
        ElementStyle {
            float: Some(Float::Left),
            width: Some(Dimension::Pt(50.0)),
            height: Some(Dimension::Pt(70.0)),
            background_color: Some(Color::gray(200)),
            ..Default::default()
        },
        vec![],
    );
    // One 14.4pt line plus a 70pt float hanging below it: 84.4pt in all.
    // 56.8pt remain on page one, so the group must move whole.
    let out = paginate(
        &engine,
        vec![
            filler_lines(3),
            keep(vec![quire_dom::paragraph("bb"), float]),
        ],
    );

    assert_eq!(out.pages.len(), 2);
    assert!(out.diagnostics.is_empty());
    assert_eq!(text_boxes(&out.pages[0]).len(), 3);

    let text = find_text(&out.pages[1], "bb").expect("text missing");
    assert!(text.y.abs() < 0.1);
    let backgrounds = background_boxes(&out.pages[1]);
    assert_eq!(backgrounds.len(), 1);
    assert!((backgrounds[0].y - 14.4).abs() < 0.1);
    assert!((backgrounds[0].height - 70.0).abs() < 0.1);
}

#[test]
fn styled_height_counts_toward_the_group_footprint() {
    let engine = test_engine(200.0, 100.0);
    let tall = styled_div(
        ElementStyle {
            keep_together: Some(true),
            height: Some(Dimension::Pt(150.0)),
            background_color: Some(Color::gray(220)),
            ..Default::default()
        },
        vec![],
    );
    let out = paginate(&engine, vec![filler_lines(1), tall]);

    // Deferred once, then force-placed at the top of page two.
    assert_eq!(out.pages.len(), 2);
    assert_eq!(out.diagnostics.len(), 1);
    assert!(matches!(
        out.diagnostics[0],
        Diagnostic::DoesNotFitArea { required, .. } if (required - 150.0).abs() < 0.5
    ));

    let backgrounds = background_boxes(&out.pages[1]);
    assert_eq!(backgrounds.len(), 1);
    assert!(backgrounds[0].y.abs() < 0.1);
    assert!((backgrounds[0].height - 150.0).abs() < 0.1);
}

#[test]
fn nested_group_moves_with_its_parent() {
    let engine = test_engine(200.0, 100.0);
    let out = paginate(
        &engine,
        vec![
            filler_lines(3),
            keep(vec![filler_lines(2), keep(vec![filler_lines(2)])]),
        ],
    );

    // The outer group's 57.6pt footprint exceeds the 56.8pt left on page
    // one; all four lines travel together.
    assert_eq!(out.pages.len(), 2);
    assert!(out.diagnostics.is_empty());
    assert_eq!(text_boxes(&out.pages[0]).len(), 3);
    let second = text_boxes(&out.pages[1]);
    assert_eq!(second.len(), 4);
    assert!(second.iter().any(|el| el.y.abs() < 0.1));
}

#[test]
fn inner_group_defers_alone_when_its_parent_may_split() {
    let engine = test_engine(200.0, 100.0);
    let parent = styled_div(
        ElementStyle::default(),
        vec![filler_lines(2), keep(vec![filler_lines(2)])],
    );
    let out = paginate(&engine, vec![filler_lines(4), parent]);

    // The unmarked parent splits freely; only the inner group is atomic.
    assert_eq!(out.pages.len(), 2);
    assert!(out.diagnostics.is_empty());
    assert_eq!(text_boxes(&out.pages[0]).len(), 6);
    let second = text_boxes(&out.pages[1]);
    assert_eq!(second.len(), 2);
    assert!(second[0].y.abs() < 0.1);
}

#[test]
fn mid_area_group_retries_once_then_is_forced() {
    let engine = test_engine(200.0, 100.0);
    let out = paginate(&engine, vec![filler_lines(3), keep(vec![filler_lines(10)])]);

    // Deferred from page one, then force-placed at the top of page two.
    assert_eq!(out.pages.len(), 2);
    assert_eq!(text_boxes(&out.pages[0]).len(), 3);
    assert_eq!(text_boxes(&out.pages[1]).len(), 10);
    assert_eq!(out.diagnostics.len(), 1);
    assert!(matches!(
        out.diagnostics[0],
        Diagnostic::DoesNotFitArea { required, available, .. }
            if required > available
    ));
}
