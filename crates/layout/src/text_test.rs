//! Line breaking, justification, and overflow behavior.
//!
//! Widths below assume the builtin metrics: at 12pt, 'a' is 6.0pt wide and
//! a space is 3.336pt.

use crate::LayoutElement;
use crate::test_utils::*;
use quire_style::flow::Overflow;
use quire_style::stylesheet::ElementStyle;
use quire_style::text::TextAlign;

#[test]
fn wraps_text_into_multiple_lines() {
    let engine = test_engine(100.0, 1000.0);
    let text = "aaaa ".repeat(10);
    let out = paginate(&engine, vec![quire_dom::paragraph(text.trim())]);

    assert_eq!(out.pages.len(), 1);
    let lines = lines_of(&out.pages[0]);
    // Three 24pt words and two gaps per line; ten words make four lines.
    assert_eq!(lines.len(), 4);
    for line in &lines {
        let right = line.last().unwrap();
        assert!(right.x + right.width <= 100.1);
    }
    assert!(lines[1][0].y > lines[0][0].y);
}

#[test]
fn justify_fills_all_lines_but_the_last() {
    let engine = test_engine(100.0, 1000.0);
    let style = ElementStyle {
        text_align: Some(TextAlign::Justify),
        ..Default::default()
    };
    let text = "aa ".repeat(7);
    let out = paginate(&engine, vec![styled_paragraph(style, text.trim())]);

    let lines = lines_of(&out.pages[0]);
    assert_eq!(lines.len(), 2);

    // The full line is stretched out to the measure.
    let first_right = lines[0].last().unwrap();
    assert!((first_right.x + first_right.width - 100.0).abs() < 0.05);

    // The last line keeps its natural width.
    assert_eq!(lines[1].len(), 1);
    let last = lines[1][0];
    assert!(last.x.abs() < 0.05);
    assert!((last.width - 12.0).abs() < 0.05);
}

#[test]
fn justify_all_stretches_the_last_line_too() {
    let engine = test_engine(100.0, 1000.0);
    let style = ElementStyle {
        text_align: Some(TextAlign::JustifyAll),
        ..Default::default()
    };
    let text = "aa ".repeat(8);
    let out = paginate(&engine, vec![styled_paragraph(style, text.trim())]);

    let lines = lines_of(&out.pages[0]);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].len(), 2);
    let last_right = lines[1].last().unwrap();
    assert!((last_right.x + last_right.width - 100.0).abs() < 0.05);
}

#[test]
fn gapless_justified_line_stretches_between_characters() {
    let engine = test_engine(100.0, 1000.0);
    let style = ElementStyle {
        text_align: Some(TextAlign::JustifyAll),
        ..Default::default()
    };
    let out = paginate(&engine, vec![styled_paragraph(style, "aaaa")]);

    // A single word has no inter-word gaps; the 76pt of free space is
    // spread over the three advances between its four characters.
    let lines = lines_of(&out.pages[0]);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].len(), 1);
    let word = lines[0][0];
    assert!(word.x.abs() < 0.05);
    assert!((word.width - 100.0).abs() < 0.05);
    match &word.element {
        LayoutElement::Text(t) => assert!((t.char_spacing - 76.0 / 3.0).abs() < 0.05),
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn baseline_sits_at_half_leading_plus_ascent() {
    let engine = test_engine(200.0, 1000.0);
    let out = paginate(&engine, vec![quire_dom::paragraph("aaaa")]);

    // 14.4pt line, 12pt font: 1.65pt of half-leading over an 8.616pt ascent.
    let lines = lines_of(&out.pages[0]);
    match &lines[0][0].element {
        LayoutElement::Text(t) => assert!((t.baseline - 10.266).abs() < 0.01),
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn centered_line_is_horizontally_centered() {
    let engine = test_engine(100.0, 1000.0);
    let style = ElementStyle {
        text_align: Some(TextAlign::Center),
        ..Default::default()
    };
    let out = paginate(&engine, vec![styled_paragraph(style, "aaaa")]);

    let lines = lines_of(&out.pages[0]);
    assert!((lines[0][0].x - 38.0).abs() < 0.05);
}

#[test]
fn hard_break_forces_a_new_line() {
    let engine = test_engine(200.0, 1000.0);
    let out = paginate(&engine, vec![quire_dom::paragraph("alpha\nbeta")]);

    let lines = lines_of(&out.pages[0]);
    assert_eq!(lines.len(), 2);
    assert!(lines[1][0].x.abs() < 0.05);
    assert!(find_text(&out.pages[0], "alpha").is_some());
    assert!(find_text(&out.pages[0], "beta").is_some());
}

#[test]
fn long_word_is_clipped_per_line_by_default() {
    let engine = test_engine(50.0, 1000.0);
    let word = "a".repeat(16);
    let out = paginate(&engine, vec![quire_dom::paragraph(&word)]);

    // 96pt of glyphs in a 50pt measure: split into two 8-character lines.
    let lines = lines_of(&out.pages[0]);
    assert_eq!(lines.len(), 2);
    let mut combined = String::new();
    for line in &lines {
        assert!(line[0].width <= 50.1);
        if let LayoutElement::Text(t) = &line[0].element {
            combined.push_str(&t.content);
        }
    }
    assert_eq!(combined, word);
}

#[test]
fn visible_overflow_keeps_the_word_whole() {
    let engine = test_engine(50.0, 1000.0);
    let style = ElementStyle {
        overflow: Some(Overflow::Visible),
        ..Default::default()
    };
    let word = "a".repeat(16);
    let out = paginate(&engine, vec![styled_paragraph(style, &word)]);

    let lines = lines_of(&out.pages[0]);
    assert_eq!(lines.len(), 1);
    assert!((lines[0][0].width - 96.0).abs() < 0.05);
}
