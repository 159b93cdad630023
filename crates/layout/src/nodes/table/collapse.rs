//! Deterministic border collapsing for table grid edges.
//!
//! Every interior edge is shared by two cells (or by a cell and the table
//! frame on outer edges) and is painted exactly once. The winner is picked
//! by width, then by line style rank, then by the first participant in
//! document order, so collapsing never depends on paint order.

use quire_style::border::Border;

/// Picks the border painted on a shared edge. `first` is the participant
/// earlier in document order (upper row / left cell / table frame).
///
/// An explicitly styled `none` border withdraws its own side from the
/// contest; the other side still paints.
pub fn collapse_edge<'b>(first: Option<&'b Border>, second: Option<&'b Border>) -> Option<&'b Border> {
    let first = first.filter(|b| !b.is_none());
    let second = second.filter(|b| !b.is_none());

    match (first, second) {
        (None, None) => None,
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (Some(a), Some(b)) => {
            if (a.width - b.width).abs() > 0.01 {
                if a.width > b.width { Some(a) } else { Some(b) }
            } else if a.style.priority() >= b.style.priority() {
                Some(a)
            } else {
                Some(b)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_style::border::BorderStyle;
    use quire_types::Color;

    fn border(width: f32, style: BorderStyle) -> Border {
        Border {
            width,
            style,
            color: Color::rgb(0, 0, 0),
        }
    }

    #[test]
    fn wider_border_wins() {
        let thin = border(1.0, BorderStyle::Double);
        let thick = border(3.0, BorderStyle::Dotted);
        assert_eq!(collapse_edge(Some(&thin), Some(&thick)), Some(&thick));
        assert_eq!(collapse_edge(Some(&thick), Some(&thin)), Some(&thick));
    }

    #[test]
    fn equal_width_resolves_by_style_rank() {
        let solid = border(2.0, BorderStyle::Solid);
        let double = border(2.0, BorderStyle::Double);
        let dashed = border(2.0, BorderStyle::Dashed);
        assert_eq!(collapse_edge(Some(&solid), Some(&double)), Some(&double));
        assert_eq!(collapse_edge(Some(&dashed), Some(&solid)), Some(&solid));
    }

    #[test]
    fn full_tie_prefers_the_first_participant() {
        let a = Border {
            width: 2.0,
            style: BorderStyle::Solid,
            color: Color::rgb(255, 0, 0),
        };
        let b = Border {
            width: 2.0,
            style: BorderStyle::Solid,
            color: Color::rgb(0, 0, 255),
        };
        assert_eq!(collapse_edge(Some(&a), Some(&b)), Some(&a));
    }

    #[test]
    fn explicit_none_withdraws_only_its_own_side() {
        let none = Border::none();
        let solid = border(1.0, BorderStyle::Solid);
        assert_eq!(collapse_edge(Some(&none), Some(&solid)), Some(&solid));
        assert_eq!(collapse_edge(Some(&solid), Some(&none)), Some(&solid));
        assert_eq!(collapse_edge(Some(&none), Some(&none)), None);
        assert_eq!(collapse_edge(None, None), None);
    }
}
