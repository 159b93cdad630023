//! Keep-together resolution.
//!
//! A keep-together box that does not fit the remaining space of its area is
//! deferred whole to the next area and retried there exactly once. If it
//! does not fit a fresh area either, it is force-placed with a diagnostic
//! rather than looping.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepOutcome {
    /// The box fits the remaining space; lay out normally.
    Fits,
    /// Defer the whole box to the next area.
    RetryNextArea,
    /// The box cannot fit any area; place it here and let it overflow.
    ForcedPlacement,
}

pub fn resolve_keep_together(
    required: f32,
    available: f32,
    at_area_top: bool,
    epsilon: f32,
) -> KeepOutcome {
    if required <= available + epsilon {
        KeepOutcome::Fits
    } else if at_area_top {
        // Already at the top of a fresh area; a retry cannot gain space.
        KeepOutcome::ForcedPlacement
    } else {
        KeepOutcome::RetryNextArea
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 0.01;

    #[test]
    fn fits_when_required_within_available() {
        assert_eq!(
            resolve_keep_together(100.0, 150.0, false, EPS),
            KeepOutcome::Fits
        );
        // Exact fit, within tolerance.
        assert_eq!(
            resolve_keep_together(150.0, 150.0, false, EPS),
            KeepOutcome::Fits
        );
    }

    #[test]
    fn mid_area_overflow_defers_to_next_area() {
        assert_eq!(
            resolve_keep_together(200.0, 150.0, false, EPS),
            KeepOutcome::RetryNextArea
        );
    }

    #[test]
    fn fresh_area_overflow_is_forced() {
        assert_eq!(
            resolve_keep_together(900.0, 700.0, true, EPS),
            KeepOutcome::ForcedPlacement
        );
    }
}
