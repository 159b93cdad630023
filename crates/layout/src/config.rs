/// Engine-wide layout knobs.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Constrained re-layout passes a rotated box may take before it is
    /// clipped with a diagnostic. Keeps rotation fitting strictly bounded.
    pub max_rotation_passes: usize,
    /// Tolerance used by fit checks and justification width accounting.
    pub epsilon: f32,
    /// Hard cap on produced areas; exceeding it means layout stopped
    /// making progress.
    pub max_areas: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_rotation_passes: 2,
            epsilon: 0.01,
            max_areas: 10_000,
        }
    }
}
