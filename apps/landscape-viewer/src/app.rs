//! Viewer application logic.

use glam::Vec3;
use landscape_app::{AppContext, AppLogic};
use landscape_core::{Extent3, ServerEvent, ServerEventKind};
use tracing::{debug, info};

/// Seconds between status reports.
const REPORT_INTERVAL: f64 = 1.0;

/// Lays startup scenes out in the volume and reports progress.
pub struct Viewer {
    size: Extent3,
    run_for: Option<f64>,
    completions: u64,
    next_report: f64,
    laid_out: bool,
}

impl Viewer {
    pub fn new(size: Extent3, run_for: Option<f64>) -> Self {
        Self {
            size,
            run_for,
            completions: 0,
            next_report: REPORT_INTERVAL,
            laid_out: false,
        }
    }

    /// Stack `count` panels top to bottom, centred in a volume of `half`
    /// half-extents.
    fn panel_positions(half: Vec3, count: usize) -> Vec<Vec3> {
        let step = 2.0 * half.y / count.max(1) as f32;
        (0..count)
            .map(|i| Vec3::new(0.0, half.y - step * (i as f32 + 0.5), 0.0))
            .collect()
    }
}

impl AppLogic for Viewer {
    fn initial_volume_size(&self) -> Extent3 {
        self.size
    }

    fn update(&mut self, ctx: &AppContext<'_>, _dt: f32) -> bool {
        if !self.laid_out {
            let positions = Self::panel_positions(ctx.volume.half_extents(), ctx.scenes.len());
            for (scene, pos) in ctx.scenes.iter().zip(&positions) {
                debug_assert!(ctx.volume.contains(*pos));
                info!("Scene '{}' placed at {pos}", scene.id);
            }
            self.laid_out = true;
        }

        if ctx.elapsed >= self.next_report {
            info!(
                "{:.1}s elapsed, {} tick(s), {} completion(s)",
                ctx.elapsed, ctx.ticks, self.completions
            );
            self.next_report += REPORT_INTERVAL;
        }

        self.run_for.map_or(true, |limit| ctx.elapsed < limit)
    }

    fn on_event(&mut self, _ctx: &AppContext<'_>, event: &ServerEvent) -> bool {
        match event.kind() {
            ServerEventKind::Completion => {
                self.completions += 1;
                debug!(
                    "Completion: {}",
                    String::from_utf8_lossy(event.payload())
                );
                true
            }
            ServerEventKind::Lifecycle => true,
            ServerEventKind::Custom(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panels_stay_inside_volume() {
        let half = Vec3::new(0.75, 0.5, 0.25);
        let positions = Viewer::panel_positions(half, 3);
        assert_eq!(positions.len(), 3);
        assert!(positions.iter().all(|p| p.abs().cmple(half).all()));
        assert!(positions[0].y > positions[2].y);
    }

    #[test]
    fn no_scenes_no_panels() {
        assert!(Viewer::panel_positions(Vec3::ONE, 0).is_empty());
    }
}
