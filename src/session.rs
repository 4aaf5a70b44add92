//! Per-page filter session: owns the players and the active chart, and runs
//! the draw / press / drag / release lifecycle.

use crate::chart::{Point, RadarSurface};
use crate::{metric_means, top_suggestions, MetricSelection, PlayerRecord, ScaleRange, SelectionError, Suggestion};
use log::{debug, info, warn};
use std::rc::Rc;

/// Drag progress on the active chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { index: usize },
}

/// What the page needs to render after a chart change.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSnapshot {
    pub metrics: Vec<String>,
    pub thresholds: Vec<f64>,
    pub suggestions: Vec<Suggestion>,
}

struct ActiveChart<S> {
    selection: MetricSelection,
    // always selection.len() long, every entry within `scale`
    thresholds: Vec<f64>,
    scale: ScaleRange,
    drag: DragState,
    surface: S,
}

pub struct FilterSession<S: RadarSurface> {
    players: Rc<[PlayerRecord]>,
    chart: Option<ActiveChart<S>>,
}

impl<S: RadarSurface> FilterSession<S> {
    pub fn new(players: Rc<[PlayerRecord]>) -> Self {
        Self {
            players,
            chart: None,
        }
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn is_active(&self) -> bool {
        self.chart.is_some()
    }

    pub fn drag_state(&self) -> Option<DragState> {
        self.chart.as_ref().map(|c| c.drag)
    }

    pub fn thresholds(&self) -> Option<&[f64]> {
        self.chart.as_ref().map(|c| c.thresholds.as_slice())
    }

    pub fn scale(&self) -> Option<ScaleRange> {
        self.chart.as_ref().map(|c| c.scale)
    }

    pub fn surface(&self) -> Option<&S> {
        self.chart.as_ref().map(|c| &c.surface)
    }

    /// Validate the checked metrics and (re)build the chart.
    ///
    /// On a selection error nothing changes and any existing chart stays
    /// live. Otherwise the previous surface is dropped before `make_surface`
    /// is called, so the new chart can take over the same canvas.
    pub fn draw<I, T, F>(&mut self, checked: I, make_surface: F) -> Result<ChartSnapshot, SelectionError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
        F: FnOnce(&MetricSelection, &[f64], ScaleRange) -> S,
    {
        let selection = match MetricSelection::from_checked(checked) {
            Ok(selection) => selection,
            Err(err) => {
                warn!("Draw rejected: {}", err);
                return Err(err);
            }
        };

        let means = metric_means(&self.players, &selection);
        let scale = ScaleRange::covering(&self.players, &selection, &means);
        let thresholds: Vec<f64> = means.iter().map(|&m| scale.clamp(m)).collect();

        // tear down before the new chart claims the canvas
        self.chart = None;
        let surface = make_surface(&selection, &thresholds, scale);

        info!(
            "Drawing radar for {:?} (scale {}..{})",
            selection.as_slice(),
            scale.min,
            scale.max
        );
        self.chart = Some(ActiveChart {
            selection,
            thresholds,
            scale,
            drag: DragState::Idle,
            surface,
        });
        Ok(self.snapshot_or_empty())
    }

    /// Begin dragging the vertex under `point`, if any. Returns whether a
    /// drag started.
    pub fn press(&mut self, point: Point) -> bool {
        let Some(chart) = self.chart.as_mut() else {
            return false;
        };
        match chart.surface.hit_test(&chart.thresholds, point) {
            Some(index) => {
                debug!("Drag started on vertex {} ({})", index, chart.selection.as_slice()[index]);
                chart.drag = DragState::Dragging { index };
                true
            }
            None => {
                chart.drag = DragState::Idle;
                false
            }
        }
    }

    /// Move the dragged vertex to `point`. Returns the refreshed snapshot, or
    /// `None` when no drag is in progress.
    pub fn drag_to(&mut self, point: Point) -> Option<ChartSnapshot> {
        let chart = self.chart.as_mut()?;
        let DragState::Dragging { index } = chart.drag else {
            return None;
        };

        let value = chart.scale.clamp(chart.surface.value_for_pixel(index, point));
        chart.thresholds[index] = value;
        chart.surface.redraw(&chart.thresholds);
        self.snapshot()
    }

    /// Pointer released over the canvas.
    pub fn release(&mut self) {
        self.end_drag("released");
    }

    /// Pointer left the canvas.
    pub fn leave(&mut self) {
        self.end_drag("left the chart");
    }

    fn end_drag(&mut self, reason: &str) {
        if let Some(chart) = self.chart.as_mut() {
            if let DragState::Dragging { index } = chart.drag {
                debug!("Drag on vertex {} ended: pointer {}", index, reason);
            }
            chart.drag = DragState::Idle;
        }
    }

    /// Whether `point` is over a vertex while no drag is running.
    pub fn hovering(&self, point: Point) -> bool {
        self.chart.as_ref().is_some_and(|c| {
            c.drag == DragState::Idle && c.surface.hit_test(&c.thresholds, point).is_some()
        })
    }

    pub fn snapshot(&self) -> Option<ChartSnapshot> {
        let chart = self.chart.as_ref()?;
        Some(ChartSnapshot {
            metrics: chart.selection.as_slice().to_vec(),
            thresholds: chart.thresholds.clone(),
            suggestions: top_suggestions(&self.players, &chart.selection, &chart.thresholds),
        })
    }

    fn snapshot_or_empty(&self) -> ChartSnapshot {
        self.snapshot().unwrap_or(ChartSnapshot {
            metrics: Vec::new(),
            thresholds: Vec::new(),
            suggestions: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{RadarGeometry, RadarLayout};
    use serde_json::json;
    use std::cell::Cell;

    struct TestSurface {
        geometry: RadarGeometry,
        redraws: Rc<Cell<usize>>,
        drops: Rc<Cell<usize>>,
    }

    impl RadarSurface for TestSurface {
        fn layout(&self) -> RadarGeometry {
            self.geometry
        }

        fn redraw(&mut self, _values: &[f64]) {
            self.redraws.set(self.redraws.get() + 1);
        }
    }

    impl Drop for TestSurface {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    struct Harness {
        session: FilterSession<TestSurface>,
        redraws: Rc<Cell<usize>>,
        drops: Rc<Cell<usize>>,
    }

    impl Harness {
        fn new(players: Vec<PlayerRecord>) -> Self {
            Self {
                session: FilterSession::new(players.into()),
                redraws: Rc::new(Cell::new(0)),
                drops: Rc::new(Cell::new(0)),
            }
        }

        fn draw(&mut self, metrics: &[&str]) -> Result<ChartSnapshot, SelectionError> {
            let redraws = self.redraws.clone();
            let drops = self.drops.clone();
            self.session.draw(metrics.iter().copied(), move |selection, _, scale| TestSurface {
                geometry: RadarGeometry::new(
                    RadarLayout {
                        x: 200.0,
                        y: 200.0,
                        radius: 100.0,
                    },
                    scale,
                    selection.len(),
                ),
                redraws,
                drops,
            })
        }

        fn vertex(&self, index: usize) -> Point {
            let thresholds = self.session.thresholds().unwrap();
            self.session.surface().unwrap().vertex_positions(thresholds)[index]
        }

        fn point_for(&self, index: usize, value: f64) -> Point {
            self.session.surface().unwrap().layout().vertex_position(index, value)
        }
    }

    fn players() -> Vec<PlayerRecord> {
        vec![
            PlayerRecord::from_fields([
                ("Player", json!("A")),
                ("Team", json!("X")),
                ("Position", json!("MID")),
                ("Goals", json!(5)),
                ("Assists", json!(1)),
                ("Total Points", json!(80)),
            ]),
            PlayerRecord::from_fields([
                ("Player", json!("B")),
                ("Team", json!("Y")),
                ("Position", json!("FWD")),
                ("Goals", json!(2)),
                ("Assists", json!(1)),
                ("Total Points", json!(95)),
            ]),
        ]
    }

    #[test]
    fn draw_seeds_thresholds_with_means() {
        let mut h = Harness::new(players());
        let snap = h.draw(&["Goals", "Total Points", "Assists"]).unwrap();
        assert_eq!(snap.thresholds, vec![3.5, 87.5, 1.0]);
        assert_eq!(snap.metrics, vec!["Goals", "Total Points", "Assists"]);
        assert_eq!(h.session.scale(), Some(ScaleRange { min: 0.0, max: 95.0 }));
        assert_eq!(h.session.drag_state(), Some(DragState::Idle));
        // A misses the points mean, B misses the goals mean
        assert!(snap.suggestions.is_empty());
    }

    #[test]
    fn rejected_draw_keeps_the_existing_chart() {
        let mut h = Harness::new(players());
        h.draw(&["Goals", "Total Points", "Assists"]).unwrap();
        assert!(h.session.press(h.vertex(1)));
        h.session.drag_to(h.point_for(1, 40.0));
        h.session.release();
        let before = h.session.thresholds().unwrap().to_vec();

        assert_eq!(h.draw(&["Goals", "Assists"]), Err(SelectionError::TooFew { selected: 2 }));
        assert_eq!(
            h.draw(&["a", "b", "c", "d", "e", "f", "g"]),
            Err(SelectionError::TooMany { selected: 7 })
        );
        assert_eq!(h.session.thresholds().unwrap(), before.as_slice());
        assert_eq!(h.drops.get(), 0);
    }

    #[test]
    fn rejected_first_draw_stays_uninitialized() {
        let mut h = Harness::new(players());
        assert!(h.draw(&["Goals"]).is_err());
        assert!(!h.session.is_active());
        assert_eq!(h.session.snapshot(), None);
    }

    #[test]
    fn dragging_updates_threshold_and_filters() {
        let mut h = Harness::new(players());
        h.draw(&["Goals", "Total Points", "Assists"]).unwrap();

        assert!(h.session.press(h.vertex(1)));
        assert_eq!(h.session.drag_state(), Some(DragState::Dragging { index: 1 }));

        let snap = h.session.drag_to(h.point_for(1, 70.0)).unwrap();
        assert!((snap.thresholds[1] - 70.0).abs() < 1e-9);
        assert_eq!(snap.thresholds[0], 3.5);
        assert_eq!(h.redraws.get(), 1);

        let names: Vec<String> = snap.suggestions.iter().map(|s| s.to_string()).collect();
        assert_eq!(names, ["A | X | MID | Points: 80"]);
    }

    #[test]
    fn drag_is_clamped_to_scale() {
        let mut h = Harness::new(players());
        h.draw(&["Goals", "Total Points", "Assists"]).unwrap();
        let scale = h.session.scale().unwrap();

        assert!(h.session.press(h.vertex(0)));
        let far_out = h.session.drag_to(Point::new(200.0, -10_000.0)).unwrap();
        assert_eq!(far_out.thresholds[0], scale.max);

        let far_in = h.session.drag_to(Point::new(200.0, 10_000.0)).unwrap();
        assert_eq!(far_in.thresholds[0], scale.min);

        for (x, y) in [(-500.0, -500.0), (900.0, 30.0), (200.0, 200.0)] {
            let snap = h.session.drag_to(Point::new(x, y)).unwrap();
            assert!(snap.thresholds.iter().all(|&t| t >= scale.min && t <= scale.max));
        }
    }

    #[test]
    fn release_and_leave_end_the_drag() {
        let mut h = Harness::new(players());
        h.draw(&["Goals", "Total Points", "Assists"]).unwrap();

        assert!(h.session.press(h.vertex(2)));
        h.session.release();
        assert_eq!(h.session.drag_state(), Some(DragState::Idle));
        let before = h.session.thresholds().unwrap().to_vec();
        assert_eq!(h.session.drag_to(Point::new(200.0, 0.0)), None);
        assert_eq!(h.session.thresholds().unwrap(), before.as_slice());

        assert!(h.session.press(h.vertex(2)));
        h.session.leave();
        assert_eq!(h.session.drag_to(Point::new(200.0, 0.0)), None);
        assert_eq!(h.redraws.get(), 0);
    }

    #[test]
    fn press_away_from_vertices_does_not_drag() {
        let mut h = Harness::new(players());
        h.draw(&["Goals", "Total Points", "Assists"]).unwrap();
        assert!(!h.session.press(Point::new(5.0, 5.0)));
        assert_eq!(h.session.drag_state(), Some(DragState::Idle));
        assert!(!h.session.hovering(Point::new(5.0, 5.0)));
        assert!(h.session.hovering(h.vertex(0)));
    }

    #[test]
    fn press_without_chart_is_ignored() {
        let mut h = Harness::new(players());
        assert!(!h.session.press(Point::new(200.0, 200.0)));
        assert_eq!(h.session.drag_to(Point::new(200.0, 0.0)), None);
        h.session.release();
        assert_eq!(h.session.drag_state(), None);
    }

    #[test]
    fn redraw_resets_thresholds_and_drops_old_surface() {
        let mut h = Harness::new(players());
        let first = h.draw(&["Goals", "Total Points", "Assists"]).unwrap();
        assert!(h.session.press(h.vertex(0)));
        h.session.drag_to(h.point_for(0, 50.0));
        h.session.release();
        assert_ne!(h.session.thresholds().unwrap(), first.thresholds.as_slice());

        let second = h.draw(&["Goals", "Total Points", "Assists"]).unwrap();
        assert_eq!(second.thresholds, first.thresholds);
        assert_eq!(h.drops.get(), 1);
    }

    #[test]
    fn dropping_the_session_releases_the_surface() {
        let mut h = Harness::new(players());
        h.draw(&["Goals", "Total Points", "Assists"]).unwrap();
        let drops = h.drops.clone();
        drop(h);
        assert_eq!(drops.get(), 1);
    }
}
