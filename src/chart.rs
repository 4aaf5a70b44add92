//! Radar chart geometry and Chart.js interop.
//!
//! The filtering core only talks to a [`RadarSurface`]: something that knows
//! where the polygon sits on screen and can redraw it. [`ChartJsSurface`] is
//! the browser implementation backed by the helpers in `chart_helpers.js`.

use crate::config::{CHART_TITLE, HIT_RADIUS_PX};
use crate::{MetricSelection, ScaleRange};
use log::warn;
use serde::Deserialize;
use std::f64::consts::PI;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

#[wasm_bindgen(module = "/chart_helpers.js")]
extern "C" {
    #[wasm_bindgen(js_name = createRadarChart)]
    fn create_radar_chart(
        canvas: &HtmlCanvasElement,
        labels: JsValue,
        values: JsValue,
        min: f64,
        max: f64,
        title: &str,
    ) -> JsValue;

    #[wasm_bindgen(js_name = updateRadarChart)]
    fn update_radar_chart(chart: &JsValue, values: JsValue);

    #[wasm_bindgen(js_name = radarLayout)]
    fn radar_layout(chart: &JsValue) -> JsValue;

    #[wasm_bindgen(js_name = destroyRadarChart)]
    fn destroy_radar_chart(chart: &JsValue);
}

/// A position on the canvas in CSS pixels, y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Centre and radius of the radial scale as reported by the chart.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct RadarLayout {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// Pure value/pixel mapping for a radar with `axis_count` axes.
///
/// Axis `i` points at angle `2πi/n - π/2`: the first axis straight up, the
/// rest clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarGeometry {
    pub center: Point,
    pub radius: f64,
    pub scale: ScaleRange,
    pub axis_count: usize,
}

impl RadarGeometry {
    pub fn new(layout: RadarLayout, scale: ScaleRange, axis_count: usize) -> Self {
        Self {
            center: Point::new(layout.x, layout.y),
            radius: layout.radius,
            scale,
            axis_count,
        }
    }

    fn axis_direction(&self, index: usize) -> (f64, f64) {
        let n = self.axis_count.max(1) as f64;
        let angle = 2.0 * PI * index as f64 / n - PI / 2.0;
        (angle.cos(), angle.sin())
    }

    fn distance_for_value(&self, value: f64) -> f64 {
        let span = self.scale.span();
        if span <= 0.0 {
            return 0.0;
        }
        (self.scale.clamp(value) - self.scale.min) / span * self.radius
    }

    pub fn vertex_position(&self, index: usize, value: f64) -> Point {
        let (dx, dy) = self.axis_direction(index);
        let d = self.distance_for_value(value);
        Point::new(self.center.x + dx * d, self.center.y + dy * d)
    }

    /// Value on axis `index` for a pointer position: the pointer is projected
    /// onto the axis and the result clamped to the scale.
    pub fn value_at(&self, index: usize, point: Point) -> f64 {
        if self.radius <= 0.0 {
            return self.scale.min;
        }
        let (dx, dy) = self.axis_direction(index);
        let along = (point.x - self.center.x) * dx + (point.y - self.center.y) * dy;
        self.scale
            .clamp(self.scale.min + along / self.radius * self.scale.span())
    }

    /// Index of the vertex closest to `point` within `tolerance` pixels.
    pub fn nearest_vertex(&self, values: &[f64], point: Point, tolerance: f64) -> Option<usize> {
        if self.radius <= 0.0 {
            return None;
        }
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| (i, self.vertex_position(i, v).distance_to(point)))
            .filter(|&(_, d)| d <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }
}

/// Rendering surface for the threshold polygon.
///
/// Dropping a surface releases whatever the renderer holds for it.
pub trait RadarSurface {
    fn layout(&self) -> RadarGeometry;

    /// Redraw the polygon immediately, without animation.
    fn redraw(&mut self, values: &[f64]);

    fn vertex_positions(&self, values: &[f64]) -> Vec<Point> {
        let geometry = self.layout();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| geometry.vertex_position(i, v))
            .collect()
    }

    fn hit_test(&self, values: &[f64], point: Point) -> Option<usize> {
        self.layout().nearest_vertex(values, point, HIT_RADIUS_PX)
    }

    fn value_for_pixel(&self, index: usize, point: Point) -> f64 {
        self.layout().value_at(index, point)
    }
}

/// A live Chart.js radar bound to a canvas.
pub struct ChartJsSurface {
    chart: JsValue,
    scale: ScaleRange,
    axis_count: usize,
}

impl ChartJsSurface {
    pub fn create(
        canvas: &HtmlCanvasElement,
        selection: &MetricSelection,
        values: &[f64],
        scale: ScaleRange,
    ) -> Self {
        let labels = serde_wasm_bindgen::to_value(selection.as_slice()).unwrap_or(JsValue::NULL);
        let chart = create_radar_chart(
            canvas,
            labels,
            to_js_values(values),
            scale.min,
            scale.max,
            CHART_TITLE,
        );
        Self {
            chart,
            scale,
            axis_count: selection.len(),
        }
    }
}

fn to_js_values(values: &[f64]) -> JsValue {
    serde_wasm_bindgen::to_value(values).unwrap_or(JsValue::NULL)
}

impl RadarSurface for ChartJsSurface {
    fn layout(&self) -> RadarGeometry {
        let layout = serde_wasm_bindgen::from_value::<RadarLayout>(radar_layout(&self.chart))
            .unwrap_or_else(|e| {
                warn!("Chart layout unavailable: {}", e);
                RadarLayout::default()
            });
        RadarGeometry::new(layout, self.scale, self.axis_count)
    }

    fn redraw(&mut self, values: &[f64]) {
        update_radar_chart(&self.chart, to_js_values(values));
    }
}

impl Drop for ChartJsSurface {
    fn drop(&mut self) {
        destroy_radar_chart(&self.chart);
    }
}
