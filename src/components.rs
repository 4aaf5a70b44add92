//! Pure Yew view components for the polygon filter page.
//!
//! These render from props; session state lives in `main.rs`.

use crate::config::{FALLBACK_PHOTO_URL, NO_MATCHES_MESSAGE};
use crate::utils::format_threshold;
use crate::Suggestion;
use std::collections::BTreeSet;
use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Checkbox group for choosing the chart metrics.
#[derive(Properties, PartialEq)]
pub struct MetricPickerProps {
    pub metrics: &'static [&'static str],
    pub checked: Rc<BTreeSet<String>>,
    pub on_toggle: Callback<(String, bool)>,
}

#[function_component(MetricPicker)]
pub fn metric_picker(props: &MetricPickerProps) -> Html {
    html! {
        <div class="metric-options">
            { props.metrics.iter().map(|&metric| {
                let on_toggle = props.on_toggle.clone();
                let onchange = Callback::from(move |e: Event| {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    on_toggle.emit((metric.to_string(), input.checked()));
                });
                html! {
                    <label class="metric-option">
                        <input type="checkbox"
                            value={metric}
                            checked={props.checked.contains(metric)}
                            {onchange}
                        />
                        { metric }
                    </label>
                }
            }).collect::<Html>() }
        </div>
    }
}

/// Current threshold per metric, shown under the chart.
#[derive(Properties, PartialEq)]
pub struct ThresholdReadoutProps {
    pub metrics: Vec<String>,
    pub thresholds: Vec<f64>,
}

#[function_component(ThresholdReadout)]
pub fn threshold_readout(props: &ThresholdReadoutProps) -> Html {
    html! {
        <ul class="threshold-readout">
            { props.metrics.iter().zip(&props.thresholds).map(|(metric, &value)| html! {
                <li>
                    <span class="threshold-metric">{ metric.clone() }</span>
                    <span class="threshold-value">{ format!(">= {}", format_threshold(value)) }</span>
                </li>
            }).collect::<Html>() }
        </ul>
    }
}

/// Pointer feedback over the chart. Applied to the chart's wrapper so the
/// canvas inherits it; Chart.js owns the canvas's own inline style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanvasCursor {
    #[default]
    Default,
    Grab,
    Grabbing,
}

impl CanvasCursor {
    pub fn style(self) -> &'static str {
        match self {
            CanvasCursor::Default => "cursor: default;",
            CanvasCursor::Grab => "cursor: grab;",
            CanvasCursor::Grabbing => "cursor: grabbing;",
        }
    }
}

/// Image source for a card, the placeholder once the real photo failed.
pub fn photo_src(photo_url: &str, failed: bool) -> String {
    if failed {
        FALLBACK_PHOTO_URL.to_string()
    } else {
        photo_url.to_string()
    }
}

#[derive(Properties, PartialEq)]
pub struct PlayerCardProps {
    pub suggestion: Suggestion,
}

/// One suggested player. A photo that fails to load is swapped for the
/// placeholder image once.
#[function_component(PlayerCard)]
pub fn player_card(props: &PlayerCardProps) -> Html {
    let photo_failed = use_state_eq(|| false);
    let s = &props.suggestion;

    // a different player landed in this slot
    {
        let photo_failed = photo_failed.clone();
        use_effect_with(s.photo_url.clone(), move |_| {
            photo_failed.set(false);
            || ()
        });
    }

    let src = photo_src(&s.photo_url, *photo_failed);
    let onerror = {
        let photo_failed = photo_failed.clone();
        Callback::from(move |_: Event| photo_failed.set(true))
    };

    html! {
        <div class="player-card" title={s.to_string()}>
            <img {src} alt={s.name.clone()} {onerror} />
            <div>
                <strong>{ s.name.clone() }</strong><br />
                <small>{ format!("{} | {}", s.team, s.position) }</small><br />
                <small class="player-points">{ format!("Points: {}", s.points) }</small>
            </div>
        </div>
    }
}

/// Renders the suggestion panel. `None` means no chart has been drawn yet.
pub fn render_suggestions(suggestions: Option<&[Suggestion]>) -> Html {
    let body = match suggestions {
        None => html! {},
        Some([]) => html! { <p>{ NO_MATCHES_MESSAGE }</p> },
        Some(cards) => cards
            .iter()
            .map(|s| html! { <PlayerCard suggestion={s.clone()} /> })
            .collect::<Html>(),
    };

    html! {
        <div id="suggestion-list" class="suggestion-list">
            { body }
        </div>
    }
}

/// Banner shown while the players payload is loading or after it failed.
pub fn render_load_status(loading: bool, error: Option<&str>, on_retry: Callback<MouseEvent>) -> Html {
    if let Some(err) = error {
        return html! {
            <div class="load-error">
                <span>{ err }</span>
                <button class="btn-secondary small" onclick={on_retry}>{ "Retry" }</button>
            </div>
        };
    }
    if loading {
        return html! { <div class="load-status">{ "Loading players..." }</div> };
    }
    html! {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use yew::ServerRenderer;

    #[derive(Properties, PartialEq)]
    struct PanelProps {
        suggestions: Option<Vec<Suggestion>>,
    }

    #[function_component(Panel)]
    fn panel(props: &PanelProps) -> Html {
        render_suggestions(props.suggestions.as_deref())
    }

    fn render_panel(suggestions: Option<Vec<Suggestion>>) -> String {
        let renderer = ServerRenderer::<Panel>::with_props(move || PanelProps { suggestions })
            .hydratable(false);
        futures::executor::block_on(renderer.render())
    }

    fn suggestion(name: &str, points: &str) -> Suggestion {
        Suggestion {
            name: name.to_string(),
            team: "X".to_string(),
            position: "MID".to_string(),
            points: points.to_string(),
            photo_url: format!("https://example.test/{}.png", name),
        }
    }

    #[test]
    fn empty_result_renders_only_the_message() {
        let html = render_panel(Some(Vec::new()));
        assert!(html.contains(&format!("<p>{}</p>", NO_MATCHES_MESSAGE)));
        assert!(!html.contains("player-card"));
    }

    #[test]
    fn one_card_per_suggestion() {
        let html = render_panel(Some(vec![suggestion("A", "80"), suggestion("B", "95")]));
        assert_eq!(html.matches("class=\"player-card\"").count(), 2);
        assert!(html.contains("Points: 80"));
        assert!(html.contains("https://example.test/B.png"));
        assert!(!html.contains(NO_MATCHES_MESSAGE));
    }

    #[test]
    fn nothing_listed_before_a_draw() {
        let html = render_panel(None);
        assert!(html.contains("suggestion-list"));
        assert!(!html.contains("<p>"));
        assert!(!html.contains("player-card"));
    }

    #[test]
    fn failed_photo_uses_placeholder() {
        assert_eq!(photo_src("https://example.test/a.png", false), "https://example.test/a.png");
        assert_eq!(photo_src("https://example.test/a.png", true), FALLBACK_PHOTO_URL);
    }

    #[test]
    fn cursor_style_only_sets_cursor() {
        for cursor in [CanvasCursor::Default, CanvasCursor::Grab, CanvasCursor::Grabbing] {
            let style = cursor.style();
            assert!(style.starts_with("cursor: "));
            assert_eq!(style.matches(';').count(), 1);
        }
        assert_eq!(CanvasCursor::Grabbing.style(), "cursor: grabbing;");
    }
}
