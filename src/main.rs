//! Main module for the FPL polygon filter using Yew.
//! Wires the filter session, canvas pointer events and view components.

use fpl_polygon::{
    chart::{ChartJsSurface, Point},
    components::{
        render_load_status, render_suggestions, CanvasCursor, MetricPicker,
        ThresholdReadout,
    },
    config::{CHART_CANVAS_ID, METRIC_CATALOGUE, PLAYERS_ENDPOINT},
    loader::fetch_players,
    session::{ChartSnapshot, FilterSession},
    PlayerRecord,
};
use log::{error, warn};
use std::collections::BTreeSet;
use std::rc::Rc;
use web_sys::HtmlCanvasElement;
use yew::prelude::*;

type Session = FilterSession<ChartJsSurface>;

#[derive(Clone, PartialEq)]
enum LoadState {
    Loading,
    Ready(Rc<[PlayerRecord]>),
    Failed(String),
}

fn pointer(e: &MouseEvent) -> Point {
    Point::new(e.offset_x() as f64, e.offset_y() as f64)
}

/// Primary application component wiring state, effects, and UI elements.
#[function_component(Main)]
fn main_component() -> Html {
    let load_state = use_state(|| LoadState::Loading);
    // Bumped by the Retry button to refetch
    let load_attempt = use_state(|| 0u32);
    let session = use_mut_ref(|| None::<Session>);
    let checked = use_state(|| Rc::new(BTreeSet::<String>::new()));
    let snapshot = use_state(|| None::<Rc<ChartSnapshot>>);
    let cursor = use_state_eq(|| CanvasCursor::Default);
    let canvas_ref = use_node_ref();

    // Fetch players on mount and on every retry
    {
        let load_state = load_state.clone();
        let session = session.clone();
        let snapshot = snapshot.clone();
        use_effect_with(*load_attempt, move |_| {
            load_state.set(LoadState::Loading);
            wasm_bindgen_futures::spawn_local(async move {
                match fetch_players(PLAYERS_ENDPOINT).await {
                    Ok(players) => {
                        let players: Rc<[PlayerRecord]> = players.into();
                        *session.borrow_mut() = Some(FilterSession::new(players.clone()));
                        snapshot.set(None);
                        load_state.set(LoadState::Ready(players));
                    }
                    Err(err) => {
                        *session.borrow_mut() = None;
                        snapshot.set(None);
                        load_state.set(LoadState::Failed(err.to_string()));
                    }
                }
            });
            || ()
        });
    }

    let on_retry = {
        let load_attempt = load_attempt.clone();
        Callback::from(move |_: MouseEvent| load_attempt.set(load_attempt.wrapping_add(1)))
    };

    let on_toggle = {
        let checked = checked.clone();
        Callback::from(move |(metric, on): (String, bool)| {
            let mut next = (**checked).clone();
            if on {
                next.insert(metric);
            } else {
                next.remove(&metric);
            }
            checked.set(Rc::new(next));
        })
    };

    let on_draw = {
        let session = session.clone();
        let checked = checked.clone();
        let snapshot = snapshot.clone();
        let cursor = cursor.clone();
        let canvas_ref = canvas_ref.clone();
        Callback::from(move |_: MouseEvent| {
            let mut guard = session.borrow_mut();
            let Some(session) = guard.as_mut() else {
                warn!("Draw requested before players finished loading");
                return;
            };
            let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() else {
                error!("Chart canvas #{} is not mounted", CHART_CANVAS_ID);
                return;
            };

            // catalogue order, like reading the checkboxes top to bottom
            let picked = METRIC_CATALOGUE
                .iter()
                .filter(|m| checked.contains(**m))
                .map(|m| m.to_string());

            match session.draw(picked, |selection, values, scale| {
                ChartJsSurface::create(&canvas, selection, values, scale)
            }) {
                Ok(snap) => {
                    cursor.set(CanvasCursor::Default);
                    snapshot.set(Some(Rc::new(snap)));
                }
                Err(err) => {
                    if gloo_utils::window().alert_with_message(&err.to_string()).is_err() {
                        error!("Could not show alert: {}", err);
                    }
                }
            }
        })
    };

    let on_mouse_down = {
        let session = session.clone();
        let cursor = cursor.clone();
        Callback::from(move |e: MouseEvent| {
            if let Some(session) = session.borrow_mut().as_mut() {
                if session.press(pointer(&e)) {
                    cursor.set(CanvasCursor::Grabbing);
                }
            }
        })
    };

    let on_mouse_move = {
        let session = session.clone();
        let snapshot = snapshot.clone();
        let cursor = cursor.clone();
        Callback::from(move |e: MouseEvent| {
            let point = pointer(&e);
            let mut guard = session.borrow_mut();
            let Some(session) = guard.as_mut() else {
                return;
            };
            match session.drag_to(point) {
                Some(snap) => snapshot.set(Some(Rc::new(snap))),
                None if session.hovering(point) => cursor.set(CanvasCursor::Grab),
                None => cursor.set(CanvasCursor::Default),
            }
        })
    };

    let on_mouse_up = {
        let session = session.clone();
        let cursor = cursor.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(session) = session.borrow_mut().as_mut() {
                session.release();
                cursor.set(CanvasCursor::Grab);
            }
        })
    };

    let on_mouse_out = {
        let session = session.clone();
        let cursor = cursor.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(session) = session.borrow_mut().as_mut() {
                session.leave();
            }
            cursor.set(CanvasCursor::Default);
        })
    };

    let (loading, load_error) = match &*load_state {
        LoadState::Loading => (true, None),
        LoadState::Ready(_) => (false, None),
        LoadState::Failed(msg) => (false, Some(msg.as_str())),
    };
    let player_count = match &*load_state {
        LoadState::Ready(players) => players.len(),
        _ => 0,
    };
    let can_draw = matches!(*load_state, LoadState::Ready(_));

    html! {
        <div class="container">
            <h1>{ "FPL Polygon Filter" }</h1>

            { render_load_status(loading, load_error, on_retry) }

            <div class="controls">
                <MetricPicker metrics={METRIC_CATALOGUE} checked={(*checked).clone()} {on_toggle} />
                <button id="drawPolygonBtn" class="btn-primary" disabled={!can_draw} onclick={on_draw}>
                    { "Draw Polygon" }
                </button>
                if can_draw {
                    <span class="player-count">{ format!("{} players loaded", player_count) }</span>
                }
            </div>

            <div class="chart-section" style={cursor.style()}>
                <canvas id={CHART_CANVAS_ID}
                    ref={canvas_ref}
                    onmousedown={on_mouse_down}
                    onmousemove={on_mouse_move}
                    onmouseup={on_mouse_up}
                    onmouseout={on_mouse_out}
                ></canvas>
            </div>

            if let Some(snap) = &*snapshot {
                <ThresholdReadout metrics={snap.metrics.clone()} thresholds={snap.thresholds.clone()} />
            }

            <div class="results-area">
                <h3>{ "Suggested Players" }</h3>
                { render_suggestions((*snapshot).as_ref().map(|s| s.suggestions.as_slice())) }
            </div>
        </div>
    }
}

/// Entry point: sets up console logging and renders the app.
fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<Main>::new().render();
}
