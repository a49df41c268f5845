use leptos::html::Canvas;
use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;

use crate::{
    application::{DashboardSession, RefreshOrchestrator, status_message},
    config::DashboardConfig,
    domain::{
        chart::Point,
        errors::{AppError, StartupError},
        logging::{LogComponent, get_logger},
    },
    event_utils::{WindowEventListenerHandle, on_page_exit, on_window_resize},
    global_signals,
    infrastructure::{BinancePriceClient, GlooTimer, LocalStorageGateway, rendering::CanvasRenderer},
    ui::DashboardLayout,
};

global_signals! {
    store_revision => store_revision: u64,
    ui_revision => ui_revision: u64,
    status_line => status: String,
}

/// Session plus the renderer bound to the mounted canvas
struct Runtime {
    session: DashboardSession,
    renderer: CanvasRenderer,
}

type SharedRuntime = Rc<RefCell<Option<Runtime>>>;

fn device_pixel_ratio() -> f64 {
    web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0)
}

/// Size the canvas backing store to its CSS box times the pixel ratio.
fn fit_canvas(canvas: &web_sys::HtmlCanvasElement) -> DashboardLayout {
    let scale = device_pixel_ratio();
    let width = (canvas.client_width().max(1) as f64 * scale).round();
    let height = (canvas.client_height().max(1) as f64 * scale).round();
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);
    DashboardLayout::new(width, height, scale)
}

/// `?symbols=BTCUSDT,ETHUSDT&interval_ms=2000` style overrides
fn query_overrides() -> Vec<(String, String)> {
    let search = web_sys::window().and_then(|w| w.location().search().ok()).unwrap_or_default();
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(key, value)| {
            let decoded = js_sys::decode_uri_component(value).map(String::from).unwrap_or_else(|_| value.to_string());
            (key.to_string(), decoded)
        })
        .collect()
}

fn redraw(runtime: &SharedRuntime) {
    let Ok(guard) = runtime.try_borrow() else {
        return;
    };
    if let Some(rt) = guard.as_ref() {
        if let Err(e) = rt.session.render_with(|frame| rt.renderer.draw(frame)) {
            get_logger().error(LogComponent::Presentation("Dashboard"), &format!("draw failed: {e:?}"));
        }
    }
}

fn flush(runtime: &SharedRuntime) {
    if let Ok(guard) = runtime.try_borrow() {
        if let Some(rt) = guard.as_ref() {
            // Failure is already logged by the session.
            let _ = rt.session.flush();
        }
    }
}

fn start(canvas: &web_sys::HtmlCanvasElement, runtime: &SharedRuntime) -> Vec<WindowEventListenerHandle> {
    match try_start(canvas, runtime) {
        Ok(handles) => handles,
        Err(e) => {
            get_logger().error(LogComponent::Presentation("Dashboard"), &e.to_string());
            status_line().set(status_message(&e));
            Vec::new()
        }
    }
}

fn try_start(
    canvas: &web_sys::HtmlCanvasElement,
    runtime: &SharedRuntime,
) -> Result<Vec<WindowEventListenerHandle>, AppError> {
    if canvas.client_width() <= 0 || canvas.client_height() <= 0 {
        return Err(StartupError::CanvasUnavailable("canvas has no layout box".into()).into());
    }
    let overrides = query_overrides();
    let config = DashboardConfig::default().apply_overrides(overrides.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    let layout = fit_canvas(canvas);

    let gateway = Rc::new(LocalStorageGateway::new(config.storage_key.clone()));
    let session = DashboardSession::bootstrap(config.clone(), gateway, layout)?;
    let renderer = CanvasRenderer::attach(canvas)?;
    let session = session.with_text_measure(Rc::new(renderer.text_measure()));
    match session.load_error() {
        Some(e) => status_line().set(status_message(&AppError::from(e.clone()))),
        None => status_line().set(format!("Tracking {} symbols", config.symbols.len())),
    }

    let orchestrator = RefreshOrchestrator::new(
        Rc::new(BinancePriceClient::new(config.base_url.clone())),
        Rc::new(GlooTimer),
        session.store().clone(),
        config.update_interval,
        config.request_timeout,
    )
    .with_commit_listener(|_, _| store_revision().update(|r| *r += 1))
    .with_cycle_listener(|report| status_line().set(report.status_line()));

    *runtime.borrow_mut() = Some(Runtime { session, renderer });
    redraw(runtime);
    spawn_local(async move { orchestrator.run_forever().await });

    let mut handles = {
        let runtime = runtime.clone();
        on_page_exit(move || flush(&runtime))
    };
    let runtime = runtime.clone();
    let canvas = canvas.clone();
    handles.push(on_window_resize(move |_| {
        let layout = fit_canvas(&canvas);
        if let Some(rt) = runtime.borrow_mut().as_mut() {
            rt.session.resize(layout.width, layout.height, layout.scale);
        }
        ui_revision().update(|r| *r += 1);
    }));
    Ok(handles)
}

/// Price dashboard root component
#[component]
pub fn App() -> impl IntoView {
    view! {
        <style>
            {r#"
            html, body { margin: 0; height: 100%; background: #121418; }
            .dashboard-app {
                font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
                color: #c8c8c8;
                height: 100vh;
                display: flex;
                flex-direction: column;
            }
            .dashboard-canvas { flex: 1; width: 100%; min-height: 0; display: block; cursor: pointer; }
            .status { font-size: 12px; padding: 4px 12px; background: #282b31; }
            "#}
        </style>
        <div class="dashboard-app">
            <Dashboard />
        </div>
    }
}

#[component]
fn Dashboard() -> impl IntoView {
    let canvas_ref = create_node_ref::<Canvas>();
    let runtime: SharedRuntime = Rc::new(RefCell::new(None));
    let listeners: Rc<RefCell<Vec<WindowEventListenerHandle>>> = Rc::new(RefCell::new(Vec::new()));

    {
        let runtime = runtime.clone();
        let listeners = listeners.clone();
        create_effect(move |started: Option<bool>| {
            if started == Some(true) {
                return true;
            }
            let Some(canvas) = canvas_ref.get() else {
                return false;
            };
            let handles = start(&canvas, &runtime);
            listeners.borrow_mut().extend(handles);
            true
        });
    }

    {
        let runtime = runtime.clone();
        create_effect(move |_| {
            let _ = (store_revision().get(), ui_revision().get());
            redraw(&runtime);
        });
    }

    on_cleanup({
        let runtime = runtime.clone();
        move || {
            flush(&runtime);
            for handle in listeners.borrow_mut().drain(..) {
                crate::log_debug!(LogComponent::Presentation("Dashboard"), "removing {} listener", handle.event_name());
                handle.remove();
            }
        }
    });

    let handle_mouse_down = move |event: web_sys::MouseEvent| {
        let scale = device_pixel_ratio();
        let point = Point::new(event.offset_x() as f64 * scale, event.offset_y() as f64 * scale);
        let handled = runtime
            .borrow_mut()
            .as_mut()
            .map(|rt| rt.session.press(point).is_handled())
            .unwrap_or(false);
        if handled {
            ui_revision().update(|r| *r += 1);
        }
    };

    view! {
        <canvas class="dashboard-canvas" node_ref=canvas_ref on:mousedown=handle_mouse_down />
        <div class="status">{move || status_line().get()}</div>
    }
}
