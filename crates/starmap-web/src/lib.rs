pub mod runner;

pub use runner::{MapHost, MapRunner};

use wasm_bindgen::prelude::*;

/// Draw order of the map's sub-layers, bottom first, as `MapLayer` indices.
/// The host sorts its containers by this.
#[wasm_bindgen]
pub fn map_layer_order() -> Vec<u8> {
    starmap_engine::MapLayer::DRAW_ORDER
        .iter()
        .map(|layer| layer.as_u8())
        .collect()
}

/// Route `log` output to the browser console and install the panic hook.
/// Safe to call on every init; only the first call installs the logger.
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::debug_1(&JsValue::from_str("starmap: logger already installed"));
    }
}

/// Turn an engine error into a JS exception value.
pub fn to_js_error(err: starmap_engine::MapError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Generate all `#[wasm_bindgen]` exports for a map front end.
///
/// Generates:
/// - `thread_local!` storage for the MapRunner
/// - `with_runner()` helper function
/// - wasm-bindgen exports for init, tick, input, commands and teardown
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use starmap_web::MapHost;
///
/// mod host;
/// use host::CanvasHost;
///
/// starmap_web::export_map!(CanvasHost, "galaxy-map");
/// ```
///
/// # Arguments
///
/// - `$host_type`: A type implementing `starmap_web::MapHost` with a `new()` constructor
/// - `$map_name`: A string literal used in the initialization log message
#[macro_export]
macro_rules! export_map {
    ($host_type:ty, $map_name:literal) => {
        use std::cell::RefCell;

        type HostRunner = $crate::MapRunner<<$host_type as $crate::MapHost>::Factory>;

        thread_local! {
            static RUNNER: RefCell<Option<HostRunner>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut HostRunner) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.as_mut().expect("Map not initialized. Call map_init() first.");
                f(runner)
            })
        }

        #[wasm_bindgen]
        pub fn map_init(
            galaxy_json: &str,
            settings_json: &str,
            config_json: &str,
            screen_width: f32,
            screen_height: f32,
        ) -> Result<(), JsValue> {
            $crate::init_logging();

            let mut host = <$host_type>::new();
            let factory = $crate::MapHost::factory(&mut host);
            let layers = $crate::MapHost::layers(&mut host);
            let runner = $crate::MapRunner::from_json(
                factory,
                layers,
                galaxy_json,
                settings_json,
                config_json,
                screen_width,
                screen_height,
            )
            .map_err($crate::to_js_error)?;

            RUNNER.with(|cell| {
                // Replacing a previous runner drops it, which tears it down.
                *cell.borrow_mut() = Some(runner);
            });

            log::info!("{}: initialized", $map_name);
            Ok(())
        }

        #[wasm_bindgen]
        pub fn map_tick(dt: f32) -> bool {
            with_runner(|r| r.tick(dt))
        }

        #[wasm_bindgen]
        pub fn map_draw() {
            with_runner(|r| r.draw());
        }

        #[wasm_bindgen]
        pub fn map_reload(galaxy_json: &str, settings_json: &str) -> Result<(), JsValue> {
            with_runner(|r| r.reload_json(galaxy_json, settings_json)).map_err($crate::to_js_error)
        }

        #[wasm_bindgen]
        pub fn map_resize(screen_width: f32, screen_height: f32) {
            with_runner(|r| r.resize(screen_width, screen_height));
        }

        #[wasm_bindgen]
        pub fn map_set_view(center_x: f32, center_y: f32, world_width: f32, world_height: f32) {
            with_runner(|r| r.set_view(center_x, center_y, world_width, world_height));
        }

        #[wasm_bindgen]
        pub fn map_zoom_percent() -> f32 {
            with_runner(|r| r.zoom_percent())
        }

        // ---- Input ----

        #[wasm_bindgen]
        pub fn map_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.pointer_down(x, y));
        }

        #[wasm_bindgen]
        pub fn map_star_clicked(star: &str, x: f32, y: f32, modifier: bool, try_multi_select: bool) {
            with_runner(|r| r.star_clicked(star, x, y, modifier, try_multi_select));
        }

        #[wasm_bindgen]
        pub fn map_star_right_clicked(star: &str, x: f32, y: f32, modifier: bool) {
            with_runner(|r| r.star_right_clicked(star, x, y, modifier));
        }

        #[wasm_bindgen]
        pub fn map_carrier_clicked(carrier: &str, x: f32, y: f32, try_multi_select: bool) {
            with_runner(|r| r.carrier_clicked(carrier, x, y, try_multi_select));
        }

        #[wasm_bindgen]
        pub fn map_carrier_right_clicked(carrier: &str, x: f32, y: f32) {
            with_runner(|r| r.carrier_right_clicked(carrier, x, y));
        }

        // ---- Event channel ----

        #[wasm_bindgen]
        pub fn map_send_command(json: &str) -> Result<bool, JsValue> {
            with_runner(|r| r.send_command_json(json)).map_err($crate::to_js_error)
        }

        #[wasm_bindgen]
        pub fn map_drain_notifications() -> Result<String, JsValue> {
            with_runner(|r| r.drain_notifications_json()).map_err($crate::to_js_error)
        }

        // ---- Teardown ----

        #[wasm_bindgen]
        pub fn map_destroy() {
            RUNNER.with(|cell| {
                if let Some(mut runner) = cell.borrow_mut().take() {
                    runner.destroy();
                }
            });
            log::info!("{}: destroyed", $map_name);
        }
    };
}
