pub mod dom;
pub mod error;
pub mod listener;
pub mod media;
pub mod service;
pub mod zoom;

#[cfg(test)]
mod test_support;

pub use error::ZoomError;
pub use media::MediaElement;
pub use service::ZoomService;
pub use zoom::Zoom;

use gloo_utils::format::JsValueSerdeExt;
use mediazoom_core::ZoomConfig;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);
}

/// Build a config from an optional JS options object. `undefined` and `null`
/// give the defaults.
pub fn config_from_options(options: &JsValue) -> Result<ZoomConfig, ZoomError> {
    if options.is_undefined() || options.is_null() {
        return Ok(ZoomConfig::default());
    }

    let config: ZoomConfig = options
        .into_serde()
        .map_err(|e| ZoomError::InvalidOptions(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// JS handle to a zoom service. Dropping (or `free()`ing) it closes any open
/// zoom and stops listening.
#[wasm_bindgen]
pub struct MediaZoom {
    service: ZoomService,
}

#[wasm_bindgen]
impl MediaZoom {
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<MediaZoom, JsValue> {
        let config = config_from_options(&options)?;
        Ok(Self {
            service: ZoomService::new(config)?,
        })
    }

    pub fn listen(&mut self) -> Result<(), JsValue> {
        self.service.listen()?;
        Ok(())
    }

    /// Close the open zoom; `force` skips the animation.
    pub fn close(&self, force: Option<bool>) {
        self.service.close(force.unwrap_or(false));
    }

    #[wasm_bindgen(getter, js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.service.is_open()
    }
}

/// Start zooming for the rest of the page's life.
#[wasm_bindgen]
pub fn listen(options: JsValue) -> Result<(), JsValue> {
    let mut service = ZoomService::new(config_from_options(&options)?)?;
    service.listen()?;
    // Keep the service and its body listener alive
    std::mem::forget(service);
    Ok(())
}
