//! WASM bindings for the scribe rich-text editor.
//!
//! Loading the module installs the panic hook and a console tracing
//! subscriber. `mountScribe()` then attaches the editor to a page.

mod actions;
mod editor;
mod types;

pub use actions::*;
pub use editor::*;
pub use types::*;

use wasm_bindgen::prelude::*;

/// Initialize panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    init_tracing("info");
}

/// Install the console subscriber with the given filter directives.
/// Only the first call has an effect.
fn init_tracing(directives: &str) {
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::TRACE)
            .build(),
    );
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"));
    let reg = Registry::default().with(filter).with(wasm_layer);

    let _ = set_global_default(reg);
}
