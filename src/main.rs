use std::rc::Rc;

use ferriplay::{
    components::{App, AppProps},
    config::PlayerConfig,
};

fn main() {
    let config = PlayerConfig::from_build_env();
    let level = config
        .as_ref()
        .map(|config| config.log_level)
        .unwrap_or(log::Level::Info);

    wasm_logger::init(wasm_logger::Config::new(level));

    let config = config.unwrap_or_else(|err| {
        log::error!("Invalid configuration, using the defaults: {}", err);
        PlayerConfig::default()
    });

    log::debug!("Starting with {:?}", config);
    yew::Renderer::<App>::with_props(AppProps {
        config: Rc::new(config),
    })
    .render();
}
