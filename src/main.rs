use gtk4::glib;
use translucent_demo::config::DemoConfig;

fn load_config() -> anyhow::Result<DemoConfig> {
    let config = match std::env::args_os().nth(1) {
        Some(path) => DemoConfig::load(path)?,
        None => DemoConfig::default(),
    };
    Ok(config.with_env_overrides()?)
}

fn main() -> glib::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e:#}");
            return glib::ExitCode::FAILURE;
        }
    };

    match translucent_demo::window::run(config) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e}");
            glib::ExitCode::FAILURE
        }
    }
}
