use libadwaita as adw;

use adw::prelude::*;

mod app;
mod capture;
mod error;
mod selection;
mod store;
mod ui;

const APP_ID: &str = "org.example.ElementLabeler";

fn main() -> gtk4::glib::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(ui::build_ui);
    app.run()
}
