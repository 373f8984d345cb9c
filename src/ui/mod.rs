pub mod canvas;
pub mod clipboard;
pub mod dialogs;
pub mod handlers;
pub mod panel;

use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;
use gtk::Orientation;
use std::cell::RefCell;
use std::rc::Rc;

use crate::app::{Config, Session};

pub fn build_ui(app: &adw::Application) {
    let config = Config::from_env();
    let panel = panel::create_panel(&config);
    let session = Rc::new(RefCell::new(Session::new(config)));
    let canvas = canvas::create_canvas(&session);

    let content = gtk::Box::builder()
        .orientation(Orientation::Horizontal)
        .build();
    content.append(&canvas.container);
    content.append(&panel.container);

    let toolbar_view = adw::ToolbarView::new();
    toolbar_view.add_top_bar(&adw::HeaderBar::new());
    toolbar_view.set_content(Some(&content));

    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("Template Matching Element Labeler")
        .content(&toolbar_view)
        .build();

    let components = handlers::UiComponents {
        window: window.clone(),
        canvas,
        panel,
    };

    handlers::connect_all_handlers(&session, &components);

    window.present();

    handlers::capture_screenshot(&session, &components);
}
