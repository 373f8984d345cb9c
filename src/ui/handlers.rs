use gtk4 as gtk;
use libadwaita as adw;
use log::{debug, info};

use gtk::GestureDrag;
use gtk4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

use crate::app::Session;
use crate::error::Result;
use crate::ui::canvas::CanvasComponents;
use crate::ui::clipboard::ClipboardManager;
use crate::ui::dialogs::show_error;
use crate::ui::panel::{create_element_row, PanelComponents};

#[derive(Clone)]
pub struct UiComponents {
    pub window: adw::ApplicationWindow,
    pub canvas: CanvasComponents,
    pub panel: PanelComponents,
}

pub fn connect_capture_handler(session: &Rc<RefCell<Session>>, components: &UiComponents) {
    components.canvas.capture_btn.connect_clicked({
        let session = session.clone();
        let components = components.clone();
        move |_| {
            capture_screenshot(&session, &components);
        }
    });
}

pub fn capture_screenshot(session: &Rc<RefCell<Session>>, components: &UiComponents) {
    debug!("Screenshot requested");
    run_blocking(session, components, |s| s.capture());
}

/// Run a blocking external call with the capture controls disabled, then
/// redraw the screenshot.
fn run_blocking(
    session: &Rc<RefCell<Session>>,
    components: &UiComponents,
    operation: impl FnOnce(&mut Session) -> Result<()>,
) {
    let started = session.borrow_mut().try_begin_busy();
    if let Err(e) = started {
        show_error(&components.window, &e);
        return;
    }
    set_busy(components, true);

    // let the insensitive state reach the screen before blocking
    let context = gtk::glib::MainContext::default();
    while context.pending() {
        context.iteration(false);
    }

    let result = {
        let mut s = session.borrow_mut();
        let result = operation(&mut *s);
        s.end_busy();
        result
    };
    set_busy(components, false);

    match result {
        Ok(()) => refresh_source(session, components),
        Err(e) => show_error(&components.window, &e),
    }
}

fn set_busy(components: &UiComponents, busy: bool) {
    components.canvas.capture_btn.set_sensitive(!busy);
    components.panel.element_list.set_sensitive(!busy);
    components.panel.save_btn.set_sensitive(!busy);
}

/// Redraw the canvas after the source image changed
pub fn refresh_source(session: &Rc<RefCell<Session>>, components: &UiComponents) {
    let s = session.borrow();
    components.canvas.show_source(&s);
    components.panel.show_preview(s.cropped());
}

pub fn connect_drag_handlers(session: &Rc<RefCell<Session>>, components: &UiComponents) {
    debug!("Connecting drag handlers");
    let drag = GestureDrag::new();
    drag.set_button(1);

    drag.connect_drag_begin({
        let session = session.clone();
        let panel = components.panel.clone();
        let drawing_area = components.canvas.drawing_area.clone();
        move |_, x, y| {
            let mut s = session.borrow_mut();
            s.press(x, y);
            panel.show_preview(s.cropped());
            drop(s);
            drawing_area.queue_draw();
        }
    });

    drag.connect_drag_update({
        let session = session.clone();
        let drawing_area = components.canvas.drawing_area.clone();
        move |gesture, offset_x, offset_y| {
            if let Some((start_x, start_y)) = gesture.start_point() {
                session
                    .borrow_mut()
                    .drag(start_x + offset_x, start_y + offset_y);
                drawing_area.queue_draw();
            }
        }
    });

    drag.connect_drag_end({
        let session = session.clone();
        let components = components.clone();
        move |gesture, offset_x, offset_y| {
            if let Some((start_x, start_y)) = gesture.start_point() {
                handle_release(&session, &components, start_x + offset_x, start_y + offset_y);
            }
        }
    });

    components.canvas.drawing_area.add_controller(drag);
}

fn handle_release(session: &Rc<RefCell<Session>>, components: &UiComponents, x: f64, y: f64) {
    let mut s = session.borrow_mut();
    let cropped = s.release(x, y);
    if let Some(cropped) = cropped {
        debug!("Cropped {}x{}", cropped.width(), cropped.height());
    }
    components.panel.show_preview(cropped);
    drop(s);
    components.canvas.drawing_area.queue_draw();
}

pub fn connect_save_handler(session: &Rc<RefCell<Session>>, components: &UiComponents) {
    components.panel.save_btn.connect_clicked({
        let session = session.clone();
        let components = components.clone();
        move |_| save_element(&session, &components)
    });

    components.panel.name_entry.connect_activate({
        let session = session.clone();
        let components = components.clone();
        move |_| save_element(&session, &components)
    });
}

fn save_element(session: &Rc<RefCell<Session>>, components: &UiComponents) {
    let name = components.panel.name_entry.text().to_string();
    let result = session.borrow_mut().save(&name).map(|_| ());
    match result {
        Ok(()) => render_element_list(session, components),
        Err(e) => show_error(&components.window, &e),
    }
}

/// Rebuild the element list, one row per saved element
pub fn render_element_list(session: &Rc<RefCell<Session>>, components: &UiComponents) {
    let list = &components.panel.element_list;
    list.remove_all();

    let s = session.borrow();
    for (index, record) in s.elements().iter().enumerate() {
        let row = create_element_row(record);

        row.verify_btn.connect_clicked({
            let session = session.clone();
            let components = components.clone();
            move |_| verify_element(&session, &components, index)
        });
        row.delete_btn.connect_clicked({
            let session = session.clone();
            let components = components.clone();
            move |_| delete_element(&session, &components, index)
        });
        row.copy_btn.connect_clicked({
            let session = session.clone();
            let components = components.clone();
            move |_| copy_element_code(&session, &components, index)
        });

        list.append(&row.row);
    }
}

fn verify_element(session: &Rc<RefCell<Session>>, components: &UiComponents, index: usize) {
    debug!("Verifying element {}", index);
    run_blocking(session, components, |s| s.verify(index));
}

fn delete_element(session: &Rc<RefCell<Session>>, components: &UiComponents, index: usize) {
    let result = session.borrow_mut().delete(index);
    match result {
        Ok(_) => render_element_list(session, components),
        Err(e) => show_error(&components.window, &e),
    }
}

fn copy_element_code(session: &Rc<RefCell<Session>>, components: &UiComponents, index: usize) {
    let result = session.borrow().export_snippet(index);
    match result {
        Ok(snippet) => {
            ClipboardManager::from_widget(&components.window).copy_text(&snippet);
            info!("Copied code for element {}", index);
        }
        Err(e) => show_error(&components.window, &e),
    }
}

pub fn connect_all_handlers(session: &Rc<RefCell<Session>>, components: &UiComponents) {
    debug!("Initializing UI handlers");
    connect_capture_handler(session, components);
    connect_drag_handlers(session, components);
    connect_save_handler(session, components);
}
