use gtk4 as gtk;

use gtk::gdk_pixbuf::{Colorspace, InterpType, Pixbuf};
use gtk::{glib, DrawingArea, Orientation};
use gtk4::prelude::*;
use image::RgbaImage;
use std::cell::RefCell;
use std::rc::Rc;

use crate::app::Session;
use crate::selection::{fit_scale, scaled_size};

#[derive(Clone)]
pub struct CanvasComponents {
    pub container: gtk::Box,
    pub drawing_area: DrawingArea,
    pub placeholder_icon: gtk::Image,
    pub capture_btn: gtk::Button,
    /// Source image already scaled to the canvas
    scaled: Rc<RefCell<Option<Pixbuf>>>,
}

pub fn create_canvas(session: &Rc<RefCell<Session>>) -> CanvasComponents {
    let (width, height) = {
        let s = session.borrow();
        (s.config().canvas_width, s.config().canvas_height)
    };

    let drawing_area = DrawingArea::builder()
        .content_width(width as i32)
        .content_height(height as i32)
        .halign(gtk::Align::Start)
        .valign(gtk::Align::Start)
        .build();

    let scaled = Rc::new(RefCell::new(None));
    setup_draw_function(&drawing_area, session, &scaled);

    let placeholder_icon = gtk::Image::builder()
        .icon_name("phone-symbolic")
        .pixel_size(128)
        .opacity(0.2)
        .halign(gtk::Align::Center)
        .valign(gtk::Align::Center)
        .build();

    let overlay = gtk::Overlay::builder().child(&drawing_area).build();
    overlay.add_overlay(&placeholder_icon);

    let capture_btn = gtk::Button::builder()
        .label("Update Screenshot")
        .halign(gtk::Align::Center)
        .build();
    capture_btn.add_css_class("suggested-action");

    let container = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .spacing(12)
        .margin_top(10)
        .margin_bottom(10)
        .margin_start(10)
        .margin_end(10)
        .build();
    container.append(&overlay);
    container.append(&capture_btn);

    CanvasComponents {
        container,
        drawing_area,
        placeholder_icon,
        capture_btn,
        scaled,
    }
}

impl CanvasComponents {
    /// Rebuild the scaled screenshot and resize the canvas to it
    pub fn show_source(&self, session: &Session) {
        let scaled = session.source().and_then(|source| {
            let (width, height) = session.transform().display_size();
            scale_pixbuf(&rgba_to_pixbuf(source), width, height)
        });

        if let Some(ref pixbuf) = scaled {
            self.drawing_area.set_content_width(pixbuf.width());
            self.drawing_area.set_content_height(pixbuf.height());
        }
        self.placeholder_icon.set_visible(scaled.is_none());
        *self.scaled.borrow_mut() = scaled;
        self.drawing_area.queue_draw();
    }
}

fn setup_draw_function(
    drawing_area: &DrawingArea,
    session: &Rc<RefCell<Session>>,
    scaled: &Rc<RefCell<Option<Pixbuf>>>,
) {
    drawing_area.set_draw_func({
        let session = session.clone();
        let scaled = scaled.clone();
        move |_, cr, _width, _height| {
            draw_content(&session, &scaled, cr);
        }
    });
}

fn draw_content(
    session: &Rc<RefCell<Session>>,
    scaled: &Rc<RefCell<Option<Pixbuf>>>,
    cr: &gtk::cairo::Context,
) {
    cr.set_source_rgb(0.14, 0.14, 0.14);
    let _ = cr.paint();

    if let Some(ref pixbuf) = *scaled.borrow() {
        cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        let _ = cr.paint();
    }

    // a handler may still hold the session
    let Ok(s) = session.try_borrow() else {
        return;
    };

    if let Some(selection) = s.visual_selection() {
        let (x, y, w, h) = selection.rectangle();
        cr.set_source_rgb(1.0, 0.0, 0.0);
        cr.set_line_width(2.0);
        cr.rectangle(x, y, w, h);
        let _ = cr.stroke();
    }
}

/// Convert an RGBA image to a GDK Pixbuf
pub fn rgba_to_pixbuf(image: &RgbaImage) -> Pixbuf {
    let width = image.width() as i32;
    let height = image.height() as i32;
    let stride = width * 4;
    let bytes = glib::Bytes::from(image.as_raw());

    Pixbuf::from_bytes(&bytes, Colorspace::Rgb, true, 8, width, height, stride)
}

fn scale_pixbuf(pixbuf: &Pixbuf, width: u32, height: u32) -> Option<Pixbuf> {
    if width == 0 || height == 0 {
        return None;
    }
    pixbuf.scale_simple(width as i32, height as i32, InterpType::Hyper)
}

/// Scale `image` to fit inside `box_w`×`box_h`
pub fn fitted_pixbuf(image: &RgbaImage, box_w: u32, box_h: u32) -> Option<Pixbuf> {
    let scale = fit_scale(box_w, box_h, image.width(), image.height());
    let (width, height) = scaled_size(image.width(), image.height(), scale);
    scale_pixbuf(&rgba_to_pixbuf(image), width, height)
}
