use gtk4 as gtk;

use gtk::{gdk, Align, Orientation};
use gtk4::prelude::*;
use image::RgbaImage;

use crate::app::Config;
use crate::store::ElementRecord;
use crate::ui::canvas::fitted_pixbuf;

#[derive(Clone)]
pub struct PanelComponents {
    pub container: gtk::Box,
    pub preview: gtk::Picture,
    pub name_entry: gtk::Entry,
    pub save_btn: gtk::Button,
    pub element_list: gtk::ListBox,
    preview_size: (u32, u32),
}

pub struct ElementRow {
    pub row: gtk::Box,
    pub verify_btn: gtk::Button,
    pub delete_btn: gtk::Button,
    pub copy_btn: gtk::Button,
}

pub fn create_panel(config: &Config) -> PanelComponents {
    let preview = gtk::Picture::builder()
        .width_request(config.preview_width as i32)
        .height_request(config.preview_height as i32)
        .can_shrink(false)
        .halign(Align::Center)
        .build();
    preview.add_css_class("card");

    let name_label = gtk::Label::new(Some("Element name:"));
    let name_entry = gtk::Entry::builder()
        .width_chars(30)
        .placeholder_text("e.g. Login button")
        .build();
    let save_btn = gtk::Button::builder().label("Save Element").build();

    let name_box = gtk::Box::builder()
        .orientation(Orientation::Horizontal)
        .spacing(6)
        .build();
    name_box.append(&name_label);
    name_box.append(&name_entry);
    name_box.append(&save_btn);

    let element_list = gtk::ListBox::builder()
        .selection_mode(gtk::SelectionMode::None)
        .css_classes(["boxed-list"])
        .build();

    let scrolled_window = gtk::ScrolledWindow::builder()
        .child(&element_list)
        .vexpand(true)
        .build();

    let container = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .spacing(12)
        .margin_top(10)
        .margin_bottom(10)
        .margin_start(10)
        .margin_end(10)
        .hexpand(true)
        .build();
    container.append(&preview);
    container.append(&name_box);
    container.append(&scrolled_window);

    PanelComponents {
        container,
        preview,
        name_entry,
        save_btn,
        element_list,
        preview_size: (config.preview_width, config.preview_height),
    }
}

impl PanelComponents {
    pub fn show_preview(&self, cropped: Option<&RgbaImage>) {
        let (width, height) = self.preview_size;
        match cropped.and_then(|image| fitted_pixbuf(image, width, height)) {
            Some(pixbuf) => {
                let texture = gdk::Texture::for_pixbuf(&pixbuf);
                self.preview.set_paintable(Some(&texture));
            }
            None => self.preview.set_paintable(None::<&gdk::Paintable>),
        }
    }
}

pub fn create_element_row(record: &ElementRecord) -> ElementRow {
    let label = gtk::Label::builder()
        .label(record.list_label())
        .halign(Align::Start)
        .hexpand(true)
        .ellipsize(gtk::pango::EllipsizeMode::End)
        .tooltip_text(record.relative_path.display().to_string())
        .build();

    let verify_btn = gtk::Button::builder().label("Verify").build();
    let delete_btn = gtk::Button::builder().label("Delete File").build();
    delete_btn.add_css_class("destructive-action");
    let copy_btn = gtk::Button::builder().label("Copy Code").build();

    let row = gtk::Box::builder()
        .orientation(Orientation::Horizontal)
        .spacing(6)
        .margin_top(2)
        .margin_bottom(2)
        .margin_start(6)
        .margin_end(6)
        .build();
    row.append(&label);
    row.append(&verify_btn);
    row.append(&delete_btn);
    row.append(&copy_btn);

    ElementRow {
        row,
        verify_btn,
        delete_btn,
        copy_btn,
    }
}
