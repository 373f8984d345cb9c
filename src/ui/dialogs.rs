use gtk4 as gtk;

use gtk4::prelude::*;
use log::{error, warn};

use crate::error::LabelerError;

/// Show `err` in a modal dialog. Operator mistakes are warnings, everything
/// else is an error; neither ends the session.
pub fn show_error(parent: &impl IsA<gtk::Window>, err: &LabelerError) {
    let heading = if err.is_notice() {
        warn!("{}", err);
        "Notice"
    } else {
        error!("{}", err);
        "Something went wrong"
    };

    let dialog = gtk::AlertDialog::builder()
        .message(heading)
        .detail(err.to_string())
        .modal(true)
        .build();
    dialog.show(Some(parent));
}
