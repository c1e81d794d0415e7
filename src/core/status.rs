//! Exchange-neutral HTTP status classifiers.

use crate::core::errors::HttpErrorKind;

/// Accepts 2xx only.
pub const fn strict(status: u16) -> Option<HttpErrorKind> {
    if is_success(status) {
        None
    } else {
        Some(HttpErrorKind::from_status(status))
    }
}

pub const fn is_success(status: u16) -> bool {
    status >= 200 && status < 300
}
