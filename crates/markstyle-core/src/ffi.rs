// SPDX-License-Identifier: AGPL-3.0-or-later
//! C FFI exports for editor add-on hosts
//!
//! These functions give a C-compatible interface to detection and
//! conversion. Conversions are returned as JSON strings owned by this
//! library; release them with [`markstyle_free_string`].

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use crate::ast::Format;
use crate::detect::detect;
use crate::document::convert_bytes;
use crate::traits::ConvertConfig;

/// Result code for FFI operations
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiResult {
    Success = 0,
    InvalidInput = 1,
    SerializationError = 2,
    NullPointer = 3,
    Utf8Error = 4,
}

/// Markup format for FFI
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiFormat {
    Markdown = 0,
    AsciiDoc = 1,
}

impl From<Format> for FfiFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Markdown => FfiFormat::Markdown,
            Format::AsciiDoc => FfiFormat::AsciiDoc,
        }
    }
}

/// Detect the markup format of some text
///
/// Null or non-UTF-8 input is reported as Markdown.
///
/// # Safety
/// - `content` must be null or a valid null-terminated string
#[no_mangle]
pub unsafe extern "C" fn markstyle_detect_format(content: *const c_char) -> FfiFormat {
    if content.is_null() {
        return FfiFormat::Markdown;
    }
    match CStr::from_ptr(content).to_str() {
        Ok(text) => detect(text).into(),
        Err(_) => FfiFormat::Markdown,
    }
}

/// Convert text and return the conversion as JSON
///
/// # Safety
/// - `content` must be a valid null-terminated string
/// - `out_json` and `out_length` must be valid pointers to store the result
#[no_mangle]
pub unsafe extern "C" fn markstyle_convert(
    content: *const c_char,
    out_json: *mut *mut c_char,
    out_length: *mut usize,
) -> FfiResult {
    if content.is_null() || out_json.is_null() || out_length.is_null() {
        return FfiResult::NullPointer;
    }

    let bytes = CStr::from_ptr(content).to_bytes();
    let conversion = match convert_bytes(bytes, &ConvertConfig::default()) {
        Ok(c) => c,
        Err(_) => return FfiResult::Utf8Error,
    };

    let json = match serde_json::to_string(&conversion) {
        Ok(j) => j,
        Err(e) => {
            tracing::error!(error = %e, "serializing conversion failed");
            return FfiResult::SerializationError;
        }
    };

    let length = json.len();
    let c_string = match CString::new(json) {
        Ok(s) => s,
        Err(_) => return FfiResult::InvalidInput,
    };

    *out_length = length;
    *out_json = c_string.into_raw();

    FfiResult::Success
}

/// Free a string allocated by the library
///
/// # Safety
/// - `s` must be a valid string from this library or null
#[no_mangle]
pub unsafe extern "C" fn markstyle_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Get library version
///
/// Returns a static string, do not free
#[no_mangle]
pub extern "C" fn markstyle_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
