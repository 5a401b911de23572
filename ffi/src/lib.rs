//! C-ABI wrapper around `bookshelf-core`.
//!
//! # Overview
//! Exposes a `Session` to a native host through `extern "C"` functions: the
//! host pushes input (query text, navigation actions) and reads the state
//! back as a flat `FfiSnapshot`, as JSON, or as a rendered UI tree.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Each session owns a multi-threaded tokio runtime. Fetches run there and
//!   never block the calling thread; the host polls or subscribes.
//! - Calls that do not return a pointer return an `FfiStatus`.
//! - The C caller owns all returned pointers and must call the matching
//!   `bookshelf_free_*` function to release them.
//! - `bookshelf_session_free` shuts the runtime down, so it must not be
//!   called from inside a subscription callback.

pub mod types;

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use bookshelf_core::{logging, render, Action, Config, Layout, NetworkBooksRepository, Session};
use tracing::{error, info, warn};

use types::*;

/// Called on a runtime thread after the session state changes. Changes
/// published while a call is in flight are coalesced into the next call.
pub type FfiStateCallback = extern "C" fn(user_data: *mut c_void);

/// Borrow a C string argument as UTF-8.
fn read_str<'a>(ptr: *const c_char) -> Result<&'a str, FfiStatus> {
    if ptr.is_null() {
        return Err(FfiStatus::NullArg);
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| FfiStatus::InvalidArg)
}

/// Run `f` against a live session, translating null handles and panics into
/// status codes.
fn with_session(
    session: *const FfiSession,
    name: &'static str,
    f: impl FnOnce(&FfiSession) -> Result<(), FfiStatus>,
) -> FfiStatus {
    catch_unwind(AssertUnwindSafe(|| {
        if session.is_null() {
            return FfiStatus::NullArg;
        }
        match f(unsafe { &*session }) {
            Ok(()) => FfiStatus::Ok,
            Err(status) => status,
        }
    }))
    .unwrap_or_else(|_| {
        error!(function = name, "panic caught at FFI boundary");
        FfiStatus::Panic
    })
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Install the global `tracing` subscriber.
///
/// `filter` is an `EnvFilter` directive such as `info` or
/// `bookshelf_core=debug`; null reads `BOOKSHELF_LOG`. Returns false when the
/// filter does not parse or a subscriber is already installed.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_init_logging(filter: *const c_char) -> bool {
    catch_unwind(|| {
        let filter = if filter.is_null() {
            Config::from_env().unwrap_or_default().log_filter
        } else {
            match read_str(filter) {
                Ok(filter) => filter.to_string(),
                Err(_) => return false,
            }
        };
        logging::init(&filter)
    })
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

/// Start a session against the catalog at `base_url`.
///
/// A null `base_url` loads the whole configuration from the environment.
/// Returns null if the configuration is invalid, the runtime cannot start,
/// or an internal panic occurs. Free with `bookshelf_session_free`.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_session_new(base_url: *const c_char) -> *mut FfiSession {
    catch_unwind(|| {
        let config = if base_url.is_null() {
            match Config::from_env() {
                Ok(config) => config,
                Err(err) => {
                    error!(error = %err, "invalid configuration");
                    return std::ptr::null_mut();
                }
            }
        } else {
            match read_str(base_url) {
                Ok(url) => Config {
                    base_url: url.to_string(),
                    ..Config::default()
                },
                Err(_) => return std::ptr::null_mut(),
            }
        };
        start_session(config).unwrap_or(std::ptr::null_mut())
    })
    .unwrap_or(std::ptr::null_mut())
}

fn start_session(config: Config) -> Option<*mut FfiSession> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("bookshelf-runtime")
        .enable_all()
        .build()
        .map_err(|err| error!(error = %err, "failed to start runtime"))
        .ok()?;

    let repository = NetworkBooksRepository::new(&config.base_url);
    let session = Session::new(Arc::new(repository), runtime.handle().clone())
        .with_max_results(config.max_results);
    info!(base_url = %config.base_url, max_results = config.max_results, "session started");

    Some(Box::into_raw(Box::new(FfiSession { session, runtime })))
}

/// Free a session created by `bookshelf_session_new`. In-flight fetches are
/// abandoned. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_session_free(session: *mut FfiSession) {
    if !session.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(session) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_set_search_query(session: *const FfiSession, text: *const c_char) -> FfiStatus {
    with_session(session, "bookshelf_set_search_query", |s| {
        s.session.set_search_query(read_str(text)?);
        Ok(())
    })
}

/// `screen` is an `FfiScreen` value; anything else returns `InvalidArg`.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_set_screen(session: *const FfiSession, screen: u32) -> FfiStatus {
    with_session(session, "bookshelf_set_screen", |s| {
        let screen = FfiScreen::try_from(screen)?;
        s.session.set_screen(screen.into());
        Ok(())
    })
}

/// `mode` is an `FfiTopBarMode` value; anything else returns `InvalidArg`.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_set_top_bar_mode(session: *const FfiSession, mode: u32) -> FfiStatus {
    with_session(session, "bookshelf_set_top_bar_mode", |s| {
        let mode = FfiTopBarMode::try_from(mode)?;
        s.session.set_top_bar_mode(mode.into());
        Ok(())
    })
}

/// Start a search for the current query. Returns once the list slot is
/// Loading; the result arrives asynchronously.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_search(session: *const FfiSession) -> FfiStatus {
    with_session(session, "bookshelf_search", |s| {
        let _ = s.session.search();
        Ok(())
    })
}

/// Start fetching details for the volume `id`.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_select_book(session: *const FfiSession, id: *const c_char) -> FfiStatus {
    with_session(session, "bookshelf_select_book", |s| {
        let _ = s.session.select_book_id(read_str(id)?);
        Ok(())
    })
}

/// Apply an action given as JSON, e.g. `{"action":"open_book","value":"id"}`.
///
/// Hosts normally pass back the `Action` values found in the rendered frame.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_dispatch_json(session: *const FfiSession, action: *const c_char) -> FfiStatus {
    with_session(session, "bookshelf_dispatch_json", |s| {
        let action: Action = serde_json::from_str(read_str(action)?).map_err(|err| {
            warn!(error = %err, "rejected action");
            FfiStatus::InvalidJson
        })?;
        let _ = s.session.dispatch(action);
        Ok(())
    })
}

/// Register `callback` to run after every state change.
///
/// `user_data` is passed through untouched and must stay valid until the
/// session is freed.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_subscribe(
    session: *const FfiSession,
    callback: Option<FfiStateCallback>,
    user_data: *mut c_void,
) -> FfiStatus {
    with_session(session, "bookshelf_subscribe", |s| {
        let callback = callback.ok_or(FfiStatus::NullArg)?;
        let user_data = UserData(user_data);
        let mut changes = s.session.subscribe();
        s.runtime.spawn(async move {
            while changes.changed().await.is_ok() {
                callback(user_data.get());
            }
        });
        Ok(())
    })
}

struct UserData(*mut c_void);

// The host owns `user_data` and promises it may be used from runtime threads.
unsafe impl Send for UserData {}

impl UserData {
    fn get(&self) -> *mut c_void {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Flat copy of the current state. Returns null if `session` is null.
/// Free with `bookshelf_free_snapshot`.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_snapshot(session: *const FfiSession) -> *mut FfiSnapshot {
    catch_unwind(AssertUnwindSafe(|| {
        if session.is_null() {
            return std::ptr::null_mut();
        }
        let state = unsafe { &*session }.session.state();
        FfiSnapshot::from_state(&state)
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// The full `ViewState` as JSON. Free with `bookshelf_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_state_json(session: *const FfiSession) -> *mut c_char {
    catch_unwind(AssertUnwindSafe(|| {
        if session.is_null() {
            return std::ptr::null_mut();
        }
        let state = unsafe { &*session }.session.state();
        to_json(&state)
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// The UI tree for the current state at a window `width_dp` wide, as JSON.
/// Free with `bookshelf_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_render_json(session: *const FfiSession, width_dp: u32) -> *mut c_char {
    catch_unwind(AssertUnwindSafe(|| {
        if session.is_null() {
            return std::ptr::null_mut();
        }
        let state = unsafe { &*session }.session.state();
        to_json(&render(&state, Layout::for_width(width_dp)))
    }))
    .unwrap_or(std::ptr::null_mut())
}

fn to_json(value: &impl serde::Serialize) -> *mut c_char {
    match serde_json::to_string(value) {
        Ok(json) => into_c_string(&json),
        Err(err) => {
            error!(error = %err, "failed to serialize state");
            std::ptr::null_mut()
        }
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiSnapshot` returned by `bookshelf_snapshot`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_free_snapshot(snapshot: *mut FfiSnapshot) {
    if snapshot.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let snapshot = unsafe { Box::from_raw(snapshot) };
        if !snapshot.search_query.is_null() {
            drop(unsafe { CString::from_raw(snapshot.search_query) });
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
