//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Enums cross the boundary as plain `u32` and are checked with `TryFrom`
//! here, since a C caller can pass any integer and an out-of-range value in
//! a Rust enum is undefined behavior. Strings handed to C are always owned
//! `CString`s released through the matching `bookshelf_free_*` function.

use std::ffi::CString;
use std::os::raw::c_char;

use bookshelf_core::{Response, Screen, Session, TopBarMode, ViewState};
use tokio::runtime::Runtime;

/// Opaque handle to a `Session` and the runtime its fetches run on.
///
/// Field order matters: the session drops before the runtime so no task is
/// spawned onto a runtime that is shutting down.
pub struct FfiSession {
    pub(crate) session: Session,
    pub(crate) runtime: Runtime,
}

/// Outcome of every FFI call that does not return a pointer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiStatus {
    Ok = 0,
    NullArg = 1,
    /// A string was not UTF-8 or an enum value was out of range.
    InvalidArg = 2,
    Panic = 3,
    InvalidJson = 4,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiScreen {
    Start = 0,
    Home = 1,
    Details = 2,
}

impl TryFrom<u32> for FfiScreen {
    type Error = FfiStatus;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(FfiScreen::Start),
            1 => Ok(FfiScreen::Home),
            2 => Ok(FfiScreen::Details),
            _ => Err(FfiStatus::InvalidArg),
        }
    }
}

impl From<FfiScreen> for Screen {
    fn from(screen: FfiScreen) -> Self {
        match screen {
            FfiScreen::Start => Screen::Start,
            FfiScreen::Home => Screen::Home,
            FfiScreen::Details => Screen::Details,
        }
    }
}

impl From<Screen> for FfiScreen {
    fn from(screen: Screen) -> Self {
        match screen {
            Screen::Start => FfiScreen::Start,
            Screen::Home => FfiScreen::Home,
            Screen::Details => FfiScreen::Details,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiTopBarMode {
    Default = 0,
    Search = 1,
    Details = 2,
}

impl TryFrom<u32> for FfiTopBarMode {
    type Error = FfiStatus;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(FfiTopBarMode::Default),
            1 => Ok(FfiTopBarMode::Search),
            2 => Ok(FfiTopBarMode::Details),
            _ => Err(FfiStatus::InvalidArg),
        }
    }
}

impl From<FfiTopBarMode> for TopBarMode {
    fn from(mode: FfiTopBarMode) -> Self {
        match mode {
            FfiTopBarMode::Default => TopBarMode::Default,
            FfiTopBarMode::Search => TopBarMode::Search,
            FfiTopBarMode::Details => TopBarMode::Details,
        }
    }
}

impl From<TopBarMode> for FfiTopBarMode {
    fn from(mode: TopBarMode) -> Self {
        match mode {
            TopBarMode::Default => FfiTopBarMode::Default,
            TopBarMode::Search => FfiTopBarMode::Search,
            TopBarMode::Details => FfiTopBarMode::Details,
        }
    }
}

/// Which variant a `Response` slot currently holds.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiResponseTag {
    Loading = 0,
    Success = 1,
    Error = 2,
}

impl<T> From<&Response<T>> for FfiResponseTag {
    fn from(response: &Response<T>) -> Self {
        match response {
            Response::Loading => FfiResponseTag::Loading,
            Response::Success(_) => FfiResponseTag::Success,
            Response::Error => FfiResponseTag::Error,
        }
    }
}

/// Flat summary of a `ViewState` for hosts that do not want to parse JSON.
///
/// `item_count` is the number of search results when `book_list` is
/// `Success` and 0 otherwise. Free with `bookshelf_free_snapshot`.
#[repr(C)]
pub struct FfiSnapshot {
    pub screen: FfiScreen,
    pub top_bar: FfiTopBarMode,
    pub book_list: FfiResponseTag,
    pub book_details: FfiResponseTag,
    pub search_query: *mut c_char,
    pub item_count: u32,
}

impl FfiSnapshot {
    pub(crate) fn from_state(state: &ViewState) -> *mut Self {
        let item_count = state.book_list.success().map_or(0, |list| list.len() as u32);
        Box::into_raw(Box::new(FfiSnapshot {
            screen: state.screen.into(),
            top_bar: state.top_bar.into(),
            book_list: (&state.book_list).into(),
            book_details: (&state.book_details).into(),
            search_query: into_c_string(&state.search_query),
            item_count,
        }))
    }
}

/// Hand `text` to C as an owned string. Interior NULs are dropped.
pub(crate) fn into_c_string(text: &str) -> *mut c_char {
    CString::new(text.replace('\0', ""))
        .unwrap_or_default()
        .into_raw()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_enums_reject_out_of_range_values() {
        assert_eq!(FfiScreen::try_from(2), Ok(FfiScreen::Details));
        assert_eq!(FfiScreen::try_from(3), Err(FfiStatus::InvalidArg));
        assert_eq!(FfiTopBarMode::try_from(1), Ok(FfiTopBarMode::Search));
        assert_eq!(FfiTopBarMode::try_from(u32::MAX), Err(FfiStatus::InvalidArg));
    }

    #[test]
    fn screen_round_trips_through_raw_value() {
        for screen in [Screen::Start, Screen::Home, Screen::Details] {
            let raw = FfiScreen::from(screen) as u32;
            assert_eq!(Screen::from(FfiScreen::try_from(raw).unwrap()), screen);
        }
    }

    #[test]
    fn response_tag_follows_slot() {
        assert_eq!(FfiResponseTag::from(&Response::<u8>::Loading), FfiResponseTag::Loading);
        assert_eq!(FfiResponseTag::from(&Response::Success(1u8)), FfiResponseTag::Success);
        assert_eq!(FfiResponseTag::from(&Response::<u8>::Error), FfiResponseTag::Error);
    }

    #[test]
    fn c_string_drops_interior_nul() {
        let raw = into_c_string("a\0b");
        let owned = unsafe { CString::from_raw(raw) };
        assert_eq!(owned.to_str().unwrap(), "ab");
    }
}
