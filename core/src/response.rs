//! Loading/Success/Error tag for one asynchronous fetch.

use serde::{Deserialize, Serialize};

/// Outcome of the latest fetch into one response slot.
///
/// Moves Loading → Success or Loading → Error; the next fetch restarts the
/// slot at Loading. Errors carry no payload: the session logs the cause and
/// the presentation only offers a retry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum Response<T> {
    Loading,
    Success(T),
    Error,
}

impl<T> Default for Response<T> {
    fn default() -> Self {
        Response::Loading
    }
}

impl<T> Response<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Response::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error)
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Response::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Response<&T> {
        match self {
            Response::Loading => Response::Loading,
            Response::Success(value) => Response::Success(value),
            Response::Error => Response::Error,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        match self {
            Response::Loading => Response::Loading,
            Response::Success(value) => Response::Success(f(value)),
            Response::Error => Response::Error,
        }
    }
}

impl<T, E> From<Result<T, E>> for Response<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Response::Success(value),
            Err(_) => Response::Error,
        }
    }
}
