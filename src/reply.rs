use serde::Serialize;
use warp::{
    http::StatusCode,
    reply::{self, Reply, Response},
};

use crate::{constants::SHOPPING_LIST_FILENAME, error::ActionError, views::ShoppingList};

pub fn error_reply(error: &ActionError) -> Response {
    reply::with_status(error.to_string(), error.status_code()).into_response()
}

/// JSON body with `status` on success, the mapped error status otherwise.
pub fn json_reply<T: Serialize>(result: Result<T, ActionError>, status: StatusCode) -> Response {
    match result {
        Ok(value) => reply::with_status(reply::json(&value), status).into_response(),
        Err(e) => error_reply(&e),
    }
}

/// Empty 204 on success, for removals.
pub fn empty_reply(result: Result<(), ActionError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_reply(&e),
    }
}

/// Downloadable `shopping_list.txt` attachment.
pub fn shopping_list_reply(list: &ShoppingList) -> Response {
    let body = reply::with_header(list.render(), "content-type", "text/plain; charset=utf-8");

    reply::with_header(
        body,
        "content-disposition",
        format!("attachment; filename=\"{SHOPPING_LIST_FILENAME}\""),
    )
    .into_response()
}
