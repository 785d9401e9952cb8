use std::borrow::Cow;

use anyhow::Error;
use rouille::{Response, ResponseBody};

use crate::http_status::HttpStatus;
use crate::util::randomidstring;

/// A rendered page, with the content headers the templating side
/// expects browsers to get.
pub fn html_response(html: String) -> Response {
    Response {
        status_code: HttpStatus::OK200.code(),
        headers: vec![(Cow::from("Content-type"),
                       Cow::from("text/html; charset=utf-8"))],
        data: ResponseBody::from_string(html),
        upgrade: None,
    }
}

pub fn errorpage_from_status(status: HttpStatus) -> Response {
    let title = status.title();
    let explanation = status.desc();
    let resp = format!("<html><head><title>{title}</title></head><body><h1>{title}</h1>\
                        <p>{explanation}</p></body></html>\n");
    Response {
        status_code: status.code(),
        headers: vec![(Cow::from("Content-type"), Cow::from("text/html"))],
        data: ResponseBody::from_string(resp),
        upgrade: None,
    }
}

/// Page errors are only identified to the user by a random id; the
/// details stay in the server log next to the same id.
pub fn errorpage_from_error(err: Error) -> Response {
    let errid = randomidstring().unwrap_or_else(|_| "????????????".into());
    eprintln!("ERROR in page (error id {errid}): {err:#}");
    errorpage_from_status(HttpStatus::InternalServerError500)
}
