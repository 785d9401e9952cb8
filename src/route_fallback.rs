//! Resolution of request paths straight to templates, so prototype
//! pages work by dropping a file in the templates directory, no route
//! table needed.

//! Contract in the same shape as the other handlers: `Ok(Some(..))`
//! means a candidate rendered and the response is final; `Ok(None)`
//! means no candidate exists and the caller should 404; `Err` means a
//! candidate exists but failed to render, which is the caller's
//! generic error path. Only a `NotFound` render outcome moves on to
//! the next candidate.

use rouille::Response;

use crate::locals::ViewLocals;
use crate::render::{RenderError, TemplateRenderer};
use crate::webutils::html_response;

/// Template names tried for a request path, in order: the path
/// itself, then its directory index. `/` maps to `index`; a path
/// already ending in `/index` gets no second candidate.
pub fn template_candidates(request_path: &str) -> Vec<String> {
    let p = request_path.trim_matches('/');
    let p = if p.is_empty() { "index" } else { p };
    if p.ends_with("/index") {
        vec![format!("{p}.html")]
    } else {
        vec![format!("{p}.html"),
             format!("{p}/index.html")]
    }
}

/// Walk the candidate chain with the given render procedure.
pub fn resolve_template(
    request_path: &str,
    render: impl Fn(&str) -> Result<String, RenderError>,
) -> Result<Option<String>, RenderError> {
    for candidate in template_candidates(request_path) {
        match render(&candidate) {
            Ok(html) => return Ok(Some(html)),
            // maybe it's a folder, try the index variant next
            Err(e) if e.is_not_found() => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(None)
}

/// `resolve_template` hooked up to the real renderer and turned into
/// a response with the content headers set.
pub fn match_routes(
    request_path: &str,
    renderer: &dyn TemplateRenderer,
    locals: &ViewLocals,
) -> Result<Option<Response>, RenderError> {
    Ok(resolve_template(request_path, |name| renderer.render(name, locals))?
       .map(html_response))
}
