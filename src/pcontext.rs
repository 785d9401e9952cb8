//! Per-request context: the parsed path, query and body payload.

use std::io::Read;
use std::net::IpAddr;
use std::time::SystemTime;

use anyhow::{anyhow, Context, Result};
use rouille::Request;
use serde_json::{Map, Value};

use crate::formdata::{merge_payload, parse_form};

fn is_urlencoded_post(request: &Request) -> bool {
    if request.method() != "POST" {
        return false
    }
    match request.header("Content-Type") {
        // the header may carry a charset suffix
        Some(t) => t.starts_with("application/x-www-form-urlencoded"),
        None => false,
    }
}

pub struct PContext<'r> {
    request: &'r Request,
    path: String,
    now: SystemTime,
    query: Map<String, Value>,
    body: Map<String, Value>,
}

impl<'r> PContext<'r> {
    pub fn new(request: &'r Request) -> Result<Self> {
        let path = request.url(); // path only, percent-decoded
        let query = parse_form(request.raw_query_string()).with_context(
            || anyhow!("decoding query string for {:?}", path))?;
        let body =
            if is_urlencoded_post(request) {
                let mut data = request.data().ok_or_else(
                    || anyhow!("request body was already extracted"))?;
                let mut body_string = String::new();
                data.read_to_string(&mut body_string).with_context(
                    || anyhow!("reading request body for {:?}", path))?;
                parse_form(&body_string).with_context(
                    || anyhow!("decoding request body for {:?}", path))?
            } else {
                Map::new()
            };
        Ok(PContext {
            request,
            path,
            now: SystemTime::now(),
            query,
            body,
        })
    }

    pub fn path(&self) -> &str { &self.path }
    pub fn method(&self) -> &str { self.request.method() }
    pub fn now(&self) -> &SystemTime { &self.now }

    /// Query fields alone, as parsed.
    pub fn query(&self) -> &Map<String, Value> { &self.query }
    /// Body fields alone; empty unless this is an urlencoded POST.
    pub fn body(&self) -> &Map<String, Value> { &self.body }
    /// Both request sources as one mapping; body fields win.
    pub fn payload(&self) -> Map<String, Value> {
        merge_payload(&self.query, &self.body)
    }

    /// Like the request part in Apache style Combined Log Format
    pub fn request_line(&self) -> String {
        format!("{} {}",
                self.request.method(),
                self.request.raw_url())
    }
    pub fn user_agent(&self) -> Option<&str> {
        self.request.header("user-agent")
    }
    pub fn referer(&self) -> Option<&str> {
        self.request.header("referer")
    }
    pub fn client_ip(&self) -> IpAddr {
        self.request.remote_addr().ip()
    }

    pub fn request(&self) -> &Request { self.request }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn urlencoded_post(url: &str, body: &str) -> Request {
        Request::fake_http(
            "POST", url,
            vec![("Content-Type".to_owned(),
                  "application/x-www-form-urlencoded".to_owned())],
            body.as_bytes().to_vec())
    }

    #[test]
    fn t_get_query_only() {
        let request = Request::fake_http("GET", "/sport?team=red&_flash=1",
                                         vec![], vec![]);
        let context = PContext::new(&request).unwrap();
        assert_eq!(context.path(), "/sport");
        assert_eq!(Value::Object(context.query().clone()),
                   json!({"team": "red", "_flash": "1"}));
        assert!(context.body().is_empty());
    }

    #[test]
    fn t_post_body_and_payload_precedence() {
        let request = urlencoded_post("/sport?team=red&extra=q",
                                      "team=blue&name[first]=Jo");
        let context = PContext::new(&request).unwrap();
        assert_eq!(Value::Object(context.payload()),
                   json!({"team": "blue",
                          "extra": "q",
                          "name": {"first": "Jo"}}));
    }

    #[test]
    fn t_post_without_form_content_type_is_ignored() {
        let request = Request::fake_http("POST", "/x", vec![],
                                         b"team=blue".to_vec());
        let context = PContext::new(&request).unwrap();
        assert!(context.body().is_empty());
    }
}
