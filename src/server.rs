//! Composition of the request pipeline: session cookie, payload
//! parsing, session autosave, view locals, template fallback, error
//! pages, access log.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use rouille::session::session;
use rouille::{Request, Response};
use serde_json::{Map, Value};

use crate::access_log::log_combined;
use crate::config::KitConfig;
use crate::http_status::HttpStatus;
use crate::locals::ViewLocals;
use crate::pcontext::PContext;
use crate::render::JinjaRenderer;
use crate::route_fallback::match_routes;
use crate::session::SessionStore;
use crate::store_data::auto_store_data;
use crate::warn;
use crate::webutils::{errorpage_from_error, errorpage_from_status};

pub const SESSION_COOKIE_NAME: &str = "sid";

/// Everything the request pipeline needs, built once at startup.
pub struct Kit {
    pub config: KitConfig,
    pub session_data_defaults: Map<String, Value>,
    pub renderer: JinjaRenderer,
    pub store: SessionStore,
}

impl Kit {
    pub fn new(
        config: KitConfig,
        session_data_defaults: Map<String, Value>,
    ) -> Result<Kit> {
        let renderer = JinjaRenderer::new(&config.templates_dir,
                                          config.timezone()?);
        let store = SessionStore::new(config.session_ttl_seconds)
            .map_err(|e| anyhow::anyhow!("initialising session store: {}", e))?;
        Ok(Kit {
            config,
            session_data_defaults,
            renderer,
            store,
        })
    }

    /// One request, below the session cookie layer: merge the payload
    /// into the session's bag, expose the result as locals, find a
    /// template for the path.
    pub fn handle_request(&self, context: &PContext, session_id: &str) -> Response {
        let session_data = self.store.load(session_id);
        let merged = auto_store_data(&context.payload(),
                                     &session_data,
                                     &self.session_data_defaults);
        self.store.store(session_id, merged.clone());
        let locals = ViewLocals::new(self.config.service_name.as_str(),
                                     context.query().clone(),
                                     merged);
        match match_routes(context.path(), &self.renderer, &locals) {
            Ok(Some(response)) => response,
            Ok(None) => errorpage_from_status(HttpStatus::NotFound404),
            Err(e) => errorpage_from_error(e.into()),
        }
    }
}

/// Make a handler for rouille's `start_server` procedure.
pub fn kit_handler(kit: Arc<Kit>) -> impl for<'r> Fn(&'r Request) -> Response {
    move |request: &Request| -> Response {
        let started = Instant::now();
        session(request, SESSION_COOKIE_NAME,
                kit.config.session_ttl_seconds as u64, |session| {
            match PContext::new(request) {
                Ok(context) => {
                    let mut response = kit.handle_request(&context, session.id());
                    log_combined(&context, &mut response, started.elapsed());
                    response
                }
                Err(e) => {
                    warn!("{e:#}");
                    errorpage_from_status(HttpStatus::InternalServerError500)
                }
            }
        })
    }
}
