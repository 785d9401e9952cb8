//! The seam between the kit and the templating engine.

use std::path::Path;

use minijinja::{path_loader, Environment};

use crate::filters::register_filters;
use crate::locals::ViewLocals;

/// The two-way split the route fallback depends on: a candidate that
/// doesn't exist is recoverable, everything else is not.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template not found: {0:?}")]
    NotFound(String),
    #[error("rendering template {name:?}")]
    Render {
        name: String,
        #[source]
        error: minijinja::Error,
    },
}

impl RenderError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RenderError::NotFound(_))
    }
}

pub trait TemplateRenderer: Send + Sync {
    /// Render `name` with `locals` as the template context.
    fn render(&self, name: &str, locals: &ViewLocals) -> Result<String, RenderError>;
}

pub struct JinjaRenderer {
    env: Environment<'static>,
}

impl JinjaRenderer {
    /// Templates are loaded (and cached) on demand from
    /// `templates_dir`; the kit's filters are registered up front.
    pub fn new(templates_dir: impl AsRef<Path>, zone: chrono_tz::Tz) -> JinjaRenderer {
        let mut env = Environment::new();
        env.set_loader(path_loader(templates_dir));
        register_filters(&mut env, zone);
        JinjaRenderer { env }
    }

    /// Take over a prepared environment; used by tests and by
    /// embedders that add their own filters or globals.
    pub fn from_env(env: Environment<'static>) -> JinjaRenderer {
        JinjaRenderer { env }
    }

    pub fn env_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }
}

impl TemplateRenderer for JinjaRenderer {
    fn render(&self, name: &str, locals: &ViewLocals) -> Result<String, RenderError> {
        let template = match self.env.get_template(name) {
            Ok(t) => t,
            Err(e) if matches!(e.kind(), minijinja::ErrorKind::TemplateNotFound) =>
                return Err(RenderError::NotFound(name.to_string())),
            Err(e) => return Err(RenderError::Render {
                name: name.to_string(),
                error: e,
            }),
        };
        // Errors from here on (even a missing include) mean the
        // candidate exists but is broken; they are not recoverable.
        template.render(locals).map_err(|error| RenderError::Render {
            name: name.to_string(),
            error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn renderer_with(templates: &[(&'static str, &'static str)]) -> JinjaRenderer {
        let mut env = Environment::new();
        for (name, source) in templates {
            env.add_template(name, source).expect("valid test template");
        }
        JinjaRenderer::from_env(env)
    }

    fn locals() -> ViewLocals {
        ViewLocals::new("Test service", Map::new(), Map::new())
    }

    #[test]
    fn t_render_ok() {
        let r = renderer_with(&[("index.html", "Hello {{ serviceName }}")]);
        assert_eq!(r.render("index.html", &locals()).unwrap(),
                   "Hello Test service");
    }

    #[test]
    fn t_missing_template_is_not_found() {
        let r = renderer_with(&[]);
        let e = r.render("index.html", &locals()).unwrap_err();
        assert!(e.is_not_found());
    }

    #[test]
    fn t_broken_template_is_not_recoverable() {
        let r = renderer_with(&[("index.html", "{{ x | nosuchfilter }}")]);
        let e = r.render("index.html", &locals()).unwrap_err();
        assert!(! e.is_not_found());
    }

    #[test]
    fn t_missing_include_is_not_recoverable() {
        let r = renderer_with(&[("index.html", "{% include 'gone.html' %}")]);
        let e = r.render("index.html", &locals()).unwrap_err();
        assert!(! e.is_not_found());
    }
}
