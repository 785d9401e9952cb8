use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use protokit::config::KitConfig;
use protokit::note;
use protokit::server::{kit_handler, Kit};

/// Serve prototype pages straight from the templates directory, with
/// session-autosaved form data.
#[derive(clap::Parser, Debug)]
#[clap(name = "protokit")]
struct Opts {
    /// Path to a JSON configuration file
    #[clap(long)]
    config: Option<String>,

    /// Listen address ("ip:port"), overriding the configuration
    #[clap(long)]
    listen: Option<String>,

    /// Templates directory, overriding the configuration
    #[clap(long)]
    templates: Option<String>,
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    let mut config = KitConfig::load(opts.config.as_deref())?;
    if let Some(listen) = opts.listen {
        config.listen_addr = listen;
    }
    if let Some(templates) = opts.templates {
        config.templates_dir = templates;
    }

    let session_data_defaults = config.load_session_data_defaults()?;
    let kit = Arc::new(Kit::new(config, session_data_defaults)?);

    note!("{}: serving templates from {:?} on http://{}/",
          kit.config.service_name,
          kit.config.templates_dir,
          kit.config.listen_addr);
    rouille::start_server(kit.config.listen_addr.clone(), kit_handler(kit));
}
