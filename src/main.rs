//! `relief [IMAGE] [OPTIONS.toml]`
//!
//! Opens the viewer, optionally showing IMAGE and using the options preset
//! at OPTIONS.toml. Set `RUST_LOG` to control log output.

use std::path::Path;

use relief::{Options, Viewer};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let image = args.next();
    let options_path = args.next();

    let mut builder = Viewer::builder();
    if let Some(path) = image {
        builder = builder.with_image(path);
    }
    if let Some(path) = options_path {
        match Options::load(Path::new(&path)) {
            Ok(options) => builder = builder.with_options(options),
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = builder.build().run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
