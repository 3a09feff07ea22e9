mod app;

use std::process;

fn main() {
    if let Err(err) = app::run() {
        log::error!("{:#}", err);
        process::exit(1);
    }
}
