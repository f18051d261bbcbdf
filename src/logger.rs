use log::LevelFilter;
use env_logger::{Builder, Env};
use std::io::Write;
use chrono::Local;

pub fn init() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(buf,
                "{} [{}] - {}",
                Local::now().format("%d.%m.%Y %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_module("html5ever", LevelFilter::Warn)
        .init();
}
