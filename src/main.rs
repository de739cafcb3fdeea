mod app;
mod auth;
mod config;
mod library;
mod player;
mod prefs;
mod runtime;
mod store;
mod sync;
mod ui;

#[cfg(test)]
mod test_support;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
