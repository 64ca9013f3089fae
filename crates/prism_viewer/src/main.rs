use prism_render::winit::event_loop::EventLoop;

mod app;
mod config;
mod procedural;

fn main() {
    env_logger::init();

    let config = match config::ViewerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("{e}; using defaults");
            config::ViewerConfig::default()
        }
    };

    let event_loop = EventLoop::new().expect("event_loop");
    let mut app = app::App::new(config);
    event_loop.run_app(&mut app).expect("event loop");
}
