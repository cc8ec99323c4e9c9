fn main() -> Result<(), eframe::Error> {
    // Set up logging; RUST_LOG=debug shows scheduler and surface events
    env_logger::init();

    // Run the fractal clock application
    fractal_clock::run_app()
}
