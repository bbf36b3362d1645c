use inkline::config::DemoConfig;
use inkline::engine::Engine;
use inkline::window::{FrameLimiter, Window};

fn main() -> Result<(), String> {
    let config = DemoConfig::from_args(std::env::args().skip(1))?;

    let mut window = Window::new("inkline", config.width, config.height)?;
    let mut engine = Engine::from_config(&config);
    let mut limiter = FrameLimiter::new(&window);

    println!("technique: {} (1-9, 0, G to switch)", engine.technique());

    loop {
        let input = window.poll_events();
        if input.quit {
            break;
        }

        if let Some((w, h)) = input.resize {
            window.resize(w, h)?;
            engine.resize(w, h);
        }
        if let Some(technique) = input.technique {
            engine.set_technique(technique);
            println!("technique: {technique}");
        }
        if input.toggle_outline {
            engine.toggle_outline();
            println!(
                "outline: {}",
                if engine.outline_enabled() { "on" } else { "off" }
            );
        }
        engine.camera_mut().orbit(input.orbit.0, input.orbit.1);
        engine.camera_mut().zoom(input.zoom);

        let delta = limiter.wait_and_get_delta(&window);
        engine.update(delta as f32 / 1000.0);
        engine.render();

        if input.save_frame {
            match engine.save_frame(&config.frame_path) {
                Ok(()) => println!("saved frame to {}", config.frame_path.display()),
                Err(e) => eprintln!("failed to save frame: {e}"),
            }
        }

        window.present(engine.frame_bytes())?;
    }

    Ok(())
}
