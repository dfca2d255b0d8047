//! Orbit demo application
//!
//! Swings a camera around the origin by editing its Euler angles and logs
//! where it is looking. Pass a `.toml` or `.ron` settings file as the first
//! argument to override the defaults.

use std::cell::Cell;
use std::rc::Rc;

use seed_engine::foundation::logging;
use seed_engine::foundation::math::{constants::PI, Vec3};
use seed_engine::prelude::*;

const STEPS: u32 = 8;
const RADIUS: f32 = 10.0;

#[derive(thiserror::Error, Debug)]
enum AppError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
}

struct OrbitApp {
    camera: Camera,
    edits: Rc<Cell<u32>>,
}

impl OrbitApp {
    fn new(config: &ApplicationConfig) -> Self {
        log::info!("Creating orbit demo...");
        let mut camera = Camera::from_config(&config.camera);

        let edits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&edits);
        camera.object_mut().rotation_mut().on_change(move |euler: &Euler| {
            counter.set(counter.get() + 1);
            log::trace!("Orientation now ({:.3}, {:.3}, {:.3}) {:?}", euler.x(), euler.y(), euler.z(), euler.order());
        });

        Self { camera, edits }
    }

    fn step(&mut self, index: u32) {
        let angle = 2.0 * PI * index as f32 / STEPS as f32;

        let object = self.camera.object_mut();
        object.set_position(Vec3::new(RADIUS * angle.sin(), 2.0, RADIUS * angle.cos()));
        object.rotation_mut().set(-0.2, angle, 0.0, EulerOrder::YXZ);

        let mut direction = Vec3::zeros();
        self.camera.world_direction(&mut direction);

        let world = self.camera.matrix_world();
        let eye = Vec3::new(world[(0, 3)], world[(1, 3)], world[(2, 3)]);
        log::info!(
            "step {}: eye ({:.2}, {:.2}, {:.2}) looking ({:.3}, {:.3}, {:.3})",
            index, eye.x, eye.y, eye.z, direction.x, direction.y, direction.z
        );
    }

    fn run(&mut self) {
        for index in 0..STEPS {
            self.step(index);
        }
        log::info!("Orbit finished after {} orientation changes", self.edits.get());
    }
}

fn load_config() -> Result<ApplicationConfig, AppError> {
    match std::env::args().nth(1) {
        Some(path) => Ok(ApplicationConfig::load_from_file(path)?),
        None => Ok(ApplicationConfig::default()),
    }
}

fn main() -> Result<(), AppError> {
    let config = load_config()?;
    logging::init_with_level(&config.engine.log_level);

    if config.engine.debug_mode {
        log::debug!("Running with {:?}", config);
    }

    let mut app = OrbitApp::new(&config);
    app.run();
    Ok(())
}
