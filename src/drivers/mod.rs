pub mod blink;
pub mod light_sensor;

pub use blink::blink;
pub use light_sensor::{read_light_level, LightLevel};
