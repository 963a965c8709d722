//! 단위 정의 및 변환 모듈 모음.

pub mod angle;
pub mod area;
pub mod density;
pub mod distance;
pub mod elapsing_time;
pub mod julian_time;
pub mod pressure;
pub mod speed;
pub mod temperature;
pub mod unitless;
pub mod volume;
pub mod volumetric_flow;

pub use angle::{convert_angle, AngleUnit};
pub use area::{convert_area, AreaUnit};
pub use density::{convert_density, DensityUnit};
pub use distance::{convert_distance, DistanceUnit};
pub use elapsing_time::{convert_elapsing_time, ElapsingTimeUnit};
pub use julian_time::{convert_julian_time, JulianTimeUnit};
pub use pressure::{convert_pressure, PressureUnit};
pub use speed::{convert_speed, SpeedUnit};
pub use temperature::{convert_temperature, TemperatureUnit};
pub use unitless::{convert_unitless, UnitlessUnit};
pub use volume::{convert_volume, VolumeUnit};
pub use volumetric_flow::{convert_volumetric_flow, VolumetricFlowUnit};
