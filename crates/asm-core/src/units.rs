// asm-core/src/units.rs

use uom::si::f64::{
    AngularVelocity as UomAngularVelocity, Power as UomPower, Torque as UomTorque,
};

// Public canonical unit types (SI, f64)
pub type AngularVelocity = UomAngularVelocity;
pub type Power = UomPower;
pub type Torque = UomTorque;

#[inline]
pub fn kw(v: f64) -> Power {
    use uom::si::power::kilowatt;
    Power::new::<kilowatt>(v)
}

#[inline]
pub fn rpm(v: f64) -> AngularVelocity {
    use uom::si::angular_velocity::revolution_per_minute;
    AngularVelocity::new::<revolution_per_minute>(v)
}

#[inline]
pub fn newton_meters(v: f64) -> Torque {
    use uom::si::torque::newton_meter;
    Torque::new::<newton_meter>(v)
}

/// Shaft power in watts divided by angular speed in rad/s.
///
/// `P[kW] * 1000 / (2π n / 60)`.
pub fn torque_from_power(power: Power, speed: AngularVelocity) -> Torque {
    use uom::si::angular_velocity::radian_per_second;
    use uom::si::power::watt;
    newton_meters(power.get::<watt>() / speed.get::<radian_per_second>())
}
