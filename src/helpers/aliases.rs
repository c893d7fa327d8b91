use nalgebra::Vector3;

pub type Vec3<T> = Vector3<T>;
pub type Vec3f = Vec3<f32>;
pub type Vec3d = Vec3<f64>;
