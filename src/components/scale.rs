use bevy_ecs::prelude::Component;
use glam::Vec3;

#[derive(Component, Clone, Debug, Copy)]
pub struct Scale {
    pub scale: Vec3,
}
impl Scale {
    pub fn uniform(s: f32) -> Self {
        Self {
            scale: Vec3::splat(s),
        }
    }
}
impl Default for Scale {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}
