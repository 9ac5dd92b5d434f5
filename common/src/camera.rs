//! Perspective camera for 3D scenes

use glam::{Mat4, Vec3};

/// 3D perspective camera aimed at a fixed target
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera3D {
    pub fn new(aspect_ratio: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 45.0f32.to_radians(),
            aspect_ratio,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Camera placed at `position` looking at `target`, with a vertical fov in degrees
    pub fn looking_at(position: Vec3, target: Vec3, fov_degrees: f32, aspect_ratio: f32) -> Self {
        Self {
            position,
            target,
            fov: fov_degrees.to_radians(),
            ..Self::new(aspect_ratio)
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
    }

    /// Get the combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn update_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }
}

/// Camera uniform data for shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 4],
}

impl CameraUniform {
    pub fn from_camera_3d(camera: &Camera3D) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            position: [camera.position.x, camera.position.y, camera.position.z, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_projects_to_screen_center() {
        let camera = Camera3D::looking_at(Vec3::new(0.0, 2.0, 5.0), Vec3::ZERO, 75.0, 16.0 / 9.0);
        let clip = camera.view_projection() * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn uniform_carries_camera_position() {
        let camera = Camera3D::looking_at(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, 60.0, 1.0);
        let uniform = CameraUniform::from_camera_3d(&camera);
        assert_eq!(uniform.position, [1.0, 2.0, 3.0, 1.0]);
    }
}
