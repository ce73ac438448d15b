use glam::Mat4;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Pixel-space projection: x grows right, y grows down, origin at the
/// top-left corner of the window. The editor addresses the scene in
/// screen pixels, so there is no pan or zoom.
pub struct ScreenCamera {
    pub viewport: (u32, u32),
}

impl ScreenCamera {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            viewport: (viewport_width, viewport_height),
        }
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let (w, h) = (self.viewport.0 as f32, self.viewport.1 as f32);
        let proj = Mat4::orthographic_rh(0.0, w.max(1.0), h.max(1.0), 0.0, -1.0, 1.0);
        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec4, Vec4Swizzles};

    #[test]
    fn top_left_maps_to_upper_left_clip_corner() {
        let camera = ScreenCamera::new(1280, 720);
        let proj = Mat4::from_cols_array_2d(&camera.build_uniform().view_proj);
        let clip = proj * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.xy() - glam::Vec2::new(-1.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn bottom_right_maps_to_lower_right_clip_corner() {
        let camera = ScreenCamera::new(1280, 720);
        let proj = Mat4::from_cols_array_2d(&camera.build_uniform().view_proj);
        let clip = proj * Vec4::new(1280.0, 720.0, 0.0, 1.0);
        assert!((clip.xy() - glam::Vec2::new(1.0, -1.0)).length() < 1e-6);
    }
}
