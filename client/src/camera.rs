//! Follow camera and screen-space name labels.

use glam::{Mat4, Vec2, Vec3, Vec4};

/// Camera position relative to the actor it follows
pub const FOLLOW_OFFSET: Vec3 = Vec3::new(0.0, 5.0, -10.0);
pub const FOV_Y_DEGREES: f32 = 75.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 2000.0;

/// Labels float this far above an actor's feet
pub const LABEL_HEIGHT: f32 = 2.5;
pub const LABEL_MAX_FONT: f32 = 16.0;
/// Labels shrink to nothing at this distance from the camera
pub const LABEL_FADE_DISTANCE: f32 = 50.0;

/// Chase camera. It never rotates: it always looks down +Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: FOLLOW_OFFSET,
        }
    }
}

impl Camera {
    pub fn follow(&mut self, target: Vec3) {
        self.position = target + FOLLOW_OFFSET;
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::Z
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        let projection =
            Mat4::perspective_rh_gl(FOV_Y_DEGREES.to_radians(), aspect, NEAR_PLANE, FAR_PLANE);
        let view = Mat4::look_to_rh(self.position, self.forward(), Vec3::Y);
        projection * view
    }

    /// Projects a world point to pixel coordinates, origin top-left. Returns
    /// `None` for points behind the camera or beyond the far plane.
    pub fn project(&self, point: Vec3, viewport: Vec2) -> Option<Vec2> {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return None;
        }
        let clip = self.view_projection(viewport.x / viewport.y) * Vec4::from((point, 1.0));
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if ndc.z > 1.0 {
            return None;
        }
        Some(Vec2::new(
            (ndc.x * 0.5 + 0.5) * viewport.x,
            (-ndc.y * 0.5 + 0.5) * viewport.y,
        ))
    }
}

/// A name drawn over an actor
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub screen: Vec2,
    pub font_size: f32,
}

/// Shrinks linearly with distance and vanishes at `LABEL_FADE_DISTANCE`.
pub fn label_font_size(distance: f32) -> f32 {
    (LABEL_MAX_FONT * (1.0 - distance / LABEL_FADE_DISTANCE)).max(0.0)
}

/// Places a label over an actor standing at `feet`. Returns `None` when the
/// label would be off-camera or too far away to read.
pub fn layout_label(camera: &Camera, feet: Vec3, text: &str, viewport: Vec2) -> Option<Label> {
    let font_size = label_font_size(camera.position.distance(feet));
    if font_size <= 0.0 {
        return None;
    }
    let screen = camera.project(feet + Vec3::new(0.0, LABEL_HEIGHT, 0.0), viewport)?;
    Some(Label {
        text: text.to_string(),
        screen,
        font_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_follow() {
        let mut camera = Camera::default();
        camera.follow(Vec3::new(10.0, 2.0, 20.0));
        assert_eq!(camera.position, Vec3::new(10.0, 7.0, 10.0));
    }

    #[test]
    fn test_point_ahead_projects_to_centre_column() {
        let mut camera = Camera::default();
        camera.follow(Vec3::ZERO);
        let screen = camera.project(Vec3::new(0.0, 5.0, 20.0), VIEWPORT).unwrap();
        assert_approx_eq!(screen.x, 400.0, 1e-3);
        assert_approx_eq!(screen.y, 300.0, 1e-3);
    }

    #[test]
    fn test_point_behind_is_hidden() {
        let mut camera = Camera::default();
        camera.follow(Vec3::ZERO);
        assert!(camera.project(Vec3::new(0.0, 0.0, -20.0), VIEWPORT).is_none());
    }

    #[test]
    fn test_font_scaling() {
        assert_eq!(label_font_size(0.0), LABEL_MAX_FONT);
        assert_approx_eq!(label_font_size(25.0), 8.0);
        assert_eq!(label_font_size(50.0), 0.0);
        assert_eq!(label_font_size(80.0), 0.0);
    }

    #[test]
    fn test_layout_label() {
        let mut camera = Camera::default();
        camera.follow(Vec3::ZERO);

        let label = layout_label(&camera, Vec3::new(0.0, 0.0, 5.0), "Ares", VIEWPORT).unwrap();
        assert_eq!(label.text, "Ares");
        assert!(label.font_size > 0.0 && label.font_size < LABEL_MAX_FONT);

        assert!(layout_label(&camera, Vec3::new(0.0, 0.0, 200.0), "Far", VIEWPORT).is_none());
        assert!(layout_label(&camera, Vec3::new(0.0, 0.0, -15.0), "Behind", VIEWPORT).is_none());
    }

    #[test]
    fn test_positive_x_appears_left() {
        let mut camera = Camera::default();
        camera.follow(Vec3::ZERO);
        let screen = camera.project(Vec3::new(5.0, 5.0, 20.0), VIEWPORT).unwrap();
        assert!(screen.x < 400.0);
    }
}
