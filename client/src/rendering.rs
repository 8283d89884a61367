use crate::camera::FOV_Y_DEGREES;
use crate::collision::BuildingKind;
use crate::game::{EntityView, Hud, Simulation};
use crate::projectile::Owner;
use macroquad::prelude::{
    clear_background, draw_cube, draw_grid, draw_sphere, draw_text, measure_text, screen_height,
    screen_width, set_camera, set_default_camera, vec3, Camera3D, Color, Vec3,
};

const SKY: Color = Color::new(0.55, 0.25, 0.15, 1.0);
const GROUND_LINES: Color = Color::new(0.45, 0.2, 0.1, 1.0);
const BUILDING: Color = Color::new(0.8, 0.8, 0.82, 1.0);
const LOCAL: Color = Color::new(0.2, 0.8, 0.3, 1.0);
const REMOTE: Color = Color::new(0.3, 0.5, 0.95, 1.0);
const ENEMY: Color = Color::new(0.9, 0.25, 0.25, 1.0);
const ENEMY_LOCKED: Color = Color::new(1.0, 0.55, 0.1, 1.0);
const SHOT: Color = Color::new(1.0, 0.95, 0.3, 1.0);
const TEXT: Color = Color::new(1.0, 1.0, 1.0, 1.0);

fn to_mq(v: glam::Vec3) -> Vec3 {
    vec3(v.x, v.y, v.z)
}

pub struct Renderer {
    width: f32,
    height: f32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn render(&mut self, simulation: &Simulation, connected: bool) {
        self.width = screen_width();
        self.height = screen_height();

        clear_background(SKY);

        let eye = simulation.camera().position;
        set_camera(&Camera3D {
            position: to_mq(eye),
            target: to_mq(eye + simulation.camera().forward()),
            up: vec3(0.0, 1.0, 0.0),
            fovy: FOV_Y_DEGREES.to_radians(),
            ..Default::default()
        });

        draw_grid(100, 10.0, GROUND_LINES, GROUND_LINES);
        for entity in simulation.entities() {
            self.draw_entity(&entity);
        }

        set_default_camera();
        self.draw_labels(simulation);
        self.draw_hud(&simulation.hud(), connected);
    }

    fn draw_entity(&self, entity: &EntityView) {
        match entity {
            EntityView::Building(obstacle) => match obstacle.kind {
                BuildingKind::Dome { radius, height } => {
                    let centre = obstacle.bounds.center();
                    draw_sphere(vec3(centre.x, height / 2.0, centre.z), radius, None, BUILDING);
                }
                BuildingKind::Pod { .. } => {
                    draw_cube(
                        to_mq(obstacle.bounds.center()),
                        to_mq(obstacle.bounds.size()),
                        None,
                        BUILDING,
                    );
                }
            },
            EntityView::LocalActor {
                position, limbs, ..
            } => self.draw_figure(*position, *limbs, LOCAL),
            EntityView::Enemy {
                position,
                limbs,
                locked,
                ..
            } => {
                let color = if *locked { ENEMY_LOCKED } else { ENEMY };
                self.draw_figure(*position, *limbs, color);
            }
            EntityView::RemoteProxy { position, limb, .. } => {
                self.draw_figure(*position, (*limb, -*limb), REMOTE)
            }
            EntityView::Projectile { position, owner } => {
                let radius = match owner {
                    Owner::LocalActor => 0.15,
                    Owner::Enemy(_) => 0.1,
                };
                draw_sphere(to_mq(*position), radius, None, SHOT);
            }
        }
    }

    /// Body, head and two legs swinging by the gait phase.
    fn draw_figure(&self, feet: glam::Vec3, limbs: (f32, f32), color: Color) {
        let base = to_mq(feet);
        draw_cube(base + vec3(0.0, 1.25, 0.0), vec3(0.6, 0.9, 0.4), None, color);
        draw_sphere(base + vec3(0.0, 1.9, 0.0), 0.25, None, color);
        draw_cube(
            base + vec3(-0.15, 0.4, limbs.0.sin() * 0.3),
            vec3(0.2, 0.8, 0.2),
            None,
            color,
        );
        draw_cube(
            base + vec3(0.15, 0.4, limbs.1.sin() * 0.3),
            vec3(0.2, 0.8, 0.2),
            None,
            color,
        );
    }

    fn draw_labels(&self, simulation: &Simulation) {
        let viewport = glam::Vec2::new(self.width, self.height);
        for label in simulation.labels(viewport) {
            let size = label.font_size.round().max(1.0) as u16;
            let width = measure_text(&label.text, None, size, 1.0).width;
            draw_text(
                &label.text,
                label.screen.x - width / 2.0,
                label.screen.y,
                label.font_size,
                TEXT,
            );
        }
    }

    fn draw_hud(&self, hud: &Hud, connected: bool) {
        let status = if connected { "Online" } else { "Offline" };
        let lines = [
            format!("Health: {}", hud.health),
            format!("Eliminations: {}", hud.kills),
            format!("Players: {} ({})", hud.players_online, status),
        ];
        for (i, line) in lines.iter().enumerate() {
            draw_text(line, 10.0, 24.0 + i as f32 * 22.0, 22.0, TEXT);
        }

        if let Some(seconds) = hud.countdown {
            let text = format!("Back in Action: {}s", seconds);
            let width = measure_text(&text, None, 40, 1.0).width;
            draw_text(
                &text,
                (self.width - width) / 2.0,
                self.height / 2.0,
                40.0,
                TEXT,
            );
        }

        draw_text(
            "WASD/arrows: move   E: fly   Q: descend   Space: fire   Esc: quit",
            10.0,
            self.height - 12.0,
            18.0,
            TEXT,
        );
    }
}
