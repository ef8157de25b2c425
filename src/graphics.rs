use std::f32::consts::PI;
use std::path::PathBuf;

use macroquad::prelude::*;
use simbot_kinematics::{DriveCommand, Pose};
use simbot_map::{GridTransform, Primitive, Rgb, Shape};
use tracing::{info, warn};

use crate::blackboard::{self, Blackboard};
use crate::bus::Topic;
use crate::settings::SimConfig;
use crate::simulation::RenderState;
use crate::teleop::Teleop;

const HUD_FONT_SIZE: f32 = 18.0;

// Function to configure the macroquad window
pub fn window_conf(config: &SimConfig) -> Conf {
    let (width, height) = config.transform().board_size(config.board.x_tiles, config.board.y_tiles);
    Conf {
        window_title: "simbot".to_string(),
        window_width: width.round() as i32,
        window_height: height.round() as i32,
        window_resizable: false,
        ..Default::default()
    }
}

fn color(rgb: Rgb) -> Color {
    Color::from_rgba(rgb.r, rgb.g, rgb.b, 255)
}

/// Everything the renderer needs that does not change between frames.
#[derive(Debug, Clone)]
pub struct RendererSettings {
    pub transform: GridTransform,
    pub x_tiles: u32,
    pub y_tiles: u32,
    pub robot_width: f32,
    pub robot_image: Option<PathBuf>,
}

impl RendererSettings {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            transform: config.transform(),
            x_tiles: config.board.x_tiles,
            y_tiles: config.board.y_tiles,
            robot_width: config.robot.width_px as f32,
            robot_image: config.robot.image.clone(),
        }
    }
}

/// Owns the window-side resources. Built once inside the macroquad context.
pub struct Renderer {
    settings: RendererSettings,
    robot_texture: Option<Texture2D>,
}

impl Renderer {
    pub async fn new(settings: RendererSettings) -> Self {
        let robot_texture = match &settings.robot_image {
            Some(path) => match load_texture(&path.to_string_lossy()).await {
                Ok(texture) => {
                    info!(path = %path.display(), "Loaded robot image.");
                    Some(texture)
                }
                Err(e) => {
                    warn!(path = %path.display(), "Cannot load robot image, drawing a triangle instead: {}", e);
                    None
                }
            },
            None => None,
        };
        Self { settings, robot_texture }
    }

    pub fn draw(&self, state: &RenderState) {
        clear_background(color(Rgb::BLACK));

        for dot in self.settings.transform.grid_dots(self.settings.x_tiles, self.settings.y_tiles) {
            draw_circle(dot.x as f32, dot.y as f32, 1.0, color(Rgb::WHITE));
        }

        for primitive in state.map.draw_order() {
            draw_primitive(primitive);
        }

        if let Some(pose) = state.pose {
            self.draw_robot(&pose);
            draw_text(
                &format!("x={:.1} y={:.1} heading={:.1}", pose.x, pose.y, pose.heading),
                10.0,
                20.0,
                HUD_FONT_SIZE,
                WHITE,
            );
        }
        let command = state.last_command.map_or_else(|| "-".to_string(), |c| c.to_string());
        draw_text(
            &format!("{:?}  t={:.2}s  ticks={}  cmd={}", state.phase, state.sim_time, state.ticks, command),
            10.0,
            40.0,
            HUD_FONT_SIZE,
            WHITE,
        );
        draw_text(
            "WASD: drive   R: reset   Esc: quit",
            10.0,
            screen_height() - 10.0,
            HUD_FONT_SIZE,
            GRAY,
        );
    }

    fn draw_robot(&self, pose: &Pose) {
        let (x, y) = (pose.x as f32, pose.y as f32);
        let size = self.settings.robot_width;
        // Heading is unbounded; reduce it before dropping to f32.
        let heading = (pose.heading % 360.0) as f32;

        match &self.robot_texture {
            Some(texture) => draw_texture_ex(
                texture,
                x - size / 2.0,
                y - size / 2.0,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(vec2(size, size)),
                    rotation: -heading.to_radians(),
                    ..Default::default()
                },
            ),
            None => {
                // Direction of travel is (sin h, cos h) in screen coordinates.
                let forward = PI / 2.0 - heading.to_radians();
                let r = size / 2.0;
                let corner = |angle: f32| vec2(x + r * angle.cos(), y + r * angle.sin());
                let nose = corner(forward);
                draw_triangle(
                    nose,
                    corner(forward + 2.0 * PI / 3.0),
                    corner(forward - 2.0 * PI / 3.0),
                    SKYBLUE,
                );
                draw_line(x, y, nose.x, nose.y, 2.0, DARKBLUE);
            }
        }
    }
}

fn draw_primitive(primitive: &Primitive) {
    let c = color(primitive.color);
    match primitive.shape {
        Shape::Segment { start, end, width } => {
            draw_line(start.x as f32, start.y as f32, end.x as f32, end.y as f32, width as f32, c)
        }
        Shape::Rect { origin, width, height } => {
            draw_rectangle(origin.x as f32, origin.y as f32, width as f32, height as f32, c)
        }
    }
}

pub async fn run_visualization_loop(bb: Blackboard, drive_topic: Topic<DriveCommand>, settings: RendererSettings) {
    let renderer = Renderer::new(settings).await;
    let mut teleop = Teleop::default();

    info!("Visualization loop starting. Use WASD to move, R to reset the robot.");

    loop {
        if is_key_pressed(KeyCode::Escape) || is_quit_requested() {
            info!("Quit requested. Exiting visualization loop.");
            break;
        }
        if is_key_pressed(KeyCode::R) {
            blackboard::reset(&bb);
        }
        if let Some(command) = teleop.poll(is_key_down) {
            drive_topic.publish(command);
        }

        renderer.draw(&blackboard::snapshot(&bb));

        next_frame().await
    }
}
