//! SDL window, input polling and frame pacing.

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;

use crate::config::{ORBIT_SENSITIVITY, ZOOM_SENSITIVITY};
use crate::technique::Technique;

pub const FPS: u64 = 60;
pub const FRAME_TARGET_TIME: f64 = 1000.0 / FPS as f64;

/// Everything the user asked for since the last poll.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub quit: bool,
    pub resize: Option<(u32, u32)>,
    /// Accumulated (yaw, pitch) orbit deltas in radians.
    pub orbit: (f32, f32),
    /// Accumulated zoom delta in world units.
    pub zoom: f32,
    pub technique: Option<Technique>,
    pub toggle_outline: bool,
    pub save_frame: bool,
}

pub struct FrameLimiter {
    previous_frame_time: u64,
}

impl FrameLimiter {
    pub fn new(window: &Window) -> Self {
        Self {
            previous_frame_time: window.timer().ticks64(),
        }
    }

    /// Waits if necessary to maintain frame rate and returns the delta time
    /// in milliseconds since the previous call.
    pub fn wait_and_get_delta(&mut self, window: &Window) -> u64 {
        let mut current_time = window.timer().ticks64();
        let mut delta_time = current_time - self.previous_frame_time;

        if delta_time < FRAME_TARGET_TIME as u64 {
            let time_to_wait = (FRAME_TARGET_TIME as u64) - delta_time;
            std::thread::sleep(std::time::Duration::from_millis(time_to_wait));
            current_time = window.timer().ticks64();
            delta_time = current_time - self.previous_frame_time;
        }

        self.previous_frame_time = current_time;
        delta_time
    }
}

pub struct Window {
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    texture_creator: Box<sdl2::render::TextureCreator<sdl2::video::WindowContext>>,
    texture: sdl2::render::Texture<'static>,
    event_pump: sdl2::EventPump,
    timer_subsystem: sdl2::TimerSubsystem,
    width: u32,
    height: u32,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;
        let timer_subsystem = sdl_context.timer()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .resizable()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump()?;

        // SAFETY: texture_creator is heap-allocated and lives as long as Window.
        // We ensure texture is dropped before texture_creator by struct field order.
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(texture_creator.as_ref() as *const _) };
        let texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| e.to_string())?;

        Ok(Self {
            canvas,
            texture_creator,
            texture,
            event_pump,
            timer_subsystem,
            width,
            height,
        })
    }

    /// Drain the event queue into one [`FrameInput`].
    pub fn poll_events(&mut self) -> FrameInput {
        let mut input = FrameInput::default();
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => input.quit = true,
                Event::Window {
                    win_event: sdl2::event::WindowEvent::Resized(w, h),
                    ..
                } => input.resize = Some((w as u32, h as u32)),
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match key {
                    Keycode::O => input.toggle_outline = !input.toggle_outline,
                    Keycode::S => input.save_frame = true,
                    _ => {
                        if let Some(technique) = technique_for_key(key) {
                            input.technique = Some(technique);
                        }
                    }
                },
                Event::MouseMotion {
                    mousestate,
                    xrel,
                    yrel,
                    ..
                } if mousestate.left() => {
                    input.orbit.0 += xrel as f32 * ORBIT_SENSITIVITY;
                    input.orbit.1 += yrel as f32 * ORBIT_SENSITIVITY;
                }
                Event::MouseWheel { y, .. } => {
                    input.zoom += y as f32 * ZOOM_SENSITIVITY;
                }
                _ => {}
            }
        }
        input
    }

    pub fn present(&mut self, buffer: &[u8]) -> Result<(), String> {
        self.texture
            .update(None, buffer, (self.width * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.canvas.clear();
        self.canvas
            .copy(&self.texture, None, Some(Rect::new(0, 0, self.width, self.height)))?;
        self.canvas.present();
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), String> {
        self.width = width;
        self.height = height;
        // SAFETY: Same as in new() - texture_creator outlives texture
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(self.texture_creator.as_ref() as *const _) };
        self.texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn timer(&self) -> &sdl2::TimerSubsystem {
        &self.timer_subsystem
    }
}

fn technique_for_key(key: Keycode) -> Option<Technique> {
    match key {
        Keycode::Num1 => Some(Technique::Normals),
        Keycode::Num2 => Some(Technique::ViewVectors),
        Keycode::Num3 => Some(Technique::TangentProjection),
        Keycode::Num4 => Some(Technique::Flat),
        Keycode::Num5 => Some(Technique::Gouraud),
        Keycode::Num6 => Some(Technique::Phong),
        Keycode::Num7 => Some(Technique::Lambert),
        Keycode::Num8 => Some(Technique::Cel),
        Keycode::Num9 => Some(Technique::CelPhong),
        Keycode::Num0 => Some(Technique::CelContour),
        Keycode::G => Some(Technique::SuggestiveContour),
        _ => None,
    }
}
